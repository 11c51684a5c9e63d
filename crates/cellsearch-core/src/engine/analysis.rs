//! Built-in analyzers.
//!
//! The search engine owns real text analysis; the compiler only needs the
//! same token stream to pre-analyze `match` and `phrase` values, so every
//! analyzer a schema may reference is resolvable here by name.

/// Analyzer used by text mappers that do not name one.
pub const DEFAULT_ANALYZER: &str = "standard";

const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

///
/// Analyzer
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Analyzer {
    /// Split on non-alphanumerics, lowercase.
    Standard,
    /// Split on non-letters, lowercase.
    Simple,
    /// Split on whitespace, case preserved.
    Whitespace,
    /// Whole input as one token.
    Keyword,
    /// Standard plus English stop words.
    English,
}

impl Analyzer {
    pub const ALL: [Self; 5] = [
        Self::Standard,
        Self::Simple,
        Self::Whitespace,
        Self::Keyword,
        Self::English,
    ];

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Simple => "simple",
            Self::Whitespace => "whitespace",
            Self::Keyword => "keyword",
            Self::English => "english",
        }
    }

    /// Tokenize `text` into the terms the engine would index.
    #[must_use]
    pub fn analyze(self, text: &str) -> Vec<String> {
        match self {
            Self::Standard => split_lowercase(text, char::is_alphanumeric),
            Self::Simple => split_lowercase(text, char::is_alphabetic),
            Self::Whitespace => text.split_whitespace().map(str::to_string).collect(),
            Self::Keyword => {
                if text.is_empty() {
                    Vec::new()
                } else {
                    vec![text.to_string()]
                }
            }
            Self::English => split_lowercase(text, char::is_alphanumeric)
                .into_iter()
                .filter(|t| !ENGLISH_STOP_WORDS.contains(&t.as_str()))
                .collect(),
        }
    }
}

fn split_lowercase(text: &str, keep: impl Fn(char) -> bool) -> Vec<String> {
    text.split(|c: char| !keep(c))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_lowercases_and_splits_punctuation() {
        assert_eq!(
            Analyzer::Standard.analyze("Hello, World-42!"),
            vec!["hello", "world", "42"]
        );
    }

    #[test]
    fn english_drops_stop_words() {
        assert_eq!(
            Analyzer::English.analyze("The quick fox and the dog"),
            vec!["quick", "fox", "dog"]
        );
    }

    #[test]
    fn keyword_keeps_input_whole() {
        assert_eq!(Analyzer::Keyword.analyze("New York"), vec!["New York"]);
        assert!(Analyzer::Keyword.analyze("").is_empty());
    }

    #[test]
    fn names_resolve_round_trip() {
        for analyzer in Analyzer::ALL {
            assert_eq!(Analyzer::from_name(analyzer.name()), Some(analyzer));
        }
        assert_eq!(Analyzer::from_name("klingon"), None);
    }
}
