//! Text normalization shared by the scorer for queries and catalog text.

use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

/// Common English words that add noise to lexical matching.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with",
    "by", "from", "as", "is", "are", "was", "were", "be", "been", "being", "have",
    "has", "had", "do", "does", "did", "will", "would", "should", "could", "what",
    "which", "who", "where", "when", "why", "how", "this", "that", "these", "those",
    "i", "am", "we", "our", "you", "your", "it", "its", "their", "they", "them",
    "need", "looking", "hiring", "can", "also", "into", "than", "then",
];

fn stop_words() -> &'static HashSet<&'static str> {
    static WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    WORDS.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

/// Split text into lowercase terms.
///
/// Anything other than alphanumerics, `+` and `#` separates terms, so
/// "C++" and "C#" survive as terms. Stop words and one-character terms
/// are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|raw| !raw.is_empty())
        .map(str::to_lowercase)
        .filter(|term| term.chars().count() >= 2 && !stop_words().contains(term.as_str()))
        .collect()
}

/// Term -> occurrence count. Ordered so that iteration (and therefore float
/// summation order) is the same on every run.
pub type TermCounts = BTreeMap<String, u32>;

pub fn term_counts(text: &str) -> TermCounts {
    let mut counts = TermCounts::new();
    for term in tokenize(text) {
        *counts.entry(term).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        assert_eq!(tokenize("Java Developer Test"), vec!["java", "developer", "test"]);
    }

    #[test]
    fn test_tokenize_drops_stop_words_and_punctuation() {
        assert_eq!(
            tokenize("I am hiring a manager, with experience in financial institutions."),
            vec!["manager", "experience", "financial", "institutions"]
        );
    }

    #[test]
    fn test_tokenize_keeps_language_names() {
        assert_eq!(tokenize("C++ and C# (.NET)"), vec!["c++", "c#", "net"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ?! - ").is_empty());
        assert!(tokenize("the and of").is_empty());
    }

    #[test]
    fn test_term_counts() {
        let counts = term_counts("Java java JAVA coding");
        assert_eq!(counts.get("java"), Some(&3));
        assert_eq!(counts.get("coding"), Some(&1));
        assert_eq!(counts.len(), 2);
    }
}
