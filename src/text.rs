// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Hyperpolymath

//! Text normalization shared by the serving layer and offline tooling
//!
//! One pure function: lowercase, strip everything that is not an ASCII
//! letter or whitespace, drop stopwords and short tokens, rejoin. The same
//! rules were applied when the models were trained, so they must not drift.

use std::collections::HashSet;
use std::sync::OnceLock;

/// Bundled English stopword list (the standard NLTK set), so no runtime
/// download is needed. Entries containing apostrophes cannot survive the
/// non-alphabetic strip and are kept only for parity with the resource.
static STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you",
    "you're", "you've", "you'll", "you'd", "your", "yours", "yourself",
    "yourselves", "he", "him", "his", "himself", "she", "she's", "her",
    "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this",
    "that", "that'll", "these", "those", "am", "is", "are", "was", "were",
    "be", "been", "being", "have", "has", "had", "having", "do", "does",
    "did", "doing", "a", "an", "the", "and", "but", "if", "or", "because",
    "as", "until", "while", "of", "at", "by", "for", "with", "about",
    "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "in", "out", "on", "off",
    "over", "under", "again", "further", "then", "once", "here", "there",
    "when", "where", "why", "how", "all", "any", "both", "each", "few",
    "more", "most", "other", "some", "such", "no", "nor", "not", "only",
    "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "don't", "should", "should've", "now", "d", "ll", "m",
    "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't",
    "didn", "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn",
    "hasn't", "haven", "haven't", "isn", "isn't", "ma", "mightn",
    "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won",
    "won't", "wouldn", "wouldn't",
];

fn stopword_set() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOPWORDS.iter().copied().collect())
}

/// Normalize raw text for vectorization.
///
/// Lowercases, removes every character that is not an ASCII letter or
/// whitespace (digits and punctuation included — numerals carry signal the
/// training pipeline also discarded), tokenizes on whitespace, drops
/// stopwords and tokens of length <= 2, and joins the survivors with single
/// spaces in their original order.
///
/// Never fails: degenerate input yields an empty string, which callers treat
/// as "too short" rather than as an error.
pub fn normalize(text: &str) -> String {
    let stopwords = stopword_set();

    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect();

    stripped
        .split_whitespace()
        .filter(|token| !stopwords.contains(*token) && token.len() > 2)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Count of whitespace-delimited tokens in an already-normalized string.
pub fn token_count(normalized: &str) -> usize {
    normalized.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_strips_non_alphabetic() {
        assert_eq!(
            normalize("BREAKING!!! Scientists discover 42 planets..."),
            "breaking scientists discover planets"
        );
    }

    #[test]
    fn test_removes_stopwords_and_short_tokens() {
        // "the", "is", "a" are stopwords; "ox" is too short
        assert_eq!(normalize("the ox is a sturdy animal"), "sturdy animal");
    }

    #[test]
    fn test_preserves_token_order() {
        assert_eq!(
            normalize("senate committee approved budget"),
            "senate committee approved budget"
        );
    }

    #[test]
    fn test_degenerate_inputs_yield_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t\n  "), "");
        assert_eq!(normalize("1234 .,;!? 56"), "");
        assert_eq!(normalize("the and of is a"), "");
        assert_eq!(normalize("ab cd ef"), "");
    }

    #[test]
    fn test_digits_inside_tokens_are_stripped() {
        // "covid19" loses its digits but the alphabetic stem survives
        assert_eq!(normalize("covid19 cases rose"), "covid cases rose");
    }

    #[test]
    fn test_contractions_lose_apostrophes_before_filtering() {
        // "don't" becomes "dont", which is not a stopword and survives
        assert_eq!(normalize("don't panic"), "dont panic");
    }

    #[test]
    fn test_deterministic() {
        let input = "Officials confirmed the report on Tuesday, citing three sources.";
        assert_eq!(normalize(input), normalize(input));
    }

    #[test]
    fn test_token_count() {
        assert_eq!(token_count(""), 0);
        assert_eq!(token_count("sturdy animal"), 2);
    }
}
