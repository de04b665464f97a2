//! Term matching for antonym qualifiers.
//!
//! ASCII terms match on word boundaries, case-insensitively, so "likes" does
//! not fire inside "dislikes". CJK has no word boundaries; those terms match
//! as substrings, and callers mask longer negating terms ("不喜欢") before
//! looking for the shorter affirming one ("喜欢").

use regex::Regex;

#[derive(Debug, Clone)]
pub enum TermMatcher {
    Word(Regex),
    Literal(String),
}

impl TermMatcher {
    pub fn new(term: &str) -> Self {
        let term = term.trim();
        if term.is_ascii() {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(term));
            if let Ok(re) = Regex::new(&pattern) {
                return Self::Word(re);
            }
        }
        Self::Literal(term.to_lowercase())
    }

    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Word(re) => re.is_match(text),
            Self::Literal(term) => !term.is_empty() && text.to_lowercase().contains(term.as_str()),
        }
    }

    /// `text` with every match replaced by a single space.
    pub fn mask(&self, text: &str) -> String {
        match self {
            Self::Word(re) => re.replace_all(text, " ").into_owned(),
            Self::Literal(term) if term.is_empty() => text.to_string(),
            Self::Literal(term) => text.to_lowercase().replace(term.as_str(), " "),
        }
    }
}

/// Collapse whitespace and lowercase.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
