//! Keyword-based sentiment classification.
//!
//! The whole input is lowercased, then searched for keyword *substrings*:
//! "badminton" counts as containing "bad". Negative keywords are checked
//! before positive ones, so a text carrying both is negative.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const NEGATIVE_KEYWORDS: &[&str] = &["bad", "hate"];
const POSITIVE_KEYWORDS: &[&str] = &["great", "love", "good"];

/// A sentiment label, serialized in lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Negative,
    Positive,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Negative => "negative",
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies `text`. Total over every string, including the empty one.
pub fn classify(text: &str) -> Sentiment {
    let normalized = text.to_lowercase();
    let contains_any = |keywords: &[&str]| keywords.iter().any(|keyword| normalized.contains(keyword));

    if contains_any(NEGATIVE_KEYWORDS) {
        Sentiment::Negative
    } else if contains_any(POSITIVE_KEYWORDS) {
        Sentiment::Positive
    } else {
        Sentiment::Neutral
    }
}
