//! Data models for Quotebook
//!
//! Defines the `Quote` record and the built-in default collection.
//! A quote has no identifier of its own; its text is the natural key
//! used when merging remote quotes into the local collection.

use serde::{Deserialize, Serialize};

use crate::error::QuoteError;

/// A quote with its category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Quote {
    /// The quote text
    pub text: String,
    /// Category used for filtering
    pub category: String,
}

impl Quote {
    /// Create a quote without validation
    ///
    /// Use [`Quote::parse`] for user input.
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Build a quote from user input
    ///
    /// Surrounding whitespace is trimmed from both fields. Fails with
    /// `ValidationFailed` if either field is empty after trimming.
    pub fn parse(text: &str, category: &str) -> Result<Self, QuoteError> {
        let text = text.trim();
        let category = category.trim();

        if text.is_empty() {
            return Err(QuoteError::ValidationFailed {
                field: "text",
                reason: "must not be empty".to_string(),
            });
        }
        if category.is_empty() {
            return Err(QuoteError::ValidationFailed {
                field: "category",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(Self::new(text, category))
    }

    /// Whether both fields carry non-blank content
    pub fn is_well_formed(&self) -> bool {
        !self.text.trim().is_empty() && !self.category.trim().is_empty()
    }
}

/// The collection used when nothing valid has been stored yet
pub fn default_quotes() -> Vec<Quote> {
    vec![
        Quote::new(
            "The only way to do great work is to love what you do.",
            "inspiration",
        ),
        Quote::new(
            "Innovation distinguishes between a leader and a follower.",
            "business",
        ),
        Quote::new(
            "Your time is limited, don't waste it living someone else's life.",
            "life",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_fields() {
        let quote = Quote::parse("  Stay hungry.  ", "\tlife \n").unwrap();
        assert_eq!(quote.text, "Stay hungry.");
        assert_eq!(quote.category, "life");
    }

    #[test]
    fn test_parse_rejects_blank_text() {
        let err = Quote::parse("   ", "life").unwrap_err();
        assert!(matches!(
            err,
            QuoteError::ValidationFailed { field: "text", .. }
        ));
    }

    #[test]
    fn test_parse_rejects_blank_category() {
        let err = Quote::parse("Stay hungry.", "").unwrap_err();
        assert!(matches!(
            err,
            QuoteError::ValidationFailed {
                field: "category",
                ..
            }
        ));
    }

    #[test]
    fn test_default_quotes() {
        let quotes = default_quotes();
        assert_eq!(quotes.len(), 3);
        assert_eq!(quotes[0].category, "inspiration");
        assert_eq!(quotes[1].category, "business");
        assert_eq!(quotes[2].category, "life");
        assert!(quotes.iter().all(Quote::is_well_formed));
    }

    #[test]
    fn test_serialization_shape() {
        let quote = Quote::new("A", "x");
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json, serde_json::json!({"text": "A", "category": "x"}));
    }
}
