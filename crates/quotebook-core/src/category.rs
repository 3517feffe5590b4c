//! Category index
//!
//! Derived view over a quote collection. Nothing here is stored: the
//! category list is recomputed from the collection every time, with the
//! `"all"` sentinel meaning "no filter".

use std::collections::HashSet;

use crate::models::Quote;

/// Filter value that matches every quote
pub const ALL_CATEGORIES: &str = "all";

/// List `"all"` followed by each distinct category in first-occurrence order
pub fn categories(quotes: &[Quote]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut result = vec![ALL_CATEGORIES.to_string()];

    for quote in quotes {
        if quote.category != ALL_CATEGORIES && seen.insert(quote.category.as_str()) {
            result.push(quote.category.clone());
        }
    }

    result
}

/// Resolve a requested filter against the current categories
///
/// Returns `requested` if it is one of `categories`, otherwise `"all"`.
pub fn resolve_filter(requested: &str, categories: &[String]) -> String {
    if categories.iter().any(|c| c == requested) {
        requested.to_string()
    } else {
        ALL_CATEGORIES.to_string()
    }
}

/// Quotes matching a filter, in collection order
pub fn filter_quotes<'a>(quotes: &'a [Quote], filter: &str) -> Vec<&'a Quote> {
    if filter == ALL_CATEGORIES {
        return quotes.iter().collect();
    }
    quotes.iter().filter(|q| q.category == filter).collect()
}

/// Count quotes per category, in first-occurrence order
pub fn category_counts(quotes: &[Quote]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();

    for quote in quotes {
        match counts.iter_mut().find(|(name, _)| *name == quote.category) {
            Some((_, count)) => *count += 1,
            None => counts.push((quote.category.clone(), 1)),
        }
    }

    counts
}
