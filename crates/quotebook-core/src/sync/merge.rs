//! Local-wins merge of remote quotes

use std::collections::HashSet;

use crate::models::Quote;

/// Result of merging a remote collection into a local one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Remote quotes to append, in remote order
    pub added: Vec<Quote>,
    /// Remote quotes dropped because their text already exists
    pub skipped: usize,
}

impl MergeReport {
    /// Whether the merge changes the local collection
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
    }
}

/// Work out which remote quotes to append to `local`
///
/// A remote quote is added only if no local quote, and no remote quote
/// added earlier in the same pass, has the same text.
pub fn merge_remote(local: &[Quote], remote: &[Quote]) -> MergeReport {
    let mut seen: HashSet<&str> = local.iter().map(|q| q.text.as_str()).collect();
    let mut report = MergeReport::default();

    for quote in remote {
        if seen.insert(quote.text.as_str()) {
            report.added.push(quote.clone());
        } else {
            report.skipped += 1;
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(text: &str, category: &str) -> Quote {
        Quote::new(text, category)
    }

    #[test]
    fn test_local_wins_on_text_collision() {
        let local = vec![q("A", "x")];
        let remote = vec![q("A", "y"), q("B", "z")];

        let report = merge_remote(&local, &remote);
        assert_eq!(report.added, vec![q("B", "z")]);
        assert_eq!(report.skipped, 1);

        let mut merged = local.clone();
        merged.extend(report.added);
        assert_eq!(merged, vec![q("A", "x"), q("B", "z")]);
    }

    #[test]
    fn test_remote_duplicates_added_once() {
        let remote = vec![q("B", "z"), q("C", "z"), q("B", "other")];

        let report = merge_remote(&[], &remote);
        assert_eq!(report.added, vec![q("B", "z"), q("C", "z")]);
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn test_remote_order_preserved() {
        let local = vec![q("L", "x")];
        let remote = vec![q("R3", "a"), q("R1", "b"), q("R2", "c")];

        let report = merge_remote(&local, &remote);
        let texts: Vec<_> = report.added.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["R3", "R1", "R2"]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let local = vec![q("A", "x")];
        let remote = vec![q("A", "y"), q("B", "z")];

        let first = merge_remote(&local, &remote);
        let mut merged = local.clone();
        merged.extend(first.added);

        let second = merge_remote(&merged, &remote);
        assert!(second.is_empty());
        assert_eq!(second.skipped, 2);
    }

    #[test]
    fn test_local_duplicates_untouched() {
        let local = vec![q("A", "x"), q("A", "y")];
        let report = merge_remote(&local, &[q("A", "z")]);
        assert!(report.is_empty());
    }

    #[test]
    fn test_empty_remote() {
        let report = merge_remote(&[q("A", "x")], &[]);
        assert_eq!(report, MergeReport::default());
    }
}
