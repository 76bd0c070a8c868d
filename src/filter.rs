//! Filter/search sub-controller state.
//!
//! Three cooperating pieces, all plain values with no ambient storage:
//! - [`FilterSelection`]: the ordered, deduplicated set of taxon ids the user
//!   has collected for the next refinement query.
//! - [`SuggestionList`]: the live-filtered suggestion dropdown with a single
//!   keyboard-movable active entry (wrapping at both ends).
//! - [`FilterHistory`]: the taxon-id filter history accumulated across
//!   successive submissions in a session, with explicit begin/commit/rollback
//!   and a submission-in-progress guard.

use anyhow::{Result, bail};

use crate::parser::CatalogEntry;

// ────────────────────────────────────────────────────────────────────────────
// FilterSelection
// ────────────────────────────────────────────────────────────────────────────

/// The collector list of taxa chosen for the next refinement.
#[derive(Debug, Clone, Default)]
pub struct FilterSelection {
    entries: Vec<CatalogEntry>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry; re-adding an already-present taxon id is a no-op.
    /// Returns true if the entry was actually inserted.
    pub fn add(&mut self, entry: CatalogEntry) -> bool {
        if self.entries.iter().any(|e| e.taxid == entry.taxid) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Remove the entry for a taxon id; returns true if it was present.
    pub fn remove(&mut self, taxid: u32) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.taxid != taxid);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn ids(&self) -> Vec<u32> {
        self.entries.iter().map(|e| e.taxid).collect()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SuggestionList
// ────────────────────────────────────────────────────────────────────────────

/// Live-filtered suggestions below the search input.
#[derive(Debug, Clone, Default)]
pub struct SuggestionList {
    matches: Vec<CatalogEntry>,
    active: usize,
    open: bool,
}

impl SuggestionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-filter the catalog with a case-insensitive substring match against
    /// the raw catalog line. An empty (or whitespace-only) query closes the
    /// list, as does a query with no matches.
    pub fn refresh(&mut self, query: &str, catalog: &[CatalogEntry]) {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            self.matches.clear();
            self.open = false;
            self.active = 0;
            return;
        }
        self.matches = catalog
            .iter()
            .filter(|e| e.raw.to_lowercase().contains(&q))
            .cloned()
            .collect();
        self.active = 0;
        self.open = !self.matches.is_empty();
    }

    /// Move the active selection down, wrapping past the last entry.
    pub fn move_down(&mut self) {
        if !self.matches.is_empty() {
            self.active = (self.active + 1) % self.matches.len();
        }
    }

    /// Move the active selection up, wrapping past the first entry.
    pub fn move_up(&mut self) {
        if !self.matches.is_empty() {
            self.active = self
                .active
                .checked_sub(1)
                .unwrap_or(self.matches.len() - 1);
        }
    }

    /// The currently active suggestion, if the list is open.
    pub fn active_entry(&self) -> Option<&CatalogEntry> {
        if self.open {
            self.matches.get(self.active)
        } else {
            None
        }
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn matches(&self) -> &[CatalogEntry] {
        &self.matches
    }

    /// Close the dropdown (Escape, click outside, or selection made).
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

// ────────────────────────────────────────────────────────────────────────────
// FilterHistory
// ────────────────────────────────────────────────────────────────────────────

/// Taxon-id filter history accumulated across submissions in one session.
///
/// A refinement request always carries the full accumulated history, not just
/// the latest collector contents. The history is mutated optimistically when
/// a submission starts and restored on [`FilterHistory::rollback`] when the
/// server reports an error. While a submission is in flight, a second
/// submission is rejected instead of interleaving mutations.
#[derive(Debug, Clone, Default)]
pub struct FilterHistory {
    accumulated: Vec<u32>,
    backup: Vec<u32>,
    in_flight: bool,
}

impl FilterHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a submission: fold the collector ids into the history and return
    /// the full id list to send. Fails if a submission is already in flight.
    pub fn begin_submission(&mut self, selection: &[u32]) -> Result<Vec<u32>> {
        if self.in_flight {
            bail!("A refinement submission is already in progress");
        }
        self.backup = self.accumulated.clone();
        for &id in selection {
            if !self.accumulated.contains(&id) {
                self.accumulated.push(id);
            }
        }
        self.in_flight = true;
        Ok(self.accumulated.clone())
    }

    /// The submission succeeded; keep the extended history.
    pub fn commit(&mut self) {
        self.backup.clear();
        self.in_flight = false;
    }

    /// The submission failed; restore the pre-submission history.
    pub fn rollback(&mut self) {
        self.accumulated = std::mem::take(&mut self.backup);
        self.in_flight = false;
    }

    pub fn ids(&self) -> &[u32] {
        &self.accumulated
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn is_empty(&self) -> bool {
        self.accumulated.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(label: &str, taxid: u32) -> CatalogEntry {
        CatalogEntry {
            label: label.to_string(),
            taxid,
            raw: format!("{} -> [{}]", label, taxid),
        }
    }

    #[test]
    fn test_selection_dedup() {
        let mut sel = FilterSelection::new();
        assert!(sel.add(entry("Homo sapiens", 9606)));
        assert!(!sel.add(entry("Homo sapiens", 9606)));
        assert_eq!(sel.len(), 1);
        assert_eq!(sel.ids(), vec![9606]);
    }

    #[test]
    fn test_selection_remove() {
        let mut sel = FilterSelection::new();
        sel.add(entry("Homo sapiens", 9606));
        sel.add(entry("Mus musculus", 10090));
        assert!(sel.remove(9606));
        assert!(!sel.remove(9606));
        assert_eq!(sel.ids(), vec![10090]);
    }

    #[test]
    fn test_suggestions_case_insensitive_substring() {
        let catalog = vec![entry("Homo sapiens", 9606), entry("Mus musculus", 10090)];
        let mut list = SuggestionList::new();
        list.refresh("SAPI", &catalog);
        assert!(list.is_open());
        assert_eq!(list.matches().len(), 1);
        assert_eq!(list.active_entry().map(|e| e.taxid), Some(9606));
    }

    #[test]
    fn test_suggestions_empty_query_closes() {
        let catalog = vec![entry("Homo sapiens", 9606)];
        let mut list = SuggestionList::new();
        list.refresh("homo", &catalog);
        assert!(list.is_open());
        list.refresh("   ", &catalog);
        assert!(!list.is_open());
        assert!(list.matches().is_empty());
    }

    #[test]
    fn test_suggestions_wrap_both_ends() {
        let catalog = vec![
            entry("Homo sapiens", 9606),
            entry("Mus musculus", 10090),
            entry("Rattus norvegicus", 10116),
        ];
        let mut list = SuggestionList::new();
        list.refresh("us", &catalog);
        assert_eq!(list.matches().len(), 3);
        assert_eq!(list.active_index(), 0);

        list.move_up();
        assert_eq!(list.active_index(), 2, "wraps past the first entry");
        list.move_down();
        assert_eq!(list.active_index(), 0, "wraps past the last entry");
    }

    #[test]
    fn test_history_accumulates_across_submissions() {
        let mut history = FilterHistory::new();
        let ids = history.begin_submission(&[9606]).unwrap();
        assert_eq!(ids, vec![9606]);
        history.commit();

        let ids = history.begin_submission(&[10090]).unwrap();
        assert_eq!(ids, vec![9606, 10090], "history carries earlier filters");
        history.commit();
        assert_eq!(history.ids(), &[9606, 10090]);
    }

    #[test]
    fn test_history_rollback_restores_previous_value() {
        let mut history = FilterHistory::new();
        history.begin_submission(&[9606]).unwrap();
        history.commit();

        history.begin_submission(&[10090, 10116]).unwrap();
        history.rollback();
        assert_eq!(history.ids(), &[9606]);
        assert!(!history.in_flight());
    }

    #[test]
    fn test_history_rejects_concurrent_submission() {
        let mut history = FilterHistory::new();
        history.begin_submission(&[9606]).unwrap();
        assert!(history.in_flight());
        assert!(history.begin_submission(&[10090]).is_err());

        history.commit();
        assert!(history.begin_submission(&[10090]).is_ok());
    }

    #[test]
    fn test_history_dedups_resubmitted_ids() {
        let mut history = FilterHistory::new();
        history.begin_submission(&[9606]).unwrap();
        history.commit();
        let ids = history.begin_submission(&[9606, 10090]).unwrap();
        assert_eq!(ids, vec![9606, 10090]);
    }
}
