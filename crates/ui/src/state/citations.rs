use cdpchat_core::{EntryId, TranscriptEntry};
use std::collections::HashSet;

/// Per-entry "show sources" switches and the focused entry.
///
/// View state only; the transcript never sees it. Everything starts hidden.
#[derive(Debug, Clone, Default)]
pub struct CitationToggles {
    visible: HashSet<EntryId>,
    focused: Option<EntryId>,
}

impl CitationToggles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self, id: EntryId) -> bool {
        self.visible.contains(&id)
    }

    /// Flip visibility and return the new value. Entries without citations
    /// stay hidden.
    pub fn toggle(&mut self, entry: &TranscriptEntry) -> bool {
        if !entry.has_citations() {
            return false;
        }
        if !self.visible.remove(&entry.id) {
            self.visible.insert(entry.id);
        }
        self.is_visible(entry.id)
    }

    pub fn focused(&self) -> Option<EntryId> {
        self.focused
    }

    pub fn clear_focus(&mut self) {
        self.focused = None;
    }

    /// Move focus to the next entry with citations, wrapping around
    pub fn focus_next(&mut self, entries: &[TranscriptEntry]) -> Option<EntryId> {
        let candidates = Self::candidates(entries);
        self.focused = match self.position_in(&candidates) {
            Some(pos) => candidates.get((pos + 1) % candidates.len()).copied(),
            None => candidates.first().copied(),
        };
        self.focused
    }

    /// Move focus to the previous entry with citations, wrapping around
    pub fn focus_prev(&mut self, entries: &[TranscriptEntry]) -> Option<EntryId> {
        let candidates = Self::candidates(entries);
        self.focused = match self.position_in(&candidates) {
            Some(0) | None => candidates.last().copied(),
            Some(pos) => candidates.get(pos - 1).copied(),
        };
        self.focused
    }

    /// Toggle the focused entry, or the newest entry with citations when
    /// nothing is focused. Returns the entry and its new visibility.
    pub fn toggle_focused(&mut self, entries: &[TranscriptEntry]) -> Option<(EntryId, bool)> {
        let target = match self.focused {
            Some(id) => entries.iter().find(|e| e.id == id),
            None => entries.iter().rev().find(|e| e.has_citations()),
        }?;
        Some((target.id, self.toggle(target)))
    }

    fn candidates(entries: &[TranscriptEntry]) -> Vec<EntryId> {
        entries.iter().filter(|e| e.has_citations()).map(|e| e.id).collect()
    }

    fn position_in(&self, candidates: &[EntryId]) -> Option<usize> {
        self.focused.and_then(|id| candidates.iter().position(|c| *c == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdpchat_core::{Citation, NewEntry, Resolution, TranscriptStore};

    fn store_with_answers(count: usize) -> TranscriptStore {
        let mut store = TranscriptStore::seeded("Welcome");
        for i in 0..count {
            store.append(NewEntry::user(format!("q{}", i)));
            let id = store.append(NewEntry::pending_bot());
            let citations = vec![Citation::new(format!("T{}", i), "https://docs.example/x", "Segment")];
            store
                .update_pending(id, Resolution::Resolved { text: format!("a{}", i), citations, query_type: None })
                .unwrap();
        }
        store
    }

    #[test]
    fn test_toggle_twice_restores_visibility() {
        let store = store_with_answers(1);
        let entry = store.last().unwrap().clone();
        let mut toggles = CitationToggles::new();

        assert!(!toggles.is_visible(entry.id));
        assert!(toggles.toggle(&entry));
        assert!(toggles.is_visible(entry.id));
        assert!(!toggles.toggle(&entry));
        assert!(!toggles.is_visible(entry.id));

        assert_eq!(store.last().unwrap(), &entry);
    }

    #[test]
    fn test_toggles_are_independent() {
        let store = store_with_answers(2);
        let answers: Vec<&TranscriptEntry> = store.list().iter().filter(|e| e.has_citations()).collect();
        let mut toggles = CitationToggles::new();

        toggles.toggle(answers[0]);
        assert!(toggles.is_visible(answers[0].id));
        assert!(!toggles.is_visible(answers[1].id));
    }

    #[test]
    fn test_toggle_without_citations_is_noop() {
        let store = TranscriptStore::seeded("Welcome");
        let mut toggles = CitationToggles::new();

        let welcome = &store.list()[0];
        assert!(!toggles.toggle(welcome));
        assert!(!toggles.is_visible(welcome.id));
    }

    #[test]
    fn test_focus_cycles_through_cited_entries() {
        let store = store_with_answers(2);
        let entries = store.list();
        let cited: Vec<EntryId> = entries.iter().filter(|e| e.has_citations()).map(|e| e.id).collect();
        let mut toggles = CitationToggles::new();

        assert_eq!(toggles.focus_next(entries), Some(cited[0]));
        assert_eq!(toggles.focus_next(entries), Some(cited[1]));
        assert_eq!(toggles.focus_next(entries), Some(cited[0]));
        assert_eq!(toggles.focus_prev(entries), Some(cited[1]));

        toggles.clear_focus();
        assert_eq!(toggles.focus_prev(entries), Some(cited[1]));
    }

    #[test]
    fn test_focus_with_no_candidates() {
        let store = TranscriptStore::seeded("Welcome");
        let mut toggles = CitationToggles::new();
        assert_eq!(toggles.focus_next(store.list()), None);
        assert_eq!(toggles.toggle_focused(store.list()), None);
    }

    #[test]
    fn test_toggle_focused_defaults_to_newest() {
        let store = store_with_answers(2);
        let entries = store.list();
        let newest = entries.last().unwrap().id;
        let mut toggles = CitationToggles::new();

        assert_eq!(toggles.toggle_focused(entries), Some((newest, true)));

        let first = toggles.focus_next(entries).unwrap();
        assert_eq!(toggles.toggle_focused(entries), Some((first, true)));
        assert_eq!(toggles.toggle_focused(entries), Some((first, false)));
    }
}
