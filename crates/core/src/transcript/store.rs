use super::entry::{EntryId, EntryStatus, NewEntry, Resolution, Role, TranscriptEntry};
use crate::error::{TranscriptError, TransitionFault};

use chrono::Utc;
use tokio::sync::watch;

/// What happened to the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Nothing yet; initial value seen by observers
    Created,
    Appended,
    Updated,
}

/// Notification published to observers on every mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscriptChange {
    /// Incremented on every mutation
    pub revision: u64,
    pub id: Option<EntryId>,
    pub kind: ChangeKind,
}

/// Ordered log of conversation entries.
///
/// Only the dispatcher and the seed step write to it; renderers get `&[TranscriptEntry]`.
#[derive(Debug)]
pub struct TranscriptStore {
    entries: Vec<TranscriptEntry>,
    next_id: u64,
    revision: u64,
    changes: watch::Sender<TranscriptChange>,
}

impl TranscriptStore {
    /// Create an empty store
    pub fn new() -> Self {
        let (changes, _) = watch::channel(TranscriptChange { revision: 0, id: None, kind: ChangeKind::Created });
        Self { entries: Vec::new(), next_id: 1, revision: 0, changes }
    }

    /// Create a store seeded with the welcome greeting
    pub fn seeded(welcome: impl Into<String>) -> Self {
        let mut store = Self::new();
        store.append(NewEntry::bot(welcome));
        store
    }

    /// Append an entry and return its id
    pub fn append(&mut self, entry: NewEntry) -> EntryId {
        debug_assert!(
            entry.status != Some(EntryStatus::Pending) || self.pending_id().is_none(),
            "a second pending entry would be appended"
        );

        let id = EntryId::new(self.next_id);
        self.next_id += 1;

        let NewEntry { role, text, citations, status, query_type } = entry;
        self.entries.push(TranscriptEntry { id, role, text, citations, status, query_type, created_at: Utc::now() });

        tracing::trace!(entry = %id, role = role.as_str(), "transcript append");
        self.publish(id, ChangeKind::Appended);
        id
    }

    /// Transition a pending entry to resolved or failed, in place
    pub fn update_pending(&mut self, id: EntryId, resolution: Resolution) -> Result<(), TranscriptError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| TranscriptError::invalid(id, TransitionFault::UnknownEntry))?;

        match entry.status {
            None => return Err(TranscriptError::invalid(id, TransitionFault::UserEntry)),
            Some(EntryStatus::Pending) => {}
            Some(status) => return Err(TranscriptError::invalid(id, TransitionFault::NotPending(status))),
        }

        entry.status = Some(resolution.status());
        match resolution {
            Resolution::Resolved { text, citations, query_type } => {
                entry.text = text;
                entry.citations = citations;
                entry.query_type = query_type;
            }
            Resolution::Failed { text } => {
                entry.text = text;
                entry.citations.clear();
                entry.query_type = None;
            }
        }

        tracing::trace!(entry = %id, status = ?entry.status, "transcript update");
        self.publish(id, ChangeKind::Updated);
        Ok(())
    }

    /// Ordered view of all entries
    pub fn list(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&TranscriptEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    /// Id of the pending bot entry, if a request is outstanding
    pub fn pending_id(&self) -> Option<EntryId> {
        self.entries.iter().rev().find(|e| e.is_pending()).map(|e| e.id)
    }

    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_pending()).count()
    }

    /// Non-blank user messages in submission order
    pub fn user_messages(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.role == Role::User && !e.text.trim().is_empty())
            .map(|e| e.text.clone())
            .collect()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Observe mutations
    pub fn subscribe(&self) -> watch::Receiver<TranscriptChange> {
        self.changes.subscribe()
    }

    fn publish(&mut self, id: EntryId, kind: ChangeKind) {
        self.revision += 1;
        self.changes.send_replace(TranscriptChange { revision: self.revision, id: Some(id), kind });
    }
}

impl Default for TranscriptStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Citation;

    fn resolved(text: &str) -> Resolution {
        Resolution::Resolved {
            text: text.to_string(),
            citations: vec![Citation::new("T", "U", "Segment")],
            query_type: Some("how-to".to_string()),
        }
    }

    #[test]
    fn test_store_new_is_empty() {
        let store = TranscriptStore::new();
        assert!(store.is_empty());
        assert_eq!(store.revision(), 0);
        assert!(store.pending_id().is_none());
    }

    #[test]
    fn test_seeded_store_has_welcome_entry() {
        let store = TranscriptStore::seeded("Hello");
        assert_eq!(store.len(), 1);

        let welcome = &store.list()[0];
        assert_eq!(welcome.id, EntryId::new(1));
        assert_eq!(welcome.role, Role::Bot);
        assert_eq!(welcome.status, Some(EntryStatus::Resolved));
        assert!(welcome.citations.is_empty());
        assert!(!welcome.has_citations());
    }

    #[test]
    fn test_append_assigns_increasing_ids() {
        let mut store = TranscriptStore::seeded("Hello");
        let user = store.append(NewEntry::user("How do I set up Segment?"));
        let bot = store.append(NewEntry::pending_bot());

        assert!(store.list()[0].id < user);
        assert!(user < bot);
        assert_eq!(store.len(), 3);
        assert_eq!(store.pending_id(), Some(bot));
        assert_eq!(store.pending_count(), 1);
    }

    #[test]
    fn test_update_pending_resolves_in_place() {
        let mut store = TranscriptStore::seeded("Hello");
        store.append(NewEntry::user("q"));
        let bot = store.append(NewEntry::pending_bot());

        store.update_pending(bot, resolved("X")).unwrap();

        let entry = store.get(bot).unwrap();
        assert_eq!(entry.status, Some(EntryStatus::Resolved));
        assert_eq!(entry.text, "X");
        assert_eq!(entry.citations, vec![Citation::new("T", "U", "Segment")]);
        assert_eq!(entry.query_type.as_deref(), Some("how-to"));
        assert_eq!(store.list()[2].id, bot);
        assert_eq!(store.pending_count(), 0);
    }

    #[test]
    fn test_update_pending_failed_clears_citations() {
        let mut store = TranscriptStore::new();
        let bot = store.append(NewEntry::pending_bot());

        store.update_pending(bot, Resolution::Failed { text: "Sorry".to_string() }).unwrap();

        let entry = store.get(bot).unwrap();
        assert!(entry.is_failed());
        assert_eq!(entry.text, "Sorry");
        assert!(entry.citations.is_empty());
        assert!(!entry.has_citations());
    }

    #[test]
    fn test_update_pending_unknown_id() {
        let mut store = TranscriptStore::seeded("Hello");
        let err = store.update_pending(EntryId::new(99), resolved("X")).unwrap_err();
        assert_eq!(err.fault(), TransitionFault::UnknownEntry);
    }

    #[test]
    fn test_update_pending_rejects_user_entry() {
        let mut store = TranscriptStore::new();
        let user = store.append(NewEntry::user("q"));
        let err = store.update_pending(user, resolved("X")).unwrap_err();
        assert_eq!(err.fault(), TransitionFault::UserEntry);
    }

    #[test]
    fn test_update_pending_is_terminal() {
        let mut store = TranscriptStore::new();
        let bot = store.append(NewEntry::pending_bot());
        store.update_pending(bot, resolved("X")).unwrap();

        let err = store.update_pending(bot, Resolution::Failed { text: "late".to_string() }).unwrap_err();
        assert_eq!(err.fault(), TransitionFault::NotPending(EntryStatus::Resolved));
        assert_eq!(store.get(bot).unwrap().text, "X");
    }

    #[test]
    fn test_rejected_update_does_not_notify() {
        let mut store = TranscriptStore::seeded("Hello");
        let revision = store.revision();
        let _ = store.update_pending(EntryId::new(1), resolved("X"));
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_observers_see_every_mutation() {
        let mut store = TranscriptStore::new();
        let mut rx = store.subscribe();
        assert_eq!(rx.borrow_and_update().kind, ChangeKind::Created);

        let bot = store.append(NewEntry::pending_bot());
        assert!(rx.has_changed().unwrap());
        let change = *rx.borrow_and_update();
        assert_eq!(change, TranscriptChange { revision: 1, id: Some(bot), kind: ChangeKind::Appended });

        store.update_pending(bot, resolved("X")).unwrap();
        let change = *rx.borrow_and_update();
        assert_eq!(change.kind, ChangeKind::Updated);
        assert_eq!(change.revision, 2);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_user_messages_skip_blank() {
        let mut store = TranscriptStore::seeded("Hello");
        store.append(NewEntry::user("first"));
        store.append(NewEntry::user("   "));
        store.append(NewEntry::user("second"));

        assert_eq!(store.user_messages(), vec!["first".to_string(), "second".to_string()]);
    }
}
