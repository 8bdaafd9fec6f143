use crate::models::Note;
use std::collections::HashSet;

/// Key-addressed cache of the signed-in account's notes.
///
/// Ids are unique; arrival order is preserved so views can keep fetch
/// order stable. Ordering itself is a view concern (see `view`). The
/// container is a plain value held inside one signal, so tests construct
/// isolated instances and the UI swaps it atomically.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct NoteStore {
    notes: Vec<Note>,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole cache with a fresh fetch result. All-or-nothing:
    /// callers only invoke this on a successful fetch, so a failure leaves
    /// the previous contents intact. Later duplicates of an id are dropped.
    pub fn replace_all(&mut self, notes: Vec<Note>) {
        let mut seen = HashSet::with_capacity(notes.len());
        self.notes = notes
            .into_iter()
            .filter(|n| seen.insert(n.id.clone()))
            .collect();
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }

    /// Local insert/replace bridge until the next authoritative reload.
    pub fn upsert(&mut self, note: Note) {
        match self.notes.iter_mut().find(|n| n.id == note.id) {
            Some(slot) => *slot = note,
            None => self.notes.push(note),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Note> {
        let idx = self.notes.iter().position(|n| n.id == id)?;
        Some(self.notes.remove(idx))
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Write `pinned` in place, returning the previous value so callers
    /// can capture the pre-image of an optimistic write. `None` when the
    /// id is not cached.
    pub fn set_pinned(&mut self, id: &str, pinned: bool) -> Option<bool> {
        let note = self.notes.iter_mut().find(|n| n.id == id)?;
        let previous = note.pinned;
        note.pinned = pinned;
        Some(previous)
    }

    /// Cached notes in fetch order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str, pinned: bool) -> Note {
        Note {
            id: id.to_string(),
            title: format!("note {id}"),
            content: String::new(),
            category: None,
            created_at: String::new(),
            pinned,
            summary: None,
        }
    }

    #[test]
    fn test_replace_all_keeps_fetch_order() {
        let mut store = NoteStore::new();
        store.replace_all(vec![note("b", false), note("a", false), note("c", true)]);
        let ids: Vec<&str> = store.notes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn test_replace_all_dedups_by_id_first_wins() {
        let mut store = NoteStore::new();
        let mut dup = note("a", true);
        dup.title = "later duplicate".to_string();
        store.replace_all(vec![note("a", false), dup, note("b", false)]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a").expect("kept").title, "note a");
    }

    #[test]
    fn test_replace_all_is_atomic_swap() {
        let mut store = NoteStore::new();
        store.replace_all(vec![note("old", false)]);
        store.replace_all(vec![note("n1", false), note("n2", false)]);
        assert!(!store.contains("old"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_remove_returns_the_note() {
        let mut store = NoteStore::new();
        store.replace_all(vec![note("1", false), note("2", true)]);
        let removed = store.remove("2").expect("present");
        assert_eq!(removed.id, "2");
        assert!(!store.contains("2"));
        assert!(store.remove("2").is_none());
    }

    #[test]
    fn test_upsert_replaces_in_place_or_appends() {
        let mut store = NoteStore::new();
        store.replace_all(vec![note("1", false), note("2", false)]);

        let mut edited = note("1", false);
        edited.title = "edited".to_string();
        store.upsert(edited);
        store.upsert(note("3", false));

        let ids: Vec<&str> = store.notes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
        assert_eq!(store.get("1").expect("present").title, "edited");
    }

    #[test]
    fn test_set_pinned_returns_previous_value() {
        let mut store = NoteStore::new();
        store.replace_all(vec![note("1", false)]);

        assert_eq!(store.set_pinned("1", true), Some(false));
        assert!(store.get("1").expect("present").pinned);

        assert_eq!(store.set_pinned("1", true), Some(true));
        assert_eq!(store.set_pinned("missing", true), None);
    }

    #[test]
    fn test_clear_empties_the_cache() {
        let mut store = NoteStore::new();
        store.replace_all(vec![note("1", false)]);
        store.clear();
        assert!(store.is_empty());
    }
}
