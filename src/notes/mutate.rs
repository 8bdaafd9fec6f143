use super::store::NoteStore;

/// An in-flight pin toggle: the optimistic cache write plus the captured
/// pre-image needed to undo it. Exactly one of `confirm`/`roll_back`
/// consumes the value once the server answers, so an optimistic write can
/// never be settled twice.
#[derive(Debug)]
pub(crate) struct PinMutation {
    id: String,
    previous: bool,
}

impl PinMutation {
    /// Capture the note's current `pinned` value and apply the optimistic
    /// write, so the view reflects the change before the request is even
    /// sent. `None` when the id is not in the cache.
    pub fn begin(store: &mut NoteStore, id: &str, pinned: bool) -> Option<Self> {
        let previous = store.set_pinned(id, pinned)?;
        Some(Self {
            id: id.to_string(),
            previous,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Server accepted the write. Nothing to patch locally; the optimistic
    /// value stands until the authoritative reload replaces the record.
    pub fn confirm(self) {}

    /// Server rejected the write: restore the captured `pinned` value and
    /// nothing else. A no-op if the note left the cache in the meantime.
    pub fn roll_back(self, store: &mut NoteStore) {
        store.set_pinned(&self.id, self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Note;

    fn store_with(pinned: bool) -> NoteStore {
        let mut store = NoteStore::new();
        store.replace_all(vec![Note {
            id: "1".to_string(),
            title: "Trip".to_string(),
            content: "beach".to_string(),
            category: None,
            created_at: String::new(),
            pinned,
            summary: None,
        }]);
        store
    }

    #[test]
    fn test_begin_applies_optimistic_write() {
        let mut store = store_with(false);
        let m = PinMutation::begin(&mut store, "1", true).expect("note is cached");
        assert_eq!(m.id(), "1");
        // Visible immediately, before any network round-trip.
        assert!(store.get("1").expect("present").pinned);
    }

    #[test]
    fn test_begin_unknown_id_is_none() {
        let mut store = store_with(false);
        assert!(PinMutation::begin(&mut store, "missing", true).is_none());
        assert!(!store.get("1").expect("present").pinned);
    }

    #[test]
    fn test_roll_back_restores_pre_image() {
        let mut store = store_with(false);
        let m = PinMutation::begin(&mut store, "1", true).expect("note is cached");
        m.roll_back(&mut store);
        assert!(!store.get("1").expect("present").pinned);
    }

    #[test]
    fn test_roll_back_restores_pinned_pre_image_too() {
        let mut store = store_with(true);
        let m = PinMutation::begin(&mut store, "1", false).expect("note is cached");
        assert!(!store.get("1").expect("present").pinned);
        m.roll_back(&mut store);
        assert!(store.get("1").expect("present").pinned);
    }

    #[test]
    fn test_confirm_keeps_optimistic_value() {
        let mut store = store_with(false);
        let m = PinMutation::begin(&mut store, "1", true).expect("note is cached");
        m.confirm();
        assert!(store.get("1").expect("present").pinned);
    }

    #[test]
    fn test_confirmed_pin_survives_reload() {
        let mut store = store_with(false);
        let m = PinMutation::begin(&mut store, "1", true).expect("note is cached");
        m.confirm();

        // The authoritative reload returns the server's updated record.
        let mut reloaded = store.get("1").cloned().expect("present");
        reloaded.pinned = true;
        store.replace_all(vec![reloaded]);
        assert!(store.get("1").expect("present").pinned);
    }

    #[test]
    fn test_roll_back_after_delete_is_a_noop() {
        let mut store = store_with(false);
        let m = PinMutation::begin(&mut store, "1", true).expect("note is cached");
        store.remove("1");
        m.roll_back(&mut store);
        assert!(store.is_empty());
    }

    #[test]
    fn test_overlapping_toggles_last_write_wins_locally() {
        let mut store = store_with(false);
        let first = PinMutation::begin(&mut store, "1", true).expect("note is cached");
        let second = PinMutation::begin(&mut store, "1", false).expect("note is cached");

        // Last optimistic write is what the view shows.
        assert!(!store.get("1").expect("present").pinned);

        // The second request fails: its pre-image (true) comes back. The
        // eventual reload is the authority that reconciles the race.
        second.roll_back(&mut store);
        assert!(store.get("1").expect("present").pinned);
        first.confirm();
    }
}
