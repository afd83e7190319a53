//! Window store — the persistence seam the scheduler reads through, plus a
//! thread-safe in-memory reference implementation.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use quietsend_core::error::{QuietError, QuietResult};
use quietsend_core::time::TimeOfDay;
use quietsend_core::types::Window;
use uuid::Uuid;

use crate::window;

/// Read seam the delivery scheduler depends on. Implementations return the
/// subject's current windows ordered by start time ascending; callers must
/// not rely on that order for correctness, only for display.
pub trait WindowStore: Send + Sync {
    fn list_windows(&self, subject_id: &Uuid) -> Vec<Window>;
}

/// In-memory window store backed by `DashMap`.
///
/// The overlap check and the commit both run under the subject's map entry
/// guard, so check-then-insert is serialized per subject and the
/// non-overlap invariant cannot be raced away.
pub struct InMemoryWindowStore {
    windows: DashMap<Uuid, Vec<Window>>,
}

impl InMemoryWindowStore {
    pub fn new() -> Self {
        Self {
            windows: DashMap::new(),
        }
    }

    /// Validate and insert a window for its subject.
    pub fn insert(&self, window: Window) -> QuietResult<Window> {
        match self.windows.entry(window.subject_id) {
            Entry::Occupied(mut occupied) => {
                window::can_insert(&window, occupied.get(), None)?;
                occupied.get_mut().push(window);
                window::sort_by_start(occupied.get_mut());
            }
            Entry::Vacant(vacant) => {
                window::can_insert(&window, &[], None)?;
                vacant.insert(vec![window]);
            }
        }
        tracing::info!(
            window_id = %window.id,
            subject_id = %window.subject_id,
            start = %window.start,
            end = %window.end,
            "window inserted"
        );
        Ok(window)
    }

    /// Replace a window wholesale. `NotFound` if the id is absent from the
    /// subject's set; the overlap check excludes the window's own id.
    pub fn update(&self, window: Window) -> QuietResult<Window> {
        let mut entry = self
            .windows
            .get_mut(&window.subject_id)
            .ok_or(QuietError::NotFound(window.id))?;
        let windows = entry.value_mut();
        let pos = windows
            .iter()
            .position(|w| w.id == window.id)
            .ok_or(QuietError::NotFound(window.id))?;
        window::can_insert(&window, windows, Some(window.id))?;
        windows[pos] = window;
        window::sort_by_start(windows);
        tracing::info!(
            window_id = %window.id,
            subject_id = %window.subject_id,
            start = %window.start,
            end = %window.end,
            "window updated"
        );
        Ok(window)
    }

    /// Delete a window. Removes the subject's map entry when its set
    /// empties, so no empty collection lingers.
    pub fn delete(&self, subject_id: &Uuid, window_id: &Uuid) -> QuietResult<()> {
        let mut entry = match self.windows.entry(*subject_id) {
            Entry::Occupied(occupied) => occupied,
            Entry::Vacant(_) => return Err(QuietError::NotFound(*window_id)),
        };
        let remaining = {
            let windows = entry.get_mut();
            let before = windows.len();
            windows.retain(|w| &w.id != window_id);
            if windows.len() == before {
                return Err(QuietError::NotFound(*window_id));
            }
            windows.len()
        };
        if remaining == 0 {
            entry.remove();
        }
        tracing::info!(window_id = %window_id, subject_id = %subject_id, "window deleted");
        Ok(())
    }

    /// Textual-boundary convenience: parse `HH:mm` start/end and insert a
    /// new window.
    pub fn insert_hhmm(&self, subject_id: Uuid, start: &str, end: &str) -> QuietResult<Window> {
        let window = Window::new(
            subject_id,
            TimeOfDay::parse(start)?,
            TimeOfDay::parse(end)?,
        );
        self.insert(window)
    }

    /// Total number of windows across all subjects.
    pub fn count(&self) -> usize {
        self.windows.iter().map(|e| e.value().len()).sum()
    }

    /// Seed example quiet windows for demo purposes. Returns the seeded
    /// subject ids.
    pub fn seed_demo_data(&self) -> QuietResult<Vec<Uuid>> {
        let night_owl = Uuid::new_v4();
        let siesta = Uuid::new_v4();

        self.insert_hhmm(night_owl, "22:00", "07:00")?;
        self.insert_hhmm(night_owl, "12:30", "13:00")?;
        self.insert_hhmm(siesta, "13:00", "15:00")?;

        tracing::info!("demo quiet windows seeded (2 subjects)");
        Ok(vec![night_owl, siesta])
    }
}

impl Default for InMemoryWindowStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowStore for InMemoryWindowStore {
    fn list_windows(&self, subject_id: &Uuid) -> Vec<Window> {
        self.windows
            .get(subject_id)
            .map(|w| w.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_list_sorted() {
        let store = InMemoryWindowStore::new();
        let subject = Uuid::new_v4();

        store.insert_hhmm(subject, "20:00", "21:00").unwrap();
        store.insert_hhmm(subject, "08:00", "09:00").unwrap();

        let listed = store.list_windows(&subject);
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].start.to_string(), "08:00");
        assert_eq!(listed[1].start.to_string(), "20:00");

        // Unknown subject has no windows.
        assert!(store.list_windows(&Uuid::new_v4()).is_empty());
    }

    #[test]
    fn test_insert_rejects_overlap() {
        let store = InMemoryWindowStore::new();
        let subject = Uuid::new_v4();

        let overnight = store.insert_hhmm(subject, "22:00", "07:00").unwrap();
        let err = store.insert_hhmm(subject, "06:00", "08:00").unwrap_err();
        match err {
            QuietError::Overlap { conflicting_id } => {
                assert_eq!(conflicting_id, overnight.id);
            }
            other => panic!("expected Overlap, got {other:?}"),
        }

        // Rejection leaves the set untouched.
        assert_eq!(store.list_windows(&subject).len(), 1);
    }

    #[test]
    fn test_insert_rejects_degenerate_window() {
        let store = InMemoryWindowStore::new();
        let subject = Uuid::new_v4();

        assert!(matches!(
            store.insert_hhmm(subject, "09:00", "09:00"),
            Err(QuietError::SameStartEnd)
        ));
        // A failed first insert must not leave an entry behind.
        assert!(store.list_windows(&subject).is_empty());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_update_replaces_wholesale() {
        let store = InMemoryWindowStore::new();
        let subject = Uuid::new_v4();

        let original = store.insert_hhmm(subject, "22:00", "07:00").unwrap();

        let mut shifted = original;
        shifted.start = TimeOfDay::parse("21:00").unwrap();
        store.update(shifted).unwrap();

        let listed = store.list_windows(&subject);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].start.to_string(), "21:00");
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let store = InMemoryWindowStore::new();
        let subject = Uuid::new_v4();
        store.insert_hhmm(subject, "22:00", "07:00").unwrap();

        let stray = Window::new(
            subject,
            TimeOfDay::parse("09:00").unwrap(),
            TimeOfDay::parse("10:00").unwrap(),
        );
        assert!(matches!(
            store.update(stray),
            Err(QuietError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_removes_empty_entry() {
        let store = InMemoryWindowStore::new();
        let subject = Uuid::new_v4();

        let window = store.insert_hhmm(subject, "22:00", "07:00").unwrap();
        store.delete(&subject, &window.id).unwrap();

        assert!(store.list_windows(&subject).is_empty());
        assert_eq!(store.count(), 0);

        assert!(matches!(
            store.delete(&subject, &window.id),
            Err(QuietError::NotFound(_))
        ));
    }

    #[test]
    fn test_subjects_are_independent() {
        let store = InMemoryWindowStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        store.insert_hhmm(a, "22:00", "07:00").unwrap();
        // The same hours do not conflict across subjects.
        store.insert_hhmm(b, "22:00", "07:00").unwrap();

        assert_eq!(store.list_windows(&a).len(), 1);
        assert_eq!(store.list_windows(&b).len(), 1);
    }

    #[test]
    fn test_seed_demo_data() {
        let store = InMemoryWindowStore::new();
        let subjects = store.seed_demo_data().unwrap();
        assert_eq!(subjects.len(), 2);
        assert_eq!(store.count(), 3);
    }
}
