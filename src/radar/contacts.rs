use chrono::{DateTime, Utc};
use metrics::gauge;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::trace;

use crate::callsign::callsign_key;
use crate::trackfile::Trackfile;

/// Thread-safe trackfile table with two derived indices: parsed callsign to
/// unit id, and unit id to wall-clock last-update time.
///
/// All three structures live behind one lock and move together: readers
/// never observe a callsign or timestamp entry pointing at a unit the
/// primary table doesn't hold. Every operation is O(1) under the lock, so a
/// telemetry writer only ever stalls readers for a map update.
#[derive(Clone, Default)]
pub(crate) struct ContactStore {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Default)]
struct StoreInner {
    contacts: HashMap<u32, Trackfile>,
    callsign_index: HashMap<String, u32>,
    last_updated: HashMap<u32, DateTime<Utc>>,
}

impl ContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a trackfile by spoken callsign. The query is canonicalized
    /// the same way `set` indexes names, so "ENFIELD11", "Enfield 1-1" and
    /// "enfield 1 1" all reach the same unit.
    pub fn get_by_callsign(&self, callsign: &str) -> Option<Trackfile> {
        let key = callsign_key(callsign);
        let inner = self.read();
        let unit_id = inner.callsign_index.get(&key)?;
        // A dangling index entry means the picture is mid-update; report
        // not-found rather than a missing unit
        inner.contacts.get(unit_id).cloned()
    }

    pub fn get_by_unit_id(&self, unit_id: u32) -> Option<Trackfile> {
        self.read().contacts.get(&unit_id).cloned()
    }

    /// Wall-clock time of the unit's last `set`.
    pub fn last_updated(&self, unit_id: u32) -> Option<DateTime<Utc>> {
        self.read().last_updated.get(&unit_id).copied()
    }

    /// Insert or replace the trackfile for a unit, rewriting the callsign
    /// index and stamping the last-updated time in the same critical
    /// section.
    pub fn set(&self, unit_id: u32, trackfile: Trackfile) {
        let key = callsign_key(&trackfile.contact.name);
        let mut inner = self.write();

        // If the unit was indexed under a different callsign, drop the old
        // entry instead of leaving it dangling
        let previous_key = inner
            .contacts
            .get(&unit_id)
            .map(|previous| callsign_key(&previous.contact.name));
        if let Some(previous_key) = previous_key
            && previous_key != key
            && inner.callsign_index.get(&previous_key) == Some(&unit_id)
        {
            inner.callsign_index.remove(&previous_key);
        }

        inner.callsign_index.insert(key, unit_id);
        inner.contacts.insert(unit_id, trackfile);
        inner.last_updated.insert(unit_id, Utc::now());
        gauge!("scope.contacts").set(inner.contacts.len() as f64);
    }

    /// Remove a unit from all three structures. Returns whether it was
    /// present.
    pub fn delete(&self, unit_id: u32) -> bool {
        let mut inner = self.write();
        let Some(trackfile) = inner.contacts.remove(&unit_id) else {
            inner.last_updated.remove(&unit_id);
            return false;
        };

        // The index key is derived exactly as `set` derived it. Only remove
        // the entry if it still points at this unit; a respawn may have
        // reassigned the callsign already.
        let key = callsign_key(&trackfile.contact.name);
        if inner.callsign_index.get(&key) == Some(&unit_id) {
            inner.callsign_index.remove(&key);
        }
        inner.last_updated.remove(&unit_id);
        gauge!("scope.contacts").set(inner.contacts.len() as f64);
        trace!(unit_id, callsign = %key, "removed trackfile");
        true
    }

    /// Snapshot traversal over the units present right now. Units added
    /// after this call are not visited; units deleted after this call
    /// resolve to `None` at `value` time.
    pub fn iterate(&self) -> ContactIterator {
        let keys: Vec<u32> = self.read().contacts.keys().copied().collect();
        ContactIterator {
            store: self.clone(),
            keys,
            cursor: None,
        }
    }

    pub fn len(&self) -> usize {
        self.read().contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().contacts.is_empty()
    }
}

/// Cursor over a point-in-time key snapshot. `value` re-resolves against
/// the live store, so a long traversal never blocks ingestion.
pub(crate) struct ContactIterator {
    store: ContactStore,
    keys: Vec<u32>,
    cursor: Option<usize>,
}

impl ContactIterator {
    /// Advance to the next snapshot entry. Returns false once the snapshot
    /// is exhausted.
    pub fn next(&mut self) -> bool {
        let next = self.cursor.map_or(0, |cursor| cursor + 1);
        self.cursor = Some(next);
        next < self.keys.len()
    }

    /// The trackfile at the cursor, fetched from the live store. `None` if
    /// the unit was deleted after the snapshot was taken.
    pub fn value(&self) -> Option<Trackfile> {
        let cursor = self.cursor?;
        let unit_id = self.keys.get(cursor)?;
        self.store.get_by_unit_id(*unit_id)
    }

    /// Rewind to before the first entry.
    pub fn reset(&mut self) {
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coalition::Coalition;
    use crate::geometry::Point;
    use crate::trackfile::{Contact, Frame};

    fn trackfile(unit_id: u32, name: &str) -> Trackfile {
        Trackfile::new(
            Contact {
                unit_id,
                name: name.to_string(),
                coalition: Coalition::Blue,
                platform: "F-15C".to_string(),
            },
            Frame {
                time: Utc::now(),
                point: Point::new(42.0, 41.0),
                altitude_feet: 25000.0,
                heading_degrees: 90.0,
                ground_speed_knots: 400.0,
                mach: None,
            },
            10,
        )
    }

    #[test]
    fn test_set_then_get_by_both_keys() {
        let store = ContactStore::new();
        store.set(100, trackfile(100, "ENFIELD11"));

        assert_eq!(store.get_by_unit_id(100).unwrap().contact.unit_id, 100);
        // Canonical, compact, and formatted spellings all resolve
        assert!(store.get_by_callsign("enfield 1 1").is_some());
        assert!(store.get_by_callsign("ENFIELD11").is_some());
        assert!(store.get_by_callsign("Enfield 1-1").is_some());
        assert!(store.get_by_callsign("enfield 1 2").is_none());
        assert!(store.last_updated(100).is_some());
    }

    #[test]
    fn test_unparsable_name_is_indexed_raw() {
        let store = ContactStore::new();
        store.set(7, trackfile(7, "RAGE"));
        assert!(store.get_by_callsign("RAGE").is_some());
    }

    #[test]
    fn test_set_reflects_only_latest_state() {
        let store = ContactStore::new();
        store.set(100, trackfile(100, "ENFIELD11"));
        let mut updated = trackfile(100, "ENFIELD11");
        let climb = Frame {
            altitude_feet: 30000.0,
            ..*updated.last_known()
        };
        updated.update(climb);
        store.set(100, updated);

        let fetched = store.get_by_unit_id(100).unwrap();
        assert_eq!(fetched.last_known().altitude_feet, 30000.0);
    }

    #[test]
    fn test_rename_rewrites_callsign_index() {
        let store = ContactStore::new();
        store.set(100, trackfile(100, "ENFIELD11"));
        store.set(100, trackfile(100, "SPRINGFIELD11"));

        assert!(store.get_by_callsign("ENFIELD11").is_none());
        assert!(store.get_by_callsign("SPRINGFIELD11").is_some());
    }

    #[test]
    fn test_delete_is_idempotent_in_effect() {
        let store = ContactStore::new();
        store.set(100, trackfile(100, "ENFIELD11"));

        assert!(store.delete(100));
        assert!(!store.delete(100));
        assert!(store.get_by_unit_id(100).is_none());
        assert!(store.get_by_callsign("ENFIELD11").is_none());
        assert!(store.last_updated(100).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_leaves_reassigned_callsign_alone() {
        let store = ContactStore::new();
        store.set(100, trackfile(100, "ENFIELD11"));
        // Respawn takes over the callsign under a fresh unit id
        store.set(200, trackfile(200, "ENFIELD11"));

        assert!(store.delete(100));
        let survivor = store.get_by_callsign("ENFIELD11").unwrap();
        assert_eq!(survivor.contact.unit_id, 200);
    }

    #[test]
    fn test_no_cross_unit_contamination() {
        let store = ContactStore::new();
        store.set(100, trackfile(100, "ENFIELD11"));
        store.set(101, trackfile(101, "ENFIELD12"));
        store.delete(100);

        assert!(store.get_by_unit_id(101).is_some());
        assert!(store.get_by_callsign("ENFIELD12").is_some());
    }

    #[test]
    fn test_iterator_skips_entries_deleted_after_snapshot() {
        let store = ContactStore::new();
        store.set(1, trackfile(1, "ENFIELD11"));
        store.set(2, trackfile(2, "ENFIELD12"));
        store.set(3, trackfile(3, "ENFIELD13"));

        let mut iterator = store.iterate();
        store.delete(2);

        let mut seen = Vec::new();
        while iterator.next() {
            if let Some(found) = iterator.value() {
                seen.push(found.contact.unit_id);
            }
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 3]);
    }

    #[test]
    fn test_iterator_never_visits_entries_added_after_snapshot() {
        let store = ContactStore::new();
        store.set(1, trackfile(1, "ENFIELD11"));

        let mut iterator = store.iterate();
        store.set(2, trackfile(2, "ENFIELD12"));

        let mut count = 0;
        while iterator.next() {
            if iterator.value().is_some() {
                count += 1;
            }
        }
        assert_eq!(count, 1);
    }

    #[test]
    fn test_iterator_reset_rewinds() {
        let store = ContactStore::new();
        store.set(1, trackfile(1, "ENFIELD11"));

        let mut iterator = store.iterate();
        assert!(iterator.next());
        assert!(!iterator.next());

        iterator.reset();
        assert!(iterator.value().is_none());
        assert!(iterator.next());
        assert!(iterator.value().is_some());
    }
}
