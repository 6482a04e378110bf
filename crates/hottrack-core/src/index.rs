//! The ordered, concurrency-safe map backing the inode index and every
//! per-inode range index.
//!
//! `find_or_try_insert` is the two-phase pattern the engine relies on
//! throughout: allocate the candidate node *outside* any lock, then take
//! the write lock only to re-probe and either install the candidate or
//! discard it in favor of a node another thread installed first. This
//! keeps the critical section free of allocation and keeps a lost race
//! cheap (one discarded `Arc`, never a double-insert).

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::mem;
use std::sync::{Arc, RwLock};

use crate::domain::SizeAccount;
use crate::error::HotTrackError;

pub struct OrderedIndex<K, T> {
    map: RwLock<BTreeMap<K, Arc<T>>>,
    size_account: Arc<SizeAccount>,
}

impl<K, T> OrderedIndex<K, T>
where
    K: Ord + Clone,
{
    pub fn new(size_account: Arc<SizeAccount>) -> Self {
        Self {
            map: RwLock::new(BTreeMap::new()),
            size_account,
        }
    }

    /// Fast-path lookup under a read lock. Never allocates.
    pub fn lookup(&self, key: &K) -> Option<Arc<T>> {
        self.map.read().unwrap().get(key).cloned()
    }

    /// Look up `key`, inserting a freshly constructed node if absent.
    ///
    /// `make` runs with no lock held. If another thread wins the race to
    /// insert first, the candidate this call constructed is discarded and
    /// the winner's node is returned instead. The `bool` is `true` only
    /// when this call's candidate is the one that got linked.
    pub fn find_or_try_insert<F>(&self, key: K, make: F) -> Result<(Arc<T>, bool), HotTrackError>
    where
        F: FnOnce() -> Result<T, HotTrackError>,
    {
        if let Some(existing) = self.lookup(&key) {
            return Ok((existing, false));
        }
        let candidate = Arc::new(make()?);
        let mut guard = self.map.write().unwrap();
        match guard.entry(key) {
            Entry::Occupied(occupied) => Ok((occupied.get().clone(), false)),
            Entry::Vacant(vacant) => {
                self.size_account.record_alloc(mem::size_of::<T>());
                vacant.insert(candidate.clone());
                Ok((candidate, true))
            }
        }
    }

    /// Remove `key` unconditionally, returning the node that was linked, if
    /// any. The caller's copy is the last thing keeping the node alive once
    /// every other borrower has dropped its `Arc`.
    pub fn remove(&self, key: &K) -> Option<Arc<T>> {
        self.map.write().unwrap().remove(key)
    }

    /// A point-in-time, key-ordered snapshot for traversal without holding
    /// the map lock across per-item work (the aging worker's requirement).
    pub fn iter_snapshot(&self) -> Vec<(K, Arc<T>)> {
        self.map
            .read()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.map.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.map.write().unwrap().clear();
    }
}
