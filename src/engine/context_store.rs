// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thread-local diagnostic-context storage.

use super::ContextStore;
use crate::spinlock::Spinlock;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

static STORE_ID: AtomicU64 = AtomicU64::new(0);
// ids of stores that have not been dropped
static LIVE: Spinlock<BTreeSet<u64>> = Spinlock::new(BTreeSet::new());
// bumped on every drop; threads compare it to decide when to prune
static RETIRED: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static MAPS: RefCell<Maps> = RefCell::new(Maps::default());
}

/// One thread's maps, keyed by store id so two engines in one process keep
/// separate maps. Only non-empty maps have an entry.
#[derive(Default)]
struct Maps {
    by_store: HashMap<u64, BTreeMap<String, String>>,
    retired_seen: u64,
}

impl Maps {
    /// The map for `id`, created if missing. Entries of stores dropped on other
    /// threads are released here first.
    fn entry(&mut self, id: u64) -> &mut BTreeMap<String, String> {
        let retired = RETIRED.load(Ordering::Acquire);
        if retired != self.retired_seen {
            self.retired_seen = retired;
            let by_store = &mut self.by_store;
            LIVE.with(|live| by_store.retain(|store, _| live.contains(store)));
        }
        self.by_store.entry(id).or_default()
    }

    fn remove(&mut self, id: u64, key: &str) -> Option<String> {
        let map = self.by_store.get_mut(&id)?;
        let old = map.remove(key);
        if map.is_empty() {
            self.by_store.remove(&id);
        }
        old
    }
}

/// A [`ContextStore`] whose map is private to each thread.
///
/// Entries written on one thread are invisible on every other thread, and vanish
/// when the thread exits. Dropping the store clears the dropping thread's entries;
/// other threads release theirs on their next write, or when they exit.
#[derive(Debug)]
pub struct ThreadLocalContextStore {
    id: u64,
}

impl Default for ThreadLocalContextStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadLocalContextStore {
    pub fn new() -> Self {
        let id = STORE_ID.fetch_add(1, Ordering::Relaxed);
        LIVE.with_mut(|live| live.insert(id));
        Self { id }
    }

    // During thread teardown the thread-local may already be gone; reads see an
    // empty map and writes are dropped.
    fn with_maps<R>(&self, default: R, f: impl FnOnce(&mut Maps) -> R) -> R {
        MAPS.try_with(|maps| f(&mut maps.borrow_mut())).unwrap_or(default)
    }
}

impl ContextStore for ThreadLocalContextStore {
    fn put(&self, key: &str, value: String) -> Option<String> {
        self.with_maps(None, |maps| maps.entry(self.id).insert(key.to_string(), value))
    }

    fn get(&self, key: &str) -> Option<String> {
        self.with_maps(None, |maps| maps.by_store.get(&self.id)?.get(key).cloned())
    }

    fn remove(&self, key: &str) -> Option<String> {
        self.with_maps(None, |maps| maps.remove(self.id, key))
    }

    fn clear(&self) {
        self.with_maps((), |maps| {
            maps.by_store.remove(&self.id);
        });
    }

    fn snapshot(&self) -> BTreeMap<String, String> {
        self.with_maps(BTreeMap::new(), |maps| {
            maps.by_store.get(&self.id).cloned().unwrap_or_default()
        })
    }

    fn replace(&self, map: BTreeMap<String, String>) {
        self.with_maps((), |maps| {
            if map.is_empty() {
                maps.by_store.remove(&self.id);
            } else {
                *maps.entry(self.id) = map;
            }
        });
    }
}

impl Drop for ThreadLocalContextStore {
    fn drop(&mut self) {
        LIVE.with_mut(|live| live.remove(&self.id));
        RETIRED.fetch_add(1, Ordering::Release);
        let _ = MAPS.try_with(|maps| maps.borrow_mut().by_store.remove(&self.id));
    }
}
