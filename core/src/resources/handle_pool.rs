use slab::Slab;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A handle to a resource in the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceHandle {
    pub id: usize,
    pub generation: u32,
}

/// Pool of shared resources addressed by generation-checked handles.
///
/// Slots are reused after release, but every allocation gets a fresh
/// generation, so a handle that outlived its resource never resolves to the
/// slot's next occupant.
pub struct HandlePool<T> {
    store: RwLock<Slab<Entry<T>>>,
    next_generation: AtomicU32,
}

struct Entry<T> {
    data: Arc<T>,
    generation: u32,
}

impl<T> Default for HandlePool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HandlePool<T> {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Slab::new()),
            next_generation: AtomicU32::new(1),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Slab<Entry<T>>> {
        self.store.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Slab<Entry<T>>> {
        self.store.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store a resource and return a handle to it.
    pub fn allocate(&self, data: T) -> ResourceHandle {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let mut store = self.write();
        let id = store.insert(Entry {
            data: Arc::new(data),
            generation,
        });
        ResourceHandle { id, generation }
    }

    /// Get the resource if the handle is still live
    pub fn get(&self, handle: ResourceHandle) -> Option<Arc<T>> {
        let store = self.read();
        store
            .get(handle.id)
            .filter(|entry| entry.generation == handle.generation)
            .map(|entry| entry.data.clone())
    }

    /// Release a resource. Returns `false` for stale or unknown handles.
    pub fn release(&self, handle: ResourceHandle) -> bool {
        let mut store = self.write();
        let live = store
            .get(handle.id)
            .is_some_and(|entry| entry.generation == handle.generation);
        if live {
            store.remove(handle.id);
        }
        live
    }

    pub fn contains(&self, handle: ResourceHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Number of live resources.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
