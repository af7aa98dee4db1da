//! Explicitly owned object cache.
//!
//! One facade per native identity. A miss fetches a snapshot from the
//! provider; a hit returns the shared facade. The only eviction is
//! [`ObjectCache::notify_defunct`], and an evicted identity is tombstoned so
//! later lookups cannot resurrect it.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::{debug, trace};

use super::accessible::{AccessibleRef, NativeId, Snapshot};
use super::error::AccessError;

/// Source of snapshots for native objects: the accessibility-tree collaborator.
pub trait AccessibleProvider {
    /// Current snapshot of the object, or `StaleObject` if it no longer exists.
    fn fetch(&self, id: &NativeId) -> Result<Snapshot, AccessError>;
}

pub(crate) struct CacheInner {
    provider: Box<dyn AccessibleProvider>,
    entries: RefCell<HashMap<NativeId, AccessibleRef>>,
    /// Tombstones for every identity reported defunct. They live as long as
    /// the cache and are never pruned, so a provider that still answers for
    /// an old id cannot bring it back.
    defunct: RefCell<HashSet<NativeId>>,
}

impl CacheInner {
    pub(crate) fn get(this: &Rc<CacheInner>, id: &NativeId) -> Result<AccessibleRef, AccessError> {
        if let Some(found) = this.entries.borrow().get(id) {
            return Ok(found.clone());
        }
        if this.defunct.borrow().contains(id) {
            return Err(AccessError::StaleObject(id.clone()));
        }
        let snapshot = this.provider.fetch(id)?;
        trace!(object = %id, role = %snapshot.role, "facade created");
        let facade = AccessibleRef::new(id.clone(), snapshot, Rc::downgrade(this));
        this.entries
            .borrow_mut()
            .insert(id.clone(), facade.clone());
        Ok(facade)
    }
}

/// Shared handle to the facade cache. Clones share the same table.
#[derive(Clone)]
pub struct ObjectCache(Rc<CacheInner>);

impl ObjectCache {
    pub fn new(provider: Box<dyn AccessibleProvider>) -> Self {
        ObjectCache(Rc::new(CacheInner {
            provider,
            entries: RefCell::new(HashMap::new()),
            defunct: RefCell::new(HashSet::new()),
        }))
    }

    /// The facade for `id`, created on first use.
    pub fn get(&self, id: &NativeId) -> Result<AccessibleRef, AccessError> {
        CacheInner::get(&self.0, id)
    }

    /// The cached facade for `id`, without consulting the provider.
    pub fn lookup(&self, id: &NativeId) -> Option<AccessibleRef> {
        self.0.entries.borrow().get(id).cloned()
    }

    /// Re-read the snapshot of a cached object after a state or property
    /// change event. Uncached objects are left for the next `get`.
    pub fn refresh(&self, id: &NativeId) -> Result<(), AccessError> {
        let facade = match self.lookup(id) {
            Some(facade) => facade,
            None => return Ok(()),
        };
        if facade.is_defunct() {
            return Err(AccessError::StaleObject(id.clone()));
        }
        let snapshot = self.0.provider.fetch(id)?;
        facade.replace_snapshot(snapshot);
        Ok(())
    }

    /// Handle a defunct notification: mark the facade dead, evict it and
    /// tombstone its identity for the life of the cache.
    pub fn notify_defunct(&self, id: &NativeId) {
        if let Some(facade) = self.0.entries.borrow_mut().remove(id) {
            facade.mark_defunct();
        }
        self.0.defunct.borrow_mut().insert(id.clone());
        debug!(object = %id, "object defunct");
    }

    pub fn len(&self) -> usize {
        self.0.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
