use std::collections::BTreeMap;

use gix_object::Kind;

use super::traits::ObjectStore;
use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::object::RawObject;

/// In-memory object store.
///
/// Grows monotonically: there is no eviction or garbage collection.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    objects: BTreeMap<Hash, RawObject>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObjectStore for MemoryStore {
    fn get(&self, hash: &Hash) -> Result<&RawObject> {
        self.objects.get(hash).ok_or(Error::NotFound(*hash))
    }

    fn insert(&mut self, object: RawObject) -> bool {
        if self.objects.contains_key(&object.hash()) {
            return false;
        }
        self.objects.insert(object.hash(), object);
        true
    }

    fn contains(&self, hash: &Hash) -> bool {
        self.objects.contains_key(hash)
    }

    fn hashes(&self, kind: Kind) -> Vec<Hash> {
        self.objects
            .values()
            .filter(|obj| obj.kind() == kind)
            .map(|obj| obj.hash())
            .collect()
    }

    fn len(&self) -> usize {
        self.objects.len()
    }
}
