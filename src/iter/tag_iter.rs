use std::collections::HashSet;

use crate::error::Result;
use crate::hash::Hash;
use crate::object::{lookup, Tag};
use crate::storage::ObjectStore;

/// Annotated tags from a snapshot of hashes, decoded one at a time.
pub struct TagIter<'s> {
    store: &'s dyn ObjectStore,
    pending: std::vec::IntoIter<Hash>,
    visited: HashSet<Hash>,
}

impl<'s> TagIter<'s> {
    pub fn snapshot(store: &'s dyn ObjectStore, hashes: Vec<Hash>) -> Self {
        Self {
            store,
            pending: hashes.into_iter(),
            visited: HashSet::new(),
        }
    }

    /// Drop pending work. Idempotent.
    pub fn close(&mut self) {
        self.pending = Vec::new().into_iter();
        self.visited = HashSet::new();
    }
}

impl<'s> Iterator for TagIter<'s> {
    type Item = Result<Tag<'s>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let hash = self.pending.next()?;
            if self.visited.insert(hash) {
                return Some(lookup(self.store, &hash));
            }
        }
    }
}
