use gix_object::Kind;

use crate::error::Result;
use crate::hash::Hash;
use crate::object::RawObject;

/// Content-addressed object storage.
///
/// Objects are keyed by their own hash, so inserting an object that is already
/// present never changes the store.
pub trait ObjectStore {
    /// Borrow an object by hash.
    /// Returns `Error::NotFound` if the object is absent.
    fn get(&self, hash: &Hash) -> Result<&RawObject>;

    /// Insert an object under its own hash.
    /// Returns false, leaving the stored copy untouched, if it already exists.
    fn insert(&mut self, object: RawObject) -> bool;

    /// Check if an object exists by hash.
    fn contains(&self, hash: &Hash) -> bool;

    /// Hashes of every stored object of the given kind, in store order.
    fn hashes(&self, kind: Kind) -> Vec<Hash>;

    /// Number of stored objects.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
