use std::collections::HashSet;

use crate::error::Result;
use crate::hash::Hash;
use crate::object::{lookup, Commit};
use crate::storage::ObjectStore;

enum Pending {
    /// Fixed list of hashes captured when the iterator was created.
    Snapshot(std::vec::IntoIter<Hash>),
    /// Work stack of commits still to visit, parents pushed as they are found.
    Ancestry(Vec<Hash>),
}

/// Commits decoded one at a time, each visited at most once.
///
/// Order is unspecified. The visited set keeps duplicated or malformed parent
/// links from producing repeats or looping forever.
pub struct CommitIter<'s> {
    store: &'s dyn ObjectStore,
    pending: Pending,
    visited: HashSet<Hash>,
}

impl<'s> CommitIter<'s> {
    /// Every commit in `hashes`, typically a snapshot of the store's commits.
    pub fn snapshot(store: &'s dyn ObjectStore, hashes: Vec<Hash>) -> Self {
        Self {
            store,
            pending: Pending::Snapshot(hashes.into_iter()),
            visited: HashSet::new(),
        }
    }

    /// `head` and everything reachable through its parent links.
    pub fn ancestry(store: &'s dyn ObjectStore, head: Hash) -> Self {
        Self {
            store,
            pending: Pending::Ancestry(vec![head]),
            visited: HashSet::new(),
        }
    }

    /// Drop pending work. Idempotent; `next()` returns `None` afterwards.
    pub fn close(&mut self) {
        self.pending = Pending::Ancestry(Vec::new());
        self.visited = HashSet::new();
    }

    fn pop(&mut self) -> Option<Hash> {
        match &mut self.pending {
            Pending::Snapshot(hashes) => hashes.next(),
            Pending::Ancestry(stack) => stack.pop(),
        }
    }
}

impl<'s> Iterator for CommitIter<'s> {
    type Item = Result<Commit<'s>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let hash = self.pop()?;
            if !self.visited.insert(hash) {
                continue;
            }

            let commit: Commit<'s> = match lookup(self.store, &hash) {
                Ok(commit) => commit,
                Err(e) => return Some(Err(e)),
            };

            if let Pending::Ancestry(stack) = &mut self.pending {
                // Reversed so the first parent is visited next.
                stack.extend(
                    commit
                        .parent_hashes()
                        .iter()
                        .rev()
                        .filter(|parent| !self.visited.contains(*parent)),
                );
            }

            return Some(Ok(commit));
        }
    }
}
