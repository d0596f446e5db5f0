use crate::error::{Error, Result};
use crate::object::{Decode, EntryMode, RawObject, Tree, TreeEntry};
use crate::storage::ObjectStore;

/// Nesting limit used unless the repository configures another one.
pub const DEFAULT_MAX_TREE_DEPTH: usize = 1024;

/// One entry produced by a [`TreeWalker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry<'s> {
    /// Entry name within its own tree, not a full path.
    pub name: String,
    pub mode: EntryMode,
    pub object: &'s RawObject,
}

struct Frame {
    entries: std::vec::IntoIter<TreeEntry>,
}

/// Pre-order depth-first walk over a tree.
///
/// Sub-tree entries are yielded and then descended into before their siblings.
/// Pending trees live on an explicit stack, so depth does not grow the call stack.
/// Submodule entries are skipped: their commits live in another repository.
pub struct TreeWalker<'s> {
    store: &'s dyn ObjectStore,
    stack: Vec<Frame>,
    max_depth: usize,
}

impl<'s> TreeWalker<'s> {
    pub fn new(store: &'s dyn ObjectStore, root: &Tree<'_>) -> Self {
        Self {
            store,
            stack: vec![Frame {
                entries: root.entries().to_vec().into_iter(),
            }],
            max_depth: DEFAULT_MAX_TREE_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub(crate) fn store(&self) -> &'s dyn ObjectStore {
        self.store
    }

    /// Drop all pending frames. Safe to call any number of times.
    pub fn close(&mut self) {
        self.stack.clear();
    }

    fn descend(&mut self, object: &'s RawObject) -> Result<()> {
        if self.stack.len() >= self.max_depth {
            return Err(Error::MaxTreeDepth(self.max_depth));
        }
        let tree = Tree::decode(self.store, object)?;
        self.stack.push(Frame {
            entries: tree.entries().to_vec().into_iter(),
        });
        Ok(())
    }
}

impl<'s> Iterator for TreeWalker<'s> {
    type Item = Result<WalkEntry<'s>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let Some(entry) = frame.entries.next() else {
                self.stack.pop();
                continue;
            };

            if entry.mode.is_gitlink() {
                tracing::debug!("Skipping submodule entry {} -> {}", entry.name, entry.hash);
                continue;
            }

            let object = match self.store.get(&entry.hash) {
                Ok(object) => object,
                Err(e) => return Some(Err(e)),
            };

            if entry.mode.is_tree() {
                if let Err(e) = self.descend(object) {
                    return Some(Err(e));
                }
            }

            return Some(Ok(WalkEntry {
                name: entry.name,
                mode: entry.mode,
                object,
            }));
        }
    }
}
