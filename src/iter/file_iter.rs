use gix_object::Kind;

use super::TreeWalker;
use crate::error::Result;
use crate::object::{Blob, Decode, File, Tree};
use crate::repository::Repository;

/// Blob entries of a tree, recursively, as [`File`]s.
pub struct FileIter<'s> {
    walker: TreeWalker<'s>,
}

impl<'s> FileIter<'s> {
    /// Iterate the files of `tree`, honouring the repository's depth limit.
    pub fn new(repository: &'s Repository, tree: &Tree<'_>) -> Self {
        let walker = TreeWalker::new(repository.store(), tree)
            .with_max_depth(repository.max_tree_depth());
        Self::from_walker(walker)
    }

    pub fn from_walker(walker: TreeWalker<'s>) -> Self {
        Self { walker }
    }

    /// Close the underlying walker. Idempotent.
    pub fn close(&mut self) {
        self.walker.close();
    }
}

impl<'s> Iterator for FileIter<'s> {
    type Item = Result<File<'s>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e)),
            };

            if entry.object.kind() != Kind::Blob {
                continue;
            }

            let file = Blob::decode(self.walker.store(), entry.object)
                .map(|blob| File::new(entry.name, entry.mode, blob));
            return Some(file);
        }
    }
}
