//! Lazy traversals over the object graph.
//!
//! Every iterator yields `Result` items and returns `None` once exhausted.
//! `close()` releases buffered state early; it is idempotent, and after it
//! `next()` keeps returning `None`.

mod commit_iter;
mod file_iter;
mod tag_iter;
mod tree_walker;

pub use commit_iter::CommitIter;
pub use file_iter::FileIter;
pub use tag_iter::TagIter;
pub use tree_walker::{TreeWalker, WalkEntry, DEFAULT_MAX_TREE_DEPTH};
