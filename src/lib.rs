#![deny(clippy::mod_module_files)]
//! Content-addressed git object model with lazy graph traversal.
//!
//! A [`Repository`] owns an in-memory object store filled by pulling from
//! named remotes through a pluggable [`Transport`]. Commits, trees, tags and
//! blobs are decoded on lookup, and the iterators in [`iter`] walk trees and
//! histories one object at a time.

pub mod auth;
pub mod config;
pub mod error;
pub mod hash;
pub mod iter;
pub mod object;
pub mod remote;
pub mod repository;
pub mod storage;
pub mod transport;

pub use auth::{Auth, AuthMethod, BasicAuth};
pub use config::{RemoteConfig, RepositoryConfig};
pub use error::{Error, Result};
pub use hash::Hash;
pub use iter::{CommitIter, FileIter, TagIter, TreeWalker, WalkEntry};
pub use object::{Blob, Commit, Decode, EntryMode, File, RawObject, Signature, Tag, Tree, TreeEntry};
pub use remote::Remote;
pub use repository::{Repository, DEFAULT_REMOTE};
pub use storage::{MemoryStore, ObjectStore};
pub use transport::{
    Endpoint, FetchGuard, FetchHandle, FetchResponse, LocalTransport, MemoryTransport, ObjectStream,
    Transport, UnlinkedTransport,
};

pub use gix_object::Kind;
