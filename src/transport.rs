//! Fetch transports.
//!
//! A transport resolves a reference on a remote and streams back every object
//! reachable from it. The pack protocol and network plumbing stay behind the
//! [`Transport`] trait; this crate ships an in-memory stub, a transport over a
//! local bare repository, and a placeholder for network URLs.

mod endpoint;
mod local;
mod memory;
mod unlinked;

pub use endpoint::Endpoint;
pub use local::{loose_object_path, read_loose_object, write_loose_object, LocalTransport};
pub use memory::{FetchHandle, MemoryTransport};
pub use unlinked::UnlinkedTransport;

use std::collections::HashSet;

use anyhow::{Context, Result};

use crate::auth::AuthMethod;
use crate::hash::Hash;
use crate::object::{links, RawObject};

/// Source of objects for a remote.
pub trait Transport {
    /// Resolve `reference` and open a stream of the objects reachable from it.
    fn fetch(&mut self, reference: &str, auth: Option<&dyn AuthMethod>) -> Result<FetchResponse>;
}

/// Objects delivered by a fetch.
///
/// The stream holds whatever resource the transport opened for it; `close()`
/// releases it and must be called exactly once.
pub trait ObjectStream: Iterator<Item = Result<RawObject>> {
    fn close(&mut self) -> Result<()>;
}

pub struct FetchResponse {
    /// Object the reference pointed at on the remote.
    pub head: Hash,
    pub stream: Box<dyn ObjectStream>,
}

/// Owns a fetch stream and closes it exactly once, on `close()` or on drop.
pub struct FetchGuard {
    stream: Option<Box<dyn ObjectStream>>,
}

impl FetchGuard {
    pub fn new(stream: Box<dyn ObjectStream>) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    /// Release the stream now and report the outcome. Later calls are no-ops.
    pub fn close(&mut self) -> Result<()> {
        match self.stream.take() {
            Some(mut stream) => stream.close(),
            None => Ok(()),
        }
    }
}

impl Iterator for FetchGuard {
    type Item = Result<RawObject>;

    fn next(&mut self) -> Option<Self::Item> {
        self.stream.as_mut()?.next()
    }
}

impl Drop for FetchGuard {
    fn drop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.close() {
                tracing::warn!("Failed to release fetch stream: {:#}", e);
            }
        }
    }
}

/// Lazy reachability walk from a head object, visiting each object once.
pub(crate) struct ReachabilityWalk {
    pending: Vec<Hash>,
    seen: HashSet<Hash>,
}

impl ReachabilityWalk {
    pub fn new(head: Hash) -> Self {
        Self {
            pending: vec![head],
            seen: HashSet::from([head]),
        }
    }

    /// Load the next object with `load` and queue the objects it links to.
    pub fn next_with<F>(&mut self, mut load: F) -> Option<Result<RawObject>>
    where
        F: FnMut(&Hash) -> Result<RawObject>,
    {
        let hash = self.pending.pop()?;
        let result = load(&hash).and_then(|object| {
            let children = links(&object)
                .with_context(|| format!("Failed to read links of object {}", hash))?;
            for child in children.into_iter().rev() {
                if self.seen.insert(child) {
                    self.pending.push(child);
                }
            }
            Ok(object)
        });
        Some(result)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
