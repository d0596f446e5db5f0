use std::collections::BTreeMap;

use gix_object::Kind;

use crate::auth::Auth;
use crate::config::RepositoryConfig;
use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::iter::{CommitIter, TagIter, DEFAULT_MAX_TREE_DEPTH};
use crate::object::{lookup, Blob, Commit, Decode, RawObject, Tag, Tree};
use crate::remote::Remote;
use crate::storage::{MemoryStore, ObjectStore};
use crate::transport::{FetchGuard, FetchResponse};

/// Name of the remote created from a repository URL.
pub const DEFAULT_REMOTE: &str = "origin";

/// Local object store plus the remotes it is filled from.
///
/// The store only grows: `pull` merges objects by hash and nothing is ever
/// removed. Not synchronized; concurrent pulls must be serialized by the caller.
#[derive(Debug)]
pub struct Repository {
    url: Option<String>,
    remotes: BTreeMap<String, Remote>,
    store: MemoryStore,
    /// (remote, reference) -> head recorded by the last successful pull
    refs: BTreeMap<(String, String), Hash>,
    max_tree_depth: usize,
}

/// Counts from merging one fetch stream.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct MergeStats {
    inserted: usize,
    duplicates: usize,
}

impl Repository {
    /// Empty repository without remotes.
    pub fn empty() -> Self {
        Self {
            url: None,
            remotes: BTreeMap::new(),
            store: MemoryStore::new(),
            refs: BTreeMap::new(),
            max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
        }
    }

    /// Repository with a single `origin` remote bound to `url` and `auth`.
    pub fn new(url: &str, auth: Option<Auth>) -> Result<Self> {
        let mut repository = Self::empty();
        repository.add_remote(DEFAULT_REMOTE, url, auth)?;
        repository.url = Some(url.trim().to_string());
        Ok(repository)
    }

    /// Repository with one remote per configured entry. `auth` is shared by all of them.
    pub fn from_config(config: &RepositoryConfig, auth: Option<Auth>) -> Result<Self> {
        if config.max_tree_depth == 0 {
            return Err(Error::config("max_tree_depth must be at least 1"));
        }

        let mut repository = Self::empty();
        repository.max_tree_depth = config.max_tree_depth;
        for (name, remote) in &config.remotes {
            repository.add_remote(name, &remote.url, auth.clone())?;
        }
        repository.url = config
            .remotes
            .get(DEFAULT_REMOTE)
            .map(|remote| remote.url.trim().to_string());
        Ok(repository)
    }

    /// URL of the `origin` remote this repository was created from.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn add_remote(&mut self, name: &str, url: &str, auth: Option<Auth>) -> Result<&mut Remote> {
        if self.remotes.contains_key(name) {
            return Err(Error::config(format!("remote {} already exists", name)));
        }
        let remote = Remote::new(name, url, auth)?;
        Ok(self.remotes.entry(name.to_string()).or_insert(remote))
    }

    pub fn remote(&self, name: &str) -> Result<&Remote> {
        self.remotes
            .get(name)
            .ok_or_else(|| Error::UnknownRemote(name.to_string()))
    }

    pub fn remote_mut(&mut self, name: &str) -> Result<&mut Remote> {
        self.remotes
            .get_mut(name)
            .ok_or_else(|| Error::UnknownRemote(name.to_string()))
    }

    pub fn remotes(&self) -> impl Iterator<Item = &Remote> {
        self.remotes.values()
    }

    /// Fetch `reference` from `remote_name` and merge the objects into the store.
    ///
    /// Objects already present are left untouched. The fetch stream is closed
    /// exactly once whatever happens; objects merged before a failure stay.
    pub fn pull(&mut self, remote_name: &str, reference: &str) -> Result<()> {
        let remote = self
            .remotes
            .get_mut(remote_name)
            .ok_or_else(|| Error::UnknownRemote(remote_name.to_string()))?;

        tracing::info!("Pulling {} from {} ({})", reference, remote_name, remote.url());
        let FetchResponse { head, stream } = remote.fetch(reference)?;
        let mut stream = FetchGuard::new(stream);

        let merged = merge(&mut self.store, &mut stream);
        let closed = stream.close();

        let stats = match (merged, closed) {
            (Ok(stats), Ok(())) => stats,
            (Ok(_), Err(e)) => {
                return Err(Error::Transport(e.context("Failed to release fetch stream")));
            }
            (Err(e), Ok(())) => return Err(e),
            (Err(e), Err(close_err)) => {
                tracing::warn!("Failed to release fetch stream: {:#}", close_err);
                return Err(e);
            }
        };

        if !self.store.contains(&head) {
            return Err(Error::NotFound(head));
        }

        self.refs
            .insert((remote_name.to_string(), reference.to_string()), head);
        tracing::info!(
            "Pulled {} -> {}: {} new object(s), {} already present",
            reference,
            head,
            stats.inserted,
            stats.duplicates
        );
        Ok(())
    }

    /// Head of `reference` as recorded by the last successful pull from `remote_name`.
    pub fn reference(&self, remote_name: &str, reference: &str) -> Option<Hash> {
        self.refs
            .get(&(remote_name.to_string(), reference.to_string()))
            .copied()
    }

    pub fn store(&self) -> &dyn ObjectStore {
        &self.store
    }

    pub fn object_count(&self) -> usize {
        self.store.len()
    }

    pub fn max_tree_depth(&self) -> usize {
        self.max_tree_depth
    }

    pub fn object(&self, hash: &Hash) -> Result<&RawObject> {
        self.store.get(hash)
    }

    /// Look up `hash` and decode it as `T`.
    pub fn lookup<'s, T: Decode<'s>>(&'s self, hash: &Hash) -> Result<T> {
        lookup(&self.store, hash)
    }

    pub fn blob(&self, hash: &Hash) -> Result<Blob<'_>> {
        self.lookup(hash)
    }

    pub fn tree(&self, hash: &Hash) -> Result<Tree<'_>> {
        self.lookup(hash)
    }

    pub fn commit(&self, hash: &Hash) -> Result<Commit<'_>> {
        self.lookup(hash)
    }

    pub fn tag(&self, hash: &Hash) -> Result<Tag<'_>> {
        self.lookup(hash)
    }

    /// Every commit in the store when this is called.
    pub fn commits(&self) -> CommitIter<'_> {
        CommitIter::snapshot(&self.store, self.store.hashes(Kind::Commit))
    }

    /// Every annotated tag in the store when this is called.
    pub fn tags(&self) -> TagIter<'_> {
        TagIter::snapshot(&self.store, self.store.hashes(Kind::Tag))
    }

    /// `head` and its ancestors.
    pub fn log(&self, head: &Hash) -> Result<CommitIter<'_>> {
        let commit = self.commit(head)?;
        Ok(commit.history())
    }
}

fn merge(store: &mut MemoryStore, stream: &mut FetchGuard) -> Result<MergeStats> {
    let mut stats = MergeStats::default();
    for object in stream {
        let object = object.map_err(Error::Transport)?;
        let hash = object.hash();
        if store.insert(object) {
            tracing::debug!("Stored object {}", hash);
            stats.inserted += 1;
        } else {
            stats.duplicates += 1;
        }
    }
    Ok(stats)
}
