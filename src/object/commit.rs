use std::fmt;

use gix_object::Kind;

use super::{
    expect_kind, lookup, parse_hash, parse_headers, parse_signature, Decode, File, RawObject,
    Signature, Tree,
};
use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::iter::{CommitIter, FileIter};
use crate::storage::ObjectStore;

/// A decoded commit. The tree and parents are resolved lazily from the store.
#[derive(Clone)]
pub struct Commit<'s> {
    store: &'s dyn ObjectStore,
    pub hash: Hash,
    pub author: Signature,
    pub committer: Signature,
    pub message: String,
    tree: Hash,
    parents: Vec<Hash>,
}

pub(crate) struct ParsedCommit {
    pub tree: Hash,
    pub parents: Vec<Hash>,
    pub author: Signature,
    pub committer: Signature,
    pub message: String,
}

impl<'s> Commit<'s> {
    pub fn tree_hash(&self) -> Hash {
        self.tree
    }

    /// Resolve the root tree. Fails with `Error::NotFound` if it was never fetched.
    pub fn tree(&self) -> Result<Tree<'s>> {
        lookup(self.store, &self.tree)
    }

    pub fn parent_hashes(&self) -> &[Hash] {
        &self.parents
    }

    pub fn num_parents(&self) -> usize {
        self.parents.len()
    }

    /// Parents in recorded order, each decoded on demand.
    pub fn parents(&self) -> impl Iterator<Item = Result<Commit<'s>>> + '_ {
        let store = self.store;
        self.parents.iter().map(move |hash| lookup(store, hash))
    }

    /// This commit followed by all of its ancestors, each visited once.
    pub fn history(&self) -> CommitIter<'s> {
        CommitIter::ancestry(self.store, self.hash)
    }

    pub fn files(&self) -> Result<FileIter<'s>> {
        Ok(self.tree()?.files())
    }

    pub fn file(&self, path: &str) -> Result<File<'s>> {
        self.tree()?.file(path)
    }
}

impl<'s> Decode<'s> for Commit<'s> {
    const KIND: Kind = Kind::Commit;

    fn decode(store: &'s dyn ObjectStore, raw: &'s RawObject) -> Result<Self> {
        let parsed = parse(raw)?;
        Ok(Self {
            store,
            hash: raw.hash(),
            author: parsed.author,
            committer: parsed.committer,
            message: parsed.message,
            tree: parsed.tree,
            parents: parsed.parents,
        })
    }
}

pub(crate) fn parse(raw: &RawObject) -> Result<ParsedCommit> {
    expect_kind(raw, Kind::Commit)?;

    let text = String::from_utf8_lossy(raw.data());
    let (fields, message) = parse_headers(&text);

    let mut tree = None;
    let mut parents = Vec::new();
    let mut author = None;
    let mut committer = None;

    for (key, value) in fields {
        match key {
            "tree" => tree = Some(parse_hash(raw, key, value)?),
            "parent" => parents.push(parse_hash(raw, key, value)?),
            "author" => author = Some(parse_signature(raw, key, value)?),
            "committer" => committer = Some(parse_signature(raw, key, value)?),
            _ => {}
        }
    }

    let missing = |header: &str| Error::decode(raw.hash(), format!("missing {} header", header));
    Ok(ParsedCommit {
        tree: tree.ok_or_else(|| missing("tree"))?,
        parents,
        author: author.ok_or_else(|| missing("author"))?,
        committer: committer.ok_or_else(|| missing("committer"))?,
        message: message.to_string(),
    })
}

impl PartialEq for Commit<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.author == other.author
            && self.committer == other.committer
            && self.message == other.message
            && self.tree == other.tree
            && self.parents == other.parents
    }
}

impl fmt::Debug for Commit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commit")
            .field("hash", &self.hash)
            .field("tree", &self.tree)
            .field("parents", &self.parents)
            .field("author", &self.author)
            .field("committer", &self.committer)
            .field("message", &self.message)
            .finish()
    }
}
