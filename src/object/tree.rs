use std::fmt;

use gix_object::Kind;

use super::{expect_kind, lookup, Blob, Decode, File, RawObject};
use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::iter::{FileIter, TreeWalker};
use crate::storage::ObjectStore;

/// Unix-style file mode of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryMode(pub u32);

impl EntryMode {
    pub const TREE: EntryMode = EntryMode(0o040000);
    pub const BLOB: EntryMode = EntryMode(0o100644);
    pub const EXECUTABLE: EntryMode = EntryMode(0o100755);
    pub const SYMLINK: EntryMode = EntryMode(0o120000);
    pub const GITLINK: EntryMode = EntryMode(0o160000);

    /// Kind of object the entry points at.
    pub fn kind(self) -> Kind {
        match self {
            EntryMode::TREE => Kind::Tree,
            EntryMode::GITLINK => Kind::Commit,
            _ => Kind::Blob,
        }
    }

    pub fn is_tree(self) -> bool {
        self == EntryMode::TREE
    }

    /// Submodule entry: points at a commit in another repository.
    pub fn is_gitlink(self) -> bool {
        self == EntryMode::GITLINK
    }
}

impl fmt::Display for EntryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06o}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub mode: EntryMode,
    pub hash: Hash,
}

/// Directory listing. Entries keep their stored order.
#[derive(Clone)]
pub struct Tree<'s> {
    store: &'s dyn ObjectStore,
    pub hash: Hash,
    entries: Vec<TreeEntry>,
}

impl<'s> Tree<'s> {
    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn entry(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Find a file by slash-separated path, descending through sub-trees.
    pub fn file(&self, path: &str) -> Result<File<'s>> {
        let mut components = path.split('/').filter(|c| !c.is_empty()).peekable();
        let mut current = self.clone();

        while let Some(name) = components.next() {
            let entry = current
                .entry(name)
                .cloned()
                .ok_or_else(|| Error::FileNotFound(path.to_string()))?;

            if components.peek().is_none() {
                if entry.mode.kind() != Kind::Blob {
                    return Err(Error::FileNotFound(path.to_string()));
                }
                let blob: Blob<'s> = lookup(self.store, &entry.hash)?;
                return Ok(File::new(entry.name, entry.mode, blob));
            }

            if !entry.mode.is_tree() {
                return Err(Error::FileNotFound(path.to_string()));
            }
            current = lookup(self.store, &entry.hash)?;
        }

        Err(Error::FileNotFound(path.to_string()))
    }

    /// Every blob reachable from this tree.
    pub fn files(&self) -> FileIter<'s> {
        FileIter::from_walker(self.walk())
    }

    /// Depth-first walk over all entries, sub-trees included.
    pub fn walk(&self) -> TreeWalker<'s> {
        TreeWalker::new(self.store, self)
    }
}

impl<'s> Decode<'s> for Tree<'s> {
    const KIND: Kind = Kind::Tree;

    fn decode(store: &'s dyn ObjectStore, raw: &'s RawObject) -> Result<Self> {
        expect_kind(raw, Self::KIND)?;
        Ok(Self {
            store,
            hash: raw.hash(),
            entries: parse_entries(raw)?,
        })
    }
}

impl PartialEq for Tree<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.entries == other.entries
    }
}

impl fmt::Debug for Tree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("hash", &self.hash)
            .field("entries", &self.entries)
            .finish()
    }
}

/// Parse the binary tree body: repeated `<octal mode> <name>\0<20-byte id>`.
pub(crate) fn parse_entries(raw: &RawObject) -> Result<Vec<TreeEntry>> {
    let mut data = raw.data();
    let mut entries = Vec::new();

    while !data.is_empty() {
        let space = data
            .iter()
            .position(|&b| b == b' ')
            .ok_or_else(|| Error::decode(raw.hash(), "tree entry without mode"))?;
        let mode = std::str::from_utf8(&data[..space])
            .ok()
            .and_then(|mode| u32::from_str_radix(mode, 8).ok())
            .ok_or_else(|| Error::decode(raw.hash(), "invalid tree entry mode"))?;
        data = &data[space + 1..];

        let nul = data
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| Error::decode(raw.hash(), "tree entry name not terminated"))?;
        let name = String::from_utf8_lossy(&data[..nul]).into_owned();
        data = &data[nul + 1..];

        let hash = data
            .get(..Hash::LEN)
            .and_then(Hash::from_slice)
            .ok_or_else(|| Error::decode(raw.hash(), format!("truncated id for entry {}", name)))?;
        data = &data[Hash::LEN..];

        entries.push(TreeEntry {
            name,
            mode: EntryMode(mode),
            hash,
        });
    }

    Ok(entries)
}
