//! Typed views over raw git objects.
//!
//! Decoding is pure: a decoder borrows a [`RawObject`] and the store it lives in,
//! checks the type tag, and parses the body. Decoding the same object twice
//! yields equal records.

mod blob;
mod commit;
mod file;
mod raw;
mod signature;
mod tag;
mod tree;

pub use blob::Blob;
pub use commit::Commit;
pub use file::File;
pub use raw::RawObject;
pub use signature::Signature;
pub use tag::Tag;
pub use tree::{EntryMode, Tree, TreeEntry};

use gix_object::Kind;

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::storage::ObjectStore;

/// A record that can be decoded from a raw object of one specific kind.
pub trait Decode<'s>: Sized {
    /// Type tag the raw object must carry.
    const KIND: Kind;

    /// Decode `raw`, failing with `Error::TypeMismatch` if its kind is not `KIND`.
    fn decode(store: &'s dyn ObjectStore, raw: &'s RawObject) -> Result<Self>;
}

/// Fetch `hash` from `store` and decode it as `T`.
pub fn lookup<'s, T: Decode<'s>>(store: &'s dyn ObjectStore, hash: &Hash) -> Result<T> {
    let raw = store.get(hash)?;
    T::decode(store, raw)
}

/// Hashes an object refers to: tree and parents of a commit, non-submodule
/// entries of a tree, the target of a tag.
pub fn links(raw: &RawObject) -> Result<Vec<Hash>> {
    match raw.kind() {
        Kind::Blob => Ok(Vec::new()),
        Kind::Tree => Ok(tree::parse_entries(raw)?
            .into_iter()
            .filter(|entry| !entry.mode.is_gitlink())
            .map(|entry| entry.hash)
            .collect()),
        Kind::Commit => {
            let parsed = commit::parse(raw)?;
            let mut links = vec![parsed.tree];
            links.extend(parsed.parents);
            Ok(links)
        }
        Kind::Tag => Ok(vec![tag::parse(raw)?.target]),
    }
}

pub(crate) fn expect_kind(raw: &RawObject, expected: Kind) -> Result<()> {
    if raw.kind() != expected {
        return Err(Error::TypeMismatch {
            hash: raw.hash(),
            expected,
            found: raw.kind(),
        });
    }
    Ok(())
}

/// Split a commit or tag body into header fields and message.
///
/// Continuation lines (those starting with a space, as in `gpgsig`) are
/// dropped; none of the headers we read span lines.
pub(crate) fn parse_headers(text: &str) -> (Vec<(&str, &str)>, &str) {
    let (head, message) = match text.find("\n\n") {
        Some(pos) => (&text[..pos], &text[pos + 2..]),
        None => (text.trim_end_matches('\n'), ""),
    };

    let fields = head
        .lines()
        .filter(|line| !line.starts_with(' '))
        .map(|line| line.split_once(' ').unwrap_or((line, "")))
        .collect();

    (fields, message)
}

pub(crate) fn parse_hash(raw: &RawObject, header: &str, value: &str) -> Result<Hash> {
    value
        .parse()
        .map_err(|_| Error::decode(raw.hash(), format!("invalid {} id {:?}", header, value)))
}

pub(crate) fn parse_signature(raw: &RawObject, header: &str, value: &str) -> Result<Signature> {
    Signature::decode(value)
        .ok_or_else(|| Error::decode(raw.hash(), format!("invalid {} line {:?}", header, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_parse_headers() {
        let text = "tree abc\nparent def\ngpgsig -----BEGIN\n line\n -----END\n\nsubject\n\nbody\n";
        let (fields, message) = parse_headers(text);

        assert_eq!(
            fields,
            vec![("tree", "abc"), ("parent", "def"), ("gpgsig", "-----BEGIN")]
        );
        assert_eq!(message, "subject\n\nbody\n");
    }

    #[test]
    fn test_parse_headers_without_message() {
        let (fields, message) = parse_headers("object abc\ntype commit\n");
        assert_eq!(fields, vec![("object", "abc"), ("type", "commit")]);
        assert_eq!(message, "");
    }

    #[test]
    fn test_lookup_type_mismatch() {
        let mut store = MemoryStore::new();
        let blob = RawObject::new(Kind::Blob, b"not a commit".to_vec());
        let hash = blob.hash();
        store.insert(blob);

        let err = lookup::<Commit>(&store, &hash).unwrap_err();
        assert!(err.is_type_mismatch());

        let err = lookup::<Blob>(&store, &Hash::ZERO).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_links() {
        let blob = RawObject::new(Kind::Blob, b"x".to_vec());
        let mut tree_body = b"100644 x\0".to_vec();
        tree_body.extend_from_slice(blob.hash().as_bytes());
        let tree = RawObject::new(Kind::Tree, tree_body);
        let commit = RawObject::new(
            Kind::Commit,
            format!(
                "tree {}\nparent {}\nauthor A <a@b> 1 +0000\ncommitter A <a@b> 1 +0000\n\nmsg\n",
                tree.hash(),
                blob.hash()
            ),
        );

        assert!(links(&blob).unwrap().is_empty());
        assert_eq!(links(&tree).unwrap(), vec![blob.hash()]);
        assert_eq!(links(&commit).unwrap(), vec![tree.hash(), blob.hash()]);
    }
}
