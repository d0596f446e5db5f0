use std::fmt;

use gix_object::Kind;

use super::{
    expect_kind, lookup, parse_hash, parse_headers, parse_signature, Blob, Commit, Decode,
    RawObject, Signature, Tree,
};
use crate::error::{Error, Result};
use crate::hash::{parse_kind, Hash};
use crate::storage::ObjectStore;

/// An annotated tag.
#[derive(Clone)]
pub struct Tag<'s> {
    store: &'s dyn ObjectStore,
    pub hash: Hash,
    pub name: String,
    pub target: Hash,
    pub target_kind: Kind,
    /// Absent on some very old tags.
    pub tagger: Option<Signature>,
    pub message: String,
}

pub(crate) struct ParsedTag {
    pub target: Hash,
    pub target_kind: Kind,
    pub name: String,
    pub tagger: Option<Signature>,
    pub message: String,
}

impl<'s> Tag<'s> {
    /// The raw object the tag points at.
    pub fn target(&self) -> Result<&'s RawObject> {
        self.store.get(&self.target)
    }

    pub fn commit(&self) -> Result<Commit<'s>> {
        lookup(self.store, &self.target)
    }

    pub fn tree(&self) -> Result<Tree<'s>> {
        lookup(self.store, &self.target)
    }

    pub fn blob(&self) -> Result<Blob<'s>> {
        lookup(self.store, &self.target)
    }
}

impl<'s> Decode<'s> for Tag<'s> {
    const KIND: Kind = Kind::Tag;

    fn decode(store: &'s dyn ObjectStore, raw: &'s RawObject) -> Result<Self> {
        let parsed = parse(raw)?;
        Ok(Self {
            store,
            hash: raw.hash(),
            name: parsed.name,
            target: parsed.target,
            target_kind: parsed.target_kind,
            tagger: parsed.tagger,
            message: parsed.message,
        })
    }
}

pub(crate) fn parse(raw: &RawObject) -> Result<ParsedTag> {
    expect_kind(raw, Kind::Tag)?;

    let text = String::from_utf8_lossy(raw.data());
    let (fields, message) = parse_headers(&text);

    let mut target = None;
    let mut target_kind = None;
    let mut name = None;
    let mut tagger = None;

    for (key, value) in fields {
        match key {
            "object" => target = Some(parse_hash(raw, key, value)?),
            "type" => {
                let kind = parse_kind(value).ok_or_else(|| {
                    Error::decode(raw.hash(), format!("unknown target type {:?}", value))
                })?;
                target_kind = Some(kind);
            }
            "tag" => name = Some(value.to_string()),
            "tagger" => tagger = Some(parse_signature(raw, key, value)?),
            _ => {}
        }
    }

    let missing = |header: &str| Error::decode(raw.hash(), format!("missing {} header", header));
    Ok(ParsedTag {
        target: target.ok_or_else(|| missing("object"))?,
        target_kind: target_kind.ok_or_else(|| missing("type"))?,
        name: name.ok_or_else(|| missing("tag"))?,
        tagger,
        message: message.to_string(),
    })
}

impl PartialEq for Tag<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.name == other.name
            && self.target == other.target
            && self.target_kind == other.target_kind
            && self.tagger == other.tagger
            && self.message == other.message
    }
}

impl fmt::Debug for Tag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tag")
            .field("hash", &self.hash)
            .field("name", &self.name)
            .field("target", &self.target)
            .field("target_kind", &self.target_kind)
            .field("tagger", &self.tagger)
            .field("message", &self.message)
            .finish()
    }
}
