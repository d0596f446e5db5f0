use std::io::{Cursor, Read};

use gix_object::Kind;

use super::{expect_kind, Decode, RawObject};
use crate::error::Result;
use crate::hash::Hash;
use crate::storage::ObjectStore;

/// File content. Reads straight from the stored object; nothing is cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob<'s> {
    pub hash: Hash,
    raw: &'s RawObject,
}

impl<'s> Blob<'s> {
    pub fn size(&self) -> usize {
        self.raw.size()
    }

    /// A fresh reader over the blob bytes.
    pub fn reader(&self) -> impl Read + 's {
        Cursor::new(self.raw.data())
    }
}

impl<'s> Decode<'s> for Blob<'s> {
    const KIND: Kind = Kind::Blob;

    fn decode(_store: &'s dyn ObjectStore, raw: &'s RawObject) -> Result<Self> {
        expect_kind(raw, Self::KIND)?;
        Ok(Self {
            hash: raw.hash(),
            raw,
        })
    }
}
