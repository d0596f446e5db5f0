use std::{fmt, str::FromStr};

use gix_object::Kind;
use sha1::{Digest, Sha1};

use crate::error::Error;

/// Git SHA-1 object identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash([u8; Hash::LEN]);

impl Hash {
    pub const LEN: usize = 20;

    /// All-zero sentinel for "absent". Never the id of a real object.
    pub const ZERO: Hash = Hash([0; Hash::LEN]);

    pub fn from_bytes(bytes: [u8; Hash::LEN]) -> Self {
        Hash(bytes)
    }

    /// Build a hash from a raw 20-byte slice, as found inside tree entries.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; Hash::LEN] = bytes.try_into().ok()?;
        Some(Hash(bytes))
    }

    /// Compute the git object id: SHA-1 over `"<kind> <len>\0"` followed by the data.
    pub fn compute(kind: Kind, data: &[u8]) -> Self {
        let header = format!("{} {}\0", kind_name(kind), data.len());
        let mut hasher = Sha1::new();
        hasher.update(header.as_bytes());
        hasher.update(data);
        let digest = hasher.finalize();
        let mut bytes = [0u8; Hash::LEN];
        bytes.copy_from_slice(&digest);
        Hash(bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; Hash::LEN]
    }

    pub fn as_bytes(&self) -> &[u8; Hash::LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// Name git uses for an object kind in headers.
pub fn kind_name(kind: Kind) -> &'static str {
    match kind {
        Kind::Commit => "commit",
        Kind::Tree => "tree",
        Kind::Blob => "blob",
        Kind::Tag => "tag",
    }
}

/// Inverse of [`kind_name`].
pub fn parse_kind(name: &str) -> Option<Kind> {
    match name {
        "commit" => Some(Kind::Commit),
        "tree" => Some(Kind::Tree),
        "blob" => Some(Kind::Blob),
        "tag" => Some(Kind::Tag),
        _ => None,
    }
}

impl FromStr for Hash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; Hash::LEN];
        hex::decode_to_slice(s.trim(), &mut bytes)
            .map_err(|e| Error::config(format!("invalid object id {:?}: {}", s, e)))?;
        Ok(Hash(bytes))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.to_hex())
    }
}
