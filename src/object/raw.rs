use anyhow::{Context, Result};
use gix_object::Kind;

use crate::hash::{kind_name, parse_kind, Hash};

/// A git object as stored: type tag, body bytes, and the id derived from both.
///
/// Fields are private; once built, a raw object is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObject {
    hash: Hash,
    kind: Kind,
    data: Vec<u8>,
}

impl RawObject {
    /// Create a raw object from its body (without header), computing its id.
    pub fn new(kind: Kind, data: impl Into<Vec<u8>>) -> Self {
        let data = data.into();
        let hash = Hash::compute(kind, &data);
        Self { hash, kind, data }
    }

    /// Parse a loose object ("type size\0data", already inflated).
    pub fn from_loose_format(content: &[u8]) -> Result<Self> {
        let null_pos = content
            .iter()
            .position(|&b| b == 0)
            .context("No null terminator in object header")?;

        let header = std::str::from_utf8(&content[..null_pos])
            .context("Invalid UTF-8 in object header")?;

        let (kind, size) = header
            .split_once(' ')
            .with_context(|| format!("Invalid object header format: {}", header))?;
        let kind = parse_kind(kind).with_context(|| format!("Unknown object type: {}", kind))?;
        let size: usize = size
            .parse()
            .with_context(|| format!("Invalid object size in header: {}", header))?;

        let data = &content[null_pos + 1..];
        if data.len() != size {
            anyhow::bail!(
                "Object size mismatch: header says {}, body has {} bytes",
                size,
                data.len()
            );
        }

        Ok(Self::new(kind, data))
    }

    /// Serialize to loose object format (with header).
    pub fn to_loose_format(&self) -> Vec<u8> {
        let header = format!("{} {}\0", kind_name(self.kind), self.data.len());
        let mut result = header.into_bytes();
        result.extend_from_slice(&self.data);
        result
    }

    pub fn hash(&self) -> Hash {
        self.hash
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_computes_id() {
        let obj = RawObject::new(Kind::Blob, b"test\n".to_vec());
        assert_eq!(obj.hash().to_hex(), "9daeafb9864cf43055ae93beb0afd6c7d144bfa4");
        assert_eq!(obj.size(), 5);
    }

    #[test]
    fn test_loose_format_roundtrip() {
        let obj = RawObject::new(Kind::Blob, b"hello world\n".to_vec());
        let loose = obj.to_loose_format();
        let parsed = RawObject::from_loose_format(&loose).unwrap();

        assert_eq!(obj, parsed);
    }

    #[test]
    fn test_loose_format_rejects_bad_headers() {
        assert!(RawObject::from_loose_format(b"blob 5").is_err());
        assert!(RawObject::from_loose_format(b"widget 1\0x").is_err());
        assert!(RawObject::from_loose_format(b"blob 9\0short").is_err());
    }
}
