use gix_object::Kind;

use crate::hash::Hash;

/// All errors produced by gitcore.
///
/// Iterator exhaustion is not an error: iterators return `None` once drained,
/// which callers can always tell apart from `Some(Err(_))`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("object not found: {0}")]
    NotFound(Hash),

    #[error("object {hash} is a {found:?}, expected {expected:?}")]
    TypeMismatch {
        hash: Hash,
        expected: Kind,
        found: Kind,
    },

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("unknown remote: {0}")]
    UnknownRemote(String),

    #[error("transport error: {0:#}")]
    Transport(#[source] anyhow::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("malformed object {hash}: {reason}")]
    Decode { hash: Hash, reason: String },

    #[error("tree nesting exceeds maximum depth of {0}")]
    MaxTreeDepth(usize),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn decode(hash: Hash, reason: impl Into<String>) -> Self {
        Self::Decode {
            hash,
            reason: reason.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn transport(err: impl Into<anyhow::Error>) -> Self {
        Self::Transport(err.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Error::TypeMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_keeps_context_chain() {
        let err = anyhow::anyhow!("connection reset").context("Failed to fetch refs/heads/main");
        let err = Error::transport(err);

        let msg = err.to_string();
        assert!(msg.contains("Failed to fetch refs/heads/main"));
        assert!(msg.contains("connection reset"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_predicates() {
        assert!(Error::NotFound(Hash::ZERO).is_not_found());
        let mismatch = Error::TypeMismatch {
            hash: Hash::ZERO,
            expected: Kind::Commit,
            found: Kind::Blob,
        };
        assert!(mismatch.is_type_mismatch());
        assert!(!mismatch.is_not_found());
    }
}
