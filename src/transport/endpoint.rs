use std::path::PathBuf;

use crate::error::{Error, Result};

const NETWORK_SCHEMES: &[&str] = &["http", "https", "ssh", "git"];

/// Where a remote lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// A repository directory on this machine.
    Local(PathBuf),
    /// Anything reached over the network; served by an external transport.
    Network { scheme: String, url: String },
}

impl Endpoint {
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::config("remote URL is empty"));
        }

        if let Some(path) = url.strip_prefix("file://") {
            if path.is_empty() {
                return Err(Error::config(format!("no path in URL: {}", url)));
            }
            return Ok(Endpoint::Local(PathBuf::from(path)));
        }

        if let Some((scheme, rest)) = url.split_once("://") {
            let scheme = scheme.to_ascii_lowercase();
            if !NETWORK_SCHEMES.contains(&scheme.as_str()) {
                return Err(Error::config(format!("unsupported URL scheme: {}", scheme)));
            }
            if rest.is_empty() {
                return Err(Error::config(format!("no host in URL: {}", url)));
            }
            return Ok(Endpoint::Network {
                scheme,
                url: url.to_string(),
            });
        }

        // scp-like syntax: user@host:path
        if let Some((host, _)) = url.split_once(':') {
            if host.contains('@') && !host.contains('/') {
                return Ok(Endpoint::Network {
                    scheme: "ssh".to_string(),
                    url: url.to_string(),
                });
            }
        }

        Ok(Endpoint::Local(PathBuf::from(url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_network() {
        assert_eq!(
            Endpoint::parse("https://github.com/git-fixtures/basic").unwrap(),
            Endpoint::Network {
                scheme: "https".to_string(),
                url: "https://github.com/git-fixtures/basic".to_string()
            }
        );
        assert!(matches!(
            Endpoint::parse("git@github.com:git-fixtures/basic.git").unwrap(),
            Endpoint::Network { scheme, .. } if scheme == "ssh"
        ));
    }

    #[test]
    fn test_parse_local() {
        assert_eq!(
            Endpoint::parse("file:///srv/repo.git").unwrap(),
            Endpoint::Local(PathBuf::from("/srv/repo.git"))
        );
        assert_eq!(
            Endpoint::parse("/srv/repo.git").unwrap(),
            Endpoint::Local(PathBuf::from("/srv/repo.git"))
        );
        assert_eq!(
            Endpoint::parse("../sibling").unwrap(),
            Endpoint::Local(PathBuf::from("../sibling"))
        );
    }

    #[test]
    fn test_parse_invalid() {
        for url in ["", "   ", "ftp://example.com/repo", "file://", "https://"] {
            let err = Endpoint::parse(url).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{:?} should be rejected", url);
        }
    }
}
