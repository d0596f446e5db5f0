use std::fmt;

use crate::auth::{Auth, AuthMethod};
use crate::error::{Error, Result};
use crate::transport::{Endpoint, FetchResponse, LocalTransport, Transport, UnlinkedTransport};

/// A named remote: URL, credentials fixed at construction, and the transport
/// used to fetch from it.
pub struct Remote {
    name: String,
    url: String,
    endpoint: Endpoint,
    auth: Option<Auth>,
    transport: Box<dyn Transport>,
}

impl Remote {
    /// Create a remote with the default transport for its URL: local paths get
    /// a [`LocalTransport`], network URLs an [`UnlinkedTransport`].
    pub fn new(name: &str, url: &str, auth: Option<Auth>) -> Result<Self> {
        let endpoint = Endpoint::parse(url)?;
        let transport: Box<dyn Transport> = match &endpoint {
            Endpoint::Local(path) => Box::new(LocalTransport::new(path)),
            Endpoint::Network { url, .. } => Box::new(UnlinkedTransport::new(url.clone())),
        };
        Self::build(name, url, endpoint, auth, transport)
    }

    pub fn with_transport<T>(name: &str, url: &str, auth: Option<Auth>, transport: T) -> Result<Self>
    where
        T: Transport + 'static,
    {
        let endpoint = Endpoint::parse(url)?;
        Self::build(name, url, endpoint, auth, Box::new(transport))
    }

    fn build(
        name: &str,
        url: &str,
        endpoint: Endpoint,
        auth: Option<Auth>,
        transport: Box<dyn Transport>,
    ) -> Result<Self> {
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(Error::config(format!("invalid remote name: {:?}", name)));
        }
        Ok(Self {
            name: name.to_string(),
            url: url.trim().to_string(),
            endpoint,
            auth,
            transport,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn auth(&self) -> Option<&Auth> {
        self.auth.as_ref()
    }

    /// Replace the transport, e.g. to plug in a network client or a test stub.
    pub fn set_transport<T: Transport + 'static>(&mut self, transport: T) {
        self.transport = Box::new(transport);
    }

    /// Open a fetch of `reference`. The caller owns the returned stream and
    /// must close it.
    pub fn fetch(&mut self, reference: &str) -> Result<FetchResponse> {
        let auth: Option<&dyn AuthMethod> = self.auth.as_deref();
        self.transport.fetch(reference, auth).map_err(Error::Transport)
    }
}

impl fmt::Debug for Remote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Remote")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("auth", &self.auth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::BasicAuth;

    #[test]
    fn test_network_remote_is_unlinked() {
        let mut remote = Remote::new("origin", "https://example.com/repo.git", None).unwrap();
        assert_eq!(remote.name(), "origin");
        assert!(remote.auth().is_none());

        let err = remote.fetch("refs/heads/main").err().unwrap();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[test]
    fn test_auth_identity() {
        let auth: Auth = Arc::new(BasicAuth::new("user", "secret"));
        let remote = Remote::new("origin", "https://example.com/repo.git", Some(auth.clone())).unwrap();

        assert!(Arc::ptr_eq(remote.auth().unwrap(), &auth));
        let other: Auth = Arc::new(BasicAuth::new("user", "secret"));
        assert!(!Arc::ptr_eq(remote.auth().unwrap(), &other));
    }

    #[test]
    fn test_invalid_name() {
        assert!(matches!(
            Remote::new("", "/tmp/repo", None),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Remote::new("my remote", "/tmp/repo", None),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_local_endpoint() {
        let remote = Remote::new("backup", "file:///srv/backup.git", None).unwrap();
        assert_eq!(
            remote.endpoint(),
            &Endpoint::Local(std::path::PathBuf::from("/srv/backup.git"))
        );
    }
}
