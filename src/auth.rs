use std::{fmt, sync::Arc};

/// Credentials handed to a transport. Opaque to the core.
pub trait AuthMethod: fmt::Debug + Send + Sync {
    /// Short name of the scheme, for logs.
    fn name(&self) -> &str;
}

/// Shared handle to a credential. Two remotes carry the same credential when
/// `Arc::ptr_eq` holds; contents are never compared.
pub type Auth = Arc<dyn AuthMethod>;

/// HTTP basic authentication.
#[derive(Clone, Default)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl AuthMethod for BasicAuth {
    fn name(&self) -> &str {
        "http-basic-auth"
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let auth = BasicAuth::new("daniel", "hunter2");
        let debug = format!("{:?}", auth);
        assert!(debug.contains("daniel"));
        assert!(!debug.contains("hunter2"));
        assert_eq!(auth.name(), "http-basic-auth");
    }
}
