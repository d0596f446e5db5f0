use anyhow::Result;

use super::{FetchResponse, Transport};
use crate::auth::AuthMethod;

/// Bound to network remotes until a real transport is installed with
/// `Remote::set_transport`. Every fetch fails.
#[derive(Debug, Clone)]
pub struct UnlinkedTransport {
    url: String,
}

impl UnlinkedTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Transport for UnlinkedTransport {
    fn fetch(&mut self, reference: &str, _auth: Option<&dyn AuthMethod>) -> Result<FetchResponse> {
        anyhow::bail!(
            "No network transport linked for {} (fetching {})",
            self.url,
            reference
        )
    }
}
