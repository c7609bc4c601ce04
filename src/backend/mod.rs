//! Backend collaborators for the flows.
//!
//! The flows only see two traits: [`AuthSession`] for the identity provider and
//! [`ProfileStore`] for the document store. Implementations are injected into
//! the controllers, so a host can talk to a JSON/HTTP backend
//! ([`HttpIdentity`], [`HttpProfileStore`]) while tests and local runs use the
//! in-memory versions ([`MemoryIdentity`], [`MemoryProfileStore`]).

pub mod identity;
pub mod memory;
pub mod profiles;

pub use self::identity::HttpIdentity;
pub use self::memory::{MemoryIdentity, MemoryProfileStore};
pub use self::profiles::HttpProfileStore;

use crate::{
    error::{AuthError, StorageError},
    flow::{Account, Credentials, ProfileRecord, Session},
};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Identity provider operations used by the flows. Each call completes once;
/// retries and timeouts are left to the implementation.
#[async_trait]
pub trait AuthSession: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError>;

    async fn create_account(&self, credentials: &Credentials) -> Result<Account, AuthError>;
}

/// How a profile write treats an existing document with the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Fields absent from the record are left untouched.
    Merge,
    Overwrite,
}

impl WriteMode {
    #[must_use]
    pub const fn is_merge(self) -> bool {
        matches!(self, Self::Merge)
    }
}

/// Document store operations used by the signup flow.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn save_profile(
        &self,
        key: &str,
        record: &ProfileRecord,
        mode: WriteMode,
    ) -> Result<(), StorageError>;
}

/// Parse and check a backend base URL.
///
/// # Errors
/// Returns an error if the URL does not parse, has no host, or is not HTTP(S).
pub fn base_url(url: &str) -> Result<Url> {
    let url = Url::parse(url.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(anyhow!("Error parsing URL: unsupported scheme {scheme}")),
    }

    if url.host().is_none() {
        return Err(anyhow!("Error parsing URL: no host specified"));
    }

    Ok(url)
}

/// Append path segments to a base URL, keeping any path prefix it already has.
///
/// # Errors
/// Returns an error if the base URL cannot hold path segments.
pub fn endpoint_url(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| anyhow!("Error parsing URL: {base} cannot be a base"))?
        .pop_if_empty()
        .extend(segments);

    debug!("endpoint URL: {}", url);

    Ok(url)
}

/// First entry of the `errors` array in a backend error body.
pub(crate) fn error_message(body: &Value) -> Option<String> {
    body["errors"][0].as_str().map(ToString::to_string)
}
