use crate::{
    backend::{self, ProfileStore, WriteMode},
    error::StorageError,
    flow::ProfileRecord,
    APP_USER_AGENT,
};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, error, instrument};
use url::Url;

/// Profile documents stored over JSON/HTTP at `PATCH /v1/profiles/{key}?merge=`.
#[derive(Debug, Clone)]
pub struct HttpProfileStore {
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
}

impl HttpProfileStore {
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: Option<SecretString>) -> Result<Self> {
        let client = Client::builder().user_agent(APP_USER_AGENT).build()?;

        Ok(Self {
            client,
            base_url: backend::base_url(base_url)?,
            api_key,
        })
    }
}

#[async_trait]
impl ProfileStore for HttpProfileStore {
    #[instrument(skip(self, record))]
    async fn save_profile(
        &self,
        key: &str,
        record: &ProfileRecord,
        mode: WriteMode,
    ) -> Result<(), StorageError> {
        let mut url = backend::endpoint_url(&self.base_url, &["v1", "profiles", key])
            .map_err(|e| StorageError::rejected(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("merge", if mode.is_merge() { "true" } else { "false" });

        let mut request = self.client.patch(url.clone()).json(record);
        if let Some(api_key) = &self.api_key {
            request = request.header("X-Api-Key", api_key.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            error!("Error reaching profile store: {}", e);

            StorageError::unavailable(format!("Unable to reach the profile store: {e}"))
        })?;

        let status = response.status();

        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or_default();
            let message = backend::error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Save failed").to_string());

            error!("{} - {}, {}", url, status, message);

            return Err(if status.is_server_error() {
                StorageError::unavailable(message)
            } else {
                StorageError::rejected(message)
            });
        }

        debug!("profile saved");

        Ok(())
    }
}
