//! In-process backends for local runs and tests. They follow the same rules as
//! a hosted provider would: one account per email, a minimum password length,
//! and merge-writes on profile documents.

use crate::{
    backend::{AuthSession, ProfileStore, WriteMode},
    error::{AuthError, StorageError},
    flow::{normalize_email, Account, Credentials, ProfileRecord, Session, MIN_PASSWORD_LENGTH},
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, instrument};
use uuid::Uuid;

#[derive(Debug)]
struct StoredAccount {
    account: Account,
    password: SecretString,
}

#[derive(Debug, Default)]
pub struct MemoryIdentity {
    accounts: Mutex<HashMap<String, StoredAccount>>,
}

impl MemoryIdentity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, email: &str) -> bool {
        self.accounts
            .lock()
            .await
            .contains_key(&normalize_email(email))
    }

    pub async fn len(&self) -> usize {
        self.accounts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.lock().await.is_empty()
    }
}

#[async_trait]
impl AuthSession for MemoryIdentity {
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let accounts = self.accounts.lock().await;

        let stored = accounts
            .get(&normalize_email(&credentials.email))
            .filter(|stored| {
                stored.password.expose_secret() == credentials.password.expose_secret()
            })
            .ok_or_else(|| AuthError::invalid_credentials("The email or password is incorrect."))?;

        Ok(Session {
            account_id: stored.account.account_id.clone(),
            email: stored.account.email.clone(),
            id_token: Some(SecretString::from(Uuid::new_v4().to_string())),
        })
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn create_account(&self, credentials: &Credentials) -> Result<Account, AuthError> {
        if credentials.password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::weak_password(format!(
                "Password should be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let mut accounts = self.accounts.lock().await;
        let key = normalize_email(&credentials.email);

        if accounts.contains_key(&key) {
            return Err(AuthError::duplicate_account(
                "The email address is already in use by another account.",
            ));
        }

        let account = Account {
            account_id: Uuid::new_v4().to_string(),
            email: credentials.email.clone(),
        };

        debug!("created account {}", account.account_id);

        accounts.insert(
            key,
            StoredAccount {
                account: account.clone(),
                password: credentials.password.clone(),
            },
        );

        Ok(account)
    }
}

#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    documents: Mutex<HashMap<String, Map<String, Value>>>,
}

impl MemoryProfileStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw document stored under `key`.
    pub async fn document(&self, key: &str) -> Option<Map<String, Value>> {
        self.documents.lock().await.get(key).cloned()
    }

    /// Stored document decoded as a profile, if it has every profile field.
    pub async fn profile(&self, key: &str) -> Option<ProfileRecord> {
        let document = self.document(key).await?;
        serde_json::from_value(Value::Object(document)).ok()
    }

    /// Insert a raw document, used to seed fields a profile write does not carry.
    pub async fn insert_document(&self, key: &str, document: Map<String, Value>) {
        self.documents.lock().await.insert(key.to_string(), document);
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    #[instrument(skip(self, record))]
    async fn save_profile(
        &self,
        key: &str,
        record: &ProfileRecord,
        mode: WriteMode,
    ) -> Result<(), StorageError> {
        let Value::Object(fields) = serde_json::to_value(record)
            .map_err(|e| StorageError::rejected(format!("Failed to encode profile: {e}")))?
        else {
            return Err(StorageError::rejected("Profile must encode as an object"));
        };

        let mut documents = self.documents.lock().await;

        if mode.is_merge() {
            if let Some(existing) = documents.get_mut(key) {
                existing.extend(fields);
                return Ok(());
            }
        }

        documents.insert(key.to_string(), fields);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthErrorKind;
    use serde_json::json;

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials::new(email, SecretString::from(password.to_string()))
    }

    fn record(name: &str) -> ProfileRecord {
        ProfileRecord {
            name: name.to_string(),
            email: "jo@x.com".to_string(),
            mobile: "123".to_string(),
            created_at: 1,
        }
    }

    #[tokio::test]
    async fn create_then_sign_in() {
        let identity = MemoryIdentity::new();
        assert!(identity.is_empty().await);

        let account = identity
            .create_account(&credentials("JO@X.com", "abcdef"))
            .await
            .expect("account created");
        assert_eq!(account.email, "JO@X.com");
        assert!(identity.contains("jo@x.com").await);

        let session = identity
            .sign_in(&credentials("jo@x.com", "abcdef"))
            .await
            .expect("signed in");
        assert_eq!(session.account_id, account.account_id);
        assert!(session.id_token.is_some());
    }

    #[tokio::test]
    async fn duplicate_email_rejected_case_insensitively() {
        let identity = MemoryIdentity::new();
        identity
            .create_account(&credentials("jo@x.com", "abcdef"))
            .await
            .expect("account created");

        let err = identity
            .create_account(&credentials("JO@X.COM", "ghijkl"))
            .await
            .expect_err("duplicate");
        assert_eq!(err.kind, AuthErrorKind::DuplicateAccount);
        assert_eq!(identity.len().await, 1);
    }

    #[tokio::test]
    async fn weak_password_rejected() {
        let identity = MemoryIdentity::new();
        let err = identity
            .create_account(&credentials("jo@x.com", "abc"))
            .await
            .expect_err("weak password");
        assert_eq!(err.kind, AuthErrorKind::WeakPassword);
        assert!(identity.is_empty().await);
    }

    #[tokio::test]
    async fn wrong_password_or_unknown_email_rejected() {
        let identity = MemoryIdentity::new();
        identity
            .create_account(&credentials("jo@x.com", "abcdef"))
            .await
            .expect("account created");

        for creds in [
            credentials("jo@x.com", "abcdeg"),
            credentials("nobody@x.com", "abcdef"),
        ] {
            let err = identity.sign_in(&creds).await.expect_err("rejected");
            assert_eq!(err.kind, AuthErrorKind::InvalidCredentials);
        }
    }

    #[tokio::test]
    async fn merge_keeps_existing_fields() {
        let store = MemoryProfileStore::new();
        let mut seeded = Map::new();
        seeded.insert("name".to_string(), json!("Old"));
        seeded.insert("avatar".to_string(), json!("a.png"));
        store.insert_document("jo@x.com", seeded).await;

        store
            .save_profile("jo@x.com", &record("Jo"), WriteMode::Merge)
            .await
            .expect("saved");

        let document = store.document("jo@x.com").await.expect("document");
        assert_eq!(document.get("name"), Some(&json!("Jo")));
        assert_eq!(document.get("avatar"), Some(&json!("a.png")));
        assert_eq!(store.profile("jo@x.com").await, Some(record("Jo")));
    }

    #[tokio::test]
    async fn overwrite_replaces_document() {
        let store = MemoryProfileStore::new();
        let mut seeded = Map::new();
        seeded.insert("avatar".to_string(), json!("a.png"));
        store.insert_document("jo@x.com", seeded).await;

        store
            .save_profile("jo@x.com", &record("Jo"), WriteMode::Overwrite)
            .await
            .expect("saved");

        let document = store.document("jo@x.com").await.expect("document");
        assert!(document.get("avatar").is_none());
        assert!(document.get("password").is_none());
    }
}
