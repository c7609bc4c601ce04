use crate::{
    backend::{self, AuthSession},
    error::AuthError,
    flow::{Account, Credentials, Session},
    APP_USER_AGENT,
};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::{debug, error, instrument};
use url::Url;

/// Identity provider reached over JSON/HTTP.
///
/// `POST /v1/accounts/sign-in` and `POST /v1/accounts` both take
/// `{"email", "password"}` and answer `{"account_id", "email", "id_token"?}`.
/// Failures answer `{"errors": ["..."]}`.
#[derive(Debug, Clone)]
pub struct HttpIdentity {
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
}

impl HttpIdentity {
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

    fn post(&self, url: Url, credentials: &Credentials) -> RequestBuilder {
        let payload = json!({
            "email": credentials.email,
            "password": credentials.password.expose_secret(),
        });

        let request = self.client.post(url).json(&payload);

        match &self.api_key {
            Some(key) => request.header("X-Api-Key", key.expose_secret()),
            None => request,
        }
    }

    /// Send a credentials request and return the JSON body of a 2xx response.
    async fn send(&self, call: Call, credentials: &Credentials) -> Result<Value, AuthError> {
        let url = backend::endpoint_url(&self.base_url, call.segments())
            .map_err(|e| AuthError::unavailable(e.to_string()))?;

        let response = self
            .post(url.clone(), credentials)
            .send()
            .await
            .map_err(|e| {
                error!("Error reaching identity provider: {}", e);

                AuthError::unavailable(format!("Unable to reach the identity provider: {e}"))
            })?;

        let status = response.status();

        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or_default();
            let message = backend::error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Auth failed").to_string());

            error!("{} - {}, {}", url, status, message);

            return Err(status_error(call, status, message));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::rejected(call.unreadable_body(&e)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    SignIn,
    CreateAccount,
}

impl Call {
    const fn segments(self) -> &'static [&'static str] {
        match self {
            Self::SignIn => &["v1", "accounts", "sign-in"],
            Self::CreateAccount => &["v1", "accounts"],
        }
    }

    // A 2xx from account creation means the account may exist even when the
    // body cannot be read.
    fn unreadable_body(self, err: &reqwest::Error) -> String {
        match self {
            Self::SignIn => format!("Error parsing JSON response: {err}"),
            Self::CreateAccount => format!(
                "Registration may have succeeded but the response could not be read: {err}"
            ),
        }
    }
}

/// Map a failure status to the error kind the flows report.
///
/// 401/403/404 only mean bad credentials on sign-in; on account creation they
/// point at the API key or the base URL.
fn status_error(call: Call, status: StatusCode, message: String) -> AuthError {
    match status {
        StatusCode::CONFLICT => AuthError::duplicate_account(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => match call {
            Call::SignIn => AuthError::invalid_credentials(message),
            Call::CreateAccount => AuthError::rejected(message),
        },
        StatusCode::UNPROCESSABLE_ENTITY => AuthError::weak_password(message),
        status if status.is_server_error() => AuthError::unavailable(message),
        _ => AuthError::rejected(message),
    }
}

fn account_fields(body: &Value) -> Option<(String, String)> {
    let account_id = body["account_id"].as_str().filter(|id| !id.is_empty())?;
    let email = body["email"].as_str().unwrap_or_default();

    Some((account_id.to_string(), email.to_string()))
}

#[async_trait]
impl AuthSession for HttpIdentity {
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let body = self
            .send(Call::SignIn, credentials)
            .await?;

        let (account_id, email) = account_fields(&body)
            .ok_or_else(|| AuthError::rejected("Sign-in succeeded but no account was returned"))?;

        debug!("signed in account {}", account_id);

        Ok(Session {
            account_id,
            email,
            id_token: body["id_token"]
                .as_str()
                .map(|token| SecretString::from(token.to_string())),
        })
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn create_account(&self, credentials: &Credentials) -> Result<Account, AuthError> {
        let body = self.send(Call::CreateAccount, credentials).await?;

        let (account_id, email) = account_fields(&body).ok_or_else(|| {
            AuthError::rejected("Registration succeeded but no account was returned")
        })?;

        debug!("created account {}", account_id);

        Ok(Account { account_id, email })
    }
}
