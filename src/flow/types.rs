//! Inputs and results of the two flows. Passwords are kept in `SecretString`
//! so they stay out of `Debug` output and logs; nothing here is persisted
//! except `ProfileRecord`.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Email and password captured for a single sign-in or account creation.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }
}

/// Raw signup form input as typed by the user.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

impl RegistrationForm {
    /// Trims the free-text fields; passwords are kept exactly as entered.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            mobile: self.mobile.trim().to_string(),
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
        }
    }

    pub(crate) fn credentials(&self) -> Credentials {
        Credentials::new(self.email.clone(), self.password.clone())
    }

    pub(crate) fn passwords_match(&self) -> bool {
        self.password.expose_secret() == self.confirm_password.expose_secret()
    }
}

/// Profile document written once per registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub name: String,
    pub email: String,
    pub mobile: String,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl ProfileRecord {
    #[must_use]
    pub fn from_form(form: &RegistrationForm, created_at: i64) -> Self {
        Self {
            name: form.name.clone(),
            email: normalize_email(&form.email),
            mobile: form.mobile.clone(),
            created_at,
        }
    }

    /// Store key for this record, the lower-cased email.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.email
    }
}

/// Account returned by the identity provider after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: String,
    pub email: String,
}

/// Authenticated session returned by a successful sign-in.
#[derive(Debug, Clone)]
pub struct Session {
    pub account_id: String,
    pub email: String,
    pub id_token: Option<SecretString>,
}

/// Normalize an email for keys and uniqueness checks.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RegistrationForm {
        RegistrationForm {
            name: "  Jo ".to_string(),
            email: " JO@X.com ".to_string(),
            mobile: " 123 ".to_string(),
            password: SecretString::from(" abcdef ".to_string()),
            confirm_password: SecretString::from(" abcdef ".to_string()),
        }
    }

    #[test]
    fn trimmed_keeps_passwords_verbatim() {
        let trimmed = form().trimmed();
        assert_eq!(trimmed.name, "Jo");
        assert_eq!(trimmed.email, "JO@X.com");
        assert_eq!(trimmed.mobile, "123");
        assert_eq!(trimmed.password.expose_secret(), " abcdef ");
        assert!(trimmed.passwords_match());
    }

    #[test]
    fn profile_record_lowercases_email_and_omits_password() {
        let record = ProfileRecord::from_form(&form().trimmed(), 1_700_000_000_000);
        assert_eq!(record.key(), "jo@x.com");

        let json = serde_json::to_value(&record).expect("Failed to serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Jo",
                "email": "jo@x.com",
                "mobile": "123",
                "createdAt": 1_700_000_000_000_i64,
            })
        );
        assert!(json.get("password").is_none());
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let creds = Credentials::new("a@b.com", SecretString::from("secret1".to_string()));
        assert!(!format!("{creds:?}").contains("secret1"));
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Alice@Example.COM "), "alice@example.com");
    }
}
