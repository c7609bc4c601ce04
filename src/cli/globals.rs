use secrecy::SecretString;

/// Backend settings shared by every action.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub identity_url: String,
    pub profile_url: String,
    pub api_key: Option<SecretString>,
}

impl GlobalArgs {
    /// Profiles live next to the identity provider unless told otherwise.
    #[must_use]
    pub fn new(identity_url: String) -> Self {
        Self {
            profile_url: identity_url.clone(),
            identity_url,
            api_key: None,
        }
    }

    pub fn set_profile_url(&mut self, url: String) {
        self.profile_url = url;
    }

    pub fn set_api_key(&mut self, key: SecretString) {
        self.api_key = Some(key);
    }
}
