//! Account management and API token types.

use serde::Serialize;

use crate::shared::validation::check_non_empty;
use crate::shared::{PostBody, Validate, ValidationError};

/// Request for POST /api/create_account/.
///
/// Registers exchange credentials under a new account name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateAccountRequest {
    pub name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Exchange name, e.g. "Binance"
    pub exchange: String,
    /// Passphrase, for exchanges that require one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subaccount: Option<String>,
}

impl CreateAccountRequest {
    pub fn new(
        name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        exchange: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            exchange: exchange.into(),
            password: None,
            subaccount: None,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_subaccount(mut self, subaccount: impl Into<String>) -> Self {
        self.subaccount = Some(subaccount.into());
        self
    }
}

impl Validate for CreateAccountRequest {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), ValidationError> {
        check_non_empty("name", &self.name)?;
        check_non_empty("api_key", &self.api_key)?;
        check_non_empty("api_secret", &self.api_secret)?;
        check_non_empty("exchange", &self.exchange)
    }
}

impl PostBody for CreateAccountRequest {}

/// Request for POST /api/archive_account/.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveAccountRequest {
    pub name: String,
}

impl ArchiveAccountRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Validate for ArchiveAccountRequest {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), ValidationError> {
        check_non_empty("name", &self.name)
    }
}

impl PostBody for ArchiveAccountRequest {}

/// Request for POST /api/generate_auth_token/.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerateApiAuthTokenRequest {
    /// Label for the new token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl GenerateApiAuthTokenRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl PostBody for GenerateApiAuthTokenRequest {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_account() {
        let request = CreateAccountRequest::new("my_new_account", "key", "secret", "Binance");
        assert!(request.validate().is_ok());
        let body = request.to_post_body().unwrap();
        assert_eq!(body.len(), 4);
        assert!(!body.contains_key("password"));

        let request = CreateAccountRequest::new("my_new_account", "", "secret", "OKX")
            .with_password("pass");
        assert!(request.validate().unwrap_err().message().contains("api_key"));
    }

    #[test]
    fn test_archive_account() {
        assert!(ArchiveAccountRequest::new("old").validate().is_ok());
        assert!(ArchiveAccountRequest::new("").validate().is_err());
    }

    #[test]
    fn test_generate_token_body() {
        assert!(GenerateApiAuthTokenRequest::new()
            .to_post_body()
            .unwrap()
            .is_empty());
        let body = GenerateApiAuthTokenRequest::new()
            .with_name("ci")
            .to_post_body()
            .unwrap();
        assert_eq!(body["name"], "ci");
    }
}
