//! Balance and leverage types for the TaaS REST API.

use serde::Serialize;

use crate::shared::serde_util::{comma_separated, is_none_or_empty};
use crate::shared::validation::{check_pair, check_positive, check_strategy};
use crate::shared::{PostBody, QueryParams, Validate, ValidationError};

/// Query parameters for GET /api/balances/.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GetBalancesRequest {
    /// Restrict to these accounts, sent comma-joined
    #[serde(
        skip_serializing_if = "is_none_or_empty",
        serialize_with = "comma_separated::serialize"
    )]
    pub account_names: Option<Vec<String>>,
}

impl GetBalancesRequest {
    /// Balances of every account.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_accounts<I, S>(account_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            account_names: Some(account_names.into_iter().map(Into::into).collect()),
        }
    }
}

impl QueryParams for GetBalancesRequest {}

/// Request for POST /api/close_balances/.
///
/// Flattens every position whose notional is below `max_notional`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloseBalancesRequest {
    pub max_notional: f64,
    /// Restrict to these accounts; an empty list means all accounts
    #[serde(skip_serializing_if = "is_none_or_empty")]
    pub account_names: Option<Vec<String>>,
    /// Strategy used for the closing orders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_strategy: Option<String>,
}

impl CloseBalancesRequest {
    pub fn new(max_notional: f64) -> Self {
        Self {
            max_notional,
            account_names: None,
            preferred_strategy: None,
        }
    }

    pub fn with_account_names<I, S>(mut self, account_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.account_names = Some(account_names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_preferred_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.preferred_strategy = Some(strategy.into());
        self
    }
}

impl Validate for CloseBalancesRequest {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), ValidationError> {
        check_positive("max_notional", Some(self.max_notional))?;
        if let Some(strategy) = &self.preferred_strategy {
            check_strategy(strategy)?;
        }
        Ok(())
    }
}

impl PostBody for CloseBalancesRequest {}

/// Request for POST /api/set_leverage/.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetLeverageRequest {
    pub accounts: Vec<String>,
    pub pair: String,
    /// Must be at least 1
    pub leverage: u32,
}

impl SetLeverageRequest {
    pub fn new<I, S>(accounts: I, pair: impl Into<String>, leverage: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            accounts: accounts.into_iter().map(Into::into).collect(),
            pair: pair.into(),
            leverage,
        }
    }
}

impl Validate for SetLeverageRequest {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), ValidationError> {
        if self.accounts.is_empty() {
            return Err(ValidationError::new("accounts must not be empty"));
        }
        check_pair(&self.pair)?;
        if self.leverage == 0 {
            return Err(ValidationError::new("leverage must be a positive integer"));
        }
        Ok(())
    }
}

impl PostBody for SetLeverageRequest {}
