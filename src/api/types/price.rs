//! Price subscription and L2 order book types.

use serde::Serialize;

use crate::shared::serde_util::comma_separated;
use crate::shared::validation::{check_non_empty, check_pair};
use crate::shared::{PostBody, QueryParams, Validate, ValidationError};

/// Request for POST /api/price_subscribe/.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceSubscribeRequest {
    pub pair: String,
    pub exchange: String,
}

impl PriceSubscribeRequest {
    pub fn new(pair: impl Into<String>, exchange: impl Into<String>) -> Self {
        Self {
            pair: pair.into(),
            exchange: exchange.into(),
        }
    }
}

/// Request for POST /api/price_unsubscribe/.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceUnsubscribeRequest {
    pub pair: String,
    pub exchange: String,
}

impl PriceUnsubscribeRequest {
    pub fn new(pair: impl Into<String>, exchange: impl Into<String>) -> Self {
        Self {
            pair: pair.into(),
            exchange: exchange.into(),
        }
    }
}

fn validate_subscription(pair: &str, exchange: &str) -> Result<(), ValidationError> {
    check_pair(pair)?;
    check_non_empty("exchange", exchange)
}

impl Validate for PriceSubscribeRequest {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), ValidationError> {
        validate_subscription(&self.pair, &self.exchange)
    }
}

impl Validate for PriceUnsubscribeRequest {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), ValidationError> {
        validate_subscription(&self.pair, &self.exchange)
    }
}

impl PostBody for PriceSubscribeRequest {}
impl PostBody for PriceUnsubscribeRequest {}

/// Query parameters for GET /api/l2_prices/.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetL2PricesRequest {
    pub pair: String,
    /// Exchanges to read books from, sent comma-joined
    #[serde(serialize_with = "comma_separated::serialize_vec")]
    pub exchanges: Vec<String>,
    /// Depth per side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_levels: Option<u32>,
}

impl GetL2PricesRequest {
    pub fn new<I, S>(pair: impl Into<String>, exchanges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pair: pair.into(),
            exchanges: exchanges.into_iter().map(Into::into).collect(),
            max_levels: None,
        }
    }

    pub fn with_max_levels(mut self, max_levels: u32) -> Self {
        self.max_levels = Some(max_levels);
        self
    }
}

impl Validate for GetL2PricesRequest {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), ValidationError> {
        check_pair(&self.pair)?;
        if self.exchanges.is_empty() {
            return Err(ValidationError::new("exchanges must not be empty"));
        }
        for exchange in &self.exchanges {
            check_non_empty("exchange", exchange)?;
        }
        if self.max_levels == Some(0) {
            return Err(ValidationError::new("max_levels must be a positive integer"));
        }
        Ok(())
    }
}

impl QueryParams for GetL2PricesRequest {}

/// Query parameters for GET /api/combined_l2_prices/.
///
/// Same shape as [`GetL2PricesRequest`]; the service merges the books of all
/// listed exchanges into one.
pub type GetCombinedL2PricesRequest = GetL2PricesRequest;
