//! Order-related types for the TaaS REST API.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::shared::serde_util::comma_separated;
use crate::shared::validation::{
    check_exactly_one, check_finite, check_non_empty, check_pair, check_pos_side, check_positive,
    check_side, check_strategy, ALPHA_TILT, ENGINE_PASSIVENESS, POV_RATIO, SCHEDULE_DISCRETION,
};
use crate::shared::{OrderStatus, PostBody, QueryParams, Validate, ValidationError};

/// Request for POST /api/orders/.
///
/// Exactly one of `sell_token_amount`, `base_asset_qty` or `quote_asset_qty`
/// must be set. Everything else beyond the five required fields is optional
/// and omitted from the body when unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceOrderRequest {
    /// Account names to execute on
    pub accounts: Vec<String>,
    /// Trading pair, `BASE-QUOTE` or `BASE:VARIANT-QUOTE`
    pub pair: String,
    /// "buy" or "sell"
    pub side: String,
    /// Execution horizon in seconds
    pub duration: u64,
    /// Strategy name ("TWAP", "VWAP", ...)
    pub strategy: String,
    /// Amount of the token being sold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sell_token_amount: Option<f64>,
    /// Quantity in base asset units
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_asset_qty: Option<f64>,
    /// Quantity in quote asset units
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_asset_qty: Option<f64>,
    /// [0,1]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_passiveness: Option<f64>,
    /// [0,1]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_discretion: Option<f64>,
    /// [-1,1]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha_tilt: Option<f64>,
    /// Condition expression gating execution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_condition: Option<String>,
    /// Expiry of `order_condition`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_condition_expiry: Option<String>,
    /// Max participation of volume, (0,1]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pov_limit: Option<f64>,
    /// Target participation of volume, (0,1]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pov_target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<f64>,
    /// Free-form strategy parameters, passed through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy_params: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_order_id: Option<String>,
    /// Leverage to set on the account before executing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_leverage: Option<u32>,
    /// Max notional routed to OTC
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_otc: Option<f64>,
    /// "long" or "short"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_side: Option<String>,
    /// Scheduled start (milliseconds since epoch)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<i64>,
    /// Scheduled end (milliseconds since epoch)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<i64>,
}

impl PlaceOrderRequest {
    /// Create a request with the required fields and no quantity.
    pub fn new<I, S>(
        accounts: I,
        pair: impl Into<String>,
        side: impl Into<String>,
        duration: u64,
        strategy: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            accounts: accounts.into_iter().map(Into::into).collect(),
            pair: pair.into(),
            side: side.into(),
            duration,
            strategy: strategy.into(),
            sell_token_amount: None,
            base_asset_qty: None,
            quote_asset_qty: None,
            engine_passiveness: None,
            schedule_discretion: None,
            alpha_tilt: None,
            order_condition: None,
            order_condition_expiry: None,
            pov_limit: None,
            pov_target: None,
            limit_price: None,
            strategy_params: None,
            notes: None,
            custom_order_id: None,
            updated_leverage: None,
            max_otc: None,
            pos_side: None,
            time_start: None,
            time_end: None,
        }
    }

    pub fn with_sell_token_amount(mut self, amount: f64) -> Self {
        self.sell_token_amount = Some(amount);
        self
    }

    pub fn with_base_asset_qty(mut self, qty: f64) -> Self {
        self.base_asset_qty = Some(qty);
        self
    }

    pub fn with_quote_asset_qty(mut self, qty: f64) -> Self {
        self.quote_asset_qty = Some(qty);
        self
    }

    pub fn with_engine_passiveness(mut self, value: f64) -> Self {
        self.engine_passiveness = Some(value);
        self
    }

    pub fn with_schedule_discretion(mut self, value: f64) -> Self {
        self.schedule_discretion = Some(value);
        self
    }

    pub fn with_alpha_tilt(mut self, value: f64) -> Self {
        self.alpha_tilt = Some(value);
        self
    }

    /// Gate execution on a condition, optionally until `expiry`.
    pub fn with_order_condition(
        mut self,
        condition: impl Into<String>,
        expiry: Option<String>,
    ) -> Self {
        self.order_condition = Some(condition.into());
        self.order_condition_expiry = expiry;
        self
    }

    pub fn with_pov_limit(mut self, value: f64) -> Self {
        self.pov_limit = Some(value);
        self
    }

    pub fn with_pov_target(mut self, value: f64) -> Self {
        self.pov_target = Some(value);
        self
    }

    pub fn with_limit_price(mut self, price: f64) -> Self {
        self.limit_price = Some(price);
        self
    }

    pub fn with_strategy_params(mut self, params: Map<String, Value>) -> Self {
        self.strategy_params = Some(params);
        self
    }

    /// Add one strategy parameter, creating the map if needed.
    pub fn with_strategy_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.strategy_params
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_custom_order_id(mut self, id: impl Into<String>) -> Self {
        self.custom_order_id = Some(id.into());
        self
    }

    pub fn with_updated_leverage(mut self, leverage: u32) -> Self {
        self.updated_leverage = Some(leverage);
        self
    }

    pub fn with_max_otc(mut self, value: f64) -> Self {
        self.max_otc = Some(value);
        self
    }

    pub fn with_pos_side(mut self, pos_side: impl Into<String>) -> Self {
        self.pos_side = Some(pos_side.into());
        self
    }

    /// Set the scheduled window (milliseconds since epoch).
    pub fn with_time_range(mut self, start_ms: i64, end_ms: i64) -> Self {
        self.time_start = Some(start_ms);
        self.time_end = Some(end_ms);
        self
    }
}

impl Validate for PlaceOrderRequest {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), ValidationError> {
        check_side(&self.side)?;
        check_strategy(&self.strategy)?;
        check_pair(&self.pair)?;
        check_exactly_one(&[
            ("sell_token_amount", self.sell_token_amount),
            ("base_asset_qty", self.base_asset_qty),
            ("quote_asset_qty", self.quote_asset_qty),
        ])?;
        check_pos_side(self.pos_side.as_deref())?;
        ENGINE_PASSIVENESS.check("engine_passiveness", self.engine_passiveness)?;
        SCHEDULE_DISCRETION.check("schedule_discretion", self.schedule_discretion)?;
        ALPHA_TILT.check("alpha_tilt", self.alpha_tilt)?;
        POV_RATIO.check("pov_limit", self.pov_limit)?;
        POV_RATIO.check("pov_target", self.pov_target)?;
        check_finite("limit_price", self.limit_price)?;
        check_positive("max_otc", self.max_otc)?;

        if self.updated_leverage == Some(0) {
            return Err(ValidationError::new(
                "updated_leverage must be a positive integer",
            ));
        }

        if let (Some(start), Some(end)) = (self.time_start, self.time_end) {
            if end <= start {
                return Err(ValidationError::new("time_end must be after time_start"));
            }
        }

        Ok(())
    }
}

impl PostBody for PlaceOrderRequest {}

/// Cancellation target for DELETE /api/order/{order_id}.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CancelOrderRequest {
    pub order_id: String,
}

impl CancelOrderRequest {
    pub fn new(order_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
        }
    }
}

impl Validate for CancelOrderRequest {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), ValidationError> {
        check_non_empty("order_id", &self.order_id)
    }
}

/// Request for POST /api/amend_order/.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmendOrderRequest {
    pub order_id: String,
    /// Field name → new value, e.g. `{"base_asset_qty": 100, "duration": 3600}`
    pub changes: Map<String, Value>,
}

impl AmendOrderRequest {
    pub fn new(order_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            changes: Map::new(),
        }
    }

    /// Add one field change.
    pub fn with_change(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.changes.insert(field.into(), value.into());
        self
    }
}

impl Validate for AmendOrderRequest {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), ValidationError> {
        check_non_empty("order_id", &self.order_id)?;
        if self.changes.is_empty() {
            return Err(ValidationError::new("changes must not be empty"));
        }
        Ok(())
    }
}

impl PostBody for AmendOrderRequest {}

/// Request for POST /api/order_messages/.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetOrderMessagesRequest {
    pub order_ids: Vec<String>,
}

impl GetOrderMessagesRequest {
    pub fn new<I, S>(order_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            order_ids: order_ids.into_iter().map(Into::into).collect(),
        }
    }
}

impl PostBody for GetOrderMessagesRequest {}

/// Query parameters for GET /api/orders/.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GetOrderRequest {
    /// Status filter, sent comma-joined
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "comma_separated::serialize"
    )]
    pub statuses: Option<Vec<String>>,
    /// Only orders created before this ISO 8601 timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    /// Only orders created after this ISO 8601 timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl GetOrderRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = OrderStatus>) -> Self {
        self.statuses = Some(statuses.into_iter().map(String::from).collect());
        self
    }

    pub fn with_before(mut self, before: impl Into<String>) -> Self {
        self.before = Some(before.into());
        self
    }

    pub fn with_after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    pub fn with_page(mut self, page: u32, page_size: u32) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }
}

impl QueryParams for GetOrderRequest {}

/// Query parameters for GET /api/orders_with_stats/.
pub type GetOrdersWithStatsRequest = GetOrderRequest;
