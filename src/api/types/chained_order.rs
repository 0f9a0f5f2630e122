//! Chained-order types: legs executed one after another by priority.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::api::types::multi_order::{validate_leg, LegGroupTuning};
use crate::shared::{PostBody, Validate, ValidationError, ValidationErrors};

/// Minimum number of legs in a chain.
pub const MIN_CHAIN_LENGTH: usize = 2;

/// One leg of a [`PlaceChainedOrderRequest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderInChain {
    pub pair: String,
    pub side: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_asset_qty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_asset_qty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_side: Option<String>,
    /// Execution order, 1 runs first. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}

impl OrderInChain {
    pub fn new(pair: impl Into<String>, side: impl Into<String>, priority: u32) -> Self {
        Self {
            pair: pair.into(),
            side: side.into(),
            base_asset_qty: None,
            quote_asset_qty: None,
            pos_side: None,
            priority: Some(priority),
        }
    }

    pub fn with_base_asset_qty(mut self, qty: f64) -> Self {
        self.base_asset_qty = Some(qty);
        self
    }

    pub fn with_quote_asset_qty(mut self, qty: f64) -> Self {
        self.quote_asset_qty = Some(qty);
        self
    }

    pub fn with_pos_side(mut self, pos_side: impl Into<String>) -> Self {
        self.pos_side = Some(pos_side.into());
        self
    }
}

impl Validate for OrderInChain {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), ValidationError> {
        validate_leg(
            &self.pair,
            &self.side,
            self.base_asset_qty,
            self.quote_asset_qty,
            self.pos_side.as_deref(),
        )?;

        match self.priority {
            None => Err(ValidationError::new("priority is required for orders in chain")),
            Some(0) => Err(ValidationError::new("priority must be a positive integer")),
            Some(_) => Ok(()),
        }
    }
}

/// Request for POST /api/chained_orders/.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceChainedOrderRequest {
    pub accounts: Vec<String>,
    /// Execution horizon in seconds
    pub duration: u64,
    pub strategy: String,
    /// At least two legs
    pub orders_in_chain: Vec<OrderInChain>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_passiveness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_discretion: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha_tilt: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy_params: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure_tolerance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_order_id: Option<String>,
}

impl PlaceChainedOrderRequest {
    pub fn new<I, S>(
        accounts: I,
        duration: u64,
        strategy: impl Into<String>,
        orders_in_chain: Vec<OrderInChain>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            accounts: accounts.into_iter().map(Into::into).collect(),
            duration,
            strategy: strategy.into(),
            orders_in_chain,
            engine_passiveness: None,
            schedule_discretion: None,
            alpha_tilt: None,
            strategy_params: None,
            exposure_tolerance: None,
            notes: None,
            custom_order_id: None,
        }
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

    pub fn with_strategy_params(mut self, params: Map<String, Value>) -> Self {
        self.strategy_params = Some(params);
        self
    }

    pub fn with_exposure_tolerance(mut self, value: f64) -> Self {
        self.exposure_tolerance = Some(value);
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
}

impl Validate for PlaceChainedOrderRequest {
    type Error = ValidationErrors;

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.orders_in_chain.is_empty() {
            errors.push("No orders in chain declared!");
        } else if self.orders_in_chain.len() < MIN_CHAIN_LENGTH {
            errors.push(format!(
                "orders_in_chain needs at least {} orders, got {}",
                MIN_CHAIN_LENGTH,
                self.orders_in_chain.len()
            ));
        }

        LegGroupTuning {
            strategy: &self.strategy,
            engine_passiveness: self.engine_passiveness,
            schedule_discretion: self.schedule_discretion,
            alpha_tilt: self.alpha_tilt,
            exposure_tolerance: self.exposure_tolerance,
        }
        .collect_errors(&mut errors);

        for (i, order) in self.orders_in_chain.iter().enumerate() {
            errors.collect_nested(&format!("orders_in_chain[{}]", i), order.validate());
        }

        errors.into_result()
    }
}

impl PostBody for PlaceChainedOrderRequest {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chain() -> Vec<OrderInChain> {
        vec![
            OrderInChain::new("ETH:PERP-USDT", "sell", 1).with_base_asset_qty(10.0),
            OrderInChain::new("ETH-USDT", "buy", 2).with_base_asset_qty(10.0),
        ]
    }

    fn build_chained_order(orders_in_chain: Vec<OrderInChain>) -> PlaceChainedOrderRequest {
        PlaceChainedOrderRequest::new(["mock"], 300, "TWAP", orders_in_chain)
    }

    #[test]
    fn test_order_in_chain_validate() {
        let order = OrderInChain::new("ETH-USDT", "sell", 1).with_base_asset_qty(10.0);
        assert!(order.validate().is_ok());

        let order = OrderInChain::new("ETHUSDT", "sell", 1).with_base_asset_qty(10.0);
        assert!(order.validate().unwrap_err().message().contains("pair"));

        let order = OrderInChain::new("ETH-USDT", "barter", 1).with_base_asset_qty(10.0);
        assert!(order.validate().unwrap_err().message().contains("side"));
    }

    #[test]
    fn test_order_in_chain_rejects_non_finite_qty() {
        for qty in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let order = OrderInChain::new("ETH-USDT", "sell", 1).with_base_asset_qty(qty);
            assert_eq!(
                order.validate().unwrap_err().message(),
                "base_asset_qty must be a positive finite value"
            );
        }
    }

    #[test]
    fn test_order_in_chain_priority() {
        let mut order = OrderInChain::new("ETH-USDT", "sell", 1).with_base_asset_qty(10.0);
        order.priority = None;
        assert!(order.validate().unwrap_err().message().contains("priority"));

        let order = OrderInChain::new("ETH-USDT", "sell", 0).with_base_asset_qty(10.0);
        assert!(order.validate().unwrap_err().message().contains("priority"));
    }

    #[test]
    fn test_validate_success() {
        assert!(build_chained_order(chain()).validate().is_ok());

        let request = build_chained_order(chain())
            .with_engine_passiveness(0.5)
            .with_schedule_discretion(0.1)
            .with_strategy_params(Map::from_iter([("reduce_only".to_string(), json!(true))]))
            .with_exposure_tolerance(0.3);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validate_fail_too_few_legs() {
        let errors = build_chained_order(vec![]).validate().unwrap_err();
        assert!(errors.0[0].contains("No orders in chain"));

        let single = vec![OrderInChain::new("ETH-USDT", "buy", 1).with_base_asset_qty(10.0)];
        let errors = build_chained_order(single).validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.0[0].contains("at least 2"));
    }

    #[test]
    fn test_validate_fail_bad_priority_in_chain() {
        let mut legs = chain();
        legs[1].priority = Some(0);
        let errors = build_chained_order(legs).validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.0[0].starts_with("orders_in_chain[1]: priority"));
    }

    #[test]
    fn test_validate_fail_top_level_fields() {
        let request = build_chained_order(chain()).with_exposure_tolerance(1.5);
        let errors = request.validate().unwrap_err();
        assert!(errors.0[0].contains("exposure_tolerance"));

        let request = build_chained_order(chain()).with_exposure_tolerance(0.01);
        assert!(request.validate().is_err());

        let request = build_chained_order(chain()).with_alpha_tilt(-2.0);
        assert!(request.validate().unwrap_err().0[0].contains("alpha_tilt"));

        let mut request = build_chained_order(chain());
        request.strategy = "INVALID".to_string();
        assert!(request.validate().unwrap_err().0[0].contains("strategy"));
    }

    #[test]
    fn test_to_post_body() {
        let body = build_chained_order(chain())
            .with_engine_passiveness(0.5)
            .with_schedule_discretion(0.1)
            .with_strategy_params(Map::from_iter([("reduce_only".to_string(), json!(true))]))
            .with_exposure_tolerance(0.3)
            .to_post_body()
            .unwrap();

        assert_eq!(body["accounts"], json!(["mock"]));
        assert_eq!(body["duration"], json!(300));
        assert_eq!(body["strategy"], json!("TWAP"));
        assert_eq!(body["engine_passiveness"].as_f64(), Some(0.5));
        assert_eq!(body["strategy_params"], json!({"reduce_only": true}));
        assert!(!body.contains_key("alpha_tilt"));

        let legs = body["orders_in_chain"].as_array().unwrap();
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0]["pair"], json!("ETH:PERP-USDT"));
        assert_eq!(legs[0]["side"], json!("sell"));
        assert_eq!(legs[0]["base_asset_qty"].as_f64(), Some(10.0));
        assert_eq!(legs[0]["priority"], json!(1));
        assert_eq!(legs[1]["priority"], json!(2));
    }
}
