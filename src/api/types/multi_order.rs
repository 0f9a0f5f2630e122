//! Multi-order types: several legs executed concurrently under one strategy.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::shared::validation::{
    check_exactly_one, check_pair, check_pos_side, check_side, check_strategy, ALPHA_TILT,
    ENGINE_PASSIVENESS, EXPOSURE_TOLERANCE, SCHEDULE_DISCRETION,
};
use crate::shared::{PostBody, Validate, ValidationError, ValidationErrors};

/// One leg of a [`PlaceMultiOrderRequest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildOrder {
    pub pair: String,
    pub side: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_asset_qty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_asset_qty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_side: Option<String>,
}

impl ChildOrder {
    pub fn new(pair: impl Into<String>, side: impl Into<String>) -> Self {
        Self {
            pair: pair.into(),
            side: side.into(),
            base_asset_qty: None,
            quote_asset_qty: None,
            pos_side: None,
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

impl Validate for ChildOrder {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), ValidationError> {
        validate_leg(
            &self.pair,
            &self.side,
            self.base_asset_qty,
            self.quote_asset_qty,
            self.pos_side.as_deref(),
        )
    }
}

/// Rules shared by multi-order and chained-order legs.
pub(crate) fn validate_leg(
    pair: &str,
    side: &str,
    base_asset_qty: Option<f64>,
    quote_asset_qty: Option<f64>,
    pos_side: Option<&str>,
) -> Result<(), ValidationError> {
    check_side(side)?;
    check_pair(pair)?;
    check_exactly_one(&[
        ("base_asset_qty", base_asset_qty),
        ("quote_asset_qty", quote_asset_qty),
    ])?;
    check_pos_side(pos_side)
}

/// Top-level tuning parameters shared by multi-order and chained-order requests.
pub(crate) struct LegGroupTuning<'a> {
    pub strategy: &'a str,
    pub engine_passiveness: Option<f64>,
    pub schedule_discretion: Option<f64>,
    pub alpha_tilt: Option<f64>,
    pub exposure_tolerance: Option<f64>,
}

impl LegGroupTuning<'_> {
    pub(crate) fn collect_errors(&self, errors: &mut ValidationErrors) {
        errors.collect(check_strategy(self.strategy));
        errors.collect(ENGINE_PASSIVENESS.check("engine_passiveness", self.engine_passiveness));
        errors.collect(SCHEDULE_DISCRETION.check("schedule_discretion", self.schedule_discretion));
        errors.collect(ALPHA_TILT.check("alpha_tilt", self.alpha_tilt));
        errors.collect(EXPOSURE_TOLERANCE.check("exposure_tolerance", self.exposure_tolerance));
    }
}

/// Request for POST /api/multi_orders/.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceMultiOrderRequest {
    pub accounts: Vec<String>,
    /// Execution horizon in seconds
    pub duration: u64,
    pub strategy: String,
    /// Legs, in declaration order (must not be empty)
    pub child_orders: Vec<ChildOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_passiveness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_discretion: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha_tilt: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_condition_expiry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy_params: Option<Map<String, Value>>,
    /// How far leg exposures may drift apart, [0.1,1]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure_tolerance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_order_id: Option<String>,
}

impl PlaceMultiOrderRequest {
    pub fn new<I, S>(
        accounts: I,
        duration: u64,
        strategy: impl Into<String>,
        child_orders: Vec<ChildOrder>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            accounts: accounts.into_iter().map(Into::into).collect(),
            duration,
            strategy: strategy.into(),
            child_orders,
            engine_passiveness: None,
            schedule_discretion: None,
            alpha_tilt: None,
            order_condition: None,
            order_condition_expiry: None,
            strategy_params: None,
            exposure_tolerance: None,
            notes: None,
            custom_order_id: None,
        }
    }

    pub fn with_child_order(mut self, order: ChildOrder) -> Self {
        self.child_orders.push(order);
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

    pub fn with_order_condition(
        mut self,
        condition: impl Into<String>,
        expiry: Option<String>,
    ) -> Self {
        self.order_condition = Some(condition.into());
        self.order_condition_expiry = expiry;
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

impl Validate for PlaceMultiOrderRequest {
    type Error = ValidationErrors;

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.child_orders.is_empty() {
            errors.push("No child orders declared!");
        }

        LegGroupTuning {
            strategy: &self.strategy,
            engine_passiveness: self.engine_passiveness,
            schedule_discretion: self.schedule_discretion,
            alpha_tilt: self.alpha_tilt,
            exposure_tolerance: self.exposure_tolerance,
        }
        .collect_errors(&mut errors);

        for (i, order) in self.child_orders.iter().enumerate() {
            errors.collect_nested(&format!("child_orders[{}]", i), order.validate());
        }

        errors.into_result()
    }
}

impl PostBody for PlaceMultiOrderRequest {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn legs() -> Vec<ChildOrder> {
        vec![
            ChildOrder::new("ETH:PERP-USDT", "sell").with_base_asset_qty(10.0),
            ChildOrder::new("ETH-USDT", "buy").with_base_asset_qty(10.0),
        ]
    }

    fn build_multi_order(child_orders: Vec<ChildOrder>) -> PlaceMultiOrderRequest {
        PlaceMultiOrderRequest::new(["mock"], 300, "TWAP", child_orders)
    }

    fn first_error(request: &PlaceMultiOrderRequest) -> String {
        request.validate().unwrap_err().0[0].clone()
    }

    #[test]
    fn test_child_order_validate() {
        let order = ChildOrder::new("ETH-USDT", "sell").with_base_asset_qty(10.0);
        assert!(order.validate().is_ok());

        let order = ChildOrder::new("ETHUSDT", "sell").with_base_asset_qty(10.0);
        assert!(order.validate().unwrap_err().message().contains("pair"));

        let order = ChildOrder::new("ETH-USDT", "barter").with_base_asset_qty(10.0);
        assert!(order.validate().unwrap_err().message().contains("side"));

        let order = ChildOrder::new("ETH-USDT", "sell");
        assert!(order.validate().unwrap_err().message().contains("base_asset_qty"));
    }

    #[test]
    fn test_child_order_rejects_non_finite_qty() {
        let order = ChildOrder::new("ETH-USDT", "sell").with_base_asset_qty(f64::NAN);
        assert_eq!(
            order.validate().unwrap_err().message(),
            "base_asset_qty must be a positive finite value"
        );
        let order = ChildOrder::new("ETH-USDT", "sell").with_quote_asset_qty(f64::INFINITY);
        assert!(order.validate().unwrap_err().message().contains("quote_asset_qty"));

        let request = build_multi_order(vec![
            ChildOrder::new("ETH-USDT", "buy").with_base_asset_qty(10.0),
            ChildOrder::new("BTC-USDT", "sell").with_base_asset_qty(f64::NAN),
        ]);
        assert_eq!(
            first_error(&request),
            "child_orders[1]: base_asset_qty must be a positive finite value"
        );
    }

    #[test]
    fn test_validate_success() {
        assert!(build_multi_order(legs()).validate().is_ok());
    }

    #[test]
    fn test_validate_success_all_fields() {
        let request = build_multi_order(legs())
            .with_strategy_params(Map::from_iter([("passive_only".to_string(), json!(true))]))
            .with_engine_passiveness(0.1)
            .with_schedule_discretion(0.1)
            .with_alpha_tilt(-0.3)
            .with_exposure_tolerance(0.1);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validate_accepts_upper_and_lower_edges() {
        let request = build_multi_order(legs())
            .with_schedule_discretion(0.0)
            .with_exposure_tolerance(1.0);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validate_fail_no_orders() {
        let errors = build_multi_order(vec![]).validate().unwrap_err();
        assert!(!errors.is_empty());
        assert!(errors.0[0].contains("No child orders"));
    }

    #[test]
    fn test_validate_fail_top_level_fields() {
        let mut request = build_multi_order(legs());
        request.strategy = "ABCD".to_string();
        assert!(first_error(&request).contains("strategy"));

        let request = build_multi_order(legs()).with_engine_passiveness(-1.0);
        assert!(first_error(&request).contains("engine_passiveness"));

        let request = build_multi_order(legs()).with_schedule_discretion(-1.0);
        assert!(first_error(&request).contains("schedule_discretion"));

        let request = build_multi_order(legs()).with_alpha_tilt(-2.0);
        assert!(first_error(&request).contains("alpha_tilt"));

        let request = build_multi_order(legs()).with_exposure_tolerance(0.05);
        assert!(first_error(&request).contains("exposure_tolerance"));
    }

    #[test]
    fn test_validate_collects_every_failure() {
        let mut request = build_multi_order(vec![
            ChildOrder::new("ETHUSDT", "sell").with_base_asset_qty(10.0),
            ChildOrder::new("ETH-USDT", "buy").with_base_asset_qty(10.0),
            ChildOrder::new("BTC-USDT", "hold").with_quote_asset_qty(10.0),
        ])
        .with_alpha_tilt(5.0);
        request.strategy = "nope".to_string();

        let errors = request.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.0[0].contains("strategy"));
        assert!(errors.0[1].contains("alpha_tilt"));
        assert!(errors.0[2].starts_with("child_orders[0]: pair"));
        assert!(errors.0[3].starts_with("child_orders[2]: side"));
    }

    #[test]
    fn test_to_post_body() {
        let mut child_orders = legs();
        child_orders[1] = child_orders[1].clone().with_pos_side("long");

        let mut request = PlaceMultiOrderRequest::new(["abc"], 180, "VWAP", child_orders)
            .with_strategy_params(Map::from_iter([("passive_only".to_string(), json!(true))]))
            .with_engine_passiveness(0.1)
            .with_schedule_discretion(0.2)
            .with_alpha_tilt(0.3)
            .with_exposure_tolerance(0.4);
        request.notes = None;

        let body = request.to_post_body().unwrap();

        assert_eq!(body["strategy"], json!("VWAP"));
        assert_eq!(body["duration"], json!(180));
        assert_eq!(body["accounts"], json!(["abc"]));
        assert_eq!(body["strategy_params"], json!({"passive_only": true}));
        assert_eq!(body["exposure_tolerance"].as_f64(), Some(0.4));
        assert!(!body.contains_key("notes"));
        assert!(!body.contains_key("order_condition"));

        let legs = body["child_orders"].as_array().unwrap();
        assert_eq!(legs[0]["pair"], json!("ETH:PERP-USDT"));
        assert_eq!(legs[0]["side"], json!("sell"));
        assert_eq!(legs[0]["base_asset_qty"].as_f64(), Some(10.0));
        assert!(legs[0].get("pos_side").is_none());
        assert!(legs[0].get("quote_asset_qty").is_none());
        assert_eq!(legs[1]["pos_side"], json!("long"));
    }
}
