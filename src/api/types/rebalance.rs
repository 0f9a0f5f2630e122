//! Portfolio rebalance types.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::shared::pair::is_valid_pair;
use crate::shared::validation::{
    check_non_empty, check_positive, check_strategy, ALPHA_TILT, ENGINE_PASSIVENESS,
    EXPOSURE_TOLERANCE, REBALANCE_TOLERANCE, SCHEDULE_DISCRETION, TARGET_WEIGHT,
};
use crate::shared::{PostBody, RebalanceMode, Validate, ValidationErrors};

/// Target allocation for one pair, in percent of the portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetWeight {
    /// [-100,100]; negative weights are short exposure
    #[serde(rename = "targetWeight")]
    pub target_weight: f64,
}

impl TargetWeight {
    pub fn new(target_weight: f64) -> Self {
        Self { target_weight }
    }
}

/// Execution parameters applied to every order a rebalance places.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RebalanceSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_passiveness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_discretion: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha_tilt: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure_tolerance: Option<f64>,
}

impl RebalanceSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(mut self, duration: u64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
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

    pub fn with_exposure_tolerance(mut self, value: f64) -> Self {
        self.exposure_tolerance = Some(value);
        self
    }

    fn collect_errors(&self, errors: &mut ValidationErrors) {
        const PREFIX: &str = "rebalance_settings";
        if self.duration == Some(0) {
            errors.push(format!("{}: duration must be a positive integer", PREFIX));
        }
        if let Some(strategy) = &self.strategy {
            errors.collect_nested(PREFIX, check_strategy(strategy));
        }
        errors.collect_nested(
            PREFIX,
            ENGINE_PASSIVENESS.check("engine_passiveness", self.engine_passiveness),
        );
        errors.collect_nested(
            PREFIX,
            SCHEDULE_DISCRETION.check("schedule_discretion", self.schedule_discretion),
        );
        errors.collect_nested(PREFIX, ALPHA_TILT.check("alpha_tilt", self.alpha_tilt));
        errors.collect_nested(
            PREFIX,
            EXPOSURE_TOLERANCE.check("exposure_tolerance", self.exposure_tolerance),
        );
    }
}

/// Request for POST /api/rebalance/.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RebalanceRequest {
    pub account_id: String,
    /// Pair → target weight
    pub target_weights: BTreeMap<String, TargetWeight>,
    /// Portfolio notional the weights apply to
    pub initial_balance_notional: f64,
    /// "Once" or "Set Frequency"
    pub rebalance_mode: String,
    /// Drift band in percent before a rebalance triggers, (0,100]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_balance_notional: Option<f64>,
    /// Asset the notionals are denominated in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter_asset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rebalance_settings: Option<RebalanceSettings>,
    /// Seconds between rebalances, required for "Set Frequency"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,
    /// ISO 8601 timestamp of the first rebalance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Let the notional float with portfolio value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_floating: Option<bool>,
}

impl RebalanceRequest {
    pub fn new(
        account_id: impl Into<String>,
        initial_balance_notional: f64,
        rebalance_mode: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            target_weights: BTreeMap::new(),
            initial_balance_notional,
            rebalance_mode: rebalance_mode.into(),
            tolerance: None,
            current_balance_notional: None,
            counter_asset: None,
            rebalance_settings: None,
            interval: None,
            start_date: None,
            is_floating: None,
        }
    }

    /// Add or replace the target weight of one pair.
    pub fn with_target_weight(mut self, pair: impl Into<String>, weight: f64) -> Self {
        self.target_weights.insert(pair.into(), TargetWeight::new(weight));
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn with_current_balance_notional(mut self, notional: f64) -> Self {
        self.current_balance_notional = Some(notional);
        self
    }

    pub fn with_counter_asset(mut self, asset: impl Into<String>) -> Self {
        self.counter_asset = Some(asset.into());
        self
    }

    pub fn with_settings(mut self, settings: RebalanceSettings) -> Self {
        self.rebalance_settings = Some(settings);
        self
    }

    pub fn with_interval(mut self, seconds: u64) -> Self {
        self.interval = Some(seconds);
        self
    }

    pub fn with_start_date(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = Some(start_date.into());
        self
    }

    pub fn with_floating(mut self, is_floating: bool) -> Self {
        self.is_floating = Some(is_floating);
        self
    }
}

/// RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS[.f]` datetime, or a plain date.
/// Offset-less datetime layouts accepted for `start_date`.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn is_iso8601(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z").is_ok()
        || NAIVE_DATETIME_FORMATS
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(value, format).is_ok())
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

impl Validate for RebalanceRequest {
    type Error = ValidationErrors;

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        errors.collect(check_non_empty("account_id", &self.account_id));

        if self.target_weights.is_empty() {
            errors.push("target_weights must not be empty");
        }
        for (pair, weight) in &self.target_weights {
            if !is_valid_pair(pair) {
                errors.push(format!("Invalid asset pair format: {}", pair));
            }
            if !TARGET_WEIGHT.contains(weight.target_weight) {
                errors.push(format!(
                    "targetWeight for {} must be between -100 and 100",
                    pair
                ));
            }
        }

        errors.collect(REBALANCE_TOLERANCE.check("tolerance", self.tolerance));

        if !(self.initial_balance_notional > 0.0) {
            errors.push("initial_balance_notional must be a positive number");
        }
        errors.collect(check_positive(
            "current_balance_notional",
            self.current_balance_notional,
        ));

        match RebalanceMode::from_str(&self.rebalance_mode) {
            Ok(RebalanceMode::SetFrequency) if !matches!(self.interval, Some(i) if i > 0) => {
                errors.push("interval must be a positive integer for 'Set Frequency' mode");
            }
            Ok(_) => {}
            Err(_) => errors.push("rebalance_mode must be 'Once' or 'Set Frequency'"),
        }

        if let Some(start_date) = &self.start_date {
            if !is_iso8601(start_date) {
                errors.push("start_date must be a valid ISO 8601 date string if provided");
            }
        }

        if let Some(settings) = &self.rebalance_settings {
            settings.collect_errors(&mut errors);
        }

        errors.into_result()
    }
}

impl PostBody for RebalanceRequest {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build_rebalance_request() -> RebalanceRequest {
        RebalanceRequest::new("mock", 10000.0, RebalanceMode::Once)
            .with_target_weight("BTC-USDT", 50.0)
            .with_target_weight("ETH-USDT", 50.0)
            .with_tolerance(1.0)
            .with_settings(
                RebalanceSettings::new()
                    .with_duration(900)
                    .with_engine_passiveness(0.02)
                    .with_exposure_tolerance(0.1)
                    .with_schedule_discretion(0.08)
                    .with_strategy("TWAP"),
            )
    }

    fn errors_of(request: &RebalanceRequest) -> Vec<String> {
        request.validate().unwrap_err().0
    }

    #[test]
    fn test_validate_success() {
        assert!(build_rebalance_request().validate().is_ok());

        let mut request = build_rebalance_request();
        request.tolerance = None;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validate_success_all_fields() {
        let request = build_rebalance_request()
            .with_current_balance_notional(10000.0)
            .with_counter_asset("USDT")
            .with_settings(
                RebalanceSettings::new()
                    .with_duration(300)
                    .with_engine_passiveness(0.1)
                    .with_schedule_discretion(0.05),
            )
            .with_interval(3600)
            .with_start_date("2024-01-01T00:00:00Z")
            .with_floating(true)
            .with_tolerance(20.0);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validate_fail_invalid_pair_format() {
        let mut request = build_rebalance_request();
        request.target_weights.clear();
        let request = request.with_target_weight("BTCUSDT", 50.0);
        assert!(errors_of(&request).contains(&"Invalid asset pair format: BTCUSDT".to_string()));
    }

    #[test]
    fn test_validate_fail_out_of_range_target_weight() {
        let request = build_rebalance_request().with_target_weight("ETH-USDT", 150.0);
        assert!(errors_of(&request)
            .contains(&"targetWeight for ETH-USDT must be between -100 and 100".to_string()));

        let request = build_rebalance_request().with_target_weight("ETH-USDT", -100.0);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validate_fail_missing_account_id() {
        let mut request = build_rebalance_request();
        request.account_id = String::new();
        assert!(errors_of(&request).contains(&"account_id must be a non-empty string".to_string()));
    }

    #[test]
    fn test_validate_fail_negative_initial_balance_notional() {
        let mut request = build_rebalance_request();
        request.initial_balance_notional = -1000.0;
        assert!(errors_of(&request)
            .contains(&"initial_balance_notional must be a positive number".to_string()));
    }

    #[test]
    fn test_validate_fail_invalid_rebalance_mode() {
        let mut request = build_rebalance_request();
        request.rebalance_mode = "INVALID".to_string();
        assert!(errors_of(&request)
            .contains(&"rebalance_mode must be 'Once' or 'Set Frequency'".to_string()));
    }

    #[test]
    fn test_validate_fail_missing_interval_for_set_frequency() {
        let mut request = build_rebalance_request();
        request.rebalance_mode = RebalanceMode::SetFrequency.into();
        let expected = "interval must be a positive integer for 'Set Frequency' mode".to_string();
        assert!(errors_of(&request).contains(&expected));

        let request = request.with_interval(0);
        assert!(errors_of(&request).contains(&expected));
    }

    #[test]
    fn test_validate_fail_invalid_start_date() {
        let mut request = build_rebalance_request()
            .with_interval(3600)
            .with_start_date("invalid-date");
        request.rebalance_mode = RebalanceMode::SetFrequency.into();
        assert!(errors_of(&request).contains(
            &"start_date must be a valid ISO 8601 date string if provided".to_string()
        ));
    }

    #[test]
    fn test_validate_success_for_set_frequency() {
        for start_date in [
            "2024-01-01T00:00:00Z",
            "2024-01-01T00:00:00",
            "2024-01-01",
            "2024-01-01T12:00",
            "2024-01-01 12:00:00",
            "2024-01-01T12:00:00+0000",
            "2024-01-01T12:00:00.123456+05:30",
        ] {
            let mut request = build_rebalance_request()
                .with_interval(3600)
                .with_start_date(start_date);
            request.rebalance_mode = RebalanceMode::SetFrequency.into();
            assert!(request.validate().is_ok(), "start_date {}", start_date);
        }
    }

    #[test]
    fn test_validate_fail_bad_settings() {
        let request = build_rebalance_request().with_settings(
            RebalanceSettings::new()
                .with_strategy("nope")
                .with_engine_passiveness(2.0),
        );
        let errors = errors_of(&request);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("rebalance_settings: unexpected strategy"));
        assert!(errors[1].starts_with("rebalance_settings: engine_passiveness"));
    }

    #[test]
    fn test_validate_fail_tolerance() {
        let request = build_rebalance_request().with_tolerance(0.0);
        assert!(errors_of(&request)[0].contains("tolerance"));
    }

    #[test]
    fn test_to_post_body() {
        let body = build_rebalance_request()
            .with_current_balance_notional(10000.0)
            .with_counter_asset("USDT")
            .with_interval(3600)
            .with_start_date("2024-01-01T00:00:00Z")
            .with_floating(true)
            .with_tolerance(5.0)
            .to_post_body()
            .unwrap();

        assert_eq!(body["account_id"], json!("mock"));
        assert_eq!(
            body["target_weights"]["BTC-USDT"]["targetWeight"].as_f64(),
            Some(50.0)
        );
        assert_eq!(body["tolerance"].as_f64(), Some(5.0));
        assert_eq!(body["initial_balance_notional"].as_f64(), Some(10000.0));
        assert_eq!(body["current_balance_notional"].as_f64(), Some(10000.0));
        assert_eq!(body["counter_asset"], json!("USDT"));
        assert_eq!(body["rebalance_mode"], json!("Once"));
        assert_eq!(body["is_floating"], json!(true));
        assert_eq!(body["interval"], json!(3600));
        assert_eq!(body["start_date"], json!("2024-01-01T00:00:00Z"));
        assert_eq!(body["rebalance_settings"]["strategy"], json!("TWAP"));
        assert!(body["rebalance_settings"].get("alpha_tilt").is_none());
    }

    #[test]
    fn test_to_post_body_omits_unset() {
        let body = RebalanceRequest::new("mock", 100.0, "Once")
            .with_target_weight("BTC-USDT", 100.0)
            .to_post_body()
            .unwrap();
        let mut keys: Vec<&str> = body.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["account_id", "initial_balance_notional", "rebalance_mode", "target_weights"]
        );
    }
}
