//! Client-side request validation primitives.
//!
//! Request types implement [`Validate`]. Single-order requests stop at the
//! first violated rule and report one [`ValidationError`]; multi-leg requests
//! collect every violation into [`ValidationErrors`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::shared::pair::{is_valid_pair, PAIR_FORMAT_HINT};
use crate::shared::types::{PosSide, Side, Strategy};

/// Client-side validation of a request before it is sent.
pub trait Validate {
    /// Error reported when validation fails.
    type Error: std::error::Error;

    /// Check every rule of the request. Never mutates the request.
    fn validate(&self) -> Result<(), Self::Error>;
}

/// A single violated rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Every violated rule of a multi-leg request, in evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", .0.join("; "))]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    /// Record the error of a check, if any.
    pub fn collect(&mut self, result: Result<(), ValidationError>) {
        if let Err(e) = result {
            self.0.push(e.0);
        }
    }

    /// Record a nested error under a prefix such as `child_orders[1]`.
    pub fn collect_nested(&mut self, prefix: &str, result: Result<(), ValidationError>) {
        if let Err(e) = result {
            self.0.push(format!("{}: {}", prefix, e.0));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

// ============================================================================
// Bounds
// ============================================================================

/// Numeric interval a ratio field must fall in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
    /// `false` for a left-open interval such as `(0,1]`
    pub min_inclusive: bool,
}

impl Bounds {
    /// `[min,max]`
    pub const fn closed(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            min_inclusive: true,
        }
    }

    /// `(min,max]`
    pub const fn left_open(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            min_inclusive: false,
        }
    }

    /// NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        let above_min = if self.min_inclusive {
            value >= self.min
        } else {
            value > self.min
        };
        above_min && value <= self.max
    }

    /// Check an optional field; `None` always passes.
    pub fn check(&self, field: &str, value: Option<f64>) -> Result<(), ValidationError> {
        match value {
            Some(v) if !self.contains(v) => Err(ValidationError(format!(
                "{} out of range, must be {}",
                field, self
            ))),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.min_inclusive { '[' } else { '(' };
        write!(f, "{}{},{}]", open, self.min, self.max)
    }
}

pub const ENGINE_PASSIVENESS: Bounds = Bounds::closed(0.0, 1.0);
pub const SCHEDULE_DISCRETION: Bounds = Bounds::closed(0.0, 1.0);
pub const ALPHA_TILT: Bounds = Bounds::closed(-1.0, 1.0);
pub const POV_RATIO: Bounds = Bounds::left_open(0.0, 1.0);
pub const EXPOSURE_TOLERANCE: Bounds = Bounds::closed(0.1, 1.0);
pub const TARGET_WEIGHT: Bounds = Bounds::closed(-100.0, 100.0);
pub const REBALANCE_TOLERANCE: Bounds = Bounds::left_open(0.0, 100.0);

// ============================================================================
// Field checks
// ============================================================================

pub fn check_side(side: &str) -> Result<(), ValidationError> {
    Side::from_str(side)
        .map(|_| ())
        .map_err(|_| ValidationError::new("side must be 'buy' or 'sell'"))
}

pub fn check_strategy(strategy: &str) -> Result<(), ValidationError> {
    Strategy::from_str(strategy)
        .map(|_| ())
        .map_err(|_| ValidationError(format!("unexpected strategy {}", strategy)))
}

pub fn check_pos_side(pos_side: Option<&str>) -> Result<(), ValidationError> {
    match pos_side {
        Some(value) if PosSide::from_str(value).is_err() => Err(ValidationError::new(
            "pos_side must be 'long' or 'short'",
        )),
        _ => Ok(()),
    }
}

pub fn check_pair(pair: &str) -> Result<(), ValidationError> {
    if is_valid_pair(pair) {
        Ok(())
    } else {
        Err(ValidationError(format!(
            "pair must have correct syntax: {}",
            PAIR_FORMAT_HINT
        )))
    }
}

/// Exactly one of the named quantity fields must be set, to a positive finite value.
pub fn check_exactly_one(fields: &[(&str, Option<f64>)]) -> Result<(), ValidationError> {
    let set: Vec<(&str, f64)> = fields
        .iter()
        .filter_map(|(name, v)| v.map(|v| (*name, v)))
        .collect();
    if let [(name, value)] = set.as_slice() {
        return if value.is_finite() && *value > 0.0 {
            Ok(())
        } else {
            Err(ValidationError(format!(
                "{} must be a positive finite value",
                name
            )))
        };
    }
    let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
    if set.is_empty() {
        Err(ValidationError(format!("need one of [{}]", names.join(", "))))
    } else {
        Err(ValidationError(format!(
            "only one of [{}] may be set",
            names.join(", ")
        )))
    }
}

pub fn check_positive(field: &str, value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        Some(v) if !(v > 0.0) => Err(ValidationError(format!(
            "{} must be a positive value",
            field
        ))),
        _ => Ok(()),
    }
}

/// Optional field that, when set, must be a finite number.
pub fn check_finite(field: &str, value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        Some(v) if !v.is_finite() => Err(ValidationError(format!(
            "{} must be a finite number",
            field
        ))),
        _ => Ok(()),
    }
}

pub fn check_non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError(format!("{} must be a non-empty string", field)))
    } else {
        Ok(())
    }
}
