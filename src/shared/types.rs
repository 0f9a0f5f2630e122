//! Shared enumerations for the TaaS SDK.
//!
//! Request objects carry these values as plain strings (that is what goes on the
//! wire and what callers may hand us); the enums below define the closed sets
//! those strings are validated against. Every enum converts into `String`, so
//! builders accept either form.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct UnknownVariantError {
    /// Enum being parsed ("side", "strategy", ...)
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
}

impl UnknownVariantError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

// ============================================================================
// Side
// ============================================================================

/// Trade side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Get the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl FromStr for Side {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            _ => Err(UnknownVariantError::new("side", s)),
        }
    }
}

// ============================================================================
// Strategy
// ============================================================================

/// Execution algorithm, interpreted by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Implementation shortfall
    #[serde(rename = "IS")]
    Is,
    /// Time-weighted average price
    #[serde(rename = "TWAP")]
    Twap,
    /// Volume-weighted average price
    #[serde(rename = "VWAP")]
    Vwap,
    #[serde(rename = "Limit")]
    Limit,
    #[serde(rename = "Market")]
    Market,
    #[serde(rename = "Iceberg")]
    Iceberg,
}

impl Strategy {
    /// All strategies accepted by the API.
    pub const ALL: [Strategy; 6] = [
        Self::Is,
        Self::Twap,
        Self::Vwap,
        Self::Limit,
        Self::Market,
        Self::Iceberg,
    ];

    /// Get the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Is => "IS",
            Self::Twap => "TWAP",
            Self::Vwap => "VWAP",
            Self::Limit => "Limit",
            Self::Market => "Market",
            Self::Iceberg => "Iceberg",
        }
    }
}

impl FromStr for Strategy {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| UnknownVariantError::new("strategy", s))
    }
}

// ============================================================================
// PosSide
// ============================================================================

/// Position side for derivatives legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PosSide {
    Long,
    Short,
}

impl PosSide {
    /// Get the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Long => "long",
            Self::Short => "short",
        }
    }
}

impl FromStr for PosSide {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "long" => Ok(Self::Long),
            "short" => Ok(Self::Short),
            _ => Err(UnknownVariantError::new("pos_side", s)),
        }
    }
}

// ============================================================================
// Order lifecycle
// ============================================================================

/// Lifecycle status of a single order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Accepted, start time in the future
    Scheduled,
    /// Executing
    Active,
    /// Paused by the user or by an order condition
    Paused,
    /// Fully executed
    Complete,
    /// Cancelled before completion
    Canceled,
}

impl OrderStatus {
    /// Get the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::Active => "ACTIVE",
            Self::Paused => "PAUSED",
            Self::Complete => "COMPLETE",
            Self::Canceled => "CANCELED",
        }
    }

    /// Whether the order can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Canceled)
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SCHEDULED" => Ok(Self::Scheduled),
            "ACTIVE" => Ok(Self::Active),
            "PAUSED" => Ok(Self::Paused),
            "COMPLETE" => Ok(Self::Complete),
            "CANCELED" => Ok(Self::Canceled),
            _ => Err(UnknownVariantError::new("order status", s)),
        }
    }
}

/// Lifecycle status of a multi-order or chained order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MultiOrderStatus {
    Active,
    Paused,
    Complete,
    Canceled,
}

impl MultiOrderStatus {
    /// Get the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Paused => "PAUSED",
            Self::Complete => "COMPLETE",
            Self::Canceled => "CANCELED",
        }
    }

    /// Whether the multi-order can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Canceled)
    }
}

impl FromStr for MultiOrderStatus {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "PAUSED" => Ok(Self::Paused),
            "COMPLETE" => Ok(Self::Complete),
            "CANCELED" => Ok(Self::Canceled),
            _ => Err(UnknownVariantError::new("multi-order status", s)),
        }
    }
}

// ============================================================================
// RebalanceMode
// ============================================================================

/// How a portfolio rebalance is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RebalanceMode {
    /// Rebalance a single time
    #[serde(rename = "Once")]
    Once,
    /// Rebalance every `interval` seconds
    #[serde(rename = "Set Frequency")]
    SetFrequency,
}

impl RebalanceMode {
    /// Get the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Once => "Once",
            Self::SetFrequency => "Set Frequency",
        }
    }
}

impl FromStr for RebalanceMode {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Once" => Ok(Self::Once),
            "Set Frequency" => Ok(Self::SetFrequency),
            _ => Err(UnknownVariantError::new("rebalance_mode", s)),
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

macro_rules! impl_wire_string {
    ($($ty:ty),* $(,)?) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl From<$ty> for String {
                fn from(value: $ty) -> Self {
                    value.as_str().to_string()
                }
            }
        )*
    };
}

impl_wire_string!(Side, Strategy, PosSide, OrderStatus, MultiOrderStatus, RebalanceMode);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_parse() {
        assert_eq!("buy".parse::<Side>().unwrap(), Side::Buy);
        assert_eq!("sell".parse::<Side>().unwrap(), Side::Sell);
        let err = "BUY".parse::<Side>().unwrap_err();
        assert_eq!(err.kind, "side");
    }

    #[test]
    fn test_strategy_parse_is_case_sensitive() {
        assert_eq!("TWAP".parse::<Strategy>().unwrap(), Strategy::Twap);
        assert_eq!("Limit".parse::<Strategy>().unwrap(), Strategy::Limit);
        assert!("twap".parse::<Strategy>().is_err());
        assert!("LIMIT".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_strategy_serde_matches_as_str() {
        for strategy in Strategy::ALL {
            let json = serde_json::to_string(&strategy).unwrap();
            assert_eq!(json, format!("\"{}\"", strategy.as_str()));
        }
    }

    #[test]
    fn test_status_terminal() {
        assert!(OrderStatus::Complete.is_terminal());
        assert!(OrderStatus::Canceled.is_terminal());
        assert!(!OrderStatus::Active.is_terminal());
        assert!(!MultiOrderStatus::Paused.is_terminal());
    }

    #[test]
    fn test_status_deserialize() {
        let status: OrderStatus = serde_json::from_str(r#""ACTIVE""#).unwrap();
        assert_eq!(status, OrderStatus::Active);
        let status: MultiOrderStatus = serde_json::from_str(r#""CANCELED""#).unwrap();
        assert_eq!(status, MultiOrderStatus::Canceled);
    }

    #[test]
    fn test_rebalance_mode_wire_value() {
        assert_eq!(String::from(RebalanceMode::SetFrequency), "Set Frequency");
        assert_eq!(
            "Set Frequency".parse::<RebalanceMode>().unwrap(),
            RebalanceMode::SetFrequency
        );
        assert!("SetFrequency".parse::<RebalanceMode>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(PosSide::Short.to_string(), "short");
        assert_eq!(Strategy::Is.to_string(), "IS");
    }
}
