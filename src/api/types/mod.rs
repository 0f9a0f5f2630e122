//! Request types for the TaaS REST API.
//!
//! Each request owns its validation rules ([`Validate`](crate::shared::Validate))
//! and its wire form ([`PostBody`](crate::shared::PostBody) or
//! [`QueryParams`](crate::shared::QueryParams)). Responses are passed through
//! as `serde_json::Value`.

pub mod account;
pub mod balance;
pub mod chained_order;
pub mod multi_order;
pub mod order;
pub mod price;
pub mod rebalance;

// Re-export all types for convenience
pub use account::*;
pub use balance::*;
pub use chained_order::*;
pub use multi_order::{ChildOrder, PlaceMultiOrderRequest};
pub use order::*;
pub use price::*;
pub use rebalance::*;
