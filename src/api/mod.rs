//! REST API client module for TaaS.
//!
//! This module provides the request types of the TaaS order-execution API
//! and, with the `http` feature, an async client that validates and sends them.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use taas_api::api::{ChildOrder, PlaceMultiOrderRequest, TaasApiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads TAAS_URL and TAAS_AUTH_TOKEN
//!     let client = TaasApiClient::from_env()?;
//!
//!     let legs = vec![
//!         ChildOrder::new("BTC-USDT", "buy").with_base_asset_qty(0.1),
//!         ChildOrder::new("ETH-USDT", "sell").with_base_asset_qty(2.0),
//!     ];
//!     let request = PlaceMultiOrderRequest::new(["mock"], 600, "TWAP", legs);
//!     let response = client.place_multi_order(request).await?;
//!     println!("{}", response);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! All methods return `ApiResult<T>` which is an alias for `Result<T, ApiError>`.
//! Invalid requests fail with [`ApiError::Validation`] before any network call:
//!
//! ```rust,ignore
//! use taas_api::api::ApiError;
//!
//! match client.get_order("order-id").await {
//!     Ok(order) => println!("Found order {}", order),
//!     Err(ApiError::NotFound(body)) => println!("Order not found: {}", body),
//!     Err(ApiError::Validation(msg)) => println!("Invalid request: {}", msg),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```

#[cfg(feature = "http")]
pub mod client;
pub mod error;
pub mod types;

// Re-export main types for convenience
#[cfg(feature = "http")]
pub use client::{TaasApiClient, TaasApiClientBuilder};
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use types::*;
