//! # TaaS Rust SDK
//!
//! A Rust client for the TaaS (trading-as-a-service) order-execution REST API.
//!
//! ## Modules
//!
//! - [`api`]: Request types, errors and the async REST client (`http` feature)
//! - [`shared`]: Enumerations, pair syntax, validation rules and wire encoding
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use taas_api::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TaasApiClient::builder("https://taas.example.com")
//!         .auth_token("my-token")
//!         .build()?;
//!
//!     let order = PlaceOrderRequest::new(["mock"], "ETH-USDT", Side::Buy, 300, Strategy::Twap)
//!         .with_base_asset_qty(5.0);
//!     let placed = client.place_order(order).await?;
//!     println!("Placed: {}", placed);
//!
//!     let open = client
//!         .get_all_orders(GetOrderRequest::new().with_statuses([OrderStatus::Active]))
//!         .await?;
//!     println!("Open orders: {}", open);
//!
//!     Ok(())
//! }
//! ```

// ============================================================================
// MODULES
// ============================================================================

/// Shared utilities, types, and validation rules.
pub mod shared;

/// REST API request types, errors and client.
/// Request types are always available; the client requires the `http` feature.
pub mod api;

// ============================================================================
// PRELUDE
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use taas_api::prelude::*;
/// ```
pub mod prelude {
    // Client (conditionally exported)
    #[cfg(feature = "http")]
    pub use crate::api::{TaasApiClient, TaasApiClientBuilder};

    // API module exports
    pub use crate::api::{
        ApiError, ApiResult, ErrorResponse,
        // Orders
        AmendOrderRequest, CancelOrderRequest, GetOrderMessagesRequest, GetOrderRequest,
        GetOrdersWithStatsRequest, PlaceOrderRequest,
        // Multi-leg orders
        ChildOrder, OrderInChain, PlaceChainedOrderRequest, PlaceMultiOrderRequest,
        // Balances and rebalancing
        CloseBalancesRequest, GetBalancesRequest, RebalanceRequest, RebalanceSettings,
        SetLeverageRequest, TargetWeight,
        // Accounts
        ArchiveAccountRequest, CreateAccountRequest, GenerateApiAuthTokenRequest,
        // Prices
        GetCombinedL2PricesRequest, GetL2PricesRequest, PriceSubscribeRequest,
        PriceUnsubscribeRequest,
    };

    // Shared types and validation
    pub use crate::shared::{
        is_valid_pair, parse_pair, MultiOrderStatus, OrderStatus, PairParts, PosSide,
        PostBody, QueryParams, RebalanceMode, Side, Strategy, Validate, ValidationError,
        ValidationErrors,
    };
}
