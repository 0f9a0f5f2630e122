//! TaaS REST API client implementation.
//!
//! The [`TaasApiClient`] wraps every order, balance, account and price
//! endpoint of the service. Requests are validated locally before anything
//! is sent; responses are returned as raw JSON.
//!
//! # Example
//!
//! ```rust,ignore
//! use taas_api::api::{PlaceOrderRequest, TaasApiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TaasApiClient::builder("https://taas.example.com")
//!         .auth_token("my-token")
//!         .build()?;
//!
//!     let order = PlaceOrderRequest::new(["mock"], "ETH-USDT", "buy", 300, "TWAP")
//!         .with_base_asset_qty(5.0);
//!     let placed = client.place_order(order).await?;
//!     println!("Placed: {}", placed);
//!
//!     Ok(())
//! }
//! ```

use std::time::Instant;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

use crate::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::api::types::*;
use crate::shared::validation::check_non_empty;
use crate::shared::{PostBody, QueryParams, Validate};

/// Environment variable holding the service base URL.
pub const ENV_URL: &str = "TAAS_URL";

/// Environment variable holding the API token.
pub const ENV_AUTH_TOKEN: &str = "TAAS_AUTH_TOKEN";

/// Builder for configuring [`TaasApiClient`].
#[derive(Debug, Clone)]
pub struct TaasApiClientBuilder {
    base_url: String,
    default_headers: Vec<(String, String)>,
    auth_token: Option<String>,
}

impl TaasApiClientBuilder {
    /// Create a new builder with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            default_headers: Vec::new(),
            auth_token: None,
        }
    }

    /// Create a builder from `TAAS_URL` and (optionally) `TAAS_AUTH_TOKEN`.
    pub fn from_env() -> ApiResult<Self> {
        let base_url = std::env::var(ENV_URL)
            .map_err(|_| ApiError::InvalidParameter(format!("{} is not set", ENV_URL)))?;
        if base_url.trim().is_empty() {
            return Err(ApiError::InvalidParameter(format!("{} is empty", ENV_URL)));
        }

        let mut builder = Self::new(base_url);
        if let Ok(token) = std::env::var(ENV_AUTH_TOKEN) {
            if !token.is_empty() {
                builder = builder.auth_token(token);
            }
        }
        Ok(builder)
    }

    /// Add a default header to all requests.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Set the API token, sent as `Authorization: Token <token>`.
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> ApiResult<TaasApiClient> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.auth_token {
            let mut value = HeaderValue::from_str(&format!("Token {}", token))
                .map_err(|e| ApiError::InvalidParameter(format!("Invalid auth token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        for (name, value) in self.default_headers {
            let header_name = HeaderName::try_from(name.as_str()).map_err(|e| {
                ApiError::InvalidParameter(format!("Invalid header name '{}': {}", name, e))
            })?;
            let header_value = HeaderValue::from_str(&value).map_err(|e| {
                ApiError::InvalidParameter(format!("Invalid header value for '{}': {}", name, e))
            })?;
            headers.insert(header_name, header_value);
        }

        let http_client = Client::builder().default_headers(headers).build()?;

        Ok(TaasApiClient {
            http_client,
            base_url: self.base_url,
            has_auth_token: self.auth_token.is_some(),
        })
    }
}

/// TaaS REST API client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct TaasApiClient {
    http_client: Client,
    base_url: String,
    has_auth_token: bool,
}

impl TaasApiClient {
    /// Create a new client without authentication.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        TaasApiClientBuilder::new(base_url).build()
    }

    /// Create a new client builder for custom configuration.
    pub fn builder(base_url: impl Into<String>) -> TaasApiClientBuilder {
        TaasApiClientBuilder::new(base_url)
    }

    /// Create a client configured from `TAAS_URL` / `TAAS_AUTH_TOKEN`.
    pub fn from_env() -> ApiResult<Self> {
        TaasApiClientBuilder::from_env()?.build()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check whether an API token is configured.
    pub fn has_auth_token(&self) -> bool {
        self.has_auth_token
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    /// Execute a GET request.
    async fn get(&self, path: &str) -> ApiResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        self.execute(Method::GET, path, self.http_client.get(&url))
            .await
    }

    /// Execute a GET request with an encoded query string.
    async fn get_with_query<Q: QueryParams>(&self, path: &str, query: &Q) -> ApiResult<Value> {
        let query = query.to_query_string()?;
        if query.is_empty() {
            self.get(path).await
        } else {
            self.get(&format!("{}?{}", path, query)).await
        }
    }

    /// Execute a POST request with the request's canonical JSON body.
    async fn post<B: PostBody>(&self, path: &str, body: &B) -> ApiResult<Value> {
        let body = body.to_post_body()?;
        let url = format!("{}{}", self.base_url, path);
        self.execute(Method::POST, path, self.http_client.post(&url).json(&body))
            .await
    }

    /// Execute a DELETE request.
    async fn delete(&self, path: &str) -> ApiResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        self.execute(Method::DELETE, path, self.http_client.delete(&url))
            .await
    }

    /// Send a request and decode its JSON response.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> ApiResult<Value> {
        let started = Instant::now();
        let response = request.send().await?;
        let status = response.status();

        tracing::info!(
            method = %method,
            path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "TaaS request completed"
        );

        if !status.is_success() {
            return Err(Self::parse_error_response(&method, path, response).await);
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| ApiError::Deserialize(format!("Failed to deserialize response: {}", e)))
    }

    /// Parse an error response into an ApiError.
    async fn parse_error_response(
        method: &Method,
        path: &str,
        response: reqwest::Response,
    ) -> ApiError {
        let status = response.status();
        let error_text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to read error response body: {}", e);
                return Self::map_status_error(
                    status,
                    ErrorResponse::from_text(format!("HTTP {} (body unreadable: {})", status, e)),
                );
            }
        };

        tracing::warn!(
            method = %method,
            path,
            status = status.as_u16(),
            body = %error_text,
            "TaaS request failed"
        );

        Self::map_status_error(status, ErrorResponse::from_body(&error_text))
    }

    /// Map HTTP status code to ApiError.
    fn map_status_error(status: StatusCode, response: ErrorResponse) -> ApiError {
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(response),
            StatusCode::NOT_FOUND => ApiError::NotFound(response),
            StatusCode::BAD_REQUEST => ApiError::BadRequest(response),
            StatusCode::FORBIDDEN => ApiError::Forbidden(response),
            StatusCode::CONFLICT => ApiError::Conflict(response),
            StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited(response),
            _ if status.is_server_error() => ApiError::ServerError {
                status: status.as_u16(),
                response,
            },
            _ => ApiError::UnexpectedStatus(status.as_u16(), response),
        }
    }

    // =========================================================================
    // Validation helpers
    // =========================================================================

    /// Run a request's local checks, mapping failures to `ApiError::Validation`.
    fn validated<R>(request: &R) -> ApiResult<()>
    where
        R: Validate,
        ApiError: From<R::Error>,
    {
        request.validate().map_err(|e| {
            let error = ApiError::from(e);
            tracing::debug!(error = %error, "Request rejected before sending");
            error
        })
    }

    /// Validate an identifier used as a path segment.
    fn validate_id(id: &str, field_name: &str) -> ApiResult<()> {
        check_non_empty(field_name, id).map_err(ApiError::from)
    }

    // =========================================================================
    // Order endpoints
    // =========================================================================

    /// Get a single order by id.
    pub async fn get_order(&self, order_id: &str) -> ApiResult<Value> {
        Self::validate_id(order_id, "order_id")?;
        self.get(&format!("/api/order/{}", urlencoding::encode(order_id)))
            .await
    }

    /// Get the execution summary of an order.
    pub async fn get_order_summary(&self, order_id: &str) -> ApiResult<Value> {
        Self::validate_id(order_id, "order_id")?;
        self.get(&format!("/api/order_summary/{}", urlencoding::encode(order_id)))
            .await
    }

    /// List orders, filtered by status and time window.
    pub async fn get_all_orders(&self, request: GetOrderRequest) -> ApiResult<Value> {
        self.get_with_query("/api/orders/", &request).await
    }

    /// List orders together with their fill statistics.
    pub async fn get_orders_with_stats(
        &self,
        request: GetOrdersWithStatsRequest,
    ) -> ApiResult<Value> {
        self.get_with_query("/api/orders_with_stats/", &request)
            .await
    }

    /// Submit a new single-pair order.
    pub async fn place_order(&self, request: PlaceOrderRequest) -> ApiResult<Value> {
        Self::validated(&request)?;
        self.post("/api/orders/", &request).await
    }

    /// Cancel an order.
    pub async fn cancel_order(&self, request: CancelOrderRequest) -> ApiResult<Value> {
        Self::validated(&request)?;
        self.delete(&format!(
            "/api/order/{}",
            urlencoding::encode(&request.order_id)
        ))
        .await
    }

    /// Change parameters of a live order.
    pub async fn amend_order(&self, request: AmendOrderRequest) -> ApiResult<Value> {
        Self::validated(&request)?;
        self.post("/api/amend_order/", &request).await
    }

    /// Fetch engine messages for one or more orders.
    pub async fn get_order_messages(&self, request: GetOrderMessagesRequest) -> ApiResult<Value> {
        self.post("/api/order_messages/", &request).await
    }

    // =========================================================================
    // Multi-leg order endpoints
    // =========================================================================

    /// Submit a multi-order whose legs execute concurrently.
    pub async fn place_multi_order(&self, request: PlaceMultiOrderRequest) -> ApiResult<Value> {
        Self::validated(&request)?;
        self.post("/api/multi_orders/", &request).await
    }

    /// Cancel a multi-order and all of its legs.
    pub async fn cancel_multi_order(&self, multi_order_id: &str) -> ApiResult<Value> {
        Self::validate_id(multi_order_id, "multi_order_id")?;
        self.delete(&format!(
            "/api/multi_order/{}",
            urlencoding::encode(multi_order_id)
        ))
        .await
    }

    /// Submit a chained order whose legs execute in priority order.
    pub async fn place_chained_order(
        &self,
        request: PlaceChainedOrderRequest,
    ) -> ApiResult<Value> {
        Self::validated(&request)?;
        self.post("/api/chained_orders/", &request).await
    }

    /// Cancel a chained order.
    pub async fn cancel_chained_order(&self, chained_order_id: &str) -> ApiResult<Value> {
        Self::validate_id(chained_order_id, "chained_order_id")?;
        self.delete(&format!(
            "/api/chained_order/{}",
            urlencoding::encode(chained_order_id)
        ))
        .await
    }

    // =========================================================================
    // Balance endpoints
    // =========================================================================

    /// Set the leverage of a pair on one or more accounts.
    pub async fn set_leverage(&self, request: SetLeverageRequest) -> ApiResult<Value> {
        Self::validated(&request)?;
        self.post("/api/set_leverage/", &request).await
    }

    /// Get balances, optionally restricted to some accounts.
    pub async fn get_balances(&self, request: GetBalancesRequest) -> ApiResult<Value> {
        self.get_with_query("/api/balances/", &request).await
    }

    /// Flatten open balances.
    pub async fn close_balances(&self, request: CloseBalancesRequest) -> ApiResult<Value> {
        Self::validated(&request)?;
        self.post("/api/close_balances/", &request).await
    }

    /// Rebalance an account towards target weights.
    pub async fn rebalance(&self, request: RebalanceRequest) -> ApiResult<Value> {
        Self::validated(&request)?;
        self.post("/api/rebalance/", &request).await
    }

    // =========================================================================
    // Account endpoints
    // =========================================================================

    /// Register exchange credentials under a new account.
    pub async fn create_account(&self, request: CreateAccountRequest) -> ApiResult<Value> {
        Self::validated(&request)?;
        self.post("/api/create_account/", &request).await
    }

    /// Archive an account.
    pub async fn archive_account(&self, request: ArchiveAccountRequest) -> ApiResult<Value> {
        Self::validated(&request)?;
        self.post("/api/archive_account/", &request).await
    }

    /// Issue a new API token.
    pub async fn generate_auth_token(
        &self,
        request: GenerateApiAuthTokenRequest,
    ) -> ApiResult<Value> {
        self.post("/api/generate_auth_token/", &request).await
    }

    // =========================================================================
    // Price endpoints
    // =========================================================================

    /// List active price subscriptions.
    pub async fn list_price_subscriptions(&self) -> ApiResult<Value> {
        self.get("/api/price_subscriptions/").await
    }

    /// Subscribe to prices of a pair on an exchange.
    pub async fn add_price_subscription(&self, request: PriceSubscribeRequest) -> ApiResult<Value> {
        Self::validated(&request)?;
        self.post("/api/price_subscribe/", &request).await
    }

    /// Drop a price subscription.
    pub async fn remove_price_subscription(
        &self,
        request: PriceUnsubscribeRequest,
    ) -> ApiResult<Value> {
        Self::validated(&request)?;
        self.post("/api/price_unsubscribe/", &request).await
    }

    /// Get per-exchange L2 order books for a pair.
    pub async fn get_l2_prices(&self, request: GetL2PricesRequest) -> ApiResult<Value> {
        Self::validated(&request)?;
        self.get_with_query("/api/l2_prices/", &request).await
    }

    /// Get one L2 order book merged across exchanges.
    pub async fn get_combined_l2_prices(
        &self,
        request: GetCombinedL2PricesRequest,
    ) -> ApiResult<Value> {
        Self::validated(&request)?;
        self.get_with_query("/api/combined_l2_prices/", &request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = TaasApiClient::new("https://taas.example.com").unwrap();
        assert_eq!(client.base_url(), "https://taas.example.com");
        assert!(!client.has_auth_token());
    }

    #[test]
    fn test_client_builder() {
        let client = TaasApiClient::builder("https://taas.example.com/")
            .header("X-Custom", "test")
            .auth_token("secret")
            .build()
            .unwrap();

        // Base URL should have trailing slash removed
        assert_eq!(client.base_url(), "https://taas.example.com");
        assert!(client.has_auth_token());
    }

    #[test]
    fn test_builder_rejects_bad_headers() {
        let err = TaasApiClient::builder("https://taas.example.com")
            .header("bad header", "x")
            .build()
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));

        let err = TaasApiClient::builder("https://taas.example.com")
            .auth_token("line\nbreak")
            .build()
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));
    }

    #[test]
    fn test_from_env() {
        std::env::set_var(ENV_URL, "https://env.example.com/");
        std::env::set_var(ENV_AUTH_TOKEN, "env-token");
        let client = TaasApiClient::from_env().unwrap();
        assert_eq!(client.base_url(), "https://env.example.com");
        assert!(client.has_auth_token());

        std::env::remove_var(ENV_URL);
        std::env::remove_var(ENV_AUTH_TOKEN);
        let err = TaasApiClient::from_env().unwrap_err();
        assert!(err.to_string().contains(ENV_URL));
    }

    #[test]
    fn test_map_status_error() {
        let body = || ErrorResponse::from_text("x".to_string());
        assert!(matches!(
            TaasApiClient::map_status_error(StatusCode::NOT_FOUND, body()),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            TaasApiClient::map_status_error(StatusCode::TOO_MANY_REQUESTS, body()),
            ApiError::RateLimited(_)
        ));
        assert!(matches!(
            TaasApiClient::map_status_error(StatusCode::BAD_GATEWAY, body()),
            ApiError::ServerError { status: 502, .. }
        ));
        assert!(matches!(
            TaasApiClient::map_status_error(StatusCode::IM_A_TEAPOT, body()),
            ApiError::UnexpectedStatus(418, _)
        ));
    }

    #[test]
    fn test_validate_id() {
        assert!(TaasApiClient::validate_id("abc", "order_id").is_ok());
        let err = TaasApiClient::validate_id("  ", "order_id").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: order_id must be a non-empty string"
        );
    }

    #[tokio::test]
    async fn test_invalid_request_never_sent() {
        // Nothing listens on port 9; a send would surface as ApiError::Http.
        let client = TaasApiClient::new("http://127.0.0.1:9").unwrap();

        let order = PlaceOrderRequest::new(["mock"], "ETHUSDT", "buy", 300, "TWAP")
            .with_base_asset_qty(5.0);
        let err = client.place_order(order).await.unwrap_err();
        assert!(err.is_validation());

        let err = client.cancel_multi_order("").await.unwrap_err();
        assert!(err.is_validation());
    }
}
