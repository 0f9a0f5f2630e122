//! Shared utilities and types used across the request types and the client.

pub mod body;
pub mod pair;
pub mod serde_util;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use body::{PostBody, QueryParams};
pub use pair::{is_valid_pair, parse_pair, PairParts, PAIR_FORMAT_HINT};
pub use types::*;
pub use validation::{Bounds, Validate, ValidationError, ValidationErrors};
