//! Validated domain types.

mod gateway_url;

pub use gateway_url::GatewayUrl;
