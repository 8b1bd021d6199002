//! Gateway HTTP pipeline: call specification, retry, execution and response
//! interpretation.

mod call;
mod client;
mod interpret;
mod projection;
mod retry;

pub use call::CallSpec;
pub use client::GatewayClient;
pub use interpret::CallResult;
pub use projection::project;
pub use retry::RetryPolicy;

use reqwest::header::HeaderMap;

/// Response header correlating a request with gateway-side logs.
///
/// Diagnostic only; never used for control flow.
pub const LOGGER_TOKEN: &str = "logger-token";

/// Extract the correlation header value for diagnostic logging.
pub(crate) fn logger_token(headers: &HeaderMap) -> &str {
    headers
        .get(LOGGER_TOKEN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("none")
}
