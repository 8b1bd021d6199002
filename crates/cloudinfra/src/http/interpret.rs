//! Response interpretation: status policy and content-type dispatch.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use serde_json::Value;
use tracing::error;

use crate::error::{DecodeError, Error, GatewayError};

use super::{logger_token, projection};

/// Outcome of one gateway call.
///
/// The gateway is polyglot across endpoints: some return structured JSON,
/// some plain text, so the declared content type decides the shape.
#[derive(Debug, Clone, PartialEq)]
pub enum CallResult {
    /// 204 No Content.
    Empty,
    /// Decoded structured body, projected when the call asked for it.
    Json(Value),
    /// Non-JSON body, returned verbatim.
    Text(String),
}

impl CallResult {
    /// Returns the structured value, if this is a JSON result.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            CallResult::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Consumes the result, returning the structured value if present.
    pub fn into_json(self) -> Option<Value> {
        match self {
            CallResult::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the raw text, if this is a text result.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CallResult::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Whether this is an empty (204) result.
    pub fn is_empty(&self) -> bool {
        matches!(self, CallResult::Empty)
    }
}

/// Map a final (non-401) response to a [`CallResult`] or an error.
///
/// 204 short-circuits to [`CallResult::Empty`] without touching the body.
/// The success range is [200, 300) - status 300 itself is an error.
pub(crate) async fn interpret(
    response: Response,
    query: Option<&str>,
) -> Result<CallResult, Error> {
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return Ok(CallResult::Empty);
    }

    if !(200..300).contains(&status.as_u16()) {
        let headers = response.headers().clone();
        error!(
            status = status.as_u16(),
            logger_token = logger_token(&headers),
            "unexpected status code"
        );
        let body = response.text().await?;
        return Err(GatewayError {
            status: status.as_u16(),
            body,
            headers,
        }
        .into());
    }

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("application/json"));

    if is_json {
        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body).map_err(DecodeError::Json)?;
        let value = match query {
            Some(expression) => projection::project(expression, &value)?,
            None => value,
        };
        Ok(CallResult::Json(value))
    } else {
        Ok(CallResult::Text(response.text().await?))
    }
}
