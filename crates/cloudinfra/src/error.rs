//! Error types for the cloudinfra library.
//!
//! This module provides a unified error type with explicit variants for
//! configuration, transport, authentication, gateway and decoding errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for cloudinfra operations.
///
/// This error type covers all possible failure modes in the library,
/// with explicit variants to allow callers to handle specific cases.
#[derive(Debug, Error)]
pub enum Error {
    /// Credential resolution failed or the resolved config is unusable.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (token refresh exhausted, unusable token).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The gateway answered with a status outside the accepted range.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Structured response body could not be decoded or projected.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Configuration and credential-resolution errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Every provider in the chain came up empty.
    #[error("no provider produced credentials (tried: {})", .tried.join(", "))]
    NoCredentials { tried: Vec<String> },

    /// The resolved credentials are missing a required field.
    #[error("incomplete configuration: missing {missing}")]
    Incomplete { missing: &'static str },

    /// The requested profile does not exist in the credentials file.
    #[error("profile '{profile}' not found in {file}")]
    ProfileNotFound { profile: String, file: String },

    /// The gateway base URL is not usable.
    #[error("invalid gateway URL '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },

    /// The credentials file exists but could not be read.
    #[error("cannot read credentials file {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    /// The credentials file is not valid INI.
    #[error("malformed credentials file {file} at line {line}: {reason}")]
    Parse {
        file: String,
        line: usize,
        reason: String,
    },
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP transport error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The call still saw a 401 after a fresh token exchange.
    #[error("authentication failed after token refresh: {body}")]
    AuthenticationFailed { body: String },

    /// The token value cannot be carried in an Authorization header.
    #[error("token contains characters not valid in a header")]
    InvalidToken,
}

/// A final response status outside the accepted range.
///
/// Carries the full response context so the caller can diagnose the failure
/// without re-running at higher verbosity.
#[derive(Debug)]
pub struct GatewayError {
    /// HTTP status code.
    pub status: u16,
    /// Response body text.
    pub body: String,
    /// Response headers, including any correlation header.
    pub headers: reqwest::header::HeaderMap,
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unexpected status code: {}, {}, {:?}",
            self.status, self.body, self.headers
        )
    }
}

impl std::error::Error for GatewayError {}

/// Response-decoding errors.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The declared-JSON body is not valid JSON.
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    /// The projection expression is malformed.
    #[error("invalid projection expression '{expression}': {reason}")]
    Projection { expression: String, reason: String },
}
