//! cloudinfra - client library for the Infinity Portal cloud gateway.
//!
//! This library resolves gateway credentials from multiple sources, exchanges
//! them for a short-lived bearer token, and issues authenticated REST calls
//! with automatic retry and 401-triggered token refresh. All authenticated
//! operations flow through a [`Session`] object.
//!
//! # Example
//!
//! ```no_run
//! use cloudinfra::Session;
//!
//! # async fn example() -> cloudinfra::Result<()> {
//! let session = Session::builder()
//!     .key("client-id")
//!     .secret("access-key")
//!     .app("api/v1")
//!     .build()
//!     .await?;
//!
//! let users = session.get_users().await?;
//! println!("{users:?}");
//! # Ok(())
//! # }
//! ```
//!
//! With no explicit arguments, [`Session::connect`] resolves credentials from
//! the `CLOUDINFRA_*` environment variables and then the
//! `~/.cloudinfra/credentials` profile file, in that order.

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod types;

// Re-export primary types at crate root for convenience
pub use auth::Token;
pub use config::{CredentialProvider, Credentials, EnvProvider, FileProvider};
pub use error::Error;
pub use http::{CallResult, CallSpec};
pub use session::Session;
pub use types::GatewayUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
