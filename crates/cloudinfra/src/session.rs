//! Session: the composition root and public call surface.

use std::fmt;

use serde_json::{Value, json};
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::auth::{Authenticator, Token};
use crate::config::{self, Credentials, CredentialProvider, FileProvider};
use crate::error::Error;
use crate::http::{CallResult, CallSpec, GatewayClient};
use crate::types::GatewayUrl;

/// Role id assigned to users created via [`Session::add_user`].
const DEFAULT_ROLE_ID: &str = "871e947b-8db5-4b87-835f-092cb118bf3b";

/// An authenticated connection to the gateway.
///
/// A session owns one set of [`Credentials`] and the current bearer
/// [`Token`], and is the token's sole writer: calls read it, and a
/// 401-triggered refresh swaps in the replacement returned by the executor.
///
/// # Example
///
/// ```no_run
/// use cloudinfra::Session;
///
/// # async fn example() -> cloudinfra::Result<()> {
/// let session = Session::builder().profile("staging").build().await?;
/// let audit = session.get_audit().await?;
/// println!("{audit:?}");
/// # Ok(())
/// # }
/// ```
pub struct Session {
    credentials: Credentials,
    authenticator: Authenticator,
    client: GatewayClient,
    token: RwLock<Token>,
}

impl Session {
    /// Start building a session.
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    /// Connect using the default credential chain (environment, then
    /// credentials file) and exchange for a token immediately.
    pub async fn connect() -> Result<Self, Error> {
        Self::builder().build().await
    }

    /// Returns the resolved credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Export the current bearer token.
    pub async fn token(&self) -> Token {
        self.token.read().await.clone()
    }

    /// Execute one logical call against the gateway.
    ///
    /// This is the general entry point: connection-level retry, one
    /// 401-triggered token refresh, status policy and content-type decoding
    /// all apply. See [`CallSpec`] for projections, parameters and headers.
    pub async fn call(&self, spec: CallSpec) -> Result<CallResult, Error> {
        let token = self.token.read().await.clone();
        let (result, token) = self
            .client
            .execute(&self.credentials, &self.authenticator, token, &spec)
            .await?;
        *self.token.write().await = token;
        Ok(result)
    }

    /// GET an endpoint.
    pub async fn get(&self, endpoint: &str) -> Result<CallResult, Error> {
        self.call(CallSpec::get(endpoint)).await
    }

    /// POST a JSON body to an endpoint.
    pub async fn post(&self, endpoint: &str, body: Value) -> Result<CallResult, Error> {
        self.call(CallSpec::post(endpoint).body(body)).await
    }

    /// PUT a JSON body to an endpoint.
    pub async fn put(&self, endpoint: &str, body: Value) -> Result<CallResult, Error> {
        self.call(CallSpec::put(endpoint).body(body)).await
    }

    /// DELETE an endpoint.
    pub async fn delete(&self, endpoint: &str) -> Result<CallResult, Error> {
        self.call(CallSpec::delete(endpoint)).await
    }

    /// PATCH an endpoint with a JSON body.
    pub async fn patch(&self, endpoint: &str, body: Value) -> Result<CallResult, Error> {
        self.call(CallSpec::patch(endpoint).body(body)).await
    }

    /// Create a portal user with the default global admin role.
    #[instrument(skip(self))]
    pub async fn add_user(&self, email: &str, name: &str) -> Result<CallResult, Error> {
        let body = json!({
            "email": email,
            "name": name,
            "roles": { "global": [DEFAULT_ROLE_ID] },
            "role": "admin",
        });
        self.post("user", body).await
    }

    /// List the portal's users.
    pub async fn get_users(&self) -> Result<CallResult, Error> {
        self.get("user").await
    }

    /// Fetch the portal's audit trail.
    pub async fn get_audit(&self) -> Result<CallResult, Error> {
        self.get("audit").await
    }
}

// Custom Debug impl that hides sensitive data
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("credentials", &self.credentials)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Builder for [`Session`].
///
/// Credentials resolve from exactly one source, in priority order: explicit
/// `key` + `secret` (with optional `base_url` and `app`), then a named
/// `profile`, then the default provider chain. Supplying a `token` skips
/// validation and the initial exchange; the token is refreshed on the first
/// 401 like any other.
#[derive(Debug, Default)]
pub struct SessionBuilder {
    base_url: Option<String>,
    key: Option<String>,
    secret: Option<String>,
    app: Option<String>,
    profile: Option<String>,
    token: Option<String>,
    user_auth: Option<String>,
}

impl SessionBuilder {
    /// Gateway base URL; defaults to the US portal gateway.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Client id for the token exchange.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Access key for the token exchange.
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// App namespace override, applied after credential resolution.
    pub fn app(mut self, app: impl Into<String>) -> Self {
        self.app = Some(app.into());
        self
    }

    /// Resolve credentials from this named profile.
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Use an existing bearer token instead of exchanging credentials.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Suffix appended to the auth endpoint path for user-based auth.
    pub fn user_auth(mut self, user_auth: impl Into<String>) -> Self {
        self.user_auth = Some(user_auth.into());
        self
    }

    /// Resolve credentials, build the transport, and authenticate unless an
    /// explicit token was supplied.
    #[instrument(skip_all)]
    pub async fn build(self) -> Result<Session, Error> {
        let mut credentials = if let (Some(key), Some(secret)) = (&self.key, &self.secret) {
            let base_url = GatewayUrl::new(
                self.base_url.as_deref().unwrap_or(config::DEFAULT_BASE_URL),
            )?;
            let app = self
                .app
                .clone()
                .unwrap_or_else(|| config::DEFAULT_APP.to_string());
            Credentials::new(base_url, key.clone(), secret.clone(), app)
        } else if let Some(profile) = &self.profile {
            let provider = FileProvider::for_profile(profile);
            provider.load()?.ok_or_else(|| {
                crate::error::ConfigError::NoCredentials {
                    tried: vec![provider.name().to_string()],
                }
            })?
        } else {
            config::resolve_default()?
        };

        let http = reqwest::Client::builder()
            .user_agent(concat!("cloudinfra/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let authenticator = Authenticator::new(http.clone(), self.user_auth.unwrap_or_default());
        let client = GatewayClient::new(http);

        let token = match self.token {
            Some(token) => Token::new(token),
            None => {
                credentials.validate()?;
                authenticator.authenticate(&credentials).await?
            }
        };

        if let Some(app) = self.app {
            credentials.set_app(app);
        }

        info!(app = credentials.app(), "session ready");
        Ok(Session {
            credentials,
            authenticator,
            client,
            token: RwLock::new(token),
        })
    }
}
