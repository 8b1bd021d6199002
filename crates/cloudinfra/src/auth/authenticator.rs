//! Token exchange against the gateway's external auth endpoint.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::config::{Credentials, ENV_KEY, ENV_SECRET};
use crate::error::{ConfigError, Error};
use crate::http::logger_token;

use super::Token;

/// Request body for the external token exchange.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
    client_id: &'a str,
    access_key: &'a str,
}

/// Response from the external token exchange.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    data: TokenData,
}

#[derive(Debug, Deserialize)]
struct TokenData {
    token: String,
}

/// Exchanges a key/secret pair for a bearer token.
///
/// Single-shot: the exchange itself is never retried here. Callers invoke
/// [`Authenticator::authenticate`] again on demand, typically when a call
/// sees a 401.
pub struct Authenticator {
    client: Client,
    user_auth: String,
}

impl Authenticator {
    /// Create an authenticator sharing the given transport client.
    ///
    /// `user_auth` is appended verbatim to the auth endpoint path; pass an
    /// empty string for machine-credential auth.
    pub fn new(client: Client, user_auth: impl Into<String>) -> Self {
        Self {
            client,
            user_auth: user_auth.into(),
        }
    }

    /// Exchange the credentials for a bearer token.
    ///
    /// A response that cannot be parsed for a token yields the empty
    /// [`Token`] sentinel rather than an error; the raw body is logged at
    /// error level. Transport failures propagate.
    #[instrument(skip_all, fields(base_url = %credentials.base_url()))]
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Token, Error> {
        let key = credentials
            .key()
            .ok_or(ConfigError::Incomplete { missing: ENV_KEY })?;
        let secret = credentials
            .secret()
            .ok_or(ConfigError::Incomplete { missing: ENV_SECRET })?;

        let url = credentials.base_url().auth_url(&self.user_auth);
        debug!(%url, "requesting bearer token");

        let response = self
            .client
            .post(&url)
            .json(&TokenRequest {
                client_id: key,
                access_key: secret,
            })
            .send()
            .await?;

        let correlation = logger_token(response.headers()).to_string();
        let body = response.text().await?;

        match serde_json::from_str::<TokenResponse>(&body) {
            Ok(exchange) => {
                let token = Token::new(exchange.data.token);
                if let Some(claims) = token.claims() {
                    debug!(%claims, "token claims");
                }
                debug!(logger_token = %correlation, "token exchange succeeded");
                Ok(token)
            }
            Err(_) => {
                error!(%body, "token exchange returned an unparseable body");
                debug!(logger_token = %correlation, "token exchange failed");
                Ok(Token::none())
            }
        }
    }
}
