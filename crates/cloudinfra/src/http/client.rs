//! Gateway call execution with retry and token refresh.

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, instrument, warn};

use crate::auth::{Authenticator, Token};
use crate::config::Credentials;
use crate::error::{AuthError, Error};

use super::interpret::{CallResult, interpret};
use super::retry::RetryPolicy;
use super::{CallSpec, logger_token};

/// HTTP executor for authenticated gateway calls.
///
/// Owns no token state: the current token is passed in and the token that is
/// valid after the call is passed back, so the session stays the single
/// writer.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
}

impl GatewayClient {
    /// Create an executor sharing the given transport client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Execute one logical call.
    ///
    /// Applies the connection-level retry policy for the credentials' app
    /// namespace, then at most one 401-triggered re-authentication cycle: on
    /// a 401 the token is exchanged anew and the identical request is resent
    /// once. A second 401 is [`AuthError::AuthenticationFailed`].
    #[instrument(skip_all, fields(method = %spec.method(), endpoint = spec.endpoint()))]
    pub async fn execute(
        &self,
        credentials: &Credentials,
        authenticator: &Authenticator,
        token: Token,
        spec: &CallSpec,
    ) -> Result<(CallResult, Token), Error> {
        let policy = RetryPolicy::for_app(credentials.app());
        let url = credentials
            .base_url()
            .call_url(credentials.app(), spec.endpoint());

        let mut response = self.send_with_retry(&policy, &url, spec, &token).await?;
        let mut token = token;

        if response.status() == StatusCode::UNAUTHORIZED {
            token = authenticator.authenticate(credentials).await?;
            response = self.send_with_retry(&policy, &url, spec, &token).await?;
            if response.status() == StatusCode::UNAUTHORIZED {
                let body = response.text().await?;
                return Err(AuthError::AuthenticationFailed { body }.into());
            }
        }

        let result = interpret(response, spec.projection()).await?;
        Ok((result, token))
    }

    async fn send_with_retry(
        &self,
        policy: &RetryPolicy,
        url: &str,
        spec: &CallSpec,
        token: &Token,
    ) -> Result<Response, Error> {
        let mut retries = 0;
        loop {
            let response = self.send_once(url, spec, token).await?;
            debug!(
                status = response.status().as_u16(),
                logger_token = logger_token(response.headers()),
                "gateway response"
            );

            let status = response.status().as_u16();
            if retries < policy.max_retries && policy.should_retry(spec.method(), status) {
                retries += 1;
                warn!(
                    retries_left = policy.max_retries - retries,
                    logger_token = logger_token(response.headers()),
                    "retrying request"
                );
                tokio::time::sleep(policy.backoff_delay(retries)).await;
                continue;
            }
            return Ok(response);
        }
    }

    async fn send_once(&self, url: &str, spec: &CallSpec, token: &Token) -> Result<Response, Error> {
        // Caller headers are merged first; the session token always wins on
        // Authorization.
        let mut headers = spec.headers().clone();
        headers.insert(AUTHORIZATION, bearer(token)?);

        let mut request = self
            .client
            .request(spec.method().clone(), url)
            .headers(headers);
        if !spec.params().is_empty() {
            request = request.query(spec.params());
        }
        if let Some(body) = spec.body_value() {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }
}

fn bearer(token: &Token) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
        .map_err(|_| AuthError::InvalidToken.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_carries_the_token() {
        let value = bearer(&Token::new("abc.def.ghi")).unwrap();
        assert_eq!(value.to_str().unwrap(), "Bearer abc.def.ghi");
    }

    #[test]
    fn control_characters_in_a_token_are_rejected() {
        assert!(bearer(&Token::new("bad\ntoken")).is_err());
    }
}
