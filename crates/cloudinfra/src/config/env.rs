//! Environment-variable credential provider.

use crate::error::Error;
use crate::types::GatewayUrl;

use super::{Credentials, DEFAULT_APP, ENV_APP, ENV_KEY, ENV_SECRET, ENV_URL};

/// Reads credentials from the `CLOUDINFRA_*` environment variables.
///
/// Produces a value only when the URL, key and secret are all set; the app
/// namespace falls back to the gateway default.
#[derive(Debug, Default)]
pub struct EnvProvider;

impl EnvProvider {
    pub fn new() -> Self {
        Self
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Credentials>, Error> {
        let (Some(base_url), Some(key), Some(secret)) =
            (lookup(ENV_URL), lookup(ENV_KEY), lookup(ENV_SECRET))
        else {
            return Ok(None);
        };

        let base_url = GatewayUrl::new(&base_url)?;
        let app = lookup(ENV_APP).unwrap_or_else(|| DEFAULT_APP.to_string());

        Ok(Some(Credentials::new(base_url, key, secret, app)))
    }
}

impl super::CredentialProvider for EnvProvider {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn load(&self) -> Result<Option<Credentials>, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}
