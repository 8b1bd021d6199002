//! Credential resolution.
//!
//! Credentials come from an ordered chain of [`CredentialProvider`]s: the
//! process environment first, then the profile file. The first provider that
//! produces a value wins; exhausting the chain is fatal.

mod env;
mod file;

pub use env::EnvProvider;
pub use file::{FileProvider, list_profiles, list_profiles_in};

use std::fmt;

use tracing::debug;

use crate::error::{ConfigError, Error};
use crate::types::GatewayUrl;

/// Environment variable naming the gateway base URL.
pub const ENV_URL: &str = "CLOUDINFRA_URL";
/// Environment variable naming the client id.
pub const ENV_KEY: &str = "CLOUDINFRA_KEY";
/// Environment variable naming the access key.
pub const ENV_SECRET: &str = "CLOUDINFRA_SECRET";
/// Environment variable selecting the credentials-file profile.
pub const ENV_PROFILE: &str = "CLOUDINFRA_PROFILE";
/// Environment variable naming the app namespace.
pub const ENV_APP: &str = "CLOUDINFRA_APP";
/// Environment variable overriding the credentials file location.
pub const ENV_CREDENTIALS_FILE: &str = "CLOUDINFRA_SHARED_CREDENTIALS_FILE";

/// Gateway used when no base URL is configured anywhere.
pub const DEFAULT_BASE_URL: &str = "https://cloudinfra-gw-us.portal.checkpoint.com";
/// App namespace used when none is configured.
pub const DEFAULT_APP: &str = "api/v1";
/// Profile used when none is selected.
pub const DEFAULT_PROFILE: &str = "default";
/// Credentials file location, relative to the home directory.
pub const DEFAULT_CREDENTIALS_FILE: &str = ".cloudinfra/credentials";

/// Resolved gateway credentials.
///
/// A file profile may carry only a base URL and app namespace (for sessions
/// constructed with an explicit token); [`Credentials::validate`] enforces
/// the full tuple before a token exchange is attempted.
///
/// # Security
///
/// The secret is never exposed in Debug output to prevent accidental logging.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    base_url: GatewayUrl,
    key: Option<String>,
    secret: Option<String>,
    app: String,
}

impl Credentials {
    /// Create complete credentials.
    pub fn new(
        base_url: GatewayUrl,
        key: impl Into<String>,
        secret: impl Into<String>,
        app: impl Into<String>,
    ) -> Self {
        Self {
            base_url,
            key: Some(key.into()),
            secret: Some(secret.into()),
            app: app.into(),
        }
    }

    /// Create credentials that may be missing the key/secret pair.
    pub(crate) fn partial(
        base_url: GatewayUrl,
        key: Option<String>,
        secret: Option<String>,
        app: String,
    ) -> Self {
        Self {
            base_url,
            key,
            secret,
            app,
        }
    }

    /// Returns the gateway base URL.
    pub fn base_url(&self) -> &GatewayUrl {
        &self.base_url
    }

    /// Returns the client id, if present.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Returns the access key, if present.
    ///
    /// # Security
    ///
    /// Use this only when constructing authentication requests or exporting
    /// credentials on explicit user request. Never log this value.
    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    /// Returns the app namespace.
    pub fn app(&self) -> &str {
        &self.app
    }

    /// Replace the app namespace.
    pub fn set_app(&mut self, app: impl Into<String>) {
        self.app = app.into();
    }

    /// Check that every field required for a token exchange is present.
    pub fn validate(&self) -> Result<(), Error> {
        if self.key.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::Incomplete { missing: ENV_KEY }.into());
        }
        if self.secret.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::Incomplete { missing: ENV_SECRET }.into());
        }
        if self.app.is_empty() {
            return Err(ConfigError::Incomplete { missing: ENV_APP }.into());
        }
        Ok(())
    }
}

// Intentionally hide the secret in Debug output
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("key", &self.key)
            .field("secret", &"[REDACTED]")
            .field("app", &self.app)
            .finish()
    }
}

/// A source of gateway credentials.
pub trait CredentialProvider: Send + Sync {
    /// Short name used in diagnostics when the chain is exhausted.
    fn name(&self) -> &'static str;

    /// Attempt to produce credentials from this source.
    ///
    /// `Ok(None)` means "this source has nothing", letting the chain move
    /// on; errors abort the chain.
    fn load(&self) -> Result<Option<Credentials>, Error>;
}

/// The standard provider chain: environment, then credentials file.
pub fn default_providers() -> Vec<Box<dyn CredentialProvider>> {
    vec![Box::new(EnvProvider::new()), Box::new(FileProvider::new())]
}

/// Resolve credentials from a provider chain; the first source that
/// produces a value wins.
pub fn resolve(providers: &[Box<dyn CredentialProvider>]) -> Result<Credentials, Error> {
    let mut tried = Vec::new();
    for provider in providers {
        tried.push(provider.name().to_string());
        if let Some(credentials) = provider.load()? {
            debug!(provider = provider.name(), "credentials resolved");
            return Ok(credentials);
        }
    }
    Err(ConfigError::NoCredentials { tried }.into())
}

/// Resolve credentials from the standard chain.
pub fn resolve_default() -> Result<Credentials, Error> {
    resolve(&default_providers())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct FakeProvider {
        name: &'static str,
        credentials: Option<Credentials>,
        calls: Arc<AtomicUsize>,
    }

    impl FakeProvider {
        fn new(name: &'static str, credentials: Option<Credentials>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let provider = Self {
                name,
                credentials,
                calls: Arc::clone(&calls),
            };
            (provider, calls)
        }
    }

    impl CredentialProvider for FakeProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        fn load(&self) -> Result<Option<Credentials>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.credentials.clone())
        }
    }

    fn sample_credentials() -> Credentials {
        Credentials::new(
            GatewayUrl::new("https://gw.example.com").unwrap(),
            "client-id",
            "access-key",
            "api/v1",
        )
    }

    #[test]
    fn first_provider_wins_and_later_ones_are_never_invoked() {
        let (first, first_calls) = FakeProvider::new("first", Some(sample_credentials()));
        let (second, second_calls) = FakeProvider::new("second", Some(sample_credentials()));
        let providers: Vec<Box<dyn CredentialProvider>> = vec![Box::new(first), Box::new(second)];

        let credentials = resolve(&providers).unwrap();
        assert_eq!(credentials, sample_credentials());
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_provider_falls_through_to_the_next() {
        let (first, _) = FakeProvider::new("first", None);
        let (second, second_calls) = FakeProvider::new("second", Some(sample_credentials()));
        let providers: Vec<Box<dyn CredentialProvider>> = vec![Box::new(first), Box::new(second)];

        assert!(resolve(&providers).is_ok());
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn exhausted_chain_names_every_provider() {
        let (environment, _) = FakeProvider::new("environment", None);
        let (file, _) = FakeProvider::new("file", None);
        let providers: Vec<Box<dyn CredentialProvider>> =
            vec![Box::new(environment), Box::new(file)];

        let err = resolve(&providers).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("environment"));
        assert!(message.contains("file"));
    }

    #[test]
    fn validate_names_the_missing_field() {
        let gateway = GatewayUrl::new("https://gw.example.com").unwrap();
        let credentials =
            Credentials::partial(gateway, None, Some("access-key".into()), "api/v1".into());

        let err = credentials.validate().unwrap_err();
        assert!(err.to_string().contains(ENV_KEY));
    }

    #[test]
    fn debug_redacts_the_secret() {
        let credentials = sample_credentials();
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("access-key"));
        assert!(debug.contains("[REDACTED]"));
    }
}
