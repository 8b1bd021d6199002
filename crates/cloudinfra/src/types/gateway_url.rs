//! Gateway base URL type.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::{ConfigError, Error};

/// A validated gateway base URL.
///
/// This type ensures the URL is absolute, uses HTTPS (or HTTP for localhost),
/// and is properly normalized for endpoint construction.
///
/// # Example
///
/// ```
/// use cloudinfra::GatewayUrl;
///
/// let gateway = GatewayUrl::new("https://cloudinfra-gw-us.portal.checkpoint.com").unwrap();
/// assert_eq!(gateway.call_url("api/v1", "user"),
///            "https://cloudinfra-gw-us.portal.checkpoint.com/api/v1/user");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GatewayUrl(Url);

impl GatewayUrl {
    /// Create a new gateway URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| ConfigError::InvalidUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        Ok(Self(url))
    }

    /// Returns the token-exchange endpoint URL, with an optional user-auth
    /// suffix appended to the path.
    pub fn auth_url(&self, user_auth: &str) -> String {
        format!("{}/auth/external{}", self.as_str(), user_auth)
    }

    /// Returns the call URL for an endpoint inside an app namespace.
    pub fn call_url(&self, app: &str, endpoint: &str) -> String {
        format!("{}/{}/{}", self.as_str(), app, endpoint)
    }

    /// Returns the base URL as a string, without a trailing slash.
    pub fn as_str(&self) -> &str {
        // The url crate always serializes a root path as "/"
        self.0.as_str().trim_end_matches('/')
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        // Must be absolute
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        // Must be HTTPS (or HTTP for localhost)
        let scheme = url.scheme();
        let is_localhost = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "::1");

        if scheme != "https" && !(scheme == "http" && is_localhost) {
            return Err(ConfigError::InvalidUrl {
                value: original.to_string(),
                reason: "must use HTTPS (HTTP allowed only for localhost)".to_string(),
            }
            .into());
        }

        // Must have a host
        if url.host_str().is_none() {
            return Err(ConfigError::InvalidUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for GatewayUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GatewayUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_https() {
        let gateway = GatewayUrl::new("https://cloudinfra-gw.portal.checkpoint.com").unwrap();
        assert_eq!(
            gateway.as_str(),
            "https://cloudinfra-gw.portal.checkpoint.com"
        );
    }

    #[test]
    fn accepts_http_localhost_only() {
        assert!(GatewayUrl::new("http://127.0.0.1:8080").is_ok());
        assert!(GatewayUrl::new("http://localhost:8080").is_ok());
        assert!(GatewayUrl::new("http://example.com").is_err());
    }

    #[test]
    fn rejects_relative_and_hostless() {
        assert!(GatewayUrl::new("not a url").is_err());
        assert!(GatewayUrl::new("unix:/run/socket").is_err());
    }

    #[test]
    fn builds_auth_url_with_suffix() {
        let gateway = GatewayUrl::new("https://gw.example.com").unwrap();
        assert_eq!(gateway.auth_url(""), "https://gw.example.com/auth/external");
        assert_eq!(
            gateway.auth_url("/user"),
            "https://gw.example.com/auth/external/user"
        );
    }

    #[test]
    fn builds_call_url() {
        let gateway = GatewayUrl::new("https://gw.example.com/").unwrap();
        assert_eq!(
            gateway.call_url("app/waf", "policy"),
            "https://gw.example.com/app/waf/policy"
        );
    }

    #[test]
    fn display_has_no_trailing_slash() {
        let gateway = GatewayUrl::new("https://gw.example.com/").unwrap();
        assert_eq!(gateway.to_string(), "https://gw.example.com");
    }
}
