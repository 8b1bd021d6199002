//! Bearer token type.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// An opaque bearer token for authenticated gateway requests.
///
/// Tokens are short-lived signed strings (three dot-separated segments).
/// Expiry is not tracked client-side; it is discovered reactively through a
/// 401 response, which triggers a refresh.
///
/// The empty token is a sentinel meaning "no token": requests sent with it
/// are expected to 401 and ride the standard refresh path.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Create a token from its string value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The "no token" sentinel.
    pub fn none() -> Self {
        Self(String::new())
    }

    /// Whether this is the "no token" sentinel.
    pub fn is_none(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the token value for use in authorization headers.
    ///
    /// # Security
    ///
    /// Use only when constructing HTTP authorization headers or exporting
    /// the token on explicit caller request.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the claims segment for diagnostic logging.
    ///
    /// Returns `None` when the token does not look like a signed
    /// three-segment string.
    pub(crate) fn claims(&self) -> Option<String> {
        let segment = self.0.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD.decode(segment).ok()?;
        String::from_utf8(bytes).ok()
    }
}

// Hide token value in Debug output
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hides_value_in_debug() {
        let token = Token::new("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.payload.sig");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("eyJ"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn empty_token_is_the_sentinel() {
        assert!(Token::none().is_none());
        assert!(!Token::new("abc.def.ghi").is_none());
    }

    #[test]
    fn decodes_the_claims_segment() {
        let claims = r#"{"appId":"client-id"}"#;
        let token = Token::new(format!("header.{}.signature", URL_SAFE_NO_PAD.encode(claims)));
        assert_eq!(token.claims().as_deref(), Some(claims));
    }

    #[test]
    fn claims_of_an_unsigned_value_are_none() {
        assert!(Token::new("not-a-jwt").claims().is_none());
        assert!(Token::none().claims().is_none());
    }
}
