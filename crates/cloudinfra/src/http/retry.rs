//! Connection-level retry policy.
//!
//! The gateway's documented policy is data, not code: tweak the constants or
//! build a [`RetryPolicy`] by hand to change behavior.

use std::time::Duration;

use reqwest::Method;

/// Status codes the gateway asks clients to retry.
const RETRY_STATUSES: [u16; 2] = [429, 503];

/// Retries after the initial attempt.
const MAX_RETRIES: u32 = 10;

/// Base factor for exponential backoff, in seconds.
const BACKOFF_FACTOR: f64 = 0.5;

/// Ceiling on a single backoff delay.
const BACKOFF_MAX: Duration = Duration::from_secs(120);

/// App namespaces whose POST calls are read-style and safe to retry.
const POST_SAFE_APP_PREFIXES: [&str; 1] = ["app/waf"];

/// Retry policy for one logical call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries allowed after the initial attempt.
    pub max_retries: u32,
    /// Base factor for exponential backoff, in seconds.
    pub backoff_factor: f64,
    /// Status codes that trigger a retry.
    pub retry_statuses: Vec<u16>,
    /// Methods eligible for retry.
    pub allowed_methods: Vec<Method>,
}

impl RetryPolicy {
    /// The gateway policy for calls against the given app namespace.
    ///
    /// Idempotent methods are always retryable; POST only for namespaces
    /// that use it for read-style calls.
    pub fn for_app(app: &str) -> Self {
        let mut allowed_methods = vec![
            Method::HEAD,
            Method::GET,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::TRACE,
        ];
        if POST_SAFE_APP_PREFIXES
            .iter()
            .any(|prefix| app.starts_with(prefix))
        {
            allowed_methods.push(Method::POST);
        }

        Self {
            max_retries: MAX_RETRIES,
            backoff_factor: BACKOFF_FACTOR,
            retry_statuses: RETRY_STATUSES.to_vec(),
            allowed_methods,
        }
    }

    /// Whether a response with this status to this method should be retried.
    pub fn should_retry(&self, method: &Method, status: u16) -> bool {
        self.retry_statuses.contains(&status) && self.allowed_methods.contains(method)
    }

    /// Delay before the given retry (1-based): factor x 2^(retry-1), capped.
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        let delay = Duration::from_secs_f64(self.backoff_factor * f64::from(1u32 << exponent));
        delay.min(BACKOFF_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_is_not_retryable_for_plain_apps() {
        let policy = RetryPolicy::for_app("api/v1");
        assert!(!policy.allowed_methods.contains(&Method::POST));
        assert!(!policy.should_retry(&Method::POST, 503));
        assert!(policy.should_retry(&Method::GET, 503));
    }

    #[test]
    fn post_is_retryable_for_waf_namespaces() {
        let policy = RetryPolicy::for_app("app/waf");
        assert!(policy.should_retry(&Method::POST, 429));

        let policy = RetryPolicy::for_app("app/waf-emea");
        assert!(policy.should_retry(&Method::POST, 503));
    }

    #[test]
    fn only_throttling_statuses_are_retried() {
        let policy = RetryPolicy::for_app("api/v1");
        assert!(policy.should_retry(&Method::GET, 429));
        assert!(policy.should_retry(&Method::GET, 503));
        assert!(!policy.should_retry(&Method::GET, 500));
        assert!(!policy.should_retry(&Method::GET, 502));
    }

    #[test]
    fn backoff_doubles_from_the_factor() {
        let policy = RetryPolicy::for_app("api/v1");
        assert_eq!(policy.backoff_delay(1), Duration::from_millis(500));
        assert_eq!(policy.backoff_delay(2), Duration::from_secs(1));
        assert_eq!(policy.backoff_delay(3), Duration::from_secs(2));
    }

    #[test]
    fn backoff_is_capped() {
        let policy = RetryPolicy::for_app("api/v1");
        assert_eq!(policy.backoff_delay(17), Duration::from_secs(120));
    }
}
