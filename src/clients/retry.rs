//! Retry configuration and the backoff policy.
//!
//! [`RetryConfig`] is an immutable value attached to the client as a default
//! and optionally replaced per call. [`RetryPolicy`] interprets it: given the
//! error of an attempt and the time spent so far, it decides whether to wait
//! and try again.
//!
//! # Delay Schedule
//!
//! For zero-based retry `n` the delay is
//! `min(max_interval, initial_interval * exponent^n)`, or `initial_interval`
//! for every retry under [`RetryStrategy::Fixed`]. A parseable
//! `Retry-After` header on the failed response replaces the computed delay.
//! Retrying stops once the next attempt would start after `max_elapsed_time`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use rand::Rng;

use crate::clients::errors::RegistryError;
use crate::error::ConfigError;

/// A status code matcher: an exact code or a whole class such as `5XX`.
///
/// # Example
///
/// ```rust
/// use smithery_sdk::clients::StatusPattern;
///
/// let pattern: StatusPattern = "5XX".parse().unwrap();
/// assert!(pattern.matches(503));
/// assert!(!pattern.matches(429));
///
/// let exact: StatusPattern = "429".parse().unwrap();
/// assert!(exact.matches(429));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusPattern {
    /// Matches one status code.
    Exact(u16),
    /// Matches every code in `class*100..class*100+100`.
    Class(u16),
}

impl StatusPattern {
    /// Returns `true` if `status` falls under this pattern.
    #[must_use]
    pub const fn matches(&self, status: u16) -> bool {
        match *self {
            Self::Exact(code) => code == status,
            Self::Class(class) => status / 100 == class,
        }
    }
}

impl FromStr for StatusPattern {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidStatusPattern {
            pattern: s.to_string(),
        };
        let s = s.trim();
        if s.len() != 3 {
            return Err(invalid());
        }

        if let Some(class) = s.strip_suffix("XX").or_else(|| s.strip_suffix("xx")) {
            let class: u16 = class.parse().map_err(|_| invalid())?;
            if (1..=5).contains(&class) {
                return Ok(Self::Class(class));
            }
            return Err(invalid());
        }

        let code: u16 = s.parse().map_err(|_| invalid())?;
        if (100..=599).contains(&code) {
            Ok(Self::Exact(code))
        } else {
            Err(invalid())
        }
    }
}

impl fmt::Display for StatusPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(code) => write!(f, "{code}"),
            Self::Class(class) => write!(f, "{class}XX"),
        }
    }
}

impl From<u16> for StatusPattern {
    fn from(code: u16) -> Self {
        Self::Exact(code)
    }
}

/// Whether failed attempts are retried, and how the delay grows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RetryStrategy {
    /// A single attempt is made.
    None,
    /// Failed attempts are retried with exponential backoff.
    #[default]
    Backoff,
    /// Failed attempts are retried after a constant `initial_interval`.
    Fixed,
}

/// Retry behavior for one call.
///
/// # Defaults
///
/// - `strategy`: [`RetryStrategy::Backoff`]
/// - `initial_interval`: 500 ms
/// - `max_interval`: 60 s
/// - `exponent`: 1.5
/// - `max_elapsed_time`: 1 hour
/// - `retry_connection_errors`: `true`
/// - `retry_codes`: `5XX`, `429`
/// - `max_attempts`: unlimited (bounded by `max_elapsed_time`)
/// - `jitter`: `false`
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use smithery_sdk::clients::RetryConfig;
///
/// let config = RetryConfig {
///     max_elapsed_time: Duration::from_secs(30),
///     ..RetryConfig::default()
/// };
///
/// assert_eq!(config.backoff_delay(0), Duration::from_millis(500));
/// assert_eq!(config.backoff_delay(1), Duration::from_millis(750));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RetryConfig {
    /// Whether to retry at all.
    pub strategy: RetryStrategy,
    /// Delay before the first retry.
    pub initial_interval: Duration,
    /// Upper bound for any single computed delay.
    pub max_interval: Duration,
    /// Growth factor between consecutive delays.
    pub exponent: f64,
    /// No attempt starts after this much time has passed since the first one.
    pub max_elapsed_time: Duration,
    /// Retry connection-level failures (refused connections, timeouts).
    pub retry_connection_errors: bool,
    /// Response statuses that are retried.
    pub retry_codes: Vec<StatusPattern>,
    /// Optional cap on the total number of attempts.
    pub max_attempts: Option<u32>,
    /// Scale computed delays by a random factor in `[0.5, 1.5)`.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            strategy: RetryStrategy::Backoff,
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(60),
            exponent: 1.5,
            max_elapsed_time: Duration::from_secs(3600),
            retry_connection_errors: true,
            retry_codes: vec![StatusPattern::Class(5), StatusPattern::Exact(429)],
            max_attempts: None,
            jitter: false,
        }
    }
}

impl RetryConfig {
    /// A configuration that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self {
            strategy: RetryStrategy::None,
            ..Self::default()
        }
    }

    /// Computes the delay for zero-based retry `attempt`, ignoring jitter and
    /// `Retry-After`.
    ///
    /// [`RetryStrategy::Fixed`] always yields `initial_interval`.
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        if self.strategy == RetryStrategy::Fixed {
            return self.initial_interval;
        }
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let seconds = self.initial_interval.as_secs_f64() * self.exponent.powi(exponent);
        if !seconds.is_finite() || seconds >= self.max_interval.as_secs_f64() {
            self.max_interval
        } else {
            Duration::from_secs_f64(seconds.max(0.0))
        }
    }

    /// Returns `true` if `error` is eligible for another attempt under this
    /// configuration, independent of elapsed time.
    ///
    /// A `401` is never retried.
    #[must_use]
    pub fn is_retryable(&self, error: &RegistryError) -> bool {
        if self.strategy == RetryStrategy::None {
            return false;
        }
        if error.is_connection_level() {
            return self.retry_connection_errors;
        }
        match error.status() {
            None | Some(401) => false,
            Some(status) => self.retry_codes.iter().any(|p| p.matches(status)),
        }
    }
}

/// What to do after a failed attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryDecision {
    /// Sleep for the given duration, then try again.
    RetryAfter(Duration),
    /// Return the error to the caller.
    Stop,
}

/// Interprets a [`RetryConfig`] for one call.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy<'a> {
    config: &'a RetryConfig,
}

impl<'a> RetryPolicy<'a> {
    /// Creates a policy over `config`.
    #[must_use]
    pub const fn new(config: &'a RetryConfig) -> Self {
        Self { config }
    }

    /// Decides what follows failed attempt `attempt` (zero-based).
    ///
    /// `elapsed` is measured from the start of the first attempt.
    #[must_use]
    pub fn decide(&self, attempt: u32, error: &RegistryError, elapsed: Duration) -> RetryDecision {
        if !self.config.is_retryable(error) {
            return RetryDecision::Stop;
        }

        if let Some(max_attempts) = self.config.max_attempts {
            if attempt.saturating_add(1) >= max_attempts {
                return RetryDecision::Stop;
            }
        }

        if elapsed >= self.config.max_elapsed_time {
            return RetryDecision::Stop;
        }

        let delay = error
            .retry_after()
            .unwrap_or_else(|| self.computed_delay(attempt));

        if elapsed
            .checked_add(delay)
            .is_none_or(|next_start| next_start > self.config.max_elapsed_time)
        {
            return RetryDecision::Stop;
        }

        RetryDecision::RetryAfter(delay)
    }

    fn computed_delay(&self, attempt: u32) -> Duration {
        let delay = self.config.backoff_delay(attempt);
        if self.config.jitter {
            let factor = rand::thread_rng().gen_range(0.5..1.5);
            Duration::try_from_secs_f64(delay.as_secs_f64() * factor).unwrap_or(delay)
        } else {
            delay
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::errors::ApiError;

    fn server_error(status: u16) -> RegistryError {
        RegistryError::Server(ApiError::new(status, "Server error"))
    }

    #[test]
    fn test_status_pattern_parsing() {
        assert_eq!("5XX".parse::<StatusPattern>(), Ok(StatusPattern::Class(5)));
        assert_eq!("4xx".parse::<StatusPattern>(), Ok(StatusPattern::Class(4)));
        assert_eq!(
            "429".parse::<StatusPattern>(),
            Ok(StatusPattern::Exact(429))
        );

        assert!("6XX".parse::<StatusPattern>().is_err());
        assert!("42".parse::<StatusPattern>().is_err());
        assert!("abc".parse::<StatusPattern>().is_err());
        assert!("999".parse::<StatusPattern>().is_err());
    }

    #[test]
    fn test_status_pattern_display() {
        assert_eq!(StatusPattern::Class(5).to_string(), "5XX");
        assert_eq!(StatusPattern::Exact(404).to_string(), "404");
    }

    #[test]
    fn test_backoff_delays_strictly_increase_until_capped() {
        let config = RetryConfig::default();
        let delays: Vec<Duration> = (0..20).map(|n| config.backoff_delay(n)).collect();

        assert_eq!(delays[0], Duration::from_millis(500));
        let first_capped = delays
            .iter()
            .position(|d| *d == Duration::from_secs(60))
            .unwrap();
        for pair in delays[..=first_capped].windows(2) {
            assert!(pair[0] < pair[1], "{:?} should be < {:?}", pair[0], pair[1]);
        }
        assert!(delays[first_capped..]
            .iter()
            .all(|d| *d == Duration::from_secs(60)));
    }

    #[test]
    fn test_backoff_delay_handles_huge_attempts() {
        let config = RetryConfig::default();
        assert_eq!(config.backoff_delay(u32::MAX), Duration::from_secs(60));
    }

    #[test]
    fn test_none_strategy_never_retries() {
        let config = RetryConfig::none();
        let policy = RetryPolicy::new(&config);
        assert_eq!(
            policy.decide(0, &server_error(503), Duration::ZERO),
            RetryDecision::Stop
        );
    }

    #[test]
    fn test_401_is_never_retried_even_when_listed() {
        let config = RetryConfig {
            retry_codes: vec![StatusPattern::Class(4), StatusPattern::Exact(401)],
            ..RetryConfig::default()
        };
        let error = RegistryError::Unauthorized(ApiError::new(401, "Authentication failed"));
        assert!(!config.is_retryable(&error));
    }

    #[test]
    fn test_connection_errors_follow_flag() {
        let error = RegistryError::Connection("connection refused".to_string());

        let config = RetryConfig::default();
        assert!(config.is_retryable(&error));

        let config = RetryConfig {
            retry_connection_errors: false,
            ..RetryConfig::default()
        };
        assert!(!config.is_retryable(&error));
    }

    #[test]
    fn test_unlisted_status_is_not_retried() {
        let config = RetryConfig::default();
        let error = RegistryError::NotFound(ApiError::new(404, "Resource not found"));
        assert!(!config.is_retryable(&error));
        assert!(!config.is_retryable(&RegistryError::Aborted));
    }

    #[test]
    fn test_retry_after_overrides_computed_delay() {
        let config = RetryConfig::default();
        let policy = RetryPolicy::new(&config);
        let mut api_error = ApiError::new(429, "Too many requests");
        api_error.retry_after = Some(Duration::from_secs(7));
        let error = RegistryError::Client(api_error);

        assert_eq!(
            policy.decide(3, &error, Duration::ZERO),
            RetryDecision::RetryAfter(Duration::from_secs(7))
        );
    }

    #[test]
    fn test_stops_when_elapsed_budget_is_spent() {
        let config = RetryConfig {
            max_elapsed_time: Duration::from_secs(10),
            ..RetryConfig::default()
        };
        let policy = RetryPolicy::new(&config);

        assert_eq!(
            policy.decide(0, &server_error(503), Duration::from_secs(10)),
            RetryDecision::Stop
        );
        // 9.8s elapsed + 500ms delay would overshoot the budget
        assert_eq!(
            policy.decide(0, &server_error(503), Duration::from_millis(9800)),
            RetryDecision::Stop
        );
        assert_eq!(
            policy.decide(0, &server_error(503), Duration::from_secs(1)),
            RetryDecision::RetryAfter(Duration::from_millis(500))
        );
    }

    #[test]
    fn test_max_attempts_caps_retries() {
        let config = RetryConfig {
            max_attempts: Some(3),
            ..RetryConfig::default()
        };
        let policy = RetryPolicy::new(&config);
        assert!(matches!(
            policy.decide(1, &server_error(500), Duration::ZERO),
            RetryDecision::RetryAfter(_)
        ));
        assert_eq!(
            policy.decide(2, &server_error(500), Duration::ZERO),
            RetryDecision::Stop
        );
    }

    #[test]
    fn test_fixed_strategy_waits_initial_interval() {
        let config = RetryConfig {
            strategy: RetryStrategy::Fixed,
            initial_interval: Duration::from_millis(200),
            ..RetryConfig::default()
        };
        let policy = RetryPolicy::new(&config);

        for attempt in [0, 1, 5, 30] {
            assert_eq!(config.backoff_delay(attempt), Duration::from_millis(200));
            assert_eq!(
                policy.decide(attempt, &server_error(503), Duration::ZERO),
                RetryDecision::RetryAfter(Duration::from_millis(200))
            );
        }
    }

    #[test]
    fn test_huge_retry_after_stops_instead_of_overflowing() {
        let config = RetryConfig::default();
        let policy = RetryPolicy::new(&config);
        let mut api_error = ApiError::new(503, "Service unavailable");
        api_error.retry_after = Some(Duration::MAX);

        assert_eq!(
            policy.decide(0, &RegistryError::Server(api_error), Duration::from_secs(1)),
            RetryDecision::Stop
        );
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        let config = RetryConfig {
            jitter: true,
            ..RetryConfig::default()
        };
        let policy = RetryPolicy::new(&config);
        for _ in 0..50 {
            match policy.decide(0, &server_error(502), Duration::ZERO) {
                RetryDecision::RetryAfter(delay) => {
                    assert!(delay >= Duration::from_millis(250));
                    assert!(delay < Duration::from_millis(750));
                }
                RetryDecision::Stop => panic!("expected a retry"),
            }
        }
    }
}
