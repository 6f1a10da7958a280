//! The request executor.
//!
//! [`Executor::execute`] drives one logical operation: it assembles the wire
//! request, sends it through the [`Transport`], classifies the answer with the
//! operation's [`ResponseMatcher`] and retries under the effective
//! [`RetryConfig`](crate::clients::RetryConfig) until it succeeds, the policy
//! stops, or the caller cancels.
//!
//! # Cancellation and Timeouts
//!
//! Both suspension points (the transport call and the backoff sleep) race
//! against the call's cancellation token. Cancelling drops the in-flight
//! transport future, so a late response is never observed. The per-attempt
//! timeout wraps the transport call with [`tokio::time::timeout`].

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::clients::errors::{Outcome, RegistryError, TransportError};
use crate::clients::hooks::SdkHooks;
use crate::clients::http_request::{HttpRequest, RequestOptions, WireRequest};
use crate::clients::http_response::HttpResponse;
use crate::clients::matcher::ResponseMatcher;
use crate::clients::retry::{RetryDecision, RetryPolicy};
use crate::clients::transport::Transport;
use crate::config::SdkConfig;

/// Runs operations against a transport with the client's configuration.
///
/// Cloning is cheap; clones share the transport, configuration and hooks.
#[derive(Clone)]
pub struct Executor {
    transport: Arc<dyn Transport>,
    config: Arc<SdkConfig>,
    hooks: Arc<[Arc<dyn SdkHooks>]>,
}

// Verify Executor is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Executor>();
};

impl Executor {
    /// Creates an executor without hooks.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, config: Arc<SdkConfig>) -> Self {
        Self::with_hooks(transport, config, Vec::new())
    }

    /// Creates an executor that runs `hooks` around every attempt.
    #[must_use]
    pub fn with_hooks(
        transport: Arc<dyn Transport>,
        config: Arc<SdkConfig>,
        hooks: Vec<Arc<dyn SdkHooks>>,
    ) -> Self {
        Self {
            transport,
            config,
            hooks: hooks.into(),
        }
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Executes `request`, retrying as configured.
    ///
    /// # Errors
    ///
    /// Returns the [`RegistryError`] of the last attempt once the retry
    /// policy stops, [`RegistryError::Aborted`] if the call was cancelled, or
    /// [`RegistryError::InvalidHttpRequest`] if `request` is malformed.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: &HttpRequest,
        matcher: &ResponseMatcher<T>,
        options: &RequestOptions,
    ) -> Outcome<T> {
        request.verify()?;

        let retry_config = options
            .retry_config
            .as_ref()
            .unwrap_or_else(|| self.config.retry_config());
        let policy = RetryPolicy::new(retry_config);
        let cancellation = options.cancellation.clone().unwrap_or_default();

        let start = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            if cancellation.is_cancelled() {
                return Err(RegistryError::Aborted);
            }

            let credential = self.config.security().resolve();
            let mut wire = WireRequest::build(request, credential.as_ref(), &self.config, options);
            for hook in self.hooks.iter() {
                hook.before_request(&mut wire);
            }

            tracing::debug!(
                method = %wire.method,
                url = %wire.url,
                attempt = attempt + 1,
                "sending request"
            );

            let error = match self.send_attempt(&wire, &cancellation).await? {
                Ok(response) => {
                    for hook in self.hooks.iter() {
                        hook.after_response(&wire, &response);
                    }
                    match matcher.match_response(&response) {
                        Ok(value) => return Ok(value),
                        Err(error) => error,
                    }
                }
                Err(transport_error) => {
                    for hook in self.hooks.iter() {
                        hook.after_error(&wire, &transport_error);
                    }
                    into_registry_error(transport_error, wire.timeout)
                }
            };

            match policy.decide(attempt, &error, start.elapsed()) {
                RetryDecision::Stop => {
                    if attempt > 0 {
                        tracing::warn!(
                            attempts = attempt + 1,
                            error = %error,
                            "giving up after retries"
                        );
                    }
                    return Err(error);
                }
                RetryDecision::RetryAfter(delay) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %error,
                        "retrying request"
                    );
                    tokio::select! {
                        () = cancellation.cancelled() => return Err(RegistryError::Aborted),
                        () = tokio::time::sleep(delay) => {}
                    }
                    attempt = attempt.saturating_add(1);
                }
            }
        }
    }

    /// Sends one attempt. The outer `Err` means the call was cancelled.
    async fn send_attempt(
        &self,
        wire: &WireRequest,
        cancellation: &CancellationToken,
    ) -> Result<Result<HttpResponse, TransportError>, RegistryError> {
        let send = async {
            match wire.timeout {
                Some(timeout) => tokio::time::timeout(timeout, self.transport.send(wire))
                    .await
                    .unwrap_or(Err(TransportError::Timeout)),
                None => self.transport.send(wire).await,
            }
        };

        tokio::select! {
            () = cancellation.cancelled() => Err(RegistryError::Aborted),
            result = send => Ok(result),
        }
    }
}

fn into_registry_error(error: TransportError, timeout: Option<Duration>) -> RegistryError {
    match error {
        TransportError::Timeout => RegistryError::Timeout { after: timeout },
        other => other.into(),
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("config", &self.config)
            .field("hooks", &self.hooks.len())
            .finish_non_exhaustive()
    }
}
