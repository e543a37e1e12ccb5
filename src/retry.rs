//! Bounded fixed-delay retry for connection setup.
//!
//! Only transient transport faults are retried; authentication rejections
//! and protocol-level errors fail on the first attempt.

use std::future::Future;
use std::time::Duration;

use log::{info, warn};

use crate::error::ConnectionError;

/// Retry policy for fallible connection attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Number of connection attempts.
    pub attempts: u32,

    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given attempt count and delay.
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// Run `connect` until it succeeds or the policy is exhausted.
    ///
    /// `target` names the endpoint for logging and for the exhaustion
    /// error. Transient failures sleep [`Self::delay`] between attempts;
    /// any other failure is returned immediately.
    pub async fn connect<T, F, Fut>(
        &self,
        target: &str,
        mut connect: F,
    ) -> Result<T, ConnectionError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ConnectionError>>,
    {
        for attempt in 1..=self.attempts {
            match connect().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() => {
                    warn!(
                        "Connection attempt {}/{} to {} failed: {}",
                        attempt, self.attempts, target, err
                    );
                    if attempt < self.attempts {
                        info!("Retrying in {:?}...", self.delay);
                        tokio::time::sleep(self.delay).await;
                    }
                }
                Err(err) => return Err(err),
            }
        }

        Err(ConnectionError::AttemptsExhausted {
            host: target.to_string(),
            attempts: self.attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Mutex;

    fn refused() -> ConnectionError {
        ConnectionError::ConnectionFailed {
            host: "10.0.0.1".into(),
            port: 22,
            source: io::Error::from(io::ErrorKind::ConnectionRefused),
        }
    }

    fn fast() -> RetryPolicy {
        RetryPolicy::new(3, Duration::ZERO)
    }

    #[tokio::test]
    async fn auth_failure_is_not_retried() {
        let calls = Mutex::new(0u32);
        let result: Result<(), _> = fast()
            .connect("10.0.0.1", || {
                *calls.lock().unwrap() += 1;
                async {
                    Err(ConnectionError::AuthenticationFailed {
                        user: "admin".into(),
                    })
                }
            })
            .await;

        assert!(matches!(
            result,
            Err(ConnectionError::AuthenticationFailed { .. })
        ));
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn transient_failure_retries_then_succeeds() {
        let calls = Mutex::new(0u32);
        let result = fast()
            .connect("10.0.0.1", || {
                let mut n = calls.lock().unwrap();
                *n += 1;
                let attempt = *n;
                async move {
                    if attempt < 3 { Err(refused()) } else { Ok(attempt) }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(*calls.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn exhaustion_names_the_attempt_count() {
        let result: Result<(), _> = fast()
            .connect("10.0.0.1", || async { Err(refused()) })
            .await;

        match result {
            Err(ConnectionError::AttemptsExhausted { host, attempts }) => {
                assert_eq!(host, "10.0.0.1");
                assert_eq!(attempts, 3);
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn protocol_errors_fail_immediately() {
        let calls = Mutex::new(0u32);
        let result: Result<(), _> = fast()
            .connect("10.0.0.1", || {
                *calls.lock().unwrap() += 1;
                async { Err(ConnectionError::Disconnected) }
            })
            .await;

        assert!(matches!(result, Err(ConnectionError::Disconnected)));
        assert_eq!(*calls.lock().unwrap(), 1);
    }
}
