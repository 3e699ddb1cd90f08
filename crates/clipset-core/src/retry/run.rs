//! Retry loop: run a closure until success or the policy says stop.

use super::{ErrorKind, RetryDecision, RetryPolicy};

/// Runs `f` until it succeeds or the policy says to stop, classifying each
/// failure with `classify`. On retryable failure, sleeps for the backoff
/// duration then tries again. Returns the last error when retries are
/// exhausted or the failure is fatal.
pub fn run_with_retry<T, E, F, C>(policy: &RetryPolicy, classify: C, mut f: F) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    C: Fn(&E) -> ErrorKind,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(v) => return Ok(v),
            Err(e) => match policy.decide(attempt, classify(&e)) {
                RetryDecision::NoRetry => return Err(e),
                RetryDecision::RetryAfter(d) => {
                    std::thread::sleep(d);
                    attempt += 1;
                }
            },
        }
    }
}
