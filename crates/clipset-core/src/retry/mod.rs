//! Retry and backoff policy.
//!
//! Failure classification is deliberately two-valued: an attempt either hit a
//! transient condition worth retrying, or a fatal one that retrying cannot
//! fix (origin-side unavailability). The pipeline shares one retry loop for
//! acquisition and transformation via a caller-supplied classify function.

mod policy;
mod run;

pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
