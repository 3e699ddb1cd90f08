pub mod config;
pub mod logging;

pub mod fetch;
pub mod layout;
pub mod manifest;
pub mod pipeline;
pub mod record;
pub mod retry;
pub mod scheduler;
pub mod store;
pub mod trim;

#[cfg(test)]
pub(crate) mod testutil;
