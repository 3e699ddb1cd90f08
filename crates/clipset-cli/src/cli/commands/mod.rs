mod run;
mod status;

pub use run::run_batches;
pub use status::run_status;
