//! Price category classifier for short-term rental listings.
//!
//! Raw listings are cleaned by [`preprocessing`], encoded by [`features`]
//! against the tables in [`encoding`], fitted by [`training`] and served by
//! [`server`].

pub mod config;
pub mod encoding;
pub mod error;
pub mod features;
pub mod io;
pub mod model_store;
pub mod preprocessing;
pub mod server;
pub mod telemetry;
pub mod training;

pub use error::{PipelineError, Result};
