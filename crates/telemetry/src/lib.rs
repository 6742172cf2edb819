//! Tracing setup for the conversion relay.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, init_tracing_from_env};
