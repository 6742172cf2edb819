//! Conversions API dispatch for the conversion relay.

pub mod client;
pub mod payload;

pub use client::{ConversionsClient, DispatchReceipt, GraphApiClient};
