//! HTTP client core: envelope decoding, bearer auth and single-flight token
//! refresh.

pub mod client;
pub(crate) mod dto;
pub mod envelope;
pub(crate) mod refresh;

pub use client::{ApiClient, AuthState};
pub use envelope::{Page, Payload};
