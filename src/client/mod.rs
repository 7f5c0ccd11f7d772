//! Client for the feature flag service.
//!
//! Consumers mostly need [`FlagClient::current_mode`], which never fails:
//! any transport error, non-success status or unrecognised mode reads as
//! `test`. The remaining methods back the `flag-cli` binary.

#[allow(clippy::module_inception)]
pub mod client;

pub use client::{ClientError, FlagClient, BASE_URL_VAR, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
