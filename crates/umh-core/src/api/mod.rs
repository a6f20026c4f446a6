//! Catalog API client
//!
//! HTTP client for the uMod plugin catalog, with a request rate gate and
//! retry/backoff handling.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::UmodClient;
pub use types::{PluginDetail, SearchPage};
