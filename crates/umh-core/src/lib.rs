//! umh-core - uMod plugin harvesting engine
//!
//! A rate-limited, retrying, concurrent pipeline that pages through the
//! uMod plugin catalog, normalizes each raw record into a canonical
//! [`Plugin`], and persists one JSON file per plugin.
//!
//! # Overview
//!
//! - [`api::UmodClient`] - catalog HTTP client with a request rate gate and
//!   exponential backoff retries
//! - [`harvest::PageFetcher`] - sequential pagination over the search
//!   endpoint, preserving partial progress on failure
//! - [`harvest::normalize`] - pure raw-record-to-entity mapping with
//!   field-level fallbacks
//! - [`harvest::BatchProcessor`] - bounded worker pool over fixed-size,
//!   barrier-delimited batches
//! - [`harvest::PluginStore`] - write-and-verify persistence sink
//! - [`Harvester`] - facade running the whole pipeline
//!
//! This crate never initializes logging and has no CLI surface; both live
//! in the `umh` binary.

pub mod api;
pub mod config;
pub mod error;
pub mod harvest;
pub mod model;
pub mod retry;

// Re-export commonly used types
pub use config::HarvestConfig;
pub use error::{HarvestError, Result};
pub use harvest::{Harvester, HarvestSummary};
pub use model::{Plugin, PluginVersion, RawRecord};
