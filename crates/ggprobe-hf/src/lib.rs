#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod config;
mod error;
mod http;
mod models;
mod probe;
mod range_reader;
mod store;
mod url;

// ============================================================================
// Public API
// ============================================================================

// Store
pub use store::{DefaultHfStore, HfModelFileStore};

// Range reader (usable standalone over any backend)
pub use range_reader::LazyRangeReader;

// HTTP seam
pub use http::{HttpBackend, ReqwestBackend};

// Configuration and DTOs
pub use config::HfStoreConfig;
pub use models::{HfRepoRef, RangeResponse};

// Errors
pub use error::HfError;

// Test support
#[cfg(any(test, feature = "test-utils"))]
pub use http::testing;
