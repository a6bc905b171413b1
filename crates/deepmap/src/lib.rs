//! deepmap - structural deep transforms over JSON documents.
//!
//! This crate provides the `deepmap` CLI binary on top of `deepmap-core`.
//!
//! ## Modules
//!
//! - `cli` - command implementations
//! - `error` - unified error type and exit codes
//! - `output` - JSON response types
//! - `stats` - document statistics
//! - `transform` - built-in transforms

pub mod cli;
pub mod error;
pub mod output;
pub mod stats;
pub mod transform;

pub use error::{DeepmapError, OutputErrorCode};
pub use output::{ErrorInfo, ErrorResponse, MapResponse, StatsResponse, SCHEMA_VERSION};
pub use transform::{TransformKind, TransformSpec};
