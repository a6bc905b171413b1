//! JSON response types for CLI output.
//!
//! Every command writes exactly one JSON object to stdout. Successful
//! responses carry `"status": "ok"`; failures carry `"status": "error"` and
//! an [`ErrorInfo`].

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::{DeepmapError, OutputErrorCode};
use crate::stats::DocumentStats;

/// Version of the response schema.
pub const SCHEMA_VERSION: &str = "1";

/// Response for the `map` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapResponse {
    pub status: String,
    pub schema_version: String,
    /// Name of the transform that was applied.
    pub transform: String,
    /// The mapped document.
    pub result: serde_json::Value,
}

impl MapResponse {
    pub fn new(transform: impl Into<String>, result: serde_json::Value) -> Self {
        MapResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            transform: transform.into(),
            result,
        }
    }
}

/// Response for the `stats` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub status: String,
    pub schema_version: String,
    pub stats: DocumentStats,
}

impl StatsResponse {
    pub fn new(stats: DocumentStats) -> Self {
        StatsResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            stats,
        }
    }
}

/// Error details for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code, also the exit code.
    pub code: u8,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    pub fn from_error(err: &DeepmapError) -> Self {
        let code = OutputErrorCode::from(err).code();
        let details = match err {
            DeepmapError::InvalidInput { line, column, .. } => {
                Some(serde_json::json!({ "line": line, "column": column }))
            }
            DeepmapError::FileNotFound { path } => Some(serde_json::json!({ "path": path })),
            _ => None,
        };
        ErrorInfo {
            code,
            message: err.to_string(),
            details,
        }
    }
}

/// Error response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    pub fn from_error(err: &DeepmapError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

/// Emit a response as compact JSON (single line) to a writer.
pub fn emit_response_compact<T: Serialize>(
    response: &T,
    writer: &mut impl Write,
) -> io::Result<()> {
    let json = serde_json::to_string(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}
