//! Error types and error code constants for deepmap.
//!
//! `DeepmapError` is the single error type rendered by the CLI. Errors from
//! the core crate and from JSON parsing are bridged into it with `From`
//! impls, and every variant maps to a stable `OutputErrorCode`:
//!
//! - `2`: Invalid arguments (bad flags from caller)
//! - `3`: Input errors (file not found, input is not JSON)
//! - `4`: Conversion errors (result has no JSON form)
//! - `10`: Internal errors (I/O failures, unexpected state)

use std::fmt;
use std::io;

use deepmap_core::json::JsonError;
use thiserror::Error;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output; also the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    InvalidArguments = 2,
    InputError = 3,
    ConversionError = 4,
    InternalError = 10,
}

impl OutputErrorCode {
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum DeepmapError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Input file does not exist.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Input is not a JSON document.
    #[error("invalid input at line {line}, column {column}: {message}")]
    InvalidInput {
        message: String,
        line: usize,
        column: usize,
    },

    /// Result could not be rendered as JSON.
    #[error("conversion failed: {0}")]
    Conversion(#[from] JsonError),

    /// Internal error (I/O failure or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

impl From<&DeepmapError> for OutputErrorCode {
    fn from(err: &DeepmapError) -> Self {
        match err {
            DeepmapError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            DeepmapError::FileNotFound { .. } => OutputErrorCode::InputError,
            DeepmapError::InvalidInput { .. } => OutputErrorCode::InputError,
            DeepmapError::Conversion(_) => OutputErrorCode::ConversionError,
            DeepmapError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

// ============================================================================
// Bridges
// ============================================================================

impl From<serde_json::Error> for DeepmapError {
    fn from(err: serde_json::Error) -> Self {
        DeepmapError::InvalidInput {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}

impl From<io::Error> for DeepmapError {
    fn from(err: io::Error) -> Self {
        DeepmapError::InternalError {
            message: format!("IO error: {}", err),
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl DeepmapError {
    pub fn invalid_args(message: impl Into<String>) -> Self {
        DeepmapError::InvalidArguments {
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        DeepmapError::FileNotFound { path: path.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        DeepmapError::InternalError {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}
