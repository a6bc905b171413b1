//! CLI command implementations.
//!
//! Each command reads one JSON document, converts it into a host value,
//! runs the deep mapper and returns a response struct. Printing and exit
//! codes are left to `main.rs`.
//!
//! ## Error Handling
//!
//! All functions return `Result<T, DeepmapError>`, which carries the stable
//! error code used for the JSON error response.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use deepmap_core::json::{from_json, to_json};
use deepmap_core::Value;
use tracing::{debug, info, info_span};

use crate::error::DeepmapError;
use crate::output::{MapResponse, StatsResponse};
use crate::stats::collect_stats;
use crate::transform::TransformSpec;

/// Apply a built-in transform to the document at `input` (stdin if `None`).
pub fn run_map(input: Option<&Path>, spec: &TransformSpec) -> Result<MapResponse, DeepmapError> {
    let _span = info_span!("map", transform = %spec.kind()).entered();
    let document = read_document(input)?;
    let mapped = spec.apply(&document);
    let result = to_json(&mapped)?;
    info!(transform = %spec.kind(), "map complete");
    Ok(MapResponse::new(spec.kind().name(), result))
}

/// Collect structural statistics for the document at `input`.
pub fn run_stats(input: Option<&Path>) -> Result<StatsResponse, DeepmapError> {
    let _span = info_span!("stats").entered();
    let document = read_document(input)?;
    let stats = collect_stats(&document);
    info!(
        containers = stats.containers,
        leaves = stats.leaf_total(),
        max_depth = stats.max_depth,
        "stats complete"
    );
    Ok(StatsResponse::new(stats))
}

/// Read and parse a JSON document from a file or stdin.
pub fn read_document(input: Option<&Path>) -> Result<Value, DeepmapError> {
    let text = match input {
        Some(path) => read_file(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    parse_document(&text)
}

/// Parse JSON text into a host value.
pub fn parse_document(text: &str) -> Result<Value, DeepmapError> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    Ok(from_json(&json))
}

fn read_file(path: &Path) -> Result<String, DeepmapError> {
    debug!(path = %path.display(), "reading input");
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            Err(DeepmapError::file_not_found(path.display().to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::TransformKind;
    use serde_json::json;
    use std::io::Write;

    fn write_input(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn map_reads_file_and_applies_transform() {
        let file = write_input(r#"{"a": 1, "b": {"c": 2}}"#);
        let spec = TransformSpec::new(TransformKind::Double, Vec::new()).unwrap();
        let response = run_map(Some(file.path()), &spec).unwrap();
        assert_eq!(response.status, "ok");
        assert_eq!(response.transform, "double");
        assert_eq!(response.result, json!({"a": 2, "b": {"c": 4}}));
    }

    #[test]
    fn missing_file_is_reported() {
        let spec = TransformSpec::new(TransformKind::Identity, Vec::new()).unwrap();
        let err = run_map(Some(Path::new("/nonexistent/deepmap/input.json")), &spec).unwrap_err();
        assert!(matches!(err, DeepmapError::FileNotFound { .. }));
    }

    #[test]
    fn malformed_json_is_invalid_input() {
        let err = parse_document("{\"a\": }").unwrap_err();
        assert!(matches!(err, DeepmapError::InvalidInput { line: 1, .. }));
    }

    #[test]
    fn stats_reads_file() {
        let file = write_input("[1, [2, [3]]]");
        let response = run_stats(Some(file.path())).unwrap();
        assert_eq!(response.stats.containers, 3);
        assert_eq!(response.stats.max_depth, 3);
        assert_eq!(response.stats.leaves.get("number"), Some(&3));
    }
}
