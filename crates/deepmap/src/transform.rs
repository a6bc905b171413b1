//! Built-in transforms selectable from the command line.

use std::collections::HashSet;
use std::fmt;

use deepmap_core::{map_values_deep, Key, Value};
use tracing::debug;

use crate::error::DeepmapError;

/// Text written in place of redacted members.
pub const REDACTED: &str = "[REDACTED]";

/// Which built-in transform to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    /// Return every value unchanged.
    Identity,
    /// Multiply numbers by two.
    Double,
    /// Upper-case text.
    Upper,
    /// Replace members with matching key names.
    Redact,
}

impl TransformKind {
    pub fn name(self) -> &'static str {
        match self {
            TransformKind::Identity => "identity",
            TransformKind::Double => "double",
            TransformKind::Upper => "upper",
            TransformKind::Redact => "redact",
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated transform plus its arguments.
#[derive(Debug, Clone)]
pub struct TransformSpec {
    kind: TransformKind,
    redact_keys: HashSet<String>,
}

impl TransformSpec {
    /// Build a transform. `redact` requires at least one key; other kinds
    /// ignore `keys`.
    pub fn new(kind: TransformKind, keys: Vec<String>) -> Result<Self, DeepmapError> {
        if kind == TransformKind::Redact && keys.is_empty() {
            return Err(DeepmapError::invalid_args(
                "redact requires at least one --key",
            ));
        }
        Ok(TransformSpec {
            kind,
            redact_keys: keys.into_iter().collect(),
        })
    }

    pub fn kind(&self) -> TransformKind {
        self.kind
    }

    /// Run the transform over `root`.
    pub fn apply(&self, root: &Value) -> Value {
        debug!(transform = %self.kind, "applying transform");
        match self.kind {
            TransformKind::Identity => map_values_deep(root, |value, _, _| value.clone()),
            TransformKind::Double => map_values_deep(root, |value, _, _| double(value)),
            TransformKind::Upper => map_values_deep(root, |value, _, _| upper(value)),
            TransformKind::Redact => map_values_deep(root, |value, key, _| self.redact(value, key)),
        }
    }

    fn redact(&self, value: &Value, key: &Key) -> Value {
        match key.as_name() {
            Some(name) if self.redact_keys.contains(name) => Value::text(REDACTED),
            _ => value.clone(),
        }
    }
}

fn double(value: &Value) -> Value {
    match value {
        Value::Number(n) => Value::Number(n * 2.0),
        other => other.clone(),
    }
}

fn upper(value: &Value) -> Value {
    match value {
        Value::Text(text) => Value::text(text.to_uppercase()),
        other => other.clone(),
    }
}
