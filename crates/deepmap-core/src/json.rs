//! Conversion between [`Value`] graphs and `serde_json::Value` trees.
//!
//! Import is total: every JSON document has a `Value` form. Export follows
//! the usual JSON rendering of a dynamic value graph:
//!
//! - `Undefined`, symbols and callables are omitted from records and become
//!   `null` inside sequences (and at the root);
//! - sequence holes become `null`;
//! - non-finite numbers become `null`; integral numbers within the exactly
//!   representable range are written as integers;
//! - symbol keys and non-enumerable properties are skipped;
//! - dates are written as RFC 3339 strings with millisecond precision;
//! - other opaque leaves have no JSON form and are rejected;
//! - a cycle is rejected. Shared acyclic substructure is written once per
//!   path that reaches it;
//! - containers nested deeper than [`MAX_DEPTH`] are rejected.
//!
//! Both directions recurse once per nesting level. Import input comes from
//! `serde_json`, whose parser enforces the same depth limit.

use chrono::SecondsFormat;
use serde_json::{Map, Number};
use thiserror::Error;

use crate::key::Key;
use crate::opaque::{OpaqueData, OpaqueKind};
use crate::value::{ContainerId, Record, Seq, Value};

/// Deepest container nesting accepted by [`to_json`], matching the
/// `serde_json` parser's limit.
pub const MAX_DEPTH: usize = 128;

/// Largest integer magnitude an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Error type for JSON export.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JsonError {
    /// The graph contains a cycle through `path`.
    #[error("cannot convert cyclic structure to JSON at {path}")]
    Cycle { path: String },

    /// The value at `path` has no JSON representation.
    #[error("{kind} at {path} has no JSON representation")]
    Unrepresentable { kind: OpaqueKind, path: String },

    /// Containers nest deeper than [`MAX_DEPTH`] at `path`.
    #[error("structure nested deeper than {} levels at {path}", MAX_DEPTH)]
    TooDeep { path: String },
}

/// Build a value graph from a JSON tree.
pub fn from_json(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::text(s),
        serde_json::Value::Array(items) => Value::seq(items.iter().map(from_json)),
        serde_json::Value::Object(map) => {
            let record = Record::new();
            for (name, member) in map {
                record.set(name, from_json(member));
            }
            Value::Record(record)
        }
    }
}

/// Render a value graph as a JSON tree.
pub fn to_json(value: &Value) -> Result<serde_json::Value, JsonError> {
    let mut exporter = Exporter {
        ancestors: Vec::new(),
    };
    let mut path = String::from("$");
    Ok(exporter
        .export(value, &mut path)?
        .unwrap_or(serde_json::Value::Null))
}

struct Exporter {
    ancestors: Vec<ContainerId>,
}

impl Exporter {
    /// `Ok(None)` means "omit from records".
    fn export(
        &mut self,
        value: &Value,
        path: &mut String,
    ) -> Result<Option<serde_json::Value>, JsonError> {
        let json = match value {
            Value::Undefined | Value::Symbol(_) | Value::Callable(_) => return Ok(None),
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number(*n),
            Value::Text(text) => serde_json::Value::String(text.to_string()),
            Value::Opaque(opaque) => match opaque.data() {
                OpaqueData::Date(at) => {
                    serde_json::Value::String(at.to_rfc3339_opts(SecondsFormat::Millis, true))
                }
                _ => {
                    return Err(JsonError::Unrepresentable {
                        kind: opaque.kind(),
                        path: path.clone(),
                    })
                }
            },
            Value::Seq(seq) => self.enter(seq.id(), path, |exporter, path| {
                exporter.export_seq(seq, path)
            })?,
            Value::Record(record) => self.enter(record.id(), path, |exporter, path| {
                exporter.export_record(record, path)
            })?,
        };
        Ok(Some(json))
    }

    fn enter(
        &mut self,
        id: ContainerId,
        path: &mut String,
        body: impl FnOnce(&mut Self, &mut String) -> Result<serde_json::Value, JsonError>,
    ) -> Result<serde_json::Value, JsonError> {
        if self.ancestors.contains(&id) {
            return Err(JsonError::Cycle { path: path.clone() });
        }
        if self.ancestors.len() >= MAX_DEPTH {
            return Err(JsonError::TooDeep { path: path.clone() });
        }
        self.ancestors.push(id);
        let result = body(self, path);
        self.ancestors.pop();
        result
    }

    fn export_seq(&mut self, seq: &Seq, path: &mut String) -> Result<serde_json::Value, JsonError> {
        let len = seq.len();
        let mut items = Vec::with_capacity(len);
        for index in 0..len {
            let item = match seq.get(index) {
                Some(member) => self.child(&member, &Key::Index(index), path)?,
                None => None,
            };
            items.push(item.unwrap_or(serde_json::Value::Null));
        }
        Ok(serde_json::Value::Array(items))
    }

    fn export_record(
        &mut self,
        record: &Record,
        path: &mut String,
    ) -> Result<serde_json::Value, JsonError> {
        let mut map = Map::new();
        for (key, member) in record.own_enumerable() {
            let Key::Name(name) = &key else {
                continue;
            };
            if let Some(json) = self.child(&member, &key, path)? {
                map.insert(name.to_string(), json);
            }
        }
        Ok(serde_json::Value::Object(map))
    }

    fn child(
        &mut self,
        member: &Value,
        key: &Key,
        path: &mut String,
    ) -> Result<Option<serde_json::Value>, JsonError> {
        let mark = path.len();
        match key {
            Key::Index(index) => path.push_str(&format!("[{}]", index)),
            _ => {
                path.push('.');
                path.push_str(&key.to_string());
            }
        }
        let result = self.export(member, path);
        path.truncate(mark);
        result
    }
}

fn number(n: f64) -> serde_json::Value {
    if !n.is_finite() {
        return serde_json::Value::Null;
    }
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return serde_json::Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}
