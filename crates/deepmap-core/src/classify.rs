//! Pure classification predicates used by the mapper.
//!
//! Opaque-leaf detection runs before any member enumeration: a value that
//! is an opaque leaf is handed to the callback whole and never descended
//! into.

use crate::opaque::OpaqueKind;
use crate::value::Value;

/// How the mapper treats a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Passed to the callback whole.
    Leaf,
    /// Ordered sequence, enumerated by populated index.
    Sequence,
    /// Record, enumerated by own enumerable key.
    Keyed,
}

/// Classify a value for traversal.
pub fn classify(value: &Value) -> Shape {
    if is_opaque_leaf(value) {
        return Shape::Leaf;
    }
    match value {
        Value::Seq(_) => Shape::Sequence,
        Value::Record(_) => Shape::Keyed,
        _ => Shape::Leaf,
    }
}

/// True for container-shaped values that must not be decomposed.
///
/// Callables and every [`OpaqueKind`] qualify. Primitives are leaves too,
/// but not opaque ones.
pub fn is_opaque_leaf(value: &Value) -> bool {
    opaque_kind(value).is_some() || matches!(value, Value::Callable(_))
}

/// The opaque kind of a value, if it is an opaque leaf other than a callable.
pub fn opaque_kind(value: &Value) -> Option<OpaqueKind> {
    value.as_opaque().map(|opaque| opaque.kind())
}

/// True for any value the mapper does not enumerate.
pub fn is_leaf(value: &Value) -> bool {
    classify(value) == Shape::Leaf
}
