//! Opaque leaves.
//!
//! An opaque leaf is a value that has internal structure but is never
//! decomposed by the mapper: dates, patterns, associative and set
//! collections, weak collections, deferred results, errors and binary
//! buffers. The set is closed; adding a kind means adding an
//! [`OpaqueKind`] variant and an [`OpaqueData`] variant together.
//!
//! Opaque values are immutable and reference-counted, so cloning an
//! [`Opaque`] yields the same identity.

use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;

use crate::value::Value;

// ============================================================================
// Kinds
// ============================================================================

/// The closed set of opaque-leaf kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpaqueKind {
    Date,
    Pattern,
    Map,
    Set,
    WeakMap,
    WeakSet,
    Deferred,
    Error,
    Buffer,
    DataView,
    TypedArray,
}

impl OpaqueKind {
    /// All kinds, in declaration order.
    pub const ALL: [OpaqueKind; 11] = [
        OpaqueKind::Date,
        OpaqueKind::Pattern,
        OpaqueKind::Map,
        OpaqueKind::Set,
        OpaqueKind::WeakMap,
        OpaqueKind::WeakSet,
        OpaqueKind::Deferred,
        OpaqueKind::Error,
        OpaqueKind::Buffer,
        OpaqueKind::DataView,
        OpaqueKind::TypedArray,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OpaqueKind::Date => "date",
            OpaqueKind::Pattern => "pattern",
            OpaqueKind::Map => "map",
            OpaqueKind::Set => "set",
            OpaqueKind::WeakMap => "weak-map",
            OpaqueKind::WeakSet => "weak-set",
            OpaqueKind::Deferred => "deferred",
            OpaqueKind::Error => "error",
            OpaqueKind::Buffer => "buffer",
            OpaqueKind::DataView => "data-view",
            OpaqueKind::TypedArray => "typed-array",
        }
    }
}

impl fmt::Display for OpaqueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Typed arrays
// ============================================================================

/// Fixed-layout numeric array view.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedArray {
    Int8(Vec<i8>),
    Uint8(Vec<u8>),
    Uint8Clamped(Vec<u8>),
    Int16(Vec<i16>),
    Uint16(Vec<u16>),
    Int32(Vec<i32>),
    Uint32(Vec<u32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    BigInt64(Vec<i64>),
    BigUint64(Vec<u64>),
}

impl TypedArray {
    /// Number of elements in the view.
    pub fn len(&self) -> usize {
        match self {
            TypedArray::Int8(v) => v.len(),
            TypedArray::Uint8(v) | TypedArray::Uint8Clamped(v) => v.len(),
            TypedArray::Int16(v) => v.len(),
            TypedArray::Uint16(v) => v.len(),
            TypedArray::Int32(v) => v.len(),
            TypedArray::Uint32(v) => v.len(),
            TypedArray::Float32(v) => v.len(),
            TypedArray::Float64(v) => v.len(),
            TypedArray::BigInt64(v) => v.len(),
            TypedArray::BigUint64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type name, e.g. `Int32`.
    pub fn element_name(&self) -> &'static str {
        match self {
            TypedArray::Int8(_) => "Int8",
            TypedArray::Uint8(_) => "Uint8",
            TypedArray::Uint8Clamped(_) => "Uint8Clamped",
            TypedArray::Int16(_) => "Int16",
            TypedArray::Uint16(_) => "Uint16",
            TypedArray::Int32(_) => "Int32",
            TypedArray::Uint32(_) => "Uint32",
            TypedArray::Float32(_) => "Float32",
            TypedArray::Float64(_) => "Float64",
            TypedArray::BigInt64(_) => "BigInt64",
            TypedArray::BigUint64(_) => "BigUint64",
        }
    }
}

// ============================================================================
// Opaque values
// ============================================================================

/// Payload of an opaque leaf.
#[derive(Debug)]
pub enum OpaqueData {
    Date(DateTime<Utc>),
    Pattern(Regex),
    /// Key-value collection, in insertion order.
    Map(Vec<(Value, Value)>),
    /// Set collection, in insertion order.
    Set(Vec<Value>),
    /// Weakly-held collections expose no contents.
    WeakMap,
    WeakSet,
    /// Deferred computation; `None` while pending.
    Deferred(Option<Value>),
    Error {
        name: String,
        message: String,
    },
    Buffer(Vec<u8>),
    DataView(Vec<u8>),
    TypedArray(TypedArray),
}

impl OpaqueData {
    pub fn kind(&self) -> OpaqueKind {
        match self {
            OpaqueData::Date(_) => OpaqueKind::Date,
            OpaqueData::Pattern(_) => OpaqueKind::Pattern,
            OpaqueData::Map(_) => OpaqueKind::Map,
            OpaqueData::Set(_) => OpaqueKind::Set,
            OpaqueData::WeakMap => OpaqueKind::WeakMap,
            OpaqueData::WeakSet => OpaqueKind::WeakSet,
            OpaqueData::Deferred(_) => OpaqueKind::Deferred,
            OpaqueData::Error { .. } => OpaqueKind::Error,
            OpaqueData::Buffer(_) => OpaqueKind::Buffer,
            OpaqueData::DataView(_) => OpaqueKind::DataView,
            OpaqueData::TypedArray(_) => OpaqueKind::TypedArray,
        }
    }
}

/// Shared handle to an opaque leaf.
#[derive(Clone)]
pub struct Opaque(Rc<OpaqueData>);

impl Opaque {
    pub fn new(data: OpaqueData) -> Self {
        Opaque(Rc::new(data))
    }

    pub fn date(at: DateTime<Utc>) -> Self {
        Opaque::new(OpaqueData::Date(at))
    }

    pub fn pattern(regex: Regex) -> Self {
        Opaque::new(OpaqueData::Pattern(regex))
    }

    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Opaque::new(OpaqueData::Map(entries.into_iter().collect()))
    }

    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Opaque::new(OpaqueData::Set(items.into_iter().collect()))
    }

    pub fn weak_map() -> Self {
        Opaque::new(OpaqueData::WeakMap)
    }

    pub fn weak_set() -> Self {
        Opaque::new(OpaqueData::WeakSet)
    }

    pub fn deferred(settled: Option<Value>) -> Self {
        Opaque::new(OpaqueData::Deferred(settled))
    }

    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Opaque::new(OpaqueData::Error {
            name: name.into(),
            message: message.into(),
        })
    }

    pub fn buffer(bytes: impl Into<Vec<u8>>) -> Self {
        Opaque::new(OpaqueData::Buffer(bytes.into()))
    }

    pub fn data_view(bytes: impl Into<Vec<u8>>) -> Self {
        Opaque::new(OpaqueData::DataView(bytes.into()))
    }

    pub fn typed_array(array: TypedArray) -> Self {
        Opaque::new(OpaqueData::TypedArray(array))
    }

    pub fn kind(&self) -> OpaqueKind {
        self.0.kind()
    }

    pub fn data(&self) -> &OpaqueData {
        &self.0
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Opaque) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data() {
            OpaqueData::Date(at) => {
                write!(f, "Date({})", at.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            OpaqueData::Pattern(regex) => write!(f, "Pattern(/{}/)", regex.as_str()),
            OpaqueData::Map(entries) => write!(f, "Map(size={})", entries.len()),
            OpaqueData::Set(items) => write!(f, "Set(size={})", items.len()),
            OpaqueData::Error { name, message } => write!(f, "{}({:?})", name, message),
            OpaqueData::Buffer(bytes) => write!(f, "Buffer(len={})", bytes.len()),
            OpaqueData::DataView(bytes) => write!(f, "DataView(len={})", bytes.len()),
            OpaqueData::TypedArray(array) => {
                write!(f, "{}Array(len={})", array.element_name(), array.len())
            }
            OpaqueData::WeakMap | OpaqueData::WeakSet | OpaqueData::Deferred(_) => {
                write!(f, "{}", self.kind())
            }
        }
    }
}
