//! Core infrastructure for deepmap.
//!
//! This crate provides:
//! - A host value model with shared, identity-bearing containers
//! - Opaque-leaf kinds that are never decomposed
//! - Classification predicates used during traversal
//! - The iterative, cycle-safe deep mapper
//! - Conversion to and from `serde_json` trees

pub mod classify;
pub mod json;
pub mod key;
pub mod mapper;
pub mod opaque;
pub mod value;

pub use key::Key;
pub use mapper::{map_values_deep, try_map_values_deep};
pub use opaque::{Opaque, OpaqueData, OpaqueKind, TypedArray};
pub use value::{Callable, ContainerId, Record, Seq, Symbol, Value};
