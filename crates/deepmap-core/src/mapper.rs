//! Iterative, cycle-safe deep mapper.
//!
//! [`map_values_deep`] applies a callback to every leaf of a value graph and
//! returns a freshly built graph of the same shape. Traversal uses an
//! explicit work stack, so nesting depth is bounded by memory, not by the
//! call stack.
//!
//! ## Callback contract
//!
//! The callback receives `(value, key, parent)`, where `parent` is the
//! original container the value was found in. It is invoked:
//!
//! - once per leaf member;
//! - once per container member on first discovery, before descending.
//!   Returning a clone of the container (same identity) means "descend".
//!   Returning anything else replaces the whole subtree, and the mapper never
//!   looks inside the replacement;
//! - exactly once with `(root, Key::root(), {})` when the root is a leaf.
//!
//! A container reached a second time (through a cycle or an alias) is not
//! shown to the callback again; its existing replacement is reused, so the
//! output preserves the aliasing of the input.
//!
//! ## Example
//!
//! ```
//! use deepmap_core::{map_values_deep, Value};
//!
//! let input = Value::seq([Value::from(1), Value::seq([Value::from(2)])]);
//! let doubled = map_values_deep(&input, |value, _key, _parent| match value {
//!     Value::Number(n) => Value::Number(n * 2.0),
//!     other => other.clone(),
//! });
//!
//! let outer = doubled.as_seq().unwrap();
//! assert_eq!(outer.get(0), Some(Value::from(2)));
//! ```

use std::collections::HashMap;
use std::convert::Infallible;

use tracing::{debug, trace};

use crate::classify::{classify, Shape};
use crate::key::Key;
use crate::value::{ContainerId, Record, Seq, Value};

/// Map every leaf of `root` through `transform`.
///
/// See the module documentation for the callback contract.
pub fn map_values_deep<F>(root: &Value, mut transform: F) -> Value
where
    F: FnMut(&Value, &Key, &Value) -> Value,
{
    let result = try_map_values_deep(root, |value, key, parent| {
        Ok::<_, Infallible>(transform(value, key, parent))
    });
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Fallible form of [`map_values_deep`].
///
/// The first error returned by `transform` aborts the traversal and is
/// returned unchanged. Nothing built so far is observable.
pub fn try_map_values_deep<F, E>(root: &Value, mut transform: F) -> Result<Value, E>
where
    F: FnMut(&Value, &Key, &Value) -> Result<Value, E>,
{
    if classify(root) == Shape::Leaf {
        return transform(root, &Key::root(), &Value::Record(Record::new()));
    }

    let mut traversal = Traversal::new(&mut transform);
    let result = traversal.descend(root);
    if let Err(err) = traversal.run() {
        traversal.discard();
        return Err(err);
    }

    debug!(
        containers = traversal.stats.containers,
        leaves = traversal.stats.leaves,
        substituted = traversal.stats.substituted,
        shared = traversal.stats.shared,
        "deep map complete"
    );
    Ok(result)
}

// ============================================================================
// Traversal state
// ============================================================================

/// Pending expansion: fill `target` from the members of `source`.
enum WorkItem {
    Seq { source: Seq, target: Seq },
    Record { source: Record, target: Record },
}

/// Visited-map entry. Holding `source` keeps its identity from being reused
/// by a later allocation while the traversal runs.
struct Visit {
    _source: Value,
    replacement: Value,
}

#[derive(Debug, Default)]
struct Stats {
    containers: usize,
    leaves: usize,
    substituted: usize,
    shared: usize,
}

struct Traversal<'f, F> {
    transform: &'f mut F,
    visited: HashMap<ContainerId, Visit>,
    stack: Vec<WorkItem>,
    stats: Stats,
}

impl<'f, F, E> Traversal<'f, F>
where
    F: FnMut(&Value, &Key, &Value) -> Result<Value, E>,
{
    fn new(transform: &'f mut F) -> Self {
        Traversal {
            transform,
            visited: HashMap::new(),
            stack: Vec::new(),
            stats: Stats::default(),
        }
    }

    /// Allocate an empty replacement for a container, register it and queue
    /// its expansion. Leaves are returned as-is.
    fn descend(&mut self, source: &Value) -> Value {
        let (replacement, item) = match source {
            Value::Seq(seq) => {
                let target = Seq::with_len(seq.len());
                let item = WorkItem::Seq {
                    source: seq.clone(),
                    target: target.clone(),
                };
                (Value::Seq(target), item)
            }
            Value::Record(record) => {
                let target = Record::new();
                let item = WorkItem::Record {
                    source: record.clone(),
                    target: target.clone(),
                };
                (Value::Record(target), item)
            }
            _ => return source.clone(),
        };

        if let Some(id) = source.container_id() {
            self.visited.insert(
                id,
                Visit {
                    _source: source.clone(),
                    replacement: replacement.clone(),
                },
            );
        }
        self.stack.push(item);
        self.stats.containers += 1;
        replacement
    }

    fn run(&mut self) -> Result<(), E> {
        while let Some(item) = self.stack.pop() {
            match item {
                WorkItem::Seq { source, target } => {
                    let parent = Value::Seq(source.clone());
                    for (index, value) in source.entries() {
                        let mapped = self.map_member(&value, &Key::Index(index), &parent)?;
                        target.set(index, mapped);
                    }
                }
                WorkItem::Record { source, target } => {
                    let parent = Value::Record(source.clone());
                    for (key, value) in source.own_enumerable() {
                        let mapped = self.map_member(&value, &key, &parent)?;
                        target.insert(key, mapped);
                    }
                }
            }
        }
        Ok(())
    }

    /// Empty every replacement built so far. Partial output may be cyclic
    /// and no caller holds a handle to it.
    fn discard(&mut self) {
        for visit in self.visited.values() {
            match &visit.replacement {
                Value::Seq(seq) => seq.clear(),
                Value::Record(record) => record.clear(),
                _ => {}
            }
        }
        self.stack.clear();
        self.visited.clear();
    }

    fn map_member(&mut self, value: &Value, key: &Key, parent: &Value) -> Result<Value, E> {
        if classify(value) == Shape::Leaf {
            self.stats.leaves += 1;
            return (self.transform)(value, key, parent);
        }

        if let Some(visit) = value.container_id().and_then(|id| self.visited.get(&id)) {
            self.stats.shared += 1;
            trace!(%key, "reusing replacement of visited container");
            return Ok(visit.replacement.clone());
        }

        let transformed = (self.transform)(value, key, parent)?;
        if !transformed.ptr_eq(value) {
            self.stats.substituted += 1;
            trace!(%key, kind = transformed.type_name(), "container replaced by callback");
            return Ok(transformed);
        }

        Ok(self.descend(value))
    }
}
