//! Document statistics gathered with a counting callback.
//!
//! The walk is an ordinary deep map whose callback always asks to descend
//! and records what it is shown. Shared containers are therefore counted
//! once, and cycles terminate.

use std::collections::{BTreeMap, HashMap};

use deepmap_core::{map_values_deep, ContainerId, Value};
use serde::{Deserialize, Serialize};

/// Counts describing one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Distinct containers, including the root.
    pub containers: usize,
    pub sequences: usize,
    pub records: usize,
    /// Leaf count by type name.
    pub leaves: BTreeMap<String, usize>,
    /// Nesting depth of the deepest container; 0 for a leaf document.
    pub max_depth: usize,
}

impl DocumentStats {
    pub fn leaf_total(&self) -> usize {
        self.leaves.values().sum()
    }

    fn count_container(&mut self, value: &Value) {
        self.containers += 1;
        match value {
            Value::Seq(_) => self.sequences += 1,
            _ => self.records += 1,
        }
    }
}

/// Walk `root` and collect statistics.
pub fn collect_stats(root: &Value) -> DocumentStats {
    let mut stats = DocumentStats::default();
    let mut depths: HashMap<ContainerId, usize> = HashMap::new();

    if let Some(id) = root.container_id() {
        stats.count_container(root);
        stats.max_depth = 1;
        depths.insert(id, 1);
    }

    map_values_deep(root, |value, _key, parent| {
        match value.container_id() {
            Some(id) => {
                let depth = parent
                    .container_id()
                    .and_then(|parent_id| depths.get(&parent_id).copied())
                    .unwrap_or(0)
                    + 1;
                depths.insert(id, depth);
                stats.count_container(value);
                stats.max_depth = stats.max_depth.max(depth);
            }
            None => {
                *stats.leaves.entry(value.type_name().to_string()).or_insert(0) += 1;
            }
        }
        value.clone()
    });

    stats
}
