use serde::{Deserialize, Serialize};

/// Shape of a spatial index at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of indexed places
    pub places: usize,
    /// Nodes holding places directly
    pub leaves: usize,
    /// Nodes that only route to children
    pub internal_nodes: usize,
    /// Length of the longest root-to-leaf path, in edges
    pub max_depth: usize,
}

/// Mutation counters kept by a place map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapStats {
    /// Places accepted by `insert`
    pub inserts: u64,
    /// Inserts refused because the place was outside the world
    pub rejected_inserts: u64,
    /// Successful deletions
    pub deletes: u64,
    /// Successful service edits
    pub edits: u64,
    /// Delete or edit calls that found no place
    pub misses: u64,
}

impl MapStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_insert(&mut self) {
        self.inserts += 1;
    }

    pub fn record_rejected_insert(&mut self) {
        self.rejected_inserts += 1;
    }

    pub fn record_delete(&mut self, found: bool) {
        if found {
            self.deletes += 1;
        } else {
            self.misses += 1;
        }
    }

    pub fn record_edit(&mut self, found: bool) {
        if found {
            self.edits += 1;
        } else {
            self.misses += 1;
        }
    }
}
