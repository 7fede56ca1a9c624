//! Statistics and IndexStats.

use placenames_types::EntryId;

use crate::index::types::{Edge, FrozenNode, PrefixIndex};

/// A snapshot of index statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    /// Number of indexed entries.
    pub num_entries: usize,
    /// Number of trie nodes, root included.
    pub num_nodes: usize,
    /// Number of child edges.
    pub num_edges: usize,
    /// Total entry handles retained across all nodes.
    pub retained_refs: usize,
    /// Entries retained per node (K).
    pub capacity_per_node: usize,
    /// Bytes held by entry names and scores.
    pub entry_bytes: usize,
}

impl PrefixIndex {
    /// Returns index statistics.
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            num_entries: self.entries.len(),
            num_nodes: self.nodes.len(),
            num_edges: self.edges.len(),
            retained_refs: self.ranked.len(),
            capacity_per_node: self.config.capacity_per_node,
            entry_bytes: self.entries.heap_bytes(),
        }
    }
}

impl IndexStats {
    /// Returns approximate memory usage in bytes.
    pub fn memory_usage_bytes(&self) -> usize {
        self.num_nodes * std::mem::size_of::<FrozenNode>()
            + self.num_edges * std::mem::size_of::<Edge>()
            + self.retained_refs * std::mem::size_of::<EntryId>()
            + self.entry_bytes
    }

    /// Average retained handles per node.
    pub fn mean_retained_per_node(&self) -> f64 {
        if self.num_nodes == 0 {
            return 0.0;
        }
        self.retained_refs as f64 / self.num_nodes as f64
    }
}

impl core::fmt::Display for IndexStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} entries, {} nodes, {} retained (k={}), ~{} bytes",
            self.num_entries,
            self.num_nodes,
            self.retained_refs,
            self.capacity_per_node,
            self.memory_usage_bytes()
        )
    }
}
