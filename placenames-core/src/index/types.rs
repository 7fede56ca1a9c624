//! Index types and constants.

use std::cmp::Ordering;

use placenames_types::{EntryId, SuggestConfig};
use rustc_hash::FxHashMap;

use crate::analyzer::{CaseFolder, Folded};
use crate::arena::EntryArena;
use crate::heap::{BoundedTopKHeap, TotalOrder};

pub(crate) type NodeId = u32;

pub(crate) const ROOT: NodeId = 0;

/// Handle plus rank keys, as held by build-time heaps - 16 bytes.
///
/// The rank keys are copied next to the handle so heap comparisons never
/// touch the arena. The name itself is never copied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankedRef {
    pub id: EntryId,
    /// Name length in code points.
    pub name_len: u32,
    pub relevancy: f64,
}

/// The one ranking used for heap admission and for final output.
///
/// Higher relevancy ranks higher; on equal relevancy the shorter name ranks
/// higher; on a full tie the earlier-inserted entry ranks higher.
#[derive(Clone, Copy, Debug, Default)]
pub struct RankOrder;

impl TotalOrder<RankedRef> for RankOrder {
    #[inline(always)]
    fn compare(&self, a: &RankedRef, b: &RankedRef) -> Ordering {
        a.relevancy
            .total_cmp(&b.relevancy)
            .then_with(|| b.name_len.cmp(&a.name_len))
            .then_with(|| b.id.cmp(&a.id))
    }
}

pub(crate) type RankHeap = BoundedTopKHeap<RankedRef, RankOrder>;

#[derive(Default)]
pub(crate) struct BuildNode {
    pub(crate) children: FxHashMap<char, NodeId>,
    pub(crate) ranked: RankHeap,
}

/// Index under construction.
///
/// Entries are inserted one at a time; [`finalize`](PrefixTrie::finalize)
/// consumes the trie and returns the read-only [`PrefixIndex`]. There is no
/// way to query a `PrefixTrie` or to insert into a `PrefixIndex`.
pub struct PrefixTrie {
    pub(crate) nodes: Vec<BuildNode>,
    pub(crate) entries: EntryArena,
    pub(crate) config: SuggestConfig,
    pub(crate) folder: CaseFolder,
    pub(crate) fold_buf: Folded,
}

impl PrefixTrie {
    /// Creates an empty trie retaining `capacity_per_node` entries per node.
    pub fn new(capacity_per_node: usize) -> Self {
        Self::with_config(SuggestConfig::with_capacity(capacity_per_node))
    }

    /// Creates an empty trie with custom configuration.
    pub fn with_config(config: SuggestConfig) -> Self {
        Self {
            nodes: vec![BuildNode::default()],
            entries: EntryArena::new(),
            config,
            folder: CaseFolder,
            fold_buf: Folded::new(),
        }
    }

    /// Number of entries inserted so far.
    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries retained per node (K).
    #[inline(always)]
    pub fn capacity_per_node(&self) -> usize {
        self.config.capacity_per_node
    }
}

/// Child edge in the frozen layout.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Edge {
    pub(crate) ch: char,
    pub(crate) child: NodeId,
}

/// Frozen node: two ranges into the shared edge and ranked arrays.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FrozenNode {
    pub(crate) edge_offset: u32,
    pub(crate) edge_len: u32,
    pub(crate) ranked_offset: u32,
    pub(crate) ranked_len: u32,
}

/// Read-only prefix index.
///
/// Memory Layout:
/// - Every node's ranked list lives in one contiguous `ranked` array,
///   already sorted highest-ranked first
/// - Every node's child edges live in one contiguous `edges` array, sorted
///   by code point for binary search
///
/// Threading:
/// - `PrefixIndex` has no interior mutability and no mutating methods, so
///   it is `Send + Sync` and is shared behind an `Arc` without locks.
#[derive(Debug)]
pub struct PrefixIndex {
    pub(crate) nodes: Vec<FrozenNode>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) ranked: Vec<EntryId>,
    pub(crate) entries: EntryArena,
    pub(crate) config: SuggestConfig,
}

impl PrefixIndex {
    /// Number of indexed entries.
    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries retained per node (K); also the largest allowed query limit.
    #[inline(always)]
    pub fn capacity_per_node(&self) -> usize {
        self.config.capacity_per_node
    }

    /// Configuration the index was built with.
    #[inline(always)]
    pub fn config(&self) -> &SuggestConfig {
        &self.config
    }

    /// Returns the stored entry for a handle.
    #[inline(always)]
    pub fn entry(&self, id: EntryId) -> Option<crate::arena::Entry<'_>> {
        self.entries.get(id)
    }
}
