//! Prefix lookup.

use placenames_types::EntryId;

use crate::analyzer::Folded;
use crate::arena::{Entry, EntryArena};
use crate::index::types::{FrozenNode, NodeId, PrefixIndex, ROOT};

/// Ranked matches for one prefix, highest-ranked first.
///
/// Borrows the index; resolving a match to its [`Entry`] is a slice lookup.
#[derive(Clone, Copy, Debug)]
pub struct Matches<'a> {
    ids: &'a [EntryId],
    entries: &'a EntryArena,
}

impl<'a> Matches<'a> {
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Entry handles in rank order.
    #[inline(always)]
    pub fn ids(&self) -> &'a [EntryId] {
        self.ids
    }

    /// The match at `rank` (0 = best).
    #[inline]
    pub fn get(&self, rank: usize) -> Option<Entry<'a>> {
        self.entries.get(*self.ids.get(rank)?)
    }

    /// Matches in rank order.
    pub fn iter(&self) -> impl Iterator<Item = Entry<'a>> + 'a {
        let entries = self.entries;
        self.ids.iter().filter_map(move |&id| entries.get(id))
    }
}

impl PrefixIndex {
    /// Returns the retained entries whose case-folded name starts with the
    /// case-folded `prefix`, highest-ranked first.
    ///
    /// An unmatched prefix yields no matches. The empty prefix yields the
    /// global top-K.
    #[inline]
    pub fn find_by_prefix(&self, prefix: &str) -> Matches<'_> {
        let mut folded = Folded::new();
        crate::analyzer::CaseFolder.fold_into(prefix, &mut folded);

        let ids = match self.walk(&folded) {
            Some(node) => self.ranked_of(&self.nodes[node as usize]),
            None => &[],
        };

        Matches {
            ids,
            entries: &self.entries,
        }
    }

    /// Follows `path` from the root.
    #[inline]
    pub(crate) fn walk(&self, path: &[char]) -> Option<NodeId> {
        let mut node = ROOT;
        for &ch in path {
            node = self.find_child(node, ch)?;
        }
        Some(node)
    }

    #[inline(always)]
    pub(crate) fn find_child(&self, node: NodeId, ch: char) -> Option<NodeId> {
        let n = &self.nodes[node as usize];
        let start = n.edge_offset as usize;
        let edges = &self.edges[start..start + n.edge_len as usize];
        edges
            .binary_search_by_key(&ch, |e| e.ch)
            .ok()
            .map(|i| edges[i].child)
    }

    #[inline(always)]
    pub(crate) fn ranked_of(&self, node: &FrozenNode) -> &[EntryId] {
        let start = node.ranked_offset as usize;
        &self.ranked[start..start + node.ranked_len as usize]
    }
}
