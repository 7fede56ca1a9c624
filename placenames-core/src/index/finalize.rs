//! Build-to-serve transition.

use placenames_types::EntryId;
use tracing::debug;

use crate::index::types::{BuildNode, Edge, FrozenNode, NodeId, PrefixIndex, PrefixTrie, ROOT};

impl PrefixTrie {
    /// Freezes the trie into a read-only [`PrefixIndex`].
    ///
    /// Walks every node depth-first. Each node's heap becomes a list sorted
    /// highest-ranked first by the same order that admitted its entries, and
    /// its children become a code-point-sorted edge run. Nodes are renumbered
    /// in discovery order so siblings sit next to each other.
    ///
    /// Consumes the trie: inserting after finalize, or querying before it,
    /// does not compile.
    #[inline(never)]
    pub fn finalize(self) -> PrefixIndex {
        let PrefixTrie {
            nodes,
            mut entries,
            config,
            ..
        } = self;

        let node_count = nodes.len();
        let mut nodes: Vec<Option<BuildNode>> = nodes.into_iter().map(Some).collect();

        let mut frozen = vec![FrozenNode::default(); node_count];
        let mut edges: Vec<Edge> = Vec::with_capacity(node_count.saturating_sub(1));
        let mut ranked: Vec<EntryId> = Vec::new();

        // (old id, new id); new ids are handed out when a node is discovered.
        let mut stack: Vec<(NodeId, NodeId)> = vec![(ROOT, ROOT)];
        let mut next_id: NodeId = ROOT + 1;

        while let Some((old, new)) = stack.pop() {
            let Some(node) = nodes[old as usize].take() else {
                continue;
            };

            let ranked_offset = ranked.len() as u32;
            ranked.extend(node.ranked.into_sorted_vec().into_iter().map(|r| r.id));

            let mut children: Vec<(char, NodeId)> = node.children.into_iter().collect();
            children.sort_unstable_by_key(|&(ch, _)| ch);

            let edge_offset = edges.len() as u32;
            for &(ch, child_old) in &children {
                let child_new = next_id;
                next_id += 1;
                edges.push(Edge {
                    ch,
                    child: child_new,
                });
                stack.push((child_old, child_new));
            }

            frozen[new as usize] = FrozenNode {
                edge_offset,
                edge_len: children.len() as u32,
                ranked_offset,
                ranked_len: ranked.len() as u32 - ranked_offset,
            };
        }

        ranked.shrink_to_fit();
        entries.shrink_to_fit();

        debug!(
            nodes = frozen.len(),
            edges = edges.len(),
            retained = ranked.len(),
            "prefix index finalized"
        );

        PrefixIndex {
            nodes: frozen,
            edges,
            ranked,
            entries,
            config,
        }
    }
}
