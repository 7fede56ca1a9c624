//! Index building logic.

use placenames_types::{BuildError, EntryId, SuggestConfig};
use tracing::debug;

use crate::index::types::{BuildNode, NodeId, PrefixIndex, PrefixTrie, RankedRef, ROOT};

impl PrefixTrie {
    /// Inserts an entry, offering it to every node along its folded path.
    ///
    /// The root is offered every entry, so the empty prefix resolves to the
    /// global top-K.
    ///
    /// # Errors
    ///
    /// Rejects empty names, names over the configured length, and
    /// non-finite relevancy. The `[0, 1]` range is a property of the data
    /// file and is checked by the loader. Errors report the entry's 1-based
    /// position as the line.
    pub fn insert(&mut self, name: &str, relevancy: f64) -> Result<EntryId, BuildError> {
        let line = self.entries.len() as u64 + 1;
        self.insert_at(line, name, relevancy)
    }

    /// Inserts an entry, reporting errors against `line`.
    #[inline(never)]
    pub fn insert_at(&mut self, line: u64, name: &str, relevancy: f64) -> Result<EntryId, BuildError> {
        if name.is_empty() {
            return Err(BuildError::EmptyName { line });
        }
        if name.len() > self.config.max_name_length {
            return Err(BuildError::NameTooLong {
                line,
                len: name.len(),
                max: self.config.max_name_length,
            });
        }
        if !relevancy.is_finite() {
            return Err(BuildError::RelevancyOutOfRange {
                line,
                value: relevancy,
            });
        }

        let id = self
            .entries
            .push(name, relevancy)
            .ok_or(BuildError::TooManyEntries {
                max: EntryId::MAX as usize,
            })?;

        let entry = RankedRef {
            id,
            name_len: name.chars().count() as u32,
            relevancy,
        };

        let mut folded = std::mem::take(&mut self.fold_buf);
        self.folder.fold_into(name, &mut folded);
        let walked = self.offer_along(&folded, entry);
        self.fold_buf = folded;
        walked?;

        Ok(id)
    }

    /// Offers `entry` to the root and to every node on `path`, creating
    /// missing nodes.
    fn offer_along(&mut self, path: &[char], entry: RankedRef) -> Result<(), BuildError> {
        let capacity = self.config.capacity_per_node;

        let mut node = ROOT;
        self.nodes[node as usize].ranked.push_bounded(entry, capacity);

        for &ch in path {
            node = self.child_or_insert(node, ch)?;
            self.nodes[node as usize].ranked.push_bounded(entry, capacity);
        }

        Ok(())
    }

    #[inline(always)]
    fn child_or_insert(&mut self, parent: NodeId, ch: char) -> Result<NodeId, BuildError> {
        if let Some(&child) = self.nodes[parent as usize].children.get(&ch) {
            return Ok(child);
        }

        let child = NodeId::try_from(self.nodes.len()).map_err(|_| BuildError::TooManyEntries {
            max: NodeId::MAX as usize,
        })?;
        self.nodes.push(BuildNode::default());
        self.nodes[parent as usize].children.insert(ch, child);
        Ok(child)
    }

    /// Number of nodes created so far, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Builds a ready index from `(name, relevancy)` records.
///
/// All-or-nothing: the first invalid record aborts the build.
pub fn build<N, I>(capacity_per_node: usize, records: I) -> Result<PrefixIndex, BuildError>
where
    N: AsRef<str>,
    I: IntoIterator<Item = (N, f64)>,
{
    build_with_config(SuggestConfig::with_capacity(capacity_per_node), records)
}

/// Builds a ready index with custom configuration.
pub fn build_with_config<N, I>(config: SuggestConfig, records: I) -> Result<PrefixIndex, BuildError>
where
    N: AsRef<str>,
    I: IntoIterator<Item = (N, f64)>,
{
    let mut trie = PrefixTrie::with_config(config);
    for (name, relevancy) in records {
        trie.insert(name.as_ref(), relevancy)?;
    }
    debug!(
        entries = trie.len(),
        nodes = trie.node_count(),
        "prefix trie built"
    );
    Ok(trie.finalize())
}
