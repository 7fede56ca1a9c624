//! Append-only entry storage.
//!
//! Every name is stored once in a single contiguous buffer and referenced
//! by an [`EntryId`]. Trie nodes hold handles, never names, so an entry
//! retained by many nodes costs one copy of its text.
//!
//! ## Memory Layout
//!
//! ```text
//! Name Buffer: [London][Los Angeles][Liverpool]...
//!              ^       ^            ^
//!              |       |            |
//! Spans:      (0,6)   (6,11)       (17,9) ...
//! Relevancy:   1.0     0.9          0.8
//! ```
//!
//! - Allocation: O(1) amortized, append to the buffer
//! - Retrieval: O(1), slice from the buffer
//! - Overhead: 6 bytes of span plus 8 bytes of score per entry

use placenames_types::EntryId;

/// Name location inside the arena buffer - 6 bytes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NameSpan {
    offset: u32,
    len: u16,
}

impl NameSpan {
    #[inline(always)]
    pub const fn new(offset: u32, len: u16) -> Self {
        Self { offset, len }
    }

    #[inline(always)]
    pub const fn offset(self) -> usize {
        self.offset as usize
    }

    #[inline(always)]
    pub const fn len(self) -> usize {
        self.len as usize
    }
}

/// A read-only view of one stored entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entry<'a> {
    /// Name exactly as it was inserted.
    pub name: &'a str,
    /// Relevancy score.
    pub relevancy: f64,
}

/// Append-only store of entry names and scores.
#[derive(Debug)]
pub struct EntryArena {
    /// Contiguous name storage
    names: String,
    spans: Vec<NameSpan>,
    relevancy: Vec<f64>,
}

impl Default for EntryArena {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryArena {
    /// Creates a new empty arena.
    pub fn new() -> Self {
        Self::with_capacity(64 * 1024, 1024)
    }

    /// Creates a new arena with pre-allocated capacity.
    pub fn with_capacity(name_bytes: usize, entries: usize) -> Self {
        Self {
            names: String::with_capacity(name_bytes),
            spans: Vec::with_capacity(entries),
            relevancy: Vec::with_capacity(entries),
        }
    }

    /// Returns the number of entries stored.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns true if no entries are stored.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Stores an entry and returns its handle.
    ///
    /// Returns `None` if the name is longer than `u16::MAX` bytes, or if the
    /// buffer or handle space would overflow `u32`.
    #[inline]
    pub fn push(&mut self, name: &str, relevancy: f64) -> Option<EntryId> {
        let len = u16::try_from(name.len()).ok()?;
        let offset = u32::try_from(self.names.len()).ok()?;
        u32::try_from(self.names.len() + name.len()).ok()?;
        let id = EntryId::try_from(self.spans.len()).ok()?;

        self.names.push_str(name);
        self.spans.push(NameSpan::new(offset, len));
        self.relevancy.push(relevancy);
        Some(id)
    }

    /// Returns the stored name for a handle.
    #[inline(always)]
    pub fn name(&self, id: EntryId) -> Option<&str> {
        let span = self.spans.get(id as usize)?;
        self.names.get(span.offset()..span.offset() + span.len())
    }

    /// Returns the relevancy for a handle.
    #[inline(always)]
    pub fn relevancy(&self, id: EntryId) -> Option<f64> {
        self.relevancy.get(id as usize).copied()
    }

    /// Returns a view of the entry for a handle.
    #[inline]
    pub fn get(&self, id: EntryId) -> Option<Entry<'_>> {
        Some(Entry {
            name: self.name(id)?,
            relevancy: self.relevancy(id)?,
        })
    }

    /// Bytes held by names, spans and scores.
    pub fn heap_bytes(&self) -> usize {
        self.names.capacity()
            + self.spans.capacity() * std::mem::size_of::<NameSpan>()
            + self.relevancy.capacity() * std::mem::size_of::<f64>()
    }

    /// Releases spare capacity once the arena is complete.
    pub(crate) fn shrink_to_fit(&mut self) {
        self.names.shrink_to_fit();
        self.spans.shrink_to_fit();
        self.relevancy.shrink_to_fit();
    }
}
