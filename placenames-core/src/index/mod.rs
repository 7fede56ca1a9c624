//! Bounded top-K prefix index.
//!
//! Every trie node retains only the K best-ranked entries sharing its
//! prefix, so a one-letter prefix costs K handles rather than a large slice
//! of the catalog. Ranking work happens once at build time; a lookup is a
//! walk of `len(prefix)` edges followed by a slice.
//!
//! Lifecycle:
//! - [`PrefixTrie`] accepts inserts (single-threaded)
//! - [`PrefixTrie::finalize`] consumes it and returns a [`PrefixIndex`]
//! - [`PrefixIndex`] answers lookups and is never mutated again
//!
//! Memory Layout (after finalize):
//! - Ranked lists are stored in a single contiguous handle array
//! - Child edges are stored in sorted runs for binary search lookup
//! - Names are stored once in the entry arena

mod builder;
mod finalize;
mod search;
mod stats;
mod types;

pub use builder::{build, build_with_config};
pub use search::Matches;
pub use stats::IndexStats;
pub use types::{PrefixIndex, PrefixTrie, RankOrder, RankedRef};
