//! Ranked place-name autosuggest.
//!
//! A [`PrefixTrie`] is filled from `(name, relevancy)` records, then
//! [`finalized`](PrefixTrie::finalize) into a read-only [`PrefixIndex`]
//! that answers case-insensitive prefix lookups with the top-K entries by
//! relevancy. The index is `Send + Sync` and is shared behind an `Arc`.
//!
//! ```
//! use placenames_core::{build, query};
//!
//! let index = build(100, [("london", 1.0), ("Los Angeles", 0.9), ("Liverpool", 0.8)])?;
//! let results = query(&index, "Lo", 10, index.capacity_per_node()).unwrap();
//!
//! assert_eq!(results[0].name, "London");
//! assert_eq!(results[1].name, "Los Angeles");
//! # Ok::<(), placenames_core::BuildError>(())
//! ```

pub mod analyzer;
pub mod arena;
pub mod heap;
pub mod index;
pub mod loader;
pub mod query;
pub mod rescore;

pub use index::{build, build_with_config, IndexStats, Matches, PrefixIndex, PrefixTrie};
pub use loader::{load_index, load_reader, read_names, read_names_from};
pub use placenames_types::{
    BuildError, ConfigError, EntryId, ScoreError, SuggestConfig, Suggestion, ValidationError,
};
pub use query::{parse_limit, query, validate_limit, QueryEngine};
pub use rescore::{score_in_order, write_scores, ScoredName, Scorer};
