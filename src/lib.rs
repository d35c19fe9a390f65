//! Hyperforest: a hyperedge inclusion forest.
//!
//! A forest stores weighted hyperedges (sets of integer vertices) in ordered
//! trees, so that every parent dominates each of its children under a
//! pluggable dominance [`Doctrine`]:
//! - [`SubsetPriority`] places a hyperedge under any strict superset of it.
//! - [`WeightPriority`] places lighter hyperedges under heavier ones, falling
//!   back to inclusion for similar weights, and only nests hyperedges that are
//!   contained in, or strongly overlap, their host.
//!
//! Insertion restructures the forest online: a new hyperedge that dominates
//! existing roots or children adopts them, so the invariant holds after every
//! call. On top of that the crate provides containment and weight queries,
//! traversals, maintenance passes, a compact binary encoding and structural
//! fingerprints.
//!
//! # Example
//!
//! ```
//! use hyperforest::prelude::*;
//!
//! let mut forest = Forest::subset_priority();
//! insert_hyperedge(&mut forest, &[1, 2], 1.0);
//! insert_hyperedge(&mut forest, &[5, 6], 2.0);
//! insert_hyperedge(&mut forest, &[6, 5, 2, 1], 10.0);
//!
//! assert_eq!(forest.root_count(), 1);
//! assert_eq!(forest.roots()[0].children().len(), 2);
//! assert_eq!(find_minimal_superset(&forest, &[5]).unwrap().vertices(), &[5, 6]);
//! assert!(verify(&forest).is_ok());
//! ```

pub mod codec;
pub mod config;
pub mod core;
pub mod doctrine;
pub mod error;
pub mod fingerprint;
pub mod maintenance;
pub mod normalize;
pub mod operations;
pub mod query;
pub mod traversal;

mod properties;

pub use crate::config::ForestConfig;
pub use crate::core::{compute_overlap, Forest, ForestStats, Hyperedge, Node};
pub use crate::doctrine::{verify, Doctrine, DoctrineError, Dominance, SubsetPriority, WeightPriority};
pub use crate::error::{CodecError, ForestError, Result};
pub use crate::fingerprint::{forest_fingerprint, HashValue};
pub use crate::normalize::VertexId;

/// Prelude for convenient usage.
pub mod prelude {
    pub use crate::codec::{decode, encode, load, save};
    pub use crate::config::ForestConfig;
    pub use crate::core::{compute_overlap, Forest, ForestStats, Hyperedge, Node};
    pub use crate::doctrine::{
        is_well_formed, verify, Doctrine, Dominance, SubsetPriority, WeightPriority,
    };
    pub use crate::error::{CodecError, ForestError};
    pub use crate::fingerprint::{forest_fingerprint, HashValue};
    pub use crate::maintenance::{merge_duplicates, optimize, prune_by_weight, rebalance};
    pub use crate::normalize::VertexId;
    pub use crate::operations::{build_bulk, insert_batch, insert_edge, insert_hyperedge};
    pub use crate::query::{
        collect_by_weight_threshold, count_by_weight_threshold, find_all_subsets,
        find_all_supersets, find_by_weight_range, find_containing_vertices,
        find_heaviest_superset, find_k_most_similar, find_minimal_superset, find_top_k,
        find_top_k_exact, get_clusters_by_weight,
    };
    pub use crate::traversal::{traverse_bfs, traverse_by_weight, traverse_dfs};
}
