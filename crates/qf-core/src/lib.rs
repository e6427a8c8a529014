//! Core logic for flattening prioritized quay versions.
//!
//! Quays imported from JORE may carry several versions of the same public
//! code with overlapping validity and different priorities. This crate
//! resolves them into one non-overlapping timeline per public code:
//! - Extraction: reading validity and priority from key values
//! - Grouping: selecting and partitioning the versions to resolve
//! - Flattening: priority-ordered splicing of versions into a timeline
//! - Rewriting: producing new quay versions from the resolved timeline
//! - Streaming: applying all of the above lazily to a stop place iterator

pub mod config;
pub mod error;
pub mod extract;
mod flatten;
pub mod group;
pub mod interval;
pub mod priority_iter;
pub mod record;
mod rewrite;
pub mod types;

pub use config::FlattenConfig;
pub use error::{FlattenError, SourceError};
pub use extract::extract_validity;
pub use flatten::flatten_timeline;
pub use group::group_by_public_code;
pub use interval::{Validity, VersionedInterval};
pub use priority_iter::{
    FlattenQuayPriorities, QuayPriorityIter, TryFlattenQuayPriorities, TryQuayPriorityIter,
    flatten_stop_place,
};
pub use record::{KeyValueRecord, KeyValues, PrivateCode, Quay, StopPlace, ValidBetween, Value};
pub use rewrite::apply_validity;
pub use types::{NetexId, Priority, PublicCode, ValidationError};
