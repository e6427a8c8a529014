//! Flattening configuration.

use serde::{Deserialize, Serialize};

use crate::types::Priority;

/// Priorities above this value mark drafts, which are never flattened.
pub const DEFAULT_MAX_PRIORITY: Priority = Priority::new(29);

/// Source types whose quay versions are flattened by default.
pub const DEFAULT_SOURCE_TYPES: [&str; 2] = ["HSL/JORE-3", "HSL/JORE-4"];

/// Configuration for quay version flattening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenConfig {
    /// Highest priority still considered a published version.
    /// Default: 29 (+30 means a draft).
    pub max_priority: Priority,

    /// Private code types identifying records from the prioritized source.
    pub source_types: Vec<String>,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            max_priority: DEFAULT_MAX_PRIORITY,
            source_types: DEFAULT_SOURCE_TYPES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl FlattenConfig {
    /// Whether a record with this source-type tag comes from a flattened source.
    pub fn is_source_type(&self, source_type: Option<&str>) -> bool {
        source_type.is_some_and(|tag| self.source_types.iter().any(|t| t == tag))
    }

    pub fn is_draft(&self, priority: Priority) -> bool {
        priority > self.max_priority
    }
}
