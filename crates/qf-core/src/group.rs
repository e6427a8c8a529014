//! Partitioning a stop place's quays into version groups.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::FlattenConfig;
use crate::error::FlattenError;
use crate::extract::extract_validity;
use crate::interval::VersionedInterval;
use crate::record::{KeyValueRecord, Quay};
use crate::types::PublicCode;

/// Versions of one public code, owned by their index in the quay slice.
pub type Groups<'a> = BTreeMap<&'a PublicCode, Vec<VersionedInterval<usize>>>;

/// Groups flattenable quays by public code.
///
/// Quays from other sources are skipped before anything is read from them.
/// Drafts (priority above the configured maximum) are skipped after their
/// validity has been read, so a malformed draft still fails.
pub fn group_by_public_code<'a>(
    quays: &'a [Quay],
    config: &FlattenConfig,
) -> Result<Groups<'a>, FlattenError> {
    let mut groups: Groups<'a> = BTreeMap::new();

    for (index, quay) in quays.iter().enumerate() {
        if !config.is_source_type(quay.source_type()) {
            continue;
        }

        let validity = extract_validity(quay)?;
        if config.is_draft(validity.priority()) {
            debug!(
                quay = %quay.record_label(),
                priority = %validity.priority(),
                "skipping draft version"
            );
            continue;
        }

        let public_code = quay
            .public_code
            .as_ref()
            .ok_or_else(|| FlattenError::MissingRequiredField {
                record: quay.record_label(),
                field: "publicCode",
            })?;

        groups
            .entry(public_code)
            .or_default()
            .push(VersionedInterval::new(validity, index));
    }

    Ok(groups)
}
