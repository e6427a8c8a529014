//! Priority-based flattening of overlapping versions into one timeline.
//!
//! # Algorithm Summary
//!
//! 1. Sort versions by priority, then by start date.
//! 2. Reject a version that overlaps an accepted version of the same priority.
//! 3. Splice each version over the timeline built so far. Lower-priority
//!    fragments it covers are dropped, cut short, or split around it.
//!
//! Because versions arrive in ascending priority, a splice only ever has to
//! reconcile the incoming version against an already flat timeline of equal
//! or lower priority. The result is gap-preserving, ordered by start date and
//! free of overlaps.

use tracing::trace;

use crate::error::FlattenError;
use crate::interval::VersionedInterval;

/// Flattens one public code's versions into a non-overlapping timeline.
///
/// `public_code` is only used to identify the group in errors. Versions
/// whose range covers no day are dropped.
pub fn flatten_timeline<O: Clone + PartialEq>(
    public_code: &str,
    mut versions: Vec<VersionedInterval<O>>,
) -> Result<Vec<VersionedInterval<O>>, FlattenError> {
    versions.sort_by_key(|v| (v.validity.priority(), v.validity.start()));

    let mut flattened: Vec<VersionedInterval<O>> = Vec::with_capacity(versions.len());
    for next in versions {
        if !next.validity.is_valid() {
            trace!(incoming = %next.validity, "dropping version without any valid day");
            continue;
        }

        ensure_no_same_tier_overlap(public_code, &flattened, &next)?;

        flattened = if next.validity.is_indefinite() {
            splice_indefinite(flattened, next)
        } else {
            splice_closed(public_code, flattened, next)?
        };
    }

    Ok(flattened)
}

fn ensure_no_same_tier_overlap<O>(
    public_code: &str,
    flattened: &[VersionedInterval<O>],
    next: &VersionedInterval<O>,
) -> Result<(), FlattenError> {
    match flattened
        .iter()
        .find(|existing| existing.validity.conflicts_with(&next.validity))
    {
        Some(existing) => Err(FlattenError::ConflictingSameTierVersions {
            public_code: public_code.to_string(),
            existing: existing.validity,
            incoming: next.validity,
        }),
        None => Ok(()),
    }
}

/// Splices an open-ended version over the end of the timeline.
///
/// Everything starting on or after its start is superseded; the one fragment
/// straddling its start (if any) is cut to end the day before.
fn splice_indefinite<O>(
    flattened: Vec<VersionedInterval<O>>,
    next: VersionedInterval<O>,
) -> Vec<VersionedInterval<O>> {
    let cut = next.validity.start();
    trace!(incoming = %next.validity, "splicing indefinite version");

    let mut spliced: Vec<_> = flattened
        .into_iter()
        .filter(|existing| existing.validity.starts_before(&next.validity))
        .filter_map(|existing| {
            if existing.validity.overlaps(&next.validity) {
                let validity = existing.validity.ending_before(cut)?;
                Some(existing.with_validity(validity))
            } else {
                Some(existing)
            }
        })
        .collect();

    spliced.push(next);
    spliced
}

/// Splices a closed version anywhere into the timeline.
///
/// Fragments fully covered by it are dropped, fragments overlapping one of
/// its ends are cut, and a fragment spanning it is split in two.
fn splice_closed<O: Clone + PartialEq>(
    public_code: &str,
    flattened: Vec<VersionedInterval<O>>,
    next: VersionedInterval<O>,
) -> Result<Vec<VersionedInterval<O>>, FlattenError> {
    let incoming = next.validity;
    trace!(%incoming, "splicing closed version");

    let mut spliced = Vec::with_capacity(flattened.len() + 2);
    for existing in flattened {
        let current = existing.validity;

        if current.is_within(&incoming) {
            continue;
        }

        if !current.overlaps(&incoming) {
            spliced.push(existing);
            continue;
        }

        let before = current.ending_before(incoming.start());
        let after = current.starting_after(incoming.last_day());

        if current.starts_before(&incoming) && current.ends_after(&incoming) {
            spliced.extend(before.map(|v| existing.clone().with_validity(v)));
            spliced.push(next.clone());
            spliced.extend(after.map(|v| existing.with_validity(v)));
        } else if current.starts_before(&incoming) {
            spliced.extend(before.map(|v| existing.with_validity(v)));
            spliced.push(next.clone());
        } else if current.ends_after(&incoming) {
            spliced.push(next.clone());
            spliced.extend(after.map(|v| existing.with_validity(v)));
        } else {
            return Err(FlattenError::UnreachableSpliceState {
                public_code: public_code.to_string(),
                existing: current,
                incoming,
            });
        }
    }

    // The version may fall into a gap, in which case nothing above added it.
    spliced.push(next);
    spliced.retain(|v| v.validity.is_valid());
    spliced.sort_by_key(|v| v.validity.start());
    spliced.dedup();

    Ok(spliced)
}
