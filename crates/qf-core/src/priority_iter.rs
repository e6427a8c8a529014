//! Lazy flattening of stop places pulled from a record source.
//!
//! The adapters here hold at most one stop place at a time and do no I/O;
//! blocking and suspension belong to the upstream iterator (e.g. a database
//! cursor).

use chrono::TimeZone;
use tracing::debug;

use crate::config::FlattenConfig;
use crate::error::{FlattenError, SourceError};
use crate::flatten::flatten_timeline;
use crate::group::group_by_public_code;
use crate::record::StopPlace;
use crate::rewrite::apply_validity;

/// Replaces the quays of a stop place with their flattened versions.
///
/// Stop places without any quay from a configured source are returned as-is.
/// Otherwise only the flattened quays remain, ordered by public code and
/// start date.
pub fn flatten_stop_place<Tz: TimeZone>(
    mut stop_place: StopPlace,
    config: &FlattenConfig,
    zone: &Tz,
) -> Result<StopPlace, FlattenError> {
    if !stop_place
        .quays
        .iter()
        .any(|quay| config.is_source_type(quay.source_type()))
    {
        return Ok(stop_place);
    }

    let groups = group_by_public_code(&stop_place.quays, config)?;
    debug!(
        stop_place = %stop_place.label(),
        quays = stop_place.quays.len(),
        groups = groups.len(),
        "flattening quay versions"
    );

    let mut flattened = Vec::new();
    for (public_code, versions) in groups {
        let timeline = flatten_timeline(public_code.as_str(), versions)?;
        debug!(%public_code, versions = timeline.len(), "flattened timeline");

        for interval in &timeline {
            let quay = &stop_place.quays[interval.owner];
            flattened.push(apply_validity(quay, &interval.validity, zone)?);
        }
    }

    stop_place.quays = flattened;
    Ok(stop_place)
}

/// Iterator adapter flattening every stop place it yields.
///
/// Produces exactly one item per upstream stop place.
#[derive(Debug, Clone)]
pub struct QuayPriorityIter<I, Tz: TimeZone> {
    source: I,
    config: FlattenConfig,
    zone: Tz,
}

impl<I, Tz: TimeZone> QuayPriorityIter<I, Tz> {
    pub const fn new(source: I, config: FlattenConfig, zone: Tz) -> Self {
        Self {
            source,
            config,
            zone,
        }
    }
}

impl<I, Tz> Iterator for QuayPriorityIter<I, Tz>
where
    I: Iterator<Item = StopPlace>,
    Tz: TimeZone,
{
    type Item = Result<StopPlace, FlattenError>;

    fn next(&mut self) -> Option<Self::Item> {
        let stop_place = self.source.next()?;
        Some(flatten_stop_place(stop_place, &self.config, &self.zone))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}

/// Like [`QuayPriorityIter`], for sources that can fail themselves.
///
/// Upstream errors are passed through as [`SourceError::Source`].
#[derive(Debug, Clone)]
pub struct TryQuayPriorityIter<I, Tz: TimeZone> {
    source: I,
    config: FlattenConfig,
    zone: Tz,
}

impl<I, Tz: TimeZone> TryQuayPriorityIter<I, Tz> {
    pub const fn new(source: I, config: FlattenConfig, zone: Tz) -> Self {
        Self {
            source,
            config,
            zone,
        }
    }
}

impl<I, E, Tz> Iterator for TryQuayPriorityIter<I, Tz>
where
    I: Iterator<Item = Result<StopPlace, E>>,
    Tz: TimeZone,
{
    type Item = Result<StopPlace, SourceError<E>>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = match self.source.next()? {
            Ok(stop_place) => {
                flatten_stop_place(stop_place, &self.config, &self.zone).map_err(SourceError::from)
            }
            Err(err) => Err(SourceError::Source(err)),
        };
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}

/// Extension methods for iterators of stop places.
pub trait FlattenQuayPriorities: Iterator<Item = StopPlace> + Sized {
    /// Flattens the quay versions of every stop place as it is pulled.
    fn flatten_quay_priorities<Tz: TimeZone>(
        self,
        config: FlattenConfig,
        zone: Tz,
    ) -> QuayPriorityIter<Self, Tz> {
        QuayPriorityIter::new(self, config, zone)
    }
}

impl<I: Iterator<Item = StopPlace>> FlattenQuayPriorities for I {}

/// Extension methods for fallible iterators of stop places.
pub trait TryFlattenQuayPriorities<E>: Iterator<Item = Result<StopPlace, E>> + Sized {
    fn try_flatten_quay_priorities<Tz: TimeZone>(
        self,
        config: FlattenConfig,
        zone: Tz,
    ) -> TryQuayPriorityIter<Self, Tz> {
        TryQuayPriorityIter::new(self, config, zone)
    }
}

impl<I, E> TryFlattenQuayPriorities<E> for I where I: Iterator<Item = Result<StopPlace, E>> {}
