//! Errors raised while flattening quay versions.
//!
//! Every variant signals bad source data (or, for `UnreachableSpliceState`, a
//! flattening bug). None of them is transient: the stop place being processed
//! cannot be exported until the data is corrected.

use chrono::NaiveDate;
use thiserror::Error;

use crate::interval::Validity;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlattenError {
    #[error("{record} has no `{field}`")]
    MissingRequiredField { record: String, field: &'static str },

    #[error("{record}: unable to parse key value {key}={value} as a date")]
    InvalidDateFormat {
        record: String,
        key: &'static str,
        value: String,
    },

    #[error("{record}: unable to parse key value {key}={value} as an integer")]
    InvalidIntegerFormat {
        record: String,
        key: &'static str,
        value: String,
    },

    #[error("{record}: validity ends on {end}, before it starts on {start}")]
    InvertedValidityRange {
        record: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("{record}: key value {key} has {count} values, expected at most one")]
    AmbiguousAttributeValue {
        record: String,
        key: &'static str,
        count: usize,
    },

    #[error(
        "public code {public_code}: overlapping versions with the same priority: {existing} and {incoming}"
    )]
    ConflictingSameTierVersions {
        public_code: String,
        existing: Validity,
        incoming: Validity,
    },

    #[error(
        "public code {public_code}: unexpected case while splicing {incoming} over {existing}"
    )]
    UnreachableSpliceState {
        public_code: String,
        existing: Validity,
        incoming: Validity,
    },

    #[error("{record}: {date} has no representable local time in the export time zone")]
    NonexistentLocalTime { record: String, date: NaiveDate },
}

/// Failure of a stream whose upstream source can fail as well.
#[derive(Debug, Error)]
pub enum SourceError<E> {
    /// The record source itself failed; the error is passed through unchanged.
    #[error("record source failed")]
    Source(#[source] E),

    #[error(transparent)]
    Flatten(#[from] FlattenError),
}
