//! Writing a resolved validity back onto a copy of its quay.

use chrono::{DateTime, LocalResult, NaiveDate, TimeZone, Utc};

use crate::error::FlattenError;
use crate::extract::{PRIORITY, VALIDITY_END, VALIDITY_START};
use crate::interval::Validity;
use crate::record::{KeyValueRecord, Quay, ValidBetween, Value};

/// Returns a detached copy of `quay` carrying `validity`.
///
/// The copy's `valid_between` spans from the start of the first day to the
/// last instant of the last day in `zone`, and its key values are updated to
/// match. The original quay is left untouched.
pub fn apply_validity<Tz: TimeZone>(
    quay: &Quay,
    validity: &Validity,
    zone: &Tz,
) -> Result<Quay, FlattenError> {
    let from_date = start_of_day(quay, validity.start(), zone)?;
    let to_date = validity
        .end()
        .map(|end| end_of_day(quay, end, zone))
        .transpose()?;

    let mut copy = quay.detached_copy();
    copy.valid_between = Some(ValidBetween { from_date, to_date });

    copy.key_values.insert(
        PRIORITY.to_string(),
        Value::new(validity.priority().to_string()),
    );
    copy.key_values.insert(
        VALIDITY_START.to_string(),
        Value::new(validity.start().to_string()),
    );
    match validity.end() {
        Some(end) => {
            copy.key_values
                .insert(VALIDITY_END.to_string(), Value::new(end.to_string()));
        }
        None => {
            copy.key_values.remove(VALIDITY_END);
        }
    }

    Ok(copy)
}

/// First instant of `date` in `zone`. Ambiguous local times pick the earlier one.
fn start_of_day<Tz: TimeZone>(
    quay: &Quay,
    date: NaiveDate,
    zone: &Tz,
) -> Result<DateTime<Utc>, FlattenError> {
    let local = date
        .and_hms_opt(0, 0, 0)
        .map(|midnight| zone.from_local_datetime(&midnight));
    match local {
        Some(LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _)) => {
            Ok(dt.with_timezone(&Utc))
        }
        _ => Err(nonexistent(quay, date)),
    }
}

/// Last instant of `date` in `zone`. Ambiguous local times pick the later one.
fn end_of_day<Tz: TimeZone>(
    quay: &Quay,
    date: NaiveDate,
    zone: &Tz,
) -> Result<DateTime<Utc>, FlattenError> {
    let local = date
        .and_hms_nano_opt(23, 59, 59, 999_999_999)
        .map(|last| zone.from_local_datetime(&last));
    match local {
        Some(LocalResult::Single(dt) | LocalResult::Ambiguous(_, dt)) => {
            Ok(dt.with_timezone(&Utc))
        }
        _ => Err(nonexistent(quay, date)),
    }
}

fn nonexistent(quay: &Quay, date: NaiveDate) -> FlattenError {
    FlattenError::NonexistentLocalTime {
        record: quay.record_label(),
        date,
    }
}
