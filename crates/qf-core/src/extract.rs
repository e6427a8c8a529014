//! Reading version validity out of a record's key values.

use chrono::NaiveDate;

use crate::error::FlattenError;
use crate::interval::Validity;
use crate::record::KeyValueRecord;
use crate::types::Priority;

pub const VALIDITY_START: &str = "validityStart";
pub const VALIDITY_END: &str = "validityEnd";
pub const PRIORITY: &str = "priority";

/// Reads `validityStart`, `validityEnd` and `priority` from a record.
///
/// A missing `validityEnd` means the version is valid indefinitely. An end
/// before the start is rejected.
pub fn extract_validity<R: KeyValueRecord + ?Sized>(record: &R) -> Result<Validity, FlattenError> {
    let start = find_date(record, VALIDITY_START)?;
    let end = find_date(record, VALIDITY_END)?;
    let priority = find_integer(record, PRIORITY)?;

    let start = start.ok_or_else(|| missing(record, VALIDITY_START))?;
    let priority = priority.ok_or_else(|| missing(record, PRIORITY))?;

    if let Some(end) = end.filter(|end| *end < start) {
        return Err(FlattenError::InvertedValidityRange {
            record: record.record_label(),
            start,
            end,
        });
    }

    Ok(Validity::new(start, end, Priority::new(priority)))
}

fn missing<R: KeyValueRecord + ?Sized>(record: &R, field: &'static str) -> FlattenError {
    FlattenError::MissingRequiredField {
        record: record.record_label(),
        field,
    }
}

/// Returns the single item stored under `key`, if any.
fn find_single<'r, R: KeyValueRecord + ?Sized>(
    record: &'r R,
    key: &'static str,
) -> Result<Option<&'r str>, FlattenError> {
    let Some(value) = record.key_value(key) else {
        return Ok(None);
    };

    match value.items() {
        [] => Ok(None),
        [item] => Ok(Some(item.as_str())),
        items => Err(FlattenError::AmbiguousAttributeValue {
            record: record.record_label(),
            key,
            count: items.len(),
        }),
    }
}

fn find_date<R: KeyValueRecord + ?Sized>(
    record: &R,
    key: &'static str,
) -> Result<Option<NaiveDate>, FlattenError> {
    find_single(record, key)?
        .map(|raw| {
            raw.parse::<NaiveDate>()
                .map_err(|_| FlattenError::InvalidDateFormat {
                    record: record.record_label(),
                    key,
                    value: raw.to_string(),
                })
        })
        .transpose()
}

fn find_integer<R: KeyValueRecord + ?Sized>(
    record: &R,
    key: &'static str,
) -> Result<Option<i32>, FlattenError> {
    find_single(record, key)?
        .map(|raw| {
            raw.parse::<i32>()
                .map_err(|_| FlattenError::InvalidIntegerFormat {
                    record: record.record_label(),
                    key,
                    value: raw.to_string(),
                })
        })
        .transpose()
}
