//! Inspect command for printing flattened timelines.
//!
//! This module implements `qf inspect`, which shows for every stop place and
//! public code which quay version ends up valid on which dates.

use std::io::Write;

use anyhow::{Context, Result};

use qf_core::{FlattenConfig, StopPlace, flatten_timeline, group_by_public_code};

use super::input;
use crate::Config;
use crate::cli::InspectArgs;

pub fn run<W: Write>(writer: &mut W, args: &InspectArgs, config: &Config) -> Result<()> {
    let reader = input::open(args.input.as_deref())?;

    for (index, stop_place) in input::stop_places(reader).enumerate() {
        let stop_place = stop_place?;
        write_timelines(writer, &stop_place, &config.flatten)
            .with_context(|| format!("failed to inspect stop place {}", index + 1))?;
    }

    Ok(())
}

/// Writes one block per stop place, one line per resolved version.
pub fn write_timelines<W: Write>(
    writer: &mut W,
    stop_place: &StopPlace,
    config: &FlattenConfig,
) -> Result<()> {
    writeln!(writer, "{}", stop_place.label())?;

    let groups = group_by_public_code(&stop_place.quays, config)?;
    if groups.is_empty() {
        writeln!(writer, "  (no flattenable quays)")?;
        return Ok(());
    }

    for (public_code, versions) in groups {
        let timeline = flatten_timeline(public_code.as_str(), versions)?;
        writeln!(writer, "  {public_code}")?;

        for interval in &timeline {
            let quay = &stop_place.quays[interval.owner];
            let end = interval
                .validity
                .end()
                .map_or_else(String::new, |end| end.to_string());
            let source = quay.netex_id.as_ref().map_or("-", |id| id.as_str());
            writeln!(
                writer,
                "    {} .. {end:<10}  priority {}  {source}",
                interval.validity.start(),
                interval.validity.priority(),
            )?;
        }
    }

    Ok(())
}
