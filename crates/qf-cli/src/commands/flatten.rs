//! Implementation of the `qf flatten` command.
//!
//! Streams stop places from JSON lines through the quay priority flattening
//! and writes the results as JSON lines. Results are spooled to a temporary
//! file first. It replaces the `--output` target, or is copied to stdout,
//! only once every stop place has been flattened, so a failed run never
//! leaves partial output behind.

use std::fs::File;
use std::io::{self, BufRead, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use qf_core::TryFlattenQuayPriorities;

use super::input;
use crate::Config;
use crate::cli::FlattenArgs;

/// Run the flatten command, returning the number of stop places written.
pub fn run(args: &FlattenArgs, config: &Config) -> Result<usize> {
    let reader = input::open(args.input.as_deref())?;

    match &args.output {
        Some(path) => write_to_file(reader, path, config),
        None => write_to_stdout(reader, config),
    }
}

fn write_to_stdout<R: BufRead>(reader: R, config: &Config) -> Result<usize> {
    let mut spool = tempfile::tempfile().context("failed to create temporary file")?;
    let written = spool_flattened(reader, &mut spool, config)?;

    spool
        .seek(SeekFrom::Start(0))
        .context("failed to rewind temporary file")?;
    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    io::copy(&mut spool, &mut stdout).context("failed to write output")?;
    stdout.flush().context("failed to flush output")?;
    Ok(written)
}

fn write_to_file<R: BufRead>(reader: R, path: &Path, config: &Config) -> Result<usize> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;

    let written = spool_flattened(reader, temp.as_file_mut(), config)?;

    temp.persist(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(written)
}

fn spool_flattened<R: BufRead>(reader: R, spool: &mut File, config: &Config) -> Result<usize> {
    let mut writer = BufWriter::new(spool);
    let written = write_flattened(reader, &mut writer, config)?;
    writer.flush().context("failed to flush output")?;
    Ok(written)
}

/// Flattens every stop place from `reader` and writes it to `writer`.
///
/// Stops at the first failing stop place.
pub fn write_flattened<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    config: &Config,
) -> Result<usize> {
    let zone = config.zone()?;
    let mut written = 0;

    let flattened =
        input::stop_places(reader).try_flatten_quay_priorities(config.flatten.clone(), zone);
    for (index, result) in flattened.enumerate() {
        let stop_place =
            result.with_context(|| format!("failed to flatten stop place {}", index + 1))?;
        serde_json::to_writer(&mut *writer, &stop_place)
            .context("failed to serialize stop place")?;
        writeln!(writer).context("failed to write output")?;
        written += 1;
    }

    tracing::debug!(written, "flattened stop places");
    Ok(written)
}
