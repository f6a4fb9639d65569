use std::collections::{BTreeSet, HashSet};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use humansize::{format_size, DECIMAL};

use crate::error::{AppError, Result};
use crate::{listing, playlist};

#[derive(Clone, Copy, Debug, Default)]
pub struct Options {
    pub delete: bool,
    pub verbose: bool,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub kept: usize,
    pub skipped_non_mp4: usize,
    pub would_delete: usize,
    pub deleted: usize,
    /// Bytes freed, or that would be freed on a dry run.
    pub bytes: u64,
}

pub fn is_mp4(name: &str) -> bool {
    name.rsplit_once('.')
        .map_or(false, |(_, ext)| ext.eq_ignore_ascii_case("mp4"))
}

/// Delete (or report) every `.mp4` in `files` whose joined path is not referenced.
pub fn prune<W: Write>(
    dir: &Path,
    files: &BTreeSet<OsString>,
    referenced: &HashSet<PathBuf>,
    options: Options,
    out: &mut W,
) -> Result<Summary> {
    let mut summary = Summary::default();

    for name in files {
        let path = dir.join(name);

        if !is_mp4(&name.to_string_lossy()) {
            writeln!(out, "'{}' is not an MP4 file.", path.display())?;
            summary.skipped_non_mp4 += 1;
            continue;
        }

        if referenced.contains(&playlist::join_clean(dir, Path::new(name))) {
            if options.verbose {
                writeln!(out, "Keeping '{}'.", path.display())?;
            }
            tracing::debug!(path = %path.display(), "referenced by playlist");
            summary.kept += 1;
            continue;
        }

        let size = std::fs::metadata(&path)
            .map_err(|source| AppError::Stat {
                path: path.clone(),
                source,
            })?
            .len();
        summary.bytes += size;

        if !options.delete {
            writeln!(out, "[DRY RUN] Would delete '{}'.", path.display())?;
            summary.would_delete += 1;
            continue;
        }

        writeln!(out, "Deleting '{}'!", path.display())?;
        std::fs::remove_file(&path).map_err(|source| AppError::Delete {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), size, "deleted");
        summary.deleted += 1;
    }

    Ok(summary)
}

pub fn write_summary<W: Write>(summary: &Summary, options: Options, out: &mut W) -> Result<()> {
    let size = format_size(summary.bytes, DECIMAL);
    if options.delete {
        writeln!(out, "Saved {} of space.", size)?;
    } else {
        writeln!(out, "Would save {} of space.", size)?;
    }
    Ok(())
}

/// Reconcile the directory holding `playlist_path` against the playlist.
/// Any failure aborts before the summary is written.
pub fn run<W: Write>(playlist_path: &Path, options: Options, out: &mut W) -> Result<Summary> {
    let dir = listing::playlist_dir(playlist_path);

    let files = listing::list_files(&dir)?;
    writeln!(
        out,
        "Found {} files in playlist directory '{}'.",
        files.len(),
        dir.display()
    )?;

    let start = Instant::now();
    let media = playlist::load(playlist_path)?;
    let referenced = playlist::referenced_files(&media, &dir)?;
    let elapsed = start.elapsed();
    tracing::debug!(?elapsed, "parsed playlist");
    writeln!(out, "Parsed playlist in {:.2?}.", elapsed)?;
    writeln!(out, "Keeping {} items from playlist.", referenced.len())?;

    let summary = prune(&dir, &files, &referenced, options, out)?;
    write_summary(&summary, options, out)?;

    tracing::debug!(
        kept = summary.kept,
        skipped = summary.skipped_non_mp4,
        would_delete = summary.would_delete,
        deleted = summary.deleted,
        bytes = summary.bytes,
        "reconciliation finished"
    );
    Ok(summary)
}
