//! Footprint patching operations (backup, merge, index generation).
//!
//! This module implements the patch pipeline:
//! - Backup: preserve the target's original footprints, once
//! - Merge: layer each requested library's footprints over the base set
//! - Index: regenerate the manifest that re-exports every footprint
//!
//! The merge happens in a staging directory that is swapped into place only
//! after every copy and the manifest write succeed, so a failure part-way
//! leaves the live directory as it was.

use std::path::{Path, PathBuf};

use futures_util::future::try_join_all;
use tracing::{debug, info, trace};

use crate::error::{Error, Result};
use crate::library::{Layout, PatchPlan, FOOTPRINT_EXTENSION, INDEX_FILE};
use crate::registry::{ensure_libraries_exist, list_footprint_files};

/// Summary of one patch run.
#[derive(Debug, Clone)]
pub struct PatchOutcome {
    /// Whether this run created the one-time backup.
    pub backup_created: bool,
    /// Total files copied across all merge layers.
    pub files_copied: usize,
    /// Export keys written to the manifest, in manifest order.
    pub exports: Vec<String>,
}

/// Patches the target's footprints from the requested libraries and
/// regenerates the manifest.
///
/// The full pipeline: resolve the request list into merge layers, validate
/// every library, make sure the one-time backup exists, merge the layers
/// into a staging directory, render the manifest there, and swap staging
/// into place. Any error aborts the remaining steps and propagates as-is.
pub async fn patch_footprints(layout: &Layout, names: &[String]) -> Result<PatchOutcome> {
    let plan = PatchPlan::resolve(layout, names)?;
    ensure_libraries_exist(layout, &plan).await?;

    let backup_created = ensure_backup(layout).await?;
    let (files_copied, exports) = patch_libraries(layout, &plan).await?;

    Ok(PatchOutcome {
        backup_created,
        files_copied,
        exports,
    })
}

/// Makes sure the target's original footprints are preserved in the backup
/// directory.
///
/// The backup is created at most once: a backup directory that already holds
/// files is left untouched, keeping the original footprint set as the base
/// for every later merge. A missing, unreadable, or empty backup directory
/// all mean the same thing here: no backup yet. Returns whether this call
/// created the backup.
pub async fn ensure_backup(layout: &Layout) -> Result<bool> {
    let backup_dir = layout.backup_dir();
    match list_footprint_files(&backup_dir).await {
        Ok(files) if !files.is_empty() => {
            debug!(path = %backup_dir.display(), "backup already populated");
            return Ok(false);
        }
        _ => {}
    }

    tokio::fs::create_dir_all(&backup_dir)
        .await
        .map_err(|e| Error::io(&backup_dir, e))?;

    let copied = copy_files(&layout.target_footprints_dir(), &backup_dir).await?;
    info!(files = copied, path = %backup_dir.display(), "created footprints backup");
    Ok(true)
}

/// Merges every layer of the plan into the target's footprints directory and
/// regenerates the manifest.
///
/// Layers are applied strictly in plan order so later libraries overwrite
/// earlier ones on name collision; copies within one layer are issued
/// concurrently with no ordering guarantee. Returns the total number of
/// files copied and the manifest's export keys.
pub async fn patch_libraries(layout: &Layout, plan: &PatchPlan) -> Result<(usize, Vec<String>)> {
    let staging = staging_dir(layout);
    reset_dir(&staging).await?;

    let mut files_copied = 0;
    for layer in plan.layers() {
        let copied = copy_files(&layer.source_dir(layout), &staging).await?;
        debug!(library = %layer.library(layout).name, files = copied, "merged layer");
        files_copied += copied;
    }

    let exports = generate_index(&staging).await?;
    commit_staging(layout, &staging).await?;

    Ok((files_copied, exports))
}

/// Regenerates the `index.js` manifest for a footprints directory.
///
/// Every `.js` file except the manifest itself becomes one export binding
/// whose key is the file name up to its first `.`. Entries are emitted in
/// sorted file-name order, so regenerating over unchanged files reproduces
/// the manifest byte for byte. Overwrites any existing manifest. Returns the
/// keys written.
pub async fn generate_index(dir: &Path) -> Result<Vec<String>> {
    let files = list_footprint_files(dir).await?;
    let keys: Vec<String> = files
        .iter()
        .filter_map(|file| file.file_name().and_then(|name| name.to_str()))
        .filter(|name| *name != INDEX_FILE)
        .filter(|name| {
            Path::new(name)
                .extension()
                .is_some_and(|ext| ext == FOOTPRINT_EXTENSION)
        })
        .filter_map(|name| export_key(name).map(str::to_owned))
        .collect();

    write_atomic(&dir.join(INDEX_FILE), index_contents(&keys).as_bytes()).await?;
    debug!(exports = keys.len(), path = %dir.display(), "wrote footprint index");
    Ok(keys)
}

/// Export key for a footprint file name: the part before the first `.`.
fn export_key(file_name: &str) -> Option<&str> {
    file_name.split('.').next().filter(|key| !key.is_empty())
}

fn index_contents(keys: &[String]) -> String {
    let mut lines = vec![String::from("module.exports = {")];
    lines.extend(keys.iter().map(|key| format!("  {key}: require('./{key}'),")));
    lines.push(String::from("}"));
    lines.join("\n")
}

/// Copies every plain file of `src_dir` into `dest_dir`, overwriting name
/// collisions. Copies are issued concurrently with no ordering guarantee.
async fn copy_files(src_dir: &Path, dest_dir: &Path) -> Result<usize> {
    let files = list_footprint_files(src_dir).await?;

    let copies: Vec<_> = files
        .into_iter()
        .filter_map(|file| {
            let dest = dest_dir.join(file.file_name()?);
            Some(copy_file(file, dest))
        })
        .collect();

    let count = copies.len();
    try_join_all(copies).await?;
    Ok(count)
}

async fn copy_file(src: PathBuf, dest: PathBuf) -> Result<()> {
    trace!(from = %src.display(), to = %dest.display(), "copy footprint");
    tokio::fs::copy(&src, &dest)
        .await
        .map_err(|e| Error::io(&src, e))?;
    Ok(())
}

/// Writes a file via write-to-temp-then-rename so a failed write never
/// leaves a partial manifest behind.
async fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp = path.with_file_name(temp_name);

    tokio::fs::write(&temp, contents)
        .await
        .map_err(|e| Error::io(&temp, e))?;
    tokio::fs::rename(&temp, path)
        .await
        .map_err(|e| Error::io(path, e))?;
    Ok(())
}

/// Staging directory for one merge, kept next to the live directory so the
/// final rename stays on one filesystem.
fn staging_dir(layout: &Layout) -> PathBuf {
    layout
        .target_footprints_dir()
        .with_file_name(format!(".footprints_staging.{}", std::process::id()))
}

/// Creates `dir` empty, clearing anything a crashed run left behind.
async fn reset_dir(dir: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::io(dir, e)),
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| Error::io(dir, e))
}

/// Swaps the staged merge into place: the live directory is renamed aside,
/// staging takes its path, and the old contents are removed.
async fn commit_staging(layout: &Layout, staging: &Path) -> Result<()> {
    let live = layout.target_footprints_dir();
    let retired = live.with_file_name(format!(".footprints_old.{}", std::process::id()));

    tokio::fs::rename(&live, &retired)
        .await
        .map_err(|e| Error::io(&live, e))?;

    if let Err(e) = tokio::fs::rename(staging, &live).await {
        // Best effort to put the original back; the rename error wins.
        let _ = tokio::fs::rename(&retired, &live).await;
        return Err(Error::io(staging, e));
    }

    tokio::fs::remove_dir_all(&retired)
        .await
        .map_err(|e| Error::io(&retired, e))?;
    Ok(())
}
