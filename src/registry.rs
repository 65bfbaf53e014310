//! Footprint enumeration and library validation.
//!
//! Libraries are installed packages addressed by name; each one keeps its
//! footprint files in a flat `src/footprints` directory. This module lists
//! those directories and checks, before any mutation happens, that every
//! requested library actually has footprints to contribute.

use std::path::{Path, PathBuf};

use futures_util::future::join_all;
use tracing::debug;

use crate::error::{Error, Result};
use crate::library::{Layout, Library, PatchPlan};

/// Lists the plain files of a footprints directory, sorted by file name.
///
/// Subdirectories are ignored; footprint folders are flat by convention.
pub async fn list_footprint_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| Error::io(dir, e))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| Error::io(dir, e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| Error::io(entry.path(), e))?;
        if file_type.is_file() {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

/// Checks that a library's live footprints directory is readable and
/// non-empty. Read-only.
pub async fn ensure_library_exists(layout: &Layout, library: &Library) -> Result<()> {
    let dir = layout.footprints_dir(library);
    let files = match list_footprint_files(&dir).await {
        Ok(files) => files,
        Err(Error::Io { path, source }) => {
            return Err(Error::MissingFootprints {
                library: library.name.clone(),
                path,
                source,
            });
        }
        Err(other) => return Err(other),
    };

    if files.is_empty() {
        return Err(Error::EmptyFootprints {
            library: library.name.clone(),
        });
    }

    debug!(library = %library.name, files = files.len(), "footprints present");
    Ok(())
}

/// Validates every library of the plan.
///
/// Checks are issued concurrently with no ordering guarantee; results are
/// read back in request order, so the failure reported is always the
/// earliest requested library that failed.
pub async fn ensure_libraries_exist(layout: &Layout, plan: &PatchPlan) -> Result<()> {
    let checks = plan
        .layers()
        .iter()
        .map(|layer| ensure_library_exists(layout, layer.library(layout)));

    for result in join_all(checks).await {
        result?;
    }
    Ok(())
}
