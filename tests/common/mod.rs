//! Shared fixtures: a fake installation root holding footprint libraries.

use std::fs;
use std::path::{Path, PathBuf};

use footprint_patcher::{Layout, Library};
use tempfile::TempDir;

pub const TARGET: &str = "ergogen";

/// Layout rooted in a temp directory, targeting `ergogen`.
pub fn test_layout(temp: &TempDir) -> Layout {
    Layout::new(temp.path(), TARGET)
}

/// Creates `<root>/<library>/src/footprints` populated with the given files.
pub fn install_library(layout: &Layout, name: &str, files: &[(&str, &str)]) -> PathBuf {
    let dir = layout.footprints_dir(&Library::new(name));
    fs::create_dir_all(&dir).unwrap();
    for (file_name, contents) in files {
        fs::write(dir.join(file_name), contents).unwrap();
    }
    dir
}

/// Sorted file names of a directory.
pub fn dir_listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
