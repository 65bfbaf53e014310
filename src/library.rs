use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Subdirectory of an installed package that holds its footprint files.
pub const FOOTPRINTS_SUBDIR: &str = "src/footprints";

/// Sibling directory preserving the target's pre-patch footprints.
pub const BACKUP_SUBDIR: &str = "src/.footprints_backup";

/// Name of the generated manifest file.
pub const INDEX_FILE: &str = "index.js";

/// Extension footprint files are expected to carry.
pub const FOOTPRINT_EXTENSION: &str = "js";

/// An installed package contributing footprint files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub name: String,
}

impl Library {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Filesystem layout of the installation being patched.
///
/// All paths are derived by convention from the installation root. The
/// default layout patches the `ergogen` package inside `node_modules`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    pub install_root: PathBuf,
    pub target: Library,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new("node_modules", "ergogen")
    }
}

impl Layout {
    pub fn new(install_root: impl Into<PathBuf>, target: impl Into<String>) -> Self {
        Self {
            install_root: install_root.into(),
            target: Library::new(target),
        }
    }

    /// Live footprints directory of an installed library.
    pub fn footprints_dir(&self, library: &Library) -> PathBuf {
        self.install_root.join(&library.name).join(FOOTPRINTS_SUBDIR)
    }

    /// Live footprints directory of the target library.
    pub fn target_footprints_dir(&self) -> PathBuf {
        self.footprints_dir(&self.target)
    }

    /// One-time backup of the target's original footprints.
    pub fn backup_dir(&self) -> PathBuf {
        self.install_root.join(&self.target.name).join(BACKUP_SUBDIR)
    }
}

/// One layer of the merge sequence.
///
/// The target library is both a requested library and the implicit base of
/// every merge. Its occurrences in the request list resolve to [`Base`] once,
/// so the rest of the pipeline never compares names.
///
/// [`Base`]: PatchLayer::Base
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchLayer {
    /// The target's own original footprints, re-applied from the backup.
    Base,
    /// An additional library merged on top, in request order.
    Library(Library),
}

impl PatchLayer {
    /// The installed library behind this layer.
    pub fn library<'a>(&'a self, layout: &'a Layout) -> &'a Library {
        match self {
            PatchLayer::Base => &layout.target,
            PatchLayer::Library(library) => library,
        }
    }

    /// The directory this layer's files are copied from during a merge.
    ///
    /// The base layer reads from the backup rather than the live directory so
    /// earlier patches never compound.
    pub fn source_dir(&self, layout: &Layout) -> PathBuf {
        match self {
            PatchLayer::Base => layout.backup_dir(),
            PatchLayer::Library(library) => layout.footprints_dir(library),
        }
    }
}

/// Ordered merge layers resolved from the raw request list.
#[derive(Debug, Clone)]
pub struct PatchPlan {
    layers: Vec<PatchLayer>,
}

impl PatchPlan {
    /// Maps requested library names onto merge layers, in the order given.
    ///
    /// Fails if the target's own name is absent from the list: the merge
    /// re-applies the target's backed-up files as its base, so the target
    /// must be requested explicitly. Names are neither deduplicated nor
    /// reordered.
    pub fn resolve(layout: &Layout, names: &[String]) -> Result<Self> {
        if !names.iter().any(|name| *name == layout.target.name) {
            return Err(Error::TargetNotRequested {
                target: layout.target.name.clone(),
            });
        }

        let layers = names
            .iter()
            .map(|name| {
                if *name == layout.target.name {
                    PatchLayer::Base
                } else {
                    PatchLayer::Library(Library::new(name.clone()))
                }
            })
            .collect();

        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[PatchLayer] {
        &self.layers
    }
}
