//! Footprint Patcher Core Library
//!
//! Merges footprint definitions from installed libraries into the target
//! package's footprint directory and regenerates the index manifest that
//! re-exports every footprint. The target's original footprints are
//! preserved in a one-time backup that serves as the base layer of every
//! merge, so repeated patching never compounds.
//!
//! # Pipeline
//!
//! 1. Resolve the requested library names into ordered merge layers
//!    ([`PatchPlan::resolve`]); the target's own name must be present and
//!    becomes the base layer.
//! 2. Validate that every requested library has a non-empty footprints
//!    directory ([`registry::ensure_libraries_exist`]).
//! 3. Ensure the one-time backup of the target's originals exists
//!    ([`ensure_backup`]).
//! 4. Layer each library's files into a staging directory, render the
//!    manifest, and atomically swap staging into place
//!    ([`patch_libraries`]).
//!
//! [`patch_footprints`] runs the whole pipeline; the `patch-footprints`
//! binary is a thin CLI over it.

pub mod error;
pub mod library;
pub mod operations;
pub mod registry;

pub use error::{Error, Result};
pub use library::{Layout, Library, PatchLayer, PatchPlan};
pub use operations::{
    ensure_backup, generate_index, patch_footprints, patch_libraries, PatchOutcome,
};
