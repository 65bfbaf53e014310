use std::fs;

use footprint_patcher::{ensure_backup, patch_footprints};
use tempfile::TempDir;

mod common;
use common::{dir_listing, install_library, test_layout, TARGET};

#[tokio::test]
async fn first_run_preserves_the_original_footprints() {
    let temp = TempDir::new().unwrap();
    let layout = test_layout(&temp);
    install_library(
        &layout,
        TARGET,
        &[
            ("a.js", "module.exports = 'a'"),
            ("b.js", "module.exports = 'b'"),
        ],
    );

    let outcome = patch_footprints(&layout, &[TARGET.to_string()]).await.unwrap();

    assert!(outcome.backup_created);
    assert_eq!(dir_listing(&layout.backup_dir()), vec!["a.js", "b.js"]);
    assert_eq!(
        fs::read_to_string(layout.backup_dir().join("a.js")).unwrap(),
        "module.exports = 'a'"
    );
    assert_eq!(
        fs::read_to_string(layout.backup_dir().join("b.js")).unwrap(),
        "module.exports = 'b'"
    );
}

#[tokio::test]
async fn a_populated_backup_is_never_overwritten() {
    let temp = TempDir::new().unwrap();
    let layout = test_layout(&temp);
    let live = install_library(&layout, TARGET, &[("a.js", "original")]);

    assert!(ensure_backup(&layout).await.unwrap());

    // Change the live directory after the backup exists; a second pass must
    // not pick the changes up.
    fs::write(live.join("a.js"), "patched").unwrap();
    fs::write(live.join("extra.js"), "extra").unwrap();

    assert!(!ensure_backup(&layout).await.unwrap());
    assert_eq!(dir_listing(&layout.backup_dir()), vec!["a.js"]);
    assert_eq!(
        fs::read_to_string(layout.backup_dir().join("a.js")).unwrap(),
        "original"
    );
}

#[tokio::test]
async fn second_invocation_leaves_the_backup_untouched() {
    let temp = TempDir::new().unwrap();
    let layout = test_layout(&temp);
    install_library(&layout, TARGET, &[("a.js", "original")]);
    install_library(&layout, "acme", &[("a.js", "acme wins")]);

    let args = vec![TARGET.to_string(), "acme".to_string()];
    patch_footprints(&layout, &args).await.unwrap();

    // The live copy of a.js now carries acme's contents; the backup must
    // still hold the original after another run.
    let outcome = patch_footprints(&layout, &args).await.unwrap();

    assert!(!outcome.backup_created);
    assert_eq!(dir_listing(&layout.backup_dir()), vec!["a.js"]);
    assert_eq!(
        fs::read_to_string(layout.backup_dir().join("a.js")).unwrap(),
        "original"
    );
}

#[tokio::test]
async fn an_empty_backup_directory_is_repopulated() {
    let temp = TempDir::new().unwrap();
    let layout = test_layout(&temp);
    install_library(&layout, TARGET, &[("a.js", "original")]);
    fs::create_dir_all(layout.backup_dir()).unwrap();

    assert!(ensure_backup(&layout).await.unwrap());
    assert_eq!(dir_listing(&layout.backup_dir()), vec!["a.js"]);
}
