//! Locating real recordings and scratch directories for tests.
//!
//! Real recordings are not checked in. Tests look for them under
//! `$TEST_DATA_DIR`, `crates/sonar-log/testdata/` and `testdata/` at the
//! workspace root, and skip when none has the file.

use std::path::PathBuf;

/// Workspace root, two levels above this crate's manifest.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .nth(2)
        .map(|p| p.to_path_buf())
        .unwrap_or(manifest_dir)
}

/// First existing candidate path for the recording `name`.
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let root = workspace_root();
    let mut candidates: Vec<PathBuf> = std::env::var("TEST_DATA_DIR")
        .map(|dir| vec![PathBuf::from(dir).join(name)])
        .unwrap_or_default();
    candidates.push(root.join("crates/sonar-log/testdata").join(name));
    candidates.push(root.join("testdata").join(name));

    candidates.into_iter().find(|path| path.exists())
}

/// Scratch directory removed when the returned guard drops.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("sonar_test_")
        .tempdir()
        .expect("Failed to create temporary test directory")
}
