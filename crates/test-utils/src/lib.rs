//! Shared test utilities for the sonar viewer workspace.
//!
//! - [`LogSetBuilder`] writes synthetic Humminbird recordings to disk
//! - ping generators produce predictable echo profiles
//! - [`fixtures`] holds viewport sizes, positions and recording names
//! - [`require_test_file!`] skips tests whose real recording is missing
//!
//! ```ignore
//! use test_utils::{require_test_file, LogSetBuilder};
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Resolve a real recording by name, or skip the calling test.
///
/// ```ignore
/// #[test]
/// fn test_real_recording() {
///     let path = require_test_file!("R00012.DAT");
/// }
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: recording '{}' not found. Copy it into testdata/ or set TEST_DATA_DIR.",
                    $name
                );
                return;
            }
        }
    }};
}

/// Assert two numbers differ by at most `epsilon`. Operands are compared as `f64`.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}
