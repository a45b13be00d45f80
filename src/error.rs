use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a license attribution run.
///
/// Per-package build errors are not represented here: they travel as data on
/// [`Package::error`](crate::models::Package) and end up in the error report.
#[derive(Debug, Error)]
pub enum BomError {
    /// An embedded license template could not be scanned. The corpus ships
    /// with the binary, so this is a packaging defect.
    #[error("license template #{index} is malformed: {reason}")]
    Corpus { index: usize, reason: String },

    /// A directory visited while searching for license files was unreadable.
    #[error("could not read directory {}: {source}", path.display())]
    Locator {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read license file {}: {source}", path.display())]
    LicenseFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Several packages point at one license file but have no import path
    /// prefix in common, so no project name can be derived for them.
    #[error(
        "packages share the same license but not common prefix: {} ({})",
        packages.join(", "),
        license.display()
    )]
    GroupingConflict {
        license: PathBuf,
        packages: Vec<String>,
    },

    #[error("invalid built-in pattern: {0}")]
    Pattern(#[from] regex::Error),
}
