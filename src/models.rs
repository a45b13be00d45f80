use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::license::matcher::MatchResult;

/// A package of the dependency closure, as reported by the build graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub import_path: String,
    /// Directory holding the package sources.
    pub dir: PathBuf,
    /// Ceiling of the license search: only `dir` and its ancestors strictly
    /// below this directory are searched.
    pub root: PathBuf,
    /// Build or listing error reported for this package, kept verbatim.
    pub error: Option<String>,
}

/// Match result for one candidate license file of a package.
#[derive(Debug, Clone, PartialEq)]
pub struct LicenseInfo<'c> {
    /// `None` when no license file was found for the package.
    pub path: Option<PathBuf>,
    pub result: MatchResult<'c>,
}

impl LicenseInfo<'_> {
    pub fn not_found() -> Self {
        Self {
            path: None,
            result: MatchResult::no_file(),
        }
    }
}

/// Per-package license findings. After grouping, `package` may be a shared
/// import path prefix standing for several packages.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageLicense<'c> {
    pub package: String,
    pub infos: Vec<LicenseInfo<'c>>,
    pub error: Option<String>,
}

/// A license attributed to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseEntry {
    pub name: String,
    pub confidence: f64,
}

/// Project-level result, used both for confident attributions and for the
/// entries that need attention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectAttribution {
    pub project: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub licenses: Vec<LicenseEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProjectAttribution {
    pub fn failed(project: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            licenses: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Forced license names for one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideEntry {
    pub project: String,
    #[serde(default)]
    pub licenses: Vec<OverrideLicense>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideLicense {
    pub name: String,
}
