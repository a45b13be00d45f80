use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use crate::error::BomError;
use crate::models::Package;

/// Finds the license files that apply to a package by looking in its source
/// directory, then in each parent directory up to the source tree root.
#[derive(Debug, Clone)]
pub struct LicenseLocator {
    names: Regex,
}

impl LicenseLocator {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            names: Regex::new(r"(?i)^(?:(?:un)?licen[sc]e|copy(?:ing|right))(?:\.[^.]+)?$")?,
        })
    }

    /// Whether `name` looks like a license file name (`LICENSE`, `COPYING.txt`, ...).
    pub fn is_license_name(&self, name: &str) -> bool {
        self.names.is_match(name)
    }

    /// Return every license file of the nearest directory that has any.
    ///
    /// An empty result means the search reached the source root without
    /// finding anything. Unreadable directories are an error.
    pub fn locate(&self, package: &Package) -> Result<Vec<PathBuf>, BomError> {
        let mut current = Some(package.dir.as_path());
        while let Some(dir) = current {
            if dir == package.root.as_path() || !dir.starts_with(&package.root) {
                break;
            }
            let found = self.scan(dir)?;
            if !found.is_empty() {
                debug!(package = %package.import_path, files = found.len(), dir = %dir.display(), "license files located");
                return Ok(found);
            }
            current = dir.parent();
        }

        debug!(package = %package.import_path, "no license file up to source root");
        Ok(Vec::new())
    }

    fn scan(&self, dir: &Path) -> Result<Vec<PathBuf>, BomError> {
        let locator_err = |source| BomError::Locator {
            path: dir.to_path_buf(),
            source,
        };

        let mut found = Vec::new();
        for entry in fs::read_dir(dir).map_err(locator_err)? {
            let entry = entry.map_err(locator_err)?;
            // Symlinks and directories are skipped, like any non-regular file.
            if !entry.file_type().map_err(locator_err)?.is_file() {
                continue;
            }
            if entry.file_name().to_str().is_some_and(|n| self.is_license_name(n)) {
                found.push(entry.path());
            }
        }
        found.sort();
        Ok(found)
    }
}
