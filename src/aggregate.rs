//! Turns packages into project-level license attributions.
//!
//! 1. [`Aggregator::list_licenses`] locates and scores license files for every
//!    package, scoring each distinct file once.
//! 2. [`group_licenses`] collapses packages sharing a license file into one
//!    entry named after their longest common import path prefix.
//! 3. [`attributions`] splits the result into confident attributions and
//!    entries needing attention.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use tracing::{debug, trace};

use crate::error::BomError;
use crate::license::matcher::{match_templates, MatchResult};
use crate::license::template::Corpus;
use crate::locator::LicenseLocator;
use crate::models::{LicenseEntry, LicenseInfo, Package, PackageLicense, ProjectAttribution};

/// Error reported for packages where no template matched any license file.
pub const NO_LICENSE_DETECTED: &str = "No license detected";

/// Per-run state: the corpus, the locator, and match results cached by
/// license file path.
pub struct Aggregator<'c> {
    corpus: &'c Corpus,
    locator: LicenseLocator,
    cache: HashMap<PathBuf, MatchResult<'c>>,
}

impl<'c> Aggregator<'c> {
    pub fn new(corpus: &'c Corpus) -> Result<Self, BomError> {
        Ok(Self {
            corpus,
            locator: LicenseLocator::new()?,
            cache: HashMap::new(),
        })
    }

    /// Collect license findings for `packages`, skipping standard packages.
    ///
    /// Packages carrying a build error are kept with that error and no
    /// license file. Locator and read failures abort the whole run.
    pub fn list_licenses(
        &mut self,
        packages: &[Package],
        standard: &HashSet<String>,
        progress: Option<&ProgressBar>,
    ) -> Result<Vec<PackageLicense<'c>>, BomError> {
        let mut licenses = Vec::with_capacity(packages.len());
        for package in packages {
            if let Some(pb) = progress {
                pb.inc(1);
            }
            if let Some(err) = &package.error {
                licenses.push(PackageLicense {
                    package: package.import_path.clone(),
                    infos: vec![LicenseInfo::not_found()],
                    error: Some(err.clone()),
                });
                continue;
            }
            if standard.contains(&package.import_path) {
                continue;
            }
            licenses.push(self.package_license(package)?);
        }
        Ok(licenses)
    }

    fn package_license(&mut self, package: &Package) -> Result<PackageLicense<'c>, BomError> {
        let paths = self.locator.locate(package)?;

        let mut infos = Vec::with_capacity(paths.len().max(1));
        for path in paths {
            let result = self.match_file(&path)?;
            infos.push(LicenseInfo {
                path: Some(path),
                result,
            });
        }
        if infos.is_empty() {
            infos.push(LicenseInfo::not_found());
        }

        Ok(PackageLicense {
            package: package.import_path.clone(),
            infos,
            error: None,
        })
    }

    fn match_file(&mut self, path: &Path) -> Result<MatchResult<'c>, BomError> {
        if let Some(cached) = self.cache.get(path) {
            trace!(path = %path.display(), "license match cache hit");
            return Ok(cached.clone());
        }

        let data = fs::read(path).map_err(|source| BomError::LicenseFile {
            path: path.to_path_buf(),
            source,
        })?;
        let result = match_templates(&data, self.corpus);
        debug!(
            path = %path.display(),
            template = result.template.map(|t| t.title.as_str()).unwrap_or(""),
            score = result.score,
            "scored license file"
        );
        self.cache.insert(path.to_path_buf(), result.clone());
        Ok(result)
    }
}

/// Longest common prefix of `/`-separated import paths, by whole segments.
///
/// `["a/b/c", "a/b/c/d"]` gives `"a/b/c"`; paths with nothing in common give
/// an empty string.
pub fn longest_common_prefix(packages: &[&str]) -> String {
    #[derive(Default)]
    struct Node<'a> {
        children: BTreeMap<&'a str, usize>,
        shared: usize,
    }

    let mut nodes = vec![Node {
        shared: packages.len(),
        ..Node::default()
    }];
    for package in packages {
        let mut n = 0;
        for part in package.split('/') {
            let existing = nodes[n].children.get(part).copied();
            let child = match existing {
                Some(child) => child,
                None => {
                    nodes.push(Node::default());
                    let child = nodes.len() - 1;
                    nodes[n].children.insert(part, child);
                    child
                }
            };
            nodes[child].shared += 1;
            n = child;
        }
    }

    let mut prefix = Vec::new();
    let mut n = 0;
    loop {
        let mut children = nodes[n].children.iter();
        let (Some((&name, &child)), None) = (children.next(), children.next()) else {
            break;
        };
        if nodes[child].shared != packages.len() {
            break;
        }
        prefix.push(name);
        n = child;
    }
    prefix.join("/")
}

/// Merge packages that point at the same license file into one entry.
///
/// The merged entry takes the longest common import path prefix of its
/// packages as name and the first package's findings. Entries without a
/// license file pass through untouched.
pub fn group_licenses(licenses: Vec<PackageLicense<'_>>) -> Result<Vec<PackageLicense<'_>>, BomError> {
    let mut by_path: BTreeMap<&Path, Vec<usize>> = BTreeMap::new();
    for (i, license) in licenses.iter().enumerate() {
        for info in &license.infos {
            if let Some(path) = &info.path {
                by_path.entry(path.as_path()).or_default().push(i);
            }
        }
    }

    // License path -> (representative entry, project name)
    let mut groups: HashMap<&Path, (usize, String)> = HashMap::new();
    for (&path, members) in &by_path {
        let first = members[0];
        if members.len() == 1 {
            groups.insert(path, (first, licenses[first].package.clone()));
            continue;
        }
        let names: Vec<&str> = members.iter().map(|&i| licenses[i].package.as_str()).collect();
        let prefix = longest_common_prefix(&names);
        if prefix.is_empty() {
            return Err(BomError::GroupingConflict {
                license: path.to_path_buf(),
                packages: names.iter().map(|s| s.to_string()).collect(),
            });
        }
        debug!(project = %prefix, packages = names.len(), license = %path.display(), "grouped packages");
        groups.insert(path, (first, prefix));
    }

    let mut kept = Vec::new();
    let mut seen = HashSet::new();
    for license in &licenses {
        if license.infos.is_empty() {
            kept.push(license.clone());
            continue;
        }
        for info in &license.infos {
            let Some(path) = &info.path else {
                kept.push(license.clone());
                continue;
            };
            if let Some((first, project)) = groups.get(path.as_path()) {
                if seen.insert(project.clone()) {
                    let mut merged = licenses[*first].clone();
                    merged.package = project.clone();
                    kept.push(merged);
                }
            }
        }
    }
    Ok(kept)
}

/// Split grouped findings into confident attributions and entries needing
/// attention (build errors and packages with no recognizable license).
pub fn attributions(
    licenses: &[PackageLicense<'_>],
) -> (Vec<ProjectAttribution>, Vec<ProjectAttribution>) {
    let mut confident = Vec::new();
    let mut errors = Vec::new();

    for license in licenses {
        let project = remove_vendor(&license.package).to_string();
        if let Some(err) = &license.error {
            errors.push(ProjectAttribution::failed(project, err.clone()));
            continue;
        }
        if license.infos.iter().all(|i| i.result.template.is_none()) {
            errors.push(ProjectAttribution::failed(project, NO_LICENSE_DETECTED));
            continue;
        }

        let entries = license
            .infos
            .iter()
            .filter_map(|info| {
                let template = info.result.template.filter(|t| !t.title.is_empty())?;
                Some(LicenseEntry {
                    name: template.title.clone(),
                    confidence: truncate_confidence(info.result.score),
                })
            })
            .collect();
        confident.push(ProjectAttribution {
            project,
            licenses: entries,
            error: None,
        });
    }

    (confident, errors)
}

/// Strip everything up to and including the first `/vendor/` segment.
pub fn remove_vendor(package: &str) -> &str {
    const VENDOR: &str = "/vendor/";
    match package.find(VENDOR) {
        Some(i) => &package[i + VENDOR.len()..],
        None => package,
    }
}

/// Truncate a score to three decimals for presentation, so only an exact
/// match (or an override) shows as `1.0`.
pub fn truncate_confidence(score: f64) -> f64 {
    (score * 1000.0).trunc() / 1000.0
}
