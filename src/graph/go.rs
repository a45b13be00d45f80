use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;
use tracing::debug;

use super::{BuildGraph, Closure, GraphError};
use crate::models::Package;

/// `go list -json` output, reduced to the fields we need.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoPackage {
    import_path: String,
    #[serde(default)]
    dir: Option<PathBuf>,
    /// GOPATH entry holding the package.
    #[serde(default)]
    root: Option<PathBuf>,
    #[serde(default)]
    module: Option<GoModule>,
    #[serde(default)]
    error: Option<GoPackageError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoModule {
    #[serde(default)]
    dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoPackageError {
    err: String,
}

impl GoPackage {
    fn into_package(self) -> Package {
        // Module packages search up to and including the module directory,
        // GOPATH packages up to `$GOPATH/src`.
        let (root, dir) = match self.module.and_then(|m| m.dir) {
            Some(module_dir) => {
                let root = module_dir
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| module_dir.clone());
                (root, self.dir.unwrap_or(module_dir))
            }
            None => {
                let src = self.root.unwrap_or_default().join("src");
                let dir = self.dir.unwrap_or_else(|| src.join(&self.import_path));
                (src, dir)
            }
        };

        Package {
            import_path: self.import_path,
            dir,
            root,
            error: self.error.map(|e| e.err),
        }
    }
}

/// Queries the Go toolchain for dependency closures.
pub struct GoList {
    go: String,
    gopath: Option<PathBuf>,
}

impl GoList {
    /// `gopath`, when set, replaces the inherited `GOPATH` for every call.
    pub fn new(go: impl Into<String>, gopath: Option<PathBuf>) -> Self {
        Self {
            go: go.into(),
            gopath,
        }
    }

    fn run(&self, args: &[&str]) -> Result<Vec<u8>, GraphError> {
        let command = format!("{} {}", self.go, args.join(" "));
        debug!(%command, "querying build graph");

        let mut cmd = Command::new(&self.go);
        cmd.args(args);
        if let Some(gopath) = &self.gopath {
            cmd.env("GOPATH", gopath);
        }
        let output = cmd.output().map_err(|source| GraphError::Spawn {
            command: command.clone(),
            source,
        })?;

        if !output.status.success() {
            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(classify_failure(command, text));
        }
        Ok(output.stdout)
    }

    /// Expand package patterns such as `./...` into import paths.
    fn expand(&self, patterns: &[String]) -> Result<Vec<String>, GraphError> {
        let mut args = vec!["list"];
        args.extend(patterns.iter().map(String::as_str));
        Ok(parse_lines(&self.run(&args)?))
    }

    fn dependencies(&self, roots: &[String]) -> Result<Vec<String>, GraphError> {
        let mut args = vec!["list", "-f", "{{range .Deps}}{{.}}|{{end}}"];
        args.extend(roots.iter().map(String::as_str));
        Ok(parse_deps(&self.run(&args)?, roots))
    }

    fn standard_packages(&self) -> Result<HashSet<String>, GraphError> {
        Ok(parse_lines(&self.run(&["list", "std", "cmd"])?)
            .into_iter()
            .collect())
    }

    fn packages_info(&self, import_paths: &[String]) -> Result<Vec<Package>, GraphError> {
        let mut args = vec!["list", "-e", "-json"];
        args.extend(import_paths.iter().map(String::as_str));
        decode_packages(&self.run(&args)?, import_paths)
    }
}

impl BuildGraph for GoList {
    fn closure(&self, roots: &[String]) -> Result<Closure, GraphError> {
        let roots = self.expand(roots)?;
        let deps = self.dependencies(&roots)?;
        let standard = self.standard_packages()?;
        let packages = self.packages_info(&deps)?;
        debug!(packages = packages.len(), standard = standard.len(), "resolved closure");
        Ok(Closure { packages, standard })
    }
}

fn classify_failure(command: String, output: String) -> GraphError {
    if output.contains("cannot find package") || output.contains("no buildable Go source files") {
        GraphError::Missing(output)
    } else {
        GraphError::Failed { command, output }
    }
}

fn parse_lines(out: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(out)
        .lines()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split the `|`-joined dependency listing, add the roots themselves and
/// return the sorted, deduplicated set.
fn parse_deps(out: &[u8], roots: &[String]) -> Vec<String> {
    let text = String::from_utf8_lossy(out);
    let mut seen = HashSet::new();
    let mut deps: Vec<String> = text
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .chain(roots.iter().map(String::as_str))
        .filter(|s| seen.insert(s.to_string()))
        .map(str::to_string)
        .collect();
    deps.sort();
    deps
}

/// Decode the concatenated JSON objects printed by `go list -json`, one per
/// requested package and in request order.
fn decode_packages(out: &[u8], requested: &[String]) -> Result<Vec<Package>, GraphError> {
    let mut stream = serde_json::Deserializer::from_slice(out).into_iter::<GoPackage>();
    let mut packages = Vec::with_capacity(requested.len());
    for asked in requested {
        let info = match stream.next() {
            Some(Ok(info)) => info,
            _ => return Err(GraphError::Decode(asked.clone())),
        };
        if &info.import_path != asked {
            return Err(GraphError::Mismatch {
                asked: asked.clone(),
                got: info.import_path,
            });
        }
        packages.push(info.into_package());
    }
    Ok(packages)
}
