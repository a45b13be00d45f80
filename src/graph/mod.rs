//! Build-graph collaborators: produce the dependency closure whose licenses
//! are attributed.
//!
//! [`BuildGraph`] is the seam; [`go::GoList`] implements it with the Go
//! toolchain.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::Package;

pub mod go;

/// Packages of a dependency closure, plus the import paths belonging to the
/// standard distribution (excluded from attribution).
#[derive(Debug, Clone, Default)]
pub struct Closure {
    pub packages: Vec<Package>,
    pub standard: HashSet<String>,
}

pub trait BuildGraph {
    /// Resolve `roots` (package names or patterns) into their full closure.
    fn closure(&self, roots: &[String]) -> Result<Closure, GraphError>;
}

#[derive(Debug, Error)]
pub enum GraphError {
    /// A requested package does not exist or has nothing to build.
    #[error("{0}")]
    Missing(String),

    #[error("'{command}' failed with:\n{output}")]
    Failed { command: String, output: String },

    #[error("could not run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not retrieve package information for {0}")]
    Decode(String),

    #[error("package information mismatch: asked for {asked}, got {got}")]
    Mismatch { asked: String, got: String },
}
