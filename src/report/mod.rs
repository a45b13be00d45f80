//! Human-readable report rendering. JSON output is written directly by `main`.
//!
//! - [`terminal`]: colored summary and tables; respects `--verbose` / `--quiet`.

pub mod terminal;
