//! License text recognition.
//!
//! - [`words`]: normalizes raw license text into a position-annotated word set.
//! - [`template`]: the embedded corpus of known license templates.
//! - [`matcher`]: scores a license file against the corpus and reports the
//!   best template with its extra and missing words.

pub mod matcher;
pub mod template;
pub mod words;
