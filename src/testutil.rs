//! Synthetic corpora and package trees for unit tests.

use std::fs;
use std::path::Path;

use crate::license::template::Corpus;
use crate::models::Package;

/// Build a corpus from `(title, body)` pairs, in order.
pub fn corpus(entries: &[(&str, &str)]) -> Corpus {
    let docs: Vec<String> = entries
        .iter()
        .map(|(title, body)| format!("---\ntitle: {}\n---\n{}\n", title, body))
        .collect();
    Corpus::from_documents(docs.iter().map(String::as_str)).unwrap()
}

/// `n` distinct words `<prefix>0 .. <prefix>{n-1}`, space separated.
pub fn words(prefix: &str, n: usize) -> String {
    (0..n)
        .map(|i| format!("{}{}", prefix, i))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Write `content` at `root/src/<rel>`, creating parent directories.
pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join("src").join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A GOPATH-style package rooted at `root/src/<import_path>`.
pub fn package(root: &Path, import_path: &str) -> Package {
    let src = root.join("src");
    let dir = src.join(import_path);
    fs::create_dir_all(&dir).unwrap();
    Package {
        import_path: import_path.to_string(),
        dir,
        root: src,
        error: None,
    }
}
