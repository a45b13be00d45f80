use std::collections::HashMap;

use regex::Regex;

/// Set of normalized words from a license text, each mapped to the index of
/// its first occurrence in the token sequence.
///
/// Keeping the first position lets diagnostics list words in reading order,
/// which tends to surface header and footer text first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordSet {
    positions: HashMap<String, usize>,
}

impl WordSet {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.positions.contains_key(word)
    }

    #[cfg(test)]
    pub fn position(&self, word: &str) -> Option<usize> {
        self.positions.get(word).copied()
    }

    /// Number of words of `self` also present in `other`.
    pub fn common(&self, other: &WordSet) -> usize {
        self.positions.keys().filter(|w| other.contains(w)).count()
    }

    /// Words of `self` absent from `other`, ordered by their position in `self`.
    pub fn difference(&self, other: &WordSet) -> Vec<String> {
        let mut words: Vec<(&str, usize)> = self
            .positions
            .iter()
            .filter(|(w, _)| !other.contains(w))
            .map(|(w, &pos)| (w.as_str(), pos))
            .collect();
        words.sort_by_key(|&(_, pos)| pos);
        words.into_iter().map(|(w, _)| w.to_string()).collect()
    }

    fn insert_first(&mut self, word: &str, pos: usize) {
        if !self.positions.contains_key(word) {
            self.positions.insert(word.to_string(), pos);
        }
    }
}

/// Turns raw license text into a [`WordSet`].
///
/// The same tokenizer is applied to template bodies and to license files
/// found on disk, so both sides of a comparison see identical normalization.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    words: Regex,
    copyright: Regex,
}

impl Tokenizer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            words: Regex::new(r"[A-Za-z0-9_']+")?,
            // Leading whitespace is swallowed too, so the notice line disappears
            // together with the blank lines before it.
            copyright: Regex::new(r"(?i)\s*copyright (?:©|\(c\))?\s*(?:\d{4}|\[year\]).*")?,
        })
    }

    /// Lower-case the text and drop copyright notices, so holders and years
    /// never influence similarity.
    pub fn clean(&self, text: &str) -> String {
        let lower = text.to_lowercase();
        self.copyright.replace_all(&lower, "").into_owned()
    }

    /// Build the word set of `data`. Invalid UTF-8 is replaced, not rejected.
    pub fn word_set(&self, data: &[u8]) -> WordSet {
        let cleaned = self.clean(&String::from_utf8_lossy(data));
        let mut set = WordSet::default();
        for (i, m) in self.words.find_iter(&cleaned).enumerate() {
            set.insert_first(m.as_str(), i);
        }
        set
    }
}
