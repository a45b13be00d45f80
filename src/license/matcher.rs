use crate::license::template::{Corpus, Template};

/// Best template match for one license text.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult<'c> {
    /// `None` when no file was found, when nothing overlapped, or when the
    /// corpus is empty.
    pub template: Option<&'c Template>,
    /// Dice coefficient in `[0, 1]`, or [`NO_TEMPLATES`] for an empty corpus.
    pub score: f64,
    /// Sample words absent from the template, in sample order.
    pub extra_words: Vec<String>,
    /// Template words absent from the sample, in template order.
    pub missing_words: Vec<String>,
}

/// Score reported when there was no template to evaluate at all.
pub const NO_TEMPLATES: f64 = -1.0;

impl MatchResult<'_> {
    /// Result for a package where no license file was located.
    pub fn no_file() -> Self {
        Self {
            template: None,
            score: 0.0,
            extra_words: Vec::new(),
            missing_words: Vec::new(),
        }
    }
}

/// Return the template whose vocabulary best matches `license`.
///
/// Scores are `2 * common / (|sample| + |template|)`. The first template with
/// the strictly highest score wins, so corpus order decides ties. A best
/// score of zero means nothing matched and no template is reported.
pub fn match_templates<'c>(license: &[u8], corpus: &'c Corpus) -> MatchResult<'c> {
    let words = corpus.tokenizer().word_set(license);

    let mut best: Option<(&Template, f64)> = None;
    for template in corpus.templates() {
        let total = words.len() + template.words.len();
        let score = if total == 0 {
            0.0
        } else {
            2.0 * words.common(&template.words) as f64 / total as f64
        };
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((template, score));
        }
    }

    match best {
        None => MatchResult {
            score: NO_TEMPLATES,
            ..MatchResult::no_file()
        },
        Some((_, score)) if score <= 0.0 => MatchResult::no_file(),
        Some((template, score)) => MatchResult {
            template: Some(template),
            score,
            extra_words: words.difference(&template.words),
            missing_words: template.words.difference(&words),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{corpus, words};

    fn body(doc: &str) -> &str {
        doc.splitn(3, "---\n").nth(2).unwrap()
    }

    #[test]
    fn test_self_similarity_is_exact() {
        let corpus = Corpus::embedded().unwrap();
        for (doc, template) in crate::license::template::EMBEDDED.iter().zip(corpus.templates()) {
            let m = match_templates(body(doc).as_bytes(), &corpus);
            assert_eq!(m.template.unwrap().title, template.title);
            assert_eq!(m.score, 1.0);
            assert!(m.extra_words.is_empty());
            assert!(m.missing_words.is_empty());
        }
    }

    #[test]
    fn test_mit_with_real_copyright_line() {
        let corpus = Corpus::embedded().unwrap();
        let mit = body(include_str!("../../templates/mit.txt"))
            .replace("[year] [fullname]", "2016 Jane Doe");
        let m = match_templates(mit.as_bytes(), &corpus);
        assert_eq!(m.template.unwrap().title, "MIT License");
        assert_eq!(m.score, 1.0);
    }

    fn assert_own_template(text: &str, title: &str) {
        let corpus = Corpus::embedded().unwrap();
        let m = match_templates(text.as_bytes(), &corpus);
        assert_eq!(m.template.unwrap().title, title);
        assert!(m.score >= 0.9, "{} scored {}", title, m.score);
    }

    #[test]
    fn test_gpl3_without_appendix() {
        let gpl = body(include_str!("../../templates/gpl-3.0.txt"));
        let terms = gpl.split("How to Apply These Terms").next().unwrap();
        assert_own_template(terms, "GNU General Public License v3.0");
    }

    #[test]
    fn test_lgpl21_with_project_header() {
        let text = format!(
            "Copyright (C) 2015 The Colors Authors\nThis library is part of colors.\n\n{}",
            body(include_str!("../../templates/lgpl-2.1.txt"))
        );
        assert_own_template(&text, "GNU Lesser General Public License v2.1");
    }

    #[test]
    fn test_mpl2_with_project_header() {
        let text = format!(
            "This Source Code Form is subject to the terms of the Mozilla Public License.\n\n{}",
            body(include_str!("../../templates/mpl-2.0.txt"))
        );
        assert_own_template(&text, "Mozilla Public License 2.0");
    }

    #[test]
    fn test_disjoint_vocabulary_scores_zero() {
        let corpus = corpus(&[("Alpha", words("a", 10).as_str())]);
        let m = match_templates(words("z", 5).as_bytes(), &corpus);
        assert_eq!(m.score, 0.0);
        assert!(m.template.is_none());
        assert!(m.extra_words.is_empty());
        assert!(m.missing_words.is_empty());
    }

    #[test]
    fn test_empty_corpus_returns_sentinel() {
        let corpus = corpus(&[]);
        let m = match_templates(b"some license text", &corpus);
        assert_eq!(m.score, NO_TEMPLATES);
        assert!(m.template.is_none());
        assert!(m.extra_words.is_empty());
        assert!(m.missing_words.is_empty());
    }

    #[test]
    fn test_two_missing_words() {
        // 49 of 51 template words: 2 * 49 / (49 + 51)
        let corpus = corpus(&[("MIT License", words("w", 51).as_str())]);
        let sample = words("w", 49);
        let m = match_templates(sample.as_bytes(), &corpus);
        assert_eq!(m.template.unwrap().title, "MIT License");
        assert_eq!(m.score, 0.98);
        assert_eq!(m.missing_words, vec!["w49", "w50"]);
        assert!(m.extra_words.is_empty());
    }

    #[test]
    fn test_diagnostics_follow_document_order() {
        let corpus = corpus(&[("T", "one two three four five")]);
        let m = match_templates(b"zulu two yankee four xray", &corpus);
        assert_eq!(m.extra_words, vec!["zulu", "yankee", "xray"]);
        assert_eq!(m.missing_words, vec!["one", "three", "five"]);
        for w in &m.extra_words {
            assert!(!m.template.unwrap().words.contains(w));
        }
    }

    #[test]
    fn test_first_template_wins_ties() {
        let corpus = corpus(&[("First", "red green blue"), ("Second", "blue green red")]);
        let m = match_templates(b"red green blue", &corpus);
        assert_eq!(m.template.unwrap().title, "First");
    }

    #[test]
    fn test_best_template_selected() {
        let corpus = corpus(&[("Short", "red"), ("Long", "red green blue yellow")]);
        let m = match_templates(b"red green blue", &corpus);
        assert_eq!(m.template.unwrap().title, "Long");
        assert_eq!(m.missing_words, vec!["yellow"]);
    }
}
