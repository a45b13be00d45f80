use tracing::debug;

use crate::error::BomError;
use crate::license::words::{Tokenizer, WordSet};

/// Template documents compiled into the binary, in corpus order.
///
/// Each document carries a front matter block between `---` lines followed
/// by the license body. Order matters: on equal scores the earlier template
/// wins.
pub(crate) const EMBEDDED: &[&str] = &[
    include_str!("../../templates/0bsd.txt"),
    include_str!("../../templates/agpl-3.0.txt"),
    include_str!("../../templates/apache-2.0.txt"),
    include_str!("../../templates/bsd-2-clause.txt"),
    include_str!("../../templates/bsd-3-clause.txt"),
    include_str!("../../templates/bsl-1.0.txt"),
    include_str!("../../templates/epl-1.0.txt"),
    include_str!("../../templates/gpl-2.0.txt"),
    include_str!("../../templates/gpl-3.0.txt"),
    include_str!("../../templates/isc.txt"),
    include_str!("../../templates/lgpl-2.1.txt"),
    include_str!("../../templates/lgpl-3.0.txt"),
    include_str!("../../templates/mit.txt"),
    include_str!("../../templates/mpl-2.0.txt"),
    include_str!("../../templates/unlicense.txt"),
    include_str!("../../templates/wtfpl.txt"),
    include_str!("../../templates/zlib.txt"),
];

/// A known license text, reduced to its vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub title: String,
    pub nickname: String,
    pub words: WordSet,
}

/// The set of templates every license file is scored against, together with
/// the tokenizer used to build their word sets.
#[derive(Debug, Clone)]
pub struct Corpus {
    templates: Vec<Template>,
    tokenizer: Tokenizer,
}

impl Corpus {
    /// Load the templates shipped with the binary.
    pub fn embedded() -> Result<Self, BomError> {
        Self::from_documents(EMBEDDED.iter().copied())
    }

    /// Parse every document; the first one that cannot be scanned fails the load.
    pub fn from_documents<'a, I>(documents: I) -> Result<Self, BomError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let tokenizer = Tokenizer::new()?;
        let templates = documents
            .into_iter()
            .enumerate()
            .map(|(index, doc)| {
                parse_template(&tokenizer, doc)
                    .map_err(|reason| BomError::Corpus { index, reason })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(templates = templates.len(), "loaded license corpus");
        Ok(Self { templates, tokenizer })
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }
}

/// Front matter parsing state.
#[derive(Debug, PartialEq)]
enum Section {
    Preamble,
    FrontMatter,
    Body,
}

fn parse_template(tokenizer: &Tokenizer, content: &str) -> Result<Template, String> {
    let mut title = String::new();
    let mut nickname = String::new();
    let mut body = String::new();
    let mut section = Section::Preamble;

    for raw in content.lines() {
        let line = raw.trim();
        match section {
            Section::Preamble => {
                if line == "---" {
                    section = Section::FrontMatter;
                }
            }
            Section::FrontMatter => {
                if line == "---" {
                    section = Section::Body;
                } else if let Some(value) = line.strip_prefix("title:") {
                    title = value.trim().to_string();
                } else if let Some(value) = line.strip_prefix("nickname:") {
                    nickname = value.trim().to_string();
                }
            }
            Section::Body => {
                body.push_str(raw);
                body.push('\n');
            }
        }
    }

    match section {
        Section::Body => Ok(Template {
            title,
            nickname,
            words: tokenizer.word_set(body.as_bytes()),
        }),
        Section::Preamble => Err("missing front matter".to_string()),
        Section::FrontMatter => Err("unterminated front matter".to_string()),
    }
}
