//! OBO 1.4 flat-file loader.
//!
//! Only `[Term]` stanzas are read. Within a stanza the loader understands
//! `id`, `name`, `synonym` (any scope), `is_a`, `relationship` (for relations
//! listed in [`Relation::from_obo_name`]) and `is_obsolete`. Obsolete terms
//! are dropped entirely. Header tags and other stanza types are skipped.

use super::memory::{MemoryOntology, MemoryOntologyBuilder};
use crate::error::{OntologyError, Result};
use crate::types::{Relation, TermId};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static SYNONYM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^"((?:[^"\\]|\\.)*)"\s+(EXACT|BROAD|NARROW|RELATED)\b"#)
        .expect("synonym pattern must compile")
});

/// Read and parse an OBO file.
pub fn load(path: &Path) -> Result<MemoryOntology> {
    let source = std::fs::read_to_string(path).map_err(|e| {
        OntologyError::init(&path.display().to_string(), format!("cannot read: {e}"))
    })?;
    let ontology = parse(&source)?;
    tracing::debug!(path = %path.display(), terms = ontology.len(), "loaded OBO ontology");
    Ok(ontology)
}

pub fn parse(source: &str) -> Result<MemoryOntology> {
    let mut builder = MemoryOntology::builder();
    let mut current: Option<Stanza> = None;

    for (i, raw) in source.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('!') {
            continue;
        }

        if line.starts_with('[') {
            if let Some(stanza) = current.take() {
                builder = stanza.commit(builder)?;
            }
            if line == "[Term]" {
                current = Some(Stanza::new(line_no));
            }
            continue;
        }

        // Header tags and non-Term stanzas.
        let Some(stanza) = current.as_mut() else {
            continue;
        };

        let (tag, value) = line.split_once(':').ok_or_else(|| OntologyError::Parse {
            line: line_no,
            message: format!("expected `tag: value`, got {line:?}"),
        })?;
        let value = value.trim();

        match tag.trim() {
            "id" => stanza.id = Some(parse_id(value, line_no)?),
            "name" => stanza.label = Some(value.to_string()),
            "synonym" => {
                let caps = SYNONYM.captures(value).ok_or_else(|| OntologyError::Parse {
                    line: line_no,
                    message: format!("malformed synonym {value:?}"),
                })?;
                stanza.synonyms.push(unescape(&caps[1]));
            }
            "is_a" => {
                let target = first_token(value).unwrap_or_default();
                stanza.parents.push((Relation::IsA, parse_id(target, line_no)?));
            }
            "relationship" => {
                let mut parts = strip_comment(value).split_whitespace();
                if let (Some(name), Some(target)) = (parts.next(), parts.next()) {
                    if let Some(relation) = Relation::from_obo_name(name) {
                        stanza.parents.push((relation, parse_id(target, line_no)?));
                    }
                }
            }
            "is_obsolete" => stanza.obsolete = value == "true",
            _ => {}
        }
    }

    if let Some(stanza) = current.take() {
        builder = stanza.commit(builder)?;
    }
    builder.build()
}

struct Stanza {
    line: usize,
    id: Option<TermId>,
    label: Option<String>,
    synonyms: Vec<String>,
    parents: Vec<(Relation, TermId)>,
    obsolete: bool,
}

impl Stanza {
    fn new(line: usize) -> Self {
        Self {
            line,
            id: None,
            label: None,
            synonyms: Vec::new(),
            parents: Vec::new(),
            obsolete: false,
        }
    }

    fn commit(self, mut builder: MemoryOntologyBuilder) -> Result<MemoryOntologyBuilder> {
        let id = self.id.ok_or_else(|| OntologyError::Parse {
            line: self.line,
            message: "[Term] stanza has no id".to_string(),
        })?;
        if self.obsolete {
            return Ok(builder);
        }
        if let Some(label) = self.label {
            builder = builder.term(id.clone(), label);
        }
        for synonym in self.synonyms {
            builder = builder.synonym(&id, synonym);
        }
        for (relation, parent) in self.parents {
            builder = builder.edge(id.clone(), relation, parent);
        }
        Ok(builder)
    }
}

fn parse_id(value: &str, line: usize) -> Result<TermId> {
    value.parse().map_err(|e| OntologyError::Parse {
        line,
        message: format!("{e}"),
    })
}

fn strip_comment(value: &str) -> &str {
    value.split_once(" !").map(|(v, _)| v).unwrap_or(value).trim()
}

fn first_token(value: &str) -> Option<&str> {
    strip_comment(value).split_whitespace().next()
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
