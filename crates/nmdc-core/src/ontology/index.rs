//! FST-backed label and alias index.
//!
//! Keys are folded strings (see [`fold`]); each key points at a posting that
//! records which terms carry the string as a label and which as an alias.
//! Labels count as aliases too, so `ExactAlias` is a superset of `ExactLabel`.

use crate::error::{OntologyError, Result};
use crate::types::{MatchMode, TermId};
use fst::automaton::Subsequence;
use fst::{IntoStreamer, Streamer};
use std::collections::{BTreeMap, BTreeSet};

/// Case-fold and collapse internal whitespace. Both index keys and queries go
/// through this, so `"  Terrestrial   Biome "` matches `"terrestrial biome"`.
pub fn fold(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Default, Clone)]
struct Posting {
    labels: BTreeSet<TermId>,
    aliases: BTreeSet<TermId>,
}

#[derive(Debug)]
pub struct TermIndex {
    map: fst::Map<Vec<u8>>,
    postings: Vec<Posting>,
}

impl TermIndex {
    /// Build from `(term, label, synonyms)` triples.
    pub fn build<'a, I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a TermId, Option<&'a str>, &'a [String])>,
    {
        let mut keyed: BTreeMap<String, Posting> = BTreeMap::new();
        for (id, label, synonyms) in entries {
            if let Some(label) = label {
                let key = fold(label);
                if !key.is_empty() {
                    let posting = keyed.entry(key).or_default();
                    posting.labels.insert(id.clone());
                    posting.aliases.insert(id.clone());
                }
            }
            for synonym in synonyms {
                let key = fold(synonym);
                if !key.is_empty() {
                    keyed.entry(key).or_default().aliases.insert(id.clone());
                }
            }
        }

        let (keys, postings): (Vec<String>, Vec<Posting>) = keyed.into_iter().unzip();
        let map = fst::Map::from_iter(
            keys.iter()
                .enumerate()
                .map(|(i, key)| (key.as_bytes(), i as u64)),
        )
        .map_err(|e| OntologyError::init("term index", e))?;

        Ok(Self { map, postings })
    }

    /// Number of distinct folded strings.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn search(&self, text: &str, mode: MatchMode) -> BTreeSet<TermId> {
        let needle = fold(text);
        if needle.is_empty() {
            return BTreeSet::new();
        }
        match mode {
            MatchMode::ExactLabel => self
                .posting(&needle)
                .map(|p| p.labels.clone())
                .unwrap_or_default(),
            MatchMode::ExactAlias => self
                .posting(&needle)
                .map(|p| p.aliases.clone())
                .unwrap_or_default(),
            MatchMode::PartialAlias => self.partial(&needle),
        }
    }

    fn posting(&self, key: &str) -> Option<&Posting> {
        self.map
            .get(key)
            .and_then(|i| self.postings.get(i as usize))
    }

    // The subsequence automaton prunes the walk to keys that contain the
    // needle's characters in order; the substring check then makes it exact.
    fn partial(&self, needle: &str) -> BTreeSet<TermId> {
        let mut out = BTreeSet::new();
        let mut stream = self.map.search(Subsequence::new(needle)).into_stream();
        while let Some((key, i)) = stream.next() {
            if !contains(key, needle.as_bytes()) {
                continue;
            }
            if let Some(posting) = self.postings.get(i as usize) {
                out.extend(posting.aliases.iter().cloned());
            }
        }
        out
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.len() <= haystack.len() && haystack.windows(needle.len()).any(|w| w == needle)
}
