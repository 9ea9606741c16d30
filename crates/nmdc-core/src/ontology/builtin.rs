//! Bundled ENVO biome slice, compiled in with `phf`.
//!
//! A small subset of the ENVO biome hierarchy so the service can answer
//! common environment terms without an ontology file on disk. For full
//! coverage point the `ontology.selector` setting at an `envo.obo` release.

use super::memory::MemoryOntology;
use crate::error::{OntologyError, Result};
use crate::types::{Relation, TermId};
use phf::phf_map;

pub const ENVO: &str = "envo";

pub struct SliceTerm {
    pub label: &'static str,
    pub synonyms: &'static [&'static str],
    pub is_a: &'static [&'static str],
}

pub static ENVO_BIOMES: phf::Map<&'static str, SliceTerm> = phf_map! {
    "ENVO:00000428" => SliceTerm { label: "biome", synonyms: &["major habitat type"], is_a: &[] },
    "ENVO:01001790" => SliceTerm { label: "terrestrial ecosystem", synonyms: &["terrestrial"], is_a: &["ENVO:00000428"] },
    "ENVO:00000446" => SliceTerm { label: "terrestrial biome", synonyms: &[], is_a: &["ENVO:00000428"] },
    "ENVO:00002030" => SliceTerm { label: "aquatic biome", synonyms: &["aquatic"], is_a: &["ENVO:00000428"] },
    "ENVO:00000447" => SliceTerm { label: "marine biome", synonyms: &["marine", "ocean biome"], is_a: &["ENVO:00002030"] },
    "ENVO:00000873" => SliceTerm { label: "freshwater biome", synonyms: &["freshwater"], is_a: &["ENVO:00002030"] },
    "ENVO:01000252" => SliceTerm { label: "freshwater lake biome", synonyms: &["lake biome"], is_a: &["ENVO:00000873"] },
    "ENVO:01000253" => SliceTerm { label: "freshwater river biome", synonyms: &["river biome"], is_a: &["ENVO:00000873"] },
    "ENVO:01000174" => SliceTerm { label: "forest biome", synonyms: &["forest"], is_a: &["ENVO:00000446"] },
    "ENVO:01000177" => SliceTerm { label: "grassland biome", synonyms: &["grassland"], is_a: &["ENVO:00000446"] },
    "ENVO:01000180" => SliceTerm { label: "tundra biome", synonyms: &["tundra"], is_a: &["ENVO:00000446"] },
    "ENVO:01000179" => SliceTerm { label: "desert biome", synonyms: &["desert"], is_a: &["ENVO:00000446"] },
    "ENVO:01000219" => SliceTerm { label: "anthropogenic terrestrial biome", synonyms: &[], is_a: &["ENVO:00000446"] },
    "ENVO:01000245" => SliceTerm { label: "cropland biome", synonyms: &["cropland", "agricultural biome"], is_a: &["ENVO:01000219"] },
    "ENVO:01000249" => SliceTerm { label: "urban biome", synonyms: &["urban"], is_a: &["ENVO:01000219"] },
    // Outside the biome subtree: shares text with biomes above.
    "ENVO:00000111" => SliceTerm { label: "forested area", synonyms: &["forest"], is_a: &[] },
    "ENVO:00000022" => SliceTerm { label: "river", synonyms: &[], is_a: &[] },
    "ENVO:00000020" => SliceTerm { label: "lake", synonyms: &[], is_a: &[] },
};

/// Build the named bundled ontology. Only [`ENVO`] is available.
pub fn load(name: &str) -> Result<MemoryOntology> {
    if name != ENVO {
        return Err(OntologyError::init(
            &format!("builtin:{name}"),
            format!("no bundled ontology named {name:?}"),
        ));
    }
    let mut builder = MemoryOntology::builder();
    for (id, term) in ENVO_BIOMES.entries() {
        let id = slice_id(id)?;
        builder = builder.term(id.clone(), term.label);
        for synonym in term.synonyms {
            builder = builder.synonym(&id, *synonym);
        }
        for parent in term.is_a {
            builder = builder.edge(id.clone(), Relation::IsA, slice_id(parent)?);
        }
    }
    builder.build()
}

fn slice_id(raw: &str) -> Result<TermId> {
    raw.parse()
        .map_err(|e| OntologyError::init("builtin:envo", e))
}
