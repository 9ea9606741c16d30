//! Ontology fixtures used across harnesses.
//!
//! `ECOSYSTEM_OBO` is a small ENVO-shaped hierarchy:
//!
//! ```text
//! biome (ENVO:00000428)
//! ├── terrestrial ecosystem   ENVO:10000001  syn: terrestrial
//! │   ├── forest ecosystem    ENVO:10000002  syn: woodland
//! │   └── soil ecosystem      ENVO:10000003  syn: soil
//! └── aquatic ecosystem       ENVO:10000004
//!     ├── marine ecosystem    ENVO:10000005  syn: sea water body
//!     └── lake ecosystem      ENVO:10000006  syn: lake
//! lake                        ENVO:20000001  (outside the biome subtree)
//! ```

use nmdc_core::OntologyAdapter;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub const ECOSYSTEM_OBO: &str = r#"format-version: 1.2
ontology: envo-fixture

[Term]
id: ENVO:00000428
name: biome
synonym: "major habitat type" EXACT []

[Term]
id: ENVO:10000001
name: terrestrial ecosystem
synonym: "terrestrial" EXACT []
is_a: ENVO:00000428 ! biome

[Term]
id: ENVO:10000002
name: forest ecosystem
synonym: "woodland" RELATED []
is_a: ENVO:10000001 ! terrestrial ecosystem

[Term]
id: ENVO:10000003
name: soil ecosystem
synonym: "soil" EXACT []
is_a: ENVO:10000001 ! terrestrial ecosystem

[Term]
id: ENVO:10000004
name: aquatic ecosystem
is_a: ENVO:00000428 ! biome

[Term]
id: ENVO:10000005
name: marine ecosystem
synonym: "sea water body" BROAD []
is_a: ENVO:10000004 ! aquatic ecosystem

[Term]
id: ENVO:10000006
name: lake ecosystem
synonym: "lake" EXACT []
is_a: ENVO:10000004 ! aquatic ecosystem

[Term]
id: ENVO:20000001
name: lake

[Term]
id: ENVO:29999999
name: obsolete tundra ecosystem
synonym: "tundra" EXACT []
is_a: ENVO:00000428
is_obsolete: true

[Typedef]
id: part_of
name: part of
"#;

/// Term ids of the fixture, by label.
pub mod ids {
    pub const BIOME: &str = "ENVO:00000428";
    pub const TERRESTRIAL: &str = "ENVO:10000001";
    pub const FOREST: &str = "ENVO:10000002";
    pub const SOIL: &str = "ENVO:10000003";
    pub const AQUATIC: &str = "ENVO:10000004";
    pub const MARINE: &str = "ENVO:10000005";
    pub const LAKE_ECOSYSTEM: &str = "ENVO:10000006";
    pub const LAKE: &str = "ENVO:20000001";
}

/// An OBO file on disk. The directory lives as long as the value.
pub struct OboFixture {
    _dir: TempDir,
    pub path: PathBuf,
}

impl OboFixture {
    pub fn write(contents: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("envo.obo");
        std::fs::write(&path, contents).expect("write OBO fixture");
        Self { _dir: dir, path }
    }

    pub fn ecosystem() -> Self {
        Self::write(ECOSYSTEM_OBO)
    }

    /// `obo:<path>` selector for this file.
    pub fn selector(&self) -> String {
        format!("obo:{}", self.path.display())
    }

    /// A lazily initialized adapter over this file.
    pub fn adapter(&self) -> Arc<OntologyAdapter> {
        Arc::new(OntologyAdapter::new(self.selector()))
    }
}
