use std::path::{Path, PathBuf};

use super::{KnowledgeDocument, KnowledgeSource};
use crate::error::{Error, Result};

const BUILTIN_JSON: &str = include_str!("../../data/renewables.json");

/// Renewable-energy activity pages (tidal, biomass, geothermal) compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSource;

impl KnowledgeSource for BuiltinSource {
    fn name(&self) -> &str {
        "builtin:renewables"
    }

    fn load(&self) -> Result<KnowledgeDocument> {
        KnowledgeDocument::from_json_str(BUILTIN_JSON)
    }
}

/// JSON document on disk: `{ "topics": [ { "key", "title", "entries": [ { "question", "answer" } ] } ] }`.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    name: String,
}

impl JsonFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = format!("file:{}", path.display());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KnowledgeSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<KnowledgeDocument> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })?;
        KnowledgeDocument::from_json_str(&raw)
    }
}
