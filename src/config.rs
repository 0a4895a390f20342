use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::{Acronym, DEFAULT_LANGUAGE, LODE_URL, LodeEndpoint, PrefixUrl};
use crate::error::LodeError;

pub const DEFAULT_SOURCE_MATERIAL_URL: &str = "../imports";
pub const DEFAULT_STRING_REPLACE: &str = r#"<object data="https?:[^"]+/([^/"]+)"-><object data="\1""#;

/// Ontologies to document, keyed by acronym, in insertion order. A later
/// insert of an existing key replaces its URL but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OntologyMap(IndexMap<Acronym, String>);

impl OntologyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, acronym: Acronym, url: impl Into<String>) -> Option<String> {
        self.0.insert(acronym, url.into())
    }

    /// Folds `other` into `self`; entries of `other` replace colliding keys.
    pub fn merge(&mut self, other: OntologyMap) {
        self.0.extend(other.0);
    }

    pub fn get(&self, acronym: &Acronym) -> Option<&str> {
        self.0.get(acronym).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Acronym, &str)> {
        self.0.iter().map(|(acronym, url)| (acronym, url.as_str()))
    }
}

impl From<PrefixUrl> for OntologyMap {
    fn from(pair: PrefixUrl) -> Self {
        let mut map = Self::new();
        map.insert(pair.acronym, pair.url);
        map
    }
}

impl FromIterator<(Acronym, String)> for OntologyMap {
    fn from_iter<I: IntoIterator<Item = (Acronym, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Builds the ontology map from the optional single pair, then the
    /// optional conf file. A conf file path that does not exist is skipped.
    pub fn resolve(
        prefix_url: Option<&str>,
        conf_file: Option<&Utf8Path>,
    ) -> Result<OntologyMap, LodeError> {
        let mut map = OntologyMap::new();
        if let Some(pair) = prefix_url {
            map.merge(pair.parse::<PrefixUrl>()?.into());
        }
        if let Some(path) = conf_file {
            if path.as_std_path().exists() {
                map.merge(Self::load(path)?);
            } else {
                tracing::warn!("config file {path} not found, skipping");
            }
        }
        Ok(map)
    }

    pub fn load(path: &Utf8Path) -> Result<OntologyMap, LodeError> {
        let content = fs::read_to_string(path.as_std_path())
            .map_err(|_| LodeError::ConfigRead(path.as_std_path().to_path_buf()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<OntologyMap, LodeError> {
        serde_json::from_str(content).map_err(|err| LodeError::ConfigParse(err.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub output_dir: Utf8PathBuf,
    pub language: String,
    pub lode_url: String,
    pub imported_url: Option<String>,
    pub string_replace: Option<String>,
    pub lode_function: Option<String>,
}

impl FetchConfig {
    pub fn new(output_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            language: DEFAULT_LANGUAGE.to_string(),
            lode_url: LODE_URL.to_string(),
            imported_url: None,
            string_replace: None,
            lode_function: None,
        }
    }

    pub fn endpoint(&self) -> LodeEndpoint {
        LodeEndpoint::new(
            &self.lode_url,
            &self.language,
            self.lode_function.as_deref(),
        )
    }
}
