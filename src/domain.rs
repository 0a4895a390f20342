use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LodeError;

pub const LODE_URL: &str = "https://w3id.org/lode";
pub const REAL_LODE_URL: &str = "http://150.146.207.114/lode";
pub const LEGACY_LODE_URL: &str = "http://www.essepuntato.it/lode";
pub const DEFAULT_FUNCTION: &str = "owlapi";
pub const DEFAULT_LANGUAGE: &str = "en";

/// Local name of an ontology. Doubles as the stem of its output file, so it
/// must be a single path component.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Acronym(String);

impl Acronym {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn file_name(&self) -> String {
        format!("{}.html", self.0)
    }
}

impl fmt::Display for Acronym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Acronym {
    type Err = LodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let is_valid = !value.is_empty()
            && value != "."
            && value != ".."
            && !value.contains(['/', '\\', '\0']);
        if !is_valid {
            return Err(LodeError::InvalidAcronym(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }
}

impl TryFrom<String> for Acronym {
    type Error = LodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Acronym> for String {
    fn from(value: Acronym) -> Self {
        value.0
    }
}

/// A single `acronym:url` pair as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixUrl {
    pub acronym: Acronym,
    pub url: String,
}

impl FromStr for PrefixUrl {
    type Err = LodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (acronym, url) = value
            .split_once(':')
            .ok_or_else(|| LodeError::InvalidPrefixUrl(value.to_string()))?;
        Ok(Self {
            acronym: acronym.parse()?,
            url: url.to_string(),
        })
    }
}

/// Request URL template of a LODE deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LodeEndpoint {
    base_url: String,
    template: String,
}

impl LodeEndpoint {
    pub fn new(base_url: &str, language: &str, function: Option<&str>) -> Self {
        let function = function.unwrap_or(DEFAULT_FUNCTION);
        Self {
            base_url: base_url.to_string(),
            template: format!("{base_url}/{function}/lang={language}/"),
        }
    }

    /// Base URL the service embeds in its generated links.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// The ontology URL is appended verbatim, without percent-encoding.
    pub fn request_url(&self, ontology_url: &str) -> String {
        format!("{}{}", self.template, ontology_url)
    }
}

impl Default for LodeEndpoint {
    fn default() -> Self {
        Self::new(LODE_URL, DEFAULT_LANGUAGE, None)
    }
}
