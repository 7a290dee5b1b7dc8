//! Neighbourhood taxonomy
//!
//! A read-only region -> neighbourhood -> suburb hierarchy loaded once at
//! startup from a TOML document. The built-in document ships with the crate;
//! deployments can point `taxonomy.path` at their own copy.
//!
//! Any defect in the document is a startup error: `Taxonomy` values are only
//! ever constructed from data that passed validation.

use crate::address::normalize;
use crate::config::TaxonomyConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Built-in taxonomy document
const BUILTIN_TAXONOMY: &str = include_str!("../../data/neighbourhoods.toml");

/// Neighbourhood classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighbourhoodKind {
    /// City centre and inner-city suburbs
    Urban,
    /// Residential suburbs
    Suburban,
    /// Beachside and harbour suburbs
    Coastal,
    /// Towns and settlements outside the urban area
    Rural,
}

impl std::fmt::Display for NeighbourhoodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Urban => write!(f, "urban"),
            Self::Suburban => write!(f, "suburban"),
            Self::Coastal => write!(f, "coastal"),
            Self::Rural => write!(f, "rural"),
        }
    }
}

impl std::str::FromStr for NeighbourhoodKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "urban" => Ok(Self::Urban),
            "suburban" => Ok(Self::Suburban),
            "coastal" => Ok(Self::Coastal),
            "rural" => Ok(Self::Rural),
            _ => Err(format!("Unknown neighbourhood kind: {}", s)),
        }
    }
}

/// A neighbourhood as declared in the taxonomy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighbourhoodEntry {
    /// "{region_key}/{neighbourhood_key}"
    pub id: String,
    pub name: String,
    pub local_name: String,
    pub region_key: String,
    pub region: String,
    pub region_local_name: String,
    /// Suburb names in declaration order; the first one stands in for the centroid
    pub suburbs: Vec<String>,
    pub kind: NeighbourhoodKind,
    pub postcode: String,
}

impl NeighbourhoodEntry {
    /// True when `region` names this entry's region (either name, any case)
    pub fn in_region(&self, region: &str) -> bool {
        let region = normalize(region);
        !region.is_empty()
            && (region == normalize(&self.region)
                || region == normalize(&self.region_local_name)
                || region == normalize(&self.region_key))
    }
}

/// A region header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub key: String,
    pub name: String,
    pub local_name: String,
}

/// Document layout
#[derive(Debug, Deserialize)]
struct TaxonomyDocument {
    #[serde(default)]
    regions: Vec<RegionDefinition>,
}

#[derive(Debug, Deserialize)]
struct RegionDefinition {
    key: String,
    name: String,
    #[serde(default)]
    local_name: String,
    #[serde(default)]
    neighbourhoods: Vec<NeighbourhoodDefinition>,
}

#[derive(Debug, Deserialize)]
struct NeighbourhoodDefinition {
    key: String,
    name: String,
    #[serde(default)]
    local_name: String,
    kind: NeighbourhoodKind,
    #[serde(default)]
    postcode: String,
    #[serde(default)]
    suburbs: Vec<String>,
}

/// The loaded, validated taxonomy
#[derive(Debug, Clone)]
pub struct Taxonomy {
    regions: Vec<Region>,
    entries: Vec<NeighbourhoodEntry>,
}

impl Taxonomy {
    /// Load the taxonomy that ships with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_TAXONOMY)
    }

    /// Load a taxonomy document from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Taxonomy(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load the configured taxonomy, falling back to the built-in one
    pub fn from_config(config: &TaxonomyConfig) -> Result<Self> {
        match config.path.as_deref() {
            Some(path) if !path.trim().is_empty() => Self::load(Path::new(path)),
            _ => Self::builtin(),
        }
    }

    /// Parse and validate a taxonomy document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let document: TaxonomyDocument = toml::from_str(content)
            .map_err(|e| Error::Taxonomy(format!("Failed to parse taxonomy: {}", e)))?;
        Self::from_document(document)
    }

    fn from_document(document: TaxonomyDocument) -> Result<Self> {
        if document.regions.is_empty() {
            return Err(Error::Taxonomy("No regions defined".to_string()));
        }

        let mut regions = Vec::with_capacity(document.regions.len());
        let mut entries = Vec::new();
        let mut region_keys = HashSet::new();
        let mut ids = HashSet::new();

        for region in document.regions {
            require("region key", &region.key, &region.name)?;
            require("region name", &region.name, &region.key)?;
            if !region_keys.insert(region.key.clone()) {
                return Err(Error::Taxonomy(format!(
                    "Duplicate region key: {}",
                    region.key
                )));
            }

            let region_local_name = or_name(region.local_name, &region.name);

            for hood in region.neighbourhoods {
                let id = format!("{}/{}", region.key, hood.key);
                require("neighbourhood key", &hood.key, &id)?;
                require("neighbourhood name", &hood.name, &id)?;
                if !ids.insert(id.clone()) {
                    return Err(Error::Taxonomy(format!("Duplicate neighbourhood id: {}", id)));
                }
                if hood.suburbs.is_empty() {
                    return Err(Error::Taxonomy(format!("Neighbourhood {} has no suburbs", id)));
                }
                if hood.suburbs.iter().any(|s| s.trim().is_empty()) {
                    return Err(Error::Taxonomy(format!(
                        "Neighbourhood {} has a blank suburb name",
                        id
                    )));
                }

                entries.push(NeighbourhoodEntry {
                    id,
                    local_name: or_name(hood.local_name, &hood.name),
                    name: hood.name,
                    region_key: region.key.clone(),
                    region: region.name.clone(),
                    region_local_name: region_local_name.clone(),
                    suburbs: hood.suburbs.iter().map(|s| s.trim().to_string()).collect(),
                    kind: hood.kind,
                    postcode: hood.postcode.trim().to_string(),
                });
            }

            regions.push(Region {
                key: region.key,
                name: region.name,
                local_name: region_local_name,
            });
        }

        let taxonomy = Self { regions, entries };
        taxonomy.warn_on_overlaps();
        debug!(
            regions = taxonomy.regions.len(),
            neighbourhoods = taxonomy.entries.len(),
            "taxonomy loaded"
        );
        Ok(taxonomy)
    }

    /// Matching picks the first declaration when a suburb is listed twice
    fn warn_on_overlaps(&self) {
        let mut seen: HashMap<String, &str> = HashMap::new();
        for entry in &self.entries {
            for suburb in &entry.suburbs {
                match seen.get(&normalize(suburb)) {
                    Some(first) if *first != entry.id => warn!(
                        suburb = %suburb,
                        first = %first,
                        second = %entry.id,
                        "suburb listed under two neighbourhoods"
                    ),
                    Some(_) => {}
                    None => {
                        seen.insert(normalize(suburb), &entry.id);
                    }
                }
            }
        }
    }

    /// Every neighbourhood in declaration order
    pub fn all_entries(&self) -> &[NeighbourhoodEntry] {
        &self.entries
    }

    /// Neighbourhoods of one region, in declaration order
    pub fn entries_for_region<'a>(
        &'a self,
        region_key: &'a str,
    ) -> impl Iterator<Item = &'a NeighbourhoodEntry> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.region_key.eq_ignore_ascii_case(region_key))
    }

    /// Region headers in declaration order
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Region keys in declaration order
    pub fn region_keys(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|r| r.key.as_str())
    }

    /// Look up a neighbourhood by id
    pub fn get(&self, id: &str) -> Option<&NeighbourhoodEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Number of neighbourhoods
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no neighbourhoods are declared
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn require(what: &str, value: &str, context: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Taxonomy(format!("Missing {} ({})", what, context)));
    }
    Ok(())
}

fn or_name(local_name: String, name: &str) -> String {
    if local_name.trim().is_empty() {
        name.to_string()
    } else {
        local_name
    }
}
