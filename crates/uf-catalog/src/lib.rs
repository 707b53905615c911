//! uf-catalog: unit system catalogs on disk and the embedded UCUM core set.
//!
//! A catalog file holds an optional `config:` section followed by the
//! `prefixes`, `units` and `conversions` record lists.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uf_convert::{SystemBuilder, SystemConfig, SystemOfUnits, UnitSystemRecords};
use uf_core::UfError;

/// Core UCUM subset: SI prefixes, the seven base units and common linear units.
pub const UCUM_CORE: &str = include_str!("../data/ucum-core.yaml");

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("Unit system error: {0}")]
    Units(#[from] UfError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub config: SystemConfig,
    #[serde(flatten)]
    pub records: UnitSystemRecords,
}

impl Catalog {
    pub fn build(&self) -> CatalogResult<SystemOfUnits> {
        let mut builder = SystemBuilder::new(self.config);
        builder.add_records(&self.records)?;
        Ok(builder.build()?)
    }
}

pub fn parse_yaml(content: &str) -> CatalogResult<Catalog> {
    Ok(serde_yaml::from_str(content)?)
}

pub fn parse_json(content: &str) -> CatalogResult<Catalog> {
    Ok(serde_json::from_str(content)?)
}

pub fn from_yaml_str(content: &str) -> CatalogResult<SystemOfUnits> {
    parse_yaml(content)?.build()
}

pub fn load_yaml(path: &Path) -> CatalogResult<SystemOfUnits> {
    debug!(path = %path.display(), "loading YAML catalog");
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn load_json(path: &Path) -> CatalogResult<SystemOfUnits> {
    debug!(path = %path.display(), "loading JSON catalog");
    let content = std::fs::read_to_string(path)?;
    parse_json(&content)?.build()
}

/// Load by file extension: `.json` is JSON, anything else YAML.
pub fn load(path: &Path) -> CatalogResult<SystemOfUnits> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}

/// The embedded UCUM core catalog.
pub fn builtin() -> CatalogResult<SystemOfUnits> {
    from_yaml_str(UCUM_CORE)
}
