//! Type resolver
//!
//! Maps bare type names to the module alias they are referenced under in
//! emitted code, and knows which named types are enumerated scalars.
//! Both tables are JSON documents of the shape `{alias: [TypeName, ...]}`
//! loaded once before any conversion.

use indexmap::IndexMap;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use crate::error::ConfigError;
use crate::types::NamedType;

/// Built-in module mapping for the core Kubernetes API groups
pub const BUILTIN_STRUCT_MAPPING: &str = include_str!("../../../config/struct_module_mapping.json");

/// Built-in enum set
pub const BUILTIN_ENUM_MAPPING: &str = include_str!("../../../config/enum_module_mapping.json");

/// `v1`, `v1beta1`, `v2alpha3`
static VERSION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v\d+(?:(?:alpha|beta)\d+)?$").expect("version marker pattern is valid"));

pub fn is_version_marker(qualifier: &str) -> bool {
    VERSION_MARKER.is_match(qualifier)
}

/// Immutable lookup tables shared by every conversion
#[derive(Debug, Clone, Default)]
pub struct TypeTables {
    modules: HashMap<String, String>,
    enums: HashSet<String>,
}

/// Result of resolving a named type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub alias: Option<String>,
    pub name: String,
    /// False when a lookup was attempted and missed
    pub known: bool,
}

impl std::fmt::Display for Resolved {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{}.{}", alias, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

fn parse_table(name: &str, json: &str) -> Result<IndexMap<String, Vec<String>>, ConfigError> {
    serde_json::from_str(json).map_err(|source| ConfigError::Table {
        name: name.to_string(),
        source,
    })
}

fn read_table(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl TypeTables {
    /// Build tables from the two JSON documents
    pub fn from_json_docs(struct_json: &str, enum_json: &str) -> Result<Self, ConfigError> {
        let mut modules = HashMap::new();
        for (alias, names) in parse_table("struct mapping", struct_json)? {
            for name in names {
                if let Some(previous) = modules.insert(name.clone(), alias.clone()) {
                    tracing::warn!(type_name = %name, %previous, current = %alias, "duplicate entry in struct mapping");
                }
            }
        }

        let mut enums = HashSet::new();
        for (_, names) in parse_table("enum mapping", enum_json)? {
            for name in names {
                if !enums.insert(name.clone()) {
                    tracing::warn!(type_name = %name, "duplicate entry in enum mapping");
                }
            }
        }

        tracing::debug!(structs = modules.len(), enums = enums.len(), "type tables loaded");
        Ok(Self { modules, enums })
    }

    /// The tables shipped with the crate
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json_docs(BUILTIN_STRUCT_MAPPING, BUILTIN_ENUM_MAPPING)
    }

    /// Load tables from files, falling back to the built-in ones
    pub fn load(struct_path: Option<&Path>, enum_path: Option<&Path>) -> Result<Self, ConfigError> {
        let struct_json = match struct_path {
            Some(path) => read_table(path)?,
            None => BUILTIN_STRUCT_MAPPING.to_string(),
        };
        let enum_json = match enum_path {
            Some(path) => read_table(path)?,
            None => BUILTIN_ENUM_MAPPING.to_string(),
        };
        Self::from_json_docs(&struct_json, &enum_json)
    }

    /// Resolve the alias a named type is emitted under
    ///
    /// Version-marker qualifiers are replaced by the mapped alias. Other
    /// qualifiers are already aliases and are kept. A miss leaves the type
    /// unqualified.
    pub fn resolve_module(&self, named: &NamedType) -> Resolved {
        match named.qualifier.as_deref() {
            Some(q) if !is_version_marker(q) => Resolved {
                alias: Some(q.to_string()),
                name: named.name.clone(),
                known: true,
            },
            _ => match self.modules.get(&named.name) {
                Some(alias) => Resolved {
                    alias: Some(alias.clone()),
                    name: named.name.clone(),
                    known: true,
                },
                None => Resolved {
                    alias: None,
                    name: named.name.clone(),
                    known: false,
                },
            },
        }
    }

    pub fn is_enum(&self, bare: &str) -> bool {
        self.enums.contains(bare)
    }

    /// Alias owning a top-level resource kind
    pub fn module_of_kind(&self, kind: &str) -> Option<&str> {
        self.modules.get(kind).map(String::as_str)
    }
}
