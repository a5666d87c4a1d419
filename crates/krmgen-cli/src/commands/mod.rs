//! CLI commands

pub mod emit;
pub mod generate;

use krmgen_core::{GeneratorConfig, TypeTables};
use std::path::PathBuf;

use crate::error::Result;

/// Configuration and mapping-table flags shared by every command
#[derive(Debug, Clone, Default)]
pub struct TableArgs {
    pub config: Option<PathBuf>,
    pub struct_mapping: Option<PathBuf>,
    pub enum_mapping: Option<PathBuf>,
}

/// Load the configuration (Kubernetes preset without `--config`) and its tables
///
/// Mapping paths given on the command line take precedence over the ones in
/// the configuration file.
pub fn load_settings(args: &TableArgs) -> Result<(GeneratorConfig, TypeTables)> {
    let mut config = match args.config.as_deref() {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            GeneratorConfig::load_from(path)?
        }
        None => GeneratorConfig::kubernetes(),
    };
    if let Some(path) = &args.struct_mapping {
        config.struct_mapping = Some(path.clone());
    }
    if let Some(path) = &args.enum_mapping {
        config.enum_mapping = Some(path.clone());
    }

    let tables = TypeTables::load(config.struct_mapping.as_deref(), config.enum_mapping.as_deref())?;
    Ok((config, tables))
}
