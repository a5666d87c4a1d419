//! Emit command - print the Go literal of a persisted IR tree

use krmgen_core::{Pipeline, read_ir};
use std::path::Path;

use super::{TableArgs, load_settings};
use crate::error::{CliError, Result};

pub fn run(ir_path: &Path, kind: &str, tables: &TableArgs) -> Result<()> {
    let (config, tables) = load_settings(tables)?;
    let pipeline = Pipeline::new(&config, &tables);

    let node = read_ir(ir_path).map_err(|e| CliError::Input {
        message: e.to_string(),
        help: Some("pass a file written by `krmgen generate --ir-dir`".to_string()),
    })?;
    let converted = pipeline.convert_ir(kind, &node)?;
    if !converted.warnings.is_empty() {
        tracing::warn!(kind, count = converted.warnings.len(), "literal emitted with warnings");
    }

    println!("{}", converted.literal);
    Ok(())
}
