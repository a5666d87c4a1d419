//! Per-resource conversion pipeline
//!
//! reflect -> (persist IR) -> emit -> brace check. Each call converts one
//! top-level resource; an error only concerns that resource and the caller
//! moves on to the next.

use serde::Serialize;
use serde_json::Value;
use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::GeneratorConfig;
use crate::emit::{Emitter, emit_unstructured};
use crate::error::{ConversionWarning, IrError, KrmError, Result, WarningCategory};
use crate::ir::IrNode;
use crate::reflect::Reflector;
use crate::resolver::TypeTables;
use crate::validate::check_braces;

/// Only `v1` and `<group>/v1` resources are converted
pub fn check_api_version(api_version: &str) -> Result<()> {
    let version = api_version.rsplit('/').next().unwrap_or_default();
    if version == "v1" {
        Ok(())
    } else {
        Err(KrmError::UnsupportedVersion {
            api_version: api_version.to_string(),
        })
    }
}

/// One converted resource
#[derive(Debug, Clone)]
pub struct ConvertedResource {
    pub kind: String,
    /// Go literal constructing the resource
    pub literal: String,
    /// Persisted IR file, when IR persistence is on
    pub ir_path: Option<PathBuf>,
    pub warnings: Vec<ConversionWarning>,
}

/// Converts resources with one configuration and one set of type tables
pub struct Pipeline<'a> {
    config: &'a GeneratorConfig,
    tables: &'a TypeTables,
    ir_dir: Option<PathBuf>,
    persisted: Cell<usize>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a GeneratorConfig, tables: &'a TypeTables) -> Self {
        Self {
            config,
            tables,
            ir_dir: None,
            persisted: Cell::new(0),
        }
    }

    /// Persist every IR tree under `dir` and emit from the re-read copy
    pub fn with_ir_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.ir_dir = Some(dir.into());
        self
    }

    /// Convert a typed resource
    pub fn convert<T: Serialize + ?Sized>(&self, api_version: &str, kind: &str, value: &T) -> Result<ConvertedResource> {
        check_api_version(api_version)?;

        let reflector = Reflector::new(&self.config.reflect);
        let node = reflector.reflect_resource(value)?;
        let mut warnings = reflector.take_warnings();
        tracing::debug!(kind, fields = node.len(), "resource reflected");

        let (node, ir_path) = match &self.ir_dir {
            Some(dir) => {
                let path = self.persist(dir, kind, &node)?;
                (read_ir(&path)?, Some(path))
            }
            None => (node, None),
        };

        let mut converted = self.convert_ir(kind, &node)?;
        warnings.append(&mut converted.warnings);
        converted.warnings = warnings;
        converted.ir_path = ir_path;
        Ok(converted)
    }

    /// Emit a resource from an IR tree
    pub fn convert_ir(&self, kind: &str, node: &IrNode) -> Result<ConvertedResource> {
        let emitter = Emitter::new(self.tables, &self.config.codegen);
        let literal = emitter.emit_resource(kind, node)?;
        let mut warnings = emitter.take_warnings();
        check_literal(kind, &literal, &mut warnings);
        Ok(ConvertedResource {
            kind: kind.to_string(),
            literal,
            ir_path: None,
            warnings,
        })
    }

    /// Convert a generically decoded resource
    pub fn convert_unstructured(&self, kind: &str, object: &Value) -> ConvertedResource {
        let literal = emit_unstructured(object);
        let mut warnings = Vec::new();
        check_literal(kind, &literal, &mut warnings);
        ConvertedResource {
            kind: kind.to_string(),
            literal,
            ir_path: None,
            warnings,
        }
    }

    fn persist(&self, dir: &Path, kind: &str, node: &IrNode) -> Result<PathBuf> {
        let n = self.persisted.get() + 1;
        self.persisted.set(n);
        let path = dir.join(format!("{}-{}.json", kind.to_lowercase(), n));

        let io_err = |source| IrError::Io {
            path: path.clone(),
            source,
        };
        fs::create_dir_all(dir).map_err(io_err)?;
        fs::write(&path, node.to_json_pretty()?).map_err(io_err)?;
        tracing::debug!(path = %path.display(), "IR persisted");
        Ok(path)
    }
}

/// Read a persisted IR tree
pub fn read_ir(path: &Path) -> Result<IrNode> {
    let content = fs::read_to_string(path).map_err(|source| IrError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(IrNode::from_json_str(&content)?)
}

fn check_literal(kind: &str, literal: &str, warnings: &mut Vec<ConversionWarning>) {
    if let Err(e) = check_braces(literal) {
        tracing::error!(kind, error = %e, "emitted literal has unbalanced delimiters");
        warnings.push(ConversionWarning::error(WarningCategory::BraceBalance, kind, e.to_string()));
    }
}
