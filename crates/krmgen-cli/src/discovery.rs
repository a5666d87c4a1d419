//! Manifest discovery and document loading

use krmgen_core::Namespaced;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{CliError, ResourceError, Result};

/// One YAML document of a manifest file
#[derive(Debug, Clone)]
pub struct Manifest {
    /// `path` or `path#2` for the second document of a stream
    pub source: String,
    pub object: Value,
}

impl Manifest {
    pub fn api_version(&self) -> Option<&str> {
        self.object.get("apiVersion").and_then(Value::as_str)
    }

    pub fn kind(&self) -> Option<&str> {
        self.object.get("kind").and_then(Value::as_str)
    }
}

impl Namespaced for Manifest {
    fn namespace(&self) -> Option<&str> {
        self.object.namespace()
    }

    fn set_namespace(&mut self, namespace: &str) {
        self.object.set_namespace(namespace);
    }
}

fn is_manifest(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// All `*.yaml`/`*.yml` files under `input`, sorted, skipping `tests` directories
///
/// A file given directly is returned as is.
pub fn find_manifests(input: &Path) -> Result<Vec<PathBuf>> {
    if !input.exists() {
        return Err(CliError::input_with_help(
            format!("{} does not exist", input.display()),
            "pass a manifest file or a directory of manifests",
        ));
    }
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(input)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !(e.file_type().is_dir() && e.depth() > 0 && e.file_name() == "tests"));
    for entry in walker {
        let entry = entry.map_err(|e| CliError::Io {
            path: input.to_path_buf(),
            message: e.to_string(),
        })?;
        if entry.file_type().is_file() && is_manifest(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    tracing::debug!(input = %input.display(), count = files.len(), "manifests discovered");
    Ok(files)
}

/// Split a file into its non-empty documents
pub fn load_documents(path: &Path) -> std::result::Result<Vec<Manifest>, ResourceError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| ResourceError::Decode {
        path: display.clone(),
        message: e.to_string(),
    })?;

    let mut manifests = Vec::new();
    for (i, document) in serde_yaml::Deserializer::from_str(&content).enumerate() {
        let object = Value::deserialize(document).map_err(|e| ResourceError::Decode {
            path: display.clone(),
            message: e.to_string(),
        })?;
        if object.is_null() {
            continue;
        }
        let source = if i == 0 {
            display.clone()
        } else {
            format!("{}#{}", display, i + 1)
        };
        manifests.push(Manifest { source, object });
    }
    Ok(manifests)
}
