//! krmgen Core - Kubernetes resources to Go construction code
//!
//! This crate turns decoded resource objects into Go source that rebuilds
//! them:
//! - `Reflector`: walks any `T: Serialize` into a default-free IR tree
//! - `TypeTables`: module aliases and enum types of the target Go API
//! - `Emitter`: type-directed Go literal emission from the IR
//! - `check_braces`: delimiter balance guard on emitted text
//! - `GoFile`: accessor functions, helpers and batch skeletons
//! - `Pipeline`: the per-resource chain with continue-on-error semantics
//!
//! # Example
//!
//! ```no_run
//! use krmgen_core::{GeneratorConfig, GoFile, Pipeline, TypeTables};
//! # #[derive(serde::Serialize)]
//! # struct ConfigMap { data: std::collections::BTreeMap<String, String> }
//! # let config_map = ConfigMap { data: Default::default() };
//!
//! let config = GeneratorConfig::kubernetes();
//! let tables = TypeTables::builtin()?;
//! let pipeline = Pipeline::new(&config, &tables);
//!
//! let mut file = GoFile::new(&config.package, &config.namespace, &config.codegen);
//! let converted = pipeline.convert("v1", "ConfigMap", &config_map)?;
//! file.add(&converted.kind, converted.literal);
//! println!("{}", file.render());
//! # Ok::<(), krmgen_core::KrmError>(())
//! ```

pub mod assemble;
pub mod config;
pub mod emit;
pub mod error;
pub mod ir;
pub mod pipeline;
pub mod reflect;
pub mod resolver;
pub mod types;
pub mod validate;

pub use assemble::{BatchFailure, BatchReport, GoFile, Namespaced, run_batch};
pub use config::GeneratorConfig;
pub use emit::{CodegenConfig, Emitter, emit_unstructured, normalize_whitespace};
pub use error::{
    ConfigError, ConversionWarning, EmitError, IrError, KrmError, ReflectError, Result, WarningCategory,
    WarningSeverity,
};
pub use ir::{IrField, IrNode, IrValue};
pub use pipeline::{ConvertedResource, Pipeline, check_api_version, read_ir};
pub use reflect::{FieldAction, FieldNaming, FieldRule, FieldScope, OpaqueKind, ReflectOptions, Reflected, Reflector};
pub use resolver::{Resolved, TypeTables};
pub use types::{NamedType, Primitive, TypeParseError, TypeRef};
pub use validate::{BraceError, BraceReport, check_braces};
