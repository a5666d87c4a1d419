//! Generate command - turn a tree of manifests into one Go source file
//!
//! Every document is converted on its own. A document that fails is
//! reported and skipped; the file is written with everything else and the
//! command exits non-zero.

use console::style;
use krmgen_core::{BatchReport, GoFile, Pipeline, run_batch};
use std::fs;
use std::path::{Path, PathBuf};

use super::{TableArgs, load_settings};
use crate::discovery::{self, Manifest};
use crate::error::{CliError, ResourceError, Result};
use crate::kinds::{self, DecodeMode, SUPPORTED_KINDS};

pub struct GenerateOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Overrides the configured namespace of the batch helpers
    pub namespace: Option<String>,
    pub ir_dir: Option<PathBuf>,
    pub mode: DecodeMode,
    pub tables: TableArgs,
}

/// Counters shown in the final summary
#[derive(Debug, Default)]
struct RunStats {
    warnings: usize,
    unsupported_kinds: usize,
}

pub fn run(options: &GenerateOptions) -> Result<()> {
    let (mut config, tables) = load_settings(&options.tables)?;
    if let Some(namespace) = &options.namespace {
        config.namespace = namespace.clone();
    }

    let mut pipeline = Pipeline::new(&config, &tables);
    if let Some(dir) = &options.ir_dir {
        pipeline = pipeline.with_ir_dir(dir);
    }

    print_header(&options.input, &options.output, options.mode);

    let files = discovery::find_manifests(&options.input)?;
    if files.is_empty() {
        return Err(CliError::input_with_help(
            format!("no *.yaml or *.yml files under {}", options.input.display()),
            "directories named `tests` are skipped",
        ));
    }

    let mut manifests: Vec<Manifest> = Vec::new();
    let mut load_failures: Vec<ResourceError> = Vec::new();
    for path in &files {
        match discovery::load_documents(path) {
            Ok(mut documents) => manifests.append(&mut documents),
            Err(e) => {
                tracing::error!(error = %e, "skipping file");
                load_failures.push(e);
            }
        }
    }

    let mut file = GoFile::new(&config.package, &config.namespace, &config.codegen);
    let mut stats = RunStats::default();
    let report = run_batch(&mut manifests, None, |_, manifest| -> std::result::Result<(), ResourceError> {
        let converted = match kinds::convert(&pipeline, manifest, options.mode) {
            Ok(converted) => converted,
            Err(e) => {
                if matches!(e, ResourceError::UnsupportedKind { .. }) {
                    stats.unsupported_kinds += 1;
                }
                return Err(e);
            }
        };
        stats.warnings += converted.warnings.len();
        let local = file.add(&converted.kind, converted.literal);
        tracing::debug!(source = %manifest.source, local = %local, "resource converted");
        Ok(())
    });

    write_output(&options.output, &file.render())?;

    print_summary(&file, &report, &load_failures, &stats, &options.output);

    let failed = report.failed() + load_failures.len();
    if failed > 0 {
        return Err(CliError::ConversionFailed {
            failed,
            total: report.attempted + load_failures.len(),
        });
    }
    Ok(())
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CliError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| CliError::io(path, e))?;
    tracing::info!(path = %path.display(), bytes = content.len(), "Go file written");
    Ok(())
}

fn print_header(input: &Path, output: &Path, mode: DecodeMode) {
    let decoding = match mode {
        DecodeMode::Typed => "(typed objects)",
        DecodeMode::Generic => "(unstructured objects)",
    };
    println!();
    println!(
        "  {} {} {}",
        style("krmgen").bold().cyan(),
        style("─").dim(),
        style("manifests → Go").dim()
    );
    println!();
    println!(
        "  {} {} {}",
        style("Source:").dim(),
        style(input.display()).cyan(),
        style(decoding).dim()
    );
    println!("  {} {}", style("Target:").dim(), style(output.display()).green());
    println!();
}

fn print_summary(
    file: &GoFile,
    report: &BatchReport<ResourceError>,
    load_failures: &[ResourceError],
    stats: &RunStats,
    output: &Path,
) {
    for (kind, count) in file.summary() {
        println!("  {} {:<24} {}", style("✓").green(), kind, count);
    }
    for failure in load_failures.iter().chain(report.failures.iter().map(|f| &f.error)) {
        println!("  {} {}", style("✗").red(), failure);
    }
    if stats.unsupported_kinds > 0 {
        println!();
        println!(
            "  {} supported kinds: {}",
            style("hint:").yellow(),
            SUPPORTED_KINDS.join(", ")
        );
        println!("  {} use --generic to emit any kind as unstructured", style("hint:").yellow());
    }

    let failed = report.failed() + load_failures.len();
    println!();
    println!(
        "  {} converted, {} failed, {} warning(s) → {}",
        style(report.succeeded).green().bold(),
        if failed > 0 {
            style(failed).red().bold()
        } else {
            style(failed).dim()
        },
        style(stats.warnings).yellow(),
        style(output.display()).green()
    );
    println!();
}
