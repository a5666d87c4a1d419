//! krmgen CLI - Generate Go construction code from Kubernetes manifests

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod discovery;
mod error;
mod exit_codes;
mod kinds;
mod logging;

use commands::TableArgs;
use commands::generate::GenerateOptions;
use kinds::DecodeMode;

#[derive(Parser)]
#[command(name = "krmgen")]
#[command(author = "krmgen Contributors")]
#[command(version)]
#[command(about = "Generate Go construction code from Kubernetes manifests", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error); unknown values mean debug
    #[arg(long, global = true, env = "KRMGEN_LOG", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every manifest under a path into one Go file
    Generate {
        /// Manifest file or directory (searched recursively)
        input: PathBuf,

        /// Namespace backfilled by the generated CreateAll/DeleteAll helpers
        #[arg(short, long)]
        namespace: Option<String>,

        /// Generated Go file
        #[arg(short, long, default_value = "outputs/generated_code.go")]
        output: PathBuf,

        /// Persist the IR of every typed resource as JSON in this directory
        #[arg(long)]
        ir_dir: Option<PathBuf>,

        /// Decode every document as unstructured instead of its typed kind
        #[arg(long)]
        generic: bool,

        /// Generator configuration (YAML); Kubernetes preset when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Module mapping table (JSON)
        #[arg(long)]
        struct_mapping: Option<PathBuf>,

        /// Enum set table (JSON)
        #[arg(long)]
        enum_mapping: Option<PathBuf>,
    },

    /// Print the Go literal of a persisted IR file
    Emit {
        /// IR JSON file
        ir: PathBuf,

        /// Kind of the resource the IR describes
        #[arg(short, long)]
        kind: String,

        /// Generator configuration (YAML); Kubernetes preset when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Module mapping table (JSON)
        #[arg(long)]
        struct_mapping: Option<PathBuf>,

        /// Enum set table (JSON)
        #[arg(long)]
        enum_mapping: Option<PathBuf>,
    },
}

fn run(command: Commands) -> error::Result<()> {
    match command {
        Commands::Generate {
            input,
            namespace,
            output,
            ir_dir,
            generic,
            config,
            struct_mapping,
            enum_mapping,
        } => commands::generate::run(&GenerateOptions {
            input,
            output,
            namespace,
            ir_dir,
            mode: if generic { DecodeMode::Generic } else { DecodeMode::Typed },
            tables: TableArgs {
                config,
                struct_mapping,
                enum_mapping,
            },
        }),

        Commands::Emit {
            ir,
            kind,
            config,
            struct_mapping,
            enum_mapping,
        } => commands::emit::run(
            &ir,
            &kind,
            &TableArgs {
                config,
                struct_mapping,
                enum_mapping,
            },
        ),
    }
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let code = match run(cli.command) {
        Ok(()) => exit_codes::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };
    std::process::exit(code);
}
