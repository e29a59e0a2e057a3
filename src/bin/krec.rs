//! krec - Kubernetes reconciliation CLI tool
//!
//! Compares, patches and merges resource manifests without talking to a
//! cluster. Files may be YAML or JSON; only the first document is read.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use kube_reconcile::patch::{apply_merge_patch, form_patch, MergeMode};
use kube_reconcile::value::{self, Value};
use kube_reconcile::equal_spec;
use tracing::{debug, Level};

/// Exit code for `equal` when the two trees differ.
const EXIT_DIFFERENT: u8 = 1;
/// Exit code for any failure.
const EXIT_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "krec", version)]
#[command(about = "Diff and patch declarative Kubernetes resources")]
struct Cli {
    /// Output location. Use '-' for stdout
    #[arg(short, long, global = true, default_value = "-")]
    output: String,

    /// Log more details to stderr (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether the server copy already matches the local definition
    Equal {
        #[arg(long)]
        local: PathBuf,
        #[arg(long)]
        server: PathBuf,
    },
    /// Print the patch that converges the server copy on the local definition
    Patch {
        #[arg(long)]
        local: PathBuf,
        #[arg(long)]
        server: PathBuf,
        /// How list fields are patched
        #[arg(long, default_value = "replace")]
        mode: MergeMode,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Print the server copy with a merge patch applied
    Apply {
        #[arg(long)]
        server: PathBuf,
        #[arg(long)]
        patch: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut output: Box<dyn Write> = if cli.output == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(fs::File::create(&cli.output)
            .map_err(|e| format!("Failed to create output file {:?}: {}", cli.output, e))?)
    };

    match cli.command {
        Command::Equal { local, server } => equal(&local, &server, &mut output),
        Command::Patch { local, server, mode, format } => {
            patch(&local, &server, mode, format, &mut output)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Apply { server, patch, format } => {
            apply(&server, &patch, format, &mut output)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_tree(file: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(file)
        .map_err(|e| format!("Failed to read file {:?}: {}", file, e))?;
    let tree = value::from_yaml_first(&content)
        .map_err(|e| format!("Failed to parse file {:?}: {}", file, e))?;
    debug!(file = %file.display(), kind = tree.type_name(), "loaded");
    Ok(tree)
}

fn write_tree(tree: &Value, format: Format, output: &mut dyn Write) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        Format::Json => writeln!(output, "{}", value::to_json_pretty(tree)?)?,
        Format::Yaml => write!(output, "{}", value::to_yaml(tree)?)?,
    }
    Ok(())
}

fn equal(local: &Path, server: &Path, output: &mut dyn Write) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let local = read_tree(local)?;
    let server = read_tree(server)?;

    if equal_spec(&local, &server)? {
        writeln!(output, "Objects match")?;
        Ok(ExitCode::SUCCESS)
    } else {
        writeln!(output, "Objects differ")?;
        Ok(ExitCode::from(EXIT_DIFFERENT))
    }
}

fn patch(
    local: &Path,
    server: &Path,
    mode: MergeMode,
    format: Format,
    output: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let local = read_tree(local)?;
    let server = read_tree(server)?;

    let patch = form_patch(&local, &server, mode)?;
    write_tree(&patch, format, output)
}

fn apply(server: &Path, patch: &Path, format: Format, output: &mut dyn Write) -> Result<(), Box<dyn std::error::Error>> {
    let server = read_tree(server)?;
    let patch = read_tree(patch)?;

    let merged = apply_merge_patch(&server, &patch);
    write_tree(&merged, format, output)
}
