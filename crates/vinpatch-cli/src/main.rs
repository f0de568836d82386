//! vinpatch - Find and rewrite Vehicle Identification Numbers in ECU dumps
//!
//! This tool scans EEPROM and flash images for embedded VINs, reports every
//! location, and writes a corrected VIN back to all of them.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn, Level};
use tracing_subscriber::EnvFilter;
use vinpatch_core::{
    analyze_with, build_record, format_file_size, intake::has_bin_extension, match_platforms,
    validate_upload, Advisory, Analysis, EditSession, LoadOutcome, ScanStrategy, Scanner,
    ScannerConfig, CATALOG,
};
use walkdir::WalkDir;

/// Find and rewrite Vehicle Identification Numbers in ECU binary dumps
#[derive(Parser, Debug)]
#[command(name = "vinpatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List known platforms
    Platforms {
        /// Only show platforms with this dump size in bytes
        #[arg(long)]
        size: Option<usize>,
    },

    /// Report platforms and VIN locations
    Scan(ScanArgs),

    /// Write a new VIN to every location of the current one
    Rewrite(RewriteArgs),

    /// Print the catalog record for a dump as JSON
    Record(RecordArgs),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct InputMode {
    /// Path to a single dump
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Path to a directory of .bin dumps to process
    #[arg(short, long)]
    directory: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ScanArgs {
    #[command(flatten)]
    input: InputMode,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Maximum number of locations to report per file (0 = unlimited)
    #[arg(long, default_value = "0")]
    max_results: usize,

    /// Only check the structural offsets, skip the full sweep
    #[arg(long)]
    no_sweep: bool,
}

#[derive(Args, Debug)]
struct RewriteArgs {
    /// Dump to modify
    #[arg(short, long)]
    file: PathBuf,

    /// New VIN (17 characters, case-insensitive)
    #[arg(long, env = "VINPATCH_VIN")]
    vin: String,

    /// VIN to replace when the dump holds several
    #[arg(long)]
    select: Option<String>,

    /// Output path (default: <name>_modified.bin next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite an existing output file
    #[arg(long)]
    force: bool,

    /// Dry run - show what would change without writing
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct RecordArgs {
    /// Dump to describe
    #[arg(short, long)]
    file: PathBuf,

    /// Platform name, required when several platforms share the size
    #[arg(long)]
    platform: Option<String>,

    /// VIN to record instead of the detected one
    #[arg(long)]
    vin: Option<String>,
}

/// Output format for scan results
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human readable listing
    Text,
    /// One JSON document per file
    Json,
}

/// JSON shape of a scanned file
#[derive(Serialize)]
struct FileReport<'a> {
    file: String,
    size: usize,
    #[serde(flatten)]
    analysis: &'a Analysis,
    advisories: Vec<Advisory>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    match cli.command {
        Command::Platforms { size } => list_platforms(size),
        Command::Scan(args) => run_scan(&args),
        Command::Rewrite(args) => run_rewrite(&args),
        Command::Record(args) => run_record(&args),
    }
}

fn list_platforms(size: Option<usize>) -> Result<()> {
    let profiles: Vec<_> = match size {
        Some(size) => match_platforms(size),
        None => CATALOG.iter().collect(),
    };

    if profiles.is_empty() {
        println!("No known platform");
        return Ok(());
    }

    for p in profiles {
        println!("{:<12} {:>8} bytes  {}", p.name, p.size_bytes, p.label);
    }
    Ok(())
}

fn run_scan(args: &ScanArgs) -> Result<()> {
    let config = ScannerConfig::new()
        .max_results(args.max_results)
        .sweep(!args.no_sweep);
    let scanner = Scanner::with_config(config);

    if let Some(ref file) = args.input.file {
        scan_single_file(args, &scanner, file)
    } else if let Some(ref directory) = args.input.directory {
        scan_directory(args, &scanner, directory).map(|_| ())
    } else {
        bail!("Either --file or --directory must be specified")
    }
}

fn scan_single_file(args: &ScanArgs, scanner: &Scanner, file: &Path) -> Result<()> {
    if !file.is_file() {
        bail!("Input file does not exist: {}", file.display());
    }
    print!("{}", scan_dump(args, scanner, file)?);
    Ok(())
}

/// Scan every .bin dump under a directory, returning how many were reported
fn scan_directory(args: &ScanArgs, scanner: &Scanner, directory: &Path) -> Result<usize> {
    if !directory.is_dir() {
        bail!("Directory does not exist: {}", directory.display());
    }

    info!("Scanning directory: {}", directory.display());
    let mut processed = 0;

    for entry in WalkDir::new(directory)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !entry.file_type().is_file() || is_hidden(path) {
            continue;
        }
        if !has_bin_extension(&display_name(path)) {
            trace!("Ignoring {}", path.display());
            continue;
        }

        match scan_dump(args, scanner, path) {
            Ok(output) => print!("{}", output),
            Err(e) => {
                // Log error but continue with other files
                warn!("Skipping {}: {:#}", path.display(), e);
                continue;
            }
        }
        processed += 1;
    }

    info!("Processed {} dump(s)", processed);
    Ok(processed)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// Read a dump, applying the upload gate
fn read_dump(path: &Path) -> Result<(String, Vec<u8>)> {
    let name = display_name(path);
    let size = fs::metadata(path)
        .with_context(|| format!("Failed to stat input file: {}", path.display()))?
        .len();
    validate_upload(&name, size)?;

    trace!("Reading {}", path.display());
    let data =
        fs::read(path).with_context(|| format!("Failed to read input file: {}", path.display()))?;
    debug!(
        "Read {} from {}",
        format_file_size(data.len() as u64),
        path.display()
    );
    Ok((name, data))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Analyze one dump and render the report in the requested format
fn scan_dump(args: &ScanArgs, scanner: &dyn ScanStrategy, path: &Path) -> Result<String> {
    let (name, data) = read_dump(path)?;
    let analysis = analyze_with(scanner, &data, data.len());
    let advisories = analysis.advisories();

    let output = match args.format {
        OutputFormat::Json => {
            let report = FileReport {
                file: path.display().to_string(),
                size: data.len(),
                analysis: &analysis,
                advisories,
            };
            format!("{}\n", serde_json::to_string_pretty(&report)?)
        }
        OutputFormat::Text => format_analysis(&name, data.len(), &analysis, &advisories)?,
    };
    Ok(output)
}

fn format_analysis(
    name: &str,
    size: usize,
    analysis: &Analysis,
    advisories: &[Advisory],
) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{} ({})", name, format_file_size(size as u64))?;

    let platforms: Vec<_> = analysis
        .platforms
        .iter()
        .map(|p| format!("{} [{}]", p.name, p.label))
        .collect();
    if !platforms.is_empty() {
        writeln!(out, "  platform: {}", platforms.join(" | "))?;
    }

    for value in analysis.report.distinct_values() {
        let offsets: Vec<_> = analysis
            .report
            .iter()
            .filter(|c| c.value == value)
            .map(|c| c.offset_label())
            .collect();
        writeln!(
            out,
            "  {}  {} location(s): {}",
            value,
            offsets.len(),
            offsets.join(", ")
        )?;
    }

    for advisory in advisories {
        writeln!(out, "  note: {}", advisory)?;
    }
    Ok(out)
}

fn run_rewrite(args: &RewriteArgs) -> Result<()> {
    let (name, data) = read_dump(&args.file)?;
    let original_hash = blake3::hash(&data);

    let mut session = EditSession::new();
    match session.load(name.clone(), data) {
        LoadOutcome::NoVinFound => bail!("No VINs detected in {}", args.file.display()),
        LoadOutcome::Unique { value, locations } => {
            info!("Found {} in {} location(s)", value, locations);
            if let Some(ref select) = args.select {
                if !value.as_str().eq_ignore_ascii_case(select) {
                    bail!("{} does not contain VIN {}", name, select);
                }
            }
        }
        LoadOutcome::AwaitingSelection(choices) => {
            let listed: Vec<_> = choices.iter().map(|v| v.to_string()).collect();
            let Some(ref select) = args.select else {
                bail!(
                    "{} holds {} different VINs ({}); pick one with --select",
                    name,
                    choices.len(),
                    listed.join(", ")
                );
            };
            session.select(&select.to_ascii_uppercase())?;
        }
    }

    session.start_edit()?;
    session.set_pending(&args.vin)?;
    let written = session.save()?;
    let export = session.export()?;

    let output = match args.output {
        Some(ref path) => path.clone(),
        None => args.file.with_file_name(&export.file_name),
    };

    debug!(
        "blake3 {} -> {}",
        original_hash.to_hex(),
        blake3::hash(&export.bytes).to_hex()
    );

    if args.dry_run {
        println!(
            "Would write {} ({} location(s) set to {})",
            output.display(),
            written,
            export.value
        );
        return Ok(());
    }

    write_dump(&output, &export.bytes, args.force)?;
    println!(
        "Wrote {} ({} location(s) set to {})",
        output.display(),
        written,
        export.value
    );
    Ok(())
}

/// Write the modified dump, refusing to clobber unless forced
fn write_dump(output: &Path, bytes: &[u8], force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!(
            "File already exists: {} (use --force to overwrite)",
            output.display()
        );
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(output, bytes)
        .with_context(|| format!("Failed to write file: {}", output.display()))?;
    Ok(())
}

fn run_record(args: &RecordArgs) -> Result<()> {
    let (name, data) = read_dump(&args.file)?;
    let analysis = vinpatch_core::analyze(&data, data.len());
    let manual = args.vin.as_deref().map(str::to_ascii_uppercase);

    let record = build_record(
        &name,
        &data,
        &analysis,
        args.platform.as_deref(),
        manual.as_deref(),
    )?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
