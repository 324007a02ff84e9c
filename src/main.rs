use anyhow::{Context, Result};
use bitext_align::{
    AlignmentAnnotation, DisplayLines, LoadOptions, SaveMode, SaveOptions, StoredAnnotation,
    TextLayout, checksum, generate_annotation_id, parse_annotation, read_text,
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Line-by-line alignment of a source text and its translation
#[derive(Parser, Debug)]
#[command(name = "bitext-align")]
#[command(version = "0.1.0")]
#[command(about = "Save, load and verify span-based bitext alignments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build an alignment annotation from two line files
    Save(SaveArgs),

    /// Rebuild display lines from an annotation and its two texts
    Load(LoadArgs),

    /// Save then load two line files and check the lines come back unchanged
    Roundtrip(RoundtripArgs),
}

#[derive(Args, Debug)]
struct SaveArgs {
    /// Source text, one display line per line
    #[arg(short, long)]
    source: String,

    /// Target text, one display line per line
    #[arg(short, long)]
    target: String,

    /// Updating an existing annotation: keep rows without a counterpart
    #[arg(long)]
    update: bool,

    /// Annotation id ("auto" generates one)
    #[arg(long, default_value = "auto")]
    id: String,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Args, Debug)]
struct LoadArgs {
    /// Annotation JSON, either `{id, type, data}` or the bare body
    #[arg(short, long)]
    annotation: String,

    /// Source text
    #[arg(short, long)]
    source: String,

    /// Target text
    #[arg(short, long)]
    target: String,

    /// Texts are continuous buffers rather than line files
    #[arg(long)]
    raw: bool,

    /// Skip placeholder insertion for uncovered text
    #[arg(long)]
    no_fill_gaps: bool,

    /// Output structured JSON instead of human-readable
    #[arg(short, long)]
    json: bool,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Args, Debug)]
struct RoundtripArgs {
    /// Source text, one display line per line
    #[arg(short, long)]
    source: String,

    /// Target text, one display line per line
    #[arg(short, long)]
    target: String,

    /// Output structured JSON instead of human-readable
    #[arg(short, long)]
    json: bool,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoadReport {
    annotation_id: Option<String>,
    rows: usize,
    #[serde(flatten)]
    lines: DisplayLines,
}

#[derive(Debug, Serialize)]
struct RoundtripReport {
    success: bool,
    rows: usize,
    source_checksum: String,
    target_checksum: String,
    reconstructed_source_checksum: String,
    reconstructed_target_checksum: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_mismatch: Option<usize>,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bitext_align=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Save(args) => run_save(args),
        Command::Load(args) => run_load(args),
        Command::Roundtrip(args) => run_roundtrip(args),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_save(args: SaveArgs) -> Result<bool> {
    let source = read_text(&args.source, TextLayout::Lines)
        .with_context(|| format!("Failed to read source '{}'", args.source))?;
    let target = read_text(&args.target, TextLayout::Lines)
        .with_context(|| format!("Failed to read target '{}'", args.target))?;

    let mode = if args.update { SaveMode::Update } else { SaveMode::Create };
    let data = bitext_align::save(&source.lines, &target.lines, SaveOptions { mode })
        .context("Failed to build annotation")?;

    let id = if args.id == "auto" { generate_annotation_id() } else { args.id };
    let stored = StoredAnnotation::new(id, data);
    tracing::info!(id = %stored.id, ?mode, rows = stored.data.alignment_annotation.len(), "saved alignment");

    write_output(&stored.to_json()?, args.output.as_ref())?;
    Ok(true)
}

/// Read an annotation file, accepting the stored envelope or the bare body
fn read_annotation(path: &str) -> Result<(Option<String>, AlignmentAnnotation)> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read annotation '{}'", path))?;

    parse_annotation(&json).with_context(|| format!("Failed to parse annotation '{}'", path))
}

fn run_load(args: LoadArgs) -> Result<bool> {
    let (annotation_id, annotation) = read_annotation(&args.annotation)?;

    let layout = if args.raw { TextLayout::Raw } else { TextLayout::Lines };
    let source = read_text(&args.source, layout)
        .with_context(|| format!("Failed to read source '{}'", args.source))?;
    let target = read_text(&args.target, layout)
        .with_context(|| format!("Failed to read target '{}'", args.target))?;

    let options = LoadOptions { fill_gaps: !args.no_fill_gaps };
    let loaded = bitext_align::load(&annotation, &source.content, &target.content, options)
        .context("Failed to load alignment")?;

    let output = if args.json {
        let report = LoadReport {
            annotation_id,
            rows: loaded.lines.len(),
            lines: loaded.lines,
        };
        serde_json::to_string_pretty(&report)?
    } else {
        format_columns(&loaded.lines)
    };

    write_output(&output, args.output.as_ref())?;
    Ok(true)
}

fn run_roundtrip(args: RoundtripArgs) -> Result<bool> {
    let source = read_text(&args.source, TextLayout::Lines)
        .with_context(|| format!("Failed to read source '{}'", args.source))?;
    let target = read_text(&args.target, TextLayout::Lines)
        .with_context(|| format!("Failed to read target '{}'", args.target))?;

    let annotation = bitext_align::save(&source.lines, &target.lines, SaveOptions { mode: SaveMode::Update })
        .context("Failed to build annotation")?;
    let loaded = bitext_align::load(&annotation, &source.content, &target.content, LoadOptions::default())
        .context("Failed to load alignment")?;

    let expected = DisplayLines::new(source.lines.clone(), target.lines.clone()).normalized();
    let actual = loaded.lines.normalized();
    let first_mismatch = (0..expected.len().max(actual.len())).find(|&row| {
        expected.source_lines.get(row) != actual.source_lines.get(row)
            || expected.target_lines.get(row) != actual.target_lines.get(row)
    });

    let report = RoundtripReport {
        success: first_mismatch.is_none(),
        rows: actual.len(),
        source_checksum: checksum(&expected.source_lines.join("\n")),
        target_checksum: checksum(&expected.target_lines.join("\n")),
        reconstructed_source_checksum: checksum(&actual.source_lines.join("\n")),
        reconstructed_target_checksum: checksum(&actual.target_lines.join("\n")),
        first_mismatch,
    };

    let output = if args.json {
        serde_json::to_string_pretty(&report)?
    } else if let Some(row) = report.first_mismatch {
        format!("Round trip failed at row {}", row)
    } else {
        format!(
            "Round trip OK: {} row(s)\nSource checksum: {}\nTarget checksum: {}",
            report.rows, report.source_checksum, report.target_checksum
        )
    };

    write_output(&output, args.output.as_ref())?;
    Ok(report.success)
}

/// Render the two columns side by side
fn format_columns(lines: &DisplayLines) -> String {
    lines
        .source_lines
        .iter()
        .zip(&lines.target_lines)
        .map(|(source, target)| format!("{} | {}", source, target))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write to file or stdout
fn write_output(output: &str, output_path: Option<&String>) -> Result<()> {
    if let Some(path) = output_path {
        fs::write(path, output).with_context(|| format!("Failed to write output to '{}'", path))?;
    } else {
        println!("{}", output);
    }
    Ok(())
}
