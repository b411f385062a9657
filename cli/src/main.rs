//! docunit CLI - OCR normalization and extraction confidence tool

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docunit::normalize::LayoutMode;
use docunit::{
    origin_of, read_pages, render, score_with_logprobs, ExtractionResult, JsonFormat, LogProbs,
    NormalizeOptions, Normalizer, PageInput, ScoreOptions,
};

#[derive(Parser)]
#[command(name = "docunit")]
#[command(version)]
#[command(about = "Normalize OCR block graphs into document units and score extractions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize OCR responses into document units
    Normalize {
        /// OCR response files (one page each, or an array of pages)
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Origin recorded on every unit (defaults to each file name)
        #[arg(long, env = "DOCUNIT_ORIGIN")]
        origin: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "jsonl")]
        format: OutputFormat,

        /// Normalize pages one at a time
        #[arg(long)]
        sequential: bool,

        /// Join lines with spaces instead of newlines
        #[arg(long)]
        single_line: bool,

        /// Minimum table coverage for dropping a text block
        #[arg(long, default_value = "0.2")]
        coverage: f64,
    },

    /// Build an extraction request body
    Request {
        /// OCR response files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Field names to extract
        #[arg(short, long = "field", value_name = "NAME", required = true)]
        fields: Vec<String>,

        /// Free-text notes for the extraction step
        #[arg(long)]
        notes: Option<String>,

        /// Send records as one JSON Lines string
        #[arg(long)]
        text_records: bool,

        /// Origin recorded on every unit (defaults to each file name)
        #[arg(long, env = "DOCUNIT_ORIGIN")]
        origin: Option<String>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Recompute extraction confidences from token log-probabilities
    Score {
        /// Extraction result JSON
        #[arg(value_name = "EXTRACTION")]
        extraction: PathBuf,

        /// Log-probability JSON ({"content": [...]} or a token array)
        #[arg(long, value_name = "FILE")]
        logprobs: PathBuf,

        /// Raw completion text (defaults to the concatenated tokens)
        #[arg(long, value_name = "FILE")]
        completion: Option<PathBuf>,

        /// Value reported for fields that were not found
        #[arg(long, default_value = "NOT_FOUND", env = "DOCUNIT_NOT_FOUND")]
        not_found: String,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show document statistics
    Info {
        /// OCR response files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One unit per line
    Jsonl,
    /// Pretty-printed document JSON
    Json,
    /// Compact document JSON
    Compact,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Normalize {
            inputs,
            output,
            origin,
            format,
            sequential,
            single_line,
            coverage,
        }) => {
            let options = NormalizeOptions::new()
                .with_coverage_threshold(coverage)
                .with_multiline(!single_line)
                .with_parallel(!sequential);
            cmd_normalize(&inputs, output.as_deref(), origin.as_deref(), format, options)
        }
        Some(Commands::Request {
            inputs,
            fields,
            notes,
            text_records,
            origin,
            output,
        }) => cmd_request(
            &inputs,
            &fields,
            notes.as_deref(),
            text_records,
            origin.as_deref(),
            output.as_deref(),
        ),
        Some(Commands::Score {
            extraction,
            logprobs,
            completion,
            not_found,
            output,
        }) => cmd_score(
            &extraction,
            &logprobs,
            completion.as_deref(),
            &not_found,
            output.as_deref(),
        ),
        Some(Commands::Info { inputs }) => cmd_info(&inputs),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: docunit <COMMAND> [OPTIONS]".yellow());
            println!("       docunit --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Read every input file into pages, with a progress bar.
fn load_pages(
    inputs: &[PathBuf],
    origin: Option<&str>,
) -> Result<Vec<PageInput>, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut pages = Vec::new();
    for input in inputs {
        pb.set_message(origin_of(input));
        let mut file_pages = read_pages(input)?;
        if let Some(origin) = origin {
            for page in &mut file_pages {
                page.origin = origin.to_string();
            }
        }
        pages.extend(file_pages);
        pb.inc(1);
    }
    pb.finish_and_clear();

    log::debug!("loaded {} pages from {} files", pages.len(), inputs.len());
    Ok(pages)
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        eprintln!("{} {}", "Saved to".green(), path.display());
    } else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        if !content.ends_with('\n') {
            writeln!(stdout)?;
        }
    }
    Ok(())
}

fn cmd_normalize(
    inputs: &[PathBuf],
    output: Option<&Path>,
    origin: Option<&str>,
    format: OutputFormat,
    options: NormalizeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let pages = load_pages(inputs, origin)?;
    let doc = Normalizer::with_options(options).normalize_document(&pages);

    let content = match format {
        OutputFormat::Jsonl => render::to_jsonl(&doc.units),
        OutputFormat::Json => render::to_json(&doc, JsonFormat::Pretty)?,
        OutputFormat::Compact => render::to_json(&doc, JsonFormat::Compact)?,
    };
    write_output(output, &content)
}

fn cmd_request(
    inputs: &[PathBuf],
    fields: &[String],
    notes: Option<&str>,
    text_records: bool,
    origin: Option<&str>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let pages = load_pages(inputs, origin)?;
    let units = Normalizer::new().normalize_pages(&pages);

    let body = if text_records {
        serde_json::to_string_pretty(&render::build_text_request(&units, fields, notes))?
    } else {
        serde_json::to_string_pretty(&render::build_request(&units, fields, notes))?
    };
    write_output(output, &body)
}

fn cmd_score(
    extraction: &Path,
    logprobs: &Path,
    completion: Option<&Path>,
    not_found: &str,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut result: ExtractionResult = serde_json::from_str(&fs::read_to_string(extraction)?)?;

    let payload: serde_json::Value = serde_json::from_str(&fs::read_to_string(logprobs)?)?;
    let logprobs = LogProbs::from_value(payload)
        .ok_or_else(|| format!("{}: not a log-probability payload", logprobs.display()))?;

    let completion = completion.map(fs::read_to_string).transpose()?;
    let options = ScoreOptions::new().with_not_found_marker(not_found);

    let summary = score_with_logprobs(&mut result, completion.as_deref(), &logprobs, &options);
    eprintln!(
        "{} {} scored, {} not found, {} unlocated, {} without signal",
        "Fields:".cyan().bold(),
        summary.scored.to_string().green(),
        summary.not_found,
        summary.unlocated,
        summary.unscored
    );

    write_output(output, &serde_json::to_string_pretty(&result)?)
}

fn cmd_info(inputs: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    let pages = load_pages(inputs, None)?;
    let normalizer = Normalizer::new();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for input in inputs {
        println!("{}: {}", "File".bold(), input.display());
    }
    println!("{}: {}", "Pages".bold(), pages.len());

    println!();
    println!("{}", "Pages".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let mut layout_pages = 0;
    for page in &pages {
        let result = normalizer.process_page(page);
        if result.mode == LayoutMode::Layout {
            layout_pages += 1;
        }
        let tables = result.units.iter().filter(|u| u.is_table()).count();
        println!(
            "  {} {} p.{}: {} blocks, {} mode, {} units ({} tables)",
            "├─".dimmed(),
            page.origin,
            page.page,
            page.blocks.len(),
            result.mode.as_str(),
            result.units.len(),
            tables
        );
    }

    let doc = normalizer.normalize_document(&pages);

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let text = doc.plain_text();
    println!("{}: {}", "Layout pages".bold(), layout_pages);
    println!("{}: {}", "Text units".bold(), doc.metadata.text_units);
    println!("{}: {}", "Table units".bold(), doc.metadata.table_units);
    println!("{}: {}", "Words".bold(), text.split_whitespace().count());
    println!("{}: {}", "Characters".bold(), text.chars().count());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docunit".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("OCR normalization and extraction confidence tool");
    println!();
    println!("License: MIT");
}
