//! docsect CLI - heading outlines and persona-ranked sections

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docsect::render::{outline_to_text, to_json};
use docsect::{
    discover_documents, BatchResult, DecoderRegistry, JsonFormat, Pipeline, PipelineOptions,
    StrategyKind,
};

#[derive(Parser)]
#[command(name = "docsect")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract heading outlines and persona-ranked sections from PDFs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a title + outline JSON for every document in a directory
    Outline {
        /// Directory of input documents
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Directory for <name>.json outlines
        #[arg(value_name = "OUTPUT_DIR")]
        output: PathBuf,

        /// JSON configuration file
        #[arg(short, long, value_name = "FILE", env = "DOCSECT_CONFIG")]
        config: Option<PathBuf>,

        /// Heading strategy (overrides the configuration file)
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,

        /// Also print each outline as a tree
        #[arg(short, long)]
        print: bool,

        /// Process documents one at a time
        #[arg(long)]
        sequential: bool,
    },

    /// Rank sections from every document against a persona and task
    Rank {
        /// Directory of input documents
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Who is reading, e.g. "Travel planner"
        #[arg(long)]
        persona: String,

        /// What they need done, e.g. "Plan a 4-day trip"
        #[arg(long)]
        task: String,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Number of sections to report
        #[arg(long, value_name = "K")]
        top_k: Option<usize>,

        /// JSON configuration file
        #[arg(short, long, value_name = "FILE", env = "DOCSECT_CONFIG")]
        config: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Bold, well-spaced, aligned lines ranked by size
    Style,
    /// Every line above body size ranked by size
    FontRank,
    /// Numbered lines levelled by numbering depth
    Numbering,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Style => StrategyKind::Style,
            StrategyArg::FontRank => StrategyKind::FontRank,
            StrategyArg::Numbering => StrategyKind::Numbering,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Outline {
            input,
            output,
            config,
            strategy,
            print,
            sequential,
        } => cmd_outline(
            &input,
            &output,
            config.as_deref(),
            strategy,
            print,
            sequential,
        ),
        Commands::Rank {
            input,
            persona,
            task,
            output,
            top_k,
            config,
            compact,
        } => cmd_rank(
            &input,
            &persona,
            &task,
            output.as_deref(),
            top_k,
            config.as_deref(),
            compact,
        ),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_options(config: Option<&Path>) -> Result<PipelineOptions, Box<dyn std::error::Error>> {
    match config {
        Some(path) => {
            log::debug!("Loading configuration from {}", path.display());
            Ok(PipelineOptions::from_json_file(path)?)
        }
        None => Ok(PipelineOptions::default()),
    }
}

fn find_inputs(
    input: &Path,
    registry: &DecoderRegistry,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let paths = discover_documents(input, registry)?;
    if paths.is_empty() {
        return Err(docsect::Error::NoInputDocuments(input.display().to_string()).into());
    }
    Ok(paths)
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn report_failures(batch: &BatchResult) {
    for failure in &batch.failures {
        eprintln!(
            "  {} {}: {}",
            "✗".red(),
            failure.document.red(),
            failure.error
        );
    }
}

/// Ranking needs at least one section across the batch.
fn require_sections(batch: &BatchResult, input: &Path) -> docsect::Result<()> {
    if batch.section_count() == 0 {
        return Err(docsect::Error::NoSections(input.display().to_string()));
    }
    Ok(())
}

fn cmd_outline(
    input: &Path,
    output: &Path,
    config: Option<&Path>,
    strategy: Option<StrategyArg>,
    print: bool,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = load_options(config)?;
    if let Some(strategy) = strategy {
        options.classifier.strategy = strategy.into();
    }
    if sequential {
        options = options.sequential();
    }

    let pipeline = Pipeline::builder().with_options(options).build()?;
    let paths = find_inputs(input, pipeline.registry())?;
    fs::create_dir_all(output)?;

    let pb = spinner(&format!("Extracting outlines from {} documents...", paths.len()));
    let batch = pipeline.process_batch(&paths);
    pb.finish_and_clear();

    for doc in &batch.documents {
        let structure = &doc.structure;
        let stem = Path::new(&structure.document)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| structure.document.clone());
        let target = output.join(format!("{}.json", stem));
        fs::write(&target, to_json(&structure.report(), JsonFormat::Pretty)?)?;

        println!(
            "  {} {} {} ({} headings)",
            "✓".green(),
            structure.document,
            "→".dimmed(),
            structure.outline.len()
        );
        if print {
            for row in outline_to_text(&structure.outline).lines() {
                println!("    {}", row.dimmed());
            }
        }
    }
    report_failures(&batch);

    println!(
        "\n{} {} written, {} failed",
        "Done!".green().bold(),
        batch.documents.len(),
        batch.failures.len()
    );

    Ok(())
}

fn cmd_rank(
    input: &Path,
    persona: &str,
    task: &str,
    output: Option<&Path>,
    top_k: Option<usize>,
    config: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = load_options(config)?;
    if let Some(k) = top_k {
        options.rank.top_k = k;
    }

    let pipeline = Pipeline::builder().with_options(options).build()?;
    let paths = find_inputs(input, pipeline.registry())?;

    let pb = spinner(&format!("Segmenting {} documents...", paths.len()));
    let batch = pipeline.process_batch(&paths);
    if let Err(e) = require_sections(&batch, input) {
        pb.finish_and_clear();
        report_failures(&batch);
        return Err(e.into());
    }
    pb.set_message(format!("Ranking {} sections...", batch.section_count()));
    let report = pipeline.persona_report(&batch, persona, task, chrono::Utc::now());
    pb.finish_and_clear();
    report_failures(&batch);
    let report = report?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = to_json(&report, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!(
            "{} {} ({} sections)",
            "Saved to".green(),
            path.display(),
            report.extracted_sections.len()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docsect".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Heading outline and persona-ranked section extraction");
    println!();
    println!(
        "Decoders: {}",
        DecoderRegistry::with_defaults().supported_extensions().join(", ")
    );
    println!("License: MIT");
}
