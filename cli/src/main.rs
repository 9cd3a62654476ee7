//! redocx CLI - batch reformatting of templated Word submissions

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use redocx::{
    BatchProcessor, BatchSummary, FileEvent, ImageStrategy, Placement, ReformatOptions,
    Reformatter,
};

#[derive(Parser)]
#[command(name = "redocx")]
#[command(version)]
#[command(about = "Reformat templated Word submissions into a standard layout", long_about = None)]
struct Cli {
    /// Input folder
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output folder (defaults to the input folder)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reformat every .docx file of a folder
    Process {
        /// Input folder
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[command(flatten)]
        args: ProcessArgs,
    },

    /// Show what a file would produce without writing anything
    Inspect {
        /// Input .docx file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// JSON configuration file
        #[arg(long, value_name = "FILE", env = "REDOCX_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args, Default)]
struct ProcessArgs {
    /// Output folder (defaults to the input folder)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, value_name = "FILE", env = "REDOCX_CONFIG")]
    config: Option<PathBuf>,

    /// Campaign suffix used in output file names
    #[arg(long)]
    suffix: Option<String>,

    /// Subtitle placed under the title
    #[arg(long)]
    subtitle: Option<String>,

    /// Identifier prefix
    #[arg(long, value_name = "DIGITS")]
    prefix: Option<String>,

    /// How pictures are located
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
    /// Folder in which the run creates its picture folder (the system temporary location by default)
    /// Scratch folder for pictures (a temporary folder by default)
    #[arg(long, value_name = "DIR")]
    scratch_dir: Option<PathBuf>,

    /// Do not copy failed files into the failed folder
    #[arg(long)]
    no_failed_copy: bool,

    /// Write a JSON summary to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Pictures referenced from runs, in document order
    Runs,
    /// Picture relationships, in package order
    Relationships,
}

impl From<StrategyArg> for ImageStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Runs => ImageStrategy::Runs,
            StrategyArg::Relationships => ImageStrategy::Relationships,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Process { input, args }) => cmd_process(&input, args),
        Some(Commands::Inspect {
            input,
            json,
            config,
        }) => cmd_inspect(&input, json, config.as_deref()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(input) = cli.input {
                let args = ProcessArgs {
                    output: cli.output,
                    ..Default::default()
                };
                cmd_process(&input, args)
            } else {
                println!("{}", "Usage: redocx <INPUT> [OUTPUT]".yellow());
                println!("       redocx --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_options(config: Option<&Path>) -> Result<ReformatOptions, Box<dyn std::error::Error>> {
    Ok(match config {
        Some(path) => {
            log::debug!("loading configuration from {}", path.display());
            ReformatOptions::from_json_file(path)?
        }
        None => ReformatOptions::default(),
    })
}

fn cmd_process(input: &Path, args: ProcessArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = load_options(args.config.as_deref())?;
    if let Some(suffix) = args.suffix {
        options = options.with_suffix(suffix);
    }
    if let Some(subtitle) = args.subtitle {
        options = options.with_subtitle(subtitle);
    }
    if let Some(prefix) = args.prefix {
        options = options.with_identifier_prefix(prefix);
    }
    if let Some(strategy) = args.strategy {
        options = options.with_image_strategy(strategy.into());
    }
    if let Some(dir) = args.scratch_dir {
        options = options.with_scratch_dir(dir);
    }
    if args.no_failed_copy {
        options = options.with_failure_collection(false);
    }

    let output_dir = args.output.unwrap_or_else(|| input.to_path_buf());
    let total = BatchProcessor::candidates(input)?.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let handle = BatchProcessor::new(options)?.spawn(input, &output_dir);
    for event in handle.events().iter() {
        print_event(&pb, &event);
    }
    let summary = handle.join()?;
    pb.finish_and_clear();

    print_summary(&summary, &output_dir);

    if let Some(path) = args.report {
        fs::write(&path, serde_json::to_string_pretty(&summary)?)?;
        println!("{} {}", "Report saved to".green(), path.display());
    }

    Ok(())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_event(pb: &ProgressBar, event: &FileEvent) {
    match event {
        FileEvent::Started { path, .. } => pb.set_message(file_label(path)),
        FileEvent::Warning { message, .. } => {
            pb.println(format!("  {} {}", "!".yellow().bold(), message.yellow()));
        }
        FileEvent::Saved { output, .. } => {
            pb.println(format!("{} {}", "✓".green().bold(), file_label(output)));
            pb.inc(1);
        }
        FileEvent::Failed { path, message, .. } => {
            pb.println(format!(
                "{} {}: {}",
                "×".red().bold(),
                file_label(path),
                message.red()
            ));
            pb.inc(1);
        }
    }
}

fn print_summary(summary: &BatchSummary, output_dir: &Path) {
    println!();
    println!("{}", "Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Files".bold(), summary.total);
    println!(
        "{}: {} ({} with pictures, {} without)",
        "Saved".bold(),
        summary.succeeded.to_string().green(),
        summary.with_images,
        summary.without_images
    );
    println!("{}: {}", "Warnings".bold(), summary.warnings.to_string().yellow());
    println!("{}: {}", "Failed".bold(), summary.failed.to_string().red());
    if summary.cancelled {
        println!("{}", "Stopped before all files were processed".yellow());
    }
    if let Some(secs) = summary.elapsed_secs() {
        println!("{}: {:.1}s", "Time".bold(), secs);
    }

    println!();
    println!("{} {}", "Output:".green().bold(), output_dir.display());
    println!("  {} {}/", "├─".dimmed(), Placement::Success);
    println!("  {} {}/", "├─".dimmed(), Placement::NoImageSuccess);
    println!("  {} failed/", "└─".dimmed());
}

fn cmd_inspect(
    input: &Path,
    json: bool,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = load_options(config)?;
    let info = Reformatter::new(options)?.inspect(input)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    let missing = "(not found)".red().to_string();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!(
        "{}: {}",
        "Author".bold(),
        info.author.clone().unwrap_or_else(|| missing.clone())
    );
    println!(
        "{}: {}",
        "Title".bold(),
        info.title.clone().unwrap_or_else(|| missing.clone())
    );
    println!("{}: {}", "Paragraphs".bold(), info.paragraph_count);
    println!(
        "{}: {}",
        "Pictures".bold(),
        if info.has_images {
            info.image_count.to_string()
        } else {
            "none".yellow().to_string()
        }
    );
    if let Some(name) = &info.output_name {
        println!("{}: {}", "Output".bold(), name);
    }

    println!();
    println!("{}", "Body".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for text in info.classification.body() {
        println!("{}", text);
    }

    for warning in &info.warnings {
        println!("{} {}", "!".yellow().bold(), warning.yellow());
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "redocx".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Batch reformatting of templated Word submissions");
    println!();
    println!("License: MIT");
}
