//! Record Dedupe CLI
//!
//! Command-line tool for finding fuzzy duplicate records in CSV tables.

use clap::{Parser, Subcommand};
use dedupe_core::{parse_csv, DedupeConfig, DedupeOutcome, Deduplicator, JSON_REPORT_FILE_NAME};
use env_logger::Env;
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "dedupe-cli")]
#[command(about = "Find duplicate records with fuzzy field matching", long_about = None)]
#[command(version)]
struct Cli {
    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find duplicate groups and write the summary and detail reports
    Find {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Configuration file (JSON); defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the similarity threshold
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Directory for the report files
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Output format
        #[arg(long, default_value = "csv", value_parser = ["csv", "json"])]
        format: String,
    },

    /// Show the columns and first rows of a CSV file
    Inspect {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Maximum number of rows to display
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Explain the similarity score of two records
    Score {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Index of the first record (0-based)
        #[arg(short)]
        a: usize,

        /// Index of the second record (0-based)
        #[arg(short)]
        b: usize,

        /// Configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write the default configuration to a file
    InitConfig {
        /// Output path for the configuration file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> dedupe_core::Result<()> {
    match command {
        Commands::Find {
            input,
            config,
            threshold,
            output_dir,
            format,
        } => cmd_find(&input, config.as_deref(), threshold, &output_dir, &format),
        Commands::Inspect { input, limit } => cmd_inspect(&input, limit),
        Commands::Score {
            input,
            a,
            b,
            config,
        } => cmd_score(&input, a, b, config.as_deref()),
        Commands::InitConfig { output } => cmd_init_config(&output),
    }
}

fn load_config(path: Option<&Path>) -> dedupe_core::Result<DedupeConfig> {
    match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            DedupeConfig::load(path)
        }
        None => Ok(DedupeConfig::default()),
    }
}

fn cmd_find(
    input: &Path,
    config_path: Option<&Path>,
    threshold: Option<f64>,
    output_dir: &Path,
    format: &str,
) -> dedupe_core::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(threshold) = threshold {
        config.threshold = threshold;
    }

    let dedupe = Deduplicator::new(config)?;
    let table = parse_csv(input)?;
    let outcome = dedupe.run(&table)?;

    let report = match outcome {
        DedupeOutcome::NoDuplicates(stats) => {
            println!(
                "No duplicates found among {} records ({} pairs compared)",
                stats.record_count, stats.pairs_compared
            );
            return Ok(());
        }
        DedupeOutcome::Duplicates(report) => report,
    };

    println!("Found {} duplicate groups", report.stats.group_count);
    println!("Total records with duplicates: {}", report.stats.records_in_groups);

    match format {
        "json" => {
            std::fs::create_dir_all(output_dir)?;
            let path = output_dir.join(JSON_REPORT_FILE_NAME);
            report.write_json(&path)?;
            println!("Results saved to '{}'", path.display());
        }
        _ => {
            let (summary, details) = report.write_csv_files(output_dir)?;
            println!(
                "Results saved to '{}' and '{}'",
                summary.display(),
                details.display()
            );
        }
    }

    Ok(())
}

fn cmd_inspect(input: &Path, limit: usize) -> dedupe_core::Result<()> {
    let table = parse_csv(input)?;

    println!("File: {}", input.display());
    println!("Columns: {}", table.column_count());
    println!("Rows: {}", table.row_count());
    println!();

    let header = table.column_names();
    println!("{}", header.join("\t"));
    println!("{}", "-".repeat(header.len() * 12));

    for row in table.rows.iter().take(limit) {
        let values: Vec<String> = row.cells.iter().map(|c| c.to_string_value()).collect();
        println!("{}", values.join("\t"));
    }

    if table.row_count() > limit {
        println!("... ({} more rows)", table.row_count() - limit);
    }

    Ok(())
}

fn cmd_score(
    input: &Path,
    a: usize,
    b: usize,
    config_path: Option<&Path>,
) -> dedupe_core::Result<()> {
    let dedupe = Deduplicator::new(load_config(config_path)?)?;
    let table = parse_csv(input)?;
    let (score, parts) = dedupe.explain(&table, a, b)?;

    println!("Records: {} and {}", a, b);
    println!();
    for part in &parts {
        println!(
            "  {:<16} {:>6.1} x {:.2} = {:.4}   '{}' vs '{}'",
            part.field, part.ratio, part.weight, part.contribution, part.left, part.right
        );
    }
    println!();

    let threshold = dedupe.config().threshold;
    let verdict = if score > threshold { "duplicate" } else { "distinct" };
    println!("Score: {:.4} (threshold {}) -> {}", score, threshold, verdict);

    Ok(())
}

fn cmd_init_config(output: &Path) -> dedupe_core::Result<()> {
    let config = DedupeConfig::default();
    config.save(output)?;

    println!("Created config file: {}", output.display());
    println!("Threshold: {}", config.threshold);
    println!("Fields: {}", config.field_names().join(", "));
    println!();
    println!("Edit the file to adjust weights, then run:");
    println!(
        "  dedupe-cli find --input <csv> --config {}",
        output.display()
    );

    Ok(())
}
