use std::path::PathBuf;
use structopt::StructOpt;

use authlens::aggregator::LoginAggregator;
use authlens::classifier::LineClassifier;
use authlens::config::Config;
use authlens::input;
use authlens::output::{self, OutputFormat, ReportWriter};

/// SSH login audit command line interface
#[derive(StructOpt, Debug)]
#[structopt(name = "authlens", about = "SSH login statistics from auth logs")]
pub enum Cli {
    /// Aggregate auth logs and print per-user login statistics
    Report {
        /// Path to configuration file
        #[structopt(short, long, default_value = "config.toml")]
        config: PathBuf,
        /// Also write the complete login history to the configured export path
        #[structopt(short, long)]
        export: bool,
    },
    /// Generate a default configuration file
    Config {
        /// Output path for the configuration file
        #[structopt(short, long, default_value = "config.toml")]
        output: PathBuf,
    },
    /// Classify and display login events from a single log file
    Classify {
        /// Path to log file
        #[structopt(short, long)]
        file: PathBuf,
        /// Number of events to display
        #[structopt(short, long, default_value = "10")]
        lines: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::from_args();

    match cli {
        Cli::Report { config, export } => {
            let config = if config.exists() {
                Config::from_file(&config)?
            } else {
                log::warn!("Config file not found, using defaults");
                Config::default()
            };
            run_report(&config, export)?;
        }
        Cli::Config { output } => {
            let config = Config::default();
            config.to_file(&output)?;
            println!("Default configuration written to: {:?}", output);
        }
        Cli::Classify { file, lines } => {
            if !file.exists() {
                eprintln!("File not found: {:?}", file);
                std::process::exit(1);
            }

            let classifier = LineClassifier::new();
            let events: Vec<_> = input::read_lines(&file)?
                .iter()
                .filter_map(|line| classifier.classify(line))
                .collect();
            let display_count = std::cmp::min(lines, events.len());

            println!("Classified {} event(s) (showing {}):\n", events.len(), display_count);
            for event in events.iter().take(display_count) {
                println!(
                    "  User: {}, IP: {}, port: {}, result: {}, time: {}",
                    event.username,
                    event.source_ip,
                    event.port,
                    event.outcome.label(),
                    event.timestamp.format("%m-%d %H:%M:%S")
                );
            }
        }
    }

    Ok(())
}

/// Run the whole pipeline: discover sources, classify every line,
/// aggregate per user, print the report, optionally export.
fn run_report(config: &Config, export: bool) -> Result<(), Box<dyn std::error::Error>> {
    let classifier = LineClassifier::new();
    let mut aggregator = LoginAggregator::new();

    let paths = input::discover_log_files(&config.input.log_dir, &config.input.file_prefix);
    if paths.is_empty() {
        log::warn!(
            "no log files matching {}* under {}",
            config.input.file_prefix,
            config.input.log_dir.display()
        );
    }

    let recorded = input::ingest(&paths, &classifier, &mut aggregator);
    log::info!("{} login event(s) from {} file(s)", recorded, paths.len());

    let format = OutputFormat::from_str(&config.report.format);
    let stdout = std::io::stdout();
    let mut writer = ReportWriter::new(format, stdout.lock());
    writer.write_report(&aggregator, config.report.recent_limit)?;

    if export {
        output::export_full_history(&aggregator, &config.export.file_path)?;
        println!("Full login history written to: {:?}", config.export.file_path);
    }

    Ok(())
}
