//! Porto CLI binary.
//!
//! Provides the command-line interface for the Porto factor panel.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use porto::data::{CsvProvider, DateRange, ExchangeMap, MarketDataProvider, SqliteProvider};
use porto::factors::available_factors;
use porto::output::{ExportFormat, Exporter, RegressionReport};
use porto::{Analysis, PipelineConfig, PipelineObserver, StageReport, TracingObserver};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "porto")]
#[command(about = "Porto: annual factor panel and forward-return regression", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the factor panel of a country and regress forward returns on it
    Analyze {
        /// Country whose exchanges are analyzed
        #[arg(long)]
        country: String,

        /// First date of the sample (YYYY-MM-DD, exclusive for prices)
        #[arg(long)]
        start: NaiveDate,

        /// Last date of the sample (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,

        /// CSV file mapping exchange codes to countries
        #[arg(long)]
        exchanges: PathBuf,

        /// Daily price CSV
        #[arg(long, requires = "fundamentals", conflicts_with = "database")]
        prices: Option<PathBuf>,

        /// Annual statement CSV
        #[arg(long, requires = "prices")]
        fundamentals: Option<PathBuf>,

        /// SQLite database holding the raw price and statement tables
        #[arg(long, required_unless_present = "prices")]
        database: Option<PathBuf>,

        /// JSON pipeline configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format of the regression summary
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write the summary to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the normalized panel to this file (.csv or .json)
        #[arg(long)]
        panel_output: Option<PathBuf>,
    },

    /// List the exchange-to-country mapping
    Exchanges {
        /// CSV file mapping exchange codes to countries
        #[arg(long)]
        exchanges: PathBuf,

        /// Only show this country
        #[arg(long)]
        country: Option<String>,
    },

    /// List the factor calculators and their panel columns
    Factors,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Markdown,
    Json,
    Csv,
}

/// Shows the current stage on a spinner and forwards to tracing.
struct SpinnerObserver {
    spinner: ProgressBar,
}

impl SpinnerObserver {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.green} [{elapsed}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message("Fetching data...");
        Self { spinner }
    }

    fn finish(&self, message: &str) {
        self.spinner.finish_with_message(message.to_string());
    }
}

impl PipelineObserver for SpinnerObserver {
    fn on_stage(&mut self, report: &StageReport) {
        TracingObserver.on_stage(report);
        self.spinner
            .set_message(format!("{} done ({} rows)", report.stage, report.rows));
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "porto=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            country,
            start,
            end,
            exchanges,
            prices,
            fundamentals,
            database,
            config,
            format,
            output,
            panel_output,
        } => {
            let provider: Box<dyn MarketDataProvider> = match (prices, fundamentals, database) {
                (Some(prices), Some(fundamentals), _) => {
                    Box::new(CsvProvider::new(prices, fundamentals))
                }
                (_, _, Some(database)) => Box::new(SqliteProvider::new(database)?),
                _ => return Err("either --prices with --fundamentals or --database is required".into()),
            };
            let config = match config {
                Some(path) => PipelineConfig::from_json_path(path)?,
                None => PipelineConfig::default(),
            };
            let range = DateRange::new(start, end)?;
            let map = ExchangeMap::from_csv_path(exchanges)?;

            let analysis = analyze(provider.as_ref(), &map, &country, range, &config)?;
            write_summary(&analysis, &country, range, format, output.as_deref())?;
            if let Some(path) = panel_output {
                let format = ExportFormat::from_path(&path).unwrap_or(ExportFormat::Csv);
                analysis.panel.export_to_file(&path, format)?;
                tracing::info!(path = %path.display(), rows = analysis.panel.len(), "panel written");
            }
        }
        Commands::Exchanges { exchanges, country } => {
            let map = ExchangeMap::from_csv_path(exchanges)?;
            list_exchanges(&map, country.as_deref())?;
        }
        Commands::Factors => list_factors(),
    }

    Ok(())
}

fn analyze(
    provider: &dyn MarketDataProvider,
    map: &ExchangeMap,
    country: &str,
    range: DateRange,
    config: &PipelineConfig,
) -> Result<Analysis, Box<dyn std::error::Error>> {
    let mut observer = SpinnerObserver::new();
    match porto::analyze_country(provider, map, country, range, config, &mut observer) {
        Ok(analysis) => {
            observer.finish(&format!(
                "Fitted {} observations ({} panel rows)",
                analysis.summary().observations,
                analysis.panel.len()
            ));
            Ok(analysis)
        }
        Err(e) => {
            observer.finish("Failed!");
            Err(e.into())
        }
    }
}

fn write_summary(
    analysis: &Analysis,
    country: &str,
    range: DateRange,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let summary = analysis.summary();
    let report = RegressionReport::new(country, summary).with_period(range.start(), range.end());
    let content = match format {
        OutputFormat::Text => format!(
            "{}\nStages:\n{}",
            report.to_ascii_table(),
            analysis.report
        ),
        OutputFormat::Markdown => report.to_markdown(),
        OutputFormat::Json => summary.export_to_string(ExportFormat::PrettyJson)?,
        OutputFormat::Csv => summary.export_to_string(ExportFormat::Csv)?,
    };

    match output {
        Some(path) => std::fs::write(path, content)?,
        None => print!("{content}"),
    }
    Ok(())
}

fn list_exchanges(map: &ExchangeMap, country: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    match country {
        Some(country) => {
            println!("{country}:");
            for exchange in map.exchanges_for(country)? {
                println!("  {exchange}");
            }
        }
        None => {
            println!("{:<10} Country", "Exchange");
            println!("{}", "-".repeat(40));
            for entry in map.entries() {
                println!("{:<10} {}", entry.exchange, entry.country);
            }
        }
    }
    Ok(())
}

fn list_factors() {
    println!("Factors:");
    println!("========\n");

    for info in available_factors() {
        let columns: Vec<&str> = info.columns().iter().map(|c| c.name()).collect();
        println!("{:<12} {}", info.name, info.description);
        println!("{:<12} inputs: {}", "", info.inputs.join(", "));
        println!("{:<12} columns: {}\n", "", columns.join(", "));
    }
}
