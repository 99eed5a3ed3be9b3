use std::path::{Path, PathBuf};
use structopt::StructOpt;

use access_sentinel::config::Config;
use access_sentinel::input::{LogFileReader, LogGenerator};
use access_sentinel::output::{self, AlertSink, OutputFormat};
use access_sentinel::{ActivityDetector, Analyzer, LineParser, SentinelError};

/// Access-log security analyser command line interface
#[derive(StructOpt, Debug)]
#[structopt(name = "sentinel", about = "Flags brute force, sensitive path access and probing in access logs")]
pub enum Cli {
    /// Analyse an access log and report alerts
    Analyze {
        /// Path to an existing access log
        #[structopt(long)]
        logfile: Option<PathBuf>,
        /// Generate a synthetic access log and analyse it
        #[structopt(long)]
        generate: bool,
        /// Where the synthetic log is written
        #[structopt(long, default_value = "access.log")]
        generate_output: PathBuf,
        /// Number of lines for the synthetic log
        #[structopt(long)]
        lines: Option<usize>,
        /// Path to configuration file
        #[structopt(short, long)]
        config: Option<PathBuf>,
        /// Write parsed records as JSON to this path
        #[structopt(long)]
        json_output: Option<PathBuf>,
        /// Write the text report to this path
        #[structopt(long)]
        report: Option<PathBuf>,
        /// Append alerts to this file instead of printing them
        #[structopt(long)]
        alert_log: Option<PathBuf>,
        /// Failures from one address that raise a brute-force alert
        #[structopt(long)]
        threshold: Option<usize>,
        /// Brute-force window in minutes
        #[structopt(long)]
        window_minutes: Option<i64>,
    },
    /// Write a synthetic access log
    Generate {
        /// Output path for the log
        #[structopt(short, long, default_value = "access.log")]
        output: PathBuf,
        /// Number of lines to generate
        #[structopt(short, long, default_value = "50")]
        lines: usize,
    },
    /// Generate a default configuration file
    Config {
        /// Output path for the configuration file
        #[structopt(short, long, default_value = "config.toml")]
        output: PathBuf,
    },
    /// Parse and display records from a file
    Parse {
        /// Path to log file
        #[structopt(short, long)]
        file: PathBuf,
        /// Number of records to show
        #[structopt(short, long, default_value = "10")]
        lines: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::from_args();

    match cli {
        Cli::Analyze {
            logfile,
            generate,
            generate_output,
            lines,
            config,
            json_output,
            report,
            alert_log,
            threshold,
            window_minutes,
        } => {
            let mut config = match config {
                Some(path) => match Config::from_file(&path) {
                    Ok(config) => config,
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                },
                None => Config::default(),
            };

            if let Some(lines) = lines {
                config.input.generate_lines = lines;
            }
            if let Some(threshold) = threshold {
                config.detection.failure_threshold = threshold;
            }
            if let Some(window) = window_minutes {
                config.detection.window_minutes = window;
            }
            if json_output.is_some() {
                config.output.records_json = json_output;
            }
            if report.is_some() {
                config.output.report_path = report;
            }
            if alert_log.is_some() {
                config.output.alert_log = alert_log;
            }
            if let Err(e) = config.validate() {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }

            let file_path = match resolve_input(logfile, generate, generate_output, &config) {
                Ok(InputSource::Existing(path)) => path,
                Ok(InputSource::Generate(path)) => {
                    println!(
                        "Generating {} synthetic line(s) in {:?}",
                        config.input.generate_lines, path
                    );
                    LogGenerator::new(rand::thread_rng(), chrono::Local::now().naive_local())
                        .write_to_file(&path, config.input.generate_lines)?;
                    path
                }
                Err(message) => {
                    eprintln!("Error: {}", message);
                    std::process::exit(1);
                }
            };

            run_analysis(&config, file_path)?;
        }
        Cli::Generate { output, lines } => {
            LogGenerator::new(rand::thread_rng(), chrono::Local::now().naive_local())
                .write_to_file(&output, lines)?;
            println!("Generated {} line(s) in {:?}", lines, output);
        }
        Cli::Config { output } => {
            let config = Config::default();
            config.to_file(&output)?;
            println!("Default configuration written to: {:?}", output);
        }
        Cli::Parse { file, lines } => {
            let raw = read_or_exit(&file)?;
            let parser = LineParser::new()?;
            let records = parser.parse_all(&raw);
            let display_count = std::cmp::min(lines, records.len());

            println!(
                "Parsed {} of {} line(s) (showing {}):\n",
                records.len(),
                raw.len(),
                display_count
            );
            for record in records.iter().take(display_count) {
                println!(
                    "  {} {} {} {} -> {} ({})",
                    record.datetime.format("%Y-%m-%d %H:%M:%S"),
                    record.ip,
                    record.method,
                    record.path,
                    record.status,
                    record.size
                );
            }
        }
    }

    Ok(())
}

#[derive(Debug, PartialEq)]
enum InputSource {
    Existing(PathBuf),
    Generate(PathBuf),
}

/// Pick the log to analyse
///
/// A synthetic log is only ever written to its own output path, never to
/// `--logfile` or the configured input file.
fn resolve_input(
    logfile: Option<PathBuf>,
    generate: bool,
    generate_output: PathBuf,
    config: &Config,
) -> Result<InputSource, String> {
    if generate {
        if logfile.is_some() {
            return Err("--generate cannot be combined with --logfile".to_string());
        }
        if config.input.file_path.as_deref() == Some(generate_output.as_path())
            && generate_output.exists()
        {
            return Err(format!(
                "refusing to overwrite configured input log {:?}; pass --generate-output",
                generate_output
            ));
        }
        return Ok(InputSource::Generate(generate_output));
    }

    logfile
        .or_else(|| config.input.file_path.clone())
        .map(InputSource::Existing)
        .ok_or_else(|| "provide either --logfile or --generate".to_string())
}

/// Analyse one file; output failures are reported without losing the alerts
fn run_analysis(config: &Config, file_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let raw = read_or_exit(&file_path)?;
    println!("Read {} line(s) from {:?}", raw.len(), file_path);

    let mut sink = AlertSink::new(
        OutputFormat::from_name(&config.output.alert_format),
        config.output.alert_log.clone(),
    )?;
    let mut analyzer = Analyzer::new(
        LineParser::new()?,
        ActivityDetector::with_config(&config.detection),
    );

    for line in &raw {
        if let Some(alert) = analyzer.process_line(line) {
            if let Err(e) = sink.write_alert(alert) {
                log::error!("Failed to write alert: {}", e);
            }
        }
    }
    if let Err(e) = sink.flush() {
        log::error!("Failed to flush alert log: {}", e);
    }

    let summary = analyzer.finish();

    if let Some(ref path) = config.output.records_json {
        if let Err(e) = output::write_records_json(path, &summary.records) {
            eprintln!("Error writing records to {:?}: {}", path, e);
        }
    }
    if let Some(ref path) = config.output.report_path {
        if let Err(e) = output::write_text_report(path, &summary) {
            eprintln!("Error writing report to {:?}: {}", path, e);
        }
    }

    println!();
    print!("{}", output::render_text_report(&summary));
    Ok(())
}

fn read_or_exit(path: &Path) -> Result<Vec<String>, SentinelError> {
    match LogFileReader::new(path).read_lines() {
        Err(SentinelError::FileNotFound(path)) => {
            eprintln!("Error: file not found: {:?}", path);
            std::process::exit(1);
        }
        other => other,
    }
}
