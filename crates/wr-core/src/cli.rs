//! Command-line interface: argument types and command dispatch.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;
use wr_common::{Error, OutputFormat, Result};
use wr_config::resolve::parse_distance_list;
use wr_config::{list_presets, resolve_config, AnalysisConfig, ConfigOverrides, PresetName};

use crate::diagnostic::DiagnosticSnapshot;
use crate::exit_codes::ExitCode;
use crate::ingest::{load_claims, read_claims};
use crate::logging::LogFormat;
use crate::pipeline::run;

/// Warranty claim reliability analysis.
#[derive(Parser, Debug)]
#[command(name = "wr-core", version, about)]
pub struct Cli {
    /// Log filter directive; RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", env = "WR_LOG")]
    pub log_level: String,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full analysis over a claims file
    Analyze(AnalyzeArgs),
    /// Inspect configuration
    Config(ConfigArgs),
}

/// Configuration selection shared by commands that resolve a config.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigFlags {
    /// Configuration file (JSON)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Built-in preset (reference, strict)
    #[arg(long, value_parser = parse_preset)]
    pub preset: Option<PresetName>,

    #[arg(long)]
    pub min_vehicles_suspect: Option<u64>,

    #[arg(long)]
    pub min_claims_suspect: Option<u64>,

    #[arg(long)]
    pub failure_rate_alert_ratio: Option<f64>,

    /// Comma-separated ascending milestone distances
    #[arg(long, value_name = "LIST", value_parser = parse_milestones)]
    pub milestones: Option<DistanceList>,

    #[arg(long)]
    pub far_threshold: Option<f64>,
}

impl ConfigFlags {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config.clone(),
            preset: self.preset,
            min_vehicles_suspect: self.min_vehicles_suspect,
            min_claims_suspect: self.min_claims_suspect,
            failure_rate_alert_ratio: self.failure_rate_alert_ratio,
            milestones: self.milestones.clone().map(|m| m.0),
            far_threshold: self.far_threshold,
        }
    }
}

/// Parsed `--milestones` value.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceList(pub Vec<f64>);

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Claims file (JSON array or JSON lines); `-` reads stdin
    #[arg(long, short, value_name = "PATH")]
    pub input: PathBuf,

    #[command(flatten)]
    pub config: ConfigFlags,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Report destination (default: stdout)
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write probability-plot data for the first suspicious cohort
    #[arg(long, value_name = "PATH")]
    pub diagnostic: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the resolved configuration
    Show(ConfigFlags),
    /// Print the configuration JSON schema
    Schema,
    /// List built-in presets
    Presets,
}

fn parse_preset(raw: &str) -> std::result::Result<PresetName, String> {
    raw.parse::<PresetName>()
        .map_err(|name| format!("unknown preset `{name}` (expected reference or strict)"))
}

fn parse_milestones(raw: &str) -> std::result::Result<DistanceList, String> {
    parse_distance_list(raw)
        .map(DistanceList)
        .ok_or_else(|| format!("invalid distance list `{raw}`"))
}

fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = match path {
        Some(p) => Box::new(BufWriter::new(File::create(p)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    Ok(writer)
}

/// Execute a parsed command and return the process exit code.
pub fn execute(cli: &Cli) -> Result<ExitCode> {
    match &cli.command {
        Commands::Analyze(args) => analyze(args),
        Commands::Config(args) => config_command(&args.command),
    }
}

fn analyze(args: &AnalyzeArgs) -> Result<ExitCode> {
    let resolved = resolve_config(&args.config.overrides())?;
    info!(source = %resolved.source, "configuration loaded");
    let config = resolved.config;

    let claims = if args.input.as_os_str() == "-" {
        read_claims(io::stdin().lock())?
    } else {
        load_claims(&args.input)?
    };

    let output = run(&claims, &config)?;

    let mut writer = open_output(args.output.as_ref())?;
    match args.format {
        OutputFormat::Json => output.report.write_json(&mut writer)?,
        OutputFormat::Csv => output.report.write_csv(&mut writer)?,
    }
    writer.flush()?;

    if let Some(path) = &args.diagnostic {
        match DiagnosticSnapshot::for_first_suspicious(&output, &config) {
            Some(snapshot) => {
                let mut file = BufWriter::new(File::create(path)?);
                snapshot.write_json(&mut file)?;
                file.flush()?;
                info!(cohort = %snapshot.cohort, path = %path.display(), "diagnostic written");
            }
            None => info!("no suspicious cohort with a fit; diagnostic skipped"),
        }
    }

    Ok(ExitCode::for_run(output.has_suspicious()))
}

fn config_command(command: &ConfigCommands) -> Result<ExitCode> {
    let mut out = io::stdout().lock();
    match command {
        ConfigCommands::Show(flags) => {
            let resolved = resolve_config(&flags.overrides())?;
            writeln!(out, "{}", resolved.config.to_json()?)?;
        }
        ConfigCommands::Schema => {
            let schema = schemars::schema_for!(AnalysisConfig);
            writeln!(out, "{}", serde_json::to_string_pretty(&schema)?)?;
        }
        ConfigCommands::Presets => {
            writeln!(out, "{}", serde_json::to_string_pretty(&list_presets())?)?;
        }
    }
    Ok(ExitCode::Clean)
}

/// Map an error to its exit code and a one-line JSON error document.
pub fn error_document(err: &Error) -> (ExitCode, serde_json::Value) {
    let code = ExitCode::from(err);
    let doc = serde_json::json!({
        "error": {
            "code": err.code(),
            "message": err.to_string(),
        }
    });
    (code, doc)
}
