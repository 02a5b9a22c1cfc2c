use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use hearing_test_core::audio::Ear;
use hearing_test_core::audiogram::{parse_record, HearingClassification, TestResult};
use hearing_test_core::config::AppConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.verbose {
        hearing_test_core::init_logging();
    }
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("hearing-diag error: {err:?}");
            ExitCode::from(1)
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "hearing-diag", about = "Inspect stored hearing test result records")]
struct Cli {
    /// Emit debug logs to stdout.
    #[arg(long, global = true)]
    verbose: bool,
    /// JSON configuration file (defaults to assets/hearing_config.json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn execute(self) -> Result<()> {
        let config = match &self.config {
            Some(path) => AppConfig::load_from_file(path),
            None => AppConfig::load(),
        };
        match self.command {
            Command::Inspect(args) => inspect_command(args, &config),
            Command::Lookup(args) => lookup_command(args, &config),
            Command::Classify(args) => classify_command(args),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a record file and print its summary.
    Inspect(InspectArgs),
    /// Find the stored point for a frequency on one ear.
    Lookup(LookupArgs),
    /// Map an average hearing level onto the severity scale.
    Classify(ClassifyArgs),
}

#[derive(Args, Debug, Clone)]
struct RecordArgs {
    /// Path to a JSON document body.
    #[arg(long)]
    record: PathBuf,
    /// Document id; defaults to the file stem.
    #[arg(long)]
    id: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct InspectArgs {
    #[command(flatten)]
    record: RecordArgs,
    /// Output format for the summary.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
struct LookupArgs {
    #[command(flatten)]
    record: RecordArgs,
    /// Frequency to look up in Hz.
    #[arg(long)]
    frequency: f64,
    /// Ear to search.
    #[arg(long, value_enum)]
    ear: EarArg,
}

#[derive(Args, Debug, Clone)]
struct ClassifyArgs {
    /// Average hearing level in dB HL.
    #[arg(long, allow_negative_numbers = true)]
    level: f64,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum EarArg {
    Left,
    Right,
}

impl From<EarArg> for Ear {
    fn from(value: EarArg) -> Self {
        match value {
            EarArg::Left => Ear::Left,
            EarArg::Right => Ear::Right,
        }
    }
}

fn load_result(args: &RecordArgs) -> Result<TestResult> {
    let text = fs::read_to_string(&args.record)
        .with_context(|| format!("reading record {}", args.record.display()))?;
    let record = parse_record(&text)?;
    let id = match &args.id {
        Some(id) => id.clone(),
        None => default_id(&args.record)?,
    };
    TestResult::try_from_record(id, &record)
        .with_context(|| format!("decoding record {}", args.record.display()))
}

fn default_id(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("cannot derive a document id from {}", path.display()))
}

fn inspect_command(args: InspectArgs, config: &AppConfig) -> Result<()> {
    let result = load_result(&args.record)?;
    let summary = result.summary_with(&config.audiogram);

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Table => {
            println!("{}/{}", config.storage.collection, summary.id);
            println!("  date        {}", summary.test_date.to_rfc3339());
            println!(
                "  right ear   {:<32} avg {:>6.1} dB  ({} points)",
                summary.right_ear_classification,
                summary.right_ear_average_level,
                summary.right_ear_points
            );
            println!(
                "  left ear    {:<32} avg {:>6.1} dB  ({} points)",
                summary.left_ear_classification,
                summary.left_ear_average_level,
                summary.left_ear_points
            );
            println!("  overall     {}", summary.overall_hearing_status);
            println!("  asymmetric  {}", summary.has_asymmetric_hearing);
            for ear in [Ear::Right, Ear::Left] {
                let labels: Vec<String> = result
                    .ear_data(ear)
                    .iter()
                    .map(|p| format!("{}={}", p.frequency_label(), p.hearing_level))
                    .collect();
                println!("  {:<5}       {}", ear, labels.join(" "));
            }
        }
    }
    Ok(())
}

fn lookup_command(args: LookupArgs, config: &AppConfig) -> Result<()> {
    let result = load_result(&args.record)?;
    let ear = Ear::from(args.ear);
    match result.data_point_within(args.frequency, ear, config.audiogram.match_tolerance_hz) {
        Some(point) => {
            println!("{}", serde_json::to_string(point)?);
            Ok(())
        }
        None => bail!(
            "no {} ear point within {} Hz of {} Hz",
            ear,
            config.audiogram.match_tolerance_hz,
            args.frequency
        ),
    }
}

fn classify_command(args: ClassifyArgs) -> Result<()> {
    println!(
        "{}",
        HearingClassification::from_average_level(args.level).label()
    );
    Ok(())
}
