use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use fertiscore::clinical::{OutcomeRequest, StimulationRequest};
use fertiscore::config::{self, Config, OutputFormat};
use fertiscore::ValidationError;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_VALIDATION: i32 = 2;
const EXIT_OUTPUT: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score embryos, patient and transfer conditions and predict outcomes
    Outcome {
        /// Request JSON file, or "-" for stdin
        input: String,
    },
    /// Plan an individualized ovarian stimulation protocol
    Stimulation {
        /// Request JSON file, or "-" for stdin
        input: String,
    },
    /// Write the default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "fertiscore")]
#[command(about = "IVF outcome prediction and stimulation planning", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging and score breakdowns
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/fertiscore/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format (overrides the config file)
    #[arg(long, value_enum, global = true)]
    format: Option<FormatArg>,

    /// Also save the JSON report to this file
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Read the request body from a file, or stdin for "-".
fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read request from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(input).with_context(|| format!("Failed to read request file {}", input))
}

fn parse_request<T: DeserializeOwned>(input: &str) -> Result<T> {
    let body = read_input(input)?;
    let source = if input == "-" { "stdin" } else { input };
    serde_json::from_str(&body).with_context(|| format!("Invalid request JSON in {}", source))
}

fn load_request<T: DeserializeOwned>(input: &str) -> T {
    match parse_request(input) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    }
}

fn exit_invalid(err: ValidationError) -> ! {
    eprintln!("Invalid input:");
    for error in &err.errors {
        eprintln!("  - {}", error);
    }
    std::process::exit(EXIT_VALIDATION);
}

struct Emit<'a> {
    format: OutputFormat,
    use_colors: bool,
    verbose: bool,
    output: Option<&'a Path>,
}

impl Emit<'_> {
    fn report<T: Serialize>(&self, report: &T, render_text: impl FnOnce(bool, bool) -> String) {
        match self.format {
            OutputFormat::Text => println!("{}", render_text(self.verbose, self.use_colors)),
            OutputFormat::Json => match fertiscore::output::format_json(report) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Output error: {:#}", e);
                    std::process::exit(EXIT_OUTPUT);
                }
            },
        }

        if let Some(path) = self.output {
            if let Err(e) = fertiscore::output::save_report(path, report) {
                eprintln!("Output error: {:#}", e);
                std::process::exit(EXIT_OUTPUT);
            }
            if self.verbose {
                eprintln!("Report saved to {}", path.display());
            }
        }
    }
}

fn run_init(path: Option<PathBuf>, force: bool) {
    let path = match path.map(Ok).unwrap_or_else(config::get_config_path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    if let Err(e) = config::write_default_config(&path, force) {
        eprintln!("Config error: {:#}", e);
        std::process::exit(EXIT_CONFIG);
    }
    println!("Config written to {}", path.display());
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start_time = Instant::now();

    if let Commands::Init { force } = cli.command {
        run_init(cli.config, force);
        std::process::exit(EXIT_SUCCESS);
    }

    let config: Config = match config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let emit = Emit {
        format: cli.format.map(OutputFormat::from).unwrap_or(config.output.format),
        use_colors: fertiscore::output::resolve_colors(config.output.color),
        verbose: cli.verbose,
        output: cli.output.as_deref(),
    };

    match cli.command {
        Commands::Outcome { ref input } => {
            let request: OutcomeRequest = load_request(input);
            let validated =
                fertiscore::scoring::validate_outcome_request(&request, config.require_consent)
                    .unwrap_or_else(|e| exit_invalid(e));

            let as_of = chrono::Utc::now().date_naive();
            let assessment = fertiscore::scoring::assess_outcome(&validated, as_of);
            emit.report(&assessment, |verbose, colors| {
                fertiscore::output::format_outcome_report(&assessment, verbose, colors)
            });
        }
        Commands::Stimulation { ref input } => {
            let request: StimulationRequest = load_request(input);
            let validated = fertiscore::stimulation::validate_stimulation_request(
                &request,
                config.require_consent,
            )
            .unwrap_or_else(|e| exit_invalid(e));

            let plan = fertiscore::stimulation::plan_stimulation(&validated);
            emit.report(&plan, |verbose, colors| {
                fertiscore::output::format_stimulation_plan(&plan, verbose, colors)
            });
        }
        Commands::Init { .. } => {}
    }

    if cli.verbose {
        eprintln!(
            "Processed in {}",
            humantime::format_duration(start_time.elapsed())
        );
    }

    std::process::exit(EXIT_SUCCESS);
}
