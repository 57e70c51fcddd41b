//! Vigil CLI - Command-line interface for the hover-reveal assessment service
//!
//! Commands:
//! - serve: Run the submission HTTP service
//! - score: Score a single set of interaction metrics
//! - validate: Validate a submission payload
//! - results: Fetch stored submissions from a running service

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use vigil::http;
use vigil::question::Question;
use vigil::scoring::{assess, RiskThresholds};
use vigil::submission::NewSubmission;
use vigil::{ApiClient, SubmissionService, SubmissionStore, VigilError, PRODUCER_NAME, VIGIL_VERSION};

/// Vigil - Interaction-telemetry capture and risk scoring for hover-reveal assessments
#[derive(Parser)]
#[command(name = "vigil")]
#[command(version = VIGIL_VERSION)]
#[command(about = "Capture and score hover-reveal assessment submissions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the submission HTTP service
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,

        /// SQLite database URL
        #[arg(long, default_value = "sqlite::memory:")]
        database: String,
    },

    /// Score a single set of interaction metrics
    Score {
        /// Answer text (use - to read from stdin)
        #[arg(short, long)]
        answer: String,

        /// Seconds spent on the assessment
        #[arg(long)]
        time_spent: u64,

        /// Total mouse move events recorded
        #[arg(long)]
        mouse_moves: u32,

        /// Distinct question words ever hovered
        #[arg(long)]
        hovered: usize,

        /// Total words in the question (defaults to the built-in question)
        #[arg(long)]
        total_words: Option<usize>,

        /// Output assessment as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a submission payload
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch stored submissions from a running service
    Results {
        /// Base URL of the service
        #[arg(long, default_value = "http://127.0.0.1:8080")]
        server: String,

        /// Output submissions as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), VigilCliError> {
    match cli.command {
        Commands::Serve { addr, database } => cmd_serve(addr, &database).await,

        Commands::Score {
            answer,
            time_spent,
            mouse_moves,
            hovered,
            total_words,
            json,
        } => cmd_score(&answer, time_spent, mouse_moves, hovered, total_words, json),

        Commands::Validate { input, json } => cmd_validate(&input, json),

        Commands::Results { server, json } => cmd_results(&server, json).await,
    }
}

async fn cmd_serve(addr: SocketAddr, database: &str) -> Result<(), VigilCliError> {
    init_tracing();

    let store = SubmissionStore::open(database).await?;
    let service = SubmissionService::new(store);

    tracing::info!(%addr, database, "starting submission service");
    http::serve(addr, service).await?;

    Ok(())
}

fn cmd_score(
    answer: &str,
    time_spent: u64,
    mouse_moves: u32,
    hovered: usize,
    total_words: Option<usize>,
    json: bool,
) -> Result<(), VigilCliError> {
    let answer_text = if answer == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        answer.to_string()
    };

    let total_words = total_words.unwrap_or_else(|| Question::default().total_words());
    let thresholds = RiskThresholds::default();

    let assessment = assess(
        &answer_text,
        time_spent,
        mouse_moves,
        hovered,
        total_words,
        &thresholds,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
    } else {
        println!("Risk Assessment");
        println!("===============");
        println!("Score:     {:.2}", assessment.score);
        println!(
            "High risk: {}",
            if assessment.is_high_risk() { "yes" } else { "no" }
        );

        if assessment.flags.is_empty() {
            println!("Flags:     none");
        } else {
            println!("Flags:");
            for flag in &assessment.flags {
                println!("  - {:?}", flag);
            }
        }
    }

    Ok(())
}

fn cmd_validate(input: &PathBuf, json: bool) -> Result<(), VigilCliError> {
    let input_data = if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let outcome = NewSubmission::from_json(input_data.as_bytes()).and_then(|s| {
        s.validate()?;
        Ok(s)
    });

    let report = match &outcome {
        Ok(_) => ValidationReport {
            valid: true,
            field: None,
            error: None,
        },
        Err(VigilError::Validation { field, message }) => ValidationReport {
            valid: false,
            field: Some(field.clone()),
            error: Some(message.clone()),
        },
        Err(e) => ValidationReport {
            valid: false,
            field: None,
            error: Some(e.to_string()),
        },
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        if report.valid {
            println!("Payload is valid");
        } else {
            println!(
                "Invalid payload ({}): {}",
                report.field.as_deref().unwrap_or("unknown"),
                report.error.as_deref().unwrap_or_default()
            );
        }
    }

    if report.valid {
        Ok(())
    } else {
        Err(VigilCliError::ValidationFailed)
    }
}

async fn cmd_results(server: &str, json: bool) -> Result<(), VigilCliError> {
    let client = ApiClient::new(server);
    let submissions = client.list().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&submissions)?);
        return Ok(());
    }

    println!("Submissions ({})", submissions.len());
    println!("================");

    for submission in &submissions {
        let marker = if submission.risk_score > 0.5 {
            " [HIGH RISK]"
        } else {
            ""
        };
        println!(
            "#{} score {:.2}{} ({}s, {} moves, {} hovered) {}",
            submission.id,
            submission.risk_score,
            marker,
            submission.time_spent_seconds,
            submission.mouse_moves,
            submission.hover_count,
            submission.created_at.to_rfc3339(),
        );
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("{}=info", PRODUCER_NAME).parse().unwrap_or_default());

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

// Error types

#[derive(Debug)]
enum VigilCliError {
    Io(io::Error),
    Json(serde_json::Error),
    Vigil(VigilError),
    ValidationFailed,
}

impl From<io::Error> for VigilCliError {
    fn from(e: io::Error) -> Self {
        VigilCliError::Io(e)
    }
}

impl From<serde_json::Error> for VigilCliError {
    fn from(e: serde_json::Error) -> Self {
        VigilCliError::Json(e)
    }
}

impl From<VigilError> for VigilCliError {
    fn from(e: VigilError) -> Self {
        VigilCliError::Vigil(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<VigilCliError> for CliError {
    fn from(e: VigilCliError) -> Self {
        match e {
            VigilCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            VigilCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            VigilCliError::Vigil(VigilError::Validation { field, message }) => CliError {
                code: "VALIDATION_ERROR".to_string(),
                message,
                hint: Some(format!("Fix the '{}' field and retry", field)),
            },
            VigilCliError::Vigil(e) => CliError {
                code: "SERVICE_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            VigilCliError::ValidationFailed => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: "Payload failed validation".to_string(),
                hint: Some("Run 'vigil validate --json' for details".to_string()),
            },
        }
    }
}

#[derive(serde::Serialize)]
struct ValidationReport {
    valid: bool,
    field: Option<String>,
    error: Option<String>,
}
