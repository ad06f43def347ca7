use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt};
use uuid::Uuid;

use email_crew::config::Config;
use email_crew::console::Console;
use email_crew::orchestrator::{Orchestrator, Pipeline};
use email_crew::samples::{self, DEMO_PARSE_EMAIL, DEMO_TRIAGE_EMAIL};

#[derive(Debug, Parser)]
#[command(name = "email_crew", about = "Classify, answer and parse emails with a local model")]
struct Args {
    /// Model server base URL (overrides EMAIL_CREW_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Model id, e.g. llama3.2 or ollama/llama3.2 (overrides EMAIL_CREW_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Print every agent's task and answer
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify an email's importance and draft a reply
    Triage {
        /// Email file, or `-` for stdin. If omitted, a demo email is used
        #[arg(long)]
        email_file: Option<PathBuf>,
        /// Write the result as JSON to this path
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Extract the applicant record from an email
    Parse {
        #[arg(long)]
        email_file: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Run the sample emails against the live model
    Samples {
        #[arg(long, value_enum, default_value_t = Suite::All)]
        suite: Suite,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Suite {
    Classification,
    Parsing,
    All,
}

#[derive(Serialize)]
struct Artifact<'a, T: Serialize> {
    run_id: Uuid,
    created_at: String,
    model: &'a str,
    result: &'a T,
}

async fn write_artifact<T: Serialize>(path: &Path, model: &str, result: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let artifact = Artifact {
        run_id: Uuid::new_v4(),
        created_at: Utc::now().to_rfc3339(),
        model,
        result,
    };
    tokio::fs::write(path, serde_json::to_string_pretty(&artifact)?).await?;
    tracing::info!("Saved result to {}", path.display());
    Ok(())
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();

    // logging
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter_layer).init();

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            Console::display_error(&e);
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when a sample suite had failures.
async fn run(args: Args) -> Result<bool> {
    tracing::info!("Starting email crew");

    let mut config = Config::load()?;
    if let Some(url) = args.base_url {
        config = config.with_base_url(url);
    }
    if let Some(model) = args.model {
        config = config.with_model(model);
    }

    Console::display_welcome(&config.model, &config.base_url);
    let model = config.model.clone();
    let orchestrator = Orchestrator::new(config, args.verbose)?;

    match args.command {
        Command::Triage { email_file, out } => {
            let email = Console::read_email(email_file.as_deref(), DEMO_TRIAGE_EMAIL).await?;
            tracing::info!("Pipeline mode: classifier → responder");
            let triage = orchestrator.triage().run(&email).await?;
            Console::display_triage(&triage);
            if let Some(path) = out {
                write_artifact(&path, &model, &triage).await?;
            }
            Ok(true)
        }
        Command::Parse { email_file, out } => {
            let email = Console::read_email(email_file.as_deref(), DEMO_PARSE_EMAIL).await?;
            tracing::info!("Pipeline mode: parser");
            let record = orchestrator.parse().run(&email).await?;
            Console::display_record(&record);
            if let Some(path) = out {
                write_artifact(&path, &model, &record).await?;
            }
            Ok(true)
        }
        Command::Samples { suite } => {
            let mut ok = true;
            if matches!(suite, Suite::Classification | Suite::All) {
                let report = samples::run_suite(
                    "classification",
                    &orchestrator.classify(),
                    &samples::classification_cases(),
                )
                .await;
                Console::display_report(&report);
                ok &= report.is_success();
            }
            if matches!(suite, Suite::Parsing | Suite::All) {
                let report =
                    samples::run_suite("parsing", &orchestrator.parse(), &samples::parsing_cases())
                        .await;
                Console::display_report(&report);
                ok &= report.is_success();
            }
            Ok(ok)
        }
    }
}
