//! CLI entry point: one subcommand per run mode (`single`, `linearize`,
//! `verify`), sharing the flag parsing, defaults, and validation in
//! `promise_harness::config`. Exit code conventions follow the external
//! interfaces design: 0 on success, distinct non-zero codes for setup vs.
//! verification failure.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use promise_client::HttpClient;
use promise_harness::config::{READINESS_POLL_INTERVAL, READINESS_WINDOW, RunConfig};
use promise_harness::generator::GeneratorConfig;
use promise_harness::{HarnessError, reporter, runner};

const EXIT_OK: u8 = 0;
const EXIT_SETUP_FAILURE: u8 = 1;
const EXIT_VERIFICATION_FAILURE: u8 = 2;
const EXIT_USAGE_FAILURE: u8 = 3;

#[derive(Parser, Debug)]
#[command(name = "harness", about = "durable promise server testing harness")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// One client, sequential requests -- a cheap smoke test of the model
    /// and wiring.
    Single {
        #[arg(short = 'a', long, default_value = "http://0.0.0.0:8001/")]
        addr: String,
        #[arg(short = 'r', long, default_value_t = 1)]
        requests: usize,
    },
    /// N concurrent clients; runs the linearizability checker at the end.
    Linearize {
        #[arg(short = 'a', long, default_value = "http://0.0.0.0:8001/")]
        addr: String,
        #[arg(short = 'c', long, default_value_t = 1)]
        clients: u32,
        #[arg(short = 'r', long, default_value_t = 1)]
        requests: usize,
    },
    /// N concurrent clients, the linearizability check, and a performance
    /// summary written to a file.
    Verify {
        #[arg(short = 'a', long, default_value = "http://0.0.0.0:8001/")]
        addr: String,
        #[arg(short = 'c', long, default_value_t = 1)]
        clients: u32,
        #[arg(short = 'r', long, default_value_t = 1)]
        requests: usize,
        #[arg(short = 'o', long, default_value = "report.txt")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run_command(cli.command).await {
        Ok(()) => ExitCode::from(EXIT_OK),
        Err(HarnessError::Config(error)) => {
            tracing::error!(%error, "invalid configuration");
            ExitCode::from(EXIT_USAGE_FAILURE)
        }
        Err(HarnessError::ClientBuild(error)) => {
            tracing::error!(%error, "failed to build client");
            ExitCode::from(EXIT_USAGE_FAILURE)
        }
        Err(HarnessError::Setup(error)) => {
            tracing::error!(%error, "setup failed");
            ExitCode::from(EXIT_SETUP_FAILURE)
        }
        Err(HarnessError::Verification(error)) => {
            tracing::error!(%error, "history failed the linearizability check");
            ExitCode::from(EXIT_VERIFICATION_FAILURE)
        }
        Err(HarnessError::WorkerPanicked(error)) => {
            tracing::error!(%error, "a worker task panicked");
            ExitCode::from(EXIT_USAGE_FAILURE)
        }
    }
}

async fn run_command(command: Command) -> Result<(), HarnessError> {
    match command {
        Command::Single { addr, requests } => {
            let config = RunConfig::new(addr, 1, requests)?;
            let outcome = run_pipeline(&config, GeneratorConfig::default()).await?;
            outcome.check?;
            tracing::info!(
                operations = outcome.history.len(),
                elapsed_ms = outcome.elapsed.as_millis() as u64,
                "single client correctness validation passed"
            );
            Ok(())
        }
        Command::Linearize { addr, clients, requests } => {
            let config = RunConfig::new(addr, clients, requests)?;
            let outcome = run_pipeline(&config, GeneratorConfig::default()).await?;
            outcome.check?;
            tracing::info!(
                operations = outcome.history.len(),
                elapsed_ms = outcome.elapsed.as_millis() as u64,
                "linearizability check passed"
            );
            Ok(())
        }
        Command::Verify {
            addr,
            clients,
            requests,
            output,
        } => {
            let config = RunConfig::new(addr, clients, requests)?;
            let outcome = run_pipeline(&config, GeneratorConfig::default()).await?;

            let report = reporter::summarize(&outcome.history);
            if let Err(error) = reporter::write_report(&report, &output) {
                tracing::warn!(%error, path = %output.display(), "failed to write performance report");
            } else {
                tracing::info!(path = %output.display(), "performance report written");
            }

            outcome.check?;
            tracing::info!(operations = outcome.history.len(), "verify run passed");
            Ok(())
        }
    }
}

async fn run_pipeline(
    config: &RunConfig,
    generator_config: GeneratorConfig,
) -> Result<runner::RunOutcome, HarnessError> {
    let client = Arc::new(HttpClient::new(config.addr.clone())?);
    let generator_config = GeneratorConfig {
        requests_per_client: config.requests_per_client,
        ..generator_config
    };

    runner::run(config, generator_config, client, READINESS_WINDOW, READINESS_POLL_INTERVAL).await
}
