mod cli;
mod config;
mod console;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use jobcast_core::{Category, UnknownCategory};
use jobcast_engine::{
    DispatchError, DispatchOutcome, JobAlertDispatcher, JobPipeline, NoopProgressSink, Recipient,
    ReqwestFetcher,
};
use jobcast_logging::{jobcast_debug, LogDestination, DEFAULT_LOG_FILE};
use log::LevelFilter;

use cli::{Cli, Command};
use config::AppConfig;
use console::{CommandLineRecipient, ConsoleSender};

const NO_JOBS_NOTICE: &str = "No jobs currently available. Try again later.";

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    init_logging(&cli, &config);
    jobcast_debug!("loaded config: {:?}", config);

    let pipeline = Arc::new(JobPipeline::new(
        Arc::new(config.registry()),
        Arc::new(ReqwestFetcher::new(config.fetch.to_settings())),
        config.composer(),
    ));

    match cli.command {
        Command::Sources => {
            for descriptor in pipeline.registry().descriptors() {
                println!(
                    "{:<10} {:<20} {}",
                    descriptor.category,
                    descriptor.name,
                    descriptor.endpoint_url()
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Fetch { category, json } => {
            let outcome = match pipeline.collect(&category, &NoopProgressSink).await {
                Ok(outcome) => outcome,
                Err(err) => return Ok(usage_error(&err)),
            };
            if json {
                let text = serde_json::to_string_pretty(&outcome.jobs)
                    .context("serializing jobs")?;
                println!("{text}");
            } else if outcome.is_empty() {
                println!("{NO_JOBS_NOTICE}");
            } else {
                for (index, job) in outcome.jobs.iter().enumerate() {
                    println!(
                        "{:>2}. {} | {} | {}\n    {}",
                        index + 1,
                        job.title,
                        job.company,
                        job.location,
                        job.link
                    );
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Send {
            name,
            address,
            category,
        } => {
            let directory = CommandLineRecipient::new(Recipient {
                name,
                address,
                category,
            });
            let dispatcher =
                JobAlertDispatcher::new(pipeline, Arc::new(directory), Arc::new(ConsoleSender));
            match dispatcher
                .dispatch(CommandLineRecipient::IDENTITY, &NoopProgressSink)
                .await
            {
                Ok(DispatchOutcome::Delivered {
                    delivery_id,
                    jobs_sent,
                    ..
                }) => {
                    eprintln!("sent {jobs_sent} job(s), delivery id {delivery_id}");
                    Ok(ExitCode::SUCCESS)
                }
                Ok(DispatchOutcome::NoJobsAvailable { .. }) => {
                    println!("{NO_JOBS_NOTICE}");
                    Ok(ExitCode::SUCCESS)
                }
                Err(DispatchError::UnknownCategory(err)) => Ok(usage_error(&err)),
                Err(err) => Err(err.into()),
            }
        }
    }
}

fn usage_error(err: &UnknownCategory) -> ExitCode {
    let expected: Vec<_> = Category::ALL.iter().map(|category| category.as_str()).collect();
    eprintln!("error: {err} (expected one of: {})", expected.join(", "));
    ExitCode::from(2)
}

fn init_logging(cli: &Cli, config: &AppConfig) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let destination = if config.log_to_file {
        LogDestination::Both(DEFAULT_LOG_FILE.into())
    } else {
        LogDestination::Terminal
    };
    jobcast_logging::initialize(destination, level);
}
