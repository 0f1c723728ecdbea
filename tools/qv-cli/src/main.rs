//! QV CLI: browse polls and cast quadratic votes.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use serde::Serialize;

use qv_api_client::{BackendClient, ClientConfig};
use qv_cli::args::{Cli, Command};
use qv_cli::{commands, render};
use qv_03_poll_directory::{PollDirectory, PollDirectoryGateway};
use qv_04_user_profile::ProfileService;
use qv_telemetry::{init_logging, log_event, TelemetryConfig};
use shared_types::PollId;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&TelemetryConfig::for_component("qv-cli")) {
        eprintln!("Warning: logging disabled: {e}");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log_event!(error, "cli", "command failed", error = %err);
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = ClientConfig {
        base_url: cli.backend.clone(),
        auth_token: cli.token.clone(),
        request_timeout: Duration::from_secs(cli.timeout),
        ..ClientConfig::default()
    };
    let client = Arc::new(BackendClient::new(&config).context("building backend client")?);
    let directory = PollDirectory::new(client.clone());
    let profiles = ProfileService::new(client.clone());
    let now = Utc::now();

    match cli.command {
        Command::Polls(args) => {
            let feed = commands::list_polls(&directory, &args).await?;
            print(cli.json, &feed, || render::feed(&feed, now))
        }
        Command::Show { poll_id } => {
            let poll_id = PollId(poll_id);
            let view = PollDirectoryGateway::get_poll(client.as_ref(), poll_id)
                .await
                .with_context(|| format!("loading poll {poll_id}"))?;
            let results = view.results_or_empty();
            print(cli.json, &view, || {
                format!(
                    "{}\n\n{}",
                    render::poll_details(&view.details, now),
                    render::results(&results)
                )
            })
        }
        Command::Vote(args) => {
            let outcome = commands::vote(client, &args).await?;
            let text = || {
                let mut out = render::allocation(&outcome.allocation);
                match &outcome.receipt {
                    Some(receipt) => {
                        out.push('\n');
                        out.push_str(&render::receipt(receipt));
                    }
                    None => {
                        out.push('\n');
                        out.push_str(&render::gate(&outcome.gate));
                    }
                }
                out
            };
            match &outcome.receipt {
                Some(receipt) => print(cli.json, receipt, text),
                None => print(cli.json, &outcome.gate, text),
            }
        }
        Command::Create(args) => {
            let created = commands::create(&directory, &args).await?;
            print(cli.json, &created, || {
                format!("created poll #{} \"{}\"", created.poll_id, created.title)
            })
        }
        Command::Delete { poll_id } => {
            let poll_id = PollId(poll_id);
            directory.delete_poll(poll_id).await?;
            println!("deleted poll #{poll_id}");
            Ok(())
        }
        Command::Profile { world_id } => {
            let overview = commands::profile(&profiles, world_id.as_deref()).await?;
            print(cli.json, &overview, || render::profile(&overview, now))
        }
        Command::Activities(args) => {
            let page = commands::activities(&profiles, &args).await?;
            print(cli.json, &page, || render::activities(&page, now))
        }
    }
}

fn print<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}
