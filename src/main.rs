//! Command-line client that sends one exchange to a jBPM runtime engine

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use jbpm_connector::constants::HEADER_OPERATION;
use jbpm_connector::{Exchange, JbpmComponent, JbpmConfiguration, Message};
use serde_json::Value;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Send one exchange to a jBPM runtime engine and print the reply body
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Endpoint URI, e.g. `jbpm:http://localhost:8080/business-central?deploymentId=...`
    uri: String,

    /// Operation to perform, overriding the URI's `operation`
    #[arg(long)]
    operation: Option<String>,

    /// Message header as NAME=VALUE; VALUE is parsed as JSON when possible
    #[arg(long = "header", value_parser = parse_header)]
    headers: Vec<(String, Value)>,

    /// Message body as JSON
    #[arg(long)]
    body: Option<String>,

    /// Write logs to a daily rolling file in this directory instead of stderr
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn parse_header(raw: &str) -> Result<(String, Value), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {raw}"))?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

fn init_logging(log_dir: Option<&PathBuf>) -> WorkerGuard {
    let (writer, guard) = match log_dir {
        Some(dir) => tracing_appender::non_blocking(tracing_appender::rolling::daily(
            dir,
            "jbpm_connector.log",
        )),
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(log_dir.is_none())
        .init();

    guard
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _guard = init_logging(args.log_dir.as_ref());

    let endpoint = JbpmComponent::new()
        .create_endpoint(&args.uri)
        .with_context(|| {
            format!(
                "Failed to create endpoint for {}",
                JbpmConfiguration::redacted_uri(&args.uri)
            )
        })?;

    let mut message = match &args.body {
        Some(body) => Message::with_body(serde_json::from_str(body).context("Invalid body")?),
        None => Message::new(),
    };
    for (name, value) in args.headers {
        message.set_header(name, value);
    }
    if let Some(operation) = args.operation {
        message.set_header(HEADER_OPERATION, operation);
    }

    let mut exchange = Exchange::new(message);
    info!("Sending exchange {}", exchange.id());
    endpoint
        .producer()
        .send(&mut exchange)
        .await
        .context("Runtime engine call failed")?;

    let reply = exchange.message().body().cloned().unwrap_or(Value::Null);
    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}
