use std::process::ExitCode;

use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crossing_arbiter::config::Config;
use crossing_arbiter::coordinator::Coordinator;
use crossing_arbiter::dispatch::{ChannelTransport, Inbound, write_json_lines};
use crossing_arbiter::track::CrossingList;

#[tokio::main]
async fn main() -> ExitCode {
    // stdout carries protocol messages, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let crossings = match config
        .require_crossings_path()
        .map_err(|e| e.to_string())
        .and_then(|path| CrossingList::load(path).map_err(|e| e.to_string()))
    {
        Ok(crossings) => crossings,
        Err(e) => {
            error!("failed to load crossings: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        crossings = crossings.len(),
        trains = config.train_count,
        "crossing arbiter starting"
    );

    // Outbound messages are written as JSON lines by a dedicated task
    let (transport, outbound) = ChannelTransport::new();
    let writer = tokio::spawn(write_json_lines(outbound, tokio::io::stdout()));

    // Inbound messages are read as JSON lines from stdin
    let lines = BufReader::new(tokio::io::stdin()).lines();
    let inbound = futures::stream::unfold(lines, |mut lines| async move {
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => match serde_json::from_str::<Inbound>(&line) {
                    Ok(message) => return Some((message, lines)),
                    Err(e) => warn!("skipping malformed input line: {e}"),
                },
                Ok(None) => return None,
                Err(e) => {
                    error!("failed to read stdin: {e}");
                    return None;
                }
            }
        }
    })
    .boxed();

    let coordinator = Coordinator::new(&config, crossings, transport);
    let result = coordinator.run(inbound).await;

    // The coordinator owned the last sender; the writer drains and stops
    match writer.await {
        Ok(Ok(lines)) => info!(lines, "outbound writer finished"),
        Ok(Err(e)) => error!("failed to write to stdout: {e}"),
        Err(e) => error!("outbound writer task failed: {e}"),
    }

    match result {
        Ok(summary) => {
            info!(
                ticks = summary.ticks,
                reports = summary.reports_accepted,
                rejected = summary.reports_rejected,
                yields = summary.yields_sent,
                "crossing arbiter stopped"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
