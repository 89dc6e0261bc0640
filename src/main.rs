//! Router observer replay tool.
//!
//! Reads host navigation events from stdin, one per line:
//!
//! ```text
//! start 1 /checkout
//! end 1 /checkout
//! ```
//!
//! and writes every derived event to stdout as a JSON line. Blank lines and
//! lines starting with `#` are ignored and malformed lines are skipped with a
//! warning. A read error on stdin ends the input and the run exits non-zero
//! once buffered events are printed. Logs go to stderr.

use std::path::PathBuf;

use clap::Parser;
use tokio::io::BufReader;
use tokio::sync::{broadcast, mpsc};

use router_observer::lifecycle::{signals, startup};
use router_observer::observability::logging;
use router_observer::service::forward_lines;
use router_observer::{ObserverService, Shutdown};

#[derive(Parser)]
#[command(name = "router-observer")]
#[command(about = "Replay navigation events through the router observer", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level, overridden by RUST_LOG.
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = startup::load(cli.config.as_deref())?;
    let level = cli
        .log_level
        .unwrap_or_else(|| config.observability.log_level.clone());
    logging::init_logging(&level)?;

    tracing::info!("router-observer v0.1.0 starting");
    let registry = startup::build_registry(&config)?;

    let shutdown = Shutdown::new();
    let service = ObserverService::new(registry);
    let mut events = service.subscribe();
    let (tx, rx) = mpsc::channel(64);

    let runner = tokio::spawn(service.run(rx, shutdown.subscribe()));

    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(line) => println!("{line}"),
                    Err(e) => tracing::error!(error = %e, "Failed to serialize event"),
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event output lagging, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let reader = tokio::spawn(async move {
        let input = BufReader::new(tokio::io::stdin());
        forward_lines(input, &tx).await
    });

    tokio::select! {
        _ = signals::shutdown_on_ctrl_c(&shutdown) => {}
        res = runner => {
            if let Err(e) = res {
                tracing::error!(error = %e, "Observer service task failed");
            }
        }
    }

    reader.abort();
    // The runner owned the only sender of events; the printer drains and stops.
    let _ = printer.await;

    // Already logged by the reader.
    if let Ok(Err(e)) = reader.await {
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
