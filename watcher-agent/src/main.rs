//! Watcher capture agent: entry point.
//!
//! ```text
//! watcher-agent                  Serve on the configured port (3400)
//! watcher-agent --port <n>       Override the listen port
//! watcher-agent --config <path>  Load a custom config TOML
//! watcher-agent --gen-config     Write default config to stdout
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use watcher_agent::config::AgentConfig;
use watcher_agent::service::AgentService;
use watcher_core::{logging, params};

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "watcher-agent", about = "Watcher screen-capture agent")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "watcher-agent.toml")]
    config: PathBuf,

    /// Port to listen on, overriding `network.listen_port`.
    #[arg(short, long, allow_negative_numbers = true)]
    port: Option<i64>,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // --gen-config: dump defaults and exit.
    if cli.gen_config {
        let text = toml::to_string_pretty(&AgentConfig::default())?;
        println!("{text}");
        return Ok(());
    }

    // Reject a bad port before anything is bound.
    let port_override = match cli.port.map(params::listen_port).transpose() {
        Ok(port) => port,
        Err(e) => {
            eprintln!("watcher-agent: {e}");
            std::process::exit(1);
        }
    };

    let (mut config, fallback) = AgentConfig::load(&cli.config);
    if let Some(port) = port_override {
        config.network.listen_port = port;
    }

    logging::init(&config.logging);
    if let Some(fallback) = &fallback {
        fallback.log();
    }

    info!("watcher-agent v{}", env!("CARGO_PKG_VERSION"));
    info!("listen port: {}", config.network.listen_port);
    info!(
        "capture: {:?}, serialized: {}",
        config.capture.backend, config.capture.serialize
    );

    AgentService::new(config).run().await?;

    Ok(())
}
