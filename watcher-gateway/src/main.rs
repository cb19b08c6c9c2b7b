//! Watcher forwarding gateway: entry point.
//!
//! ```text
//! watcher-gateway                  Serve on the configured port (80)
//! watcher-gateway --port <n>       Override the listen port
//! watcher-gateway --config <path>  Load a custom config TOML
//! watcher-gateway --gen-config     Write default config to stdout
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use watcher_core::{logging, params};
use watcher_gateway::config::GatewayConfig;
use watcher_gateway::service::GatewayService;

#[derive(Parser, Debug)]
#[command(name = "watcher-gateway", about = "Watcher capture forwarding gateway")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "watcher-gateway.toml")]
    config: PathBuf,

    /// Port to listen on, overriding `network.listen_port`.
    #[arg(short, long, allow_negative_numbers = true)]
    port: Option<i64>,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        let text = toml::to_string_pretty(&GatewayConfig::default())?;
        println!("{text}");
        return Ok(());
    }

    let port_override = match cli.port.map(params::listen_port).transpose() {
        Ok(port) => port,
        Err(e) => {
            eprintln!("watcher-gateway: {e}");
            std::process::exit(1);
        }
    };

    let (mut config, fallback) = GatewayConfig::load(&cli.config);
    if let Some(port) = port_override {
        config.network.listen_port = port;
    }

    logging::init(&config.logging);
    if let Some(fallback) = &fallback {
        fallback.log();
    }

    info!("watcher-gateway v{}", env!("CARGO_PKG_VERSION"));
    info!("listen port: {}", config.network.listen_port);
    info!("default agent port: {}", config.backend.default_port);

    GatewayService::new(config).run().await?;

    Ok(())
}
