//! The `tonecap serve` command: run the HTTP caption backend.

use clap::Args;
use tonecap_core::{Config, ModelOverrides};

use crate::server;

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind (defaults to `server.host`)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (defaults to `server.port`)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Execute the serve command.
pub async fn execute(
    mut config: Config,
    overrides: ModelOverrides,
    args: ServeArgs,
) -> anyhow::Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    server::run(config, overrides).await
}
