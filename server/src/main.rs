mod config;
mod http;

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ftpgate_core::handler::CommandHandler;

use crate::config::{GatewayConfig, Protocol};

/// Stateless REST gateway exposing remote-file-system operations over FTP
/// or SFTP. Each request carries its own remote credentials and gets its
/// own connect–operate–close session.
#[derive(Parser)]
#[command(name = "ftpgate", version)]
struct Args {
    /// Protocol of the remote servers.
    #[arg(long, value_enum)]
    protocol: Protocol,

    /// Port for the REST API.
    #[arg(long)]
    port: u16,

    /// Timeout in seconds for remote connect/read/write operations.
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Suffix appended to the temporary name during atomic uploads.
    #[arg(long, default_value = ".io")]
    temp_suffix: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = GatewayConfig {
        protocol: args.protocol,
        timeout: Duration::from_secs(args.timeout),
        temp_suffix: args.temp_suffix,
    };

    let handler = CommandHandler::new(config.client_factory());
    let app = http::router(handler);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    info!(
        "starting ftpgate in {} mode on {addr}",
        config.protocol.as_str()
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
