use clap::Parser;
use geodns_domain::{CliOverrides, Config};
use geodns_infrastructure::dns::DnsServerHandler;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "geodns")]
#[command(version)]
#[command(about = "GeoDNS - answers A/AAAA queries according to where the client is")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Bind address for the UDP and TCP listeners
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// DNS server port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        bind_host: cli.bind.clone(),
        bind_port: cli.port,
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config.logging);

    info!("Starting GeoDNS v{}", env!("CARGO_PKG_VERSION"));

    let shutdown = CancellationToken::new();
    let dns_services = Arc::new(di::DnsServices::new(&config, &shutdown)?);

    let config_path = cli.config.clone().or_else(Config::get_config_path);
    server::spawn_signal_handlers(shutdown.clone(), Arc::clone(&dns_services), config_path);

    let handler = DnsServerHandler::new(
        Arc::clone(&dns_services.use_case),
        config.server.udp_max_payload,
    );

    server::start_dns_server(&config.server, handler, shutdown).await?;

    info!("Server shutdown complete");
    Ok(())
}
