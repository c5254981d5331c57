use geodns_domain::config::ServerConfig;
use geodns_infrastructure::dns::{DnsListener, DnsServerHandler};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Binds the UDP and TCP listeners and serves until `shutdown` fires.
pub async fn start_dns_server(
    config: &ServerConfig,
    handler: DnsServerHandler,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let socket_addr = config.socket_addr()?;

    info!(
        bind_address = %socket_addr,
        tcp_idle_timeout_secs = config.tcp_idle_timeout_secs,
        udp_max_payload = config.udp_max_payload,
        "Starting DNS server"
    );

    let listener = DnsListener::bind(
        socket_addr,
        Arc::new(handler),
        Duration::from_secs(config.tcp_idle_timeout_secs),
    )?;

    listener.run(shutdown).await?;
    Ok(())
}
