mod socket;
mod tcp;
mod udp;

use super::server::DnsServerHandler;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, UdpSocket};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// One UDP socket and one TCP listener on the same address, both feeding the
/// same handler.
pub struct DnsListener {
    udp: Arc<UdpSocket>,
    tcp: TcpListener,
    handler: Arc<DnsServerHandler>,
    tcp_idle_timeout: Duration,
}

impl DnsListener {
    /// Binds both sockets. UDP is bound first and TCP reuses the port it got,
    /// so an ephemeral port (`:0`) ends up identical on both transports.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bind(
        addr: SocketAddr,
        handler: Arc<DnsServerHandler>,
        tcp_idle_timeout: Duration,
    ) -> io::Result<Self> {
        let udp = socket::create_udp_socket(addr)?;
        let bound = udp.local_addr()?;
        let tcp = socket::create_tcp_listener(bound)?;

        Ok(Self {
            udp: Arc::new(udp),
            tcp,
            handler,
            tcp_idle_timeout,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.udp.local_addr()
    }

    /// Runs both loops until `shutdown` is cancelled. If either loop dies the
    /// other is stopped too.
    pub async fn run(self, shutdown: CancellationToken) -> io::Result<()> {
        let addr = self.local_addr()?;
        let mut join_set: JoinSet<()> = JoinSet::new();

        join_set.spawn(udp::run_udp_loop(
            self.udp,
            Arc::clone(&self.handler),
            shutdown.clone(),
        ));
        join_set.spawn(tcp::run_tcp_loop(
            self.tcp,
            Arc::clone(&self.handler),
            self.tcp_idle_timeout,
            shutdown.clone(),
        ));

        info!(bind_address = %addr, "DNS server ready (udp + tcp)");

        while let Some(result) = join_set.join_next().await {
            if let Err(e) = result {
                error!(error = %e, "DNS listener task failed");
            }
            shutdown.cancel();
        }

        info!(bind_address = %addr, "DNS server stopped");
        Ok(())
    }
}
