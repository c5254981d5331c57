use crate::dns::server::DnsServerHandler;
use geodns_domain::Transport;
use std::io;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

const MAX_UDP_MESSAGE: usize = 4096;

pub(super) async fn run_udp_loop(
    socket: Arc<UdpSocket>,
    handler: Arc<DnsServerHandler>,
    shutdown: CancellationToken,
) {
    let mut recv_buf = [0u8; MAX_UDP_MESSAGE];

    loop {
        let (n, peer) = tokio::select! {
            _ = shutdown.cancelled() => break,
            received = socket.recv_from(&mut recv_buf) => match received {
                Ok(received) => received,
                // ICMP port unreachable from an earlier reply surfaces here on some platforms
                Err(e) if e.kind() == io::ErrorKind::ConnectionReset => continue,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!(error = %e, "UDP recv error");
                    continue;
                }
            },
        };

        let message = recv_buf[..n].to_vec();
        let handler = Arc::clone(&handler);
        let socket = Arc::clone(&socket);

        tokio::spawn(async move {
            let Some(response) = handler.handle_raw(&message, peer, Transport::Udp).await else {
                return;
            };
            if let Err(e) = socket.send_to(&response, peer).await {
                error!(client = %peer, error = %e, "Failed to send UDP response");
            } else {
                debug!(client = %peer, bytes = response.len(), "UDP response sent");
            }
        });
    }

    debug!("UDP loop stopped");
}
