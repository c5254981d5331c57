use crate::dns::server::DnsServerHandler;
use geodns_domain::Transport;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

const REPLY_QUEUE_DEPTH: usize = 32;

pub(super) async fn run_tcp_loop(
    listener: TcpListener,
    handler: Arc<DnsServerHandler>,
    idle_timeout: Duration,
    shutdown: CancellationToken,
) {
    loop {
        let (stream, peer) = tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!(error = %e, "TCP accept error");
                    continue;
                }
            },
        };

        tokio::spawn(handle_connection(
            stream,
            peer,
            Arc::clone(&handler),
            idle_timeout,
            shutdown.child_token(),
        ));
    }

    debug!("TCP loop stopped");
}

/// Serves length-prefixed messages from one connection until the peer
/// closes it, it stays idle past `idle_timeout`, or the server shuts down.
/// Messages are handled concurrently; replies may go out in any order.
async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    handler: Arc<DnsServerHandler>,
    idle_timeout: Duration,
    shutdown: CancellationToken,
) {
    let (mut reader, writer) = stream.into_split();
    let (tx, rx) = mpsc::channel::<Vec<u8>>(REPLY_QUEUE_DEPTH);
    let writer_task = tokio::spawn(write_replies(writer, rx, peer));

    loop {
        let message = tokio::select! {
            _ = shutdown.cancelled() => break,
            read = timeout(idle_timeout, read_message(&mut reader)) => match read {
                Ok(Ok(Some(message))) => message,
                Ok(Ok(None)) => break,
                Ok(Err(e)) => {
                    debug!(client = %peer, error = %e, "TCP read failed");
                    break;
                }
                Err(_) => {
                    debug!(client = %peer, "TCP connection idle, closing");
                    break;
                }
            },
        };

        let handler = Arc::clone(&handler);
        let tx = tx.clone();
        tokio::spawn(async move {
            let Some(response) = handler.handle_raw(&message, peer, Transport::Tcp).await else {
                return;
            };
            if tx.send(response).await.is_err() {
                debug!(client = %peer, "TCP connection closed before reply");
            }
        });
    }

    drop(tx);
    if let Err(e) = writer_task.await {
        error!(client = %peer, error = %e, "TCP writer task failed");
    }
}

/// Reads one message; `Ok(None)` on a clean close between messages.
async fn read_message(reader: &mut OwnedReadHalf) -> io::Result<Option<Vec<u8>>> {
    let mut len_buf = [0u8; 2];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    }

    let len = u16::from_be_bytes(len_buf) as usize;
    let mut message = vec![0u8; len];
    reader.read_exact(&mut message).await?;
    Ok(Some(message))
}

async fn write_replies(mut writer: OwnedWriteHalf, mut rx: mpsc::Receiver<Vec<u8>>, peer: SocketAddr) {
    while let Some(response) = rx.recv().await {
        let Ok(len) = u16::try_from(response.len()) else {
            warn!(client = %peer, bytes = response.len(), "TCP response too large, dropped");
            continue;
        };

        let mut framed = Vec::with_capacity(response.len() + 2);
        framed.extend_from_slice(&len.to_be_bytes());
        framed.extend_from_slice(&response);

        if let Err(e) = writer.write_all(&framed).await {
            error!(client = %peer, error = %e, "Failed to send TCP response");
            break;
        }
    }

    let _ = writer.shutdown().await;
}
