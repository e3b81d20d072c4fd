//! Radar datagram ingestion.
//!
//! One long-lived task owns the UDP socket; every received datagram is
//! handed to its own spawned handler task. The loop never awaits a
//! handler, so a stalled display or store cannot back up ingestion, and
//! a fault inside one handler stays inside that task.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::UdpSocket;
use tracing::{info, warn};

use crate::error::ServerError;
use crate::pipeline::Pipeline;

/// Largest datagram the radar is known to emit.
const MAX_DATAGRAM: usize = 1024;

/// The bound radar socket, ready to receive.
pub struct Ingest {
    socket: UdpSocket,
}

impl Ingest {
    /// Bind the radar socket.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] when the address cannot be bound.
    /// This is fatal for ingestion; already-initialized collaborators
    /// (the manual path in particular) keep working without it.
    pub async fn bind(addr: SocketAddr) -> Result<Self, ServerError> {
        let socket =
            UdpSocket::bind(addr).await.map_err(|source| ServerError::Bind { addr, source })?;
        Ok(Self { socket })
    }

    /// The address the socket actually bound (useful with port 0).
    ///
    /// # Errors
    ///
    /// Propagates the socket's own address lookup failure.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Receive datagrams forever, spawning one handler task per packet.
    ///
    /// Receive errors are logged and the loop continues; only
    /// cancellation of the owning task stops it.
    pub async fn run(self, pipeline: Arc<Pipeline>) {
        if let Ok(addr) = self.socket.local_addr() {
            info!(%addr, "listening for radar datagrams");
        }

        let mut buf = [0u8; MAX_DATAGRAM];
        loop {
            match self.socket.recv_from(&mut buf).await {
                Ok((len, peer)) => {
                    let text = String::from_utf8_lossy(&buf[..len]).trim().to_string();
                    let pipeline = Arc::clone(&pipeline);
                    tokio::spawn(async move {
                        pipeline.handle_line(&text, Some(peer)).await;
                    });
                },
                Err(error) => warn!(%error, "radar socket receive failed"),
            }
        }
    }
}
