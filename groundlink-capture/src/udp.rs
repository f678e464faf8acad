//! ## groundlink-capture::udp
//! **Datagram reader for the ingest pipeline**
//!
//! Datagrams larger than the read buffer are truncated by the socket.

use std::io;
use std::net::SocketAddr;

use async_trait::async_trait;
use groundlink_core::error::ReadError;
use groundlink_core::io::Reader;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{info, trace};

pub struct UdpReader {
    socket: UdpSocket,
}

impl UdpReader {
    pub async fn bind(addr: SocketAddr) -> io::Result<Self> {
        let socket = UdpSocket::bind(addr).await?;
        info!(addr = %socket.local_addr()?, "Listening for telemetry datagrams");
        Ok(Self { socket })
    }

    pub fn from_socket(socket: UdpSocket) -> Self {
        Self { socket }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

#[async_trait]
impl Reader for UdpReader {
    async fn read(
        &mut self,
        cancel: &CancellationToken,
        buf: &mut [u8],
    ) -> Result<usize, ReadError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Ok(0),
            received = self.socket.recv_from(buf) => {
                let (n, peer) = received?;
                trace!(%peer, len = n, "Datagram received");
                Ok(n)
            }
        }
    }
}
