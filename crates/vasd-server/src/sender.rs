//! Best-effort display sends.
//!
//! Every command gets its own short-lived TCP connection, bounded by a
//! single timeout covering connect and write. Connections are never
//! pooled or retried; a failure becomes a log line at the call site and
//! nothing more.

use std::net::SocketAddr;
use std::time::Duration;

use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::error::ServerError;

/// Bound on connect-plus-write for one display command.
pub const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a connection to the display, send one command, close.
///
/// # Errors
///
/// Returns [`ServerError::DisplayTimeout`] when the whole exchange
/// exceeds [`SEND_TIMEOUT`], and [`ServerError::DisplaySend`] for
/// connect or write failures.
pub async fn send_command(addr: SocketAddr, command: Bytes) -> Result<(), ServerError> {
    let send = async {
        let mut stream = TcpStream::connect(addr).await?;
        stream.write_all(&command).await?;
        stream.shutdown().await?;
        Ok::<(), std::io::Error>(())
    };

    match timeout(SEND_TIMEOUT, send).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(source)) => Err(ServerError::DisplaySend { addr, source }),
        Err(_) => Err(ServerError::DisplayTimeout { addr }),
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    use super::*;

    #[tokio::test]
    async fn delivers_command_bytes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let accept = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            stream.read_to_end(&mut buf).await.unwrap();
            buf
        });

        send_command(addr, Bytes::from_static(b"|C|0-0|128-128|\r\n")).await.unwrap();
        assert_eq!(accept.await.unwrap(), b"|C|0-0|128-128|\r\n");
    }

    #[tokio::test]
    async fn connect_refusal_is_a_send_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let error = send_command(addr, Bytes::from_static(b"x\r\n")).await.unwrap_err();
        assert!(matches!(
            error,
            ServerError::DisplaySend { .. } | ServerError::DisplayTimeout { .. }
        ));
    }
}
