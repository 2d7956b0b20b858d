//! Reachability probe for the development server

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::debug;

/// Outcome of a single probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeResult {
    /// The server answered (any status)
    Reachable,
    /// The connection was refused, reset or otherwise failed
    Unreachable,
    /// Nothing came back within the timeout
    TimedOut,
}

impl ProbeResult {
    pub fn is_reachable(self) -> bool {
        self == ProbeResult::Reachable
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeResult::Reachable => write!(f, "reachable"),
            ProbeResult::Unreachable => write!(f, "connection refused"),
            ProbeResult::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Checks whether the application under test is up
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str, timeout: Duration) -> ProbeResult;
}

/// Prober issuing one HTTP GET
#[derive(Debug, Default, Clone)]
pub struct HttpProber;

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str, limit: Duration) -> ProbeResult {
        let client = match reqwest::Client::builder().timeout(limit).no_proxy().build() {
            Ok(client) => client,
            Err(e) => {
                debug!("Failed to build HTTP client: {}", e);
                return ProbeResult::Unreachable;
            }
        };

        // Outer bound also covers name resolution
        match timeout(limit, client.get(url).send()).await {
            Ok(Ok(resp)) => {
                debug!("Probe of {} returned {}", url, resp.status());
                ProbeResult::Reachable
            }
            Ok(Err(e)) if e.is_timeout() => {
                debug!("Probe of {} timed out: {}", url, e);
                ProbeResult::TimedOut
            }
            Ok(Err(e)) => {
                debug!("Probe of {} failed: {}", url, e);
                ProbeResult::Unreachable
            }
            Err(_) => ProbeResult::TimedOut,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_responding_server_is_reachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(b"HTTP/1.1 503 Service Unavailable\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                .await;
        });

        let result = HttpProber
            .probe(&format!("http://{}", addr), Duration::from_secs(5))
            .await;
        assert_eq!(result, ProbeResult::Reachable);
    }

    #[tokio::test]
    async fn test_closed_port_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = HttpProber
            .probe(&format!("http://{}", addr), Duration::from_secs(5))
            .await;
        assert_eq!(result, ProbeResult::Unreachable);
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let holder = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(socket);
        });

        let result = HttpProber
            .probe(&format!("http://{}", addr), Duration::from_millis(300))
            .await;
        assert_eq!(result, ProbeResult::TimedOut);
        holder.abort();
    }
}
