// File: transport.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use log::{debug, trace, warn};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

use crate::errors::{TransportError, TransportResult};
use crate::target::Target;
use crate::tls;

#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Disables certificate and host name checks on TLS targets. Testing only.
    pub skip_certificate_verification: bool,
    pub max_response_bytes: usize,
    pub read_chunk_size: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            skip_certificate_verification: false,
            max_response_bytes: 65536,
            read_chunk_size: 4096,
        }
    }
}

/// Sends one raw payload per fresh connection and drains the reply.
pub struct Transport {
    config: TransportConfig,
    connector: TlsConnector,
}

impl Transport {
    pub fn new(config: TransportConfig) -> TransportResult<Self> {
        let connector = tls::build_connector(config.skip_certificate_verification)?;
        Ok(Self { config, connector })
    }

    /// Returns the drained bytes once a connection (and handshake) is up.
    ///
    /// An idle peer, a closed socket or a read error all end the response
    /// normally. Only connect and handshake failures are errors.
    pub async fn send(
        &self,
        target: &Target,
        payload: &[u8],
        timeout: Duration,
    ) -> TransportResult<Vec<u8>> {
        let started = Instant::now();
        let domain = if target.is_secure() {
            Some(tls::server_name(target.host())?)
        } else {
            None
        };
        let stream = connect(target, timeout).await?;

        let response = if let Some(domain) = domain {
            let mut tls_stream =
                match tokio::time::timeout(timeout, self.connector.connect(domain, stream)).await {
                    Ok(Ok(s)) => s,
                    Ok(Err(e)) => return Err(TransportError::Handshake(e.to_string())),
                    Err(_) => {
                        return Err(TransportError::Timeout {
                            stage: "TLS handshake",
                            after: timeout,
                        })
                    }
                };
            self.exchange(&mut tls_stream, payload, timeout).await
        } else {
            let mut stream = stream;
            self.exchange(&mut stream, payload, timeout).await
        };

        debug!(
            "{}: received {} bytes in {}ms",
            target,
            response.len(),
            started.elapsed().as_millis()
        );
        Ok(response)
    }

    async fn exchange<S>(&self, stream: &mut S, payload: &[u8], timeout: Duration) -> Vec<u8>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        match tokio::time::timeout(timeout, write_payload(stream, payload)).await {
            Ok(Ok(())) => trace!("sent {} bytes", payload.len()),
            Ok(Err(e)) => warn!("Failed to send payload: {}", e),
            Err(_) => warn!("Sending payload timed out after {:?}", timeout),
        }

        drain(
            stream,
            timeout,
            tokio::time::Instant::now() + timeout,
            self.config.max_response_bytes,
            self.config.read_chunk_size,
        )
        .await
    }
}

async fn connect(target: &Target, timeout: Duration) -> TransportResult<TcpStream> {
    let address = target.address();
    trace!("connecting to {}", address);

    match tokio::time::timeout(timeout, TcpStream::connect(&address)).await {
        Ok(Ok(stream)) => {
            let _ = stream.set_nodelay(true);
            Ok(stream)
        }
        Ok(Err(e)) => Err(TransportError::Connect(e)),
        Err(_) => Err(TransportError::Timeout {
            stage: "Connect",
            after: timeout,
        }),
    }
}

async fn write_payload<S>(stream: &mut S, payload: &[u8]) -> std::io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    stream.write_all(payload).await?;
    stream.flush().await
}

/// Reads until the peer closes, goes quiet for `idle`, errors, `limit` bytes
/// have arrived, or `deadline` passes.
pub async fn drain<S>(
    stream: &mut S,
    idle: Duration,
    deadline: tokio::time::Instant,
    limit: usize,
    chunk_size: usize,
) -> Vec<u8>
where
    S: AsyncRead + Unpin,
{
    let mut response = Vec::new();
    let mut chunk = vec![0u8; chunk_size.max(1)];

    while response.len() < limit {
        let read_deadline = deadline.min(tokio::time::Instant::now() + idle);
        match tokio::time::timeout_at(read_deadline, stream.read(&mut chunk)).await {
            Ok(Ok(0)) => {
                trace!("peer closed connection");
                break;
            }
            Ok(Ok(n)) => response.extend_from_slice(&chunk[..n]),
            Ok(Err(e)) => {
                debug!("read ended with error: {}", e);
                break;
            }
            Err(_) if read_deadline >= deadline => {
                trace!("drain deadline reached after {} bytes", response.len());
                break;
            }
            Err(_) => {
                trace!("no data for {:?}, treating response as complete", idle);
                break;
            }
        }
    }

    response.truncate(limit);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::duplex;

    fn far_deadline() -> tokio::time::Instant {
        tokio::time::Instant::now() + Duration::from_secs(30)
    }

    #[test]
    fn test_transport_config_default() {
        let config = TransportConfig::default();
        assert!(!config.skip_certificate_verification);
        assert_eq!(config.max_response_bytes, 65536);
        assert_eq!(config.read_chunk_size, 4096);
    }

    #[tokio::test]
    async fn test_drain_stops_on_close() {
        let (mut client, mut server) = duplex(1024);
        server.write_all(b"HTTP/1.1 200 OK\r\n\r\n").await.unwrap();
        drop(server);

        let bytes = drain(&mut client, Duration::from_secs(5), far_deadline(), 65536, 8).await;
        assert_eq!(bytes, b"HTTP/1.1 200 OK\r\n\r\n");
    }

    #[tokio::test]
    async fn test_drain_stops_when_idle() {
        let (mut client, mut server) = duplex(1024);
        server.write_all(b"HTTP/1.1 400").await.unwrap();

        let started = Instant::now();
        let bytes = drain(
            &mut client,
            Duration::from_millis(200),
            far_deadline(),
            65536,
            4096,
        )
        .await;
        assert_eq!(bytes, b"HTTP/1.1 400");
        assert!(started.elapsed() < Duration::from_secs(2));
        drop(server);
    }

    #[tokio::test]
    async fn test_drain_respects_limit() {
        let (mut client, mut server) = duplex(4096);
        server.write_all(&[b'A'; 1000]).await.unwrap();
        drop(server);

        let bytes = drain(&mut client, Duration::from_secs(1), far_deadline(), 100, 64).await;
        assert_eq!(bytes.len(), 100);
    }

    #[tokio::test]
    async fn test_drain_deadline_stops_trickling_peer() {
        let (mut client, mut server) = duplex(1024);
        let trickle = tokio::spawn(async move {
            while server.write_all(b"x").await.is_ok() {
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        });

        let started = Instant::now();
        let deadline = tokio::time::Instant::now() + Duration::from_millis(300);
        let bytes = drain(
            &mut client,
            Duration::from_millis(200),
            deadline,
            65536,
            4096,
        )
        .await;
        let elapsed = started.elapsed();

        assert!(!bytes.is_empty());
        assert!(bytes.len() < 65536);
        assert!(elapsed >= Duration::from_millis(300));
        assert!(elapsed < Duration::from_secs(2), "{:?}", elapsed);

        drop(client);
        trickle.await.unwrap();
    }
}
