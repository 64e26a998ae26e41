//! Plain TCP transport for Telnet-style device consoles.
//!
//! No option negotiation is performed; bytes are passed through as-is.

use bytes::Bytes;
use log::info;
use tokio::net::TcpStream;

use super::Transport;
use super::config::TelnetConfig;
use super::stream::StreamTransport;
use crate::error::{Result, TransportError};

/// Telnet transport over a tokio TCP stream.
#[derive(Debug)]
pub struct TelnetTransport {
    config: TelnetConfig,
    inner: Option<StreamTransport<TcpStream>>,
}

impl TelnetTransport {
    /// Create an unconnected transport.
    pub fn new(config: TelnetConfig) -> Self {
        Self {
            config,
            inner: None,
        }
    }

    /// The connection configuration.
    pub fn config(&self) -> &TelnetConfig {
        &self.config
    }

    fn inner(&mut self) -> Result<&mut StreamTransport<TcpStream>> {
        self.inner
            .as_mut()
            .ok_or_else(|| TransportError::NotConnected.into())
    }
}

impl Transport for TelnetTransport {
    async fn connect(&mut self) -> Result<()> {
        info!(
            "{}: Establishing Telnet connection on port {}",
            self.config.host, self.config.port
        );

        let stream = tokio::time::timeout(
            self.config.timeout,
            TcpStream::connect((self.config.host.as_str(), self.config.port)),
        )
        .await
        .map_err(|_| TransportError::Timeout(self.config.timeout))?
        .map_err(|source| TransportError::ConnectionFailed {
            host: self.config.host.clone(),
            port: self.config.port,
            source,
        })?;

        let mut transport = StreamTransport::new(self.config.host.clone(), stream);
        transport.connect().await?;
        self.inner = Some(transport);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        info!("{}: Disconnecting", self.config.host);
        if let Some(mut transport) = self.inner.take() {
            transport.disconnect().await?;
        }
        Ok(())
    }

    async fn send(&mut self, data: &str) -> Result<()> {
        self.inner()?.send(data).await
    }

    async fn read(&mut self) -> Result<Bytes> {
        self.inner()?.read().await
    }

    fn host(&self) -> &str {
        &self.config.host
    }
}
