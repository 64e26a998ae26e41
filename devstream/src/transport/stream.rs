//! Transport over any tokio byte stream.

use bytes::{Bytes, BytesMut};
use log::trace;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::Transport;
use crate::error::{ChannelError, Result, TransportError};

/// Maximum bytes requested from the stream per read.
const MAX_BUFFER: usize = 64 * 1024;

/// Transport over an already-established `AsyncRead + AsyncWrite` stream.
///
/// `connect` only marks the transport usable; the stream itself must be
/// open. `disconnect` shuts the write half down.
#[derive(Debug)]
pub struct StreamTransport<S> {
    host: String,
    stream: S,
    read_buf: BytesMut,
    is_open: bool,
}

impl<S> StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap a stream connected to `host`.
    pub fn new(host: impl Into<String>, stream: S) -> Self {
        Self {
            host: host.into(),
            stream,
            read_buf: BytesMut::with_capacity(MAX_BUFFER),
            is_open: false,
        }
    }

    /// Whether `connect` was called and `disconnect` was not.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Give the stream back.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S> Transport for StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn connect(&mut self) -> Result<()> {
        self.is_open = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if !self.is_open {
            return Ok(());
        }
        self.is_open = false;
        self.stream.shutdown().await.map_err(TransportError::Io)?;
        Ok(())
    }

    async fn send(&mut self, data: &str) -> Result<()> {
        if !self.is_open {
            return Err(TransportError::NotConnected.into());
        }
        self.stream
            .write_all(data.as_bytes())
            .await
            .map_err(TransportError::Io)?;
        self.stream.flush().await.map_err(TransportError::Io)?;
        trace!("{}: sent {} bytes", self.host, data.len());
        Ok(())
    }

    async fn read(&mut self) -> Result<Bytes> {
        if !self.is_open {
            return Err(TransportError::NotConnected.into());
        }
        self.read_buf.reserve(MAX_BUFFER);
        let n = self
            .stream
            .read_buf(&mut self.read_buf)
            .await
            .map_err(TransportError::Io)?;
        if n == 0 {
            return Err(ChannelError::Closed.into());
        }
        Ok(self.read_buf.split().freeze())
    }

    fn host(&self) -> &str {
        &self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn test_send_and_read() {
        let mock = tokio_test::io::Builder::new()
            .write(b"show clock\n")
            .read(b"show clock\r\n12:00\r\nR1#")
            .build();
        let mut transport = StreamTransport::new("r1", mock);
        transport.connect().await.unwrap();

        transport.send("show clock\n").await.unwrap();
        let chunk = transport.read().await.unwrap();
        assert_eq!(&chunk[..], b"show clock\r\n12:00\r\nR1#");
        assert_eq!(transport.host(), "r1");
    }

    #[tokio::test]
    async fn test_requires_connect() {
        let mock = tokio_test::io::Builder::new().build();
        let mut transport = StreamTransport::new("r1", mock);

        let err = transport.send("x\n").await.unwrap_err();
        assert!(matches!(err, Error::Transport(TransportError::NotConnected)));
    }

    #[tokio::test]
    async fn test_eof_is_closed() {
        let mock = tokio_test::io::Builder::new().build();
        let mut transport = StreamTransport::new("r1", mock);
        transport.connect().await.unwrap();

        let err = transport.read().await.unwrap_err();
        assert!(matches!(err, Error::Channel(ChannelError::Closed)));
    }
}
