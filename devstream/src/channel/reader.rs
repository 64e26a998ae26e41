//! Read-until-terminator loop over a transport.

use std::future::Future;
use std::time::Duration;

use log::{debug, trace};
use tokio::time::Instant;

use super::buffer::PatternBuffer;
use super::patterns::PromptMatcher;
use super::sanitize::normalize_linefeeds;
use crate::error::{ChannelError, Result};
use crate::transport::Transport;

/// Deadline for a single read-until call.
///
/// Every per-chunk read is raced against the same instant, so the limit
/// covers the whole response rather than each chunk.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deadline {
    at: Option<(Instant, Duration)>,
}

impl Deadline {
    /// Wait forever.
    pub fn none() -> Self {
        Self { at: None }
    }

    /// Expire `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Some((Instant::now() + timeout, timeout)),
        }
    }

    /// `after` when a timeout is configured, `none` otherwise.
    pub fn from_timeout(timeout: Option<Duration>) -> Self {
        timeout.map_or_else(Self::none, Self::after)
    }

    /// Whether this deadline can expire.
    pub fn is_bounded(&self) -> bool {
        self.at.is_some()
    }

    /// Run one suspension point under this deadline.
    pub async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match self.at {
            None => fut.await,
            Some((at, timeout)) => tokio::time::timeout_at(at, fut)
                .await
                .map_err(|_| ChannelError::PatternTimeout(timeout))?,
        }
    }
}

/// Buffered reader that accumulates chunks until a terminator matches.
#[derive(Debug, Default)]
pub struct ChannelReader {
    buffer: PatternBuffer,
    timeout: Option<Duration>,
}

impl ChannelReader {
    /// Create a reader around a configured buffer.
    pub fn new(buffer: PatternBuffer) -> Self {
        Self {
            buffer,
            timeout: None,
        }
    }

    /// Bound every read-until call by `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured read timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Read from `transport` until `matcher` matches the accumulated buffer.
    ///
    /// The buffer is tested after every chunk. On a match the whole buffer
    /// is returned with line endings normalized to `\n`.
    pub async fn read_until<T, M>(&mut self, transport: &mut T, matcher: &M) -> Result<String>
    where
        T: Transport,
        M: PromptMatcher + ?Sized,
    {
        self.buffer.clear();
        let deadline = Deadline::from_timeout(self.timeout);

        loop {
            let chunk = deadline.run(transport.read()).await?;
            trace!("{}: received {:?}", transport.host(), String::from_utf8_lossy(&chunk));

            self.buffer.extend(&chunk);

            if self.buffer.matches(matcher) {
                let data = self.buffer.take();
                let output = String::from_utf8_lossy(&data);
                debug!(
                    "{}: terminator matched after {} bytes",
                    transport.host(),
                    data.len()
                );
                return Ok(normalize_linefeeds(&output).into_owned());
            }
        }
    }
}
