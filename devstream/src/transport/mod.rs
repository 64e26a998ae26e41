//! Byte transports a session rides on.
//!
//! A [`Transport`] only moves bytes: it knows nothing about prompts or
//! commands. SSH (via russh), Telnet and any tokio stream are provided.

pub mod config;
mod ssh;
mod stream;
mod telnet;

pub use config::{AuthMethod, HostKeyVerification, SshConfig, TelnetConfig};
pub use ssh::SshTransport;
pub use stream::StreamTransport;
pub use telnet::TelnetTransport;

use std::future::Future;

use bytes::Bytes;

use crate::error::Result;

/// An interactive byte channel to a device.
///
/// Implementations must not retry; failures are returned to the caller
/// unchanged.
pub trait Transport: Send {
    /// Open the channel.
    fn connect(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Close the channel.
    fn disconnect(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Write `data` as-is.
    fn send(&mut self, data: &str) -> impl Future<Output = Result<()>> + Send;

    /// Wait for the next non-empty chunk of received bytes.
    ///
    /// End of stream is reported as [`ChannelError::Closed`](crate::error::ChannelError::Closed).
    fn read(&mut self) -> impl Future<Output = Result<Bytes>> + Send;

    /// Host name or address, for diagnostics.
    fn host(&self) -> &str;
}
