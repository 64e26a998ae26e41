//! Mode-aware device manager.

use std::future::Future;
use std::time::Duration;

use log::info;

use super::options::{Commands, SendOptions};
use super::stream::DeviceStream;
use crate::error::{ConfigError, LayerError, Result, SessionError};
use crate::platform::LayerManager;
use crate::transport::Transport;

/// Default bound on a single manager operation.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(15);

/// A device session that knows its CLI modes.
///
/// Every operation first moves the device to the right mode, then sends
/// the commands. The switch and the send are each bounded by the operation
/// timeout. A timed-out operation leaves the session in an unknown state;
/// disconnect and start over.
///
/// # Example
///
/// ```rust,no_run
/// use devstream::{TelnetConfig, TelnetTransport};
/// use devstream::platform::vendors::cisco;
///
/// # async fn example() -> Result<(), devstream::Error> {
/// let transport = TelnetTransport::new(TelnetConfig::new("192.168.1.1"));
/// let mut device = cisco::device_manager(transport, "enable-secret")?;
///
/// device.connect().await?;
/// let output = device.send_command("show ip interface brief").await?;
/// device.send_config_set(["interface lo0", "description mgmt"]).await?;
/// device.disconnect().await?;
/// # Ok(())
/// # }
/// ```
pub struct DeviceManager<T: Transport> {
    stream: DeviceStream<T>,
    layers: LayerManager,
    timeout: Duration,
    default_mode: String,
    config_mode: Option<String>,
}

impl<T: Transport> DeviceManager<T> {
    /// Create a manager. `default_mode` is where [`send_command`](Self::send_command) runs.
    pub fn new(
        stream: DeviceStream<T>,
        layers: LayerManager,
        default_mode: impl Into<String>,
    ) -> Result<Self> {
        let default_mode = default_mode.into();
        Self::require_mode(&layers, &default_mode)?;

        Ok(Self {
            stream,
            layers,
            timeout: DEFAULT_OPERATION_TIMEOUT,
            default_mode,
            config_mode: None,
        })
    }

    /// Set the mode used by [`send_config_set`](Self::send_config_set).
    pub fn with_config_mode(mut self, mode: impl Into<String>) -> Result<Self> {
        let mode = mode.into();
        Self::require_mode(&self.layers, &mode)?;
        self.config_mode = Some(mode);
        Ok(self)
    }

    /// Set the per-operation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Host of the underlying transport.
    pub fn host(&self) -> &str {
        self.stream.host()
    }

    /// The per-operation timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Borrow the underlying stream.
    pub fn stream(&self) -> &DeviceStream<T> {
        &self.stream
    }

    /// Borrow the layer manager.
    pub fn layers(&self) -> &LayerManager {
        &self.layers
    }

    /// Open the session.
    pub async fn connect(&mut self) -> Result<String> {
        self.layers.reset();
        self.stream.connect().await
    }

    /// Close the session.
    pub async fn disconnect(&mut self) -> Result<()> {
        self.stream.disconnect().await
    }

    /// Switch to `mode`, then send `commands`.
    pub async fn send_commands(
        &mut self,
        commands: impl Into<Commands>,
        mode: &str,
        options: &SendOptions,
    ) -> Result<String> {
        let commands = commands.into();
        if options.hidden {
            info!("{}: Send in {} cli mode {} hidden command(s)", self.host(), mode, commands.len());
        } else {
            info!("{}: Send in {} cli mode list of commands: {:?}", self.host(), mode, commands);
        }

        let mut output = self.switch_to_layer(mode).await?;

        let host = self.stream.host().to_string();
        let sent = bounded(
            &host,
            self.timeout,
            self.stream.send_commands(commands, options),
        )
        .await?;
        output.push_str(&sent);
        Ok(output)
    }

    /// Send commands in the default mode.
    pub async fn send_command(&mut self, commands: impl Into<Commands>) -> Result<String> {
        let mode = self.default_mode.clone();
        self.send_commands(commands, &mode, &SendOptions::default()).await
    }

    /// Send configuration commands, then return to the default mode.
    pub async fn send_config_set(&mut self, commands: impl Into<Commands>) -> Result<String> {
        let mode = self.config_mode.clone().ok_or_else(|| ConfigError::Invalid {
            message: "no configuration mode defined".to_string(),
        })?;

        let mut output = self
            .send_commands(commands, &mode, &SendOptions::raw())
            .await?;
        let default_mode = self.default_mode.clone();
        output.push_str(&self.switch_to_layer(&default_mode).await?);
        Ok(output)
    }

    /// Move the device to `mode`.
    pub async fn switch_to_layer(&mut self, mode: &str) -> Result<String> {
        let host = self.stream.host().to_string();
        bounded(
            &host,
            self.timeout,
            self.layers.switch_to(&mut self.stream, mode),
        )
        .await
    }

    fn require_mode(layers: &LayerManager, mode: &str) -> Result<()> {
        if layers.get(mode).is_none() {
            return Err(LayerError::UnknownMode {
                name: mode.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

async fn bounded<F>(host: &str, timeout: Duration, fut: F) -> Result<String>
where
    F: Future<Output = Result<String>>,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| SessionError::Timeout {
            host: host.to_string(),
            timeout,
        })?
}
