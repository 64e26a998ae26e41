//! Builder for creating device streams.

use std::time::Duration;

use super::config::StreamConfig;
use super::stream::DeviceStream;
use crate::channel::{ChannelReader, DefaultSanitizer, PatternBuffer, Sanitizer, compile_delimiters};
use crate::error::{ConfigError, Result};
use crate::platform::PromptSetter;
use crate::transport::Transport;

/// Builder for constructing a [`DeviceStream`].
///
/// # Example
///
/// ```rust,no_run
/// use devstream::{DeviceStreamBuilder, TelnetConfig, TelnetTransport};
/// use devstream::platform::CiscoPrompt;
///
/// # async fn example() -> Result<(), devstream::Error> {
/// let mut stream = DeviceStreamBuilder::new()
///     .transport(TelnetTransport::new(TelnetConfig::new("192.168.1.1")))
///     .delimiters(&[">", "#"])
///     .prompt_setter(CiscoPrompt::new(&[">", "#"]))
///     .nopage_command("terminal length 0")
///     .build()?;
///
/// stream.connect().await?;
/// let output = stream.send_command("show version").await?;
/// println!("{output}");
/// # Ok(())
/// # }
/// ```
pub struct DeviceStreamBuilder<T: Transport> {
    transport: Option<T>,
    config: StreamConfig,
    read_timeout: Option<Duration>,
    prompt_setter: Option<Box<dyn PromptSetter>>,
    sanitizer: Option<Box<dyn Sanitizer>>,
}

impl<T: Transport> DeviceStreamBuilder<T> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            transport: None,
            config: StreamConfig::default(),
            read_timeout: None,
            prompt_setter: None,
            sanitizer: None,
        }
    }

    /// Start from serialized settings.
    pub fn from_config(config: StreamConfig) -> Self {
        Self {
            config,
            ..Self::new()
        }
    }

    /// Set the transport. Required.
    pub fn transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the prompt delimiters.
    pub fn delimiters<S: AsRef<str>>(mut self, delimiters: &[S]) -> Self {
        self.config.delimiters = delimiters.iter().map(|d| d.as_ref().to_string()).collect();
        self
    }

    /// Append one prompt delimiter.
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.config.delimiters.push(delimiter.into());
        self
    }

    /// Command sent once after the prompt is learned to disable paging.
    pub fn nopage_command(mut self, command: impl Into<String>) -> Self {
        self.config.nopage_command = Some(command.into());
        self
    }

    /// Set the prompt learning strategy. Required.
    pub fn prompt_setter(mut self, setter: impl PromptSetter + 'static) -> Self {
        self.prompt_setter = Some(Box::new(setter));
        self
    }

    /// Replace the default echo/prompt stripping.
    pub fn sanitizer(mut self, sanitizer: impl Sanitizer + 'static) -> Self {
        self.sanitizer = Some(Box::new(sanitizer));
        self
    }

    /// Bound every read-until call. Unbounded by default.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Strip ANSI escape sequences from received data.
    pub fn strip_ansi(mut self, enabled: bool) -> Self {
        self.config.strip_ansi = enabled;
        self
    }

    /// Search only the last `depth` bytes of the buffer for terminators.
    pub fn search_depth(mut self, depth: usize) -> Self {
        self.config.search_depth = Some(depth);
        self
    }

    /// Build the stream.
    ///
    /// This validates the configuration but does not connect. Call
    /// `connect()` on the returned stream to open the session.
    pub fn build(self) -> Result<DeviceStream<T>> {
        let transport = self.transport.ok_or(ConfigError::MissingTransport)?;
        let prompt_setter = self.prompt_setter.ok_or(ConfigError::MissingPromptSetter)?;
        let bootstrap = compile_delimiters(&self.config.delimiters)?;

        let mut buffer = PatternBuffer::new().with_ansi_stripping(self.config.strip_ansi);
        if let Some(depth) = self.config.search_depth {
            buffer = buffer.with_search_depth(depth);
        }
        let timeout = self.read_timeout.or(self.config.read_timeout());
        let reader = ChannelReader::new(buffer).with_timeout(timeout);

        let nopage_command = self
            .config
            .nopage_command
            .filter(|command| !command.trim().is_empty());

        Ok(DeviceStream::new(
            transport,
            bootstrap,
            nopage_command,
            prompt_setter,
            self.sanitizer.unwrap_or_else(|| Box::new(DefaultSanitizer)),
            reader,
        ))
    }
}

impl<T: Transport> Default for DeviceStreamBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::platform::LastLinePrompt;
    use crate::session::{PromptPattern, SessionState};
    use crate::transport::StreamTransport;
    use tokio_test::io::{Builder, Mock};

    fn transport() -> StreamTransport<Mock> {
        StreamTransport::new("r1", Builder::new().build())
    }

    #[test]
    fn test_build_bootstrap_pattern() {
        let stream = DeviceStreamBuilder::new()
            .transport(transport())
            .delimiters(&[">", "#"])
            .prompt_setter(LastLinePrompt)
            .build()
            .unwrap();

        assert_eq!(
            stream.prompt_pattern(),
            &PromptPattern::Bootstrap(r">|\#".into())
        );
        assert_eq!(stream.state(), SessionState::Disconnected);
        assert_eq!(stream.nopage_command(), None);
    }

    #[test]
    fn test_build_requires_transport() {
        let err = DeviceStreamBuilder::<StreamTransport<Mock>>::new()
            .delimiter("#")
            .prompt_setter(LastLinePrompt)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, Error::Config(ConfigError::MissingTransport)));
    }

    #[test]
    fn test_build_requires_prompt_setter() {
        let err = DeviceStreamBuilder::new()
            .transport(transport())
            .delimiter("#")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, Error::Config(ConfigError::MissingPromptSetter)));
    }

    #[test]
    fn test_build_rejects_empty_delimiters() {
        let err = DeviceStreamBuilder::new()
            .transport(transport())
            .prompt_setter(LastLinePrompt)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, Error::Config(ConfigError::EmptyDelimiters)));

        let err = DeviceStreamBuilder::new()
            .transport(transport())
            .delimiters(&["#", ""])
            .prompt_setter(LastLinePrompt)
            .build()
            .err()
            .unwrap();
        assert!(matches!(
            err,
            Error::Config(ConfigError::EmptyDelimiter { index: 1 })
        ));
    }

    #[test]
    fn test_from_config() {
        let config = StreamConfig {
            delimiters: vec!["$".into()],
            nopage_command: Some("terminal length 0".into()),
            read_timeout_secs: Some(5),
            ..Default::default()
        };

        let stream = DeviceStreamBuilder::from_config(config)
            .transport(transport())
            .prompt_setter(LastLinePrompt)
            .build()
            .unwrap();

        assert_eq!(stream.prompt_pattern().as_str(), r"\$");
        assert_eq!(stream.nopage_command(), Some("terminal length 0"));
    }

    #[test]
    fn test_blank_nopage_command_is_skipped() {
        let stream = DeviceStreamBuilder::new()
            .transport(transport())
            .delimiter("#")
            .nopage_command("  ")
            .prompt_setter(LastLinePrompt)
            .build()
            .unwrap();
        assert_eq!(stream.nopage_command(), None);
    }
}
