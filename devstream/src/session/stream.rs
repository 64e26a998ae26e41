//! Prompt-framed command session over a transport.

use log::{debug, info};

use super::options::{Commands, SendOptions};
use crate::channel::{
    ChannelReader, Sanitizer, TerminatorSet, anchored_bootstrap, bootstrap_flags,
    normalize_command,
};
use crate::error::{Result, SessionError};
use crate::platform::PromptSetter;
use crate::transport::Transport;

/// The session's current matching pattern.
///
/// Starts as the delimiter alternation and is replaced exactly once by the
/// pattern learned during connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPattern {
    /// Coarse pattern built from the delimiter list.
    Bootstrap(String),

    /// Device-specific pattern returned by the prompt setter.
    Learned(String),
}

impl PromptPattern {
    /// The pattern string.
    pub fn as_str(&self) -> &str {
        match self {
            PromptPattern::Bootstrap(p) | PromptPattern::Learned(p) => p,
        }
    }

    /// Whether the learned pattern is in place.
    pub fn is_learned(&self) -> bool {
        matches!(self, PromptPattern::Learned(_))
    }

    /// Replace the bootstrap pattern. Fails if already learned.
    pub fn learn(&mut self, pattern: String) -> Result<()> {
        match self {
            PromptPattern::Bootstrap(_) => {
                *self = PromptPattern::Learned(pattern);
                Ok(())
            }
            PromptPattern::Learned(_) => Err(SessionError::AlreadyLearned.into()),
        }
    }
}

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, transport not opened yet.
    Disconnected,

    /// Probing the device for its prompt.
    BootstrappingPrompt,

    /// Running the pagination-disable command.
    PreparingSession,

    /// Accepting commands.
    Ready,

    /// Disconnected for good.
    Closed,
}

/// Interactive command session framed by the device prompt.
///
/// Owns its transport exclusively. Commands are sent strictly one after
/// another: each command's response is read to its terminator before the
/// next command is written.
///
/// Build one with [`DeviceStreamBuilder`](super::DeviceStreamBuilder).
pub struct DeviceStream<T: Transport> {
    transport: T,
    prompt: PromptPattern,
    nopage_command: Option<String>,
    prompt_setter: Box<dyn PromptSetter>,
    sanitizer: Box<dyn Sanitizer>,
    reader: ChannelReader,
    state: SessionState,
}

impl<T: Transport> DeviceStream<T> {
    pub(crate) fn new(
        transport: T,
        bootstrap_pattern: String,
        nopage_command: Option<String>,
        prompt_setter: Box<dyn PromptSetter>,
        sanitizer: Box<dyn Sanitizer>,
        reader: ChannelReader,
    ) -> Self {
        Self {
            transport,
            prompt: PromptPattern::Bootstrap(bootstrap_pattern),
            nopage_command,
            prompt_setter,
            sanitizer,
            reader,
            state: SessionState::Disconnected,
        }
    }

    /// Host of the underlying transport.
    pub fn host(&self) -> &str {
        self.transport.host()
    }

    /// The current matching pattern.
    pub fn prompt_pattern(&self) -> &PromptPattern {
        &self.prompt
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether commands can be sent.
    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    /// Configured pagination-disable command.
    pub fn nopage_command(&self) -> Option<&str> {
        self.nopage_command.as_deref()
    }

    /// Borrow the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Open the transport, learn the prompt and prepare the session.
    ///
    /// Returns the raw output of both stages, which usually holds the
    /// login banner.
    pub async fn connect(&mut self) -> Result<String> {
        match self.state {
            SessionState::Disconnected => {}
            SessionState::Closed => return Err(SessionError::Closed.into()),
            _ => return Err(SessionError::AlreadyConnected.into()),
        }

        info!("{}: Establishing connection", self.host());
        self.transport.connect().await?;

        self.state = SessionState::BootstrappingPrompt;
        let mut output = self.find_prompt().await?;

        self.state = SessionState::PreparingSession;
        output.push_str(&self.session_preparation().await?);

        self.state = SessionState::Ready;
        Ok(output)
    }

    /// Close the transport. The session cannot be reused afterwards.
    pub async fn disconnect(&mut self) -> Result<()> {
        match self.state {
            SessionState::Closed => return Ok(()),
            SessionState::Disconnected => {}
            _ => {
                info!("{}: Closing connection", self.host());
                self.transport.disconnect().await?;
            }
        }
        self.state = SessionState::Closed;
        Ok(())
    }

    /// Send commands in order and return their concatenated output.
    ///
    /// The terminator list is `options.patterns` followed by the current
    /// prompt pattern. Malformed patterns are rejected before anything is
    /// written.
    pub async fn send_commands(
        &mut self,
        commands: impl Into<Commands>,
        options: &SendOptions,
    ) -> Result<String> {
        match self.state {
            SessionState::Ready => {}
            SessionState::Closed => return Err(SessionError::Closed.into()),
            _ => return Err(SessionError::NotConnected.into()),
        }

        let current = self.prompt.as_str().to_string();
        self.dispatch(commands.into(), options, &current).await
    }

    /// Send a single command with default options.
    pub async fn send_command(&mut self, command: &str) -> Result<String> {
        self.send_commands(command, &SendOptions::default()).await
    }

    /// Learn the device prompt from a blank-line exchange.
    async fn find_prompt(&mut self) -> Result<String> {
        info!("{}: Setting prompt", self.host());

        // The device echoes the blank line and reprints its prompt, so the
        // last two lines both end with a delimiter.
        let anchored = anchored_bootstrap(self.prompt.as_str());
        let options = SendOptions::raw().with_flags(bootstrap_flags());
        let raw = self.dispatch(Commands::from("\n"), &options, &anchored).await?;

        let learned = self.prompt_setter.learn(&raw)?;
        validate_learned(&learned)?;
        self.prompt.learn(learned)?;

        debug!(
            "{}: Set prompt pattern to: {}",
            self.host(),
            self.prompt.as_str()
        );
        Ok(raw)
    }

    /// Disable paging, if a command for it is configured.
    async fn session_preparation(&mut self) -> Result<String> {
        let Some(command) = self.nopage_command.clone() else {
            debug!("{}: No pagination command configured", self.host());
            return Ok(String::new());
        };

        info!("{}: Setting no page for output", self.host());
        let current = self.prompt.as_str().to_string();
        self.dispatch(Commands::from(command), &SendOptions::default(), &current)
            .await
    }

    async fn dispatch(
        &mut self,
        commands: Commands,
        options: &SendOptions,
        current: &str,
    ) -> Result<String> {
        let terminators = options.patterns.terminators(current)?;
        let matcher = TerminatorSet::compile(&terminators, options.flags).map_err(|e| {
            SessionError::InvalidArgument {
                message: e.to_string(),
            }
        })?;

        if options.hidden {
            debug!("{}: Send to stream {} hidden command(s)", self.host(), commands.len());
        } else {
            debug!("{}: Send to stream the list of commands: {:?}", self.host(), commands);
        }
        debug!("{}: Read until pattern list: {:?}", self.host(), terminators);

        let mut output = String::new();
        for command in commands.iter() {
            let command = normalize_command(command);
            self.transport.send(&command).await?;

            let mut buf = self.reader.read_until(&mut self.transport, &matcher).await?;
            if options.strip_command {
                buf = self.sanitizer.strip_command(&command, &buf);
            }
            if options.strip_prompt {
                buf = self.sanitizer.strip_prompt(&buf);
            }
            output.push_str(&buf);
        }

        Ok(output)
    }
}

impl<T: Transport> std::fmt::Debug for DeviceStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceStream")
            .field("host", &self.host())
            .field("prompt", &self.prompt)
            .field("nopage_command", &self.nopage_command)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

fn validate_learned(pattern: &str) -> Result<()> {
    if pattern.is_empty() {
        return Err(SessionError::InvalidLearnedPrompt {
            pattern: String::new(),
            message: "pattern is empty".to_string(),
        }
        .into());
    }

    regex::Regex::new(pattern).map_err(|e| SessionError::InvalidLearnedPrompt {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::platform::LastLinePrompt;
    use crate::session::DeviceStreamBuilder;
    use crate::transport::StreamTransport;
    use tokio_test::io::{Builder, Mock};

    fn stream(mock: Mock, delimiters: &[&str]) -> DeviceStream<StreamTransport<Mock>> {
        DeviceStreamBuilder::new()
            .transport(StreamTransport::new("r1", mock))
            .delimiters(delimiters)
            .prompt_setter(LastLinePrompt)
            .build()
            .unwrap()
    }

    #[test]
    fn test_prompt_pattern_learns_once() {
        let mut prompt = PromptPattern::Bootstrap("#".into());
        assert!(!prompt.is_learned());

        prompt.learn(r"R1\#".into()).unwrap();
        assert_eq!(prompt, PromptPattern::Learned(r"R1\#".into()));

        let err = prompt.learn("R2".into()).unwrap_err();
        assert!(matches!(err, Error::Session(SessionError::AlreadyLearned)));
        assert_eq!(prompt.as_str(), r"R1\#");
    }

    #[tokio::test]
    async fn test_echo_and_prompt_stripped_to_empty() {
        let mock = Builder::new()
            .write(b"\n")
            .read(b"\r\nRouter>\r\nRouter>")
            .write(b"show version\n")
            .read(b"show version\n")
            .read(b"Router>")
            .build();
        let mut session = stream(mock, &["Router>"]);

        let banner = session.connect().await.unwrap();
        assert_eq!(banner, "\nRouter>\nRouter>");
        assert_eq!(
            session.prompt_pattern(),
            &PromptPattern::Learned("Router>".into())
        );

        let output = session
            .send_commands("show version", &SendOptions::default())
            .await
            .unwrap();
        assert_eq!(output, "");
    }

    #[tokio::test]
    async fn test_nopage_command_sent_during_connect() {
        let mock = Builder::new()
            .write(b"\n")
            .read(b"\nR1#\nR1#")
            .write(b"terminal length 0\n")
            .read(b"terminal length 0\nR1#")
            .build();
        let mut session = DeviceStreamBuilder::new()
            .transport(StreamTransport::new("r1", mock))
            .delimiters(&["#"])
            .nopage_command("terminal length 0")
            .prompt_setter(LastLinePrompt)
            .build()
            .unwrap();

        let output = session.connect().await.unwrap();
        assert_eq!(output, "\nR1#\nR1#");
        assert!(session.is_ready());
    }

    #[tokio::test]
    async fn test_send_before_connect() {
        let mut session = stream(Builder::new().build(), &["#"]);
        let err = session.send_command("show clock").await.unwrap_err();
        assert!(matches!(err, Error::Session(SessionError::NotConnected)));
    }

    #[tokio::test]
    async fn test_invalid_patterns_rejected_before_io() {
        let mock = Builder::new().write(b"\n").read(b"\nR1#\nR1#").build();
        let mut session = stream(mock, &["#"]);
        session.connect().await.unwrap();

        // Nothing else is scripted: any write would fail the mock.
        let err = session
            .send_commands("show clock", &SendOptions::new().with_patterns(vec!["confirm", ""]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Session(SessionError::InvalidArgument { .. })
        ));

        let err = session
            .send_commands("show clock", &SendOptions::new().with_patterns("(unclosed"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Session(SessionError::InvalidArgument { .. })
        ));
    }

    #[tokio::test]
    async fn test_lifecycle_is_one_way() {
        let mock = Builder::new().write(b"\n").read(b"\nR1#\nR1#").build();
        let mut session = stream(mock, &["#"]);
        session.connect().await.unwrap();

        let err = session.connect().await.unwrap_err();
        assert!(matches!(err, Error::Session(SessionError::AlreadyConnected)));

        session.disconnect().await.unwrap();
        assert_eq!(session.state(), SessionState::Closed);

        let err = session.send_command("show clock").await.unwrap_err();
        assert!(matches!(err, Error::Session(SessionError::Closed)));
        let err = session.connect().await.unwrap_err();
        assert!(matches!(err, Error::Session(SessionError::Closed)));
    }

    #[tokio::test]
    async fn test_invalid_learned_prompt() {
        let mock = Builder::new().write(b"\n").read(b"\nR1#\nR1#").build();
        let mut session = DeviceStreamBuilder::new()
            .transport(StreamTransport::new("r1", mock))
            .delimiters(&["#"])
            .prompt_setter(|_: &str| -> Result<String> { Ok("(".to_string()) })
            .build()
            .unwrap();

        let err = session.connect().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Session(SessionError::InvalidLearnedPrompt { .. })
        ));
        assert!(!session.prompt_pattern().is_learned());
    }
}
