//! CLI mode definitions.

use log::{debug, info};
use secrecy::{ExposeSecret, SecretString};

use crate::channel::MatchFlags;
use crate::error::{ChannelError, Result};
use crate::session::{DeviceStream, SendOptions};
use crate::transport::Transport;

/// Default pattern for a password prompt, matched case-insensitively.
pub const PASSWORD_PATTERN: &str = "password";

/// A command that moves the device between CLI modes.
pub enum LayerCommand {
    /// Send the command and wait for the prompt.
    Plain(String),

    /// Send the command, and if the device asks for a password, send it.
    WithPassword {
        command: String,
        password: SecretString,
        pattern: String,
    },
}

impl LayerCommand {
    /// A command with no password exchange.
    pub fn plain(command: impl Into<String>) -> Self {
        LayerCommand::Plain(command.into())
    }

    /// A command answered with `password` when [`PASSWORD_PATTERN`] is seen.
    pub fn with_password(command: impl Into<String>, password: impl Into<String>) -> Self {
        LayerCommand::WithPassword {
            command: command.into(),
            password: SecretString::from(password.into()),
            pattern: PASSWORD_PATTERN.to_string(),
        }
    }

    /// Replace the password prompt pattern.
    pub fn with_pattern(self, pattern: impl Into<String>) -> Self {
        match self {
            LayerCommand::WithPassword {
                command, password, ..
            } => LayerCommand::WithPassword {
                command,
                password,
                pattern: pattern.into(),
            },
            plain => plain,
        }
    }

    /// The command text.
    pub fn command(&self) -> &str {
        match self {
            LayerCommand::Plain(command) | LayerCommand::WithPassword { command, .. } => command,
        }
    }

    /// Run the command on `stream` and return the raw exchange.
    pub async fn run<T: Transport>(&self, stream: &mut DeviceStream<T>) -> Result<String> {
        match self {
            LayerCommand::Plain(command) => {
                stream
                    .send_commands(command.as_str(), &SendOptions::raw())
                    .await
            }
            LayerCommand::WithPassword {
                command,
                password,
                pattern,
            } => {
                let flags = MatchFlags::new().case_insensitive(true);
                let options = SendOptions::raw()
                    .with_patterns(pattern.as_str())
                    .with_flags(flags);
                let mut output = stream.send_commands(command.as_str(), &options).await?;

                let asked = flags.compile(pattern).map_err(ChannelError::from)?;
                if asked.is_match(output.as_bytes()) {
                    debug!("{}: Sending password", stream.host());
                    // The password is not echoed, so there is nothing to strip.
                    let options = SendOptions::new()
                        .with_strip_command(false)
                        .with_hidden(true);
                    output.push_str(
                        &stream
                            .send_commands(password.expose_secret(), &options)
                            .await?,
                    );
                }
                Ok(output)
            }
        }
    }
}

impl std::fmt::Debug for LayerCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerCommand::Plain(command) => f.debug_tuple("Plain").field(command).finish(),
            LayerCommand::WithPassword {
                command, pattern, ..
            } => f
                .debug_struct("WithPassword")
                .field("command", command)
                .field("password", &"***")
                .field("pattern", pattern)
                .finish(),
        }
    }
}

/// One CLI mode and the commands that enter and leave it.
///
/// A layer with a commit command is transactional: leaving it commits
/// first.
#[derive(Debug)]
pub struct Layer {
    name: String,
    enter: Option<LayerCommand>,
    exit: Option<LayerCommand>,
    commit: Option<LayerCommand>,
}

impl Layer {
    /// Create a layer with no transitions (the base mode).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enter: None,
            exit: None,
            commit: None,
        }
    }

    /// Set the command that enters this mode from the one below.
    pub fn with_enter(mut self, command: LayerCommand) -> Self {
        self.enter = Some(command);
        self
    }

    /// Set the command that leaves this mode for the one below.
    pub fn with_exit(mut self, command: LayerCommand) -> Self {
        self.exit = Some(command);
        self
    }

    /// Make the layer transactional.
    pub fn with_commit(mut self, command: LayerCommand) -> Self {
        self.commit = Some(command);
        self
    }

    /// Mode name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether changes must be committed before leaving.
    pub fn is_transactional(&self) -> bool {
        self.commit.is_some()
    }

    /// Enter this mode.
    pub async fn enter<T: Transport>(&self, stream: &mut DeviceStream<T>) -> Result<String> {
        info!("{}: {} cli mode: Enter to this cli mode", stream.host(), self.name);
        let output = match &self.enter {
            Some(command) => command.run(stream).await?,
            None => String::new(),
        };
        debug!("{}: {} cli mode: Output after entering: {:?}", stream.host(), self.name, output);
        Ok(output)
    }

    /// Leave this mode, committing first if transactional.
    pub async fn exit<T: Transport>(&self, stream: &mut DeviceStream<T>) -> Result<String> {
        info!("{}: {} cli mode: Exit from this cli mode", stream.host(), self.name);
        let mut output = self.commit(stream).await?;
        if let Some(command) = &self.exit {
            output.push_str(&command.run(stream).await?);
        }
        debug!("{}: {} cli mode: Output after exiting: {:?}", stream.host(), self.name, output);
        Ok(output)
    }

    /// Commit pending changes. A no-op for non-transactional layers.
    pub async fn commit<T: Transport>(&self, stream: &mut DeviceStream<T>) -> Result<String> {
        let Some(command) = &self.commit else {
            debug!("{}: {} cli mode: Committing is not supported", stream.host(), self.name);
            return Ok(String::new());
        };

        info!("{}: {} cli mode: Commit changes", stream.host(), self.name);
        command.run(stream).await
    }
}
