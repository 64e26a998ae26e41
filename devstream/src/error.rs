//! Error types for devstream.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Main error type for devstream operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level errors (connect, write, disconnect)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel read errors (pattern matching, end of stream)
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Session state and dispatch errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Invalid construction-time configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Prompt learning failed
    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    /// CLI mode navigation errors
    #[error("Layer error: {0}")]
    Layer(#[from] LayerError),
}

/// Transport layer errors (SSH/Telnet connection, authentication, writes).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Server presented a key that differs from known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// Server is not in known_hosts and strict checking is enabled
    #[error("Host key for {host}:{port} is unknown")]
    HostKeyUnknown { host: String, port: u16 },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Operation attempted before connect() or after disconnect()
    #[error("Transport not connected")]
    NotConnected,

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Channel layer errors raised while reading until a terminator matches.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// No terminator matched before the read deadline
    #[error("Pattern not found within {0:?}")]
    PatternTimeout(Duration),

    /// Remote side closed the stream
    #[error("Channel closed")]
    Closed,

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Session errors (state machine, command dispatch).
#[derive(Error, Debug)]
pub enum SessionError {
    /// Session not connected
    #[error("Session not connected - call connect() first")]
    NotConnected,

    /// connect() called twice
    #[error("Session already connected")]
    AlreadyConnected,

    /// Session was disconnected and cannot be reused
    #[error("Session closed")]
    Closed,

    /// The learned prompt is set once per session
    #[error("Prompt pattern already learned")]
    AlreadyLearned,

    /// Prompt setter returned an unusable pattern
    #[error("Learned prompt pattern '{pattern}' is invalid: {message}")]
    InvalidLearnedPrompt { pattern: String, message: String },

    /// Malformed send_commands argument, raised before any I/O
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Whole operation exceeded the device manager timeout
    #[error("Host {host}: operation timed out after {timeout:?}")]
    Timeout { host: String, timeout: Duration },
}

/// Construction-time configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No transport was supplied to the builder
    #[error("Transport must be set")]
    MissingTransport,

    /// No prompt setter was supplied to the builder
    #[error("Prompt setter must be set")]
    MissingPromptSetter,

    /// Delimiter list is empty
    #[error("Delimiter list must not be empty")]
    EmptyDelimiters,

    /// Delimiter list contains an empty string
    #[error("Delimiter at index {index} is empty")]
    EmptyDelimiter { index: usize },

    /// Any other invalid setting
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// Prompt learning errors.
#[derive(Error, Debug)]
pub enum PromptError {
    /// Nothing prompt-like was found in the bootstrap exchange
    #[error("Cannot find prompt in '{output}'")]
    NotFound { output: String },

    /// Strategy-specific failure
    #[error("{0}")]
    Custom(String),
}

/// CLI mode (layer) navigation errors.
#[derive(Error, Debug)]
pub enum LayerError {
    /// Target mode is not registered
    #[error("Unknown cli mode '{name}'")]
    UnknownMode { name: String },

    /// Mode detector could not classify the prompt
    #[error("Cannot recognize cli mode from prompt '{prompt}'")]
    Unrecognized { prompt: String },

    /// Device did not end up in the expected mode
    #[error("Host {host}: cannot switch to cli mode '{target}'")]
    SwitchFailed { host: String, target: String },
}

/// Result type alias using devstream's Error.
pub type Result<T> = std::result::Result<T, Error>;
