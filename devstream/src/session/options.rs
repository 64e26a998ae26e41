//! Per-call dispatch options.

use crate::channel::MatchFlags;
use crate::error::{Result, SessionError};

/// One or more commands for a single dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commands(Vec<String>);

impl Commands {
    /// Iterate the commands in send order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there is nothing to send.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Commands {
    fn from(command: &str) -> Self {
        Self(vec![command.to_string()])
    }
}

impl From<String> for Commands {
    fn from(command: String) -> Self {
        Self(vec![command])
    }
}

impl From<&String> for Commands {
    fn from(command: &String) -> Self {
        Self(vec![command.clone()])
    }
}

impl From<Vec<String>> for Commands {
    fn from(commands: Vec<String>) -> Self {
        Self(commands)
    }
}

impl From<Vec<&str>> for Commands {
    fn from(commands: Vec<&str>) -> Self {
        Self(commands.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Commands {
    fn from(commands: &[&str]) -> Self {
        Self(commands.iter().map(|c| c.to_string()).collect())
    }
}

impl From<&[String]> for Commands {
    fn from(commands: &[String]) -> Self {
        Self(commands.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for Commands {
    fn from(commands: [&str; N]) -> Self {
        Self(commands.iter().map(|c| c.to_string()).collect())
    }
}

impl<const N: usize> From<&[&str; N]> for Commands {
    fn from(commands: &[&str; N]) -> Self {
        Self(commands.iter().map(|c| c.to_string()).collect())
    }
}

/// Extra terminator patterns for a dispatch.
///
/// The session's current prompt pattern is always appended after these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patterns {
    /// Only the current prompt pattern.
    #[default]
    None,

    /// One extra pattern.
    One(String),

    /// Several extra patterns, tested in order.
    Many(Vec<String>),
}

impl Patterns {
    /// Effective terminator list: extras first, `current` last.
    ///
    /// A single empty pattern counts as no extras. Fails with an
    /// invalid-argument error if an entry of a list is empty.
    pub fn terminators(&self, current: &str) -> Result<Vec<String>> {
        let extras: &[String] = match self {
            Patterns::None => &[],
            Patterns::One(pattern) if pattern.is_empty() => &[],
            Patterns::One(pattern) => std::slice::from_ref(pattern),
            Patterns::Many(patterns) => patterns,
        };

        if let Some(index) = extras.iter().position(String::is_empty) {
            return Err(SessionError::InvalidArgument {
                message: format!("pattern at index {index} is empty"),
            }
            .into());
        }

        let mut terminators = Vec::with_capacity(extras.len() + 1);
        terminators.extend(extras.iter().cloned());
        terminators.push(current.to_string());
        Ok(terminators)
    }
}

impl From<&str> for Patterns {
    fn from(pattern: &str) -> Self {
        Patterns::One(pattern.to_string())
    }
}

impl From<String> for Patterns {
    fn from(pattern: String) -> Self {
        Patterns::One(pattern)
    }
}

impl From<Vec<String>> for Patterns {
    fn from(patterns: Vec<String>) -> Self {
        Patterns::Many(patterns)
    }
}

impl From<Vec<&str>> for Patterns {
    fn from(patterns: Vec<&str>) -> Self {
        Patterns::Many(patterns.into_iter().map(str::to_string).collect())
    }
}

impl<T: Into<Patterns>> From<Option<T>> for Patterns {
    fn from(patterns: Option<T>) -> Self {
        patterns.map_or(Patterns::None, Into::into)
    }
}

/// Options for [`DeviceStream::send_commands`](super::DeviceStream::send_commands).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOptions {
    /// Remove the echoed command from each response.
    pub strip_command: bool,

    /// Remove the trailing prompt line from each response.
    pub strip_prompt: bool,

    /// Extra terminator patterns.
    pub patterns: Patterns,

    /// Regex flags applied to every terminator.
    pub flags: MatchFlags,

    /// Keep command text out of the logs (passwords).
    pub hidden: bool,
}

impl SendOptions {
    /// Default options: strip echo and prompt, no extra patterns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the exchange exactly as received.
    pub fn raw() -> Self {
        Self {
            strip_command: false,
            strip_prompt: false,
            ..Self::default()
        }
    }

    /// Set echo stripping.
    pub fn with_strip_command(mut self, strip: bool) -> Self {
        self.strip_command = strip;
        self
    }

    /// Set prompt stripping.
    pub fn with_strip_prompt(mut self, strip: bool) -> Self {
        self.strip_prompt = strip;
        self
    }

    /// Set extra terminator pattern(s).
    pub fn with_patterns(mut self, patterns: impl Into<Patterns>) -> Self {
        self.patterns = patterns.into();
        self
    }

    /// Set regex flags.
    pub fn with_flags(mut self, flags: MatchFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Hide command text from logs.
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            strip_command: true,
            strip_prompt: true,
            patterns: Patterns::None,
            flags: MatchFlags::default(),
            hidden: false,
        }
    }
}
