//! Prompt learning strategies.
//!
//! During connect the session captures a raw exchange that ends with the
//! device prompt printed twice. A [`PromptSetter`] turns that exchange into
//! the pattern used to terminate every later read.

use regex::Regex;

use crate::error::{PromptError, Result};

/// Derives the session's prompt pattern from the bootstrap exchange.
pub trait PromptSetter: Send + Sync {
    /// Return a regex pattern matching the device's prompt.
    fn learn(&self, raw: &str) -> Result<String>;
}

impl<F> PromptSetter for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn learn(&self, raw: &str) -> Result<String> {
        self(raw)
    }
}

/// Uses the last non-empty line of the exchange verbatim.
///
/// Suits plain shells where the prompt never changes during a session.
#[derive(Debug, Default, Clone, Copy)]
pub struct LastLinePrompt;

impl PromptSetter for LastLinePrompt {
    fn learn(&self, raw: &str) -> Result<String> {
        let prompt = raw
            .lines()
            .map(str::trim)
            .rfind(|line| !line.is_empty())
            .ok_or_else(|| PromptError::NotFound {
                output: raw.to_string(),
            })?;
        Ok(regex::escape(prompt))
    }
}

/// Cisco-like prompt: `hostname`, optional `(config-mode)`, delimiter.
///
/// The learned pattern keeps matching after the device enters
/// configuration modes such as `R1(config-if)#`.
#[derive(Debug, Clone)]
pub struct CiscoPrompt {
    delimiters: Vec<String>,
}

impl CiscoPrompt {
    /// Create a setter for the given single-character delimiters.
    pub fn new<S: AsRef<str>>(delimiters: &[S]) -> Self {
        Self {
            delimiters: delimiters.iter().map(|d| d.as_ref().to_string()).collect(),
        }
    }

    /// Character class body matching any delimiter.
    fn delimiter_class(&self) -> String {
        self.delimiters.iter().map(|d| regex::escape(d)).collect()
    }
}

impl PromptSetter for CiscoPrompt {
    fn learn(&self, raw: &str) -> Result<String> {
        let class = self.delimiter_class();
        let last_line = raw.trim().rsplit('\n').next().unwrap_or_default();

        let hostname = Regex::new(&format!(r"^([\w\-]+)(?:\(.*?\))?\s?[{class}]"))
            .map_err(|e| PromptError::Custom(e.to_string()))?;
        let prompt = hostname
            .captures(last_line)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| PromptError::NotFound {
                output: raw.to_string(),
            })?;

        Ok(format!(
            r"{}(\(.*?\))?[{}]",
            regex::escape(prompt.as_str()),
            class
        ))
    }
}
