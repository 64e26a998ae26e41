//! Pattern compilation and terminator matching.

use regex::bytes::{Regex, RegexBuilder};

use crate::error::ConfigError;

/// Trait for prompt matching - regex by default, extensible for custom parsers.
pub trait PromptMatcher: Send + Sync {
    /// Returns byte offset where match ends, or None if no match.
    fn find_match(&self, data: &[u8]) -> Option<usize>;

    /// Check if the data matches the pattern.
    fn is_match(&self, data: &[u8]) -> bool {
        self.find_match(data).is_some()
    }
}

/// Regex-based prompt matcher (the default implementation).
impl PromptMatcher for Regex {
    fn find_match(&self, data: &[u8]) -> Option<usize> {
        self.find(data).map(|m| m.end())
    }
}

/// Regex flags applied to every terminator of a single dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchFlags {
    /// `(?i)` semantics.
    pub case_insensitive: bool,

    /// `(?m)` semantics: `^`/`$` match at line boundaries.
    pub multi_line: bool,

    /// `(?s)` semantics: `.` also matches `\n`.
    pub dot_matches_new_line: bool,
}

impl MatchFlags {
    /// No flags set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set case-insensitive matching.
    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    /// Set multi-line anchoring.
    pub fn multi_line(mut self, yes: bool) -> Self {
        self.multi_line = yes;
        self
    }

    /// Set dot-matches-newline.
    pub fn dot_matches_new_line(mut self, yes: bool) -> Self {
        self.dot_matches_new_line = yes;
        self
    }

    /// Compile a pattern with these flags.
    pub fn compile(&self, pattern: &str) -> Result<Regex, regex::Error> {
        RegexBuilder::new(pattern)
            .case_insensitive(self.case_insensitive)
            .multi_line(self.multi_line)
            .dot_matches_new_line(self.dot_matches_new_line)
            .build()
    }
}

/// A set of terminator patterns; any one matching ends a read.
#[derive(Debug, Clone)]
pub struct TerminatorSet {
    patterns: Vec<Regex>,
}

impl TerminatorSet {
    /// Compile every pattern with the same flags.
    pub fn compile<S: AsRef<str>>(patterns: &[S], flags: MatchFlags) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| flags.compile(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }
}

impl PromptMatcher for TerminatorSet {
    fn find_match(&self, data: &[u8]) -> Option<usize> {
        self.patterns.iter().find_map(|p| p.find_match(data))
    }
}

/// Build a single alternation matching any of the literal delimiters verbatim.
pub fn compile_delimiters<S: AsRef<str>>(delimiters: &[S]) -> Result<String, ConfigError> {
    if delimiters.is_empty() {
        return Err(ConfigError::EmptyDelimiters);
    }

    let mut escaped = Vec::with_capacity(delimiters.len());
    for (index, delimiter) in delimiters.iter().enumerate() {
        let delimiter = delimiter.as_ref();
        if delimiter.is_empty() {
            return Err(ConfigError::EmptyDelimiter { index });
        }
        escaped.push(regex::escape(delimiter));
    }

    Ok(escaped.join("|"))
}

/// Two-line anchored variant of a bootstrap pattern.
///
/// Matches when the pattern ends some line and also ends the final line of
/// the buffer. Meant to be compiled with multi-line and dot-matches-newline
/// flags set.
pub fn anchored_bootstrap(pattern: &str) -> String {
    format!("({pattern}).*$.*({pattern})$")
}

/// Flags the anchored bootstrap pattern is evaluated with.
pub fn bootstrap_flags() -> MatchFlags {
    MatchFlags::new().multi_line(true).dot_matches_new_line(true)
}
