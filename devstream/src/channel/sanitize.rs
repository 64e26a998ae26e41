//! Output sanitization: echo and prompt stripping, line-ending normalization.

use std::borrow::Cow;

use memchr::{memchr, memchr2};

const BACKSPACE: char = '\x08';

/// Removes the echoed command and the trailing prompt from a response.
///
/// Both operations are heuristics. Devices whose echo or prompt layout
/// defeats them get a custom implementation via
/// [`DeviceStreamBuilder::sanitizer`](crate::session::DeviceStreamBuilder::sanitizer).
pub trait Sanitizer: Send + Sync {
    /// Strip the echoed command from the start of `output`.
    ///
    /// `command` is the normalized command exactly as it was sent.
    fn strip_command(&self, command: &str, output: &str) -> String;

    /// Strip the trailing prompt line from `output`.
    fn strip_prompt(&self, output: &str) -> String;
}

/// Default sanitizer for line-oriented CLIs.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSanitizer;

impl Sanitizer for DefaultSanitizer {
    fn strip_command(&self, command: &str, output: &str) -> String {
        if memchr(BACKSPACE as u8, output.as_bytes()).is_some() {
            // Line editing redrew the input; the echo is the whole first line.
            let output = output.replace(BACKSPACE, "");
            return match output.find('\n') {
                Some(pos) => output[pos + 1..].to_string(),
                None => String::new(),
            };
        }

        let echo_len = command.chars().count();
        match output.char_indices().nth(echo_len) {
            Some((pos, _)) => output[pos..].to_string(),
            None => String::new(),
        }
    }

    fn strip_prompt(&self, output: &str) -> String {
        match output.rfind('\n') {
            Some(pos) => output[..pos].to_string(),
            None => String::new(),
        }
    }
}

/// Normalize a command to end with exactly one newline.
pub fn normalize_command(command: &str) -> String {
    let mut normalized = command.trim_end_matches('\n').to_string();
    normalized.push('\n');
    normalized
}

/// Convert `\r\r\n`, `\r\n` and `\n\r` to `\n`.
pub fn normalize_linefeeds(output: &str) -> Cow<'_, str> {
    let bytes = output.as_bytes();
    if memchr(b'\r', bytes).is_none() {
        return Cow::Borrowed(output);
    }

    let mut normalized = String::with_capacity(output.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(offset) = memchr2(b'\r', b'\n', &bytes[pos..]) {
        let start = pos + offset;
        let rest = &bytes[start..];
        let len = if rest.starts_with(b"\r\r\n") {
            3
        } else if rest.starts_with(b"\r\n") || rest.starts_with(b"\n\r") {
            2
        } else {
            pos = start + 1;
            continue;
        };

        normalized.push_str(&output[copied..start]);
        normalized.push('\n');
        pos = start + len;
        copied = pos;
    }

    normalized.push_str(&output[copied..]);
    Cow::Owned(normalized)
}
