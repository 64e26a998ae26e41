//! Accumulating buffer for prompt matching.
//!
//! Chunks read from the transport are appended here until a terminator
//! matches. ANSI escape sequences can be filtered on the way in; the vte
//! parser keeps its state between chunks, so sequences split across reads
//! are still removed.
//!
//! An optional search depth restricts matching to the last N bytes, which
//! keeps prompt detection cheap on very large outputs.

use std::fmt;

use super::patterns::PromptMatcher;

/// Buffer for accumulating output and searching it for terminators.
pub struct PatternBuffer {
    /// The accumulated output buffer.
    buffer: Vec<u8>,

    /// How many bytes from the end to search. `None` searches everything.
    search_depth: Option<usize>,

    /// ANSI filter, present when escape stripping is enabled.
    ansi: Option<AnsiFilter>,
}

impl PatternBuffer {
    /// Create a buffer that searches its whole contents.
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(4096),
            search_depth: None,
            ansi: None,
        }
    }

    /// Only search the last `depth` bytes for terminators.
    pub fn with_search_depth(mut self, depth: usize) -> Self {
        self.search_depth = Some(depth);
        self
    }

    /// Strip ANSI escape sequences from incoming data.
    pub fn with_ansi_stripping(mut self, enabled: bool) -> Self {
        self.ansi = enabled.then(AnsiFilter::new);
        self
    }

    /// Extend the buffer with new data.
    pub fn extend(&mut self, data: &[u8]) {
        match self.ansi.as_mut() {
            Some(filter) => filter.filter_into(data, &mut self.buffer),
            None => self.buffer.extend_from_slice(data),
        }
    }

    /// The region terminators are searched in.
    fn search_region(&self) -> &[u8] {
        match self.search_depth {
            Some(depth) => {
                let start = self.buffer.len().saturating_sub(depth);
                &self.buffer[start..]
            }
            None => &self.buffer,
        }
    }

    /// Check the search region against a matcher.
    pub fn matches<M: PromptMatcher + ?Sized>(&self, matcher: &M) -> bool {
        matcher.is_match(self.search_region())
    }

    /// Take ownership of the buffer contents and reset.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buffer)
    }

    /// Get a reference to the buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the current buffer length.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for PatternBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PatternBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternBuffer")
            .field("len", &self.buffer.len())
            .field("search_depth", &self.search_depth)
            .field("strip_ansi", &self.ansi.is_some())
            .finish()
    }
}

/// Stateful ANSI escape filter backed by vte.
struct AnsiFilter {
    parser: vte::Parser,
    sink: Printable,
}

impl AnsiFilter {
    fn new() -> Self {
        Self {
            parser: vte::Parser::new(),
            sink: Printable::default(),
        }
    }

    fn filter_into(&mut self, data: &[u8], out: &mut Vec<u8>) {
        self.parser.advance(&mut self.sink, data);
        out.append(&mut self.sink.out);
    }
}

/// Collects printable text plus the control bytes the sanitizer relies on.
#[derive(Default)]
struct Printable {
    out: Vec<u8>,
}

impl vte::Perform for Printable {
    fn print(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.out
            .extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    fn execute(&mut self, byte: u8) {
        // newline, carriage return, tab, backspace
        if matches!(byte, b'\n' | b'\r' | b'\t' | 0x08) {
            self.out.push(byte);
        }
    }
}
