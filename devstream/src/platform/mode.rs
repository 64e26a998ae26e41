//! CLI mode recognition from prompt text.

use crate::error::{LayerError, Result};

/// Maps a freshly printed prompt to the name of the CLI mode it belongs to.
pub trait ModeDetector: Send + Sync {
    /// Return the mode name for `prompt`.
    fn detect(&self, prompt: &str) -> Result<String>;
}

impl<F> ModeDetector for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn detect(&self, prompt: &str) -> Result<String> {
        self(prompt)
    }
}

/// Recognizes modes by marker substrings, checked in insertion order.
///
/// More specific markers must come first: `")#"` before `"#"`.
#[derive(Debug, Clone, Default)]
pub struct MarkerModeDetector {
    markers: Vec<(String, String)>,
}

impl MarkerModeDetector {
    /// Create an empty detector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map prompts containing `marker` to `mode`.
    pub fn with_marker(mut self, marker: impl Into<String>, mode: impl Into<String>) -> Self {
        self.markers.push((marker.into(), mode.into()));
        self
    }
}

impl ModeDetector for MarkerModeDetector {
    fn detect(&self, prompt: &str) -> Result<String> {
        self.markers
            .iter()
            .find(|(marker, _)| prompt.contains(marker.as_str()))
            .map(|(_, mode)| mode.clone())
            .ok_or_else(|| {
                LayerError::Unrecognized {
                    prompt: prompt.to_string(),
                }
                .into()
            })
    }
}
