//! Linux and other Unix shells.
//!
//! Supports `$` (user) and `#` (root) prompts, with or without the
//! trailing space bash prints. The prompt is learned verbatim, so it must
//! not change during the session.

use crate::error::Result;
use crate::platform::{LastLinePrompt, Layer, LayerManager};
use crate::session::{DeviceManager, DeviceStreamBuilder};
use crate::transport::Transport;

/// Prompt delimiters.
pub const DELIMITERS: [&str; 4] = ["$", "#", "$ ", "# "];

/// The only mode.
pub const SHELL: &str = "shell";

/// Stream builder with shell delimiters and a verbatim prompt learner.
pub fn stream_builder<T: Transport>(transport: T) -> DeviceStreamBuilder<T> {
    DeviceStreamBuilder::new()
        .transport(transport)
        .delimiters(&DELIMITERS)
        .prompt_setter(LastLinePrompt)
}

/// Single-mode stack.
pub fn layer_manager() -> LayerManager {
    LayerManager::new(|_: &str| -> Result<String> { Ok(SHELL.to_string()) })
        .with_layer(Layer::new(SHELL))
}

/// Device manager with the shell as its only mode.
pub fn device_manager<T: Transport>(transport: T) -> Result<DeviceManager<T>> {
    let stream = stream_builder(transport).build()?;
    DeviceManager::new(stream, layer_manager(), SHELL)
}
