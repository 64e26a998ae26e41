//! Device-specific behavior.
//!
//! This module holds the pieces that differ between vendors: how the
//! prompt is learned, how CLI modes are recognized, and how the device
//! moves between them.

mod layer;
mod manager;
mod mode;
mod prompt;
pub mod vendors;

pub use layer::{Layer, LayerCommand, PASSWORD_PATTERN};
pub use manager::LayerManager;
pub use mode::{MarkerModeDetector, ModeDetector};
pub use prompt::{CiscoPrompt, LastLinePrompt, PromptSetter};
