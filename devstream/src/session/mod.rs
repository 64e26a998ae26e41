//! Device sessions.
//!
//! [`DeviceStream`] is the prompt-framed command engine. [`DeviceManager`]
//! layers CLI mode navigation on top of it.

mod builder;
mod config;
mod device;
mod options;
mod stream;

pub use builder::DeviceStreamBuilder;
pub use config::StreamConfig;
pub use device::{DEFAULT_OPERATION_TIMEOUT, DeviceManager};
pub use options::{Commands, Patterns, SendOptions};
pub use stream::{DeviceStream, PromptPattern, SessionState};
