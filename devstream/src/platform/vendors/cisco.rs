//! Cisco-like devices (IOS, IOS-XE, NX-OS, ASA and clones).
//!
//! # Prompt Examples
//!
//! ```text
//! router>                  # unprivileged_exec
//! router#                  # privileged_exec
//! router(config)#          # config
//! router(config-if)#       # config sub-mode
//! ```
//!
//! # Mode Stack
//!
//! ```text
//! ┌───────────────────┐  enable   ┌─────────────────┐  conf t  ┌──────────┐
//! │ unprivileged_exec ├───────────► privileged_exec ├──────────► config   │
//! │        >          │  disable  │        #        │   exit   │ (...)#   │
//! └───────────────────┘◄──────────┴─────────────────┘◄─────────┴──────────┘
//! ```

use crate::error::Result;
use crate::platform::{CiscoPrompt, Layer, LayerCommand, LayerManager, MarkerModeDetector};
use crate::session::{DeviceManager, DeviceStreamBuilder};
use crate::transport::Transport;

/// Prompt delimiters.
pub const DELIMITERS: [&str; 2] = [">", "#"];

/// Pagination-disable command.
pub const NOPAGE_COMMAND: &str = "terminal length 0";

/// User EXEC mode.
pub const UNPRIVILEGED_EXEC: &str = "unprivileged_exec";

/// Privileged EXEC mode, reached with `enable`.
pub const PRIVILEGED_EXEC: &str = "privileged_exec";

/// Global configuration mode.
pub const CONFIG: &str = "config";

/// Stream builder with Cisco delimiters, prompt learner and pagination.
pub fn stream_builder<T: Transport>(transport: T) -> DeviceStreamBuilder<T> {
    DeviceStreamBuilder::new()
        .transport(transport)
        .delimiters(&DELIMITERS)
        .prompt_setter(CiscoPrompt::new(&DELIMITERS))
        .nopage_command(NOPAGE_COMMAND)
}

/// Mode detector: `)#` is config, `#` is privileged, `>` is unprivileged.
pub fn mode_detector() -> MarkerModeDetector {
    MarkerModeDetector::new()
        .with_marker(")#", CONFIG)
        .with_marker("#", PRIVILEGED_EXEC)
        .with_marker(">", UNPRIVILEGED_EXEC)
}

/// The three-mode stack. `secret` answers the `enable` password prompt.
pub fn layer_manager(secret: impl Into<String>) -> LayerManager {
    LayerManager::new(mode_detector())
        .with_layer(Layer::new(UNPRIVILEGED_EXEC))
        .with_layer(
            Layer::new(PRIVILEGED_EXEC)
                .with_enter(LayerCommand::with_password("enable", secret))
                .with_exit(LayerCommand::plain("disable")),
        )
        .with_layer(
            Layer::new(CONFIG)
                .with_enter(LayerCommand::plain("conf t"))
                .with_exit(LayerCommand::plain("exit")),
        )
}

/// Device manager defaulting to privileged EXEC, with config mode for
/// configuration sets.
pub fn device_manager<T: Transport>(
    transport: T,
    secret: impl Into<String>,
) -> Result<DeviceManager<T>> {
    let stream = stream_builder(transport).build()?;
    DeviceManager::new(stream, layer_manager(secret), PRIVILEGED_EXEC)?.with_config_mode(CONFIG)
}
