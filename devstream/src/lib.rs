//! # Devstream
//!
//! Async prompt-framed CLI sessions for network device automation.
//!
//! Devstream drives an interactive device CLI over SSH, Telnet or any
//! tokio byte stream. It learns the device prompt on connect and then
//! reads every command's response up to that prompt.
//!
//! ## Features
//!
//! - Async transports: SSH via russh, Telnet, or any `AsyncRead + AsyncWrite`
//! - Prompt learning from a configurable delimiter list
//! - Strictly ordered command dispatch with echo and prompt stripping
//! - Extra terminator patterns per call (confirmations, password prompts)
//! - CLI mode navigation for Cisco-like devices
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use devstream::{SendOptions, SshConfig, SshTransport};
//! use devstream::platform::vendors::linux;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), devstream::Error> {
//!     let config = SshConfig::new("192.168.1.1", "admin").with_password("secret");
//!     let mut stream = linux::stream_builder(SshTransport::new(config)).build()?;
//!
//!     stream.connect().await?;
//!
//!     let output = stream.send_command("uname -a").await?;
//!     println!("{output}");
//!
//!     let output = stream
//!         .send_commands(["id", "uptime"], &SendOptions::default())
//!         .await?;
//!     println!("{output}");
//!
//!     stream.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod error;
pub mod platform;
pub mod session;
pub mod transport;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use platform::{CiscoPrompt, LastLinePrompt, PromptSetter};
pub use session::{
    DeviceManager, DeviceStream, DeviceStreamBuilder, SendOptions, SessionState, StreamConfig,
};
pub use transport::{
    AuthMethod, SshConfig, SshTransport, StreamTransport, TelnetConfig, TelnetTransport, Transport,
};
