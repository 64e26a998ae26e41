//! Channel layer: terminator matching, buffering and output cleanup.
//!
//! This module holds the read-until-prompt engine used by
//! [`DeviceStream`](crate::session::DeviceStream).

mod buffer;
mod patterns;
mod reader;
mod sanitize;

pub use buffer::PatternBuffer;
pub use patterns::{
    MatchFlags, PromptMatcher, TerminatorSet, anchored_bootstrap, bootstrap_flags,
    compile_delimiters,
};
pub use reader::{ChannelReader, Deadline};
pub use sanitize::{DefaultSanitizer, Sanitizer, normalize_command, normalize_linefeeds};
