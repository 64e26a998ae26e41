//! Vendor presets.
//!
//! Each vendor module exposes the delimiters, prompt learner and CLI mode
//! stack for one device family, plus constructors that wire them up.

pub mod cisco;
pub mod linux;
