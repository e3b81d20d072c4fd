//! Wire formats for the VASD pipeline.
//!
//! Two line-oriented ASCII formats meet in this crate: the datagram a
//! speed radar emits for each observation, and the pipe-delimited command
//! strings a roadside display unit understands. Both are plain text, so
//! parsing and encoding stay pure and total here: no sockets, no clocks.
//!
//! Rejecting a malformed datagram is an expected outcome, not a fault:
//! [`Reading::parse`] returns a [`ProtocolError`] the caller logs and
//! drops, and it must never panic regardless of input (fuzzed).
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod display;
pub mod errors;
pub mod reading;

pub use display::DisplayCommand;
pub use errors::{ProtocolError, Result};
pub use reading::Reading;
