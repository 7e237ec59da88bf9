//! Tagged-union message types shared by `vt_parser` (producer) and
//! `vt_dispatch` (consumer).
//!
//! This crate has no knowledge of bytes or screens; it only names the
//! things a VT/xterm byte stream can mean. See `DESIGN.md` at the
//! workspace root for the grounding of each type.

mod message;
mod params;
mod sgr;

pub use message::*;
pub use params::*;
pub use sgr::*;
