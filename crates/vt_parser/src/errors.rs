//! Diagnostic-only error type.
//!
//! `Parser::push_bytes` never returns a `Result` and never panics: a
//! malformed or oversized sequence is discarded and parsing resumes at the
//! next byte, per the same robustness requirement `icy_engine`'s
//! `EngineError` serves for its own always-forward-progress parser. This
//! type exists so callers can opt into logging what got discarded.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("control sequence accumulator exceeded {limit} bytes, payload truncated")]
    AccumulatorOverflow { limit: usize },
    #[error("malformed sequence aborted at byte 0x{byte:02x}")]
    MalformedSequence { byte: u8 },
    #[error("invalid UTF-8 byte 0x{byte:02x}, substituted U+FFFD")]
    InvalidUtf8 { byte: u8 },
}
