//! Diagnostic-only error type. No operation on `ScreenModel` returns a
//! `Result`: out-of-range requests degrade to an empty or clamped result
//! and are logged, the same always-forward-progress stance `vt_parser`
//! takes on malformed bytes.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScreenError {
    #[error("viewport range start {start} > end {end}")]
    InvalidRange { start: usize, end: usize },
}
