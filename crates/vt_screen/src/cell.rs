//! A single screen cell (spec §3.1).
//!
//! Grounded on `icy_engine::AttributedChar`: a value type owned exclusively
//! by its row, replaced wholesale on write rather than mutated field by
//! field from outside.

use crate::sgr_state::SgrState;

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub sgr: SgrState,
    /// Set by DECSCA; selective erase (DECSED/DECSEL) skips protected cells.
    pub protected: bool,
    /// True on the right-hand half of a double-width grapheme. Such cells
    /// carry an empty `ch` and are skipped when reading text back out.
    pub wide_cont: bool,
}

impl Cell {
    pub fn blank(sgr: SgrState) -> Self {
        Cell {
            ch: ' ',
            sgr,
            protected: false,
            wide_cont: false,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::blank(SgrState::default())
    }
}
