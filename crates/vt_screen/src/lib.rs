//! Terminal screen data model and operations (spec §3, §4.4).
//!
//! `ScreenModel` owns the primary and alternate screen buffers, scrollback,
//! tab stops, character-set state, and title stacks, and exposes one method
//! per ScreenModel operation. `vt_dispatch` calls these directly; nothing
//! in this crate knows about bytes, escape sequences, or `vt_parser`.

mod cell;
mod charset;
mod errors;
mod model;
mod scrollback;
mod screen;
mod sgr_state;
mod tabstops;
mod titles;

pub use cell::Cell;
pub use charset::CharsetState;
pub use errors::ScreenError;
pub use model::{ScreenConfig, ScreenModel, Snapshot};
pub use scrollback::Scrollback;
pub use screen::{SavedCursor, Screen};
pub use sgr_state::{SgrFlags, SgrState};
pub use tabstops::TabStops;
pub use titles::TitleStacks;
