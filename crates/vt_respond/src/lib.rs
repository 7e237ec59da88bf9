//! Host-bound response formatting (spec §4.5): device attributes, status
//! and cursor-position reports, DECRQSS replies, and OSC color-query
//! replies. Every function here is a pure `-> String` formatter; nothing
//! in this crate owns a socket or a callback — `vt_dispatch` calls these
//! and hands the result to whatever sink `vt_term` was built with.

mod da;
mod decrqss;
mod osc_reply;
mod xcolor;

pub use da::{charset_status, cpr, da1, da2, dsr_ok};
pub use decrqss::{reply_scroll_region, reply_sgr, reply_unknown, resolve_color, sgr_params_string};
pub use osc_reply::{color_reply, palette_reply};
pub use xcolor::indexed_to_rgb;
