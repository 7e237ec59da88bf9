//! `DECRQSS` replies (spec §4.5): `DCS $ q <selector> ST` is answered with
//! `DCS <valid> $ r <payload> <selector> ST`.
//!
//! Grounded on `icy_engine::parsers::ansi::ansi_commands::
//! request_checksum_of_rectangular_area`'s `format!("\x1bP...\x1b\\")`
//! DCS-reply shape.

use vt_msg::{Color, UnderlineStyle};
use vt_screen::{SgrFlags, SgrState};

use crate::xcolor;

/// Renders the current SGR state as the `Pn` list of an `m` sequence, in
/// the fixed order decided in DESIGN.md (never reordered): intensity,
/// italic, underline, blink, inverse, hidden, strike, colors.
pub fn sgr_params_string(sgr: &SgrState) -> String {
    let mut parts = vec!["0".to_string()];
    if sgr.flags.contains(SgrFlags::BOLD) {
        parts.push("1".into());
    }
    if sgr.flags.contains(SgrFlags::FAINT) {
        parts.push("2".into());
    }
    if sgr.flags.contains(SgrFlags::ITALIC) {
        parts.push("3".into());
    }
    match sgr.underline_style {
        UnderlineStyle::None => {}
        UnderlineStyle::Single => parts.push("4".into()),
        UnderlineStyle::Double => parts.push("4:2".into()),
        UnderlineStyle::Curly => parts.push("4:3".into()),
        UnderlineStyle::Dotted => parts.push("4:4".into()),
        UnderlineStyle::Dashed => parts.push("4:5".into()),
    }
    if sgr.flags.contains(SgrFlags::BLINK_SLOW) {
        parts.push("5".into());
    }
    if sgr.flags.contains(SgrFlags::BLINK_RAPID) {
        parts.push("6".into());
    }
    if sgr.flags.contains(SgrFlags::INVERSE) {
        parts.push("7".into());
    }
    if sgr.flags.contains(SgrFlags::HIDDEN) {
        parts.push("8".into());
    }
    if sgr.flags.contains(SgrFlags::STRIKETHROUGH) {
        parts.push("9".into());
    }
    if sgr.font != 0 {
        parts.push((10 + sgr.font as u16).to_string());
    }
    if sgr.flags.contains(SgrFlags::FRAMED) {
        parts.push("51".into());
    }
    if sgr.flags.contains(SgrFlags::ENCIRCLED) {
        parts.push("52".into());
    }
    if sgr.flags.contains(SgrFlags::OVERLINED) {
        parts.push("53".into());
    }
    push_color(&mut parts, sgr.fg, 38, Some(30));
    push_color(&mut parts, sgr.bg, 48, Some(40));
    if sgr.underline_color != Color::Default {
        // SGR 58 has no bare short-form range the way 30-37/40-47 do for
        // fg/bg; a `Named` underline color must still go out as `58:5:n`,
        // never collapsed to a bare number (which would collide with the
        // real, unrelated meanings of 58-65).
        push_color(&mut parts, sgr.underline_color, 58, None);
    }
    parts.join(";")
}

fn push_color(parts: &mut Vec<String>, color: Color, extended_code: u16, named_base: Option<u16>) {
    match color {
        Color::Default => {}
        Color::Named(n) if n < 8 && named_base.is_some() => {
            parts.push((named_base.unwrap() + n as u16).to_string())
        }
        Color::Named(n) => parts.push(format!("{extended_code}:5:{n}")),
        Color::Indexed(n) => parts.push(format!("{extended_code}:5:{n}")),
        Color::Rgb(r, g, b) => parts.push(format!("{extended_code}:2:{r}:{g}:{b}")),
    }
}

/// `DCS $ q m ST` reply.
pub fn reply_sgr(sgr: &SgrState) -> String {
    format!("\x1bP1$r{}m\x1b\\", sgr_params_string(sgr))
}

/// `DCS $ q r ST` reply. `top`/`bottom` are 1-based, matching the wire
/// convention of `DECSTBM` itself.
pub fn reply_scroll_region(top: usize, bottom: usize) -> String {
    format!("\x1bP1$r{top};{bottom}r\x1b\\")
}

/// Any other recognized-but-unhandled DECRQSS selector.
pub fn reply_unknown(selector: &str) -> String {
    format!("\x1bP0$r{selector}\x1b\\")
}

/// Looks up the RGB triple a DECRQSS `m` reply's color entries resolve to,
/// exposed for callers that want to render colors rather than just the
/// index/name form `sgr_params_string` emits.
pub fn resolve_color(color: Color, default_rgb: (u8, u8, u8)) -> (u8, u8, u8) {
    xcolor::resolve(color, default_rgb)
}
