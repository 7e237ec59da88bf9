//! Classifies an accumulated OSC payload (the bytes between `ESC ]` and its
//! terminator) into a `vt_msg::MessageKind`.
//!
//! Grounded on the `OSC_PALETTE` regex handling in
//! `crates/icy_engine/src/parsers/ansi/osc.rs`; reimplemented with hand
//! parsing rather than `regex` since the grammar here (leading numeric code,
//! one `;`-delimited payload) does not need backtracking.

use vt_msg::{Color, MessageKind, OscColorSlot, OscMessage, Terminator};

fn split_code(payload: &[u8]) -> (Option<u16>, &[u8]) {
    let mut i = 0;
    while i < payload.len() && payload[i].is_ascii_digit() {
        i += 1;
    }
    if i == 0 {
        return (None, payload);
    }
    let code = std::str::from_utf8(&payload[..i]).ok().and_then(|s| s.parse().ok());
    let rest = if payload.get(i) == Some(&b';') { &payload[i + 1..] } else { &payload[i..] };
    (code, rest)
}

/// Scales an X11 `rgb:` device-spec component (1-4 hex digits, representing
/// a fraction of `16^n - 1`) to an 8-bit channel value. Per the X11 device
/// color spec, a short component is a repeating fraction, not a
/// zero-padded one: `f` means `f/f` (full intensity), not `f/0` (a tenth of
/// it) — so the digits are tiled out to 4 hex digits, not right-padded with
/// zeros, before taking the high byte.
fn scale_hex(component: &str) -> Option<u8> {
    if component.is_empty() || component.len() > 4 || !component.bytes().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let mut padded = String::with_capacity(4);
    while padded.len() < 4 {
        padded.push_str(component);
    }
    padded.truncate(4);
    let value = u16::from_str_radix(&padded, 16).ok()?;
    Some((value >> 8) as u8)
}

fn parse_rgb_spec(spec: &[u8]) -> Option<Color> {
    let s = std::str::from_utf8(spec).ok()?;
    let s = s.strip_prefix("rgb:")?;
    let mut parts = s.split('/');
    let (r, g, b) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    Some(Color::Rgb(scale_hex(r)?, scale_hex(g)?, scale_hex(b)?))
}

fn split_once(s: &str) -> (&str, &str) {
    match s.find(';') {
        Some(pos) => (&s[..pos], &s[pos + 1..]),
        None => (s, ""),
    }
}

fn palette(rest: &[u8], terminator: Terminator) -> (MessageKind, bool) {
    let (idx, spec) = split_code(rest);
    let index = idx.unwrap_or(0);
    if spec == b"?" {
        return (MessageKind::Osc(OscMessage::PaletteQuery { index, terminator }), true);
    }
    match parse_rgb_spec(spec) {
        Some(color) => (MessageKind::Osc(OscMessage::PaletteSet { index, color }), true),
        None => (
            MessageKind::Osc(OscMessage::Passthrough { code: 4, data: String::from_utf8_lossy(rest).into_owned() }),
            false,
        ),
    }
}

fn hyperlink(rest: &[u8]) -> (MessageKind, bool) {
    let s = String::from_utf8_lossy(rest);
    let (params, uri) = split_once(&s);
    (MessageKind::Osc(OscMessage::Hyperlink { params: params.to_string(), uri: uri.to_string() }), true)
}

fn clipboard(rest: &[u8]) -> (MessageKind, bool) {
    let s = String::from_utf8_lossy(rest);
    let (selection, data) = split_once(&s);
    (MessageKind::Osc(OscMessage::Clipboard { selection: selection.to_string(), data: data.to_string() }), true)
}

fn color_set_or_query(rest: &[u8], which: OscColorSlot, terminator: Terminator) -> (MessageKind, bool) {
    if rest == b"?" {
        return (MessageKind::Osc(OscMessage::ColorQuery { which, terminator }), true);
    }
    match parse_rgb_spec(rest) {
        Some(color) => (MessageKind::Osc(OscMessage::ColorSet { which, color }), true),
        None => {
            let code = match which {
                OscColorSlot::Foreground => 10,
                OscColorSlot::Background => 11,
                OscColorSlot::Cursor => 12,
            };
            (
                MessageKind::Osc(OscMessage::Passthrough { code, data: String::from_utf8_lossy(rest).into_owned() }),
                false,
            )
        }
    }
}

fn parse_index(rest: &[u8]) -> Option<u16> {
    if rest.is_empty() {
        return None;
    }
    std::str::from_utf8(rest).ok()?.parse().ok()
}

pub(crate) fn classify(payload: &[u8], terminator: Terminator) -> (MessageKind, bool) {
    let (code, rest) = split_code(payload);
    let text = String::from_utf8_lossy(rest).into_owned();
    match code {
        Some(0) => (MessageKind::Osc(OscMessage::SetTitleAndIconName(text)), true),
        Some(1) => (MessageKind::Osc(OscMessage::SetIconName(text)), true),
        Some(2) => (MessageKind::Osc(OscMessage::SetWindowTitle(text)), true),
        Some(4) => palette(rest, terminator),
        Some(7) => (MessageKind::Osc(OscMessage::Cwd(text)), true),
        Some(8) => hyperlink(rest),
        Some(10) => color_set_or_query(rest, OscColorSlot::Foreground, terminator),
        Some(11) => color_set_or_query(rest, OscColorSlot::Background, terminator),
        Some(12) => color_set_or_query(rest, OscColorSlot::Cursor, terminator),
        Some(21) => (MessageKind::Osc(OscMessage::QueryTitle(terminator)), true),
        Some(52) => clipboard(rest),
        Some(104) => (MessageKind::Osc(OscMessage::ResetColor(parse_index(rest))), true),
        Some(110) | Some(111) | Some(112) => (MessageKind::Osc(OscMessage::ResetColor(None)), true),
        Some(133) => {
            let kind = rest.first().copied().unwrap_or(0);
            (MessageKind::Osc(OscMessage::SemanticPrompt { kind, raw: text }), true)
        }
        Some(n) => (MessageKind::Osc(OscMessage::Passthrough { code: n, data: text }), false),
        None => (MessageKind::Unknown, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_title_roundtrips_text() {
        let (kind, implemented) = classify(b"2;hello world", Terminator::Bel);
        assert!(implemented);
        assert_eq!(kind, MessageKind::Osc(OscMessage::SetWindowTitle("hello world".into())));
    }

    #[test]
    fn palette_query_is_recognized() {
        let (kind, implemented) = classify(b"4;5;?", Terminator::St);
        assert!(implemented);
        assert_eq!(kind, MessageKind::Osc(OscMessage::PaletteQuery { index: 5, terminator: Terminator::St }));
    }

    #[test]
    fn foreground_color_set_parses_rgb_spec() {
        let (kind, implemented) = classify(b"10;rgb:ff00/8000/0000", Terminator::Bel);
        assert!(implemented);
        assert_eq!(
            kind,
            MessageKind::Osc(OscMessage::ColorSet { which: OscColorSlot::Foreground, color: Color::Rgb(0xff, 0x80, 0x00) })
        );
    }

    #[test]
    fn short_rgb_components_scale_by_replication_not_zero_padding() {
        let (kind, _) = classify(b"11;rgb:f/f/f", Terminator::Bel);
        assert_eq!(
            kind,
            MessageKind::Osc(OscMessage::ColorSet { which: OscColorSlot::Background, color: Color::Rgb(0xff, 0xff, 0xff) })
        );
        let (kind, _) = classify(b"11;rgb:ab/00/f0", Terminator::Bel);
        assert_eq!(
            kind,
            MessageKind::Osc(OscMessage::ColorSet { which: OscColorSlot::Background, color: Color::Rgb(0xab, 0x00, 0xf0) })
        );
    }

    #[test]
    fn hyperlink_splits_params_and_uri() {
        let (kind, implemented) = classify(b"8;id=1;https://example.com", Terminator::St);
        assert!(implemented);
        assert_eq!(
            kind,
            MessageKind::Osc(OscMessage::Hyperlink { params: "id=1".into(), uri: "https://example.com".into() })
        );
    }

    #[test]
    fn unknown_osc_code_is_passthrough() {
        let (kind, implemented) = classify(b"9999;whatever", Terminator::Bel);
        assert!(!implemented);
        assert_eq!(kind, MessageKind::Osc(OscMessage::Passthrough { code: 9999, data: "whatever".into() }));
    }
}
