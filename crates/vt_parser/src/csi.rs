//! Classifies a fully-accumulated CSI sequence (private marker, parameter
//! list, intermediates, final byte) into a `vt_msg::MessageKind`.
//!
//! Grounded on the `'['`-prefixed arm of `icy_engine`'s ANSI state machine
//! (`crates/icy_engine/src/parsers/ansi/mod.rs`), which dispatches on the
//! same (marker, final byte) pairs; rewritten here as a pure function
//! returning a typed message rather than mutating a buffer in place.

use crate::sgr::decode_sgr;
use vt_msg::*;

pub(crate) fn classify(params: CsiParams, final_byte: u8) -> (MessageKind, bool) {
    let marker = params.private_marker;
    match final_byte {
        b'A' => (MessageKind::CursorUp(params.count(0)), true),
        b'B' => (MessageKind::CursorDown(params.count(0)), true),
        b'C' => (MessageKind::CursorForward(params.count(0)), true),
        b'D' => (MessageKind::CursorBack(params.count(0)), true),
        b'E' => (MessageKind::CursorNextLine(params.count(0)), true),
        b'F' => (MessageKind::CursorPrevLine(params.count(0)), true),
        b'G' => (MessageKind::CursorHorizontalAbsolute(params.count(0)), true),
        b'd' => (MessageKind::CursorVerticalAbsolute(params.count(0)), true),
        b'H' | b'f' => (
            MessageKind::CursorPosition {
                row: params.count(0),
                col: params.count(1),
            },
            true,
        ),
        b'I' => (MessageKind::CursorForwardTabs(params.count(0)), true),
        b'Z' => (MessageKind::CursorBackwardTabs(params.count(0)), true),

        b'J' => erase_display(&params, marker),
        b'K' => erase_line(&params, marker),
        b'X' => (MessageKind::EraseCharacter(params.count(0)), true),

        b'L' => (MessageKind::InsertLines(params.count(0)), true),
        b'M' => (MessageKind::DeleteLines(params.count(0)), true),
        b'@' => (MessageKind::InsertCharacters(params.count(0)), true),
        b'P' => (MessageKind::DeleteCharacters(params.count(0)), true),
        b'b' => (MessageKind::RepeatPrecedingCharacter(params.count(0)), true),

        b'S' => (MessageKind::ScrollUp(params.count(0)), true),
        b'T' => (MessageKind::ScrollDown(params.count(0)), true),

        b'h' | b'l' => (
            MessageKind::SetMode {
                private: marker == Some(b'?'),
                modes: params.all(0),
                enable: final_byte == b'h',
            },
            true,
        ),

        b'm' => sgr_message(&params, marker),

        b'n' => device_query(&params, marker),
        b'c' => (
            MessageKind::DeviceQuery(if marker == Some(b'>') {
                DeviceQuery::SecondaryAttributes
            } else {
                DeviceQuery::PrimaryAttributes
            }),
            true,
        ),

        b'g' => match params.get(0, 0) {
            0 => (MessageKind::TabClear { all: false }, true),
            3 => (MessageKind::TabClear { all: true }, true),
            _ => unknown(&params, final_byte),
        },

        b's' => {
            if marker == Some(b'?') {
                (MessageKind::XtSaveModes(params.all(0)), true)
            } else {
                (MessageKind::ScoSaveCursor, true)
            }
        }
        b'u' if marker.is_none() && params.intermediates.is_empty() => {
            (MessageKind::ScoRestoreCursor, true)
        }
        b'r' => {
            if marker == Some(b'?') {
                (MessageKind::XtRestoreModes(params.all(0)), true)
            } else {
                (
                    MessageKind::SetScrollingRegion {
                        top: params.get(0, 0),
                        bottom: params.get(1, 0),
                    },
                    true,
                )
            }
        }

        b't' => window_op(&params),

        b'q' => cursor_style_or_protection(&params),
        b'p' if params.intermediates == [b'!'] => (MessageKind::SoftReset, true),

        _ => unknown(&params, final_byte),
    }
}

fn erase_display(params: &CsiParams, marker: Option<u8>) -> (MessageKind, bool) {
    let private = marker == Some(b'?');
    match EraseMode::from_param(params.get(0, 0), true) {
        Some(mode) if private => (MessageKind::SelectiveEraseInDisplay(mode), true),
        Some(mode) => (MessageKind::EraseInDisplay(mode), true),
        None => unknown(params, b'J'),
    }
}

fn erase_line(params: &CsiParams, marker: Option<u8>) -> (MessageKind, bool) {
    let private = marker == Some(b'?');
    match EraseMode::from_param(params.get(0, 0), false) {
        Some(mode) if private => (MessageKind::SelectiveEraseInLine(mode), true),
        Some(mode) => (MessageKind::EraseInLine(mode), true),
        None => unknown(params, b'K'),
    }
}

fn sgr_message(params: &CsiParams, marker: Option<u8>) -> (MessageKind, bool) {
    match marker {
        None => (MessageKind::Sgr(decode_sgr(&params.params)), true),
        Some(b'>') => {
            if params.get(0, 0) == 4 {
                let style = match params.get(1, 1) {
                    0 => UnderlineStyle::None,
                    2 => UnderlineStyle::Double,
                    3 => UnderlineStyle::Curly,
                    4 => UnderlineStyle::Dotted,
                    5 => UnderlineStyle::Dashed,
                    _ => UnderlineStyle::Single,
                };
                (MessageKind::SgrPrivate(PrivateSgr::UnderlineStyleSelect(style)), true)
            } else {
                (
                    MessageKind::SgrPrivate(PrivateSgr::Unknown {
                        marker: b'>',
                        code: params.get(0, 0),
                        value: params.params.get(1).and_then(SubParams::first),
                    }),
                    false,
                )
            }
        }
        Some(m) => (
            MessageKind::SgrPrivate(PrivateSgr::Unknown {
                marker: m,
                code: params.get(0, 0),
                value: params.params.get(1).and_then(SubParams::first),
            }),
            false,
        ),
    }
}

fn device_query(params: &CsiParams, marker: Option<u8>) -> (MessageKind, bool) {
    if marker == Some(b'?') {
        if params.get(0, 0) == 26 {
            return (MessageKind::DeviceQuery(DeviceQuery::CharsetStatusReport), true);
        }
        return unknown(params, b'n');
    }
    match params.get(0, 0) {
        5 => (MessageKind::DeviceQuery(DeviceQuery::StatusReport), true),
        6 => (MessageKind::DeviceQuery(DeviceQuery::CursorPositionReport), true),
        _ => unknown(params, b'n'),
    }
}

fn window_op(params: &CsiParams) -> (MessageKind, bool) {
    match params.get(0, 0) {
        22 => match params.get(1, 0) {
            1 => (MessageKind::TitleStack(TitleStackOp::PushIconName), true),
            2 => (MessageKind::TitleStack(TitleStackOp::PushTitle), true),
            _ => unknown(params, b't'),
        },
        23 => match params.get(1, 0) {
            1 => (MessageKind::TitleStack(TitleStackOp::PopIconName), true),
            2 => (MessageKind::TitleStack(TitleStackOp::PopTitle), true),
            _ => unknown(params, b't'),
        },
        op => {
            let all = params.all(0);
            let rest = if all.len() > 1 { all[1..].to_vec() } else { Vec::new() };
            (MessageKind::WindowOp { op, params: rest }, true)
        }
    }
}

fn cursor_style_or_protection(params: &CsiParams) -> (MessageKind, bool) {
    match params.intermediates.as_slice() {
        [b' '] => (MessageKind::SetCursorStyle(params.get(0, 0).min(6) as u8), true),
        [b'"'] => {
            let mode = if params.get(0, 0) == 1 {
                ProtectionMode::Protect
            } else {
                ProtectionMode::Unprotect
            };
            (MessageKind::SetProtection(mode), true)
        }
        _ => unknown(params, b'q'),
    }
}

fn unknown(params: &CsiParams, final_byte: u8) -> (MessageKind, bool) {
    (MessageKind::UnknownCsi(params.clone(), final_byte), false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(values: &[u16]) -> CsiParams {
        CsiParams {
            private_marker: None,
            params: values.iter().map(|v| SubParams::single(*v)).collect(),
            intermediates: vec![],
        }
    }

    #[test]
    fn cup_defaults_to_one_one() {
        let (kind, implemented) = classify(CsiParams::default(), b'H');
        assert!(implemented);
        assert_eq!(kind, MessageKind::CursorPosition { row: 1, col: 1 });
    }

    #[test]
    fn ed_with_private_marker_is_selective() {
        let mut p = params(&[1]);
        p.private_marker = Some(b'?');
        let (kind, implemented) = classify(p, b'J');
        assert!(implemented);
        assert_eq!(kind, MessageKind::SelectiveEraseInDisplay(EraseMode::StartToCursor));
    }

    #[test]
    fn decset_sets_private_modes() {
        let mut p = params(&[1049, 2004]);
        p.private_marker = Some(b'?');
        let (kind, _) = classify(p, b'h');
        assert_eq!(
            kind,
            MessageKind::SetMode {
                private: true,
                modes: vec![1049, 2004],
                enable: true,
            }
        );
    }

    #[test]
    fn decstbm_reads_region() {
        let (kind, implemented) = classify(params(&[5, 20]), b'r');
        assert!(implemented);
        assert_eq!(kind, MessageKind::SetScrollingRegion { top: 5, bottom: 20 });
    }
}
