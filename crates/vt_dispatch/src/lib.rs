//! Routes one classified `vt_msg::Message` to `vt_screen::ScreenModel`
//! mutations and, where the message calls for a reply, a `vt_respond`
//! formatted string (spec §4.3).
//!
//! Grounded on `icy_engine::parsers::BufferParser::print_char`'s
//! state-driven match-and-apply structure
//! (`crates/icy_engine/src/parsers/ansi/mod.rs`), reshaped from "one trait
//! method handling one character at a time across many states" into "one
//! pure function handling one already-classified message."

mod defaults;

pub use defaults::HostDefaults;

use vt_msg::{DcsMessage, DeviceQuery, Message, MessageKind, OscMessage};
use vt_screen::ScreenModel;

/// What the host should do in response to dispatching one message.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchEffect {
    /// No observable effect beyond whatever `screen` mutation happened.
    None,
    /// Bytes the host should write back to the client (DA/DSR/CPR/DECRQSS/
    /// OSC color-query replies).
    Respond(String),
    /// BEL: forward to the host's bell hook; never touches the screen.
    Bell,
}

/// Applies one message to `screen`, threading `defaults` through for the
/// OSC 10/11/12 color get/set pair. Ordering matters only in that this
/// function must be called once per message in the order `vt_parser`
/// emitted them (spec §4.3's "strict byte-order" guarantee is the
/// caller's job, not this function's) — every query here reads `screen`
/// strictly after any earlier message's mutation has already landed, so
/// "mutate then respond" falls out of sequential dispatch for free.
pub fn apply(screen: &mut ScreenModel, defaults: &mut HostDefaults, message: &Message) -> DispatchEffect {
    match &message.kind {
        MessageKind::Print(ch) => {
            screen.print_char(*ch);
            DispatchEffect::None
        }

        MessageKind::SaveCursor => noop(|| screen.decsc()),
        MessageKind::RestoreCursor => noop(|| screen.decrc()),
        MessageKind::Index => noop(|| screen.index()),
        MessageKind::NextLine => noop(|| screen.next_line()),
        MessageKind::ReverseIndex => noop(|| screen.reverse_index()),
        MessageKind::SetTab => noop(|| screen.set_tab()),
        MessageKind::HardReset => noop(|| screen.hard_reset()),
        MessageKind::DesignateCharset { slot, charset } => {
            noop(|| screen.designate_charset(*slot, *charset))
        }

        MessageKind::Bell => DispatchEffect::Bell,
        MessageKind::Backspace => noop(|| screen.backspace()),
        MessageKind::Tab => noop(|| screen.tab()),
        MessageKind::LineFeed | MessageKind::FormFeed => noop(|| screen.line_feed()),
        MessageKind::CarriageReturn => noop(|| screen.carriage_return()),
        MessageKind::ShiftOut => noop(|| screen.shift_out()),
        MessageKind::ShiftIn => noop(|| screen.shift_in()),

        MessageKind::CursorUp(n) => noop(|| screen.cursor_up(*n)),
        MessageKind::CursorDown(n) => noop(|| screen.cursor_down(*n)),
        MessageKind::CursorForward(n) => noop(|| screen.cursor_forward(*n)),
        MessageKind::CursorBack(n) => noop(|| screen.cursor_back(*n)),
        MessageKind::CursorNextLine(n) => noop(|| screen.cursor_next_line(*n)),
        MessageKind::CursorPrevLine(n) => noop(|| screen.cursor_prev_line(*n)),
        MessageKind::CursorHorizontalAbsolute(n) => noop(|| screen.cursor_horizontal_absolute(*n)),
        MessageKind::CursorVerticalAbsolute(n) => noop(|| screen.cursor_vertical_absolute(*n)),
        MessageKind::CursorPosition { row, col } => noop(|| screen.cursor_position(*row, *col)),
        MessageKind::CursorForwardTabs(n) => noop(|| screen.cursor_forward_tabs(*n)),
        MessageKind::CursorBackwardTabs(n) => noop(|| screen.cursor_backward_tabs(*n)),

        MessageKind::EraseInDisplay(mode) => noop(|| screen.erase_in_display(*mode)),
        MessageKind::EraseInLine(mode) => noop(|| screen.erase_in_line(*mode)),
        MessageKind::EraseCharacter(n) => noop(|| screen.erase_character(*n)),
        MessageKind::SelectiveEraseInDisplay(mode) => noop(|| screen.selective_erase_in_display(*mode)),
        MessageKind::SelectiveEraseInLine(mode) => noop(|| screen.selective_erase_in_line(*mode)),

        MessageKind::InsertLines(n) => noop(|| screen.insert_lines(*n)),
        MessageKind::DeleteLines(n) => noop(|| screen.delete_lines(*n)),
        MessageKind::InsertCharacters(n) => noop(|| screen.insert_characters(*n)),
        MessageKind::DeleteCharacters(n) => noop(|| screen.delete_characters(*n)),
        MessageKind::RepeatPrecedingCharacter(n) => noop(|| screen.repeat_preceding_character(*n)),

        MessageKind::ScrollUp(n) => noop(|| screen.scroll_up(*n)),
        MessageKind::ScrollDown(n) => noop(|| screen.scroll_down(*n)),
        MessageKind::SetScrollingRegion { top, bottom } => {
            noop(|| screen.set_scrolling_region(*top, *bottom))
        }

        MessageKind::SetMode { private, modes, enable } => {
            noop(|| screen.set_mode(*private, modes.clone(), *enable))
        }
        MessageKind::XtSaveModes(modes) => noop(|| screen.xtsave_modes(modes.clone())),
        MessageKind::XtRestoreModes(modes) => noop(|| screen.xtrestore_modes(modes.clone())),
        MessageKind::SetCursorStyle(style) => noop(|| screen.set_cursor_style(*style)),

        MessageKind::ScoSaveCursor => noop(|| screen.sco_save_cursor()),
        MessageKind::ScoRestoreCursor => noop(|| screen.sco_restore_cursor()),

        MessageKind::DeviceQuery(query) => dispatch_device_query(screen, *query),

        MessageKind::TabClear { all } => noop(|| screen.tab_clear(*all)),

        MessageKind::TitleStack(op) => noop(|| screen.title_stack(*op)),
        MessageKind::WindowOp { op, .. } => dispatch_window_op(screen, *op),

        MessageKind::SoftReset => noop(|| screen.soft_reset()),
        MessageKind::SetProtection(mode) => noop(|| screen.set_protection(*mode)),

        MessageKind::Sgr(attrs) => noop(|| screen.apply_sgr(attrs.clone())),
        MessageKind::SgrPrivate(p) => noop(|| screen.apply_sgr_private(*p)),

        MessageKind::Osc(osc) => dispatch_osc(screen, defaults, osc),
        MessageKind::Dcs(dcs) => dispatch_dcs(screen, dcs),

        MessageKind::Unknown => {
            log::trace!("unrecognized message, raw={:?}", message.raw);
            DispatchEffect::None
        }
        MessageKind::UnknownCsi(params, final_byte) => {
            log::trace!("unrecognized CSI final byte {:#04x}, params={:?}", final_byte, params);
            DispatchEffect::None
        }
    }
}

fn noop(f: impl FnOnce()) -> DispatchEffect {
    f();
    DispatchEffect::None
}

fn dispatch_device_query(screen: &mut ScreenModel, query: DeviceQuery) -> DispatchEffect {
    let reply = match query {
        DeviceQuery::PrimaryAttributes => vt_respond::da1(),
        DeviceQuery::SecondaryAttributes => vt_respond::da2(),
        DeviceQuery::StatusReport => vt_respond::dsr_ok(),
        DeviceQuery::CursorPositionReport => {
            let (row, col) = screen.cursor_report_position();
            vt_respond::cpr(row, col)
        }
        DeviceQuery::CharsetStatusReport => {
            vt_respond::charset_status(screen.is_utf8_mode(), screen.gl_designation())
        }
    };
    DispatchEffect::Respond(reply)
}

/// `CSI 21 t` (report window title) is the only window-manipulation op
/// this model answers; the rest (move/resize/raise/lower/iconify) name
/// host-window operations with no ScreenModel counterpart and are
/// accepted without effect, like an unknown private mode.
fn dispatch_window_op(screen: &mut ScreenModel, op: u16) -> DispatchEffect {
    if op == 21 {
        DispatchEffect::Respond(format!("\x1b]l{}\x1b\\", screen.get_window_title()))
    } else {
        DispatchEffect::None
    }
}

fn dispatch_osc(screen: &mut ScreenModel, defaults: &mut HostDefaults, osc: &OscMessage) -> DispatchEffect {
    match osc {
        OscMessage::SetTitleAndIconName(s) => {
            screen.set_window_title(s.clone());
            screen.set_icon_name(s.clone());
            DispatchEffect::None
        }
        OscMessage::SetIconName(s) => {
            screen.set_icon_name(s.clone());
            DispatchEffect::None
        }
        OscMessage::SetWindowTitle(s) => {
            screen.set_window_title(s.clone());
            DispatchEffect::None
        }
        OscMessage::QueryTitle(terminator) => DispatchEffect::Respond(format!(
            "\x1b]l{}{}",
            screen.get_window_title(),
            terminator_str(*terminator)
        )),
        OscMessage::PaletteSet { index, color } => {
            let rgb = vt_respond::resolve_color(*color, defaults.foreground);
            screen.set_palette_color(*index as u8, rgb);
            DispatchEffect::None
        }
        OscMessage::PaletteQuery { index, terminator } => {
            let rgb = screen
                .palette_color(*index as u8)
                .unwrap_or_else(|| vt_respond::indexed_to_rgb(*index as u8));
            DispatchEffect::Respond(vt_respond::palette_reply(*index, rgb, *terminator))
        }
        OscMessage::Cwd(_) | OscMessage::Hyperlink { .. } | OscMessage::Clipboard { .. } | OscMessage::SemanticPrompt { .. } => {
            // Host-side bookkeeping (working directory, hyperlink spans,
            // clipboard access, shell-integration markers) with no
            // ScreenModel counterpart in scope.
            DispatchEffect::None
        }
        OscMessage::ColorSet { which, color } => {
            let rgb = vt_respond::resolve_color(*color, defaults.get(*which));
            defaults.set(*which, rgb);
            DispatchEffect::None
        }
        OscMessage::ColorQuery { which, terminator } => {
            let rgb = defaults.get(*which);
            DispatchEffect::Respond(vt_respond::color_reply(HostDefaults::code(*which), rgb, *terminator))
        }
        OscMessage::ResetColor(index) => {
            screen.reset_palette_color(index.map(|i| i as u8));
            DispatchEffect::None
        }
        OscMessage::Passthrough { code, data } => {
            log::trace!("unimplemented OSC {code}: {data}");
            DispatchEffect::None
        }
    }
}

fn dispatch_dcs(screen: &mut ScreenModel, dcs: &DcsMessage) -> DispatchEffect {
    let reply = match dcs {
        DcsMessage::RequestSgr => vt_respond::reply_sgr(&screen.current_sgr()),
        DcsMessage::RequestScrollRegion => {
            let (top, bottom) = screen.scroll_region();
            vt_respond::reply_scroll_region(top, bottom)
        }
        DcsMessage::RequestUnknown(selector) => vt_respond::reply_unknown(selector),
    };
    DispatchEffect::Respond(reply)
}

fn terminator_str(terminator: vt_msg::Terminator) -> &'static str {
    match terminator {
        vt_msg::Terminator::Bel => "\x07",
        vt_msg::Terminator::St => "\x1b\\",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vt_msg::CsiParams;
    use vt_screen::ScreenConfig;

    fn model() -> ScreenModel {
        ScreenModel::new(80, 24, ScreenConfig::default())
    }

    #[test]
    fn print_writes_through_to_the_screen() {
        let mut screen = model();
        let mut defaults = HostDefaults::default();
        let effect = apply(&mut screen, &mut defaults, &Message::new(b"a".to_vec(), MessageKind::Print('a')));
        assert_eq!(effect, DispatchEffect::None);
        assert_eq!(screen.snapshot().cells[0][0].ch, 'a');
    }

    #[test]
    fn cpr_reports_one_based_cursor_position() {
        let mut screen = model();
        let mut defaults = HostDefaults::default();
        apply(
            &mut screen,
            &mut defaults,
            &Message::new(vec![], MessageKind::CursorPosition { row: 5, col: 10 }),
        );
        let effect = apply(
            &mut screen,
            &mut defaults,
            &Message::new(
                vec![],
                MessageKind::DeviceQuery(DeviceQuery::CursorPositionReport),
            ),
        );
        assert_eq!(effect, DispatchEffect::Respond("\x1b[5;10R".to_string()));
    }

    #[test]
    fn bell_is_reported_without_touching_the_screen() {
        let mut screen = model();
        let mut defaults = HostDefaults::default();
        let before = screen.snapshot();
        let effect = apply(&mut screen, &mut defaults, &Message::new(vec![], MessageKind::Bell));
        assert_eq!(effect, DispatchEffect::Bell);
        assert_eq!(screen.snapshot().cursor_x, before.cursor_x);
    }

    #[test]
    fn decrqss_sgr_round_trips_current_attributes() {
        let mut screen = model();
        let mut defaults = HostDefaults::default();
        apply(
            &mut screen,
            &mut defaults,
            &Message::new(
                vec![],
                MessageKind::Sgr(vec![vt_msg::SgrAttribute::Intensity(vt_msg::Intensity::Bold)]),
            ),
        );
        let effect = apply(
            &mut screen,
            &mut defaults,
            &Message::new(vec![], MessageKind::Dcs(DcsMessage::RequestSgr)),
        );
        assert_eq!(effect, DispatchEffect::Respond("\x1bP1$r0;1m\x1b\\".to_string()));
    }

    #[test]
    fn unknown_csi_is_silently_traced() {
        let mut screen = model();
        let mut defaults = HostDefaults::default();
        let effect = apply(
            &mut screen,
            &mut defaults,
            &Message::unimplemented(vec![], MessageKind::UnknownCsi(CsiParams::default(), b'y')),
        );
        assert_eq!(effect, DispatchEffect::None);
    }
}
