//! Byte-level ECMA-48/VT/xterm control sequence parser.
//!
//! Grounded on the `State` enum and `print_char` loop of
//! `icy_engine`'s ANSI parser (`crates/icy_engine/src/parsers/ansi/mod.rs`),
//! generalized from a char-at-a-time machine fed pre-decoded text into a
//! byte-at-a-time machine that does its own UTF-8 decoding, since a host
//! stream can split both multi-byte characters and control sequences across
//! arbitrary `push_bytes` boundaries and the machine must still converge on
//! the same result either way.

mod csi;
mod dcs;
mod errors;
mod osc;
mod sgr;
mod utf8;

pub use errors::ParseError;
pub use sgr::decode_sgr;

use utf8::{Step as Utf8Step, Utf8Decoder};
use vt_msg::{CharsetSlot, CsiParams, Message, MessageKind, SubParams, Terminator};

/// Sequences longer than this many bytes of OSC/DCS payload are truncated
/// rather than grown without bound; spec §5 calls this out explicitly for
/// hostile or runaway input.
pub const DEFAULT_MAX_ACCUM: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    Escape,
    CharsetDesignate(CharsetSlot),
    Csi,
    OscString,
    OscEscape,
    DcsString,
    DcsEscape,
}

#[derive(Default)]
struct CsiAccum {
    raw: Vec<u8>,
    private_marker: Option<u8>,
    params: Vec<SubParams>,
    cur_sub: Vec<u16>,
    cur_num: Option<u32>,
    cur_colon: bool,
    has_pending: bool,
    intermediates: Vec<u8>,
}

impl CsiAccum {
    fn push_current(&mut self) {
        if self.cur_colon {
            self.cur_sub.push(self.cur_num.take().unwrap_or(0) as u16);
            self.params.push(SubParams {
                values: std::mem::take(&mut self.cur_sub),
                colon_separated: true,
            });
            self.cur_colon = false;
        } else {
            self.params.push(SubParams::single(self.cur_num.take().unwrap_or(0) as u16));
        }
        self.has_pending = false;
    }
}

/// The byte-stream control sequence parser. Owns all state needed to resume
/// mid-sequence; `push_bytes` can be called with chunks of any size,
/// including one byte at a time, and the stream of emitted messages is
/// identical (spec §8 property 1).
pub struct Parser {
    state: State,
    utf8: Utf8Decoder,
    esc_raw: Vec<u8>,
    csi: CsiAccum,
    string_raw: Vec<u8>,
    max_accum: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self::with_max_accum(DEFAULT_MAX_ACCUM)
    }

    pub fn with_max_accum(max_accum: usize) -> Self {
        Parser {
            state: State::Ground,
            utf8: Utf8Decoder::default(),
            esc_raw: Vec::new(),
            csi: CsiAccum::default(),
            string_raw: Vec::new(),
            max_accum,
        }
    }

    /// Resets to the GROUND state, discarding any in-flight sequence. Does
    /// not touch `max_accum`.
    pub fn reset(&mut self) {
        self.state = State::Ground;
        self.utf8.reset();
        self.esc_raw.clear();
        self.csi = CsiAccum::default();
        self.string_raw.clear();
    }

    /// Feeds `bytes` through the machine, calling `sink` once per recognized
    /// message (including `Message::unimplemented` ones) in the order they
    /// complete. Never panics and never returns an error: malformed input is
    /// discarded and parsing resumes from the next byte.
    pub fn push_bytes(&mut self, bytes: &[u8], sink: &mut dyn FnMut(Message)) {
        for &b in bytes {
            self.feed(b, sink);
        }
    }

    fn feed(&mut self, b: u8, sink: &mut dyn FnMut(Message)) {
        match self.state {
            State::Ground => self.feed_ground(b, sink),
            State::Escape => self.feed_escape(b, sink),
            State::CharsetDesignate(slot) => self.feed_charset_designate(slot, b, sink),
            State::Csi => self.feed_csi(b, sink),
            State::OscString => self.feed_string(b, sink, true),
            State::OscEscape => self.feed_string_escape(b, sink, true),
            State::DcsString => self.feed_string(b, sink, false),
            State::DcsEscape => self.feed_string_escape(b, sink, false),
        }
    }

    fn emit_decoded(&mut self, b: u8, step: Utf8Step, sink: &mut dyn FnMut(Message)) {
        match step {
            Utf8Step::Pending => {}
            Utf8Step::Char(c) => sink(Message::new(vec![b], MessageKind::Print(c))),
            Utf8Step::Invalid => {
                log::debug!("{}", ParseError::InvalidUtf8 { byte: b });
                sink(Message::new(vec![b], MessageKind::Print(char::REPLACEMENT_CHARACTER)));
            }
            Utf8Step::InvalidRetry => {
                log::debug!("{}", ParseError::InvalidUtf8 { byte: b });
                sink(Message::new(vec![], MessageKind::Print(char::REPLACEMENT_CHARACTER)));
                self.feed_ground(b, sink);
            }
        }
    }

    fn feed_ground(&mut self, b: u8, sink: &mut dyn FnMut(Message)) {
        if self.utf8.is_active() {
            let step = self.utf8.cont(b);
            self.emit_decoded(b, step, sink);
            return;
        }
        match b {
            0x1B => {
                self.esc_raw.clear();
                self.esc_raw.push(b);
                self.state = State::Escape;
            }
            0x07 => sink(Message::new(vec![b], MessageKind::Bell)),
            0x08 => sink(Message::new(vec![b], MessageKind::Backspace)),
            0x09 => sink(Message::new(vec![b], MessageKind::Tab)),
            0x0A | 0x0B => sink(Message::new(vec![b], MessageKind::LineFeed)),
            0x0C => sink(Message::new(vec![b], MessageKind::FormFeed)),
            0x0D => sink(Message::new(vec![b], MessageKind::CarriageReturn)),
            0x0E => sink(Message::new(vec![b], MessageKind::ShiftOut)),
            0x0F => sink(Message::new(vec![b], MessageKind::ShiftIn)),
            0x20..=0x7E => sink(Message::new(vec![b], MessageKind::Print(b as char))),
            0x80..=0xFF => {
                let step = self.utf8.start(b);
                self.emit_decoded(b, step, sink);
            }
            _ => {
                // Remaining C0 controls (NUL, ENQ, ACK, ...) and DEL carry
                // no screen effect in this model; discard.
            }
        }
    }

    fn feed_escape(&mut self, b: u8, sink: &mut dyn FnMut(Message)) {
        self.esc_raw.push(b);
        match b {
            b'[' => {
                self.csi = CsiAccum::default();
                self.csi.raw = std::mem::take(&mut self.esc_raw);
                self.state = State::Csi;
            }
            b']' => {
                self.string_raw.clear();
                self.state = State::OscString;
            }
            b'P' => {
                self.string_raw.clear();
                self.state = State::DcsString;
            }
            b'(' => self.state = State::CharsetDesignate(CharsetSlot::G0),
            b')' => self.state = State::CharsetDesignate(CharsetSlot::G1),
            b'*' => self.state = State::CharsetDesignate(CharsetSlot::G2),
            b'+' => self.state = State::CharsetDesignate(CharsetSlot::G3),
            b'7' => self.finish_esc(sink, MessageKind::SaveCursor),
            b'8' => self.finish_esc(sink, MessageKind::RestoreCursor),
            b'c' => self.finish_esc(sink, MessageKind::HardReset),
            b'D' => self.finish_esc(sink, MessageKind::Index),
            b'E' => self.finish_esc(sink, MessageKind::NextLine),
            b'H' => self.finish_esc(sink, MessageKind::SetTab),
            b'M' => self.finish_esc(sink, MessageKind::ReverseIndex),
            0x18 | 0x1A => {
                self.state = State::Ground;
            }
            _ => {
                log::debug!("{}", ParseError::MalformedSequence { byte: b });
                let raw = std::mem::take(&mut self.esc_raw);
                sink(Message::unimplemented(raw, MessageKind::Unknown));
                self.state = State::Ground;
            }
        }
    }

    fn finish_esc(&mut self, sink: &mut dyn FnMut(Message), kind: MessageKind) {
        let raw = std::mem::take(&mut self.esc_raw);
        sink(Message::new(raw, kind));
        self.state = State::Ground;
    }

    fn feed_charset_designate(&mut self, slot: CharsetSlot, b: u8, sink: &mut dyn FnMut(Message)) {
        self.esc_raw.push(b);
        let raw = std::mem::take(&mut self.esc_raw);
        sink(Message::new(raw, MessageKind::DesignateCharset { slot, charset: b }));
        self.state = State::Ground;
    }

    fn feed_csi(&mut self, b: u8, sink: &mut dyn FnMut(Message)) {
        if self.csi.raw.len() >= self.max_accum {
            log::debug!("{}", ParseError::AccumulatorOverflow { limit: self.max_accum });
            self.csi = CsiAccum::default();
            self.state = State::Ground;
            return;
        }
        self.csi.raw.push(b);
        match b {
            b'?' | b'<' | b'=' | b'>' if self.csi.raw.len() == 1 => {
                self.csi.private_marker = Some(b);
            }
            b'0'..=b'9' => {
                self.csi.has_pending = true;
                let digit = (b - b'0') as u32;
                self.csi.cur_num = Some(
                    self.csi
                        .cur_num
                        .unwrap_or(0)
                        .saturating_mul(10)
                        .saturating_add(digit)
                        .min(u16::MAX as u32),
                );
            }
            b':' => {
                self.csi.has_pending = true;
                self.csi.cur_colon = true;
                self.csi.cur_sub.push(self.csi.cur_num.take().unwrap_or(0) as u16);
            }
            b';' => self.csi.push_current(),
            0x20..=0x2F => self.csi.intermediates.push(b),
            0x40..=0x7E => {
                if self.csi.has_pending || !self.csi.params.is_empty() {
                    self.csi.push_current();
                }
                let raw = std::mem::take(&mut self.csi.raw);
                let params = CsiParams {
                    private_marker: self.csi.private_marker,
                    params: std::mem::take(&mut self.csi.params),
                    intermediates: std::mem::take(&mut self.csi.intermediates),
                };
                let (kind, implemented) = csi::classify(params, b);
                sink(if implemented {
                    Message::new(raw, kind)
                } else {
                    Message::unimplemented(raw, kind)
                });
                self.state = State::Ground;
            }
            0x18 | 0x1A => self.state = State::Ground,
            0x1B => {
                self.esc_raw.clear();
                self.esc_raw.push(b);
                self.state = State::Escape;
            }
            _ => {
                log::debug!("{}", ParseError::MalformedSequence { byte: b });
                self.state = State::Ground;
            }
        }
    }

    fn feed_string(&mut self, b: u8, sink: &mut dyn FnMut(Message), is_osc: bool) {
        match b {
            0x07 if is_osc => self.finish_string(sink, is_osc, Terminator::Bel),
            0x1B => self.state = if is_osc { State::OscEscape } else { State::DcsEscape },
            0x9C => self.finish_string(sink, is_osc, Terminator::St),
            0x18 | 0x1A => {
                self.string_raw.clear();
                self.state = State::Ground;
            }
            _ => {
                if self.string_raw.len() < self.max_accum {
                    self.string_raw.push(b);
                } else {
                    log::debug!("{}", ParseError::AccumulatorOverflow { limit: self.max_accum });
                }
            }
        }
    }

    fn feed_string_escape(&mut self, b: u8, sink: &mut dyn FnMut(Message), is_osc: bool) {
        if b == b'\\' {
            self.finish_string(sink, is_osc, Terminator::St);
        } else if b == 0x1B {
            self.string_raw.clear();
            self.esc_raw.clear();
            self.esc_raw.push(b);
            self.state = State::Escape;
        } else {
            log::debug!("{}", ParseError::MalformedSequence { byte: b });
            self.string_raw.clear();
            self.state = State::Ground;
        }
    }

    fn finish_string(&mut self, sink: &mut dyn FnMut(Message), is_osc: bool, terminator: Terminator) {
        let payload = std::mem::take(&mut self.string_raw);
        let (kind, implemented) = if is_osc {
            osc::classify(&payload, terminator)
        } else {
            dcs::classify(&payload)
        };
        let mut raw = if is_osc { vec![0x1B, b']'] } else { vec![0x1B, b'P'] };
        raw.extend_from_slice(&payload);
        sink(if implemented {
            Message::new(raw, kind)
        } else {
            Message::unimplemented(raw, kind)
        });
        self.state = State::Ground;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vt_msg::{Color, EraseMode, SgrAttribute};

    fn run(bytes: &[u8]) -> Vec<Message> {
        let mut parser = Parser::new();
        let mut out = Vec::new();
        parser.push_bytes(bytes, &mut |m| out.push(m));
        out
    }

    #[test]
    fn plain_ascii_prints() {
        let msgs = run(b"hi");
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].kind, MessageKind::Print('h'));
        assert_eq!(msgs[1].kind, MessageKind::Print('i'));
    }

    #[test]
    fn csi_cursor_up_with_count() {
        let msgs = run(b"\x1b[5A");
        assert_eq!(msgs, vec![Message::new(b"\x1b[5A".to_vec(), MessageKind::CursorUp(5))]);
    }

    #[test]
    fn sgr_sequence_decodes_bold_and_color() {
        let msgs = run(b"\x1b[1;31m");
        assert_eq!(msgs.len(), 1);
        assert_eq!(
            msgs[0].kind,
            MessageKind::Sgr(vec![
                SgrAttribute::Intensity(vt_msg::Intensity::Bold),
                SgrAttribute::Foreground(Color::Named(1)),
            ])
        );
    }

    #[test]
    fn erase_in_display_full() {
        let msgs = run(b"\x1b[2J");
        assert_eq!(msgs[0].kind, MessageKind::EraseInDisplay(EraseMode::All));
    }

    #[test]
    fn osc_window_title_with_bel() {
        let msgs = run(b"\x1b]2;my title\x07");
        assert_eq!(
            msgs[0].kind,
            MessageKind::Osc(vt_msg::OscMessage::SetWindowTitle("my title".into()))
        );
    }

    #[test]
    fn osc_terminated_by_st() {
        let msgs = run(b"\x1b]0;both\x1b\\");
        assert_eq!(
            msgs[0].kind,
            MessageKind::Osc(vt_msg::OscMessage::SetTitleAndIconName("both".into()))
        );
    }

    #[test]
    fn dcs_decrqss_sgr() {
        let msgs = run(b"\x1bP$qm\x1b\\");
        assert_eq!(msgs[0].kind, MessageKind::Dcs(vt_msg::DcsMessage::RequestSgr));
    }

    #[test]
    fn byte_at_a_time_matches_single_shot() {
        let input: &[u8] = b"hello \x1b[31mworld\x1b[0m\n\xe2\x82\xac";
        let whole = run(input);
        let mut parser = Parser::new();
        let mut piecewise = Vec::new();
        for &b in input {
            parser.push_bytes(&[b], &mut |m| piecewise.push(m));
        }
        assert_eq!(whole, piecewise);
    }

    #[test]
    fn split_multibyte_utf8_across_calls() {
        let mut parser = Parser::new();
        let mut out = Vec::new();
        parser.push_bytes(&[0xE2, 0x82], &mut |m| out.push(m));
        assert!(out.is_empty());
        parser.push_bytes(&[0xAC], &mut |m| out.push(m));
        assert_eq!(out[0].kind, MessageKind::Print('\u{20ac}'));
    }

    #[test]
    fn split_csi_sequence_across_calls() {
        let mut parser = Parser::new();
        let mut out = Vec::new();
        parser.push_bytes(b"\x1b[1", &mut |m| out.push(m));
        assert!(out.is_empty());
        parser.push_bytes(b";5H", &mut |m| out.push(m));
        assert_eq!(out[0].kind, MessageKind::CursorPosition { row: 1, col: 5 });
    }

    #[test]
    fn invalid_utf8_lead_byte_substitutes_replacement_char() {
        let msgs = run(&[0xFF]);
        assert_eq!(msgs[0].kind, MessageKind::Print(char::REPLACEMENT_CHARACTER));
    }

    #[test]
    fn bad_continuation_byte_does_not_swallow_the_next_escape_sequence() {
        // A broken 2-byte lead (0xC3 wants a continuation byte) followed by
        // an ESC that starts a perfectly valid CSI sequence. The ESC must
        // not be consumed as part of the broken UTF-8 sequence.
        let msgs = run(&[0xC3, 0x1B, b'[', b'A']);
        assert_eq!(
            msgs,
            vec![
                Message::new(vec![], MessageKind::Print(char::REPLACEMENT_CHARACTER)),
                Message::new(b"\x1b[A".to_vec(), MessageKind::CursorUp(1)),
            ]
        );
    }

    #[test]
    fn bad_continuation_byte_reprocesses_an_ascii_byte_too() {
        let msgs = run(&[0xC3, b'A']);
        assert_eq!(
            msgs,
            vec![
                Message::new(vec![], MessageKind::Print(char::REPLACEMENT_CHARACTER)),
                Message::new(vec![b'A'], MessageKind::Print('A')),
            ]
        );
    }

    #[test]
    fn escape_arriving_mid_csi_reopens_escape_parsing_instead_of_being_dropped() {
        // An incomplete CSI ("\x1b[2" with no final byte) interrupted by a
        // fresh escape sequence: the interrupting ESC must restart parsing
        // rather than being logged as a malformed CSI byte and discarded.
        let msgs = run(b"\x1b[2\x1b[3A");
        assert_eq!(msgs, vec![Message::new(b"\x1b[3A".to_vec(), MessageKind::CursorUp(3))]);
    }

    #[test]
    fn escape_arriving_mid_osc_reopens_escape_parsing_instead_of_being_dropped() {
        let msgs = run(b"\x1b]2;unterminated\x1b\x1b[3A");
        assert_eq!(msgs, vec![Message::new(b"\x1b[3A".to_vec(), MessageKind::CursorUp(3))]);
    }

    #[test]
    fn oversized_csi_sequence_aborts_instead_of_growing_forever() {
        let mut parser = Parser::with_max_accum(8);
        let mut input = vec![0x1B, b'['];
        input.extend(std::iter::repeat(b'9').take(100));
        input.push(b'A');
        let mut out = Vec::new();
        parser.push_bytes(&input, &mut |m| out.push(m));
        assert!(out.is_empty(), "runaway CSI sequence should be dropped, not dispatched: {out:?}");
        // Parsing resumes cleanly on the next byte after the abort.
        out.clear();
        parser.push_bytes(b"\x1b[2A", &mut |m| out.push(m));
        assert_eq!(out, vec![Message::new(b"\x1b[2A".to_vec(), MessageKind::CursorUp(2))]);
    }

    #[test]
    fn oversized_osc_payload_is_truncated_not_grown_forever() {
        let mut parser = Parser::with_max_accum(8);
        let mut body = vec![b'2', b';'];
        body.extend(std::iter::repeat(b'x').take(100));
        let mut input = vec![0x1B, b']'];
        input.extend(body);
        input.push(0x07);
        let mut out = Vec::new();
        parser.push_bytes(&input, &mut |m| out.push(m));
        match &out[0].kind {
            MessageKind::Osc(vt_msg::OscMessage::SetWindowTitle(text)) => assert!(text.len() <= 8),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn charset_designation() {
        let msgs = run(b"\x1b(0");
        assert_eq!(
            msgs[0].kind,
            MessageKind::DesignateCharset { slot: CharsetSlot::G0, charset: b'0' }
        );
    }

    #[test]
    fn decset_alternate_screen() {
        let msgs = run(b"\x1b[?1049h");
        assert_eq!(
            msgs[0].kind,
            MessageKind::SetMode { private: true, modes: vec![1049], enable: true }
        );
    }
}
