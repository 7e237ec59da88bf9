//! End-to-end scenarios and quantified properties exercised at the facade
//! level, where a real host would observe them: through `Terminal`'s public
//! surface rather than any one crate's internals.

use vt_screen::ScreenConfig;
use vt_term::{Terminal, TerminalHost};

#[derive(Default, Clone)]
struct Recorder {
    responses: std::rc::Rc<std::cell::RefCell<Vec<String>>>,
}

impl TerminalHost for Recorder {
    fn on_response(&mut self, response: &str) {
        self.responses.borrow_mut().push(response.to_string());
    }
}

// Property 2: every cursor movement operation leaves the cursor in bounds,
// from any starting position.
#[test]
fn cursor_movements_always_stay_in_bounds() {
    let movements: &[&[u8]] = &[
        b"\x1b[100A",
        b"\x1b[100B",
        b"\x1b[100C",
        b"\x1b[100D",
        b"\x1b[100E",
        b"\x1b[100F",
        b"\x1b[100G",
        b"\x1b[100d",
        b"\x1b[100;100H",
        b"\x1b[100I",
        b"\x1b[100Z",
    ];
    for start_row in 0..5usize {
        for start_col in 0..5usize {
            let mut term = Terminal::new(5, 5);
            term.push_bytes(format!("\x1b[{};{}H", start_row + 1, start_col + 1).as_bytes());
            for m in movements {
                term.push_bytes(m);
                let snap = term.snapshot();
                assert!(snap.cursor_x < snap.cols, "cursor_x {} out of bounds", snap.cursor_x);
                assert!(snap.cursor_y < snap.rows, "cursor_y {} out of bounds", snap.cursor_y);
            }
        }
    }
}

// Property 3: CUP round-trips through CPR when origin mode is off.
#[test]
fn cup_cpr_round_trip() {
    for (row, col) in [(1, 1), (10, 20), (24, 80), (1, 80), (24, 1)] {
        let host = Recorder::default();
        let mut term = Terminal::with_host(80, 24, ScreenConfig::default(), host.clone());
        term.push_bytes(format!("\x1b[{row};{col}H\x1b[6n").as_bytes());
        assert_eq!(*host.responses.borrow(), vec![format!("\x1b[{row};{col}R")]);
    }
}

// Property 5: DECSTR leaves screen contents untouched but resets documented
// attributes to their defaults.
#[test]
fn decstr_resets_attributes_without_touching_contents() {
    let mut term = Terminal::new(10, 3);
    term.push_bytes(b"\x1b[1;31mhello");
    let before = term.snapshot();
    term.push_bytes(b"\x1b[!p");
    let after = term.snapshot();
    for (ra, rb) in before.cells.iter().zip(after.cells.iter()) {
        for (ca, cb) in ra.iter().zip(rb.iter()) {
            assert_eq!(ca.ch, cb.ch);
        }
    }
    assert_eq!(after.current_sgr, vt_screen::SgrState::default());
}

// Property 6: setting an SGR attribute then applying its canonical off-code
// returns to the default state.
#[test]
fn sgr_set_then_canonical_unset_returns_to_default() {
    let pairs: &[(&[u8], &[u8])] = &[
        (b"\x1b[1m", b"\x1b[22m"),
        (b"\x1b[2m", b"\x1b[22m"),
        (b"\x1b[3m", b"\x1b[23m"),
        (b"\x1b[4m", b"\x1b[24m"),
        (b"\x1b[5m", b"\x1b[25m"),
        (b"\x1b[7m", b"\x1b[27m"),
        (b"\x1b[8m", b"\x1b[28m"),
        (b"\x1b[9m", b"\x1b[29m"),
        (b"\x1b[31m", b"\x1b[39m"),
        (b"\x1b[41m", b"\x1b[49m"),
    ];
    for (on, off) in pairs {
        let mut term = Terminal::new(10, 1);
        term.push_bytes(on);
        term.push_bytes(off);
        assert_eq!(
            term.snapshot().current_sgr,
            vt_screen::SgrState::default(),
            "pair {:?}/{:?} did not return to default",
            on,
            off
        );
    }
}

// Property 7: two equal SGR states produce the same DECRQSS serialization
// (a style-derivation function, deterministic on structural equality).
#[test]
fn equal_sgr_states_serialize_identically() {
    let mut a = Terminal::new(10, 1);
    a.push_bytes(b"\x1b[1;4;31m");
    let mut b = Terminal::new(10, 1);
    b.push_bytes(b"\x1b[4;31;1m");
    assert_eq!(a.snapshot().current_sgr, b.snapshot().current_sgr);
    assert_eq!(
        vt_respond::sgr_params_string(&a.snapshot().current_sgr),
        vt_respond::sgr_params_string(&b.snapshot().current_sgr)
    );
}

// Property 8: OSC color query responses echo back the requester's own
// terminator.
#[test]
fn osc_color_query_echoes_terminator() {
    let host = Recorder::default();
    let mut term = Terminal::with_host(80, 24, ScreenConfig::default(), host.clone());
    term.push_bytes(b"\x1b]11;?\x07");
    term.push_bytes(b"\x1b]11;?\x1b\\");
    let responses = host.responses.borrow();
    assert_eq!(responses.len(), 2);
    assert!(responses[0].ends_with('\x07'));
    assert!(responses[1].ends_with("\x1b\\"));
}

// Property 9: popping a title/icon-name stack more times than it was pushed
// never changes the current title.
#[test]
fn over_popping_title_stack_is_a_no_op() {
    let mut term = Terminal::new(10, 1);
    term.push_bytes(b"\x1b]2;first\x07");
    term.push_bytes(b"\x1b[22;2t"); // push title
    term.push_bytes(b"\x1b]2;second\x07");
    for _ in 0..5 {
        term.push_bytes(b"\x1b[23;2t"); // pop title, 5 times though only 1 pushed
    }
    assert_eq!(term.get_window_title(), "first");
}

// Property 10: after a malformed sequence, the next valid sequence parses
// correctly, for a spread of malformed forms.
#[test]
fn malformed_sequences_never_derail_the_next_valid_one() {
    let malformed: &[&[u8]] = &[
        b"\x1bZ",
        b"\x1b[",
        b"\x1b[?",
        b"\x1b[999999999999z",
        &[0x1b, 0x00],
    ];
    for bad in malformed {
        let mut term = Terminal::new(10, 2);
        term.push_bytes(bad);
        term.push_bytes(b"\x1b[2;3H");
        let snap = term.snapshot();
        assert_eq!((snap.cursor_x, snap.cursor_y), (2, 1), "after malformed {:?}", bad);
    }
}

// S4 restated at the facade with an explicit resize in between, since §6.1
// requires alt-screen resize-in-place with no scrollback effect either.
#[test]
fn alt_screen_resize_does_not_touch_scrollback() {
    let mut term = Terminal::new(10, 3);
    term.push_bytes(b"one\r\ntwo\r\nthree\r\n");
    // 3 lines through a 3-row screen scroll the view once (eviction count is
    // lines_written - rows + 1), unlike the 2-row case in ed3_clears_scrollback.
    assert_eq!(term.scrollback_row_count(), 1);
    term.push_bytes(b"\x1b[?1049h");
    term.resize(10, 5);
    assert_eq!(term.scrollback_row_count(), 1);
    term.push_bytes(b"\x1b[?1049l");
    assert_eq!(term.scrollback_row_count(), 1);
}
