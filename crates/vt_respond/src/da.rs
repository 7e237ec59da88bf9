//! Device attributes and status reports (spec §4.5).
//!
//! Grounded on `icy_engine::parsers::ansi::ansi_commands::device_attributes`'s
//! `CallbackAction::SendString(format!("\x1b..."))` pattern, reshaped into
//! plain functions returning `String` since `vt_respond` has no callback
//! type of its own — `vt_dispatch` forwards the string to whatever sink
//! `vt_term` was constructed with.

/// `CSI c` (DA1). Fixed per the Open Question decision in DESIGN.md: a
/// VT220-class terminal with ANSI color support (`62` = VT220, `22` =
/// ANSI color).
pub fn da1() -> String {
    "\x1b[?62;22c".to_string()
}

/// `CSI > c` (DA2). Reports a fixed terminal type/firmware/cartridge
/// triple; the exact numbers are only ever used by clients to branch on
/// feature support, so any stable stand-in is sufficient.
pub fn da2() -> String {
    "\x1b[>1;10;0c".to_string()
}

/// `CSI 5 n` (DSR) — operating status: always "ready, no faults".
pub fn dsr_ok() -> String {
    "\x1b[0n".to_string()
}

/// `CSI 6 n` (CPR) — cursor position report. `row`/`col` are 1-based and
/// already origin-mode-relative by the time they reach this function.
pub fn cpr(row: usize, col: usize) -> String {
    format!("\x1b[{row};{col}R")
}

/// `CSI ? 26 n` — charset/encoding status report. `Ps=0` means UTF-8;
/// otherwise `Ps` is the GL charset designator byte currently invoked
/// (e.g. `0x42` for US ASCII, `0x30` for DEC Special Graphics).
pub fn charset_status(utf8_mode: bool, gl_designator: u8) -> String {
    if utf8_mode {
        "\x1b[?26;0n".to_string()
    } else {
        format!("\x1b[?26;{gl_designator}n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn da1_is_fixed() {
        assert_eq!(da1(), "\x1b[?62;22c");
    }

    #[test]
    fn cpr_formats_one_based_coordinates() {
        assert_eq!(cpr(1, 1), "\x1b[1;1R");
        assert_eq!(cpr(24, 80), "\x1b[24;80R");
    }

    #[test]
    fn charset_status_reflects_utf8_mode() {
        assert_eq!(charset_status(true, b'B'), "\x1b[?26;0n");
        assert_eq!(charset_status(false, b'B'), "\x1b[?26;66n");
        assert_eq!(charset_status(false, b'0'), "\x1b[?26;48n");
    }
}
