//! OSC 10/11/12 `?` color query replies (spec §4.5): the terminal echoes
//! the requester's own terminator back in the response.

use vt_msg::Terminator;

fn terminator_str(terminator: Terminator) -> &'static str {
    match terminator {
        Terminator::Bel => "\x07",
        Terminator::St => "\x1b\\",
    }
}

/// Scales an 8-bit color component to the 16-bit-per-channel form xterm
/// reports (`0xff` -> `0xffff`, exact at both ends).
fn scale_to_16bit(component: u8) -> u16 {
    component as u16 * 257
}

/// `OSC code ; rgb:rrrr/gggg/bbbb terminator`.
pub fn color_reply(code: u16, rgb: (u8, u8, u8), terminator: Terminator) -> String {
    let (r, g, b) = rgb;
    format!(
        "\x1b]{};rgb:{:04x}/{:04x}/{:04x}{}",
        code,
        scale_to_16bit(r),
        scale_to_16bit(g),
        scale_to_16bit(b),
        terminator_str(terminator)
    )
}

/// `OSC 4 ; index ; rgb:rrrr/gggg/bbbb terminator` — palette query reply,
/// which carries the index in addition to the color `color_reply` alone
/// doesn't have room for.
pub fn palette_reply(index: u16, rgb: (u8, u8, u8), terminator: Terminator) -> String {
    let (r, g, b) = rgb;
    format!(
        "\x1b]4;{};rgb:{:04x}/{:04x}/{:04x}{}",
        index,
        scale_to_16bit(r),
        scale_to_16bit(g),
        scale_to_16bit(b),
        terminator_str(terminator)
    )
}
