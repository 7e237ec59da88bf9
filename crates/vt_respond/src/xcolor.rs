//! Indexed-color (0-255) to 24-bit RGB resolution, a SPEC_FULL.md
//! supplement: §3.3's `Color::Indexed` needs an RGB value whenever a
//! response (OSC color query, DECRQSS) must report an actual color rather
//! than just echo the index back.
//!
//! Grounded on `icy_engine::parsers::ansi::ansi_commands::select_24bit_color`
//! and its surrounding palette machinery, generalized from "insert an
//! arbitrary RGB triple" to "resolve the standard xterm 256-color table."

const NAMED_16: [(u8, u8, u8); 16] = [
    (0x00, 0x00, 0x00),
    (0xcd, 0x00, 0x00),
    (0x00, 0xcd, 0x00),
    (0xcd, 0xcd, 0x00),
    (0x00, 0x00, 0xee),
    (0xcd, 0x00, 0xcd),
    (0x00, 0xcd, 0xcd),
    (0xe5, 0xe5, 0xe5),
    (0x7f, 0x7f, 0x7f),
    (0xff, 0x00, 0x00),
    (0x00, 0xff, 0x00),
    (0xff, 0xff, 0x00),
    (0x5c, 0x5c, 0xff),
    (0xff, 0x00, 0xff),
    (0x00, 0xff, 0xff),
    (0xff, 0xff, 0xff),
];

/// The 6x6x6 color cube's per-axis step values (indices 16-231).
const CUBE_STEPS: [u8; 6] = [0x00, 0x5f, 0x87, 0xaf, 0xd7, 0xff];

/// Resolves a 0-255 palette index to its standard xterm RGB triple.
pub fn indexed_to_rgb(index: u8) -> (u8, u8, u8) {
    match index {
        0..=15 => NAMED_16[index as usize],
        16..=231 => {
            let n = index - 16;
            let r = n / 36;
            let g = (n % 36) / 6;
            let b = n % 6;
            (CUBE_STEPS[r as usize], CUBE_STEPS[g as usize], CUBE_STEPS[b as usize])
        }
        232..=255 => {
            let level = 8 + (index - 232) * 10;
            (level, level, level)
        }
    }
}

/// Resolves a spec `Color` (named/indexed/rgb/default) to an RGB triple,
/// using `default_rgb` for `Color::Default`.
pub fn resolve(color: vt_msg::Color, default_rgb: (u8, u8, u8)) -> (u8, u8, u8) {
    match color {
        vt_msg::Color::Default => default_rgb,
        vt_msg::Color::Named(n) => {
            if (n as usize) < NAMED_16.len() {
                NAMED_16[n as usize]
            } else {
                indexed_to_rgb(n)
            }
        }
        vt_msg::Color::Indexed(n) => indexed_to_rgb(n),
        vt_msg::Color::Rgb(r, g, b) => (r, g, b),
    }
}
