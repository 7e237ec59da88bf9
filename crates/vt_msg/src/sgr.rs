//! SGR (Select Graphic Rendition) sub-message types.
//!
//! Shaped after `icy_parser_core::SgrAttribute`/`Color`/`Underline`/`Blink`,
//! extended with the color and underline-style variants a full xterm
//! attribute model needs that a BBS-art attribute record does not
//! (curly/dotted/dashed underline, RGB/indexed colors, a distinct
//! underline color, and the framed/encircled/overlined/super/subscript
//! flags).

/// A color as it can appear in an SGR sequence or be reported back from
/// the current attribute state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Default,
    Named(u8),
    Indexed(u8),
    Rgb(u8, u8, u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnderlineStyle {
    None,
    Single,
    Double,
    Curly,
    Dotted,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intensity {
    Normal,
    Bold,
    Faint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blink {
    Off,
    Slow,
    Rapid,
}

/// One decoded SGR code. A single `CSI ... m` sequence decodes into a
/// `Vec<SgrAttribute>`, one entry per code (spec §4.2 SGR).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SgrAttribute {
    Reset,
    Intensity(Intensity),
    Italic(bool),
    Fraktur,
    Underline(UnderlineStyle),
    UnderlineColor(Color),
    CrossedOut(bool),
    Blink(Blink),
    Inverse(bool),
    Concealed(bool),
    Framed(bool),
    Encircled(bool),
    Overlined(bool),
    Superscript(bool),
    Subscript(bool),
    ProportionalSpacing(bool),
    Font(u8),
    Foreground(Color),
    Background(Color),
    IdeogramUnderline,
    IdeogramDoubleUnderline,
    IdeogramOverline,
    IdeogramDoubleOverline,
    IdeogramStress,
    IdeogramAttributesOff,
}

/// `CSI > Ps ; Pn m` (enhanced mode, e.g. underline-style select) and
/// `CSI ? Ps m` (private-mode SGR) do not fit the plain code table and are
/// kept as their own message category per spec §4.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivateSgr {
    /// `CSI > 4 ; n m` — select underline style via the enhanced-mode path.
    /// 0=off 1=single 2=double 3=curly 4=dotted 5=dashed.
    UnderlineStyleSelect(UnderlineStyle),
    Unknown { marker: u8, code: u16, value: Option<u16> },
}
