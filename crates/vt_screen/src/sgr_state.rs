//! The current graphic-rendition state that gets copied into every cell
//! printed while it is active (spec §3.3).
//!
//! Grounded on `icy_engine::TextAttribute`'s packed `attr: u16` bitflag plus
//! `AttributeColor` pair, extended with the fields a BBS-art attribute
//! record never needed: curly/dotted/dashed underline, a distinct
//! underline color, framed/encircled/overlined, super/subscript, and
//! proportional spacing.

use vt_msg::{Blink, Color, Intensity, SgrAttribute, UnderlineStyle};

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SgrFlags: u32 {
        const BOLD                 = 1 << 0;
        const FAINT                = 1 << 1;
        const ITALIC                = 1 << 2;
        const BLINK_SLOW            = 1 << 3;
        const BLINK_RAPID           = 1 << 4;
        const INVERSE               = 1 << 5;
        const HIDDEN                = 1 << 6;
        const STRIKETHROUGH         = 1 << 7;
        const FRAMED                = 1 << 8;
        const ENCIRCLED             = 1 << 9;
        const OVERLINED             = 1 << 10;
        const SUPERSCRIPT           = 1 << 11;
        const SUBSCRIPT             = 1 << 12;
        const PROPORTIONAL_SPACING  = 1 << 13;
    }
}

/// The value-typed attribute snapshot copied into a `Cell` on print (spec
/// §3.3, Design Note §9's "packed bit-flag attribute record").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SgrState {
    pub flags: SgrFlags,
    pub underline_style: UnderlineStyle,
    pub fg: Color,
    pub bg: Color,
    pub underline_color: Color,
    pub font: u8,
}

impl Default for SgrState {
    fn default() -> Self {
        SgrState {
            flags: SgrFlags::empty(),
            underline_style: UnderlineStyle::None,
            fg: Color::Default,
            bg: Color::Default,
            underline_color: Color::Default,
            font: 0,
        }
    }
}

impl SgrState {
    /// Applies one decoded SGR code. Fraktur and the ideogram-line
    /// attributes are accepted (parsed by `vt_parser`, routed here by
    /// `vt_dispatch`) but have no field in the §3.3 state record and are
    /// silently no-ops, the same way unknown private modes are accepted
    /// without effect elsewhere in the model.
    pub fn apply(&mut self, attr: SgrAttribute) {
        match attr {
            SgrAttribute::Reset => *self = SgrState::default(),
            SgrAttribute::Intensity(Intensity::Normal) => {
                self.flags.remove(SgrFlags::BOLD | SgrFlags::FAINT);
            }
            SgrAttribute::Intensity(Intensity::Bold) => {
                self.flags.remove(SgrFlags::FAINT);
                self.flags.insert(SgrFlags::BOLD);
            }
            SgrAttribute::Intensity(Intensity::Faint) => {
                self.flags.remove(SgrFlags::BOLD);
                self.flags.insert(SgrFlags::FAINT);
            }
            SgrAttribute::Italic(on) => self.flags.set(SgrFlags::ITALIC, on),
            SgrAttribute::Fraktur => {}
            SgrAttribute::Underline(style) => self.underline_style = style,
            SgrAttribute::UnderlineColor(c) => self.underline_color = c,
            SgrAttribute::CrossedOut(on) => self.flags.set(SgrFlags::STRIKETHROUGH, on),
            SgrAttribute::Blink(Blink::Off) => {
                self.flags.remove(SgrFlags::BLINK_SLOW | SgrFlags::BLINK_RAPID);
            }
            SgrAttribute::Blink(Blink::Slow) => {
                self.flags.remove(SgrFlags::BLINK_RAPID);
                self.flags.insert(SgrFlags::BLINK_SLOW);
            }
            SgrAttribute::Blink(Blink::Rapid) => {
                self.flags.remove(SgrFlags::BLINK_SLOW);
                self.flags.insert(SgrFlags::BLINK_RAPID);
            }
            SgrAttribute::Inverse(on) => self.flags.set(SgrFlags::INVERSE, on),
            SgrAttribute::Concealed(on) => self.flags.set(SgrFlags::HIDDEN, on),
            SgrAttribute::Framed(on) => self.flags.set(SgrFlags::FRAMED, on),
            SgrAttribute::Encircled(on) => self.flags.set(SgrFlags::ENCIRCLED, on),
            SgrAttribute::Overlined(on) => self.flags.set(SgrFlags::OVERLINED, on),
            SgrAttribute::Superscript(on) => self.flags.set(SgrFlags::SUPERSCRIPT, on),
            SgrAttribute::Subscript(on) => self.flags.set(SgrFlags::SUBSCRIPT, on),
            SgrAttribute::ProportionalSpacing(on) => {
                self.flags.set(SgrFlags::PROPORTIONAL_SPACING, on);
            }
            SgrAttribute::Font(n) => self.font = n,
            SgrAttribute::Foreground(c) => self.fg = c,
            SgrAttribute::Background(c) => self.bg = c,
            SgrAttribute::IdeogramUnderline
            | SgrAttribute::IdeogramDoubleUnderline
            | SgrAttribute::IdeogramOverline
            | SgrAttribute::IdeogramDoubleOverline
            | SgrAttribute::IdeogramStress
            | SgrAttribute::IdeogramAttributesOff => {}
        }
    }
}
