//! The terminal-wide default colors OSC 10/11/12 read and write.
//!
//! Not part of `vt_screen`'s data model (those colors live outside any
//! single cell's SGR state), and not a `vt_respond` formatting concern
//! either, since they're mutable dispatch-time state — so they live here,
//! next to the routing code that's the only thing that touches them.

use vt_msg::OscColorSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostDefaults {
    pub foreground: (u8, u8, u8),
    pub background: (u8, u8, u8),
    pub cursor: (u8, u8, u8),
}

impl Default for HostDefaults {
    fn default() -> Self {
        HostDefaults {
            foreground: (0xff, 0xff, 0xff),
            background: (0x00, 0x00, 0x00),
            cursor: (0xff, 0xff, 0xff),
        }
    }
}

impl HostDefaults {
    pub fn get(&self, which: OscColorSlot) -> (u8, u8, u8) {
        match which {
            OscColorSlot::Foreground => self.foreground,
            OscColorSlot::Background => self.background,
            OscColorSlot::Cursor => self.cursor,
        }
    }

    pub fn set(&mut self, which: OscColorSlot, rgb: (u8, u8, u8)) {
        match which {
            OscColorSlot::Foreground => self.foreground = rgb,
            OscColorSlot::Background => self.background = rgb,
            OscColorSlot::Cursor => self.cursor = rgb,
        }
    }

    pub fn code(which: OscColorSlot) -> u16 {
        match which {
            OscColorSlot::Foreground => 10,
            OscColorSlot::Background => 11,
            OscColorSlot::Cursor => 12,
        }
    }
}
