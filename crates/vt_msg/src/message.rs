//! The full message taxonomy: one variant per recognized wire sequence,
//! restricted to the ANSI/VT/xterm subset. Legacy BBS-protocol variants
//! (Avatar, PCBoard, RIP, ...) have no counterpart here.

use crate::params::CsiParams;
use crate::sgr::{PrivateSgr, SgrAttribute};

/// Which character-set designation/invocation slot a message targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharsetSlot {
    G0,
    G1,
    G2,
    G3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseMode {
    CursorToEnd,
    StartToCursor,
    All,
    /// ED 3 only: also clear scrollback.
    AllAndScrollback,
}

impl EraseMode {
    pub fn from_param(n: u16, allow_scrollback: bool) -> Option<Self> {
        match n {
            0 => Some(Self::CursorToEnd),
            1 => Some(Self::StartToCursor),
            2 => Some(Self::All),
            3 if allow_scrollback => Some(Self::AllAndScrollback),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectionMode {
    Unprotect,
    Protect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceQuery {
    /// `CSI c` — DA1.
    PrimaryAttributes,
    /// `CSI > c` — DA2.
    SecondaryAttributes,
    /// `CSI 5 n` — operating status.
    StatusReport,
    /// `CSI 6 n` — CPR.
    CursorPositionReport,
    /// `CSI ? 26 n` — charset/encoding status.
    CharsetStatusReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleStackOp {
    PushTitle,
    PushIconName,
    PopTitle,
    PopIconName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscColorSlot {
    Foreground,
    Background,
    Cursor,
}

/// How an OSC or DCS string sequence was terminated; responses must echo
/// the same terminator back (spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    Bel,
    St,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OscMessage {
    SetTitleAndIconName(String),
    SetIconName(String),
    SetWindowTitle(String),
    QueryTitle(Terminator),
    PaletteSet { index: u16, color: crate::sgr::Color },
    PaletteQuery { index: u16, terminator: Terminator },
    Cwd(String),
    Hyperlink { params: String, uri: String },
    ColorSet { which: OscColorSlot, color: crate::sgr::Color },
    ColorQuery { which: OscColorSlot, terminator: Terminator },
    Clipboard { selection: String, data: String },
    SemanticPrompt { kind: u8, raw: String },
    ResetColor(Option<u16>),
    /// Recognized OSC number but a payload shape the core does not
    /// interpret further (e.g. OSC 133 sub-kinds beyond prompt markers).
    Passthrough { code: u16, data: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DcsMessage {
    /// `DCS $ q m ST` — request current SGR state as a string.
    RequestSgr,
    /// `DCS $ q r ST` — request current scroll region as a string.
    RequestScrollRegion,
    /// Recognized DECRQSS form but an unhandled selector.
    RequestUnknown(String),
}

/// One parsed control message plus the bytes it came from, for tracing,
/// and a flag marking whether the core actually implements it (spec
/// §4.2: "Each message carries raw: string ... and an implemented: bool
/// flag").
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub raw: Vec<u8>,
    pub implemented: bool,
    pub kind: MessageKind,
}

impl Message {
    pub fn new(raw: Vec<u8>, kind: MessageKind) -> Self {
        Message {
            raw,
            implemented: true,
            kind,
        }
    }

    pub fn unimplemented(raw: Vec<u8>, kind: MessageKind) -> Self {
        Message {
            raw,
            implemented: false,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessageKind {
    /// A single decoded character destined for the screen (implied by
    /// §4.4.1's printing operation, even though it has no wire-level
    /// introducer of its own the way ESC/CSI/OSC/DCS do).
    Print(char),

    // --- ESC (non-CSI) ---
    SaveCursor,
    RestoreCursor,
    Index,
    NextLine,
    ReverseIndex,
    SetTab,
    HardReset,
    DesignateCharset { slot: CharsetSlot, charset: u8 },

    // --- C0 controls ---
    Bell,
    Backspace,
    Tab,
    LineFeed,
    FormFeed,
    CarriageReturn,
    ShiftOut,
    ShiftIn,

    // --- CSI cursor ---
    CursorUp(u16),
    CursorDown(u16),
    CursorForward(u16),
    CursorBack(u16),
    CursorNextLine(u16),
    CursorPrevLine(u16),
    CursorHorizontalAbsolute(u16),
    CursorVerticalAbsolute(u16),
    CursorPosition { row: u16, col: u16 },
    CursorForwardTabs(u16),
    CursorBackwardTabs(u16),

    // --- CSI erase ---
    EraseInDisplay(EraseMode),
    EraseInLine(EraseMode),
    EraseCharacter(u16),
    SelectiveEraseInDisplay(EraseMode),
    SelectiveEraseInLine(EraseMode),

    // --- CSI edit ---
    InsertLines(u16),
    DeleteLines(u16),
    InsertCharacters(u16),
    DeleteCharacters(u16),
    RepeatPrecedingCharacter(u16),

    // --- CSI scroll ---
    ScrollUp(u16),
    ScrollDown(u16),
    SetScrollingRegion { top: u16, bottom: u16 },

    // --- CSI mode ---
    SetMode { private: bool, modes: Vec<u16>, enable: bool },
    XtSaveModes(Vec<u16>),
    XtRestoreModes(Vec<u16>),
    SetCursorStyle(u8),

    // --- CSI cursor save/restore (SCO convention, §4.4.9) ---
    ScoSaveCursor,
    ScoRestoreCursor,

    // --- CSI device query ---
    DeviceQuery(DeviceQuery),

    // --- CSI tabs ---
    TabClear { all: bool },

    // --- CSI window manipulation ---
    TitleStack(TitleStackOp),
    WindowOp { op: u16, params: Vec<u16> },

    // --- CSI soft reset ---
    SoftReset,

    // --- CSI protection ---
    SetProtection(ProtectionMode),

    // --- SGR ---
    Sgr(Vec<SgrAttribute>),
    SgrPrivate(PrivateSgr),

    // --- OSC ---
    Osc(OscMessage),

    // --- DCS ---
    Dcs(DcsMessage),

    // --- structurally parsed, not a recognized sequence ---
    Unknown,

    // --- carries its own CSI params for callers that want the raw form
    // without a dedicated variant (used only for tracing unrecognized but
    // well-formed CSI sequences) ---
    UnknownCsi(CsiParams, u8),
}
