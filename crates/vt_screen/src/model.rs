//! `ScreenModel`: the primary/alternate screen pair plus the shared state
//! that doesn't belong to either one alone (scrollback, tab stops, charset
//! slots, title stacks, current SGR pen, mode bookkeeping). Every §4.4
//! operation is a method here; `vt_dispatch` calls these directly from an
//! already-classified `vt_msg::MessageKind`.

use std::collections::HashMap;

use vt_msg::{CharsetSlot, EraseMode, PrivateSgr, ProtectionMode, SgrAttribute, TitleStackOp};

use crate::cell::Cell;
use crate::charset::CharsetState;
use crate::errors::ScreenError;
use crate::scrollback::Scrollback;
use crate::screen::{SavedCursor, Screen};
use crate::sgr_state::SgrState;
use crate::tabstops::TabStops;
use crate::titles::TitleStacks;

#[derive(Debug, Clone, Copy)]
pub struct ScreenConfig {
    pub scrollback_capacity: usize,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        ScreenConfig {
            scrollback_capacity: 1000,
        }
    }
}

/// A read-only view of the active screen for rendering, not a live handle.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub cols: usize,
    pub rows: usize,
    pub cursor_x: usize,
    pub cursor_y: usize,
    pub cursor_visible: bool,
    pub current_sgr: SgrState,
    pub cells: Vec<Vec<Cell>>,
}

pub struct ScreenModel {
    primary: Screen,
    alt: Screen,
    alt_active: bool,
    scrollback: Scrollback,
    tabs: TabStops,
    charset: CharsetState,
    titles: TitleStacks,
    current_sgr: SgrState,
    protect: bool,
    cursor_visible: bool,
    cursor_style: u8,
    private_modes: HashMap<u16, bool>,
    ansi_modes: HashMap<u16, bool>,
    mode_save_stack: HashMap<u16, Vec<bool>>,
    last_printed: Option<char>,
    /// OSC 4/104 palette overrides. Not part of the §3 data model proper,
    /// but `vt_dispatch` needs somewhere to land `OscMessage::PaletteSet`
    /// so palette queries can reflect them; kept here rather than
    /// inventing a second stateful store in `vt_respond`.
    palette: HashMap<u8, (u8, u8, u8)>,
}

impl ScreenModel {
    pub fn new(cols: usize, rows: usize, config: ScreenConfig) -> Self {
        ScreenModel {
            primary: Screen::new(cols, rows),
            alt: Screen::new(cols, rows),
            alt_active: false,
            scrollback: Scrollback::new(config.scrollback_capacity),
            tabs: TabStops::new(cols),
            charset: CharsetState::default(),
            titles: TitleStacks::default(),
            current_sgr: SgrState::default(),
            protect: false,
            cursor_visible: true,
            cursor_style: 0,
            private_modes: HashMap::new(),
            ansi_modes: HashMap::new(),
            mode_save_stack: HashMap::new(),
            last_printed: None,
            palette: HashMap::new(),
        }
    }

    fn active(&self) -> &Screen {
        if self.alt_active {
            &self.alt
        } else {
            &self.primary
        }
    }

    fn active_mut(&mut self) -> &mut Screen {
        if self.alt_active {
            &mut self.alt
        } else {
            &mut self.primary
        }
    }

    // --- §4.4.1 printing, §4.4.2 C0 controls -----------------------------

    pub fn print_char(&mut self, ch: char) {
        let ch = self.charset.translate(ch);
        self.put_translated_char(ch);
    }

    /// Places an already-translated glyph, without running it back through
    /// charset translation. `repeat_preceding_character` (REP) needs this:
    /// it repeats the glyph that actually reached the screen, not the raw
    /// input character re-translated under whatever charset is active now.
    fn put_translated_char(&mut self, ch: char) {
        self.last_printed = Some(ch);
        let sgr = self.current_sgr;
        let protected = self.protect;
        let is_primary_active = !self.alt_active;
        let screen = self.active_mut();
        let evicted = screen.print(ch, sgr, protected);
        if is_primary_active {
            if let Some(row) = evicted {
                self.scrollback.push(row);
            }
        }
    }

    pub fn backspace(&mut self) {
        let screen = self.active_mut();
        screen.cursor_x = screen.cursor_x.saturating_sub(1);
        screen.wrap_pending = false;
    }

    pub fn tab(&mut self) {
        let from = self.active().cursor_x + 1;
        let next = self.tabs.next_stop(from);
        let screen = self.active_mut();
        screen.cursor_x = next;
        screen.wrap_pending = false;
    }

    /// ESC D (IND) and the vertical-movement half of LF/VT/FF: scrolls the
    /// region when already at its bottom, otherwise moves the cursor down
    /// by one.
    pub fn index(&mut self) {
        let sgr = self.current_sgr;
        let is_primary_active = !self.alt_active;
        let evicted = self.active_mut().line_advance(sgr);
        if is_primary_active {
            if let Some(row) = evicted {
                self.scrollback.push(row);
            }
        }
    }

    /// LF/VT/FF. Also performs a carriage return when ANSI mode 20 (LNM)
    /// is set.
    pub fn line_feed(&mut self) {
        self.index();
        if self.ansi_mode(20) {
            self.carriage_return();
        }
    }

    /// ESC E (NEL): index plus carriage return, unconditionally.
    pub fn next_line(&mut self) {
        self.index();
        self.carriage_return();
    }

    /// ESC M (RI): moves up one line, scrolling the region down (no
    /// scrollback interaction) when already at the region's top.
    pub fn reverse_index(&mut self) {
        let sgr = self.current_sgr;
        let at_top = {
            let s = self.active();
            s.cursor_y == s.scroll_top
        };
        if at_top {
            self.active_mut().scroll_region_down(sgr);
        } else {
            let screen = self.active_mut();
            screen.cursor_y = screen.cursor_y.saturating_sub(1);
            screen.wrap_pending = false;
        }
    }

    pub fn carriage_return(&mut self) {
        let screen = self.active_mut();
        screen.cursor_x = 0;
        screen.wrap_pending = false;
    }

    pub fn shift_out(&mut self) {
        self.charset.gl = 1;
    }

    pub fn shift_in(&mut self) {
        self.charset.gl = 0;
    }

    // --- §4.4.3 cursor movement -------------------------------------------

    pub fn cursor_up(&mut self, n: u16) {
        self.active_mut().cursor_up(count(n));
    }

    pub fn cursor_down(&mut self, n: u16) {
        self.active_mut().cursor_down(count(n));
    }

    pub fn cursor_forward(&mut self, n: u16) {
        self.active_mut().cursor_forward(count(n));
    }

    pub fn cursor_back(&mut self, n: u16) {
        self.active_mut().cursor_back(count(n));
    }

    pub fn cursor_next_line(&mut self, n: u16) {
        self.active_mut().cursor_next_line(count(n));
    }

    pub fn cursor_prev_line(&mut self, n: u16) {
        self.active_mut().cursor_prev_line(count(n));
    }

    pub fn cursor_horizontal_absolute(&mut self, ps: u16) {
        self.active_mut().cursor_horizontal_absolute(ps as usize);
    }

    pub fn cursor_vertical_absolute(&mut self, ps: u16) {
        self.active_mut().cursor_vertical_absolute(ps as usize);
    }

    pub fn cursor_position(&mut self, row: u16, col: u16) {
        self.active_mut().cursor_position(row as usize, col as usize);
    }

    pub fn cursor_forward_tabs(&mut self, n: u16) {
        for _ in 0..count(n) {
            let from = self.active().cursor_x + 1;
            let next = self.tabs.next_stop(from);
            let screen = self.active_mut();
            if next <= screen.cursor_x {
                screen.cursor_x = screen.cols - 1;
                break;
            }
            screen.cursor_x = next;
        }
        self.active_mut().wrap_pending = false;
    }

    pub fn cursor_backward_tabs(&mut self, n: u16) {
        for _ in 0..count(n) {
            let from = self.active().cursor_x;
            let prev = self.tabs.prev_stop(from);
            let screen = self.active_mut();
            if prev >= screen.cursor_x {
                screen.cursor_x = 0;
                break;
            }
            screen.cursor_x = prev;
        }
        self.active_mut().wrap_pending = false;
    }

    // --- §4.4.4 erase -------------------------------------------------------

    pub fn erase_in_display(&mut self, mode: EraseMode) {
        self.run_erase_display(mode, false);
    }

    pub fn selective_erase_in_display(&mut self, mode: EraseMode) {
        self.run_erase_display(mode, true);
    }

    fn run_erase_display(&mut self, mode: EraseMode, selective: bool) {
        if matches!(mode, EraseMode::AllAndScrollback) {
            self.scrollback.clear();
        }
        let sgr = self.current_sgr;
        self.active_mut().erase_in_display(mode, sgr, selective);
    }

    pub fn erase_in_line(&mut self, mode: EraseMode) {
        let sgr = self.current_sgr;
        self.active_mut().erase_in_line(mode, sgr, false);
    }

    pub fn selective_erase_in_line(&mut self, mode: EraseMode) {
        let sgr = self.current_sgr;
        self.active_mut().erase_in_line(mode, sgr, true);
    }

    pub fn erase_character(&mut self, n: u16) {
        let sgr = self.current_sgr;
        self.active_mut().erase_character(n as usize, sgr);
    }

    // --- §4.4.5 insert/delete -------------------------------------------

    pub fn insert_lines(&mut self, n: u16) {
        let sgr = self.current_sgr;
        self.active_mut().insert_lines(count(n), sgr);
    }

    pub fn delete_lines(&mut self, n: u16) {
        let sgr = self.current_sgr;
        self.active_mut().delete_lines(count(n), sgr);
    }

    pub fn insert_characters(&mut self, n: u16) {
        let sgr = self.current_sgr;
        self.active_mut().insert_characters(count(n), sgr);
    }

    pub fn delete_characters(&mut self, n: u16) {
        let sgr = self.current_sgr;
        self.active_mut().delete_characters(count(n), sgr);
    }

    pub fn repeat_preceding_character(&mut self, n: u16) {
        if let Some(ch) = self.last_printed {
            for _ in 0..count(n) {
                self.put_translated_char(ch);
            }
        }
    }

    // --- §4.4.6 scrolling -------------------------------------------------

    pub fn scroll_up(&mut self, n: u16) {
        let sgr = self.current_sgr;
        let is_primary_active = !self.alt_active;
        let evicted = self.active_mut().scroll_up_n(count(n), sgr);
        if is_primary_active {
            for row in evicted {
                self.scrollback.push(row);
            }
        }
    }

    pub fn scroll_down(&mut self, n: u16) {
        let sgr = self.current_sgr;
        self.active_mut().scroll_down_n(count(n), sgr);
    }

    pub fn set_scrolling_region(&mut self, top: u16, bottom: u16) {
        self.active_mut().set_scrolling_region(top as usize, bottom as usize);
    }

    // --- §4.4.7/§4.4.8 mode set/reset, alternate screen -------------------

    pub fn set_mode(&mut self, private: bool, modes: Vec<u16>, enable: bool) {
        for m in modes {
            if private {
                self.apply_private_mode(m, enable);
            } else {
                self.ansi_modes.insert(m, enable);
            }
        }
    }

    pub fn xtsave_modes(&mut self, modes: Vec<u16>) {
        for m in modes {
            let current = self.private_mode(m);
            self.mode_save_stack.entry(m).or_default().push(current);
        }
    }

    pub fn xtrestore_modes(&mut self, modes: Vec<u16>) {
        for m in modes {
            if let Some(v) = self.mode_save_stack.get_mut(&m).and_then(|s| s.pop()) {
                self.apply_private_mode(m, v);
            }
        }
    }

    pub fn set_cursor_style(&mut self, style: u8) {
        self.cursor_style = style;
    }

    pub fn private_mode(&self, n: u16) -> bool {
        *self.private_modes.get(&n).unwrap_or(&false)
    }

    pub fn ansi_mode(&self, n: u16) -> bool {
        *self.ansi_modes.get(&n).unwrap_or(&false)
    }

    fn apply_private_mode(&mut self, mode: u16, enable: bool) {
        self.private_modes.insert(mode, enable);
        match mode {
            6 => {
                let top = self.active().scroll_top;
                let screen = self.active_mut();
                screen.origin_mode = enable;
                screen.cursor_y = if enable { top } else { 0 };
                screen.cursor_x = 0;
                screen.wrap_pending = false;
            }
            7 => self.active_mut().autowrap = enable,
            25 => self.cursor_visible = enable,
            47 | 1047 => {
                if enable {
                    if !self.alt_active {
                        self.enter_alt_screen(false);
                    }
                } else if self.alt_active {
                    self.leave_alt_screen();
                }
            }
            1049 => {
                if enable {
                    if !self.alt_active {
                        self.decsc();
                        self.enter_alt_screen(true);
                    }
                } else if self.alt_active {
                    self.leave_alt_screen();
                    let (cols, rows) = (self.alt.cols, self.alt.rows);
                    self.alt = Screen::new(cols, rows);
                    self.decrc();
                }
            }
            2027 => self.charset.utf8_mode = enable,
            // DECCKM, column-switch (3), mouse reporting, bracketed paste:
            // stored above, no screen-model effect.
            _ => {}
        }
    }

    fn enter_alt_screen(&mut self, clear: bool) {
        self.alt_active = true;
        if clear {
            let (cols, rows) = (self.alt.cols, self.alt.rows);
            self.alt = Screen::new(cols, rows);
        }
    }

    fn leave_alt_screen(&mut self) {
        self.alt_active = false;
    }

    pub fn is_alternate_screen_active(&self) -> bool {
        self.alt_active
    }

    // --- §4.4.9 cursor save/restore ---------------------------------------

    pub fn decsc(&mut self) {
        let gl = self.charset.gl;
        let gr = self.charset.gr;
        let sgr = self.current_sgr;
        let screen = self.active_mut();
        screen.saved_cursor = Some(SavedCursor {
            x: screen.cursor_x,
            y: screen.cursor_y,
            sgr,
            origin_mode: screen.origin_mode,
            autowrap: screen.autowrap,
            gl,
            gr,
            wrap_pending: screen.wrap_pending,
        });
    }

    pub fn decrc(&mut self) {
        match self.active().saved_cursor.clone() {
            Some(s) => {
                self.current_sgr = s.sgr;
                self.charset.gl = s.gl;
                self.charset.gr = s.gr;
                let screen = self.active_mut();
                screen.cursor_x = s.x.min(screen.cols - 1);
                screen.cursor_y = s.y.min(screen.rows - 1);
                screen.origin_mode = s.origin_mode;
                screen.autowrap = s.autowrap;
                screen.wrap_pending = s.wrap_pending;
            }
            None => {
                self.current_sgr = SgrState::default();
                let screen = self.active_mut();
                screen.cursor_x = 0;
                screen.cursor_y = 0;
                screen.wrap_pending = false;
            }
        }
    }

    pub fn sco_save_cursor(&mut self) {
        let screen = self.active_mut();
        screen.sco_saved_cursor = Some((screen.cursor_x, screen.cursor_y));
    }

    pub fn sco_restore_cursor(&mut self) {
        let screen = self.active_mut();
        if let Some((x, y)) = screen.sco_saved_cursor {
            screen.cursor_x = x.min(screen.cols - 1);
            screen.cursor_y = y.min(screen.rows - 1);
            screen.wrap_pending = false;
        }
    }

    // --- §4.4.10 soft/hard reset --------------------------------------

    pub fn soft_reset(&mut self) {
        self.current_sgr = SgrState::default();
        self.protect = false;
        self.cursor_visible = true;
        self.cursor_style = 0;
        let cols = self.active().cols;
        self.tabs = TabStops::new(cols);
        let screen = self.active_mut();
        let rows = screen.rows;
        screen.origin_mode = false;
        screen.autowrap = true;
        screen.scroll_top = 0;
        screen.scroll_bottom = rows.saturating_sub(1);
    }

    pub fn hard_reset(&mut self) {
        self.soft_reset();
        let (cols, rows) = (self.primary.cols, self.primary.rows);
        self.primary = Screen::new(cols, rows);
        self.alt = Screen::new(cols, rows);
        self.alt_active = false;
        self.scrollback.clear();
        self.titles = TitleStacks::default();
        self.charset = CharsetState::default();
        self.private_modes.clear();
        self.ansi_modes.clear();
        self.mode_save_stack.clear();
        self.last_printed = None;
        self.palette.clear();
    }

    // --- OSC 4/104 palette overrides -------------------------------------

    pub fn set_palette_color(&mut self, index: u8, rgb: (u8, u8, u8)) {
        self.palette.insert(index, rgb);
    }

    pub fn reset_palette_color(&mut self, index: Option<u8>) {
        match index {
            Some(i) => {
                self.palette.remove(&i);
            }
            None => self.palette.clear(),
        }
    }

    pub fn palette_color(&self, index: u8) -> Option<(u8, u8, u8)> {
        self.palette.get(&index).copied()
    }

    // --- §4.4.11 charsets -------------------------------------------------

    pub fn designate_charset(&mut self, slot: CharsetSlot, id: u8) {
        self.charset.designate(slot, id);
    }

    /// Direct GL invocation bypassing SO/SI, used by `vt_term`'s public
    /// `switch_character_set` entry point (spec §6.1).
    pub fn switch_character_set(&mut self, slot: CharsetSlot) {
        self.charset.gl = slot as usize;
    }

    pub fn set_utf8_mode(&mut self, enabled: bool) {
        self.charset.utf8_mode = enabled;
    }

    pub fn is_utf8_mode(&self) -> bool {
        self.charset.utf8_mode
    }

    pub fn get_character_set(&self, slot: CharsetSlot) -> u8 {
        self.charset.designations[slot as usize]
    }

    /// The designator byte of whichever charset is currently invoked into
    /// GL (`ESC ( ... ` for G0, etc.) — `b'B'` for US ASCII, `b'0'` for DEC
    /// Special Graphics, and so on.
    pub fn gl_designation(&self) -> u8 {
        self.charset.designations[self.charset.gl]
    }

    // --- §4.4.12 tab stops --------------------------------------------

    pub fn set_tab(&mut self) {
        let x = self.active().cursor_x;
        self.tabs.set(x);
    }

    pub fn tab_clear(&mut self, all: bool) {
        if all {
            self.tabs.clear_all();
        } else {
            let x = self.active().cursor_x;
            self.tabs.clear_at(x);
        }
    }

    // --- §4.4.13 window manipulation -----------------------------------

    pub fn title_stack(&mut self, op: TitleStackOp) {
        match op {
            TitleStackOp::PushTitle => self.titles.push_title(),
            TitleStackOp::PushIconName => self.titles.push_icon(),
            TitleStackOp::PopTitle => self.titles.pop_title(),
            TitleStackOp::PopIconName => self.titles.pop_icon(),
        }
    }

    pub fn set_window_title(&mut self, title: String) {
        self.titles.window_title = title;
    }

    pub fn set_icon_name(&mut self, name: String) {
        self.titles.icon_name = name;
    }

    pub fn get_window_title(&self) -> &str {
        &self.titles.window_title
    }

    pub fn get_icon_name(&self) -> &str {
        &self.titles.icon_name
    }

    // --- §4.4.14 protection ------------------------------------------

    pub fn set_protection(&mut self, mode: ProtectionMode) {
        self.protect = matches!(mode, ProtectionMode::Protect);
    }

    // --- SGR -------------------------------------------------------------

    pub fn apply_sgr(&mut self, attrs: Vec<SgrAttribute>) {
        for a in attrs {
            self.current_sgr.apply(a);
        }
    }

    pub fn apply_sgr_private(&mut self, p: PrivateSgr) {
        if let PrivateSgr::UnderlineStyleSelect(style) = p {
            self.current_sgr.underline_style = style;
        }
    }

    pub fn current_sgr(&self) -> SgrState {
        self.current_sgr
    }

    /// 1-based `(top, bottom)` of the active screen's scroll region, as
    /// `DECRQSS $ q r` reports it.
    pub fn scroll_region(&self) -> (usize, usize) {
        let s = self.active();
        (s.scroll_top + 1, s.scroll_bottom + 1)
    }

    /// 1-based `(row, col)` for CPR, relative to the scroll region when
    /// origin mode is set (spec §4.5).
    pub fn cursor_report_position(&self) -> (usize, usize) {
        let s = self.active();
        let row = if s.origin_mode {
            s.cursor_y - s.scroll_top + 1
        } else {
            s.cursor_y + 1
        };
        (row, s.cursor_x + 1)
    }

    // --- resize -------------------------------------------------------

    pub fn resize(&mut self, cols: usize, rows: usize) {
        resize_evicting(&mut self.primary, &mut self.scrollback, cols, rows);
        resize_in_place(&mut self.alt, cols, rows);
        self.tabs.resize(cols);
    }

    // --- queries used by vt_term's facade --------------------------------

    pub fn snapshot(&self) -> Snapshot {
        let screen = self.active();
        Snapshot {
            cols: screen.cols,
            rows: screen.rows,
            cursor_x: screen.cursor_x,
            cursor_y: screen.cursor_y,
            cursor_visible: self.cursor_visible,
            current_sgr: self.current_sgr,
            cells: screen.grid.clone(),
        }
    }

    /// Rows `[start, end]` of scrollback followed by the primary screen,
    /// concatenated into one addressable range. Returns an empty vector
    /// (logging instead of panicking) on an invalid range, per the
    /// diagnostic-only error policy shared with `vt_parser`.
    pub fn viewport_rows(&self, start: usize, end: usize) -> Vec<Vec<Cell>> {
        if start > end {
            log::debug!("{}", ScreenError::InvalidRange { start, end });
            return Vec::new();
        }
        let mut combined: Vec<Vec<Cell>> = self.scrollback.iter().cloned().collect();
        combined.extend(self.active().grid.iter().cloned());
        if start >= combined.len() {
            return Vec::new();
        }
        let end = end.min(combined.len() - 1);
        combined[start..=end].to_vec()
    }

    pub fn scrollback_row_count(&self) -> usize {
        self.scrollback.len()
    }

    pub fn viewport_rows_count(&self) -> usize {
        self.active().rows
    }

    pub fn viewport_cols_count(&self) -> usize {
        self.active().cols
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn cursor_style(&self) -> u8 {
        self.cursor_style
    }
}

fn resize_evicting(screen: &mut Screen, scrollback: &mut Scrollback, cols: usize, rows: usize) {
    while screen.grid.len() > rows {
        let row = screen.grid.remove(0);
        scrollback.push(row);
    }
    reflow_grid(screen, cols, rows);
}

fn resize_in_place(screen: &mut Screen, cols: usize, rows: usize) {
    while screen.grid.len() > rows {
        screen.grid.pop();
    }
    reflow_grid(screen, cols, rows);
}

fn reflow_grid(screen: &mut Screen, cols: usize, rows: usize) {
    for row in screen.grid.iter_mut() {
        row.resize(cols, Cell::default());
    }
    while screen.grid.len() < rows {
        screen.grid.push(vec![Cell::default(); cols]);
    }
    screen.cols = cols;
    screen.rows = rows;
    screen.cursor_x = screen.cursor_x.min(cols.saturating_sub(1));
    screen.cursor_y = screen.cursor_y.min(rows.saturating_sub(1));
    screen.scroll_top = screen.scroll_top.min(rows.saturating_sub(1));
    screen.scroll_bottom = rows.saturating_sub(1).max(screen.scroll_top);
    screen.wrap_pending = false;
}

/// SGR/cursor `Ps` parameters default to 1 when 0 (spec-wide convention
/// for the "count" style parameters).
fn count(n: u16) -> usize {
    n.max(1) as usize
}
