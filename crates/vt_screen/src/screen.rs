//! A single screen buffer: grid, cursor, wrap state, scroll region, and
//! cursor-save slots. One instance backs the primary screen, another
//! backs the alternate screen; `ScreenModel` (`model.rs`) owns both and
//! decides which is active.
//!
//! Grounded on `icy_engine::TerminalState` + `icy_engine::Caret`, merged
//! into one struct since cursor and buffer state are never separated
//! here the way `Caret`/`Buffer` are split there.

use unicode_width::UnicodeWidthChar;
use vt_msg::EraseMode;

use crate::cell::Cell;
use crate::sgr_state::SgrState;

#[derive(Debug, Clone)]
pub struct SavedCursor {
    pub x: usize,
    pub y: usize,
    pub sgr: SgrState,
    pub origin_mode: bool,
    pub autowrap: bool,
    pub gl: usize,
    pub gr: usize,
    pub wrap_pending: bool,
}

#[derive(Debug, Clone)]
pub struct Screen {
    pub cols: usize,
    pub rows: usize,
    pub grid: Vec<Vec<Cell>>,
    pub cursor_x: usize,
    pub cursor_y: usize,
    pub wrap_pending: bool,
    pub scroll_top: usize,
    pub scroll_bottom: usize,
    pub origin_mode: bool,
    pub autowrap: bool,
    /// DECSC/DECRC slot (spec §4.4.9), one per screen.
    pub saved_cursor: Option<SavedCursor>,
    /// `CSI s`/`CSI u` SCO-convention slot, separate from DECSC/DECRC.
    pub sco_saved_cursor: Option<(usize, usize)>,
}

impl Screen {
    pub fn new(cols: usize, rows: usize) -> Self {
        Screen {
            cols,
            rows,
            grid: (0..rows).map(|_| vec![Cell::default(); cols]).collect(),
            cursor_x: 0,
            cursor_y: 0,
            wrap_pending: false,
            scroll_top: 0,
            scroll_bottom: rows.saturating_sub(1),
            origin_mode: false,
            autowrap: true,
            saved_cursor: None,
            sco_saved_cursor: None,
        }
    }

    fn blank_row(&self, sgr: SgrState) -> Vec<Cell> {
        vec![Cell::blank(sgr); self.cols]
    }

    /// Scrolls the scroll region up by one, returning the evicted top row
    /// so the caller can push it to scrollback when appropriate.
    pub fn scroll_region_up(&mut self, sgr: SgrState) -> Vec<Cell> {
        let evicted = self.grid.remove(self.scroll_top);
        self.grid.insert(self.scroll_bottom, self.blank_row(sgr));
        evicted
    }

    pub fn scroll_region_down(&mut self, sgr: SgrState) {
        self.grid.remove(self.scroll_bottom);
        self.grid.insert(self.scroll_top, self.blank_row(sgr));
    }

    pub fn scroll_up_n(&mut self, n: usize, sgr: SgrState) -> Vec<Vec<Cell>> {
        (0..n).map(|_| self.scroll_region_up(sgr)).collect()
    }

    pub fn scroll_down_n(&mut self, n: usize, sgr: SgrState) {
        for _ in 0..n {
            self.scroll_region_down(sgr);
        }
    }

    /// §4.4.1 "line advance": scrolls the region when already at its
    /// bottom, otherwise moves the cursor down by one. Returns the evicted
    /// row, if scrolling happened.
    pub fn line_advance(&mut self, sgr: SgrState) -> Option<Vec<Cell>> {
        if self.cursor_y == self.scroll_bottom {
            Some(self.scroll_region_up(sgr))
        } else {
            self.cursor_y = (self.cursor_y + 1).min(self.rows.saturating_sub(1));
            None
        }
    }

    /// §4.4.1 printing. Returns the evicted row, if autowrap triggered a
    /// scroll. A double-width grapheme (Open Question decision #4) occupies
    /// the cursor's cell plus the one to its right, the second carrying
    /// `wide_cont = true`; if there isn't room for the pair on the current
    /// line, it wraps first like any other character would at the margin.
    pub fn print(&mut self, ch: char, sgr: SgrState, protected: bool) -> Option<Vec<Cell>> {
        let mut evicted = None;
        if self.wrap_pending {
            if self.autowrap {
                evicted = self.line_advance(sgr);
                self.cursor_x = 0;
            }
            self.wrap_pending = false;
        }
        let wide = UnicodeWidthChar::width(ch).unwrap_or(1) >= 2;
        if wide && self.cursor_x + 1 >= self.cols && self.autowrap {
            let more = self.line_advance(sgr);
            evicted = evicted.or(more);
            self.cursor_x = 0;
        }
        self.grid[self.cursor_y][self.cursor_x] = Cell {
            ch,
            sgr,
            protected,
            wide_cont: false,
        };
        let mut x = self.cursor_x;
        if wide && x + 1 < self.cols {
            x += 1;
            self.grid[self.cursor_y][x] = Cell {
                ch: ' ',
                sgr,
                protected,
                wide_cont: true,
            };
        }
        if x + 1 < self.cols {
            self.cursor_x = x + 1;
        } else {
            self.cursor_x = x;
            self.wrap_pending = true;
        }
        evicted
    }

    pub fn cursor_up(&mut self, n: usize) {
        let floor = if self.origin_mode { self.scroll_top } else { 0 };
        self.cursor_y = self.cursor_y.saturating_sub(n).max(floor);
        self.wrap_pending = false;
    }

    pub fn cursor_down(&mut self, n: usize) {
        let ceil = if self.origin_mode {
            self.scroll_bottom
        } else {
            self.rows.saturating_sub(1)
        };
        self.cursor_y = (self.cursor_y + n).min(ceil);
        self.wrap_pending = false;
    }

    pub fn cursor_forward(&mut self, n: usize) {
        self.cursor_x = (self.cursor_x + n).min(self.cols.saturating_sub(1));
        self.wrap_pending = false;
    }

    pub fn cursor_back(&mut self, n: usize) {
        self.cursor_x = self.cursor_x.saturating_sub(n);
        self.wrap_pending = false;
    }

    pub fn cursor_next_line(&mut self, n: usize) {
        self.cursor_down(n);
        self.cursor_x = 0;
    }

    pub fn cursor_prev_line(&mut self, n: usize) {
        self.cursor_up(n);
        self.cursor_x = 0;
    }

    pub fn cursor_horizontal_absolute(&mut self, ps: usize) {
        self.cursor_x = ps.saturating_sub(1).min(self.cols.saturating_sub(1));
        self.wrap_pending = false;
    }

    /// VPA clamps the absolute target line into the scroll region when in
    /// origin mode; unlike CUP it does not add `scroll_top` as an offset.
    pub fn cursor_vertical_absolute(&mut self, ps: usize) {
        let (floor, ceil) = if self.origin_mode {
            (self.scroll_top, self.scroll_bottom)
        } else {
            (0, self.rows.saturating_sub(1))
        };
        self.cursor_y = ps.saturating_sub(1).clamp(floor, ceil);
        self.wrap_pending = false;
    }

    pub fn cursor_position(&mut self, row: usize, col: usize) {
        self.cursor_y = if self.origin_mode {
            (self.scroll_top + row.saturating_sub(1)).clamp(self.scroll_top, self.scroll_bottom)
        } else {
            row.saturating_sub(1).min(self.rows.saturating_sub(1))
        };
        self.cursor_x = col.saturating_sub(1).min(self.cols.saturating_sub(1));
        self.wrap_pending = false;
    }

    fn erase_span(&mut self, y: usize, start_x: usize, end_x: usize, sgr: SgrState, selective: bool) {
        for x in start_x..=end_x {
            if selective && self.grid[y][x].protected {
                continue;
            }
            self.grid[y][x] = Cell::blank(sgr);
        }
    }

    pub fn erase_in_display(&mut self, mode: EraseMode, sgr: SgrState, selective: bool) {
        let (from, to) = match mode {
            EraseMode::CursorToEnd => ((self.cursor_y, self.cursor_x), (self.rows - 1, self.cols - 1)),
            EraseMode::StartToCursor => ((0, 0), (self.cursor_y, self.cursor_x)),
            EraseMode::All | EraseMode::AllAndScrollback => ((0, 0), (self.rows - 1, self.cols - 1)),
        };
        for y in from.0..=to.0 {
            let start_x = if y == from.0 { from.1 } else { 0 };
            let end_x = if y == to.0 { to.1 } else { self.cols - 1 };
            self.erase_span(y, start_x, end_x, sgr, selective);
        }
    }

    pub fn erase_in_line(&mut self, mode: EraseMode, sgr: SgrState, selective: bool) {
        let y = self.cursor_y;
        let (start_x, end_x) = match mode {
            EraseMode::CursorToEnd => (self.cursor_x, self.cols - 1),
            EraseMode::StartToCursor => (0, self.cursor_x),
            EraseMode::All | EraseMode::AllAndScrollback => (0, self.cols - 1),
        };
        self.erase_span(y, start_x, end_x, sgr, selective);
    }

    pub fn erase_character(&mut self, n: usize, sgr: SgrState) {
        let y = self.cursor_y;
        let end = (self.cursor_x + n).min(self.cols);
        for x in self.cursor_x..end {
            self.grid[y][x] = Cell::blank(sgr);
        }
    }

    pub fn insert_lines(&mut self, n: usize, sgr: SgrState) {
        if self.cursor_y < self.scroll_top || self.cursor_y > self.scroll_bottom {
            return;
        }
        let n = n.min(self.scroll_bottom - self.cursor_y + 1);
        for _ in 0..n {
            self.grid.remove(self.scroll_bottom);
            self.grid.insert(self.cursor_y, self.blank_row(sgr));
        }
        self.cursor_x = 0;
    }

    pub fn delete_lines(&mut self, n: usize, sgr: SgrState) {
        if self.cursor_y < self.scroll_top || self.cursor_y > self.scroll_bottom {
            return;
        }
        let n = n.min(self.scroll_bottom - self.cursor_y + 1);
        for _ in 0..n {
            self.grid.remove(self.cursor_y);
            self.grid.insert(self.scroll_bottom, self.blank_row(sgr));
        }
        self.cursor_x = 0;
    }

    pub fn insert_characters(&mut self, n: usize, sgr: SgrState) {
        let y = self.cursor_y;
        let n = n.min(self.cols - self.cursor_x);
        for _ in 0..n {
            self.grid[y].remove(self.cols - 1);
            self.grid[y].insert(self.cursor_x, Cell::blank(sgr));
        }
    }

    pub fn delete_characters(&mut self, n: usize, sgr: SgrState) {
        let y = self.cursor_y;
        let n = n.min(self.cols - self.cursor_x);
        for _ in 0..n {
            self.grid[y].remove(self.cursor_x);
            self.grid[y].push(Cell::blank(sgr));
        }
    }

    /// `pt`/`pb` are the raw `CSI Pt;Pb r` parameters (1-based, 0 when
    /// omitted); the region becomes `[pt-1, pb-1]` clamped to the screen,
    /// or the full screen when `pt >= pb`.
    pub fn set_scrolling_region(&mut self, pt: usize, pb: usize) {
        let (top, bottom) = if pt >= pb {
            (0, self.rows.saturating_sub(1))
        } else {
            (
                pt.saturating_sub(1).min(self.rows - 1),
                pb.saturating_sub(1).min(self.rows - 1),
            )
        };
        self.scroll_top = top;
        self.scroll_bottom = bottom;
        self.cursor_y = if self.origin_mode { top } else { 0 };
        self.cursor_x = 0;
        self.wrap_pending = false;
    }
}
