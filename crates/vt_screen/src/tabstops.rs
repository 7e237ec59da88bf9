//! Tab stop column set (spec §3.5, §4.4.12).
//!
//! Grounded on `icy_engine::TerminalState::{tab_stops, next_tab_stop,
//! prev_tab_stop}`, restated over a `BTreeSet` so stop lookups stay ordered
//! without a manual scan.

use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct TabStops {
    stops: BTreeSet<usize>,
    cols: usize,
}

impl TabStops {
    /// Initializes stops at every 8th column, per spec default.
    pub fn new(cols: usize) -> Self {
        let mut stops = BTreeSet::new();
        let mut c = 0;
        while c < cols {
            stops.insert(c);
            c += 8;
        }
        TabStops { stops, cols }
    }

    pub fn resize(&mut self, cols: usize) {
        self.cols = cols;
        self.stops.retain(|&c| c < cols);
    }

    pub fn set(&mut self, col: usize) {
        if col < self.cols {
            self.stops.insert(col);
        }
    }

    pub fn clear_at(&mut self, col: usize) {
        self.stops.remove(&col);
    }

    pub fn clear_all(&mut self) {
        self.stops.clear();
    }

    /// Next stop at or after `from`, clamped to the last column when none
    /// remains.
    pub fn next_stop(&self, from: usize) -> usize {
        self.stops
            .range(from..)
            .next()
            .copied()
            .unwrap_or_else(|| self.cols.saturating_sub(1))
    }

    /// Last stop strictly before `from`, clamped to column 0 when none
    /// remains.
    pub fn prev_stop(&self, from: usize) -> usize {
        self.stops.range(..from).next_back().copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_every_eighth_column() {
        let t = TabStops::new(40);
        assert_eq!(t.next_stop(1), 8);
        assert_eq!(t.next_stop(9), 16);
    }

    #[test]
    fn clear_and_set_are_targeted() {
        let mut t = TabStops::new(40);
        t.clear_at(8);
        assert_eq!(t.next_stop(1), 16);
        t.set(10);
        assert_eq!(t.next_stop(1), 10);
    }

    #[test]
    fn next_stop_clamps_to_last_column_past_the_end() {
        let t = TabStops::new(10);
        assert_eq!(t.next_stop(9), 9);
    }

    #[test]
    fn clear_all_removes_every_stop() {
        let mut t = TabStops::new(40);
        t.clear_all();
        assert_eq!(t.next_stop(0), 39);
        assert_eq!(t.prev_stop(39), 0);
    }
}
