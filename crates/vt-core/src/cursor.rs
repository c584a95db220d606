//! Cursor position, pending attributes, tab stops, and per-session charset
//! selection.
//!
//! Everything here is state that travels with the cursor rather than with
//! any one cell: where the next write lands, what attributes it gets, which
//! charset translates it, and the save/restore snapshot `DECSC`/`DECRC` pull
//! from.

use std::collections::BTreeSet;

use crate::cell::SgrAttrs;
use crate::charset::{Charset, CharsetSlot};

/// Snapshot taken by `DECSC`, restored by `DECRC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedCursor {
    pub x: u16,
    pub y: u16,
    pub attrs: SgrAttrs,
    pub g0: Charset,
    pub g1: Charset,
    pub active: CharsetSlot,
    pub origin_mode: bool,
}

/// The terminal cursor: position, pending write attributes, visibility,
/// tab stops, and charset state.
#[derive(Debug, Clone)]
pub struct Cursor {
    /// 0-indexed column. May transiently equal `columns` to mark "past the
    /// right edge" before the next printable resolves the pending wrap.
    pub x: u16,
    /// 0-indexed row.
    pub y: u16,
    /// Attribute prototype applied to the next cell written.
    pub attrs: SgrAttrs,
    /// Hidden via `DECTCEM` reset.
    pub hidden: bool,
    tab_stops: BTreeSet<u16>,
    columns: u16,
    g0: Charset,
    g1: Charset,
    active: CharsetSlot,
    /// A pending single-shift (SS2/SS3) applies to exactly the next
    /// printable, then clears itself.
    single_shift: Option<CharsetSlot>,
    saved: Option<SavedCursor>,
}

impl Cursor {
    /// Create a cursor for a screen of the given width, with tab stops at
    /// every eighth column (the VT100 default).
    pub fn new(columns: u16) -> Self {
        Self {
            x: 0,
            y: 0,
            attrs: SgrAttrs::default(),
            hidden: false,
            tab_stops: default_tab_stops(columns),
            columns,
            g0: Charset::Ascii,
            g1: Charset::Ascii,
            active: CharsetSlot::G0,
            single_shift: None,
            saved: None,
        }
    }

    /// Reposition for a new column count, regenerating default tab stops.
    /// Used by `resize` and by `DECCOLM`.
    pub fn retab(&mut self, columns: u16) {
        self.columns = columns;
        self.tab_stops = default_tab_stops(columns);
    }

    /// Whether the cursor is parked at the "past right edge" sentinel
    /// awaiting the next printable to resolve a pending autowrap.
    pub fn pending_wrap(&self) -> bool {
        self.x >= self.columns
    }

    /// `DECSC`: snapshot position, attributes, charset state, and origin
    /// mode.
    pub fn save(&mut self, origin_mode: bool) {
        self.saved = Some(SavedCursor {
            x: self.x,
            y: self.y,
            attrs: self.attrs,
            g0: self.g0,
            g1: self.g1,
            active: self.active,
            origin_mode,
        });
    }

    /// `DECRC`: restore a prior `DECSC` snapshot. Returns the snapshot's
    /// `origin_mode` so the screen can restore that bit on the mode
    /// registry (the cursor itself does not own mode state). Returns `None`
    /// if nothing was ever saved, per which physical terminals restore the
    /// power-on default position instead — callers should fall back to
    /// `(0, 0)` and leave modes untouched in that case.
    pub fn restore(&mut self) -> Option<bool> {
        let saved = self.saved?;
        self.x = saved.x;
        self.y = saved.y;
        self.attrs = saved.attrs;
        self.g0 = saved.g0;
        self.g1 = saved.g1;
        self.active = saved.active;
        Some(saved.origin_mode)
    }

    /// The charset that currently translates incoming printables: a pending
    /// single shift if one is armed, else whichever of G0/G1 is selected.
    pub fn effective_charset(&mut self) -> Charset {
        if let Some(slot) = self.single_shift.take() {
            return self.charset_in(slot);
        }
        self.charset_in(self.active)
    }

    fn charset_in(&self, slot: CharsetSlot) -> Charset {
        match slot {
            CharsetSlot::G0 => self.g0,
            CharsetSlot::G1 => self.g1,
        }
    }

    /// `ESC ( x` / `ESC ) x` / `ESC * x` / `ESC + x`: designate a table into
    /// G0 or G1. (This engine tracks only G0/G1; G2/G3 designations are
    /// accepted by the parser but have no slot to land in here, matching
    /// the scope of the modes this core actually dispatches on.)
    pub fn designate(&mut self, slot: CharsetSlot, charset: Charset) {
        match slot {
            CharsetSlot::G0 => self.g0 = charset,
            CharsetSlot::G1 => self.g1 = charset,
        }
    }

    /// `SI` (shift in): select G0 as active.
    pub fn shift_in(&mut self) {
        self.active = CharsetSlot::G0;
    }

    /// `SO` (shift out): select G1 as active.
    pub fn shift_out(&mut self) {
        self.active = CharsetSlot::G1;
    }

    /// Arm a single shift (SS2 selects G2, SS3 selects G3 on real hardware;
    /// this engine maps both onto G1 since it has no G2/G3 slots, which is
    /// enough to keep the charset rotating correctly for the one-shot case
    /// without losing track of the otherwise-active slot).
    pub fn single_shift(&mut self, slot: CharsetSlot) {
        self.single_shift = Some(slot);
    }

    /// `HTS`: set a tab stop at the current column.
    pub fn set_tab_stop(&mut self) {
        self.tab_stops.insert(self.x);
    }

    /// `TBC 0`: clear the tab stop at the current column.
    pub fn clear_tab_stop(&mut self) {
        self.tab_stops.remove(&self.x);
    }

    /// `TBC 3`: clear every tab stop.
    pub fn clear_all_tab_stops(&mut self) {
        self.tab_stops.clear();
    }

    /// The next tab stop strictly after the current column, clamped to the
    /// last column if none remains.
    pub fn next_tab_stop(&self) -> u16 {
        self.tab_stops
            .range((self.x + 1)..)
            .next()
            .copied()
            .unwrap_or(self.columns.saturating_sub(1))
    }
}

fn default_tab_stops(columns: u16) -> BTreeSet<u16> {
    (8..columns).step_by(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cursor_starts_at_origin() {
        let c = Cursor::new(80);
        assert_eq!((c.x, c.y), (0, 0));
        assert!(!c.hidden);
        assert!(!c.pending_wrap());
    }

    #[test]
    fn default_tab_stops_every_eighth_column() {
        let c = Cursor::new(40);
        assert_eq!(c.next_tab_stop(), 8);
    }

    #[test]
    fn next_tab_stop_clamps_at_last_column_when_exhausted() {
        let mut c = Cursor::new(10);
        c.x = 9;
        assert_eq!(c.next_tab_stop(), 9);
    }

    #[test]
    fn set_and_clear_tab_stop() {
        let mut c = Cursor::new(20);
        c.x = 5;
        c.set_tab_stop();
        c.x = 0;
        assert_eq!(c.next_tab_stop(), 5);
        c.x = 5;
        c.clear_tab_stop();
        assert_eq!(c.next_tab_stop(), 8);
    }

    #[test]
    fn clear_all_tab_stops_empties_set() {
        let mut c = Cursor::new(40);
        c.clear_all_tab_stops();
        assert_eq!(c.next_tab_stop(), 39);
    }

    #[test]
    fn pending_wrap_true_when_x_at_columns() {
        let mut c = Cursor::new(10);
        c.x = 10;
        assert!(c.pending_wrap());
    }

    #[test]
    fn save_and_restore_round_trips_position_and_attrs() {
        let mut c = Cursor::new(80);
        c.x = 5;
        c.y = 3;
        c.attrs.fg = crate::cell::Color::Named(1);
        c.save(false);
        c.x = 0;
        c.y = 0;
        c.attrs = SgrAttrs::default();
        let origin = c.restore().unwrap();
        assert_eq!((c.x, c.y), (5, 3));
        assert_eq!(c.attrs.fg, crate::cell::Color::Named(1));
        assert!(!origin);
    }

    #[test]
    fn restore_without_prior_save_returns_none() {
        let mut c = Cursor::new(80);
        assert!(c.restore().is_none());
    }

    #[test]
    fn shift_in_and_out_swap_active_slot() {
        let mut c = Cursor::new(80);
        c.designate(CharsetSlot::G1, Charset::DecSpecialGraphics);
        assert_eq!(c.effective_charset(), Charset::Ascii);
        c.shift_out();
        assert_eq!(c.effective_charset(), Charset::DecSpecialGraphics);
        c.shift_in();
        assert_eq!(c.effective_charset(), Charset::Ascii);
    }

    #[test]
    fn single_shift_applies_once_then_reverts() {
        let mut c = Cursor::new(80);
        c.designate(CharsetSlot::G1, Charset::Uk);
        c.single_shift(CharsetSlot::G1);
        assert_eq!(c.effective_charset(), Charset::Uk);
        assert_eq!(c.effective_charset(), Charset::Ascii);
    }

    #[test]
    fn retab_regenerates_default_stops_for_new_width() {
        let mut c = Cursor::new(10);
        c.clear_all_tab_stops();
        c.retab(40);
        assert_eq!(c.next_tab_stop(), 8);
    }
}
