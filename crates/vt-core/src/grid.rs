//! Terminal grid: 2D cell matrix representing the visible viewport.
//!
//! The grid is the primary data model for the terminal. It owns a flat vector
//! of cells indexed by `(row, col)` and provides methods for the operations
//! that the VT parser dispatches (print, erase, scroll, resize). It has no
//! notion of scrollback, damage tracking, or rendering — those live outside
//! the core, or are reduced here to the single `dirty` flag a reader can poll.

use crate::cell::{Cell, SgrAttrs};

/// 2D terminal cell grid.
///
/// Cells are stored in row-major order in a flat `Vec<Cell>`. Dense storage
/// keeps cache behaviour predictable for the fixed, typically small grids
/// this engine targets.
#[derive(Debug, Clone)]
pub struct Grid {
    cells: Vec<Cell>,
    cols: u16,
    rows: u16,
    /// Rows touched since the last time a reader cleared this flag. This is
    /// the grid's entire damage-tracking surface: a bitmap, not a diff/patch
    /// engine.
    dirty: Vec<bool>,
}

impl Grid {
    /// Create a new grid filled with default (blank) cells.
    pub fn new(cols: u16, rows: u16) -> Self {
        let len = (cols as usize) * (rows as usize);
        Self {
            cells: vec![Cell::default(); len],
            cols,
            rows,
            dirty: vec![false; rows as usize],
        }
    }

    /// Number of columns.
    pub fn cols(&self) -> u16 {
        self.cols
    }

    /// Number of rows.
    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Get a reference to the cell at `(row, col)`.
    ///
    /// Returns `None` if out of bounds.
    pub fn cell(&self, row: u16, col: u16) -> Option<&Cell> {
        if row < self.rows && col < self.cols {
            Some(&self.cells[self.index(row, col)])
        } else {
            None
        }
    }

    /// Get a mutable reference to the cell at `(row, col)`.
    ///
    /// Returns `None` if out of bounds. Marks the row dirty.
    pub fn cell_mut(&mut self, row: u16, col: u16) -> Option<&mut Cell> {
        if row < self.rows && col < self.cols {
            let idx = self.index(row, col);
            self.mark_dirty(row);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Get a slice of cells for the given row.
    ///
    /// Returns `None` if `row` is out of bounds.
    pub fn row_cells(&self, row: u16) -> Option<&[Cell]> {
        if row < self.rows {
            let start = (row as usize) * (self.cols as usize);
            let end = start + (self.cols as usize);
            Some(&self.cells[start..end])
        } else {
            None
        }
    }

    /// Get a mutable slice of cells for the given row.
    pub fn row_cells_mut(&mut self, row: u16) -> Option<&mut [Cell]> {
        if row < self.rows {
            self.mark_dirty(row);
            let start = (row as usize) * (self.cols as usize);
            let end = start + (self.cols as usize);
            Some(&mut self.cells[start..end])
        } else {
            None
        }
    }

    /// Rows touched since the last `clear_dirty`.
    pub fn dirty_rows(&self) -> &[bool] {
        &self.dirty
    }

    /// Clear the damage bitmap. Readers call this after consuming a frame.
    pub fn clear_dirty(&mut self) {
        for d in &mut self.dirty {
            *d = false;
        }
    }

    fn mark_dirty(&mut self, row: u16) {
        if let Some(d) = self.dirty.get_mut(row as usize) {
            *d = true;
        }
    }

    fn mark_dirty_range(&mut self, start_row: u16, end_row: u16) {
        let end = end_row.min(self.rows);
        for r in start_row.min(end)..end {
            if let Some(d) = self.dirty.get_mut(r as usize) {
                *d = true;
            }
        }
    }

    /// Flip the `INVERSE` bit on every cell in the grid, used when `DECSCNM`
    /// (reverse screen video) is toggled on or off. A cell that already had
    /// its own `SGR 7` inverse bit set cancels out, matching the XOR nature
    /// of reversing the actual video signal on real hardware. Cells written
    /// or erased afterward are not retroactively affected; callers fold the
    /// current `DECSCNM` state into the attrs they pass to writes and
    /// erases themselves.
    pub fn toggle_inverse_all(&mut self) {
        for cell in &mut self.cells {
            cell.attrs.flip_inverse();
        }
        self.mark_dirty_range(0, self.rows);
    }

    // ── Erase operations ────────────────────────────────────────────

    /// ED 0: Erase from cursor to end of display.
    pub fn erase_below(&mut self, row: u16, col: u16, attrs: SgrAttrs) {
        if row >= self.rows {
            return;
        }
        // Erase from cursor to end of current row.
        self.erase_range(row, col, row, self.cols, attrs);
        // Erase all rows below.
        self.erase_range(row + 1, 0, self.rows, 0, attrs);
    }

    /// ED 1: Erase from start of display to cursor (inclusive).
    pub fn erase_above(&mut self, row: u16, col: u16, attrs: SgrAttrs) {
        if row >= self.rows {
            return;
        }
        // Erase all rows above.
        if row > 0 {
            self.erase_range(0, 0, row, 0, attrs);
        }
        // Erase from start of current row through cursor (inclusive).
        let ec = (col + 1).min(self.cols);
        self.erase_range(row, 0, row, ec, attrs);
    }

    /// ED 2: Erase entire display.
    pub fn erase_all(&mut self, attrs: SgrAttrs) {
        for cell in &mut self.cells {
            cell.erase(attrs);
        }
        self.mark_dirty_range(0, self.rows);
    }

    /// EL 0: Erase from cursor to end of line.
    pub fn erase_line_right(&mut self, row: u16, col: u16, attrs: SgrAttrs) {
        self.erase_range(row, col, row, self.cols, attrs);
    }

    /// EL 1: Erase from start of line to cursor (inclusive).
    pub fn erase_line_left(&mut self, row: u16, col: u16, attrs: SgrAttrs) {
        let ec = (col + 1).min(self.cols);
        self.erase_range(row, 0, row, ec, attrs);
    }

    /// EL 2: Erase entire line.
    pub fn erase_line(&mut self, row: u16, attrs: SgrAttrs) {
        self.erase_range(row, 0, row, self.cols, attrs);
    }

    /// ECH: Erase `count` characters starting at `(row, col)`.
    pub fn erase_chars(&mut self, row: u16, col: u16, count: u16, attrs: SgrAttrs) {
        if row >= self.rows || col >= self.cols {
            return;
        }
        let end = (col + count).min(self.cols);
        self.erase_range(row, col, row, end, attrs);
    }

    /// Erase a rectangular region. Single row if `end_row == start_row`,
    /// or full rows if `end_col == 0` for row > start_row.
    fn erase_range(
        &mut self,
        start_row: u16,
        start_col: u16,
        end_row: u16,
        end_col: u16,
        attrs: SgrAttrs,
    ) {
        let sr = start_row.min(self.rows);
        let er = end_row.min(self.rows);

        // Both bounds clamped to self.rows means nothing to erase.
        if sr >= self.rows {
            return;
        }
        self.mark_dirty_range(sr, er.max(sr + 1));

        if sr == er {
            // Single row partial erase.
            let sc = start_col.min(self.cols);
            let ec = end_col.min(self.cols);

            // Wide-char fixup (left): if erasing starts at a continuation
            // cell, its head is outside the range and becomes orphaned.
            if sc > 0 && sc < self.cols {
                let idx = self.index(sr, sc);
                if self.cells[idx].is_wide_continuation() {
                    let head_idx = self.index(sr, sc - 1);
                    self.cells[head_idx].erase(attrs);
                }
            }
            // Wide-char fixup (right): if the cell just past the erased
            // range is a continuation, its head is being erased.
            if ec < self.cols {
                let idx = self.index(sr, ec);
                if self.cells[idx].is_wide_continuation() {
                    self.cells[idx].erase(attrs);
                }
            }

            for c in sc..ec {
                let idx = self.index(sr, c);
                self.cells[idx].erase(attrs);
            }
        } else {
            // First row partial.
            let sc = start_col.min(self.cols);

            // Wide-char fixup (left) for first row.
            if sc > 0 && sc < self.cols {
                let idx = self.index(sr, sc);
                if self.cells[idx].is_wide_continuation() {
                    let head_idx = self.index(sr, sc - 1);
                    self.cells[head_idx].erase(attrs);
                }
            }

            for c in sc..self.cols {
                let idx = self.index(sr, c);
                self.cells[idx].erase(attrs);
            }
            // Full rows in between.
            for r in (sr + 1)..er {
                for c in 0..self.cols {
                    let idx = self.index(r, c);
                    self.cells[idx].erase(attrs);
                }
            }
            // Last row partial (if end_col > 0).
            if end_col > 0 && er < self.rows {
                let ec = end_col.min(self.cols);

                // Wide-char fixup (right) for last row.
                if ec < self.cols {
                    let idx = self.index(er, ec);
                    if self.cells[idx].is_wide_continuation() {
                        self.cells[idx].erase(attrs);
                    }
                }

                for c in 0..ec {
                    let idx = self.index(er, c);
                    self.cells[idx].erase(attrs);
                }
            }
        }
    }

    // ── Fill / clear ────────────────────────────────────────────────

    /// Fill a region of cells with defaults (erase with default bg).
    ///
    /// Coordinates are clamped to grid bounds.
    pub fn clear_region(&mut self, start_row: u16, start_col: u16, end_row: u16, end_col: u16) {
        let sr = start_row.min(self.rows);
        let er = end_row.min(self.rows);
        let sc = start_col.min(self.cols);
        let ec = end_col.min(self.cols);

        for r in sr..er {
            for c in sc..ec {
                let idx = self.index(r, c);
                self.cells[idx] = Cell::default();
            }
        }
        self.mark_dirty_range(sr, er);
    }

    /// Clear the entire grid.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::default();
        }
        self.mark_dirty_range(0, self.rows);
    }

    /// Fill every cell with the given character and default attributes.
    ///
    /// Used by DECALN (Screen Alignment Test) which fills the screen with 'E'.
    pub fn fill_all(&mut self, ch: char) {
        for cell in &mut self.cells {
            *cell = Cell::default();
            cell.set_content(ch, 1);
        }
        self.mark_dirty_range(0, self.rows);
    }

    // ── Insert / delete characters ──────────────────────────────────

    /// ICH: Insert `count` blank cells at `(row, col)`, shifting existing
    /// cells to the right. Cells that shift past the right margin are lost.
    pub fn insert_chars(&mut self, row: u16, col: u16, count: u16, attrs: SgrAttrs) {
        if row >= self.rows || col >= self.cols || count == 0 {
            return;
        }
        self.mark_dirty(row);
        let cols = self.cols as usize;
        let c = col as usize;
        let n = (count as usize).min(cols - c);
        let start = self.index(row, 0);
        let row_slice = &mut self.cells[start..start + cols];

        // Wide-char fixup: if inserting at a continuation cell, the head
        // at col-1 loses its pair and must be erased.
        let was_continuation = row_slice[c].is_wide_continuation();
        if was_continuation && c > 0 {
            row_slice[c - 1].erase(attrs);
        }

        // Shift right: copy from right to left to avoid overlap issues.
        for i in (c + n..cols).rev() {
            row_slice[i] = row_slice[i - n].clone();
        }
        // Blank the inserted positions.
        for cell in &mut row_slice[c..c + n] {
            cell.erase(attrs);
        }

        // Wide-char fixup: the continuation that was at col shifted to
        // col+n; since its head was erased, clean it up.
        if was_continuation && c + n < cols && row_slice[c + n].is_wide_continuation() {
            row_slice[c + n].erase(attrs);
        }

        // Wide-char fixup: if a wide head shifted to the last column,
        // its continuation fell off the right margin.
        if row_slice[cols - 1].is_wide() {
            row_slice[cols - 1].erase(attrs);
        }
    }

    /// DCH: Delete `count` cells at `(row, col)`, shifting remaining cells
    /// left. Blank cells are inserted at the right margin.
    pub fn delete_chars(&mut self, row: u16, col: u16, count: u16, attrs: SgrAttrs) {
        if row >= self.rows || col >= self.cols || count == 0 {
            return;
        }
        self.mark_dirty(row);
        let cols = self.cols as usize;
        let c = col as usize;
        let n = (count as usize).min(cols - c);
        let start = self.index(row, 0);
        let row_slice = &mut self.cells[start..start + cols];

        // Wide-char fixup: if deleting at a continuation cell, the head
        // at col-1 loses its pair and must be erased.
        if row_slice[c].is_wide_continuation() && c > 0 {
            row_slice[c - 1].erase(attrs);
        }

        // Shift left.
        for i in c..cols - n {
            row_slice[i] = row_slice[i + n].clone();
        }
        // Blank the vacated positions at the right.
        for cell in &mut row_slice[cols - n..] {
            cell.erase(attrs);
        }

        // Wide-char fixup: after shift, if cell at col is an orphaned
        // continuation (its head was deleted), clean it up.
        if c < cols && row_slice[c].is_wide_continuation() {
            row_slice[c].erase(attrs);
        }
    }

    // ── Scroll operations ───────────────────────────────────────────

    /// Scroll lines up: remove `count` rows starting at `top`, shift everything
    /// above `bottom` up, and fill the gap at the bottom with blanks.
    ///
    /// `top` and `bottom` define the scroll region (0-indexed, exclusive bottom).
    pub fn scroll_up(&mut self, top: u16, bottom: u16, count: u16, attrs: SgrAttrs) {
        let top = top.min(self.rows);
        let bottom = bottom.min(self.rows);
        if top >= bottom || count == 0 {
            return;
        }
        let count = count.min(bottom - top);
        let cols = self.cols as usize;

        // Shift rows up.
        let src_start = (top + count) as usize * cols;
        let dst_start = top as usize * cols;
        let move_len = (bottom - top - count) as usize * cols;
        self.cells
            .copy_within(src_start..src_start + move_len, dst_start);

        // Blank the vacated rows at the bottom (BCE: inherit cursor bg).
        let blank_start = (bottom - count) as usize * cols;
        let blank_end = bottom as usize * cols;
        for cell in &mut self.cells[blank_start..blank_end] {
            cell.erase(attrs);
        }
        self.mark_dirty_range(top, bottom);
    }

    /// Scroll lines down: insert `count` blank rows at `top`, shifting
    /// everything down and discarding rows that fall past `bottom`.
    pub fn scroll_down(&mut self, top: u16, bottom: u16, count: u16, attrs: SgrAttrs) {
        let top = top.min(self.rows);
        let bottom = bottom.min(self.rows);
        if top >= bottom || count == 0 {
            return;
        }
        let count = count.min(bottom - top);
        let cols = self.cols as usize;

        // Shift rows down.
        let src_start = top as usize * cols;
        let src_len = (bottom - top - count) as usize * cols;
        let dst_start = (top + count) as usize * cols;
        self.cells
            .copy_within(src_start..src_start + src_len, dst_start);

        // Blank the vacated rows at the top (BCE: inherit cursor bg).
        let blank_end = (top + count) as usize * cols;
        for cell in &mut self.cells[top as usize * cols..blank_end] {
            cell.erase(attrs);
        }
        self.mark_dirty_range(top, bottom);
    }

    /// IL: Insert `count` blank lines at `row` within the scroll region
    /// `[top, bottom)`. Lines that fall past `bottom` are discarded.
    pub fn insert_lines(&mut self, row: u16, count: u16, top: u16, bottom: u16, attrs: SgrAttrs) {
        if row < top || row >= bottom {
            return;
        }
        self.scroll_down(row, bottom, count, attrs);
    }

    /// DL: Delete `count` lines at `row` within the scroll region
    /// `[top, bottom)`. Blank lines appear at `bottom - count`.
    pub fn delete_lines(&mut self, row: u16, count: u16, top: u16, bottom: u16, attrs: SgrAttrs) {
        if row < top || row >= bottom {
            return;
        }
        self.scroll_up(row, bottom, count, attrs);
    }

    // ── Wide character handling ──────────────────────────────────────

    /// Write a wide (2-column) character at `(row, col)`.
    ///
    /// Sets the leading cell at `col` and the continuation cell at `col+1`.
    /// If `col+1` is past the right margin, no write occurs.
    /// Also clears any existing wide char that this write would partially
    /// overwrite (the "wide char fixup").
    pub fn write_wide_char(&mut self, row: u16, col: u16, ch: char, attrs: SgrAttrs) {
        if row >= self.rows || col + 1 >= self.cols {
            return;
        }
        self.mark_dirty(row);
        // Fixup: if we're overwriting the continuation of a wide char at col,
        // clear the leading cell at col-1.
        if col > 0 {
            let prev_idx = self.index(row, col - 1);
            if self.cells[prev_idx].is_wide() {
                self.cells[prev_idx].clear();
            }
        }
        // Fixup: if we're overwriting the leading cell of a wide char at col+1,
        // clear the continuation at col+2.
        let next_idx = self.index(row, col + 1);
        if self.cells[next_idx].is_wide() && col + 2 < self.cols {
            let cont_idx = self.index(row, col + 2);
            self.cells[cont_idx].clear();
        }

        let (lead, cont) = Cell::wide(ch, attrs);
        let lead_idx = self.index(row, col);
        self.cells[lead_idx] = lead;
        self.cells[next_idx] = cont;
    }

    /// Write one printable Unicode scalar with terminal-width semantics.
    ///
    /// Returns the written display width:
    /// - `0` for non-spacing marks/format controls (caller should merge into
    ///   the previous cell instead, per the combining-mark rule)
    /// - `1` for narrow cells
    /// - `2` for wide cells
    ///
    /// If a wide character does not fit at `col` (i.e. `col+1 >= cols`), this
    /// method returns `0` and leaves the grid unchanged. Callers are responsible
    /// for wrap policy decisions.
    pub fn write_printable(&mut self, row: u16, col: u16, ch: char, attrs: SgrAttrs) -> u8 {
        if row >= self.rows || col >= self.cols {
            return 0;
        }

        let width = Cell::display_width(ch);
        match width {
            0 => 0,
            1 => {
                self.mark_dirty(row);
                // If we overwrite the continuation of a wide char, clear its head.
                if col > 0 {
                    let prev_idx = self.index(row, col - 1);
                    if self.cells[prev_idx].is_wide() {
                        self.cells[prev_idx].clear();
                    }
                }

                // If the current cell is a wide head, clear its continuation.
                let idx = self.index(row, col);
                if self.cells[idx].is_wide() && col + 1 < self.cols {
                    let cont_idx = self.index(row, col + 1);
                    self.cells[cont_idx].clear();
                }

                if let Some(cell) = self.cell_mut(row, col) {
                    cell.set_content(ch, 1);
                    cell.attrs = attrs;
                }
                1
            }
            _ => {
                if col + 1 >= self.cols {
                    return 0;
                }
                self.write_wide_char(row, col, ch, attrs);
                2
            }
        }
    }

    /// Merge a zero-width combining mark into the cell immediately to the
    /// left of `col` on `row`, if any. No-op if `col == 0`.
    pub fn merge_combining(&mut self, row: u16, col: u16, ch: char) {
        if col == 0 {
            return;
        }
        self.mark_dirty(row);
        if let Some(cell) = self.cell_mut(row, col - 1) {
            cell.push_combining(ch);
        }
    }

    // ── Resize ──────────────────────────────────────────────────────

    /// Resize the grid to new dimensions.
    ///
    /// Content is preserved where possible: rows/columns that fit in the
    /// new dimensions are kept, extras are truncated, new space is blanked.
    /// A no-op if dimensions are unchanged.
    pub fn resize(&mut self, new_cols: u16, new_rows: u16) {
        if new_cols == self.cols && new_rows == self.rows {
            return;
        }
        let mut new_cells = vec![Cell::default(); new_cols as usize * new_rows as usize];
        let copy_rows = self.rows.min(new_rows);
        let copy_cols = self.cols.min(new_cols);

        for r in 0..copy_rows {
            let old_start = (r as usize) * (self.cols as usize);
            let new_start = (r as usize) * (new_cols as usize);
            new_cells[new_start..new_start + copy_cols as usize]
                .clone_from_slice(&self.cells[old_start..old_start + copy_cols as usize]);
        }

        self.cells = new_cells;
        self.cols = new_cols;
        self.rows = new_rows;
        self.dirty = vec![true; new_rows as usize];
    }

    /// Convert (row, col) to flat index.
    #[inline]
    fn index(&self, row: u16, col: u16) -> usize {
        (row as usize) * (self.cols as usize) + (col as usize)
    }
}
