//! Screen: the facade that wires the parser, grid, cursor, modes, and
//! charset state together into one emulated display.
//!
//! `Screen::feed` is the single entry point: it hands bytes to the parser,
//! then applies each resulting [`Action`] to grid/cursor/mode state. No
//! other module reaches into more than one of those pieces at once — this
//! is where that coordination lives.

use crate::cell::{Color, SgrAttrs, SgrFlags};
use crate::charset::{self, Charset, CharsetSlot};
use crate::cursor::Cursor;
use crate::error::ScreenError;
use crate::grid::Grid;
use crate::modes::Modes;
use crate::parser::{Action, EncodingMode, Parser};

/// Scrolling region, 0-indexed, exclusive bottom: rows `top..bottom` are
/// subject to scrolling. `DECSTBM`'s wire format is 1-based inclusive; the
/// conversion happens at the point that action is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Margins {
    top: u16,
    bottom: u16,
}

impl Margins {
    fn full(rows: u16) -> Self {
        Self { top: 0, bottom: rows }
    }
}

/// A headless VT100-VT520 terminal: escape-sequence parsing plus the screen
/// state it drives. Construct with [`Screen::new`], feed it bytes with
/// [`Screen::feed`], and read back the grid with [`Screen::grid`].
pub struct Screen {
    parser: Parser,
    grid: Grid,
    cursor: Cursor,
    modes: Modes,
    margins: Margins,
    /// Window/icon title, as last set by an `OSC 0/1/2` sequence.
    title: String,
    icon_name: String,
    /// `(row, col)` of the last glyph actually written, so a following
    /// zero-width mark or ZWJ-sequence component merges into the right
    /// cell even when that glyph was two columns wide (the naive
    /// `cursor.x - 1` guess lands on the continuation cell instead).
    last_glyph: Option<(u16, u16)>,
    /// Set after consuming a zero-width joiner, so the next glyph — even
    /// one with nonzero width of its own, like the second half of an emoji
    /// ZWJ sequence — merges into `last_glyph` instead of starting a new
    /// cell.
    pending_zwj: bool,
    /// Sink for host-bound responses (`DA`, `DSR`). `None` drops them.
    output: Option<Box<dyn FnMut(&[u8])>>,
    /// Column count in force the last time `DECCOLM` was set, so turning it
    /// back off restores that width instead of assuming 80.
    pre_deccolm_cols: Option<u16>,
}

impl Screen {
    /// Create a screen of the given size. Both dimensions must be nonzero.
    pub fn new(cols: u16, rows: u16) -> Result<Self, ScreenError> {
        if cols == 0 || rows == 0 {
            return Err(ScreenError::ZeroDimension);
        }
        Ok(Self {
            parser: Parser::new(),
            grid: Grid::new(cols, rows),
            cursor: Cursor::new(cols),
            modes: Modes::new(),
            margins: Margins::full(rows),
            title: String::new(),
            icon_name: String::new(),
            last_glyph: None,
            pending_zwj: false,
            output: None,
            pre_deccolm_cols: None,
        })
    }

    /// Register a sink for terminal-to-host responses (`DA`, `DSR`). The
    /// emulator calls this with raw bytes whenever a query demands a
    /// response; without a sink registered, queries are silently dropped.
    pub fn set_output_sink(&mut self, sink: Box<dyn FnMut(&[u8])>) {
        self.output = Some(sink);
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cursor_position(&self) -> (u16, u16) {
        (self.cursor.y, self.cursor.x.min(self.grid.cols().saturating_sub(1)))
    }

    pub fn cursor_visible(&self) -> bool {
        self.modes.cursor_visible() && !self.cursor.hidden
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon_name(&self) -> &str {
        &self.icon_name
    }

    pub fn dirty_rows(&self) -> &[bool] {
        self.grid.dirty_rows()
    }

    pub fn clear_dirty(&mut self) {
        self.grid.clear_dirty();
    }

    /// Tell the parser whether UTF-8 decoding is active upstream (see
    /// [`EncodingMode`]). Embedders that decode UTF-8 before calling
    /// `feed` should leave this at its default.
    pub fn set_encoding(&mut self, encoding: EncodingMode) {
        self.parser.set_encoding(encoding);
    }

    /// Resize the screen. Preserves the top-left region of content, resets
    /// the scrolling region to full-screen, and regenerates default tab
    /// stops for the new width (matching `DECCOLM`'s own reset behaviour).
    pub fn resize(&mut self, cols: u16, rows: u16) -> Result<(), ScreenError> {
        if cols == 0 || rows == 0 {
            return Err(ScreenError::ZeroDimension);
        }
        self.grid.resize(cols, rows);
        self.cursor.retab(cols);
        self.cursor.x = self.cursor.x.min(cols - 1);
        self.cursor.y = self.cursor.y.min(rows - 1);
        self.margins = Margins::full(rows);
        Ok(())
    }

    /// Feed a chunk of text/escape-sequence bytes (already UTF-8 decoded)
    /// through the parser and apply every resulting action.
    pub fn feed(&mut self, input: &str) {
        let actions = self.parser.feed(input);
        for action in actions {
            self.apply(action);
        }
    }

    fn respond(&mut self, bytes: &[u8]) {
        if let Some(sink) = self.output.as_mut() {
            sink(bytes);
        }
    }

    /// Attrs a freshly erased or scrolled-in cell should take: the current
    /// background colour (xterm's background-colour-erase extension) plus
    /// the reverse-video bit if `DECSCNM` is in force.
    fn erase_attrs(&self) -> SgrAttrs {
        let mut attrs = SgrAttrs {
            bg: self.cursor.attrs.bg,
            ..SgrAttrs::default()
        };
        if self.modes.reverse_video() {
            attrs.flags.insert(SgrFlags::INVERSE);
        }
        attrs
    }

    /// `DECSCNM` flips the reverse-video bit on every cell already on the
    /// grid, not just the cursor's attribute prototype — matching real
    /// hardware, where the toggle inverts the actual video signal.
    fn toggle_reverse_video(&mut self) {
        self.cursor.attrs.flip_inverse();
        self.grid.toggle_inverse_all();
    }

    fn apply(&mut self, action: Action) {
        if !matches!(action, Action::Print(_)) {
            // Any non-print action may reposition the cursor or mutate the
            // grid out from under the last glyph's location.
            self.last_glyph = None;
            self.pending_zwj = false;
        }
        match action {
            Action::Print(text) => self.print(&text),
            Action::LineFeed => self.line_feed(),
            Action::CarriageReturn => self.cursor.x = 0,
            Action::Tab => self.cursor.x = self.cursor.next_tab_stop(),
            Action::Backspace => {
                if self.cursor.x > 0 {
                    self.cursor.x -= 1;
                }
            }
            Action::Bell => {}
            Action::Index => self.index(),
            Action::NextLine => {
                self.cursor.x = 0;
                self.index();
            }
            Action::ReverseIndex => self.reverse_index(),
            Action::SaveCursor => self.cursor.save(self.modes.origin_mode()),
            Action::RestoreCursor => {
                if let Some(origin_mode) = self.cursor.restore() {
                    self.modes.set_dec(6, origin_mode);
                }
            }
            Action::FullReset => self.full_reset(),
            Action::SoftReset => self.soft_reset(),
            Action::SetTabStop => self.cursor.set_tab_stop(),
            Action::ClearTabStop(mode) => match mode {
                3 => self.cursor.clear_all_tab_stops(),
                _ => self.cursor.clear_tab_stop(),
            },
            Action::ScreenAlignmentTest => {
                self.margins = Margins::full(self.grid.rows());
                self.grid.fill_all('E');
            }
            Action::CursorUp(n) => self.move_cursor_vertical(-(n as i32)),
            Action::CursorDown(n) => self.move_cursor_vertical(n as i32),
            Action::CursorForward(n) => {
                self.cursor.x = (self.cursor.x + n).min(self.grid.cols() - 1);
            }
            Action::CursorBack(n) => {
                // If a previous draw left the cursor parked one column past
                // the right margin (the pending-wrap sentinel), plain
                // subtraction already collapses that sentinel into the
                // first consumed step: `columns - n` lands one column left
                // of where `n - 1` steps from `columns - 1` would.
                self.cursor.x = self.cursor.x.saturating_sub(n);
            }
            Action::CursorNextLine(n) => {
                self.cursor.x = 0;
                self.move_cursor_vertical(n as i32);
            }
            Action::CursorPrevLine(n) => {
                self.cursor.x = 0;
                self.move_cursor_vertical(-(n as i32));
            }
            Action::CursorHorizontalAbsolute(col) => {
                self.cursor.x = col.saturating_sub(1).min(self.grid.cols() - 1);
            }
            Action::CursorPosition(row, col) => self.set_cursor_position(row, col),
            Action::SetScrollRegion(top, bottom) => self.set_scroll_region(top, bottom),
            Action::ScrollUp(n) => {
                let attrs = self.erase_attrs();
                self.grid
                    .scroll_up(self.margins.top, self.margins.bottom, n, attrs);
            }
            Action::ScrollDown(n) => {
                let attrs = self.erase_attrs();
                self.grid
                    .scroll_down(self.margins.top, self.margins.bottom, n, attrs);
            }
            Action::InsertLines(n) => {
                let attrs = self.erase_attrs();
                self.grid.insert_lines(
                    self.cursor.y,
                    n,
                    self.margins.top,
                    self.margins.bottom,
                    attrs,
                );
            }
            Action::DeleteLines(n) => {
                let attrs = self.erase_attrs();
                self.grid.delete_lines(
                    self.cursor.y,
                    n,
                    self.margins.top,
                    self.margins.bottom,
                    attrs,
                );
            }
            Action::InsertCharacters(n) => {
                let attrs = self.erase_attrs();
                self.grid
                    .insert_chars(self.cursor.y, self.cursor.x, n, attrs);
            }
            Action::DeleteCharacters(n) => {
                let attrs = self.erase_attrs();
                self.grid
                    .delete_chars(self.cursor.y, self.cursor.x, n, attrs);
            }
            Action::EraseCharacters(n) => {
                let attrs = self.erase_attrs();
                self.grid
                    .erase_chars(self.cursor.y, self.cursor.x, n, attrs);
            }
            Action::EraseInDisplay(mode) => self.erase_in_display(mode),
            Action::EraseInLine(mode) => self.erase_in_line(mode),
            Action::SelectGraphicRendition(params) => self.select_graphic_rendition(&params),
            Action::SetMode { params, private } => self.set_modes(&params, private, true),
            Action::ResetMode { params, private } => self.set_modes(&params, private, false),
            Action::DeviceAttributes { private } => self.device_attributes(private),
            Action::DeviceStatusReport(code) => self.device_status_report(code),
            Action::DesignateCharset(slot, charset) => self.cursor.designate(slot, charset),
            Action::ShiftIn => self.cursor.shift_in(),
            Action::ShiftOut => self.cursor.shift_out(),
            Action::SingleShift2 => self.cursor.single_shift(CharsetSlot::G1),
            Action::SingleShift3 => self.cursor.single_shift(CharsetSlot::G1),
            Action::SetIconNameAndTitle(text) => {
                self.title = text.clone();
                self.icon_name = text;
            }
            Action::SetIconName(text) => self.icon_name = text,
            Action::SetTitle(text) => self.title = text,
        }
    }

    // ── Printing and line motion ────────────────────────────────────

    fn print(&mut self, text: &str) {
        for ch in text.chars() {
            self.print_one(ch);
        }
    }

    fn print_one(&mut self, ch: char) {
        let ch = charset::translate(ch, self.cursor.effective_charset());

        if self.pending_zwj {
            // The glyph following a ZWJ continues the same cluster
            // regardless of its own width — it never advances the cursor.
            self.pending_zwj = false;
            if let Some((row, col)) = self.last_glyph {
                self.grid.merge_combining(row, col + 1, ch);
            }
            if ch == '\u{200D}' {
                self.pending_zwj = true;
            }
            return;
        }

        if ch == '\u{200D}' {
            if let Some((row, col)) = self.last_glyph {
                self.grid.merge_combining(row, col + 1, ch);
            }
            self.pending_zwj = true;
            return;
        }

        let width = crate::cell::Cell::display_width(ch);

        if width == 0 {
            // Combining mark: merge into the last glyph actually written,
            // wherever it landed (may be one or two columns back,
            // depending on its width).
            if let Some((row, col)) = self.last_glyph {
                self.grid.merge_combining(row, col + 1, ch);
            } else {
                let col = self.cursor.x.min(self.grid.cols() - 1);
                self.grid.merge_combining(self.cursor.y, col, ch);
            }
            return;
        }

        if self.cursor.pending_wrap() {
            if self.modes.autowrap() {
                self.cursor.x = 0;
                self.index();
            } else {
                self.cursor.x = self.grid.cols() - width;
            }
        }

        if width == 2 && self.cursor.x + 1 >= self.grid.cols() {
            // Wide char doesn't fit: wrap it whole to the next line instead
            // of splitting it across the margin.
            if self.modes.autowrap() {
                self.cursor.x = 0;
                self.index();
            } else {
                return;
            }
        }

        if self.modes.insert_mode() {
            let attrs = self.erase_attrs();
            self.grid
                .insert_chars(self.cursor.y, self.cursor.x, width as u16, attrs);
        }

        self.grid
            .write_printable(self.cursor.y, self.cursor.x, ch, self.cursor.attrs);
        self.last_glyph = Some((self.cursor.y, self.cursor.x));
        self.cursor.x += width as u16;
    }

    /// `IND`: move down one line, scrolling the region if already at its
    /// bottom edge.
    fn index(&mut self) {
        if self.cursor.y + 1 >= self.margins.bottom {
            let attrs = self.erase_attrs();
            self.grid
                .scroll_up(self.margins.top, self.margins.bottom, 1, attrs);
        } else {
            self.cursor.y += 1;
        }
    }

    /// `RI`: move up one line, scrolling the region if already at its top
    /// edge.
    fn reverse_index(&mut self) {
        if self.cursor.y <= self.margins.top {
            let attrs = self.erase_attrs();
            self.grid
                .scroll_down(self.margins.top, self.margins.bottom, 1, attrs);
        } else {
            self.cursor.y -= 1;
        }
    }

    fn line_feed(&mut self) {
        self.index();
        if self.modes.linefeed_newline() {
            self.cursor.x = 0;
        }
    }

    /// Cursor-relative vertical motions (`CUU`/`CUD`/`CNL`/`CPL`) clamp to
    /// the scrolling region only when the cursor is already inside it;
    /// parked outside the region (e.g. on a margin line), they clamp to the
    /// full screen instead.
    fn move_cursor_vertical(&mut self, delta: i32) {
        let in_region = self.cursor.y >= self.margins.top && self.cursor.y < self.margins.bottom;
        let (lo, hi) = if in_region {
            (self.margins.top as i32, self.margins.bottom as i32 - 1)
        } else {
            (0, self.grid.rows() as i32 - 1)
        };
        let y = self.cursor.y as i32 + delta;
        self.cursor.y = y.clamp(lo, hi) as u16;
    }

    /// `CUP`/`HVP`: absolute position, 1-based. In origin mode the
    /// coordinates are relative to the scrolling region.
    fn set_cursor_position(&mut self, row: u16, col: u16) {
        let (row_base, row_max) = if self.modes.origin_mode() {
            (self.margins.top, self.margins.bottom)
        } else {
            (0, self.grid.rows())
        };
        self.cursor.y = (row_base + row.saturating_sub(1)).min(row_max.saturating_sub(1));
        self.cursor.x = col.saturating_sub(1).min(self.grid.cols() - 1);
    }

    fn set_scroll_region(&mut self, top: Option<u16>, bottom: Option<u16>) {
        let rows = self.grid.rows();
        let top0 = top.map(|t| t.saturating_sub(1)).unwrap_or(0);
        let bottom0 = bottom.unwrap_or(rows).min(rows);
        if top0 >= bottom0 {
            return;
        }
        self.margins = Margins {
            top: top0,
            bottom: bottom0,
        };
        self.cursor.y = self.margins.top;
        self.cursor.x = 0;
    }

    // ── Erase ─────────────────────────────────────────────────────

    fn erase_in_display(&mut self, mode: u16) {
        let attrs = self.erase_attrs();
        match mode {
            0 => self.grid.erase_below(self.cursor.y, self.cursor.x, attrs),
            1 => self.grid.erase_above(self.cursor.y, self.cursor.x, attrs),
            2 | 3 => self.grid.erase_all(attrs),
            _ => {
                tracing::debug!(mode, "dropped unrecognized EraseInDisplay parameter");
            }
        }
    }

    fn erase_in_line(&mut self, mode: u16) {
        let attrs = self.erase_attrs();
        match mode {
            0 => self.grid.erase_line_right(self.cursor.y, self.cursor.x, attrs),
            1 => self.grid.erase_line_left(self.cursor.y, self.cursor.x, attrs),
            2 => self.grid.erase_line(self.cursor.y, attrs),
            _ => {
                tracing::debug!(mode, "dropped unrecognized EraseInLine parameter");
            }
        }
    }

    // ── SGR ───────────────────────────────────────────────────────

    fn select_graphic_rendition(&mut self, params: &[u16]) {
        if params.is_empty() {
            self.cursor.attrs.reset();
            return;
        }
        let mut i = 0;
        while i < params.len() {
            let p = params[i];
            match p {
                // `0` resets only when it's the sole parameter or the last one
                // in the run; mixed with other non-zero params anywhere before
                // the end, it's ignored rather than acted on.
                0 => {
                    if i == params.len() - 1 {
                        self.cursor.attrs.reset();
                    }
                }
                1 => self.cursor.attrs.flags.insert(SgrFlags::BOLD),
                3 => self.cursor.attrs.flags.insert(SgrFlags::ITALIC),
                4 => self.cursor.attrs.flags.insert(SgrFlags::UNDERLINE),
                5 | 6 => self.cursor.attrs.flags.insert(SgrFlags::BLINK),
                7 => self.cursor.attrs.flags.insert(SgrFlags::INVERSE),
                9 => self.cursor.attrs.flags.insert(SgrFlags::STRIKETHROUGH),
                22 => self.cursor.attrs.flags.remove(SgrFlags::BOLD),
                23 => self.cursor.attrs.flags.remove(SgrFlags::ITALIC),
                24 => self.cursor.attrs.flags.remove(SgrFlags::UNDERLINE),
                25 => self.cursor.attrs.flags.remove(SgrFlags::BLINK),
                27 => self.cursor.attrs.flags.remove(SgrFlags::INVERSE),
                29 => self.cursor.attrs.flags.remove(SgrFlags::STRIKETHROUGH),
                30..=37 => self.cursor.attrs.fg = Color::Named((p - 30) as u8),
                39 => self.cursor.attrs.fg = Color::Default,
                40..=47 => self.cursor.attrs.bg = Color::Named((p - 40) as u8),
                49 => self.cursor.attrs.bg = Color::Default,
                90..=97 => self.cursor.attrs.fg = Color::Named((p - 90 + 8) as u8),
                100..=107 => self.cursor.attrs.bg = Color::Named((p - 100 + 8) as u8),
                38 | 48 => {
                    let target = p;
                    match parse_extended_color(&params[i + 1..]) {
                        Some((consumed, color)) => {
                            if target == 38 {
                                self.cursor.attrs.fg = color;
                            } else {
                                self.cursor.attrs.bg = color;
                            }
                            i += consumed;
                        }
                        None => {
                            // Skip just the malformed 38/48 introducer; later
                            // params in the same run still apply.
                            tracing::debug!(param = p, "dropped malformed extended SGR color");
                        }
                    }
                }
                other => {
                    tracing::debug!(param = other, "dropped unrecognized SGR parameter");
                }
            }
            i += 1;
        }
    }

    // ── Modes ─────────────────────────────────────────────────────

    fn set_modes(&mut self, params: &[u16], private: bool, value: bool) {
        for &p in params {
            if private {
                match p {
                    5 => {
                        let was = self.modes.reverse_video();
                        self.modes.set_dec(5, value);
                        if self.modes.reverse_video() != was {
                            self.toggle_reverse_video();
                        }
                    }
                    25 => {
                        self.modes.set_dec(25, value);
                        self.cursor.hidden = !value;
                    }
                    6 => {
                        self.modes.set_dec(6, value);
                        // DECOM takes effect immediately: home the cursor.
                        self.cursor.x = 0;
                        self.cursor.y = if value { self.margins.top } else { 0 };
                    }
                    _ => {
                        if self.modes.set_dec(p, value) {
                            self.handle_deccolm(value);
                        }
                    }
                }
            } else {
                self.modes.set_ansi(p, value);
            }
        }
    }

    /// `DECCOLM`: switching 80/132-column mode clears the screen and resets
    /// the scrolling region and cursor, matching physical hardware (the
    /// resize is disruptive enough that partial content can't be kept).
    /// Turning it back off restores the column count that was in force
    /// before it was last set, rather than assuming 80.
    fn handle_deccolm(&mut self, wide: bool) {
        let rows = self.grid.rows();
        let cols = if wide {
            self.pre_deccolm_cols.get_or_insert(self.grid.cols());
            132
        } else {
            self.pre_deccolm_cols.take().unwrap_or_else(|| self.grid.cols())
        };
        self.grid.resize(cols, rows);
        self.cursor.retab(cols);
        self.cursor.x = 0;
        self.cursor.y = 0;
        self.margins = Margins::full(rows);
        let attrs = self.erase_attrs();
        self.grid.erase_all(attrs);
    }

    // ── Reset ─────────────────────────────────────────────────────

    /// `RIS`: full reset. Clears the grid, resets modes/cursor/margins/
    /// charsets/title to power-on defaults.
    fn full_reset(&mut self) {
        let cols = self.grid.cols();
        let rows = self.grid.rows();
        self.grid = Grid::new(cols, rows);
        self.cursor = Cursor::new(cols);
        self.modes.reset();
        self.margins = Margins::full(rows);
        self.title.clear();
        self.icon_name.clear();
        self.pre_deccolm_cols = None;
    }

    /// `DECSTR`: soft reset. Narrower than `RIS` — leaves grid contents,
    /// title, and cursor position untouched; resets modes, margins, and
    /// the cursor's pending attributes/charset designation.
    fn soft_reset(&mut self) {
        let had_origin_mode = self.modes.origin_mode();
        let was_reverse = self.modes.reverse_video();
        self.modes.reset();
        if had_origin_mode {
            self.modes.set_dec(6, true);
        }
        if self.modes.reverse_video() != was_reverse {
            self.toggle_reverse_video();
        }
        self.margins = Margins::full(self.grid.rows());
        self.cursor.attrs = SgrAttrs::default();
        self.cursor.hidden = false;
        self.cursor.designate(CharsetSlot::G0, Charset::Ascii);
        self.cursor.designate(CharsetSlot::G1, Charset::Ascii);
        self.pre_deccolm_cols = None;
    }

    // ── Device queries ────────────────────────────────────────────

    /// `DA`: identify as a VT220-class device. A private-marker request
    /// (`CSI ? c`, `DA2`) has no defined reply in this engine's scope and
    /// is ignored outright — responding to it is what feeds the infamous
    /// Vim/Emacs `DA` response loop.
    fn device_attributes(&mut self, private: bool) {
        if private {
            return;
        }
        self.respond(b"\x1b[?62;1;6c");
    }

    /// `DSR`: device status report. `5` asks "are you OK" (reply: OK);
    /// `6` asks for cursor position (reply: 1-based row/col).
    fn device_status_report(&mut self, code: u16) {
        match code {
            5 => self.respond(b"\x1b[0n"),
            6 => {
                let row = self.cursor.y + 1;
                let col = self.cursor.x.min(self.grid.cols() - 1) + 1;
                self.respond(format!("\x1b[{row};{col}R").as_bytes());
            }
            _ => {
                tracing::debug!(code, "dropped unrecognized DeviceStatusReport code");
            }
        }
    }
}

/// Parse an extended SGR color (`38`/`48` continuation): either
/// `5;index` (256-color) or `2;r;g;b` (RGB). Returns the number of extra
/// params consumed (not counting the leading `38`/`48` itself) and the
/// resulting color, or `None` if the sequence is malformed.
fn parse_extended_color(rest: &[u16]) -> Option<(usize, Color)> {
    match rest.first()? {
        5 => {
            let idx = *rest.get(1)?;
            Some((2, Color::Indexed(idx as u8)))
        }
        2 => {
            let r = *rest.get(1)?;
            let g = *rest.get(2)?;
            let b = *rest.get(3)?;
            Some((4, Color::Rgb(r as u8, g as u8, b as u8)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn cell_text(s: &Screen, row: u16, col: u16) -> String {
        s.grid().cell(row, col).unwrap().content().to_string()
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert_eq!(Screen::new(0, 24).unwrap_err(), ScreenError::ZeroDimension);
        assert_eq!(Screen::new(80, 0).unwrap_err(), ScreenError::ZeroDimension);
    }

    #[test]
    fn plain_text_advances_cursor() {
        let mut s = Screen::new(10, 5).unwrap();
        s.feed("hi");
        assert_eq!(cell_text(&s, 0, 0), "h");
        assert_eq!(cell_text(&s, 0, 1), "i");
        assert_eq!(s.cursor_position(), (0, 2));
    }

    #[test]
    fn autowrap_moves_to_next_line() {
        let mut s = Screen::new(3, 3).unwrap();
        s.feed("abcd");
        assert_eq!(cell_text(&s, 0, 0), "a");
        assert_eq!(cell_text(&s, 0, 2), "c");
        assert_eq!(cell_text(&s, 1, 0), "d");
        assert_eq!(s.cursor_position(), (1, 1));
    }

    #[test]
    fn autowrap_disabled_clamps_at_margin() {
        let mut s = Screen::new(3, 3).unwrap();
        s.feed("\x1b[?7l");
        s.feed("abcd");
        assert_eq!(cell_text(&s, 0, 2), "d");
        assert_eq!(s.cursor_position(), (0, 2));
    }

    #[test]
    fn linefeed_scrolls_at_bottom_margin() {
        let mut s = Screen::new(3, 2).unwrap();
        s.feed("ab\r\ncd\r\nef");
        assert_eq!(cell_text(&s, 0, 0), "c");
        assert_eq!(cell_text(&s, 1, 0), "e");
    }

    #[test]
    fn cup_sets_absolute_position() {
        let mut s = Screen::new(80, 24).unwrap();
        s.feed("\x1b[5;10H");
        assert_eq!(s.cursor_position(), (4, 9));
    }

    #[test]
    fn origin_mode_positions_relative_to_scroll_region() {
        let mut s = Screen::new(80, 24).unwrap();
        s.feed("\x1b[5;20r"); // region rows 5..20 (1-based inclusive)
        s.feed("\x1b[?6h"); // DECOM
        s.feed("\x1b[1;1H");
        assert_eq!(s.cursor_position(), (4, 0));
    }

    #[test]
    fn scroll_region_restricts_index_scrolling() {
        let mut s = Screen::new(3, 5).unwrap();
        s.feed("\x1b[2;4r"); // rows 2..4 (1-based inclusive) => 0-based 1..4
        for r in 0..5u16 {
            s.feed(&format!("\x1b[{};1H{}", r + 1, (b'A' + r as u8) as char));
        }
        // Scroll up once within the region: rows 1..4 (0-based) shift.
        s.feed("\x1b[2;1H\x1b[S");
        assert_eq!(cell_text(&s, 0, 0), "A"); // untouched, outside region
        assert_eq!(cell_text(&s, 1, 0), "C"); // region shifted up
        assert_eq!(cell_text(&s, 4, 0), "E"); // untouched, outside region
    }

    #[test]
    fn sgr_bold_and_color() {
        let mut s = Screen::new(10, 2).unwrap();
        s.feed("\x1b[1;31mX");
        let cell = s.grid().cell(0, 0).unwrap();
        assert!(cell.attrs.flags.contains(SgrFlags::BOLD));
        assert_eq!(cell.attrs.fg, Color::Named(1));
    }

    #[test]
    fn sgr_reset_clears_attrs() {
        let mut s = Screen::new(10, 2).unwrap();
        s.feed("\x1b[1;31m\x1b[0mX");
        let cell = s.grid().cell(0, 0).unwrap();
        assert_eq!(cell.attrs, SgrAttrs::default());
    }

    #[test]
    fn sgr_256_color() {
        let mut s = Screen::new(10, 2).unwrap();
        s.feed("\x1b[38;5;200mX");
        assert_eq!(s.grid().cell(0, 0).unwrap().attrs.fg, Color::Indexed(200));
    }

    #[test]
    fn sgr_malformed_extended_color_does_not_swallow_later_params() {
        let mut s = Screen::new(10, 2).unwrap();
        // `38` with an unrecognized selector (not 5 or 2) is malformed and
        // skipped, but the following `1` (bold) must still apply.
        s.feed("\x1b[38;200;1mX");
        let cell = s.grid().cell(0, 0).unwrap();
        assert!(cell.attrs.flags.contains(SgrFlags::BOLD));
    }

    #[test]
    fn sgr_embedded_zero_is_ignored_not_applied_in_place() {
        let mut s = Screen::new(10, 2).unwrap();
        // The `0` sits between two other params, so it's ignored entirely —
        // bold must survive, unlike a reset applied at that position would.
        s.feed("\x1b[1;0;31mX");
        let cell = s.grid().cell(0, 0).unwrap();
        assert!(cell.attrs.flags.contains(SgrFlags::BOLD));
        assert_eq!(cell.attrs.fg, Color::Named(1));
    }

    #[test]
    fn sgr_rgb_color() {
        let mut s = Screen::new(10, 2).unwrap();
        s.feed("\x1b[48;2;10;20;30mX");
        assert_eq!(
            s.grid().cell(0, 0).unwrap().attrs.bg,
            Color::Rgb(10, 20, 30)
        );
    }

    #[test]
    fn insert_mode_shifts_existing_text_right() {
        let mut s = Screen::new(10, 2).unwrap();
        s.feed("abc\x1b[1;1H\x1b[4h X");
        assert_eq!(cell_text(&s, 0, 0), "X");
        assert_eq!(cell_text(&s, 0, 1), "a");
    }

    #[test]
    fn erase_in_display_2_clears_whole_screen() {
        let mut s = Screen::new(5, 2).unwrap();
        s.feed("abcde\r\nfghij");
        s.feed("\x1b[2J");
        for r in 0..2u16 {
            for c in 0..5u16 {
                assert_eq!(cell_text(&s, r, c), " ");
            }
        }
    }

    #[test]
    fn device_status_report_cursor_position() {
        let mut s = Screen::new(80, 24).unwrap();
        let received = Rc::new(RefCell::new(Vec::new()));
        let received_clone = received.clone();
        s.set_output_sink(Box::new(move |bytes| {
            received_clone.borrow_mut().extend_from_slice(bytes);
        }));
        s.feed("\x1b[3;4H");
        s.feed("\x1b[6n");
        assert_eq!(&*received.borrow(), b"\x1b[3;4R");
    }

    #[test]
    fn device_attributes_response() {
        let mut s = Screen::new(80, 24).unwrap();
        let received = Rc::new(RefCell::new(Vec::new()));
        let received_clone = received.clone();
        s.set_output_sink(Box::new(move |bytes| {
            received_clone.borrow_mut().extend_from_slice(bytes);
        }));
        s.feed("\x1b[c");
        assert_eq!(&*received.borrow(), b"\x1b[?62;1;6c");
    }

    #[test]
    fn private_device_attributes_request_is_ignored() {
        let mut s = Screen::new(80, 24).unwrap();
        let received = Rc::new(RefCell::new(Vec::new()));
        let received_clone = received.clone();
        s.set_output_sink(Box::new(move |bytes| {
            received_clone.borrow_mut().extend_from_slice(bytes);
        }));
        s.feed("\x1b[?c");
        assert!(received.borrow().is_empty());
    }

    #[test]
    fn full_reset_clears_everything() {
        let mut s = Screen::new(5, 3).unwrap();
        s.feed("\x1b[1;31mabc");
        s.feed("\x1bc");
        assert_eq!(cell_text(&s, 0, 0), " ");
        assert_eq!(s.cursor_position(), (0, 0));
        assert_eq!(s.grid().cell(0, 0).unwrap().attrs, SgrAttrs::default());
    }

    #[test]
    fn soft_reset_preserves_grid_content_and_cursor_position() {
        let mut s = Screen::new(5, 3).unwrap();
        s.feed("\x1b[1;31mabc");
        s.feed("\x1b[!p");
        assert_eq!(cell_text(&s, 0, 0), "a");
        assert_eq!(s.cursor_position(), (0, 3));
        // But pending attributes are reset.
        s.feed("d");
        assert_eq!(s.grid().cell(0, 3).unwrap().attrs, SgrAttrs::default());
    }

    #[test]
    fn soft_reset_leaves_origin_mode_untouched() {
        let mut s = Screen::new(10, 10).unwrap();
        s.feed("\x1b[?6h"); // DECOM on
        s.feed("\x1b[!p"); // DECSTR: margins reset to full-screen, DECOM survives
        s.feed("\x1b[2;6r"); // new region, rows 1..6 (0-based)
        s.feed("\x1b[1;1H"); // CUP home — origin mode still active
        assert_eq!(s.cursor_position(), (1, 0));
    }

    #[test]
    fn deccolm_resize_clears_and_resets_region() {
        let mut s = Screen::new(80, 24).unwrap();
        s.feed("\x1b[2;10rhello");
        s.feed("\x1b[?3h"); // DECCOLM set: 132 columns
        assert_eq!(s.grid().cols(), 132);
        assert_eq!(cell_text(&s, 0, 0), " ");
        s.feed("\x1b[24;1H\x1b[S"); // scroll at the old bottom margin row
        assert_eq!(cell_text(&s, 0, 0), " "); // region is full-screen again
    }

    #[test]
    fn deccolm_reset_restores_the_width_before_it_was_set() {
        let mut s = Screen::new(20, 10).unwrap();
        s.feed("\x1b[?3h"); // DECCOLM set: 132 columns
        assert_eq!(s.grid().cols(), 132);
        s.feed("\x1b[?3l"); // DECCOLM reset: back to the original 20, not 80
        assert_eq!(s.grid().cols(), 20);
    }

    #[test]
    fn set_title_via_osc() {
        let mut s = Screen::new(20, 5).unwrap();
        s.feed("\x1b]2;my title\x07");
        assert_eq!(s.title(), "my title");
    }

    #[test]
    fn combining_mark_merges_into_previous_cell() {
        let mut s = Screen::new(10, 2).unwrap();
        s.feed("e\u{0301}");
        assert_eq!(cell_text(&s, 0, 0), "e\u{0301}");
        assert_eq!(s.cursor_position(), (0, 1));
    }

    #[test]
    fn zwj_sequence_after_a_wide_glyph_merges_into_the_leading_cell() {
        // Family emoji built from man + ZWJ + woman, preceded by an ASCII
        // character so the wide glyph doesn't start at column 0.
        let mut s = Screen::new(10, 2).unwrap();
        s.feed("A\u{1F468}\u{200D}\u{1F469}");
        assert_eq!(cell_text(&s, 0, 0), "A");
        assert_eq!(
            cell_text(&s, 0, 1),
            "\u{1F468}\u{200D}\u{1F469}"
        );
        assert!(s.grid().cell(0, 1).unwrap().is_wide());
        assert!(s.grid().cell(0, 2).unwrap().is_wide_continuation());
        assert_eq!(s.cursor_position(), (0, 3));
    }

    #[test]
    fn wide_char_that_does_not_fit_wraps_whole() {
        let mut s = Screen::new(4, 2).unwrap();
        s.feed("abc\u{4E2D}");
        assert_eq!(cell_text(&s, 0, 2), "c");
        assert_eq!(cell_text(&s, 1, 0), "中");
    }

    #[test]
    fn resize_preserves_top_left_and_resets_region() {
        let mut s = Screen::new(5, 3).unwrap();
        s.feed("\x1b[1;2rabc");
        s.resize(10, 5).unwrap();
        assert_eq!(cell_text(&s, 0, 0), "a");
        s.feed("\x1b[5;1H\x1b[S");
        assert_eq!(cell_text(&s, 0, 0), " "); // region now full-screen, row 0 scrolled
    }

    #[test]
    fn dec_special_graphics_charset_translates_printables() {
        let mut s = Screen::new(10, 2).unwrap();
        s.set_encoding(EncodingMode::Other);
        s.feed("\x1b)0\x0ex");
        assert_eq!(cell_text(&s, 0, 0), "│");
    }

    #[test]
    fn decscnm_toggle_flips_existing_cells_and_cursor_prototype() {
        let mut s = Screen::new(5, 2).unwrap();
        s.feed("ab");
        s.feed("\x1b[?5h"); // DECSCNM on
        assert!(s.grid().cell(0, 0).unwrap().attrs.flags.contains(SgrFlags::INVERSE));
        assert!(s.grid().cell(0, 1).unwrap().attrs.flags.contains(SgrFlags::INVERSE));
        // New text drawn while DECSCNM is active also comes out reversed.
        s.feed("c");
        assert!(s.grid().cell(0, 2).unwrap().attrs.flags.contains(SgrFlags::INVERSE));
        s.feed("\x1b[?5l"); // DECSCNM off: flips back
        assert!(!s.grid().cell(0, 0).unwrap().attrs.flags.contains(SgrFlags::INVERSE));
        assert!(!s.grid().cell(0, 2).unwrap().attrs.flags.contains(SgrFlags::INVERSE));
    }

    #[test]
    fn decscnm_erase_carries_reverse_video() {
        let mut s = Screen::new(5, 2).unwrap();
        s.feed("\x1b[?5h"); // DECSCNM on
        s.feed("\x1b[2J"); // ED 2: whole screen
        assert!(s.grid().cell(0, 0).unwrap().attrs.flags.contains(SgrFlags::INVERSE));
    }

    #[test]
    fn dectcem_reset_hides_cursor_and_syncs_cursor_hidden_field() {
        let mut s = Screen::new(10, 2).unwrap();
        assert!(s.cursor_visible());
        s.feed("\x1b[?25l");
        assert!(!s.cursor_visible());
        s.feed("\x1b[?25h");
        assert!(s.cursor_visible());
    }

    #[test]
    fn cursor_up_inside_region_clamps_to_region_top() {
        let mut s = Screen::new(5, 10).unwrap();
        s.feed("\x1b[3;7r"); // region rows 3..7 (1-based inclusive) => 0-based 2..7
        s.feed("\x1b[4;1H"); // row 3 (0-based), inside the region
        s.feed("\x1b[10A"); // try to move up 10 — should clamp to region top
        assert_eq!(s.cursor_position().0, 2);
    }

    #[test]
    fn cursor_up_outside_region_clamps_to_screen_top() {
        let mut s = Screen::new(5, 10).unwrap();
        s.feed("\x1b[3;7r"); // region rows 3..7 (1-based inclusive) => 0-based 2..7
        s.feed("\x1b[1;1H"); // row 0, above the region
        s.feed("\x1b[10A"); // clamps to the full screen, not the region
        assert_eq!(s.cursor_position().0, 0);
    }

    #[test]
    fn cursor_back_from_pending_wrap_sentinel_is_one_effective_step() {
        let mut s = Screen::new(5, 2).unwrap();
        s.feed("abcde"); // cursor now parked at the pending-wrap sentinel (col 5)
        s.feed("\x1b[1D"); // CUB 1
        assert_eq!(s.cursor_position(), (0, 4));
    }

    #[test]
    fn reset_then_feed_equals_fresh_screen() {
        let mut a = Screen::new(10, 3).unwrap();
        a.feed("\x1b[1;31mhello\x1b[2;5r");
        a.feed("\x1bc");
        a.feed("world");

        let mut b = Screen::new(10, 3).unwrap();
        b.feed("world");

        assert_eq!(cell_text(&a, 0, 0), cell_text(&b, 0, 0));
        assert_eq!(a.cursor_position(), b.cursor_position());
        assert_eq!(
            a.grid().cell(0, 0).unwrap().attrs,
            b.grid().cell(0, 0).unwrap().attrs
        );
    }
}
