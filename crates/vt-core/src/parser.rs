//! VT/ANSI parser: the Paul Flo Williams VT500-series state machine.
//!
//! Converts an incoming code-point stream into a sequence of [`Action`]s for
//! the screen to apply. The parser holds no reference to grid state and
//! never calls back into the screen; it is a pure byte-to-event translator
//! that is re-entrant across `feed` calls, so a partial escape sequence
//! split across two reads resumes correctly.
//!
//! DCS/SOS/PM/APC payloads are consumed but never dispatched (per the
//! screen's scope), so this parser collapses their entry/param/intermediate/
//! passthrough sub-phases into one discard-until-terminator state; only CSI
//! and OSC need the finer-grained phases, since only they produce actions.

use crate::charset::{Charset, CharsetSlot};

const MAX_PARAMS: usize = 16;

/// Parser output actions. One value per completed dispatch; `Print` batches
/// the longest run of plain text between control bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A run of printable text (the parser's fast path).
    Print(String),
    /// `LF`/`VT`/`FF` (0x0A/0x0B/0x0C): line feed.
    LineFeed,
    /// `CR` (0x0D): carriage return.
    CarriageReturn,
    /// `HT` (0x09): horizontal tab.
    Tab,
    /// `BS` (0x08): backspace.
    Backspace,
    /// `BEL` (0x07): bell.
    Bell,
    /// `IND` (`ESC D`): index — linefeed without carriage return.
    Index,
    /// `NEL` (`ESC E`): next line — carriage return then linefeed.
    NextLine,
    /// `RI` (`ESC M`): reverse index.
    ReverseIndex,
    /// `DECSC` (`ESC 7`): save cursor.
    SaveCursor,
    /// `DECRC` (`ESC 8`): restore cursor.
    RestoreCursor,
    /// `RIS` (`ESC c`): full reset.
    FullReset,
    /// `DECSTR` (`CSI ! p`): soft reset.
    SoftReset,
    /// `HTS` (`ESC H`): set a tab stop at the current column.
    SetTabStop,
    /// `TBC` (`CSI Ps g`): clear tab stop(s). `0` clears the current
    /// column, `3` clears all.
    ClearTabStop(u16),
    /// `DECALN` (`ESC # 8`): screen alignment test — fill with `E`.
    ScreenAlignmentTest,
    CursorUp(u16),
    CursorDown(u16),
    CursorForward(u16),
    CursorBack(u16),
    CursorNextLine(u16),
    CursorPrevLine(u16),
    /// `CHA`: cursor horizontal absolute (1-based column).
    CursorHorizontalAbsolute(u16),
    /// `CUP`/`HVP`: absolute cursor position, 1-based `(row, col)`.
    CursorPosition(u16, u16),
    /// `DECSTBM`: set scrolling region, 1-based inclusive `(top, bottom)`.
    /// `None` fields mean "unset" (defaults to the screen edge).
    SetScrollRegion(Option<u16>, Option<u16>),
    /// `SU`: scroll the region up by `n`.
    ScrollUp(u16),
    /// `SD`: scroll the region down by `n`.
    ScrollDown(u16),
    /// `IL`: insert `n` blank lines at the cursor row.
    InsertLines(u16),
    /// `DL`: delete `n` lines at the cursor row.
    DeleteLines(u16),
    /// `ICH`: insert `n` blank characters at the cursor column.
    InsertCharacters(u16),
    /// `DCH`: delete `n` characters at the cursor column.
    DeleteCharacters(u16),
    /// `ECH`: erase `n` characters at the cursor column in place.
    EraseCharacters(u16),
    /// `ED`: erase in display, mode 0/1/2/3.
    EraseInDisplay(u16),
    /// `EL`: erase in line, mode 0/1/2.
    EraseInLine(u16),
    /// `SGR`: select graphic rendition.
    SelectGraphicRendition(Vec<u16>),
    /// `SM`/`DECSET`: set mode(s). `private` is `true` when the sequence
    /// carried a private-marker byte (`?`, `>`, `<`, `=`).
    SetMode { params: Vec<u16>, private: bool },
    /// `RM`/`DECRST`: reset mode(s).
    ResetMode { params: Vec<u16>, private: bool },
    /// `DA`: device attributes request. A private-marker request must be
    /// ignored by the screen (the Emacs/Vim infinite-loop bug).
    DeviceAttributes { private: bool },
    /// `DSR`: device status report request, carrying its parameter (5 or 6).
    DeviceStatusReport(u16),
    /// `ESC ( x` / `ESC ) x`: designate a charset into G0 or G1.
    DesignateCharset(CharsetSlot, Charset),
    /// `SI` (0x0F): shift in, select G0.
    ShiftIn,
    /// `SO` (0x0E): shift out, select G1.
    ShiftOut,
    /// `SS2` (`ESC N`): single shift (mapped onto the G1 slot; this engine
    /// tracks only G0/G1).
    SingleShift2,
    /// `SS3` (`ESC O`): single shift (mapped onto the G1 slot).
    SingleShift3,
    /// `OSC 0`: set icon name and window title.
    SetIconNameAndTitle(String),
    /// `OSC 1`: set icon name.
    SetIconName(String),
    /// `OSC 2`: set window title.
    SetTitle(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    Escape,
    EscapeIntermediate,
    CsiParam,
    CsiIntermediate,
    CsiIgnore,
    OscString,
    /// Covers DCS and SOS/PM/APC alike: both are consumed-and-discarded, so
    /// there is nothing a finer split would buy.
    DiscardString,
    /// After `ESC (`/`)`/`*`/`+`: next byte selects a table. `None` means
    /// the designated slot (G2/G3) has nowhere to land in this engine, so
    /// the byte is consumed but produces no action.
    Charset(Option<CharsetSlot>),
}

/// Whether UTF-8 decoding is currently active on the byte layer, which
/// suppresses `SI`/`SO`/charset-designation effects per `DOCS` (ECMA-035).
/// The decoder itself lives outside this core; this flag only gates that
/// one piece of parser behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingMode {
    Utf8,
    Other,
}

/// VT/ANSI code-point stream parser.
pub struct Parser {
    state: State,
    params: Vec<u16>,
    current_param: Option<u32>,
    private_marker: bool,
    intermediates: Vec<char>,
    print_buf: String,
    osc_buf: String,
    /// Set while waiting to see whether an `ESC` encountered inside a
    /// string-accumulation state is the start of `ST` (`ESC \`).
    saw_esc_in_string: bool,
    encoding: EncodingMode,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            state: State::Ground,
            params: Vec::with_capacity(MAX_PARAMS),
            current_param: None,
            private_marker: false,
            intermediates: Vec::new(),
            print_buf: String::new(),
            osc_buf: String::new(),
            saw_esc_in_string: false,
            encoding: EncodingMode::Utf8,
        }
    }

    /// Set whether the embedder currently has UTF-8 decoding active. See
    /// [`EncodingMode`].
    pub fn set_encoding(&mut self, encoding: EncodingMode) {
        self.encoding = encoding;
    }

    /// Feed a chunk of code points and return the actions they produced.
    /// Re-entrant: a sequence split across two calls resumes correctly.
    pub fn feed(&mut self, input: &str) -> Vec<Action> {
        let mut out = Vec::new();
        for ch in input.chars() {
            self.advance(ch, &mut out);
        }
        self.flush_print(&mut out);
        out
    }

    fn advance(&mut self, ch: char, out: &mut Vec<Action>) {
        if ch == '\u{1B}' {
            match self.state {
                State::OscString | State::DiscardString => {
                    self.saw_esc_in_string = true;
                }
                State::Ground => {
                    self.flush_print(out);
                    self.state = State::Escape;
                }
                _ => {
                    self.flush_print(out);
                    tracing::trace!("parser reset to ground: escape cancelled in-progress sequence");
                    self.clear_seq_buffers();
                    self.state = State::Escape;
                }
            }
            return;
        }

        match self.state {
            State::Ground => self.advance_ground(ch, out),
            State::Escape => self.advance_escape(ch, out),
            State::EscapeIntermediate => self.advance_escape_intermediate(ch, out),
            State::CsiParam => self.advance_csi_param(ch, out),
            State::CsiIntermediate => self.advance_csi_intermediate(ch, out),
            State::CsiIgnore => self.advance_csi_ignore(ch),
            State::OscString => self.advance_osc_string(ch, out),
            State::DiscardString => self.advance_discard_string(ch, out),
            State::Charset(slot) => self.advance_charset(slot, ch, out),
        }
    }

    fn flush_print(&mut self, out: &mut Vec<Action>) {
        if !self.print_buf.is_empty() {
            out.push(Action::Print(std::mem::take(&mut self.print_buf)));
        }
    }

    fn clear_seq_buffers(&mut self) {
        self.params.clear();
        self.current_param = None;
        self.private_marker = false;
        self.intermediates.clear();
        self.osc_buf.clear();
        self.saw_esc_in_string = false;
    }

    fn advance_ground(&mut self, ch: char, out: &mut Vec<Action>) {
        match ch {
            '\u{07}' => {
                self.flush_print(out);
                out.push(Action::Bell);
            }
            '\u{08}' => {
                self.flush_print(out);
                out.push(Action::Backspace);
            }
            '\u{09}' => {
                self.flush_print(out);
                out.push(Action::Tab);
            }
            '\u{0A}' | '\u{0B}' | '\u{0C}' => {
                self.flush_print(out);
                out.push(Action::LineFeed);
            }
            '\u{0D}' => {
                self.flush_print(out);
                out.push(Action::CarriageReturn);
            }
            '\u{0E}' => {
                if self.encoding == EncodingMode::Other {
                    self.flush_print(out);
                    out.push(Action::ShiftOut);
                }
            }
            '\u{0F}' => {
                if self.encoding == EncodingMode::Other {
                    self.flush_print(out);
                    out.push(Action::ShiftIn);
                }
            }
            c if (c as u32) < 0x20 || c == '\u{7F}' => {
                // Other C0 controls and DEL: no dispatchable meaning here.
            }
            c => self.print_buf.push(c),
        }
    }

    fn advance_escape(&mut self, ch: char, out: &mut Vec<Action>) {
        match ch {
            '[' => {
                self.clear_seq_buffers();
                self.state = State::CsiParam;
            }
            ']' => {
                self.clear_seq_buffers();
                self.state = State::OscString;
            }
            'P' | 'X' | '^' | '_' => {
                self.clear_seq_buffers();
                self.state = State::DiscardString;
            }
            '(' => self.state = State::Charset(Some(CharsetSlot::G0)),
            ')' => self.state = State::Charset(Some(CharsetSlot::G1)),
            '*' | '+' => self.state = State::Charset(None),
            'D' => {
                out.push(Action::Index);
                self.state = State::Ground;
            }
            'E' => {
                out.push(Action::NextLine);
                self.state = State::Ground;
            }
            'M' => {
                out.push(Action::ReverseIndex);
                self.state = State::Ground;
            }
            '7' => {
                out.push(Action::SaveCursor);
                self.state = State::Ground;
            }
            '8' => {
                out.push(Action::RestoreCursor);
                self.state = State::Ground;
            }
            'c' => {
                out.push(Action::FullReset);
                self.state = State::Ground;
            }
            'H' => {
                out.push(Action::SetTabStop);
                self.state = State::Ground;
            }
            'N' => {
                out.push(Action::SingleShift2);
                self.state = State::Ground;
            }
            'O' => {
                out.push(Action::SingleShift3);
                self.state = State::Ground;
            }
            c if (c as u32) >= 0x20 && (c as u32) <= 0x2F => {
                self.intermediates.push(c);
                self.state = State::EscapeIntermediate;
            }
            _ => {
                // Unknown final byte: permissive, no dispatch.
                self.state = State::Ground;
            }
        }
    }

    fn advance_escape_intermediate(&mut self, ch: char, out: &mut Vec<Action>) {
        if (ch as u32) >= 0x20 && (ch as u32) <= 0x2F {
            self.intermediates.push(ch);
            return;
        }
        // Only DECALN (`ESC # 8`) is recognized; anything else is ignored.
        if ch == '8' && self.intermediates == ['#'] {
            out.push(Action::ScreenAlignmentTest);
        }
        self.state = State::Ground;
        self.intermediates.clear();
    }

    fn push_param(&mut self) {
        let v = self.current_param.take().unwrap_or(0);
        if self.params.len() < MAX_PARAMS {
            self.params.push(v.min(u16::MAX as u32) as u16);
        }
    }

    fn advance_csi_param(&mut self, ch: char, out: &mut Vec<Action>) {
        match ch {
            '0'..='9' => {
                let digit = ch as u32 - '0' as u32;
                self.current_param = Some(
                    self.current_param
                        .unwrap_or(0)
                        .saturating_mul(10)
                        .saturating_add(digit),
                );
            }
            ';' | ':' => self.push_param(),
            '?' | '<' | '=' | '>' => {
                if self.params.is_empty() && self.current_param.is_none() && !self.private_marker
                {
                    self.private_marker = true;
                } else {
                    self.state = State::CsiIgnore;
                }
            }
            c if (c as u32) >= 0x20 && (c as u32) <= 0x2F => {
                self.intermediates.push(c);
                self.state = State::CsiIntermediate;
            }
            c if (c as u32) >= 0x40 && (c as u32) <= 0x7E => {
                self.push_param();
                self.dispatch_csi(c, out);
                self.clear_seq_buffers();
                self.state = State::Ground;
            }
            _ => self.state = State::CsiIgnore,
        }
    }

    fn advance_csi_intermediate(&mut self, ch: char, out: &mut Vec<Action>) {
        match ch {
            c if (c as u32) >= 0x20 && (c as u32) <= 0x2F => self.intermediates.push(c),
            c if (c as u32) >= 0x40 && (c as u32) <= 0x7E => {
                self.push_param();
                self.dispatch_csi(c, out);
                self.clear_seq_buffers();
                self.state = State::Ground;
            }
            _ => self.state = State::CsiIgnore,
        }
    }

    fn advance_csi_ignore(&mut self, ch: char) {
        if (ch as u32) >= 0x40 && (ch as u32) <= 0x7E {
            tracing::trace!("parser reset to ground: malformed CSI sequence discarded");
            self.clear_seq_buffers();
            self.state = State::Ground;
        }
    }

    fn dispatch_csi(&mut self, final_byte: char, out: &mut Vec<Action>) {
        let params = &self.params;
        let param_or = |idx: usize, default: u16| params.get(idx).copied().unwrap_or(default);
        let param_min1 = |idx: usize| {
            let v = params.get(idx).copied().unwrap_or(0);
            if v == 0 { 1 } else { v }
        };
        let private = self.private_marker;
        let has_bang = self.intermediates.contains(&'!');

        let action = match final_byte {
            'A' => Some(Action::CursorUp(param_min1(0))),
            'B' => Some(Action::CursorDown(param_min1(0))),
            'C' => Some(Action::CursorForward(param_min1(0))),
            'D' => Some(Action::CursorBack(param_min1(0))),
            'E' => Some(Action::CursorNextLine(param_min1(0))),
            'F' => Some(Action::CursorPrevLine(param_min1(0))),
            'G' | '`' => Some(Action::CursorHorizontalAbsolute(param_min1(0))),
            'H' | 'f' => Some(Action::CursorPosition(param_min1(0), param_min1(1))),
            'J' => Some(Action::EraseInDisplay(param_or(0, 0))),
            'K' => Some(Action::EraseInLine(param_or(0, 0))),
            'L' => Some(Action::InsertLines(param_min1(0))),
            'M' => Some(Action::DeleteLines(param_min1(0))),
            'P' => Some(Action::DeleteCharacters(param_min1(0))),
            '@' => Some(Action::InsertCharacters(param_min1(0))),
            'S' => Some(Action::ScrollUp(param_min1(0))),
            'T' => Some(Action::ScrollDown(param_min1(0))),
            'X' => Some(Action::EraseCharacters(param_min1(0))),
            'g' => Some(Action::ClearTabStop(param_or(0, 0))),
            'h' => Some(Action::SetMode {
                params: params.clone(),
                private,
            }),
            'l' => Some(Action::ResetMode {
                params: params.clone(),
                private,
            }),
            'm' => Some(Action::SelectGraphicRendition(params.clone())),
            'n' => Some(Action::DeviceStatusReport(param_or(0, 0))),
            'c' => Some(Action::DeviceAttributes { private }),
            'r' => {
                let top = params.first().copied().filter(|&v| v != 0);
                let bottom = params.get(1).copied().filter(|&v| v != 0);
                Some(Action::SetScrollRegion(top, bottom))
            }
            'p' if has_bang => Some(Action::SoftReset),
            _ => None,
        };
        if let Some(action) = action {
            out.push(action);
        }
    }

    fn advance_osc_string(&mut self, ch: char, out: &mut Vec<Action>) {
        if self.saw_esc_in_string {
            self.saw_esc_in_string = false;
            if ch == '\\' {
                self.finish_osc(out);
            } else {
                self.osc_buf.clear();
                self.state = State::Escape;
                self.advance_escape(ch, out);
            }
            return;
        }
        match ch {
            '\u{07}' => self.finish_osc(out),
            '\u{18}' | '\u{1A}' => {
                self.osc_buf.clear();
                self.state = State::Ground;
            }
            'R' if self.osc_buf.is_empty() => {
                // Palette reset (`ESC ] R`): dispatches immediately with
                // empty text, no terminator required.
                self.state = State::Ground;
            }
            c => self.osc_buf.push(c),
        }
    }

    fn finish_osc(&mut self, out: &mut Vec<Action>) {
        let (code, text) = match self.osc_buf.split_once(';') {
            Some((code, text)) => (code, text),
            None => (self.osc_buf.as_str(), ""),
        };
        if let Ok(code) = code.parse::<u32>() {
            match code {
                0 => out.push(Action::SetIconNameAndTitle(text.to_string())),
                1 => out.push(Action::SetIconName(text.to_string())),
                2 => out.push(Action::SetTitle(text.to_string())),
                _ => {}
            }
        }
        self.osc_buf.clear();
        self.state = State::Ground;
    }

    fn advance_discard_string(&mut self, ch: char, out: &mut Vec<Action>) {
        if self.saw_esc_in_string {
            self.saw_esc_in_string = false;
            if ch == '\\' {
                self.state = State::Ground;
            } else {
                self.state = State::Escape;
                self.advance_escape(ch, out);
            }
            return;
        }
        if ch == '\u{18}' || ch == '\u{1A}' {
            self.state = State::Ground;
        }
        // Everything else is discarded: DCS/SOS/PM/APC payloads are never
        // acted on.
    }

    fn advance_charset(&mut self, slot: Option<CharsetSlot>, ch: char, out: &mut Vec<Action>) {
        if let Some(slot) = slot {
            let charset = match ch {
                'B' => Charset::Ascii,
                'A' => Charset::Uk,
                '0' => Charset::DecSpecialGraphics,
                '<' => Charset::Vax42,
                _ => Charset::Latin1,
            };
            if self.encoding != EncodingMode::Utf8 {
                out.push(Action::DesignateCharset(slot, charset));
            }
        }
        self.state = State::Ground;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printable_run_batches_into_one_print_action() {
        let mut p = Parser::new();
        let actions = p.feed("hi");
        assert_eq!(actions, vec![Action::Print("hi".to_string())]);
    }

    #[test]
    fn control_chars_flush_pending_print_first() {
        let mut p = Parser::new();
        let actions = p.feed("hi\tbye\r\n");
        assert_eq!(
            actions,
            vec![
                Action::Print("hi".to_string()),
                Action::Tab,
                Action::Print("bye".to_string()),
                Action::CarriageReturn,
                Action::LineFeed,
            ]
        );
    }

    #[test]
    fn csi_cursor_up_with_default_param() {
        let mut p = Parser::new();
        let actions = p.feed("\x1b[A");
        assert_eq!(actions, vec![Action::CursorUp(1)]);
    }

    #[test]
    fn csi_cursor_up_with_explicit_param() {
        let mut p = Parser::new();
        let actions = p.feed("\x1b[5A");
        assert_eq!(actions, vec![Action::CursorUp(5)]);
    }

    #[test]
    fn csi_cursor_position_two_params() {
        let mut p = Parser::new();
        let actions = p.feed("\x1b[10;20H");
        assert_eq!(actions, vec![Action::CursorPosition(10, 20)]);
    }

    #[test]
    fn csi_erase_in_display_default_is_zero() {
        let mut p = Parser::new();
        let actions = p.feed("\x1b[J");
        assert_eq!(actions, vec![Action::EraseInDisplay(0)]);
    }

    #[test]
    fn csi_sgr_passes_through_all_params() {
        let mut p = Parser::new();
        let actions = p.feed("\x1b[0;1;31m");
        assert_eq!(
            actions,
            vec![Action::SelectGraphicRendition(vec![0, 1, 31])]
        );
    }

    #[test]
    fn csi_private_marker_decset() {
        let mut p = Parser::new();
        let actions = p.feed("\x1b[?7l");
        assert_eq!(
            actions,
            vec![Action::ResetMode {
                params: vec![7],
                private: true,
            }]
        );
    }

    #[test]
    fn csi_private_marker_device_attributes_is_flagged() {
        let mut p = Parser::new();
        let actions = p.feed("\x1b[?c");
        assert_eq!(
            actions,
            vec![Action::DeviceAttributes { private: true }]
        );
    }

    #[test]
    fn csi_soft_reset_via_bang_intermediate() {
        let mut p = Parser::new();
        let actions = p.feed("\x1b[!p");
        assert_eq!(actions, vec![Action::SoftReset]);
    }

    #[test]
    fn csi_scroll_region() {
        let mut p = Parser::new();
        let actions = p.feed("\x1b[2;5r");
        assert_eq!(actions, vec![Action::SetScrollRegion(Some(2), Some(5))]);
    }

    #[test]
    fn csi_scroll_region_no_params_is_full_screen() {
        let mut p = Parser::new();
        let actions = p.feed("\x1b[r");
        assert_eq!(actions, vec![Action::SetScrollRegion(None, None)]);
    }

    #[test]
    fn malformed_csi_is_discarded_without_dispatch() {
        let mut p = Parser::new();
        // A second private-marker byte mid-sequence is invalid; the whole
        // sequence should be swallowed without producing an action, and a
        // subsequent legitimate sequence still parses correctly.
        let actions = p.feed("\x1b[1?5A\x1b[B");
        assert_eq!(actions, vec![Action::CursorDown(1)]);
    }

    #[test]
    fn esc_mid_sequence_cancels_and_restarts() {
        let mut p = Parser::new();
        let actions = p.feed("\x1b[3\x1b[5A");
        assert_eq!(actions, vec![Action::CursorUp(5)]);
    }

    #[test]
    fn osc_set_title_bel_terminated() {
        let mut p = Parser::new();
        let actions = p.feed("\x1b]2;hello\x07");
        assert_eq!(actions, vec![Action::SetTitle("hello".to_string())]);
    }

    #[test]
    fn osc_set_icon_and_title_st_terminated() {
        let mut p = Parser::new();
        let actions = p.feed("\x1b]0;both\x1b\\");
        assert_eq!(
            actions,
            vec![Action::SetIconNameAndTitle("both".to_string())]
        );
    }

    #[test]
    fn osc_palette_reset_dispatches_immediately_without_hanging() {
        let mut p = Parser::new();
        let actions = p.feed("\x1b]R");
        assert!(actions.is_empty());
        // Parser must be back in ground, ready for the next sequence.
        let actions = p.feed("A");
        assert_eq!(actions, vec![Action::Print("A".to_string())]);
    }

    #[test]
    fn osc_unknown_code_is_discarded() {
        let mut p = Parser::new();
        let actions = p.feed("\x1b]99;whatever\x07");
        assert!(actions.is_empty());
    }

    #[test]
    fn dcs_payload_is_consumed_and_discarded() {
        let mut p = Parser::new();
        let actions = p.feed("\x1bPq1;2;3\x1b\\A");
        assert_eq!(actions, vec![Action::Print("A".to_string())]);
    }

    #[test]
    fn apc_payload_is_consumed_and_discarded() {
        let mut p = Parser::new();
        let actions = p.feed("\x1b_hello\x1b\\A");
        assert_eq!(actions, vec![Action::Print("A".to_string())]);
    }

    #[test]
    fn designate_charset_g0_and_g1() {
        let mut p = Parser::new();
        p.set_encoding(EncodingMode::Other);
        let actions = p.feed("\x1b(B\x1b)0");
        assert_eq!(
            actions,
            vec![
                Action::DesignateCharset(CharsetSlot::G0, Charset::Ascii),
                Action::DesignateCharset(CharsetSlot::G1, Charset::DecSpecialGraphics),
            ]
        );
    }

    #[test]
    fn designate_charset_suppressed_in_utf8_mode() {
        let mut p = Parser::new();
        // Default encoding is UTF-8.
        let actions = p.feed("\x1b(0");
        assert!(actions.is_empty());
    }

    #[test]
    fn shift_in_and_out_suppressed_in_utf8_mode() {
        let mut p = Parser::new();
        let actions = p.feed("\u{0E}\u{0F}");
        assert!(actions.is_empty());
    }

    #[test]
    fn shift_in_and_out_dispatch_outside_utf8_mode() {
        let mut p = Parser::new();
        p.set_encoding(EncodingMode::Other);
        let actions = p.feed("\u{0E}\u{0F}");
        assert_eq!(actions, vec![Action::ShiftOut, Action::ShiftIn]);
    }

    #[test]
    fn screen_alignment_test_escape() {
        let mut p = Parser::new();
        let actions = p.feed("\x1b#8");
        assert_eq!(actions, vec![Action::ScreenAlignmentTest]);
    }

    #[test]
    fn index_next_line_reverse_index() {
        let mut p = Parser::new();
        let actions = p.feed("\x1bD\x1bE\x1bM");
        assert_eq!(
            actions,
            vec![Action::Index, Action::NextLine, Action::ReverseIndex]
        );
    }

    #[test]
    fn save_and_restore_cursor_escapes() {
        let mut p = Parser::new();
        let actions = p.feed("\x1b7\x1b8");
        assert_eq!(actions, vec![Action::SaveCursor, Action::RestoreCursor]);
    }

    #[test]
    fn split_feed_across_chunk_boundary_is_equivalent() {
        let mut p1 = Parser::new();
        let whole = p1.feed("\x1b[10;20H");

        let mut p2 = Parser::new();
        let mut split = p2.feed("\x1b[10;");
        split.extend(p2.feed("20H"));

        assert_eq!(whole, split);
    }

    #[test]
    fn split_feed_mid_utf8_grapheme_run() {
        let mut p1 = Parser::new();
        let whole = p1.feed("hello world");

        let mut p2 = Parser::new();
        let mut split = p2.feed("hello");
        split.extend(p2.feed(" world"));

        assert_eq!(whole, split);
    }

    #[test]
    fn excess_params_beyond_sixteen_are_dropped() {
        let mut p = Parser::new();
        let many = (0..20).map(|n| n.to_string()).collect::<Vec<_>>().join(";");
        let actions = p.feed(&format!("\x1b[{many}m"));
        match &actions[0] {
            Action::SelectGraphicRendition(params) => assert_eq!(params.len(), MAX_PARAMS),
            other => panic!("expected SGR action, got {other:?}"),
        }
    }
}
