//! Mode registry: ANSI standard modes and DEC private modes.
//!
//! The wire protocol addresses both families through the same numeric `SM`/
//! `RM` parameter space, disambiguated by a private-marker byte (`?`) the
//! parser captures and threads through as a `private` flag. Keeping two
//! separate bit sets instead of one mirrors that distinction and avoids
//! collisions between e.g. ANSI mode 4 (`IRM`) and DEC private mode 4
//! (smooth scroll, unsupported here).

use bitflags::bitflags;

bitflags! {
    /// Non-private (ANSI/ECMA-48) modes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AnsiModes: u8 {
        /// Insert mode: `draw` shifts existing cells right instead of overwriting.
        const IRM = 1 << 0;
        /// Linefeed/newline mode: `LF`/`VT`/`FF` also perform a carriage return.
        const LNM = 1 << 1;
    }
}

impl Default for AnsiModes {
    fn default() -> Self {
        AnsiModes::empty()
    }
}

bitflags! {
    /// DEC private modes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DecModes: u8 {
        /// DECOM: origin mode — cursor addressing becomes region-relative.
        const DECOM    = 1 << 0;
        /// DECAWM: autowrap — printing past the right margin wraps to the next line.
        const DECAWM   = 1 << 1;
        /// DECSCNM: screen-wide reverse video.
        const DECSCNM  = 1 << 2;
        /// DECTCEM: text cursor enable — cursor is visible when set.
        const DECTCEM  = 1 << 3;
        /// DECCOLM: 132-column mode (vs. the 80-column default).
        const DECCOLM  = 1 << 4;
    }
}

impl Default for DecModes {
    /// A freshly constructed screen has autowrap and the cursor visible,
    /// matching a physical VT100 at power-on.
    fn default() -> Self {
        DecModes::DECAWM | DecModes::DECTCEM
    }
}

/// Combined ANSI + DEC-private mode registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modes {
    pub ansi: AnsiModes,
    pub dec: DecModes,
}

impl Modes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to power-on defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn insert_mode(&self) -> bool {
        self.ansi.contains(AnsiModes::IRM)
    }

    pub fn linefeed_newline(&self) -> bool {
        self.ansi.contains(AnsiModes::LNM)
    }

    pub fn origin_mode(&self) -> bool {
        self.dec.contains(DecModes::DECOM)
    }

    pub fn autowrap(&self) -> bool {
        self.dec.contains(DecModes::DECAWM)
    }

    pub fn reverse_video(&self) -> bool {
        self.dec.contains(DecModes::DECSCNM)
    }

    pub fn cursor_visible(&self) -> bool {
        self.dec.contains(DecModes::DECTCEM)
    }

    pub fn column_132(&self) -> bool {
        self.dec.contains(DecModes::DECCOLM)
    }

    /// Apply an ANSI (non-private) mode parameter. Unknown parameters are
    /// silently ignored — the whole point of this registry is permissive
    /// dispatch, matching physical hardware.
    pub fn set_ansi(&mut self, param: u16, value: bool) {
        let Some(flag) = ansi_flag(param) else {
            tracing::debug!(param, "dropped unrecognized ANSI mode parameter");
            return;
        };
        self.ansi.set(flag, value);
    }

    /// Apply a DEC-private mode parameter. Returns `true` if `param` maps to
    /// `DECCOLM`, since the screen needs to react (column count + clear) to
    /// that one specially; all other recognized/unrecognized params are
    /// applied (or ignored) without further screen-level side effects.
    pub fn set_dec(&mut self, param: u16, value: bool) -> bool {
        let Some(flag) = dec_flag(param) else {
            tracing::debug!(param, "dropped unrecognized DEC private mode parameter");
            return false;
        };
        self.dec.set(flag, value);
        flag == DecModes::DECCOLM
    }
}

fn ansi_flag(param: u16) -> Option<AnsiModes> {
    match param {
        4 => Some(AnsiModes::IRM),
        20 => Some(AnsiModes::LNM),
        _ => None,
    }
}

fn dec_flag(param: u16) -> Option<DecModes> {
    match param {
        6 => Some(DecModes::DECOM),
        7 => Some(DecModes::DECAWM),
        5 => Some(DecModes::DECSCNM),
        25 => Some(DecModes::DECTCEM),
        3 => Some(DecModes::DECCOLM),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_modes_have_autowrap_and_visible_cursor() {
        let m = Modes::default();
        assert!(m.autowrap());
        assert!(m.cursor_visible());
        assert!(!m.insert_mode());
        assert!(!m.linefeed_newline());
        assert!(!m.origin_mode());
        assert!(!m.reverse_video());
        assert!(!m.column_132());
    }

    #[test]
    fn set_ansi_irm() {
        let mut m = Modes::default();
        m.set_ansi(4, true);
        assert!(m.insert_mode());
        m.set_ansi(4, false);
        assert!(!m.insert_mode());
    }

    #[test]
    fn set_dec_unknown_param_is_noop() {
        let mut m = Modes::default();
        let reacted = m.set_dec(9999, true);
        assert!(!reacted);
    }

    #[test]
    fn set_dec_deccolm_reports_for_screen_reaction() {
        let mut m = Modes::default();
        let reacted = m.set_dec(3, true);
        assert!(reacted);
        assert!(m.column_132());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut m = Modes::default();
        m.set_ansi(4, true);
        m.set_dec(6, true);
        m.set_dec(25, false);
        m.reset();
        assert_eq!(m, Modes::default());
    }

    #[test]
    fn decawm_off_disables_autowrap() {
        let mut m = Modes::default();
        m.set_dec(7, false);
        assert!(!m.autowrap());
    }
}
