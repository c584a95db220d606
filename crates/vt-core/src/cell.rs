//! Terminal cell: the fundamental unit of the grid.
//!
//! Each cell stores the displayed content (usually one code point, sometimes a
//! whole grapheme cluster) and its SGR attributes. This models the terminal's
//! internal state, not a rendering pipeline — there is no font, no pixel
//! metrics, nothing beyond what a VT-series terminal itself tracks.

use bitflags::bitflags;
use unicode_width::UnicodeWidthChar;

bitflags! {
    /// SGR text attribute flags.
    ///
    /// Maps directly to the ECMA-48 / VT100 SGR parameter values this engine
    /// supports (bold, italic, underline, blink, inverse, strikethrough).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SgrFlags: u8 {
        const BOLD          = 1 << 0;
        const ITALIC        = 1 << 1;
        const UNDERLINE     = 1 << 2;
        const BLINK         = 1 << 3;
        const INVERSE       = 1 << 4;
        const STRIKETHROUGH = 1 << 5;
    }
}

bitflags! {
    /// Cell-level flags that are orthogonal to SGR attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u8 {
        /// This cell is the leading (left) cell of a wide (2-column) character.
        const WIDE_CHAR = 1 << 0;
        /// This cell is the trailing (right) continuation of a wide character.
        /// Its content is meaningless; rendering uses the leading cell.
        const WIDE_CONTINUATION = 1 << 1;
    }
}

/// Color representation for terminal cells.
///
/// Supports the standard terminal color model hierarchy:
/// default → 16 named → 256 indexed → 24-bit RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Terminal default (SGR 39 / SGR 49).
    #[default]
    Default,
    /// Named color index (0-15): standard 8 + aixterm bright 8.
    Named(u8),
    /// 256-color palette index (0-255).
    Indexed(u8),
    /// 24-bit true color.
    Rgb(u8, u8, u8),
}

/// SGR attributes for a cell: flags + foreground/background colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SgrAttrs {
    pub flags: SgrFlags,
    pub fg: Color,
    pub bg: Color,
}

impl SgrAttrs {
    /// Reset all attributes to default (SGR 0).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Flip the `INVERSE` bit. Used by `DECSCNM` toggling, which reverses
    /// every existing cell's reverse-video bit (not just the cursor
    /// prototype), so this needs to be callable on stored cells too.
    pub fn flip_inverse(&mut self) {
        self.flags.toggle(SgrFlags::INVERSE);
    }
}

/// A single cell in the terminal grid.
///
/// `content` is usually one `char`'s worth of text, but may hold a full
/// grapheme cluster: a base character plus combining marks, or a multi-code-
/// point emoji ZWJ sequence. Cells are plain values — never shared by
/// reference — so updating the cursor's attribute prototype never
/// retroactively mutates a cell already committed to the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    content: String,
    /// Display width of the content in terminal columns (1 or 2 for wide
    /// cells; the trailing half of a wide pair reports 0).
    width: u8,
    /// Cell-level flags (wide char, continuation, etc.).
    pub flags: CellFlags,
    /// SGR text attributes.
    pub attrs: SgrAttrs,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            content: String::from(" "),
            width: 1,
            flags: CellFlags::empty(),
            attrs: SgrAttrs::default(),
        }
    }
}

impl Cell {
    /// Create a new cell holding a single character with default attributes.
    pub fn new(ch: char) -> Self {
        Self {
            content: ch.to_string(),
            width: 1,
            flags: CellFlags::empty(),
            attrs: SgrAttrs::default(),
        }
    }

    /// Create a new cell with the given character, width, and attributes.
    pub fn with_attrs(ch: char, width: u8, attrs: SgrAttrs) -> Self {
        Self {
            content: ch.to_string(),
            width,
            flags: CellFlags::empty(),
            attrs,
        }
    }

    /// Create a wide (2-column) character cell.
    ///
    /// Returns `(leading, continuation)` pair. The leading cell holds the
    /// character; the continuation cell is a placeholder.
    pub fn wide(ch: char, attrs: SgrAttrs) -> (Self, Self) {
        let leading = Self {
            content: ch.to_string(),
            width: 2,
            flags: CellFlags::WIDE_CHAR,
            attrs,
        };
        let continuation = Self {
            content: String::from(" "),
            width: 0,
            flags: CellFlags::WIDE_CONTINUATION,
            attrs,
        };
        (leading, continuation)
    }

    /// The displayed content of this cell: one code point, a combining
    /// cluster, or an emoji ZWJ sequence.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The display width in terminal columns.
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Whether this cell is the leading half of a wide character.
    pub fn is_wide(&self) -> bool {
        self.flags.contains(CellFlags::WIDE_CHAR)
    }

    /// Whether this cell is a continuation (trailing half) of a wide character.
    pub fn is_wide_continuation(&self) -> bool {
        self.flags.contains(CellFlags::WIDE_CONTINUATION)
    }

    /// Set the character content and display width, replacing whatever was
    /// there before (including any merged combining marks).
    pub fn set_content(&mut self, ch: char, width: u8) {
        self.content.clear();
        self.content.push(ch);
        self.width = width;
        // Clear wide flags when replacing content.
        self.flags
            .remove(CellFlags::WIDE_CHAR | CellFlags::WIDE_CONTINUATION);
    }

    /// Append a zero-width code point (combining mark, ZWJ, variation
    /// selector) to this cell's content without touching width or attrs.
    ///
    /// This is how emoji ZWJ sequences and combining accents end up sharing
    /// a single cell with the base glyph that precedes them.
    pub fn push_combining(&mut self, ch: char) {
        self.content.push(ch);
    }

    /// Reset this cell to a blank space carrying the given attributes.
    ///
    /// Used by erase operations (ED, EL, ECH), which fill with the current
    /// background colour (xterm's background-colour-erase extension) and,
    /// if `DECSCNM` is in force, the reverse-video bit — the caller
    /// assembles `attrs` to reflect both.
    pub fn erase(&mut self, attrs: SgrAttrs) {
        self.content.clear();
        self.content.push(' ');
        self.width = 1;
        self.flags = CellFlags::empty();
        self.attrs = attrs;
    }

    /// Reset this cell to a blank space with default attributes.
    pub fn clear(&mut self) {
        self.content.clear();
        self.content.push(' ');
        self.width = 1;
        self.flags = CellFlags::empty();
        self.attrs = SgrAttrs::default();
    }

    /// Display width of a single code point, per Unicode East Asian Width.
    ///
    /// Returns `0` for combining marks, zero-width joiners, variation
    /// selectors, and other non-spacing/format code points; `1` for narrow
    /// cells; `2` for wide (CJK-style) cells.
    pub fn display_width(ch: char) -> u8 {
        ch.width().unwrap_or(0) as u8
    }
}
