#![forbid(unsafe_code)]

//! Headless VT100-VT520 terminal engine.
//!
//! `vt-core` models what a DEC-family terminal keeps in its head: grid
//! contents, cursor state, SGR attributes, mode flags, charset
//! designations, and the escape-sequence parser that drives all of it. It
//! owns no transport — no PTY, no socket, no rendering surface. A host
//! feeds it decoded text and reads back a grid of cells.
//!
//! # Primary responsibilities
//!
//! - **Parser**: VT/ANSI state machine (Paul Flo Williams model) turning a
//!   code-point stream into typed [`Action`]s, with a fast path for runs of
//!   plain text.
//! - **Grid**: 2D cell matrix representing the visible viewport, plus the
//!   erase/insert/delete/scroll operations the parser dispatches into.
//! - **Cell**: character content + SGR attributes (colors, bold, italic,
//!   wide-character pairing).
//! - **Cursor**: position, pending attributes, tab stops, save/restore
//!   snapshot, and per-session charset selection.
//! - **Modes**: DEC private modes and ANSI standard modes.
//! - **Charset**: the G0/G1 designation tables (ASCII, UK, DEC Special
//!   Graphics, etc.) printables are translated through before landing on
//!   the grid.
//! - **Screen**: the facade tying all of the above together; `feed` is the
//!   single entry point embedders use.
//!
//! # Design principles
//!
//! - **No I/O**: all types are pure data + logic; the host supplies
//!   already-decoded text and polls state back out.
//! - **Deterministic**: identical byte sequences always produce identical
//!   state, whether fed in one call or split across many.
//! - **`#![forbid(unsafe_code)]`**: safety enforced at compile time.

pub mod cell;
pub mod charset;
pub mod cursor;
pub mod error;
pub mod grid;
pub mod modes;
pub mod parser;
pub mod screen;

pub use cell::{Cell, CellFlags, Color, SgrAttrs, SgrFlags};
pub use charset::{Charset, CharsetSlot};
pub use cursor::{Cursor, SavedCursor};
pub use error::ScreenError;
pub use grid::Grid;
pub use modes::{AnsiModes, DecModes, Modes};
pub use parser::{Action, EncodingMode, Parser};
pub use screen::Screen;
