//! Ozterm
//!
//! A VT-compatible terminal emulation core. The engine ingests the raw
//! byte stream produced by a pseudo-terminal slave and maintains an
//! in-memory model of what the terminal displays; it also encodes named
//! key presses into the byte sequences applications expect.
//!
//! # Architecture
//!
//! - `core`: platform-independent screen model (cells, screens,
//!   scrollback, snapshots)
//! - `parser`: escape-sequence parser producing semantic actions
//! - `terminal`: the executor tying parser and screens together,
//!   with host notification hooks
//! - `input`: key-press encoding
//! - `app`: configuration
//!
//! The core performs no I/O of its own: the host feeds bytes in with
//! [`Terminal::feed`] and drains replies through the `write_to_master`
//! hook. PTY plumbing, rendering, and palette resolution all live on
//! the host side.
//!
//! # Example
//!
//! ```
//! use ozterm::Terminal;
//!
//! let mut terminal = Terminal::new(24, 80).unwrap();
//! terminal.feed(b"Hello, \x1b[31mWorld\x1b[0m!");
//!
//! assert_eq!(terminal.cursor(), (0, 13));
//! assert_eq!(terminal.screen().cell(0, 7).color.fg, 1);
//! ```

pub mod app;
pub mod core;
pub mod input;
pub mod parser;
mod terminal;

pub use app::{Config, ConfigError};
pub use core::{Cell, ColorPair, Screen, Scrollback, Snapshot};
pub use input::{Key, Modifiers};
pub use parser::Parser;
pub use terminal::{Error, Hooks, Terminal};
