//! Terminal core
//!
//! Platform-independent screen model: cells, the dual screen buffers, the
//! scrollback ring, and serializable snapshots of the visible grid.

mod cell;
mod screen;
mod scrollback;
mod snapshot;

pub use cell::{Cell, ColorPair};
pub use screen::{EraseMode, Screen};
pub use scrollback::{Scrollback, DEFAULT_SCROLLBACK_LINES};
pub use snapshot::{CursorSnapshot, Snapshot};
