//! Terminal Cell
//!
//! Represents a single cell in the terminal grid: one ASCII byte plus the
//! palette colors and the protected flag it was written with.

use serde::{Deserialize, Serialize};

/// A foreground/background pair of palette indices.
///
/// Indices 0-15 are the ANSI colors; 16-255 are the extended palette.
/// The host maps indices to pixels; the core never resolves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPair {
    /// Foreground palette index
    pub fg: u8,
    /// Background palette index
    pub bg: u8,
}

impl ColorPair {
    pub fn new(fg: u8, bg: u8) -> Self {
        Self { fg, bg }
    }
}

impl Default for ColorPair {
    fn default() -> Self {
        // Bright green on black, the classic console attribute.
        Self { fg: 0x0A, bg: 0x00 }
    }
}

/// A single cell in the terminal grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// The character in this cell, always a printable ASCII byte or space
    pub ch: u8,
    /// Colors the cell was written with
    pub color: ColorPair,
    /// Set when the cell was written under SGR 8; erase and shift
    /// operations leave such cells in place.
    pub protected: bool,
}

impl Cell {
    /// A cleared cell: a space in the given colors, unprotected.
    pub fn blank(color: ColorPair) -> Self {
        Self {
            ch: b' ',
            color,
            protected: false,
        }
    }

    /// Check whether the cell holds a space
    pub fn is_blank(&self) -> bool {
        self.ch == b' '
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank(ColorPair::default())
    }
}
