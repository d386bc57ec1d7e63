//! Snapshot serialization
//!
//! Serializable captures of the visible grid for golden-style tests and
//! the headless runner. Snapshots are taken through the terminal's view
//! composition, so a scrolled-back view is captured as the host would
//! draw it.

use serde::{Deserialize, Serialize};

use super::cell::Cell;
use crate::terminal::Terminal;

/// A serializable snapshot of the visible terminal state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub rows: usize,
    pub cols: usize,
    pub cursor: CursorSnapshot,
    /// Visible rows, top to bottom
    pub lines: Vec<Vec<Cell>>,
}

/// Cursor position at capture time
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CursorSnapshot {
    pub row: usize,
    pub col: usize,
}

impl Snapshot {
    /// Capture the rows a host would currently draw
    pub fn capture(terminal: &Terminal) -> Self {
        let (row, col) = terminal.cursor();
        let lines = (0..terminal.rows())
            .map(|y| terminal.visible_row(y).to_vec())
            .collect();

        Self {
            rows: terminal.rows(),
            cols: terminal.cols(),
            cursor: CursorSnapshot { row, col },
            lines,
        }
    }

    /// The visible text, one line per row, trailing blanks trimmed
    pub fn to_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| {
                line.iter()
                    .map(|cell| cell.ch as char)
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// One visible row as text, trailing blanks trimmed
    pub fn row_text(&self, row: usize) -> String {
        self.lines
            .get(row)
            .map(|line| {
                line.iter()
                    .map(|cell| cell.ch as char)
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .unwrap_or_default()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self.cursor.row == other.cursor.row
            && self.cursor.col == other.cursor.col
            && self.lines == other.lines
    }
}
