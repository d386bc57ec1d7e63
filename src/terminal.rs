//! Terminal executor
//!
//! Ties the parser to the screen model: owns both screen buffers, the
//! scrollback ring, and the per-instance parser, applies parsed actions,
//! generates replies, and notifies the host through the hooks bundle.
//!
//! All entry points are synchronous and must be driven from a single
//! owner thread; hooks fire inside the call that caused them. The engine
//! is total over arbitrary input bytes and performs no allocation in
//! steady state.

use std::fmt;
use std::io::Write;

use crate::app::Config;
use crate::core::{Cell, ColorPair, EraseMode, Screen, Scrollback};
use crate::input::{self, Key, Modifiers};
use crate::parser::{Action, CsiAction, EscAction, Parser};

/// Tab stops are fixed every eight columns
const TAB_WIDTH: usize = 8;

/// Construction errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("terminal dimensions must be non-zero (got {rows}x{cols})")]
    InvalidDimensions { rows: usize, cols: usize },
}

/// Host notification hooks.
///
/// Each hook is optional; closures capture whatever host context they
/// need. The bundle is handed over at construction, which keeps hosts
/// from swapping callbacks out from under a half-applied sequence.
#[derive(Default)]
pub struct Hooks {
    /// Reply bytes and encoded key presses headed for the PTY master
    pub write_to_master: Option<Box<dyn FnMut(&[u8])>>,
    /// A broad redraw is warranted
    pub refresh: Option<Box<dyn FnMut()>>,
    /// A single cell changed: `(row, col, cell)`
    pub set_cell: Option<Box<dyn FnMut(usize, usize, Cell)>>,
    /// The cursor moved: `(old_row, old_col, new_row, new_col)`
    pub move_cursor: Option<Box<dyn FnMut(usize, usize, usize, usize)>>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("write_to_master", &self.write_to_master.is_some())
            .field("refresh", &self.refresh.is_some())
            .field("set_cell", &self.set_cell.is_some())
            .field("move_cursor", &self.move_cursor.is_some())
            .finish()
    }
}

/// The terminal engine: dual screens, scrollback, parser, and dispatch
pub struct Terminal {
    rows: usize,
    cols: usize,
    main: Screen,
    alt: Screen,
    alt_active: bool,
    /// One global saved-cursor pair, shared across screen swaps
    saved_cursor: (usize, usize),
    /// Colors new cells are written with
    colors: ColorPair,
    default_colors: ColorPair,
    /// Inclusive scroll region rows
    scroll_top: usize,
    scroll_bottom: usize,
    scrollback: Scrollback,
    /// View offset into scrollback, in rows back from live
    scroll_offset: usize,
    parser: Parser,
    hooks: Hooks,
}

impl fmt::Debug for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Terminal")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("alt_active", &self.alt_active)
            .field("scroll_top", &self.scroll_top)
            .field("scroll_bottom", &self.scroll_bottom)
            .field("scroll_offset", &self.scroll_offset)
            .finish()
    }
}

impl Terminal {
    /// Create a terminal with the given dimensions and default settings
    pub fn new(rows: usize, cols: usize) -> Result<Self, Error> {
        let config = Config {
            rows,
            cols,
            ..Config::default()
        };
        Self::with_config(&config)
    }

    /// Create a terminal from a configuration
    pub fn with_config(config: &Config) -> Result<Self, Error> {
        if config.rows == 0 || config.cols == 0 {
            return Err(Error::InvalidDimensions {
                rows: config.rows,
                cols: config.cols,
            });
        }

        let default_colors = ColorPair::new(config.default_fg, config.default_bg);
        Ok(Self {
            rows: config.rows,
            cols: config.cols,
            main: Screen::new(config.rows, config.cols, default_colors),
            alt: Screen::new(config.rows, config.cols, default_colors),
            alt_active: false,
            saved_cursor: (0, 0),
            colors: default_colors,
            default_colors,
            scroll_top: 0,
            scroll_bottom: config.rows - 1,
            scrollback: Scrollback::new(config.scrollback_lines, config.cols, default_colors),
            scroll_offset: 0,
            parser: Parser::new(),
            hooks: Hooks::default(),
        })
    }

    /// Create a terminal wired to a hooks bundle
    pub fn with_hooks(config: &Config, hooks: Hooks) -> Result<Self, Error> {
        let mut terminal = Self::with_config(config)?;
        terminal.hooks = hooks;
        Ok(terminal)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The currently active screen buffer
    pub fn screen(&self) -> &Screen {
        if self.alt_active {
            &self.alt
        } else {
            &self.main
        }
    }

    fn screen_mut(&mut self) -> &mut Screen {
        if self.alt_active {
            &mut self.alt
        } else {
            &mut self.main
        }
    }

    pub fn alt_active(&self) -> bool {
        self.alt_active
    }

    /// Cursor position on the active screen
    pub fn cursor(&self) -> (usize, usize) {
        let screen = self.screen();
        (screen.cursor_row, screen.cursor_col)
    }

    /// The inclusive scroll region `(top, bottom)`
    pub fn scroll_region(&self) -> (usize, usize) {
        (self.scroll_top, self.scroll_bottom)
    }

    /// Number of rows currently held in scrollback
    pub fn scrollback_len(&self) -> usize {
        self.scrollback.len()
    }

    /// Current view offset into scrollback; zero means live
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Feed bytes read from the PTY master. Partial escape sequences are
    /// carried over to the next call. Any delivered byte snaps the view
    /// back to live.
    pub fn feed(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if let Some(action) = self.parser.advance(byte) {
                self.apply(action);
            }
        }
        if !bytes.is_empty() {
            self.scroll_offset = 0;
        }
    }

    /// Encode a key press and deliver it through `write_to_master`
    pub fn send_key(&mut self, mods: Modifiers, key: Key) {
        let bytes = input::encode_key(key, mods);
        if !bytes.is_empty() {
            self.reply(&bytes);
        }
    }

    /// Set the scrollback view offset, clamped to the valid range
    pub fn set_scroll(&mut self, offset: usize) {
        self.scroll_offset = offset.min(self.scrollback.len());
        self.fire_refresh();
    }

    /// The row the host should draw at position `y`, composed from
    /// scrollback and the live screen according to the view offset.
    pub fn visible_row(&self, y: usize) -> &[Cell] {
        if self.scroll_offset > 0 {
            let index = self.scrollback.len() - self.scroll_offset + y;
            if let Some(row) = self.scrollback.get(index) {
                return row;
            }
            return self.screen().row(y - self.scroll_offset);
        }
        self.screen().row(y)
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Print(byte) => self.put_printable(byte),
            Action::Execute(byte) => match byte {
                b'\n' => self.linefeed(),
                b'\r' => {
                    let row = self.cursor().0;
                    self.move_cursor_to(row, 0);
                }
                0x08 => {
                    let (row, col) = self.cursor();
                    if col > 0 {
                        self.move_cursor_to(row, col - 1);
                    }
                }
                b'\t' => self.tab(),
                _ => {}
            },
            Action::Esc(esc) => self.esc_dispatch(esc),
            Action::Csi(csi) => self.csi_dispatch(csi),
        }
    }

    /// Write one printable byte at the cursor, resolving a pending wrap
    /// first. The cursor may come to rest at the pending-wrap column.
    fn put_printable(&mut self, byte: u8) {
        if self.cursor().1 >= self.cols {
            let scroll = self.cursor().0 == self.scroll_bottom;
            self.screen_mut().cursor_col = 0;
            if scroll {
                self.scroll_up(1);
            } else {
                let rows = self.rows;
                let screen = self.screen_mut();
                screen.cursor_row = (screen.cursor_row + 1).min(rows - 1);
            }
        }

        let (row, col) = self.cursor();
        let cell = Cell {
            ch: byte,
            color: self.colors,
            protected: self.screen().attr_protected,
        };
        self.screen_mut().write_cell(row, col, cell);
        if let Some(cb) = self.hooks.set_cell.as_mut() {
            cb(row, col, cell);
        }
        if let Some(cb) = self.hooks.move_cursor.as_mut() {
            cb(row, col, row, col + 1);
        }
        self.screen_mut().cursor_col = col + 1;
    }

    /// Line feed: scroll at the bottom of the region, move down otherwise.
    /// The column is left alone.
    fn linefeed(&mut self) {
        let (row, col) = self.cursor();
        if row == self.scroll_bottom {
            self.scroll_up(1);
        } else if row + 1 < self.rows {
            if let Some(cb) = self.hooks.move_cursor.as_mut() {
                cb(row, col, row + 1, col);
            }
            self.screen_mut().cursor_row = row + 1;
        }
    }

    /// Write spaces up to the next tab stop
    fn tab(&mut self) {
        let col = self.cursor().1;
        let spaces = TAB_WIDTH - (col % TAB_WIDTH);
        for _ in 0..spaces {
            self.put_printable(b' ');
        }
    }

    /// Move the cursor to an absolute position, clamped to the screen,
    /// firing the `move_cursor` hook.
    fn move_cursor_to(&mut self, row: usize, col: usize) {
        let row = row.min(self.rows - 1);
        let col = col.min(self.cols - 1);
        let (old_row, old_col) = self.cursor();
        if let Some(cb) = self.hooks.move_cursor.as_mut() {
            cb(old_row, old_col, row, col);
        }
        let screen = self.screen_mut();
        screen.cursor_row = row;
        screen.cursor_col = col;
    }

    fn move_cursor_by(&mut self, dr: isize, dc: isize) {
        let (row, col) = self.cursor();
        let row = (row as isize + dr).max(0) as usize;
        let col = (col as isize + dc).max(0) as usize;
        self.move_cursor_to(row, col);
    }

    /// Scroll the region up, first evicting the departing rows into the
    /// scrollback ring when the main screen is active.
    fn scroll_up(&mut self, n: usize) {
        let n = n.max(1);
        if !self.alt_active {
            let evicted = n.min(self.scroll_bottom + 1 - self.scroll_top);
            for offset in 0..evicted {
                self.scrollback.push(self.main.row(self.scroll_top + offset));
            }
        }
        self.scroll_region_up(n);
    }

    fn scroll_region_up(&mut self, n: usize) {
        let (top, bottom, color) = (self.scroll_top, self.scroll_bottom, self.colors);
        self.screen_mut().scroll_region_up(top, bottom, n, color);
        self.fire_refresh();
    }

    fn scroll_region_down(&mut self, n: usize) {
        let (top, bottom, color) = (self.scroll_top, self.scroll_bottom, self.colors);
        self.screen_mut().scroll_region_down(top, bottom, n, color);
        self.fire_refresh();
    }

    fn esc_dispatch(&mut self, esc: EscAction) {
        match esc {
            EscAction::SaveCursor => {
                self.saved_cursor = self.cursor();
            }
            EscAction::RestoreCursor => {
                let (row, col) = self.saved_cursor;
                self.move_cursor_to(row, col);
            }
            EscAction::FullReset => {
                let color = self.colors;
                self.screen_mut().clear(color);
                self.move_cursor_to(0, 0);
            }
            EscAction::Index => {
                self.move_cursor_by(1, 0);
            }
            EscAction::NextLine => {
                let row = self.cursor().0;
                self.move_cursor_to(row + 1, 0);
            }
            EscAction::ReverseIndex => {
                self.scroll_region_down(1);
            }
            EscAction::Identify => {
                self.reply(b"\x1b[?6c");
            }
            EscAction::StringTerminator => {}
            EscAction::DesignateG0(charset) => {
                log::debug!("G0 charset designation: {}", charset as char);
            }
            EscAction::DesignateG1(charset) => {
                log::debug!("G1 charset designation: {}", charset as char);
            }
            EscAction::AlignmentTest => {
                let color = self.colors;
                self.screen_mut().fill(b'E', color);
                self.move_cursor_to(0, 0);
            }
        }
    }

    fn csi_dispatch(&mut self, csi: CsiAction) {
        match csi.final_byte {
            b'A' => self.move_cursor_by(-(csi.param_or(0, 1) as isize), 0),
            b'B' => self.move_cursor_by(csi.param_or(0, 1) as isize, 0),
            b'C' => self.move_cursor_by(0, csi.param_or(0, 1) as isize),
            b'D' => self.move_cursor_by(0, -(csi.param_or(0, 1) as isize)),
            b'H' | b'f' => {
                let row = csi.param_or(0, 1) as usize - 1;
                let col = csi.param_or(1, 1) as usize - 1;
                self.move_cursor_to(row, col);
            }
            b'd' => {
                let col = self.cursor().1;
                self.move_cursor_to(csi.param_or(0, 1) as usize - 1, col);
            }
            b'G' => {
                let row = self.cursor().0;
                self.move_cursor_to(row, csi.param_or(0, 1) as usize - 1);
            }
            b'J' => {
                let mode = match csi.param(0, 0) {
                    0 => EraseMode::ToEnd,
                    1 => EraseMode::ToStart,
                    _ => EraseMode::All,
                };
                let color = self.colors;
                self.screen_mut().erase_in_display(mode, color);
            }
            b'K' => {
                let mode = match csi.param(0, 0) {
                    0 => EraseMode::ToEnd,
                    1 => EraseMode::ToStart,
                    _ => EraseMode::All,
                };
                let color = self.colors;
                self.screen_mut().erase_in_line(mode, color);
            }
            b'@' => {
                let n = csi.param_or(0, 1) as usize;
                let color = self.colors;
                self.screen_mut().insert_chars(n, color);
            }
            b'P' => {
                let n = csi.param_or(0, 1) as usize;
                let color = self.colors;
                self.screen_mut().delete_chars(n, color);
            }
            b'L' => {
                let n = csi.param_or(0, 1) as usize;
                let at = self.cursor().0;
                let (top, bottom, color) = (self.scroll_top, self.scroll_bottom, self.colors);
                self.screen_mut().insert_lines(at, top, bottom, n, color);
                self.fire_refresh();
            }
            b'M' => {
                let n = csi.param_or(0, 1) as usize;
                let at = self.cursor().0;
                let (top, bottom, color) = (self.scroll_top, self.scroll_bottom, self.colors);
                self.screen_mut().delete_lines(at, top, bottom, n, color);
                self.fire_refresh();
            }
            b'S' => {
                // Region scroll only; nothing enters scrollback.
                self.scroll_region_up(csi.param_or(0, 1) as usize);
            }
            b'T' => {
                self.scroll_region_down(csi.param_or(0, 1) as usize);
            }
            b'r' => {
                let top = csi.param_or(0, 1) as usize;
                let bottom = csi.param_or(1, 1) as usize;
                if top <= bottom && bottom <= self.rows {
                    self.scroll_top = top - 1;
                    self.scroll_bottom = bottom - 1;
                } else {
                    self.scroll_top = 0;
                    self.scroll_bottom = self.rows - 1;
                }
            }
            b'm' => self.sgr(&csi.params),
            b'n' => {
                if csi.params == [6] {
                    let (row, col) = self.cursor();
                    let mut reply = Vec::with_capacity(16);
                    let _ = write!(reply, "\x1b[{};{}R", row + 1, col + 1);
                    self.reply(&reply);
                } else {
                    self.log_unhandled(&csi);
                }
            }
            b'c' => {
                if csi.private {
                    self.reply(b"\x1b[>0;0;0c");
                } else if csi.params == [0] {
                    self.reply(b"\x1b[?1;0c");
                } else {
                    self.log_unhandled(&csi);
                }
            }
            b'h' | b'l' if csi.private => match csi.params.first().copied() {
                Some(1049) => {
                    if csi.final_byte == b'h' {
                        self.enter_alt_screen();
                    } else {
                        self.leave_alt_screen();
                    }
                }
                // Cursor show/blink, autowrap, bracketed paste: accepted
                // without any state to track.
                Some(25) | Some(12) | Some(7) | Some(2004) => {}
                _ => self.log_unhandled(&csi),
            },
            b't' => match csi.params.first().copied() {
                Some(11) => self.reply(b"\x1b[1t"),
                // Title and icon stack operations are ignored.
                Some(22) | Some(23) => {}
                _ => self.log_unhandled(&csi),
            },
            _ => self.log_unhandled(&csi),
        }
    }

    fn sgr(&mut self, params: &[u16]) {
        if params.is_empty() {
            self.reset_attributes();
            return;
        }

        let mut i = 0;
        while i < params.len() {
            let param = params[i];
            match param {
                0 => self.reset_attributes(),
                8 => self.screen_mut().attr_protected = true,
                30..=37 => self.colors.fg = (param - 30) as u8,
                39 => self.colors.fg = self.default_colors.fg,
                40..=47 => self.colors.bg = (param - 40) as u8,
                49 => self.colors.bg = self.default_colors.bg,
                90..=97 => self.colors.fg = (param - 90 + 8) as u8,
                100..=107 => self.colors.bg = (param - 100 + 8) as u8,
                38 => {
                    if let Some(index) = extended_color(params, &mut i) {
                        self.colors.fg = index;
                    }
                }
                48 => {
                    if let Some(index) = extended_color(params, &mut i) {
                        self.colors.bg = index;
                    }
                }
                other => {
                    log::debug!("ignored SGR parameter {}", other);
                }
            }
            i += 1;
        }
    }

    fn reset_attributes(&mut self) {
        self.colors = self.default_colors;
        self.screen_mut().attr_protected = false;
    }

    fn enter_alt_screen(&mut self) {
        self.alt_active = true;
        let color = self.colors;
        self.screen_mut().clear(color);
        self.move_cursor_to(0, 0);
        self.fire_refresh();
    }

    fn leave_alt_screen(&mut self) {
        self.alt_active = false;
        self.fire_refresh();
    }

    fn reply(&mut self, bytes: &[u8]) {
        if let Some(cb) = self.hooks.write_to_master.as_mut() {
            cb(bytes);
        }
    }

    fn fire_refresh(&mut self) {
        if let Some(cb) = self.hooks.refresh.as_mut() {
            cb();
        }
    }

    fn log_unhandled(&self, csi: &CsiAction) {
        log::warn!(
            "unhandled CSI sequence: CSI {}{:?} '{}'",
            if csi.private { "private " } else { "" },
            csi.params,
            csi.final_byte as char
        );
    }
}

/// Consume a `38;5;N` / `48;5;N` extended color, returning the palette
/// index. The true-color `;2;r;g;b` form is consumed but carries no
/// meaning here.
fn extended_color(params: &[u16], i: &mut usize) -> Option<u8> {
    match params.get(*i + 1).copied() {
        Some(5) if *i + 2 < params.len() => {
            *i += 2;
            Some(params[*i].min(255) as u8)
        }
        Some(2) => {
            *i += 4;
            None
        }
        _ => None,
    }
}
