//! Parser actions
//!
//! Semantic operations produced by the parser, applied to the terminal by
//! the executor.

/// An action produced by feeding one byte to the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Write a printable byte at the cursor
    Print(u8),

    /// Execute a control byte (`\n`, `\r`, `\x08`, `\t`)
    Execute(u8),

    /// A completed CSI sequence
    Csi(CsiAction),

    /// A completed non-CSI escape sequence
    Esc(EscAction),
}

/// A parsed CSI sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsiAction {
    /// Semicolon-separated decimal parameters; empty when none were sent
    pub params: Vec<u16>,
    /// Set when the sequence carried a `?` or `>` marker
    pub private: bool,
    /// The final byte identifying the command
    pub final_byte: u8,
}

impl CsiAction {
    /// Parameter at `index`, with absent and zero both mapping to `default`
    pub fn param_or(&self, index: usize, default: u16) -> u16 {
        match self.params.get(index) {
            Some(&0) | None => default,
            Some(&v) => v,
        }
    }

    /// Parameter at `index`, absent mapping to `default`, zero kept as zero
    pub fn param(&self, index: usize, default: u16) -> u16 {
        self.params.get(index).copied().unwrap_or(default)
    }
}

/// Non-CSI escape sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscAction {
    /// ESC 7 - save the cursor position (DECSC)
    SaveCursor,
    /// ESC 8 - restore the saved cursor position (DECRC)
    RestoreCursor,
    /// ESC c - full reset (RIS)
    FullReset,
    /// ESC D - index: cursor down one row
    Index,
    /// ESC E - next line: cursor to start of the following row
    NextLine,
    /// ESC M - reverse index: scroll the region down
    ReverseIndex,
    /// ESC Z - identify terminal (DECID)
    Identify,
    /// ESC \ - string terminator; nothing to do by itself
    StringTerminator,
    /// ESC ( x - designate the G0 character set
    DesignateG0(u8),
    /// ESC ) x - designate the G1 character set
    DesignateG1(u8),
    /// ESC # 8 - screen alignment test (DECALN)
    AlignmentTest,
}
