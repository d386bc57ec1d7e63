//! Parser state machine
//!
//! Recognizes control characters, ESC-introduced sequences, CSI
//! parameterized sequences, OSC strings, charset designations, and the
//! `ESC #` DEC specials, one byte at a time. Partial sequences survive
//! across `feed` calls indefinitely; there is no timeout.
//!
//! The parser holds only per-sequence scratch (parameter buffer, OSC
//! buffer, private marker). Interpretation lives in the terminal executor,
//! which applies the [`Action`] values produced here.

use super::action::{Action, CsiAction, EscAction};

/// Parameter scratch capacity; further bytes are silently dropped
const PARAM_BUF_MAX: usize = 31;

/// OSC scratch capacity; further bytes are silently dropped
const OSC_BUF_MAX: usize = 63;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    Escape,
    Csi,
    Osc,
    CharsetG0,
    CharsetG1,
    Hash,
}

/// The escape-sequence parser
#[derive(Debug, Clone)]
pub struct Parser {
    state: State,
    /// Raw CSI parameter bytes (digits and semicolons)
    params: Vec<u8>,
    /// Set when the sequence carried a `?` or `>` marker
    private: bool,
    /// OSC payload; collected only to honor the terminator, then dropped
    osc: Vec<u8>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a parser in the normal state
    pub fn new() -> Self {
        Self {
            state: State::Normal,
            params: Vec::with_capacity(PARAM_BUF_MAX),
            private: false,
            osc: Vec::with_capacity(OSC_BUF_MAX),
        }
    }

    /// Reset to the normal state, dropping any partial sequence
    pub fn reset(&mut self) {
        self.state = State::Normal;
        self.clear_scratch();
    }

    fn clear_scratch(&mut self) {
        self.params.clear();
        self.private = false;
        self.osc.clear();
    }

    /// Feed a byte slice, collecting the resulting actions
    pub fn parse(&mut self, data: &[u8]) -> Vec<Action> {
        data.iter().filter_map(|&byte| self.advance(byte)).collect()
    }

    /// Feed a single byte
    pub fn advance(&mut self, byte: u8) -> Option<Action> {
        match self.state {
            State::Normal => self.process_normal(byte),
            State::Escape => self.process_escape(byte),
            State::Csi => self.process_csi(byte),
            State::Osc => self.process_osc(byte),
            State::CharsetG0 => {
                self.state = State::Normal;
                Some(Action::Esc(EscAction::DesignateG0(byte)))
            }
            State::CharsetG1 => {
                self.state = State::Normal;
                Some(Action::Esc(EscAction::DesignateG1(byte)))
            }
            State::Hash => {
                self.state = State::Normal;
                (byte == b'8').then_some(Action::Esc(EscAction::AlignmentTest))
            }
        }
    }

    fn process_normal(&mut self, byte: u8) -> Option<Action> {
        match byte {
            0x1B => {
                self.state = State::Escape;
                self.clear_scratch();
                None
            }
            0x20..=0x7E => Some(Action::Print(byte)),
            b'\n' | b'\r' | 0x08 | b'\t' => Some(Action::Execute(byte)),
            _ => None,
        }
    }

    fn process_escape(&mut self, byte: u8) -> Option<Action> {
        match byte {
            b'[' => {
                self.state = State::Csi;
                self.params.clear();
                self.private = false;
                return None;
            }
            b']' => {
                self.state = State::Osc;
                self.osc.clear();
                return None;
            }
            b'(' => {
                self.state = State::CharsetG0;
                return None;
            }
            b')' => {
                self.state = State::CharsetG1;
                return None;
            }
            b'#' => {
                self.state = State::Hash;
                return None;
            }
            _ => {}
        }

        self.state = State::Normal;
        match byte {
            b'7' => Some(Action::Esc(EscAction::SaveCursor)),
            b'8' => Some(Action::Esc(EscAction::RestoreCursor)),
            b'c' => Some(Action::Esc(EscAction::FullReset)),
            b'D' => Some(Action::Esc(EscAction::Index)),
            b'E' => Some(Action::Esc(EscAction::NextLine)),
            b'M' => Some(Action::Esc(EscAction::ReverseIndex)),
            b'Z' => Some(Action::Esc(EscAction::Identify)),
            b'\\' => Some(Action::Esc(EscAction::StringTerminator)),
            _ => None,
        }
    }

    fn process_csi(&mut self, byte: u8) -> Option<Action> {
        match byte {
            b'?' | b'>' => {
                // Private markers set the flag but never enter the
                // parameter buffer.
                self.private = true;
                None
            }
            b'0'..=b'9' | b';' => {
                if self.params.len() < PARAM_BUF_MAX {
                    self.params.push(byte);
                }
                None
            }
            0x40..=0x7E => {
                self.state = State::Normal;
                Some(self.dispatch_csi(byte))
            }
            _ => {
                // Anything else aborts the sequence.
                self.state = State::Normal;
                None
            }
        }
    }

    fn dispatch_csi(&mut self, final_byte: u8) -> Action {
        let params = if self.params.is_empty() {
            Vec::new()
        } else {
            self.params
                .split(|&b| b == b';')
                .map(|digits| {
                    digits
                        .iter()
                        .fold(0u16, |acc, &d| {
                            acc.saturating_mul(10).saturating_add((d - b'0') as u16)
                        })
                })
                .collect()
        };

        Action::Csi(CsiAction {
            params,
            private: self.private,
            final_byte,
        })
    }

    fn process_osc(&mut self, byte: u8) -> Option<Action> {
        match byte {
            0x07 => {
                // BEL terminates; the payload carries no core semantics.
                self.state = State::Normal;
                None
            }
            0x1B => {
                // ESC here is usually the start of an ST terminator;
                // hand over so a following backslash is absorbed.
                self.state = State::Escape;
                None
            }
            _ => {
                if self.osc.len() < OSC_BUF_MAX {
                    self.osc.push(byte);
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        let mut parser = Parser::new();
        let actions = parser.parse(b"Hi");
        assert_eq!(actions, vec![Action::Print(b'H'), Action::Print(b'i')]);
    }

    #[test]
    fn test_controls_execute() {
        let mut parser = Parser::new();
        let actions = parser.parse(b"A\nB\r");
        assert_eq!(
            actions,
            vec![
                Action::Print(b'A'),
                Action::Execute(b'\n'),
                Action::Print(b'B'),
                Action::Execute(b'\r'),
            ]
        );
    }

    #[test]
    fn test_other_controls_ignored() {
        let mut parser = Parser::new();
        assert!(parser.parse(&[0x00, 0x07, 0x0B, 0x7F]).is_empty());
    }

    #[test]
    fn test_csi_with_params() {
        let mut parser = Parser::new();
        let actions = parser.parse(b"\x1b[10;20H");
        assert_eq!(actions.len(), 1);
        match &actions[0] {
            Action::Csi(csi) => {
                assert_eq!(csi.params, vec![10, 20]);
                assert_eq!(csi.final_byte, b'H');
                assert!(!csi.private);
            }
            other => panic!("expected CSI, got {:?}", other),
        }
    }

    #[test]
    fn test_csi_empty_params() {
        let mut parser = Parser::new();
        let actions = parser.parse(b"\x1b[H");
        match &actions[0] {
            Action::Csi(csi) => assert!(csi.params.is_empty()),
            other => panic!("expected CSI, got {:?}", other),
        }
    }

    #[test]
    fn test_csi_private_marker() {
        let mut parser = Parser::new();
        let actions = parser.parse(b"\x1b[?1049h");
        match &actions[0] {
            Action::Csi(csi) => {
                assert!(csi.private);
                assert_eq!(csi.params, vec![1049]);
                assert_eq!(csi.final_byte, b'h');
            }
            other => panic!("expected CSI, got {:?}", other),
        }
    }

    #[test]
    fn test_csi_aborts_on_garbage() {
        let mut parser = Parser::new();
        // 0x18 inside a CSI abandons it; the trailing A prints.
        let actions = parser.parse(b"\x1b[5\x18A");
        assert_eq!(actions, vec![Action::Print(b'A')]);
    }

    #[test]
    fn test_csi_param_overflow_truncates() {
        let mut parser = Parser::new();
        let mut input = b"\x1b[".to_vec();
        input.extend(std::iter::repeat(b'1').take(64));
        input.push(b'm');
        let actions = parser.parse(&input);
        match &actions[0] {
            Action::Csi(csi) => {
                // Thirty-one digits survive; the u16 parse saturates.
                assert_eq!(csi.params, vec![u16::MAX]);
            }
            other => panic!("expected CSI, got {:?}", other),
        }
    }

    #[test]
    fn test_esc_immediates() {
        let mut parser = Parser::new();
        let actions = parser.parse(b"\x1b7\x1b8\x1bM");
        assert_eq!(
            actions,
            vec![
                Action::Esc(EscAction::SaveCursor),
                Action::Esc(EscAction::RestoreCursor),
                Action::Esc(EscAction::ReverseIndex),
            ]
        );
    }

    #[test]
    fn test_unknown_esc_returns_to_normal() {
        let mut parser = Parser::new();
        let actions = parser.parse(b"\x1bqA");
        assert_eq!(actions, vec![Action::Print(b'A')]);
    }

    #[test]
    fn test_charset_designation() {
        let mut parser = Parser::new();
        let actions = parser.parse(b"\x1b(B\x1b)0");
        assert_eq!(
            actions,
            vec![
                Action::Esc(EscAction::DesignateG0(b'B')),
                Action::Esc(EscAction::DesignateG1(b'0')),
            ]
        );
    }

    #[test]
    fn test_decaln() {
        let mut parser = Parser::new();
        let actions = parser.parse(b"\x1b#8");
        assert_eq!(actions, vec![Action::Esc(EscAction::AlignmentTest)]);
    }

    #[test]
    fn test_hash_other_byte_ignored() {
        let mut parser = Parser::new();
        let actions = parser.parse(b"\x1b#5A");
        assert_eq!(actions, vec![Action::Print(b'A')]);
    }

    #[test]
    fn test_osc_bel_terminated() {
        let mut parser = Parser::new();
        let actions = parser.parse(b"\x1b]0;some title\x07A");
        assert_eq!(actions, vec![Action::Print(b'A')]);
    }

    #[test]
    fn test_osc_st_terminated() {
        let mut parser = Parser::new();
        let actions = parser.parse(b"\x1b]0;t\x1b\\A");
        assert_eq!(
            actions,
            vec![
                Action::Esc(EscAction::StringTerminator),
                Action::Print(b'A'),
            ]
        );
    }

    #[test]
    fn test_osc_overflow_is_silent() {
        let mut parser = Parser::new();
        let mut input = b"\x1b]".to_vec();
        input.extend(std::iter::repeat(b'x').take(500));
        input.push(0x07);
        input.push(b'A');
        let actions = parser.parse(&input);
        assert_eq!(actions, vec![Action::Print(b'A')]);
    }

    #[test]
    fn test_sequence_survives_feed_boundary() {
        let mut parser = Parser::new();
        assert!(parser.parse(b"\x1b[").is_empty());
        assert!(parser.parse(b"5").is_empty());
        let actions = parser.parse(b"A");
        match &actions[0] {
            Action::Csi(csi) => {
                assert_eq!(csi.params, vec![5]);
                assert_eq!(csi.final_byte, b'A');
            }
            other => panic!("expected CSI, got {:?}", other),
        }
    }
}
