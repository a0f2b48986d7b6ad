//! The rule parser. Rule text is read one character at a time by a small
//! state machine (`Parser`), because an opcode's parameters are whatever
//! characters follow it, newlines included, so the text can't simply be
//! split into lines and words.
//!
//! Malformed input never stops the parse. An unknown character throws away
//! the rest of its line, and a rule cut short by the end of the input throws
//! away that rule; each produces a `Diagnostic` returned alongside the
//! programs.
use std::{fmt, mem};

use thiserror::Error;

use crate::opcode::{Opcode, OpcodeTable};
use crate::rule::{Program, Token};

/// A 1-based line and column. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    /// Line number, starting at 1
    pub line: usize,
    /// Column number, starting at 1
    pub column: usize,
}

impl Position {
    const START: Position = Position { line: 1, column: 1 };
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Something wrong with the input that the parser recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// A character that isn't an opcode, where an opcode was expected. The
    /// whole line is dropped.
    #[error("{position}: invalid character {found:?} in `{line}`")]
    InvalidOpcode {
        /// Where the character was found
        position: Position,
        /// The offending character
        found: char,
        /// The text of the dropped line
        line: String,
    },
    /// The input ended while an opcode was still owed parameters. The
    /// unfinished rule is dropped.
    #[error("{position}: rule `{partial}` ({name}) is incomplete, expected {missing} more character(s)")]
    IncompleteRule {
        /// Where the unfinished opcode started
        position: Position,
        /// The opcode and the parameters read so far
        partial: String,
        /// The opcode's name
        name: &'static str,
        /// How many parameter characters were missing
        missing: u8,
    },
}

/// The programs found in a rule file, in the order they first appeared, and
/// the diagnostics for everything that had to be skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    /// Well-formed programs in source order, duplicates included
    pub programs: Vec<Program>,
    /// Problems found in the input, in source order
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses `text` with the opcodes in `table`.
#[must_use]
pub fn parse(text: &str, table: &OpcodeTable) -> Parsed {
    text.chars()
        .fold(Parser::new(table), |mut parser, ch| {
            parser.feed(ch);
            parser
        })
        .finish()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    LineStart,
    AwaitingParams { opcode: Opcode, remaining: u8, params: String, start: Position },
    SkippingInvalidLine,
}

/// The parser's state and everything it has accumulated so far. Call
/// `feed` with each character of the input, then `finish`.
#[derive(Debug)]
pub struct Parser<'t> {
    table: &'t OpcodeTable,
    state: State,
    program: Vec<Token>,
    position: Position,
    line_text: String,
    invalid: Option<(Position, char)>,
    programs: Vec<Program>,
    diagnostics: Vec<Diagnostic>,
}

impl<'t> Parser<'t> {
    /// A parser at the start of its input
    #[must_use]
    pub fn new(table: &'t OpcodeTable) -> Self {
        Parser {
            table,
            state: State::LineStart,
            program: Vec::new(),
            position: Position::START,
            line_text: String::new(),
            invalid: None,
            programs: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Consumes the next character of the input
    pub fn feed(&mut self, ch: char) {
        let here = self.position;
        self.track(ch);
        self.state = match mem::replace(&mut self.state, State::LineStart) {
            State::LineStart => self.at_line_start(ch, here),
            State::AwaitingParams { opcode, remaining, mut params, start } => {
                params.push(ch);
                if remaining > 1 {
                    State::AwaitingParams { opcode, remaining: remaining - 1, params, start }
                } else {
                    self.program.push(Token::with_params(opcode.symbol, params));
                    State::LineStart
                }
            }
            State::SkippingInvalidLine if ch == '\n' => State::LineStart,
            State::SkippingInvalidLine => State::SkippingInvalidLine,
        };
    }

    /// Ends the input and returns what was parsed
    #[must_use]
    pub fn finish(mut self) -> Parsed {
        self.end_physical_line();
        match mem::replace(&mut self.state, State::LineStart) {
            State::LineStart => self.end_program(),
            State::AwaitingParams { opcode, remaining, params, start } => {
                self.program.clear();
                self.diagnostics.push(Diagnostic::IncompleteRule {
                    position: start,
                    partial: format!("{}{}", opcode.symbol, params),
                    name: opcode.name,
                    missing: remaining,
                });
            }
            State::SkippingInvalidLine => {}
        }
        Parsed { programs: self.programs, diagnostics: self.diagnostics }
    }

    // Between tokens: whitespace is skipped, `\n` ends the program, and any
    // other character must be an opcode.
    fn at_line_start(&mut self, ch: char, here: Position) -> State {
        let table = self.table;
        match ch {
            '\n' => {
                self.end_program();
                State::LineStart
            }
            ' ' | '\t' | '\r' => State::LineStart,
            '#' if self.program.is_empty() => State::SkippingInvalidLine,
            _ => match table.lookup(ch) {
                Some(opcode) if opcode.arity == 0 => {
                    self.program.push(Token::bare(ch));
                    State::LineStart
                }
                Some(&opcode) => State::AwaitingParams {
                    opcode,
                    remaining: opcode.arity,
                    params: String::with_capacity(opcode.arity.into()),
                    start: here,
                },
                None => {
                    self.invalid = Some((here, ch));
                    self.program.clear();
                    State::SkippingInvalidLine
                }
            },
        }
    }

    fn end_program(&mut self) {
        if !self.program.is_empty() {
            self.programs.push(Program::from(mem::take(&mut self.program)));
        }
    }

    // Keeps `position` and the text of the current physical line up to date.
    fn track(&mut self, ch: char) {
        if ch == '\n' {
            self.end_physical_line();
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.line_text.push(ch);
            self.position.column += 1;
        }
    }

    fn end_physical_line(&mut self) {
        let line = mem::take(&mut self.line_text);
        if let Some((position, found)) = self.invalid.take() {
            let line = line.trim_end_matches('\r').to_string();
            self.diagnostics.push(Diagnostic::InvalidOpcode { position, found, line });
        }
    }
}
