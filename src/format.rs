//! Turning programs back into rule text.
use std::fmt;

use crate::rule::Program;

/// A program displayed with `separator` between its tokens.
pub struct Separated<'a> {
    program: &'a Program,
    separator: &'a str,
}

impl Program {
    /// `program.display_with(" ")` displays `program` as a rule line, each
    /// token written as its symbol followed directly by its parameters, and
    /// `" "` between tokens.
    #[must_use]
    pub fn display_with<'a>(&'a self, separator: &'a str) -> Separated<'a> {
        Separated { program: self, separator }
    }
}

impl fmt::Display for Separated<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tokens = self.program.tokens().iter();
        if let Some(first) = tokens.next() {
            write!(f, "{first}")?;
            for token in tokens {
                write!(f, "{}{token}", self.separator)?;
            }
        }
        Ok(())
    }
}

/// Formats each program with `separator` between tokens, and joins the
/// programs with newlines. There is no newline after the last program.
pub fn format<'a>(programs: impl IntoIterator<Item = &'a Program>, separator: &str) -> String {
    let mut text = String::new();
    for (n, program) in programs.into_iter().enumerate() {
        if n > 0 {
            text.push('\n');
        }
        text.push_str(&program.display_with(separator).to_string());
    }
    text
}

/// The order in which a result's programs are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    /// The order in which programs were first seen, first operand first
    #[default]
    Appearance,
    /// Token by token, comparing each token's symbol and then its parameters
    Sorted,
}

/// Byte Order Mark and line terminator for output, taken from the first
/// operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Write a UTF-8 Byte Order Mark first
    pub bom: bool,
    /// `"\n"` or `"\r\n"`
    pub line_terminator: &'static str,
}

impl Default for Layout {
    fn default() -> Self {
        Layout { bom: false, line_terminator: "\n" }
    }
}

impl Layout {
    pub(crate) fn bom_bytes(self) -> &'static [u8] {
        if self.bom {
            "\u{FEFF}".as_bytes()
        } else {
            b""
        }
    }
}

/// Everything about how a result is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputStyle {
    /// Written between the tokens of a program
    pub separator: String,
    /// Order of the output lines
    pub order: Order,
    /// BOM and line terminator
    pub layout: Layout,
}

impl Default for OutputStyle {
    fn default() -> Self {
        OutputStyle { separator: " ".to_string(), order: Order::default(), layout: Layout::default() }
    }
}
