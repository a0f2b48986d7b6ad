//! `hcrule` reads hashcat rule files. Each line of a rule file is a small
//! program of opcodes, and two lines are the same rule if they have the same
//! opcodes and parameters, however they're spaced. The `parse` module turns
//! text into programs, the `operations` module cleans, diffs and merges sets
//! of programs, and the `format` module writes them back out.
//!
//! The `args` module parses the command line, and the `operands` module
//! hides I/O details.
//!
//! Current Limitations:
//! * The parser knows nothing about what a rule does to a password, so it
//!   doesn't check parameters: `T` accepts any character as a position, not
//!   just `0`-`9` and `A`-`Z`.
//! * Only a `#` that starts a line begins a comment. A trailing comment, as
//!   in `l $1 # note`, makes the whole line invalid, and it is skipped with a
//!   warning.

#![cfg_attr(debug_assertions, allow(dead_code, unused_imports))]
#![deny(unused_must_use)]
#![deny(clippy::all)]
#![allow(clippy::needless_return)]
#![deny(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![deny(missing_docs)]

pub mod args;
pub mod error;
pub mod format;
pub mod opcode;
pub mod operands;
pub mod operations;
pub mod parse;
pub mod rule;
mod set;

pub use crate::opcode::{Opcode, OpcodeTable};
pub use crate::parse::{parse, Diagnostic, Parsed};
pub use crate::rule::{Program, Token};
