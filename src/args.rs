//! Code to parse the command line using `clap`, and definitions of the
//! parsed result

use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use std::path::PathBuf;

use crate::format::{Order, OutputStyle};

/// Returns the parsed command line: the `Args` return value's `op` field is
/// the action requested, and the `files` field holds the rule files to take
/// as operands.
#[must_use]
pub fn parsed() -> Args {
    let parsed = CliArgs::parse();
    let op = match parsed.op {
        CliName::Opcodes => None,
        CliName::Clean => Some(OpName::Clean),
        CliName::Diff => Some(OpName::Diff),
        CliName::Merge => Some(OpName::Merge),
    };
    match (op, parsed.files.len()) {
        (Some(_), 0) => CliArgs::command()
            .error(ErrorKind::MissingRequiredArgument, "at least one rule file is required")
            .exit(),
        (Some(OpName::Clean), n) if n > 1 => CliArgs::command()
            .error(ErrorKind::TooManyValues, "clean takes exactly one rule file")
            .exit(),
        (None, n) if n > 0 => CliArgs::command()
            .error(ErrorKind::TooManyValues, "opcodes takes no rule files")
            .exit(),
        _ => {}
    }
    let order = if parsed.sort { Order::Sorted } else { Order::Appearance };
    Args {
        op,
        files: parsed.files,
        output: parsed.output,
        separator: parsed.separator,
        order,
        strict: parsed.strict,
        quiet: parsed.quiet,
    }
}

/// The command line, checked and converted for use by `main`
#[derive(Debug)]
pub struct Args {
    /// `op` is the set operation requested, or `None` to list the opcode table
    pub op: Option<OpName>,
    /// `files` is the list of rule files from the command line
    pub files: Vec<PathBuf>,
    /// Write here instead of standard output
    pub output: Option<PathBuf>,
    /// Put between the tokens of each output rule
    pub separator: String,
    /// Output order
    pub order: Order,
    /// Fail if any rule file had problems
    pub strict: bool,
    /// Log only errors
    pub quiet: bool,
}

impl Args {
    /// The `OutputStyle` the command line asks for. The layout is left at its
    /// default; it comes from the first operand.
    #[must_use]
    pub fn output_style(&self) -> OutputStyle {
        OutputStyle { separator: self.separator.clone(), order: self.order, ..OutputStyle::default() }
    }
}

/// The operations on rule sets
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum OpName {
    /// Print the rules of a single file, normalized and without duplicates
    Clean,
    /// Print the rules present in the first file but no other
    Diff,
    /// Print the rules present in any file
    Merge,
}

#[derive(Debug, Parser)]
#[command(name = "hcrule", version)]
/// Parse hashcat rule files, and print their rules cleaned up, their
/// difference, or their merge.
struct CliArgs {
    #[arg(value_enum)]
    /// `op` is the operation requested
    op: CliName,
    #[arg(name = "Rule files")]
    /// `files` is the list of rule files from the command line
    files: Vec<PathBuf>,
    /// Write the result to this file instead of standard output
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Separator written between the operations of each rule
    #[arg(short, long, default_value = " ", value_name = "SEP")]
    separator: String,
    /// Sort the output rules instead of keeping the order they first appear in
    #[arg(long)]
    sort: bool,
    /// Exit with an error if any rule file contains invalid or incomplete rules
    #[arg(long)]
    strict: bool,
    /// Don't warn about invalid or incomplete rules
    #[arg(short, long)]
    quiet: bool,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, ValueEnum)]
/// Name of the requested operation
enum CliName {
    /// Print the rules of a single file, normalized and without duplicates
    Clean,
    /// Print the rules present in the first file but no other
    #[value(alias = "difference")]
    Diff,
    /// Print the rules present in any file
    Merge,
    /// Print the opcode table
    Opcodes,
}
