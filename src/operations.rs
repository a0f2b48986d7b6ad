//! Houses the `calculate` function
//!

use anyhow::Result;

use crate::args::OpName;
use crate::format::OutputStyle;
use crate::operands::RuleFile;
use crate::parse::Parsed;
use crate::rule::Program;
use crate::set::RuleSet;

/// The `calculate` function's only requirement for its second and succeeding
/// operands is that they implement `for_program`. The `LaterOperand` trait
/// codifies that.
pub trait LaterOperand {
    /// The call `o.for_program(|program| ...)` calls the given closure for
    /// each `Program` in `o`.
    fn for_program(self, for_each_program: impl FnMut(&Program)) -> Result<()>;
}

impl LaterOperand for Parsed {
    fn for_program(self, for_each_program: impl FnMut(&Program)) -> Result<()> {
        self.programs.iter().for_each(for_each_program);
        Ok(())
    }
}

impl LaterOperand for RuleFile {
    fn for_program(self, for_each_program: impl FnMut(&Program)) -> Result<()> {
        self.parsed().programs.iter().for_each(for_each_program);
        Ok(())
    }
}

/// Calculates and prints the operation named by `op`. Each operand is
/// treated as a set of programs:
///
/// * `OpName::Clean` prints the programs of the first operand, once each,
///   and ignores the other operands,
/// * `OpName::Diff` prints the programs that occur in the first operand and no other,
/// * `OpName::Merge` prints the programs that occur in any operand.
///
/// Output follows `style`; in first-appearance order, the first operand's
/// programs come first.
pub fn calculate<O: LaterOperand>(
    operation: OpName,
    first_operand: &[Program],
    rest: impl Iterator<Item = Result<O>>,
    out: impl std::io::Write,
    style: &OutputStyle,
) -> Result<()> {
    match operation {
        OpName::Clean => {
            let set = RuleSet::from_programs(first_operand, ());
            set.output_to(out, style)
        }

        OpName::Diff => {
            let mut set = RuleSet::from_programs(first_operand, true);
            diff(&mut set, rest)?;
            set.output_to(out, style)
        }

        OpName::Merge => {
            let mut set = RuleSet::from_programs(first_operand, ());
            merge(&mut set, rest)?;
            set.output_to(out, style)
        }
    }
}

/// `Merge` doesn't need bookkeeping, so we use the unit type as its bookkeeping
/// value.
fn merge<O: LaterOperand>(
    set: &mut RuleSet<()>,
    rest: impl Iterator<Item = Result<O>>,
) -> Result<()> {
    for operand in rest {
        operand?.for_program(|program| set.insert(program, ()))?;
    }
    Ok(())
}

/// For `Diff`, the bookkeeping value of `true` means we've seen the program
/// only in the first operand, and `false` that the program is present in
/// some other operand.
fn diff<O: LaterOperand>(
    set: &mut RuleSet<bool>,
    rest: impl Iterator<Item = Result<O>>,
) -> Result<()> {
    for operand in rest {
        operand?.for_program(|program| {
            if let Some(keepme) = set.get_mut(program) {
                *keepme = false;
            }
        })?;
    }
    set.retain(|keepme| *keepme);
    Ok(())
}

#[allow(clippy::pedantic)]
#[cfg(test)]
mod test {
    use super::*;
    use crate::format::Order;
    use crate::opcode::OpcodeTable;
    use crate::operands::first_and_rest;
    use crate::parse::parse;
    use assert_fs::{prelude::*, TempDir};
    use itertools::Itertools;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn calc(operation: OpName, operands: &[&str]) -> String {
        let temp_dir = TempDir::new().unwrap();
        let mut paths = Vec::new();
        for operand in operands {
            let name = format!("operand{}.rule", paths.len());
            let op = temp_dir.child(name);
            op.write_str(operand).unwrap();
            paths.push(PathBuf::from(op.path()));
        }

        let (first, rest) = first_and_rest(&paths).unwrap().unwrap();
        let mut answer = Vec::new();
        let rest = rest.map(|operand| operand.map_err(anyhow::Error::from));
        calculate(operation, &first.parsed().programs, rest, &mut answer, &OutputStyle::default())
            .unwrap();
        let slow = String::from_utf8(answer).unwrap();
        let fast = fast_calc(operation, operands, &OutputStyle::default());
        assert_eq!(slow, fast);
        slow
    }

    // Like `calc`, but does no disk I/O
    fn fast_calc(operation: OpName, operands: &[&str], style: &OutputStyle) -> String {
        let first = parsed(operands[0]);
        let rest = operands[1..].iter().map(|o| Ok(parsed(o)));
        let mut answer = Vec::new();
        calculate(operation, &first.programs, rest, &mut answer, style).unwrap();
        String::from_utf8(answer).unwrap()
    }

    fn parsed(text: &str) -> Parsed {
        parse(text, OpcodeTable::hashcat())
    }

    fn lines(output: &str) -> BTreeSet<&str> {
        output.lines().collect()
    }

    use self::OpName::*;

    #[test]
    fn given_a_single_argument_all_ops_return_its_programs_in_order_without_dups() {
        let arg = ["u\nl d\n$1 $2\nl  d\n# comment\nu\n$1$2\n"];
        let uniq = "u\nl d\n$1 $2\n";
        for op in &[Clean, Diff, Merge] {
            assert_eq!(calc(*op, &arg), uniq, "for {op:?}");
        }
    }

    #[test]
    fn results_for_each_operation() {
        let args = [
            "l\nu\nc\n$1\n",  // Has "l" (and "c", "$1")
            "u\nc\n$1 $2\n",  // Has "u" (and "c")
            "c\n$1$2\n^x\n",  // Has "^x" (and "c")
        ];
        assert_eq!(calc(Clean, &args), "l\nu\nc\n$1\n", "for {Clean:?}");
        assert_eq!(calc(Diff, &args), "l\n$1\n", "for {Diff:?}");
        assert_eq!(calc(Merge, &args), "l\nu\nc\n$1\n$1 $2\n^x\n", "for {Merge:?}");
    }

    #[test]
    fn diff_of_a_set_with_itself_is_empty() {
        let a = "l\nu d\n$1 $2 $3\n";
        assert_eq!(calc(Diff, &[a, a]), "");
        assert_eq!(calc(Diff, &[a, "\n# nothing here\n", a]), "");
    }

    #[test]
    fn diff_with_an_empty_set_is_the_set() {
        let a = "l\nu d\n$1 $2 $3\nl\n";
        assert_eq!(calc(Diff, &[a, ""]), calc(Clean, &[a]));
    }

    #[test]
    fn diff_removes_programs_from_every_later_operand() {
        let a = "l\nu\nc\nC\n";
        assert_eq!(calc(Diff, &[a, "u\n", "C\n"]), "l\nc\n");
        assert_eq!(calc(Diff, &[a, "u\n", "C\n", "l c\n"]), "l\nc\n");
    }

    #[test]
    fn diff_compares_programs_not_text() {
        let a = "l d\n$1 $2\nsab\n";
        let b = "ld\n  $1$2\r\n";
        assert_eq!(calc(Diff, &[a, b]), "sab\n");
    }

    #[test]
    fn merge_with_itself_is_the_deduplicated_set() {
        let a = "l\nl\nu d\n$1 $2 $3\nu   d\n";
        assert_eq!(calc(Merge, &[a, a]), calc(Clean, &[a]));
    }

    #[test]
    fn merge_has_the_same_programs_whatever_the_operand_order() {
        let args = ["l\nu\n", "u\n$1 $2\n", "c\n$1$2\nl\n", "# empty\n"];
        let expected = fast_calc(Merge, &args, &OutputStyle::default());
        for order in args.iter().permutations(args.len()) {
            let operands: Vec<&str> = order.into_iter().copied().collect();
            let result = fast_calc(Merge, &operands, &OutputStyle::default());
            assert_eq!(lines(&result), lines(&expected), "for {operands:?}");
        }
    }

    #[test]
    fn sorted_output_is_independent_of_operand_order() {
        let style = OutputStyle { order: Order::Sorted, ..OutputStyle::default() };
        let forward = fast_calc(Merge, &["u\n$1\n", "l\nc\n"], &style);
        let backward = fast_calc(Merge, &["l\nc\n", "u\n$1\n"], &style);
        assert_eq!(forward, backward);
        assert_eq!(forward, "$1\nc\nl\nu\n");
    }

    #[test]
    fn malformed_lines_never_reach_the_output() {
        let a = "l\nw d\nc $";
        let b = "?\nu\n";
        assert_eq!(calc(Merge, &[a, b]), "l\nu\n");
    }

    #[test]
    fn empty_input_gives_empty_output() {
        for op in &[Clean, Diff, Merge] {
            assert_eq!(calc(*op, &["", ""]), "", "for {op:?}");
        }
    }

    #[test]
    fn output_uses_the_first_operands_layout() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.child("first.rule");
        first.write_str("\u{FEFF}l\r\nu\r\n").unwrap();
        let second = temp_dir.child("second.rule");
        second.write_str("c\n").unwrap();
        let paths = vec![first.path().to_path_buf(), second.path().to_path_buf()];

        let (first, rest) = first_and_rest(&paths).unwrap().unwrap();
        let style = OutputStyle { layout: first.layout(), ..OutputStyle::default() };
        let mut answer = Vec::new();
        let rest = rest.map(|operand| operand.map_err(anyhow::Error::from));
        calculate(Merge, &first.parsed().programs, rest, &mut answer, &style).unwrap();
        assert_eq!(String::from_utf8(answer).unwrap(), "\u{FEFF}l\r\nu\r\nc\r\n");
    }
}
