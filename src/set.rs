//! Provides the `RuleSet` structure, intended to be initialized from the
//! programs of the first operand.
use anyhow::Result;
use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use std::borrow::Cow;
use std::io;

use crate::format::{Order, OutputStyle};
use crate::rule::Program;

/// A `RuleSet` is a set of programs, each program a key of an `IndexMap`.
/// * Keys are `Cow<'data, Program>`
/// * Programs inserted from the first operand are `Cow::Borrowed` keys
/// * Programs inserted from the second and following operands are `Cow::Owned` keys
/// * Each set operation (`Merge`, `Diff`, etc) associates a small bookkeeping value
///   with each key. The value type differs from operation to operation.
pub(crate) struct RuleSet<'data, Bookkeeping: Copy> {
    set: CowSet<'data, Bookkeeping>,
}
type CowSet<'data, Bookkeeping> = IndexMap<Cow<'data, Program>, Bookkeeping, FxBuildHasher>;

impl<'data, Bookkeeping: Copy> RuleSet<'data, Bookkeeping> {
    /// A set holding each of `programs` once, borrowed, with bookkeeping
    /// value `b`. Keys keep the order in which they first appear.
    pub(crate) fn from_programs(programs: &'data [Program], b: Bookkeeping) -> Self {
        let mut set = CowSet::default();
        for program in programs {
            set.entry(Cow::Borrowed(program)).or_insert(b);
        }
        RuleSet { set }
    }

    /// Insert a copy of `program` as `Cow::Owned`, unless it's already present
    pub(crate) fn insert(&mut self, program: &Program, b: Bookkeeping) {
        if !self.set.contains_key(program) {
            self.set.insert(Cow::Owned(program.clone()), b);
        }
    }

    /// Sometimes we need to update the bookkeeping information
    pub(crate) fn get_mut(&mut self, program: &Program) -> Option<&mut Bookkeeping> {
        self.set.get_mut(program)
    }

    /// `IndexMap`'s `.retain` method is `O(n)` and preserves the order of the
    /// keys, so it's safe to expose it. We don't expose `.remove`, because it
    /// doesn't preserve key order, and we don't expose `.shift_remove`, which
    /// does preserve order, because `.shift_remove` is *also* `O(n)`, and using
    /// it to remove elements one by one means `O(n^2)` performance.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&mut Bookkeeping) -> bool) {
        self.set.retain(|_k, v| keep(v));
    }

    /// The programs, in the given `order`
    pub(crate) fn programs(&self, order: Order) -> Vec<&Program> {
        let mut programs: Vec<&Program> = self.set.keys().map(Cow::as_ref).collect();
        if order == Order::Sorted {
            programs.sort_unstable();
        }
        programs
    }

    /// Output the `RuleSet`'s programs, one per line, with the Byte Order Mark
    /// and line terminator of `style`'s layout.
    pub(crate) fn output_to(&self, mut out: impl io::Write, style: &OutputStyle) -> Result<()> {
        out.write_all(style.layout.bom_bytes())?;
        for program in self.programs(style.order) {
            write!(out, "{}", program.display_with(&style.separator))?;
            out.write_all(style.layout.line_terminator.as_bytes())?;
        }
        out.flush()?;
        Ok(())
    }
}

#[allow(clippy::pedantic)]
#[cfg(test)]
mod test {
    use super::*;
    use crate::format::Layout;
    use crate::opcode::OpcodeTable;
    use crate::parse::parse;

    fn programs(text: &str) -> Vec<Program> {
        parse(text, OpcodeTable::hashcat()).programs
    }

    fn output(set: &RuleSet<()>, style: &OutputStyle) -> String {
        let mut out = Vec::new();
        set.output_to(&mut out, style).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn duplicates_collapse_and_first_appearance_order_is_kept() {
        let first = programs("u\nl d\nl  d\nc\nu\n");
        let set = RuleSet::from_programs(&first, ());
        assert_eq!(output(&set, &OutputStyle::default()), "u\nl d\nc\n");
    }

    #[test]
    fn inserting_an_existing_program_keeps_its_bookkeeping() {
        let first = programs("l\n");
        let mut set = RuleSet::from_programs(&first, 1);
        set.insert(&first[0], 2);
        set.insert(&programs("u")[0], 3);
        assert_eq!(set.get_mut(&first[0]).copied(), Some(1));
        set.retain(|n| *n > 2);
        assert_eq!(set.programs(Order::Appearance), [&programs("u")[0]]);
    }

    #[test]
    fn sorted_order_compares_tokens() {
        let first = programs("u\n$2\nl $1\n$1\nl\n");
        let set = RuleSet::from_programs(&first, ());
        let style = OutputStyle { order: Order::Sorted, ..OutputStyle::default() };
        assert_eq!(output(&set, &style), "$1\n$2\nl\nl $1\nu\n");
    }

    #[test]
    fn layout_and_separator_are_applied() {
        let first = programs("l d\n$1\n");
        let set = RuleSet::from_programs(&first, ());
        let style = OutputStyle {
            separator: String::new(),
            order: Order::Appearance,
            layout: Layout { bom: true, line_terminator: "\r\n" },
        };
        assert_eq!(output(&set, &style), "\u{FEFF}ld\r\n$1\r\n");
    }
}
