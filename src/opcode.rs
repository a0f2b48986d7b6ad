//! The opcode table: which characters are rule opcodes, and how many parameter
//! characters each one consumes.
use fxhash::FxHashMap;
use once_cell::sync::Lazy;
use tracing::warn;

/// No opcode takes more than three parameter characters.
pub const MAX_ARITY: u8 = 3;

/// One entry of the opcode table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    /// The character that names the opcode in a rule
    pub symbol: char,
    /// Human-readable name, used only when reporting
    pub name: &'static str,
    /// Number of characters that must follow `symbol`
    pub arity: u8,
}

const fn op(symbol: char, name: &'static str, arity: u8) -> Opcode {
    Opcode { symbol, name, arity }
}

/// Two definitions for the same symbol. The table keeps `kept`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    /// The earlier definition, which was dropped
    pub dropped: Opcode,
    /// The later definition, which is in the table
    pub kept: Opcode,
}

/// Maps opcode characters to their `Opcode` entry.
#[derive(Debug, Default)]
pub struct OpcodeTable {
    by_symbol: FxHashMap<char, Opcode>,
    collisions: Vec<Collision>,
}

impl OpcodeTable {
    /// Builds a table from `entries` in order. When a symbol is defined more
    /// than once the last definition wins, and the collision is both logged
    /// and recorded.
    #[must_use]
    pub fn from_entries(entries: &[Opcode]) -> Self {
        let mut table = OpcodeTable::default();
        for &entry in entries {
            debug_assert!(entry.arity <= MAX_ARITY, "{entry:?} has too many parameters");
            if let Some(dropped) = table.by_symbol.insert(entry.symbol, entry) {
                if dropped != entry {
                    warn!(
                        "opcode {:?} defined twice: {:?} ({}) replaces {:?} ({})",
                        entry.symbol, entry.name, entry.arity, dropped.name, dropped.arity
                    );
                }
                table.collisions.push(Collision { dropped, kept: entry });
            }
        }
        table
    }

    /// The hashcat rule language, built on first use.
    #[must_use]
    pub fn hashcat() -> &'static OpcodeTable {
        &HASHCAT_TABLE
    }

    /// Returns the entry for `symbol`, or `None` if it isn't an opcode.
    #[must_use]
    pub fn lookup(&self, symbol: char) -> Option<&Opcode> {
        self.by_symbol.get(&symbol)
    }

    /// Every symbol defined more than once, in the order the repeats were seen.
    #[must_use]
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// All opcodes, sorted by symbol.
    #[must_use]
    pub fn iter(&self) -> std::vec::IntoIter<&Opcode> {
        let mut opcodes: Vec<&Opcode> = self.by_symbol.values().collect();
        opcodes.sort_unstable_by_key(|op| op.symbol);
        opcodes.into_iter()
    }

    /// Number of distinct opcodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    /// True if the table has no opcodes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }
}

impl<'a> IntoIterator for &'a OpcodeTable {
    type Item = &'a Opcode;
    type IntoIter = std::vec::IntoIter<&'a Opcode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

static HASHCAT_TABLE: Lazy<OpcodeTable> = Lazy::new(|| OpcodeTable::from_entries(HASHCAT));

// Older rule tools listed `r` a second time as "prepend memory" with one
// parameter, and `M` twice. Hashcat's `r` is reverse, so that entry is gone.
const HASHCAT: &[Opcode] = &[
    op(':', "Passthrough", 0),
    op('l', "Lowercase", 0),
    op('u', "Uppercase", 0),
    op('c', "Capitalize", 0),
    op('C', "Invert capitalize", 0),
    op('t', "Toggle case", 0),
    op('T', "Toggle @ N", 1),
    op('r', "Reverse", 0),
    op('d', "Duplicate", 0),
    op('p', "Duplicate N", 1),
    op('f', "Reflect", 0),
    op('{', "Rotate left", 0),
    op('}', "Rotate right", 0),
    op('$', "Append character", 1),
    op('^', "Prepend character", 1),
    op('[', "Truncate left", 0),
    op(']', "Truncate right", 0),
    op('D', "Delete @ N", 1),
    op('x', "Extract range", 2),
    op('O', "Omit range", 2),
    op('i', "Insert @ N", 2),
    op('o', "Overwrite @ N", 2),
    op('\'', "Truncate @ N", 1),
    op('s', "Replace", 2),
    op('@', "Purge", 1),
    op('z', "Duplicate first N", 1),
    op('Z', "Duplicate last N", 1),
    op('q', "Duplicate all", 0),
    op('X', "Extract memory", 3),
    op('M', "Memorize", 0),
    op('m', "Append memory", 1),
    op('<', "Reject less", 1),
    op('>', "Reject greater", 1),
    op('_', "Reject equal", 1),
    op('!', "Reject contain", 1),
    op('/', "Reject not contain", 1),
    op('(', "Reject equal first", 1),
    op(')', "Reject equal last", 1),
    op('=', "Reject equal at", 2),
    op('%', "Reject contains N", 2),
    op('Q', "Reject memory equal", 0),
    op('k', "Swap front", 0),
    op('K', "Swap back", 0),
    op('*', "Swap @ N", 2),
    op('L', "Bitwise shift left", 1),
    op('R', "Bitwise shift right", 1),
    op('+', "ASCII increment", 1),
    op('-', "ASCII decrement", 1),
    op('.', "Replace N + 1", 1),
    op(',', "Replace N - 1", 1),
    op('y', "Duplicate block front", 1),
    op('Y', "Duplicate block back", 1),
    op('E', "Title", 0),
    op('e', "Title with separator", 1),
    op('3', "Toggle after Nth separator", 2),
];
