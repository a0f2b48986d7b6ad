//! `Token` and `Program`, the values the parser produces and the set
//! operations compare.
use std::fmt;

/// One opcode together with the parameter characters it consumed.
///
/// Tokens are only built once all parameters have been read, so
/// `params` always holds exactly as many characters as the opcode's arity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token {
    symbol: char,
    params: String,
}

impl Token {
    /// A token for an opcode that takes no parameters
    #[must_use]
    pub fn bare(symbol: char) -> Self {
        Token { symbol, params: String::new() }
    }

    pub(crate) fn with_params(symbol: char, params: String) -> Self {
        Token { symbol, params }
    }

    /// The opcode character
    #[must_use]
    pub fn symbol(&self) -> char {
        self.symbol
    }

    /// The parameter characters, verbatim
    #[must_use]
    pub fn params(&self) -> &str {
        &self.params
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.symbol, self.params)
    }
}

/// A parsed rule line: the tokens in the order they appeared.
///
/// Two programs are equal exactly when their tokens are, no matter how the
/// source lines were spaced. The derived ordering compares token by token,
/// which is what `--sort` uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Program(Vec<Token>);

impl Program {
    /// The program's tokens
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.0
    }

    /// Number of tokens
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for a program with no tokens. The parser never produces one.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Token>> for Program {
    fn from(tokens: Vec<Token>) -> Self {
        Program(tokens)
    }
}

#[allow(clippy::pedantic)]
#[cfg(test)]
mod test {
    use super::*;

    fn append(c: char) -> Token {
        Token::with_params('$', c.to_string())
    }

    #[test]
    fn tokens_display_as_symbol_then_params() {
        assert_eq!(Token::bare('l').to_string(), "l");
        assert_eq!(append('1').to_string(), "$1");
        assert_eq!(Token::with_params('s', "ab".to_string()).to_string(), "sab");
    }

    #[test]
    fn programs_compare_token_by_token() {
        let short = Program::from(vec![Token::bare('l')]);
        let long = Program::from(vec![Token::bare('l'), append('1')]);
        let other = Program::from(vec![Token::bare('u')]);
        assert!(short < long);
        assert!(long < other);
        assert_eq!(long, Program::from(vec![Token::bare('l'), append('1')]));
        assert_ne!(long, Program::from(vec![append('1'), Token::bare('l')]));
    }
}
