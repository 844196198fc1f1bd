// Lexical tables for the C subset

use rustc_hash::FxHashSet;
use std::sync::LazyLock;

/// Reserved words: data types, storage classes, control flow, then `const`
/// and `main`. `main` is reserved so the program anchor can be found by
/// lookahead without consulting identifiers.
pub const KEYWORDS: &[&str] = &[
    "auto", "bool", "char", "double", "float", "int", "long", "short", "signed", "unsigned",
    "void", "restrict", "static", "break", "case", "continue", "default", "do", "else", "for",
    "goto", "if", "return", "switch", "union", "while", "const", "main",
];

/// Multi-character operators, longest first: shift assignment, compound
/// assignment, increment/decrement, shift, relational, logical, member access
pub const MULTI_CHAR_OPERATORS: &[&str] = &[
    "<<=", ">>=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "++", "--", "<<", ">>", "<=",
    ">=", "==", "!=", "&&", "||", "->",
];

pub const SINGLE_CHAR_OPERATORS: &[char] = &[
    '+', '-', '*', '/', '%', '&', '|', '^', '~', '!', '<', '>', '=', '.', ',', '?', ':',
];

pub const DELIMITERS: &[char] = &[';', '(', ')', '{', '}', '[', ']'];

/// Keywords that may begin a declaration
pub const PRIMITIVE_TYPES: &[&str] = &[
    "int", "float", "double", "char", "short", "long", "signed", "unsigned", "void",
];

/// Keywords that begin a control-flow statement; panic-mode recovery stops
/// in front of these.
pub const STATEMENT_KEYWORDS: &[&str] =
    &["if", "while", "do", "for", "return", "break", "continue"];

/// Deepest nesting of statements and sub-expressions the parser descends
/// into before reporting an error
pub const MAX_NESTING_DEPTH: usize = 48;

pub static KEYWORD_SET: LazyLock<FxHashSet<&'static str>> =
    LazyLock::new(|| KEYWORDS.iter().copied().collect());

pub static PRIMITIVE_TYPE_SET: LazyLock<FxHashSet<&'static str>> =
    LazyLock::new(|| PRIMITIVE_TYPES.iter().copied().collect());

pub fn is_keyword(text: &str) -> bool {
    KEYWORD_SET.contains(text)
}

pub fn is_primitive_type(text: &str) -> bool {
    PRIMITIVE_TYPE_SET.contains(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_char_operators_longest_first() {
        let lengths: Vec<usize> = MULTI_CHAR_OPERATORS.iter().map(|op| op.len()).collect();
        let mut sorted = lengths.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(lengths, sorted);
    }

    #[test]
    fn test_primitive_types_are_keywords() {
        for ty in PRIMITIVE_TYPES {
            assert!(is_keyword(ty), "{ty} should be a keyword");
        }
        assert!(is_keyword("main"));
        assert!(!is_keyword("struct"));
    }
}
