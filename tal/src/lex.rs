use std::ops::Range;

use logos::{Lexer, Logos};
use serde_derive::Serialize;

use crate::symbol::SYM_MAX_LEN;

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
pub enum RawToken {
    #[token("(")]
    ListStart,
    #[token(")")]
    ListEnd,
    #[token("'")]
    Quote,

    #[regex(r"[a-zA-Z<_\-/*>!?][a-zA-Z0-9<_\-/*>!?]*", priority = 3)]
    Symbol,
    /// A run of characters that cannot form a symbol. Symbols glued to such
    /// characters are absorbed by the longer match.
    #[regex(r"[^ \t\n\r\x0B\x0C()'][^ \t\n\r\x0B\x0C()]*", priority = 1)]
    Garbage,

    #[error]
    #[regex(r"[ \t\n\r\x0B\x0C]+", logos::skip)]
    Error,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum TokenKind {
    ListStart,
    ListEnd,
    Quote,
    Symbol,
    Error,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Range<usize>,
}

/// A pull-based scanner: each call to `next` yields at most one token.
///
/// Input ends at the end of the string or at the first NUL byte.
pub struct Tokenizer<'a> {
    lexer: Lexer<'a, RawToken>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Tokenizer<'a> {
        let src = match src.find('\0') {
            Some(end) => &src[..end],
            None => src,
        };
        Tokenizer {
            lexer: RawToken::lexer(src),
        }
    }

    /// Byte offset of the cursor.
    pub fn position(&self) -> usize {
        self.lexer.span().end
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let raw = self.lexer.next()?;
        let text = self.lexer.slice();
        let kind = match raw {
            RawToken::ListStart => TokenKind::ListStart,
            RawToken::ListEnd => TokenKind::ListEnd,
            RawToken::Quote => TokenKind::Quote,
            RawToken::Symbol if text.len() > SYM_MAX_LEN => TokenKind::Error,
            RawToken::Symbol => TokenKind::Symbol,
            RawToken::Garbage | RawToken::Error => TokenKind::Error,
        };

        Some(Token {
            kind,
            text,
            span: self.lexer.span(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kinds(src: &str) -> Vec<(TokenKind, &str)> {
        Tokenizer::new(src).map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn test_lexer() {
        let mut lexer: Lexer<_> = RawToken::lexer("(foo 'bar)");
        assert_eq!(lexer.next(), Some(RawToken::ListStart));
        assert_eq!(lexer.slice(), "(");
        assert_eq!(lexer.next(), Some(RawToken::Symbol));
        assert_eq!(lexer.slice(), "foo");
        assert_eq!(lexer.next(), Some(RawToken::Quote));
        assert_eq!(lexer.next(), Some(RawToken::Symbol));
        assert_eq!(lexer.slice(), "bar");
        assert_eq!(lexer.next(), Some(RawToken::ListEnd));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_empty() {
        let mut tokens = Tokenizer::new("");
        assert_eq!(tokens.next(), None);
        assert_eq!(tokens.position(), 0);
        assert_eq!(kinds(" \t\n\r\x0B\x0C"), vec![]);
    }

    #[test]
    fn test_sym_short() {
        let mut tokens = Tokenizer::new("foo");
        assert_eq!(
            tokens.next(),
            Some(Token {
                kind: TokenKind::Symbol,
                text: "foo",
                span: 0..3
            })
        );
        assert_eq!(tokens.position(), 3);
        assert_eq!(tokens.next(), None);
    }

    #[test]
    fn test_sym_chars() {
        assert_eq!(kinds("->bar"), vec![(TokenKind::Symbol, "->bar")]);
        assert_eq!(kinds("foo->"), vec![(TokenKind::Symbol, "foo->")]);
        assert_eq!(kinds("baz9"), vec![(TokenKind::Symbol, "baz9")]);
        assert_eq!(kinds("<_-/*>!?"), vec![(TokenKind::Symbol, "<_-/*>!?")]);
    }

    #[test]
    fn test_digit_start_is_error() {
        assert_eq!(kinds("9lives"), vec![(TokenKind::Error, "9lives")]);
    }

    #[test]
    fn test_sym_limit() {
        let longest = "a".repeat(SYM_MAX_LEN);
        assert_eq!(kinds(&longest), vec![(TokenKind::Symbol, longest.as_str())]);

        let too_long = "a".repeat(SYM_MAX_LEN + 1);
        assert_eq!(kinds(&too_long), vec![(TokenKind::Error, too_long.as_str())]);
    }

    #[test]
    fn test_sym_err() {
        assert_eq!(kinds("foo,,"), vec![(TokenKind::Error, "foo,,")]);
        assert_eq!(kinds("$$$"), vec![(TokenKind::Error, "$$$")]);
        assert_eq!(kinds(",foo"), vec![(TokenKind::Error, ",foo")]);
    }

    #[test]
    fn test_error_run_ends_at_delimiter() {
        assert_eq!(
            kinds("(,,)"),
            vec![
                (TokenKind::ListStart, "("),
                (TokenKind::Error, ",,"),
                (TokenKind::ListEnd, ")"),
            ]
        );
    }

    #[test]
    fn test_quoted() {
        assert_eq!(
            kinds("'(foo)"),
            vec![
                (TokenKind::Quote, "'"),
                (TokenKind::ListStart, "("),
                (TokenKind::Symbol, "foo"),
                (TokenKind::ListEnd, ")"),
            ]
        );
        assert_eq!(
            kinds("''a"),
            vec![
                (TokenKind::Quote, "'"),
                (TokenKind::Quote, "'"),
                (TokenKind::Symbol, "a"),
            ]
        );
    }

    #[test]
    fn test_nul_terminates() {
        assert_eq!(kinds("foo\0bar"), vec![(TokenKind::Symbol, "foo")]);
    }

    #[test]
    fn test_multi() {
        let src = concat!(
            "         \n",
            "nil)     \t",
            "foo      \x0B",
            "   bar   \r",
            "   ,,,   \n",
            "   baz   \n",
            "()       \n",
        );

        let spans: Vec<(TokenKind, Range<usize>)> =
            Tokenizer::new(src).map(|t| (t.kind, t.span)).collect();
        assert_eq!(
            spans,
            vec![
                (TokenKind::Symbol, 10..13),
                (TokenKind::ListEnd, 13..14),
                (TokenKind::Symbol, 20..23),
                (TokenKind::Symbol, 33..36),
                (TokenKind::Error, 43..46),
                (TokenKind::Symbol, 53..56),
                (TokenKind::ListStart, 60..61),
                (TokenKind::ListEnd, 61..62),
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_tokens_cover_non_whitespace(src in "\\PC*") {
            let src = src.replace('\0', "");
            let covered: usize = Tokenizer::new(&src).map(|t| t.text.len()).sum();
            let expected: usize = src
                .chars()
                .filter(|c| !matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C'))
                .map(char::len_utf8)
                .sum();
            prop_assert_eq!(covered, expected);
        }
    }
}
