use crate::error::{Error, Result, SyntaxError};
use crate::heap::Heap;
use crate::lex::{Token, TokenKind, Tokenizer};
use crate::value::Value;

/// Reads top-level forms from source text, one per call to `next`.
pub struct Parser<'a, 'h> {
    tokens: Tokenizer<'a>,
    heap: &'h mut Heap,
    depth: usize,
}

impl<'a, 'h> Parser<'a, 'h> {
    pub fn new(heap: &'h mut Heap, src: &'a str) -> Parser<'a, 'h> {
        Parser {
            tokens: Tokenizer::new(src),
            heap,
            depth: 0,
        }
    }

    /// Current list nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn parse_datum(&mut self, token: Token<'a>) -> Result<Value> {
        match token.kind {
            TokenKind::Symbol => self.heap.sym(token.text),
            TokenKind::ListStart => {
                self.depth += 1;
                self.parse_lst()
            },
            TokenKind::ListEnd => Err(SyntaxError::UnexpectedListEnd.into()),
            TokenKind::Quote => match self.tokens.next() {
                Some(next) if next.kind != TokenKind::ListEnd => {
                    let quoted = self.parse_datum(next)?;
                    self.heap.quote(quoted)
                },
                _ => Err(SyntaxError::DanglingQuote.into()),
            },
            TokenKind::Error => Err(Error::InvalidToken {
                text: token.text.to_owned(),
            }),
        }
    }

    fn parse_lst(&mut self) -> Result<Value> {
        let mut items = Vec::new();
        loop {
            match self.tokens.next() {
                None => return Err(SyntaxError::UnterminatedList.into()),
                Some(token) if token.kind == TokenKind::ListEnd => {
                    self.depth -= 1;
                    return self.heap.list_from(&items);
                },
                Some(token) => items.push(self.parse_datum(token)?),
            }
        }
    }
}

impl<'a, 'h> Iterator for Parser<'a, 'h> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.tokens.next()?;
        Some(self.parse_datum(token))
    }
}

/// Parses every top-level form of `src` into a list, in source order.
pub fn parse(heap: &mut Heap, src: &str) -> Result<Value> {
    let forms = Parser::new(heap, src).collect::<Result<Vec<_>>>()?;
    heap.list_from(&forms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Builds the expected value for a tree of names.
    enum Tree {
        Sym(&'static str),
        Lst(Vec<Tree>),
    }

    fn build(heap: &mut Heap, tree: &Tree) -> Value {
        match tree {
            Tree::Sym(name) => heap.sym(name).unwrap(),
            Tree::Lst(items) => {
                let values: Vec<Value> = items.iter().map(|t| build(heap, t)).collect();
                heap.list_from(&values).unwrap()
            },
        }
    }

    fn assert_parses(src: &str, expected: Tree) {
        let mut heap = Heap::new().unwrap();
        let parsed = parse(&mut heap, src).unwrap();
        let expected = build(&mut heap, &expected);
        assert!(heap.is_eq(parsed, expected), "parsing {:?}", src);
    }

    fn parse_err(src: &str) -> Error {
        let mut heap = Heap::new().unwrap();
        parse(&mut heap, src).unwrap_err()
    }

    use Tree::{Lst, Sym};

    #[test]
    fn test_sym() {
        assert_parses("foo", Lst(vec![Sym("foo")]));
        assert_parses(" ->bar", Lst(vec![Sym("->bar")]));
        assert_parses("foo-> ", Lst(vec![Sym("foo->")]));
        assert_parses("\n\r\tbaz9\r\n", Lst(vec![Sym("baz9")]));
    }

    #[test]
    fn test_list_0() {
        assert_parses("", Lst(vec![]));
        assert_parses("()", Lst(vec![Lst(vec![])]));
        assert_parses("(())", Lst(vec![Lst(vec![Lst(vec![])])]));
        assert_parses(
            "\n(\t\t(  (\n)\t)\r)\n",
            Lst(vec![Lst(vec![Lst(vec![Lst(vec![])])])]),
        );
    }

    #[test]
    fn test_list_n() {
        assert_parses(
            "foo bar baz",
            Lst(vec![Sym("foo"), Sym("bar"), Sym("baz")]),
        );
        assert_parses("(foo bar)", Lst(vec![Lst(vec![Sym("foo"), Sym("bar")])]));
        assert_parses(
            "(foo (bar baz) qux) quux",
            Lst(vec![
                Lst(vec![
                    Sym("foo"),
                    Lst(vec![Sym("bar"), Sym("baz")]),
                    Sym("qux"),
                ]),
                Sym("quux"),
            ]),
        );
    }

    #[test]
    fn test_quote_prefix() {
        assert_parses("'foo", Lst(vec![Lst(vec![Sym("quote"), Sym("foo")])]));
        assert_parses(
            "''foo",
            Lst(vec![Lst(vec![
                Sym("quote"),
                Lst(vec![Sym("quote"), Sym("foo")]),
            ])]),
        );
        assert_parses(
            "'(a b) c",
            Lst(vec![
                Lst(vec![Sym("quote"), Lst(vec![Sym("a"), Sym("b")])]),
                Sym("c"),
            ]),
        );
        assert_parses(
            "(head '())",
            Lst(vec![Lst(vec![
                Sym("head"),
                Lst(vec![Sym("quote"), Lst(vec![])]),
            ])]),
        );
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(parse_err("("), Error::from(SyntaxError::UnterminatedList));
        assert_eq!(parse_err("(foo (bar)"), Error::from(SyntaxError::UnterminatedList));
        assert_eq!(parse_err(")"), Error::from(SyntaxError::UnexpectedListEnd));
        assert_eq!(parse_err("(foo))"), Error::from(SyntaxError::UnexpectedListEnd));
        assert_eq!(parse_err("'"), Error::from(SyntaxError::DanglingQuote));
        assert_eq!(parse_err("(')"), Error::from(SyntaxError::DanglingQuote));
        assert_eq!(
            parse_err("(foo bar,,)"),
            Error::InvalidToken {
                text: "bar,,".into()
            }
        );
    }

    #[test]
    fn test_symbol_limit_propagates() {
        let config = crate::config::Config {
            max_symbols: 3,
            ..Default::default()
        };
        let mut heap = Heap::with_config(&config).unwrap();
        assert_eq!(
            parse(&mut heap, "a b"),
            Err(Error::SymbolLimitExceeded { limit: 3 })
        );
    }

    #[test]
    fn test_iterator_yields_forms() {
        let mut heap = Heap::new().unwrap();
        let mut parser = Parser::new(&mut heap, "a (b c)");
        assert!(parser.next().unwrap().is_ok());
        let second = parser.next().unwrap().unwrap();
        assert_eq!(parser.depth(), 0);
        assert!(parser.next().is_none());
        assert_eq!(heap.count(second), Ok(2));
    }

    proptest! {
        #[test]
        fn prop_parser_never_panics(src in "[a-z()' ,]{0,40}") {
            let mut heap = Heap::new().unwrap();
            let _ = parse(&mut heap, &src);
        }
    }
}
