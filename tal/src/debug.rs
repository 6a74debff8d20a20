//! Field-by-field dumps of values and tokens for the REPL.

use std::fmt::{self, Write};

use crate::heap::Heap;
use crate::lex::Tokenizer;
use crate::value::{Repr, Value, VAL_BITS};

const INDENT_WIDTH: usize = 8;
const FIELD_WIDTH: usize = 16;

struct Dump<'a> {
    heap: &'a Heap,
    out: String,
}

impl<'a> Dump<'a> {
    fn field(&mut self, depth: usize, name: &str, args: fmt::Arguments<'_>) -> fmt::Result {
        if depth > 0 {
            let pad = INDENT_WIDTH * depth - 2;
            write!(self.out, "{:pad$}> ", "", pad = pad)?;
        }
        writeln!(self.out, "{:<width$} {}", name, args, width = FIELD_WIDTH)
    }

    fn value(&mut self, v: Value, depth: usize) -> fmt::Result {
        let word = v.word();
        self.field(depth, "decimal", format_args!("{}", word))?;
        self.field(
            depth,
            "hexadecimal",
            format_args!("{:#0width$x}", word, width = VAL_BITS as usize / 4 + 2),
        )?;
        self.field(depth, "bits", format_args!("{}", bits(word)))?;
        self.field(
            depth,
            "storage",
            format_args!("{:?} ({})", v.storage(), v.storage() as usize),
        )?;

        if let Some(ty) = v.immediate_type() {
            self.field(depth, "immediate type", format_args!("{:?} ({})", ty, ty as usize))?;
        }
        if let Some(ty) = v.boxed_type() {
            self.field(depth, "boxed type", format_args!("{:?} ({})", ty, ty as usize))?;
            if let Some(index) = v.boxed_index() {
                self.field(depth, "index", format_args!("{}", index))?;
            }
        }

        let heap = self.heap;
        match v.repr() {
            Repr::Internal(internal) => {
                self.field(depth, "error", format_args!("{}", internal.kind()))?;
            },
            Repr::Error(id) => {
                self.field(depth, "error", format_args!("{}", heap.error_record(id)))?;
            },
            Repr::Symbol(id) => {
                self.field(depth, "symbol value", format_args!("{:?}", heap.name(id)))?;
            },
            Repr::Lambda(id) => {
                let lambda = heap.lambda(id);
                self.field(depth, "lambda", format_args!("{:?}", lambda))?;
                self.field(depth, "arity", format_args!("{}", lambda.arity()))?;
            },
            Repr::List(_) => {
                let items: Vec<Value> = heap.iter(v).collect();
                self.field(depth, "list count", format_args!("{}", items.len()))?;
                self.field(depth, "list values", format_args!(""))?;
                for item in items {
                    self.field(depth + 1, "--------", format_args!(""))?;
                    self.value(item, depth + 1)?;
                }
            },
            Repr::EmptyList => {},
        }
        Ok(())
    }
}

/// Word bits, most significant first, in groups of eight.
fn bits(word: usize) -> String {
    let mut out = String::with_capacity(VAL_BITS as usize * 9 / 8);
    for i in 0..VAL_BITS {
        if i > 0 && i % 8 == 0 {
            out.push(' ');
        }
        let bit = (word >> (VAL_BITS - i - 1)) & 1;
        out.push(if bit == 1 { '1' } else { '0' });
    }
    out
}

/// A multi-line description of the word and, for boxed values, what it
/// points at.
pub fn describe(heap: &Heap, v: Value) -> String {
    let mut dump = Dump {
        heap,
        out: String::new(),
    };
    // Writing into a `String` cannot fail.
    let _ = dump.value(v, 0);
    dump.out
}

/// One line per token: kind, byte span and text.
pub fn tokens(src: &str) -> String {
    let mut out = String::new();
    for token in Tokenizer::new(src) {
        let _ = writeln!(
            out,
            "{:<10} {:>4}..{:<4} {:?}",
            format!("{:?}", token.kind),
            token.span.start,
            token.span.end,
            token.text
        );
    }
    out
}
