use std::fmt::{self, Display, Formatter};

use serde_derive::Serialize;

use crate::heap::Heap;
use crate::lambda::LambdaKind;
use crate::value::{InternalError, Repr, Value};

/// Owned, serializable snapshot of a value tree.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub enum Datum {
    Sym(String),
    Lst(Vec<Datum>),
    Err(String),
    Lambda { name: String, arity: usize },
}

impl Datum {
    pub fn as_sym(&self) -> Option<&str> {
        if let Datum::Sym(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn is_err(&self) -> bool {
        matches!(self, Datum::Err(_))
    }
}

/// Renders a value as source-like text, e.g. `(quote (a b))`.
pub struct Printer<'a> {
    heap: &'a Heap,
    value: Value,
}

impl<'a> Display for Printer<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let heap = self.heap;
        match self.value.repr() {
            Repr::Internal(InternalError::Undefined) => write!(f, "#error<undefined>"),
            Repr::Internal(InternalError::OutOfMemory) => write!(f, "#error<out-of-memory>"),
            Repr::Error(id) => write!(f, "#error<{}>", heap.error_record(id)),
            Repr::EmptyList => write!(f, "()"),
            Repr::Symbol(id) => write!(f, "{}", heap.name(id)),
            Repr::Lambda(id) => {
                let lambda = heap.lambda(id);
                match lambda.kind() {
                    LambdaKind::Builtin(builtin) => {
                        write!(f, "#lambda<builtin:{}/{}>", builtin.name(), lambda.arity())
                    },
                }
            },
            Repr::List(_) => {
                write!(f, "(")?;
                for (i, item) in heap.iter(self.value).enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", heap.display(item))?;
                }
                write!(f, ")")
            },
        }
    }
}

impl Heap {
    pub fn display(&self, value: Value) -> Printer<'_> {
        Printer { heap: self, value }
    }

    pub fn to_datum(&self, value: Value) -> Datum {
        match value.repr() {
            Repr::Internal(internal) => Datum::Err(internal.kind().to_string()),
            Repr::Error(id) => Datum::Err(self.error_record(id).to_string()),
            Repr::EmptyList | Repr::List(_) => {
                Datum::Lst(self.iter(value).map(|v| self.to_datum(v)).collect())
            },
            Repr::Symbol(id) => Datum::Sym(self.name(id).to_owned()),
            Repr::Lambda(id) => {
                let lambda = self.lambda(id);
                Datum::Lambda {
                    name: lambda.name().to_owned(),
                    arity: lambda.arity(),
                }
            },
        }
    }
}
