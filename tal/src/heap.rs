//! Arena storage for boxed values.
//!
//! Every boxed `Value` is an index into one of the arenas owned by a `Heap`.
//! Cells are never mutated once allocated, so sub-lists may be shared freely.
//! Everything is released together when the heap is dropped.

use std::rc::Rc;

use serde_derive::Serialize;

use crate::config::Config;
use crate::error::{Error, ErrorKind, Result};
use crate::lambda::{Builtin, BuiltinFn, FnBuiltin, Lambda};
use crate::symbol::SymbolTable;
use crate::value::{CellId, ErrorId, LambdaId, Repr, SymId, Value, BOXED_LIMIT};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Cell {
    head: Value,
    tail: Value,
}

/// Symbols the evaluator dispatches on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Keywords {
    pub def: SymId,
    pub quote: SymId,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HeapStats {
    pub symbols: usize,
    pub cells: usize,
    pub lambdas: usize,
    pub errors: usize,
}

/// Handles index this heap's arenas directly, so a value is only valid for
/// the heap that made it. Use `contains` to screen values of unknown origin.
pub struct Heap {
    symbols: SymbolTable,
    cells: Vec<Cell>,
    lambdas: Vec<Lambda>,
    errors: Vec<Error>,
    max_cells: usize,
    keywords: Keywords,
}

impl Heap {
    pub fn new() -> Result<Heap> {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Result<Heap> {
        let mut symbols = SymbolTable::with_capacity(config.max_symbols);
        let keywords = Keywords {
            def: symbols.intern("def")?,
            quote: symbols.intern("quote")?,
        };

        Ok(Heap {
            symbols,
            cells: Vec::new(),
            lambdas: Vec::new(),
            errors: Vec::new(),
            max_cells: config.max_cells.min(BOXED_LIMIT),
            keywords,
        })
    }

    pub fn keywords(&self) -> Keywords {
        self.keywords
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn stats(&self) -> HeapStats {
        HeapStats {
            symbols: self.symbols.len(),
            cells: self.cells.len(),
            lambdas: self.lambdas.len(),
            errors: self.errors.len(),
        }
    }

    /// Whether the handle in `v` points inside this heap's arenas.
    ///
    /// Cells only ever link to cells of the same heap, so checking the top
    /// level is enough.
    pub fn contains(&self, v: Value) -> bool {
        match v.repr() {
            Repr::Internal(_) | Repr::EmptyList => true,
            Repr::Symbol(id) => id.index() < self.symbols.len(),
            Repr::List(id) => id.index() < self.cells.len(),
            Repr::Lambda(id) => id.index() < self.lambdas.len(),
            Repr::Error(id) => id.index() < self.errors.len(),
        }
    }

    // Symbols

    pub fn intern(&mut self, name: &str) -> Result<SymId> {
        self.symbols.intern(name)
    }

    pub fn sym(&mut self, name: &str) -> Result<Value> {
        self.intern(name).map(Value::symbol)
    }

    pub fn name(&self, id: SymId) -> &str {
        self.symbols.name(id)
    }

    /// Text of a symbol value.
    pub fn sym_name(&self, v: Value) -> Option<&str> {
        v.as_sym().map(|id| self.symbols.name(id))
    }

    // Lists

    pub fn cons(&mut self, head: Value, tail: Value) -> Result<Value> {
        if !tail.is_list() {
            return Err(Error::NotAList);
        }
        if self.cells.len() >= self.max_cells {
            return Err(Error::OutOfMemory);
        }

        let id = CellId(self.cells.len());
        self.cells.push(Cell { head, tail });
        Ok(Value::list(id))
    }

    pub fn head_of(&self, cell: CellId) -> Value {
        self.cells[cell.index()].head
    }

    pub fn tail_of(&self, cell: CellId) -> Value {
        let tail = self.cells[cell.index()].tail;
        debug_assert!(tail.is_list());
        tail
    }

    /// First element of a nonempty list.
    pub fn head(&self, l: Value) -> Result<Value> {
        match l.repr() {
            Repr::List(cell) => Ok(self.head_of(cell)),
            Repr::EmptyList => Err(Error::EmptyListAccess { op: "head" }),
            _ => Err(Error::NotAList),
        }
    }

    /// Remainder of a nonempty list.
    pub fn tail(&self, l: Value) -> Result<Value> {
        match l.repr() {
            Repr::List(cell) => Ok(self.tail_of(cell)),
            Repr::EmptyList => Err(Error::EmptyListAccess { op: "tail" }),
            _ => Err(Error::NotAList),
        }
    }

    pub fn iter(&self, l: Value) -> ListIter<'_> {
        ListIter { heap: self, node: l }
    }

    pub fn count(&self, l: Value) -> Result<usize> {
        if !l.is_list() {
            return Err(Error::NotAList);
        }
        Ok(self.iter(l).count())
    }

    pub fn to_vec(&self, l: Value) -> Result<Vec<Value>> {
        if !l.is_list() {
            return Err(Error::NotAList);
        }
        Ok(self.iter(l).collect())
    }

    /// Builds a list holding `values` in order.
    pub fn list_from(&mut self, values: &[Value]) -> Result<Value> {
        values
            .iter()
            .rev()
            .try_fold(Value::empty_list(), |tail, v| self.cons(*v, tail))
    }

    /// A reversed copy of `l`. The original chain is left untouched.
    pub fn reverse(&mut self, l: Value) -> Result<Value> {
        let values = self.to_vec(l)?;
        values
            .into_iter()
            .try_fold(Value::empty_list(), |tail, v| self.cons(v, tail))
    }

    /// A list of exactly two elements.
    pub fn is_pair(&self, v: Value) -> bool {
        v.is_list() && self.iter(v).take(3).count() == 2
    }

    /// A list of exactly three elements.
    pub fn is_triple(&self, v: Value) -> bool {
        v.is_list() && self.iter(v).take(4).count() == 3
    }

    /// Structural equality.
    pub fn is_eq(&self, v: Value, w: Value) -> bool {
        match (v.repr(), w.repr()) {
            (Repr::Internal(_), Repr::Internal(_)) => true,
            (Repr::EmptyList, Repr::EmptyList) => true,
            (Repr::Symbol(a), Repr::Symbol(b)) => a == b,
            (Repr::Lambda(a), Repr::Lambda(b)) => a == b,
            (Repr::Error(a), Repr::Error(b)) => {
                self.errors[a.index()].kind() == self.errors[b.index()].kind()
            },
            (Repr::List(_), Repr::List(_)) => self.list_eq(v, w),
            _ => false,
        }
    }

    fn list_eq(&self, mut l0: Value, mut l1: Value) -> bool {
        loop {
            match (l0.repr(), l1.repr()) {
                (Repr::EmptyList, Repr::EmptyList) => return true,
                (Repr::List(c0), Repr::List(c1)) => {
                    if !self.is_eq(self.head_of(c0), self.head_of(c1)) {
                        return false;
                    }
                    l0 = self.tail_of(c0);
                    l1 = self.tail_of(c1);
                },
                _ => return false,
            }
        }
    }

    // Quotation

    /// `(quote v)`
    pub fn quote(&mut self, v: Value) -> Result<Value> {
        let quote = Value::symbol(self.keywords.quote);
        let rest = self.cons(v, Value::empty_list())?;
        self.cons(quote, rest)
    }

    /// A two element list headed by `quote`.
    pub fn is_quoted(&self, v: Value) -> bool {
        match v.repr() {
            Repr::List(cell) => {
                self.head_of(cell).as_sym() == Some(self.keywords.quote) && self.is_pair(v)
            },
            _ => false,
        }
    }

    /// Removes exactly one layer of quoting.
    pub fn unquote(&self, v: Value) -> Result<Value> {
        if !self.is_quoted(v) {
            return Err(Error::NotQuoted);
        }
        self.head(self.tail(v)?)
    }

    // Lambdas

    pub fn make_builtin(&mut self, builtin: Rc<dyn Builtin>) -> Result<Value> {
        if self.lambdas.len() > BOXED_LIMIT {
            return Err(Error::OutOfMemory);
        }

        let id = LambdaId(self.lambdas.len());
        self.lambdas.push(Lambda::builtin(builtin));
        Ok(Value::lambda(id))
    }

    pub fn make_builtin_fn(
        &mut self,
        name: &'static str,
        f: BuiltinFn,
        arity: usize,
    ) -> Result<Value> {
        self.make_builtin(Rc::new(FnBuiltin::new(name, arity, f)))
    }

    pub fn lambda(&self, id: LambdaId) -> &Lambda {
        &self.lambdas[id.index()]
    }

    // Errors

    /// Stores `err` as a value. Internal errors stay immediate.
    pub fn error(&mut self, err: Error) -> Value {
        match err {
            Error::Undefined => Value::undefined(),
            Error::OutOfMemory => Value::out_of_memory(),
            err if self.errors.len() <= BOXED_LIMIT => {
                let id = ErrorId(self.errors.len());
                self.errors.push(err);
                Value::error(id)
            },
            _ => Value::out_of_memory(),
        }
    }

    pub fn error_record(&self, id: ErrorId) -> &Error {
        &self.errors[id.index()]
    }

    pub fn error_kind(&self, v: Value) -> Option<ErrorKind> {
        match v.repr() {
            Repr::Internal(internal) => Some(internal.kind()),
            Repr::Error(id) => Some(self.errors[id.index()].kind()),
            _ => None,
        }
    }

    /// Recovers the `Error` carried by an error value.
    pub fn to_error(&self, v: Value) -> Option<Error> {
        match v.repr() {
            Repr::Internal(internal) => Some(match internal.kind() {
                ErrorKind::OutOfMemory => Error::OutOfMemory,
                _ => Error::Undefined,
            }),
            Repr::Error(id) => Some(self.errors[id.index()].clone()),
            _ => None,
        }
    }
}

pub struct ListIter<'a> {
    heap: &'a Heap,
    node: Value,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        let cell = self.node.as_cell()?;
        self.node = self.heap.tail_of(cell);
        Some(self.heap.head_of(cell))
    }
}
