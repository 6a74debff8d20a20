//! Callable values and builtin dispatch.
//!
//! Arguments are evaluated by the evaluator before `apply` is called, so a
//! builtin always receives a proper list of values.

use std::fmt::{self, Debug, Formatter};
use std::rc::Rc;

use tracing::debug;

use crate::config::Config;
use crate::env::Environment;
use crate::error::{Error, Result};
use crate::heap::Heap;
use crate::value::{LambdaId, Value};

pub trait Builtin {
    fn name(&self) -> &str;
    fn arity(&self) -> usize;
    fn call(&self, heap: &mut Heap, env: &mut Environment, args: Value) -> Result<Value>;
}

pub type BuiltinFn = fn(&mut Heap, &mut Environment, Value) -> Result<Value>;

/// A builtin backed by a plain function pointer.
#[derive(Copy, Clone)]
pub struct FnBuiltin {
    name: &'static str,
    arity: usize,
    f: BuiltinFn,
}

impl FnBuiltin {
    pub const fn new(name: &'static str, arity: usize, f: BuiltinFn) -> Self {
        FnBuiltin { name, arity, f }
    }
}

impl Builtin for FnBuiltin {
    fn name(&self) -> &str {
        self.name
    }

    fn arity(&self) -> usize {
        self.arity
    }

    fn call(&self, heap: &mut Heap, env: &mut Environment, args: Value) -> Result<Value> {
        (self.f)(heap, env, args)
    }
}

#[derive(Clone)]
pub enum LambdaKind {
    Builtin(Rc<dyn Builtin>),
}

#[derive(Clone)]
pub struct Lambda {
    arity: usize,
    kind: LambdaKind,
}

impl Lambda {
    pub fn builtin(builtin: Rc<dyn Builtin>) -> Self {
        Lambda {
            arity: builtin.arity(),
            kind: LambdaKind::Builtin(builtin),
        }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn kind(&self) -> &LambdaKind {
        &self.kind
    }

    pub fn name(&self) -> &str {
        match &self.kind {
            LambdaKind::Builtin(builtin) => builtin.name(),
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.kind, LambdaKind::Builtin(_))
    }
}

impl Debug for Lambda {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LambdaKind::Builtin(builtin) => {
                write!(f, "Builtin({}/{})", builtin.name(), self.arity)
            },
        }
    }
}

/// Calls `lambda` with the already evaluated `args`.
pub fn apply(heap: &mut Heap, env: &mut Environment, lambda: LambdaId, args: Value) -> Result<Value> {
    let lambda = heap.lambda(lambda).clone();
    let given = heap.count(args)?;
    if given != lambda.arity() {
        return Err(Error::ArityMismatch {
            name: lambda.name().to_owned(),
            expected: lambda.arity(),
            given,
        });
    }

    match lambda.kind() {
        LambdaKind::Builtin(builtin) => {
            debug!(builtin = builtin.name(), arity = given, "calling builtin");
            builtin.call(heap, env, args)
        },
    }
}

fn builtin_quote(heap: &mut Heap, _env: &mut Environment, args: Value) -> Result<Value> {
    heap.head(args)
}

fn builtin_head(heap: &mut Heap, _env: &mut Environment, args: Value) -> Result<Value> {
    let l = heap.head(args)?;
    heap.head(l)
}

fn builtin_tail(heap: &mut Heap, _env: &mut Environment, args: Value) -> Result<Value> {
    let l = heap.head(args)?;
    heap.tail(l)
}

pub const QUOTE: FnBuiltin = FnBuiltin::new("quote", 1, builtin_quote);
pub const HEAD: FnBuiltin = FnBuiltin::new("head", 1, builtin_head);
pub const TAIL: FnBuiltin = FnBuiltin::new("tail", 1, builtin_tail);

/// The builtins an environment is seeded with.
pub fn builtins(config: &Config) -> Vec<Rc<dyn Builtin>> {
    let mut builtins: Vec<Rc<dyn Builtin>> = vec![Rc::new(QUOTE)];
    if config.list_builtins {
        builtins.push(Rc::new(HEAD));
        builtins.push(Rc::new(TAIL));
    }
    builtins
}
