//! Tree-walking evaluation of values.
//!
//! Forms are dispatched in order: the empty list, symbols, quoted forms,
//! `def` forms, and finally application of a symbol bound to a lambda.
//! Recursion depth follows the nesting depth of the form.

use tracing::trace;

use crate::env::Environment;
use crate::error::{Error, Result};
use crate::heap::Heap;
use crate::lambda::apply;
use crate::value::{CellId, Repr, SymId, Value};

pub fn eval(heap: &mut Heap, env: &mut Environment, exp: Value) -> Result<Value> {
    trace!(form = %heap.display(exp), "eval");
    match exp.repr() {
        Repr::EmptyList => Ok(exp),
        Repr::Symbol(sym) => env.lookup(heap, sym),
        Repr::List(cell) => eval_list(heap, env, exp, cell),
        _ => Err(Error::Undefined),
    }
}

fn eval_list(heap: &mut Heap, env: &mut Environment, exp: Value, cell: CellId) -> Result<Value> {
    if heap.is_quoted(exp) {
        return heap.unquote(exp);
    }

    if let Some((sym, body)) = definition(heap, exp) {
        let value = eval(heap, env, body)?;
        return env.define(heap, sym, value);
    }

    let head = match heap.head_of(cell).as_sym() {
        Some(sym) => sym,
        None => return Err(Error::Undefined),
    };

    let exprs = heap.to_vec(heap.tail_of(cell))?;
    let mut values = Vec::with_capacity(exprs.len());
    for expr in exprs {
        values.push(eval(heap, env, expr)?);
    }
    let args = heap.list_from(&values)?;

    match env.lookup(heap, head)?.as_lambda() {
        Some(lambda) => apply(heap, env, lambda, args),
        None => Err(Error::NotCallable {
            name: heap.name(head).to_owned(),
        }),
    }
}

/// `(def <symbol> <expr>)`
fn definition(heap: &Heap, exp: Value) -> Option<(SymId, Value)> {
    if !heap.is_triple(exp) {
        return None;
    }

    let mut items = heap.iter(exp);
    let keyword = items.next()?.as_sym()?;
    let sym = items.next()?.as_sym()?;
    let body = items.next()?;

    if keyword == heap.keywords().def {
        Some((sym, body))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    struct Fixture {
        heap: Heap,
        env: Environment,
    }

    impl Fixture {
        fn new() -> Self {
            let mut heap = Heap::new().unwrap();
            let env = Environment::new(&mut heap, &Config::default()).unwrap();
            Fixture { heap, env }
        }

        fn sym(&mut self, name: &str) -> Value {
            self.heap.sym(name).unwrap()
        }

        fn list(&mut self, values: &[Value]) -> Value {
            self.heap.list_from(values).unwrap()
        }

        fn quote(&mut self, v: Value) -> Value {
            self.heap.quote(v).unwrap()
        }

        fn eval(&mut self, v: Value) -> Result<Value> {
            eval(&mut self.heap, &mut self.env, v)
        }
    }

    #[test]
    fn test_self_evaluating() {
        let mut fx = Fixture::new();
        assert_eq!(fx.eval(Value::empty_list()), Ok(Value::empty_list()));
    }

    #[test]
    fn test_def() {
        let mut fx = Fixture::new();
        let def = fx.sym("def");
        let x = fx.sym("x");
        let v0 = fx.sym("v0");
        let v1 = fx.sym("v1");

        assert_eq!(fx.eval(x), Err(Error::Unbound { name: "x".into() }));

        let q0 = fx.quote(v0);
        let exp0 = fx.list(&[def, x, q0]);
        assert_eq!(fx.eval(exp0), Ok(x));
        assert_eq!(fx.eval(x), Ok(v0));

        let q1 = fx.quote(v1);
        let exp1 = fx.list(&[def, x, q1]);
        assert_eq!(fx.eval(exp1), Err(Error::Redefinition { name: "x".into() }));
        assert_eq!(fx.eval(x), Ok(v0));
    }

    #[test]
    fn test_failed_def_does_not_bind() {
        let mut fx = Fixture::new();
        let def = fx.sym("def");
        let x = fx.sym("x");
        let unbound = fx.sym("unbound");

        let exp = fx.list(&[def, x, unbound]);
        assert_eq!(
            fx.eval(exp),
            Err(Error::Unbound {
                name: "unbound".into()
            })
        );
        assert!(fx.eval(x).is_err());
    }

    #[test]
    fn test_quoted() {
        let mut fx = Fixture::new();
        let v0 = fx.sym("v0");
        let quoted = fx.quote(v0);
        assert_eq!(fx.eval(quoted), Ok(v0));
    }

    #[test]
    fn test_multi_quoted() {
        let mut fx = Fixture::new();
        let v0 = fx.sym("v0");
        let quoted0 = fx.quote(v0);
        let quoted1 = fx.quote(quoted0);
        assert_eq!(fx.eval(quoted1), Ok(quoted0));
    }

    #[test]
    fn test_application() {
        let mut fx = Fixture::new();
        let head = fx.sym("head");
        let tail = fx.sym("tail");
        let a = fx.sym("a");
        let b = fx.sym("b");

        let ab = fx.list(&[a, b]);
        let qab = fx.quote(ab);
        let exp = fx.list(&[head, qab]);
        assert_eq!(fx.eval(exp), Ok(a));

        let exp = fx.list(&[tail, qab]);
        let rest = fx.eval(exp).unwrap();
        assert_eq!(fx.heap.to_vec(rest).unwrap(), vec![b]);

        // (head (tail '(a b)))
        let inner = fx.list(&[tail, qab]);
        let exp = fx.list(&[head, inner]);
        assert_eq!(fx.eval(exp), Ok(b));
    }

    #[test]
    fn test_head_of_empty_list() {
        let mut fx = Fixture::new();
        let head = fx.sym("head");
        let empty = fx.quote(Value::empty_list());
        let exp = fx.list(&[head, empty]);
        assert_eq!(fx.eval(exp), Err(Error::EmptyListAccess { op: "head" }));
    }

    #[test]
    fn test_argument_errors_short_circuit() {
        let mut fx = Fixture::new();
        let head = fx.sym("head");
        let nope = fx.sym("nope");
        let exp = fx.list(&[head, nope]);
        assert_eq!(fx.eval(exp), Err(Error::Unbound { name: "nope".into() }));
    }

    #[test]
    fn test_not_callable() {
        let mut fx = Fixture::new();
        let def = fx.sym("def");
        let x = fx.sym("x");
        let y = fx.sym("y");
        let qy = fx.quote(y);
        let exp = fx.list(&[def, x, qy]);
        fx.eval(exp).unwrap();

        let call = fx.list(&[x]);
        assert_eq!(fx.eval(call), Err(Error::NotCallable { name: "x".into() }));

        // A malformed `def` falls through to application of the keyword.
        let bad_def = fx.list(&[def, x]);
        assert_eq!(
            fx.eval(bad_def),
            Err(Error::NotCallable { name: "def".into() })
        );
    }

    #[test]
    fn test_malformed_quote_checks_arity() {
        let mut fx = Fixture::new();
        let quote = fx.sym("quote");
        let a = fx.sym("a");
        let qa = fx.quote(a);
        let exp = fx.list(&[quote, qa, qa]);
        assert_eq!(
            fx.eval(exp),
            Err(Error::ArityMismatch {
                name: "quote".into(),
                expected: 1,
                given: 2
            })
        );
    }

    #[test]
    fn test_non_symbol_head() {
        let mut fx = Fixture::new();
        let a = fx.sym("a");
        let inner = fx.list(&[a]);
        let exp = fx.list(&[inner, a]);
        assert_eq!(fx.eval(exp), Err(Error::Undefined));
        assert_eq!(fx.eval(Value::undefined()), Err(Error::Undefined));
    }

    #[test]
    fn test_lambda_is_not_self_evaluating() {
        let mut fx = Fixture::new();
        let head = fx.sym("head");
        let lambda = fx.eval(head).unwrap();
        assert!(lambda.is_lambda());
        assert_eq!(fx.eval(lambda), Err(Error::Undefined));
    }
}
