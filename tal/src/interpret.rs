//! The `Interpreter` facade: one heap, one environment, source in, values out.

use tracing::debug;

use crate::config::Config;
use crate::env::Environment;
use crate::error::{Error, Result};
use crate::eval::eval;
use crate::heap::Heap;
use crate::parse::{parse, Parser};
use crate::print::Printer;
use crate::value::Value;

pub struct Interpreter {
    heap: Heap,
    env: Environment,
}

impl Interpreter {
    pub fn new() -> Result<Self> {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Result<Self> {
        let mut heap = Heap::with_config(config)?;
        let env = Environment::new(&mut heap, config)?;
        debug!(bindings = env.len(), "interpreter ready");
        Ok(Interpreter { heap, env })
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Parses `src` into a list of its top-level forms.
    pub fn parse(&mut self, src: &str) -> Result<Value> {
        parse(&mut self.heap, src)
    }

    /// Evaluates `exp`, which must come from this interpreter's heap.
    /// Values from elsewhere are rejected as `Undefined`.
    pub fn eval(&mut self, exp: Value) -> Result<Value> {
        if !self.heap.contains(exp) {
            return Err(Error::Undefined);
        }
        eval(&mut self.heap, &mut self.env, exp)
    }

    /// Evaluates each top-level form of `src` in order.
    ///
    /// Stops after the first form that fails; that failure is the last
    /// element. A parse error anywhere in `src` is returned before anything
    /// is evaluated.
    pub fn eval_forms(&mut self, src: &str) -> Result<Vec<Result<Value>>> {
        let forms = Parser::new(&mut self.heap, src).collect::<Result<Vec<_>>>()?;

        let mut results = Vec::with_capacity(forms.len());
        for form in forms {
            let result = self.eval(form);
            let failed = result.is_err();
            results.push(result);
            if failed {
                break;
            }
        }
        Ok(results)
    }

    /// Like `eval_forms`, but collects the results into a list value with
    /// failures stored as error values.
    pub fn eval_source(&mut self, src: &str) -> Result<Value> {
        let values: Vec<Value> = self
            .eval_forms(src)?
            .into_iter()
            .map(|result| result.unwrap_or_else(|err| self.heap.error(err)))
            .collect();
        self.heap.list_from(&values)
    }

    /// Current binding of `name`. Never interns `name`.
    pub fn lookup(&self, name: &str) -> Result<Value> {
        match self.heap.symbols().get(name) {
            Some(sym) => self.env.lookup(&self.heap, sym),
            None => Err(Error::Unbound {
                name: name.to_owned(),
            }),
        }
    }

    pub fn display(&self, value: Value) -> Printer<'_> {
        self.heap.display(value)
    }
}
