use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::heap::Heap;
use crate::lambda;
use crate::value::{SymId, Value};

/// A flat, write-once symbol table of bindings.
///
/// There are no nested scopes: once a symbol is bound it keeps its value for
/// the life of the environment.
pub struct Environment {
    bindings: HashMap<SymId, Value>,
    capacity: usize,
}

impl Environment {
    /// An environment seeded with `def` and the configured builtins.
    pub fn new(heap: &mut Heap, config: &Config) -> Result<Self> {
        let mut env = Environment {
            bindings: HashMap::new(),
            capacity: config.env_capacity,
        };

        // `def` is bound to itself so it can never be redefined.
        let def = heap.keywords().def;
        env.define(heap, def, Value::symbol(def))?;

        for builtin in lambda::builtins(config) {
            let sym = heap.intern(builtin.name())?;
            let value = heap.make_builtin(builtin)?;
            env.define(heap, sym, value)?;
        }

        Ok(env)
    }

    /// Binds `sym` to `v` unless it is already bound. Returns the symbol.
    pub fn define(&mut self, heap: &Heap, sym: SymId, v: Value) -> Result<Value> {
        if self.bindings.contains_key(&sym) {
            warn!(symbol = heap.name(sym), "rejected redefinition");
            return Err(Error::Redefinition {
                name: heap.name(sym).to_owned(),
            });
        }
        if self.bindings.len() >= self.capacity {
            return Err(Error::EnvironmentFull {
                capacity: self.capacity,
            });
        }

        debug!(symbol = heap.name(sym), "defined");
        self.bindings.insert(sym, v);
        Ok(Value::symbol(sym))
    }

    pub fn lookup(&self, heap: &Heap, sym: SymId) -> Result<Value> {
        self.bindings
            .get(&sym)
            .copied()
            .ok_or_else(|| Error::Unbound {
                name: heap.name(sym).to_owned(),
            })
    }

    pub fn is_bound(&self, sym: SymId) -> bool {
        self.bindings.contains_key(&sym)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// All bindings, in the order their symbols were interned.
    pub fn bindings(&self) -> Vec<(SymId, Value)> {
        let mut bindings: Vec<_> = self.bindings.iter().map(|(k, v)| (*k, *v)).collect();
        bindings.sort_by_key(|(sym, _)| *sym);
        bindings
    }
}
