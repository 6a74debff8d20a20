use std::collections::HashMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::value::{SymId, BOXED_LIMIT};

/// Symbol length limit, in bytes.
pub const SYM_MAX_LEN: usize = 255;

/// Default maximum number of symbols in one table.
pub const SYM_MAX_CNT: usize = 1 << 20;

/// A hash-consing symbol table.
///
/// Interning the same text twice returns the same `SymId`, so symbols from
/// one table can be compared by handle alone.
// TODO: names are stored twice (in `names` and as `index` keys); a single
// arena of `str` slices would halve that.
pub struct SymbolTable {
    names: Vec<Box<str>>,
    index: HashMap<Box<str>, SymId>,
    capacity: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::with_capacity(SYM_MAX_CNT)
    }

    /// A table holding at most `capacity` symbols.
    pub fn with_capacity(capacity: usize) -> Self {
        SymbolTable {
            names: Vec::new(),
            index: HashMap::new(),
            capacity: capacity.min(BOXED_LIMIT),
        }
    }

    pub fn intern(&mut self, name: &str) -> Result<SymId> {
        if name.is_empty() || name.len() > SYM_MAX_LEN {
            return Err(Error::InvalidSymbolLength { len: name.len() });
        }

        if let Some(id) = self.index.get(name) {
            return Ok(*id);
        }

        if self.names.len() >= self.capacity {
            return Err(Error::SymbolLimitExceeded {
                limit: self.capacity,
            });
        }

        let id = SymId(self.names.len());
        self.names.push(name.into());
        self.index.insert(name.into(), id);
        debug!(symbol = name, id = id.index(), "interned symbol");

        Ok(id)
    }

    /// Look a symbol up without interning it.
    pub fn get(&self, name: &str) -> Option<SymId> {
        self.index.get(name).copied()
    }

    pub fn name(&self, id: SymId) -> &str {
        &self.names[id.index()]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
