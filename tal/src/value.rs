//! Tagged-word value encoding.
//!
//! A `Value` is one machine word which either holds an immediate value or an
//! index into the owning `Heap` (in which case the value is boxed).
//!
//! The least significant bit is the storage tag:
//!   - 0: immediate
//!   - 1: boxed
//!
//! For immediates the next bit is the immediate type (0: error, 1: empty
//! list) and the remaining high bits are the payload. For boxed values the
//! next two bits are the boxed type (0: error, 1: symbol, 2: list, 3: lambda)
//! and the remaining high bits are the arena index.
//!
//! Field widths are derived from `usize::BITS`, so the layout keeps the same
//! relative order on 32- and 64-bit targets.

use std::fmt::{self, Debug, Formatter};

use crate::error::ErrorKind;

/// Number of bits in a value word.
pub const VAL_BITS: u32 = usize::BITS;

const STORAGE_BITS: u32 = 1;
const IMMED_TYPE_BITS: u32 = 1;
const BOXED_TYPE_BITS: u32 = 2;

const STORAGE_OFFSET: u32 = 0;
const IMMED_TYPE_OFFSET: u32 = STORAGE_OFFSET + STORAGE_BITS;
const IMMED_OFFSET: u32 = IMMED_TYPE_OFFSET + IMMED_TYPE_BITS;
const BOXED_TYPE_OFFSET: u32 = STORAGE_OFFSET + STORAGE_BITS;
const BOXED_OFFSET: u32 = BOXED_TYPE_OFFSET + BOXED_TYPE_BITS;

const STORAGE_MASK: usize = ((1 << STORAGE_BITS) - 1) << STORAGE_OFFSET;
const IMMED_TYPE_MASK: usize = ((1 << IMMED_TYPE_BITS) - 1) << IMMED_TYPE_OFFSET;
const BOXED_TYPE_MASK: usize = ((1 << BOXED_TYPE_BITS) - 1) << BOXED_TYPE_OFFSET;

/// Largest payload an immediate value can carry.
pub const IMMED_LIMIT: usize = usize::MAX >> IMMED_OFFSET;
/// Largest arena index a boxed value can carry.
pub const BOXED_LIMIT: usize = usize::MAX >> BOXED_OFFSET;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Storage {
    Immediate = 0,
    Boxed = 1,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ImmediateType {
    Error = 0,
    EmptyList = 1,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BoxedType {
    Error = 0,
    Symbol = 1,
    List = 2,
    Lambda = 3,
}

/// Payload of an immediate error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InternalError {
    Undefined = 0,
    OutOfMemory = 1,
}

impl InternalError {
    pub fn kind(self) -> ErrorKind {
        match self {
            InternalError::Undefined => ErrorKind::Undefined,
            InternalError::OutOfMemory => ErrorKind::OutOfMemory,
        }
    }
}

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) usize);

        impl $name {
            pub fn index(self) -> usize {
                self.0
            }
        }
    };
}

handle!(
    /// Interned symbol entry in a `SymbolTable`.
    SymId
);
handle!(
    /// Cons cell in a heap.
    CellId
);
handle!(
    /// Lambda record in a heap.
    LambdaId
);
handle!(
    /// Runtime error record in a heap.
    ErrorId
);

/// A decoded value. Matching on this is the only way to reach the handle
/// stored in a boxed value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Repr {
    Internal(InternalError),
    EmptyList,
    Error(ErrorId),
    Symbol(SymId),
    List(CellId),
    Lambda(LambdaId),
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Value(usize);

impl Value {
    const fn immediate(ty: ImmediateType, payload: usize) -> Value {
        Value(
            (payload << IMMED_OFFSET)
                | ((ty as usize) << IMMED_TYPE_OFFSET)
                | ((Storage::Immediate as usize) << STORAGE_OFFSET),
        )
    }

    fn boxed(ty: BoxedType, index: usize) -> Value {
        debug_assert!(index <= BOXED_LIMIT);
        Value(
            (index << BOXED_OFFSET)
                | ((ty as usize) << BOXED_TYPE_OFFSET)
                | ((Storage::Boxed as usize) << STORAGE_OFFSET),
        )
    }

    /// The all-zero word.
    pub const fn undefined() -> Value {
        Value::immediate(ImmediateType::Error, InternalError::Undefined as usize)
    }

    pub const fn out_of_memory() -> Value {
        Value::immediate(ImmediateType::Error, InternalError::OutOfMemory as usize)
    }

    pub const fn empty_list() -> Value {
        Value::immediate(ImmediateType::EmptyList, 0)
    }

    pub(crate) fn symbol(id: SymId) -> Value {
        Value::boxed(BoxedType::Symbol, id.0)
    }

    pub(crate) fn list(id: CellId) -> Value {
        Value::boxed(BoxedType::List, id.0)
    }

    pub(crate) fn lambda(id: LambdaId) -> Value {
        Value::boxed(BoxedType::Lambda, id.0)
    }

    pub(crate) fn error(id: ErrorId) -> Value {
        Value::boxed(BoxedType::Error, id.0)
    }

    /// Raw bits of the word.
    pub fn word(self) -> usize {
        self.0
    }

    pub fn storage(self) -> Storage {
        if (self.0 & STORAGE_MASK) >> STORAGE_OFFSET == Storage::Boxed as usize {
            Storage::Boxed
        } else {
            Storage::Immediate
        }
    }

    pub fn immediate_type(self) -> Option<ImmediateType> {
        match self.storage() {
            Storage::Immediate => {
                if (self.0 & IMMED_TYPE_MASK) >> IMMED_TYPE_OFFSET
                    == ImmediateType::EmptyList as usize
                {
                    Some(ImmediateType::EmptyList)
                } else {
                    Some(ImmediateType::Error)
                }
            },
            Storage::Boxed => None,
        }
    }

    pub fn boxed_type(self) -> Option<BoxedType> {
        match self.storage() {
            Storage::Immediate => None,
            Storage::Boxed => Some(match (self.0 & BOXED_TYPE_MASK) >> BOXED_TYPE_OFFSET {
                0 => BoxedType::Error,
                1 => BoxedType::Symbol,
                2 => BoxedType::List,
                _ => BoxedType::Lambda,
            }),
        }
    }

    /// Immediate payload bits, or `None` for boxed values.
    pub fn immediate_payload(self) -> Option<usize> {
        self.immediate_type().map(|_| self.0 >> IMMED_OFFSET)
    }

    /// Arena index of a boxed value, or `None` for immediates.
    pub fn boxed_index(self) -> Option<usize> {
        self.boxed_type().map(|_| self.0 >> BOXED_OFFSET)
    }

    pub fn repr(self) -> Repr {
        match self.storage() {
            Storage::Immediate => match self.immediate_type() {
                Some(ImmediateType::EmptyList) => Repr::EmptyList,
                _ => match self.0 >> IMMED_OFFSET {
                    1 => Repr::Internal(InternalError::OutOfMemory),
                    _ => Repr::Internal(InternalError::Undefined),
                },
            },
            Storage::Boxed => {
                let index = self.0 >> BOXED_OFFSET;
                match self.boxed_type() {
                    Some(BoxedType::Symbol) => Repr::Symbol(SymId(index)),
                    Some(BoxedType::List) => Repr::List(CellId(index)),
                    Some(BoxedType::Lambda) => Repr::Lambda(LambdaId(index)),
                    _ => Repr::Error(ErrorId(index)),
                }
            },
        }
    }

    pub fn is_immediate(self) -> bool {
        self.storage() == Storage::Immediate
    }

    pub fn is_boxed(self) -> bool {
        self.storage() == Storage::Boxed
    }

    pub fn is_sym(self) -> bool {
        self.boxed_type() == Some(BoxedType::Symbol)
    }

    pub fn is_empty_list(self) -> bool {
        self.immediate_type() == Some(ImmediateType::EmptyList)
    }

    pub fn is_nonempty_list(self) -> bool {
        self.boxed_type() == Some(BoxedType::List)
    }

    pub fn is_list(self) -> bool {
        self.is_empty_list() || self.is_nonempty_list()
    }

    pub fn is_lambda(self) -> bool {
        self.boxed_type() == Some(BoxedType::Lambda)
    }

    /// True for internal (immediate) and runtime (boxed) errors alike.
    pub fn is_err(self) -> bool {
        self.immediate_type() == Some(ImmediateType::Error)
            || self.boxed_type() == Some(BoxedType::Error)
    }

    pub fn as_sym(self) -> Option<SymId> {
        match self.repr() {
            Repr::Symbol(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_cell(self) -> Option<CellId> {
        match self.repr() {
            Repr::List(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_lambda(self) -> Option<LambdaId> {
        match self.repr() {
            Repr::Lambda(id) => Some(id),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::undefined()
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:#x}", self.repr(), self.0)
    }
}
