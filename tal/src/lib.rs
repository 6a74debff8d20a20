pub mod value;
pub mod error;
pub mod symbol;
pub mod heap;
pub mod lambda;
pub mod env;
pub mod lex;
pub mod parse;
pub mod eval;
pub mod interpret;
pub mod print;
pub mod debug;
pub mod config;

pub use config::Config;
pub use env::Environment;
pub use error::{Error, ErrorKind, Result};
pub use heap::Heap;
pub use interpret::Interpreter;
pub use print::Datum;
pub use value::Value;
