use serde_derive::{Deserialize, Serialize};

use crate::symbol::SYM_MAX_CNT;

/// Default maximum number of cons cells in one heap.
pub const CELL_MAX_CNT: usize = 1 << 24;

/// Default maximum number of bindings in one environment.
pub const ENV_MAX_ENTRIES: usize = 1024;

/// Resource ceilings and builtin selection for an interpreter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_symbols: usize,
    pub max_cells: usize,
    pub env_capacity: usize,
    /// Install `head` and `tail`.
    pub list_builtins: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_symbols: SYM_MAX_CNT,
            max_cells: CELL_MAX_CNT,
            env_capacity: ENV_MAX_ENTRIES,
            list_builtins: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json() {
        let config: Config = serde_json::from_str(r#"{"env_capacity": 8}"#).unwrap();
        assert_eq!(
            config,
            Config {
                env_capacity: 8,
                ..Config::default()
            }
        );

        let config: Config = serde_json::from_str(r#"{"list_builtins": false}"#).unwrap();
        assert!(!config.list_builtins);
        assert_eq!(config.max_symbols, 1 << 20);
    }
}
