//! Repository configuration.
//!
//! # Responsibility
//! - Hold the storage key and entity defaults used by board factories.
//!
//! # Invariants
//! - `default_columns` colors must be valid `#rrggbb` values.
//! - Every repository reading one collection must use the same `boards_key`.

/// Store key holding the whole board collection.
pub const DEFAULT_BOARDS_KEY: &str = "kanban_boards";
pub const DEFAULT_BOARD_COLOR: &str = "#3b82f6";
pub const DEFAULT_COLUMN_COLOR: &str = "#64748b";

/// Name and color of a column seeded into new boards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnTemplate {
    pub name: String,
    pub color: String,
}

impl ColumnTemplate {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Defaults applied by `BoardRepository` when callers omit fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub boards_key: String,
    pub default_board_color: String,
    pub default_column_color: String,
    /// Columns created when a new board supplies none.
    pub default_columns: Vec<ColumnTemplate>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            boards_key: DEFAULT_BOARDS_KEY.to_string(),
            default_board_color: DEFAULT_BOARD_COLOR.to_string(),
            default_column_color: DEFAULT_COLUMN_COLOR.to_string(),
            default_columns: vec![
                ColumnTemplate::new("To Do", "#64748b"),
                ColumnTemplate::new("In Progress", "#f59e0b"),
                ColumnTemplate::new("Done", "#22c55e"),
            ],
        }
    }
}

impl BoardConfig {
    /// Same defaults, different storage key.
    pub fn with_boards_key(key: impl Into<String>) -> Self {
        Self {
            boards_key: key.into(),
            ..Self::default()
        }
    }
}
