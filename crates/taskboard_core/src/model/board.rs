//! Board aggregate root and its columns.
//!
//! # Responsibility
//! - Define the persisted board/column shape.
//! - Centralize board/column construction and defaulting.
//! - Apply shallow-merge update payloads.
//!
//! # Invariants
//! - `columns` holds no duplicate ids; order is the only position carrier.
//! - A board owns its columns exclusively, a column owns its tasks.
//! - `id` and `created_at` are never part of an update payload.

use crate::config::BoardConfig;
use crate::model::ids::{
    generate_id, BoardId, ColumnId, Timestamp, BOARD_ID_PREFIX, COLUMN_ID_PREFIX,
};
use crate::model::member::Member;
use crate::model::task::Task;
use crate::model::validation::{normalize_color, normalize_name, ValidationError};
use serde::{Deserialize, Serialize};

/// Kanban board. The whole graph below it is stored as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub color: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub members: Vec<Member>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Explicit workflow role of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Backlog,
    Active,
    Done,
}

/// Ordered task list inside a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Unset on columns created before kinds existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ColumnKind>,
}

/// Create payload for a board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBoard {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    /// `None` seeds the configured default columns; `Some(vec![])` creates
    /// a board without columns.
    pub columns: Option<Vec<NewColumn>>,
    pub members: Vec<Member>,
}

impl NewBoard {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Shallow-merge payload for a board. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub members: Option<Vec<Member>>,
}

/// Create payload for a column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewColumn {
    pub name: String,
    pub color: Option<String>,
    pub kind: Option<ColumnKind>,
}

impl NewColumn {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Shallow-merge payload for a column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
    /// `Some(None)` clears an explicit kind.
    pub kind: Option<Option<ColumnKind>>,
}

impl Board {
    /// Builds a new board, filling every omitted field from `config`.
    pub fn create(
        data: NewBoard,
        config: &BoardConfig,
        at: Timestamp,
    ) -> Result<Self, ValidationError> {
        let name = normalize_name("board", &data.name)?;
        let color = normalize_color(
            data.color
                .as_deref()
                .unwrap_or(&config.default_board_color),
        )?;
        let columns = match data.columns {
            Some(columns) => columns
                .into_iter()
                .map(|column| Column::create(column, &config.default_column_color))
                .collect::<Result<Vec<_>, _>>()?,
            None => config
                .default_columns
                .iter()
                .map(|template| {
                    Column::create(
                        NewColumn {
                            name: template.name.clone(),
                            color: Some(template.color.clone()),
                            kind: None,
                        },
                        &config.default_column_color,
                    )
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(Self {
            id: generate_id(BOARD_ID_PREFIX),
            name,
            description: data.description.unwrap_or_default(),
            color,
            columns,
            members: data.members,
            created_at: at,
            updated_at: at,
        })
    }

    /// Overlays the supplied fields. Validates everything before touching `self`.
    pub fn apply(&mut self, update: BoardUpdate) -> Result<(), ValidationError> {
        let name = update
            .name
            .map(|name| normalize_name("board", &name))
            .transpose()?;
        let color = update.color.map(|color| normalize_color(&color)).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(color) = color {
            self.color = color;
        }
        if let Some(members) = update.members {
            self.members = members;
        }
        Ok(())
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.id == column_id)
    }

    pub fn column_mut(&mut self, column_id: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|column| column.id == column_id)
    }

    /// Number of tasks across all columns.
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|column| column.tasks.len()).sum()
    }
}

impl Column {
    /// Builds a new empty column.
    pub fn create(data: NewColumn, default_color: &str) -> Result<Self, ValidationError> {
        let name = normalize_name("column", &data.name)?;
        let color = normalize_color(data.color.as_deref().unwrap_or(default_color))?;
        Ok(Self {
            id: generate_id(COLUMN_ID_PREFIX),
            name,
            color,
            tasks: Vec::new(),
            kind: data.kind,
        })
    }

    pub fn apply(&mut self, update: ColumnUpdate) -> Result<(), ValidationError> {
        let name = update
            .name
            .map(|name| normalize_name("column", &name))
            .transpose()?;
        let color = update.color.map(|color| normalize_color(&color)).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(color) = color {
            self.color = color;
        }
        if let Some(kind) = update.kind {
            self.kind = kind;
        }
        Ok(())
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == task_id)
    }

    /// Whether tasks in this column count as completed.
    ///
    /// An explicit `kind` wins. Without one, completion is inferred from the
    /// column name, so renaming such a column changes the status of every
    /// task inside it.
    pub fn is_done(&self) -> bool {
        match self.kind {
            Some(kind) => kind == ColumnKind::Done,
            None => name_suggests_done(&self.name),
        }
    }
}

/// Name heuristic: contains "done" or "complete", case-insensitive.
pub fn name_suggests_done(name: &str) -> bool {
    let lowered = name.to_lowercase();
    lowered.contains("done") || lowered.contains("complete")
}

#[cfg(test)]
mod tests {
    use super::{
        name_suggests_done, Board, BoardUpdate, Column, ColumnKind, NewBoard, NewColumn,
    };
    use crate::config::BoardConfig;
    use crate::model::ids::now;
    use crate::model::validation::ValidationError;

    #[test]
    fn create_seeds_three_default_columns() {
        let board =
            Board::create(NewBoard::named("Sprint 1"), &BoardConfig::default(), now()).unwrap();

        let names: Vec<_> = board.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["To Do", "In Progress", "Done"]);
        assert!(board.columns.iter().all(|c| c.tasks.is_empty()));
        assert_eq!(board.description, "");
        assert_eq!(board.created_at, board.updated_at);
        assert!(board.id.starts_with("board_"));
    }

    #[test]
    fn create_with_empty_column_list_keeps_it_empty() {
        let data = NewBoard {
            columns: Some(Vec::new()),
            ..NewBoard::named("Blank")
        };
        let board = Board::create(data, &BoardConfig::default(), now()).unwrap();
        assert!(board.columns.is_empty());
    }

    #[test]
    fn apply_rejects_invalid_color_without_partial_write() {
        let mut board =
            Board::create(NewBoard::named("Ops"), &BoardConfig::default(), now()).unwrap();
        let err = board
            .apply(BoardUpdate {
                name: Some("Renamed".to_string()),
                color: Some("blue".to_string()),
                ..BoardUpdate::default()
            })
            .unwrap_err();

        assert!(matches!(err, ValidationError::InvalidColor(_)));
        assert_eq!(board.name, "Ops");
    }

    #[test]
    fn done_detection_prefers_explicit_kind() {
        let mut column = Column::create(NewColumn::named("Completed"), "#000000").unwrap();
        assert!(column.is_done());

        column.kind = Some(ColumnKind::Active);
        assert!(!column.is_done());

        column.name = "Shipping".to_string();
        column.kind = Some(ColumnKind::Done);
        assert!(column.is_done());
    }

    #[test]
    fn name_heuristic_is_case_insensitive() {
        assert!(name_suggests_done("DONE"));
        assert!(name_suggests_done("Almost Complete"));
        assert!(!name_suggests_done("Review"));
    }
}
