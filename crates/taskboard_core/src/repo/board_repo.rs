//! Board repository over the JSON key-value store.
//!
//! # Responsibility
//! - Own the board collection stored under one store key.
//! - Provide board CRUD, column operations and membership changes.
//! - Provide the read-modify-write primitive the task repository builds on.
//!
//! # Invariants
//! - Every mutation reads the whole collection, edits one board in memory and
//!   writes the whole collection back with exactly one `set`.
//! - A failed call (missing entity, invalid input, rejected write) leaves the
//!   store untouched and emits no change signal.
//! - Board `updated_at` is refreshed on every successful mutation.
//! - Last write wins; there is no version check.

use crate::config::BoardConfig;
use crate::events::{ChangeSignal, EventEmitter};
use crate::model::board::{Board, BoardUpdate, Column, ColumnUpdate, NewBoard, NewColumn};
use crate::model::ids::{now, BoardId, ColumnId, TaskId};
use crate::model::member::Member;
use crate::model::validation::{normalize_name, ValidationError};
use crate::store::{JsonStore, StoreBackend};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository failure, split by cause.
///
/// Every variant implies the store was not modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    BoardNotFound(BoardId),
    ColumnNotFound {
        board_id: BoardId,
        column_id: ColumnId,
    },
    TaskNotFound {
        column_id: ColumnId,
        task_id: TaskId,
    },
    /// Comment, attachment, checklist item or member lookup miss.
    ItemNotFound { kind: &'static str, id: String },
    /// Index-based move outside the current list bounds.
    PositionOutOfRange {
        container_id: String,
        index: usize,
        len: usize,
    },
    Validation(ValidationError),
    /// The store rejected the write.
    Storage { key: String },
}

impl RepoError {
    /// Whether this is a lookup miss rather than a rejected or failed write.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BoardNotFound(_)
                | Self::ColumnNotFound { .. }
                | Self::TaskNotFound { .. }
                | Self::ItemNotFound { .. }
                | Self::PositionOutOfRange { .. }
        )
    }

    fn code(&self) -> &'static str {
        match self {
            Self::BoardNotFound(_) => "board_not_found",
            Self::ColumnNotFound { .. } => "column_not_found",
            Self::TaskNotFound { .. } => "task_not_found",
            Self::ItemNotFound { .. } => "item_not_found",
            Self::PositionOutOfRange { .. } => "position_out_of_range",
            Self::Validation(_) => "validation_failed",
            Self::Storage { .. } => "storage_failed",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BoardNotFound(id) => write!(f, "board not found: {id}"),
            Self::ColumnNotFound {
                board_id,
                column_id,
            } => write!(f, "column not found: {column_id} in board {board_id}"),
            Self::TaskNotFound { column_id, task_id } => {
                write!(f, "task not found: {task_id} in column {column_id}")
            }
            Self::ItemNotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::PositionOutOfRange {
                container_id,
                index,
                len,
            } => write!(
                f,
                "position {index} is out of range for `{container_id}` with {len} entries"
            ),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage { key } => write!(f, "failed to persist store key `{key}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Board CRUD over a `JsonStore`.
pub struct BoardRepository<'s, B: StoreBackend> {
    store: &'s JsonStore<B>,
    events: Option<&'s EventEmitter>,
    config: BoardConfig,
}

impl<'s, B: StoreBackend> BoardRepository<'s, B> {
    pub fn new(store: &'s JsonStore<B>) -> Self {
        Self {
            store,
            events: None,
            config: BoardConfig::default(),
        }
    }

    /// Broadcasts a `ChangeSignal` after every successful write.
    pub fn with_events(mut self, events: &'s EventEmitter) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_config(mut self, config: BoardConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// All boards in stored order. Empty when nothing (readable) is stored.
    pub fn get_all(&self) -> Vec<Board> {
        self.store.get(&self.config.boards_key, Vec::new())
    }

    /// Single board by id; linear scan of `get_all()`.
    pub fn get_by_id(&self, id: &str) -> RepoResult<Board> {
        self.get_all()
            .into_iter()
            .find(|board| board.id == id)
            .ok_or_else(|| RepoError::BoardNotFound(id.to_string()))
    }

    /// Creates a board, seeding default columns when none are supplied.
    pub fn create(&self, data: NewBoard) -> RepoResult<Board> {
        let board = Board::create(data, &self.config, now())
            .map_err(|err| self.log_failure("board_create", RepoError::from(err)))?;

        let mut boards = self.get_all();
        boards.push(board.clone());
        self.persist(&boards, "board_create")?;

        info!(
            "event=board_create module=board_repo status=ok board_id={} column_count={}",
            board.id,
            board.columns.len()
        );
        Ok(board)
    }

    /// Shallow-merges `updates` onto the board.
    pub fn update(&self, id: &str, updates: BoardUpdate) -> RepoResult<Board> {
        self.mutate_board(id, "board_update", |board| {
            board.apply(updates)?;
            Ok(board.clone())
        })
    }

    /// Removes a board and everything it owns. Succeeds for unknown ids.
    pub fn delete(&self, id: &str) -> RepoResult<()> {
        let mut boards = self.get_all();
        let before = boards.len();
        boards.retain(|board| board.id != id);

        if boards.len() == before {
            debug!("event=board_delete module=board_repo status=skip reason=absent board_id={id}");
            return Ok(());
        }

        self.persist(&boards, "board_delete")?;
        info!("event=board_delete module=board_repo status=ok board_id={id}");
        Ok(())
    }

    /// Appends a new empty column.
    pub fn add_column(&self, board_id: &str, data: NewColumn) -> RepoResult<Column> {
        let default_color = self.config.default_column_color.clone();
        self.mutate_board(board_id, "column_add", move |board| {
            let column = Column::create(data, &default_color)?;
            board.columns.push(column.clone());
            Ok(column)
        })
    }

    /// Shallow-merges `updates` onto one column in place.
    pub fn update_column(
        &self,
        board_id: &str,
        column_id: &str,
        updates: ColumnUpdate,
    ) -> RepoResult<Column> {
        self.mutate_board(board_id, "column_update", |board| {
            let column = column_mut(board, column_id)?;
            column.apply(updates)?;
            Ok(column.clone())
        })
    }

    /// Removes a column together with every task inside it.
    pub fn delete_column(&self, board_id: &str, column_id: &str) -> RepoResult<()> {
        self.mutate_board(board_id, "column_delete", |board| {
            let position = column_position(board, column_id)?;
            let removed = board.columns.remove(position);
            debug!(
                "event=column_delete module=board_repo status=ok column_id={column_id} cascaded_tasks={}",
                removed.tasks.len()
            );
            Ok(())
        })
    }

    /// Rebuilds `columns` from `ordered_column_ids`.
    ///
    /// This filters as well as reorders: ids that match no column are
    /// ignored, repeated ids are taken once, and any existing column whose id
    /// is missing from the input is removed from the board together with its
    /// tasks. Use [`Self::move_column`] for a pure permutation.
    pub fn reorder_columns<I>(
        &self,
        board_id: &str,
        ordered_column_ids: &[I],
    ) -> RepoResult<Board>
    where
        I: AsRef<str>,
    {
        self.mutate_board(board_id, "column_reorder", |board| {
            let mut remaining = std::mem::take(&mut board.columns);
            let mut reordered = Vec::with_capacity(ordered_column_ids.len());
            for id in ordered_column_ids {
                if let Some(position) = remaining.iter().position(|c| c.id == id.as_ref()) {
                    reordered.push(remaining.remove(position));
                }
            }

            if !remaining.is_empty() {
                warn!(
                    "event=column_reorder module=board_repo status=ok board_id={} dropped_columns={}",
                    board.id,
                    remaining.len()
                );
            }
            board.columns = reordered;
            Ok(board.clone())
        })
    }

    /// Moves the column at `from_index` to `to_index`, keeping every column.
    ///
    /// `to_index` past the end places the column last.
    pub fn move_column(
        &self,
        board_id: &str,
        from_index: usize,
        to_index: usize,
    ) -> RepoResult<Board> {
        self.mutate_board(board_id, "column_move", |board| {
            let len = board.columns.len();
            if from_index >= len {
                return Err(RepoError::PositionOutOfRange {
                    container_id: board.id.clone(),
                    index: from_index,
                    len,
                });
            }
            let column = board.columns.remove(from_index);
            let target = to_index.min(board.columns.len());
            board.columns.insert(target, column);
            Ok(board.clone())
        })
    }

    /// Adds a member, replacing any existing entry with the same id in place.
    pub fn add_member(&self, board_id: &str, member: Member) -> RepoResult<Member> {
        self.mutate_board(board_id, "member_add", |board| {
            let name = normalize_name("member", &member.name)?;
            let member = Member { name, ..member };
            match board.members.iter_mut().find(|m| m.id == member.id) {
                Some(existing) => *existing = member.clone(),
                None => board.members.push(member.clone()),
            }
            Ok(member)
        })
    }

    /// Removes a member from the board and from every task's assignees.
    pub fn remove_member(&self, board_id: &str, member_id: &str) -> RepoResult<()> {
        self.mutate_board(board_id, "member_remove", |board| {
            let before = board.members.len();
            board.members.retain(|m| m.id != member_id);
            if board.members.len() == before {
                return Err(RepoError::ItemNotFound {
                    kind: "member",
                    id: member_id.to_string(),
                });
            }

            for task in board.columns.iter_mut().flat_map(|c| c.tasks.iter_mut()) {
                task.assignees.retain(|m| m.id != member_id);
            }
            Ok(())
        })
    }

    /// Loads the collection, applies `apply` to one board and persists.
    ///
    /// The board's `updated_at` is stamped before `apply` runs, so `apply` can
    /// reuse it for nested timestamps. Nothing is written if `apply` fails.
    pub(crate) fn mutate_board<T>(
        &self,
        board_id: &str,
        operation: &'static str,
        apply: impl FnOnce(&mut Board) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let mut boards = self.get_all();
        let Some(board) = boards.iter_mut().find(|board| board.id == board_id) else {
            let err = RepoError::BoardNotFound(board_id.to_string());
            return Err(self.log_failure(operation, err));
        };

        board.updated_at = now();
        let value = apply(board).map_err(|err| self.log_failure(operation, err))?;

        self.persist(&boards, operation)?;
        debug!("event={operation} module=board_repo status=ok board_id={board_id}");
        Ok(value)
    }

    fn persist(&self, boards: &[Board], operation: &'static str) -> RepoResult<()> {
        let key = &self.config.boards_key;
        if !self.store.set(key, boards) {
            error!(
                "event={operation} module=board_repo status=error error_code=storage_failed key={key}"
            );
            return Err(RepoError::Storage { key: key.clone() });
        }

        if let Some(events) = self.events {
            events.emit(ChangeSignal { operation });
        }
        Ok(())
    }

    fn log_failure(&self, operation: &'static str, err: RepoError) -> RepoError {
        debug!(
            "event={operation} module=board_repo status=error error_code={}",
            err.code()
        );
        err
    }
}

/// Finds a column or reports which one is missing.
pub(crate) fn column_mut<'b>(
    board: &'b mut Board,
    column_id: &str,
) -> RepoResult<&'b mut Column> {
    let board_id = board.id.clone();
    board
        .column_mut(column_id)
        .ok_or_else(|| RepoError::ColumnNotFound {
            board_id,
            column_id: column_id.to_string(),
        })
}

fn column_position(board: &Board, column_id: &str) -> RepoResult<usize> {
    board
        .columns
        .iter()
        .position(|column| column.id == column_id)
        .ok_or_else(|| RepoError::ColumnNotFound {
            board_id: board.id.clone(),
            column_id: column_id.to_string(),
        })
}
