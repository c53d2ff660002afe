//! Core domain logic for the kanban board.
//! This crate is the single source of truth for board, column and task invariants.

pub mod config;
pub mod db;
pub mod events;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{BoardConfig, ColumnTemplate};
pub use events::{ChangeSignal, EventEmitter, SubscriptionId};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::board::{Board, BoardUpdate, Column, ColumnKind, ColumnUpdate, NewBoard, NewColumn};
pub use model::ids::{generate_id, now, BoardId, ColumnId, TaskId, Timestamp};
pub use model::member::{Label, Member};
pub use model::task::{
    Attachment, ChecklistItem, Comment, CommentAuthor, NewAttachment, NewComment, NewTask,
    Priority, Task, TaskUpdate,
};
pub use model::validation::ValidationError;
pub use repo::board_repo::{BoardRepository, RepoError, RepoResult};
pub use repo::task_repo::TaskRepository;
pub use service::board_service::{
    BoardService, BoardSummary, ColumnSummary, DragKind, DragLocation, DragOutcome,
    DragResolution,
};
pub use store::{JsonStore, MemoryStore, SqliteStore, StoreBackend, StoreError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
