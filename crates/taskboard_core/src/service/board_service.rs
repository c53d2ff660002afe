//! Board use-case service.
//!
//! # Responsibility
//! - Turn a resolved drag gesture into exactly one repository command.
//! - Derive read-only board summaries (completion, overdue, checklist progress).
//!
//! # Invariants
//! - A cancelled drag (no destination) never reaches a repository.
//! - A drop onto the starting position is reported as unchanged, without a write.
//! - Completion is derived from the containing column, never stored on tasks.

use crate::model::board::Board;
use crate::model::ids::{BoardId, ColumnId};
use crate::repo::board_repo::{BoardRepository, RepoError, RepoResult};
use crate::repo::task_repo::TaskRepository;
use crate::store::StoreBackend;
use chrono::NaiveDate;
use log::debug;

/// What was dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Column,
    Task,
}

/// Position in a list: the board (for columns) or a column (for tasks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragLocation {
    pub container_id: String,
    pub index: usize,
}

/// Drag gesture as resolved by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragResolution {
    pub kind: DragKind,
    pub source: DragLocation,
    /// `None` when the drop landed outside any list.
    pub destination: Option<DragLocation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// The board after the single write.
    Applied(Board),
    Unchanged,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSummary {
    pub column_id: ColumnId,
    pub name: String,
    pub task_count: usize,
    pub is_done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSummary {
    pub board_id: BoardId,
    pub total_tasks: usize,
    pub done_tasks: usize,
    /// Tasks due before the reference date and not in a done column.
    pub overdue_tasks: usize,
    pub checklist_completed: usize,
    pub checklist_total: usize,
    pub columns: Vec<ColumnSummary>,
}

/// Service facade over the task repository (and its board repository).
pub struct BoardService<'s, B: StoreBackend> {
    tasks: TaskRepository<'s, B>,
}

impl<'s, B: StoreBackend> BoardService<'s, B> {
    pub fn new(tasks: TaskRepository<'s, B>) -> Self {
        Self { tasks }
    }

    pub fn boards(&self) -> &BoardRepository<'s, B> {
        self.tasks.boards()
    }

    pub fn tasks(&self) -> &TaskRepository<'s, B> {
        &self.tasks
    }

    /// Applies a resolved drag to the board.
    pub fn apply_drag(&self, board_id: &str, drag: &DragResolution) -> RepoResult<DragOutcome> {
        let Some(destination) = drag.destination.as_ref() else {
            debug!("event=drag_apply module=board_service status=skip reason=cancelled board_id={board_id}");
            return Ok(DragOutcome::Cancelled);
        };

        let same_container = drag.source.container_id == destination.container_id;
        if (drag.kind == DragKind::Column || same_container)
            && drag.source.index == destination.index
        {
            return Ok(DragOutcome::Unchanged);
        }

        let board = match drag.kind {
            DragKind::Column => self
                .boards()
                .move_column(board_id, drag.source.index, destination.index)?,
            DragKind::Task if same_container => self.tasks.reorder_within_column(
                board_id,
                &drag.source.container_id,
                drag.source.index,
                destination.index,
            )?,
            DragKind::Task => {
                let task_id = self.task_id_at(board_id, &drag.source)?;
                self.tasks.move_task(
                    board_id,
                    &drag.source.container_id,
                    &destination.container_id,
                    &task_id,
                    destination.index,
                )?
            }
        };
        Ok(DragOutcome::Applied(board))
    }

    /// Counts for a board relative to `today`.
    pub fn summary(&self, board_id: &str, today: NaiveDate) -> RepoResult<BoardSummary> {
        let board = self.boards().get_by_id(board_id)?;

        let mut summary = BoardSummary {
            board_id: board.id.clone(),
            total_tasks: 0,
            done_tasks: 0,
            overdue_tasks: 0,
            checklist_completed: 0,
            checklist_total: 0,
            columns: Vec::with_capacity(board.columns.len()),
        };

        for column in &board.columns {
            let is_done = column.is_done();
            summary.total_tasks += column.tasks.len();
            if is_done {
                summary.done_tasks += column.tasks.len();
            }

            for task in &column.tasks {
                if !is_done && task.due_date.is_some_and(|due| due < today) {
                    summary.overdue_tasks += 1;
                }
                let (completed, total) = task.checklist_progress();
                summary.checklist_completed += completed;
                summary.checklist_total += total;
            }

            summary.columns.push(ColumnSummary {
                column_id: column.id.clone(),
                name: column.name.clone(),
                task_count: column.tasks.len(),
                is_done,
            });
        }

        Ok(summary)
    }

    fn task_id_at(&self, board_id: &str, location: &DragLocation) -> RepoResult<String> {
        let board = self.boards().get_by_id(board_id)?;
        let column = board
            .column(&location.container_id)
            .ok_or_else(|| RepoError::ColumnNotFound {
                board_id: board.id.clone(),
                column_id: location.container_id.clone(),
            })?;
        column
            .tasks
            .get(location.index)
            .map(|task| task.id.clone())
            .ok_or_else(|| RepoError::PositionOutOfRange {
                container_id: location.container_id.clone(),
                index: location.index,
                len: column.tasks.len(),
            })
    }
}
