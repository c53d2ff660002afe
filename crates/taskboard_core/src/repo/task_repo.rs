//! Task repository for tasks nested inside board columns.
//!
//! # Responsibility
//! - Provide task CRUD addressed by board id + column id + task id.
//! - Move tasks within and across columns.
//! - Mutate task sub-entities: comments, attachments, checklist items.
//!
//! # Invariants
//! - Every call performs at most one board collection write, through
//!   `BoardRepository::mutate_board`.
//! - `move_task` conserves the board's task count and leaves the moved task
//!   unchanged; only its container and position change.
//! - Task `updated_at` is refreshed on updates and sub-entity mutations.

use crate::model::board::Board;
use crate::model::ids::{ColumnId, Timestamp};
use crate::model::task::{
    Attachment, ChecklistItem, Comment, NewAttachment, NewComment, NewTask, Task, TaskUpdate,
};
use crate::model::validation::require_text;
use crate::repo::board_repo::{column_mut, BoardRepository, RepoError, RepoResult};
use crate::store::StoreBackend;
use log::debug;

/// Task operations layered on a `BoardRepository`.
pub struct TaskRepository<'s, B: StoreBackend> {
    boards: BoardRepository<'s, B>,
}

impl<'s, B: StoreBackend> TaskRepository<'s, B> {
    pub fn new(boards: BoardRepository<'s, B>) -> Self {
        Self { boards }
    }

    /// The board repository this repository writes through.
    pub fn boards(&self) -> &BoardRepository<'s, B> {
        &self.boards
    }

    /// Single task lookup.
    pub fn get(&self, board_id: &str, column_id: &str, task_id: &str) -> RepoResult<Task> {
        let mut board = self.boards.get_by_id(board_id)?;
        task_mut(&mut board, column_id, task_id).cloned()
    }

    /// Searches every column of a board for `task_id`.
    ///
    /// Task ids are only unique per column; the first match in column order wins.
    pub fn find_task(&self, board_id: &str, task_id: &str) -> RepoResult<(ColumnId, Task)> {
        let board = self.boards.get_by_id(board_id)?;
        board
            .columns
            .into_iter()
            .find_map(|column| {
                let task = column.tasks.into_iter().find(|task| task.id == task_id)?;
                Some((column.id, task))
            })
            .ok_or_else(|| RepoError::ItemNotFound {
                kind: "task",
                id: task_id.to_string(),
            })
    }

    /// Appends a new task to the end of a column.
    pub fn create(&self, board_id: &str, column_id: &str, data: NewTask) -> RepoResult<Task> {
        self.boards.mutate_board(board_id, "task_create", |board| {
            let stamp = board.updated_at;
            let column = column_mut(board, column_id)?;
            let task = Task::create(data, stamp)?;
            column.tasks.push(task.clone());
            Ok(task)
        })
    }

    /// Shallow-merges `updates` onto a task.
    pub fn update(
        &self,
        board_id: &str,
        column_id: &str,
        task_id: &str,
        updates: TaskUpdate,
    ) -> RepoResult<Task> {
        self.boards.mutate_board(board_id, "task_update", |board| {
            let stamp = board.updated_at;
            let task = task_mut(board, column_id, task_id)?;
            task.apply(updates, stamp)?;
            Ok(task.clone())
        })
    }

    /// Removes a task with all its comments, attachments and checklist items.
    pub fn delete(&self, board_id: &str, column_id: &str, task_id: &str) -> RepoResult<()> {
        self.boards.mutate_board(board_id, "task_delete", |board| {
            let column = column_mut(board, column_id)?;
            let position = task_position(&column.tasks, column_id, task_id)?;
            column.tasks.remove(position);
            Ok(())
        })
    }

    /// Moves a task to `new_index` in `dest_column_id`.
    ///
    /// With equal source and destination this repositions the task inside
    /// one list; `new_index` then refers to the list without the task.
    /// Indices past the end append. Fails without writing when the task or
    /// either column is missing.
    pub fn move_task(
        &self,
        board_id: &str,
        source_column_id: &str,
        dest_column_id: &str,
        task_id: &str,
        new_index: usize,
    ) -> RepoResult<Board> {
        self.boards.mutate_board(board_id, "task_move", |board| {
            // Destination must exist before the task is detached.
            column_mut(board, dest_column_id)?;

            let source = column_mut(board, source_column_id)?;
            let position = task_position(&source.tasks, source_column_id, task_id)?;
            let task = source.tasks.remove(position);

            let dest = column_mut(board, dest_column_id)?;
            let target = new_index.min(dest.tasks.len());
            dest.tasks.insert(target, task);

            debug!(
                "event=task_move module=task_repo status=ok task_id={task_id} from={source_column_id} to={dest_column_id} index={target}"
            );
            Ok(board.clone())
        })
    }

    /// Moves the task at `from_index` to `to_index` within one column.
    pub fn reorder_within_column(
        &self,
        board_id: &str,
        column_id: &str,
        from_index: usize,
        to_index: usize,
    ) -> RepoResult<Board> {
        self.boards.mutate_board(board_id, "task_reorder", |board| {
            let column = column_mut(board, column_id)?;
            let len = column.tasks.len();
            if from_index >= len {
                return Err(RepoError::PositionOutOfRange {
                    container_id: column_id.to_string(),
                    index: from_index,
                    len,
                });
            }
            let task = column.tasks.remove(from_index);
            let target = to_index.min(column.tasks.len());
            column.tasks.insert(target, task);
            Ok(board.clone())
        })
    }

    /// Appends a comment with a fresh id and `created_at`.
    pub fn add_comment(
        &self,
        board_id: &str,
        column_id: &str,
        task_id: &str,
        comment: NewComment,
    ) -> RepoResult<Comment> {
        self.mutate_task(board_id, column_id, task_id, "comment_add", |task, stamp| {
            let comment = Comment::create(comment, stamp)?;
            task.comments.push(comment.clone());
            Ok(comment)
        })
    }

    pub fn delete_comment(
        &self,
        board_id: &str,
        column_id: &str,
        task_id: &str,
        comment_id: &str,
    ) -> RepoResult<()> {
        self.mutate_task(board_id, column_id, task_id, "comment_delete", |task, _| {
            remove_by_id(
                &mut task.comments,
                |c: &Comment| c.id == comment_id,
                "comment",
                comment_id,
            )
        })
    }

    /// Appends an attachment with a fresh id and `uploaded_at`.
    pub fn add_attachment(
        &self,
        board_id: &str,
        column_id: &str,
        task_id: &str,
        attachment: NewAttachment,
    ) -> RepoResult<Attachment> {
        self.mutate_task(board_id, column_id, task_id, "attachment_add", |task, stamp| {
            let attachment = Attachment::create(attachment, stamp)?;
            task.attachments.push(attachment.clone());
            Ok(attachment)
        })
    }

    pub fn delete_attachment(
        &self,
        board_id: &str,
        column_id: &str,
        task_id: &str,
        attachment_id: &str,
    ) -> RepoResult<()> {
        self.mutate_task(board_id, column_id, task_id, "attachment_delete", |task, _| {
            remove_by_id(
                &mut task.attachments,
                |a: &Attachment| a.id == attachment_id,
                "attachment",
                attachment_id,
            )
        })
    }

    /// Appends an unchecked checklist item.
    pub fn add_checklist_item(
        &self,
        board_id: &str,
        column_id: &str,
        task_id: &str,
        text: &str,
    ) -> RepoResult<ChecklistItem> {
        self.mutate_task(board_id, column_id, task_id, "checklist_add", |task, _| {
            let item = ChecklistItem::create(text)?;
            task.checklist.push(item.clone());
            Ok(item)
        })
    }

    pub fn update_checklist_item_text(
        &self,
        board_id: &str,
        column_id: &str,
        task_id: &str,
        item_id: &str,
        text: &str,
    ) -> RepoResult<ChecklistItem> {
        self.mutate_task(board_id, column_id, task_id, "checklist_update", |task, _| {
            require_text("checklist item", text)?;
            let item = checklist_item_mut(task, item_id)?;
            item.text = text.to_string();
            Ok(item.clone())
        })
    }

    /// Flips `completed` on one checklist item and returns the new state.
    pub fn toggle_checklist_item(
        &self,
        board_id: &str,
        column_id: &str,
        task_id: &str,
        item_id: &str,
    ) -> RepoResult<ChecklistItem> {
        self.mutate_task(board_id, column_id, task_id, "checklist_toggle", |task, _| {
            let item = checklist_item_mut(task, item_id)?;
            item.completed = !item.completed;
            Ok(item.clone())
        })
    }

    pub fn delete_checklist_item(
        &self,
        board_id: &str,
        column_id: &str,
        task_id: &str,
        item_id: &str,
    ) -> RepoResult<()> {
        self.mutate_task(board_id, column_id, task_id, "checklist_delete", |task, _| {
            remove_by_id(
                &mut task.checklist,
                |i: &ChecklistItem| i.id == item_id,
                "checklist item",
                item_id,
            )
        })
    }

    fn mutate_task<T>(
        &self,
        board_id: &str,
        column_id: &str,
        task_id: &str,
        operation: &'static str,
        apply: impl FnOnce(&mut Task, Timestamp) -> RepoResult<T>,
    ) -> RepoResult<T> {
        self.boards.mutate_board(board_id, operation, |board| {
            let stamp = board.updated_at;
            let task = task_mut(board, column_id, task_id)?;
            let value = apply(task, stamp)?;
            task.updated_at = stamp;
            Ok(value)
        })
    }
}

fn task_mut<'b>(
    board: &'b mut Board,
    column_id: &str,
    task_id: &str,
) -> RepoResult<&'b mut Task> {
    column_mut(board, column_id)?
        .task_mut(task_id)
        .ok_or_else(|| RepoError::TaskNotFound {
            column_id: column_id.to_string(),
            task_id: task_id.to_string(),
        })
}

fn task_position(tasks: &[Task], column_id: &str, task_id: &str) -> RepoResult<usize> {
    tasks
        .iter()
        .position(|task| task.id == task_id)
        .ok_or_else(|| RepoError::TaskNotFound {
            column_id: column_id.to_string(),
            task_id: task_id.to_string(),
        })
}

fn checklist_item_mut<'t>(
    task: &'t mut Task,
    item_id: &str,
) -> RepoResult<&'t mut ChecklistItem> {
    task.checklist_item_mut(item_id)
        .ok_or_else(|| RepoError::ItemNotFound {
            kind: "checklist item",
            id: item_id.to_string(),
        })
}

fn remove_by_id<T>(
    items: &mut Vec<T>,
    matches: impl Fn(&T) -> bool,
    kind: &'static str,
    id: &str,
) -> RepoResult<()> {
    let position = items
        .iter()
        .position(matches)
        .ok_or_else(|| RepoError::ItemNotFound {
            kind,
            id: id.to_string(),
        })?;
    items.remove(position);
    Ok(())
}
