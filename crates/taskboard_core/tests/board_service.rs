use chrono::NaiveDate;
use std::cell::RefCell;
use std::rc::Rc;
use taskboard_core::{
    BoardRepository, BoardService, ColumnKind, ColumnUpdate, DragKind, DragLocation, DragOutcome,
    DragResolution, EventEmitter, JsonStore, MemoryStore, NewBoard, NewColumn, NewTask,
    RepoError, StoreBackend, TaskRepository,
};

const BOARDS_KEY: &str = "kanban_boards";

fn service(store: &JsonStore<MemoryStore>) -> BoardService<'_, MemoryStore> {
    BoardService::new(TaskRepository::new(BoardRepository::new(store)))
}

fn at(container_id: &str, index: usize) -> DragLocation {
    DragLocation {
        container_id: container_id.to_string(),
        index,
    }
}

fn task_drag(source: DragLocation, destination: Option<DragLocation>) -> DragResolution {
    DragResolution {
        kind: DragKind::Task,
        source,
        destination,
    }
}

fn applied(outcome: DragOutcome) -> taskboard_core::Board {
    match outcome {
        DragOutcome::Applied(board) => board,
        other => panic!("expected applied drag, got {other:?}"),
    }
}

#[test]
fn drop_outside_any_list_is_cancelled_without_writing() {
    let store = JsonStore::new(MemoryStore::new());
    let events = EventEmitter::new();
    let signals = Rc::new(RefCell::new(0_usize));
    let counter = Rc::clone(&signals);
    events.subscribe(move |_| *counter.borrow_mut() += 1);
    let service = BoardService::new(TaskRepository::new(
        BoardRepository::new(&store).with_events(&events),
    ));
    let board = service.boards().create(NewBoard::named("Drag")).unwrap();
    let before = store.backend().read(BOARDS_KEY).unwrap();

    let outcome = service
        .apply_drag(&board.id, &task_drag(at(&board.columns[0].id, 0), None))
        .unwrap();

    assert_eq!(outcome, DragOutcome::Cancelled);
    assert_eq!(store.backend().read(BOARDS_KEY).unwrap(), before);
    assert_eq!(*signals.borrow(), 1);
}

#[test]
fn drop_on_origin_is_unchanged() {
    let store = JsonStore::new(MemoryStore::new());
    let service = service(&store);
    let board = service.boards().create(NewBoard::named("Drag")).unwrap();
    let column_id = board.columns[0].id.clone();
    service
        .tasks()
        .create(&board.id, &column_id, NewTask::titled("Still"))
        .unwrap();
    let before = store.backend().read(BOARDS_KEY).unwrap();

    let task_outcome = service
        .apply_drag(
            &board.id,
            &task_drag(at(&column_id, 0), Some(at(&column_id, 0))),
        )
        .unwrap();
    let column_outcome = service
        .apply_drag(
            &board.id,
            &DragResolution {
                kind: DragKind::Column,
                source: at(&board.id, 1),
                destination: Some(at(&board.id, 1)),
            },
        )
        .unwrap();

    assert_eq!(task_outcome, DragOutcome::Unchanged);
    assert_eq!(column_outcome, DragOutcome::Unchanged);
    assert_eq!(store.backend().read(BOARDS_KEY).unwrap(), before);
}

#[test]
fn column_drag_moves_column_and_keeps_the_rest() {
    let store = JsonStore::new(MemoryStore::new());
    let service = service(&store);
    let board = service.boards().create(NewBoard::named("Drag")).unwrap();
    let ids: Vec<String> = board.columns.iter().map(|c| c.id.clone()).collect();

    let moved = applied(
        service
            .apply_drag(
                &board.id,
                &DragResolution {
                    kind: DragKind::Column,
                    source: at(&board.id, 2),
                    destination: Some(at(&board.id, 0)),
                },
            )
            .unwrap(),
    );

    let order: Vec<&str> = moved.columns.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(order, vec![ids[2].as_str(), ids[0].as_str(), ids[1].as_str()]);
    assert_eq!(service.boards().get_by_id(&board.id).unwrap(), moved);
}

#[test]
fn task_drag_within_column_reorders() {
    let store = JsonStore::new(MemoryStore::new());
    let service = service(&store);
    let board = service.boards().create(NewBoard::named("Drag")).unwrap();
    let column_id = board.columns[0].id.clone();
    let ids: Vec<String> = ["A", "B", "C"]
        .into_iter()
        .map(|title| {
            service
                .tasks()
                .create(&board.id, &column_id, NewTask::titled(title))
                .unwrap()
                .id
        })
        .collect();

    let moved = applied(
        service
            .apply_drag(
                &board.id,
                &task_drag(at(&column_id, 0), Some(at(&column_id, 2))),
            )
            .unwrap(),
    );

    let order: Vec<&str> = moved.columns[0]
        .tasks
        .iter()
        .map(|task| task.id.as_str())
        .collect();
    assert_eq!(order, vec![ids[1].as_str(), ids[2].as_str(), ids[0].as_str()]);
}

#[test]
fn task_drag_across_columns_moves_task() {
    let store = JsonStore::new(MemoryStore::new());
    let service = service(&store);
    let board = service.boards().create(NewBoard::named("Drag")).unwrap();
    let todo = board.columns[0].id.clone();
    let done = board.columns[2].id.clone();
    let task = service
        .tasks()
        .create(&board.id, &todo, NewTask::titled("Finish"))
        .unwrap();

    let moved = applied(
        service
            .apply_drag(&board.id, &task_drag(at(&todo, 0), Some(at(&done, 0))))
            .unwrap(),
    );

    assert!(moved.column(&todo).unwrap().tasks.is_empty());
    assert_eq!(moved.column(&done).unwrap().tasks, vec![task]);
}

#[test]
fn task_drag_from_empty_slot_is_out_of_range() {
    let store = JsonStore::new(MemoryStore::new());
    let service = service(&store);
    let board = service.boards().create(NewBoard::named("Drag")).unwrap();
    let todo = board.columns[0].id.clone();
    let done = board.columns[2].id.clone();

    let err = service
        .apply_drag(&board.id, &task_drag(at(&todo, 0), Some(at(&done, 0))))
        .unwrap_err();

    assert_eq!(
        err,
        RepoError::PositionOutOfRange {
            container_id: todo,
            index: 0,
            len: 0,
        }
    );
}

#[test]
fn summary_counts_done_overdue_and_checklist() {
    let store = JsonStore::new(MemoryStore::new());
    let service = service(&store);
    let board = service
        .boards()
        .create(NewBoard {
            columns: Some(vec![
                NewColumn::named("Backlog"),
                NewColumn::named("Completed"),
                NewColumn {
                    kind: Some(ColumnKind::Done),
                    ..NewColumn::named("Shipped")
                },
            ]),
            ..NewBoard::named("Summary")
        })
        .unwrap();
    let backlog = board.columns[0].id.clone();
    let completed = board.columns[1].id.clone();
    let shipped = board.columns[2].id.clone();
    let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    let yesterday = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

    let late = service
        .tasks()
        .create(
            &board.id,
            &backlog,
            NewTask {
                due_date: Some(yesterday),
                checklist: vec!["one".to_string(), "two".to_string()],
                ..NewTask::titled("Late")
            },
        )
        .unwrap();
    service
        .tasks()
        .toggle_checklist_item(&board.id, &backlog, &late.id, &late.checklist[0].id)
        .unwrap();
    service
        .tasks()
        .create(
            &board.id,
            &backlog,
            NewTask {
                due_date: Some(today),
                ..NewTask::titled("Due today")
            },
        )
        .unwrap();
    service
        .tasks()
        .create(
            &board.id,
            &completed,
            NewTask {
                due_date: Some(yesterday),
                ..NewTask::titled("Finished late")
            },
        )
        .unwrap();
    service
        .tasks()
        .create(&board.id, &shipped, NewTask::titled("Released"))
        .unwrap();

    let summary = service.summary(&board.id, today).unwrap();

    assert_eq!(summary.total_tasks, 4);
    assert_eq!(summary.done_tasks, 2);
    assert_eq!(summary.overdue_tasks, 1);
    assert_eq!(summary.checklist_completed, 1);
    assert_eq!(summary.checklist_total, 2);
    let done_flags: Vec<bool> = summary.columns.iter().map(|c| c.is_done).collect();
    assert_eq!(done_flags, vec![false, true, true]);

    service
        .boards()
        .update_column(
            &board.id,
            &completed,
            ColumnUpdate {
                kind: Some(Some(ColumnKind::Active)),
                ..ColumnUpdate::default()
            },
        )
        .unwrap();
    let summary = service.summary(&board.id, today).unwrap();
    assert_eq!(summary.done_tasks, 1);
    assert_eq!(summary.overdue_tasks, 2);
}
