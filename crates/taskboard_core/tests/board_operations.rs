use serde_json::json;
use taskboard_core::{
    upcoming_tasks, AccountService, BoardService, BoardServiceError, EntityId, MoveOutcome,
    NewTask, SortCriterion, TaskEdit, TreeError, Workspace, UPCOMING_LIMIT,
};

struct Fixture {
    workspace: Workspace,
    board: EntityId,
    list: EntityId,
}

fn fixture() -> Fixture {
    let mut workspace = Workspace::new();
    AccountService::new(&mut workspace.tree)
        .signup("ada", "pw")
        .unwrap();
    let mut boards = BoardService::new(&mut workspace);
    let board = boards.create_board("ada", "Work").unwrap();
    let list = boards.create_list(board, "Todo").unwrap();
    Fixture {
        workspace,
        board,
        list,
    }
}

fn task_names(workspace: &Workspace, list: EntityId) -> Vec<String> {
    workspace
        .tree
        .tasks_of(list)
        .into_iter()
        .map(|task| task.name.clone())
        .collect()
}

#[test]
fn names_are_trimmed_and_validated() {
    let mut fx = fixture();
    let mut boards = BoardService::new(&mut fx.workspace);

    let id = boards.create_board("ada", "  Groceries ").unwrap();
    assert_eq!(boards.boards("ada")[0].name, "Groceries");
    assert_eq!(boards.boards("ada")[0].id, id);

    assert_eq!(
        boards.create_board("ada", "   ").unwrap_err(),
        BoardServiceError::InvalidName
    );
    assert_eq!(
        boards.create_list(fx.board, "say \"hi\"").unwrap_err(),
        BoardServiceError::InvalidName
    );
    assert_eq!(
        boards.rename_list(fx.list, "two\nlines").unwrap_err(),
        BoardServiceError::InvalidName
    );
    assert_eq!(
        boards.create_board("nobody", "Board").unwrap_err(),
        BoardServiceError::Tree(TreeError::UserNotFound("nobody".to_string()))
    );
}

#[test]
fn positions_are_one_based() {
    let mut fx = fixture();
    let mut boards = BoardService::new(&mut fx.workspace);
    let newer = boards.create_board("ada", "Newer").unwrap();

    assert_eq!(boards.board_at("ada", 1).unwrap(), newer);
    assert_eq!(boards.board_at("ada", 2).unwrap(), fx.board);
    assert_eq!(
        boards.board_at("ada", 0).unwrap_err(),
        BoardServiceError::PositionOutOfRange {
            position: 0,
            available: 2
        }
    );
    assert_eq!(
        boards.list_at(fx.board, 2).unwrap_err(),
        BoardServiceError::PositionOutOfRange {
            position: 2,
            available: 1
        }
    );
    assert_eq!(boards.list_at(fx.board, 1).unwrap(), fx.list);
}

#[test]
fn add_task_rejects_invalid_input_without_changes() {
    let mut fx = fixture();
    let mut boards = BoardService::new(&mut fx.workspace);

    assert_eq!(
        boards
            .add_task(fx.list, NewTask::new("", "low", "2025-01-01"))
            .unwrap_err(),
        BoardServiceError::InvalidName
    );
    assert_eq!(
        boards
            .add_task(fx.list, NewTask::new("pay", " ", "2025-01-01"))
            .unwrap_err(),
        BoardServiceError::InvalidPriority
    );
    assert_eq!(
        boards
            .add_task(fx.list, NewTask::new("pay", "low", "2023-02-29"))
            .unwrap_err(),
        BoardServiceError::InvalidDate("2023-02-29".to_string())
    );
    assert_eq!(
        boards
            .add_task(999, NewTask::new("pay", "low", "2024-02-29"))
            .unwrap_err(),
        BoardServiceError::Tree(TreeError::ListNotFound(999))
    );
    assert!(boards.tasks(fx.list).is_empty());

    let id = boards
        .add_task(fx.list, NewTask::new("pay", "low", "2024-02-29"))
        .unwrap();
    assert_eq!(boards.task_at(fx.list, 1).unwrap(), id);
}

#[test]
fn edit_keeps_blank_fields_and_rejects_bad_dates() {
    let mut fx = fixture();
    let mut boards = BoardService::new(&mut fx.workspace);
    let id = boards
        .add_task(fx.list, NewTask::new("pay", "low", "2025-01-01"))
        .unwrap();

    let edited = boards
        .edit_task(
            id,
            TaskEdit {
                name: Some("  ".to_string()),
                priority: Some("high".to_string()),
                date: None,
            },
        )
        .unwrap();
    assert_eq!(edited.name, "pay");
    assert_eq!(edited.priority, "high");
    assert_eq!(edited.date, "2025-01-01");

    let err = boards
        .edit_task(
            id,
            TaskEdit {
                name: Some("renamed".to_string()),
                date: Some("2025-1-1".to_string()),
                ..TaskEdit::default()
            },
        )
        .unwrap_err();
    assert_eq!(err, BoardServiceError::InvalidDate("2025-1-1".to_string()));
    assert_eq!(boards.tasks(fx.list)[0].name, "pay");
}

#[test]
fn blank_edit_leaves_task_untouched() {
    let mut fx = fixture();
    let mut boards = BoardService::new(&mut fx.workspace);
    let id = boards
        .add_task(fx.list, NewTask::new("pay", "low", "2025-01-01"))
        .unwrap();

    let blank = TaskEdit {
        name: Some(" ".to_string()),
        priority: Some(String::new()),
        date: None,
    };
    let task = boards.edit_task(id, blank.clone()).unwrap();

    assert_eq!(task, boards.tasks(fx.list)[0].clone());
    assert_eq!(task.name, "pay");
    assert_eq!(task.priority, "low");
    assert_eq!(
        boards.edit_task(404, blank).unwrap_err(),
        BoardServiceError::Tree(TreeError::TaskNotFound(404))
    );
}

#[test]
fn priority_sort_puts_high_and_medium_first() {
    let mut fx = fixture();
    let mut boards = BoardService::new(&mut fx.workspace);
    for priority in ["low", "high", "medium", "bogus"] {
        boards
            .add_task(fx.list, NewTask::new(priority, priority, "2025-01-01"))
            .unwrap();
    }

    boards.sort_tasks(fx.list, SortCriterion::Priority).unwrap();

    let names = task_names(&fx.workspace, fx.list);
    assert_eq!(&names[..2], ["high", "medium"]);
    let mut tail = names[2..].to_vec();
    tail.sort();
    assert_eq!(tail, ["bogus", "low"]);
}

#[test]
fn date_sort_is_ascending() {
    let mut fx = fixture();
    let mut boards = BoardService::new(&mut fx.workspace);
    for date in ["2025-03-01", "2024-12-31", "2025-01-15"] {
        boards
            .add_task(fx.list, NewTask::new(date, "low", date))
            .unwrap();
    }

    boards.sort_tasks(fx.list, SortCriterion::Date).unwrap();

    assert_eq!(
        task_names(&fx.workspace, fx.list),
        ["2024-12-31", "2025-01-15", "2025-03-01"]
    );
}

#[test]
fn moves_stay_within_one_board() {
    let mut fx = fixture();
    let mut boards = BoardService::new(&mut fx.workspace);
    let done = boards.create_list(fx.board, "Done").unwrap();
    let other_board = boards.create_board("ada", "Home").unwrap();
    let foreign = boards.create_list(other_board, "Chores").unwrap();
    let task = boards
        .add_task(fx.list, NewTask::new("ship", "high", "2025-06-01"))
        .unwrap();

    assert_eq!(boards.move_task(task, fx.list).unwrap(), MoveOutcome::Unchanged);
    assert_eq!(
        boards.move_task(task, foreign).unwrap_err(),
        BoardServiceError::ListOutsideBoard {
            list_id: foreign,
            board_id: fx.board
        }
    );
    assert_eq!(
        boards.move_task(task, done).unwrap(),
        MoveOutcome::Moved {
            from: fx.list,
            to: done
        }
    );
    assert!(boards.tasks(fx.list).is_empty());
    assert_eq!(boards.tasks(done)[0].id, task);
}

#[test]
fn delete_list_drops_its_tasks() {
    let mut fx = fixture();
    let mut boards = BoardService::new(&mut fx.workspace);
    let task = boards
        .add_task(fx.list, NewTask::new("ship", "high", "2025-06-01"))
        .unwrap();

    let removed = boards.delete_list(fx.list).unwrap();

    assert_eq!(removed.name, "Todo");
    assert!(boards.lists(fx.board).is_empty());
    assert_eq!(
        boards.delete_task(task).unwrap_err(),
        BoardServiceError::Tree(TreeError::TaskNotFound(task))
    );
}

#[test]
fn upcoming_report_lists_future_tasks_by_date() {
    let mut fx = fixture();
    {
        let mut boards = BoardService::new(&mut fx.workspace);
        for (name, date) in [
            ("yesterday", "2024-12-31"),
            ("next-year", "2026-01-01"),
            ("today", "2025-01-01"),
            ("tomorrow", "2025-01-02"),
        ] {
            boards
                .add_task(fx.list, NewTask::new(name, "low", date))
                .unwrap();
        }
    }

    let report = upcoming_tasks(&fx.workspace.tree, "ada", "2025-01-01", UPCOMING_LIMIT).unwrap();

    let names: Vec<_> = report.iter().map(|entry| entry.task.name.as_str()).collect();
    assert_eq!(names, ["tomorrow", "next-year"]);
    assert_eq!(report[0].board_name, "Work");
    assert_eq!(report[0].list_name, "Todo");
}

#[test]
fn upcoming_report_is_capped_and_scoped_to_user() {
    let mut fx = fixture();
    AccountService::new(&mut fx.workspace.tree)
        .signup("bob", "pw")
        .unwrap();
    let mut boards = BoardService::new(&mut fx.workspace);
    let bob_board = boards.create_board("bob", "Bob's").unwrap();
    let bob_list = boards.create_list(bob_board, "Inbox").unwrap();
    boards
        .add_task(bob_list, NewTask::new("bob-task", "low", "2025-01-02"))
        .unwrap();
    for day in 3..=7 {
        let date = format!("2025-01-0{day}");
        boards
            .add_task(fx.list, NewTask::new(date.clone(), "low", date))
            .unwrap();
    }

    let report = upcoming_tasks(&fx.workspace.tree, "ada", "2025-01-01", UPCOMING_LIMIT).unwrap();

    let dates: Vec<_> = report.iter().map(|entry| entry.task.date.as_str()).collect();
    assert_eq!(dates, ["2025-01-03", "2025-01-04", "2025-01-05"]);
    assert_eq!(
        upcoming_tasks(&fx.workspace.tree, "carol", "2025-01-01", 3).unwrap_err(),
        TreeError::UserNotFound("carol".to_string())
    );
}

#[test]
fn report_entries_serialize_with_snake_case_fields() {
    let mut fx = fixture();
    let task = BoardService::new(&mut fx.workspace)
        .add_task(fx.list, NewTask::new("ship", "high", "2025-06-01"))
        .unwrap();

    let report = upcoming_tasks(&fx.workspace.tree, "ada", "2025-01-01", 1).unwrap();
    let value = serde_json::to_value(&report[0]).unwrap();

    assert_eq!(
        value,
        json!({
            "task": {
                "id": task,
                "name": "ship",
                "priority": "high",
                "date": "2025-06-01",
                "list_id": fx.list,
            },
            "board_name": "Work",
            "list_name": "Todo",
        })
    );
    assert_eq!(
        serde_json::to_value(SortCriterion::Priority).unwrap(),
        json!("priority")
    );
}
