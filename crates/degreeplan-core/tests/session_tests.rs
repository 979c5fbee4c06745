mod common;

use std::sync::Arc;

use common::{create_test_planner, fall, fast_queue, seed_catalog, spring};
use degreeplan_core::{
    drag::{Point, Rect},
    exchange::{self, detect_conflicts, import_plan},
    models::{Season, SemesterId},
    Board, BoardMutation, DragPayload, DragSession, DropEvent, DropTarget, DropTargetKind,
    DropTargetRegistry, Edge, ImportStrategy, Operation, PlanSession, PlanStore, Planner,
};

/// Session over the user's stored board, writing back to the same planner.
async fn open_session(planner: &Arc<Planner>, user_id: u64) -> PlanSession {
    let board = planner.load_board(user_id).await.expect("Failed to load board");
    PlanSession::start(user_id, board, planner.clone(), fast_queue())
}

#[tokio::test]
async fn test_drag_between_semesters_persists_one_move() {
    let (_temp_dir, planner) = create_test_planner().await;
    let planner = Arc::new(planner);
    let catalog = seed_catalog(&planner).await;
    let user = planner.get_or_create_user("alice").await.unwrap();

    let mut session = open_session(&planner, user.id).await;
    session.add_semester(fall(2024)).unwrap();
    session.add_semester(spring(2025)).unwrap();
    let (cs, _) = session.add_course(fall(2024), &catalog[0]).unwrap();
    let (math, _) = session.add_course(spring(2025), &catalog[3]).unwrap();
    session.flush().await.unwrap();

    // Fall on the left, Spring on the right with MATH as its only card
    let mut registry = DropTargetRegistry::new();
    registry.register(
        DropTargetKind::Container { semester: fall(2024) },
        Rect::new(0.0, 0.0, 200.0, 600.0),
    );
    registry.register(
        DropTargetKind::Container { semester: spring(2025) },
        Rect::new(220.0, 0.0, 200.0, 600.0),
    );
    registry.register(
        DropTargetKind::Card { display_id: math.clone() },
        Rect::new(230.0, 10.0, 180.0, 50.0),
    );

    let mut drag = DragSession::start(DragPayload::course_card(cs.clone()));
    drag.update(&registry, Point::new(100.0, 30.0));
    drag.update(&registry, Point::new(300.0, 20.0));
    assert_eq!(drag.indicator(&math), Some(Edge::Top));

    let op = session.drop_course(&drag.finish()).unwrap();
    assert_eq!(
        op,
        Some(Operation::MoveCourse {
            user_id: user.id,
            source: fall(2024),
            destination: spring(2025),
            course_id: catalog[0].id,
        })
    );

    let spring_ids: Vec<&str> = session
        .board()
        .semester(spring(2025))
        .unwrap()
        .courses
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(spring_ids, vec![cs.as_str(), math.as_str()]);

    let (_, status) = session.close().await.unwrap();
    assert_eq!(status.stats.failed, 0);

    let fall_plan = planner.find_semester_plan(user.id, fall(2024)).await.unwrap().unwrap();
    let spring_plan = planner.find_semester_plan(user.id, spring(2025)).await.unwrap().unwrap();
    assert!(planner.plan_course_ids(fall_plan.id).await.unwrap().is_empty());
    let mut stored = planner.plan_course_ids(spring_plan.id).await.unwrap();
    stored.sort_unstable();
    let mut expected = vec![catalog[0].id, catalog[3].id];
    expected.sort_unstable();
    assert_eq!(stored, expected);
}

#[tokio::test]
async fn test_burst_of_moves_coalesces() {
    let (_temp_dir, planner) = create_test_planner().await;
    let planner = Arc::new(planner);
    let catalog = seed_catalog(&planner).await;
    let user = planner.get_or_create_user("alice").await.unwrap();

    let mut session = open_session(&planner, user.id).await;
    for semester in [fall(2024), spring(2025), fall(2025)] {
        session.add_semester(semester).unwrap();
    }
    let (cs, _) = session.add_course(fall(2024), &catalog[0]).unwrap();
    session.flush().await.unwrap();
    let executed_before = session.queue().status().stats.executed;

    // Fall 2024 -> Spring 2025 -> Fall 2025 inside one debounce window
    for (source, destination) in [(fall(2024), spring(2025)), (spring(2025), fall(2025))] {
        session
            .commit(BoardMutation::Move {
                display_id: cs.clone(),
                source,
                destination,
                destination_index: 0,
            })
            .unwrap();
    }

    let status = session.flush().await.unwrap();
    assert_eq!(status.stats.executed - executed_before, 1);
    assert!(status.stats.superseded >= 1);

    let target = planner.find_semester_plan(user.id, fall(2025)).await.unwrap().unwrap();
    assert_eq!(planner.plan_course_ids(target.id).await.unwrap(), vec![catalog[0].id]);
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_remove_and_delete_reach_the_store() {
    let (_temp_dir, planner) = create_test_planner().await;
    let planner = Arc::new(planner);
    let catalog = seed_catalog(&planner).await;
    let user = planner.get_or_create_user("alice").await.unwrap();

    let mut session = open_session(&planner, user.id).await;
    session.add_semester(fall(2024)).unwrap();
    session.add_semester(spring(2025)).unwrap();
    let (cs, _) = session.add_course(fall(2024), &catalog[0]).unwrap();
    session.add_course(spring(2025), &catalog[1]).unwrap();
    session.flush().await.unwrap();

    session.remove_course(&cs).unwrap();
    session.delete_semester(spring(2025)).unwrap();
    let (board, status) = session.close().await.unwrap();
    assert_eq!(status.stats.failed, 0);
    assert_eq!(board.semesters().len(), 1);

    let reloaded = planner.load_board(user.id).await.unwrap();
    assert_eq!(reloaded.semesters().len(), 1);
    assert!(reloaded.semesters()[0].courses.is_empty());
}

#[tokio::test]
async fn test_relationships_follow_visible_courses() {
    let (_temp_dir, planner) = create_test_planner().await;
    let planner = Arc::new(planner);
    let catalog = seed_catalog(&planner).await;
    let user = planner.get_or_create_user("alice").await.unwrap();

    let mut session = open_session(&planner, user.id).await;
    session.add_semester(fall(2024)).unwrap();
    for record in &catalog[..3] {
        session.add_course(fall(2024), record).unwrap();
    }

    let trees = planner.prerequisite_trees().await.unwrap();
    let graph = session.relationships(&trees);
    let highlight = graph.highlight("CS 3110");
    assert!(highlight.prerequisites.contains("CS 1110"));
    assert!(highlight.prerequisites.contains("CS 2110"));
    assert!(graph.highlight("CS 1110").postrequisites.contains("CS 3110"));
    assert!(graph.get("MATH 1910").is_none());

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_export_then_import_into_empty_plan() {
    let (_temp_dir, planner) = create_test_planner().await;
    let planner = Arc::new(planner);
    let catalog = seed_catalog(&planner).await;
    let alice = planner.get_or_create_user("alice").await.unwrap();

    let mut session = open_session(&planner, alice.id).await;
    session.add_semester(fall(2024)).unwrap();
    session.add_semester(spring(2025)).unwrap();
    session.add_course(fall(2024), &catalog[0]).unwrap();
    session.add_course(spring(2025), &catalog[1]).unwrap();
    let (board, _) = session.close().await.unwrap();

    let json = exchange::export_json(&board).unwrap();
    let parsed = exchange::parse_json(&json).unwrap();

    let bob = planner.get_or_create_user("bob").await.unwrap();
    assert!(detect_conflicts(planner.as_ref(), bob.id, &parsed).await.unwrap().is_empty());

    let report = import_plan(planner.as_ref(), bob.id, &parsed, ImportStrategy::Merge)
        .await
        .unwrap();
    assert!(report.success());
    assert_eq!(report.imported_courses, 2);
    assert!(report.errors.is_empty());

    let imported = planner.load_board(bob.id).await.unwrap();
    assert_eq!(exchange::board_semesters(&imported), exchange::board_semesters(&board));
}

#[tokio::test]
async fn test_import_conflicts_and_strategies() {
    let (_temp_dir, planner) = create_test_planner().await;
    let catalog = seed_catalog(&planner).await;
    let user = planner.get_or_create_user("alice").await.unwrap();

    let plan = planner.resolve_semester_plan(user.id, fall(2024)).await.unwrap();
    planner.add_course_to_plan(plan.id, catalog[3].id).await.unwrap();

    let parsed = exchange::parse_json(
        r#"[{"semester": "Fa 2024", "courses": [
                {"subject": "CS", "number": "1110", "name": "Intro"},
                {"subject": "CS", "number": "9999", "name": "Missing"}]},
            {"semester": "Autumn 2030", "courses": []}]"#,
    )
    .unwrap();

    let conflicts = detect_conflicts(&planner, user.id, &parsed).await.unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].plan_id, plan.id);
    assert_eq!(conflicts[0].existing_course_count, 1);
    assert_eq!(conflicts[0].import_course_count, 2);
    assert_eq!(conflicts[0].semester_id(), fall(2024));

    let merged = import_plan(&planner, user.id, &parsed, ImportStrategy::Merge).await.unwrap();
    assert_eq!(merged.imported_courses, 1);
    assert_eq!(merged.errors.len(), 2);
    assert!(merged.errors.iter().any(|e| e.contains("CS 9999")));
    assert!(merged.errors.iter().any(|e| e.contains("Autumn 2030")));
    assert_eq!(planner.plan_course_ids(plan.id).await.unwrap().len(), 2);

    let replaced = import_plan(&planner, user.id, &parsed, ImportStrategy::Replace).await.unwrap();
    assert!(replaced.message.starts_with("Cleared 2 existing course(s) from Fall 2024."));
    assert_eq!(planner.plan_course_ids(plan.id).await.unwrap(), vec![catalog[0].id]);
}

#[tokio::test]
async fn test_duplicate_course_in_semester_never_reaches_store() {
    let (_temp_dir, planner) = create_test_planner().await;
    let planner = Arc::new(planner);
    let catalog = seed_catalog(&planner).await;
    let user = planner.get_or_create_user("alice").await.unwrap();

    let mut session = open_session(&planner, user.id).await;
    session.add_semester(fall(2024)).unwrap();
    let (first, _) = session.add_course(fall(2024), &catalog[0]).unwrap();
    assert!(session.add_course(fall(2024), &catalog[0]).is_err());
    session.flush().await.unwrap();

    session.remove_course(&first).unwrap();
    let (board, status) = session.close().await.unwrap();
    assert_eq!(status.stats.failed, 0);
    assert!(board.semester(fall(2024)).unwrap().courses.is_empty());

    let reloaded = planner.load_board(user.id).await.unwrap();
    assert!(reloaded.semester(fall(2024)).unwrap().courses.is_empty());
}

#[tokio::test]
async fn test_move_trash_readd_move_reloads_like_the_board() {
    let (_temp_dir, planner) = create_test_planner().await;
    let planner = Arc::new(planner);
    let catalog = seed_catalog(&planner).await;
    let user = planner.get_or_create_user("alice").await.unwrap();
    let summer = SemesterId::new(Season::Summer, 2025);

    let mut session = open_session(&planner, user.id).await;
    for semester in [fall(2024), spring(2025), summer] {
        session.add_semester(semester).unwrap();
    }
    let (cs, _) = session.add_course(fall(2024), &catalog[0]).unwrap();
    session.flush().await.unwrap();

    session
        .drop_course(&DropEvent {
            display_id: cs.clone(),
            targets: vec![DropTarget::container(spring(2025))],
        })
        .unwrap();
    session
        .drop_course(&DropEvent {
            display_id: cs,
            targets: vec![DropTarget::trash()],
        })
        .unwrap();
    let (again, _) = session.add_course(spring(2025), &catalog[0]).unwrap();
    session
        .drop_course(&DropEvent {
            display_id: again,
            targets: vec![DropTarget::container(summer)],
        })
        .unwrap();

    let (board, status) = session.close().await.unwrap();
    assert_eq!(status.stats.failed, 0);
    let reloaded = planner.load_board(user.id).await.unwrap();
    let layout = |board: &Board| -> Vec<(SemesterId, String)> {
        board
            .semesters()
            .iter()
            .flat_map(|s| s.courses.iter().map(move |c| (s.id, c.code())))
            .collect()
    };
    assert_eq!(layout(&board), vec![(summer, "CS 1110".to_string())]);
    assert_eq!(layout(&reloaded), layout(&board));
}

#[tokio::test]
async fn test_add_course_returns_the_queued_write() {
    let (_temp_dir, planner) = create_test_planner().await;
    let planner = Arc::new(planner);
    let catalog = seed_catalog(&planner).await;
    let user = planner.get_or_create_user("alice").await.unwrap();

    let mut session = open_session(&planner, user.id).await;
    session.add_semester(fall(2024)).unwrap();
    let (display_id, op) = session.add_course(fall(2024), &catalog[3]).unwrap();

    assert_eq!(session.board().course_id(&display_id), Some(catalog[3].id));
    assert_eq!(
        op,
        Some(Operation::AddCourse {
            user_id: user.id,
            semester: fall(2024),
            course_id: catalog[3].id,
        })
    );
    session.close().await.unwrap();
}
