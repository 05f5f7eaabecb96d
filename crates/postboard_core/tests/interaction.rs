use postboard_core::canvas::controller::ControllerCommand;
use postboard_core::canvas::render::build_scene;
use postboard_core::{
    CanvasEvent, GraphError, GraphModel, InteractionController, InteractionMode, LayoutAssigner,
    Position, Post, Project,
};

fn placed_graph(ids: &[&str]) -> GraphModel {
    let mut project = Project::with_id("P1", "Board");
    for id in ids {
        let mut post = Post::new("P1", id, "note").unwrap();
        post.id = id.to_string();
        project.posts.push(post);
    }
    let mut graph = GraphModel::new(project);
    LayoutAssigner::default().assign(&mut graph);
    graph
}

fn tap(id: &str) -> CanvasEvent {
    CanvasEvent::TapNode(id.to_string())
}

#[test]
fn connect_mode_fans_out_from_one_source() {
    let mut graph = placed_graph(&["p1", "p2", "p3"]);
    let mut controller = InteractionController::new();

    assert_eq!(controller.handle(CanvasEvent::ToggleConnect, &mut graph), None);
    assert_eq!(controller.mode(), &InteractionMode::ConnectingNoSource);
    assert_eq!(controller.handle(tap("p1"), &mut graph), None);
    assert_eq!(
        controller.mode(),
        &InteractionMode::ConnectingWithSource("p1".to_string())
    );

    let first = controller.handle(tap("p2"), &mut graph);
    let second = controller.handle(tap("p3"), &mut graph);
    assert!(matches!(first, Some(ControllerCommand::PersistConnection(ref c)) if c.post_b == "p2"));
    assert!(matches!(second, Some(ControllerCommand::PersistConnection(ref c)) if c.post_b == "p3"));
    assert_eq!(controller.connect_source(), Some("p1"));
    assert_eq!(graph.connections().len(), 2);
}

#[test]
fn tapping_source_again_is_declined_as_self_loop() {
    let mut graph = placed_graph(&["p1", "p2"]);
    let mut controller = InteractionController::new();
    controller.handle(CanvasEvent::ToggleConnect, &mut graph);
    controller.handle(tap("p1"), &mut graph);

    let command = controller.handle(tap("p1"), &mut graph);
    assert_eq!(
        command,
        Some(ControllerCommand::Declined(GraphError::SelfLoop("p1".to_string())))
    );
    assert!(graph.connections().is_empty());
    assert_eq!(controller.connect_source(), Some("p1"));
}

#[test]
fn background_tap_clears_source_only_when_connecting() {
    let mut graph = placed_graph(&["p1", "p2"]);
    let mut controller = InteractionController::new();

    controller.handle(CanvasEvent::TapBackground, &mut graph);
    assert_eq!(controller.mode(), &InteractionMode::Idle);

    controller.handle(CanvasEvent::ToggleConnect, &mut graph);
    controller.handle(tap("p2"), &mut graph);
    controller.handle(CanvasEvent::TapBackground, &mut graph);
    assert_eq!(controller.mode(), &InteractionMode::ConnectingNoSource);

    controller.handle(CanvasEvent::ToggleConnect, &mut graph);
    assert_eq!(controller.mode(), &InteractionMode::Idle);
}

#[test]
fn idle_tap_opens_post_and_other_modes_do_not() {
    let mut graph = placed_graph(&["p1"]);
    let mut controller = InteractionController::new();

    assert_eq!(
        controller.handle(tap("p1"), &mut graph),
        Some(ControllerCommand::OpenPost("p1".to_string()))
    );

    controller.handle(CanvasEvent::ToggleReposition, &mut graph);
    assert_eq!(controller.handle(tap("p1"), &mut graph), None);
}

#[test]
fn drag_commits_once_on_release() {
    let mut graph = placed_graph(&["p1", "p2", "p3"]);
    let mut controller = InteractionController::new();
    controller.handle(CanvasEvent::ToggleReposition, &mut graph);
    controller.handle(
        CanvasEvent::PressNode {
            post_id: "p2".to_string(),
            pointer: Position::new(225.0, 205.0),
        },
        &mut graph,
    );

    for step in 1..=4 {
        let offset = f64::from(step) * 10.0;
        controller.handle(
            CanvasEvent::DragTo(Position::new(225.0 + offset, 205.0 + offset)),
            &mut graph,
        );
        assert_eq!(graph.position("p2"), Some(Position::new(220.0, 200.0)));
    }
    assert_eq!(
        build_scene(&graph, &controller).node("p2").unwrap().position,
        Position::new(260.0, 240.0)
    );

    controller.handle(CanvasEvent::Release(Position::new(265.0, 245.0)), &mut graph);
    assert_eq!(graph.position("p2"), Some(Position::new(260.0, 240.0)));
    assert_eq!(controller.mode(), &InteractionMode::RepositionArmed);
}

#[test]
fn press_outside_reposition_mode_does_not_drag() {
    let mut graph = placed_graph(&["p1"]);
    let mut controller = InteractionController::new();
    controller.handle(
        CanvasEvent::PressNode {
            post_id: "p1".to_string(),
            pointer: Position::new(100.0, 200.0),
        },
        &mut graph,
    );
    controller.handle(CanvasEvent::Release(Position::new(0.0, 0.0)), &mut graph);

    assert_eq!(controller.mode(), &InteractionMode::Idle);
    assert_eq!(graph.position("p1"), Some(Position::new(100.0, 200.0)));
}

#[test]
fn entering_connect_mode_abandons_drag() {
    let mut graph = placed_graph(&["p1"]);
    let mut controller = InteractionController::new();
    controller.handle(CanvasEvent::ToggleReposition, &mut graph);
    controller.handle(
        CanvasEvent::PressNode {
            post_id: "p1".to_string(),
            pointer: Position::new(100.0, 200.0),
        },
        &mut graph,
    );
    controller.handle(CanvasEvent::ToggleConnect, &mut graph);
    controller.handle(CanvasEvent::Release(Position::new(0.0, 0.0)), &mut graph);

    assert_eq!(controller.mode(), &InteractionMode::ConnectingNoSource);
    assert_eq!(controller.preview_position("p1"), None);
    assert_eq!(graph.position("p1"), Some(Position::new(100.0, 200.0)));
}

#[test]
fn stale_connect_source_is_dropped_after_snapshot_change() {
    let mut graph = placed_graph(&["p1", "p2"]);
    let mut controller = InteractionController::new();
    controller.handle(CanvasEvent::ToggleConnect, &mut graph);
    controller.handle(tap("p1"), &mut graph);

    let mut shrunk = graph.project().clone();
    shrunk.remove_post("p1");
    graph.replace_project(shrunk);

    assert_eq!(
        controller.drop_stale_references(&graph),
        Some("p1".to_string())
    );
    assert_eq!(controller.mode(), &InteractionMode::ConnectingNoSource);
    assert_eq!(controller.drop_stale_references(&graph), None);
}

#[test]
fn reset_returns_to_idle() {
    let mut graph = placed_graph(&["p1"]);
    let mut controller = InteractionController::new();
    controller.handle(CanvasEvent::ToggleConnect, &mut graph);
    controller.handle(tap("p1"), &mut graph);
    controller.reset();
    assert_eq!(controller.mode(), &InteractionMode::Idle);
}

#[test]
fn gestures_on_unplaced_post_are_ignored() {
    let mut graph = placed_graph(&["p1"]);
    let mut late = Post::new("P1", "Late", "note").unwrap();
    late.id = "late".to_string();
    assert!(graph.upsert_post(late).unwrap());
    assert!(!graph.has_position("late"));
    let mut controller = InteractionController::new();

    assert_eq!(controller.handle(tap("late"), &mut graph), None);
    assert_eq!(controller.mode(), &InteractionMode::Idle);

    controller.handle(CanvasEvent::ToggleConnect, &mut graph);
    assert_eq!(controller.handle(tap("late"), &mut graph), None);
    assert_eq!(controller.mode(), &InteractionMode::ConnectingNoSource);
    controller.handle(tap("p1"), &mut graph);
    assert_eq!(controller.handle(tap("late"), &mut graph), None);
    assert_eq!(controller.connect_source(), Some("p1"));
    assert!(graph.connections().is_empty());

    controller.handle(CanvasEvent::ToggleReposition, &mut graph);
    controller.handle(
        CanvasEvent::PressNode {
            post_id: "late".to_string(),
            pointer: Position::new(0.0, 0.0),
        },
        &mut graph,
    );
    assert_eq!(controller.mode(), &InteractionMode::RepositionArmed);
    assert_eq!(controller.preview_position("late"), None);
    controller.handle(CanvasEvent::Release(Position::new(40.0, 40.0)), &mut graph);
    assert!(!graph.has_position("late"));
}
