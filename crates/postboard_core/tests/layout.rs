use postboard_core::{GraphModel, LayoutAssigner, LayoutConfig, Position, Post, Project};

fn board(ids: &[&str]) -> Project {
    let mut project = Project::with_id("P1", "Board");
    for id in ids {
        let mut post = Post::new("P1", &format!("Post {id}"), "note").unwrap();
        post.id = id.to_string();
        project.posts.push(post);
    }
    project
}

fn positions(graph: &GraphModel) -> Vec<(String, Option<Position>)> {
    graph
        .posts()
        .iter()
        .map(|post| (post.id.clone(), graph.position(&post.id)))
        .collect()
}

#[test]
fn fresh_board_fills_three_column_grid() {
    let mut graph = GraphModel::new(board(&["p1", "p2", "p3", "p4", "p5"]));
    let placed = LayoutAssigner::default().assign(&mut graph);

    assert_eq!(placed, 5);
    assert_eq!(graph.position("p1"), Some(Position::new(100.0, 200.0)));
    assert_eq!(graph.position("p2"), Some(Position::new(220.0, 200.0)));
    assert_eq!(graph.position("p3"), Some(Position::new(340.0, 200.0)));
    assert_eq!(graph.position("p4"), Some(Position::new(100.0, 320.0)));
    assert_eq!(graph.position("p5"), Some(Position::new(220.0, 320.0)));
}

#[test]
fn layout_is_deterministic_across_runs() {
    let ids = ["a", "b", "c", "d", "e", "f", "g"];
    let mut first = GraphModel::new(board(&ids));
    let mut second = GraphModel::new(board(&ids));

    LayoutAssigner::default().assign(&mut first);
    LayoutAssigner::default().assign(&mut second);

    assert_eq!(positions(&first), positions(&second));
}

#[test]
fn placed_posts_are_never_moved() {
    let mut graph = GraphModel::new(board(&["p1", "p2"]));
    let assigner = LayoutAssigner::default();
    assigner.assign(&mut graph);
    graph.set_position("p1", 500.0, 500.0);

    assert_eq!(assigner.assign(&mut graph), 0);
    assert_eq!(graph.position("p1"), Some(Position::new(500.0, 500.0)));
    assert_eq!(graph.position("p2"), Some(Position::new(220.0, 200.0)));
}

#[test]
fn new_posts_take_slots_by_unplaced_ordinal() {
    let mut graph = GraphModel::new(board(&["p1", "p2", "p3"]));
    let assigner = LayoutAssigner::default();
    assigner.assign(&mut graph);

    let mut grown = graph.project().clone();
    for id in ["p4", "p5"] {
        let mut post = Post::new("P1", id, "note").unwrap();
        post.id = id.to_string();
        grown.posts.push(post);
    }
    graph.replace_project(grown);

    assert_eq!(assigner.assign(&mut graph), 2);
    assert_eq!(graph.position("p4"), Some(Position::new(100.0, 200.0)));
    assert_eq!(graph.position("p5"), Some(Position::new(220.0, 200.0)));
    assert_eq!(graph.position("p3"), Some(Position::new(340.0, 200.0)));
}

#[test]
fn custom_grid_is_honoured() {
    let config = LayoutConfig {
        origin_x: 0.0,
        origin_y: 0.0,
        spacing: 50.0,
        columns: 2,
    };
    assert!(config.validate().is_ok());
    let mut graph = GraphModel::new(board(&["p1", "p2", "p3"]));
    LayoutAssigner::new(config).assign(&mut graph);

    assert_eq!(graph.position("p2"), Some(Position::new(50.0, 0.0)));
    assert_eq!(graph.position("p3"), Some(Position::new(0.0, 50.0)));
}
