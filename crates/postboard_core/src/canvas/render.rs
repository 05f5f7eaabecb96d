//! Renderer contract: paintable scene and hit testing.

use crate::canvas::controller::InteractionController;
use crate::graph::model::GraphModel;
use crate::model::position::Position;
use crate::model::project::{ConnectionId, PostId};
use log::debug;

/// Node radius in canvas units.
pub const NODE_RADIUS: f64 = 18.0;
/// Node radius while highlighted (connect source or dragged post).
pub const HIGHLIGHT_RADIUS: f64 = 22.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub post_id: PostId,
    pub title: String,
    pub kind: String,
    pub position: Position,
    pub highlighted: bool,
}

impl SceneNode {
    pub fn radius(&self) -> f64 {
        if self.highlighted {
            HIGHLIGHT_RADIUS
        } else {
            NODE_RADIUS
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneEdge {
    pub connection_id: ConnectionId,
    pub label: Option<String>,
    pub post_a: PostId,
    pub post_b: PostId,
    pub from: Position,
    pub to: Position,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasScene {
    pub project_name: String,
    pub mode: &'static str,
    /// Nodes in `Project::posts` order; later nodes paint on top.
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
    /// Connections left out because an endpoint is missing or unplaced.
    pub skipped_edges: usize,
}

impl CanvasScene {
    pub fn node(&self, post_id: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|node| node.post_id == post_id)
    }

    /// Topmost node whose circle contains `point`.
    pub fn hit_test(&self, point: Position) -> Option<&str> {
        self.nodes
            .iter()
            .rev()
            .find(|node| node.position.distance_to(point) <= node.radius())
            .map(|node| node.post_id.as_str())
    }
}

/// Paints scenes; implemented by the UI shell.
pub trait CanvasRenderer {
    fn paint(&mut self, scene: &CanvasScene);
}

/// Builds the scene for the current graph and interaction state.
///
/// Dangling connections are counted in `skipped_edges` and never fail the
/// build.
pub fn build_scene(graph: &GraphModel, controller: &InteractionController) -> CanvasScene {
    let position_of = |post_id: &str| {
        controller
            .preview_position(post_id)
            .or_else(|| graph.position(post_id))
    };
    let highlighted = |post_id: &str| {
        controller.connect_source() == Some(post_id)
            || controller.preview_position(post_id).is_some()
    };

    let nodes = graph
        .posts()
        .iter()
        .filter_map(|post| {
            position_of(&post.id).map(|position| SceneNode {
                post_id: post.id.clone(),
                title: post.title.clone(),
                kind: post.kind.clone(),
                position,
                highlighted: highlighted(&post.id),
            })
        })
        .collect();

    let mut edges = Vec::new();
    let mut skipped_edges = 0;
    for connection in graph.connections() {
        let endpoints = match (graph.post(&connection.post_a), graph.post(&connection.post_b)) {
            (Some(_), Some(_)) => {
                position_of(&connection.post_a).zip(position_of(&connection.post_b))
            }
            _ => None,
        };
        match endpoints {
            Some((from, to)) => edges.push(SceneEdge {
                connection_id: connection.id.clone(),
                label: connection.label().map(str::to_string),
                post_a: connection.post_a.clone(),
                post_b: connection.post_b.clone(),
                from,
                to,
            }),
            None => {
                skipped_edges += 1;
                debug!(
                    "event=edge_skipped module=render status=ok reason=dangling connection_id={}",
                    connection.id
                );
            }
        }
    }

    CanvasScene {
        project_name: graph.project().name.clone(),
        mode: controller.mode().label(),
        nodes,
        edges,
        skipped_edges,
    }
}

#[cfg(test)]
mod tests {
    use super::{CanvasScene, SceneNode, HIGHLIGHT_RADIUS};
    use crate::model::position::Position;

    fn node(id: &str, x: f64, y: f64, highlighted: bool) -> SceneNode {
        SceneNode {
            post_id: id.to_string(),
            title: id.to_string(),
            kind: "note".to_string(),
            position: Position::new(x, y),
            highlighted,
        }
    }

    #[test]
    fn hit_test_prefers_topmost_node() {
        let scene = CanvasScene {
            project_name: "Board".to_string(),
            mode: "idle",
            nodes: vec![node("under", 100.0, 100.0, false), node("over", 110.0, 100.0, false)],
            edges: Vec::new(),
            skipped_edges: 0,
        };

        assert_eq!(scene.hit_test(Position::new(105.0, 100.0)), Some("over"));
        assert_eq!(scene.hit_test(Position::new(85.0, 100.0)), Some("under"));
        assert_eq!(scene.hit_test(Position::new(300.0, 300.0)), None);
    }

    #[test]
    fn highlighted_nodes_have_larger_hit_area() {
        let scene = CanvasScene {
            project_name: "Board".to_string(),
            mode: "connect",
            nodes: vec![node("source", 0.0, 0.0, true)],
            edges: Vec::new(),
            skipped_edges: 0,
        };

        assert_eq!(scene.hit_test(Position::new(HIGHLIGHT_RADIUS, 0.0)), Some("source"));
    }
}
