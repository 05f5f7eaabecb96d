//! Canvas interaction state machine.
//!
//! # Responsibility
//! - Interpret gesture events against exactly one interaction mode.
//! - Apply position changes to the graph and request connection persistence.
//!
//! # Invariants
//! - Idle, reposition and connect are one enum; two modes can never be active
//!   at the same time.
//! - Switching modes discards partial state (drag preview, connect source).
//! - A drag commits exactly one position, on release.
//! - Gestures naming a post without a position are no-ops.

use crate::graph::model::GraphModel;
use crate::model::error::GraphError;
use crate::model::position::Position;
use crate::model::project::{Connection, PostId};
use log::{debug, info, warn};

/// In-progress drag of one post.
#[derive(Debug, Clone, PartialEq)]
pub struct Drag {
    post_id: PostId,
    grab: Position,
    start: Position,
    current: Position,
}

impl Drag {
    fn begin(post_id: PostId, grab: Position, start: Position) -> Self {
        Self {
            post_id,
            grab,
            start,
            current: start,
        }
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    /// Where the post would land if released now.
    pub fn preview(&self) -> Position {
        self.current
    }

    fn follow(&self, pointer: Position) -> Position {
        let (dx, dy) = pointer.offset_from(self.grab);
        self.start.translated(dx, dy)
    }
}

/// Current interaction mode.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionMode {
    /// Select mode: tapping a post opens it for editing.
    #[default]
    Idle,
    /// Reposition mode with no drag in progress.
    RepositionArmed,
    /// Reposition mode while one post is being dragged.
    Repositioning(Drag),
    /// Connect mode waiting for a source post.
    ConnectingNoSource,
    /// Connect mode with a fixed source; each tapped target gets an edge.
    ConnectingWithSource(PostId),
}

impl InteractionMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::RepositionArmed | Self::Repositioning(_) => "reposition",
            Self::ConnectingNoSource | Self::ConnectingWithSource(_) => "connect",
        }
    }

    pub fn is_repositioning(&self) -> bool {
        matches!(self, Self::RepositionArmed | Self::Repositioning(_))
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self, Self::ConnectingNoSource | Self::ConnectingWithSource(_))
    }
}

/// Gesture reported by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    ToggleReposition,
    ToggleConnect,
    TapNode(PostId),
    TapBackground,
    /// Pointer pressed on a post at canvas coordinate `pointer`.
    PressNode { post_id: PostId, pointer: Position },
    /// Pointer moved while pressed.
    DragTo(Position),
    /// Pointer lifted.
    Release(Position),
}

/// Work the controller hands back to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerCommand {
    /// Delegate the post to the post-editing collaborator.
    OpenPost(PostId),
    /// A connection was added optimistically and must be persisted.
    PersistConnection(Connection),
    /// A connection attempt was rejected by the graph model.
    Declined(GraphError),
}

/// Mode-driven gesture interpreter for one canvas view.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    mode: InteractionMode,
    connection_label: String,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    /// Source post of the pending connect gesture, if any.
    pub fn connect_source(&self) -> Option<&str> {
        match &self.mode {
            InteractionMode::ConnectingWithSource(source) => Some(source.as_str()),
            _ => None,
        }
    }

    /// Drag preview for `post_id` while it is being dragged.
    pub fn preview_position(&self, post_id: &str) -> Option<Position> {
        match &self.mode {
            InteractionMode::Repositioning(drag) if drag.post_id == post_id => {
                Some(drag.preview())
            }
            _ => None,
        }
    }

    /// Label applied to connections created from now on.
    pub fn set_connection_label(&mut self, label: impl Into<String>) {
        self.connection_label = label.into();
    }

    /// Returns to `Idle`, dropping any partial gesture state.
    pub fn reset(&mut self) {
        self.enter(InteractionMode::Idle);
    }

    /// Applies one gesture.
    ///
    /// Position changes are written straight into `graph`; anything needing
    /// the outside world is returned as a command.
    pub fn handle(
        &mut self,
        event: CanvasEvent,
        graph: &mut GraphModel,
    ) -> Option<ControllerCommand> {
        match event {
            CanvasEvent::ToggleReposition => {
                let next = if self.mode.is_repositioning() {
                    InteractionMode::Idle
                } else {
                    InteractionMode::RepositionArmed
                };
                self.enter(next);
                None
            }
            CanvasEvent::ToggleConnect => {
                let next = if self.mode.is_connecting() {
                    InteractionMode::Idle
                } else {
                    InteractionMode::ConnectingNoSource
                };
                self.enter(next);
                None
            }
            CanvasEvent::TapNode(post_id) => self.tap_node(post_id, graph),
            CanvasEvent::TapBackground => {
                if let InteractionMode::ConnectingWithSource(_) = self.mode {
                    self.mode = InteractionMode::ConnectingNoSource;
                    debug!("event=connect_source_cleared module=canvas status=ok");
                }
                None
            }
            CanvasEvent::PressNode { post_id, pointer } => {
                self.press_node(post_id, pointer, graph);
                None
            }
            CanvasEvent::DragTo(pointer) => {
                if let InteractionMode::Repositioning(drag) = &mut self.mode {
                    drag.current = drag.follow(pointer);
                }
                None
            }
            CanvasEvent::Release(pointer) => {
                self.release(pointer, graph);
                None
            }
        }
    }

    /// Drops gesture state that refers to posts missing from `graph`.
    ///
    /// Returns the stale post id when something was dropped.
    pub fn drop_stale_references(&mut self, graph: &GraphModel) -> Option<PostId> {
        let (stale, fallback) = match &self.mode {
            InteractionMode::ConnectingWithSource(source) if !graph.has_position(source) => {
                (source.clone(), InteractionMode::ConnectingNoSource)
            }
            InteractionMode::Repositioning(drag) if !graph.has_position(&drag.post_id) => {
                (drag.post_id.clone(), InteractionMode::RepositionArmed)
            }
            _ => return None,
        };
        warn!(
            "event=gesture_reset module=canvas status=declined error_code=stale_reference post_id={}",
            stale
        );
        self.mode = fallback;
        Some(stale)
    }

    fn enter(&mut self, next: InteractionMode) {
        if let InteractionMode::Repositioning(drag) = &self.mode {
            debug!(
                "event=drag_cancelled module=canvas status=ok post_id={}",
                drag.post_id
            );
        }
        if self.mode.label() != next.label() {
            info!(
                "event=mode_change module=canvas status=ok from={} to={}",
                self.mode.label(),
                next.label()
            );
        }
        self.mode = next;
    }

    fn tap_node(&mut self, post_id: PostId, graph: &mut GraphModel) -> Option<ControllerCommand> {
        if !graph.has_position(&post_id) {
            debug!(
                "event=gesture_ignored module=canvas status=ok reason=unplaced post_id={}",
                post_id
            );
            return None;
        }

        match &self.mode {
            InteractionMode::Idle => return Some(ControllerCommand::OpenPost(post_id)),
            InteractionMode::RepositionArmed | InteractionMode::Repositioning(_) => return None,
            InteractionMode::ConnectingWithSource(source) => {
                return match graph.add_connection(source, &post_id, &self.connection_label) {
                    Ok(connection) => {
                        info!(
                            "event=connection_add module=canvas status=ok connection_id={} post_a={} post_b={}",
                            connection.id, connection.post_a, connection.post_b
                        );
                        Some(ControllerCommand::PersistConnection(connection))
                    }
                    Err(err) => {
                        warn!(
                            "event=connection_add module=canvas status=declined error_code={} source={} target={}",
                            err.code(),
                            source,
                            post_id
                        );
                        Some(ControllerCommand::Declined(err))
                    }
                };
            }
            InteractionMode::ConnectingNoSource => {}
        }

        debug!(
            "event=connect_source_set module=canvas status=ok post_id={}",
            post_id
        );
        self.mode = InteractionMode::ConnectingWithSource(post_id);
        None
    }

    fn press_node(&mut self, post_id: PostId, pointer: Position, graph: &GraphModel) {
        if self.mode != InteractionMode::RepositionArmed {
            return;
        }
        let Some(start) = graph.position(&post_id) else {
            debug!(
                "event=gesture_ignored module=canvas status=ok reason=unplaced post_id={}",
                post_id
            );
            return;
        };
        self.mode = InteractionMode::Repositioning(Drag::begin(post_id, pointer, start));
    }

    fn release(&mut self, pointer: Position, graph: &mut GraphModel) {
        let InteractionMode::Repositioning(drag) = &self.mode else {
            return;
        };
        let target = drag.follow(pointer);
        if graph.place(&drag.post_id, target) {
            debug!(
                "event=position_commit module=canvas status=ok post_id={} x={} y={}",
                drag.post_id,
                target.x(),
                target.y()
            );
        } else {
            warn!(
                "event=position_commit module=canvas status=declined error_code=stale_reference post_id={}",
                drag.post_id
            );
        }
        self.mode = InteractionMode::RepositionArmed;
    }
}

#[cfg(test)]
mod tests {
    use super::{CanvasEvent, InteractionController, InteractionMode};
    use crate::graph::layout::LayoutAssigner;
    use crate::graph::model::GraphModel;
    use crate::model::position::Position;
    use crate::model::project::{Post, Project};

    fn placed_graph() -> GraphModel {
        let mut project = Project::with_id("P1", "Board");
        for id in ["p1", "p2"] {
            let mut post = Post::new("P1", id, "note").unwrap();
            post.id = id.to_string();
            project.posts.push(post);
        }
        let mut graph = GraphModel::new(project);
        LayoutAssigner::default().assign(&mut graph);
        graph
    }

    #[test]
    fn switching_modes_clears_connect_source() {
        let mut graph = placed_graph();
        let mut controller = InteractionController::new();

        controller.handle(CanvasEvent::ToggleConnect, &mut graph);
        controller.handle(CanvasEvent::TapNode("p1".into()), &mut graph);
        assert_eq!(controller.connect_source(), Some("p1"));

        controller.handle(CanvasEvent::ToggleReposition, &mut graph);
        assert_eq!(controller.mode(), &InteractionMode::RepositionArmed);
        assert_eq!(controller.connect_source(), None);
    }

    #[test]
    fn drag_preview_does_not_touch_graph_until_release() {
        let mut graph = placed_graph();
        let mut controller = InteractionController::new();
        controller.handle(CanvasEvent::ToggleReposition, &mut graph);
        controller.handle(
            CanvasEvent::PressNode {
                post_id: "p1".into(),
                pointer: Position::new(100.0, 200.0),
            },
            &mut graph,
        );
        controller.handle(CanvasEvent::DragTo(Position::new(150.0, 260.0)), &mut graph);

        assert_eq!(
            controller.preview_position("p1"),
            Some(Position::new(150.0, 260.0))
        );
        assert_eq!(graph.position("p1"), Some(Position::new(100.0, 200.0)));
    }

    #[test]
    fn toggling_off_mid_drag_discards_preview() {
        let mut graph = placed_graph();
        let mut controller = InteractionController::new();
        controller.handle(CanvasEvent::ToggleReposition, &mut graph);
        controller.handle(
            CanvasEvent::PressNode {
                post_id: "p2".into(),
                pointer: Position::new(220.0, 200.0),
            },
            &mut graph,
        );
        controller.handle(CanvasEvent::DragTo(Position::new(0.0, 0.0)), &mut graph);
        controller.handle(CanvasEvent::ToggleReposition, &mut graph);
        controller.handle(CanvasEvent::Release(Position::new(0.0, 0.0)), &mut graph);

        assert_eq!(controller.mode(), &InteractionMode::Idle);
        assert_eq!(graph.position("p2"), Some(Position::new(220.0, 200.0)));
    }
}
