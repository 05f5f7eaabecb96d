//! CLI smoke entry point.
//!
//! # Responsibility
//! - Run a scripted canvas session against the configured store.
//! - Print each scene and the final stored project for quick sanity checks.
//!
//! Usage: `postboard_cli [config.json]`

use log::info;
use postboard_core::{
    core_version, init_logging, CanvasEvent, CanvasRenderer, CanvasScene, CanvasSession,
    CoreConfig, Feedback, LayoutAssigner, MemoryProjectStore, Position, ProjectStore,
    SqliteProjectStore, SyncCoordinator,
};
use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

/// Writes scenes as plain text to stdout.
struct TextRenderer {
    frame: usize,
}

impl CanvasRenderer for TextRenderer {
    fn paint(&mut self, scene: &CanvasScene) {
        self.frame += 1;
        println!(
            "-- frame {} project=\"{}\" mode={} nodes={} edges={} skipped={}",
            self.frame,
            scene.project_name,
            scene.mode,
            scene.nodes.len(),
            scene.edges.len(),
            scene.skipped_edges
        );
        for node in &scene.nodes {
            let marker = if node.highlighted { "*" } else { " " };
            println!(
                "  {marker} {:<16} ({:>6.1}, {:>6.1}) {}",
                node.post_id,
                node.position.x(),
                node.position.y(),
                node.title
            );
        }
        for edge in &scene.edges {
            println!(
                "    {} -- {} {}",
                edge.post_a,
                edge.post_b,
                edge.label.as_deref().unwrap_or("")
            );
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("postboard_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => CoreConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => CoreConfig::default(),
    };
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.effective_log_level(), log_dir)?;
    }
    println!("postboard_core version={}", core_version());

    let store: Arc<dyn ProjectStore> = match &config.db_path {
        Some(path) => Arc::new(SqliteProjectStore::open(path)?),
        None => Arc::new(MemoryProjectStore::new()),
    };
    let coordinator = SyncCoordinator::new(store);
    let project = coordinator
        .list_projects()
        .await?
        .into_iter()
        .next()
        .ok_or("no projects stored")?;
    info!(
        "event=cli_session module=cli status=start project_id={}",
        project.id
    );

    let post_ids: Vec<String> = project.posts.iter().map(|post| post.id.clone()).collect();
    let mut session = CanvasSession::open(coordinator, project, LayoutAssigner::new(config.layout));
    let mut renderer = TextRenderer { frame: 0 };
    session.repaint(&mut renderer);

    if let [first, rest @ ..] = post_ids.as_slice() {
        session.handle(CanvasEvent::ToggleConnect).await;
        session.handle(CanvasEvent::TapNode(first.clone())).await;
        for target in rest {
            report(session.handle(CanvasEvent::TapNode(target.clone())).await);
        }
        session.repaint(&mut renderer);

        session.handle(CanvasEvent::ToggleReposition).await;
        if let Some(start) = session.graph().position(first) {
            session
                .handle(CanvasEvent::PressNode {
                    post_id: first.clone(),
                    pointer: start,
                })
                .await;
            let target = Position::new(start.x() + 40.0, start.y() - 60.0);
            session.handle(CanvasEvent::DragTo(target)).await;
            session.handle(CanvasEvent::Release(target)).await;
        }
        session.handle(CanvasEvent::ToggleReposition).await;
    }

    report(session.add_post("Scratch", "note").await);
    session.repaint(&mut renderer);
    report(session.return_from_editor().await);
    session.close();

    println!("{}", serde_json::to_string_pretty(session.project())?);
    info!(
        "event=cli_session module=cli status=ok project_id={}",
        session.project().id
    );
    Ok(())
}

fn report(feedback: Feedback) {
    match feedback {
        Feedback::Connected(connection) => {
            println!("connected {} -- {}", connection.post_a, connection.post_b)
        }
        Feedback::PostAdded(post) => println!("added post {}", post.id),
        Feedback::Reloaded { removed, placed } => {
            println!("reloaded removed={} placed={}", removed.len(), placed)
        }
        Feedback::Declined(err) => println!("declined {}: {err}", err.code()),
        Feedback::OpenPost(request) => println!("open post {}", request.post_id),
        Feedback::None => {}
    }
}
