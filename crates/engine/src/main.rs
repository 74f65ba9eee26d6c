//! fieldhost Engine - Main entry point.
//!
//! Hosts a single demo field on in-memory storage and ticks it until Ctrl-C.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fieldhost_domain::{
    InstanceId, MapEntityLayout, MapId, MapMetadata, TriggerMesh, TriggerObjectState,
};
use fieldhost_engine::infrastructure::{
    config::EngineConfig,
    memory::{InMemoryMetadata, InMemoryStorage},
};
use fieldhost_engine::{App, Metadata, Repositories};
use fieldhost_shared::ServerMessage;

const DEMO_MAP_ID: i32 = 2000062;
const DEMO_X_BLOCK: &str = "demo_field";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine may be started from `crates/engine`).
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fieldhost_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting fieldhost Engine");

    let config = EngineConfig::from_env()?;
    let tick_interval = Duration::from_millis(config.field.tick_interval_ms.max(1));

    let app = App::new(
        config,
        Repositories::from_backend(Arc::new(InMemoryStorage::new())),
        Metadata::from_source(Arc::new(demo_content())),
    );

    let field = app
        .enter_field(MapId::new(DEMO_MAP_ID), InstanceId::DEFAULT)
        .await?;
    tokio::spawn(log_broadcasts(field.subscribe()));

    let trigger = app.trigger_context(field.clone());
    trigger.set_timer("demo", 30, true);
    trigger.set_mesh(&[1], false, 0, 5_000, 0.0);

    let mut ticker = tokio::time::interval(tick_interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let ran = app.tick();
                if ran > 0 {
                    tracing::debug!(events = ran, "Field events processed");
                }
            }
            result = tokio::signal::ctrl_c() => {
                result?;
                tracing::info!("Shutdown requested");
                break;
            }
        }
    }

    app.shutdown().await?;
    tracing::info!("fieldhost Engine stopped");
    Ok(())
}

fn demo_content() -> InMemoryMetadata {
    let map = MapMetadata {
        id: MapId::new(DEMO_MAP_ID),
        name: "Demo Field".to_string(),
        x_block: DEMO_X_BLOCK.to_string(),
    };
    let layout = MapEntityLayout {
        x_block: DEMO_X_BLOCK.to_string(),
        trigger_objects: vec![TriggerObjectState::Mesh(TriggerMesh::new(1, true))],
        plots: vec![1],
        ..Default::default()
    };
    InMemoryMetadata::new().with_map(map, layout)
}

/// Log every message the field broadcasts, serialized as JSON.
async fn log_broadcasts(mut receiver: broadcast::Receiver<ServerMessage>) {
    loop {
        match receiver.recv().await {
            Ok(message) => match serde_json::to_string(&message) {
                Ok(json) => tracing::debug!(message = %json, "Broadcast"),
                Err(e) => tracing::warn!(error = %e, "Failed to serialize broadcast"),
            },
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Broadcast observer lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
