//! Read-mostly web facade over a running engine: a small dashboard, the
//! state endpoint, thin mutation routes, and an SSE stream of cycle frames.
//!
//! The engine sits behind one mutex, so placements, demolitions, and the
//! timer-driven cycle are atomic with respect to each other and ticks never
//! overlap. Saving always works on a cloned snapshot off the lock.

mod assets;

use std::{
    convert::Infallible,
    net::SocketAddr,
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::header,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse,
    },
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::broadcast, time::MissedTickBehavior};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};
use tracing::{error, info, warn};

use crate::{
    catalog::BuildingKind,
    engine::{CycleSummary, Engine, PlaceOutcome},
    missions::{self, ObjectiveProgress},
    snapshot,
    spatial::TilePos,
    world::GameState,
};

pub struct WebConfig {
    pub host: String,
    pub port: u16,
    pub cycle_seconds: u64,
    pub autosave_cycles: u64,
    pub save_path: PathBuf,
}

#[derive(Clone)]
struct AppState {
    engine: Arc<Mutex<Engine>>,
    broadcaster: broadcast::Sender<String>,
}

#[derive(Serialize)]
struct MissionView {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    level_required: u32,
    objectives: Vec<ObjectiveProgress>,
    reward_xp: i64,
    reward_money: i64,
}

#[derive(Serialize)]
struct StateEnvelope {
    state: GameState,
    current_mission: Option<MissionView>,
}

#[derive(Serialize)]
struct CycleFrameMsg {
    summary: CycleSummary,
    state: StateEnvelope,
}

fn envelope(engine: &Engine) -> StateEnvelope {
    let state = engine.state();
    let current_mission = missions::current_mission(state, engine.missions()).map(|mission| {
        let objectives = (0..mission.objectives.len())
            .map(|index| missions::objective_progress(mission, index, state))
            .collect();
        MissionView {
            id: mission.id,
            title: mission.title,
            description: mission.description,
            level_required: mission.level_required,
            objectives,
            reward_xp: mission.reward.xp,
            reward_money: mission.reward.money,
        }
    });
    StateEnvelope {
        state: state.clone(),
        current_mission,
    }
}

pub async fn run(engine: Engine, config: WebConfig) -> Result<()> {
    let (tx, _) = broadcast::channel::<String>(256);
    let state = AppState {
        engine: Arc::new(Mutex::new(engine)),
        broadcaster: tx.clone(),
    };

    let ticker = state.clone();
    let autosave_cycles = config.autosave_cycles;
    let save_path = config.save_path.clone();
    let tick_task = tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(Duration::from_secs(config.cycle_seconds.max(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick resolves immediately; consume it so the first
        // cycle lands a full period after startup
        interval.tick().await;
        loop {
            interval.tick().await;
            let (payload, autosave) = {
                let mut engine = ticker.engine.lock().expect("engine lock poisoned");
                let summary = match engine.advance_cycle() {
                    Ok(Some(summary)) => summary,
                    Ok(None) => continue,
                    Err(err) => {
                        error!(%err, "cycle failed");
                        continue;
                    }
                };
                let cycles = engine.state().cycles;
                let autosave = (autosave_cycles > 0 && cycles % autosave_cycles == 0)
                    .then(|| engine.snapshot());
                let msg = CycleFrameMsg {
                    summary,
                    state: envelope(&engine),
                };
                (serde_json::to_string(&msg).ok(), autosave)
            };
            if let Some(payload) = payload {
                let _ = ticker.broadcaster.send(payload);
            }
            if let Some(snapshot) = autosave {
                let path = save_path.clone();
                tokio::task::spawn_blocking(move || {
                    if let Err(err) = snapshot::save_game(&path, &snapshot) {
                        warn!(%err, "autosave failed");
                    }
                });
            }
        }
    });

    let router = Router::new()
        .route("/", get(index))
        .route("/styles.css", get(styles))
        .route("/app.js", get(script))
        .route("/api/state", get(current_state))
        .route("/api/select", post(select_building))
        .route("/api/demolish-mode", post(toggle_demolish))
        .route("/api/place", post(place_building))
        .route("/api/demolish", post(demolish))
        .route("/api/events", get(stream_events))
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid address {}:{}", config.host, config.port))?;

    info!("ecopolis dashboard at http://{addr} (ctrl-c to stop)");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tick_task.abort();
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down");
}

async fn index() -> Html<&'static str> {
    Html(assets::INDEX_HTML)
}

async fn styles() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        assets::STYLES_CSS,
    )
}

async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        assets::APP_JS,
    )
}

async fn current_state(State(state): State<AppState>) -> Json<StateEnvelope> {
    let engine = state.engine.lock().expect("engine lock poisoned");
    Json(envelope(&engine))
}

#[derive(Deserialize)]
struct SelectRequest {
    building: Option<BuildingKind>,
}

async fn select_building(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> Json<StateEnvelope> {
    let mut engine = state.engine.lock().expect("engine lock poisoned");
    engine.select_building(request.building);
    Json(envelope(&engine))
}

async fn toggle_demolish(State(state): State<AppState>) -> Json<StateEnvelope> {
    let mut engine = state.engine.lock().expect("engine lock poisoned");
    engine.toggle_demolish();
    Json(envelope(&engine))
}

#[derive(Deserialize)]
struct TileRequest {
    x: u32,
    y: u32,
}

async fn place_building(
    State(state): State<AppState>,
    Json(request): Json<TileRequest>,
) -> Json<PlaceOutcome> {
    let mut engine = state.engine.lock().expect("engine lock poisoned");
    Json(engine.place_building(TilePos::new(request.x, request.y)))
}

async fn demolish(
    State(state): State<AppState>,
    Json(request): Json<TileRequest>,
) -> Json<PlaceOutcome> {
    let mut engine = state.engine.lock().expect("engine lock poisoned");
    Json(engine.demolish(TilePos::new(request.x, request.y)))
}

async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.broadcaster.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(payload) => Some(Ok(Event::default().data(payload))),
        Err(_) => None,
    });
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(2))
            .text("keep-alive"),
    )
}
