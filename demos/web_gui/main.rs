use std::env;
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Serialize;
use serde_json::Value;
use simulation::{init, Difficulty, Session, SessionOptions};
use tower_http::cors::CorsLayer;

const DT: f64 = 1. / 60.;

#[derive(Serialize)]
struct LanderDto {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    angle: f64,
    omega: f64,
    fuel: f64,
    radius: f64,
}

#[derive(Serialize)]
struct PadDto {
    x1: f64,
    x2: f64,
    y: f64,
}

#[derive(Serialize)]
struct Snapshot {
    lander: LanderDto,
    pad: PadDto,
    state: &'static str,
    crash_reasons: Vec<String>,
    difficulty: &'static str,
}

impl Snapshot {
    fn of(session: &Session) -> Self {
        let lander = session.lander();
        let pad = session.terrain().pad();
        Self {
            lander: LanderDto {
                x: lander.x,
                y: lander.y,
                vx: lander.vx,
                vy: lander.vy,
                angle: lander.angle,
                omega: lander.omega,
                fuel: lander.fuel,
                radius: lander.radius,
            },
            pad: PadDto {
                x1: pad.x1,
                x2: pad.x2,
                y: pad.y,
            },
            state: session.game_state().as_str(),
            crash_reasons: session
                .crash_reasons()
                .iter()
                .map(ToString::to_string)
                .collect(),
            difficulty: session.difficulty().as_str(),
        }
    }
}

#[derive(Clone)]
struct AppState {
    session: Arc<Mutex<Session>>,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let (difficulty, options) = match env::args().nth(1) {
        Some(path) => init::json::session_from_file(path).expect("Failed to parse config"),
        None => (
            Difficulty::Normal,
            SessionOptions::default().with_autopilot(true),
        ),
    };

    let state = AppState {
        session: Arc::new(Mutex::new(Session::new(difficulty, options))),
    };

    let router = Router::new()
        .route("/terrain", get(handle_terrain))
        .route("/state", get(handle_state))
        .route("/tick", put(handle_tick))
        .route("/pause", put(handle_pause))
        .route("/resume", put(handle_resume))
        .route("/reset", put(handle_reset))
        .with_state(state)
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    axum::serve(listener, router).await.unwrap();
}

async fn handle_terrain(State(state): State<AppState>) -> Json<Value> {
    let session = state.session.lock().unwrap();
    let points = session
        .terrain()
        .iter_points()
        .map(|(x, y)| vec![x, y])
        .collect::<Vec<_>>();
    Json(serde_json::to_value(points).unwrap())
}

async fn handle_state(State(state): State<AppState>) -> Json<Snapshot> {
    let session = state.session.lock().unwrap();
    Json(Snapshot::of(&session))
}

async fn handle_tick(State(state): State<AppState>) -> Json<Snapshot> {
    let mut session = state.session.lock().unwrap();
    session.advance(DT);
    Json(Snapshot::of(&session))
}

async fn handle_pause(State(state): State<AppState>) {
    state.session.lock().unwrap().pause();
}

async fn handle_resume(State(state): State<AppState>) {
    state.session.lock().unwrap().resume();
}

async fn handle_reset(State(state): State<AppState>) {
    state.session.lock().unwrap().restart(true);
}
