//! Single binary web server: brackets held in memory, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, BRACKET_DATA_DIR (saved brackets), BRACKET_IDLE_HOURS.

use actix_web::{
    get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use upset_bracket::{
    load_bracket, save_bracket, submit_next_round, Bracket, BracketError, BracketState,
    PairingRecord, ScoringMode, Team,
};
use uuid::Uuid;

/// Unique identifier for a bracket held by this server.
type BracketId = Uuid;

/// Per-bracket entry: bracket data + last activity time (for auto-cleanup).
struct BracketEntry {
    bracket: Bracket,
    last_activity: Instant,
}

/// Server settings read from the environment.
#[derive(Clone, Debug)]
struct ServerConfig {
    host: String,
    port: u16,
    data_dir: PathBuf,
    idle_timeout: Duration,
}

impl ServerConfig {
    fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let data_dir = std::env::var("BRACKET_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));
        let idle_hours: u64 = std::env::var("BRACKET_IDLE_HOURS")
            .ok()
            .and_then(|h| h.parse().ok())
            .unwrap_or(12);
        Self {
            host,
            port,
            data_dir,
            idle_timeout: Duration::from_secs(idle_hours * 3600),
        }
    }
}

/// In-memory state: brackets by id. One lock guards every update and score read.
type AppState = Data<RwLock<HashMap<BracketId, BracketEntry>>>;
type AppConfig = Data<ServerConfig>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Serialize)]
struct BracketResponse<'a> {
    id: BracketId,
    state: BracketState,
    bracket: &'a Bracket,
}

#[derive(Serialize)]
struct ScoreResponse<'a> {
    outcome: f64,
    prediction: f64,
    state: BracketState,
    winner: Option<&'a Team>,
}

#[derive(Deserialize)]
struct CreateBracketBody {
    owner: String,
    name: String,
    total_teams: usize,
    #[serde(default)]
    scoring: ScoringMode,
    #[serde(default)]
    pairings: Vec<PairingRecord>,
}

#[derive(Deserialize)]
struct LoadBracketBody {
    owner: String,
    name: String,
}

/// Path segment: bracket id (e.g. /api/brackets/{id})
#[derive(Deserialize)]
struct BracketPath {
    id: BracketId,
}

fn bad_request(e: BracketError) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No bracket" }))
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

fn bracket_json(id: BracketId, bracket: &Bracket) -> HttpResponse {
    HttpResponse::Ok().json(BracketResponse {
        id,
        state: bracket.state(),
        bracket,
    })
}

/// Store a bracket under a fresh id and return it.
fn insert_bracket(state: &AppState, bracket: Bracket) -> HttpResponse {
    let id = Uuid::new_v4();
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let response = bracket_json(id, &bracket);
    g.insert(
        id,
        BracketEntry {
            bracket,
            last_activity: Instant::now(),
        },
    );
    response
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "upset-bracket-web",
    })
}

/// Create a bracket from its initial pairings (all-or-nothing).
#[post("/api/brackets")]
async fn api_create_bracket(state: AppState, body: Json<CreateBracketBody>) -> HttpResponse {
    let body = body.into_inner();
    let pairings = match body
        .pairings
        .into_iter()
        .map(PairingRecord::into_pairing)
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(p) => p,
        Err(e) => return bad_request(e),
    };
    match Bracket::new(body.owner, body.name, body.total_teams, pairings, body.scoring) {
        Ok(bracket) => insert_bracket(&state, bracket),
        Err(e) => bad_request(e),
    }
}

/// Get a bracket by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/brackets/{id}")]
async fn api_get_bracket(state: AppState, path: Path<BracketPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            bracket_json(path.id, &entry.bracket)
        }
        None => not_found(),
    }
}

/// Record a result or a newly discovered matchup.
#[put("/api/brackets/{id}/pairings")]
async fn api_update_pairing(state: AppState, path: Path<BracketPath>, body: Json<PairingRecord>) -> HttpResponse {
    let pairing = match body.into_inner().into_pairing() {
        Ok(p) => p,
        Err(e) => return bad_request(e),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    match entry.bracket.update(pairing) {
        Ok(()) => bracket_json(path.id, &entry.bracket),
        Err(e) => bad_request(e),
    }
}

/// Submit a later-round pairing; both teams must have won a decided pairing in the round before.
#[post("/api/brackets/{id}/pairings/next")]
async fn api_submit_next_round(state: AppState, path: Path<BracketPath>, body: Json<PairingRecord>) -> HttpResponse {
    let pairing = match body.into_inner().into_pairing() {
        Ok(p) => p,
        Err(e) => return bad_request(e),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    match submit_next_round(&mut entry.bracket, pairing) {
        Ok(()) => bracket_json(path.id, &entry.bracket),
        Err(e) => bad_request(e),
    }
}

/// Current score under both scoring modes.
#[get("/api/brackets/{id}/score")]
async fn api_score(state: AppState, path: Path<BracketPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let b = &entry.bracket;
    HttpResponse::Ok().json(ScoreResponse {
        outcome: b.score_with(ScoringMode::Outcome),
        prediction: b.score_with(ScoringMode::Prediction),
        state: b.state(),
        winner: b.winner(),
    })
}

/// Save a bracket to the data directory as `owner-name.json`.
#[post("/api/brackets/{id}/save")]
async fn api_save_bracket(state: AppState, config: AppConfig, path: Path<BracketPath>) -> HttpResponse {
    let bracket = {
        let mut g = match state.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        let entry = match g.get_mut(&path.id) {
            Some(e) => e,
            None => return not_found(),
        };
        entry.last_activity = Instant::now();
        entry.bracket.clone()
    };
    let data_dir = config.data_dir.clone();
    match web::block(move || save_bracket(&data_dir, &bracket)).await {
        Ok(Ok(file)) => HttpResponse::Ok().json(serde_json::json!({ "path": file.display().to_string() })),
        Ok(Err(e)) => bad_request(e),
        Err(_) => HttpResponse::InternalServerError().body("save task failed"),
    }
}

/// Load a saved bracket by owner and name; it gets a new id.
#[post("/api/brackets/load")]
async fn api_load_bracket(state: AppState, config: AppConfig, body: Json<LoadBracketBody>) -> HttpResponse {
    match load_bracket(&config.data_dir, &body.owner, &body.name) {
        Ok(bracket) => insert_bracket(&state, bracket),
        Err(e) => bad_request(e),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    log::info!("Saving brackets under {}", config.data_dir.display());

    let state = Data::new(RwLock::new(HashMap::<BracketId, BracketEntry>::new()));
    let config = Data::new(config);

    // Background task: every 30 minutes, drop brackets idle longer than the timeout
    let state_cleanup = state.clone();
    let idle_timeout = config.idle_timeout;
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < idle_timeout);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive bracket(s)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(config.clone())
            .service(api_health)
            .service(api_load_bracket)
            .service(api_create_bracket)
            .service(api_get_bracket)
            .service(api_update_pairing)
            .service(api_submit_next_round)
            .service(api_score)
            .service(api_save_bracket)
    })
    .bind(bind)?
    .run()
    .await
}
