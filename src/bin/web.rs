//! Single binary web server: HTML from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_files::Files;
use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use padel_americano_web::{
    generate_next_match, generate_next_round, leaderboard, CourtTrace, Session, SessionId,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Per-session entry: session data + last activity time (for auto-cleanup).
struct SessionEntry {
    session: Session,
    last_activity: Instant,
}

/// A published read-only snapshot of a session, importable as a new session.
struct ShareEntry {
    snapshot: Session,
    created_at: Instant,
}

/// In-memory state: sessions by id plus share snapshots by share id.
#[derive(Default)]
struct AppStore {
    sessions: HashMap<SessionId, SessionEntry>,
    shares: HashMap<Uuid, ShareEntry>,
}

type AppState = Data<RwLock<AppStore>>;

/// Inactivity threshold: sessions not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

/// Share snapshots live longer than sessions so links keep working overnight.
const SHARE_TIMEOUT: Duration = Duration::from_secs(7 * 24 * 3600);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateSessionBody {
    #[serde(default = "default_session_name")]
    name: String,
    #[serde(default = "default_courts")]
    number_of_courts: u32,
    #[serde(default = "default_points_per_game")]
    points_per_game: u32,
    /// Initial roster; more players can be added later.
    #[serde(default)]
    players: Vec<String>,
}

fn default_session_name() -> String {
    "Americano".to_string()
}

fn default_courts() -> u32 {
    1
}

fn default_points_per_game() -> u32 {
    21
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
}

#[derive(Deserialize)]
struct SetMatchScoreBody {
    match_id: Uuid,
    /// (first team points, second team points).
    score: (u32, u32),
}

#[derive(Deserialize)]
struct ShareSessionBody {
    session_id: SessionId,
}

/// Path segment: session id (e.g. /api/sessions/{id})
#[derive(Deserialize)]
struct SessionPath {
    id: SessionId,
}

/// Path segment: share id (e.g. /api/share/{share_id})
#[derive(Deserialize)]
struct SharePath {
    share_id: Uuid,
}

/// Log the scheduler's decisions for a generated round at debug level.
fn log_round_trace(session_id: SessionId, trace: &[CourtTrace]) {
    for t in trace {
        log::debug!(
            "session {}: court {}: anchor={} forced_partner={:?} filtered_out={} scores={:?} chosen={}",
            session_id,
            t.court + 1,
            t.anchor,
            t.forced_partner,
            t.filtered_out,
            t.candidate_scores,
            t.chosen_score
        );
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "padel-americano-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a new session (returns it with id; client stores id for subsequent requests).
#[post("/api/sessions")]
async fn api_create_session(state: AppState, body: Option<Json<CreateSessionBody>>) -> HttpResponse {
    let (name, courts, points, players) = match body {
        Some(b) => {
            let b = b.into_inner();
            (b.name, b.number_of_courts, b.points_per_game, b.players)
        }
        None => (
            default_session_name(),
            default_courts(),
            default_points_per_game(),
            Vec::new(),
        ),
    };
    let mut session = Session::new(name, courts, points);
    for player_name in players {
        if let Err(e) = session.add_player(player_name) {
            return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }));
        }
    }
    let id = session.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.sessions.insert(
        id,
        SessionEntry {
            session,
            last_activity: Instant::now(),
        },
    );
    HttpResponse::Ok().json(&g.sessions[&id].session)
}

/// Get a session by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/sessions/{id}")]
async fn api_get_session(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.sessions.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.session)
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No session" })),
    }
}

/// Delete a session by id.
#[delete("/api/sessions/{id}")]
async fn api_delete_session(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.sessions.remove(&path.id) {
        Some(_) => HttpResponse::Ok().json(serde_json::json!({ "deleted": path.id })),
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No session" })),
    }
}

/// Add a player to the roster (any time; names unique, case-insensitive).
#[post("/api/sessions/{id}/players")]
async fn api_add_player(
    state: AppState,
    path: Path<SessionPath>,
    body: Json<AddPlayerBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.sessions.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No session" })),
    };
    entry.last_activity = Instant::now();
    let s = &mut entry.session;
    match s.add_player(body.name.trim()) {
        Ok(()) => HttpResponse::Ok().json(s),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Generate the next full round (one match per court).
#[post("/api/sessions/{id}/rounds/generate")]
async fn api_generate_round(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.sessions.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No session" })),
    };
    entry.last_activity = Instant::now();
    let s = &mut entry.session;
    match generate_next_round(s, &mut rand::thread_rng()) {
        Ok(trace) => {
            log_round_trace(path.id, &trace);
            HttpResponse::Ok().json(s)
        }
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Generate a single match (one court) with the same scheduler.
#[post("/api/sessions/{id}/matches/generate")]
async fn api_generate_match(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.sessions.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No session" })),
    };
    entry.last_activity = Instant::now();
    let s = &mut entry.session;
    match generate_next_match(s, &mut rand::thread_rng()) {
        Ok(trace) => {
            log_round_trace(path.id, &trace);
            HttpResponse::Ok().json(s)
        }
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Set (or overwrite) the score of one match.
#[put("/api/sessions/{id}/matches/score")]
async fn api_set_match_score(
    state: AppState,
    path: Path<SessionPath>,
    body: Json<SetMatchScoreBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.sessions.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No session" })),
    };
    entry.last_activity = Instant::now();
    let s = &mut entry.session;
    match s.set_match_score(body.match_id, body.score) {
        Ok(()) => HttpResponse::Ok().json(s),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Current leaderboard for a session.
#[get("/api/sessions/{id}/leaderboard")]
async fn api_leaderboard(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.sessions.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No session" })),
    };
    entry.last_activity = Instant::now();
    let s = &entry.session;
    HttpResponse::Ok().json(leaderboard(&s.players, &s.matches))
}

/// Publish a snapshot of a session under a fresh share id.
#[post("/api/share")]
async fn api_create_share(state: AppState, body: Json<ShareSessionBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let snapshot = match g.sessions.get_mut(&body.session_id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            entry.session.clone()
        }
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No session" })),
    };
    let share_id = Uuid::new_v4();
    g.shares.insert(
        share_id,
        ShareEntry {
            snapshot,
            created_at: Instant::now(),
        },
    );
    HttpResponse::Ok().json(serde_json::json!({ "share_id": share_id }))
}

/// Fetch a published snapshot (read-only).
#[get("/api/share/{share_id}")]
async fn api_get_share(state: AppState, path: Path<SharePath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.shares.get(&path.share_id) {
        Some(entry) => HttpResponse::Ok().json(&entry.snapshot),
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No shared session" })),
    }
}

/// Import a published snapshot as a new session (fresh id, same content).
#[post("/api/share/{share_id}/import")]
async fn api_import_share(state: AppState, path: Path<SharePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let mut session = match g.shares.get(&path.share_id) {
        Some(entry) => entry.snapshot.clone(),
        None => {
            return HttpResponse::NotFound().json(serde_json::json!({ "error": "No shared session" }))
        }
    };
    session.id = Uuid::new_v4();
    let id = session.id;
    g.sessions.insert(
        id,
        SessionEntry {
            session,
            last_activity: Instant::now(),
        },
    );
    HttpResponse::Ok().json(&g.sessions[&id].session)
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(AppStore::default()));

    // Background task: every 30 minutes, remove sessions inactive for 12+ hours
    // and share snapshots older than 7 days.
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.sessions.len();
            g.sessions
                .retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.sessions.len();
            if removed > 0 {
                log::info!(
                    "Cleaned up {} inactive session(s) (no activity for 12h)",
                    removed
                );
            }
            g.shares
                .retain(|_, entry| entry.created_at.elapsed() < SHARE_TIMEOUT);
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_create_session)
            .service(api_get_session)
            .service(api_delete_session)
            .service(api_add_player)
            .service(api_generate_round)
            .service(api_generate_match)
            .service(api_set_match_score)
            .service(api_leaderboard)
            .service(api_create_share)
            .service(api_get_share)
            .service(api_import_share)
            .service(Files::new("/static", "static").show_files_listing())
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
