//! Single binary web server: JSON REST API over in-memory tournaments.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080), INACTIVITY_HOURS (e.g. 12).

use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tournament_engine::{
    configure_groups, group_distribution, max_groups, parse_score, report_score,
    select_knockout_winner, select_winner, start_tournament, KnockoutBracket, MatchId, PlayerId,
    Standing, Tournament, TournamentError, TournamentFormat, TournamentId,
};

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// In-memory state: many tournaments by ID. Entries are removed after the inactivity timeout.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
}

#[derive(Deserialize)]
struct QuickAddBody {
    count: usize,
}

#[derive(Deserialize)]
struct SeedingBody {
    enabled: bool,
}

#[derive(Deserialize)]
struct StartBody {
    format: TournamentFormat,
}

#[derive(Deserialize)]
struct GroupsBody {
    num_groups: usize,
}

#[derive(Deserialize)]
struct DistributionQuery {
    num_groups: usize,
}

/// A score as sent by a client: a JSON number or the raw text of an input field.
#[derive(Deserialize)]
#[serde(untagged)]
enum ScoreInput {
    Number(u32),
    Text(String),
}

impl ScoreInput {
    fn value(&self) -> Result<u32, TournamentError> {
        match self {
            ScoreInput::Number(n) => Ok(*n),
            ScoreInput::Text(raw) => parse_score(raw),
        }
    }
}

#[derive(Deserialize)]
struct ScoreBody {
    match_id: MatchId,
    player_1_score: ScoreInput,
    player_2_score: ScoreInput,
}

#[derive(Deserialize)]
struct WinnerBody {
    match_id: MatchId,
    winner: PlayerId,
}

/// One row of a standings table, with the player's name resolved.
#[derive(Serialize)]
struct StandingRow<'a> {
    rank: usize,
    name: &'a str,
    #[serde(flatten)]
    standing: &'a Standing,
}

#[derive(Serialize)]
struct GroupTable<'a> {
    group: &'a str,
    rows: Vec<StandingRow<'a>>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and player id (e.g. /api/tournaments/{id}/players/{player_id})
#[derive(Deserialize)]
struct TournamentPlayerPath {
    id: TournamentId,
    player_id: PlayerId,
}

/// Path segments: tournament id and knockout bracket (main or consolation)
#[derive(Deserialize)]
struct KnockoutPath {
    id: TournamentId,
    which: KnockoutBracket,
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

fn bad_request(e: TournamentError) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

/// Look up a tournament, refresh its activity time and apply `action` to it.
/// Responds with the updated tournament, or 400 with the error message.
fn with_tournament<T>(
    state: &AppState,
    id: TournamentId,
    action: impl FnOnce(&mut Tournament) -> Result<T, TournamentError>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match action(&mut *t) {
        Ok(_) => HttpResponse::Ok().json(&*t),
        Err(e) => {
            log::debug!("Tournament {} rejected action: {}", id, e);
            bad_request(e)
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tournament-engine",
    })
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState) -> HttpResponse {
    let tournament = Tournament::new();
    let id = tournament.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = g.entry(id).or_insert(TournamentEntry {
        tournament,
        last_activity: Instant::now(),
    });
    log::info!("Created tournament {}", id);
    HttpResponse::Ok().json(&entry.tournament)
}

/// Get a tournament by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |_| Ok(()))
}

/// Add a player (Setup only).
#[post("/api/tournaments/{id}/players")]
async fn api_add_player(state: AppState, path: Path<TournamentPath>, body: Json<AddPlayerBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| t.add_player(body.name.as_str()))
}

/// Remove a player by id (Setup only).
#[delete("/api/tournaments/{id}/players/{player_id}")]
async fn api_remove_player(state: AppState, path: Path<TournamentPlayerPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| t.remove_player(path.player_id))
}

/// Append players from a CSV body with a `name` and optional `seeded` column (Setup only).
#[post("/api/tournaments/{id}/players/import")]
async fn api_import_players(state: AppState, path: Path<TournamentPath>, body: String) -> HttpResponse {
    with_tournament(&state, path.id, |t| t.import_roster_csv(body.as_bytes()))
}

/// Replace the roster with generated players A, B, C, ... (Setup only).
#[post("/api/tournaments/{id}/players/quick-add")]
async fn api_quick_add(state: AppState, path: Path<TournamentPath>, body: Json<QuickAddBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| t.quick_add(body.count))
}

/// Toggle a player's seeded flag (Setup only, at most 8 seeds).
#[put("/api/tournaments/{id}/players/{player_id}/seed")]
async fn api_toggle_seed(state: AppState, path: Path<TournamentPlayerPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| t.toggle_seed(path.player_id))
}

/// Turn seeded bracket placement on or off (Setup only).
#[put("/api/tournaments/{id}/seeding")]
async fn api_set_seeding(state: AppState, path: Path<TournamentPath>, body: Json<SeedingBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| t.set_seeding_enabled(body.enabled))
}

/// Start the tournament in the requested format (Setup only).
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(state: AppState, path: Path<TournamentPath>, body: Json<StartBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| start_tournament(t, body.format))
}

/// How the roster would be split for a given group count.
#[get("/api/tournaments/{id}/groups/distribution")]
async fn api_group_distribution(
    state: AppState,
    path: Path<TournamentPath>,
    query: Query<DistributionQuery>,
) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let Some(entry) = g.get(&path.id) else {
        return not_found();
    };
    let count = entry.tournament.players.len();
    let sizes: Vec<_> = group_distribution(count, query.num_groups)
        .into_iter()
        .map(|(groups, size)| serde_json::json!({ "groups": groups, "size": size }))
        .collect();
    HttpResponse::Ok().json(serde_json::json!({
        "min_groups": 2,
        "max_groups": max_groups(count),
        "distribution": sizes,
    }))
}

/// Form groups and start the group stage (GroupConfig only).
#[post("/api/tournaments/{id}/groups")]
async fn api_configure_groups(state: AppState, path: Path<TournamentPath>, body: Json<GroupsBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| configure_groups(t, body.num_groups))
}

/// Report or correct a round-robin or group match score.
#[put("/api/tournaments/{id}/matches/score")]
async fn api_report_score(state: AppState, path: Path<TournamentPath>, body: Json<ScoreBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        let s1 = body.player_1_score.value()?;
        let s2 = body.player_2_score.value()?;
        report_score(t, body.match_id, s1, s2)
    })
}

/// Select the winner of a single-elimination match.
#[put("/api/tournaments/{id}/bracket/winner")]
async fn api_select_winner(state: AppState, path: Path<TournamentPath>, body: Json<WinnerBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| select_winner(t, body.match_id, body.winner))
}

/// Select the winner of a main or consolation knockout match.
#[put("/api/tournaments/{id}/knockout/{which}/winner")]
async fn api_select_knockout_winner(
    state: AppState,
    path: Path<KnockoutPath>,
    body: Json<WinnerBody>,
) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        select_knockout_winner(t, path.which, body.match_id, body.winner)
    })
}

/// Ranked standings: the whole roster for a round robin, one table per group otherwise.
#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let Some(entry) = g.get(&path.id) else {
        return not_found();
    };
    let t = &entry.tournament;
    if let Some(pool) = &t.round_robin {
        return HttpResponse::Ok().json(rank_rows(t, pool.standings.final_ranked()));
    }
    if let Some(stage) = &t.group_stage {
        let tables: Vec<GroupTable> = stage
            .groups
            .iter()
            .filter_map(|group| {
                let ledger = stage.standings.get(&group.id)?;
                Some(GroupTable {
                    group: group.name.as_str(),
                    rows: rank_rows(t, ledger.ranked()),
                })
            })
            .collect();
        return HttpResponse::Ok().json(tables);
    }
    HttpResponse::Ok().json(Vec::<StandingRow>::new())
}

fn rank_rows<'a>(t: &'a Tournament, ranked: Vec<&'a Standing>) -> Vec<StandingRow<'a>> {
    ranked
        .into_iter()
        .enumerate()
        .map(|(i, s)| StandingRow {
            rank: i + 1,
            name: t.player_name(s.player_id).unwrap_or("?"),
            standing: s,
        })
        .collect()
}

/// Leave the current tournament and go back to roster editing, keeping players.
#[post("/api/tournaments/{id}/back")]
async fn api_back_to_setup(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        t.back_to_setup();
        Ok(())
    })
}

/// Start a new tournament from an empty roster.
#[post("/api/tournaments/{id}/reset")]
async fn api_reset(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        t.reset();
        Ok(())
    })
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_create_tournament)
        .service(api_get_tournament)
        .service(api_import_players)
        .service(api_quick_add)
        .service(api_add_player)
        .service(api_remove_player)
        .service(api_toggle_seed)
        .service(api_set_seeding)
        .service(api_start_tournament)
        .service(api_group_distribution)
        .service(api_configure_groups)
        .service(api_report_score)
        .service(api_select_winner)
        .service(api_select_knockout_winner)
        .service(api_standings)
        .service(api_back_to_setup)
        .service(api_reset);
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_inactivity_hours() -> u64 {
    12
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let inactivity_hours: u64 = std::env::var("INACTIVITY_HOURS")
        .ok()
        .and_then(|h| h.parse().ok())
        .unwrap_or_else(default_inactivity_hours);
    let inactivity_timeout = Duration::from_secs(inactivity_hours * 3600);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));

    // Background task: every 30 minutes, remove tournaments past the inactivity timeout
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < inactivity_timeout);
            let removed = before - g.len();
            if removed > 0 {
                log::info!(
                    "Cleaned up {} inactive tournament(s) (no activity for {}h)",
                    removed,
                    inactivity_hours
                );
            }
        }
    });

    HttpServer::new(move || App::new().app_data(state.clone()).configure(routes))
        .bind(bind)?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    fn state() -> AppState {
        Data::new(RwLock::new(HashMap::new()))
    }

    #[actix_web::test]
    async fn create_then_add_players_and_start_round_robin() {
        let app = test::init_service(App::new().app_data(state()).configure(routes)).await;

        let req = test::TestRequest::post().uri("/api/tournaments").to_request();
        let created: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap().to_string();

        for name in ["Ann", "Bob", "Cleo"] {
            let req = test::TestRequest::post()
                .uri(&format!("/api/tournaments/{id}/players"))
                .set_json(serde_json::json!({ "name": name }))
                .to_request();
            assert!(test::call_service(&app, req).await.status().is_success());
        }

        let req = test::TestRequest::post()
            .uri(&format!("/api/tournaments/{id}/start"))
            .set_json(serde_json::json!({ "format": "round_robin" }))
            .to_request();
        let started: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(started["state"], "in_progress");
        assert_eq!(started["round_robin"]["matches"].as_array().unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn equal_scores_are_rejected_with_400() {
        let app = test::init_service(App::new().app_data(state()).configure(routes)).await;

        let req = test::TestRequest::post().uri("/api/tournaments").to_request();
        let created: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/api/tournaments/{id}/players/quick-add"))
            .set_json(serde_json::json!({ "count": 2 }))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        let req = test::TestRequest::post()
            .uri(&format!("/api/tournaments/{id}/start"))
            .set_json(serde_json::json!({ "format": "round_robin" }))
            .to_request();
        let started: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let match_id = started["round_robin"]["matches"][0]["id"].clone();

        let req = test::TestRequest::put()
            .uri(&format!("/api/tournaments/{id}/matches/score"))
            .set_json(serde_json::json!({
                "match_id": match_id,
                "player_1_score": "7",
                "player_2_score": 7,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn unknown_tournament_is_404() {
        let app = test::init_service(App::new().app_data(state()).configure(routes)).await;
        let req = test::TestRequest::get()
            .uri(&format!("/api/tournaments/{}", uuid::Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }
}
