use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{auth, live, matches, player, schedule, shared::AppState, spirit, team, tournament};

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Builds the full HTTP surface; routes that change state require a bearer token
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/tournaments", get(tournament::list_tournaments))
        .route("/tournaments/:id", get(tournament::get_tournament))
        .route("/tournaments/:id/standings", get(tournament::get_standings))
        .route("/tournaments/:id/live", get(live::live_feed))
        .route("/teams", get(team::list_teams))
        .route("/teams/:id", get(team::get_team))
        .route("/players", get(player::list_players))
        .route("/players/:id", get(player::get_player))
        .route("/matches", get(matches::list_matches))
        .route("/matches/:id", get(matches::get_match))
        .route("/spirit-scores/team/:team_id", get(spirit::team_spirit_scores));

    let authenticated = Router::new()
        .route("/tournaments", post(tournament::create_tournament))
        .route(
            "/tournaments/:id",
            put(tournament::update_tournament).delete(tournament::delete_tournament),
        )
        .route("/tournaments/:id/fields", post(tournament::add_field))
        .route("/tournaments/:id/announcements", post(tournament::add_announcement))
        .route("/tournaments/:id/schedule", post(schedule::generate_schedule))
        .route("/tournaments/:id/bracket/advance", post(schedule::advance_bracket))
        .route("/teams", post(team::register_team))
        .route("/teams/:id/status", put(team::set_team_status))
        .route("/teams/:id/roster", post(team::add_player))
        .route("/teams/:id/roster/lock", put(team::lock_roster))
        .route("/teams/:id/verify-jerseys", put(team::verify_jerseys))
        .route("/players", post(player::register_player))
        .route("/players/:id", put(player::update_player))
        .route("/matches", post(matches::create_match))
        .route("/matches/:id", put(matches::update_match))
        .route("/matches/:id/score", put(matches::update_score))
        .route("/matches/:id/score-event", post(matches::add_scoring_event))
        .route("/spirit-scores", post(spirit::submit_spirit_score))
        .route("/spirit-scores/match/:match_id", get(spirit::match_spirit_scores))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_caller,
        ));

    Router::new()
        .merge(public)
        .merge(authenticated)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
