use utoipa_axum::{router::OpenApiRouter, routes};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .merge(league_routes())
        .merge(prediction_routes())
        .merge(demo_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn league_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::league::list_teams))
        .routes(routes!(handlers::league::current_season))
        .routes(routes!(handlers::league::get_standings))
        .routes(routes!(handlers::league::get_fixtures))
        .routes(routes!(handlers::league::get_team_fixtures))
        .routes(routes!(handlers::league::get_leaderboard))
}

fn prediction_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::prediction::get_prediction,
            handlers::prediction::create_prediction,
            handlers::prediction::reorder_prediction
        ))
        .routes(routes!(handlers::prediction::swap_teams))
        .routes(routes!(handlers::prediction::swap_status))
        .routes(routes!(handlers::prediction::get_user_prediction))
}

fn demo_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::demo::reset))
}
