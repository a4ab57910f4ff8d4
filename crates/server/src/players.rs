//! Players API endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{EngineError, MutationOutcome};
use uuid::Uuid;

use crate::{
    ServerError,
    server::ServerState,
    types::{
        listing::{ListQuery, Listing},
        mutation::MutationResponse,
        player::{PlayerNew, PlayerUpdate, PlayerView},
    },
    views,
};

fn parse_id(raw: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(raw)
        .map_err(|_| EngineError::InvalidId(format!("'{raw}' is not a player id")).into())
}

pub async fn player_new(
    State(state): State<ServerState>,
    Json(payload): Json<PlayerNew>,
) -> Result<(StatusCode, Json<MutationResponse<PlayerView>>), ServerError> {
    let player = state
        .engine
        .create_player(views::player_new_cmd(payload))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(views::mutation(MutationOutcome::applied(
            views::player_view(&player),
        ))),
    ))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Listing<PlayerView>>, ServerError> {
    let page = state
        .engine
        .list_players(&views::list_filter(query))
        .await?;
    Ok(Json(views::listing(page, views::player_view)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<PlayerView>, ServerError> {
    let player = state.engine.player(parse_id(&id)?).await?;
    Ok(Json(views::player_view(&player)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<PlayerUpdate>,
) -> Result<Json<MutationResponse<PlayerView>>, ServerError> {
    let id = parse_id(&id)?;
    let cmd = views::player_update_cmd(payload);
    if cmd.is_empty() {
        return Err(ServerError::Generic("no fields to update".to_string()));
    }

    let player = state.engine.update_player(id, cmd).await?;
    Ok(Json(views::mutation(MutationOutcome::applied(
        views::player_view(&player),
    ))))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse<PlayerView>>, ServerError> {
    let player = state.engine.delete_player(parse_id(&id)?).await?;
    Ok(Json(views::mutation(MutationOutcome::applied(
        views::player_view(&player),
    ))))
}
