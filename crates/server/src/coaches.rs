//! Coaches API endpoints.

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
        coach::{CoachNew, CoachUpdate, CoachView},
    },
    views,
};

fn parse_id(raw: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(raw)
        .map_err(|_| EngineError::InvalidId(format!("'{raw}' is not a coach id")).into())
}

pub async fn coach_new(
    State(state): State<ServerState>,
    Json(payload): Json<CoachNew>,
) -> Result<(StatusCode, Json<MutationResponse<CoachView>>), ServerError> {
    let coach = state
        .engine
        .create_coach(views::coach_new_cmd(payload))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(views::mutation(MutationOutcome::applied(
            views::coach_view(&coach),
        ))),
    ))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Listing<CoachView>>, ServerError> {
    let page = state
        .engine
        .list_coaches(&views::list_filter(query))
        .await?;
    Ok(Json(views::listing(page, views::coach_view)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<CoachView>, ServerError> {
    let coach = state.engine.coach(parse_id(&id)?).await?;
    Ok(Json(views::coach_view(&coach)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CoachUpdate>,
) -> Result<Json<MutationResponse<CoachView>>, ServerError> {
    let id = parse_id(&id)?;
    let cmd = views::coach_update_cmd(payload);
    if cmd.is_empty() {
        return Err(ServerError::Generic("no fields to update".to_string()));
    }

    let coach = state.engine.update_coach(id, cmd).await?;
    Ok(Json(views::mutation(MutationOutcome::applied(
        views::coach_view(&coach),
    ))))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse<CoachView>>, ServerError> {
    let coach = state.engine.delete_coach(parse_id(&id)?).await?;
    Ok(Json(views::mutation(MutationOutcome::applied(
        views::coach_view(&coach),
    ))))
}
