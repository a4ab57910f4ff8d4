//! Clubs API endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::MutationOutcome;

use crate::{
    ServerError,
    server::ServerState,
    types::{
        club::{ClubDetail, ClubNew, ClubUpdate, ClubView},
        ledger::LedgerView,
        listing::{ListQuery, Listing},
        mutation::MutationResponse,
    },
    views,
};

pub async fn club_new(
    State(state): State<ServerState>,
    Json(payload): Json<ClubNew>,
) -> Result<(StatusCode, Json<MutationResponse<ClubView>>), ServerError> {
    let club = state
        .engine
        .create_club(views::club_new_cmd(payload))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(views::mutation(MutationOutcome::applied(views::club_view(
            &club,
        )))),
    ))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Listing<ClubView>>, ServerError> {
    let page = state
        .engine
        .list_clubs(&views::list_filter(query))
        .await?;
    Ok(Json(views::listing(page, views::club_view)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> Result<Json<ClubDetail>, ServerError> {
    let roster = state.engine.club(&code).await?;
    Ok(Json(views::club_detail(&roster)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(code): Path<String>,
    Json(payload): Json<ClubUpdate>,
) -> Result<Json<MutationResponse<ClubView>>, ServerError> {
    let cmd = views::club_update_cmd(payload);
    if cmd.is_empty() {
        return Err(ServerError::Generic("no fields to update".to_string()));
    }

    let club = state.engine.update_club(&code, cmd).await?;
    Ok(Json(views::mutation(MutationOutcome::applied(
        views::club_view(&club),
    ))))
}

/// Players and coach of the club are kept, without a club.
pub async fn delete(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> Result<Json<MutationResponse<ClubDetail>>, ServerError> {
    let roster = state.engine.delete_club(&code).await?;
    Ok(Json(views::mutation(MutationOutcome::applied(
        views::club_detail(&roster),
    ))))
}

pub async fn ledger(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> Result<Json<LedgerView>, ServerError> {
    let report = state.engine.club_ledger(&code).await?;
    Ok(Json(views::ledger_view(&report)))
}
