//! Handlers for draft slots and the one-shot onboarding flag.
//!
//! Both are in-memory per process, mirroring editor-local state; they
//! intentionally reset on restart.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use folio_core::drafts::DraftSlot;
use folio_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ClaimDraftRequest {
    /// The portfolio the draft belongs to; absent for a brand-new draft.
    pub slot_portfolio_id: Option<DbId>,
    pub portfolio_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub portfolio_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
pub struct OnboardingResponse {
    /// Whether this call was the first sighting.
    pub first_seen: bool,
}

fn slot(portfolio_id: Option<DbId>) -> DraftSlot {
    match portfolio_id {
        Some(id) => DraftSlot::Portfolio(id),
        None => DraftSlot::New,
    }
}

/// PUT /api/v1/drafts -- bind a draft slot to a portfolio id.
pub async fn claim_draft(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ClaimDraftRequest>,
) -> AppResult<StatusCode> {
    state
        .drafts
        .lock()
        .await
        .put(user.user_id, slot(input.slot_portfolio_id), input.portfolio_id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/drafts/{portfolio_id} -- the bound draft, `"new"` keyed
/// drafts are fetched with portfolio_id 0.
pub async fn get_draft(
    State(state): State<AppState>,
    user: AuthUser,
    Path(portfolio_id): Path<DbId>,
) -> AppResult<Json<DataResponse<DraftResponse>>> {
    let key = if portfolio_id == 0 { None } else { Some(portfolio_id) };
    let bound = state.drafts.lock().await.get(user.user_id, slot(key));
    Ok(Json(DataResponse {
        data: DraftResponse { portfolio_id: bound },
    }))
}

/// DELETE /api/v1/drafts/{portfolio_id}
pub async fn release_draft(
    State(state): State<AppState>,
    user: AuthUser,
    Path(portfolio_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let key = if portfolio_id == 0 { None } else { Some(portfolio_id) };
    state.drafts.lock().await.remove(user.user_id, slot(key));
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/onboarding/seen
///
/// Record that the user has seen the builder onboarding. Returns
/// whether this call flipped the flag, so the client shows the tour
/// exactly once per server lifetime.
pub async fn mark_onboarding_seen(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<OnboardingResponse>>> {
    let first_seen = state.drafts.lock().await.mark_onboarding_seen(user.user_id);
    Ok(Json(DataResponse {
        data: OnboardingResponse { first_seen },
    }))
}
