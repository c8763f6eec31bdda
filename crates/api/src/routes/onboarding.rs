//! Route definitions for draft slots and the onboarding flag.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::onboarding;
use crate::state::AppState;

/// Routes mounted at the API root (`/drafts`, `/onboarding`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/drafts", put(onboarding::claim_draft))
        .route(
            "/drafts/{portfolio_id}",
            get(onboarding::get_draft).delete(onboarding::release_draft),
        )
        .route("/onboarding/seen", post(onboarding::mark_onboarding_seen))
}
