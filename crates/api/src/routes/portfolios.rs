//! Route definitions for the `/portfolios` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{builder, portfolios};
use crate::state::AppState;

/// Routes mounted at `/portfolios`.
///
/// ```text
/// GET    /                         -> list_portfolios
/// POST   /                         -> create_portfolio
/// POST   /ensure                   -> ensure_portfolio
/// GET    /{id}                     -> get_portfolio
/// PATCH  /{id}                     -> update_portfolio
/// DELETE /{id}                     -> delete_portfolio
/// GET    /{id}/builder             -> load_builder
/// POST   /{id}/builder/session     -> open_session
/// DELETE /{id}/builder/session     -> close_session
/// POST   /{id}/builder/ops         -> apply_op
/// PUT    /{id}/layout              -> save_layout
/// GET    /{id}/identity            -> get_identity
/// PUT    /{id}/identity            -> put_identity
/// GET    /{id}/export              -> export_portfolio
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(portfolios::list_portfolios).post(portfolios::create_portfolio),
        )
        .route("/ensure", post(portfolios::ensure_portfolio))
        .route(
            "/{id}",
            get(portfolios::get_portfolio)
                .patch(portfolios::update_portfolio)
                .delete(portfolios::delete_portfolio),
        )
        .route("/{id}/builder", get(builder::load_builder))
        .route(
            "/{id}/builder/session",
            post(builder::open_session).delete(builder::close_session),
        )
        .route("/{id}/builder/ops", post(builder::apply_op))
        .route("/{id}/layout", put(builder::save_layout))
        .route(
            "/{id}/identity",
            get(builder::get_identity).put(builder::put_identity),
        )
        .route("/{id}/export", get(builder::export_portfolio))
}
