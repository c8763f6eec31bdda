//! Route definitions for portfolio templates.

use axum::routing::get;
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

/// Routes mounted at `/templates`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(templates::list_templates))
}
