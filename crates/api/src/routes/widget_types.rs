//! Route definitions for the widget type catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::widget_types;
use crate::state::AppState;

/// Routes mounted at `/widget-types`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(widget_types::list_widget_types))
}
