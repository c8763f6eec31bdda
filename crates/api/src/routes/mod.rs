pub mod health;
pub mod onboarding;
pub mod portfolios;
pub mod templates;
pub mod widget_types;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /portfolios                              list, create
/// /portfolios/ensure                       get-or-create personal portfolio (POST)
/// /portfolios/{id}                         get, update, delete
/// /portfolios/{id}/builder                 load builder state (GET)
/// /portfolios/{id}/builder/session         open (POST), close+flush (DELETE)
/// /portfolios/{id}/builder/ops             apply a builder mutation (POST)
/// /portfolios/{id}/layout                  full-replace save (PUT)
/// /portfolios/{id}/identity                identity props (GET, PUT)
/// /portfolios/{id}/export                  portfolio JSON download (GET)
///
/// /widget-types                            widget catalog (GET)
/// /templates                               available templates (?community_id)
///
/// /drafts                                  claim draft slot (PUT)
/// /drafts/{portfolio_id}                   get, release (0 = new-draft slot)
/// /onboarding/seen                         flip the onboarding flag (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/portfolios", portfolios::router())
        .nest("/widget-types", widget_types::router())
        .nest("/templates", templates::router())
        .merge(onboarding::router())
}
