//! Handlers for portfolio templates.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use folio_core::types::DbId;
use folio_db::models::PortfolioTemplate;
use folio_db::repositories::TemplateRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListTemplatesQuery {
    pub community_id: Option<DbId>,
}

/// GET /api/v1/templates?community_id=
///
/// System templates plus, when a community is given, that community's
/// own templates.
pub async fn list_templates(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListTemplatesQuery>,
) -> AppResult<Json<DataResponse<Vec<PortfolioTemplate>>>> {
    let templates = TemplateRepo::list_available(&state.pool, query.community_id).await?;
    Ok(Json(DataResponse { data: templates }))
}
