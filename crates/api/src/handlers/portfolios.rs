//! Handlers for the `/portfolios` resource.
//!
//! All endpoints require authentication; every query is additionally
//! scoped to the authenticated user so one user can never read or
//! mutate another's portfolio.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use folio_core::error::CoreError;
use folio_core::types::DbId;
use folio_db::models::{CreatePortfolio, Portfolio, UpdatePortfolio};
use folio_db::repositories::{PageRepo, PortfolioRepo};
use folio_events::PortfolioEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::service::ensure::{unshare_error, EnsureOutcome};
use crate::service::portfolio_creation::create_portfolio_once;
use crate::state::AppState;

/// POST /api/v1/portfolios
///
/// Create a portfolio with a freshly allocated slug. Community
/// portfolios are create-once per user.
pub async fn create_portfolio(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreatePortfolio>,
) -> AppResult<(StatusCode, Json<DataResponse<Portfolio>>)> {
    input.validate()?;

    let portfolio = create_portfolio_once(&state.pool, user.user_id, &input).await?;
    state.event_bus.publish(
        PortfolioEvent::new("portfolio.created")
            .with_portfolio(portfolio.id)
            .with_actor(user.user_id),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: portfolio })))
}

/// POST /api/v1/portfolios/ensure
///
/// Return the user's personal portfolio, creating it on first call.
/// Concurrent calls from the same user share a single creation.
pub async fn ensure_portfolio(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<EnsureOutcome>>> {
    let pool = state.pool.clone();
    let user_id = user.user_id;

    let outcome = state
        .ensure
        .run(user_id, move || async move {
            let existing = PortfolioRepo::list_for_user(&pool, user_id).await?;
            if let Some(portfolio) = existing.iter().find(|p| p.community_id.is_none()) {
                let page = PageRepo::find_main(&pool, portfolio.id).await?.ok_or_else(|| {
                    AppError::InternalError(format!("portfolio {} has no main page", portfolio.id))
                })?;
                return Ok(EnsureOutcome {
                    portfolio_id: portfolio.id,
                    page_id: page.id,
                    is_new: false,
                });
            }

            let input = CreatePortfolio {
                name: "My Portfolio".to_string(),
                description: None,
                theme_id: None,
                community_id: None,
                template_id: None,
            };
            let portfolio = create_portfolio_once(&pool, user_id, &input).await?;
            let page = PageRepo::find_main(&pool, portfolio.id).await?.ok_or_else(|| {
                AppError::InternalError(format!("portfolio {} has no main page", portfolio.id))
            })?;
            Ok(EnsureOutcome {
                portfolio_id: portfolio.id,
                page_id: page.id,
                is_new: true,
            })
        })
        .await
        .map_err(unshare_error)?;

    if outcome.is_new {
        state.event_bus.publish(
            PortfolioEvent::new("portfolio.created")
                .with_portfolio(outcome.portfolio_id)
                .with_actor(user.user_id),
        );
    }
    Ok(Json(DataResponse { data: outcome }))
}

/// GET /api/v1/portfolios
///
/// List the user's portfolios, most recently updated first. Duplicate
/// slugs (a historical data defect) are collapsed to the newest row.
pub async fn list_portfolios(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Portfolio>>>> {
    let rows = PortfolioRepo::list_for_user(&state.pool, user.user_id).await?;

    let mut seen = std::collections::HashSet::new();
    let deduped: Vec<Portfolio> = rows
        .into_iter()
        .filter(|p| seen.insert(p.slug.clone()))
        .collect();

    Ok(Json(DataResponse { data: deduped }))
}

/// GET /api/v1/portfolios/{id}
pub async fn get_portfolio(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Portfolio>>> {
    let portfolio = find_owned(&state, id, user.user_id).await?;
    Ok(Json(DataResponse { data: portfolio }))
}

/// PATCH /api/v1/portfolios/{id}
pub async fn update_portfolio(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePortfolio>,
) -> AppResult<Json<DataResponse<Portfolio>>> {
    if id <= 0 {
        return Err(AppError::Core(CoreError::Validation(
            "portfolio id must be a positive identifier".to_string(),
        )));
    }
    input.validate()?;

    find_owned(&state, id, user.user_id).await?;
    let updated = PortfolioRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "portfolio",
            id,
        })?;

    state.event_bus.publish(
        PortfolioEvent::new("portfolio.updated")
            .with_portfolio(id)
            .with_actor(user.user_id),
    );
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/portfolios/{id}
///
/// Pages, layouts, and widget instances go with it via cascade.
pub async fn delete_portfolio(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.sessions.discard(id).await;

    let deleted = PortfolioRepo::delete(&state.pool, id, user.user_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "portfolio",
            id,
        }));
    }

    state.event_bus.publish(
        PortfolioEvent::new("portfolio.deleted")
            .with_portfolio(id)
            .with_actor(user.user_id),
    );
    Ok(StatusCode::NO_CONTENT)
}

/// Fetch a portfolio and verify ownership.
pub(crate) async fn find_owned(state: &AppState, id: DbId, user_id: DbId) -> AppResult<Portfolio> {
    let portfolio = PortfolioRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "portfolio",
            id,
        })?;
    if portfolio.user_id != user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "portfolio belongs to another user".to_string(),
        )));
    }
    Ok(portfolio)
}
