//! Portfolio creation with slug allocation and page bootstrapping.
//!
//! Slug allocation races are resolved optimistically: insert with a
//! candidate slug, and on a `uq_portfolios_slug` unique violation retry
//! with the next numeric suffix. After [`MAX_SLUG_ATTEMPTS`] numeric
//! candidates a single random-suffix candidate is tried before giving up.

use folio_core::builder::LayoutJson;
use folio_core::slug::{create_base_slug, generate_slug_with_suffix, random_suffix, MAX_SLUG_ATTEMPTS};
use folio_core::CoreError;
use folio_db::models::{CreatePortfolio, NewPortfolio, Portfolio};
use folio_db::repositories::{PageLayoutRepo, PageRepo, PortfolioRepo, TemplateRepo};
use folio_db::DbPool;

use crate::error::{is_unique_violation, AppError, AppResult};

/// Creates a portfolio for `user_id`, guaranteeing a unique slug and a
/// bootstrapped main page with an empty (or template-derived) layout.
///
/// When `community_id` is set, at most one portfolio per user per
/// community is allowed; a second attempt returns a conflict. A
/// community's mandatory template, if any, is recorded on the portfolio
/// so the first builder load can materialize its widgets.
pub async fn create_portfolio_once(
    pool: &DbPool,
    user_id: i64,
    input: &CreatePortfolio,
) -> AppResult<Portfolio> {
    let mut template_id = input.template_id;

    if let Some(community_id) = input.community_id {
        if let Some(existing) =
            PortfolioRepo::find_by_user_and_community(pool, user_id, community_id).await?
        {
            tracing::debug!(
                portfolio_id = existing.id,
                community_id,
                "portfolio already exists for community"
            );
            return Err(AppError::Core(CoreError::Conflict(format!(
                "a portfolio already exists for community {community_id}"
            ))));
        }

        if template_id.is_none() {
            template_id = TemplateRepo::find_mandatory_for_community(pool, community_id)
                .await?
                .map(|t| t.id);
        }
    }

    let description = input
        .description
        .clone()
        .unwrap_or_else(|| format!("{}'s portfolio", input.name));
    let base = create_base_slug(&input.name);

    let portfolio = allocate_and_insert(pool, user_id, input, &base, &description, template_id).await?;

    let page = PageRepo::create_main(pool, portfolio.id, &portfolio.name).await?;

    let layout = match template_id {
        Some(id) => TemplateRepo::find_active_by_id(pool, id)
            .await?
            .map(|t| t.layout)
            .unwrap_or_else(empty_layout),
        None => empty_layout(),
    };
    PageLayoutRepo::upsert(pool, page.id, &layout).await?;

    tracing::info!(
        portfolio_id = portfolio.id,
        slug = %portfolio.slug,
        template_id,
        "portfolio created"
    );
    Ok(portfolio)
}

async fn allocate_and_insert(
    pool: &DbPool,
    user_id: i64,
    input: &CreatePortfolio,
    base: &str,
    description: &str,
    template_id: Option<i64>,
) -> AppResult<Portfolio> {
    for attempt in 0..MAX_SLUG_ATTEMPTS {
        let slug = generate_slug_with_suffix(base, attempt);
        match try_insert(pool, user_id, input, &slug, description, template_id).await {
            Ok(portfolio) => return Ok(portfolio),
            Err(err) if is_unique_violation(&err, "uq_portfolios_slug") => {
                tracing::debug!(%slug, attempt, "slug taken, retrying");
                continue;
            }
            Err(err) => return Err(classify_insert_error(err)),
        }
    }

    // Numeric suffixes exhausted; one shot with a random suffix.
    let slug = format!("{base}-{}", random_suffix());
    match try_insert(pool, user_id, input, &slug, description, template_id).await {
        Ok(portfolio) => Ok(portfolio),
        Err(err) if is_unique_violation(&err, "uq_portfolios_slug") => Err(AppError::Core(
            CoreError::Conflict("could not allocate a unique slug".to_string()),
        )),
        Err(err) => Err(classify_insert_error(err)),
    }
}

async fn try_insert(
    pool: &DbPool,
    user_id: i64,
    input: &CreatePortfolio,
    slug: &str,
    description: &str,
    template_id: Option<i64>,
) -> Result<Portfolio, sqlx::Error> {
    PortfolioRepo::insert(
        pool,
        &NewPortfolio {
            user_id,
            name: input.name.clone(),
            slug: slug.to_string(),
            description: Some(description.to_string()),
            is_public: false,
            is_demo: false,
            theme_id: input.theme_id,
            community_id: input.community_id,
            template_id,
        },
    )
    .await
}

fn empty_layout() -> serde_json::Value {
    // LayoutJson always serializes cleanly.
    serde_json::to_value(LayoutJson::empty()).unwrap_or_default()
}

fn classify_insert_error(err: sqlx::Error) -> AppError {
    if is_unique_violation(&err, "uq_portfolios_user_community") {
        AppError::Core(CoreError::Conflict(
            "a portfolio already exists for this community".to_string(),
        ))
    } else {
        AppError::Database(err)
    }
}
