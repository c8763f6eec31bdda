//! Portfolio entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use folio_core::types::{DbId, Timestamp};

/// A row from the `portfolios` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Portfolio {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub is_demo: bool,
    pub theme_id: Option<DbId>,
    pub community_id: Option<DbId>,
    pub template_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for the create-or-reuse portfolio request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePortfolio {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub theme_id: Option<DbId>,
    pub community_id: Option<DbId>,
    pub template_id: Option<DbId>,
}

/// Values inserted into `portfolios`. The slug is chosen by the
/// creation service, not the caller.
#[derive(Debug, Clone)]
pub struct NewPortfolio {
    pub user_id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub is_demo: bool,
    pub theme_id: Option<DbId>,
    pub community_id: Option<DbId>,
    pub template_id: Option<DbId>,
}

/// DTO for partially updating a portfolio.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePortfolio {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub theme_id: Option<DbId>,
    pub is_public: Option<bool>,
    pub community_id: Option<DbId>,
}
