//! Full-replace layout persistence and builder load.
//!
//! A save upserts the layout row, resolves each widget's type id, then
//! deletes and re-inserts the page's widget instances. The steps are
//! not wrapped in one transaction; each is logged so a partial failure
//! can be reconstructed from the trace, and the next save repairs the
//! page anyway.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use folio_core::builder::{ColumnLayout, LayoutJson, WidgetDef};
use folio_core::registry::{resolve_layout_key, WidgetType};
use folio_core::types::DbId;
use folio_core::CoreError;
use folio_db::models::{NewWidgetInstance, TemplateWidgetConfig};
use folio_db::repositories::{
    PageLayoutRepo, PageRepo, PortfolioRepo, TemplateRepo, WidgetInstanceRepo, WidgetTypeRepo,
};
use folio_db::DbPool;

use crate::error::{AppError, AppResult};

/// The builder's persisted state, as returned to a loading client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedPortfolio {
    pub left_widgets: Vec<WidgetDef>,
    pub right_widgets: Vec<WidgetDef>,
    pub widget_content: HashMap<String, Value>,
    pub is_from_template: bool,
}

/// Replace a portfolio page's layout and widget instances.
///
/// `content` maps layout keys to widget props; widgets present in the
/// columns but absent from the map are stored with empty props.
pub async fn save_widget_layout(
    pool: &DbPool,
    portfolio_id: DbId,
    left: &[WidgetDef],
    right: &[WidgetDef],
    content: &HashMap<String, Value>,
) -> AppResult<()> {
    let page = PageRepo::find_main(pool, portfolio_id).await?.ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "no page found for portfolio {portfolio_id}; recreate the portfolio"
        )))
    })?;

    let layout = LayoutJson {
        left: ColumnLayout::vertical(left.iter().map(|w| w.id.clone()).collect()),
        right: ColumnLayout::vertical(right.iter().map(|w| w.id.clone()).collect()),
    };
    let layout_value = serde_json::to_value(&layout)
        .map_err(|e| AppError::InternalError(format!("layout serialization failed: {e}")))?;
    PageLayoutRepo::upsert(pool, page.id, &layout_value).await?;
    tracing::debug!(page_id = page.id, "layout row upserted");

    let type_ids = WidgetTypeRepo::key_to_id_map(pool).await?;
    let mut rows = Vec::with_capacity(left.len() + right.len());
    for def in left.iter().chain(right.iter()) {
        let widget_type_id = *type_ids.get(def.widget_type.key()).ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "unknown widget type: {}",
                def.widget_type.key()
            )))
        })?;
        rows.push(NewWidgetInstance {
            key: def.id.clone(),
            widget_type_id,
            props: content.get(&def.id).cloned().unwrap_or_else(|| Value::Object(Default::default())),
        });
    }

    let deleted = WidgetInstanceRepo::delete_for_page(pool, page.id).await?;
    let inserted = WidgetInstanceRepo::insert_many(pool, page.id, &rows).await?;
    tracing::info!(
        portfolio_id,
        page_id = page.id,
        deleted,
        inserted,
        "widget layout saved"
    );
    Ok(())
}

/// Load a portfolio's builder state.
///
/// A template-born portfolio whose page has no instance rows yet is
/// served from its template without writing anything; the first save
/// materializes the rows.
pub async fn load_portfolio_data(pool: &DbPool, portfolio_id: DbId) -> AppResult<LoadedPortfolio> {
    let portfolio = PortfolioRepo::find_by_id(pool, portfolio_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "portfolio",
            id: portfolio_id,
        })?;
    let page = PageRepo::find_main(pool, portfolio_id).await?.ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "no page found for portfolio {portfolio_id}; recreate the portfolio"
        )))
    })?;

    if let Some(template_id) = portfolio.template_id {
        if WidgetInstanceRepo::count_for_page(pool, page.id).await? == 0 {
            if let Some(template) = TemplateRepo::find_active_by_id(pool, template_id).await? {
                tracing::debug!(portfolio_id, template_id, "serving unsaved template state");
                return Ok(load_from_template(&template));
            }
            tracing::warn!(portfolio_id, template_id, "referenced template is gone");
        }
    }

    let layout: LayoutJson = match PageLayoutRepo::find_by_page(pool, page.id).await? {
        Some(row) => serde_json::from_value(row.layout).unwrap_or_else(|_| LayoutJson::empty()),
        None => LayoutJson::empty(),
    };
    let instances = WidgetInstanceRepo::list_for_page(pool, page.id).await?;
    let widget_content: HashMap<String, Value> = instances
        .into_iter()
        .map(|i| (i.key, i.props))
        .collect();

    let left_widgets = resolve_column(&layout.left);
    let right_widgets = resolve_column(&layout.right);

    Ok(LoadedPortfolio {
        left_widgets,
        right_widgets,
        widget_content,
        is_from_template: false,
    })
}

fn resolve_column(column: &ColumnLayout) -> Vec<WidgetDef> {
    column
        .widgets
        .iter()
        .filter_map(|key| match resolve_layout_key(key) {
            Some(widget_type) => Some(WidgetDef {
                id: key.clone(),
                widget_type,
            }),
            None => {
                tracing::warn!(%key, "skipping layout entry with unresolvable type");
                None
            }
        })
        .collect()
}

fn load_from_template(template: &folio_db::models::PortfolioTemplate) -> LoadedPortfolio {
    let layout: LayoutJson = serde_json::from_value(template.layout.clone())
        .unwrap_or_else(|_| LayoutJson::empty());
    let configs: Vec<TemplateWidgetConfig> =
        serde_json::from_value(template.widget_configs.clone()).unwrap_or_default();

    let mut widget_content = HashMap::new();
    let mut types_by_id: HashMap<String, WidgetType> = HashMap::new();
    for config in configs {
        if let Some(t) = WidgetType::from_key(&config.type_key) {
            types_by_id.insert(config.id.clone(), t);
        }
        widget_content.insert(config.id, config.props);
    }

    let resolve = |keys: &[String]| -> Vec<WidgetDef> {
        keys.iter()
            .filter_map(|key| {
                types_by_id
                    .get(key)
                    .copied()
                    .or_else(|| resolve_layout_key(key))
                    .map(|widget_type| WidgetDef {
                        id: key.clone(),
                        widget_type,
                    })
            })
            .collect()
    };

    LoadedPortfolio {
        left_widgets: resolve(&layout.left.widgets),
        right_widgets: resolve(&layout.right.widgets),
        widget_content,
        is_from_template: true,
    }
}
