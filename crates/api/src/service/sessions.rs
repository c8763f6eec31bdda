//! Server-side builder sessions.
//!
//! A session holds the live [`BuilderState`] for one portfolio plus its
//! autosave worker. Mutations apply to the state immediately; the
//! resulting snapshot goes to the worker, which persists it once the
//! debounce window closes. Closing a session flushes synchronously and
//! tears the worker down.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use folio_core::builder::{BuilderState, Column, FieldKey, WidgetDef};
use folio_core::registry::migrate_widget_def;
use folio_core::types::DbId;
use folio_core::CoreError;

use crate::background::autosave::{Autosaver, SaveStatus};
use crate::error::{AppError, AppResult};
use crate::service::builder_persistence::{self, LoadedPortfolio};

/// What the autosave worker persists: the column sequences plus the
/// content map, captured at mutation time.
#[derive(Debug, Clone)]
pub struct LayoutSnapshot {
    pub left: Vec<WidgetDef>,
    pub right: Vec<WidgetDef>,
    pub content: HashMap<String, Value>,
}

impl LayoutSnapshot {
    fn of(state: &BuilderState) -> Self {
        Self {
            left: state.left.clone(),
            right: state.right.clone(),
            content: state.content.clone(),
        }
    }
}

/// One builder mutation, as posted by the client.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BuilderOp {
    AddWidget { widget_type: String, column: Column },
    DeleteWidget { id: String },
    MoveWidget { id: String, to: Column },
    Reorder { column: Column, order: Vec<String> },
    SetContent { id: String, content: Value },
    BeginEdit { widget_id: String, field: String },
    CommitEdit,
    CancelEdit,
}

/// Snapshot of a session returned to the client after open or mutate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub left_widgets: Vec<WidgetDef>,
    pub right_widgets: Vec<WidgetDef>,
    pub widget_content: HashMap<String, Value>,
    pub editing_field: Option<String>,
    pub save_status: &'static str,
    /// Set by `AddWidget`, the id of the widget just created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_widget_id: Option<String>,
}

struct Session {
    state: BuilderState,
    saver: Autosaver<LayoutSnapshot>,
    cancel: CancellationToken,
}

/// All live builder sessions, keyed by portfolio id.
#[derive(Default)]
pub struct BuilderSessions {
    sessions: Mutex<HashMap<DbId, Session>>,
}

impl BuilderSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or rejoin) the session for a portfolio.
    ///
    /// A fresh session loads persisted state and spawns its autosave
    /// worker; rejoining returns the live state untouched.
    pub async fn open(&self, pool: &folio_db::DbPool, portfolio_id: DbId) -> AppResult<SessionView> {
        if let Some(session) = self.sessions.lock().await.get(&portfolio_id) {
            return Ok(view(session, None));
        }

        // Load without holding the sessions lock; a slow load must not
        // stall every other session.
        let loaded = builder_persistence::load_portfolio_data(pool, portfolio_id).await?;
        let state = state_from_loaded(loaded);

        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get(&portfolio_id) {
            // Someone else finished opening while we were loading.
            return Ok(view(session, None));
        }

        let cancel = CancellationToken::new();
        let saver = {
            let pool = pool.clone();
            Autosaver::spawn(
                move |snapshot: LayoutSnapshot| {
                    let pool = pool.clone();
                    async move {
                        builder_persistence::save_widget_layout(
                            &pool,
                            portfolio_id,
                            &snapshot.left,
                            &snapshot.right,
                            &snapshot.content,
                        )
                        .await
                    }
                },
                cancel.clone(),
            )
        };

        let session = Session {
            state,
            saver,
            cancel,
        };
        let v = view(&session, None);
        sessions.insert(portfolio_id, session);
        tracing::debug!(portfolio_id, "builder session opened");
        Ok(v)
    }

    /// Apply one mutation to a live session.
    pub async fn apply(&self, portfolio_id: DbId, op: BuilderOp) -> AppResult<SessionView> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(&portfolio_id).ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "no open builder session for portfolio {portfolio_id}"
            )))
        })?;

        let mut added = None;
        let mut dirty = true;
        match op {
            BuilderOp::AddWidget { widget_type, column } => {
                added = Some(session.state.add_widget(&widget_type, column)?);
            }
            BuilderOp::DeleteWidget { id } => session.state.delete_widget(&id),
            BuilderOp::MoveWidget { id, to } => session.state.move_widget(&id, to),
            BuilderOp::Reorder { column, order } => session.state.reorder(column, &order)?,
            BuilderOp::SetContent { id, content } => session.state.set_content(&id, content),
            BuilderOp::BeginEdit { widget_id, field } => {
                session.state.begin_edit(FieldKey::new(widget_id, field));
                dirty = false;
            }
            BuilderOp::CommitEdit => {
                session.state.commit_edit();
                dirty = false;
            }
            BuilderOp::CancelEdit => {
                session.state.cancel_edit();
                dirty = false;
            }
        }

        if dirty {
            session.saver.push(LayoutSnapshot::of(&session.state));
        }
        Ok(view(session, added))
    }

    /// Flush a session's state to the database and tear it down.
    ///
    /// The explicit flush means nothing is lost to the debounce window;
    /// the worker itself is cancelled without saving. Returns the
    /// flushed snapshot, or `None` when no session was open.
    pub async fn close(
        &self,
        pool: &folio_db::DbPool,
        portfolio_id: DbId,
    ) -> AppResult<Option<LayoutSnapshot>> {
        let session = self.sessions.lock().await.remove(&portfolio_id);
        let Some(session) = session else {
            return Ok(None);
        };

        session.cancel.cancel();
        let snapshot = LayoutSnapshot::of(&session.state);
        builder_persistence::save_widget_layout(
            pool,
            portfolio_id,
            &snapshot.left,
            &snapshot.right,
            &snapshot.content,
        )
        .await?;
        tracing::debug!(portfolio_id, "builder session closed");
        Ok(Some(snapshot))
    }

    /// Drop one session without flushing. Used when the portfolio is
    /// being deleted and a save would only race the cascade.
    pub async fn discard(&self, portfolio_id: DbId) {
        if let Some(session) = self.sessions.lock().await.remove(&portfolio_id) {
            session.cancel.cancel();
            session.saver.abort();
        }
    }

    /// Drop every session without flushing. Used on shutdown.
    pub async fn abort_all(&self) {
        let mut sessions = self.sessions.lock().await;
        for (_, session) in sessions.drain() {
            session.cancel.cancel();
            session.saver.abort();
        }
    }
}

fn state_from_loaded(loaded: LoadedPortfolio) -> BuilderState {
    let mut state = BuilderState {
        left: loaded.left_widgets,
        right: loaded.right_widgets,
        content: loaded.widget_content,
        ..Default::default()
    };

    // A brand-new portfolio has no identity row yet; seed one.
    if state.column_of(folio_core::registry::IDENTITY_WIDGET_ID).is_none() {
        let identity = migrate_widget_def(
            folio_core::registry::IDENTITY_WIDGET_ID,
            folio_core::registry::WidgetType::Identity,
            None,
            None,
        );
        state.left.insert(
            0,
            WidgetDef {
                id: identity.id.clone(),
                widget_type: identity.widget_type,
            },
        );
        state.content.insert(identity.id, identity.content);
    }
    state.pin_identity();
    state
}

fn view(session: &Session, added: Option<String>) -> SessionView {
    let status = match *session.saver.status().borrow() {
        SaveStatus::Idle => "idle",
        SaveStatus::Saving => "saving",
        SaveStatus::Saved => "saved",
        SaveStatus::SaveFailed => "save_failed",
    };
    SessionView {
        left_widgets: session.state.left.clone(),
        right_widgets: session.state.right.clone(),
        widget_content: session.state.content.clone(),
        editing_field: session.state.editing.as_ref().map(FieldKey::composite),
        save_status: status,
        added_widget_id: added,
    }
}
