//! Builder surface state model.
//!
//! [`BuilderState`] owns the two ordered widget columns, the per-widget
//! content map, and the single inline-edit focus. Every mutating
//! operation ends with a corrective pass that re-pins the identity
//! widget to the top of the left column.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::identity::IdentityContent;
use crate::registry::{self, WidgetType, IDENTITY_WIDGET_ID};
use crate::types::Timestamp;

/// Export format version for downloaded portfolio JSON.
const EXPORT_VERSION: &str = "1.0.0";

/// One of the two layout columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Left,
    Right,
}

/// An `{id, type}` pair referencing a widget in a column sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetDef {
    pub id: String,
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
}

/// Composite key for the single inline-edit focus: `"{widget_id}-{field}"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldKey {
    pub widget_id: String,
    pub field: String,
}

impl FieldKey {
    pub fn new(widget_id: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            widget_id: widget_id.into(),
            field: field.into(),
        }
    }

    /// Render as the composite string form.
    pub fn composite(&self) -> String {
        format!("{}-{}", self.widget_id, self.field)
    }
}

/// Wire shape of one column inside a persisted layout row.
///
/// Serializes as `{"type": "vertical", "widgets": ["identity", ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    #[serde(rename = "type")]
    pub kind: String,
    pub widgets: Vec<String>,
}

impl ColumnLayout {
    pub fn vertical(widgets: Vec<String>) -> Self {
        Self {
            kind: "vertical".to_string(),
            widgets,
        }
    }

    pub fn empty() -> Self {
        Self::vertical(Vec::new())
    }
}

/// Wire shape of the `page_layouts.layout` JSONB column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutJson {
    pub left: ColumnLayout,
    pub right: ColumnLayout,
}

impl LayoutJson {
    pub fn empty() -> Self {
        Self {
            left: ColumnLayout::empty(),
            right: ColumnLayout::empty(),
        }
    }
}

/// Exported portfolio JSON, the client-facing download shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioExport {
    pub identity: IdentityContent,
    pub left_widgets: Vec<WidgetDef>,
    pub right_widgets: Vec<WidgetDef>,
    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub created_at: Timestamp,
    pub version: &'static str,
}

/// The in-memory builder: two ordered columns, one content blob per
/// widget id, and at most one field being edited at a time.
#[derive(Debug, Clone, Default)]
pub struct BuilderState {
    pub left: Vec<WidgetDef>,
    pub right: Vec<WidgetDef>,
    pub content: HashMap<String, Value>,
    pub styles: HashMap<String, Value>,
    pub editing: Option<FieldKey>,
}

impl BuilderState {
    /// An empty builder with just the identity widget in the left column.
    pub fn with_identity() -> Self {
        let mut state = Self::default();
        state
            .add_widget("identity", Column::Left)
            .expect("identity is a known widget type");
        state
    }

    /// Create a widget of type `key`, append it to `column`, and seed its
    /// content from the registry. Returns the new instance id.
    pub fn add_widget(&mut self, key: &str, column: Column) -> Result<String, CoreError> {
        let instance = registry::create_widget_instance(key)?;
        let def = WidgetDef {
            id: instance.id.clone(),
            widget_type: instance.widget_type,
        };

        self.column_mut(column).push(def);
        self.content.insert(instance.id.clone(), instance.content);
        if let Some(style) = instance.style {
            self.styles.insert(instance.id.clone(), style);
        }

        self.pin_identity();
        Ok(instance.id)
    }

    /// Remove `id` from whichever column holds it and drop its content.
    ///
    /// A no-op for the identity widget, which is not deletable.
    pub fn delete_widget(&mut self, id: &str) {
        if id == IDENTITY_WIDGET_ID {
            return;
        }
        self.left.retain(|w| w.id != id);
        self.right.retain(|w| w.id != id);
        self.content.remove(id);
        self.styles.remove(id);
        self.pin_identity();
    }

    /// Move `id` to the end of the other column.
    ///
    /// No-op when the widget is already in `to` or is the identity widget.
    pub fn move_widget(&mut self, id: &str, to: Column) {
        if id == IDENTITY_WIDGET_ID {
            return;
        }

        let from = match self.column_of(id) {
            Some(c) => c,
            None => return,
        };
        if from == to {
            return;
        }

        let source = self.column_mut(from);
        let idx = source.iter().position(|w| w.id == id).expect("id located above");
        let def = source.remove(idx);
        self.column_mut(to).push(def);

        self.pin_identity();
    }

    /// Replace a column's sequence with a permutation of the same id set.
    ///
    /// Rejects any order that adds, drops, or duplicates ids.
    pub fn reorder(&mut self, column: Column, new_order: &[String]) -> Result<(), CoreError> {
        let current = self.column_mut(column);

        if new_order.len() != current.len() {
            return Err(CoreError::Validation(
                "reorder must keep the same widget count".to_string(),
            ));
        }

        let current_ids: HashSet<&str> = current.iter().map(|w| w.id.as_str()).collect();
        let new_ids: HashSet<&str> = new_order.iter().map(String::as_str).collect();
        if new_ids.len() != new_order.len() || new_ids != current_ids {
            return Err(CoreError::Validation(
                "reorder must be a permutation of the column's widget ids".to_string(),
            ));
        }

        let mut by_id: HashMap<String, WidgetDef> =
            current.drain(..).map(|w| (w.id.clone(), w)).collect();
        *current = new_order
            .iter()
            .map(|id| by_id.remove(id).expect("validated as a permutation"))
            .collect();

        self.pin_identity();
        Ok(())
    }

    /// Corrective pass: if the identity widget exists anywhere, force it
    /// to index 0 of the left column. This is a silent revert, not a
    /// rejection.
    pub fn pin_identity(&mut self) {
        if let Some(idx) = self.right.iter().position(|w| w.id == IDENTITY_WIDGET_ID) {
            let def = self.right.remove(idx);
            self.left.insert(0, def);
            return;
        }
        if let Some(idx) = self.left.iter().position(|w| w.id == IDENTITY_WIDGET_ID) {
            if idx > 0 {
                let def = self.left.remove(idx);
                self.left.insert(0, def);
            }
        }
    }

    /// Start editing a field, replacing any other field's edit session.
    /// The builder is a single-focus editor by design.
    pub fn begin_edit(&mut self, key: FieldKey) {
        self.editing = Some(key);
    }

    /// Commit the current edit (blur / Enter) and clear the focus.
    pub fn commit_edit(&mut self) {
        self.editing = None;
    }

    /// Cancel the current edit (Escape) and clear the focus.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Replace the content blob for a widget id.
    pub fn set_content(&mut self, id: &str, content: Value) {
        self.content.insert(id.to_string(), content);
    }

    /// The persisted layout shape for this state.
    pub fn layout_json(&self) -> LayoutJson {
        LayoutJson {
            left: ColumnLayout::vertical(self.left.iter().map(|w| w.id.clone()).collect()),
            right: ColumnLayout::vertical(self.right.iter().map(|w| w.id.clone()).collect()),
        }
    }

    /// Build the client-facing export JSON.
    pub fn export(&self, identity: IdentityContent) -> PortfolioExport {
        PortfolioExport {
            identity,
            left_widgets: self.left.clone(),
            right_widgets: self.right.clone(),
            metadata: ExportMetadata {
                created_at: Utc::now(),
                version: EXPORT_VERSION,
            },
        }
    }

    /// Which column currently holds `id`, if any.
    pub fn column_of(&self, id: &str) -> Option<Column> {
        if self.left.iter().any(|w| w.id == id) {
            Some(Column::Left)
        } else if self.right.iter().any(|w| w.id == id) {
            Some(Column::Right)
        } else {
            None
        }
    }

    fn column_mut(&mut self, column: Column) -> &mut Vec<WidgetDef> {
        match column {
            Column::Left => &mut self.left,
            Column::Right => &mut self.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(column: &[WidgetDef]) -> Vec<&str> {
        column.iter().map(|w| w.id.as_str()).collect()
    }

    #[test]
    fn add_appends_to_the_chosen_column_with_default_content() {
        let mut state = BuilderState::with_identity();
        let id = state.add_widget("projects", Column::Right).unwrap();

        assert_eq!(ids(&state.right).last(), Some(&id.as_str()));
        let content = &state.content[&id];
        assert_eq!(content["title"], "Projects");
    }

    #[test]
    fn delete_removes_sequence_entry_and_content() {
        let mut state = BuilderState::with_identity();
        let id = state.add_widget("projects", Column::Right).unwrap();

        state.delete_widget(&id);

        assert!(state.column_of(&id).is_none());
        assert!(!state.content.contains_key(&id));
    }

    #[test]
    fn identity_delete_is_a_noop() {
        let mut state = BuilderState::with_identity();
        let before = state.left.clone();

        state.delete_widget(IDENTITY_WIDGET_ID);

        assert_eq!(state.left, before);
        assert!(state.content.contains_key(IDENTITY_WIDGET_ID));
    }

    #[test]
    fn identity_move_is_a_noop() {
        let mut state = BuilderState::with_identity();
        state.add_widget("education", Column::Left).unwrap();
        let before_left = state.left.clone();
        let before_right = state.right.clone();

        state.move_widget(IDENTITY_WIDGET_ID, Column::Right);

        assert_eq!(state.left, before_left);
        assert_eq!(state.right, before_right);
    }

    #[test]
    fn move_appends_to_the_end_of_the_target_column() {
        let mut state = BuilderState::with_identity();
        let a = state.add_widget("education", Column::Left).unwrap();
        let b = state.add_widget("projects", Column::Right).unwrap();

        state.move_widget(&a, Column::Right);

        assert_eq!(ids(&state.right), vec![b.as_str(), a.as_str()]);
        assert_eq!(ids(&state.left), vec![IDENTITY_WIDGET_ID]);
    }

    #[test]
    fn move_to_same_column_is_a_noop() {
        let mut state = BuilderState::with_identity();
        let a = state.add_widget("education", Column::Left).unwrap();
        state.add_widget("services", Column::Left).unwrap();
        let before = state.left.clone();

        state.move_widget(&a, Column::Left);

        assert_eq!(state.left, before);
    }

    #[test]
    fn reorder_preserves_the_id_set() {
        let mut state = BuilderState::default();
        let a = state.add_widget("education", Column::Right).unwrap();
        let b = state.add_widget("projects", Column::Right).unwrap();
        let c = state.add_widget("services", Column::Right).unwrap();

        state
            .reorder(Column::Right, &[c.clone(), a.clone(), b.clone()])
            .unwrap();

        assert_eq!(ids(&state.right), vec![c.as_str(), a.as_str(), b.as_str()]);
    }

    #[test]
    fn reorder_rejects_non_permutations() {
        let mut state = BuilderState::default();
        let a = state.add_widget("education", Column::Right).unwrap();
        let b = state.add_widget("projects", Column::Right).unwrap();

        // Duplicated id.
        assert!(state.reorder(Column::Right, &[a.clone(), a.clone()]).is_err());
        // Dropped id.
        assert!(state.reorder(Column::Right, &[a.clone()]).is_err());
        // Foreign id.
        assert!(state
            .reorder(Column::Right, &[a.clone(), "intruder".to_string()])
            .is_err());

        // State unchanged after the rejections.
        assert_eq!(ids(&state.right), vec![a.as_str(), b.as_str()]);
    }

    #[test]
    fn identity_is_repinned_after_every_mutation() {
        let mut state = BuilderState::with_identity();
        let a = state.add_widget("education", Column::Left).unwrap();
        state.add_widget("projects", Column::Right).unwrap();

        // A reorder that legitimately puts identity second gets corrected.
        state
            .reorder(Column::Left, &[a.clone(), IDENTITY_WIDGET_ID.to_string()])
            .unwrap();
        assert_eq!(state.left[0].id, IDENTITY_WIDGET_ID);

        // Even a state hand-built with identity in the right column is
        // silently reverted by the corrective pass.
        let def = state.left.remove(0);
        state.right.push(def);
        state.pin_identity();
        assert_eq!(state.left[0].id, IDENTITY_WIDGET_ID);
        assert!(!state.right.iter().any(|w| w.id == IDENTITY_WIDGET_ID));
    }

    #[test]
    fn single_edit_focus() {
        let mut state = BuilderState::with_identity();

        state.begin_edit(FieldKey::new("identity", "name"));
        state.begin_edit(FieldKey::new("identity", "title"));
        assert_eq!(
            state.editing.as_ref().map(FieldKey::composite),
            Some("identity-title".to_string())
        );

        state.commit_edit();
        assert!(state.editing.is_none());

        state.begin_edit(FieldKey::new("identity", "bio"));
        state.cancel_edit();
        assert!(state.editing.is_none());
    }

    #[test]
    fn layout_json_round_trips_the_wire_shape() {
        let mut state = BuilderState::with_identity();
        state.add_widget("projects", Column::Right).unwrap();

        let layout = state.layout_json();
        let value = serde_json::to_value(&layout).unwrap();

        assert_eq!(value["left"]["type"], "vertical");
        assert!(value["left"]["widgets"].is_array());
        assert_eq!(value["left"]["widgets"][0], "identity");

        let parsed: LayoutJson = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, layout);
    }

    #[test]
    fn add_then_delete_projects_end_to_end() {
        let mut state = BuilderState::with_identity();
        let id = state.add_widget("projects", Column::Right).unwrap();

        assert_eq!(state.right.last().unwrap().id, id);
        assert_eq!(state.content[&id]["title"], "Projects");

        state.delete_widget(&id);
        assert!(!state.left.iter().chain(&state.right).any(|w| w.id == id));
        assert!(!state.content.contains_key(&id));
    }
}
