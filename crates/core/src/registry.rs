//! Static widget catalog.
//!
//! Every widget a portfolio page can contain is one [`WidgetType`]
//! variant. The registry supplies the default content and optional
//! default style for each type; both are built fresh on every call so
//! two instances never share a mutable default.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::CoreError;

/// The fixed instance id of the identity widget.
///
/// The identity widget is a singleton: always this id, always first in
/// the left column, never deletable.
pub const IDENTITY_WIDGET_ID: &str = "identity";

/// A widget type from the catalog.
///
/// Serialized by its kebab-case key (`"meeting-scheduler"`, ...), which
/// is also the `widget_types.key` value in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetType {
    Identity,
    Education,
    Projects,
    Description,
    Services,
    Gallery,
    Startup,
    MeetingScheduler,
    Image,
    TaskManager,
}

/// All widget types, in catalog display order.
pub const ALL_WIDGET_TYPES: [WidgetType; 10] = [
    WidgetType::Identity,
    WidgetType::Education,
    WidgetType::Projects,
    WidgetType::Description,
    WidgetType::Services,
    WidgetType::Gallery,
    WidgetType::Startup,
    WidgetType::MeetingScheduler,
    WidgetType::Image,
    WidgetType::TaskManager,
];

impl WidgetType {
    /// The stable string key for this type.
    pub fn key(self) -> &'static str {
        match self {
            WidgetType::Identity => "identity",
            WidgetType::Education => "education",
            WidgetType::Projects => "projects",
            WidgetType::Description => "description",
            WidgetType::Services => "services",
            WidgetType::Gallery => "gallery",
            WidgetType::Startup => "startup",
            WidgetType::MeetingScheduler => "meeting-scheduler",
            WidgetType::Image => "image",
            WidgetType::TaskManager => "task-manager",
        }
    }

    /// Resolve a key back to its type. `None` for unknown keys.
    pub fn from_key(key: &str) -> Option<Self> {
        ALL_WIDGET_TYPES.into_iter().find(|t| t.key() == key)
    }

    /// Human-readable catalog name.
    pub fn display_name(self) -> &'static str {
        match self {
            WidgetType::Identity => "Identity",
            WidgetType::Education => "Education",
            WidgetType::Projects => "Projects",
            WidgetType::Description => "Description",
            WidgetType::Services => "Services",
            WidgetType::Gallery => "Gallery",
            WidgetType::Startup => "Startup",
            WidgetType::MeetingScheduler => "Meeting Scheduler",
            WidgetType::Image => "Image",
            WidgetType::TaskManager => "Task Manager",
        }
    }

    /// Default content for a freshly added widget of this type.
    ///
    /// Returns a new [`Value`] on every call; item ids inside the
    /// content are freshly generated so instances never alias.
    pub fn default_content(self) -> Value {
        match self {
            WidgetType::Identity => json!({}),
            WidgetType::Education => json!({
                "title": "Education",
                "items": [{
                    "id": item_id(),
                    "degree": "Bachelor of Science",
                    "school": "University Name",
                    "year": "2020-2024",
                    "description": "",
                    "certified": false,
                }],
            }),
            WidgetType::Projects => json!({
                "title": "Projects",
                "items": [{
                    "id": item_id(),
                    "name": "Project Name",
                    "description": "Project description goes here...",
                    "year": "2024",
                    "tags": ["Rust", "Design"],
                }],
            }),
            WidgetType::Description => json!({
                "title": "About Me",
                "description": "Tell your story here...",
                "subdescription": "Add more details about yourself...",
            }),
            WidgetType::Services => json!({
                "title": "Services",
                "description": "Describe the services you offer...",
                "items": [],
            }),
            WidgetType::Gallery => json!({
                "title": "Gallery",
                "groups": [],
            }),
            WidgetType::Startup => json!({
                "title": "Startup",
                "description": "Describe your startup...",
            }),
            WidgetType::MeetingScheduler => json!({
                "mode": "button",
                "calendlyUrl": "",
            }),
            WidgetType::Image => json!({
                "url": "",
                "caption": "",
            }),
            WidgetType::TaskManager => json!({
                "title": "Your Projects",
                "projects": [{
                    "id": item_id(),
                    "name": "Sample Project",
                    "cover": { "kind": "gradient", "gradient": "from-sky-500/40 to-indigo-600/60" },
                    "tasks": [{
                        "id": item_id(),
                        "title": "Example Task",
                        "description": "This is an example task",
                        "due": "today",
                        "done": false,
                    }],
                }],
            }),
        }
    }

    /// Optional default visual style for this type.
    pub fn default_style(self) -> Option<Value> {
        match self {
            WidgetType::Description => Some(json!({ "bg": "bg-[#1a1a1a]" })),
            _ => None,
        }
    }
}

impl std::fmt::Display for WidgetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for WidgetType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WidgetType::from_key(s)
            .ok_or_else(|| CoreError::Validation(format!("unknown widget type: {s}")))
    }
}

/// A concrete widget on a page: identity plus type-specific content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetInstance {
    /// Layout key: `"identity"` for the singleton, `"{type}-{uuid}"`
    /// otherwise.
    pub id: String,
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    pub enabled: bool,
    pub content: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Value>,
}

/// Create a fresh instance of the widget type named by `key`.
///
/// Unknown keys fail with [`CoreError::Validation`]. The identity widget
/// always receives the fixed id [`IDENTITY_WIDGET_ID`]; every other type
/// gets a collision-resistant `"{key}-{uuid}"` id.
pub fn create_widget_instance(key: &str) -> Result<WidgetInstance, CoreError> {
    let widget_type: WidgetType = key.parse()?;

    let id = if widget_type == WidgetType::Identity {
        IDENTITY_WIDGET_ID.to_string()
    } else {
        format!("{}-{}", widget_type.key(), Uuid::new_v4())
    };

    Ok(WidgetInstance {
        id,
        widget_type,
        enabled: true,
        content: widget_type.default_content(),
        style: widget_type.default_style(),
    })
}

/// Rebuild an instance from a persisted `{id, type}` pair.
///
/// Used when loading a page: persisted content wins, registry defaults
/// fill the gaps.
pub fn migrate_widget_def(
    id: &str,
    widget_type: WidgetType,
    existing_content: Option<Value>,
    existing_style: Option<Value>,
) -> WidgetInstance {
    WidgetInstance {
        id: id.to_string(),
        widget_type,
        enabled: true,
        content: existing_content.unwrap_or_else(|| widget_type.default_content()),
        style: existing_style.or_else(|| widget_type.default_style()),
    }
}

/// Resolve a persisted layout key to its widget type.
///
/// Keys are either a bare type key (`"identity"`) or
/// `"{type}-{uuid}"`. Type keys can themselves contain hyphens, so
/// prefix matching picks the longest type key that matches.
pub fn resolve_layout_key(key: &str) -> Option<WidgetType> {
    if let Some(t) = WidgetType::from_key(key) {
        return Some(t);
    }
    ALL_WIDGET_TYPES
        .into_iter()
        .filter(|t| key.starts_with(t.key()) && key.as_bytes().get(t.key().len()) == Some(&b'-'))
        .max_by_key(|t| t.key().len())
}

/// Generate a stable id for an item inside default widget content.
fn item_id() -> String {
    Uuid::new_v4().to_string()
}
