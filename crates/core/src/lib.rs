//! Domain logic for the Folio portfolio builder.
//!
//! Everything in this crate is pure and synchronous: the widget registry,
//! the two-column builder surface state model, identity/theme handling,
//! slug generation, and the draft-id cache. Persistence and HTTP live in
//! `folio-db` and `folio-api`.

pub mod builder;
pub mod drafts;
pub mod error;
pub mod identity;
pub mod registry;
pub mod slug;
pub mod types;

pub use error::CoreError;
