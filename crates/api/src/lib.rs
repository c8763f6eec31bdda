//! Folio HTTP API.
//!
//! Axum service exposing the portfolio builder: portfolio CRUD with
//! create-or-reuse semantics, builder load/save, the widget type
//! catalog, templates, and draft bookkeeping.

pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod service;
pub mod state;
