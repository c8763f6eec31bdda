//! Multi-step orchestration above the repositories.

pub mod builder_persistence;
pub mod ensure;
pub mod portfolio_creation;
pub mod sessions;
