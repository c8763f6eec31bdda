//! Long-running background tasks.

pub mod autosave;
