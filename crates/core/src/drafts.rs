//! Client-ephemeral draft state.
//!
//! Mirrors the browser-local state the editor keeps outside the
//! relational store: which portfolio id a user's draft session is bound
//! to (keyed `"{user_id}:{portfolio_or_new}"`) and a one-shot
//! onboarding-seen flag. Purely in-memory; no server mirror.

use std::collections::{HashMap, HashSet};

use crate::types::DbId;

/// Key for a draft slot: an existing portfolio id, or a fresh draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftSlot {
    Portfolio(DbId),
    New,
}

impl DraftSlot {
    fn as_key_part(self) -> String {
        match self {
            DraftSlot::Portfolio(id) => id.to_string(),
            DraftSlot::New => "new".to_string(),
        }
    }
}

/// In-memory draft-portfolio-id cache plus onboarding flags.
#[derive(Debug, Default)]
pub struct DraftCache {
    drafts: HashMap<String, DbId>,
    onboarding_seen: HashSet<DbId>,
}

impl DraftCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(user_id: DbId, slot: DraftSlot) -> String {
        format!("{user_id}:{}", slot.as_key_part())
    }

    /// The portfolio id bound to this user's draft slot, if any.
    pub fn get(&self, user_id: DbId, slot: DraftSlot) -> Option<DbId> {
        self.drafts.get(&Self::key(user_id, slot)).copied()
    }

    /// Bind a portfolio id to a draft slot, replacing any previous binding.
    pub fn put(&mut self, user_id: DbId, slot: DraftSlot, portfolio_id: DbId) {
        self.drafts.insert(Self::key(user_id, slot), portfolio_id);
    }

    /// Drop a draft binding (e.g. after the portfolio is deleted).
    pub fn remove(&mut self, user_id: DbId, slot: DraftSlot) {
        self.drafts.remove(&Self::key(user_id, slot));
    }

    /// Mark onboarding as seen. Returns `true` the first time only.
    pub fn mark_onboarding_seen(&mut self, user_id: DbId) -> bool {
        self.onboarding_seen.insert(user_id)
    }

    pub fn has_seen_onboarding(&self, user_id: DbId) -> bool {
        self.onboarding_seen.contains(&user_id)
    }
}
