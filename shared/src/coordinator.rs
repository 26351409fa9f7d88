//! Bookkeeping for in-flight effects.
//!
//! Every long-running effect is started under an [`EffectId`] and stamped with
//! a fresh [`Ticket`]. Results travel back into `App::update` carrying their
//! ticket, and are admitted only while that ticket is still the live one for
//! its key. Because admission happens inside the serialized update, a result
//! that arrives after `cancel` (or after its run was superseded) is dropped
//! no matter how late the shell delivers it.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EffectId {
    /// Location event subscription; lives for the visible lifetime of the screen.
    Location,
    /// One venue search request.
    Search,
}

impl EffectId {
    /// One-shot effects complete on their first admitted result.
    pub const fn is_one_shot(self) -> bool {
        matches!(self, Self::Search)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Search => "search",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct EffectCoordinator {
    issued: u64,
    running: BTreeMap<EffectId, Ticket>,
}

impl EffectCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts `id`, superseding any run still outstanding under the same key.
    pub fn run(&mut self, id: EffectId) -> Ticket {
        self.issued += 1;
        let ticket = Ticket(self.issued);
        if let Some(previous) = self.running.insert(id, ticket) {
            debug!(effect = id.name(), %previous, %ticket, "superseded running effect");
        }
        ticket
    }

    /// Cancels `id` if it is running. Returns the cancelled ticket.
    pub fn cancel(&mut self, id: EffectId) -> Option<Ticket> {
        let cancelled = self.running.remove(&id);
        if let Some(ticket) = cancelled {
            debug!(effect = id.name(), %ticket, "cancelled effect");
        }
        cancelled
    }

    pub fn cancel_all(&mut self) -> Vec<EffectId> {
        let ids: Vec<EffectId> = self.running.keys().copied().collect();
        for id in &ids {
            self.cancel(*id);
        }
        ids
    }

    /// Decides whether a result stamped with `ticket` may reach the reducer.
    pub fn admit(&mut self, id: EffectId, ticket: Ticket) -> bool {
        if self.running.get(&id) != Some(&ticket) {
            debug!(effect = id.name(), %ticket, "dropping result of cancelled effect");
            return false;
        }
        if id.is_one_shot() {
            self.running.remove(&id);
        }
        true
    }

    pub fn active(&self, id: EffectId) -> Option<Ticket> {
        self.running.get(&id).copied()
    }

    pub fn is_running(&self, id: EffectId) -> bool {
        self.running.contains_key(&id)
    }

    pub fn in_flight(&self) -> usize {
        self.running.len()
    }
}
