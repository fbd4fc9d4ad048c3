use std::collections::VecDeque;

use specs::prelude::Entity;

use crate::config::DEFAULT_MESSAGE_LIMIT;

/// The entity the per-entity systems are currently looking at.
///
/// `ready` is fixed when the entity's pass begins: it holds a full action, or
/// has no energy pool at all. Whichever of combat or movement acts first clears it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveEntity {
    pub entity: Entity,
    pub ready: bool,
}

/// Recent event lines, oldest first. May run over `limit` mid-turn until `trim`.
#[derive(Clone, Debug)]
pub struct MessageLog {
    entries: VecDeque<String>,
    limit: usize,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE_LIMIT)
    }
}

impl MessageLog {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit + 1),
            limit,
        }
    }

    pub fn push<S: Into<String>>(&mut self, entry: S) {
        self.entries.push_back(entry.into());
    }

    /// Drops the oldest entries until at most `limit` remain.
    pub fn trim(&mut self) {
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }
}
