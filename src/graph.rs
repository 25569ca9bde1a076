//! Dependency graph over a loaded store.
//!
//! Cycles are not detected. Members of a cycle simply never become ready.

use crate::types::{Item, Items};

/// Read-only view over both partitions of a store.
pub struct Graph<'a> {
    open: &'a Items,
    closed: &'a Items,
}

impl<'a> Graph<'a> {
    pub fn new(open: &'a Items, closed: &'a Items) -> Self {
        Self { open, closed }
    }

    /// True if `id` is known and closed.
    pub fn is_closed(&self, id: &str) -> bool {
        self.closed.get(id).is_some_and(|item| !item.is_open())
    }

    /// Dependencies of `item` that are not yet satisfied, in id order.
    ///
    /// Ids that exist nowhere count as unsatisfied.
    pub fn unsatisfied<'i>(&self, item: &'i Item) -> Vec<&'i str> {
        item.deps
            .iter()
            .map(String::as_str)
            .filter(|dep| !self.is_closed(dep))
            .collect()
    }

    /// Open items whose every dependency is closed, ascending by id.
    pub fn ready(&self) -> Vec<&'a Item> {
        self.open
            .values()
            .filter(|item| item.is_open())
            .filter(|item| item.deps.iter().all(|dep| self.is_closed(dep)))
            .collect()
    }

    /// Open items still waiting on at least one dependency, ascending by id.
    pub fn blocked(&self) -> Vec<&'a Item> {
        self.open
            .values()
            .filter(|item| item.is_open())
            .filter(|item| !item.deps.iter().all(|dep| self.is_closed(dep)))
            .collect()
    }
}
