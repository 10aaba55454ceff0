//! Priority ordering of listener identifiers.

use super::ListenerId;

#[derive(Debug, Clone, Copy)]
struct Entry {
    id: ListenerId,
    priority: i32,
}

/// Orders listener ids by descending priority.
///
/// Ids sharing a priority keep their insertion order: a new id is placed
/// behind every id of equal or higher priority.
#[derive(Debug, Clone, Default)]
pub struct ListenerPriorityQueue {
    entries: Vec<Entry>,
}

impl ListenerPriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `id` with `priority`.
    ///
    /// Returns `false` without touching the queue if `id` is already queued.
    pub fn insert(&mut self, id: ListenerId, priority: i32) -> bool {
        if self.contains(id) {
            return false;
        }

        let position = self.entries.partition_point(|e| e.priority >= priority);
        self.entries.insert(position, Entry { id, priority });
        true
    }

    /// Removes `id`, returning its priority, or `None` if it was not queued.
    pub fn remove(&mut self, id: ListenerId) -> Option<i32> {
        let position = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(position).priority)
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Iterates from the highest to the lowest priority.
    pub fn iter(&self) -> impl Iterator<Item = ListenerId> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    fn is_sorted(&self) -> bool {
        self.entries
            .windows(2)
            .all(|pair| pair[0].priority >= pair[1].priority)
    }
}
