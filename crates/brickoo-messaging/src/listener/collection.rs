//! Registered listeners grouped by message name.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use super::{Listener, ListenerId, ListenerPriorityQueue};
use crate::error::{MessagingError, MessagingResult};

/// Owns the registered listeners and their per-name priority queues.
#[derive(Default)]
pub struct ListenerCollection {
    listeners: HashMap<ListenerId, Arc<dyn Listener>>,
    queues: HashMap<String, ListenerPriorityQueue>,
}

impl ListenerCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener using its own priority.
    pub fn add(&mut self, listener: Arc<dyn Listener>) -> ListenerId {
        let priority = listener.priority();
        self.add_with_priority(listener, priority)
    }

    /// Registers a listener under an explicit priority.
    pub fn add_with_priority(&mut self, listener: Arc<dyn Listener>, priority: i32) -> ListenerId {
        let id = ListenerId::next();
        let name = listener.message_name().to_string();

        self.queues
            .entry(name.clone())
            .or_default()
            .insert(id, priority);
        self.listeners.insert(id, listener);

        trace!(listener = %id, message = %name, priority, "Listener added");
        id
    }

    pub fn get(&self, id: ListenerId) -> MessagingResult<Arc<dyn Listener>> {
        self.listeners
            .get(&id)
            .cloned()
            .ok_or(MessagingError::ListenerNotAvailable(id))
    }

    pub fn has(&self, id: ListenerId) -> bool {
        self.listeners.contains_key(&id)
    }

    /// Removes a listener and scrubs it from its message queue.
    pub fn remove(&mut self, id: ListenerId) -> MessagingResult<Arc<dyn Listener>> {
        let listener = self
            .listeners
            .remove(&id)
            .ok_or(MessagingError::ListenerNotAvailable(id))?;

        let name = listener.message_name();
        if let Some(queue) = self.queues.get_mut(name) {
            queue.remove(id);
            if queue.is_empty() {
                self.queues.remove(name);
            }
        }

        trace!(listener = %id, message = %name, "Listener removed");
        Ok(listener)
    }

    /// Returns the listeners of `message_name` ordered by priority.
    pub fn get_listeners(&self, message_name: &str) -> MessagingResult<Vec<Arc<dyn Listener>>> {
        let queue = self
            .queues
            .get(message_name)
            .ok_or_else(|| MessagingError::ListenersNotAvailable(message_name.to_string()))?;

        Ok(queue
            .iter()
            .filter_map(|id| self.listeners.get(&id).cloned())
            .collect())
    }

    pub fn has_listeners(&self, message_name: &str) -> bool {
        self.queues
            .get(message_name)
            .is_some_and(|queue| !queue.is_empty())
    }

    /// Returns the total number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for ListenerCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerCollection")
            .field("listener_count", &self.listeners.len())
            .field("message_names", &self.queues.keys().collect::<Vec<_>>())
            .finish()
    }
}
