//! The message passed through a dispatch cycle.
//!
//! A [`Message`] is created by the producer, handed to the
//! [`MessageDispatcher`](crate::MessageDispatcher) and shared by reference with
//! every listener of that pass. Listeners may:
//!
//! - read the name, sender and parameters,
//! - inspect responses produced by earlier listeners,
//! - call [`stop`](Message::stop) to keep lower priority listeners from running.

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde_json::Value;

use crate::response::ResponseList;

/// An opaque reference to whoever produced a message.
pub type Sender = Arc<dyn Any + Send + Sync>;

/// A named occurrence dispatched to the listeners registered for its name.
pub struct Message {
    name: String,
    sender: Option<Sender>,
    params: IndexMap<String, Value>,
    /// Set by any listener calling [`Message::stop`].
    stopped: AtomicBool,
    responses: Mutex<ResponseList>,
}

impl Message {
    /// Creates a message without sender or parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sender: None,
            params: IndexMap::new(),
            stopped: AtomicBool::new(false),
            responses: Mutex::new(ResponseList::new()),
        }
    }

    /// Attaches the producer of this message.
    pub fn with_sender(mut self, sender: Sender) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Adds a parameter, replacing any previous value under the same key.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Replaces all parameters.
    pub fn with_params(mut self, params: IndexMap<String, Value>) -> Self {
        self.params = params;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sender(&self) -> Option<&Sender> {
        self.sender.as_ref()
    }

    /// Returns the sender downcast to a concrete type.
    pub fn sender_as<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.sender.as_ref().and_then(|s| s.downcast_ref::<T>())
    }

    pub fn params(&self) -> &IndexMap<String, Value> {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    pub fn has_param(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Stops propagation to the remaining listeners of the current pass.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Returns a snapshot of every response recorded on this message.
    pub fn responses(&self) -> ResponseList {
        self.responses.lock().clone()
    }

    pub(crate) fn record_response(&self, response: Value) {
        self.responses.lock().push(response);
    }
}

impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Message")
            .field("name", &self.name)
            .field("has_sender", &self.sender.is_some())
            .field("params", &self.params)
            .field("is_stopped", &self.is_stopped())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Controller {
        id: u32,
    }

    #[test]
    fn test_message_params() {
        let message = Message::new("user.created")
            .with_param("id", 42)
            .with_param("name", "brickoo");

        assert_eq!(message.name(), "user.created");
        assert_eq!(message.param("id"), Some(&json!(42)));
        assert!(message.has_param("name"));
        assert!(!message.has_param("missing"));
        assert_eq!(
            message.params().keys().collect::<Vec<_>>(),
            vec!["id", "name"]
        );
    }

    #[test]
    fn test_sender_downcast() {
        let message = Message::new("test").with_sender(Arc::new(Controller { id: 7 }));

        assert_eq!(message.sender_as::<Controller>().map(|c| c.id), Some(7));
        assert!(message.sender_as::<String>().is_none());
        assert!(Message::new("test").sender().is_none());
    }

    #[test]
    fn test_stop_is_sticky() {
        let message = Message::new("test");
        assert!(!message.is_stopped());
        message.stop();
        assert!(message.is_stopped());
    }
}
