//! Listeners and their registration bookkeeping.
//!
//! A [`Listener`] is bound to one message name and has a priority; higher
//! priorities run first. It may carry a condition that is evaluated before the
//! callback; when the condition fails the listener is skipped and produces no
//! response.
//!
//! # Example
//!
//! ```rust,ignore
//! use brickoo_messaging::{Message, MessageDispatcher, MessageListener};
//! use serde_json::json;
//!
//! let dispatcher = MessageDispatcher::new();
//!
//! dispatcher.attach(
//!     MessageListener::new("user.login", |message, _dispatcher| {
//!         Ok(Some(json!(format!("welcome {}", message.param("user").unwrap()))))
//!     })
//!     .priority(10)
//!     .condition(|message, _| message.has_param("user")),
//! );
//! ```

mod collection;
mod queue;

pub use collection::ListenerCollection;
pub use queue::ListenerPriorityQueue;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use crate::dispatcher::MessageDispatcher;
use crate::error::{BoxError, MessagingResult};
use crate::message::Message;

/// What a listener callback returns; `Ok(None)` is the null response.
pub type ListenerResult = Result<Option<Value>, BoxError>;

/// A type-erased listener callback.
pub type CallbackFn = Arc<dyn Fn(&Message, &MessageDispatcher) -> ListenerResult + Send + Sync>;

/// A type-erased listener condition.
pub type ConditionFn = Arc<dyn Fn(&Message, &MessageDispatcher) -> bool + Send + Sync>;

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier handed out when a listener is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub(crate) fn next() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// A listener bound to a single message name.
pub trait Listener: Send + Sync {
    /// The message name this listener is registered for.
    fn message_name(&self) -> &str;

    /// Execution priority; higher values run earlier.
    fn priority(&self) -> i32 {
        0
    }

    /// Decides whether [`handle_message`](Listener::handle_message) runs for this message.
    fn condition(&self, _message: &Message, _dispatcher: &MessageDispatcher) -> bool {
        true
    }

    /// Handles the message and optionally produces a response.
    fn handle_message(&self, message: &Message, dispatcher: &MessageDispatcher) -> ListenerResult;
}

/// A bundle of listeners that registers itself with a dispatcher.
pub trait ListenerAggregate {
    fn attach_listeners(&self, dispatcher: &MessageDispatcher) -> MessagingResult<()>;
}

/// A closure backed [`Listener`].
#[derive(Clone)]
pub struct MessageListener {
    message_name: String,
    priority: i32,
    callback: CallbackFn,
    condition: Option<ConditionFn>,
}

impl MessageListener {
    /// Creates a listener with priority `0` and no condition.
    pub fn new<F>(message_name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&Message, &MessageDispatcher) -> ListenerResult + Send + Sync + 'static,
    {
        Self {
            message_name: message_name.into(),
            priority: 0,
            callback: Arc::new(callback),
            condition: None,
        }
    }

    /// Sets the priority.
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets a condition that must hold before the callback is invoked.
    pub fn condition<F>(mut self, condition: F) -> Self
    where
        F: Fn(&Message, &MessageDispatcher) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(condition));
        self
    }

    pub fn has_condition(&self) -> bool {
        self.condition.is_some()
    }
}

impl Listener for MessageListener {
    fn message_name(&self) -> &str {
        &self.message_name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn condition(&self, message: &Message, dispatcher: &MessageDispatcher) -> bool {
        match &self.condition {
            Some(condition) => condition(message, dispatcher),
            None => true,
        }
    }

    fn handle_message(&self, message: &Message, dispatcher: &MessageDispatcher) -> ListenerResult {
        (self.callback)(message, dispatcher)
    }
}

impl std::fmt::Debug for MessageListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageListener")
            .field("message_name", &self.message_name)
            .field("priority", &self.priority)
            .field("has_condition", &self.condition.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_listener_ids_are_unique() {
        let a = ListenerId::next();
        let b = ListenerId::next();
        assert_ne!(a, b);
        assert!(a.to_string().starts_with("listener-"));
    }

    #[test]
    fn test_message_listener_defaults() {
        let listener = MessageListener::new("test", |_, _| Ok(None));
        assert_eq!(listener.message_name(), "test");
        assert_eq!(Listener::priority(&listener), 0);
        assert!(!listener.has_condition());
    }

    #[test]
    fn test_message_listener_condition_and_callback() {
        let dispatcher = MessageDispatcher::new();
        let listener = MessageListener::new("test", |message, _| {
            Ok(message.param("value").cloned())
        })
        .priority(5)
        .condition(|message, _| message.has_param("value"));

        let with_value = Message::new("test").with_param("value", 3);
        let without_value = Message::new("test");

        assert_eq!(Listener::priority(&listener), 5);
        assert!(Listener::condition(&listener, &with_value, &dispatcher));
        assert!(!Listener::condition(&listener, &without_value, &dispatcher));
        assert_eq!(
            listener.handle_message(&with_value, &dispatcher).unwrap(),
            Some(json!(3))
        );
    }
}
