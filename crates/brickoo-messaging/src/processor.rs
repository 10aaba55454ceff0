//! Invocation of a single listener.

use tracing::trace;

use crate::dispatcher::MessageDispatcher;
use crate::listener::{Listener, ListenerResult};
use crate::message::Message;

/// Runs one listener against a message.
pub trait MessageProcessor: Send + Sync {
    fn handle(
        &self,
        dispatcher: &MessageDispatcher,
        message: &Message,
        listener: &dyn Listener,
    ) -> ListenerResult;
}

/// The default processor: checks the listener condition, then calls it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListenerProcessor;

impl MessageProcessor for ListenerProcessor {
    fn handle(
        &self,
        dispatcher: &MessageDispatcher,
        message: &Message,
        listener: &dyn Listener,
    ) -> ListenerResult {
        if !listener.condition(message, dispatcher) {
            trace!(
                message = message.name(),
                priority = listener.priority(),
                "Listener condition failed, skipping"
            );
            return Ok(None);
        }

        listener.handle_message(message, dispatcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::MessageListener;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_failed_condition_skips_callback() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        let listener = MessageListener::new("test", move |_, _| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            Ok(Some(json!("called")))
        })
        .condition(|_, _| false);

        let dispatcher = MessageDispatcher::new();
        let response = ListenerProcessor
            .handle(&dispatcher, &Message::new("test"), &listener)
            .unwrap();

        assert_eq!(response, None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_passing_condition_returns_callback_response() {
        let listener =
            MessageListener::new("test", |_, _| Ok(Some(json!("called")))).condition(|_, _| true);

        let dispatcher = MessageDispatcher::new();
        let response = ListenerProcessor
            .handle(&dispatcher, &Message::new("test"), &listener)
            .unwrap();

        assert_eq!(response, Some(json!("called")));
    }
}
