//! Message dispatcher for the Brickoo framework.
//!
//! The [`MessageDispatcher`] owns the registered listeners and delivers
//! messages to them. Every dispatch variant runs the same pass:
//!
//! 1. Resolve the listeners registered for the message name; when there are
//!    none the pass ends immediately with an empty result
//! 2. Reject the pass if the recursion limit for that name is reached
//! 3. Invoke the listeners by descending priority through the
//!    [`MessageProcessor`], collecting responses according to the variant
//! 4. Stop early once a listener calls [`Message::stop`]
//!
//! ```rust,ignore
//! use brickoo_messaging::{Message, MessageDispatcher, MessageListener};
//! use serde_json::json;
//!
//! let dispatcher = MessageDispatcher::new();
//! dispatcher.attach(MessageListener::new("cache.lookup", |_, _| Ok(Some(json!("hit")))));
//!
//! let response = dispatcher.ask(&Message::new("cache.lookup"))?;
//! assert_eq!(response, Some(json!("hit")));
//! ```
//!
//! Listeners receive the dispatcher itself and may dispatch further messages,
//! attach or detach listeners from inside their callback.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use tracing::{Level, debug, span, trace, warn};

use crate::error::{MessagingError, MessagingResult};
use crate::listener::{Listener, ListenerAggregate, ListenerCollection, ListenerId};
use crate::message::Message;
use crate::processor::{ListenerProcessor, MessageProcessor};
use crate::recursion::{DEFAULT_MAX_RECURSION_DEPTH, RecursionDepthList};
use crate::response::ResponseList;

/// How responses of a pass are aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DispatchMode {
    /// Responses are ignored.
    Notify,
    /// Every non-null response is kept.
    Collect,
    /// The first non-null response is kept and ends the pass.
    Ask,
}

/// Delivers messages to listeners in priority order.
///
/// # Thread Safety
///
/// `MessageDispatcher` is `Send + Sync`. No lock is held while a listener
/// runs, so listeners may re-enter the dispatcher.
pub struct MessageDispatcher {
    listeners: RwLock<ListenerCollection>,
    recursion: Mutex<RecursionDepthList>,
    processor: Box<dyn MessageProcessor>,
}

impl Default for MessageDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageDispatcher {
    /// Creates a dispatcher with the default processor and recursion limit.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> MessageDispatcherBuilder {
        MessageDispatcherBuilder::new()
    }

    /// Registers a listener with its own priority.
    pub fn attach<L: Listener + 'static>(&self, listener: L) -> ListenerId {
        self.listeners.write().add(Arc::new(listener))
    }

    /// Registers a shared listener with its own priority.
    pub fn attach_shared(&self, listener: Arc<dyn Listener>) -> ListenerId {
        self.listeners.write().add(listener)
    }

    /// Registers a listener under an explicit priority.
    pub fn attach_with_priority<L: Listener + 'static>(
        &self,
        listener: L,
        priority: i32,
    ) -> ListenerId {
        self.listeners
            .write()
            .add_with_priority(Arc::new(listener), priority)
    }

    /// Lets a bundle of listeners register itself.
    pub fn attach_aggregated_listeners<A: ListenerAggregate + ?Sized>(
        &self,
        aggregate: &A,
    ) -> MessagingResult<()> {
        aggregate.attach_listeners(self)
    }

    /// Removes a listener by its identifier.
    pub fn detach(&self, id: ListenerId) -> MessagingResult<()> {
        self.listeners.write().remove(id).map(|_| ())
    }

    pub fn has_listeners(&self, message_name: &str) -> bool {
        self.listeners.read().has_listeners(message_name)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Returns the number of currently nested passes for `message_name`.
    pub fn recursion_depth(&self, message_name: &str) -> usize {
        self.recursion.lock().depth(message_name)
    }

    /// Dispatches a message and collects every non-null response.
    pub fn dispatch(&self, message: &Message) -> MessagingResult<ResponseList> {
        self.run(message, DispatchMode::Collect)
    }

    /// Same as [`dispatch`](Self::dispatch).
    pub fn collect(&self, message: &Message) -> MessagingResult<ResponseList> {
        self.run(message, DispatchMode::Collect)
    }

    /// Dispatches a message until the first listener answers.
    pub fn ask(&self, message: &Message) -> MessagingResult<Option<Value>> {
        let mut responses = self.run(message, DispatchMode::Ask)?;
        Ok(responses.shift().ok())
    }

    /// Dispatches a message, ignoring responses.
    pub fn notify(&self, message: &Message) -> MessagingResult<()> {
        self.run(message, DispatchMode::Notify).map(|_| ())
    }

    fn run(&self, message: &Message, mode: DispatchMode) -> MessagingResult<ResponseList> {
        let name = message.name();
        let mut responses = ResponseList::new();

        let listeners = {
            let collection = self.listeners.read();
            if !collection.has_listeners(name) {
                trace!(message = name, "No listeners registered, nothing to dispatch");
                return Ok(responses);
            }
            collection.get_listeners(name)?
        };

        let span = span!(Level::DEBUG, "dispatch", message = %name, mode = ?mode);
        let _enter = span.enter();

        let _depth = self.enter(name)?;

        for (index, listener) in listeners.iter().enumerate() {
            trace!(
                listener_index = index,
                priority = listener.priority(),
                "Processing listener"
            );

            let response = self
                .processor
                .handle(self, message, listener.as_ref())
                .map_err(MessagingError::from_listener)?;

            if let Some(value) = response {
                match mode {
                    DispatchMode::Notify => {}
                    DispatchMode::Collect => {
                        message.record_response(value.clone());
                        responses.push(value);
                    }
                    DispatchMode::Ask => {
                        message.record_response(value.clone());
                        responses.push(value);
                        debug!("Listener answered, stopping dispatch");
                        break;
                    }
                }
            }

            if message.is_stopped() {
                debug!(listener_index = index, "Message stopped, stopping dispatch");
                break;
            }
        }

        Ok(responses)
    }

    /// Increases the depth of `name`, failing once the limit is reached.
    fn enter<'a>(&'a self, name: &'a str) -> MessagingResult<DepthGuard<'a>> {
        let mut recursion = self.recursion.lock();
        if recursion.is_depth_limit_reached(name) {
            let depth = recursion.depth(name);
            warn!(message = name, depth, "Maximum recursion depth reached");
            return Err(MessagingError::MaxRecursionDepthReached {
                name: name.to_string(),
                depth,
            });
        }
        recursion.increase_depth(name);

        Ok(DepthGuard {
            recursion: &self.recursion,
            name,
        })
    }
}

impl std::fmt::Debug for MessageDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageDispatcher")
            .field("listener_count", &self.listener_count())
            .field("max_recursion_depth", &self.recursion.lock().limit())
            .finish_non_exhaustive()
    }
}

/// Decreases the recursion depth of a message when the pass ends, including
/// when a listener fails.
struct DepthGuard<'a> {
    recursion: &'a Mutex<RecursionDepthList>,
    name: &'a str,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.recursion.lock().decrease_depth(self.name);
    }
}

/// Builder for [`MessageDispatcher`].
pub struct MessageDispatcherBuilder {
    processor: Box<dyn MessageProcessor>,
    max_recursion_depth: usize,
}

impl Default for MessageDispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageDispatcherBuilder {
    pub fn new() -> Self {
        Self {
            processor: Box::new(ListenerProcessor),
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
        }
    }

    /// Replaces the processor used to invoke listeners.
    pub fn processor<P: MessageProcessor + 'static>(mut self, processor: P) -> Self {
        self.processor = Box::new(processor);
        self
    }

    /// Sets how many passes of the same message may be nested.
    pub fn max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = depth;
        self
    }

    pub fn build(self) -> MessageDispatcher {
        MessageDispatcher {
            listeners: RwLock::new(ListenerCollection::new()),
            recursion: Mutex::new(RecursionDepthList::new(self.max_recursion_depth)),
            processor: self.processor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::listener::{ListenerResult, MessageListener};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn answering(name: &str, priority: i32, answer: Value) -> MessageListener {
        MessageListener::new(name, move |_, _| Ok(Some(answer.clone()))).priority(priority)
    }

    #[test]
    fn test_no_listeners_returns_empty() {
        let dispatcher = MessageDispatcher::new();
        let responses = dispatcher.dispatch(&Message::new("nobody")).unwrap();

        assert!(responses.is_empty());
        assert_eq!(dispatcher.recursion_depth("nobody"), 0);
        assert!(!dispatcher.recursion.lock().has_message("nobody"));
    }

    #[test]
    fn test_collect_in_priority_order() {
        let dispatcher = MessageDispatcher::new();
        dispatcher.attach(answering("test", 10, json!("low")));
        dispatcher.attach(answering("test", 20, json!("high")));
        dispatcher.attach(MessageListener::new("test", |_, _| Ok(None)).priority(15));

        let message = Message::new("test");
        let responses = dispatcher.collect(&message).unwrap();

        assert_eq!(responses.into_vec(), vec![json!("high"), json!("low")]);
        assert_eq!(message.responses().len(), 2);
    }

    #[test]
    fn test_ask_returns_first_response() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);

        let dispatcher = MessageDispatcher::new();
        dispatcher.attach(MessageListener::new("test", |_, _| Ok(None)).priority(30));
        dispatcher.attach(answering("test", 20, json!("first")));
        dispatcher.attach(
            MessageListener::new("test", move |_, _| {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                Ok(Some(json!("second")))
            })
            .priority(10),
        );

        let response = dispatcher.ask(&Message::new("test")).unwrap();

        assert_eq!(response, Some(json!("first")));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_notify_runs_all_listeners() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = MessageDispatcher::new();

        for priority in 0..3 {
            let calls = Arc::clone(&calls);
            dispatcher.attach(
                MessageListener::new("test", move |_, _| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Some(json!(priority)))
                })
                .priority(priority),
            );
        }

        let message = Message::new("test");
        dispatcher.notify(&message).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(message.responses().is_empty());
    }

    #[test]
    fn test_stop_halts_lower_priorities() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);

        let dispatcher = MessageDispatcher::new();
        dispatcher.attach(
            MessageListener::new("test", |message, _| {
                message.stop();
                Ok(Some(json!("stopper")))
            })
            .priority(10),
        );
        dispatcher.attach(MessageListener::new("test", move |_, _| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }));

        let message = Message::new("test");
        let responses = dispatcher.dispatch(&message).unwrap();

        assert!(message.is_stopped());
        assert_eq!(responses.into_vec(), vec![json!("stopper")]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_condition_false_never_invokes_callback() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);

        let dispatcher = MessageDispatcher::new();
        dispatcher.attach(
            MessageListener::new("test", move |_, _| {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                Ok(Some(json!("should not appear")))
            })
            .condition(|message, _| message.has_param("allowed")),
        );

        let responses = dispatcher.dispatch(&Message::new("test")).unwrap();
        assert!(responses.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let responses = dispatcher
            .dispatch(&Message::new("test").with_param("allowed", true))
            .unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_self_referential_dispatch_hits_limit() {
        let dispatcher = MessageDispatcher::new();
        dispatcher.attach(MessageListener::new("loop", |message, dispatcher| {
            dispatcher.dispatch(message)?;
            Ok(None)
        }));

        let err = dispatcher.dispatch(&Message::new("loop")).unwrap_err();

        assert!(matches!(
            err,
            MessagingError::MaxRecursionDepthReached { ref name, depth: 5 } if name == "loop"
        ));
        assert_eq!(dispatcher.recursion_depth("loop"), 0);
    }

    #[test]
    fn test_custom_recursion_limit() {
        let passes = Arc::new(AtomicUsize::new(0));
        let passes_clone = Arc::clone(&passes);

        let dispatcher = MessageDispatcher::builder().max_recursion_depth(2).build();
        dispatcher.attach(MessageListener::new("loop", move |message, dispatcher| {
            passes_clone.fetch_add(1, Ordering::SeqCst);
            dispatcher.notify(message)?;
            Ok(None)
        }));

        let err = dispatcher.notify(&Message::new("loop")).unwrap_err();
        assert!(matches!(
            err,
            MessagingError::MaxRecursionDepthReached { depth: 2, .. }
        ));
        assert_eq!(passes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_listener_error_propagates_and_depth_recovers() {
        let dispatcher = MessageDispatcher::new();
        dispatcher.attach(MessageListener::new("fail", |_, dispatcher| {
            assert_eq!(dispatcher.recursion_depth("fail"), 1);
            Err::<Option<Value>, BoxError>("listener exploded".into())
        }));

        let err = dispatcher.dispatch(&Message::new("fail")).unwrap_err();

        assert!(matches!(err, MessagingError::Listener(_)));
        assert_eq!(dispatcher.recursion_depth("fail"), 0);
    }

    #[test]
    fn test_attach_and_detach() {
        let dispatcher = MessageDispatcher::new();
        let id = dispatcher.attach(answering("test", 0, json!(1)));

        assert!(dispatcher.has_listeners("test"));
        dispatcher.detach(id).unwrap();
        assert!(!dispatcher.has_listeners("test"));
        assert!(matches!(
            dispatcher.detach(id),
            Err(MessagingError::ListenerNotAvailable(_))
        ));
    }

    #[test]
    fn test_listener_may_attach_during_dispatch() {
        let dispatcher = MessageDispatcher::new();
        dispatcher.attach(MessageListener::new("setup", |_, dispatcher| {
            dispatcher.attach(answering("late", 0, json!("registered")));
            Ok(None)
        }));

        dispatcher.notify(&Message::new("setup")).unwrap();

        assert_eq!(
            dispatcher.ask(&Message::new("late")).unwrap(),
            Some(json!("registered"))
        );
    }

    struct Upper;

    impl MessageProcessor for Upper {
        fn handle(
            &self,
            dispatcher: &MessageDispatcher,
            message: &Message,
            listener: &dyn Listener,
        ) -> ListenerResult {
            let response = listener.handle_message(message, dispatcher)?;
            Ok(response.map(|v| json!(v.as_str().unwrap_or_default().to_uppercase())))
        }
    }

    #[test]
    fn test_custom_processor() {
        let dispatcher = MessageDispatcher::builder().processor(Upper).build();
        dispatcher.attach(answering("test", 0, json!("brickoo")));

        assert_eq!(
            dispatcher.ask(&Message::new("test")).unwrap(),
            Some(json!("BRICKOO"))
        );
    }
}
