//! # Brickoo Messaging
//!
//! Priority ordered message dispatching for the Brickoo framework.
//!
//! This crate provides:
//! - [`Message`] - a named occurrence with sender, parameters and a stop flag
//! - [`Listener`] / [`MessageListener`] - handlers bound to a message name,
//!   optionally gated by a condition
//! - [`ListenerCollection`] and [`ListenerPriorityQueue`] - registration
//!   bookkeeping, highest priority first, ties in registration order
//! - [`RecursionDepthList`] - protection against unbounded re-entrant dispatch
//! - [`MessageDispatcher`] - `dispatch`, `collect`, `ask` and `notify`
//!
//! ```text
//! ┌──────────┐     ┌───────────────────┐     ┌──────────────────┐
//! │ Producer │────▶│ MessageDispatcher │────▶│ Listener (p=20)  │
//! └──────────┘     │  RecursionDepth   │────▶│ Listener (p=10)  │
//!                  └───────────────────┘────▶│ Listener (p=0)   │
//!                                            └──────────────────┘
//! ```

pub mod dispatcher;
pub mod error;
pub mod listener;
pub mod message;
pub mod processor;
pub mod recursion;
pub mod response;

pub use dispatcher::{MessageDispatcher, MessageDispatcherBuilder};
pub use error::{BoxError, MessagingError, MessagingResult};
pub use listener::{
    CallbackFn, ConditionFn, Listener, ListenerAggregate, ListenerCollection, ListenerId,
    ListenerPriorityQueue, ListenerResult, MessageListener,
};
pub use message::{Message, Sender};
pub use processor::{ListenerProcessor, MessageProcessor};
pub use recursion::{DEFAULT_MAX_RECURSION_DEPTH, RecursionDepthList};
pub use response::ResponseList;
