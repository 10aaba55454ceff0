//! Error types for the messaging layer.

use thiserror::Error;

use crate::listener::ListenerId;

/// A boxed error returned by listener callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while registering listeners or dispatching messages.
#[derive(Error, Debug)]
pub enum MessagingError {
    /// No listener is registered under the given identifier.
    #[error("listener '{0}' is not available")]
    ListenerNotAvailable(ListenerId),

    /// No listener is registered for the given message name.
    #[error("no listeners available for message '{0}'")]
    ListenersNotAvailable(String),

    /// Dispatching the message would exceed the configured recursion limit.
    #[error("maximum recursion depth {depth} reached for message '{name}'")]
    MaxRecursionDepthReached {
        /// The message name.
        name: String,
        /// The depth at which the dispatch was rejected.
        depth: usize,
    },

    /// A response list was empty when a response was requested from it.
    #[error("response list is empty")]
    ResponseNotAvailable,

    /// A listener callback failed.
    #[error("listener failed: {0}")]
    Listener(#[source] BoxError),
}

impl MessagingError {
    /// Converts a listener error back into a messaging error.
    ///
    /// Errors raised by a nested dispatch are passed through un-wrapped so the
    /// caller still sees the original kind.
    pub fn from_listener(err: BoxError) -> Self {
        match err.downcast::<MessagingError>() {
            Ok(inner) => *inner,
            Err(other) => Self::Listener(other),
        }
    }
}

/// Result type for messaging operations.
pub type MessagingResult<T> = Result<T, MessagingError>;
