//! Ordered collection of listener responses.

use std::collections::VecDeque;

use serde_json::Value;

use crate::error::{MessagingError, MessagingResult};

/// The responses collected during a dispatch pass, in listener order.
///
/// Only non-null responses end up here; a listener returning `None`
/// contributes nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseList {
    responses: VecDeque<Value>,
}

impl ResponseList {
    /// Creates an empty response list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a response.
    pub fn push(&mut self, response: Value) {
        self.responses.push_back(response);
    }

    /// Removes and returns the first response.
    pub fn shift(&mut self) -> MessagingResult<Value> {
        self.responses
            .pop_front()
            .ok_or(MessagingError::ResponseNotAvailable)
    }

    /// Removes and returns the last response.
    pub fn pop(&mut self) -> MessagingResult<Value> {
        self.responses
            .pop_back()
            .ok_or(MessagingError::ResponseNotAvailable)
    }

    /// Returns the first response without removing it.
    pub fn first(&self) -> Option<&Value> {
        self.responses.front()
    }

    /// Returns the last response without removing it.
    pub fn last(&self) -> Option<&Value> {
        self.responses.back()
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Iterates over the responses in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.responses.iter()
    }

    /// Consumes the list, returning the responses in insertion order.
    pub fn into_vec(self) -> Vec<Value> {
        self.responses.into()
    }
}

impl Extend<Value> for ResponseList {
    fn extend<T: IntoIterator<Item = Value>>(&mut self, iter: T) {
        self.responses.extend(iter);
    }
}

impl IntoIterator for ResponseList {
    type Item = Value;
    type IntoIter = std::collections::vec_deque::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.responses.into_iter()
    }
}
