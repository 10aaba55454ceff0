//! Per-message recursion depth tracking.

use std::collections::HashMap;

/// The recursion limit used when none is configured.
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 5;

/// Tracks how many dispatch passes of each message name are currently nested.
///
/// `increase_depth` and `decrease_depth` must bracket a dispatch pass; the
/// dispatcher does this through a guard so the pair stays balanced.
#[derive(Debug, Clone)]
pub struct RecursionDepthList {
    depths: HashMap<String, usize>,
    limit: usize,
}

impl Default for RecursionDepthList {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RECURSION_DEPTH)
    }
}

impl RecursionDepthList {
    pub fn new(limit: usize) -> Self {
        Self {
            depths: HashMap::new(),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Seeds the counter of `name` at 0, resetting it if already present.
    pub fn add_message(&mut self, name: &str) {
        self.depths.insert(name.to_string(), 0);
    }

    pub fn has_message(&self, name: &str) -> bool {
        self.depths.contains_key(name)
    }

    /// Returns the current depth, 0 for unknown names.
    pub fn depth(&self, name: &str) -> usize {
        self.depths.get(name).copied().unwrap_or(0)
    }

    pub fn is_depth_limit_reached(&self, name: &str) -> bool {
        self.depths
            .get(name)
            .is_some_and(|depth| *depth >= self.limit)
    }

    pub fn increase_depth(&mut self, name: &str) {
        *self.depths.entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn decrease_depth(&mut self, name: &str) {
        if let Some(depth) = self.depths.get_mut(name) {
            *depth = depth.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_message_has_zero_depth() {
        let list = RecursionDepthList::default();
        assert_eq!(list.limit(), DEFAULT_MAX_RECURSION_DEPTH);
        assert_eq!(list.depth("unknown"), 0);
        assert!(!list.has_message("unknown"));
        assert!(!list.is_depth_limit_reached("unknown"));
    }

    #[test]
    fn test_add_message_reseeds() {
        let mut list = RecursionDepthList::default();
        list.increase_depth("test");
        list.increase_depth("test");
        assert_eq!(list.depth("test"), 2);

        list.add_message("test");
        assert!(list.has_message("test"));
        assert_eq!(list.depth("test"), 0);
    }

    #[test]
    fn test_limit_reached() {
        let mut list = RecursionDepthList::new(2);
        list.increase_depth("test");
        assert!(!list.is_depth_limit_reached("test"));
        list.increase_depth("test");
        assert!(list.is_depth_limit_reached("test"));
        list.decrease_depth("test");
        assert!(!list.is_depth_limit_reached("test"));
    }

    #[test]
    fn test_zero_limit_only_applies_to_seen_messages() {
        let mut list = RecursionDepthList::new(0);
        assert!(!list.is_depth_limit_reached("test"));
        list.add_message("test");
        assert!(list.is_depth_limit_reached("test"));
    }

    #[test]
    fn test_decrease_saturates() {
        let mut list = RecursionDepthList::default();
        list.decrease_depth("unknown");
        assert!(!list.has_message("unknown"));

        list.add_message("test");
        list.decrease_depth("test");
        assert_eq!(list.depth("test"), 0);
    }
}
