//! Request/response correlation for view models.
//!
//! Each fetch a view issues gets a [`Ticket`] carrying a generation number
//! and the key that defined the request (search term, entry ID, chapter ID).
//! When a response arrives, the view applies it only if its ticket is still
//! the latest one; anything older is dropped on arrival.

/// Tag attached to one in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    generation: u64,
    key: K,
}

impl<K> Ticket<K> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn key(&self) -> &K {
        &self.key
    }
}

/// Issues tickets and decides which responses are stale.
#[derive(Debug)]
pub struct RequestTracker<K> {
    generation: u64,
    current: Option<K>,
}

impl<K: Clone + PartialEq> RequestTracker<K> {
    pub fn new() -> Self {
        Self {
            generation: 0,
            current: None,
        }
    }

    /// Start a new request, superseding every earlier ticket.
    pub fn issue(&mut self, key: K) -> Ticket<K> {
        self.generation += 1;
        self.current = Some(key.clone());
        Ticket {
            generation: self.generation,
            key,
        }
    }

    /// Whether `ticket` belongs to the latest request.
    pub fn is_current(&self, ticket: &Ticket<K>) -> bool {
        ticket.generation == self.generation && self.current.as_ref() == Some(&ticket.key)
    }

    /// Key of the latest request, if any was issued.
    pub fn current_key(&self) -> Option<&K> {
        self.current.as_ref()
    }
}

impl<K: Clone + PartialEq> Default for RequestTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_ticket_is_current() {
        let mut tracker = RequestTracker::new();
        let a = tracker.issue("a".to_string());
        assert!(tracker.is_current(&a));
        assert_eq!(tracker.current_key().map(String::as_str), Some("a"));
    }

    #[test]
    fn newer_ticket_supersedes_older() {
        let mut tracker = RequestTracker::new();
        let a = tracker.issue("a".to_string());
        let b = tracker.issue("b".to_string());
        assert!(!tracker.is_current(&a));
        assert!(tracker.is_current(&b));
    }

    #[test]
    fn reissuing_same_key_still_supersedes() {
        let mut tracker = RequestTracker::new();
        let first = tracker.issue("x".to_string());
        let second = tracker.issue("x".to_string());
        assert!(!tracker.is_current(&first));
        assert!(tracker.is_current(&second));
        assert_eq!(second.generation(), first.generation() + 1);
    }

    #[test]
    fn fresh_tracker_has_no_key() {
        let tracker: RequestTracker<String> = RequestTracker::default();
        assert!(tracker.current_key().is_none());
    }
}
