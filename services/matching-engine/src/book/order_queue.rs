//! Per-price-level FIFO order queue
//!
//! An intrusive doubly-linked list over an id→node arena. Every operation
//! is O(1): push links at the tail, remove unlinks from anywhere by fixing
//! neighbor pointers. `OrderId::NIL` is the "no node" sentinel for the
//! head/tail fields and the prev/next pointers; it is never a valid handle.

use std::collections::HashMap;
use types::errors::QueueError;
use types::ids::OrderId;

/// Intrusive prev/next pointers for one linked order
#[derive(Debug, Clone, Copy)]
struct QueueNode {
    prev: OrderId,
    next: OrderId,
}

/// FIFO queue of order identifiers at one price level
///
/// Invariant: `is_empty()` holds exactly when `first == last == NIL` and no
/// identifiers are linked.
#[derive(Debug, Clone)]
pub struct OrderQueue {
    nodes: HashMap<OrderId, QueueNode>,
    head: OrderId,
    tail: OrderId,
}

// Derived Default would seed head/tail with OrderId::default(), which is
// a fresh random id rather than the sentinel
impl Default for OrderQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderQueue {
    /// Create a new empty queue
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            head: OrderId::NIL,
            tail: OrderId::NIL,
        }
    }

    /// Append an identifier at the tail (preserves time priority)
    ///
    /// Fails with `ItemAlreadyExists` if the identifier is already linked
    /// or is the sentinel.
    pub fn push(&mut self, order_id: OrderId) -> Result<(), QueueError> {
        if order_id.is_nil() || self.nodes.contains_key(&order_id) {
            return Err(QueueError::ItemAlreadyExists { order_id });
        }

        let node = QueueNode {
            prev: self.tail,
            next: OrderId::NIL,
        };

        if self.tail.is_nil() {
            self.head = order_id;
        } else if let Some(tail_node) = self.nodes.get_mut(&self.tail) {
            tail_node.next = order_id;
        }
        self.tail = order_id;
        self.nodes.insert(order_id, node);
        Ok(())
    }

    /// Unlink an identifier from anywhere in the chain
    ///
    /// Fails with `EmptyQueue` if nothing is linked, `ItemDoesNotExist` if
    /// the identifier is not present. Removing the sole element resets
    /// head/tail to the sentinel.
    pub fn remove(&mut self, order_id: OrderId) -> Result<(), QueueError> {
        if self.nodes.is_empty() {
            return Err(QueueError::EmptyQueue);
        }
        let node = self
            .nodes
            .remove(&order_id)
            .ok_or(QueueError::ItemDoesNotExist { order_id })?;

        if node.prev.is_nil() {
            self.head = node.next;
        } else if let Some(prev_node) = self.nodes.get_mut(&node.prev) {
            prev_node.next = node.next;
        }

        if node.next.is_nil() {
            self.tail = node.prev;
        } else if let Some(next_node) = self.nodes.get_mut(&node.next) {
            next_node.prev = node.prev;
        }
        Ok(())
    }

    /// Check whether an identifier is linked
    pub fn contains(&self, order_id: OrderId) -> bool {
        self.nodes.contains_key(&order_id)
    }

    /// Check whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Head of the queue (earliest arrival), sentinel when empty
    pub fn first(&self) -> OrderId {
        self.head
    }

    /// Tail of the queue (latest arrival), sentinel when empty
    pub fn last(&self) -> OrderId {
        self.tail
    }

    /// Number of linked identifiers
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate identifiers in arrival order
    pub fn iter(&self) -> OrderQueueIter<'_> {
        OrderQueueIter {
            queue: self,
            current: self.head,
        }
    }
}

/// Arrival-order iterator over a queue's identifiers
pub struct OrderQueueIter<'a> {
    queue: &'a OrderQueue,
    current: OrderId,
}

impl Iterator for OrderQueueIter<'_> {
    type Item = OrderId;

    fn next(&mut self) -> Option<OrderId> {
        if self.current.is_nil() {
            return None;
        }
        let order_id = self.current;
        self.current = self
            .queue
            .nodes
            .get(&order_id)
            .map(|node| node.next)
            .unwrap_or(OrderId::NIL);
        Some(order_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_queue_identities() {
        let queue = OrderQueue::new();
        assert!(queue.is_empty());
        assert!(queue.first().is_nil());
        assert!(queue.last().is_nil());
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.iter().count(), 0);
    }

    #[test]
    fn test_default_queue_has_nil_sentinels() {
        // default() must match new(): head/tail at the sentinel, never a
        // generated id
        let queue = OrderQueue::default();
        assert!(queue.first().is_nil());
        assert!(queue.last().is_nil());
        assert!(queue.is_empty());

        let mut queue = OrderQueue::default();
        let a = OrderId::new();
        queue.push(a).unwrap();
        assert_eq!(queue.first(), a);
        assert_eq!(queue.last(), a);
        assert_eq!(queue.iter().collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn test_push_fifo_order() {
        let mut queue = OrderQueue::new();
        let a = OrderId::new();
        let b = OrderId::new();
        let c = OrderId::new();

        queue.push(a).unwrap();
        queue.push(b).unwrap();
        queue.push(c).unwrap();

        assert_eq!(queue.first(), a);
        assert_eq!(queue.last(), c);
        assert_eq!(queue.iter().collect::<Vec<_>>(), vec![a, b, c]);
    }

    #[test]
    fn test_push_duplicate_rejected() {
        let mut queue = OrderQueue::new();
        let a = OrderId::new();
        queue.push(a).unwrap();

        assert_eq!(
            queue.push(a),
            Err(QueueError::ItemAlreadyExists { order_id: a })
        );
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_push_sentinel_rejected() {
        let mut queue = OrderQueue::new();
        assert_eq!(
            queue.push(OrderId::NIL),
            Err(QueueError::ItemAlreadyExists {
                order_id: OrderId::NIL
            })
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_remove_head() {
        let mut queue = OrderQueue::new();
        let a = OrderId::new();
        let b = OrderId::new();
        queue.push(a).unwrap();
        queue.push(b).unwrap();

        queue.remove(a).unwrap();
        assert_eq!(queue.first(), b);
        assert_eq!(queue.last(), b);
        assert!(!queue.contains(a));
    }

    #[test]
    fn test_remove_middle_fixes_neighbors() {
        let mut queue = OrderQueue::new();
        let a = OrderId::new();
        let b = OrderId::new();
        let c = OrderId::new();
        queue.push(a).unwrap();
        queue.push(b).unwrap();
        queue.push(c).unwrap();

        queue.remove(b).unwrap();
        assert_eq!(queue.iter().collect::<Vec<_>>(), vec![a, c]);

        queue.remove(c).unwrap();
        assert_eq!(queue.iter().collect::<Vec<_>>(), vec![a]);
        assert_eq!(queue.last(), a);
    }

    #[test]
    fn test_remove_sole_element_resets_sentinels() {
        let mut queue = OrderQueue::new();
        let a = OrderId::new();
        queue.push(a).unwrap();
        queue.remove(a).unwrap();

        assert!(queue.is_empty());
        assert!(queue.first().is_nil());
        assert!(queue.last().is_nil());
    }

    #[test]
    fn test_remove_from_empty() {
        let mut queue = OrderQueue::new();
        assert_eq!(queue.remove(OrderId::new()), Err(QueueError::EmptyQueue));
    }

    #[test]
    fn test_remove_missing() {
        let mut queue = OrderQueue::new();
        queue.push(OrderId::new()).unwrap();
        let missing = OrderId::new();
        assert_eq!(
            queue.remove(missing),
            Err(QueueError::ItemDoesNotExist { order_id: missing })
        );
    }

    #[test]
    fn test_reuse_after_drain() {
        let mut queue = OrderQueue::new();
        let a = OrderId::new();
        let b = OrderId::new();
        queue.push(a).unwrap();
        queue.remove(a).unwrap();

        queue.push(b).unwrap();
        assert_eq!(queue.first(), b);
        assert_eq!(queue.len(), 1);
    }
}
