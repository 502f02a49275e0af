use thiserror::Error;

/// Default upper bound on how far a buffer may grow (in slots).
pub const DEFAULT_MAX_CAPACITY: usize = 1 << 20;

/// Smallest capacity a buffer is ever created with.
pub const MIN_CAPACITY: usize = 2;

/// What `push` does when every slot is occupied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Double the capacity and keep every element. Never loses data,
    /// memory is bounded only by `max_capacity`.
    #[default]
    Grow,
    /// Evict the oldest element to make room. Memory stays fixed.
    OverwriteOldest,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    #[error("attempted to pop from an empty ring buffer")]
    Empty,
    #[error("cannot grow ring buffer beyond its max size of {max} elements")]
    CapacityExceeded { max: usize },
}

/// Successful outcome of a `push`.
#[derive(Debug, PartialEq, Eq)]
pub enum Pushed<T> {
    /// A free slot was available.
    Stored,
    /// The buffer was full and has been reallocated.
    Grew { from: usize, to: usize },
    /// The buffer was full and the oldest element was evicted.
    Overwrote(T),
}

/// A push that could not be satisfied. The item is handed back untouched.
#[derive(Debug)]
pub struct Rejected<T> {
    pub item: T,
    pub error: BufferError,
}

impl<T> Rejected<T> {
    pub fn into_inner(self) -> T {
        self.item
    }
}

/// A FIFO circular buffer that doubles its storage instead of dropping data.
///
/// The buffer itself is not synchronized. Owners that share it between
/// threads wrap it in a lock; every structural field (read/write index,
/// the full flag and the storage length) changes only through `&mut self`.
pub struct RingBuffer<T> {
    /// One slot per capacity unit. `None` marks a free slot.
    slots: Vec<Option<T>>,

    /// Index of the oldest element (next to be popped).
    read: usize,

    /// Index of the next insertion point.
    write: usize,

    /// Disambiguates `read == write`: either empty or completely full.
    full: bool,

    max_capacity: usize,
    policy: OverflowPolicy,
}

impl<T> RingBuffer<T> {
    /// Creates a growable buffer with the default limit.
    /// Capacities below 2 are raised to 2.
    pub fn new(capacity: usize) -> Self {
        Self::with_limits(capacity, DEFAULT_MAX_CAPACITY, OverflowPolicy::Grow)
    }

    /// Creates a buffer with an explicit growth limit and overflow policy.
    ///
    /// `max_capacity` is raised to `capacity` if it is smaller, so a fresh
    /// buffer always satisfies its own limit.
    pub fn with_limits(capacity: usize, max_capacity: usize, policy: OverflowPolicy) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        Self {
            slots: empty_slots(capacity),
            read: 0,
            write: 0,
            full: false,
            max_capacity: max_capacity.max(capacity),
            policy,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        if self.full {
            return self.capacity();
        }
        (self.write + self.capacity() - self.read) % self.capacity()
    }

    pub fn is_empty(&self) -> bool {
        !self.full && self.read == self.write
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Appends `item` at the tail.
    ///
    /// On a full buffer the configured policy decides: `Grow` doubles the
    /// storage (failing with `CapacityExceeded` past `max_capacity`),
    /// `OverwriteOldest` evicts the head.
    pub fn push(&mut self, item: T) -> Result<Pushed<T>, Rejected<T>> {
        let mut outcome = Pushed::Stored;

        if self.full {
            match self.policy {
                OverflowPolicy::Grow => {
                    let from = self.capacity();
                    let to = match self.grow() {
                        Ok(to) => to,
                        Err(error) => return Err(Rejected { item, error }),
                    };
                    outcome = Pushed::Grew { from, to };
                }
                OverflowPolicy::OverwriteOldest => {
                    // Full means read == write, so the head slot is the one
                    // about to be written.
                    if let Some(old) = self.slots[self.read].take() {
                        outcome = Pushed::Overwrote(old);
                    }
                    self.read = self.advance(self.read);
                }
            }
        }

        self.slots[self.write] = Some(item);
        self.write = self.advance(self.write);
        self.full = self.read == self.write;
        Ok(outcome)
    }

    /// Removes and returns the oldest element.
    pub fn pop(&mut self) -> Result<T, BufferError> {
        if self.is_empty() {
            return Err(BufferError::Empty);
        }
        let item = self.slots[self.read].take().ok_or(BufferError::Empty)?;
        self.read = self.advance(self.read);
        self.full = false;
        Ok(item)
    }

    /// Peeks at the oldest element without removing it.
    pub fn front(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.slots[self.read].as_ref()
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let cap = self.capacity();
        (0..self.len()).filter_map(move |i| self.slots[(self.read + i) % cap].as_ref())
    }

    #[inline]
    fn advance(&self, idx: usize) -> usize {
        (idx + 1) % self.capacity()
    }

    /// Doubles the storage and relocates the elements so the oldest one
    /// lands at index 0. Returns the new capacity.
    fn grow(&mut self) -> Result<usize, BufferError> {
        let len = self.len();
        let new_cap = self
            .capacity()
            .checked_mul(2)
            .filter(|cap| *cap <= self.max_capacity)
            .ok_or(BufferError::CapacityExceeded {
                max: self.max_capacity,
            })?;

        let mut relocated = empty_slots(new_cap);
        let old_cap = self.capacity();
        for (i, slot) in relocated.iter_mut().take(len).enumerate() {
            *slot = self.slots[(self.read + i) % old_cap].take();
        }

        self.slots = relocated;
        self.read = 0;
        self.write = len;
        self.full = false;
        Ok(new_cap)
    }
}

fn empty_slots<T>(n: usize) -> Vec<Option<T>> {
    let mut slots = Vec::with_capacity(n);
    slots.resize_with(n, || None);
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn contents<T: Clone>(rb: &RingBuffer<T>) -> Vec<T> {
        rb.iter().cloned().collect()
    }

    #[test]
    fn test_fresh_buffer_is_empty() {
        let rb: RingBuffer<u32> = RingBuffer::new(8);
        assert!(rb.is_empty());
        assert!(!rb.is_full());
        assert_eq!(rb.len(), 0);
        assert_eq!(rb.capacity(), 8);
        assert!(rb.front().is_none());
    }

    #[test]
    fn test_capacity_is_at_least_two() {
        let rb: RingBuffer<u32> = RingBuffer::new(0);
        assert_eq!(rb.capacity(), 2);
        let rb: RingBuffer<u32> = RingBuffer::new(1);
        assert_eq!(rb.capacity(), 2);
    }

    #[test]
    fn test_grow_scenario_from_two() {
        let mut rb = RingBuffer::new(2);

        assert_eq!(rb.push('A').unwrap(), Pushed::Stored);
        assert_eq!(rb.push('B').unwrap(), Pushed::Stored);
        assert_eq!(rb.len(), 2);
        assert!(rb.is_full());

        assert_eq!(rb.push('C').unwrap(), Pushed::Grew { from: 2, to: 4 });
        assert_eq!(rb.capacity(), 4);
        assert_eq!(rb.len(), 3);
        assert_eq!(contents(&rb), vec!['A', 'B', 'C']);

        assert_eq!(rb.pop(), Ok('A'));
        assert_eq!(rb.len(), 2);
        assert_eq!(contents(&rb), vec!['B', 'C']);
    }

    #[test]
    fn test_grow_preserves_order_when_wrapped() {
        let mut rb = RingBuffer::new(4);
        for i in 0..4 {
            rb.push(i).unwrap();
        }
        // Move the read index off zero so the live region wraps.
        assert_eq!(rb.pop(), Ok(0));
        assert_eq!(rb.pop(), Ok(1));
        rb.push(4).unwrap();
        rb.push(5).unwrap();
        assert!(rb.is_full());

        assert_eq!(rb.push(6).unwrap(), Pushed::Grew { from: 4, to: 8 });
        assert_eq!(contents(&rb), vec![2, 3, 4, 5, 6]);
        assert_eq!(rb.front(), Some(&2));

        let drained: Vec<_> = std::iter::from_fn(|| rb.pop().ok()).collect();
        assert_eq!(drained, vec![2, 3, 4, 5, 6]);
        assert!(rb.is_empty());
    }

    #[test]
    fn test_pop_empty_is_error_and_noop() {
        let mut rb: RingBuffer<u8> = RingBuffer::new(2);
        assert_eq!(rb.pop(), Err(BufferError::Empty));
        assert!(rb.is_empty());

        rb.push(1).unwrap();
        assert_eq!(rb.pop(), Ok(1));
        assert_eq!(rb.pop(), Err(BufferError::Empty));
        assert_eq!(rb.len(), 0);
    }

    #[test]
    fn test_capacity_exceeded_returns_item() {
        let mut rb = RingBuffer::with_limits(2, 4, OverflowPolicy::Grow);
        for i in 0..4 {
            rb.push(i).unwrap();
        }
        assert_eq!(rb.capacity(), 4);

        let rejected = rb.push(99).unwrap_err();
        assert_eq!(rejected.error, BufferError::CapacityExceeded { max: 4 });
        assert_eq!(rejected.into_inner(), 99);

        // Nothing already stored was touched.
        assert_eq!(contents(&rb), vec![0, 1, 2, 3]);
        assert!(rb.is_full());
    }

    #[test]
    fn test_max_capacity_is_raised_to_capacity() {
        let rb: RingBuffer<u8> = RingBuffer::with_limits(16, 4, OverflowPolicy::Grow);
        assert_eq!(rb.capacity(), 16);
        assert_eq!(rb.max_capacity(), 16);
    }

    #[test]
    fn test_overwrite_oldest_policy() {
        let mut rb = RingBuffer::with_limits(3, 3, OverflowPolicy::OverwriteOldest);
        rb.push("a").unwrap();
        rb.push("b").unwrap();
        rb.push("c").unwrap();

        assert_eq!(rb.push("d").unwrap(), Pushed::Overwrote("a"));
        assert_eq!(rb.capacity(), 3);
        assert_eq!(rb.len(), 3);
        assert_eq!(contents(&rb), vec!["b", "c", "d"]);
        assert_eq!(rb.pop(), Ok("b"));
    }

    #[test]
    fn test_size_wraps_modulo_capacity() {
        let mut rb = RingBuffer::new(4);
        for round in 0..10 {
            rb.push(round).unwrap();
            rb.push(round + 100).unwrap();
            assert_eq!(rb.len(), 2);
            assert_eq!(rb.pop(), Ok(round));
            assert_eq!(rb.pop(), Ok(round + 100));
            assert!(rb.is_empty());
        }
        assert_eq!(rb.capacity(), 4);
    }

    #[test]
    fn test_drop_cleanup() {
        static DROP_COUNT: AtomicUsize = AtomicUsize::new(0);
        #[derive(Debug)]
        struct Dropper;
        impl Drop for Dropper {
            fn drop(&mut self) {
                DROP_COUNT.fetch_add(1, Ordering::SeqCst);
            }
        }

        DROP_COUNT.store(0, Ordering::SeqCst);
        {
            let mut rb = RingBuffer::new(2);
            rb.push(Dropper).unwrap();
            rb.push(Dropper).unwrap();
            // Growth moves elements, it must not drop them.
            rb.push(Dropper).unwrap();
            assert_eq!(DROP_COUNT.load(Ordering::SeqCst), 0);

            {
                let _d = rb.pop().unwrap();
            }
            assert_eq!(DROP_COUNT.load(Ordering::SeqCst), 1);
        }
        assert_eq!(DROP_COUNT.load(Ordering::SeqCst), 3);
    }

    proptest! {
        /// Pushing `capacity + k` items with no pops keeps all of them in
        /// submission order and at least doubles the storage.
        #[test]
        fn prop_growth_never_loses(cap in 2usize..64, extra in 1usize..200) {
            let mut rb = RingBuffer::new(cap);
            let n = cap + extra;
            for i in 0..n {
                prop_assert!(rb.push(i).is_ok());
            }
            prop_assert_eq!(rb.len(), n);
            prop_assert!(rb.capacity() >= 2 * cap);
            prop_assert_eq!(contents(&rb), (0..n).collect::<Vec<_>>());
        }

        /// Any interleaving of pushes and pops drains in FIFO order.
        #[test]
        fn prop_fifo_under_interleaving(ops in proptest::collection::vec(any::<bool>(), 0..400)) {
            let mut rb = RingBuffer::new(2);
            let mut next_in = 0u32;
            let mut next_out = 0u32;
            for push in ops {
                if push {
                    prop_assert!(rb.push(next_in).is_ok());
                    next_in += 1;
                } else if let Ok(v) = rb.pop() {
                    prop_assert_eq!(v, next_out);
                    next_out += 1;
                }
                prop_assert_eq!(rb.len() as u32, next_in - next_out);
            }
        }
    }
}
