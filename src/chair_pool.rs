//! The bounded pool of chairs players race for.

use std::sync::atomic::{AtomicUsize, Ordering};

/// A lock-free counter of free chairs.
///
/// The coordinator sizes the pool between rounds with [`configure`](ChairPool::configure); during
/// a round, player threads only ever take from it. A take is a single compare-and-swap, so there
/// is no window between checking that a chair is free and claiming it: exactly `capacity` callers
/// succeed per configuration, no matter how many race.
#[derive(Debug, Default)]
pub struct ChairPool {
    capacity: AtomicUsize,
    available: AtomicUsize,
}

impl ChairPool {
    /// An empty pool. Nothing can be taken until it is configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts `capacity` free chairs in the pool, discarding whatever was left from the previous
    /// round. Must not be called while players may be taking chairs.
    pub fn configure(&self, capacity: usize) {
        self.capacity.store(capacity, Ordering::Relaxed);
        // Release pairs with the Acquire of `try_take_seat`: a taker that sees the new count also
        // sees the new capacity.
        self.available.store(capacity, Ordering::Release);
    }

    /// Takes a chair if one is free and returns its 1-based number. Never blocks.
    ///
    /// Chair numbers are handed out in order (`1`, `2`, ...), so the number doubles as the
    /// arrival rank of the player.
    pub fn try_take_seat(&self) -> Option<usize> {
        let capacity = self.capacity.load(Ordering::Acquire);
        self.available
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |free| free.checked_sub(1))
            .ok()
            .map(|free_before| capacity - free_before + 1)
    }

    /// True iff a chair was free at the moment of the take, in which case it is now taken.
    pub fn try_acquire(&self) -> bool {
        self.try_take_seat().is_some()
    }

    /// Chairs still free.
    pub fn available(&self) -> usize {
        self.available.load(Ordering::Acquire)
    }

    /// Chairs put in the pool by the last [`configure`](ChairPool::configure).
    pub fn capacity(&self) -> usize {
        self.capacity.load(Ordering::Acquire)
    }

    /// Chairs taken since the last [`configure`](ChairPool::configure).
    pub fn granted(&self) -> usize {
        self.capacity().saturating_sub(self.available())
    }
}

#[cfg(test)]
mod chair_pool_tests {
    use std::collections::HashSet;
    use std::sync::Barrier;
    use std::thread;

    use super::*;

    #[test]
    fn test_unconfigured_pool_is_empty() {
        let pool = ChairPool::new();
        assert!(!pool.try_acquire());
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn test_take_until_empty() {
        let pool = ChairPool::new();
        pool.configure(3);
        assert_eq!(pool.try_take_seat(), Some(1));
        assert_eq!(pool.try_take_seat(), Some(2));
        assert_eq!(pool.try_take_seat(), Some(3));
        assert_eq!(pool.try_take_seat(), None);
        // a failed take leaves the count alone
        assert_eq!(pool.available(), 0);
        assert_eq!(pool.granted(), 3);
    }

    #[test]
    fn test_configure_resets_leftovers() {
        let pool = ChairPool::new();
        pool.configure(4);
        assert!(pool.try_acquire());
        pool.configure(2);
        assert_eq!(pool.capacity(), 2);
        assert_eq!(pool.available(), 2);
        assert_eq!(pool.granted(), 0);
    }

    #[test]
    fn test_configure_twice_same_as_once() {
        let once = ChairPool::new();
        once.configure(2);
        let twice = ChairPool::new();
        twice.configure(2);
        twice.configure(2);

        let drain = |pool: &ChairPool| (0..4).map(|_| pool.try_take_seat()).collect::<Vec<_>>();
        assert_eq!(drain(&once), drain(&twice));
    }

    #[test]
    fn test_zero_capacity() {
        let pool = ChairPool::new();
        pool.configure(0);
        assert!(!pool.try_acquire());
        assert_eq!(pool.granted(), 0);
    }

    #[test]
    fn test_concurrent_takers_never_overdraw() {
        const CHAIRS: usize = 7;
        const CONTENDERS: usize = 16;
        let pool = ChairPool::new();

        for _ in 0..50 {
            pool.configure(CHAIRS);
            let start = Barrier::new(CONTENDERS);
            let seats: Vec<Option<usize>> = thread::scope(|s| {
                let handles: Vec<_> = (0..CONTENDERS)
                    .map(|_| {
                        s.spawn(|| {
                            start.wait();
                            pool.try_take_seat()
                        })
                    })
                    .collect();
                handles.into_iter().map(|h| h.join().unwrap()).collect()
            });

            let taken: HashSet<usize> = seats.iter().flatten().copied().collect();
            assert_eq!(seats.iter().flatten().count(), CHAIRS);
            assert_eq!(taken, (1..=CHAIRS).collect());
            assert_eq!(pool.available(), 0);
        }
    }
}
