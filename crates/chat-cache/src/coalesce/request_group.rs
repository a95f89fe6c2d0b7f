//! Key-indexed table of in-flight fetches and their waiting callers.
//!
//! The table is owned by a single actor, so it needs no locking: a key is
//! present exactly while one fetch for it is outstanding. Results are fanned
//! out through `oneshot` channels; a caller that dropped its receiver is
//! skipped without affecting the others.

use std::collections::HashMap;
use std::hash::Hash;

use tokio::sync::oneshot;

/// Reply channel of one waiting caller
pub type Waiter<T> = oneshot::Sender<T>;

/// Outcome of registering interest in a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Join {
    /// No fetch was outstanding; the caller must issue one
    Initiate,
    /// A fetch is already outstanding; the caller's waiter was queued on it
    Wait,
}

/// Coalescing table keyed by `K`, delivering values of type `T`
#[derive(Debug)]
pub struct RequestGroup<K, T> {
    pending: HashMap<K, Vec<Waiter<T>>>,
}

impl<K, T> Default for RequestGroup<K, T> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }
}

impl<K, T> RequestGroup<K, T>
where
    K: Hash + Eq,
    T: Clone,
{
    /// Create an empty group
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in `key`.
    ///
    /// `waiter` may be `None` for background fetches nobody awaits; such a
    /// call still marks the key in flight when it initiates.
    pub fn acquire_or_join(&mut self, key: K, waiter: Option<Waiter<T>>) -> Join {
        match self.pending.get_mut(&key) {
            Some(waiters) => {
                waiters.extend(waiter);
                Join::Wait
            }
            None => {
                self.pending.insert(key, waiter.into_iter().collect());
                Join::Initiate
            }
        }
    }

    /// Whether a fetch for `key` is outstanding
    pub fn is_in_flight(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    /// Number of callers currently queued on `key`
    pub fn waiter_count(&self, key: &K) -> usize {
        self.pending.get(key).map_or(0, Vec::len)
    }

    /// Number of keys with an outstanding fetch
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Close the fetch cycle for `key` and deliver `result` to every waiter
    /// queued on it, in arrival order.
    ///
    /// Returns how many waiters actually received the result. Completing a
    /// key with no outstanding fetch delivers nothing.
    pub fn complete(&mut self, key: &K, result: T) -> usize {
        let Some(waiters) = self.pending.remove(key) else {
            return 0;
        };
        deliver(waiters, &result)
    }

    /// Deliver `result` to every waiter of every key and clear the table
    pub fn abort_all(&mut self, result: T) -> usize {
        self.pending
            .drain()
            .map(|(_, waiters)| deliver(waiters, &result))
            .sum()
    }
}

fn deliver<T: Clone>(waiters: Vec<Waiter<T>>, result: &T) -> usize {
    waiters
        .into_iter()
        .filter(|waiter| !waiter.is_closed())
        .map(|waiter| waiter.send(result.clone()).is_ok())
        .filter(|sent| *sent)
        .count()
}
