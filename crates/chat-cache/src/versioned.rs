//! Versioned record cache.
//!
//! Holds one collection value with its fingerprint and the flags that
//! decide when a reload from the remote authority is due. Whether a reload
//! is in progress is tracked by the owner's request group, not here.

use chat_core::Fingerprint;

/// A cached value together with its change fingerprint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedCache<T> {
    value: T,
    fingerprint: Fingerprint,
    loaded: bool,
    stale: bool,
}

impl<T: Default> Default for VersionedCache<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> VersionedCache<T> {
    /// Create a cache that has never been loaded
    pub fn new(value: T) -> Self {
        Self {
            value,
            fingerprint: Fingerprint::EMPTY,
            loaded: false,
            stale: false,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Whether a value was ever installed, from the store or the remote
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// True when nothing was ever loaded or the cached value is known stale
    pub fn needs_reload(&self) -> bool {
        !self.loaded || self.stale
    }

    /// Record that the remote authority holds a newer version
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Install a value read back from the persistent store
    pub fn restore(&mut self, value: T, fingerprint: Fingerprint) {
        self.value = value;
        self.fingerprint = fingerprint;
        self.loaded = true;
    }

    /// Install a remote result if its fingerprint differs from the cached one.
    ///
    /// Clears staleness either way. Returns whether the value changed.
    pub fn reconcile(&mut self, value: T, fingerprint: Fingerprint) -> bool {
        let unchanged = self.loaded && self.fingerprint == fingerprint;
        self.loaded = true;
        self.stale = false;
        if unchanged {
            return false;
        }
        self.value = value;
        self.fingerprint = fingerprint;
        true
    }

    /// Remote answered "not modified" for the cached fingerprint, so the
    /// cached value is current even if it was never installed explicitly
    pub fn confirm(&mut self) {
        self.loaded = true;
        self.stale = false;
    }

    /// Apply a local mutation and recompute the fingerprint with `fingerprint_of`.
    ///
    /// Returns whether the fingerprint changed.
    pub fn modify<F, H>(&mut self, mutate: F, fingerprint_of: H) -> bool
    where
        F: FnOnce(&mut T),
        H: FnOnce(&T) -> Fingerprint,
    {
        mutate(&mut self.value);
        let fingerprint = fingerprint_of(&self.value);
        if fingerprint == self.fingerprint {
            return false;
        }
        self.fingerprint = fingerprint;
        true
    }
}
