//! Generic in-memory flag storage.
//!
//! # Responsibilities
//! - Hold the name → value mapping for the process lifetime
//! - Serve point reads and full snapshots
//! - Create-or-overwrite on write (last write wins)
//!
//! # Design Decisions
//! - No validation here; see `service.rs`
//! - `RwLock` around the map: handlers run on a multi-threaded runtime
//! - Names keep first-insertion order, so snapshots serialize predictably

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::{Map, Value};

/// A flag value: any JSON value.
pub type FlagValue = Value;

/// Ordered name → value mapping, as returned by snapshots.
pub type Flags = Map<String, FlagValue>;

/// Thread-safe flag map.
#[derive(Debug, Default)]
pub struct FlagStore {
    flags: RwLock<Flags>,
}

impl FlagStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value for `name`, if any.
    pub fn get(&self, name: &str) -> Option<FlagValue> {
        self.read().get(name).cloned()
    }

    /// Copy of the whole mapping. Later writes are not reflected in it.
    pub fn snapshot(&self) -> Flags {
        self.read().clone()
    }

    /// Store `value` under `name`, returning the previous value.
    pub fn set(&self, name: impl Into<String>, value: FlagValue) -> Option<FlagValue> {
        self.write().insert(name.into(), value)
    }

    /// Drop every entry and replace them with `seed`.
    pub fn reset<I>(&self, seed: I)
    where
        I: IntoIterator<Item = (String, FlagValue)>,
    {
        let mut flags = self.write();
        flags.clear();
        flags.extend(seed);
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Poisoning is ignored: every write is a single insert or clear+extend.
    fn read(&self) -> RwLockReadGuard<'_, Flags> {
        self.flags.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Flags> {
        self.flags.write().unwrap_or_else(PoisonError::into_inner)
    }
}
