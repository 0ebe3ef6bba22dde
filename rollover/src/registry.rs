// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registration registry: the records needed to tear down synthesized listeners.
//!
//! Only the synthesis path writes here. Native and delegated registrations attach the
//! caller's own callback, so the caller's handle is already enough to remove them.

use alloc::vec::Vec;

use crate::types::Callback;

/// One synthesized registration on one element.
///
/// Records are immutable once created.
#[derive(Clone, Debug)]
pub struct Registration<K> {
    /// Element the wrappers were attached to.
    pub element: K,
    /// Enter callback supplied by the caller.
    pub enter: Option<Callback<K>>,
    /// Leave callback supplied by the caller.
    pub leave: Option<Callback<K>>,
    /// Filtered wrapper attached for `over`, present iff `enter` is.
    pub synthesized_enter: Option<Callback<K>>,
    /// Filtered wrapper attached for `out`, present iff `leave` is.
    pub synthesized_leave: Option<Callback<K>>,
}

impl<K: PartialEq> Registration<K> {
    /// Exact match on element and both callback slots.
    ///
    /// An absent callback only matches an absent callback.
    pub fn matches(
        &self,
        element: &K,
        enter: Option<&Callback<K>>,
        leave: Option<&Callback<K>>,
    ) -> bool {
        self.element == *element && self.enter.as_ref() == enter && self.leave.as_ref() == leave
    }
}

/// Append-only list of [`Registration`]s with exact-match lookup and removal.
///
/// Lookups scan forward in insertion order. The registry is unbounded; records leave it
/// only through [`remove`](Self::remove) or [`drain`](Self::drain).
#[derive(Clone, Debug)]
pub struct Registry<K> {
    entries: Vec<Registration<K>>,
}

impl<K> Default for Registry<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Registry<K> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a record.
    pub fn record(&mut self, entry: Registration<K>) {
        self.entries.push(entry);
    }

    /// Remove and return the record at `index`, shifting later records down.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Registration<K> {
        self.entries.remove(index)
    }

    /// Record at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Registration<K>> {
        self.entries.get(index)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Registration<K>> + '_ {
        self.entries.iter()
    }

    /// Remove every record, yielding them in insertion order.
    pub fn drain(&mut self) -> impl Iterator<Item = Registration<K>> + '_ {
        self.entries.drain(..)
    }
}

impl<K: PartialEq> Registry<K> {
    /// Index of the first record matching `(element, enter, leave)` exactly.
    pub fn find(
        &self,
        element: &K,
        enter: Option<&Callback<K>>,
        leave: Option<&Callback<K>>,
    ) -> Option<usize> {
        self.entries
            .iter()
            .position(|r| r.matches(element, enter, leave))
    }

    /// Number of records for `element`.
    pub fn count_for(&self, element: &K) -> usize {
        self.entries.iter().filter(|r| r.element == *element).count()
    }
}
