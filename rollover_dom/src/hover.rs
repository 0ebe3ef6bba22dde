// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover tracking: turn a change of hovered path into the pointer events a runtime fires.
//!
//! ## Ordering
//!
//! When the hovered target changes from `a` to `b`, a runtime fires:
//!
//! 1. `out` at `a` (related: `b`), bubbling;
//! 2. `leave` at every node on `a`'s path below the lowest common ancestor, inner→outer;
//! 3. `over` at `b` (related: `a`), bubbling;
//! 4. `enter` at every node on `b`'s path below the lowest common ancestor, outer→inner.
//!
//! Steps 2 and 4 only happen on runtimes with native enter/leave.
//!
//! ```
//! use rollover::types::EventKind;
//! use rollover_dom::hover::HoverTracker;
//!
//! let mut h: HoverTracker<u32> = HoverTracker::new();
//! let t = h.move_to(&[1, 2]).unwrap();
//! assert_eq!(t.enters, vec![1, 2]);
//! let t = h.move_to(&[1, 3]).unwrap();
//! assert_eq!(t.leaves, [2]);
//! assert_eq!(t.enters, [3]);
//! let kinds: Vec<_> = t.events(false).iter().map(|e| e.kind).collect();
//! assert_eq!(kinds, [EventKind::Out, EventKind::Over]);
//! ```

use alloc::vec::Vec;

use rollover::types::{EventKind, PointerEvent};

/// Tracks the hovered root→target path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoverTracker<K> {
    path: Vec<K>,
}

/// The difference between two hovered paths.
///
/// Returned by [`HoverTracker::move_to`] and [`HoverTracker::clear`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition<K> {
    /// Previously hovered target, if any.
    pub from: Option<K>,
    /// Newly hovered target, if any.
    pub to: Option<K>,
    /// Nodes the pointer left, inner→outer.
    pub leaves: Vec<K>,
    /// Nodes the pointer entered, outer→inner.
    pub enters: Vec<K>,
}

impl<K: Clone + PartialEq> HoverTracker<K> {
    /// Create a tracker with nothing hovered.
    pub fn new() -> Self {
        Self { path: Vec::new() }
    }

    /// Currently hovered root→target path.
    pub fn path(&self) -> &[K] {
        &self.path
    }

    /// Currently hovered target.
    pub fn target(&self) -> Option<&K> {
        self.path.last()
    }

    /// Move the pointer so that `new_path` (root→target) is hovered.
    ///
    /// Returns `None` when the target does not change.
    pub fn move_to(&mut self, new_path: &[K]) -> Option<Transition<K>> {
        if self.path.last() == new_path.last() {
            // Same target; the path may still have been restructured underneath.
            self.path.clear();
            self.path.extend_from_slice(new_path);
            return None;
        }

        // Shared prefix is the ancestry common to both targets.
        let lca = self
            .path
            .iter()
            .zip(new_path)
            .take_while(|(a, b)| a == b)
            .count();

        let transition = Transition {
            from: self.path.last().cloned(),
            to: new_path.last().cloned(),
            leaves: self.path[lca..].iter().rev().cloned().collect(),
            enters: new_path[lca..].to_vec(),
        };
        self.path.clear();
        self.path.extend_from_slice(new_path);
        Some(transition)
    }

    /// Move the pointer off the document.
    pub fn clear(&mut self) -> Option<Transition<K>> {
        self.move_to(&[])
    }
}

impl<K: Clone> Transition<K> {
    /// Events a runtime fires for this transition, in dispatch order.
    ///
    /// `native` selects whether enter/leave are included.
    pub fn events(&self, native: bool) -> Vec<PointerEvent<K>> {
        let mut out = Vec::new();
        if let Some(from) = &self.from {
            out.push(PointerEvent::new(
                EventKind::Out,
                from.clone(),
                self.to.clone(),
            ));
        }
        if native {
            for k in &self.leaves {
                out.push(PointerEvent::new(EventKind::Leave, k.clone(), self.to.clone()));
            }
        }
        if let Some(to) = &self.to {
            out.push(PointerEvent::new(
                EventKind::Over,
                to.clone(),
                self.from.clone(),
            ));
        }
        if native {
            for k in &self.enters {
                out.push(PointerEvent::new(EventKind::Enter, k.clone(), self.from.clone()));
            }
        }
        out
    }
}
