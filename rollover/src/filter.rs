// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boundary filter: turn bubbling over/out into enter/leave for one element.
//!
//! ## Overview
//!
//! A listener for `over` on an element also runs for every `over` fired on its descendants,
//! once per descendant boundary the pointer crosses. Only some of those are real crossings
//! of the element's own outer boundary. The secondary target tells them apart: the pointer
//! came from (or is going to) somewhere inside the element's subtree exactly when walking
//! up from the secondary target reaches the element.
//!
//! ```
//! use rollover::filter::is_boundary_crossing;
//! use rollover::types::ParentLookup;
//!
//! // 1 ─┬─ 2 ── 3
//! //    └─ 4
//! struct Parents;
//! impl ParentLookup<u32> for Parents {
//!     fn parent_of(&self, node: &u32) -> Option<u32> {
//!         match node {
//!             2 | 4 => Some(1),
//!             3 => Some(2),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! // Moving between 3 and 2 stays inside 2.
//! assert!(!is_boundary_crossing(&Parents, &2, Some(&3)));
//! // Moving from 4 into 2 crosses its boundary.
//! assert!(is_boundary_crossing(&Parents, &2, Some(&4)));
//! // Coming from outside the document always crosses.
//! assert!(is_boundary_crossing(&Parents, &2, None));
//! ```

use core::fmt::Debug;

use crate::types::{Callback, ParentLookup};

/// Returns true if a pointer moving to or from `related` crosses the outer boundary of
/// `element`.
///
/// Walks from `related` up through `parents`. Reaching `element` (including `related`
/// being `element` itself) means the movement stayed inside the subtree. The walk ends at
/// the first node without a parent; a `None` secondary target never reaches `element`.
pub fn is_boundary_crossing<K, P>(parents: &P, element: &K, related: Option<&K>) -> bool
where
    K: PartialEq,
    P: ParentLookup<K> + ?Sized,
{
    let Some(start) = related else {
        return true;
    };
    if start == element {
        return false;
    }
    let mut cur = parents.parent_of(start);
    while let Some(node) = cur {
        if node == *element {
            return false;
        }
        cur = parents.parent_of(&node);
    }
    true
}

/// Wrap `callback` so it only runs for events that cross `element`'s boundary.
///
/// The wrapper is meant to be attached to `element` for a bubbling kind. It passes the
/// original event through unchanged and never reorders events; it only drops the ones
/// whose secondary target lies inside `element`'s subtree.
pub fn wrap<K, P>(element: K, callback: Callback<K>, parents: P) -> Callback<K>
where
    K: PartialEq + Debug + 'static,
    P: ParentLookup<K> + 'static,
{
    Callback::new(move |event| {
        if is_boundary_crossing(&parents, &element, event.related_target.as_ref()) {
            callback.call(event);
        } else {
            tracing::trace!(
                ?element,
                event = event.kind.name(),
                related = ?event.related_target,
                "suppressed internal crossing"
            );
        }
    })
}
