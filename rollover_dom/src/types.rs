// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: element handles, runtime features, and errors.

/// Handle to an element of a [`Document`](crate::Document).
///
/// A small, copyable handle made of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On creation, a fresh slot is allocated with generation `1`.
/// - On [`destroy`](crate::Document::destroy), the slot is freed; handles to it go stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct handle.
///
/// Stale handles never alias a live element: they have no parent, match no selector,
/// and hold no listeners. Use [`Document::is_alive`](crate::Document::is_alive) to check.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Element(pub(crate) u32, pub(crate) u32);

impl Element {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Event features exposed by the simulated runtime.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RuntimeFeatures: u8 {
        /// `onmouseleave` exists on the global scope.
        const WINDOW_MOUSELEAVE  = 0b0000_0001;
        /// `onmouseleave` exists on elements.
        const ELEMENT_MOUSELEAVE = 0b0000_0010;
        /// Standard `addEventListener` registration.
        const ADD_EVENT_LISTENER = 0b0000_0100;
        /// Legacy `attachEvent` registration.
        const ATTACH_EVENT       = 0b0000_1000;
    }
}

impl RuntimeFeatures {
    /// Current runtimes: native enter/leave everywhere, standard listeners.
    pub const MODERN: Self = Self::WINDOW_MOUSELEAVE
        .union(Self::ELEMENT_MOUSELEAVE)
        .union(Self::ADD_EVENT_LISTENER);

    /// Old IE: enter/leave on elements only, legacy listeners only.
    pub const LEGACY_IE: Self = Self::ELEMENT_MOUSELEAVE.union(Self::ATTACH_EVENT);

    /// Old Gecko/WebKit: standard listeners, no enter/leave.
    pub const OLD_GECKO: Self = Self::ADD_EVENT_LISTENER;

    /// Whether pointer movement fires native enter/leave.
    pub fn fires_enter_leave(self) -> bool {
        self.intersects(Self::WINDOW_MOUSELEAVE | Self::ELEMENT_MOUSELEAVE)
    }
}

impl Default for RuntimeFeatures {
    fn default() -> Self {
        Self::MODERN
    }
}

/// Errors from tree mutations on a [`Document`](crate::Document).
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The handle refers to a destroyed element.
    #[error("stale element {0:?}")]
    Stale(Element),
    /// Inserting `child` under `parent` would make an element its own ancestor.
    #[error("{child:?} is an ancestor of {parent:?}")]
    HierarchyRequest {
        /// Requested parent.
        parent: Element,
        /// Element being inserted.
        child: Element,
    },
    /// The document root cannot be moved or destroyed.
    #[error("the document root cannot be moved or destroyed")]
    Root,
    /// `child` is not a child of `parent`.
    #[error("{child:?} is not a child of {parent:?}")]
    NotAChild {
        /// Claimed parent.
        parent: Element,
        /// Claimed child.
        child: Element,
    },
}
