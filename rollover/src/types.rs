// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the engine: event kinds, pointer events, callbacks, and the host traits.
//!
//! ## Overview
//!
//! These types describe what the engine needs from its host and what it hands to callers.
//! They are referenced by the [`engine`](crate::engine) and implemented by host toolkits
//! (for example `rollover_dom`).

use alloc::rc::Rc;
use alloc::vec::Vec;

/// Pointer events the engine listens for or synthesizes.
///
/// [`Over`](EventKind::Over) and [`Out`](EventKind::Out) bubble and fire again for every
/// descendant boundary the pointer crosses. [`Enter`](EventKind::Enter) and
/// [`Leave`](EventKind::Leave) do not bubble and fire once per boundary of the element
/// they are registered on.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EventKind {
    /// Pointer moved onto a node or one of its descendants (`mouseover`).
    Over,
    /// Pointer moved off a node or one of its descendants (`mouseout`).
    Out,
    /// Pointer entered the node's box (`mouseenter`).
    Enter,
    /// Pointer left the node's box (`mouseleave`).
    Leave,
}

impl EventKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 4] = [Self::Over, Self::Out, Self::Enter, Self::Leave];

    /// The standard event name, as passed to `addEventListener`-style registration.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Over => "mouseover",
            Self::Out => "mouseout",
            Self::Enter => "mouseenter",
            Self::Leave => "mouseleave",
        }
    }

    /// The handler property name used by the legacy `attachEvent` convention (`"on" + name`).
    pub const fn handler_property(self) -> &'static str {
        match self {
            Self::Over => "onmouseover",
            Self::Out => "onmouseout",
            Self::Enter => "onmouseenter",
            Self::Leave => "onmouseleave",
        }
    }

    /// Whether the host propagates this kind to ancestors of the target.
    pub const fn bubbles(self) -> bool {
        matches!(self, Self::Over | Self::Out)
    }

    /// The bubbling kind that carries this kind when the host lacks native support.
    ///
    /// `Enter` is built from `Over` and `Leave` from `Out`; bubbling kinds map to themselves.
    pub const fn bubbling_source(self) -> Self {
        match self {
            Self::Over | Self::Enter => Self::Over,
            Self::Out | Self::Leave => Self::Out,
        }
    }

    /// Parse a standard event name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Parse a legacy handler property name such as `"onmouseout"`.
    pub fn from_handler_property(property: &str) -> Option<Self> {
        property.strip_prefix("on").and_then(Self::from_name)
    }
}

/// A pointer event as delivered to callbacks.
///
/// `related_target` is the secondary target: the node the pointer came from for
/// [`Over`](EventKind::Over)/[`Enter`](EventKind::Enter), or the node it is going to for
/// [`Out`](EventKind::Out)/[`Leave`](EventKind::Leave). It is `None` when the pointer
/// crosses the edge of the document.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PointerEvent<K> {
    /// Kind of event.
    pub kind: EventKind,
    /// Node the event was originally fired on.
    pub target: K,
    /// Node whose listeners are currently running (differs from `target` while bubbling).
    pub current_target: K,
    /// Secondary target, if any.
    pub related_target: Option<K>,
}

impl<K: Clone> PointerEvent<K> {
    /// Create an event positioned at its own target.
    pub fn new(kind: EventKind, target: K, related_target: Option<K>) -> Self {
        Self {
            kind,
            current_target: target.clone(),
            target,
            related_target,
        }
    }

    /// Return a copy of this event with `current_target` moved to `node`.
    pub fn at(&self, node: K) -> Self {
        Self {
            current_target: node,
            ..self.clone()
        }
    }
}

/// A shared event callback compared by identity.
///
/// Cloning a `Callback` yields the same callback: clones compare equal and can be used to
/// remove a listener that was added with the original. Two callbacks built from separate
/// [`Callback::new`] calls never compare equal, even if their bodies are identical.
///
/// ```
/// use rollover::types::Callback;
/// let a: Callback<u32> = Callback::new(|_| {});
/// let b: Callback<u32> = Callback::new(|_| {});
/// assert_eq!(a, a.clone());
/// assert_ne!(a, b);
/// ```
pub struct Callback<K>(Rc<dyn Fn(&PointerEvent<K>)>);

impl<K> Callback<K> {
    /// Wrap a closure.
    pub fn new(f: impl Fn(&PointerEvent<K>) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the callback.
    #[inline]
    pub fn call(&self, event: &PointerEvent<K>) {
        (self.0)(event);
    }

    /// Returns true if both handles refer to the same callback.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        core::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl<K> Clone for Callback<K> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<K> PartialEq for Callback<K> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<K> Eq for Callback<K> {}

impl<K> core::fmt::Debug for Callback<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Callback")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// Look up the parent of a node.
///
/// The [boundary filter](crate::filter) walks this upward from an event's secondary target.
pub trait ParentLookup<K> {
    /// Returns the parent of `node`, or `None` if `node` is a root or detached.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// Resolve a selector string to an ordered sequence of nodes.
///
/// Implementations return an empty sequence for selectors that match nothing or cannot be
/// parsed; resolution never fails.
pub trait SelectorResolver<K> {
    /// Returns every node matching `selector`, in document order.
    fn select_all(&self, selector: &str) -> Vec<K>;
}

/// Raw listener registration offered by the host.
///
/// Hosts expose two historical conventions. The standard one takes an [`EventKind`] and
/// ignores a second registration of the same callback; the legacy one takes a handler
/// property name (`"onmouseover"`) and may deliver duplicates. The engine picks one through
/// a [`ListenerAdapter`](crate::adapter::ListenerAdapter) and never calls the other.
pub trait ListenerHost<K> {
    /// Standard registration (`addEventListener`).
    fn add_event_listener(&self, target: &K, kind: EventKind, handler: &Callback<K>);
    /// Standard removal (`removeEventListener`).
    fn remove_event_listener(&self, target: &K, kind: EventKind, handler: &Callback<K>);
    /// Legacy registration (`attachEvent`); returns whether the host accepted it.
    fn attach_event(&self, target: &K, property: &str, handler: &Callback<K>) -> bool;
    /// Legacy removal (`detachEvent`).
    fn detach_event(&self, target: &K, property: &str, handler: &Callback<K>);
}

/// Feature detection queries consumed by the [capability probe](crate::probe).
pub trait FeatureProbe {
    /// Whether the global scope knows the handler property (`"onmouseleave" in window`).
    fn global_has(&self, property: &str) -> bool;
    /// Whether a freshly created element knows the handler property.
    fn element_has(&self, property: &str) -> bool;
    /// Whether the standard listener convention is available.
    fn has_add_event_listener(&self) -> bool;
}

/// Hand out a parent lookup for the [boundary filter](crate::filter) to keep.
///
/// Filter wrappers are stored inside the host's own listener tables, so a lookup that
/// owns the host would keep it alive through its listeners. Hosts backed by shared
/// ownership should return a non-owning handle whose walk ends (returns `None`) once the
/// host is gone.
pub trait ParentHandle<K> {
    /// The lookup captured by filter wrappers.
    type Lookup: ParentLookup<K> + 'static;

    /// Returns a lookup that answers like [`ParentLookup::parent_of`] on this host.
    fn parent_handle(&self) -> Self::Lookup;
}

/// Everything the engine needs from a host.
///
/// Implemented automatically for any type providing the component traits.
pub trait Host<K>:
    ParentLookup<K> + ParentHandle<K> + SelectorResolver<K> + ListenerHost<K> + FeatureProbe
{
}

impl<K, T> Host<K> for T where
    T: ParentLookup<K> + ParentHandle<K> + SelectorResolver<K> + ListenerHost<K> + FeatureProbe
{
}

/// An external event library that replaces the engine entirely when present.
///
/// Supply one through [`Rollover::with_delegate`](crate::engine::Rollover::with_delegate).
/// The engine then forwards every `set`/`unset` as `on`/`off` calls with the native
/// [`Enter`](EventKind::Enter)/[`Leave`](EventKind::Leave) kinds and does nothing else.
pub trait Delegate<K> {
    /// Bind `handler` for `kind` on every node matching `selector`.
    fn on(&self, selector: &str, kind: EventKind, handler: &Callback<K>);
    /// Unbind `handler` for `kind` from every node matching `selector`.
    fn off(&self, selector: &str, kind: EventKind, handler: &Callback<K>);
}

/// The absent delegate used by [`Rollover::new`](crate::engine::Rollover::new).
///
/// All calls are no-ops; an engine built without a delegate never calls them.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoDelegate;

impl<K> Delegate<K> for NoDelegate {
    #[inline]
    fn on(&self, _selector: &str, _kind: EventKind, _handler: &Callback<K>) {}

    #[inline]
    fn off(&self, _selector: &str, _kind: EventKind, _handler: &Callback<K>) {}
}
