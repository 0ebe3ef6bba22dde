// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Document implementation: element arena, tree mutation, listeners, dispatch, and the
//! `rollover` host traits.

use alloc::rc::{Rc, Weak};
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::{Point, Rect};
use rollover::adapter::Convention;
use rollover::types::{
    Callback, EventKind, FeatureProbe, ListenerHost, ParentHandle, ParentLookup, PointerEvent,
    SelectorResolver,
};

use crate::hover::{HoverTracker, Transition};
use crate::selector::{MatchContext, SelectorError, SelectorList};
use crate::types::{DomError, Element, RuntimeFeatures};

struct Listener {
    kind: EventKind,
    convention: Convention,
    handler: Callback<Element>,
}

struct Node {
    generation: u32,
    local_name: String,
    id: Option<String>,
    classes: Vec<String>,
    parent: Option<Element>,
    children: Vec<Element>,
    bounds: Rect,
    listeners: Vec<Listener>,
}

impl Node {
    fn new(generation: u32, local_name: String) -> Self {
        Self {
            generation,
            local_name,
            id: None,
            classes: Vec::new(),
            parent: None,
            children: Vec::new(),
            bounds: Rect::ZERO,
            listeners: Vec::new(),
        }
    }
}

struct Inner {
    features: RuntimeFeatures,
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    root: Element,
    hover: HoverTracker<Element>,
}

impl Inner {
    fn new(features: RuntimeFeatures) -> Self {
        let mut inner = Self {
            features,
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: Element::new(0, 1),
            hover: HoverTracker::new(),
        };
        inner.root = inner.alloc(String::from("body"));
        inner
    }

    fn alloc(&mut self, local_name: String) -> Element {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local_name));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, local_name)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Element uses 32-bit indices by design."
        )]
        Element::new(idx as u32, generation)
    }

    fn node(&self, el: Element) -> Option<&Node> {
        self.nodes
            .get(el.idx())?
            .as_ref()
            .filter(|n| n.generation == el.generation())
    }

    fn node_mut(&mut self, el: Element) -> Option<&mut Node> {
        self.nodes
            .get_mut(el.idx())?
            .as_mut()
            .filter(|n| n.generation == el.generation())
    }

    fn alive(&self, el: Element) -> Result<(), DomError> {
        self.node(el).map(|_| ()).ok_or(DomError::Stale(el))
    }

    fn parent(&self, el: Element) -> Option<Element> {
        self.node(el)?.parent
    }

    /// `el` followed by its ancestors, inner→outer.
    fn ancestors_inclusive(&self, el: Element) -> Vec<Element> {
        let mut out = vec![el];
        let mut cur = self.parent(el);
        while let Some(p) = cur {
            out.push(p);
            cur = self.parent(p);
        }
        out
    }

    fn is_connected(&self, el: Element) -> bool {
        self.node(el).is_some() && self.ancestors_inclusive(el).last() == Some(&self.root)
    }

    fn unlink(&mut self, child: Element) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = None;
        }
    }

    /// `from` and its descendants in pre-order.
    fn subtree(&self, from: Element) -> Vec<Element> {
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(el) = stack.pop() {
            let Some(node) = self.node(el) else {
                continue;
            };
            out.push(el);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Topmost connected element containing `point`: the last one in document order.
    fn hit_test(&self, point: Point) -> Option<Element> {
        self.subtree(self.root)
            .into_iter()
            .rev()
            .find(|el| self.node(*el).is_some_and(|n| n.bounds.contains(point)))
    }
}

impl MatchContext for Inner {
    fn local_name(&self, el: Element) -> Option<&str> {
        self.node(el).map(|n| n.local_name.as_str())
    }

    fn id(&self, el: Element) -> Option<&str> {
        self.node(el)?.id.as_deref()
    }

    fn has_class(&self, el: Element, class: &str) -> bool {
        self.node(el)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn parent(&self, el: Element) -> Option<Element> {
        Self::parent(self, el)
    }
}

/// An in-memory document: a tree of elements with boxes, listeners, and a pointer.
///
/// `Document` is a cheap, clonable handle; clones share the same tree. It implements the
/// [`rollover`] host traits, so it can be handed to
/// [`Rollover::new`](rollover::engine::Rollover::new) directly.
///
/// ## Runtime profile
///
/// [`RuntimeFeatures`] decides which listener conventions are accepted and whether
/// pointer movement fires native `mouseenter`/`mouseleave`. Registration through a
/// convention the profile lacks is ignored and logged.
///
/// ## Dispatch
///
/// Listeners on each node are snapshotted before any of them run, so handlers may add or
/// remove listeners (or call back into the document) while an event is in flight.
#[derive(Clone)]
pub struct Document {
    inner: Rc<RefCell<Inner>>,
}

/// A non-owning handle to a [`Document`].
///
/// Returned by [`Document::downgrade`]. Once every `Document` handle is dropped the tree
/// is freed, [`upgrade`](Self::upgrade) returns `None`, and every parent lookup ends.
#[derive(Clone)]
pub struct WeakDocument {
    inner: Weak<RefCell<Inner>>,
}

impl core::fmt::Debug for WeakDocument {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WeakDocument")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl WeakDocument {
    /// The document, if any handle to it is still alive.
    pub fn upgrade(&self) -> Option<Document> {
        self.inner.upgrade().map(|inner| Document { inner })
    }
}

impl ParentLookup<Element> for WeakDocument {
    fn parent_of(&self, node: &Element) -> Option<Element> {
        self.inner.upgrade()?.borrow().parent(*node)
    }
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let inner = self.inner.borrow();
        let alive = inner.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("features", &inner.features)
            .field("nodes_alive", &alive)
            .field("free_list", &inner.free_list.len())
            .field("hovered", &inner.hover.target())
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(RuntimeFeatures::default())
    }
}

impl Document {
    /// Create a document with a `body` root and the given runtime profile.
    pub fn new(features: RuntimeFeatures) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner::new(features))),
        }
    }

    /// A handle that does not keep the document alive.
    pub fn downgrade(&self) -> WeakDocument {
        WeakDocument {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Runtime profile.
    pub fn features(&self) -> RuntimeFeatures {
        self.inner.borrow().features
    }

    /// The root element.
    pub fn root(&self) -> Element {
        self.inner.borrow().root
    }

    /// Create a detached element. Tag names are stored lowercase.
    pub fn create_element(&self, local_name: &str) -> Element {
        self.inner
            .borrow_mut()
            .alloc(local_name.to_ascii_lowercase())
    }

    /// Whether `el` refers to a live (not destroyed) element.
    pub fn is_alive(&self, el: Element) -> bool {
        self.inner.borrow().node(el).is_some()
    }

    /// Whether `el` is the root or a descendant of it.
    pub fn is_connected(&self, el: Element) -> bool {
        self.inner.borrow().is_connected(el)
    }

    /// Move `child` (and its subtree) to the end of `parent`'s children.
    pub fn append_child(&self, parent: Element, child: Element) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        inner.alive(parent)?;
        inner.alive(child)?;
        if child == inner.root {
            return Err(DomError::Root);
        }
        if inner.ancestors_inclusive(parent).contains(&child) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        inner.unlink(child);
        if let Some(c) = inner.node_mut(child) {
            c.parent = Some(parent);
        }
        if let Some(p) = inner.node_mut(parent) {
            p.children.push(child);
        }
        Ok(())
    }

    /// Detach `child` from `parent`. The child stays alive and keeps its listeners.
    pub fn remove_child(&self, parent: Element, child: Element) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        inner.alive(parent)?;
        inner.alive(child)?;
        if inner.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        inner.unlink(child);
        Ok(())
    }

    /// Detach `el` and free it and its subtree. Handles to them go stale.
    pub fn destroy(&self, el: Element) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        inner.alive(el)?;
        if el == inner.root {
            return Err(DomError::Root);
        }
        inner.unlink(el);
        for gone in inner.subtree(el) {
            inner.nodes[gone.idx()] = None;
            inner.free_list.push(gone.idx());
        }
        Ok(())
    }

    /// Set the `id` attribute.
    pub fn set_id(&self, el: Element, id: &str) -> Result<(), DomError> {
        self.with_node(el, |n| n.id = Some(id.to_string()))
    }

    /// Add a class, if not already present.
    pub fn add_class(&self, el: Element, class: &str) -> Result<(), DomError> {
        self.with_node(el, |n| {
            if !n.classes.iter().any(|c| c == class) {
                n.classes.push(class.to_string());
            }
        })
    }

    /// Set the element's box in document coordinates.
    pub fn set_bounds(&self, el: Element, bounds: Rect) -> Result<(), DomError> {
        self.with_node(el, |n| n.bounds = bounds)
    }

    /// The element's box.
    pub fn bounds(&self, el: Element) -> Option<Rect> {
        self.inner.borrow().node(el).map(|n| n.bounds)
    }

    /// The element's tag name.
    pub fn local_name(&self, el: Element) -> Option<String> {
        self.inner.borrow().node(el).map(|n| n.local_name.clone())
    }

    /// Children of `el`, in order.
    pub fn children(&self, el: Element) -> Vec<Element> {
        self.inner
            .borrow()
            .node(el)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Every connected element matching `selector`, in document order.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<Element>, SelectorError> {
        let list = SelectorList::parse(selector)?;
        let inner = self.inner.borrow();
        Ok(inner
            .subtree(inner.root)
            .into_iter()
            .filter(|el| list.matches(*el, &*inner))
            .collect())
    }

    /// Topmost connected element whose box contains `point`.
    pub fn hit_test(&self, point: Point) -> Option<Element> {
        self.inner.borrow().hit_test(point)
    }

    /// Element currently under the pointer.
    pub fn hovered(&self) -> Option<Element> {
        self.inner.borrow().hover.target().copied()
    }

    /// Move the pointer to `point`, firing the events a runtime would.
    ///
    /// Returns the events dispatched, in order. Nothing fires if the hovered element does
    /// not change.
    pub fn pointer_move(&self, point: Point) -> Vec<PointerEvent<Element>> {
        let (transition, native) = {
            let mut inner = self.inner.borrow_mut();
            let path = inner
                .hit_test(point)
                .map(|t| {
                    let mut path = inner.ancestors_inclusive(t);
                    path.reverse();
                    path
                })
                .unwrap_or_default();
            let native = inner.features.fires_enter_leave();
            (inner.hover.move_to(&path), native)
        };
        self.run(transition, native)
    }

    /// Move the pointer off the document.
    pub fn pointer_exit(&self) -> Vec<PointerEvent<Element>> {
        let (transition, native) = {
            let mut inner = self.inner.borrow_mut();
            let native = inner.features.fires_enter_leave();
            (inner.hover.clear(), native)
        };
        self.run(transition, native)
    }

    /// Fire a single event at `target`, bubbling if `kind` bubbles.
    ///
    /// Returns the number of handlers invoked.
    pub fn dispatch(&self, target: Element, kind: EventKind, related: Option<Element>) -> usize {
        self.fire(&PointerEvent::new(kind, target, related))
    }

    /// Number of listeners for `kind` on `el`, across both conventions.
    pub fn listener_count(&self, el: Element, kind: EventKind) -> usize {
        self.inner
            .borrow()
            .node(el)
            .map_or(0, |n| n.listeners.iter().filter(|l| l.kind == kind).count())
    }

    fn with_node<R>(&self, el: Element, f: impl FnOnce(&mut Node) -> R) -> Result<R, DomError> {
        let mut inner = self.inner.borrow_mut();
        let node = inner.node_mut(el).ok_or(DomError::Stale(el))?;
        Ok(f(node))
    }

    fn run(
        &self,
        transition: Option<Transition<Element>>,
        native: bool,
    ) -> Vec<PointerEvent<Element>> {
        let Some(transition) = transition else {
            return Vec::new();
        };
        let events = transition.events(native);
        for event in &events {
            self.fire(event);
        }
        events
    }

    fn fire(&self, event: &PointerEvent<Element>) -> usize {
        let path = {
            let inner = self.inner.borrow();
            if inner.node(event.target).is_none() {
                return 0;
            }
            if event.kind.bubbles() {
                inner.ancestors_inclusive(event.target)
            } else {
                vec![event.target]
            }
        };

        let mut invoked = 0;
        for node in path {
            let handlers: Vec<Callback<Element>> = {
                let inner = self.inner.borrow();
                let Some(n) = inner.node(node) else {
                    continue;
                };
                n.listeners
                    .iter()
                    .filter(|l| l.kind == event.kind)
                    .map(|l| l.handler.clone())
                    .collect()
            };
            let at = event.at(node);
            for handler in handlers {
                handler.call(&at);
                invoked += 1;
            }
        }
        tracing::trace!(
            event = event.kind.name(),
            target = ?event.target,
            related = ?event.related_target,
            invoked,
            "dispatched"
        );
        invoked
    }
}

impl ParentLookup<Element> for Document {
    fn parent_of(&self, node: &Element) -> Option<Element> {
        self.inner.borrow().parent(*node)
    }
}

// Filter wrappers live in this document's listener tables.
impl ParentHandle<Element> for Document {
    type Lookup = WeakDocument;

    fn parent_handle(&self) -> WeakDocument {
        self.downgrade()
    }
}

impl SelectorResolver<Element> for Document {
    fn select_all(&self, selector: &str) -> Vec<Element> {
        self.query_selector_all(selector).unwrap_or_else(|err| {
            tracing::debug!(selector, %err, "selector matches nothing");
            Vec::new()
        })
    }
}

impl ListenerHost<Element> for Document {
    fn add_event_listener(&self, target: &Element, kind: EventKind, handler: &Callback<Element>) {
        let mut inner = self.inner.borrow_mut();
        if !inner.features.contains(RuntimeFeatures::ADD_EVENT_LISTENER) {
            tracing::warn!(?target, "add_event_listener is not available in this runtime");
            return;
        }
        let Some(node) = inner.node_mut(*target) else {
            return;
        };
        let duplicate = node.listeners.iter().any(|l| {
            l.convention == Convention::Standard && l.kind == kind && l.handler == *handler
        });
        if !duplicate {
            node.listeners.push(Listener {
                kind,
                convention: Convention::Standard,
                handler: handler.clone(),
            });
        }
    }

    fn remove_event_listener(
        &self,
        target: &Element,
        kind: EventKind,
        handler: &Callback<Element>,
    ) {
        let mut inner = self.inner.borrow_mut();
        if let Some(node) = inner.node_mut(*target) {
            node.listeners.retain(|l| {
                !(l.convention == Convention::Standard && l.kind == kind && l.handler == *handler)
            });
        }
    }

    fn attach_event(&self, target: &Element, property: &str, handler: &Callback<Element>) -> bool {
        let mut inner = self.inner.borrow_mut();
        if !inner.features.contains(RuntimeFeatures::ATTACH_EVENT) {
            tracing::warn!(?target, property, "attach_event is not available in this runtime");
            return false;
        }
        let Some(kind) = EventKind::from_handler_property(property) else {
            return false;
        };
        let Some(node) = inner.node_mut(*target) else {
            return false;
        };
        node.listeners.push(Listener {
            kind,
            convention: Convention::Legacy,
            handler: handler.clone(),
        });
        true
    }

    fn detach_event(&self, target: &Element, property: &str, handler: &Callback<Element>) {
        let Some(kind) = EventKind::from_handler_property(property) else {
            return;
        };
        let mut inner = self.inner.borrow_mut();
        let Some(node) = inner.node_mut(*target) else {
            return;
        };
        if let Some(i) = node.listeners.iter().position(|l| {
            l.convention == Convention::Legacy && l.kind == kind && l.handler == *handler
        }) {
            node.listeners.remove(i);
        }
    }
}

impl FeatureProbe for Document {
    fn global_has(&self, property: &str) -> bool {
        has_handler(self.features(), RuntimeFeatures::WINDOW_MOUSELEAVE, property)
    }

    fn element_has(&self, property: &str) -> bool {
        has_handler(self.features(), RuntimeFeatures::ELEMENT_MOUSELEAVE, property)
    }

    fn has_add_event_listener(&self) -> bool {
        self.features()
            .contains(RuntimeFeatures::ADD_EVENT_LISTENER)
    }
}

fn has_handler(features: RuntimeFeatures, enter_leave: RuntimeFeatures, property: &str) -> bool {
    match EventKind::from_handler_property(property) {
        Some(EventKind::Enter | EventKind::Leave) => features.contains(enter_leave),
        Some(EventKind::Over | EventKind::Out) => true,
        None => false,
    }
}
