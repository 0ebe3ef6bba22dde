// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=rollover_dom --heading-base-level=0

//! Rollover DOM: an in-memory document host for [`rollover`].
//!
//! A [`Document`] is a tree of elements with tag names, ids, classes, and Kurbo boxes. It
//! resolves CSS selectors, keeps per-element listener tables in both the standard and the
//! legacy convention, and simulates pointer movement, firing `mouseover`/`mouseout` (and,
//! if the runtime profile has them, `mouseenter`/`mouseleave`) the way a browser does.
//!
//! It implements every host trait the engine needs, so the same code can be run against a
//! modern, a legacy-IE, or an old-Gecko profile and compared.
//!
//! - [`Document`]: the tree, listeners, dispatch, and pointer.
//! - [`WeakDocument`]: non-owning handle used for parent walks.
//! - [`Element`]: generational element handle.
//! - [`RuntimeFeatures`]: which event features the simulated runtime exposes.
//! - [`selector`]: the selector parser used by [`Document::query_selector_all`].
//! - [`hover`]: hovered-path tracking and event ordering.
//!
//! ## Synthesized enter/leave on an old runtime
//!
//! ```
//! use core::cell::Cell;
//! use std::rc::Rc;
//!
//! use kurbo::{Point, Rect};
//! use rollover::engine::Rollover;
//! use rollover::types::Callback;
//! use rollover_dom::{Document, Element, RuntimeFeatures};
//!
//! let doc = Document::new(RuntimeFeatures::OLD_GECKO);
//! doc.set_bounds(doc.root(), Rect::new(0.0, 0.0, 200.0, 200.0)).unwrap();
//! let card = doc.create_element("div");
//! doc.add_class(card, "card").unwrap();
//! doc.set_bounds(card, Rect::new(10.0, 10.0, 110.0, 110.0)).unwrap();
//! doc.append_child(doc.root(), card).unwrap();
//! let label = doc.create_element("span");
//! doc.set_bounds(label, Rect::new(20.0, 20.0, 60.0, 40.0)).unwrap();
//! doc.append_child(card, label).unwrap();
//!
//! let enters = Rc::new(Cell::new(0));
//! let e = enters.clone();
//! let on_enter: Callback<Element> = Callback::new(move |_| e.set(e.get() + 1));
//!
//! let mut rollover = Rollover::new(doc.clone());
//! assert!(!rollover.capabilities().has_native_enter_leave());
//! rollover.set(".card", Some(&on_enter), None);
//!
//! let _ = doc.pointer_move(Point::new(5.0, 5.0)); // body
//! let _ = doc.pointer_move(Point::new(50.0, 80.0)); // card
//! let _ = doc.pointer_move(Point::new(30.0, 30.0)); // label, inside card
//! assert_eq!(enters.get(), 1);
//!
//! rollover.unset(".card", Some(&on_enter), None);
//! assert!(rollover.registry().is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod document;
mod types;

pub mod hover;
pub mod selector;

pub use document::{Document, WeakDocument};
pub use types::{DomError, Element, RuntimeFeatures};
