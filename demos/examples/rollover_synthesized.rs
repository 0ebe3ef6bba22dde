// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synthesized enter/leave on a runtime without native support.
//!
//! The same page is driven twice: once with a modern profile and once with an old one
//! that only fires `mouseover`/`mouseout`. The raw `mouseover` count on the menu grows
//! with every child crossed; the rollover callbacks do not.
//!
//! Run:
//! - `cargo run -p rollover_demos --example rollover_synthesized`

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Point, Rect};
use rollover::engine::Rollover;
use rollover::types::{Callback, EventKind, ListenerHost};
use rollover_dom::{Document, Element, RuntimeFeatures};

// body ── ul#menu ─┬─ li (row 0)
//                  ├─ li (row 1)
//                  └─ li (row 2)
fn menu_page(features: RuntimeFeatures) -> (Document, Element) {
    let doc = Document::new(features);
    doc.set_bounds(doc.root(), Rect::new(0.0, 0.0, 300.0, 300.0))
        .unwrap();
    let menu = doc.create_element("ul");
    doc.set_id(menu, "menu").unwrap();
    doc.set_bounds(menu, Rect::new(10.0, 10.0, 210.0, 160.0))
        .unwrap();
    doc.append_child(doc.root(), menu).unwrap();
    for row in 0..3 {
        let y = 20.0 + row as f64 * 45.0;
        let li = doc.create_element("li");
        doc.set_bounds(li, Rect::new(15.0, y, 205.0, y + 40.0))
            .unwrap();
        doc.append_child(menu, li).unwrap();
    }
    (doc, menu)
}

fn run(name: &str, features: RuntimeFeatures) -> (u32, u32, u32) {
    let (doc, menu) = menu_page(features);

    let raw_over = Rc::new(Cell::new(0));
    let r = raw_over.clone();
    doc.add_event_listener(&menu, EventKind::Over, &Callback::new(move |_| r.set(r.get() + 1)));

    let enters = Rc::new(Cell::new(0));
    let leaves = Rc::new(Cell::new(0));
    let e = enters.clone();
    let l = leaves.clone();
    let on_enter: Callback<Element> = Callback::new(move |_| e.set(e.get() + 1));
    let on_leave: Callback<Element> = Callback::new(move |_| l.set(l.get() + 1));

    let mut rollover = Rollover::new(doc.clone());
    rollover.set("#menu", Some(&on_enter), Some(&on_leave));

    // Down the menu through every row, then off the page.
    for y in [5.0, 30.0, 75.0, 120.0, 155.0, 250.0] {
        let _ = doc.pointer_move(Point::new(100.0, y));
    }
    let _ = doc.pointer_exit();

    println!(
        "== {name} ==\n  native: {}  records: {}  mouseover@menu: {}  enter: {}  leave: {}",
        rollover.capabilities().has_native_enter_leave(),
        rollover.registry().len(),
        raw_over.get(),
        enters.get(),
        leaves.get(),
    );
    (raw_over.get(), enters.get(), leaves.get())
}

fn main() {
    let modern = run("modern", RuntimeFeatures::MODERN);
    let old = run("old gecko", RuntimeFeatures::OLD_GECKO);

    // Menu, three rows, and the gap back to the menu all bubble `mouseover` to it.
    assert!(old.0 > 1);
    assert_eq!((modern.1, modern.2), (1, 1));
    assert_eq!((old.1, old.2), (1, 1));
}
