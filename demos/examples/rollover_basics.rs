// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rollover basics.
//!
//! Register enter/leave callbacks on a selector in a modern runtime, walk the pointer
//! across a card and its children, then unset.
//!
//! Run:
//! - `cargo run -p rollover_demos --example rollover_basics`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect};
use rollover::engine::Rollover;
use rollover::types::{Callback, EventKind, PointerEvent};
use rollover_dom::{Document, Element, RuntimeFeatures};

fn main() {
    let doc = Document::new(RuntimeFeatures::MODERN);
    let body = doc.root();
    doc.set_bounds(body, Rect::new(0.0, 0.0, 400.0, 200.0))
        .unwrap();

    let card = doc.create_element("div");
    doc.add_class(card, "card").unwrap();
    doc.set_bounds(card, Rect::new(20.0, 20.0, 180.0, 180.0))
        .unwrap();
    doc.append_child(body, card).unwrap();

    let title = doc.create_element("h2");
    doc.set_bounds(title, Rect::new(30.0, 30.0, 170.0, 60.0))
        .unwrap();
    doc.append_child(card, title).unwrap();

    let log: Rc<RefCell<Vec<(EventKind, Element)>>> = Rc::default();
    let l = log.clone();
    let on_enter = Callback::new(move |ev: &PointerEvent<Element>| {
        l.borrow_mut().push((ev.kind, ev.current_target));
    });
    let l = log.clone();
    let on_leave = Callback::new(move |ev: &PointerEvent<Element>| {
        l.borrow_mut().push((ev.kind, ev.current_target));
    });

    let mut rollover = Rollover::new(doc.clone());
    println!("== Engine ==\n  {:?}", rollover);
    rollover.set(".card", Some(&on_enter), Some(&on_leave));

    for (label, p) in [
        ("body", Point::new(5.0, 5.0)),
        ("card", Point::new(100.0, 120.0)),
        ("title", Point::new(100.0, 40.0)),
        ("card", Point::new(100.0, 120.0)),
        ("body", Point::new(300.0, 100.0)),
    ] {
        let fired: Vec<_> = doc
            .pointer_move(p)
            .iter()
            .map(|e| (e.kind.name(), e.target))
            .collect();
        println!("== Pointer → {label} ==\n  runtime: {fired:?}");
    }
    println!("== Callbacks ==\n  {:?}", log.borrow());

    // The title is inside the card: only one enter and one leave.
    assert_eq!(
        *log.borrow(),
        vec![(EventKind::Enter, card), (EventKind::Leave, card)]
    );

    rollover.unset(".card", Some(&on_enter), Some(&on_leave));
    assert_eq!(doc.listener_count(card, EventKind::Enter), 0);
    assert_eq!(doc.listener_count(card, EventKind::Leave), 0);
}
