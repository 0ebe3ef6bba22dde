// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legacy listener convention.
//!
//! A runtime with only `attach_event` gets handler properties (`onmouseover`) and does
//! not deduplicate. Registering twice therefore attaches two wrappers, and each `unset`
//! removes exactly one of them. `clear` tears down the rest.
//!
//! Run:
//! - `cargo run -p rollover_demos --example rollover_legacy`

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Point, Rect};
use rollover::engine::Rollover;
use rollover::types::{Callback, EventKind};
use rollover_dom::{Document, Element, RuntimeFeatures};

fn main() {
    let doc = Document::new(RuntimeFeatures::ATTACH_EVENT);
    doc.set_bounds(doc.root(), Rect::new(0.0, 0.0, 100.0, 100.0))
        .unwrap();
    let button = doc.create_element("button");
    doc.add_class(button, "btn").unwrap();
    doc.set_bounds(button, Rect::new(10.0, 10.0, 50.0, 30.0))
        .unwrap();
    doc.append_child(doc.root(), button).unwrap();

    let enters = Rc::new(Cell::new(0));
    let e = enters.clone();
    let on_enter: Callback<Element> = Callback::new(move |_| e.set(e.get() + 1));

    let mut rollover = Rollover::new(doc.clone());
    println!("== Convention ==\n  {:?}", rollover.convention());

    rollover.set(".btn", Some(&on_enter), None);
    rollover.set(".btn", Some(&on_enter), None);
    println!(
        "== After two sets ==\n  records: {}  onmouseover handlers: {}",
        rollover.registry().len(),
        doc.listener_count(button, EventKind::Over)
    );

    let hover = |doc: &Document| {
        let _ = doc.pointer_move(Point::new(80.0, 80.0));
        let _ = doc.pointer_move(Point::new(20.0, 20.0));
    };
    hover(&doc);
    assert_eq!(enters.get(), 2);

    rollover.unset(".btn", Some(&on_enter), None);
    hover(&doc);
    assert_eq!(enters.get(), 3);

    let removed = rollover.clear();
    println!("== Cleared ==\n  removed: {removed}");
    hover(&doc);
    assert_eq!(enters.get(), 3);
    assert_eq!(doc.listener_count(button, EventKind::Over), 0);
}
