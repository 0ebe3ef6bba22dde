// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end behavior of the engine against simulated runtimes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kurbo::{Point, Rect};
use rollover::adapter::Convention;
use rollover::engine::Rollover;
use rollover::probe::Capabilities;
use rollover::types::{Callback, Delegate, EventKind, PointerEvent};
use rollover_dom::{Document, Element, RuntimeFeatures};

// body(0,0,300,300) ─┬─ div#first.card(10,10,110,110) ─┬─ span.label(20,20,60,40)
//                    │                                 └─ span.icon(70,70,100,100)
//                    └─ div.card(150,10,250,110)
const BODY: Point = Point::new(5.0, 5.0);
const FIRST: Point = Point::new(50.0, 80.0);
const LABEL: Point = Point::new(30.0, 30.0);
const ICON: Point = Point::new(80.0, 80.0);
const SECOND: Point = Point::new(200.0, 50.0);

const PROFILES: [RuntimeFeatures; 3] = [
    RuntimeFeatures::MODERN,
    RuntimeFeatures::LEGACY_IE,
    RuntimeFeatures::OLD_GECKO,
];

struct Page {
    doc: Document,
    first: Element,
    label: Element,
    icon: Element,
    second: Element,
}

fn page(features: RuntimeFeatures) -> Page {
    let doc = Document::new(features);
    let body = doc.root();
    doc.set_bounds(body, Rect::new(0.0, 0.0, 300.0, 300.0))
        .unwrap();
    let add = |parent: Element, tag: &str, class: &str, bounds: Rect| {
        let el = doc.create_element(tag);
        doc.add_class(el, class).unwrap();
        doc.set_bounds(el, bounds).unwrap();
        doc.append_child(parent, el).unwrap();
        el
    };
    let first = add(body, "div", "card", Rect::new(10.0, 10.0, 110.0, 110.0));
    doc.set_id(first, "first").unwrap();
    let label = add(first, "span", "label", Rect::new(20.0, 20.0, 60.0, 40.0));
    let icon = add(first, "span", "icon", Rect::new(70.0, 70.0, 100.0, 100.0));
    let second = add(body, "div", "card", Rect::new(150.0, 10.0, 250.0, 110.0));
    Page {
        doc,
        first,
        label,
        icon,
        second,
    }
}

type Log = Rc<RefCell<Vec<(EventKind, Element)>>>;

/// A callback that records `kind` and the element it was delivered on.
fn recorder(log: &Log, kind: EventKind) -> Callback<Element> {
    let log = log.clone();
    Callback::new(move |ev: &PointerEvent<Element>| {
        log.borrow_mut().push((kind, ev.current_target));
    })
}

/// Body, into the first card, across both of its children, back, over to the second
/// card, and off the page.
fn tour(doc: &Document) {
    for p in [BODY, FIRST, LABEL, ICON, FIRST, SECOND] {
        let _ = doc.pointer_move(p);
    }
    let _ = doc.pointer_exit();
}

#[test]
fn every_runtime_reports_each_boundary_once() {
    for features in PROFILES {
        let p = page(features);
        let log = Log::default();
        let enter = recorder(&log, EventKind::Enter);
        let leave = recorder(&log, EventKind::Leave);
        let mut r = Rollover::new(p.doc.clone());
        r.set(".card", Some(&enter), Some(&leave));

        tour(&p.doc);
        assert_eq!(
            *log.borrow(),
            vec![
                (EventKind::Enter, p.first),
                (EventKind::Leave, p.first),
                (EventKind::Enter, p.second),
                (EventKind::Leave, p.second),
            ],
            "{features:?}"
        );
    }
}

#[test]
fn strategy_and_convention_follow_the_runtime() {
    let modern: Rollover<Element, _> = Rollover::new(page(RuntimeFeatures::MODERN).doc);
    assert!(modern.capabilities().has_native_enter_leave());
    assert_eq!(modern.convention(), Convention::Standard);

    let ie: Rollover<Element, _> = Rollover::new(page(RuntimeFeatures::LEGACY_IE).doc);
    assert!(ie.capabilities().has_native_enter_leave());
    assert_eq!(ie.convention(), Convention::Legacy);

    let gecko: Rollover<Element, _> = Rollover::new(page(RuntimeFeatures::OLD_GECKO).doc);
    assert!(!gecko.capabilities().has_native_enter_leave());
    assert_eq!(gecko.convention(), Convention::Standard);
}

#[test]
fn synthesized_enter_ignores_descendant_crossings() {
    let p = page(RuntimeFeatures::OLD_GECKO);
    let log = Log::default();
    let enter = recorder(&log, EventKind::Enter);
    let mut r = Rollover::new(p.doc.clone());
    r.set("#first", Some(&enter), None);

    // Related target inside the card: suppressed.
    p.doc.dispatch(p.label, EventKind::Over, Some(p.icon));
    p.doc.dispatch(p.first, EventKind::Over, Some(p.label));
    assert!(log.borrow().is_empty());

    // Outside, or from off the page: delivered once each.
    p.doc.dispatch(p.label, EventKind::Over, Some(p.second));
    p.doc.dispatch(p.first, EventKind::Over, None);
    assert_eq!(
        *log.borrow(),
        vec![(EventKind::Enter, p.first), (EventKind::Enter, p.first)]
    );
}

#[test]
fn native_set_and_unset_pass_through() {
    let p = page(RuntimeFeatures::MODERN);
    let log = Log::default();
    let enter = recorder(&log, EventKind::Enter);
    let mut r = Rollover::new(p.doc.clone());

    r.set("#first", Some(&enter), None);
    assert_eq!(p.doc.listener_count(p.first, EventKind::Enter), 1);
    assert_eq!(p.doc.listener_count(p.first, EventKind::Over), 0);
    assert!(r.registry().is_empty());
    p.doc.dispatch(p.first, EventKind::Enter, None);
    assert_eq!(log.borrow().len(), 1);

    r.unset("#first", Some(&enter), None);
    assert_eq!(p.doc.listener_count(p.first, EventKind::Enter), 0);
    p.doc.dispatch(p.first, EventKind::Enter, None);
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn native_standard_set_twice_delivers_once() {
    let p = page(RuntimeFeatures::MODERN);
    let log = Log::default();
    let enter = recorder(&log, EventKind::Enter);
    let mut r = Rollover::new(p.doc.clone());
    r.set("#first", Some(&enter), None);
    r.set("#first", Some(&enter), None);
    let _ = p.doc.pointer_move(FIRST);
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn synthesized_round_trip_leaves_no_trace() {
    let p = page(RuntimeFeatures::OLD_GECKO);
    let log = Log::default();
    let enter = recorder(&log, EventKind::Enter);
    let leave = recorder(&log, EventKind::Leave);
    let mut r = Rollover::new(p.doc.clone());

    r.set(".card", Some(&enter), Some(&leave));
    assert_eq!(r.registry().len(), 2);
    assert_eq!(p.doc.listener_count(p.first, EventKind::Over), 1);
    assert_eq!(p.doc.listener_count(p.second, EventKind::Out), 1);

    r.unset(".card", Some(&enter), Some(&leave));
    assert!(r.registry().is_empty());
    for el in [p.first, p.second] {
        for kind in EventKind::ALL {
            assert_eq!(p.doc.listener_count(el, kind), 0);
        }
    }
    tour(&p.doc);
    assert!(log.borrow().is_empty());
}

#[test]
fn enter_only_registration_never_leaves() {
    let p = page(RuntimeFeatures::OLD_GECKO);
    let log = Log::default();
    let enter = recorder(&log, EventKind::Enter);
    let mut r = Rollover::new(p.doc.clone());
    r.set("#first", Some(&enter), None);

    let record = r.registry().iter().next().unwrap();
    assert!(record.leave.is_none());
    assert!(record.synthesized_leave.is_none());
    assert_eq!(p.doc.listener_count(p.first, EventKind::Out), 0);

    tour(&p.doc);
    assert_eq!(*log.borrow(), vec![(EventKind::Enter, p.first)]);
}

#[test]
fn unset_with_other_enter_changes_nothing() {
    let p = page(RuntimeFeatures::OLD_GECKO);
    let log = Log::default();
    let f = recorder(&log, EventKind::Enter);
    let g = recorder(&log, EventKind::Leave);
    let h = recorder(&log, EventKind::Enter);
    let mut r = Rollover::new(p.doc.clone());
    r.set("#first", Some(&h), Some(&g));

    r.unset("#first", Some(&f), Some(&g));
    r.unset("#first", None, Some(&g));
    assert_eq!(r.registry().len(), 1);

    let _ = p.doc.pointer_move(FIRST);
    assert_eq!(*log.borrow(), vec![(EventKind::Enter, p.first)]);
}

#[test]
fn duplicate_registrations_unset_one_at_a_time() {
    let p = page(RuntimeFeatures::OLD_GECKO);
    let log = Log::default();
    let enter = recorder(&log, EventKind::Enter);
    let leave = recorder(&log, EventKind::Leave);
    let mut r = Rollover::new(p.doc.clone());
    r.set("#first", Some(&enter), Some(&leave));
    r.set("#first", Some(&enter), Some(&leave));
    assert_eq!(p.doc.listener_count(p.first, EventKind::Over), 2);

    let _ = p.doc.pointer_move(FIRST);
    assert_eq!(log.borrow().len(), 2);

    r.unset("#first", Some(&enter), Some(&leave));
    assert_eq!(r.registry().count_for(&p.first), 1);
    assert_eq!(p.doc.listener_count(p.first, EventKind::Over), 1);

    log.borrow_mut().clear();
    let _ = p.doc.pointer_move(SECOND);
    let _ = p.doc.pointer_move(FIRST);
    assert_eq!(
        *log.borrow(),
        vec![(EventKind::Leave, p.first), (EventKind::Enter, p.first)]
    );
}

#[test]
fn detached_related_targets_count_as_outside() {
    let p = page(RuntimeFeatures::OLD_GECKO);
    let log = Log::default();
    let enter = recorder(&log, EventKind::Enter);
    let leave = recorder(&log, EventKind::Leave);
    let mut r = Rollover::new(p.doc.clone());
    r.set("#first", Some(&enter), Some(&leave));

    // A loose two-level subtree that was never attached.
    let loose = p.doc.create_element("div");
    let loose_child = p.doc.create_element("span");
    p.doc.append_child(loose, loose_child).unwrap();
    p.doc.dispatch(p.first, EventKind::Over, Some(loose_child));

    // A former child: its walk ends at itself.
    p.doc.remove_child(p.first, p.icon).unwrap();
    p.doc.dispatch(p.first, EventKind::Out, Some(p.icon));

    // A destroyed element has no parent at all.
    p.doc.destroy(loose).unwrap();
    p.doc.dispatch(p.first, EventKind::Over, Some(loose_child));

    assert_eq!(
        *log.borrow(),
        vec![
            (EventKind::Enter, p.first),
            (EventKind::Leave, p.first),
            (EventKind::Enter, p.first),
        ]
    );
}

#[test]
fn legacy_convention_attaches_by_handler_property() {
    // Legacy listeners, no native enter/leave.
    let p = page(RuntimeFeatures::ATTACH_EVENT);
    let log = Log::default();
    let enter = recorder(&log, EventKind::Enter);
    let leave = recorder(&log, EventKind::Leave);
    let mut r = Rollover::new(p.doc.clone());
    assert_eq!(r.convention(), Convention::Legacy);
    assert!(!r.capabilities().has_native_enter_leave());

    r.set(".card", Some(&enter), Some(&leave));
    r.set(".card", Some(&enter), Some(&leave));
    assert_eq!(p.doc.listener_count(p.first, EventKind::Over), 2);

    r.unset(".card", Some(&enter), Some(&leave));
    assert_eq!(p.doc.listener_count(p.first, EventKind::Over), 1);
    assert_eq!(p.doc.listener_count(p.second, EventKind::Out), 1);

    tour(&p.doc);
    assert_eq!(
        *log.borrow(),
        vec![
            (EventKind::Enter, p.first),
            (EventKind::Leave, p.first),
            (EventKind::Enter, p.second),
            (EventKind::Leave, p.second),
        ]
    );
}

#[test]
fn delegate_supersedes_engine() {
    #[derive(Default)]
    struct Library(RefCell<Vec<(&'static str, String, EventKind)>>);

    impl Delegate<Element> for &Library {
        fn on(&self, selector: &str, kind: EventKind, _: &Callback<Element>) {
            self.0.borrow_mut().push(("on", selector.to_owned(), kind));
        }
        fn off(&self, selector: &str, kind: EventKind, _: &Callback<Element>) {
            self.0.borrow_mut().push(("off", selector.to_owned(), kind));
        }
    }

    let p = page(RuntimeFeatures::OLD_GECKO);
    let library = Library::default();
    let log = Log::default();
    let enter = recorder(&log, EventKind::Enter);
    let leave = recorder(&log, EventKind::Leave);
    let mut r = Rollover::with_delegate(p.doc.clone(), &library);

    r.set(".card", Some(&enter), Some(&leave));
    r.unset(".card", Some(&enter), None);

    assert!(r.registry().is_empty());
    for kind in EventKind::ALL {
        assert_eq!(p.doc.listener_count(p.first, kind), 0);
    }
    assert_eq!(
        *library.0.borrow(),
        vec![
            ("on", ".card".to_owned(), EventKind::Enter),
            ("on", ".card".to_owned(), EventKind::Leave),
            ("off", ".card".to_owned(), EventKind::Enter),
        ]
    );
}

#[test]
fn clear_detaches_every_wrapper() {
    let p = page(RuntimeFeatures::OLD_GECKO);
    let log = Log::default();
    let enter = recorder(&log, EventKind::Enter);
    let leave = recorder(&log, EventKind::Leave);
    let mut r = Rollover::new(p.doc.clone());
    r.set(".card", Some(&enter), Some(&leave));
    r.set("span", Some(&enter), None);
    assert_eq!(r.registry().len(), 4);

    assert_eq!(r.clear(), 4);
    assert!(r.registry().is_empty());
    for el in [p.first, p.label, p.icon, p.second] {
        assert_eq!(p.doc.listener_count(el, EventKind::Over), 0);
        assert_eq!(p.doc.listener_count(el, EventKind::Out), 0);
    }
    tour(&p.doc);
    assert!(log.borrow().is_empty());
}

#[test]
fn forced_synthesis_matches_native_on_a_modern_runtime() {
    let p = page(RuntimeFeatures::MODERN);
    let log = Log::default();
    let enter = recorder(&log, EventKind::Enter);
    let leave = recorder(&log, EventKind::Leave);
    let mut r = Rollover::with_capabilities(p.doc.clone(), Capabilities::STANDARD_LISTENERS);
    r.set(".card", Some(&enter), Some(&leave));
    assert_eq!(p.doc.listener_count(p.first, EventKind::Enter), 0);

    tour(&p.doc);
    assert_eq!(log.borrow().len(), 4);
}

#[test]
fn records_outlive_disconnection() {
    let p = page(RuntimeFeatures::OLD_GECKO);
    let log = Log::default();
    let enter = recorder(&log, EventKind::Enter);
    let mut r = Rollover::new(p.doc.clone());
    r.set(".card", Some(&enter), None);

    // Once out of the tree the first card no longer resolves, so its record stays.
    p.doc.remove_child(p.doc.root(), p.first).unwrap();
    r.unset(".card", Some(&enter), None);
    assert_eq!(r.registry().len(), 1);
    assert_eq!(r.registry().count_for(&p.first), 1);
    assert_eq!(p.doc.listener_count(p.first, EventKind::Over), 1);

    assert_eq!(r.clear(), 1);
    assert_eq!(p.doc.listener_count(p.first, EventKind::Over), 0);
}

#[test]
fn unparsable_selector_is_a_no_op() {
    let p = page(RuntimeFeatures::OLD_GECKO);
    let log = Log::default();
    let enter = recorder(&log, EventKind::Enter);
    let mut r = Rollover::new(p.doc.clone());
    r.set("div[data-card]", Some(&enter), None);
    r.set(".missing", Some(&enter), None);
    assert!(r.registry().is_empty());
    assert!(p.doc.query_selector_all("div[data-card]").is_err());
}

/// Sets its flag when dropped.
struct DropFlag(Rc<Cell<bool>>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.set(true);
    }
}

#[test]
fn dropping_document_and_engine_releases_callbacks() {
    for features in PROFILES {
        let dropped = Rc::new(Cell::new(false));
        let flag = DropFlag(dropped.clone());
        let cb: Callback<Element> = Callback::new(move |_| {
            let _ = &flag;
        });
        let p = page(features);
        let mut r = Rollover::new(p.doc.clone());
        r.set(".card", Some(&cb), Some(&cb));
        tour(&p.doc);
        drop(r);
        drop(cb);
        drop(p);
        assert!(dropped.get(), "{features:?}");
    }
}
