// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use rollover::engine::Rollover;
use rollover::filter::is_boundary_crossing;
use rollover::probe::Capabilities;
use rollover::types::{Callback, ParentLookup};
use rollover_dom::{Document, Element, RuntimeFeatures};

/// A single chain: the parent of `n` is `n - 1`, and `0` is the root.
struct Chain;

impl ParentLookup<u32> for Chain {
    fn parent_of(&self, node: &u32) -> Option<u32> {
        node.checked_sub(1)
    }
}

/// `cols * rows` cards on a grid, each holding `depth` nested boxes.
fn card_grid(features: RuntimeFeatures, cols: usize, rows: usize, depth: usize) -> Document {
    let doc = Document::new(features);
    let cell = 100.0;
    let body = doc.root();
    let _ = doc.set_bounds(
        body,
        Rect::new(0.0, 0.0, cols as f64 * cell, rows as f64 * cell),
    );
    for y in 0..rows {
        for x in 0..cols {
            let r = Rect::from_origin_size((x as f64 * cell, y as f64 * cell), (cell, cell));
            let card = doc.create_element("div");
            let _ = doc.add_class(card, "card");
            let _ = doc.set_bounds(card, r);
            let _ = doc.append_child(body, card);
            let mut parent = card;
            for d in 1..=depth {
                let inset = d as f64 * 4.0;
                let child = doc.create_element("span");
                let _ = doc.set_bounds(child, r.inset(-inset));
                let _ = doc.append_child(parent, child);
                parent = child;
            }
        }
    }
    doc
}

/// Pointer positions that cross every card boundary and every nested box.
fn sweep(cols: usize, rows: usize, depth: usize) -> Vec<Point> {
    let mut out = Vec::new();
    for y in 0..rows {
        let cy = y as f64 * 100.0 + 50.0;
        for x in 0..cols {
            let x0 = x as f64 * 100.0;
            out.push(Point::new(x0 + 1.0, cy));
            for d in 1..=depth {
                out.push(Point::new(x0 + d as f64 * 4.0 + 1.0, cy));
            }
        }
    }
    out
}

fn bench_boundary_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("boundary_walk");
    for &depth in &[8_u32, 64, 512] {
        group.bench_function(format!("inside_depth{depth}"), |b| {
            b.iter(|| black_box(is_boundary_crossing(&Chain, &0, Some(&depth))));
        });
        group.bench_function(format!("outside_depth{depth}"), |b| {
            b.iter(|| black_box(is_boundary_crossing(&Chain, &(depth + 1), Some(&depth))));
        });
    }
    group.finish();
}

fn bench_pointer_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("pointer_sweep");
    let (cols, rows, depth) = (16, 8, 4);
    let points = sweep(cols, rows, depth);
    group.throughput(Throughput::Elements(points.len() as u64));
    for (name, features) in [
        ("native", RuntimeFeatures::MODERN),
        ("synthesized", RuntimeFeatures::OLD_GECKO),
        ("synthesized_legacy", RuntimeFeatures::ATTACH_EVENT),
    ] {
        let doc = card_grid(features, cols, rows, depth);
        let hits = std::rc::Rc::new(std::cell::Cell::new(0_u64));
        let h = hits.clone();
        let on: Callback<Element> = Callback::new(move |_| h.set(h.get() + 1));
        let off = on.clone();
        let mut rollover = Rollover::new(doc.clone());
        rollover.set(".card", Some(&on), Some(&off));
        group.bench_function(name, |b| {
            b.iter(|| {
                for p in &points {
                    black_box(doc.pointer_move(*p));
                }
                let _ = doc.pointer_exit();
            });
        });
        black_box(hits.get());
    }
    group.finish();
}

fn bench_set_unset(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_unset");
    for &(cols, rows) in &[(8_usize, 8_usize), (32, 32)] {
        let doc = card_grid(RuntimeFeatures::OLD_GECKO, cols, rows, 1);
        group.throughput(Throughput::Elements((cols * rows) as u64));
        group.bench_function(format!("cards{}", cols * rows), |b| {
            b.iter_batched(
                || {
                    (
                        Rollover::with_capabilities(
                            doc.clone(),
                            Capabilities::STANDARD_LISTENERS,
                        ),
                        Callback::<Element>::new(|_| {}),
                    )
                },
                |(mut rollover, cb)| {
                    rollover.set(".card", Some(&cb), Some(&cb));
                    rollover.unset(".card", Some(&cb), Some(&cb));
                    black_box(rollover.registry().len());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_boundary_walk,
    bench_pointer_sweep,
    bench_set_unset
);
criterion_main!(benches);
