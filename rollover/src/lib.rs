// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=rollover --heading-base-level=0

//! Rollover: uniform, non-bubbling enter/leave hover callbacks for any event host.
//!
//! ## Overview
//!
//! Some event runtimes fire `mouseenter`/`mouseleave` themselves: once per element, when the
//! pointer crosses that element's outer boundary. Others only fire the bubbling
//! `mouseover`/`mouseout` pair, which also fires on an ancestor every time the pointer moves
//! between two of its descendants. This crate gives callers enter/leave semantics on both.
//!
//! ## Components
//!
//! - [`probe`]: one-time detection of native enter/leave support and the listener convention.
//! - [`adapter`]: attach/detach over the standard or legacy listener convention, chosen once.
//! - [`filter`]: wraps a callback so bubbling over/out only reaches it on a real boundary
//!   crossing, decided by walking up from the event's secondary target.
//! - [`registry`]: records of synthesized wrappers, so `unset` can remove what `set` added.
//! - [`engine`]: the [`Rollover`](crate::engine::Rollover) facade with `set`, `unset` and
//!   `clear`.
//!
//! ## Host
//!
//! The engine does not own a tree. It talks to a host through the traits in [`types`]:
//! [`ParentLookup`](crate::types::ParentLookup) for the ancestor walk,
//! [`SelectorResolver`](crate::types::SelectorResolver) to turn selectors into elements,
//! [`ListenerHost`](crate::types::ListenerHost) to register listeners, and
//! [`FeatureProbe`](crate::types::FeatureProbe) for capability detection, and
//! [`ParentHandle`](crate::types::ParentHandle) for the lookup captured by filter wrappers.
//! `rollover_dom` provides an in-memory document implementing all of them.
//!
//! ## Identity
//!
//! Callbacks are [`Callback`](crate::types::Callback) handles compared by identity.
//! Keep the handle you pass to `set` and pass a clone of it to `unset`.
//!
//! ## Strategy sketch
//!
//! ```no_run
//! use rollover::engine::Rollover;
//! use rollover::types::{Callback, Host};
//!
//! fn highlight<K, H>(host: H, on: Callback<K>, off: Callback<K>)
//! where
//!     K: Clone + PartialEq + core::fmt::Debug + 'static,
//!     H: Host<K>,
//! {
//!     let mut rollover = Rollover::new(host);
//!     rollover.set(".card", Some(&on), Some(&off));
//!     // ... later
//!     rollover.unset(".card", Some(&on), Some(&off));
//! }
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapter;
pub mod engine;
pub mod filter;
pub mod probe;
pub mod registry;
pub mod types;
