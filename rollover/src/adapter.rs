// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener adapter: one attach/detach pair over either listener convention.

use core::fmt::Debug;

use crate::probe::Capabilities;
use crate::types::{Callback, EventKind, ListenerHost};

/// Listener registration convention offered by a host.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Convention {
    /// `add_event_listener` / `remove_event_listener` keyed by event name.
    Standard,
    /// `attach_event` / `detach_event` keyed by `"on" + name`.
    Legacy,
}

type Transport<K, H> = fn(&H, &K, EventKind, &Callback<K>);

/// Attach/detach primitives bound to one [`Convention`].
///
/// The convention is chosen once by [`ListenerAdapter::select`]; afterwards callers go
/// through [`attach`](Self::attach) and [`detach`](Self::detach) without branching.
pub struct ListenerAdapter<K, H> {
    convention: Convention,
    attach: Transport<K, H>,
    detach: Transport<K, H>,
}

impl<K, H> Clone for ListenerAdapter<K, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, H> Copy for ListenerAdapter<K, H> {}

impl<K, H> Debug for ListenerAdapter<K, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListenerAdapter")
            .field("convention", &self.convention)
            .finish_non_exhaustive()
    }
}

impl<K: Debug, H: ListenerHost<K>> ListenerAdapter<K, H> {
    /// Pick the standard convention when the host has it, otherwise the legacy one.
    pub fn select(caps: Capabilities) -> Self {
        if caps.contains(Capabilities::STANDARD_LISTENERS) {
            Self::standard()
        } else {
            Self::legacy()
        }
    }

    /// Adapter using `add_event_listener` / `remove_event_listener`.
    pub fn standard() -> Self {
        Self {
            convention: Convention::Standard,
            attach: standard_attach,
            detach: standard_detach,
        }
    }

    /// Adapter using `attach_event` / `detach_event`.
    pub fn legacy() -> Self {
        Self {
            convention: Convention::Legacy,
            attach: legacy_attach,
            detach: legacy_detach,
        }
    }

    /// The convention this adapter was built for.
    pub fn convention(&self) -> Convention {
        self.convention
    }

    /// Register `handler` for `kind` on `target`.
    pub fn attach(&self, host: &H, target: &K, kind: EventKind, handler: &Callback<K>) {
        tracing::trace!(?target, event = kind.name(), ?handler, "attach");
        (self.attach)(host, target, kind, handler);
    }

    /// Remove `handler` for `kind` from `target`.
    pub fn detach(&self, host: &H, target: &K, kind: EventKind, handler: &Callback<K>) {
        tracing::trace!(?target, event = kind.name(), ?handler, "detach");
        (self.detach)(host, target, kind, handler);
    }
}

fn standard_attach<K, H: ListenerHost<K>>(
    host: &H,
    target: &K,
    kind: EventKind,
    handler: &Callback<K>,
) {
    host.add_event_listener(target, kind, handler);
}

fn standard_detach<K, H: ListenerHost<K>>(
    host: &H,
    target: &K,
    kind: EventKind,
    handler: &Callback<K>,
) {
    host.remove_event_listener(target, kind, handler);
}

fn legacy_attach<K, H: ListenerHost<K>>(
    host: &H,
    target: &K,
    kind: EventKind,
    handler: &Callback<K>,
) {
    if !host.attach_event(target, kind.handler_property(), handler) {
        tracing::debug!(
            property = kind.handler_property(),
            "host rejected legacy listener"
        );
    }
}

fn legacy_detach<K, H: ListenerHost<K>>(
    host: &H,
    target: &K,
    kind: EventKind,
    handler: &Callback<K>,
) {
    host.detach_event(target, kind.handler_property(), handler);
}
