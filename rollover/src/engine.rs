// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine facade: `set` and `unset` enter/leave callbacks by selector.
//!
//! ## Strategies
//!
//! The strategy is fixed when the engine is built:
//!
//! - **Delegated**: a [`Delegate`] was supplied. Every call is forwarded to it and nothing
//!   else happens.
//! - **Native**: the host fires enter/leave itself. Callbacks are attached as-is.
//! - **Synthesized**: callbacks are wrapped by the [boundary filter](crate::filter),
//!   attached to `over`/`out`, and recorded in the [`Registry`] so `unset` can find the
//!   wrappers again.

use core::fmt::Debug;

use crate::adapter::{Convention, ListenerAdapter};
use crate::filter;
use crate::probe::Capabilities;
use crate::registry::{Registration, Registry};
use crate::types::{Callback, Delegate, EventKind, Host, NoDelegate};

/// Enter/leave normalization over a host.
///
/// ## Usage
///
/// - Build with [`Rollover::new`] to probe the host, [`Rollover::with_capabilities`] to
///   force a strategy, or [`Rollover::with_delegate`] to hand everything to an external
///   event library.
/// - Call [`Rollover::set`] / [`Rollover::unset`] with a selector and optional callbacks.
///   Pass the same [`Callback`] handles to `unset` that were passed to `set`.
/// - Call [`Rollover::clear`] to detach every synthesized listener at once.
///
/// Records of synthesized listeners live as long as the engine unless removed; elements
/// that are never unset keep theirs.
pub struct Rollover<K, H, D = NoDelegate> {
    host: H,
    capabilities: Capabilities,
    adapter: ListenerAdapter<K, H>,
    registry: Registry<K>,
    delegate: Option<D>,
}

impl<K: Debug, H, D> Debug for Rollover<K, H, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Rollover")
            .field("capabilities", &self.capabilities)
            .field("adapter", &self.adapter)
            .field("registry", &self.registry)
            .field("delegated", &self.delegate.is_some())
            .finish_non_exhaustive()
    }
}

impl<K, H> Rollover<K, H, NoDelegate>
where
    K: Clone + PartialEq + Debug + 'static,
    H: Host<K>,
{
    /// Probe `host` and build an engine for it.
    pub fn new(host: H) -> Self {
        let capabilities = Capabilities::probe(&host);
        Self::with_capabilities(host, capabilities)
    }

    /// Build an engine that trusts `capabilities` instead of probing.
    pub fn with_capabilities(host: H, capabilities: Capabilities) -> Self {
        Self::build(host, capabilities, None)
    }
}

impl<K, H, D> Rollover<K, H, D>
where
    K: Clone + PartialEq + Debug + 'static,
    H: Host<K>,
    D: Delegate<K>,
{
    /// Build an engine that forwards every call to `delegate`.
    pub fn with_delegate(host: H, delegate: D) -> Self {
        let capabilities = Capabilities::probe(&host);
        Self::build(host, capabilities, Some(delegate))
    }

    fn build(host: H, capabilities: Capabilities, delegate: Option<D>) -> Self {
        let adapter = ListenerAdapter::select(capabilities);
        tracing::debug!(
            ?capabilities,
            convention = ?adapter.convention(),
            delegated = delegate.is_some(),
            "rollover engine ready"
        );
        Self {
            host,
            capabilities,
            adapter,
            registry: Registry::new(),
            delegate,
        }
    }

    /// Capabilities the engine was built with.
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Listener convention in use.
    pub fn convention(&self) -> Convention {
        self.adapter.convention()
    }

    /// Whether calls are forwarded to a delegate.
    pub fn is_delegated(&self) -> bool {
        self.delegate.is_some()
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Records of synthesized listeners.
    pub fn registry(&self) -> &Registry<K> {
        &self.registry
    }

    /// Attach `enter` and `leave` to every element matching `selector`.
    ///
    /// Absent callbacks are skipped. A selector matching nothing is a no-op.
    pub fn set(
        &mut self,
        selector: &str,
        enter: Option<&Callback<K>>,
        leave: Option<&Callback<K>>,
    ) {
        if enter.is_none() && leave.is_none() {
            return;
        }

        if let Some(delegate) = &self.delegate {
            tracing::trace!(selector, "set via delegate");
            for (kind, cb) in [(EventKind::Enter, enter), (EventKind::Leave, leave)] {
                if let Some(cb) = cb {
                    delegate.on(selector, kind, cb);
                }
            }
            return;
        }

        let elements = self.host.select_all(selector);
        tracing::trace!(selector, matched = elements.len(), "set");

        if self.capabilities.has_native_enter_leave() {
            for element in &elements {
                if let Some(cb) = enter {
                    self.adapter
                        .attach(&self.host, element, EventKind::Enter, cb);
                }
                if let Some(cb) = leave {
                    self.adapter
                        .attach(&self.host, element, EventKind::Leave, cb);
                }
            }
            return;
        }

        for element in elements {
            let synthesized_enter =
                enter.map(|cb| self.synthesize(&element, EventKind::Enter, cb));
            let synthesized_leave =
                leave.map(|cb| self.synthesize(&element, EventKind::Leave, cb));
            self.registry.record(Registration {
                element,
                enter: enter.cloned(),
                leave: leave.cloned(),
                synthesized_enter,
                synthesized_leave,
            });
        }
    }

    /// Detach `enter` and `leave` from every element matching `selector`.
    ///
    /// In the synthesized strategy, each element loses at most one registration: the first
    /// one whose callbacks match `(enter, leave)` exactly. Unmatched calls are no-ops.
    pub fn unset(
        &mut self,
        selector: &str,
        enter: Option<&Callback<K>>,
        leave: Option<&Callback<K>>,
    ) {
        if let Some(delegate) = &self.delegate {
            tracing::trace!(selector, "unset via delegate");
            for (kind, cb) in [(EventKind::Enter, enter), (EventKind::Leave, leave)] {
                if let Some(cb) = cb {
                    delegate.off(selector, kind, cb);
                }
            }
            return;
        }

        let elements = self.host.select_all(selector);
        tracing::trace!(selector, matched = elements.len(), "unset");

        if self.capabilities.has_native_enter_leave() {
            for element in &elements {
                if let Some(cb) = enter {
                    self.adapter
                        .detach(&self.host, element, EventKind::Enter, cb);
                }
                if let Some(cb) = leave {
                    self.adapter
                        .detach(&self.host, element, EventKind::Leave, cb);
                }
            }
            return;
        }

        for element in &elements {
            let Some(index) = self.registry.find(element, enter, leave) else {
                tracing::trace!(?element, "no matching registration");
                continue;
            };
            let record = self.registry.remove(index);
            self.detach_record(&record);
        }
    }

    /// Detach every synthesized listener and empty the registry.
    ///
    /// Returns the number of registrations removed. Native and delegated registrations are
    /// not tracked and are left alone.
    pub fn clear(&mut self) -> usize {
        let Self {
            host,
            adapter,
            registry,
            ..
        } = self;
        let mut removed = 0;
        for record in registry.drain() {
            detach_wrappers(adapter, host, &record);
            removed += 1;
        }
        tracing::debug!(removed, "cleared synthesized listeners");
        removed
    }

    fn synthesize(&self, element: &K, kind: EventKind, cb: &Callback<K>) -> Callback<K> {
        let wrapper = filter::wrap(element.clone(), cb.clone(), self.host.parent_handle());
        self.adapter
            .attach(&self.host, element, kind.bubbling_source(), &wrapper);
        wrapper
    }

    fn detach_record(&self, record: &Registration<K>) {
        detach_wrappers(&self.adapter, &self.host, record);
    }
}

fn detach_wrappers<K: Debug, H: Host<K>>(
    adapter: &ListenerAdapter<K, H>,
    host: &H,
    record: &Registration<K>,
) {
    if let Some(w) = &record.synthesized_enter {
        adapter.detach(host, &record.element, EventKind::Over, w);
    }
    if let Some(w) = &record.synthesized_leave {
        adapter.detach(host, &record.element, EventKind::Out, w);
    }
}
