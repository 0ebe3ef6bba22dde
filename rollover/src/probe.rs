// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capability probe: what the host's event model supports.
//!
//! The engine probes once when it is built and keeps the result for its lifetime.
//! Use [`Rollover::with_capabilities`](crate::engine::Rollover::with_capabilities) to skip
//! the probe and force a strategy.

use crate::types::{EventKind, FeatureProbe};

bitflags::bitflags! {
    /// Host capabilities relevant to hover normalization.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// The host fires non-bubbling enter/leave events itself.
        const NATIVE_ENTER_LEAVE = 0b0000_0001;
        /// The host offers the standard listener convention.
        const STANDARD_LISTENERS = 0b0000_0010;
    }
}

impl Capabilities {
    /// Detect capabilities of `host`.
    ///
    /// Native enter/leave support is checked on the global scope and, independently, on a
    /// throwaway element, since some runtimes only expose the handler on elements.
    pub fn probe<P: FeatureProbe + ?Sized>(host: &P) -> Self {
        let property = EventKind::Leave.handler_property();
        let mut caps = Self::empty();
        if host.global_has(property) || host.element_has(property) {
            caps |= Self::NATIVE_ENTER_LEAVE;
        }
        if host.has_add_event_listener() {
            caps |= Self::STANDARD_LISTENERS;
        }
        tracing::debug!(?caps, "probed host capabilities");
        caps
    }

    /// Whether enter/leave can be attached directly.
    #[inline]
    pub fn has_native_enter_leave(self) -> bool {
        self.contains(Self::NATIVE_ENTER_LEAVE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        global: bool,
        element: bool,
        standard: bool,
    }

    impl FeatureProbe for Probe {
        fn global_has(&self, property: &str) -> bool {
            self.global && property == "onmouseleave"
        }
        fn element_has(&self, property: &str) -> bool {
            self.element && property == "onmouseleave"
        }
        fn has_add_event_listener(&self) -> bool {
            self.standard
        }
    }

    #[test]
    fn modern_host_has_everything() {
        let caps = Capabilities::probe(&Probe {
            global: true,
            element: true,
            standard: true,
        });
        assert_eq!(caps, Capabilities::all());
    }

    #[test]
    fn element_only_support_counts_as_native() {
        let caps = Capabilities::probe(&Probe {
            global: false,
            element: true,
            standard: false,
        });
        assert!(caps.has_native_enter_leave());
        assert!(!caps.contains(Capabilities::STANDARD_LISTENERS));
    }

    #[test]
    fn global_only_support_counts_as_native() {
        let caps = Capabilities::probe(&Probe {
            global: true,
            element: false,
            standard: true,
        });
        assert!(caps.has_native_enter_leave());
    }

    #[test]
    fn no_handler_property_means_synthesis() {
        let caps = Capabilities::probe(&Probe {
            global: false,
            element: false,
            standard: true,
        });
        assert_eq!(caps, Capabilities::STANDARD_LISTENERS);
        assert!(!caps.has_native_enter_leave());
    }
}
