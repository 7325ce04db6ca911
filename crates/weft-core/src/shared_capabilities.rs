#![forbid(unsafe_code)]

//! Process-wide capability store with atomic replacement.
//!
//! Screen code reads capabilities on every frame, while re-resolution (for
//! example after `TERM` changes) is rare. [`SharedCapabilities`] keeps the
//! current [`CapabilityStore`] behind an [`arc_swap::ArcSwap`]: reads are
//! wait-free and a replacement is one atomic pointer swap, so readers see
//! either the old tables or the new ones, never a mix.
//!
//! # Example
//!
//! ```
//! use weft_core::capability_resolver::{EnvInputs, Resolver, ResolverConfig};
//! use weft_core::shared_capabilities::SharedCapabilities;
//!
//! let resolver = Resolver::new(
//!     ResolverConfig::default().with_system_paths(false),
//!     EnvInputs::default(),
//! );
//! let shared = SharedCapabilities::resolve(&resolver);
//! let before = shared.load();
//!
//! shared.re_resolve(&resolver);
//! assert_eq!(shared.generation(), 1);
//! // Snapshots taken earlier are unaffected.
//! assert!(before.is_terminal("xterm"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;

use crate::capability_resolver::{Resolution, Resolver};
use crate::capability_store::CapabilityStore;

/// Shared, atomically replaceable capability store.
#[derive(Debug)]
pub struct SharedCapabilities {
    inner: ArcSwap<CapabilityStore>,
    generation: AtomicU64,
}

impl SharedCapabilities {
    /// Wrap an existing store.
    #[must_use]
    pub fn new(store: CapabilityStore) -> Self {
        Self {
            inner: ArcSwap::from_pointee(store),
            generation: AtomicU64::new(0),
        }
    }

    /// Run `resolver` and share the result.
    #[must_use]
    pub fn resolve(resolver: &Resolver) -> Self {
        Self::new(resolver.resolve().store)
    }

    /// Snapshot of the current store.
    #[must_use]
    pub fn load(&self) -> Arc<CapabilityStore> {
        self.inner.load_full()
    }

    /// Borrow the current store without touching the reference count.
    ///
    /// Prefer this for short-lived reads on hot paths.
    pub fn load_ref(&self) -> arc_swap::Guard<Arc<CapabilityStore>> {
        self.inner.load()
    }

    /// Replace the current store.
    pub fn replace(&self, store: CapabilityStore) {
        self.inner.store(Arc::new(store));
        self.generation.fetch_add(1, Ordering::Release);
    }

    /// Resolve again and swap the fresh store in.
    ///
    /// Returns the resolution so callers can inspect its source and
    /// diagnostics.
    pub fn re_resolve(&self, resolver: &Resolver) -> Resolution {
        let resolution = resolver.resolve();
        self.replace(resolution.store.clone());
        resolution
    }

    /// Number of replacements since construction.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

impl Default for SharedCapabilities {
    fn default() -> Self {
        Self::new(CapabilityStore::default())
    }
}
