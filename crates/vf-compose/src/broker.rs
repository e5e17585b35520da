//! Two-phase propagation of the late-bound raster handle
//!
//! The raster surface's handle is only knowable after the surface has
//! been mounted, but downstream collaborators need it during the same
//! logical render. The broker breaks that cycle with two slots: the
//! handle requested at construction time and the handle published into
//! render-visible state. Reconciliation happens once per pass, after
//! commit, and is idempotent, so a stable handle produces zero further
//! updates.

use tracing::debug;

use vf_core::raster::CanvasHandle;

/// Reconciles the requested and published canvas handles across passes
#[derive(Debug, Default)]
pub struct CanvasContextBroker {
    requested: Option<CanvasHandle>,
    published: Option<CanvasHandle>,
}

impl CanvasContextBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the handle known at surface-construction time
    pub fn request_handle(&mut self, candidate: Option<CanvasHandle>) {
        self.requested = candidate;
    }

    /// The handle visible to collaborators on this pass
    pub fn published(&self) -> Option<CanvasHandle> {
        self.published.clone()
    }

    /// Post-commit reconciliation. Publishes the requested handle when
    /// its identity differs from the published one and returns true,
    /// signalling exactly one additional render pass. Equal identities
    /// produce no update.
    pub fn commit(&mut self) -> bool {
        if CanvasHandle::same_identity_opt(self.requested.as_ref(), self.published.as_ref()) {
            return false;
        }
        self.published = self.requested.clone();
        debug!(mounted = self.published.is_some(), "canvas handle published");
        true
    }
}
