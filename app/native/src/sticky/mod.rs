//! Sticky regions for a window layout.
//!
//! A sticky region is a leaf region anchored to one side of the frame that:
//!
//! - survives "delete other regions" (it is marked `NoDeleteOthers`),
//! - never lets the last non-sticky region be deleted,
//! - is brought back to its configured size after every layout change.
//!
//! # Components
//!
//! - [`registry`]: sticky / non-sticky classification queries
//! - [`factory`]: creation of sticky regions
//! - [`reconciler`]: size restoration on layout changes
//! - [`guard`]: collapse redirection and deletion veto
//! - [`lifecycle`]: enable/disable switch installing the hooks
//!
//! The layout itself belongs to the host and is reached only through
//! [`LayoutHost`]. [`StickyWindows`] ties the components to one host and
//! routes the host's delete commands through whichever guards are installed.
//!
//! # Example
//!
//! ```rust
//! use sticky_windows::sim::MemoryLayout;
//! use sticky_windows::sticky::{Side, StickyWindows};
//!
//! let mut sticky = StickyWindows::new(MemoryLayout::new(160, 48));
//! sticky.set_enabled(true);
//!
//! let log = sticky.create_sticky("*log*".to_string(), Side::Bottom, Some(12.0)).unwrap();
//! assert!(sticky.is_sticky(log));
//! assert_eq!(sticky.sticky_regions(), vec![log]);
//! ```

pub mod error;
pub mod factory;
pub mod guard;
pub mod host;
pub mod lifecycle;
pub mod reconciler;
pub mod registry;
pub mod state;

pub use error::{HostError, HostResult, StickyError, StickyResult};
pub use guard::{CollapsePlan, DELETION_REFUSED_NOTICE, RemoveDecision, RemoveOutcome};
pub use host::{Hook, LayoutHost, MessageLevel, ParamKey, ParamValue};
pub use lifecycle::{Lifecycle, LifecycleState};
pub use reconciler::{ReconcileReport, RegionOutcome};
pub use state::{Axis, PinSize, PinSpec, RegionId, Side};

use crate::config::StickyConfig;

/// The sticky subsystem attached to one layout host.
///
/// Owns the host, the lifecycle state and the configuration. All methods
/// run synchronously to completion; exclusive access through `&mut self`
/// takes the place of locking.
#[derive(Debug)]
pub struct StickyWindows<H: LayoutHost> {
    host: H,
    lifecycle: Lifecycle,
    config: StickyConfig,
}

impl<H: LayoutHost> StickyWindows<H> {
    /// Attaches a disabled sticky subsystem with the default configuration.
    #[must_use]
    pub fn new(host: H) -> Self { Self::with_config(host, StickyConfig::default()) }

    /// Attaches a disabled sticky subsystem with the given configuration.
    #[must_use]
    pub fn with_config(host: H, config: StickyConfig) -> Self {
        Self {
            host,
            lifecycle: Lifecycle::new(),
            config,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Returns the host.
    #[must_use]
    pub const fn host(&self) -> &H { &self.host }

    /// Returns the host mutably.
    ///
    /// Commands issued directly on the host bypass the guards; call
    /// [`handle_layout_change`](Self::handle_layout_change) afterwards to
    /// let the reconciler react.
    pub const fn host_mut(&mut self) -> &mut H { &mut self.host }

    /// Detaches the subsystem, returning the host.
    ///
    /// Installed hooks are left in place.
    #[must_use]
    pub fn into_host(self) -> H { self.host }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &StickyConfig { &self.config }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Returns whether the subsystem is enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool { self.lifecycle.is_enabled() }

    /// Enables or disables the subsystem.
    ///
    /// Returns `true` if the state changed.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        self.lifecycle.set_enabled(&mut self.host, enabled)
    }

    /// Flips the enabled state.
    pub fn toggle(&mut self) -> LifecycleState { self.lifecycle.toggle(&mut self.host) }

    // ========================================================================
    // Registry
    // ========================================================================

    /// Returns whether the region is sticky.
    #[must_use]
    pub fn is_sticky(&self, region: RegionId) -> bool { registry::is_sticky(&self.host, region) }

    /// Returns the live sticky regions.
    #[must_use]
    pub fn sticky_regions(&self) -> Vec<RegionId> { registry::sticky_regions(&self.host) }

    /// Returns the live non-sticky regions.
    #[must_use]
    pub fn non_sticky_regions(&self) -> Vec<RegionId> { registry::non_sticky_regions(&self.host) }

    /// Returns the first non-sticky region.
    #[must_use]
    pub fn first_non_sticky(&self) -> Option<RegionId> { registry::first_non_sticky(&self.host) }

    /// Returns the placement of a sticky region.
    #[must_use]
    pub fn pin_spec(&self, region: RegionId) -> Option<PinSpec> {
        registry::pin_spec(&self.host, region)
    }

    // ========================================================================
    // Sticky Regions
    // ========================================================================

    /// Creates a sticky region at `side` of the frame.
    ///
    /// `size` defaults to the configured default size.
    ///
    /// # Errors
    ///
    /// See [`factory::create_sticky`].
    pub fn create_sticky(
        &mut self,
        content: H::Content,
        side: Side,
        size: Option<f64>,
    ) -> StickyResult<RegionId> {
        factory::create_sticky(&mut self.host, content, side, size, self.config.default_size)
    }

    /// Turns a sticky region back into a regular one.
    ///
    /// The region stays where it is; it just stops being protected and
    /// resized.
    ///
    /// # Errors
    ///
    /// Returns [`StickyError::NotSticky`] if the region is not sticky.
    pub fn unstick(&mut self, region: RegionId) -> StickyResult<()> {
        if !self.is_sticky(region) {
            return Err(StickyError::NotSticky(region));
        }
        factory::clear_sticky_params(&mut self.host, region)?;
        tracing::debug!(region = %region, "sticky: region unstuck");
        Ok(())
    }

    /// Changes the configured size of a sticky region and applies it.
    ///
    /// # Errors
    ///
    /// Returns [`StickyError::InvalidArgument`] for a non-positive size and
    /// [`StickyError::NotSticky`] if the region is not sticky.
    pub fn set_sticky_size(&mut self, region: RegionId, size: f64) -> StickyResult<ReconcileReport> {
        let size = PinSize::new(size)?;
        if !self.is_sticky(region) {
            return Err(StickyError::NotSticky(region));
        }
        self.host.set_region_param(
            region,
            ParamKey::StickySize,
            Some(ParamValue::Size(size.value())),
        )?;
        Ok(self.reconcile())
    }

    /// Runs one reconciliation pass regardless of hook state.
    pub fn reconcile(&mut self) -> ReconcileReport { reconciler::reconcile_all(&mut self.host) }

    // ========================================================================
    // Host Commands
    // ========================================================================

    /// Runs the host's "delete other regions" command.
    ///
    /// With the collapse guard installed, selection is moved off a sticky
    /// region first.
    ///
    /// # Errors
    ///
    /// Returns an error if the host command fails.
    pub fn delete_other_regions(&mut self) -> StickyResult<CollapsePlan> {
        let plan = if self.host.hook_installed(Hook::CollapseGuard) {
            guard::before_collapse(&mut self.host)?
        } else {
            CollapsePlan::Proceed
        };
        self.host.delete_other_regions()?;
        self.handle_layout_change();
        Ok(plan)
    }

    /// Runs the host's "delete region" command on `target`, or on the
    /// selected region when `target` is `None`.
    ///
    /// With the remove guard installed, deleting the last non-sticky region
    /// is refused.
    ///
    /// # Errors
    ///
    /// Returns an error if there is nothing to delete or the host fails.
    pub fn delete_region(&mut self, target: Option<RegionId>) -> StickyResult<RemoveOutcome> {
        let outcome = if self.host.hook_installed(Hook::RemoveGuard) {
            guard::around_remove(&mut self.host, target, |host, region| host.delete_region(region))?
        } else {
            let Some(region) = target.or_else(|| self.host.selected_region()) else {
                return Err(HostError::unsupported("no region to delete").into());
            };
            self.host.delete_region(region)?;
            RemoveOutcome::Removed(region)
        };

        if !outcome.is_refused() {
            self.handle_layout_change();
        }
        Ok(outcome)
    }

    /// Delivers pending layout change signals to the reconciler.
    ///
    /// Returns the report of the pass, or `None` if nothing changed or the
    /// reconciler is not subscribed. Changes caused by the pass itself are
    /// absorbed, since a second pass would find nothing to do.
    pub fn handle_layout_change(&mut self) -> Option<ReconcileReport> {
        if !self.host.take_layout_change() {
            return None;
        }
        if !self.host.hook_installed(Hook::LayoutReconciler) {
            return None;
        }

        let report = reconciler::reconcile_all(&mut self.host);
        let _ = self.host.take_layout_change();
        Some(report)
    }
}
