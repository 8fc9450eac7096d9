//! Contract between the sticky subsystem and the layout host.
//!
//! The host owns the layout: it enumerates leaf regions, stores per-region
//! parameters, allocates and deletes regions, and reports geometry. The
//! sticky subsystem never mutates layout structure itself; it only reads
//! host state and issues requests through [`LayoutHost`].
//!
//! Interception of host commands is expressed as a hook registry with
//! set-membership semantics: installing an already installed hook or
//! removing an absent one is a no-op.

use serde::Serialize;

use super::error::HostResult;
use super::state::{Axis, RegionId, Side};

// ============================================================================
// Region Parameters
// ============================================================================

/// Keys of the region-scoped parameters written by the sticky subsystem.
///
/// The host stores them opaquely; only [`ParamKey::NoDeleteOthers`] and
/// [`ParamKey::Dedicated`] are expected to change host behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamKey {
    /// Classification flag.
    Sticky,
    /// Side the region is anchored to.
    StickySide,
    /// Configured size (ratio or absolute).
    StickySize,
    /// Excludes the region from collapse-to-one.
    NoDeleteOthers,
    /// Keeps other content from replacing the region's content.
    Dedicated,
}

impl ParamKey {
    /// Returns the parameter name as stored by hosts that key by string.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sticky => "sticky",
            Self::StickySide => "sticky-side",
            Self::StickySize => "sticky-size",
            Self::NoDeleteOthers => "no-delete-other-windows",
            Self::Dedicated => "dedicated",
        }
    }

    /// Returns the parameters that exist only while a region is sticky.
    #[must_use]
    pub const fn sticky_fields() -> &'static [Self] {
        &[Self::Sticky, Self::StickySide, Self::StickySize, Self::NoDeleteOthers]
    }
}

/// Value stored under a [`ParamKey`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    /// Boolean flag.
    Bool(bool),
    /// Frame side.
    Side(Side),
    /// Numeric size.
    Size(f64),
}

impl ParamValue {
    /// Returns the flag if this is a boolean value.
    #[must_use]
    pub const fn as_bool(self) -> Option<bool> {
        if let Self::Bool(flag) = self { Some(flag) } else { None }
    }

    /// Returns the side if this is a side value.
    #[must_use]
    pub const fn as_side(self) -> Option<Side> {
        if let Self::Side(side) = self { Some(side) } else { None }
    }

    /// Returns the number if this is a size value.
    #[must_use]
    pub const fn as_size(self) -> Option<f64> {
        if let Self::Size(size) = self { Some(size) } else { None }
    }
}

// ============================================================================
// Hooks and Messages
// ============================================================================

/// Interceptors and subscriptions the sticky subsystem installs on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Hook {
    /// Runs before the host's "delete other regions" command.
    CollapseGuard,
    /// Wraps the host's "delete region" command and may veto it.
    RemoveGuard,
    /// Subscription to the layout geometry change stream.
    LayoutReconciler,
}

impl Hook {
    /// Every hook the lifecycle controller manages.
    pub const ALL: [Self; 3] = [Self::CollapseGuard, Self::RemoveGuard, Self::LayoutReconciler];
}

/// Severity of a user-visible host message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    /// Informational notice (for example a refused deletion).
    Notice,
    /// Non-fatal warning (for example a failed reconciliation).
    Warning,
}

// ============================================================================
// Host Trait
// ============================================================================

/// The layout engine the sticky subsystem is attached to.
///
/// All methods are synchronous and are called from the host's event loop;
/// the host serialises access by handing out `&mut self`.
pub trait LayoutHost {
    /// Host-defined reference to the content displayed in a region.
    type Content;

    /// Returns the live leaf regions in the host's enumeration order.
    fn regions(&self) -> Vec<RegionId>;

    /// Returns whether the handle refers to a live region.
    fn is_live(&self, region: RegionId) -> bool;

    /// Returns the currently selected (active) region.
    fn selected_region(&self) -> Option<RegionId>;

    /// Makes the given region the selected one.
    ///
    /// # Errors
    ///
    /// Returns an error if the region is not live.
    fn select_region(&mut self, region: RegionId) -> HostResult<()>;

    /// Reads a region parameter. Returns `None` for unset parameters and
    /// dead regions.
    fn region_param(&self, region: RegionId, key: ParamKey) -> Option<ParamValue>;

    /// Writes a region parameter. `None` clears it.
    ///
    /// # Errors
    ///
    /// Returns an error if the region is not live.
    fn set_region_param(
        &mut self,
        region: RegionId,
        key: ParamKey,
        value: Option<ParamValue>,
    ) -> HostResult<()>;

    /// Allocates a new leaf region at the given frame side, `extent` units
    /// along the side's axis, displaying `content`.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot fit the region.
    fn allocate_region(
        &mut self,
        content: Self::Content,
        side: Side,
        extent: u32,
    ) -> HostResult<RegionId>;

    /// Returns the frame size along the axis.
    fn frame_size(&self, axis: Axis) -> u32;

    /// Returns a region's size along the axis, or `None` for dead regions.
    fn region_size(&self, region: RegionId, axis: Axis) -> Option<u32>;

    /// Grows (positive `delta`) or shrinks (negative `delta`) a region along
    /// the axis.
    ///
    /// # Errors
    ///
    /// Returns an error if the region cannot be resized by that amount.
    fn resize_region(&mut self, region: RegionId, axis: Axis, delta: i64) -> HostResult<()>;

    /// Deletes every region except the selected one and those marked with
    /// [`ParamKey::NoDeleteOthers`].
    ///
    /// # Errors
    ///
    /// Returns an error if there is no selected region.
    fn delete_other_regions(&mut self) -> HostResult<()>;

    /// Deletes a single region.
    ///
    /// # Errors
    ///
    /// Returns an error if the region is not live or is the sole region.
    fn delete_region(&mut self, region: RegionId) -> HostResult<()>;

    /// Adds a hook to the registry. Returns `true` if it was not installed.
    fn install_hook(&mut self, hook: Hook) -> bool;

    /// Removes a hook from the registry. Returns `true` if it was installed.
    fn remove_hook(&mut self, hook: Hook) -> bool;

    /// Returns whether a hook is installed.
    fn hook_installed(&self, hook: Hook) -> bool;

    /// Consumes the pending "layout geometry changed" signal, if any.
    fn take_layout_change(&mut self) -> bool;

    /// Shows a transient user-visible message.
    fn message(&mut self, level: MessageLevel, text: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_value_accessors() {
        assert_eq!(ParamValue::Bool(true).as_bool(), Some(true));
        assert_eq!(ParamValue::Bool(true).as_side(), None);
        assert_eq!(ParamValue::Side(Side::Top).as_side(), Some(Side::Top));
        assert_eq!(ParamValue::Size(0.3).as_size(), Some(0.3));
        assert_eq!(ParamValue::Size(0.3).as_bool(), None);
    }

    #[test]
    fn test_param_key_names() {
        assert_eq!(ParamKey::NoDeleteOthers.name(), "no-delete-other-windows");
        assert_eq!(ParamKey::Sticky.name(), "sticky");
        assert!(!ParamKey::sticky_fields().contains(&ParamKey::Dedicated));
    }

    #[test]
    fn test_hook_all_is_distinct() {
        let mut hooks = Hook::ALL.to_vec();
        hooks.sort();
        hooks.dedup();
        assert_eq!(hooks.len(), Hook::ALL.len());
    }
}
