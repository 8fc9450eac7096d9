//! Deletion guard.
//!
//! Two host commands are intercepted:
//!
//! - **Collapse** ("delete other regions") keeps only the selected region and
//!   regions marked `NoDeleteOthers`. If a sticky region is selected, every
//!   non-sticky region would be lost, so selection is first moved to a
//!   non-sticky region.
//! - **Remove** ("delete region") is vetoed when it would delete the last
//!   non-sticky region.
//!
//! Each guard is a pure decision over host state plus a thin wrapper that
//! applies it around the host primitive.

use super::error::{HostResult, StickyResult};
use super::host::{LayoutHost, MessageLevel};
use super::registry::{first_non_sticky, is_sticky, non_sticky_regions};
use super::state::RegionId;

/// Notice shown when a deletion is refused.
pub const DELETION_REFUSED_NOTICE: &str = "Cannot delete the last unpinned region";

// ============================================================================
// Collapse Guard
// ============================================================================

/// What to do before the host collapses the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapsePlan {
    /// Let the collapse run against the current selection.
    Proceed,
    /// Select this non-sticky region first so it survives the collapse.
    Redirect(RegionId),
}

/// Decides whether the selection must move before a collapse.
#[must_use]
pub fn plan_collapse<H: LayoutHost + ?Sized>(host: &H) -> CollapsePlan {
    let Some(selected) = host.selected_region() else {
        return CollapsePlan::Proceed;
    };

    if !is_sticky(host, selected) {
        return CollapsePlan::Proceed;
    }

    first_non_sticky(host).map_or(CollapsePlan::Proceed, CollapsePlan::Redirect)
}

/// Runs the collapse guard, moving the selection when needed.
///
/// Returns the plan that was applied.
///
/// # Errors
///
/// Returns an error if the host refuses to select the redirect target.
pub fn before_collapse<H: LayoutHost + ?Sized>(host: &mut H) -> HostResult<CollapsePlan> {
    let plan = plan_collapse(host);
    if let CollapsePlan::Redirect(target) = plan {
        tracing::debug!(target = %target, "sticky: redirecting selection before collapse");
        host.select_region(target)?;
    }
    Ok(plan)
}

// ============================================================================
// Remove Guard
// ============================================================================

/// Verdict on a single-region removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveDecision {
    /// Delete the region.
    Proceed(RegionId),
    /// Refuse: the region is the last non-sticky one.
    Veto(RegionId),
}

/// Outcome of a guarded removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The region was deleted.
    Removed(RegionId),
    /// The deletion was refused and no host request was made.
    Refused(RegionId),
}

impl RemoveOutcome {
    /// Returns `true` if the removal was refused.
    #[must_use]
    pub const fn is_refused(self) -> bool { matches!(self, Self::Refused(_)) }
}

/// Decides whether removing `target` is allowed.
///
/// Only a non-sticky target that is the single remaining non-sticky region
/// is vetoed. Sticky targets are never vetoed here; they rely on the host's
/// own protection.
#[must_use]
pub fn check_remove<H: LayoutHost + ?Sized>(host: &H, target: RegionId) -> RemoveDecision {
    if is_sticky(host, target) {
        return RemoveDecision::Proceed(target);
    }

    match non_sticky_regions(host).as_slice() {
        [only] if *only == target => RemoveDecision::Veto(target),
        _ => RemoveDecision::Proceed(target),
    }
}

/// Runs `proceed` around the remove guard.
///
/// `target` defaults to the selected region. On veto a notice is shown and
/// `proceed` is not called. Otherwise `proceed` receives the original target.
///
/// # Errors
///
/// Returns [`StickyError::Host`](super::error::StickyError::Host) if there is
/// no target or `proceed` fails.
pub fn around_remove<H, F>(
    host: &mut H,
    target: Option<RegionId>,
    proceed: F,
) -> StickyResult<RemoveOutcome>
where
    H: LayoutHost + ?Sized,
    F: FnOnce(&mut H, RegionId) -> HostResult<()>,
{
    let Some(target) = target.or_else(|| host.selected_region()) else {
        return Err(super::error::HostError::unsupported("no region to delete").into());
    };

    match check_remove(host, target) {
        RemoveDecision::Veto(region) => {
            tracing::warn!(region = %region, "sticky: refused to delete last unpinned region");
            host.message(MessageLevel::Notice, DELETION_REFUSED_NOTICE);
            Ok(RemoveOutcome::Refused(region))
        }
        RemoveDecision::Proceed(region) => {
            proceed(host, region)?;
            Ok(RemoveOutcome::Removed(region))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::MemoryLayout;
    use crate::sticky::factory::create_sticky;
    use crate::sticky::state::Side;

    /// Builds {A sticky, B} and returns (layout, a, b).
    fn sticky_and_one() -> (MemoryLayout, RegionId, RegionId) {
        let mut layout = MemoryLayout::new(120, 40);
        let b = layout.regions()[0];
        let a = create_sticky(&mut layout, "*a*".into(), Side::Left, Some(0.25), 0.3).unwrap();
        (layout, a, b)
    }

    #[test]
    fn test_plan_collapse_proceeds_when_selection_not_sticky() {
        let (layout, _, b) = sticky_and_one();
        assert_eq!(layout.selected_region(), Some(b));
        assert_eq!(plan_collapse(&layout), CollapsePlan::Proceed);
    }

    #[test]
    fn test_plan_collapse_redirects_from_sticky() {
        let (mut layout, a, b) = sticky_and_one();
        layout.select_region(a).unwrap();
        assert_eq!(plan_collapse(&layout), CollapsePlan::Redirect(b));

        let plan = before_collapse(&mut layout).unwrap();
        assert_eq!(plan, CollapsePlan::Redirect(b));
        assert_eq!(layout.selected_region(), Some(b));
    }

    #[test]
    fn test_plan_collapse_without_unpinned_is_noop() {
        let mut layout = MemoryLayout::new(120, 40);
        let root = layout.regions()[0];
        crate::sticky::factory::write_sticky_params(
            &mut layout,
            root,
            crate::sticky::state::PinSpec::new(
                Side::Left,
                crate::sticky::state::PinSize::new(0.5).unwrap(),
            ),
        )
        .unwrap();
        assert_eq!(plan_collapse(&layout), CollapsePlan::Proceed);
        assert_eq!(before_collapse(&mut layout).unwrap(), CollapsePlan::Proceed);
        assert_eq!(layout.selected_region(), Some(root));
    }

    #[test]
    fn test_check_remove_vetoes_last_unpinned() {
        let (layout, a, b) = sticky_and_one();
        assert_eq!(check_remove(&layout, b), RemoveDecision::Veto(b));
        assert_eq!(check_remove(&layout, a), RemoveDecision::Proceed(a));
    }

    #[test]
    fn test_check_remove_allows_with_two_unpinned() {
        let (mut layout, _, b) = sticky_and_one();
        let c = layout.split_region(b).unwrap();
        assert_eq!(check_remove(&layout, b), RemoveDecision::Proceed(b));
        assert_eq!(check_remove(&layout, c), RemoveDecision::Proceed(c));
    }

    #[test]
    fn test_around_remove_refuses_without_host_call() {
        let (mut layout, a, b) = sticky_and_one();
        let mut called = false;
        let outcome = around_remove(&mut layout, Some(b), |_, _| {
            called = true;
            Ok(())
        })
        .unwrap();

        assert_eq!(outcome, RemoveOutcome::Refused(b));
        assert!(outcome.is_refused());
        assert!(!called);
        assert_eq!(layout.regions().len(), 2);
        assert!(layout.regions().contains(&a));
        assert_eq!(
            layout.messages().last().map(|(_, text)| text.as_str()),
            Some(DELETION_REFUSED_NOTICE)
        );
    }

    #[test]
    fn test_around_remove_defaults_to_selected() {
        let (mut layout, _, b) = sticky_and_one();
        let c = layout.split_region(b).unwrap();
        layout.select_region(c).unwrap();

        let outcome =
            around_remove(&mut layout, None, |host, region| host.delete_region(region)).unwrap();
        assert_eq!(outcome, RemoveOutcome::Removed(c));
        assert!(!layout.is_live(c));
    }

    #[test]
    fn test_around_remove_propagates_host_error() {
        let mut layout = MemoryLayout::new(120, 40);
        let root = layout.regions()[0];
        crate::sticky::factory::write_sticky_params(
            &mut layout,
            root,
            crate::sticky::state::PinSpec::new(
                Side::Top,
                crate::sticky::state::PinSize::new(10.0).unwrap(),
            ),
        )
        .unwrap();

        let err = around_remove(&mut layout, Some(root), |host, region| host.delete_region(region))
            .unwrap_err();
        assert!(matches!(
            err,
            crate::sticky::error::StickyError::Host(crate::sticky::error::HostError::SoleRegion(_))
        ));
    }
}
