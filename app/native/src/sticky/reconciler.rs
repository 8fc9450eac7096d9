//! Size reconciler: restores every sticky region to its configured size.
//!
//! Runs after each layout geometry change and right after a sticky region is
//! created. Regions are handled one at a time in registry order; a failure
//! on one region is reported and the pass moves on. There is no global solve
//! when several regions compete for space.

use smallvec::SmallVec;

use super::error::StickyError;
use super::host::{LayoutHost, MessageLevel};
use super::registry::{pin_spec, sticky_regions};
use super::state::RegionId;

/// Inline capacity for reconciliation outcomes.
///
/// Layouts rarely carry more than a handful of sticky regions.
pub const REPORT_INLINE_CAP: usize = 8;

/// Result of reconciling a single sticky region.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionOutcome {
    /// The region already had its target size.
    Unchanged,
    /// The region was resized.
    Resized {
        /// Size before the pass.
        from: u32,
        /// Size after the pass.
        to: u32,
    },
    /// The region disappeared or lost its placement before it was reached.
    Skipped,
    /// The host refused the resize.
    Failed(StickyError),
}

/// Per-region outcomes of one reconciliation pass, in processing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    outcomes: SmallVec<[(RegionId, RegionOutcome); REPORT_INLINE_CAP]>,
}

impl ReconcileReport {
    /// Creates an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            outcomes: SmallVec::new_const(),
        }
    }

    fn push(&mut self, region: RegionId, outcome: RegionOutcome) {
        self.outcomes.push((region, outcome));
    }

    /// Returns every `(region, outcome)` pair.
    #[must_use]
    pub fn outcomes(&self) -> &[(RegionId, RegionOutcome)] { &self.outcomes }

    /// Returns the outcome for a region, if it was part of the pass.
    #[must_use]
    pub fn outcome(&self, region: RegionId) -> Option<&RegionOutcome> {
        self.outcomes.iter().find(|(id, _)| *id == region).map(|(_, outcome)| outcome)
    }

    /// Returns the regions that were resized.
    pub fn resized(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, RegionOutcome::Resized { .. }))
            .map(|(id, _)| *id)
    }

    /// Returns the failures of this pass.
    pub fn failures(&self) -> impl Iterator<Item = &StickyError> + '_ {
        self.outcomes.iter().filter_map(|(_, outcome)| match outcome {
            RegionOutcome::Failed(err) => Some(err),
            _ => None,
        })
    }

    /// Returns `true` if no region needed a resize and none failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.outcomes
            .iter()
            .all(|(_, outcome)| matches!(outcome, RegionOutcome::Unchanged | RegionOutcome::Skipped))
    }

    /// Returns the number of regions visited.
    #[must_use]
    pub fn len(&self) -> usize { self.outcomes.len() }

    /// Returns `true` if there were no sticky regions.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.outcomes.is_empty() }
}

/// Reconciles every sticky region against the current frame geometry.
///
/// Failures are logged, reported through the host's message channel and
/// recorded in the returned report; they never abort the pass.
pub fn reconcile_all<H: LayoutHost + ?Sized>(host: &mut H) -> ReconcileReport {
    let mut report = ReconcileReport::new();

    for region in sticky_regions(host) {
        let outcome = reconcile_region(host, region);
        if let RegionOutcome::Failed(err) = &outcome {
            if err.is_transient() {
                tracing::warn!(region = %region, error = %err, "sticky: reconcile failed, retrying on next layout change");
            } else {
                tracing::error!(region = %region, error = %err, "sticky: reconcile failed");
            }
            host.message(MessageLevel::Warning, &err.to_string());
        }
        report.push(region, outcome);
    }

    report
}

/// Reconciles a single sticky region.
pub fn reconcile_region<H: LayoutHost + ?Sized>(host: &mut H, region: RegionId) -> RegionOutcome {
    if !host.is_live(region) {
        tracing::debug!(region = %region, "sticky: region vanished before reconcile");
        return RegionOutcome::Skipped;
    }

    let Some(spec) = pin_spec(host, region) else {
        tracing::debug!(region = %region, "sticky: region has no placement, skipping");
        return RegionOutcome::Skipped;
    };

    let axis = spec.axis();
    let target = spec.size.resolve(host.frame_size(axis));
    let Some(current) = host.region_size(region, axis) else {
        return RegionOutcome::Skipped;
    };

    let delta = i64::from(target) - i64::from(current);
    if delta == 0 {
        return RegionOutcome::Unchanged;
    }

    match host.resize_region(region, axis, delta) {
        Ok(()) => {
            tracing::debug!(
                region = %region,
                %axis,
                from = current,
                to = target,
                "sticky: restored region size"
            );
            RegionOutcome::Resized {
                from: current,
                to: target,
            }
        }
        Err(source) => RegionOutcome::Failed(StickyError::ReconcileResizeFailed {
            region,
            axis,
            delta,
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::MemoryLayout;
    use crate::sticky::host::{ParamKey, ParamValue};
    use crate::sticky::state::{Axis, Side};

    fn sticky_at(layout: &mut MemoryLayout, side: Side, extent: u32, size: f64) -> RegionId {
        let id = layout.allocate_region("*side*".into(), side, extent).unwrap();
        layout.set_region_param(id, ParamKey::Sticky, Some(ParamValue::Bool(true))).unwrap();
        layout.set_region_param(id, ParamKey::StickySide, Some(ParamValue::Side(side))).unwrap();
        layout.set_region_param(id, ParamKey::StickySize, Some(ParamValue::Size(size))).unwrap();
        id
    }

    #[test]
    fn test_empty_layout_reports_nothing() {
        let mut layout = MemoryLayout::new(100, 40);
        let report = reconcile_all(&mut layout);
        assert!(report.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn test_restores_ratio_size() {
        let mut layout = MemoryLayout::new(1000, 300);
        let left = sticky_at(&mut layout, Side::Left, 120, 0.3);

        let report = reconcile_all(&mut layout);
        assert_eq!(report.outcome(left), Some(&RegionOutcome::Resized { from: 120, to: 300 }));
        assert_eq!(layout.region_size(left, Axis::Width), Some(300));
        assert_eq!(report.resized().collect::<Vec<_>>(), vec![left]);
    }

    #[test]
    fn test_second_pass_is_unchanged() {
        let mut layout = MemoryLayout::new(1000, 300);
        let left = sticky_at(&mut layout, Side::Left, 120, 0.3);

        let _ = reconcile_all(&mut layout);
        let report = reconcile_all(&mut layout);
        assert_eq!(report.outcome(left), Some(&RegionOutcome::Unchanged));
        assert!(report.is_clean());
    }

    #[test]
    fn test_failure_does_not_stop_other_regions() {
        let mut layout = MemoryLayout::new(100, 40);
        // Absolute 95 columns cannot fit next to the body region.
        let greedy = sticky_at(&mut layout, Side::Left, 20, 95.0);
        let bottom = sticky_at(&mut layout, Side::Bottom, 5, 10.0);

        let report = reconcile_all(&mut layout);
        assert!(matches!(
            report.outcome(greedy),
            Some(RegionOutcome::Failed(StickyError::ReconcileResizeFailed { .. }))
        ));
        assert_eq!(report.outcome(bottom), Some(&RegionOutcome::Resized { from: 5, to: 10 }));
        assert_eq!(report.failures().count(), 1);
        assert!(!report.is_clean());
        assert_eq!(layout.messages().len(), 1);
    }

    #[test]
    fn test_region_without_placement_is_skipped() {
        let mut layout = MemoryLayout::new(100, 40);
        let id = layout.allocate_region("*x*".into(), Side::Top, 5).unwrap();
        layout.set_region_param(id, ParamKey::Sticky, Some(ParamValue::Bool(true))).unwrap();

        let report = reconcile_all(&mut layout);
        assert_eq!(report.outcome(id), Some(&RegionOutcome::Skipped));
    }

    #[test]
    fn test_dead_region_is_skipped() {
        let mut layout = MemoryLayout::new(100, 40);
        assert_eq!(reconcile_region(&mut layout, RegionId(42)), RegionOutcome::Skipped);
    }
}
