//! Sticky region factory.
//!
//! Creates a new leaf region at a frame side and upgrades it to a sticky
//! region by writing its placement parameters.

use super::error::{StickyError, StickyResult};
use super::host::{LayoutHost, ParamKey, ParamValue};
use super::reconciler::{ReconcileReport, reconcile_all};
use super::state::{PinSize, PinSpec, RegionId, Side};

/// Resolves the requested size, falling back to the configured default.
///
/// # Errors
///
/// Returns [`StickyError::InvalidArgument`] if the chosen size is not a
/// positive number.
pub fn resolve_size(size: Option<f64>, default_size: f64) -> StickyResult<PinSize> {
    PinSize::new(size.unwrap_or(default_size))
}

/// Creates a sticky region displaying `content` at `side` of the frame.
///
/// The region is allocated first; parameters are only written once the host
/// has created it. Classification fields are written before `Dedicated` so
/// dedication never gets in the way of the classification writes. A single
/// reconciliation pass runs before the handle is returned, correcting any
/// rounding or clamping the host applied at creation.
///
/// # Errors
///
/// - [`StickyError::InvalidArgument`] if the size is not positive; no host
///   request is made.
/// - [`StickyError::AllocationFailed`] if the host cannot create the region.
/// - [`StickyError::Host`] if a parameter write fails; the new region is
///   deleted again.
pub fn create_sticky<H: LayoutHost + ?Sized>(
    host: &mut H,
    content: H::Content,
    side: Side,
    size: Option<f64>,
    default_size: f64,
) -> StickyResult<RegionId> {
    create_sticky_reported(host, content, side, size, default_size).map(|(region, _)| region)
}

/// Like [`create_sticky`], also returning the report of the reconciliation
/// pass that follows creation.
///
/// # Errors
///
/// See [`create_sticky`].
pub fn create_sticky_reported<H: LayoutHost + ?Sized>(
    host: &mut H,
    content: H::Content,
    side: Side,
    size: Option<f64>,
    default_size: f64,
) -> StickyResult<(RegionId, ReconcileReport)> {
    let size = resolve_size(size, default_size)?;
    let spec = PinSpec::new(side, size);
    let extent = size.resolve(host.frame_size(spec.axis()));

    let region =
        host.allocate_region(content, side, extent).map_err(StickyError::AllocationFailed)?;

    if let Err(err) = write_sticky_params(host, region, spec) {
        tracing::warn!(region = %region, error = %err, "sticky: failed to mark region, removing it");
        if let Err(cleanup) = host.delete_region(region) {
            tracing::warn!(region = %region, error = %cleanup, "sticky: cleanup failed");
        }
        return Err(err.into());
    }

    tracing::debug!(region = %region, %side, size = %size, "sticky: created region");

    let report = reconcile_all(host);
    Ok((region, report))
}

/// Writes the sticky parameters of a region, then dedicates it.
///
/// # Errors
///
/// Returns the first host error encountered.
pub fn write_sticky_params<H: LayoutHost + ?Sized>(
    host: &mut H,
    region: RegionId,
    spec: PinSpec,
) -> super::error::HostResult<()> {
    host.set_region_param(region, ParamKey::Sticky, Some(ParamValue::Bool(true)))?;
    host.set_region_param(region, ParamKey::StickySide, Some(ParamValue::Side(spec.side)))?;
    host.set_region_param(region, ParamKey::StickySize, Some(ParamValue::Size(spec.size.value())))?;
    host.set_region_param(region, ParamKey::NoDeleteOthers, Some(ParamValue::Bool(true)))?;
    host.set_region_param(region, ParamKey::Dedicated, Some(ParamValue::Bool(true)))
}

/// Clears every sticky parameter of a region, including its dedication.
///
/// # Errors
///
/// Returns the first host error encountered.
pub fn clear_sticky_params<H: LayoutHost + ?Sized>(
    host: &mut H,
    region: RegionId,
) -> super::error::HostResult<()> {
    host.set_region_param(region, ParamKey::Dedicated, None)?;
    for &key in ParamKey::sticky_fields().iter().rev() {
        host.set_region_param(region, key, None)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::MemoryLayout;
    use crate::sticky::error::HostError;
    use crate::sticky::host::MessageLevel;
    use crate::sticky::reconciler::RegionOutcome;
    use crate::sticky::registry::{is_sticky, pin_spec};
    use crate::sticky::state::Axis;

    #[test]
    fn test_resolve_size_uses_default() {
        let size = resolve_size(None, 0.3).unwrap();
        assert!((size.value() - 0.3).abs() < f64::EPSILON);
        let size = resolve_size(Some(12.0), 0.3).unwrap();
        assert!((size.value() - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_create_sets_all_parameters() {
        let mut layout = MemoryLayout::new(200, 60);
        let id = create_sticky(&mut layout, "*help*".into(), Side::Right, Some(0.25), 0.3).unwrap();

        assert!(is_sticky(&layout, id));
        let spec = pin_spec(&layout, id).unwrap();
        assert_eq!(spec.side, Side::Right);
        assert_eq!(
            layout.region_param(id, ParamKey::NoDeleteOthers),
            Some(ParamValue::Bool(true))
        );
        assert_eq!(layout.region_param(id, ParamKey::Dedicated), Some(ParamValue::Bool(true)));
        assert_eq!(layout.region_size(id, Axis::Width), Some(50));
    }

    #[test]
    fn test_create_uses_default_size() {
        let mut layout = MemoryLayout::new(100, 50);
        let id = create_sticky(&mut layout, "*log*".into(), Side::Bottom, None, 0.3).unwrap();
        assert_eq!(layout.region_size(id, Axis::Height), Some(15));
    }

    #[test]
    fn test_create_runs_one_reconcile_pass() {
        let mut layout = MemoryLayout::new(200, 60);
        let (id, report) =
            create_sticky_reported(&mut layout, "*tree*".into(), Side::Left, Some(0.2), 0.3)
                .unwrap();

        assert_eq!(report.outcomes(), &[(id, RegionOutcome::Unchanged)]);
        assert!(layout.messages().is_empty());
    }

    #[test]
    fn test_create_below_minimum_is_reported_by_reconcile() {
        // The host raises a 2-line request to its 4-line minimum; the pass
        // after creation tries to shrink it back and reports the refusal.
        let mut layout = MemoryLayout::new(100, 50);
        let (id, report) =
            create_sticky_reported(&mut layout, "*echo*".into(), Side::Bottom, Some(2.0), 0.3)
                .unwrap();

        assert_eq!(layout.region_size(id, Axis::Height), Some(4));
        assert!(matches!(
            report.outcome(id),
            Some(RegionOutcome::Failed(StickyError::ReconcileResizeFailed {
                delta: -2,
                source: HostError::BelowMinimum { minimum: 4, .. },
                ..
            }))
        ));
        assert!(matches!(layout.messages(), [(MessageLevel::Warning, _)]));
        assert!(is_sticky(&layout, id));
    }

    #[test]
    fn test_invalid_size_makes_no_host_call() {
        let mut layout = MemoryLayout::new(100, 50);
        let before = layout.regions();

        let err = create_sticky(&mut layout, "*x*".into(), Side::Top, Some(0.0), 0.3).unwrap_err();
        assert!(matches!(err, StickyError::InvalidArgument(_)));

        let err = create_sticky(&mut layout, "*x*".into(), Side::Top, Some(-4.0), 0.3).unwrap_err();
        assert!(matches!(err, StickyError::InvalidArgument(_)));

        assert_eq!(layout.regions(), before);
        assert!(!layout.take_layout_change());
    }

    #[test]
    fn test_invalid_default_is_rejected() {
        let mut layout = MemoryLayout::new(100, 50);
        let err = create_sticky(&mut layout, "*x*".into(), Side::Top, None, 0.0).unwrap_err();
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_allocation_failure_is_propagated() {
        let mut layout = MemoryLayout::new(30, 10);
        let before = layout.regions();

        let err =
            create_sticky(&mut layout, "*big*".into(), Side::Left, Some(500.0), 0.3).unwrap_err();
        assert!(matches!(
            err,
            StickyError::AllocationFailed(HostError::InsufficientSpace { .. })
        ));
        assert_eq!(layout.regions(), before);
    }

    #[test]
    fn test_clear_sticky_params() {
        let mut layout = MemoryLayout::new(100, 50);
        let id = create_sticky(&mut layout, "*log*".into(), Side::Bottom, Some(8.0), 0.3).unwrap();

        clear_sticky_params(&mut layout, id).unwrap();
        assert!(!is_sticky(&layout, id));
        for &key in ParamKey::sticky_fields() {
            assert_eq!(layout.region_param(id, key), None);
        }
        assert_eq!(layout.region_param(id, ParamKey::Dedicated), None);
    }
}
