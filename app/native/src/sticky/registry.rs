//! Region registry: classification queries over the live layout.
//!
//! Every query reads host state at call time. Nothing is cached, because the
//! live region set can change between two calls.

use super::host::{LayoutHost, ParamKey};
use super::state::{PinSize, PinSpec, RegionId};

/// Returns whether the region is sticky.
///
/// Returns `false` for dead or unknown handles.
#[must_use]
pub fn is_sticky<H: LayoutHost + ?Sized>(host: &H, region: RegionId) -> bool {
    host.is_live(region)
        && host.region_param(region, ParamKey::Sticky).and_then(|v| v.as_bool()).unwrap_or(false)
}

/// Returns all live sticky regions in host enumeration order.
#[must_use]
pub fn sticky_regions<H: LayoutHost + ?Sized>(host: &H) -> Vec<RegionId> {
    host.regions().into_iter().filter(|&id| is_sticky(host, id)).collect()
}

/// Returns all live non-sticky regions in host enumeration order.
#[must_use]
pub fn non_sticky_regions<H: LayoutHost + ?Sized>(host: &H) -> Vec<RegionId> {
    host.regions().into_iter().filter(|&id| !is_sticky(host, id)).collect()
}

/// Returns the first non-sticky region, or `None` if every region is sticky.
#[must_use]
pub fn first_non_sticky<H: LayoutHost + ?Sized>(host: &H) -> Option<RegionId> {
    host.regions().into_iter().find(|&id| !is_sticky(host, id))
}

/// Returns the placement of a sticky region.
///
/// Returns `None` if the region is not sticky or its stored side or size is
/// missing or invalid.
#[must_use]
pub fn pin_spec<H: LayoutHost + ?Sized>(host: &H, region: RegionId) -> Option<PinSpec> {
    if !is_sticky(host, region) {
        return None;
    }
    let side = host.region_param(region, ParamKey::StickySide)?.as_side()?;
    let size = host.region_param(region, ParamKey::StickySize)?.as_size()?;
    let size = PinSize::new(size).ok()?;
    Some(PinSpec::new(side, size))
}
