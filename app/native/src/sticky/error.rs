//! Error types for the sticky region subsystem.
//!
//! Two layers of errors exist:
//!
//! - [`HostError`]: failures reported by the layout host when it cannot carry
//!   out a request (unknown region, no room, sole region, ...).
//! - [`StickyError`]: failures of the sticky operations themselves, which may
//!   wrap a host error.
//!
//! Refusing to delete the last non-sticky region is not an error; it is a
//! regular outcome of the deletion guard (see
//! [`RemoveOutcome`](super::guard::RemoveOutcome)).

use thiserror::Error;

use super::state::{Axis, RegionId};

/// Result type alias for host requests.
pub type HostResult<T> = Result<T, HostError>;

/// Result type alias for sticky operations.
pub type StickyResult<T> = Result<T, StickyError>;

/// Errors reported by a layout host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The region handle does not refer to a live region.
    #[error("Region {0} does not exist")]
    InvalidRegion(RegionId),

    /// Not enough room to satisfy a size request because neighbouring
    /// regions are at their minimum size.
    #[error("Not enough room to make {axis} {requested} (at most {available} available)")]
    InsufficientSpace {
        /// Axis of the request.
        axis: Axis,
        /// Requested size along the axis.
        requested: u32,
        /// Largest size the host could provide.
        available: u32,
    },

    /// The request would make a region smaller than the host allows.
    #[error("Cannot make {axis} {requested}, minimum is {minimum}")]
    BelowMinimum {
        /// Axis of the request.
        axis: Axis,
        /// Requested size along the axis.
        requested: u32,
        /// Smallest size the host allows.
        minimum: u32,
    },

    /// The region cannot be resized along this axis.
    #[error("Region {region} cannot be resized along its {axis}")]
    FixedAxis {
        /// Region the resize was requested for.
        region: RegionId,
        /// Rejected axis.
        axis: Axis,
    },

    /// The region is the only one left in the layout.
    #[error("Attempt to delete the sole region {0}")]
    SoleRegion(RegionId),

    /// The region is dedicated to its content.
    #[error("Region {0} is dedicated to its content")]
    Dedicated(RegionId),

    /// The host does not support the request.
    #[error("Unsupported layout request: {0}")]
    Unsupported(String),
}

impl HostError {
    /// Creates an unsupported-request error with the given message.
    #[must_use]
    pub fn unsupported(message: impl Into<String>) -> Self { Self::Unsupported(message.into()) }

    /// Returns `true` if the error is caused by size constraints that may
    /// clear up after the next layout change.
    #[must_use]
    pub const fn is_space_constraint(&self) -> bool {
        matches!(self, Self::InsufficientSpace { .. } | Self::BelowMinimum { .. })
    }
}

/// Errors that can occur during sticky region operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StickyError {
    /// The caller supplied an invalid argument (for example a non-positive
    /// size). Rejected before any host request is made.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The host could not create the requested region.
    ///
    /// The host error is carried unmodified; no region parameters were
    /// written.
    #[error(transparent)]
    AllocationFailed(HostError),

    /// A sticky region could not be brought to its target size on this pass.
    ///
    /// This is never fatal: remaining regions are still reconciled and the
    /// next layout change tries again.
    #[error("Failed to resize sticky region {region} by {delta} along its {axis}: {source}")]
    ReconcileResizeFailed {
        /// Region that could not be resized.
        region: RegionId,
        /// Axis of the attempted resize.
        axis: Axis,
        /// Requested change in size.
        delta: i64,
        /// Host failure.
        #[source]
        source: HostError,
    },

    /// The operation requires a sticky region.
    #[error("Region {0} is not sticky")]
    NotSticky(RegionId),

    /// Any other host failure surfaced to the caller.
    #[error(transparent)]
    Host(#[from] HostError),
}

impl StickyError {
    /// Creates an invalid argument error with the given message.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Returns `true` if the error was caused by the caller's input rather
    /// than by the layout.
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::NotSticky(_))
    }

    /// Returns `true` if the failure may resolve on a later layout change.
    ///
    /// Only space constraints qualify; a region that cannot be resized along
    /// its axis at all stays that way.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::ReconcileResizeFailed { source, .. } | Self::AllocationFailed(source) => {
                source.is_space_constraint()
            }
            _ => false,
        }
    }

    /// Returns the region the error refers to, if any.
    #[must_use]
    pub const fn region(&self) -> Option<RegionId> {
        match self {
            Self::ReconcileResizeFailed { region, .. } | Self::NotSticky(region) => Some(*region),
            Self::AllocationFailed(HostError::InvalidRegion(region))
            | Self::Host(HostError::InvalidRegion(region) | HostError::SoleRegion(region)) => {
                Some(*region)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_error_display() {
        assert_eq!(
            HostError::InvalidRegion(RegionId(4)).to_string(),
            "Region #4 does not exist"
        );
        assert_eq!(
            HostError::InsufficientSpace {
                axis: Axis::Height,
                requested: 40,
                available: 30,
            }
            .to_string(),
            "Not enough room to make height 40 (at most 30 available)"
        );
        assert_eq!(
            HostError::SoleRegion(RegionId(1)).to_string(),
            "Attempt to delete the sole region #1"
        );
    }

    #[test]
    fn test_allocation_failed_is_transparent() {
        let host = HostError::InsufficientSpace {
            axis: Axis::Width,
            requested: 90,
            available: 20,
        };
        let err = StickyError::AllocationFailed(host.clone());
        assert_eq!(err.to_string(), host.to_string());
    }

    #[test]
    fn test_reconcile_error_display_and_source() {
        let err = StickyError::ReconcileResizeFailed {
            region: RegionId(2),
            axis: Axis::Width,
            delta: -12,
            source: HostError::FixedAxis {
                region: RegionId(2),
                axis: Axis::Width,
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("#2"));
        assert!(msg.contains("-12"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_predicates() {
        assert!(StickyError::invalid_argument("size").is_caller_error());
        assert!(StickyError::NotSticky(RegionId(1)).is_caller_error());
        assert!(!StickyError::Host(HostError::SoleRegion(RegionId(1))).is_caller_error());

        let transient = StickyError::ReconcileResizeFailed {
            region: RegionId(1),
            axis: Axis::Height,
            delta: 3,
            source: HostError::InsufficientSpace {
                axis: Axis::Height,
                requested: 10,
                available: 7,
            },
        };
        assert!(transient.is_transient());
        assert!(!StickyError::invalid_argument("x").is_transient());

        let stuck = StickyError::ReconcileResizeFailed {
            region: RegionId(2),
            axis: Axis::Width,
            delta: -4,
            source: HostError::FixedAxis {
                region: RegionId(2),
                axis: Axis::Width,
            },
        };
        assert!(!stuck.is_transient());
        assert!(
            StickyError::AllocationFailed(HostError::BelowMinimum {
                axis: Axis::Height,
                requested: 2,
                minimum: 4,
            })
            .is_transient()
        );

        assert!(
            HostError::InsufficientSpace {
                axis: Axis::Width,
                requested: 1,
                available: 0,
            }
            .is_space_constraint()
        );
        assert!(!HostError::Dedicated(RegionId(1)).is_space_constraint());
    }

    #[test]
    fn test_error_region() {
        assert_eq!(StickyError::NotSticky(RegionId(5)).region(), Some(RegionId(5)));
        assert_eq!(
            StickyError::Host(HostError::SoleRegion(RegionId(9))).region(),
            Some(RegionId(9))
        );
        assert_eq!(StickyError::invalid_argument("x").region(), None);
    }

    #[test]
    fn test_from_host_error() {
        let err: StickyError = HostError::unsupported("split").into();
        assert!(matches!(err, StickyError::Host(HostError::Unsupported(_))));
    }
}
