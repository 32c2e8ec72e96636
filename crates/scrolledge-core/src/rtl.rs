//! RTL scroll convention detection
//!
//! Rendering engines disagree on how `scroll_left` behaves in a
//! right-to-left container. The convention is a platform fact: it is probed
//! once per process against a synthetic RTL viewport and never changes
//! afterwards, so it lives in a write-once global that all watchers share
//! without locking.

use std::sync::OnceLock;

/// How an engine reports horizontal scroll offsets in an RTL container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RtlConvention {
    /// Offsets mirror LTR: 0 at the physical left, growing positive to the
    /// right, so the RTL start edge sits at the maximum offset.
    #[default]
    Default,
    /// Offsets are 0 at the RTL start and grow negative away from it.
    Negated,
    /// Offsets run from the opposite end of the coordinate range.
    Inverted,
}

/// Readings taken from a synthetic RTL probe element.
///
/// The probe container must use RTL direction with content wider than its
/// viewport, freshly created so it rests at its start edge. The host reads
/// `scroll_left` at rest, then writes a negative offset and reads it back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RtlProbe {
    /// `scroll_left` of the untouched probe container
    pub resting_scroll_left: f64,
    /// `scroll_left` read back after writing a negative value
    pub scroll_left_after_negative_write: f64,
}

impl RtlConvention {
    /// Classify an engine from probe readings.
    ///
    /// A resting offset above zero means the engine kept LTR coordinates
    /// (the start edge is at max offset). Otherwise the engine zeroes the
    /// start edge, and whether a negative write sticks separates the
    /// negated coordinate space from the inverted one.
    pub fn from_probe(probe: RtlProbe) -> Self {
        if probe.resting_scroll_left > 0.0 {
            RtlConvention::Default
        } else if probe.scroll_left_after_negative_write < 0.0 {
            RtlConvention::Negated
        } else {
            RtlConvention::Inverted
        }
    }
}

static CONVENTION: OnceLock<RtlConvention> = OnceLock::new();

/// Run the platform probe once and cache the result for the process.
///
/// The closure is only invoked on the first call; later calls (from any
/// thread) return the cached convention. Safe to race at startup.
pub fn detect_with(probe: impl FnOnce() -> RtlProbe) -> RtlConvention {
    *CONVENTION.get_or_init(|| {
        let convention = RtlConvention::from_probe(probe());
        tracing::debug!(?convention, "detected RTL scroll convention");
        convention
    })
}

/// The cached convention, or [`RtlConvention::Default`] when no probe has
/// run. Reading the fallback does not populate the cache, so a later
/// [`detect_with`] still wins.
pub fn detected() -> RtlConvention {
    CONVENTION.get().copied().unwrap_or_default()
}
