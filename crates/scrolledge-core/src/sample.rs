//! Scroll sample model
//!
//! One immutable snapshot of a scrollable viewport per scroll tick. Samples
//! are produced by the host's scroll source and consumed read-only by the
//! geometry tests and the transition streams.

use serde::{Deserialize, Serialize};

/// Snapshot of a scrollable viewport at one instant.
///
/// Offsets are signed because RTL engines may report horizontal scroll
/// positions as negative values (see [`crate::rtl::RtlConvention`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollSample {
    /// Vertical scroll offset (0 at the top, grows downward)
    pub scroll_top: f64,
    /// Horizontal scroll offset (sign convention varies per engine under RTL)
    pub scroll_left: f64,
    /// Visible viewport width
    pub client_width: f64,
    /// Visible viewport height
    pub client_height: f64,
    /// Total scrollable content width
    pub scroll_width: f64,
    /// Total scrollable content height
    pub scroll_height: f64,
}

impl ScrollSample {
    /// Remaining scrollable distance below the viewport.
    pub fn distance_to_bottom(&self) -> f64 {
        self.scroll_height - (self.scroll_top + self.client_height)
    }

    /// Whether the content overflows the viewport on the vertical axis.
    pub fn overflows_vertically(&self) -> bool {
        self.scroll_height > self.client_height
    }

    /// Whether the content overflows the viewport on the horizontal axis.
    pub fn overflows_horizontally(&self) -> bool {
        self.scroll_width > self.client_width
    }
}
