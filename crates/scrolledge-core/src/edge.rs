//! Edge, axis, and direction types
//!
//! Top/Bottom are fixed to the vertical axis. Start/End are the horizontal
//! edges resolved relative to reading direction, not screen side: under RTL
//! the physical left/right edges swap roles.

use serde::{Deserialize, Serialize};

/// A logical edge of scrollable content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Bottom,
    /// Leading horizontal edge (left in LTR, right in RTL)
    Start,
    /// Trailing horizontal edge (right in LTR, left in RTL)
    End,
}

impl Edge {
    /// Which scroll axis this edge lives on.
    pub fn axis(self) -> Axis {
        match self {
            Edge::Top | Edge::Bottom => Axis::Vertical,
            Edge::Start | Edge::End => Axis::Horizontal,
        }
    }

    /// The edge at the other end of the same axis.
    pub fn opposite(self) -> Edge {
        match self {
            Edge::Top => Edge::Bottom,
            Edge::Bottom => Edge::Top,
            Edge::Start => Edge::End,
            Edge::End => Edge::Start,
        }
    }

    /// Whether the reached test for this edge depends on text direction.
    pub fn is_direction_sensitive(self) -> bool {
        self.axis() == Axis::Horizontal
    }
}

/// Scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Vertical,
    Horizontal,
}

/// Text/layout direction of the scrollable container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}
