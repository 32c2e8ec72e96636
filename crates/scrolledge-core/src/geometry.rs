//! Edge geometry
//!
//! Pure, stateless reached tests. Everything reduces to one threshold
//! primitive; the per-edge match only decides which position and target to
//! feed it. Vertical edges ignore direction entirely. Horizontal edges
//! consult both the text direction and the engine's RTL convention, because
//! the two vary independently.
//!
//! The functions are total over f64 inputs: malformed samples (negative
//! extents, zero-size viewports) flow through the same arithmetic. Content
//! that fits entirely in the viewport tests as reached for both edges of
//! that axis.

use crate::edge::{Direction, Edge};
use crate::rtl::{self, RtlConvention};
use crate::sample::ScrollSample;

/// The single threshold primitive: has `current` closed to within `offset`
/// of `target`? Equality at the boundary counts as reached.
pub fn reached(current: f64, target: f64, offset: f64) -> bool {
    current >= target - offset
}

/// Reached test for one edge against an explicit RTL convention.
pub fn edge_reached_with(
    sample: &ScrollSample,
    edge: Edge,
    offset: f64,
    direction: Direction,
    convention: RtlConvention,
) -> bool {
    match edge {
        Edge::Top => reached(-sample.scroll_top, 0.0, offset),
        Edge::Bottom => reached(
            sample.scroll_top + sample.client_height,
            sample.scroll_height,
            offset,
        ),
        Edge::Start => match (direction, convention) {
            (Direction::Ltr, _) => reached(-sample.scroll_left, 0.0, offset),
            (Direction::Rtl, RtlConvention::Negated) => reached(sample.scroll_left, 0.0, offset),
            (Direction::Rtl, RtlConvention::Inverted) => reached(-sample.scroll_left, 0.0, offset),
            (Direction::Rtl, RtlConvention::Default) => reached(
                sample.scroll_left + sample.client_width,
                sample.scroll_width,
                offset,
            ),
        },
        Edge::End => match (direction, convention) {
            (Direction::Ltr, _) => reached(
                sample.scroll_left + sample.client_width,
                sample.scroll_width,
                offset,
            ),
            (Direction::Rtl, RtlConvention::Negated) => reached(
                -(sample.scroll_left - sample.client_width),
                sample.scroll_width,
                offset,
            ),
            (Direction::Rtl, RtlConvention::Inverted) => reached(
                -(sample.scroll_left + sample.client_width),
                sample.scroll_width,
                offset,
            ),
            (Direction::Rtl, RtlConvention::Default) => reached(-sample.scroll_left, 0.0, offset),
        },
    }
}

/// Reached test using the process-wide detected RTL convention.
pub fn edge_reached(sample: &ScrollSample, edge: Edge, offset: f64, direction: Direction) -> bool {
    edge_reached_with(sample, edge, offset, direction, rtl::detected())
}
