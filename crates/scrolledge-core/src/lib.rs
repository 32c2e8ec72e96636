//! scrolledge-core
//!
//! Detects when a scrollable viewport has reached one of its four logical
//! edges (top, bottom, start, end), accounting for vertical vs horizontal
//! axes and for the right-to-left scroll-coordinate conventions that differ
//! across rendering engines.
//!
//! The crate is split along the two halves of the problem:
//! - [`geometry`] - pure per-edge threshold tests over one scroll snapshot
//! - [`transitions`] / [`watcher`] - the reactive side: a stream adapter that
//!   turns continuous scroll samples into discrete false→true "reached"
//!   events, and the watcher/feed plumbing that wires it to a scroll source
//!
//! The host stays responsible for producing [`ScrollSample`] values (from a
//! DOM element, a terminal pane, a replayed trace) and for probing the
//! platform's RTL scroll convention once at startup via [`rtl::detect_with`].

pub mod edge;
pub mod geometry;
pub mod rtl;
pub mod sample;
pub mod transitions;
pub mod watcher;

pub use edge::{Axis, Direction, Edge};
pub use rtl::{RtlConvention, RtlProbe};
pub use sample::ScrollSample;
pub use transitions::{Delivery, EdgeTransitions};
pub use watcher::{
    DirectionSource, EdgeWatcher, EdgeWatcherBuilder, SampleStream, ScrollFeed, WatchError,
};
