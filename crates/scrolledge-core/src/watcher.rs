//! Edge watcher and scroll feed plumbing
//!
//! [`ScrollFeed`] is the in-process boundary to the host's scroll source:
//! two independently subscribable broadcast channels of samples, one per
//! axis. [`EdgeWatcher`] composes a feed, an edge, an offset tolerance, a
//! direction source, and a delivery mode into restartable subscriptions of
//! reached events.
//!
//! One watcher is one configured edge. Vertical and horizontal watchers are
//! the same type; the edge's axis selects which sample sequence to follow.

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

use crate::edge::{Axis, Direction, Edge};
use crate::geometry;
use crate::rtl::{self, RtlConvention};
use crate::sample::ScrollSample;
use crate::transitions::{Delivery, EdgeTransitions};

/// Errors raised when assembling an edge watcher.
///
/// These are integration errors, surfaced at construction time rather than
/// deferred into the stream.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("edge watcher for {edge:?} has no scroll feed attached")]
    MissingFeed { edge: Edge },

    #[error("reached offset must be non-negative, got {offset}")]
    NegativeOffset { offset: f64 },
}

/// In-process scroll source: one broadcast channel per axis.
///
/// The host publishes a sample whenever the corresponding scroll offset
/// changes; watchers subscribe to exactly one axis. Cloning the feed clones
/// the publish side only — subscriptions are always taken fresh.
#[derive(Clone)]
pub struct ScrollFeed {
    vertical: broadcast::Sender<ScrollSample>,
    horizontal: broadcast::Sender<ScrollSample>,
}

impl ScrollFeed {
    /// Create a feed whose channels buffer up to `capacity` samples per
    /// subscriber before older ones are dropped.
    pub fn new(capacity: usize) -> Self {
        let (vertical, _) = broadcast::channel(capacity);
        let (horizontal, _) = broadcast::channel(capacity);
        Self {
            vertical,
            horizontal,
        }
    }

    /// Publish a vertical-scroll sample. Returns the number of live
    /// subscribers, so hosts can skip sampling when nobody listens.
    pub fn publish_vertical(&self, sample: ScrollSample) -> usize {
        self.vertical.send(sample).unwrap_or(0)
    }

    /// Publish a horizontal-scroll sample.
    pub fn publish_horizontal(&self, sample: ScrollSample) -> usize {
        self.horizontal.send(sample).unwrap_or(0)
    }

    /// Subscribe to one axis. Samples published before this call are not
    /// replayed.
    pub fn subscribe(&self, axis: Axis) -> SampleStream {
        let rx = match axis {
            Axis::Vertical => self.vertical.subscribe(),
            Axis::Horizontal => self.horizontal.subscribe(),
        };
        SampleStream {
            inner: BroadcastStream::new(rx),
            axis,
        }
    }
}

impl fmt::Debug for ScrollFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollFeed")
            .field("vertical_subscribers", &self.vertical.receiver_count())
            .field("horizontal_subscribers", &self.horizontal.receiver_count())
            .finish()
    }
}

/// One axis subscription of a [`ScrollFeed`].
///
/// Ends when the feed (all publish handles) is dropped. A slow subscriber
/// that falls behind the channel capacity loses the oldest samples; that is
/// logged and skipped rather than treated as an error, since only the most
/// recent position matters for edge detection.
pub struct SampleStream {
    inner: BroadcastStream<ScrollSample>,
    axis: Axis,
}

impl Stream for SampleStream {
    type Item = ScrollSample;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<ScrollSample>> {
        let this = self.get_mut();
        loop {
            match Pin::new(&mut this.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(sample))) => return Poll::Ready(Some(sample)),
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(skipped)))) => {
                    tracing::warn!(axis = ?this.axis, skipped, "scroll feed lagged, dropping missed samples");
                    continue;
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Where a watcher reads the container's text direction at test time.
#[derive(Clone)]
pub enum DirectionSource {
    /// Direction is known up front and never changes.
    Fixed(Direction),
    /// Direction is read from the host on every sample (containers can flip
    /// direction at runtime).
    Dynamic(Arc<dyn Fn() -> Direction + Send + Sync>),
}

impl DirectionSource {
    fn current(&self) -> Direction {
        match self {
            DirectionSource::Fixed(direction) => *direction,
            DirectionSource::Dynamic(read) => read(),
        }
    }
}

impl fmt::Debug for DirectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectionSource::Fixed(direction) => f.debug_tuple("Fixed").field(direction).finish(),
            DirectionSource::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Builder for [`EdgeWatcher`].
#[derive(Debug)]
pub struct EdgeWatcherBuilder {
    edge: Edge,
    offset: f64,
    direction: DirectionSource,
    convention: Option<RtlConvention>,
    delivery: Delivery,
    feed: Option<ScrollFeed>,
}

impl EdgeWatcherBuilder {
    pub fn new(edge: Edge) -> Self {
        Self {
            edge,
            offset: 0.0,
            direction: DirectionSource::Fixed(Direction::Ltr),
            convention: None,
            delivery: Delivery::default(),
            feed: None,
        }
    }

    /// Pixel tolerance before the edge counts as reached (default 0).
    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = DirectionSource::Fixed(direction);
        self
    }

    /// Read direction from the host per sample instead of fixing it.
    pub fn direction_source(mut self, source: DirectionSource) -> Self {
        self.direction = source;
        self
    }

    /// Override the RTL convention instead of consulting the process-wide
    /// detected one. Useful for tests and trace replay.
    pub fn convention(mut self, convention: RtlConvention) -> Self {
        self.convention = Some(convention);
        self
    }

    pub fn delivery(mut self, delivery: Delivery) -> Self {
        self.delivery = delivery;
        self
    }

    pub fn feed(mut self, feed: ScrollFeed) -> Self {
        self.feed = Some(feed);
        self
    }

    /// Validate the configuration and produce the watcher.
    ///
    /// The RTL convention is resolved here: it is a platform fact, fixed for
    /// the watcher's lifetime, never re-read per sample.
    pub fn build(self) -> Result<EdgeWatcher, WatchError> {
        if self.offset < 0.0 {
            return Err(WatchError::NegativeOffset {
                offset: self.offset,
            });
        }
        let feed = self.feed.ok_or(WatchError::MissingFeed { edge: self.edge })?;
        Ok(EdgeWatcher {
            edge: self.edge,
            offset: self.offset,
            direction: self.direction,
            convention: self.convention.unwrap_or_else(rtl::detected),
            delivery: self.delivery,
            feed,
        })
    }
}

/// A configured edge watcher.
///
/// Each [`subscribe`](EdgeWatcher::subscribe) call is an independent,
/// restartable subscription: transition state starts fresh, so a viewport
/// already resting at the edge emits on its first post-subscription sample.
/// Dropping a subscription releases its feed receiver; no samples are
/// retained and no further evaluation runs for it.
#[derive(Debug)]
pub struct EdgeWatcher {
    edge: Edge,
    offset: f64,
    direction: DirectionSource,
    convention: RtlConvention,
    delivery: Delivery,
    feed: ScrollFeed,
}

impl EdgeWatcher {
    pub fn builder(edge: Edge) -> EdgeWatcherBuilder {
        EdgeWatcherBuilder::new(edge)
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    /// Open a fresh stream of reached events for this watcher's edge.
    pub fn subscribe(&self) -> impl Stream<Item = ScrollSample> + Send + Unpin + 'static {
        let source = self.feed.subscribe(self.edge.axis());
        let edge = self.edge;
        let offset = self.offset;
        let direction = self.direction.clone();
        let convention = self.convention;
        tracing::debug!(
            ?edge,
            offset,
            ?convention,
            delivery = ?self.delivery,
            "edge watcher subscription opened"
        );
        let test = move |sample: &ScrollSample| {
            geometry::edge_reached_with(sample, edge, offset, direction.current(), convention)
        };
        EdgeTransitions::new(source, test, self.delivery)
    }

    /// One-off reached test with this watcher's configuration, outside the
    /// stream pipeline.
    pub fn is_reached(&self, sample: &ScrollSample) -> bool {
        geometry::edge_reached_with(
            sample,
            self.edge,
            self.offset,
            self.direction.current(),
            self.convention,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn vertical(scroll_top: f64) -> ScrollSample {
        ScrollSample {
            scroll_top,
            scroll_left: 0.0,
            client_width: 0.0,
            client_height: 100.0,
            scroll_width: 0.0,
            scroll_height: 300.0,
        }
    }

    fn horizontal(scroll_left: f64) -> ScrollSample {
        ScrollSample {
            scroll_top: 0.0,
            scroll_left,
            client_width: 300.0,
            client_height: 0.0,
            scroll_width: 900.0,
            scroll_height: 0.0,
        }
    }

    #[test]
    fn test_build_without_feed_fails() {
        let err = EdgeWatcher::builder(Edge::Bottom).build().unwrap_err();
        assert!(matches!(err, WatchError::MissingFeed { edge: Edge::Bottom }));
    }

    #[test]
    fn test_build_with_negative_offset_fails() {
        let feed = ScrollFeed::new(16);
        let err = EdgeWatcher::builder(Edge::Top)
            .feed(feed)
            .offset(-1.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, WatchError::NegativeOffset { .. }));
    }

    #[test]
    fn test_publish_reports_subscriber_count() {
        let feed = ScrollFeed::new(16);
        assert_eq!(feed.publish_vertical(vertical(0.0)), 0);
        let sub = feed.subscribe(Axis::Vertical);
        assert_eq!(feed.publish_vertical(vertical(0.0)), 1);
        // Horizontal axis is independent
        assert_eq!(feed.publish_horizontal(horizontal(0.0)), 0);
        drop(sub);
    }

    #[tokio::test]
    async fn test_vertical_watcher_emits_on_bottom_transition() {
        let feed = ScrollFeed::new(16);
        let watcher = EdgeWatcher::builder(Edge::Bottom)
            .feed(feed.clone())
            .build()
            .unwrap();

        let events = watcher.subscribe();
        for scroll_top in [0.0, 100.0, 200.0, 250.0] {
            feed.publish_vertical(vertical(scroll_top));
        }
        drop(watcher);
        drop(feed);

        let events: Vec<ScrollSample> = events.collect().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].scroll_top, 200.0);
    }

    #[tokio::test]
    async fn test_horizontal_watcher_uses_direction_and_convention() {
        // RTL negated engine: start edge at offset 0, end at -600
        let feed = ScrollFeed::new(16);
        let watcher = EdgeWatcher::builder(Edge::End)
            .feed(feed.clone())
            .direction(Direction::Rtl)
            .convention(RtlConvention::Negated)
            .build()
            .unwrap();

        let events = watcher.subscribe();
        for scroll_left in [0.0, -300.0, -600.0] {
            feed.publish_horizontal(horizontal(scroll_left));
        }
        // Vertical publishes must not reach a horizontal watcher
        feed.publish_vertical(vertical(250.0));
        drop(watcher);
        drop(feed);

        let events: Vec<ScrollSample> = events.collect().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].scroll_left, -600.0);
    }

    #[tokio::test]
    async fn test_resubscription_resets_transition_state() {
        let feed = ScrollFeed::new(16);
        let watcher = EdgeWatcher::builder(Edge::Bottom)
            .feed(feed.clone())
            .build()
            .unwrap();

        let mut first = watcher.subscribe();
        feed.publish_vertical(vertical(250.0));
        let event = first.next().await.unwrap();
        assert_eq!(event.scroll_top, 250.0);
        drop(first);

        // The viewport is still at the edge; a fresh subscription must
        // treat its first sample as a new transition
        let mut second = watcher.subscribe();
        feed.publish_vertical(vertical(250.0));
        let event = second.next().await.unwrap();
        assert_eq!(event.scroll_top, 250.0);
    }

    #[tokio::test]
    async fn test_dynamic_direction_is_read_per_sample() {
        use std::sync::atomic::{AtomicBool, Ordering};

        let feed = ScrollFeed::new(16);
        let rtl_now = Arc::new(AtomicBool::new(false));
        let flag = rtl_now.clone();
        let watcher = EdgeWatcher::builder(Edge::Start)
            .feed(feed.clone())
            .direction_source(DirectionSource::Dynamic(Arc::new(move || {
                if flag.load(Ordering::Relaxed) {
                    Direction::Rtl
                } else {
                    Direction::Ltr
                }
            })))
            .convention(RtlConvention::Default)
            .build()
            .unwrap();

        // scroll_left=600: not the LTR start, but the RTL-default start
        let sample = horizontal(600.0);
        assert!(!watcher.is_reached(&sample));
        rtl_now.store(true, Ordering::Relaxed);
        assert!(watcher.is_reached(&sample));
    }

    #[tokio::test]
    async fn test_offset_tolerance_applies_through_watcher() {
        let feed = ScrollFeed::new(16);
        let watcher = EdgeWatcher::builder(Edge::Bottom)
            .feed(feed.clone())
            .offset(40.0)
            .build()
            .unwrap();

        let events = watcher.subscribe();
        feed.publish_vertical(vertical(100.0));
        feed.publish_vertical(vertical(160.0));
        drop(watcher);
        drop(feed);

        let events: Vec<ScrollSample> = events.collect().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].scroll_top, 160.0);
    }
}
