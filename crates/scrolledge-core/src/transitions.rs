//! Reached-transition stream adapter
//!
//! Converts a continuous sequence of scroll samples into a sparse sequence
//! of "reached" events. The adapter evaluates the edge test per sample,
//! remembers only the previous verdict, and emits the originating sample on
//! the false→true flip. Staying pinned at an edge (overscroll jitter,
//! repeated ticks) produces no repeated emissions, and scrolling away is
//! silent.
//!
//! The very first sample is compared against "no value yet", so a stream
//! that starts already at the edge emits immediately.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;

use crate::sample::ScrollSample;

/// When a reached event is handed downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delivery {
    /// Yield in the same poll that observed the transition.
    Inline,
    /// Hold each event for one scheduler tick before yielding, so
    /// downstream UI work lands in the next cycle. Events are delayed
    /// uniformly, never reordered.
    #[default]
    Deferred,
}

/// Stream adapter that emits the triggering sample of each false→true
/// reached transition.
///
/// Holds no state beyond the previous verdict and (in deferred mode) the
/// one event waiting out its tick. A fresh adapter over a fresh upstream
/// subscription recomputes from scratch.
#[derive(Debug)]
pub struct EdgeTransitions<S, F> {
    source: S,
    test: F,
    previous: Option<bool>,
    held: Option<ScrollSample>,
    delivery: Delivery,
}

impl<S, F> EdgeTransitions<S, F>
where
    S: Stream<Item = ScrollSample> + Unpin,
    F: FnMut(&ScrollSample) -> bool + Unpin,
{
    /// Wrap a sample stream with an edge test.
    pub fn new(source: S, test: F, delivery: Delivery) -> Self {
        Self {
            source,
            test,
            previous: None,
            held: None,
            delivery,
        }
    }
}

impl<S, F> Stream for EdgeTransitions<S, F>
where
    S: Stream<Item = ScrollSample> + Unpin,
    F: FnMut(&ScrollSample) -> bool + Unpin,
{
    type Item = ScrollSample;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<ScrollSample>> {
        let this = self.get_mut();

        // A deferred event from the previous poll is due now
        if let Some(sample) = this.held.take() {
            return Poll::Ready(Some(sample));
        }

        loop {
            match Pin::new(&mut this.source).poll_next(cx) {
                Poll::Ready(Some(sample)) => {
                    let hit = (this.test)(&sample);
                    let rose = hit && this.previous != Some(true);
                    this.previous = Some(hit);
                    if !rose {
                        continue;
                    }
                    tracing::trace!(?sample, "edge reached");
                    match this.delivery {
                        Delivery::Inline => return Poll::Ready(Some(sample)),
                        Delivery::Deferred => {
                            this.held = Some(sample);
                            cx.waker().wake_by_ref();
                            return Poll::Pending;
                        }
                    }
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    use crate::edge::{Direction, Edge};
    use crate::geometry;
    use crate::rtl::RtlConvention;

    // client_height=100, scroll_height=300: bottom reached at scroll_top>=200
    fn at(scroll_top: f64) -> ScrollSample {
        ScrollSample {
            scroll_top,
            scroll_left: 0.0,
            client_width: 0.0,
            client_height: 100.0,
            scroll_width: 0.0,
            scroll_height: 300.0,
        }
    }

    fn bottom_test(sample: &ScrollSample) -> bool {
        geometry::edge_reached_with(
            sample,
            Edge::Bottom,
            0.0,
            Direction::Ltr,
            RtlConvention::Default,
        )
    }

    fn transitions(
        scroll_tops: &[f64],
        delivery: Delivery,
    ) -> EdgeTransitions<impl Stream<Item = ScrollSample> + Unpin, impl FnMut(&ScrollSample) -> bool + Unpin>
    {
        let samples: Vec<ScrollSample> = scroll_tops.iter().copied().map(at).collect();
        EdgeTransitions::new(tokio_stream::iter(samples), bottom_test, delivery)
    }

    #[tokio::test]
    async fn test_emits_only_on_rising_transitions() {
        // Verdicts: F F T T T F T -> events at indices 2 and 6
        let trace = [0.0, 100.0, 200.0, 250.0, 280.0, 100.0, 200.0];
        let events: Vec<ScrollSample> = transitions(&trace, Delivery::Inline).collect().await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].scroll_top, 200.0);
        assert_eq!(events[1].scroll_top, 200.0);
    }

    #[tokio::test]
    async fn test_first_sample_already_at_edge_emits() {
        let events: Vec<ScrollSample> = transitions(&[250.0], Delivery::Inline).collect().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].scroll_top, 250.0);
    }

    #[tokio::test]
    async fn test_no_events_when_edge_never_reached() {
        let events: Vec<ScrollSample> =
            transitions(&[0.0, 50.0, 199.0], Delivery::Inline).collect().await;
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_scrolling_away_is_silent() {
        // Reached -> away -> nothing further: exactly one event
        let events: Vec<ScrollSample> =
            transitions(&[200.0, 250.0, 0.0, 100.0], Delivery::Inline).collect().await;
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn test_deferred_delivery_preserves_events_and_order() {
        let trace = [0.0, 200.0, 0.0, 300.0, 250.0];
        let inline: Vec<ScrollSample> = transitions(&trace, Delivery::Inline).collect().await;
        let deferred: Vec<ScrollSample> = transitions(&trace, Delivery::Deferred).collect().await;
        assert_eq!(inline, deferred);
        assert_eq!(deferred.len(), 2);
        assert_eq!(deferred[0].scroll_top, 200.0);
        assert_eq!(deferred[1].scroll_top, 300.0);
    }

    #[tokio::test]
    async fn test_fresh_adapter_restarts_transition_state() {
        let events: Vec<ScrollSample> = transitions(&[250.0, 280.0], Delivery::Inline).collect().await;
        assert_eq!(events.len(), 1);
        // Same already-reached trace through a new adapter emits again
        let again: Vec<ScrollSample> = transitions(&[250.0, 280.0], Delivery::Inline).collect().await;
        assert_eq!(again.len(), 1);
    }
}
