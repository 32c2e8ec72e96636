//! scrolledge - scroll edge detection trace replay
//!
//! Feeds a recorded scroll trace (JSON lines of samples) through a
//! configured edge watcher and prints one JSON event per reached
//! transition. Useful for debugging engine-specific RTL traces and for
//! checking offset tuning without a live host.
//!
//! Logging goes to stderr (RUST_LOG controls the filter); stdout carries
//! only the event JSON so output stays scriptable.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use futures::StreamExt;
use serde::Serialize;

use scrolledge_core::{
    Axis, Delivery, Direction, Edge, EdgeWatcher, RtlConvention, ScrollFeed, ScrollSample,
};

mod trace;

/// Replay a scroll trace and report edge-reached transitions
#[derive(Parser)]
#[command(name = "scrolledge")]
#[command(about = "Replay a scroll trace and report edge-reached transitions", long_about = None)]
struct Cli {
    /// Edge to watch
    #[arg(long, value_enum, default_value = "bottom")]
    edge: EdgeArg,

    /// Pixel tolerance before the edge counts as reached
    #[arg(long, default_value_t = 0.0)]
    offset: f64,

    /// Text direction of the traced container
    #[arg(long, value_enum, default_value = "ltr")]
    direction: DirectionArg,

    /// RTL scroll convention of the engine that produced the trace
    #[arg(long, value_enum, default_value = "default")]
    convention: ConventionArg,

    /// Deliver events in the same poll instead of deferring one tick
    #[arg(long)]
    inline: bool,

    /// Trace file (JSON lines); reads stdin when omitted
    trace: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum EdgeArg {
    Top,
    Bottom,
    Start,
    End,
}

impl From<EdgeArg> for Edge {
    fn from(arg: EdgeArg) -> Self {
        match arg {
            EdgeArg::Top => Edge::Top,
            EdgeArg::Bottom => Edge::Bottom,
            EdgeArg::Start => Edge::Start,
            EdgeArg::End => Edge::End,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Ltr,
    Rtl,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Ltr => Direction::Ltr,
            DirectionArg::Rtl => Direction::Rtl,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ConventionArg {
    Default,
    Negated,
    Inverted,
}

impl From<ConventionArg> for RtlConvention {
    fn from(arg: ConventionArg) -> Self {
        match arg {
            ConventionArg::Default => RtlConvention::Default,
            ConventionArg::Negated => RtlConvention::Negated,
            ConventionArg::Inverted => RtlConvention::Inverted,
        }
    }
}

/// One reached transition, as printed to stdout.
#[derive(Serialize)]
struct ReachedEvent {
    /// Ordinal of the event within this replay
    index: usize,
    /// The sample that triggered the transition
    sample: ScrollSample,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let samples = match &cli.trace {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open trace file {}", path.display()))?;
            trace::parse_trace(BufReader::new(file))?
        }
        None => trace::parse_trace(io::stdin().lock())?,
    };
    tracing::info!(samples = samples.len(), "trace loaded");

    let edge = Edge::from(cli.edge);
    let delivery = if cli.inline {
        Delivery::Inline
    } else {
        Delivery::Deferred
    };

    // Capacity covers the whole trace: replay publishes everything up
    // front, then drains the subscription
    let feed = ScrollFeed::new(samples.len().max(16));
    let watcher = EdgeWatcher::builder(edge)
        .offset(cli.offset)
        .direction(Direction::from(cli.direction))
        .convention(RtlConvention::from(cli.convention))
        .delivery(delivery)
        .feed(feed.clone())
        .build()?;

    let mut events = watcher.subscribe();
    for sample in &samples {
        match edge.axis() {
            Axis::Vertical => feed.publish_vertical(*sample),
            Axis::Horizontal => feed.publish_horizontal(*sample),
        };
    }
    // Close the feed so the event stream ends once the trace is drained
    drop(watcher);
    drop(feed);

    let mut count = 0;
    while let Some(sample) = events.next().await {
        let event = ReachedEvent {
            index: count,
            sample,
        };
        println!("{}", serde_json::to_string(&event)?);
        count += 1;
    }
    tracing::info!(events = count, "replay complete");

    Ok(())
}
