//! Cosmetic counter animation for the "active shipments" figure.
//!
//! Each run is a tokio task that repaints the sink once per frame. Starting a
//! new run aborts the one in flight, so the sink only ever sees one writer.

use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::Instant};
use tracing::{debug, warn};

pub const COUNTER_DURATION: Duration = Duration::from_millis(1000);
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Value shown `elapsed` into a linear run from `start` to `end`.
pub fn interpolate(start: i64, end: i64, elapsed: Duration, duration: Duration) -> i64 {
    let progress = if duration.is_zero() {
        1.0
    } else {
        (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
    };
    (progress * (end - start) as f64 + start as f64).floor() as i64
}

pub trait CounterSink: Send + Sync + 'static {
    fn displayed(&self) -> i64;
    fn show(&self, value: i64);
}

pub struct CounterAnimator<S: CounterSink> {
    sink: Arc<S>,
    duration: Duration,
    frame: Duration,
    running: Option<JoinHandle<()>>,
}

impl<S: CounterSink> CounterAnimator<S> {
    pub fn new(sink: Arc<S>) -> Self {
        Self {
            sink,
            duration: COUNTER_DURATION,
            frame: FRAME_INTERVAL,
            running: None,
        }
    }

    pub fn with_timing(mut self, duration: Duration, frame: Duration) -> Self {
        self.duration = duration;
        self.frame = frame.max(Duration::from_millis(1));
        self
    }

    pub fn sink(&self) -> &Arc<S> {
        &self.sink
    }

    /// Animates from whatever the sink currently shows to `target`.
    /// Must be called from within a tokio runtime.
    pub fn animate_to(&mut self, target: i64) {
        self.cancel();

        let sink = Arc::clone(&self.sink);
        let start = sink.displayed();
        let duration = self.duration;
        let frame = self.frame;

        self.running = Some(tokio::spawn(async move {
            let began = Instant::now();
            let mut ticker = tokio::time::interval(frame);
            loop {
                ticker.tick().await;
                let elapsed = began.elapsed();
                sink.show(interpolate(start, target, elapsed, duration));
                if elapsed >= duration {
                    break;
                }
            }
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.running.take() {
            if !handle.is_finished() {
                handle.abort();
                debug!("cancelled in-flight counter animation");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Waits for the current run, if any, to reach its final frame.
    pub async fn finish(&mut self) {
        let Some(handle) = self.running.take() else {
            return;
        };
        if let Err(error) = handle.await {
            if !error.is_cancelled() {
                warn!(%error, "counter animation task failed");
            }
        }
    }
}

impl<S: CounterSink> Drop for CounterAnimator<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}
