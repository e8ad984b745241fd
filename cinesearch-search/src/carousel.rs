//! Featured carousel position and its auto-advance timer.

use std::sync::Arc;
use std::time::Duration;

use cinesearch_core::MovieDetail;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Slides of the featured carousel and the one on display.
#[derive(Debug, Clone, Default)]
pub struct Carousel {
    slides: Vec<MovieDetail>,
    current: usize,
}

/// Carousel shared between a view and its timer.
pub type SharedCarousel = Arc<Mutex<Carousel>>;

impl Carousel {
    /// Creates a carousel showing the first of `slides`.
    pub fn new(slides: Vec<MovieDetail>) -> Self {
        Self { slides, current: 0 }
    }

    /// Wraps the carousel for use with [`AutoAdvance`].
    pub fn into_shared(self) -> SharedCarousel {
        Arc::new(Mutex::new(self))
    }

    /// All slides, in display order.
    pub fn slides(&self) -> &[MovieDetail] {
        &self.slides
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Index of the slide on display.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Slide on display, if any.
    pub fn current(&self) -> Option<&MovieDetail> {
        self.slides.get(self.current)
    }

    /// Advances one slide, wrapping after the last.
    pub fn next(&mut self) {
        if !self.is_empty() {
            self.current = (self.current + 1) % self.slides.len();
        }
    }

    /// Steps back one slide, wrapping before the first.
    pub fn previous(&mut self) {
        if !self.is_empty() {
            self.current = (self.current + self.slides.len() - 1) % self.slides.len();
        }
    }

    /// Shows slide `index`. Returns `false` if it does not exist.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.slides.len() {
            return false;
        }
        self.current = index;
        true
    }
}

/// Timer advancing a carousel every `period`.
///
/// The timer runs until the handle is stopped or dropped, so it cannot
/// outlive the view that owns it.
#[derive(Debug)]
pub struct AutoAdvance {
    task: JoinHandle<()>,
}

impl AutoAdvance {
    /// Starts advancing `carousel` every `period`.
    ///
    /// Returns `None` without spawning anything if the carousel is empty or
    /// `period` is zero. Must be called inside a tokio runtime.
    pub fn start(carousel: SharedCarousel, period: Duration) -> Option<Self> {
        if period.is_zero() || carousel.lock().is_empty() {
            return None;
        }

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                carousel.lock().next();
            }
        });

        tracing::debug!("Carousel auto-advance started every {:?}", period);
        Some(Self { task })
    }

    /// Whether the timer is still ticking.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stops the timer.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for AutoAdvance {
    fn drop(&mut self) {
        self.task.abort();
    }
}
