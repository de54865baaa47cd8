//! Frame-rate and request-latency bookkeeping.

use std::time::{Duration, Instant};

/// Summary of one reporting window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClockReport {
    pub frames:          u64,
    pub fps:             f64,
    /// Mean pose-request latency, if any request was timed in the window.
    pub mean_request_ms: Option<f64>,
}

/// Counts frames and emits a [`ClockReport`] every `report_every` frames.
#[derive(Clone, Debug)]
pub struct FrameClock {
    report_every:  u64,
    window_start:  Option<Instant>,
    frames:        u64,
    request_total: Duration,
    requests:      u32,
}

impl FrameClock {
    pub fn new(report_every: u64) -> Self {
        FrameClock {
            report_every:  report_every.max(1),
            window_start:  None,
            frames:        0,
            request_total: Duration::ZERO,
            requests:      0,
        }
    }

    pub fn tick(&mut self, request: Option<Duration>) -> Option<ClockReport> {
        self.tick_at(Instant::now(), request)
    }

    /// Record a frame finished at `now`, successful or not.
    ///
    /// The first call only opens the frame window; frames are measured
    /// between consecutive ticks.  Request latency counts from the first call.
    pub fn tick_at(&mut self, now: Instant, request: Option<Duration>) -> Option<ClockReport> {
        if let Some(d) = request {
            self.request_total += d;
            self.requests += 1;
        }
        let Some(start) = self.window_start else {
            self.window_start = Some(now);
            return None;
        };

        self.frames += 1;
        if self.frames < self.report_every {
            return None;
        }

        let secs = now.saturating_duration_since(start).as_secs_f64();
        let report = ClockReport {
            frames:          self.frames,
            fps:             if secs > 0.0 { self.frames as f64 / secs } else { 0.0 },
            mean_request_ms: (self.requests > 0)
                .then(|| self.request_total.as_secs_f64() * 1000.0 / self.requests as f64),
        };

        self.window_start  = Some(now);
        self.frames        = 0;
        self.request_total = Duration::ZERO;
        self.requests      = 0;
        Some(report)
    }

    /// Requests timed since the last report.
    pub fn timed_requests(&self) -> u32 { self.requests }
}
