//! The sensing loop.
//!
//! One iteration per frame: pull a pose, run the [`Session`], log timing.
//! Strums run on their own threads; the loop never waits for them until it
//! is about to return, when every strum still sounding is joined.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use strum_midi::StrumHandle;
use tracing::{debug, info, warn};

use crate::clock::{ClockReport, FrameClock};
use crate::session::Session;
use crate::source::PoseSource;

/// Pause after a failed pose request before trying the next frame.
pub const SOURCE_ERROR_BACKOFF: Duration = Duration::from_millis(250);

/// Totals for one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames:        u64,
    /// Frames whose pose could not be used.
    pub skipped:       u64,
    pub source_errors: u64,
    pub strums:        u64,
}

/// Drive `session` from `source` until the source runs dry or `stop` is set.
pub fn run(
    session: &mut Session,
    source:  &mut dyn PoseSource,
    clock:   &mut FrameClock,
    stop:    &AtomicBool,
) -> RunSummary {
    run_with_backoff(session, source, clock, stop, SOURCE_ERROR_BACKOFF)
}

pub fn run_with_backoff(
    session: &mut Session,
    source:  &mut dyn PoseSource,
    clock:   &mut FrameClock,
    stop:    &AtomicBool,
    backoff: Duration,
) -> RunSummary {
    let mut summary = RunSummary::default();
    let mut in_flight: Vec<StrumHandle> = Vec::new();

    while !stop.load(Ordering::Relaxed) {
        let pose = match source.next_pose() {
            Ok(Some(pose)) => pose,
            Ok(None)       => break,
            Err(e) => {
                summary.source_errors += 1;
                warn!(error = %e, "pose unavailable, skipping frame");
                if let Some(r) = clock.tick(source.last_request()) {
                    log_timing(&r);
                }
                if !backoff.is_zero() {
                    thread::sleep(backoff);
                }
                continue;
            }
        };

        let report = session.handle_pose(&pose);
        summary.frames += 1;
        if report.skipped() {
            summary.skipped += 1;
        }
        if let Some(strum) = report.strum {
            summary.strums += 1;
            // Finished strums have already logged their outcome.
            in_flight.retain(|h| h.try_result().is_none());
            in_flight.push(strum);
        }

        if let Some(r) = clock.tick(source.last_request()) {
            log_timing(&r);
        }
    }

    for strum in in_flight {
        let chord = strum.chord().to_string();
        if let Err(e) = strum.wait() {
            debug!(chord = %chord, error = %e, "strum did not finish");
        }
    }

    info!(
        frames = summary.frames,
        skipped = summary.skipped,
        errors = summary.source_errors,
        strums = summary.strums,
        "sensing loop finished"
    );
    summary
}

fn log_timing(r: &ClockReport) {
    match r.mean_request_ms {
        Some(ms) => debug!(fps = format_args!("{:.1}", r.fps), request_ms = format_args!("{:.1}", ms), "frame timing"),
        None     => debug!(fps = format_args!("{:.1}", r.fps), "frame timing"),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Quit key
// ════════════════════════════════════════════════════════════════════════════

/// Whether a typed line asks to quit.
pub fn is_quit(line: &str) -> bool {
    let line = line.trim();
    line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit")
}

/// Watch `input` on a background thread and set `stop` when the user types
/// `q` (or `quit`) followed by Enter.  End of input leaves `stop` alone.
pub fn spawn_quit_listener<R>(input: R, stop: Arc<AtomicBool>) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for line in input.lines() {
            let Ok(line) = line else { break };
            if is_quit(&line) {
                info!("quit requested");
                stop.store(true, Ordering::Relaxed);
                break;
            }
        }
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
