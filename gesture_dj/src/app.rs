//! Driver loop: frames from a source, through the pipeline, into a sink.

use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use dj_midi::MidiSink;

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::{Frame, GestureDj};

/// Counters reported when the input stream ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames:        usize,
    pub rejected:      usize,
    pub messages:      usize,
    pub send_failures: usize,
}

/// Drive the controller until the source closes its channel.
///
/// The clock is read once per frame.  Frames carrying `timestamp_ms` are
/// placed on a timeline anchored at the start of the run instead, so the
/// debounce window follows the recorded timestamps.  Frames are not paced;
/// they are processed as fast as the source delivers them.
pub fn run(config: &Config, frames: Receiver<Frame>, sink: &mut dyn MidiSink) -> Result<RunSummary> {
    let mut dj = GestureDj::new(config)?;
    let mut summary = RunSummary::default();
    let mut status = String::new();
    let start = Instant::now();

    info!(
        debounce_ms = config.control.debounce_ms,
        "controller running — waiting for landmark frames"
    );

    for frame in frames {
        summary.frames += 1;
        let now = match frame.timestamp_ms {
            Some(ms) => start + Duration::from_millis(ms),
            None     => Instant::now(),
        };

        let out = match dj.process_frame(&frame, now) {
            Ok(out) => out,
            Err(e) if e.is_recoverable() => {
                summary.rejected += 1;
                warn!(frame = summary.frames, "{}", e);
                continue;
            }
            Err(e) => return Err(e),
        };

        let line = out.status_line();
        if line != status {
            debug!("{}", line);
            status = line;
        }

        for msg in &out.messages {
            match sink.send(msg) {
                Ok(()) => summary.messages += 1,
                Err(e) => {
                    summary.send_failures += 1;
                    warn!(%msg, "{}", e);
                }
            }
        }
    }

    info!(
        frames = summary.frames,
        rejected = summary.rejected,
        messages = summary.messages,
        "input closed"
    );
    Ok(summary)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
