//! Landmark frame sources — where frames come from.
//!
//! The public interface is [`Frame`] delivered over an `mpsc` channel.  The
//! controller doesn't need to know whether frames came from a detector
//! process piping JSON lines or from LeapMotion hardware.

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::{debug, warn};

use crate::error::{GestureDjError, Result};
use crate::pipeline::Frame;

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait — unified interface for detector output and hardware
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`Frame`]s over a channel.
///
/// A source returns when it runs dry or when the receiving end hangs up.
pub trait LandmarkSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<Frame>);
}

/// Spawn a source on its own thread and return the receiving end.
pub fn spawn_landmark_source<S: LandmarkSource>(source: S) -> Receiver<Frame> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// JsonLinesSource — one JSON frame per line
// ════════════════════════════════════════════════════════════════════════════

/// Decode a single JSON-lines record.
pub fn parse_frame(line: &str) -> Result<Frame> {
    serde_json::from_str(line).map_err(|e| GestureDjError::Frame(e.to_string()))
}

/// Reads frames from any buffered reader: a recorded file or a detector's
/// stdout piped into ours.  Blank lines and `#` comments are ignored;
/// undecodable lines are logged and skipped.
pub struct JsonLinesSource<R> {
    reader: R,
}

impl<R: BufRead + Send + 'static> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        JsonLinesSource { reader }
    }
}

impl<R: BufRead + Send + 'static> LandmarkSource for JsonLinesSource<R> {
    fn run(mut self: Box<Self>, tx: Sender<Frame>) {
        let mut buf = Vec::new();
        let mut n = 0usize;
        loop {
            buf.clear();
            n += 1;
            match self.reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!(line = n, "input read error: {}", e);
                    return;
                }
            }
            let line = match std::str::from_utf8(&buf) {
                Ok(l) => l,
                Err(e) => {
                    warn!(line = n, "skipping line: {}", e);
                    continue;
                }
            };
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match parse_frame(trimmed) {
                Ok(frame) => {
                    if tx.send(frame).is_err() {
                        return;
                    }
                }
                Err(e) => warn!(line = n, "skipping frame: {}", e),
            }
        }
        debug!("landmark input exhausted");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapLandmarkSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Landmark source backed by a LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// Each digit's four bones give the four joints of the 21-point topology
/// (proximal base, intermediate base, distal base, distal tip); the wrist is
/// taken at the middle finger's metacarpal base.  Millimetre positions are
/// normalized over [`LeapLandmarkSource::bounds`], with y flipped so that a
/// raised hand reads as a small image y, as a camera would report it.
#[cfg(feature = "leap")]
pub struct LeapLandmarkSource {
    /// `(min, max)` millimetres along x, y, z mapped onto [0, 1].
    pub bounds: [(f32, f32); 3],
}

#[cfg(feature = "leap")]
impl Default for LeapLandmarkSource {
    fn default() -> Self {
        LeapLandmarkSource {
            bounds: [(-200.0, 200.0), (80.0, 480.0), (-150.0, 150.0)],
        }
    }
}

#[cfg(feature = "leap")]
impl LeapLandmarkSource {
    fn normalize(&self, [x, y, z]: [f32; 3]) -> [f32; 3] {
        let unit = |v: f32, (lo, hi): (f32, f32)| ((v - lo) / (hi - lo)).clamp(0.0, 1.0);
        [
            unit(x, self.bounds[0]),
            1.0 - unit(y, self.bounds[1]),
            unit(z, self.bounds[2]),
        ]
    }

    fn hand_landmarks(&self, hand: &leaprs::HandRef<'_>) -> Vec<[f32; 3]> {
        let digits = hand.digits();
        let mut points = vec![self.normalize(digits[2].metacarpal().prev_joint().array())];
        for digit in &digits {
            for j in [
                digit.proximal().prev_joint(),
                digit.intermediate().prev_joint(),
                digit.distal().prev_joint(),
                digit.distal().next_joint(),
            ] {
                points.push(self.normalize(j.array()));
            }
        }
        points
    }
}

#[cfg(feature = "leap")]
impl LandmarkSource for LeapLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<Frame>) {
        use leaprs::*;
        use hand_pose::HandSide;
        use crate::pipeline::HandObservation;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c) => c,
            Err(e) => {
                warn!("failed to create LeapC connection: {:?}", e);
                return;
            }
        };
        if let Err(e) = connection.open() {
            warn!("failed to open LeapMotion device: {:?}", e);
            return;
        }

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            if let EventRef::Tracking(frame) = msg.event() {
                let hands = frame.hands()
                    .iter()
                    .map(|h| {
                        let side = if h.hand_type() == HandType::Left {
                            HandSide::Left
                        } else {
                            HandSide::Right
                        };
                        HandObservation { side, landmarks: self.hand_landmarks(h) }
                    })
                    .collect();

                if tx.send(Frame { timestamp_ms: None, hands }).is_err() {
                    return;
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
