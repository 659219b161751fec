//! Unified error type for the controller.
//!
//! Frame-level errors (bad landmarks, undecodable input lines) are
//! recoverable: the frame is dropped and the stream continues.  Everything
//! else aborts startup.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GestureDjError {
    // =========================================================================
    // Recoverable — drop the frame, keep going
    // =========================================================================
    #[error(transparent)]
    Pose(#[from] hand_pose::PoseError),

    #[error("Invalid frame: {0}")]
    Frame(String),

    // =========================================================================
    // Fatal
    // =========================================================================
    #[error(transparent)]
    Midi(#[from] dj_midi::MidiError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GestureDjError>;

impl GestureDjError {
    /// True if the offending frame can simply be skipped.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GestureDjError::Pose(_) | GestureDjError::Frame(_))
    }
}
