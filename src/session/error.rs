use thiserror::Error;

use crate::metainfo::MetainfoError;
use crate::tracker::TrackerError;

/// Session-fatal failures.
///
/// Only two things can kill a session before it starts: an unreadable
/// descriptor and exhaustion of every tracker endpoint. Per-peer failures
/// after that are logged inside their own tasks and never reach here.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("descriptor error: {0}")]
    Descriptor(#[from] MetainfoError),

    #[error("tracker error: {0}")]
    Tracker(#[from] TrackerError),
}
