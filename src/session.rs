//! Session coordination.
//!
//! A [`Session`] owns one descriptor and drives discovery and protocol
//! fan-out for it: it announces to the descriptor's trackers, launches one
//! peer connection task per discovered address, and maintains the registry
//! of peers that are currently unchoked. The registry is the hook point for
//! a future piece scheduler; none is implemented here.

mod coordinator;
mod error;
mod registry;

pub use coordinator::Session;
pub use error::SessionError;
pub use registry::Registry;
