//! Plumbing shared by the rigview models.
//!
//! - [`Signal`]: synchronous change notification
//! - [`ObserverRegistry`]: weakly held observers that deregister when their
//!   [`Registration`] drops
//! - [`logging::targets`]: the `tracing` targets every rigview crate logs under

pub mod logging;
pub mod registry;
pub mod signal;

pub use registry::{ObserverId, ObserverRegistry, Registration};
pub use signal::{ConnectionId, Signal};
