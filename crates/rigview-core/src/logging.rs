//! Logging facilities for rigview.
//!
//! rigview uses the `tracing` crate for instrumentation. To see logs, install
//! a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt::init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem, e.g.
/// `RUST_LOG=rigview::proxy=debug`.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "rigview_core::signal";
    /// Observer registry target.
    pub const REGISTRY: &str = "rigview_core::registry";
    /// Rig domain arena target.
    pub const RIG: &str = "rigview::rig";
    /// Tree and flat model target.
    pub const MODEL: &str = "rigview::model";
    /// Proxy filter chain target.
    pub const PROXY: &str = "rigview::proxy";
}
