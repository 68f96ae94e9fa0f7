//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → Network handle → Contract handle → Wrapper
//!
//! Signals (signals.rs):
//!     SIGINT/SIGTERM → abandon the shell loop and exit
//! ```

pub mod signals;
pub mod startup;

pub use signals::shutdown_signal;
pub use startup::{initialize, initialize_with, StartupError};
