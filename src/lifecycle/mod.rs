//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Expand datadir → Create datadir (0700) → Locate keystore
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Record loop stops at next tick or during sleep → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!
//! Exit (exit.rs):
//!     Fatal error → "Fatal: <message>" on stdout and stderr → status 1
//! ```

pub mod exit;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use exit::report_fatal;
pub use shutdown::Shutdown;
