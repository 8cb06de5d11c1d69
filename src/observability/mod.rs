//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Registration, poll loop, dispatcher:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
