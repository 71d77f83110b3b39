//! OpenOLT agent - OLT device activation
//!
//! Brings an OLT into service through the BAL host API and tracks whether the
//! device is usable.
//!
//! # Architecture
//!
//! ```text
//! [CLI / startup] ──> [AgentHandle] ──> [AgentDaemon] ──> [OltOrch] ──> [BalApi] ──> [OLT]
//!                                             │
//!                                             ↓
//!                                        [OltState]
//! ```
//!
//! # Key Components
//!
//! - [`daemon::AgentDaemon`]: command queue and owner of the device state
//! - [`olt::OltOrch`]: the enable sequence (host init, PON discovery, PON activation)
//! - [`config::AgentConfig`]: YAML configuration
//! - [`audit`]: structured logging macros and the audit trail

pub mod audit;
pub mod config;
pub mod daemon;
pub mod olt;

pub use config::{AgentConfig, ConfigError, LogFormat};
pub use daemon::{AgentDaemon, AgentDaemonConfig, AgentHandle, DaemonError};
pub use olt::{ActivationResult, EnableError, OltOrch, OltOrchConfig, OltState};
