//! OltOrch - OLT activation for the OpenOLT agent.
//!
//! Brings the OLT up through the BAL host API: host init, PON port discovery
//! from the OLT configuration, then one activation per discovered port. A
//! partially activated OLT still counts as enabled.
//!
//! The device lifecycle lives in [`OltState`], owned by the caller and lent to
//! [`OltOrch::enable`] per call rather than kept as process-wide state.

mod orch;
mod state;
mod types;

pub use orch::{ConfigErrorPolicy, EnableError, OltOrch, OltOrchConfig, OltOrchStats};
pub use state::{DeviceLifecycle, OltState};
pub use types::{ActivationResult, DiscoverySource, PonPort, PonPortStatus};
