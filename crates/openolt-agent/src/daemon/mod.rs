//! Agent daemon: owns the device state and serializes management commands.

mod agentdaemon;

pub use agentdaemon::{
    AgentCommand, AgentDaemon, AgentDaemonConfig, AgentHandle, DaemonError, DaemonResult,
    DeviceStatus,
};
