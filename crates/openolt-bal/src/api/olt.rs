//! OLT configuration and operation types.
//!
//! These mirror the parts of the BAL `olt` and `pon_interface` objects the
//! agent reads and submits.

use crate::types::PonNiId;

/// PON technology reported by the OLT system mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PonMode {
    #[default]
    Gpon,
    XgsPon,
    Xgpon,
    Epon,
}

/// Topology published by the OLT once its devices are connected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OltTopology {
    /// Number of switch-facing PON ports.
    pub num_switch_pon_ports: u32,
    /// Number of PON MAC devices behind the ports.
    pub num_pon_mac_devices: u32,
    pub pon_mode: PonMode,
}

/// Result of a BAL `cfg_get` on the OLT object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OltCfg {
    pub topology: OltTopology,
    /// Firmware version string, empty when unreported.
    pub firmware_version: String,
}

impl OltCfg {
    /// Creates a configuration reporting `num_pon_ports` switch PON ports.
    pub fn with_pon_ports(num_pon_ports: u32) -> Self {
        Self {
            topology: OltTopology {
                num_switch_pon_ports: num_pon_ports,
                ..OltTopology::default()
            },
            firmware_version: String::new(),
        }
    }

    pub fn num_pon_ports(&self) -> u32 {
        self.topology.num_switch_pon_ports
    }
}

/// Operation submitted through BAL `oper_submit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperRequest {
    /// Bring one PON interface administratively up.
    PonInterfaceActivate { pon_ni: PonNiId },
}

impl OperRequest {
    /// The activation operation issued for each discovered PON port.
    pub fn activate_pon(pon_ni: PonNiId) -> Self {
        OperRequest::PonInterfaceActivate { pon_ni }
    }

    /// Returns the PON interface this operation targets.
    pub fn pon_ni(&self) -> PonNiId {
        match self {
            OperRequest::PonInterfaceActivate { pon_ni } => *pon_ni,
        }
    }
}
