//! Binding to the vendor BAL host library.
//!
//! The BAL host API takes variadic message structures that bindgen cannot
//! express safely, so the vendor SDK build compiles a thin C shim exposing
//! flat entry points. With the `bal-link` feature the calls below go through
//! that shim; without it every call validates its arguments and then reports
//! `NotSupported`.

use crate::api::olt::{OltCfg, OperRequest};
#[cfg(feature = "bal-link")]
use crate::api::olt::{OltTopology, PonMode};
use crate::api::BalApi;
use crate::error::{BalError, BalResult};
use crate::types::{OltId, RequestContext};
use log::debug;

/// Highest OLT id the host library accepts.
pub const BAL_MAX_OLTS: u32 = 16;

/// Highest number of PON interfaces a single OLT can report.
pub const BAL_MAX_PON_INTERFACES: u32 = 128;

#[cfg(feature = "bal-link")]
mod raw {
    use std::ffi::c_int;

    /// C-compatible topology returned by the shim (matches `openolt_bal_topology_t`).
    #[repr(C)]
    #[derive(Debug, Default)]
    pub struct RawTopology {
        pub num_switch_pon_ports: u32,
        pub num_pon_mac_devices: u32,
        pub pon_mode: u32,
    }

    extern "C" {
        pub fn openolt_bal_host_init() -> c_int;
        pub fn openolt_bal_olt_cfg_get(olt_id: u32, topology_out: *mut RawTopology) -> c_int;
        pub fn openolt_bal_pon_ni_activate(olt_id: u32, pon_ni: u32) -> c_int;
    }
}

/// The production [`BalApi`] implementation.
#[derive(Debug, Default)]
pub struct BcmBal {
    _private: (),
}

impl BcmBal {
    pub fn new() -> Self {
        Self { _private: () }
    }

    fn check_olt(olt: OltId) -> BalResult<()> {
        if olt.as_raw() >= BAL_MAX_OLTS {
            return Err(BalError::invalid_parameter(format!(
                "OLT id {} out of range (max {})",
                olt,
                BAL_MAX_OLTS - 1
            )));
        }
        Ok(())
    }

    #[cfg(feature = "bal-link")]
    fn pon_mode_from_raw(raw: u32) -> PonMode {
        match raw {
            1 => PonMode::XgsPon,
            2 => PonMode::Xgpon,
            3 => PonMode::Epon,
            _ => PonMode::Gpon,
        }
    }
}

impl BalApi for BcmBal {
    fn host_init(&self, ctx: Option<&RequestContext>) -> BalResult<()> {
        debug!(
            "bal host_init (request {:?})",
            ctx.and_then(|c| c.request_id.as_deref())
        );

        #[cfg(feature = "bal-link")]
        {
            use crate::error::BcmosErrnoExt;
            // SAFETY: the shim takes no arguments and only touches driver state.
            unsafe { raw::openolt_bal_host_init() }.to_result()
        }

        #[cfg(not(feature = "bal-link"))]
        {
            log::warn!("BAL host library not linked; host_init unavailable");
            Err(BalError::not_supported("BAL host library not linked"))
        }
    }

    fn cfg_get(&self, olt: OltId) -> BalResult<OltCfg> {
        Self::check_olt(olt)?;

        #[cfg(feature = "bal-link")]
        {
            use crate::error::BcmosErrnoExt;
            let mut topo = raw::RawTopology::default();
            // SAFETY: `topo` is a valid, exclusively borrowed out-parameter for
            // the duration of the call.
            unsafe { raw::openolt_bal_olt_cfg_get(olt.as_raw(), &mut topo) }.to_result()?;

            if topo.num_switch_pon_ports > BAL_MAX_PON_INTERFACES {
                return Err(BalError::internal(format!(
                    "OLT {} reported {} PON ports (max {})",
                    olt, topo.num_switch_pon_ports, BAL_MAX_PON_INTERFACES
                )));
            }

            Ok(OltCfg {
                topology: OltTopology {
                    num_switch_pon_ports: topo.num_switch_pon_ports,
                    num_pon_mac_devices: topo.num_pon_mac_devices,
                    pon_mode: Self::pon_mode_from_raw(topo.pon_mode),
                },
                firmware_version: String::new(),
            })
        }

        #[cfg(not(feature = "bal-link"))]
        {
            Err(BalError::not_supported("BAL host library not linked"))
        }
    }

    fn oper_submit(&self, olt: OltId, oper: &OperRequest) -> BalResult<()> {
        Self::check_olt(olt)?;

        let OperRequest::PonInterfaceActivate { pon_ni } = *oper;
        if pon_ni.as_raw() >= BAL_MAX_PON_INTERFACES {
            return Err(BalError::invalid_parameter(format!(
                "PON interface {} out of range (max {})",
                pon_ni,
                BAL_MAX_PON_INTERFACES - 1
            )));
        }
        debug!("bal oper_submit olt {} activate pon_ni {}", olt, pon_ni);

        #[cfg(feature = "bal-link")]
        {
            use crate::error::BcmosErrnoExt;
            // SAFETY: plain integer arguments, no pointers cross the boundary.
            unsafe { raw::openolt_bal_pon_ni_activate(olt.as_raw(), pon_ni.as_raw()) }
                .to_result()
        }

        #[cfg(not(feature = "bal-link"))]
        {
            Err(BalError::not_supported("BAL host library not linked"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PonNiId;

    #[test]
    fn test_olt_id_validation() {
        let bal = BcmBal::new();
        let err = bal.cfg_get(OltId::new(BAL_MAX_OLTS)).unwrap_err();
        assert!(matches!(err, BalError::InvalidParameter { .. }));
    }

    #[test]
    fn test_pon_ni_validation() {
        let bal = BcmBal::new();
        let oper = OperRequest::activate_pon(PonNiId::new(BAL_MAX_PON_INTERFACES));
        let err = bal.oper_submit(OltId::new(0), &oper).unwrap_err();
        assert!(matches!(err, BalError::InvalidParameter { .. }));
    }

    #[cfg(not(feature = "bal-link"))]
    #[test]
    fn test_unlinked_calls_not_supported() {
        let bal = BcmBal::new();
        assert!(matches!(
            bal.host_init(None),
            Err(BalError::NotSupported { .. })
        ));
        assert!(matches!(
            bal.cfg_get(OltId::new(0)),
            Err(BalError::NotSupported { .. })
        ));
        assert!(matches!(
            bal.oper_submit(OltId::new(0), &OperRequest::activate_pon(PonNiId::new(0))),
            Err(BalError::NotSupported { .. })
        ));
    }
}
