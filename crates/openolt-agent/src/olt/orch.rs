//! OLT enable orchestration.

use super::state::OltState;
use super::types::{ActivationResult, DiscoverySource, PonPort};
use crate::audit::{AuditCategory, AuditOutcome, AuditRecord};
use crate::{audit_log, debug_log, error_log, info_log, warn_log};
use openolt_bal::{BalApi, BalError, OltId, OperRequest, PonNiId, RequestContext};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an enable call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnableError {
    /// The requested device is not the one this agent manages.
    #[error("Unknown device {requested} (managing device {managed})")]
    UnknownDevice { requested: u32, managed: u32 },

    /// BAL host initialization failed.
    #[error("Failed to init OLT host interface: {0}")]
    HostInit(BalError),

    /// Reading the OLT configuration failed under the fatal policy.
    #[error("Failed to read OLT configuration: {0}")]
    ConfigFetch(BalError),

    /// Every discovered PON port failed to activate.
    #[error("Failed to activate all PON ports ({attempted} attempted)")]
    AllPonPortsFailed { attempted: u32 },
}

/// What to do when the OLT configuration read fails with anything other than
/// "not connected".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConfigErrorPolicy {
    /// Warn and continue with the fallback port set.
    #[default]
    Fallback,
    /// Fail the enable call before touching any PON port.
    Fatal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OltOrchConfig {
    /// PON ports assumed when the OLT has not published its configuration.
    pub fallback_pon_ports: u32,
    pub config_error_policy: ConfigErrorPolicy,
}

impl Default for OltOrchConfig {
    fn default() -> Self {
        Self {
            fallback_pon_ports: 1,
            config_error_policy: ConfigErrorPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OltOrchStats {
    pub enable_attempts: u64,
    pub enables_succeeded: u64,
    pub host_init_failures: u64,
    pub config_fallbacks: u64,
    pub pon_activation_failures: u64,
}

/// Drives OLT bring-up through a [`BalApi`].
///
/// The orchestrator holds no device state of its own: the caller lends it the
/// [`OltState`] for each call and serializes calls.
pub struct OltOrch<B: BalApi> {
    bal: B,
    config: OltOrchConfig,
    stats: OltOrchStats,
}

impl<B: BalApi> OltOrch<B> {
    pub fn new(bal: B, config: OltOrchConfig) -> Self {
        Self {
            bal,
            config,
            stats: OltOrchStats::default(),
        }
    }

    pub fn stats(&self) -> &OltOrchStats {
        &self.stats
    }

    /// Enables the OLT.
    ///
    /// Runs host init, discovers the PON ports and activates each of them.
    /// The call succeeds when host init succeeds and either no port was found
    /// or at least one port activated. Failures before port discovery leave
    /// `state` untouched; otherwise `state` is committed once, after every port
    /// has been attempted.
    pub fn enable(
        &mut self,
        state: &mut OltState,
        device_id: u32,
        ctx: Option<&RequestContext>,
    ) -> ActivationResult {
        self.stats.enable_attempts += 1;
        let correlation_id = ctx.and_then(|c| c.request_id.clone());

        info_log!("OltOrch", device_id = device_id, "Enabling OLT");

        if device_id != state.device_id() {
            let err = EnableError::UnknownDevice {
                requested: device_id,
                managed: state.device_id(),
            };
            error_log!("OltOrch", device_id = device_id, error = %err, "Rejecting enable");
            audit_log!(AuditRecord::new(AuditCategory::DeviceActivation, "OltOrch", "enable")
                .with_object_id(device_id.to_string())
                .with_object_type("olt")
                .with_correlation_id(correlation_id)
                .with_error(err.to_string()));
            return ActivationResult::rejected(err);
        }

        let olt = state.olt_id();

        if let Err(e) = self.bal.host_init(ctx) {
            self.stats.host_init_failures += 1;
            error_log!("OltOrch", device_id = device_id, error = %e, "BAL host init failed");
            audit_log!(AuditRecord::new(AuditCategory::BalOperation, "OltOrch", "host_init")
                .with_object_id(device_id.to_string())
                .with_object_type("olt")
                .with_correlation_id(correlation_id)
                .with_error(e.to_string()));
            return ActivationResult::rejected(EnableError::HostInit(e));
        }

        let (pon_port_count, discovery) = match self.discover_pon_ports(olt) {
            Ok(found) => found,
            Err(e) => {
                audit_log!(AuditRecord::new(AuditCategory::BalOperation, "OltOrch", "cfg_get")
                    .with_object_id(device_id.to_string())
                    .with_object_type("olt")
                    .with_correlation_id(correlation_id)
                    .with_error(e.to_string()));
                return ActivationResult::rejected(e);
            }
        };

        let ports = self.activate_pon_ports(olt, pon_port_count, correlation_id.as_deref());
        let verdict = aggregate(&ports);
        let result = ActivationResult::from_ports(ports, discovery, verdict);

        state.commit(result.is_ok(), pon_port_count);

        if result.is_ok() {
            self.stats.enables_succeeded += 1;
            info_log!(
                "OltOrch",
                device_id = device_id,
                pon_ports = pon_port_count,
                failed = result.failed_ports(),
                discovery = %discovery,
                "OLT enabled"
            );
        } else {
            let message = result.message();
            error_log!(
                "OltOrch",
                device_id = device_id,
                pon_ports = pon_port_count,
                error = %message,
                "OLT enable failed"
            );
        }

        let outcome = match (result.is_ok(), result.failed_ports()) {
            (false, _) => AuditOutcome::Failure,
            (true, 0) => AuditOutcome::Success,
            (true, _) => AuditOutcome::Partial,
        };
        let mut record = AuditRecord::new(AuditCategory::DeviceActivation, "OltOrch", "enable")
            .with_object_id(device_id.to_string())
            .with_object_type("olt")
            .with_correlation_id(correlation_id)
            .with_details(serde_json::json!({
                "discovery": discovery.to_string(),
                "pon_ports": pon_port_count,
                "succeeded": result.succeeded_ports(),
                "failed": result.failed_ports(),
                "lifecycle": state.lifecycle().to_string(),
            }));
        record = match result.error() {
            Some(e) => record.with_error(e.to_string()),
            None => record.with_outcome(outcome),
        };
        audit_log!(record);

        result
    }

    fn discover_pon_ports(&mut self, olt: OltId) -> Result<(u32, DiscoverySource), EnableError> {
        match self.bal.cfg_get(olt) {
            Ok(cfg) => {
                debug_log!("OltOrch", olt = %olt, pon_ports = cfg.num_pon_ports(), "OLT configuration read");
                Ok((cfg.num_pon_ports(), DiscoverySource::Configured))
            }
            Err(e) if e.is_not_connected() => {
                self.stats.config_fallbacks += 1;
                info_log!(
                    "OltOrch",
                    olt = %olt,
                    pon_ports = self.config.fallback_pon_ports,
                    "OLT not connected, using fallback PON ports"
                );
                Ok((
                    self.config.fallback_pon_ports,
                    DiscoverySource::NotConnectedFallback,
                ))
            }
            Err(e) => match self.config.config_error_policy {
                ConfigErrorPolicy::Fallback => {
                    self.stats.config_fallbacks += 1;
                    warn_log!(
                        "OltOrch",
                        olt = %olt,
                        error = %e,
                        pon_ports = self.config.fallback_pon_ports,
                        "OLT configuration read failed, using fallback PON ports"
                    );
                    Ok((self.config.fallback_pon_ports, DiscoverySource::ErrorFallback))
                }
                ConfigErrorPolicy::Fatal => {
                    error_log!("OltOrch", olt = %olt, error = %e, "OLT configuration read failed");
                    Err(EnableError::ConfigFetch(e))
                }
            },
        }
    }

    fn activate_pon_ports(
        &mut self,
        olt: OltId,
        count: u32,
        correlation_id: Option<&str>,
    ) -> Vec<PonPort> {
        (0..count)
            .map(|i| {
                let pon_ni = PonNiId::new(i);
                match self.bal.oper_submit(olt, &OperRequest::activate_pon(pon_ni)) {
                    Ok(()) => {
                        debug_log!("OltOrch", pon_ni = i, "PON port activated");
                        PonPort::succeeded(pon_ni)
                    }
                    Err(e) => {
                        self.stats.pon_activation_failures += 1;
                        warn_log!(
                            "OltOrch",
                            pon_ni = i,
                            error = %e,
                            retryable = e.is_retryable(),
                            "PON port activation failed"
                        );
                        audit_log!(AuditRecord::new(AuditCategory::PonInterface, "OltOrch", "activate_pon")
                            .with_object_id(i.to_string())
                            .with_object_type("pon_interface")
                            .with_correlation_id(correlation_id)
                            .with_details(serde_json::json!({
                                "olt": olt.as_raw(),
                                "retryable": e.is_retryable(),
                            }))
                            .with_error(e.to_string()));
                        PonPort::failed(pon_ni, e.to_string())
                    }
                }
            })
            .collect()
    }
}

/// One activated port is enough; no ports at all is a success too.
fn aggregate(ports: &[PonPort]) -> Result<(), EnableError> {
    if ports.is_empty() || ports.iter().any(PonPort::is_success) {
        Ok(())
    } else {
        Err(EnableError::AllPonPortsFailed {
            attempted: ports.len() as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openolt_bal::mock::MockBal;
    use openolt_bal::{BcmosErrno, OltCfg};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn orch(bal: &Arc<MockBal>) -> OltOrch<Arc<MockBal>> {
        OltOrch::new(Arc::clone(bal), OltOrchConfig::default())
    }

    #[test]
    fn test_aggregate_quorum_of_one() {
        assert!(aggregate(&[]).is_ok());
        assert!(aggregate(&[
            PonPort::failed(PonNiId::new(0), "x"),
            PonPort::succeeded(PonNiId::new(1)),
        ])
        .is_ok());
        assert_eq!(
            aggregate(&[
                PonPort::failed(PonNiId::new(0), "x"),
                PonPort::failed(PonNiId::new(1), "y"),
            ]),
            Err(EnableError::AllPonPortsFailed { attempted: 2 })
        );
    }

    #[test]
    fn test_default_config() {
        let config = OltOrchConfig::default();
        assert_eq!(config.fallback_pon_ports, 1);
        assert_eq!(config.config_error_policy, ConfigErrorPolicy::Fallback);
    }

    #[test]
    fn test_unknown_device_rejected_without_bal_calls() {
        let bal = Arc::new(MockBal::new());
        let mut orch = orch(&bal);
        let mut state = OltState::new(1);
        state.activate();

        let result = orch.enable(&mut state, 2, None);

        assert_eq!(
            result.error(),
            Some(&EnableError::UnknownDevice {
                requested: 2,
                managed: 1
            })
        );
        assert!(bal.calls().is_empty());
        assert!(state.is_active());
    }

    #[test]
    fn test_host_init_failure_leaves_state_unchanged() {
        let bal = Arc::new(MockBal::new().with_host_init(BcmosErrno::Internal));
        let mut orch = orch(&bal);
        let mut state = OltState::new(1);
        state.activate();

        let result = orch.enable(&mut state, 1, None);

        assert!(matches!(result.error(), Some(EnableError::HostInit(_))));
        assert!(state.is_active());
        assert_eq!(state.pon_port_count(), None);
        assert_eq!(bal.cfg_get_count(), 0);
        assert_eq!(orch.stats().host_init_failures, 1);
    }

    #[test]
    fn test_configured_ports_all_submitted() {
        let bal = Arc::new(
            MockBal::new()
                .with_olt_cfg(OltCfg::with_pon_ports(4))
                .with_oper_submit(BcmosErrno::Internal),
        );
        let mut orch = orch(&bal);
        let mut state = OltState::new(1);

        let result = orch.enable(&mut state, 1, None);

        assert_eq!(
            result.error(),
            Some(&EnableError::AllPonPortsFailed { attempted: 4 })
        );
        assert_eq!(
            bal.submitted_pon_ports(),
            (0..4).map(PonNiId::new).collect::<Vec<_>>()
        );
        assert_eq!(orch.stats().pon_activation_failures, 4);
        assert_eq!(state.pon_port_count(), Some(4));
    }

    #[test]
    fn test_zero_ports_is_success() {
        let bal = Arc::new(MockBal::new().with_olt_cfg(OltCfg::with_pon_ports(0)));
        let mut orch = orch(&bal);
        let mut state = OltState::new(1);

        let result = orch.enable(&mut state, 1, None);

        assert!(result.is_ok());
        assert!(state.is_active());
        assert_eq!(bal.oper_submit_count(), 0);
        assert_eq!(state.pon_port_count(), Some(0));
    }

    #[test]
    fn test_config_error_fallback_policy() {
        let bal = Arc::new(MockBal::new().with_cfg_get(BcmosErrno::Timeout));
        let mut orch = orch(&bal);
        let mut state = OltState::new(1);

        let result = orch.enable(&mut state, 1, None);

        assert!(result.is_ok());
        assert_eq!(result.discovery(), Some(DiscoverySource::ErrorFallback));
        assert_eq!(bal.oper_submit_count(), 1);
        assert_eq!(orch.stats().config_fallbacks, 1);
    }

    #[test]
    fn test_config_error_fatal_policy() {
        let bal = Arc::new(MockBal::new().with_cfg_get(BcmosErrno::Timeout));
        let mut orch = OltOrch::new(
            Arc::clone(&bal),
            OltOrchConfig {
                config_error_policy: ConfigErrorPolicy::Fatal,
                ..OltOrchConfig::default()
            },
        );
        let mut state = OltState::new(1);
        state.activate();

        let result = orch.enable(&mut state, 1, None);

        assert!(matches!(result.error(), Some(EnableError::ConfigFetch(_))));
        assert_eq!(bal.oper_submit_count(), 0);
        assert!(state.is_active());
    }

    #[test]
    fn test_not_connected_ignores_fatal_policy() {
        let bal = Arc::new(MockBal::new().with_cfg_get(BcmosErrno::NotConnected));
        let mut orch = OltOrch::new(
            Arc::clone(&bal),
            OltOrchConfig {
                config_error_policy: ConfigErrorPolicy::Fatal,
                ..OltOrchConfig::default()
            },
        );
        let mut state = OltState::new(1);

        let result = orch.enable(&mut state, 1, None);

        assert!(result.is_ok());
        assert_eq!(result.discovery(), Some(DiscoverySource::NotConnectedFallback));
    }

    #[test]
    fn test_stats_accumulate() {
        let bal = Arc::new(MockBal::new().with_olt_cfg(OltCfg::with_pon_ports(2)));
        let mut orch = orch(&bal);
        let mut state = OltState::new(1);

        orch.enable(&mut state, 1, None);
        orch.enable(&mut state, 1, None);

        assert_eq!(
            orch.stats(),
            &OltOrchStats {
                enable_attempts: 2,
                enables_succeeded: 2,
                host_init_failures: 0,
                config_fallbacks: 0,
                pon_activation_failures: 0,
            }
        );
        assert_eq!(bal.host_init_count(), 2);
    }
}
