//! Enable results and per-port outcomes.

use super::orch::EnableError;
use openolt_bal::PonNiId;
use std::fmt;

/// Outcome of one PON port activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PonPortStatus {
    Success,
    Failed,
}

/// A PON port attempted during one enable call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PonPort {
    pub index: PonNiId,
    pub status: PonPortStatus,
    /// BAL error text when the activation failed.
    pub error: Option<String>,
}

impl PonPort {
    pub fn succeeded(index: PonNiId) -> Self {
        Self {
            index,
            status: PonPortStatus::Success,
            error: None,
        }
    }

    pub fn failed(index: PonNiId, error: impl Into<String>) -> Self {
        Self {
            index,
            status: PonPortStatus::Failed,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == PonPortStatus::Success
    }
}

/// Where the PON port count of an enable call came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscoverySource {
    /// The OLT reported its configuration.
    Configured,
    /// The OLT answered "not connected"; the fallback port set was used.
    NotConnectedFallback,
    /// The configuration read failed otherwise; the fallback port set was used.
    ErrorFallback,
}

impl fmt::Display for DiscoverySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoverySource::Configured => write!(f, "configured"),
            DiscoverySource::NotConnectedFallback => write!(f, "not_connected_fallback"),
            DiscoverySource::ErrorFallback => write!(f, "error_fallback"),
        }
    }
}

/// Aggregate outcome of one enable call.
///
/// Callers get a single pass/fail verdict plus the per-port detail that led
/// to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationResult {
    error: Option<EnableError>,
    ports: Vec<PonPort>,
    discovery: Option<DiscoverySource>,
}

impl ActivationResult {
    /// Message carried by a successful result.
    pub const OK_MESSAGE: &'static str = "";

    /// A result rejected before any PON port was attempted.
    pub fn rejected(error: EnableError) -> Self {
        Self {
            error: Some(error),
            ports: Vec::new(),
            discovery: None,
        }
    }

    pub(crate) fn from_ports(
        ports: Vec<PonPort>,
        discovery: DiscoverySource,
        verdict: Result<(), EnableError>,
    ) -> Self {
        Self {
            error: verdict.err(),
            ports,
            discovery: Some(discovery),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// `OK_MESSAGE` on success, otherwise a description of the failure.
    pub fn message(&self) -> String {
        match &self.error {
            None => Self::OK_MESSAGE.to_string(),
            Some(e) => e.to_string(),
        }
    }

    pub fn error(&self) -> Option<&EnableError> {
        self.error.as_ref()
    }

    pub fn ports(&self) -> &[PonPort] {
        &self.ports
    }

    pub fn discovery(&self) -> Option<DiscoverySource> {
        self.discovery
    }

    pub fn succeeded_ports(&self) -> usize {
        self.ports.iter().filter(|p| p.is_success()).count()
    }

    pub fn failed_ports(&self) -> usize {
        self.ports.len() - self.succeeded_ports()
    }

    pub fn into_result(self) -> Result<Vec<PonPort>, EnableError> {
        match self.error {
            None => Ok(self.ports),
            Some(e) => Err(e),
        }
    }
}
