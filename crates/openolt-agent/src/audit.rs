//! Structured logging and audit trail for the agent.
//!
//! Operational logging goes through the `*_log!` macros, which tag every event
//! with the emitting component. State-changing actions (device activation,
//! lifecycle overrides, daemon start/stop) additionally produce an
//! [`AuditRecord`], serialized to JSON and emitted on the `audit` target so it
//! can be routed separately from the operational stream.
//!
//! | Macro | Level | Usage |
//! |-------|-------|-------|
//! | `error_log!` | Error | Failed hardware calls, rejected commands |
//! | `warn_log!` | Warn | Degraded but usable outcomes |
//! | `info_log!` | Info | Lifecycle milestones |
//! | `debug_log!` | Debug | Per-call detail |
//! | `audit_log!` | by outcome | [`AuditRecord`]s |

use crate::config::LogFormat;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Audit event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditCategory {
    /// Agent startup and shutdown
    SystemLifecycle,
    /// OLT enable attempts and their verdicts
    DeviceActivation,
    /// Per-PON-interface activation failures
    PonInterface,
    /// Calls into the BAL host API
    BalOperation,
    /// Agent configuration loaded
    ConfigurationChange,
    /// Administrative overrides of device state
    AdminAction,
}

impl fmt::Display for AuditCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditCategory::SystemLifecycle => write!(f, "SYSTEM_LIFECYCLE"),
            AuditCategory::DeviceActivation => write!(f, "DEVICE_ACTIVATION"),
            AuditCategory::PonInterface => write!(f, "PON_INTERFACE"),
            AuditCategory::BalOperation => write!(f, "BAL_OPERATION"),
            AuditCategory::ConfigurationChange => write!(f, "CONFIGURATION_CHANGE"),
            AuditCategory::AdminAction => write!(f, "ADMIN_ACTION"),
        }
    }
}

/// Outcome of an audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    Success,
    Failure,
    InProgress,
    /// Completed, but only part of the work succeeded
    Partial,
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditOutcome::Success => write!(f, "success"),
            AuditOutcome::Failure => write!(f, "failure"),
            AuditOutcome::InProgress => write!(f, "in_progress"),
            AuditOutcome::Partial => write!(f, "partial"),
        }
    }
}

/// One audit trail entry.
///
/// Built with the `with_*` methods and handed to `audit_log!`; the record is
/// not modified after it is logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// UTC time the record was created
    pub timestamp: DateTime<Utc>,

    pub category: AuditCategory,

    /// Component emitting the record (e.g. "OltOrch")
    pub source: String,

    pub action: String,

    pub outcome: AuditOutcome,

    /// Affected object, e.g. device id or PON interface index
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,

    /// Affected object kind, e.g. "olt", "pon_interface"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Request id of the management-plane call that caused the action
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

impl AuditRecord {
    /// Creates a record stamped with the current time; outcome starts as
    /// `InProgress`.
    pub fn new(
        category: AuditCategory,
        source: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            category,
            source: source.into(),
            action: action.into(),
            outcome: AuditOutcome::InProgress,
            object_id: None,
            object_type: None,
            details: None,
            error: None,
            correlation_id: None,
        }
    }

    pub fn with_outcome(mut self, outcome: AuditOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn with_object_id(mut self, id: impl Into<String>) -> Self {
        self.object_id = Some(id.into());
        self
    }

    pub fn with_object_type(mut self, obj_type: impl Into<String>) -> Self {
        self.object_type = Some(obj_type.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Sets the error message and marks the outcome as `Failure`.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self.outcome = AuditOutcome::Failure;
        self
    }

    /// Sets the correlation id when one is known.
    pub fn with_correlation_id(mut self, id: Option<impl Into<String>>) -> Self {
        self.correlation_id = id.map(Into::into);
        self
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| format!(r#"{{"error":"serialization_failed","message":"{}"}}"#, e))
    }
}

/// Debug-level log tagged with its source component.
///
/// ```ignore
/// debug_log!("OltOrch", pon_ni = 3, "message");
/// ```
#[macro_export]
macro_rules! debug_log {
    ($source:expr, $($arg:tt)*) => {
        tracing::debug!(source = $source, $($arg)*)
    };
}

#[macro_export]
macro_rules! info_log {
    ($source:expr, $($arg:tt)*) => {
        tracing::info!(source = $source, $($arg)*)
    };
}

#[macro_export]
macro_rules! warn_log {
    ($source:expr, $($arg:tt)*) => {
        tracing::warn!(source = $source, $($arg)*)
    };
}

#[macro_export]
macro_rules! error_log {
    ($source:expr, $($arg:tt)*) => {
        tracing::error!(source = $source, $($arg)*)
    };
}

/// Emits an [`AuditRecord`] on the `audit` target.
///
/// The level follows the outcome: failures at error, partial outcomes at
/// warn, in-progress records at debug, successes at info.
#[macro_export]
macro_rules! audit_log {
    ($record:expr) => {{
        let record: $crate::audit::AuditRecord = $record;
        match record.outcome {
            $crate::audit::AuditOutcome::Success => {
                $crate::__audit_event!(INFO, record)
            }
            $crate::audit::AuditOutcome::InProgress => {
                $crate::__audit_event!(DEBUG, record)
            }
            $crate::audit::AuditOutcome::Partial => {
                $crate::__audit_event!(WARN, record)
            }
            $crate::audit::AuditOutcome::Failure => {
                $crate::__audit_event!(ERROR, record)
            }
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __audit_event {
    ($level:ident, $record:ident) => {
        tracing::event!(
            target: "audit",
            tracing::Level::$level,
            category = %$record.category,
            source = %$record.source,
            action = %$record.action,
            outcome = %$record.outcome,
            object_id = $record.object_id.as_deref().unwrap_or(""),
            error = $record.error.as_deref().unwrap_or(""),
            audit_json = %$record.to_json(),
            "AUDIT: {} - {} - {}",
            $record.category,
            $record.action,
            $record.outcome
        )
    };
}

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over `log_level`. Records from crates that log
/// through `log` (the BAL bindings) are forwarded by the subscriber's
/// `tracing-log` bridge. Call once per process.
pub fn init_logging(log_level: &str, format: LogFormat) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .json(),
            )
            .init(),
        LogFormat::Pretty => registry.with(fmt::layer().with_file(true).pretty()).init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_record_creation() {
        let record = AuditRecord::new(AuditCategory::DeviceActivation, "OltOrch", "enable")
            .with_outcome(AuditOutcome::Success)
            .with_object_id("1")
            .with_object_type("olt");

        assert_eq!(record.category, AuditCategory::DeviceActivation);
        assert_eq!(record.source, "OltOrch");
        assert_eq!(record.action, "enable");
        assert_eq!(record.outcome, AuditOutcome::Success);
        assert_eq!(record.object_id, Some("1".to_string()));
        assert_eq!(record.object_type, Some("olt".to_string()));
    }

    #[test]
    fn test_audit_record_with_error() {
        let record = AuditRecord::new(AuditCategory::BalOperation, "OltOrch", "host_init")
            .with_error("BAL operation failed: BCM_ERR_INTERNAL");

        assert_eq!(record.outcome, AuditOutcome::Failure);
        assert_eq!(
            record.error,
            Some("BAL operation failed: BCM_ERR_INTERNAL".to_string())
        );
    }

    #[test]
    fn test_audit_record_json_serialization() {
        let record = AuditRecord::new(AuditCategory::PonInterface, "OltOrch", "activate_pon")
            .with_outcome(AuditOutcome::Partial)
            .with_details(serde_json::json!({
                "attempted": 4,
                "failed": 1
            }));

        let json = record.to_json();
        assert!(json.contains("PON_INTERFACE"));
        assert!(json.contains("\"outcome\":\"partial\""));
        assert!(json.contains("\"attempted\":4"));
        assert!(!json.contains("correlation_id"));
    }

    #[test]
    fn test_audit_category_display() {
        assert_eq!(AuditCategory::DeviceActivation.to_string(), "DEVICE_ACTIVATION");
        assert_eq!(AuditCategory::BalOperation.to_string(), "BAL_OPERATION");
        assert_eq!(AuditCategory::PonInterface.to_string(), "PON_INTERFACE");
        assert_eq!(
            AuditCategory::ConfigurationChange.to_string(),
            "CONFIGURATION_CHANGE"
        );
    }

    #[test]
    fn test_audit_log_every_outcome() {
        for outcome in [
            AuditOutcome::Success,
            AuditOutcome::InProgress,
            AuditOutcome::Partial,
            AuditOutcome::Failure,
        ] {
            crate::audit_log!(AuditRecord::new(AuditCategory::SystemLifecycle, "test", "emit")
                .with_outcome(outcome)
                .with_object_id("1"));
        }
    }

    #[test]
    fn test_audit_outcome_display() {
        assert_eq!(AuditOutcome::Success.to_string(), "success");
        assert_eq!(AuditOutcome::Partial.to_string(), "partial");
        assert_eq!(AuditOutcome::InProgress.to_string(), "in_progress");
    }

    #[test]
    fn test_audit_record_with_correlation_id() {
        let record = AuditRecord::new(AuditCategory::DeviceActivation, "OltOrch", "enable")
            .with_correlation_id(Some("req-42"));
        assert_eq!(record.correlation_id, Some("req-42".to_string()));

        let record = AuditRecord::new(AuditCategory::DeviceActivation, "OltOrch", "enable")
            .with_correlation_id(None::<String>);
        assert_eq!(record.correlation_id, None);
    }
}
