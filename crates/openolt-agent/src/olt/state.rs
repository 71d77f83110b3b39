//! Device lifecycle state.

use chrono::{DateTime, Utc};
use openolt_bal::OltId;
use serde::Serialize;
use std::fmt;

/// Whether the OLT is considered usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceLifecycle {
    Active,
    #[default]
    Deactivated,
}

impl fmt::Display for DeviceLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceLifecycle::Active => write!(f, "active"),
            DeviceLifecycle::Deactivated => write!(f, "deactivated"),
        }
    }
}

/// Recorded state of the single OLT managed by this agent.
///
/// Owned by the device manager and lent to the orchestrator for the duration
/// of one enable call. The orchestrator writes it once, at its commit step;
/// `activate`/`deactivate` exist for administrative overrides and test setup.
#[derive(Debug, Clone, Serialize)]
pub struct OltState {
    device_id: u32,
    lifecycle: DeviceLifecycle,
    /// PON ports found by the last enable that reached its commit step.
    pon_port_count: Option<u32>,
    last_transition: Option<DateTime<Utc>>,
}

impl OltState {
    /// Creates the record for `device_id`, starting `Deactivated`.
    pub fn new(device_id: u32) -> Self {
        Self {
            device_id,
            lifecycle: DeviceLifecycle::Deactivated,
            pon_port_count: None,
            last_transition: None,
        }
    }

    pub fn device_id(&self) -> u32 {
        self.device_id
    }

    pub fn olt_id(&self) -> OltId {
        OltId::new(self.device_id)
    }

    pub fn lifecycle(&self) -> DeviceLifecycle {
        self.lifecycle
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle == DeviceLifecycle::Active
    }

    pub fn pon_port_count(&self) -> Option<u32> {
        self.pon_port_count
    }

    pub fn last_transition(&self) -> Option<DateTime<Utc>> {
        self.last_transition
    }

    /// Marks the device active. Idempotent.
    pub fn activate(&mut self) {
        self.set_lifecycle(DeviceLifecycle::Active);
    }

    /// Marks the device deactivated. Idempotent.
    pub fn deactivate(&mut self) {
        self.set_lifecycle(DeviceLifecycle::Deactivated);
    }

    /// Records the verdict of an enable call in one step.
    pub(crate) fn commit(&mut self, active: bool, pon_port_count: u32) {
        self.pon_port_count = Some(pon_port_count);
        if active {
            self.activate();
        } else {
            self.deactivate();
        }
    }

    fn set_lifecycle(&mut self, lifecycle: DeviceLifecycle) {
        if self.lifecycle != lifecycle {
            self.lifecycle = lifecycle;
            self.last_transition = Some(Utc::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_deactivated() {
        let state = OltState::new(1);
        assert_eq!(state.device_id(), 1);
        assert_eq!(state.olt_id(), OltId::new(1));
        assert!(!state.is_active());
        assert_eq!(state.pon_port_count(), None);
        assert_eq!(state.last_transition(), None);
    }

    #[test]
    fn test_activate_deactivate_idempotent() {
        let mut state = OltState::new(1);

        state.activate();
        assert!(state.is_active());
        let first = state.last_transition();
        assert!(first.is_some());

        state.activate();
        assert!(state.is_active());
        assert_eq!(state.last_transition(), first);

        state.deactivate();
        state.deactivate();
        assert_eq!(state.lifecycle(), DeviceLifecycle::Deactivated);
    }

    #[test]
    fn test_commit_records_port_count() {
        let mut state = OltState::new(1);
        state.commit(true, 16);
        assert!(state.is_active());
        assert_eq!(state.pon_port_count(), Some(16));

        state.commit(false, 1);
        assert!(!state.is_active());
        assert_eq!(state.pon_port_count(), Some(1));
    }

    #[test]
    fn test_lifecycle_display() {
        assert_eq!(DeviceLifecycle::Active.to_string(), "active");
        assert_eq!(DeviceLifecycle::default().to_string(), "deactivated");
    }
}
