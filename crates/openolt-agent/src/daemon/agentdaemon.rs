//! AgentDaemon implementation.
//!
//! The AgentDaemon is the device manager for the single OLT this agent
//! drives. It owns:
//! - the [`OltState`] lifecycle record
//! - the [`OltOrch`] that performs enable calls against the BAL
//! - the command queue every management request goes through
//!
//! Commands are handled one at a time, so enable calls never overlap and the
//! lifecycle record has a single writer.
//!
//! BAL calls block. On a multi-threaded runtime an enable runs under
//! [`tokio::task::block_in_place`] so the other workers keep serving tasks; on
//! a current-thread runtime it runs inline and stalls the runtime until the
//! call returns.

use crate::audit::{AuditCategory, AuditOutcome, AuditRecord};
use crate::olt::{ActivationResult, DeviceLifecycle, OltOrch, OltOrchStats, OltState};
use crate::{audit_log, debug_log, info_log, warn_log};
use chrono::{DateTime, Utc};
use openolt_bal::{BalApi, RequestContext};
use serde::Serialize;
use thiserror::Error;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DaemonError {
    #[error("Agent daemon is not running")]
    QueueClosed,

    #[error("Agent daemon dropped the request without replying")]
    NoReply,
}

pub type DaemonResult<T> = Result<T, DaemonError>;

/// Configuration for the AgentDaemon.
#[derive(Debug, Clone)]
pub struct AgentDaemonConfig {
    /// BAL id of the managed OLT
    pub device_id: u32,
    /// Capacity of the command queue
    pub command_queue_depth: usize,
}

impl Default for AgentDaemonConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            command_queue_depth: 16,
        }
    }
}

/// Snapshot of the managed device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceStatus {
    pub device_id: u32,
    pub lifecycle: DeviceLifecycle,
    pub pon_port_count: Option<u32>,
    pub last_transition: Option<DateTime<Utc>>,
    pub stats: OltOrchStats,
}

/// A management request queued for the daemon.
#[derive(Debug)]
pub enum AgentCommand {
    Enable {
        device_id: u32,
        ctx: Option<RequestContext>,
        reply: oneshot::Sender<ActivationResult>,
    },
    Status {
        reply: oneshot::Sender<DeviceStatus>,
    },
    /// Administrative override: mark the device active without touching hardware.
    Activate {
        reply: oneshot::Sender<DeviceLifecycle>,
    },
    /// Administrative override: mark the device deactivated.
    Deactivate {
        reply: oneshot::Sender<DeviceLifecycle>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Cloneable client side of the command queue.
#[derive(Debug, Clone)]
pub struct AgentHandle {
    tx: mpsc::Sender<AgentCommand>,
}

impl AgentHandle {
    /// Enables the OLT and waits for the verdict.
    pub async fn enable(
        &self,
        device_id: u32,
        ctx: Option<RequestContext>,
    ) -> DaemonResult<ActivationResult> {
        self.request(|reply| AgentCommand::Enable {
            device_id,
            ctx,
            reply,
        })
        .await
    }

    pub async fn status(&self) -> DaemonResult<DeviceStatus> {
        self.request(|reply| AgentCommand::Status { reply }).await
    }

    pub async fn activate(&self) -> DaemonResult<DeviceLifecycle> {
        self.request(|reply| AgentCommand::Activate { reply }).await
    }

    pub async fn deactivate(&self) -> DaemonResult<DeviceLifecycle> {
        self.request(|reply| AgentCommand::Deactivate { reply }).await
    }

    /// Stops the daemon after the commands queued ahead of this one.
    pub async fn shutdown(&self) -> DaemonResult<()> {
        self.request(|reply| AgentCommand::Shutdown { reply }).await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> AgentCommand,
    ) -> DaemonResult<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(command(reply))
            .await
            .map_err(|_| DaemonError::QueueClosed)?;
        rx.await.map_err(|_| DaemonError::NoReply)
    }
}

/// The device manager task.
pub struct AgentDaemon<B: BalApi> {
    config: AgentDaemonConfig,
    orch: OltOrch<B>,
    state: OltState,
    commands: mpsc::Receiver<AgentCommand>,
}

impl<B: BalApi> AgentDaemon<B> {
    /// Creates the daemon and the first handle to its queue.
    pub fn new(config: AgentDaemonConfig, orch: OltOrch<B>) -> (Self, AgentHandle) {
        let (tx, commands) = mpsc::channel(config.command_queue_depth.max(1));
        let state = OltState::new(config.device_id);
        let daemon = Self {
            config,
            orch,
            state,
            commands,
        };
        (daemon, AgentHandle { tx })
    }

    /// Serves commands until a shutdown request arrives or every handle is
    /// dropped. Returns the final device state.
    pub async fn run(mut self) -> OltState {
        info_log!(
            "AgentDaemon",
            device_id = self.config.device_id,
            queue_depth = self.config.command_queue_depth,
            "Starting agent daemon"
        );
        audit_log!(AuditRecord::new(AuditCategory::SystemLifecycle, "AgentDaemon", "daemon_started")
            .with_outcome(AuditOutcome::Success)
            .with_object_id(self.config.device_id.to_string())
            .with_object_type("olt")
            .with_details(serde_json::json!({
                "command_queue_depth": self.config.command_queue_depth,
            })));

        while let Some(command) = self.commands.recv().await {
            if !self.dispatch(command) {
                break;
            }
        }

        info_log!(
            "AgentDaemon",
            device_id = self.config.device_id,
            lifecycle = %self.state.lifecycle(),
            "Agent daemon stopped"
        );
        audit_log!(AuditRecord::new(AuditCategory::SystemLifecycle, "AgentDaemon", "daemon_stopped")
            .with_outcome(AuditOutcome::Success)
            .with_object_id(self.config.device_id.to_string())
            .with_object_type("olt")
            .with_details(serde_json::json!({
                "lifecycle": self.state.lifecycle().to_string(),
            })));

        self.state
    }

    /// Handles one command. Returns false when the daemon should stop.
    fn dispatch(&mut self, command: AgentCommand) -> bool {
        match command {
            AgentCommand::Enable {
                device_id,
                ctx,
                reply,
            } => {
                let (orch, state) = (&mut self.orch, &mut self.state);
                let result = run_blocking(|| orch.enable(state, device_id, ctx.as_ref()));
                Self::send_reply(reply, result, "enable");
            }
            AgentCommand::Status { reply } => {
                Self::send_reply(reply, self.status(), "status");
            }
            AgentCommand::Activate { reply } => {
                self.state.activate();
                self.audit_override("activate");
                Self::send_reply(reply, self.state.lifecycle(), "activate");
            }
            AgentCommand::Deactivate { reply } => {
                self.state.deactivate();
                self.audit_override("deactivate");
                Self::send_reply(reply, self.state.lifecycle(), "deactivate");
            }
            AgentCommand::Shutdown { reply } => {
                info_log!("AgentDaemon", "Shutdown requested");
                Self::send_reply(reply, (), "shutdown");
                return false;
            }
        }
        true
    }

    fn status(&self) -> DeviceStatus {
        DeviceStatus {
            device_id: self.state.device_id(),
            lifecycle: self.state.lifecycle(),
            pon_port_count: self.state.pon_port_count(),
            last_transition: self.state.last_transition(),
            stats: self.orch.stats().clone(),
        }
    }

    fn audit_override(&self, action: &str) {
        info_log!(
            "AgentDaemon",
            device_id = self.config.device_id,
            lifecycle = %self.state.lifecycle(),
            "Lifecycle override: {}",
            action
        );
        audit_log!(AuditRecord::new(AuditCategory::AdminAction, "AgentDaemon", action)
            .with_outcome(AuditOutcome::Success)
            .with_object_id(self.config.device_id.to_string())
            .with_object_type("olt")
            .with_details(serde_json::json!({
                "lifecycle": self.state.lifecycle().to_string(),
            })));
    }

    fn send_reply<T>(reply: oneshot::Sender<T>, value: T, command: &str) {
        if reply.send(value).is_err() {
            warn_log!("AgentDaemon", command = command, "Requester went away before the reply");
        } else {
            debug_log!("AgentDaemon", command = command, "Command handled");
        }
    }
}

fn run_blocking<T>(f: impl FnOnce() -> T) -> T {
    match Handle::try_current().map(|h| h.runtime_flavor()) {
        Ok(RuntimeFlavor::MultiThread) => tokio::task::block_in_place(f),
        _ => f(),
    }
}
