//! OpenOLT agent entry point.
//!
//! Loads the configuration, enables the OLT once and then serves the command
//! queue until SIGINT.

use clap::Parser;
use openolt_agent::audit::{init_logging, AuditCategory, AuditOutcome, AuditRecord};
use openolt_agent::config::{AgentConfig, LogFormat};
use openolt_agent::daemon::{AgentDaemon, AgentDaemonConfig};
use openolt_agent::olt::{ConfigErrorPolicy, OltOrch};
use openolt_agent::{audit_log, error_log, info_log, warn_log};
use openolt_bal::{BcmBal, RequestContext};
use std::path::PathBuf;
use std::process::ExitCode;

/// OpenOLT Agent
#[derive(Parser, Debug)]
#[command(name = "openolt-agent")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// BAL id of the OLT to manage
    #[arg(short = 'd', long)]
    device_id: Option<u32>,

    /// PON ports assumed while the OLT has not published its configuration
    #[arg(long)]
    fallback_pon_ports: Option<u32>,

    /// Behavior when reading the OLT configuration fails
    #[arg(long, value_enum)]
    config_error_policy: Option<ConfigErrorPolicy>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    /// Skip the enable call at startup
    #[arg(long)]
    no_enable: bool,
}

impl Args {
    fn apply(&self, config: &mut AgentConfig) {
        if let Some(device_id) = self.device_id {
            config.device_id = device_id;
        }
        if let Some(count) = self.fallback_pon_ports {
            config.enable.fallback_pon_ports = count;
        }
        if let Some(policy) = self.config_error_policy {
            config.enable.config_error_policy = policy;
        }
        if let Some(ref level) = self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        if self.no_enable {
            config.enable_on_startup = false;
        }
    }
}

fn load_config(args: &Args) -> Result<AgentConfig, openolt_agent::ConfigError> {
    let mut config = match args.config {
        Some(ref path) => AgentConfig::load(path)?,
        None => AgentConfig::default(),
    };
    args.apply(&mut config);
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            init_logging(
                args.log_level.as_deref().unwrap_or("info"),
                args.log_format.unwrap_or_default(),
            );
            error_log!("main", error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.logging.level, config.logging.format);

    info_log!(
        "main",
        device_id = config.device_id,
        fallback_pon_ports = config.enable.fallback_pon_ports,
        config_error_policy = ?config.enable.config_error_policy,
        config_file = ?args.config,
        "Starting OpenOLT agent"
    );
    audit_log!(AuditRecord::new(AuditCategory::ConfigurationChange, "main", "config_loaded")
        .with_outcome(AuditOutcome::Success)
        .with_object_id(config.device_id.to_string())
        .with_object_type("olt")
        .with_details(serde_json::json!({
            "config_file": args.config.as_ref().map(|p| p.display().to_string()),
            "enable": &config.enable,
            "command_queue_depth": config.command_queue_depth,
            "enable_on_startup": config.enable_on_startup,
        })));

    let orch = OltOrch::new(BcmBal::new(), config.enable.clone());
    let daemon_config = AgentDaemonConfig {
        device_id: config.device_id,
        command_queue_depth: config.command_queue_depth,
    };
    let (daemon, handle) = AgentDaemon::new(daemon_config, orch);
    let daemon_task = tokio::spawn(daemon.run());

    if config.enable_on_startup {
        let ctx = RequestContext::new("startup").with_peer("openolt-agent");
        match handle.enable(config.device_id, Some(ctx)).await {
            Ok(result) if result.is_ok() => {
                info_log!(
                    "main",
                    device_id = config.device_id,
                    pon_ports = result.ports().len(),
                    failed = result.failed_ports(),
                    "OLT enabled at startup"
                );
            }
            Ok(result) => {
                let message = result.message();
                warn_log!(
                    "main",
                    device_id = config.device_id,
                    error = %message,
                    "OLT enable at startup failed, agent keeps running"
                );
            }
            Err(e) => {
                error_log!("main", error = %e, "Agent daemon unavailable");
                return ExitCode::FAILURE;
            }
        }
    }

    match tokio::signal::ctrl_c().await {
        Ok(()) => warn_log!("main", "Received SIGINT, shutting down gracefully..."),
        Err(e) => error_log!("main", error = %e, "Failed to listen for ctrl-c"),
    }

    if let Err(e) = handle.shutdown().await {
        warn_log!("main", error = %e, "Agent daemon already stopped");
    }

    match daemon_task.await {
        Ok(state) => {
            info_log!(
                "main",
                device_id = state.device_id(),
                lifecycle = %state.lifecycle(),
                "OpenOLT agent shutdown complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error_log!("main", error = %e, "Agent daemon task failed");
            ExitCode::FAILURE
        }
    }
}
