//! Safe Rust bindings for the Broadcom BAL host API.
//!
//! This crate wraps the calls the OpenOLT agent makes into the vendor
//! Broadband Adaptation Layer, converting raw `bcmos_errno` codes into typed
//! errors and keeping object keys of different kinds apart.
//!
//! # Architecture
//!
//! - [`types`]: Typed BAL object keys and the opaque request context
//! - [`error`]: `bcmos_errno` codes and the [`BalError`] type
//! - [`api`]: The [`BalApi`] boundary trait and the [`BcmBal`] driver binding
//! - `mock`: A scripted [`BalApi`] double (feature `mock`)
//!
//! # Example
//!
//! ```ignore
//! use openolt_bal::{BalApi, BalResult, OltId, OperRequest, PonNiId};
//!
//! fn bring_up(bal: &impl BalApi, olt: OltId) -> BalResult<()> {
//!     bal.host_init(None)?;
//!     let cfg = bal.cfg_get(olt)?;
//!     for pon in 0..cfg.num_pon_ports() {
//!         bal.oper_submit(olt, &OperRequest::activate_pon(PonNiId::new(pon)))?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod types;

pub use api::{BalApi, BcmBal, OltCfg, OltTopology, OperRequest, PonMode};
pub use error::{BalError, BalResult, BcmosErrno, BcmosErrnoExt};
pub use types::{
    BalId, BalObjectKind, OltId, OltKind, PonInterfaceKind, PonNiId, RawBalId, RequestContext,
};
