//! The BAL host API boundary.
//!
//! [`BalApi`] is the capability set the agent needs from the vendor driver:
//! host initialization, OLT configuration retrieval and operation submission.
//! Every call is a blocking round trip to the driver; bounding its latency is
//! the driver's job.
//!
//! - [`olt`]: OLT configuration and operation types
//! - [`host`]: [`BcmBal`], the binding to the vendor host library

pub mod host;
pub mod olt;

pub use host::BcmBal;
pub use olt::{OltCfg, OltTopology, OperRequest, PonMode};

use crate::error::BalResult;
use crate::types::{OltId, RequestContext};

/// Hardware boundary consumed by the OLT orchestration code.
pub trait BalApi: Send + Sync {
    /// One-shot host-side driver initialization.
    fn host_init(&self, ctx: Option<&RequestContext>) -> BalResult<()>;

    /// Reads the OLT configuration.
    ///
    /// Fails with [`BalError::NotConnected`](crate::BalError::NotConnected)
    /// while the device has not published its configuration.
    fn cfg_get(&self, olt: OltId) -> BalResult<OltCfg>;

    /// Submits one operation to the OLT.
    fn oper_submit(&self, olt: OltId, oper: &OperRequest) -> BalResult<()>;
}

impl<B: BalApi + ?Sized> BalApi for std::sync::Arc<B> {
    fn host_init(&self, ctx: Option<&RequestContext>) -> BalResult<()> {
        (**self).host_init(ctx)
    }

    fn cfg_get(&self, olt: OltId) -> BalResult<OltCfg> {
        (**self).cfg_get(olt)
    }

    fn oper_submit(&self, olt: OltId, oper: &OperRequest) -> BalResult<()> {
        (**self).oper_submit(olt, oper)
    }
}
