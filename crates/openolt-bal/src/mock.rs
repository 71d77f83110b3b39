//! Scripted [`BalApi`] test double.
//!
//! `MockBal` answers every call from a fixed script and journals the calls it
//! receives, so tests can assert both on the orchestrator's verdict and on the
//! exact hardware traffic that produced it.
//!
//! ```ignore
//! use openolt_bal::mock::MockBal;
//! use openolt_bal::{BalApi, BcmosErrno, OltId, OperRequest, PonNiId};
//!
//! let bal = MockBal::new()
//!     .with_cfg_get(BcmosErrno::NotConnected)
//!     .with_oper_submit_once(BcmosErrno::Internal)
//!     .with_oper_submit(BcmosErrno::Ok);
//!
//! assert!(bal.cfg_get(OltId::new(0)).unwrap_err().is_not_connected());
//! let oper = OperRequest::activate_pon(PonNiId::new(0));
//! assert!(bal.oper_submit(OltId::new(0), &oper).is_err());
//! assert!(bal.oper_submit(OltId::new(0), &oper).is_ok());
//! assert_eq!(bal.oper_submit_count(), 2);
//! ```

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use crate::api::olt::{OltCfg, OperRequest};
use crate::api::BalApi;
use crate::error::{BalResult, BcmosErrno};
use crate::types::{OltId, PonNiId, RequestContext};

/// One call received by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalCall {
    HostInit { request_id: Option<String> },
    CfgGet { olt: OltId },
    OperSubmit { olt: OltId, oper: OperRequest },
}

#[derive(Debug)]
struct Script {
    host_init: BcmosErrno,
    cfg_get: BcmosErrno,
    olt_cfg: OltCfg,
    oper_once: VecDeque<BcmosErrno>,
    oper_default: BcmosErrno,
}

/// Scripted BAL double. Unscripted calls succeed.
#[derive(Debug)]
pub struct MockBal {
    script: Mutex<Script>,
    journal: Mutex<Vec<BalCall>>,
}

impl Default for MockBal {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockBal {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(Script {
                host_init: BcmosErrno::Ok,
                cfg_get: BcmosErrno::Ok,
                olt_cfg: OltCfg::default(),
                oper_once: VecDeque::new(),
                oper_default: BcmosErrno::Ok,
            }),
            journal: Mutex::new(Vec::new()),
        }
    }

    /// Sets the code returned by every `host_init`.
    pub fn with_host_init(self, errno: BcmosErrno) -> Self {
        lock(&self.script).host_init = errno;
        self
    }

    /// Sets the code returned by every `cfg_get`.
    pub fn with_cfg_get(self, errno: BcmosErrno) -> Self {
        lock(&self.script).cfg_get = errno;
        self
    }

    /// Sets the configuration `cfg_get` returns when it succeeds.
    pub fn with_olt_cfg(self, cfg: OltCfg) -> Self {
        lock(&self.script).olt_cfg = cfg;
        self
    }

    /// Queues a one-shot `oper_submit` result, consumed before the default.
    pub fn with_oper_submit_once(self, errno: BcmosErrno) -> Self {
        lock(&self.script).oper_once.push_back(errno);
        self
    }

    /// Sets the `oper_submit` result used once the one-shot queue is empty.
    pub fn with_oper_submit(self, errno: BcmosErrno) -> Self {
        lock(&self.script).oper_default = errno;
        self
    }

    /// Returns every call received so far.
    pub fn calls(&self) -> Vec<BalCall> {
        lock(&self.journal).clone()
    }

    pub fn host_init_count(&self) -> usize {
        lock(&self.journal)
            .iter()
            .filter(|c| matches!(c, BalCall::HostInit { .. }))
            .count()
    }

    pub fn cfg_get_count(&self) -> usize {
        lock(&self.journal)
            .iter()
            .filter(|c| matches!(c, BalCall::CfgGet { .. }))
            .count()
    }

    pub fn oper_submit_count(&self) -> usize {
        lock(&self.journal)
            .iter()
            .filter(|c| matches!(c, BalCall::OperSubmit { .. }))
            .count()
    }

    /// PON interfaces targeted by `oper_submit`, in submission order.
    pub fn submitted_pon_ports(&self) -> Vec<PonNiId> {
        lock(&self.journal)
            .iter()
            .filter_map(|c| match c {
                BalCall::OperSubmit { oper, .. } => Some(oper.pon_ni()),
                _ => None,
            })
            .collect()
    }

    /// Forgets the journal, keeping the script.
    pub fn clear_calls(&self) {
        lock(&self.journal).clear();
    }

    fn record(&self, call: BalCall) {
        lock(&self.journal).push(call);
    }
}

impl BalApi for MockBal {
    fn host_init(&self, ctx: Option<&RequestContext>) -> BalResult<()> {
        self.record(BalCall::HostInit {
            request_id: ctx.and_then(|c| c.request_id.clone()),
        });
        lock(&self.script).host_init.into_result()
    }

    fn cfg_get(&self, olt: OltId) -> BalResult<OltCfg> {
        self.record(BalCall::CfgGet { olt });
        let script = lock(&self.script);
        script.cfg_get.into_result()?;
        Ok(script.olt_cfg.clone())
    }

    fn oper_submit(&self, olt: OltId, oper: &OperRequest) -> BalResult<()> {
        self.record(BalCall::OperSubmit { olt, oper: *oper });
        let mut script = lock(&self.script);
        let errno = script.oper_once.pop_front().unwrap_or(script.oper_default);
        errno.into_result()
    }
}
