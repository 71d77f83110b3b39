//! Type-safe BAL object identifiers.
//!
//! BAL addresses objects by small integer keys (OLT id, PON interface index,
//! ONU id). These wrappers keep keys of different object kinds from being
//! mixed up, e.g. passing a PON interface index where an OLT id is expected.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

/// Raw BAL object key (the C API uses small unsigned integers).
pub type RawBalId = u32;

/// Marker trait for BAL object kinds.
pub trait BalObjectKind: Send + Sync + 'static {
    /// Returns the BAL object type name for debugging.
    fn type_name() -> &'static str;
}

/// A type-safe BAL object key.
///
/// # Examples
///
/// ```
/// use openolt_bal::{OltId, PonNiId};
///
/// let olt = OltId::new(1);
/// let pon: PonNiId = PonNiId::new(0);
///
/// // This would fail to compile:
/// // fn takes_olt(o: OltId) {}
/// // takes_olt(pon);  // Error: expected OltId, found PonNiId
/// assert_eq!(olt.as_raw(), 1);
/// assert_eq!(pon.as_raw(), 0);
/// ```
#[derive(Clone, Copy)]
pub struct BalId<T: BalObjectKind> {
    raw: RawBalId,
    _marker: PhantomData<T>,
}

impl<T: BalObjectKind> BalId<T> {
    pub const fn new(raw: RawBalId) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    pub const fn as_raw(&self) -> RawBalId {
        self.raw
    }
}

impl<T: BalObjectKind> fmt::Debug for BalId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", T::type_name(), self.raw)
    }
}

impl<T: BalObjectKind> fmt::Display for BalId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl<T: BalObjectKind> PartialEq for BalId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T: BalObjectKind> Eq for BalId<T> {}

impl<T: BalObjectKind> PartialOrd for BalId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: BalObjectKind> Ord for BalId<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<T: BalObjectKind> Hash for BalId<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

macro_rules! define_object_kind {
    ($name:ident, $type_name:literal, $id_alias:ident) => {
        /// Marker type for BAL $type_name objects.
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl BalObjectKind for $name {
            fn type_name() -> &'static str {
                $type_name
            }
        }

        /// Type alias for $type_name object keys.
        pub type $id_alias = BalId<$name>;
    };
}

define_object_kind!(OltKind, "Olt", OltId);
define_object_kind!(PonInterfaceKind, "PonInterface", PonNiId);

/// Opaque per-request context handed through to the BAL host calls.
///
/// The BAL layer never interprets it; it exists so the management plane can
/// correlate driver activity with the request that caused it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Identifier of the management-plane request, if any.
    pub request_id: Option<String>,
    /// Peer that issued the request (gRPC peer, CLI, startup).
    pub peer: Option<String>,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: Some(request_id.into()),
            peer: None,
        }
    }

    pub fn with_peer(mut self, peer: impl Into<String>) -> Self {
        self.peer = Some(peer.into());
        self
    }
}
