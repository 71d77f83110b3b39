//! BAL error types and status handling.
//!
//! This module converts raw `bcmos_errno` codes returned by the BAL host API
//! into Rust's Result type.

use std::fmt;
use thiserror::Error;

/// BAL error codes matching the vendor C API.
///
/// These values correspond to `bcmos_errno` in the BAL host headers.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BcmosErrno {
    Ok = 0,
    InProgress = -1,
    Parm = -2,
    NoMem = -3,
    NoRes = -4,
    Internal = -5,
    NoEnt = -6,
    NoDev = -7,
    Already = -8,
    Range = -9,
    Perm = -10,
    NotSupported = -11,
    Parse = -12,
    InvalidOp = -13,
    Io = -14,
    State = -15,
    Deleted = -16,
    TooMany = -17,
    NotConnected = -18,
    Overflow = -19,
    CommFail = -20,
    Timeout = -21,
}

impl BcmosErrno {
    /// Creates a BcmosErrno from a raw i32 value.
    ///
    /// Codes this crate does not know about are reported as `Internal`.
    pub fn from_raw(errno: i32) -> Self {
        match errno {
            0 => BcmosErrno::Ok,
            -1 => BcmosErrno::InProgress,
            -2 => BcmosErrno::Parm,
            -3 => BcmosErrno::NoMem,
            -4 => BcmosErrno::NoRes,
            -5 => BcmosErrno::Internal,
            -6 => BcmosErrno::NoEnt,
            -7 => BcmosErrno::NoDev,
            -8 => BcmosErrno::Already,
            -9 => BcmosErrno::Range,
            -10 => BcmosErrno::Perm,
            -11 => BcmosErrno::NotSupported,
            -12 => BcmosErrno::Parse,
            -13 => BcmosErrno::InvalidOp,
            -14 => BcmosErrno::Io,
            -15 => BcmosErrno::State,
            -16 => BcmosErrno::Deleted,
            -17 => BcmosErrno::TooMany,
            -18 => BcmosErrno::NotConnected,
            -19 => BcmosErrno::Overflow,
            -20 => BcmosErrno::CommFail,
            -21 => BcmosErrno::Timeout,
            _ => BcmosErrno::Internal,
        }
    }

    /// Returns the raw `bcmos_errno` value.
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    pub fn is_ok(&self) -> bool {
        *self == BcmosErrno::Ok
    }

    /// Converts to a Result, returning Ok(()) for `BCM_ERR_OK`.
    pub fn into_result(self) -> BalResult<()> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(BalError::from_errno(self))
        }
    }
}

impl fmt::Display for BcmosErrno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BcmosErrno::Ok => "BCM_ERR_OK",
            BcmosErrno::InProgress => "BCM_ERR_IN_PROGRESS",
            BcmosErrno::Parm => "BCM_ERR_PARM",
            BcmosErrno::NoMem => "BCM_ERR_NOMEM",
            BcmosErrno::NoRes => "BCM_ERR_NORES",
            BcmosErrno::Internal => "BCM_ERR_INTERNAL",
            BcmosErrno::NoEnt => "BCM_ERR_NOENT",
            BcmosErrno::NoDev => "BCM_ERR_NODEV",
            BcmosErrno::Already => "BCM_ERR_ALREADY",
            BcmosErrno::Range => "BCM_ERR_RANGE",
            BcmosErrno::Perm => "BCM_ERR_PERM",
            BcmosErrno::NotSupported => "BCM_ERR_NOT_SUPPORTED",
            BcmosErrno::Parse => "BCM_ERR_PARSE",
            BcmosErrno::InvalidOp => "BCM_ERR_INVALID_OP",
            BcmosErrno::Io => "BCM_ERR_IO",
            BcmosErrno::State => "BCM_ERR_STATE",
            BcmosErrno::Deleted => "BCM_ERR_DELETED",
            BcmosErrno::TooMany => "BCM_ERR_TOO_MANY",
            BcmosErrno::NotConnected => "BCM_ERR_NOT_CONNECTED",
            BcmosErrno::Overflow => "BCM_ERR_OVERFLOW",
            BcmosErrno::CommFail => "BCM_ERR_COMM_FAIL",
            BcmosErrno::Timeout => "BCM_ERR_TIMEOUT",
        };
        write!(f, "{}", s)
    }
}

/// Error type for BAL operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalError {
    /// BAL returned an error code with no more specific mapping.
    #[error("BAL operation failed: {errno}")]
    Status { errno: BcmosErrno },

    /// The device has not published its configuration yet.
    #[error("BAL device not connected")]
    NotConnected,

    /// The requested feature is not supported by the BAL build in use.
    #[error("Feature not supported: {feature}")]
    NotSupported { feature: String },

    /// Invalid parameter passed to the BAL API.
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// The requested object was not found.
    #[error("Object not found: {object}")]
    NotFound { object: String },

    /// Internal error.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl BalError {
    /// Creates an error from a BAL error code.
    pub fn from_errno(errno: BcmosErrno) -> Self {
        match errno {
            BcmosErrno::Ok => BalError::internal("from_errno called with BCM_ERR_OK"),
            BcmosErrno::NotConnected => BalError::NotConnected,
            BcmosErrno::NotSupported => BalError::NotSupported {
                feature: "unknown".to_string(),
            },
            BcmosErrno::Parm | BcmosErrno::Range => BalError::InvalidParameter {
                message: format!("BAL returned {}", errno),
            },
            BcmosErrno::NoEnt | BcmosErrno::NoDev => BalError::NotFound {
                object: "unknown".to_string(),
            },
            _ => BalError::Status { errno },
        }
    }

    pub fn not_supported(feature: impl Into<String>) -> Self {
        BalError::NotSupported {
            feature: feature.into(),
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        BalError::InvalidParameter {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        BalError::Internal {
            message: message.into(),
        }
    }

    /// Returns the closest `bcmos_errno` for this error.
    pub fn errno(&self) -> BcmosErrno {
        match self {
            BalError::Status { errno } => *errno,
            BalError::NotConnected => BcmosErrno::NotConnected,
            BalError::NotSupported { .. } => BcmosErrno::NotSupported,
            BalError::InvalidParameter { .. } => BcmosErrno::Parm,
            BalError::NotFound { .. } => BcmosErrno::NoEnt,
            BalError::Internal { .. } => BcmosErrno::Internal,
        }
    }

    /// Returns true for the `BCM_ERR_NOT_CONNECTED` bring-up condition.
    pub fn is_not_connected(&self) -> bool {
        matches!(self, BalError::NotConnected)
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BalError::Status {
                errno: BcmosErrno::InProgress
                    | BcmosErrno::NoRes
                    | BcmosErrno::NoMem
                    | BcmosErrno::CommFail
                    | BcmosErrno::Timeout
            }
        )
    }
}

/// Result type for BAL operations.
pub type BalResult<T> = Result<T, BalError>;

/// Extension trait for converting raw `bcmos_errno` codes.
pub trait BcmosErrnoExt {
    fn to_result(self) -> BalResult<()>;
}

impl BcmosErrnoExt for i32 {
    fn to_result(self) -> BalResult<()> {
        BcmosErrno::from_raw(self).into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno_ok() {
        assert!(BcmosErrno::Ok.is_ok());
        assert!(BcmosErrno::Ok.into_result().is_ok());
    }

    #[test]
    fn test_errno_from_raw() {
        assert_eq!(BcmosErrno::from_raw(0), BcmosErrno::Ok);
        assert_eq!(BcmosErrno::from_raw(-5), BcmosErrno::Internal);
        assert_eq!(BcmosErrno::from_raw(-18), BcmosErrno::NotConnected);
        assert_eq!(BcmosErrno::from_raw(-999), BcmosErrno::Internal);
        assert_eq!(BcmosErrno::NotConnected.as_raw(), -18);
    }

    #[test]
    fn test_not_connected_is_distinguished() {
        let err = BcmosErrno::NotConnected.into_result().unwrap_err();
        assert!(err.is_not_connected());
        assert_eq!(err.errno(), BcmosErrno::NotConnected);

        let err = BcmosErrno::Internal.into_result().unwrap_err();
        assert!(!err.is_not_connected());
        assert_eq!(err, BalError::Status { errno: BcmosErrno::Internal });
    }

    #[test]
    fn test_error_from_errno() {
        assert!(matches!(
            BalError::from_errno(BcmosErrno::NoDev),
            BalError::NotFound { .. }
        ));
        assert!(matches!(
            BalError::from_errno(BcmosErrno::Parm),
            BalError::InvalidParameter { .. }
        ));
        assert!(matches!(
            BalError::from_errno(BcmosErrno::Ok),
            BalError::Internal { .. }
        ));
    }

    #[test]
    fn test_raw_errno_to_result() {
        assert!(0_i32.to_result().is_ok());
        assert!((-18_i32).to_result().unwrap_err().is_not_connected());
    }

    #[test]
    fn test_error_retryable() {
        assert!(BalError::from_errno(BcmosErrno::Timeout).is_retryable());
        assert!(!BalError::from_errno(BcmosErrno::Internal).is_retryable());
        assert!(!BalError::NotConnected.is_retryable());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            BalError::from_errno(BcmosErrno::Internal).to_string(),
            "BAL operation failed: BCM_ERR_INTERNAL"
        );
        assert_eq!(BalError::NotConnected.to_string(), "BAL device not connected");
    }
}
