use std::fmt;

use crate::native::CommandHandle;

pub type Result<T> = std::result::Result<T, VcxError>;

/// Return codes reported by libvcx, either as the synchronous result of an
/// entry point or as the `err` argument of a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Success,
    UnknownError,
    ConnectionError,
    InvalidConnectionHandle,
    InvalidConfiguration,
    NotReady,
    InvalidOption,
    PostMessageFailure,
    InvalidJson,
    Other(u32),
}

impl ErrorCode {
    pub fn code(&self) -> u32 {
        match self {
            ErrorCode::Success => 0,
            ErrorCode::UnknownError => 1001,
            ErrorCode::ConnectionError => 1002,
            ErrorCode::InvalidConnectionHandle => 1003,
            ErrorCode::InvalidConfiguration => 1004,
            ErrorCode::NotReady => 1005,
            ErrorCode::InvalidOption => 1007,
            ErrorCode::PostMessageFailure => 1010,
            ErrorCode::InvalidJson => 1016,
            ErrorCode::Other(code) => *code,
        }
    }

    pub fn is_success(&self) -> bool {
        *self == ErrorCode::Success
    }
}

impl From<u32> for ErrorCode {
    fn from(code: u32) -> Self {
        match code {
            0 => ErrorCode::Success,
            1001 => ErrorCode::UnknownError,
            1002 => ErrorCode::ConnectionError,
            1003 => ErrorCode::InvalidConnectionHandle,
            1004 => ErrorCode::InvalidConfiguration,
            1005 => ErrorCode::NotReady,
            1007 => ErrorCode::InvalidOption,
            1010 => ErrorCode::PostMessageFailure,
            1016 => ErrorCode::InvalidJson,
            other => ErrorCode::Other(other),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCode::Success => "success",
            ErrorCode::UnknownError => "unknown error",
            ErrorCode::ConnectionError => "connection error",
            ErrorCode::InvalidConnectionHandle => "invalid connection handle",
            ErrorCode::InvalidConfiguration => "invalid configuration",
            ErrorCode::NotReady => "not ready",
            ErrorCode::InvalidOption => "invalid option",
            ErrorCode::PostMessageFailure => "failed to post message",
            ErrorCode::InvalidJson => "invalid json",
            ErrorCode::Other(_) => "unrecognized error",
        };
        write!(f, "{name} ({})", self.code())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VcxError {
    /// libvcx reported a non-zero error code.
    #[error("libvcx returned {code}")]
    Native { code: ErrorCode },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParam { name: &'static str, reason: String },

    #[error("{operation} completed without a payload")]
    MissingPayload { operation: &'static str },

    #[error("{operation} returned a payload that is not valid UTF-8")]
    InvalidUtf8 { operation: &'static str },

    #[error("{operation} timed out waiting for callback on command handle {handle}")]
    Timeout {
        operation: &'static str,
        handle: CommandHandle,
    },

    /// The pending slot was dropped before the native callback completed it.
    #[error("{operation} on command handle {handle} was cancelled")]
    Cancelled {
        operation: &'static str,
        handle: CommandHandle,
    },

    #[error("agent provisioning failed")]
    ProvisionFailed,
}

impl VcxError {
    /// The libvcx error code, if this error originated on the native side.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            VcxError::Native { code } => Some(*code),
            _ => None,
        }
    }
}

impl From<ErrorCode> for VcxError {
    fn from(code: ErrorCode) -> Self {
        VcxError::Native { code }
    }
}

/// Turns a raw libvcx return code into a `Result`.
pub fn check_result(rc: u32) -> Result<()> {
    match ErrorCode::from(rc) {
        ErrorCode::Success => Ok(()),
        code => Err(code.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_both_ways() {
        for code in [0, 1001, 1002, 1003, 1004, 1005, 1007, 1010, 1016] {
            assert_eq!(ErrorCode::from(code).code(), code);
        }
        assert_eq!(ErrorCode::from(1007), ErrorCode::InvalidOption);
    }

    #[test]
    fn unknown_code_is_preserved() {
        let code = ErrorCode::from(9999);
        assert_eq!(code, ErrorCode::Other(9999));
        assert_eq!(code.code(), 9999);
        assert_eq!(code.to_string(), "unrecognized error (9999)");
    }

    #[test]
    fn check_result_passes_success_only() {
        assert!(check_result(0).is_ok());

        let err = check_result(1004).unwrap_err();
        assert_eq!(err.error_code(), Some(ErrorCode::InvalidConfiguration));
        assert_eq!(
            err.to_string(),
            "libvcx returned invalid configuration (1004)"
        );
    }
}
