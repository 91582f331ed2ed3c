//! # Error Types
//!
//! Fault taxonomy for tracing requests.
//!
//! `ptrace(2)` reports failure as a `-1` return plus a thread-local `errno`.
//! That pair is translated once, right after the dispatcher returns, into a
//! [`TetherError`]. Nothing above the dispatcher ever looks at a raw sentinel.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.

use thiserror::Error;

use crate::request::{ErrorCode, RequestKind};
use crate::types::ProcessId;

/// Main error type for tracing operations
///
/// Every variant that comes out of a kernel request records which request
/// failed and against which target.
///
/// ## Fault Categories
///
/// 1. **Permission**: the target refuses tracing (`EPERM`)
/// 2. **State**: the target is gone, not traced, or not stopped (`ESRCH`)
/// 3. **Io**: malformed request or unmapped address (`EIO`, `EFAULT`)
/// 4. **Unclassified**: any other failure, raw `errno` preserved
/// 5. **Unsupported**: capabilities this crate deliberately does not implement
/// 6. **InvalidArgument**: rejected locally before any request is issued
///
/// Recovery differs per category, so match on [`TetherError::kind`] rather
/// than on message text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TetherError
{
    /// The target cannot be traced
    ///
    /// Common causes:
    /// - The target belongs to another user and we lack `CAP_SYS_PTRACE`
    /// - Yama `ptrace_scope` forbids attaching to non-descendants
    /// - The target is already traced by someone else
    /// - The target is `init` or otherwise protected
    #[error("{request} on PID {pid}: permission denied, target cannot be traced")]
    Permission
    {
        /// Request that failed
        request: RequestKind,
        /// Target of the request
        pid: ProcessId,
    },

    /// The target is missing, not traced by us, or not stopped
    ///
    /// The kernel reports all three conditions with the same `ESRCH`, and
    /// nothing in the reply says which one applied. Callers that need to
    /// know must inspect the target themselves (e.g. `waitpid`).
    #[error("{request} on PID {pid}: target missing, not traced, or not stopped")]
    State
    {
        /// Request that failed
        request: RequestKind,
        /// Target of the request
        pid: ProcessId,
    },

    /// The request was malformed or touched an invalid memory region
    ///
    /// Usually a bug in the caller's address arithmetic: an unmapped address
    /// for a peek/poke, or an out-of-range user-area offset.
    #[error("{request} on PID {pid}: bad request or invalid memory region ({code})")]
    Io
    {
        /// Request that failed
        request: RequestKind,
        /// Target of the request
        pid: ProcessId,
        /// Which of the I/O codes the kernel used
        code: ErrorCode,
    },

    /// A failure that matches none of the known categories
    ///
    /// `errno` is `0` when the kernel returned the failure sentinel without
    /// setting an error code on a request whose result is a status.
    #[error("{request} on PID {pid}: unclassified failure (errno {errno})")]
    Unclassified
    {
        /// Request that failed
        request: RequestKind,
        /// Target of the request
        pid: ProcessId,
        /// Raw `errno` observed after the call
        errno: i32,
    },

    /// Invalid argument passed to a tracing function
    ///
    /// Raised before any request is issued, e.g. for a register name the
    /// active layout does not have.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation is not implemented by this crate
    ///
    /// Returned without contacting the kernel.
    #[error("{0} is not supported")]
    Unsupported(&'static str),
}

/// Category of a [`TetherError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind
{
    /// See [`TetherError::Permission`]
    Permission,
    /// See [`TetherError::State`]
    State,
    /// See [`TetherError::Io`]
    Io,
    /// See [`TetherError::Unclassified`]
    Unclassified,
    /// See [`TetherError::InvalidArgument`]
    InvalidArgument,
    /// See [`TetherError::Unsupported`]
    Unsupported,
}

impl TetherError
{
    /// Classify an `errno` observed after `request` failed against `pid`
    ///
    /// ```rust
    /// use tether_core::error::{FaultKind, TetherError};
    /// use tether_core::request::RequestKind;
    /// use tether_core::types::ProcessId;
    ///
    /// let err = TetherError::from_errno(RequestKind::Attach, ProcessId::from(1), libc::EPERM);
    /// assert_eq!(err.kind(), FaultKind::Permission);
    /// ```
    pub fn from_errno(request: RequestKind, pid: ProcessId, errno: i32) -> Self
    {
        match ErrorCode::from_errno(errno) {
            Some(ErrorCode::PermissionDenied) => TetherError::Permission { request, pid },
            Some(ErrorCode::NoSuchProcess) => TetherError::State { request, pid },
            Some(code @ (ErrorCode::InvalidRequest | ErrorCode::BadAddress)) => TetherError::Io { request, pid, code },
            None => TetherError::Unclassified { request, pid, errno },
        }
    }

    /// The fault category
    pub fn kind(&self) -> FaultKind
    {
        match self {
            TetherError::Permission { .. } => FaultKind::Permission,
            TetherError::State { .. } => FaultKind::State,
            TetherError::Io { .. } => FaultKind::Io,
            TetherError::Unclassified { .. } => FaultKind::Unclassified,
            TetherError::InvalidArgument(_) => FaultKind::InvalidArgument,
            TetherError::Unsupported(_) => FaultKind::Unsupported,
        }
    }

    /// The raw `errno` behind the fault, if it came from the kernel
    pub fn errno(&self) -> Option<i32>
    {
        match self {
            TetherError::Permission { .. } => Some(ErrorCode::PermissionDenied.errno()),
            TetherError::State { .. } => Some(ErrorCode::NoSuchProcess.errno()),
            TetherError::Io { code, .. } => Some(code.errno()),
            TetherError::Unclassified { errno, .. } => Some(*errno),
            TetherError::InvalidArgument(_) | TetherError::Unsupported(_) => None,
        }
    }

    /// The request that failed, if the fault came from the kernel
    pub fn request(&self) -> Option<RequestKind>
    {
        match self {
            TetherError::Permission { request, .. }
            | TetherError::State { request, .. }
            | TetherError::Io { request, .. }
            | TetherError::Unclassified { request, .. } => Some(*request),
            TetherError::InvalidArgument(_) | TetherError::Unsupported(_) => None,
        }
    }
}

/// Convenience type alias for `Result<T, TetherError>`
///
/// ```rust
/// use tether_core::error::TetherResult;
/// fn foo() -> TetherResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type TetherResult<T> = std::result::Result<T, TetherError>;
