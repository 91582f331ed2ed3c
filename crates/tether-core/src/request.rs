//! # Request and Error Code Tables
//!
//! Symbolic names for the `ptrace(2)` requests this crate issues and for the
//! `errno` values it knows how to classify.
//!
//! Both tables are plain `const` data: they are never mutated and carry no
//! run-time state. The numeric request codes are the Linux generic values
//! shared by i386 and x86-64, which is why they sit next to, not inside, the
//! architecture-specific register layouts.
//!
//! ## References
//!
//! - [include/uapi/linux/ptrace.h](https://github.com/torvalds/linux/blob/master/include/uapi/linux/ptrace.h)
//! - [arch/x86/include/uapi/asm/ptrace-abi.h](https://github.com/torvalds/linux/blob/master/arch/x86/include/uapi/asm/ptrace-abi.h)

use std::fmt;

/// Numeric request code as passed in `ptrace(2)`'s first argument.
pub type RequestCode = u32;

/// A tracing request this crate can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind
{
    /// `PTRACE_PEEKTEXT`: read a word of instruction memory
    PeekText,
    /// `PTRACE_PEEKDATA`: read a word of data memory
    PeekData,
    /// `PTRACE_PEEKUSER`: read a word of the user area
    PeekUser,
    /// `PTRACE_POKETEXT`: write a word of instruction memory
    PokeText,
    /// `PTRACE_POKEDATA`: write a word of data memory
    PokeData,
    /// `PTRACE_POKEUSER`: write a word of the user area
    PokeUser,
    /// `PTRACE_CONT`: resume the target
    Cont,
    /// `PTRACE_KILL`: terminate the target
    Kill,
    /// `PTRACE_SINGLESTEP`: resume for one instruction
    SingleStep,
    /// `PTRACE_GETREGS`: copy out the general-purpose registers
    GetRegs,
    /// `PTRACE_SETREGS`: copy in the general-purpose registers
    SetRegs,
    /// `PTRACE_GETFPREGS`: copy out the floating-point registers
    GetFpRegs,
    /// `PTRACE_SETFPREGS`: copy in the floating-point registers
    SetFpRegs,
    /// `PTRACE_ATTACH`: start tracing the target
    Attach,
    /// `PTRACE_DETACH`: stop tracing the target
    Detach,
    /// `PTRACE_SYSCALL`: resume until the next syscall entry or exit
    Syscall,
    /// `PTRACE_SETOPTIONS`: set the `PTRACE_O_*` option mask
    SetOptions,
}

impl RequestKind
{
    /// Every request kind, in table order
    pub const ALL: [RequestKind; 17] = [
        RequestKind::PeekText,
        RequestKind::PeekData,
        RequestKind::PeekUser,
        RequestKind::PokeText,
        RequestKind::PokeData,
        RequestKind::PokeUser,
        RequestKind::Cont,
        RequestKind::Kill,
        RequestKind::SingleStep,
        RequestKind::GetRegs,
        RequestKind::SetRegs,
        RequestKind::GetFpRegs,
        RequestKind::SetFpRegs,
        RequestKind::Attach,
        RequestKind::Detach,
        RequestKind::Syscall,
        RequestKind::SetOptions,
    ];

    /// Kernel request code
    ///
    /// ```rust
    /// use tether_core::request::RequestKind;
    ///
    /// assert_eq!(RequestKind::PeekData.code(), 2);
    /// assert_eq!(RequestKind::SetOptions.code(), 0x4200);
    /// ```
    pub const fn code(self) -> RequestCode
    {
        match self {
            RequestKind::PeekText => 1,
            RequestKind::PeekData => 2,
            RequestKind::PeekUser => 3,
            RequestKind::PokeText => 4,
            RequestKind::PokeData => 5,
            RequestKind::PokeUser => 6,
            RequestKind::Cont => 7,
            RequestKind::Kill => 8,
            RequestKind::SingleStep => 9,
            RequestKind::GetRegs => 12,
            RequestKind::SetRegs => 13,
            RequestKind::GetFpRegs => 14,
            RequestKind::SetFpRegs => 15,
            RequestKind::Attach => 16,
            RequestKind::Detach => 17,
            RequestKind::Syscall => 24,
            RequestKind::SetOptions => 0x4200,
        }
    }

    /// Look a request kind up by its kernel code
    pub fn from_code(code: RequestCode) -> Option<Self>
    {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// The request's name in the kernel headers
    pub const fn name(self) -> &'static str
    {
        match self {
            RequestKind::PeekText => "PTRACE_PEEKTEXT",
            RequestKind::PeekData => "PTRACE_PEEKDATA",
            RequestKind::PeekUser => "PTRACE_PEEKUSER",
            RequestKind::PokeText => "PTRACE_POKETEXT",
            RequestKind::PokeData => "PTRACE_POKEDATA",
            RequestKind::PokeUser => "PTRACE_POKEUSER",
            RequestKind::Cont => "PTRACE_CONT",
            RequestKind::Kill => "PTRACE_KILL",
            RequestKind::SingleStep => "PTRACE_SINGLESTEP",
            RequestKind::GetRegs => "PTRACE_GETREGS",
            RequestKind::SetRegs => "PTRACE_SETREGS",
            RequestKind::GetFpRegs => "PTRACE_GETFPREGS",
            RequestKind::SetFpRegs => "PTRACE_SETFPREGS",
            RequestKind::Attach => "PTRACE_ATTACH",
            RequestKind::Detach => "PTRACE_DETACH",
            RequestKind::Syscall => "PTRACE_SYSCALL",
            RequestKind::SetOptions => "PTRACE_SETOPTIONS",
        }
    }

    /// Whether the request returns a data word rather than a status
    ///
    /// For these requests `-1` is a legitimate result, so failure has to be
    /// read from `errno` alone.
    pub const fn is_peek(self) -> bool
    {
        matches!(self, RequestKind::PeekText | RequestKind::PeekData | RequestKind::PeekUser)
    }

    /// Whether a successful request lets the target run again
    pub const fn resumes_target(self) -> bool
    {
        matches!(
            self,
            RequestKind::Cont | RequestKind::SingleStep | RequestKind::Syscall | RequestKind::Detach
        )
    }
}

impl fmt::Display for RequestKind
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.name())
    }
}

/// An `errno` value the fault taxonomy recognizes
///
/// `ptrace(2)` documents a handful of codes. Three categories matter to a
/// caller, and this enum names the codes that fall into them:
///
/// - `EPERM`: the target cannot be traced (permission fault)
/// - `ESRCH`: the target does not exist, is not traced by us, or is not
///   stopped (state fault; the kernel does not say which)
/// - `EIO` / `EFAULT`: the request was malformed or the address is not mapped
///   (I/O fault; Linux returns either code for a bad address)
///
/// Anything else is left unclassified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode
{
    /// `EPERM`
    PermissionDenied = libc::EPERM,
    /// `ESRCH`
    NoSuchProcess = libc::ESRCH,
    /// `EIO`
    InvalidRequest = libc::EIO,
    /// `EFAULT`
    BadAddress = libc::EFAULT,
}

impl ErrorCode
{
    /// Classify a raw `errno` value
    ///
    /// ```rust
    /// use tether_core::request::ErrorCode;
    ///
    /// assert_eq!(ErrorCode::from_errno(libc::ESRCH), Some(ErrorCode::NoSuchProcess));
    /// assert_eq!(ErrorCode::from_errno(libc::EBUSY), None);
    /// ```
    pub const fn from_errno(errno: i32) -> Option<Self>
    {
        match errno {
            libc::EPERM => Some(ErrorCode::PermissionDenied),
            libc::ESRCH => Some(ErrorCode::NoSuchProcess),
            libc::EIO => Some(ErrorCode::InvalidRequest),
            libc::EFAULT => Some(ErrorCode::BadAddress),
            _ => None,
        }
    }

    /// The raw `errno` value
    pub const fn errno(self) -> i32
    {
        self as i32
    }

    /// The symbolic C name (`EPERM`, ...)
    pub const fn name(self) -> &'static str
    {
        match self {
            ErrorCode::PermissionDenied => "EPERM",
            ErrorCode::NoSuchProcess => "ESRCH",
            ErrorCode::InvalidRequest => "EIO",
            ErrorCode::BadAddress => "EFAULT",
        }
    }
}

impl fmt::Display for ErrorCode
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_request_codes_are_unique()
    {
        for (i, a) in RequestKind::ALL.iter().enumerate() {
            for b in &RequestKind::ALL[i + 1..] {
                assert_ne!(a.code(), b.code(), "{a} and {b} share a code");
            }
        }
    }

    #[test]
    fn test_from_code_inverts_code()
    {
        for kind in RequestKind::ALL {
            assert_eq!(RequestKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(RequestKind::from_code(0), None);
    }

    #[cfg(all(target_os = "linux", target_env = "gnu", any(target_arch = "x86", target_arch = "x86_64")))]
    #[test]
    #[allow(clippy::cast_sign_loss)]
    fn test_request_codes_match_libc()
    {
        let expected = [
            (RequestKind::PeekText, libc::PTRACE_PEEKTEXT),
            (RequestKind::PeekData, libc::PTRACE_PEEKDATA),
            (RequestKind::PeekUser, libc::PTRACE_PEEKUSER),
            (RequestKind::PokeText, libc::PTRACE_POKETEXT),
            (RequestKind::PokeData, libc::PTRACE_POKEDATA),
            (RequestKind::PokeUser, libc::PTRACE_POKEUSER),
            (RequestKind::Cont, libc::PTRACE_CONT),
            (RequestKind::Kill, libc::PTRACE_KILL),
            (RequestKind::SingleStep, libc::PTRACE_SINGLESTEP),
            (RequestKind::GetRegs, libc::PTRACE_GETREGS),
            (RequestKind::SetRegs, libc::PTRACE_SETREGS),
            (RequestKind::GetFpRegs, libc::PTRACE_GETFPREGS),
            (RequestKind::SetFpRegs, libc::PTRACE_SETFPREGS),
            (RequestKind::Attach, libc::PTRACE_ATTACH),
            (RequestKind::Detach, libc::PTRACE_DETACH),
            (RequestKind::Syscall, libc::PTRACE_SYSCALL),
            (RequestKind::SetOptions, libc::PTRACE_SETOPTIONS),
        ];
        for (kind, code) in expected {
            assert_eq!(kind.code(), code as RequestCode, "{kind}");
        }
    }

    #[test]
    fn test_only_peeks_return_data()
    {
        let peeks: Vec<_> = RequestKind::ALL.into_iter().filter(|kind| kind.is_peek()).collect();
        assert_eq!(peeks, [RequestKind::PeekText, RequestKind::PeekData, RequestKind::PeekUser]);
    }

    #[test]
    fn test_resuming_requests()
    {
        let resuming: Vec<_> = RequestKind::ALL.into_iter().filter(|kind| kind.resumes_target()).collect();
        assert_eq!(
            resuming,
            [RequestKind::Cont, RequestKind::SingleStep, RequestKind::Detach, RequestKind::Syscall]
        );
        assert!(!RequestKind::Kill.resumes_target());
        assert!(!RequestKind::Attach.resumes_target());
        assert!(RequestKind::ALL.into_iter().all(|kind| !(kind.is_peek() && kind.resumes_target())));
    }
}
