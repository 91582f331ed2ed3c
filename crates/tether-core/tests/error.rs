//! Tests for error handling

use tether_core::error::{FaultKind, TetherError, TetherResult};
use tether_core::request::{ErrorCode, RequestKind};
use tether_core::types::ProcessId;

fn pid() -> ProcessId
{
    ProcessId::from(4321)
}

#[test]
fn test_eperm_is_permission_fault()
{
    let error = TetherError::from_errno(RequestKind::Attach, pid(), libc::EPERM);
    assert_eq!(
        error,
        TetherError::Permission {
            request: RequestKind::Attach,
            pid: pid()
        }
    );
    assert_eq!(error.kind(), FaultKind::Permission);
}

#[test]
fn test_esrch_is_state_fault()
{
    let error = TetherError::from_errno(RequestKind::GetRegs, pid(), libc::ESRCH);
    assert_eq!(error.kind(), FaultKind::State);
    assert_eq!(error.errno(), Some(libc::ESRCH));
}

#[test]
fn test_eio_and_efault_are_io_faults()
{
    let eio = TetherError::from_errno(RequestKind::PeekData, pid(), libc::EIO);
    let efault = TetherError::from_errno(RequestKind::PokeText, pid(), libc::EFAULT);

    assert_eq!(eio.kind(), FaultKind::Io);
    assert_eq!(efault.kind(), FaultKind::Io);
    assert!(matches!(eio, TetherError::Io { code: ErrorCode::InvalidRequest, .. }));
    assert!(matches!(efault, TetherError::Io { code: ErrorCode::BadAddress, .. }));
}

#[test]
fn test_other_errnos_stay_unclassified()
{
    for errno in [libc::EBUSY, libc::EINVAL, libc::ENOMEM, 0, 9999] {
        let error = TetherError::from_errno(RequestKind::Cont, pid(), errno);
        assert_eq!(error.kind(), FaultKind::Unclassified, "errno {errno}");
        assert_eq!(error.errno(), Some(errno));
    }
}

#[test]
fn test_permission_message()
{
    let error = TetherError::from_errno(RequestKind::Attach, pid(), libc::EPERM);
    let message = format!("{}", error);
    assert!(message.contains("PTRACE_ATTACH"));
    assert!(message.contains("4321"));
    assert!(message.contains("target cannot be traced"));
}

#[test]
fn test_state_message()
{
    let error = TetherError::from_errno(RequestKind::Cont, pid(), libc::ESRCH);
    let message = format!("{}", error);
    assert!(message.contains("target missing, not traced, or not stopped"));
}

#[test]
fn test_io_message_names_the_code()
{
    let error = TetherError::from_errno(RequestKind::PeekUser, pid(), libc::EFAULT);
    let message = format!("{}", error);
    assert!(message.contains("bad request or invalid memory region"));
    assert!(message.contains("EFAULT"));
}

#[test]
fn test_unclassified_message_keeps_errno()
{
    let error = TetherError::from_errno(RequestKind::SetOptions, pid(), libc::EINVAL);
    let message = format!("{}", error);
    assert!(message.contains("unclassified"));
    assert!(message.contains(&libc::EINVAL.to_string()));
}

#[test]
fn test_invalid_argument()
{
    let error = TetherError::InvalidArgument("test arg".to_string());
    let message = format!("{}", error);
    assert!(message.contains("Invalid argument"));
    assert!(message.contains("test arg"));
    assert_eq!(error.kind(), FaultKind::InvalidArgument);
    assert_eq!(error.request(), None);
}

#[test]
fn test_unsupported()
{
    let error = TetherError::Unsupported("PTRACE_GETSIGINFO");
    assert_eq!(error.to_string(), "PTRACE_GETSIGINFO is not supported");
    assert_eq!(error.kind(), FaultKind::Unsupported);
    assert_eq!(error.errno(), None);
}

#[test]
fn test_request_is_recorded()
{
    let error = TetherError::from_errno(RequestKind::SingleStep, pid(), libc::ESRCH);
    assert_eq!(error.request(), Some(RequestKind::SingleStep));
}

#[test]
fn test_result_type()
{
    fn test_function() -> TetherResult<i32>
    {
        Ok(42)
    }

    assert_eq!(test_function().unwrap(), 42);
}

#[test]
fn test_result_type_error()
{
    fn test_function() -> TetherResult<i32>
    {
        Err(TetherError::from_errno(RequestKind::Kill, ProcessId::from(0), libc::ESRCH))
    }

    let result = test_function();
    assert!(result.is_err());
    assert_eq!(result.unwrap_err().kind(), FaultKind::State);
}
