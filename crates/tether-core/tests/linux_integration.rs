//! Integration tests against the real kernel
//!
//! The PID 0 and self-attach tests run everywhere `ptrace(2)` exists, since
//! the kernel rejects those requests before any permission check that
//! depends on the environment.
//!
//! The live-child test needs permission to trace a child process (Yama
//! `ptrace_scope` <= 1, and no seccomp filter blocking `ptrace`), so it is
//! ignored by default:
//!
//! ```text
//! cargo test -p tether-core --test linux_integration -- --ignored
//! ```

#![cfg(all(target_os = "linux", any(target_arch = "x86", target_arch = "x86_64")))]

use std::process::Command;

use tether_core::error::FaultKind;
use tether_core::platform::linux::Process;
use tether_core::registers::{GeneralRegisterLayout, GeneralRegisters, RegisterLayout};
use tether_core::types::{Address, ProcessId, Word, WordWidth, WORD_SIZE};

fn wait_for_stop(pid: ProcessId) -> i32
{
    let mut status = 0;
    // SAFETY: `status` is a live out-pointer for the duration of the call.
    let waited = unsafe { libc::waitpid(pid.raw(), &mut status, 0) };
    assert_eq!(waited, pid.raw(), "waitpid failed");
    assert!(libc::WIFSTOPPED(status), "target did not stop (status {status:#x})");
    libc::WSTOPSIG(status)
}

#[test]
fn test_pid_zero_is_state_fault()
{
    tether_utils::init_test_logging();

    let process = Process::new(ProcessId::from(0));

    assert_eq!(process.attach().unwrap_err().kind(), FaultKind::State);
    assert_eq!(process.peek_data(Address::new(0x1000)).unwrap_err().kind(), FaultKind::State);
    assert_eq!(process.regs().unwrap_err().kind(), FaultKind::State);
    assert_eq!(process.cont().unwrap_err().kind(), FaultKind::State);
    assert_eq!(process.detach().unwrap_err().kind(), FaultKind::State);
}

#[test]
fn test_attaching_to_own_process_is_permission_fault()
{
    let own_pid = libc::pid_t::try_from(std::process::id()).unwrap();
    let process = Process::new(own_pid);

    assert_eq!(process.attach().unwrap_err().kind(), FaultKind::Permission);
}

#[test]
fn test_unsupported_operations_on_real_kernel()
{
    let process = Process::new(ProcessId::from(0));
    assert_eq!(process.event_msg().unwrap_err().kind(), FaultKind::Unsupported);
    assert_eq!(process.signal_info().unwrap_err().kind(), FaultKind::Unsupported);
}

#[test]
#[ignore = "needs permission to ptrace a child process"]
fn test_live_child_attach_poke_step_detach()
{
    tether_utils::init_test_logging();

    // A shell busy loop keeps the child in user space most of the time.
    let mut child = Command::new("sh").args(["-c", "while :; do :; done"]).spawn().unwrap();
    let process = Process::new(ProcessId::from(&child));

    process.attach().unwrap();
    assert_eq!(wait_for_stop(process.pid()), libc::SIGSTOP);

    let regs = process.regs().unwrap();
    let ip = regs.instruction_pointer();
    assert_ne!(ip, 0);

    // Register write-back is idempotent
    process.set_regs(&regs).unwrap();
    assert_eq!(process.regs().unwrap(), regs);

    // The user area holds the same register set
    let ip_name = match WordWidth::NATIVE {
        WordWidth::Bits32 => "eip",
        WordWidth::Bits64 => "rip",
    };
    assert_eq!(process.peek_register(ip_name).unwrap() as u64, ip);
    assert!(GeneralRegisters::offset_of_field(ip_name).is_some());

    // Data round trip just below the stack pointer
    let scratch = Address::new(regs.stack_pointer() as Word - 16 * WORD_SIZE).align_down_to_word();
    process.poke_data(scratch, 42).unwrap();
    assert_eq!(process.peek_data(scratch), Ok(42));

    // Replace the next instructions with NOPs and step over exactly one
    let nops = Word::from_ne_bytes([0x90; WORD_SIZE]);
    process.poke_text(Address::new(ip as Word), nops).unwrap();
    assert_eq!(process.peek_text(Address::new(ip as Word)), Ok(nops));

    // Keep the kernel from restarting an interrupted syscall on resume
    let mut stepping = regs;
    let orig = match WordWidth::NATIVE {
        WordWidth::Bits32 => "orig_eax",
        WordWidth::Bits64 => "orig_rax",
    };
    assert!(stepping.set_field(orig, u64::MAX));
    process.set_regs(&stepping).unwrap();

    process.single_step().unwrap();
    assert_eq!(wait_for_stop(process.pid()), libc::SIGTRAP);
    assert_eq!(process.instruction_pointer(), Ok(ip + 1));

    process.kill().unwrap();
    child.wait().unwrap();
}
