//! # Request Dispatcher
//!
//! The single place a tracing request reaches the kernel.
//!
//! [`Dispatch::issue`] takes a request kind, a target, an address and a data
//! argument, and returns whatever `ptrace(2)` returned together with the
//! `errno` it left behind. It does not decide whether that was a success:
//! the process facade applies the fault translation.
//!
//! Every suspend, resume, kill, and memory or register write in this crate
//! goes through here. No retries are made.
//!
//! ## Why a trait?
//!
//! - The kernel implementation ([`KernelDispatcher`]) is the only one used in
//!   production.
//! - Tests drive the facade with an in-memory double to exercise the fault
//!   translation and the view plumbing without a live tracee.

use std::ptr;

use libc::{c_long, c_void};
use tracing::trace;

use crate::registers::{FpRegisters, GeneralRegisters};
use crate::request::RequestKind;
use crate::types::{Address, ProcessId, Word};

/// Raw outcome of one `ptrace(2)` call
///
/// `value` is the return value as the C library reports it: for peeks the
/// word read, for everything else `0` on success. `errno` is the thread's
/// `errno` immediately after the call, which the dispatcher zeroes first, so
/// `0` means the kernel did not report an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawReply
{
    /// Return value of the call
    pub value: c_long,
    /// `errno` observed after the call
    pub errno: i32,
}

impl RawReply
{
    /// The value `ptrace(2)` returns on failure
    pub const SENTINEL: c_long = -1;

    /// A successful reply carrying `value`
    pub const fn ok(value: c_long) -> Self
    {
        Self { value, errno: 0 }
    }

    /// A failed reply with the given `errno`
    pub const fn failed(errno: i32) -> Self
    {
        Self {
            value: Self::SENTINEL,
            errno,
        }
    }

    /// A successful peek that read `word`
    #[allow(clippy::cast_possible_wrap)]
    pub const fn word(word: Word) -> Self
    {
        Self::ok(word as c_long)
    }
}

/// The `data` argument of a request
///
/// Register buffers are only accepted in the active layout, so a request can
/// never pair a 32-bit register set with a 64-bit build or the reverse.
#[derive(Debug)]
pub enum RequestData<'a>
{
    /// `data` is ignored by the request (passed as `NULL`)
    None,
    /// `data` is a plain word: a value to poke, a signal number, or an option mask
    Word(Word),
    /// `data` points at a general-purpose register buffer to fill or read from
    Regs(&'a mut GeneralRegisters),
    /// `data` points at a floating-point register buffer to fill or read from
    FpRegs(&'a mut FpRegisters),
}

impl RequestData<'_>
{
    /// The word carried by [`RequestData::Word`], if any
    pub fn as_word(&self) -> Option<Word>
    {
        match self {
            RequestData::Word(word) => Some(*word),
            _ => None,
        }
    }
}

/// Something that can deliver a tracing request to a target
///
/// ## Caller obligation
///
/// Linux only accepts requests against a tracee from the thread that
/// attached to it. Implementations do not check this; see
/// [`Process`](super::Process) for how the facade keeps itself on one thread.
pub trait Dispatch
{
    /// Issue `request` against `pid` and return the raw reply
    fn issue(&self, request: RequestKind, pid: ProcessId, addr: Address, data: RequestData<'_>) -> RawReply;
}

impl<D: Dispatch + ?Sized> Dispatch for &D
{
    fn issue(&self, request: RequestKind, pid: ProcessId, addr: Address, data: RequestData<'_>) -> RawReply
    {
        (**self).issue(request, pid, addr, data)
    }
}

/// Dispatcher backed by the C library's `ptrace(2)`
#[derive(Debug, Clone, Copy, Default)]
pub struct KernelDispatcher;

impl KernelDispatcher
{
    /// Create a kernel dispatcher
    pub const fn new() -> Self
    {
        KernelDispatcher
    }
}

impl Dispatch for KernelDispatcher
{
    fn issue(&self, request: RequestKind, pid: ProcessId, addr: Address, data: RequestData<'_>) -> RawReply
    {
        trace!(request = %request, pid = pid.raw(), addr = %addr, data = ?data.as_word(), "ptrace");

        let data_ptr: *mut c_void = match data {
            RequestData::None => ptr::null_mut(),
            RequestData::Word(word) => word as *mut c_void,
            RequestData::Regs(regs) => ptr::from_mut(regs).cast(),
            RequestData::FpRegs(regs) => ptr::from_mut(regs).cast(),
        };

        // SAFETY: `addr` is only interpreted by the kernel, inside the
        // tracee's address space or user area, and never dereferenced here.
        // `data_ptr` is NULL, an integer the request treats as a value, or a
        // pointer to a live, exclusively borrowed buffer of exactly the
        // `user_regs_struct`/`user_fpregs_struct` size (checked at compile
        // time in `registers`). errno is thread-local, so the reset and the
        // read bracket this call only.
        unsafe {
            *libc::__errno_location() = 0;
            let value = libc::ptrace(request.code() as _, pid.raw(), addr.as_ptr(), data_ptr);
            let errno = *libc::__errno_location();
            RawReply { value, errno }
        }
    }
}
