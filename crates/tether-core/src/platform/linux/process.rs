//! # Process Control
//!
//! [`Process`] is the public handle on a traced target. It owns the target's
//! PID and a [`Dispatch`] implementation, hands out the three address-space
//! views, and exposes register access and the lifecycle requests.
//!
//! Every operation is one dispatcher call followed by fault translation: if
//! the call fails, the fault is returned to the caller straight away. Nothing
//! is retried.
//!
//! ## Lifecycle
//!
//! 1. Obtain a PID from whatever spawns or enumerates processes
//! 2. Create a facade: `Process::new(pid)`
//! 3. `attach()`, then wait for the stop (`waitpid`, outside this crate)
//! 4. Inspect/manipulate: `regs()`, `peek_data()`, `poke_text()`, ...
//! 5. Resume with `cont()`/`single_step()`/`syscall_step()`, or `detach()`
//!
//! ## Thread affinity
//!
//! The kernel only accepts requests against a tracee from the thread that
//! attached to it. `Process` is neither `Send` nor `Sync`, so once created it
//! stays on its thread. Create it on the thread that will call `attach()`.

use std::convert::Infallible;
use std::fmt;
use std::marker::PhantomData;

use libc::c_long;
use tracing::{debug, warn};

use super::dispatch::{Dispatch, KernelDispatcher, RawReply, RequestData};
use super::view::{AddressSpace, AddressSpaceKind};
use crate::error::{FaultKind, TetherError, TetherResult};
use crate::options::TraceOptions;
use crate::registers::{self, FpRegisters, GeneralRegisterLayout, GeneralRegisters};
use crate::request::RequestKind;
use crate::types::{Address, ProcessId, Word};

/// A traced process (or thread)
///
/// The type parameter selects the dispatcher. It defaults to
/// [`KernelDispatcher`]; tests substitute their own.
///
/// ## Example
///
/// ```rust,no_run
/// use tether_core::platform::linux::Process;
/// use tether_core::registers::GeneralRegisterLayout;
/// use tether_core::types::{Address, ProcessId};
///
/// let process = Process::new(ProcessId::from(1234));
/// process.attach()?;
/// // ... waitpid(1234) until the target reports a stop ...
/// let regs = process.regs()?;
/// println!("stopped at {:#x}", regs.instruction_pointer());
///
/// process.poke_data(Address::new(0x1000), 42)?;
/// assert_eq!(process.peek_data(Address::new(0x1000))?, 42);
/// process.detach()?;
/// # Ok::<(), tether_core::error::TetherError>(())
/// ```
pub struct Process<D: Dispatch = KernelDispatcher>
{
    pid: ProcessId,
    dispatcher: D,
    /// Keeps the facade on the thread that created it.
    _not_send: PhantomData<*const ()>,
}

impl Process<KernelDispatcher>
{
    /// Create a facade for `pid` that talks to the kernel
    ///
    /// This does not attach; see [`Process::attach`].
    pub fn new(pid: impl Into<ProcessId>) -> Self
    {
        Self::with_dispatcher(pid, KernelDispatcher::new())
    }
}

impl<D: Dispatch> Process<D>
{
    /// Create a facade for `pid` that issues requests through `dispatcher`
    pub fn with_dispatcher(pid: impl Into<ProcessId>, dispatcher: D) -> Self
    {
        Self {
            pid: pid.into(),
            dispatcher,
            _not_send: PhantomData,
        }
    }

    /// The target's PID
    pub fn pid(&self) -> ProcessId
    {
        self.pid
    }

    /// The dispatcher requests go through
    pub fn dispatcher(&self) -> &D
    {
        &self.dispatcher
    }

    /// Issue one request and translate the reply
    ///
    /// This is the only path from the facade (and its views) to the
    /// dispatcher.
    pub(crate) fn request(&self, request: RequestKind, addr: Address, data: RequestData<'_>) -> TetherResult<c_long>
    {
        let reply = self.dispatcher.issue(request, self.pid, addr, data);
        translate(request, self.pid, reply)
    }

    fn control(&self, request: RequestKind, signal: i32) -> TetherResult<()>
    {
        let data = if signal == 0 {
            RequestData::None
        } else {
            RequestData::Word(signal_word(signal)?)
        };
        self.request(request, Address::ZERO, data)?;
        if request.resumes_target() {
            debug!(pid = self.pid.raw(), request = %request, signal, "tracee resumed");
        }
        Ok(())
    }

    // -- address-space views ------------------------------------------------

    /// View of instruction memory
    pub fn text(&self) -> AddressSpace<'_, D>
    {
        AddressSpace::new(self, AddressSpaceKind::Text)
    }

    /// View of data memory
    pub fn data(&self) -> AddressSpace<'_, D>
    {
        AddressSpace::new(self, AddressSpaceKind::Data)
    }

    /// View of the user area (`struct user`, addressed by byte offset)
    pub fn user(&self) -> AddressSpace<'_, D>
    {
        AddressSpace::new(self, AddressSpaceKind::User)
    }

    /// Read a word of instruction memory
    pub fn peek_text(&self, addr: Address) -> TetherResult<Word>
    {
        self.text().peek(addr)
    }

    /// Read a word of data memory
    pub fn peek_data(&self, addr: Address) -> TetherResult<Word>
    {
        self.data().peek(addr)
    }

    /// Read a word of the user area at byte offset `offset`
    pub fn peek_user(&self, offset: Address) -> TetherResult<Word>
    {
        self.user().peek(offset)
    }

    /// Write a word of instruction memory
    pub fn poke_text(&self, addr: Address, value: Word) -> TetherResult<()>
    {
        self.text().poke(addr, value)
    }

    /// Write a word of data memory
    pub fn poke_data(&self, addr: Address, value: Word) -> TetherResult<()>
    {
        self.data().poke(addr, value)
    }

    /// Write a word of the user area at byte offset `offset`
    pub fn poke_user(&self, offset: Address, value: Word) -> TetherResult<()>
    {
        self.user().poke(offset, value)
    }

    // -- execution control ---------------------------------------------------

    /// Resume the target (`PTRACE_CONT`)
    pub fn cont(&self) -> TetherResult<()>
    {
        self.control(RequestKind::Cont, 0)
    }

    /// Resume the target, delivering `signal` to it
    pub fn cont_with_signal(&self, signal: i32) -> TetherResult<()>
    {
        self.control(RequestKind::Cont, signal)
    }

    /// Terminate the target (`PTRACE_KILL`)
    ///
    /// The kernel only honours this for a stopped tracee. Prefer sending
    /// `SIGKILL` when the target may be running.
    pub fn kill(&self) -> TetherResult<()>
    {
        debug!(pid = self.pid.raw(), "killing tracee");
        self.control(RequestKind::Kill, 0)
    }

    /// Execute exactly one instruction, then stop again (`PTRACE_SINGLESTEP`)
    pub fn single_step(&self) -> TetherResult<()>
    {
        self.control(RequestKind::SingleStep, 0)
    }

    /// Single-step, delivering `signal` to the target
    pub fn single_step_with_signal(&self, signal: i32) -> TetherResult<()>
    {
        self.control(RequestKind::SingleStep, signal)
    }

    /// Run until the next syscall entry or exit (`PTRACE_SYSCALL`)
    pub fn syscall_step(&self) -> TetherResult<()>
    {
        self.control(RequestKind::Syscall, 0)
    }

    /// Run to the next syscall boundary, delivering `signal` to the target
    pub fn syscall_step_with_signal(&self, signal: i32) -> TetherResult<()>
    {
        self.control(RequestKind::Syscall, signal)
    }

    // -- lifecycle -----------------------------------------------------------

    /// Start tracing the target (`PTRACE_ATTACH`)
    ///
    /// The kernel sends the target `SIGSTOP`; wait for that stop before
    /// issuing further requests.
    ///
    /// ## Errors
    ///
    /// - `Permission`: the target cannot be traced by this process
    /// - `State`: no such process
    pub fn attach(&self) -> TetherResult<()>
    {
        debug!(pid = self.pid.raw(), "attaching");
        self.control(RequestKind::Attach, 0)
    }

    /// Stop tracing the target and let it run (`PTRACE_DETACH`)
    pub fn detach(&self) -> TetherResult<()>
    {
        debug!(pid = self.pid.raw(), "detaching");
        self.control(RequestKind::Detach, 0)
    }

    /// Detach, delivering `signal` to the target as it resumes
    pub fn detach_with_signal(&self, signal: i32) -> TetherResult<()>
    {
        debug!(pid = self.pid.raw(), signal, "detaching");
        self.control(RequestKind::Detach, signal)
    }

    /// Replace the tracing options (`PTRACE_SETOPTIONS`)
    pub fn set_options(&self, options: TraceOptions) -> TetherResult<()>
    {
        debug!(pid = self.pid.raw(), ?options, "setting trace options");
        self.request(RequestKind::SetOptions, Address::ZERO, RequestData::Word(options.as_word()))?;
        Ok(())
    }

    // -- registers -----------------------------------------------------------

    /// Read the general-purpose register set (`PTRACE_GETREGS`)
    pub fn regs(&self) -> TetherResult<GeneralRegisters>
    {
        let mut regs = GeneralRegisters::default();
        self.request(RequestKind::GetRegs, Address::ZERO, RequestData::Regs(&mut regs))?;
        Ok(regs)
    }

    /// Write the general-purpose register set (`PTRACE_SETREGS`)
    pub fn set_regs(&self, regs: &GeneralRegisters) -> TetherResult<()>
    {
        let mut buffer = *regs;
        self.request(RequestKind::SetRegs, Address::ZERO, RequestData::Regs(&mut buffer))?;
        Ok(())
    }

    /// Read the floating-point register set (`PTRACE_GETFPREGS`)
    pub fn fp_regs(&self) -> TetherResult<FpRegisters>
    {
        let mut regs = FpRegisters::default();
        self.request(RequestKind::GetFpRegs, Address::ZERO, RequestData::FpRegs(&mut regs))?;
        Ok(regs)
    }

    /// Write the floating-point register set (`PTRACE_SETFPREGS`)
    pub fn set_fp_regs(&self, regs: &FpRegisters) -> TetherResult<()>
    {
        let mut buffer = *regs;
        self.request(RequestKind::SetFpRegs, Address::ZERO, RequestData::FpRegs(&mut buffer))?;
        Ok(())
    }

    /// The target's instruction pointer
    pub fn instruction_pointer(&self) -> TetherResult<u64>
    {
        Ok(self.regs()?.instruction_pointer())
    }

    /// Read a single general-purpose register through the user area
    ///
    /// The offset comes from [`registers::user_offset`].
    ///
    /// ## Errors
    ///
    /// - `InvalidArgument`: the active layout has no register called `name`
    /// - anything [`Process::peek_user`] can return
    pub fn peek_register(&self, name: &str) -> TetherResult<Word>
    {
        self.peek_user(register_offset(name)?)
    }

    /// Write a single general-purpose register through the user area
    pub fn poke_register(&self, name: &str, value: Word) -> TetherResult<()>
    {
        self.poke_user(register_offset(name)?, value)
    }

    // -- unsupported ---------------------------------------------------------

    /// Extended FP register set (`PTRACE_GETFPXREGS`): not supported
    ///
    /// Always returns `Unsupported` without contacting the kernel.
    pub fn fpx_regs(&self) -> TetherResult<Infallible>
    {
        Err(unsupported("PTRACE_GETFPXREGS"))
    }

    /// Extended FP register set (`PTRACE_SETFPXREGS`): not supported
    pub fn set_fpx_regs(&self, _raw: &[u8]) -> TetherResult<()>
    {
        Err(unsupported("PTRACE_SETFPXREGS"))
    }

    /// Event message of the last ptrace stop (`PTRACE_GETEVENTMSG`): not supported
    pub fn event_msg(&self) -> TetherResult<Word>
    {
        Err(unsupported("PTRACE_GETEVENTMSG"))
    }

    /// Signal information of the last stop (`PTRACE_GETSIGINFO`): not supported
    pub fn signal_info(&self) -> TetherResult<libc::siginfo_t>
    {
        Err(unsupported("PTRACE_GETSIGINFO"))
    }

    /// Replace the pending signal information (`PTRACE_SETSIGINFO`): not supported
    pub fn set_signal_info(&self, _info: &libc::siginfo_t) -> TetherResult<()>
    {
        Err(unsupported("PTRACE_SETSIGINFO"))
    }
}

impl<D: Dispatch> fmt::Debug for Process<D>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("Process").field("pid", &self.pid).finish_non_exhaustive()
    }
}

/// Turn a raw reply into a result
///
/// - Any value other than the sentinel is success.
/// - The sentinel with `errno == 0` is a valid word for peeks (the word read
///   was all ones) and an unclassified failure for every other request.
/// - The sentinel with an `errno` is classified by [`TetherError::from_errno`].
fn translate(request: RequestKind, pid: ProcessId, reply: RawReply) -> TetherResult<c_long>
{
    if reply.value != RawReply::SENTINEL {
        return Ok(reply.value);
    }

    let err = match reply.errno {
        0 if request.is_peek() => return Ok(reply.value),
        0 => TetherError::Unclassified { request, pid, errno: 0 },
        errno => TetherError::from_errno(request, pid, errno),
    };

    if err.kind() == FaultKind::Unclassified {
        warn!(request = %request, pid = pid.raw(), errno = reply.errno, "unclassified ptrace failure");
    }
    Err(err)
}

fn register_offset(name: &str) -> TetherResult<Address>
{
    registers::user_offset(name)
        .ok_or_else(|| TetherError::InvalidArgument(format!("no register named {name:?} in the active layout")))
}

fn signal_word(signal: i32) -> TetherResult<Word>
{
    Word::try_from(signal).map_err(|_| TetherError::InvalidArgument(format!("invalid signal number {signal}")))
}

fn unsupported(operation: &'static str) -> TetherError
{
    debug!(operation, "unsupported tracing operation requested");
    TetherError::Unsupported(operation)
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_translate_passes_through_success()
    {
        let pid = ProcessId::from(1);
        assert_eq!(translate(RequestKind::PeekData, pid, RawReply::ok(42)), Ok(42));
        assert_eq!(translate(RequestKind::Cont, pid, RawReply::ok(0)), Ok(0));
    }

    #[test]
    fn test_translate_all_ones_peek_is_data()
    {
        let pid = ProcessId::from(1);
        let reply = RawReply { value: -1, errno: 0 };
        assert_eq!(translate(RequestKind::PeekText, pid, reply), Ok(-1));
    }

    #[test]
    fn test_translate_sentinel_without_errno_is_unclassified()
    {
        let pid = ProcessId::from(1);
        let reply = RawReply { value: -1, errno: 0 };
        let err = translate(RequestKind::SetRegs, pid, reply).unwrap_err();
        assert_eq!(err.kind(), FaultKind::Unclassified);
        assert_eq!(err.errno(), Some(0));
    }

    #[test]
    fn test_translate_unknown_errno_is_preserved()
    {
        let pid = ProcessId::from(7);
        let err = translate(RequestKind::Attach, pid, RawReply::failed(libc::EBUSY)).unwrap_err();
        assert_eq!(
            err,
            TetherError::Unclassified {
                request: RequestKind::Attach,
                pid,
                errno: libc::EBUSY
            }
        );
    }

    #[test]
    fn test_register_offset_rejects_unknown_names()
    {
        let err = register_offset("not_a_register").unwrap_err();
        assert_eq!(err.kind(), FaultKind::InvalidArgument);
    }

    #[test]
    fn test_negative_signal_is_rejected()
    {
        assert!(signal_word(-1).is_err());
        assert_eq!(signal_word(libc::SIGUSR1), Ok(libc::SIGUSR1 as Word));
    }
}
