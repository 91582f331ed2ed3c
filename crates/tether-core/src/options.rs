//! `PTRACE_SETOPTIONS` flags.

use bitflags::bitflags;

use crate::types::Word;

bitflags! {
    /// Option mask for `PTRACE_SETOPTIONS`
    ///
    /// Setting options replaces the previous mask; it does not add to it.
    ///
    /// ```rust
    /// use tether_core::options::TraceOptions;
    ///
    /// let opts = TraceOptions::TRACESYSGOOD | TraceOptions::EXITKILL;
    /// assert_eq!(opts.bits(), 0x0010_0001);
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TraceOptions: u32 {
        /// Set bit 7 in the signal number of syscall stops (`SIGTRAP | 0x80`)
        const TRACESYSGOOD = 0x0000_0001;
        /// Stop at the next `fork(2)` and trace the child
        const TRACEFORK = 0x0000_0002;
        /// Stop at the next `vfork(2)` and trace the child
        const TRACEVFORK = 0x0000_0004;
        /// Stop at the next `clone(2)` and trace the new thread or process
        const TRACECLONE = 0x0000_0008;
        /// Stop at the next `execve(2)`
        const TRACEEXEC = 0x0000_0010;
        /// Stop when a `vfork` child releases the parent
        const TRACEVFORKDONE = 0x0000_0020;
        /// Stop at exit, before the exit status is reported
        const TRACEEXIT = 0x0000_0040;
        /// Stop when a seccomp `SECCOMP_RET_TRACE` rule fires
        const TRACESECCOMP = 0x0000_0080;
        /// Kill the target if the tracer exits
        const EXITKILL = 0x0010_0000;
        /// Suspend the target's seccomp protections
        const SUSPEND_SECCOMP = 0x0020_0000;
    }
}

impl TraceOptions
{
    /// The mask as the `data` word of a `PTRACE_SETOPTIONS` request
    pub fn as_word(self) -> Word
    {
        self.bits() as Word
    }
}
