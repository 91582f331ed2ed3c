//! Process identifier type.

use std::fmt;

/// Process identifier (PID) of a trace target
///
/// On Linux a thread ID (TID) is accepted anywhere a PID is: ptrace
/// relationships are per thread, and the kernel resolves both through the
/// same namespace. The value is a `pid_t`, so it is signed.
///
/// ## Why wrap it in a struct?
///
/// Using a newtype pattern instead of a raw `i32` keeps PIDs from being
/// confused with signal numbers, word values, or offsets, all of which share
/// the `ptrace(2)` argument list.
///
/// ## Example
///
/// ```rust
/// use tether_core::types::ProcessId;
///
/// let pid = ProcessId::from(1234);
/// assert_eq!(pid.raw(), 1234);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessId(pub libc::pid_t);

impl ProcessId
{
    /// Get the raw `pid_t` value
    pub const fn raw(self) -> libc::pid_t
    {
        self.0
    }
}

impl From<libc::pid_t> for ProcessId
{
    fn from(pid: libc::pid_t) -> Self
    {
        ProcessId(pid)
    }
}

impl From<ProcessId> for libc::pid_t
{
    fn from(pid: ProcessId) -> Self
    {
        pid.0
    }
}

impl From<&std::process::Child> for ProcessId
{
    #[allow(clippy::cast_possible_wrap)]
    fn from(child: &std::process::Child) -> Self
    {
        // Linux PIDs are capped well below i32::MAX (pid_max <= 2^22).
        ProcessId(child.id() as libc::pid_t)
    }
}

impl fmt::Display for ProcessId
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.0)
    }
}
