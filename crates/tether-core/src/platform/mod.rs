//! # Platform-Specific Implementations
//!
//! Each supported platform has its own submodule built on that platform's
//! native tracing API:
//!
//! - **Linux** (x86, x86_64): the `ptrace(2)` system call
//!   - See: [ptrace(2) man page](https://man7.org/linux/man-pages/man2/ptrace.2.html)
//!
//! Register layouts and request codes live outside this module so they can be
//! inspected on any host. Only the code that talks to the kernel is gated.

#[cfg(all(target_os = "linux", any(target_arch = "x86", target_arch = "x86_64")))]
pub mod linux;
