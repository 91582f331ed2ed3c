//! # Linux Tracing Implementation
//!
//! Linux-specific tracing built on the `ptrace(2)` system call.
//!
//! Unlike Mach-style debugging APIs, Linux exposes everything through one
//! entry point. A request code selects the operation, and the call takes a
//! target PID, an address and a data argument:
//!
//! - **Dispatcher**: issues one raw request ([`dispatch`])
//! - **Views**: word peek/poke over text, data and the user area ([`view`])
//! - **Process**: the typed facade callers use ([`process`])
//!
//! ## References
//!
//! - [ptrace(2) man page](https://man7.org/linux/man-pages/man2/ptrace.2.html)
//! - [Yama `ptrace_scope`](https://www.kernel.org/doc/Documentation/security/Yama.txt)

pub mod dispatch;
pub mod process;
pub mod view;

pub use dispatch::{Dispatch, KernelDispatcher, RawReply, RequestData};
pub use process::Process;
pub use view::{AddressSpace, AddressSpaceKind};
