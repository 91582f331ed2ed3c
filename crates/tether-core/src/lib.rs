//! # tether-core
//!
//! Typed control of traced processes on Linux.
//!
//! This crate wraps the `ptrace(2)` system call in a small typed layer:
//! - A request dispatcher that issues one raw request and reports the raw reply
//! - Text, data and user-area views with word-granular peek/poke
//! - A process facade that translates kernel failures into [`TetherError`]
//! - 32-bit and 64-bit register layouts that match the kernel ABI byte for byte
//!
//! ## Platform Support
//!
//! - **Linux x86/x86_64**: `ptrace(2)`
//!
//! Other targets still compile the register layouts and request tables, but
//! not [`platform::linux`] or the active [`GeneralRegisters`]/[`FpRegisters`]
//! aliases.
//!
//! ## Why unsafe code is needed
//!
//! `ptrace(2)` reads and writes another process's memory and registers, and
//! fills caller-provided buffers. The single call site lives in
//! [`platform::linux::dispatch`]; everything above it is safe.

#![allow(unsafe_code)] // Required for the ptrace(2) call site

pub mod error;
pub mod options;
pub mod platform;
pub mod prelude;
pub mod registers;
pub mod request;
pub mod types;

// Re-export commonly used types
pub use error::{FaultKind, TetherError, TetherResult};
pub use options::TraceOptions;
#[cfg(all(target_os = "linux", any(target_arch = "x86", target_arch = "x86_64")))]
pub use platform::linux::Process;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub use registers::{FpRegisters, GeneralRegisters};
pub use request::{ErrorCode, RequestKind};
pub use types::{Address, ProcessId, Word, WordWidth};
