//! Common module for library exports

pub use crate::error::{FaultKind, TetherError, TetherResult};
pub use crate::options::TraceOptions;
#[cfg(all(target_os = "linux", any(target_arch = "x86", target_arch = "x86_64")))]
pub use crate::platform::linux::*;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub use crate::registers::{FpRegisters, GeneralRegisters};
pub use crate::registers::{GeneralRegisterLayout, RegisterLayout};
pub use crate::request::{ErrorCode, RequestKind};
pub use crate::types::{Address, ProcessId, Word, WordWidth};
