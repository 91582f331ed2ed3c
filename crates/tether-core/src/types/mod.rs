//! # Types
//!
//! Small value types shared by the dispatcher, the address-space views, and
//! the process facade.
//!
//! `ptrace(2)` takes a PID, an address, and a data word, and all three are
//! integers. These newtypes keep them from being swapped by accident.

pub mod address;
pub mod process;
pub mod word;

// Re-export all public types
pub use address::Address;
pub use process::ProcessId;
pub use word::{Word, WordWidth, WORD_SIZE};
