//! # Address-Space Views
//!
//! Word-granular peek/poke over one of the three address spaces `ptrace(2)`
//! exposes:
//!
//! - **Text**: instruction memory (`PTRACE_PEEKTEXT` / `PTRACE_POKETEXT`)
//! - **Data**: data memory (`PTRACE_PEEKDATA` / `PTRACE_POKEDATA`)
//! - **User**: the per-thread `struct user` control block, addressed by byte
//!   offset (`PTRACE_PEEKUSER` / `PTRACE_POKEUSER`)
//!
//! On Linux text and data are the same address space; the distinction is
//! kept because the requests are distinct.
//!
//! Each call moves exactly one machine word in a single request. Reading or
//! writing byte ranges means composing word-aligned calls yourself; there is
//! no buffering here.

use std::fmt;

use super::dispatch::{Dispatch, RequestData};
use super::process::Process;
use crate::error::TetherResult;
use crate::request::RequestKind;
use crate::types::{Address, Word};

/// Which address space a view addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressSpaceKind
{
    /// Instruction memory
    Text,
    /// Data memory
    Data,
    /// The user area (offsets, not addresses)
    User,
}

impl AddressSpaceKind
{
    /// Request used to read a word from this space
    pub const fn peek_request(self) -> RequestKind
    {
        match self {
            AddressSpaceKind::Text => RequestKind::PeekText,
            AddressSpaceKind::Data => RequestKind::PeekData,
            AddressSpaceKind::User => RequestKind::PeekUser,
        }
    }

    /// Request used to write a word to this space
    pub const fn poke_request(self) -> RequestKind
    {
        match self {
            AddressSpaceKind::Text => RequestKind::PokeText,
            AddressSpaceKind::Data => RequestKind::PokeData,
            AddressSpaceKind::User => RequestKind::PokeUser,
        }
    }
}

impl fmt::Display for AddressSpaceKind
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            AddressSpaceKind::Text => f.write_str("text"),
            AddressSpaceKind::Data => f.write_str("data"),
            AddressSpaceKind::User => f.write_str("user"),
        }
    }
}

/// A view of one address space of a traced process
///
/// Borrowed from its [`Process`] (see [`Process::text`], [`Process::data`],
/// [`Process::user`]), so it can never outlive it. It holds nothing but that
/// borrow and the [`AddressSpaceKind`].
pub struct AddressSpace<'p, D: Dispatch>
{
    process: &'p Process<D>,
    kind: AddressSpaceKind,
}

impl<'p, D: Dispatch> AddressSpace<'p, D>
{
    pub(crate) fn new(process: &'p Process<D>, kind: AddressSpaceKind) -> Self
    {
        Self { process, kind }
    }

    /// Which address space this view reads and writes
    pub fn kind(&self) -> AddressSpaceKind
    {
        self.kind
    }

    /// Read one word at `addr`
    ///
    /// For the user view, `addr` is a byte offset into `struct user`.
    ///
    /// ## Errors
    ///
    /// - `State`: target missing, not traced, or not stopped
    /// - `Io`: `addr` is not mapped (or out of range for the user area)
    #[allow(clippy::cast_sign_loss)]
    pub fn peek(&self, addr: Address) -> TetherResult<Word>
    {
        let value = self
            .process
            .request(self.kind.peek_request(), addr, RequestData::None)?;
        Ok(value as Word)
    }

    /// Write one word at `addr`
    ///
    /// ## Errors
    ///
    /// Same as [`AddressSpace::peek`]. Poking the user area is restricted by
    /// the kernel to register and debug-register slots; other offsets fail
    /// with `Io`.
    pub fn poke(&self, addr: Address, value: Word) -> TetherResult<()>
    {
        self.process
            .request(self.kind.poke_request(), addr, RequestData::Word(value))?;
        Ok(())
    }
}

impl<D: Dispatch> fmt::Debug for AddressSpace<'_, D>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("AddressSpace")
            .field("pid", &self.process.pid())
            .field("kind", &self.kind)
            .finish()
    }
}
