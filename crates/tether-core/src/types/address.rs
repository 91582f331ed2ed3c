//! Target address type.

use std::fmt;
use std::ops::{Add, Sub};

use super::word::{Word, WORD_SIZE};

/// Strongly typed address in the target process
///
/// This wrapper around [`Word`] keeps addresses apart from the values stored
/// at them. Both are machine words on the wire, which makes them easy to mix
/// up when calling `peek`/`poke`.
///
/// For the user-area view the "address" is a byte offset into the kernel's
/// per-thread `struct user` rather than a virtual address; the type is the
/// same.
///
/// ## Example
///
/// ```rust
/// use tether_core::types::Address;
///
/// let addr = Address::from(0x1000);
/// let next_addr = addr + 0x100; // Add offset
/// assert_eq!(next_addr.value(), 0x1100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(Word);

impl Address
{
    /// The null address (0x0)
    pub const ZERO: Self = Address(0);

    /// Create a new address from a word, usable in const contexts.
    ///
    /// ```rust
    /// use tether_core::types::Address;
    ///
    /// const SCRATCH: Address = Address::new(0x1000);
    /// assert_eq!(SCRATCH.value(), 0x1000);
    /// ```
    pub const fn new(value: Word) -> Self
    {
        Address(value)
    }

    /// Get the raw word value of this address
    pub const fn value(self) -> Word
    {
        self.0
    }

    /// Whether the address falls on a machine-word boundary
    ///
    /// The kernel accepts unaligned peeks on x86, but callers composing byte
    /// ranges out of word accesses usually want aligned addresses.
    ///
    /// ```rust
    /// use tether_core::types::{Address, WORD_SIZE};
    ///
    /// assert!(Address::from(WORD_SIZE * 4).is_word_aligned());
    /// assert!(!Address::from(WORD_SIZE * 4 + 1).is_word_aligned());
    /// ```
    pub const fn is_word_aligned(self) -> bool
    {
        self.0 % WORD_SIZE == 0
    }

    /// Round the address down to the containing word boundary
    ///
    /// ```rust
    /// use tether_core::types::{Address, WORD_SIZE};
    ///
    /// let addr = Address::from(WORD_SIZE * 2 + 3);
    /// assert_eq!(addr.align_down_to_word(), Address::from(WORD_SIZE * 2));
    /// ```
    pub const fn align_down_to_word(self) -> Self
    {
        Address(self.0 - self.0 % WORD_SIZE)
    }

    /// Add an offset to this address, checking for overflow
    ///
    /// ```rust
    /// use tether_core::types::Address;
    ///
    /// let addr = Address::from(0x1000);
    /// assert_eq!(addr.checked_add(0x100), Some(Address::from(0x1100)));
    /// assert_eq!(addr.checked_add(usize::MAX), None);
    /// ```
    pub fn checked_add(self, offset: Word) -> Option<Self>
    {
        self.0.checked_add(offset).map(Address)
    }

    /// Subtract an offset from this address, checking for underflow
    pub fn checked_sub(self, offset: Word) -> Option<Self>
    {
        self.0.checked_sub(offset).map(Address)
    }

    /// The address as the untyped pointer `ptrace(2)` expects in its `addr` slot.
    pub(crate) fn as_ptr(self) -> *mut libc::c_void
    {
        self.0 as *mut libc::c_void
    }
}

impl From<Word> for Address
{
    fn from(value: Word) -> Self
    {
        Address(value)
    }
}

impl From<Address> for Word
{
    fn from(address: Address) -> Self
    {
        address.0
    }
}

impl fmt::Display for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "0x{:0width$x}", self.0, width = WORD_SIZE * 2)
    }
}

impl Add<Word> for Address
{
    type Output = Address;

    fn add(self, rhs: Word) -> Self::Output
    {
        Address(self.0.wrapping_add(rhs))
    }
}

impl Sub<Word> for Address
{
    type Output = Address;

    fn sub(self, rhs: Word) -> Self::Output
    {
        Address(self.0.wrapping_sub(rhs))
    }
}
