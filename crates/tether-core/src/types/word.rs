//! Machine word types.

use std::fmt;

/// A native machine word, the unit of every peek and poke.
///
/// `ptrace(2)` moves exactly one `long` per `PEEK*`/`POKE*` request. On the
/// supported Linux targets `long` and `usize` have the same width.
pub type Word = usize;

/// Size of a [`Word`] in bytes.
pub const WORD_SIZE: usize = std::mem::size_of::<Word>();

/// Width of a target's machine word
///
/// Register layouts and request tables are tagged with the width they were
/// written for. Exactly one width is native to a build; see
/// [`WordWidth::NATIVE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordWidth
{
    /// 32-bit targets (i386)
    Bits32,
    /// 64-bit targets (x86-64)
    Bits64,
}

impl WordWidth
{
    /// The word width of the platform this crate was compiled for.
    #[cfg(target_pointer_width = "32")]
    pub const NATIVE: Self = WordWidth::Bits32;

    /// The word width of the platform this crate was compiled for.
    #[cfg(target_pointer_width = "64")]
    pub const NATIVE: Self = WordWidth::Bits64;

    /// Number of bytes in a word of this width
    ///
    /// ```rust
    /// use tether_core::types::WordWidth;
    ///
    /// assert_eq!(WordWidth::Bits32.bytes(), 4);
    /// assert_eq!(WordWidth::Bits64.bytes(), 8);
    /// ```
    pub const fn bytes(self) -> usize
    {
        match self {
            WordWidth::Bits32 => 4,
            WordWidth::Bits64 => 8,
        }
    }

    /// Const-friendly equality, used by the compile-time layout checks.
    pub const fn same_as(self, other: Self) -> bool
    {
        self.bytes() == other.bytes()
    }
}

impl fmt::Display for WordWidth
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            WordWidth::Bits32 => write!(f, "32-bit"),
            WordWidth::Bits64 => write!(f, "64-bit"),
        }
    }
}

const _: () = assert!(WordWidth::NATIVE.bytes() == WORD_SIZE);
