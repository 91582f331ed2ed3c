//! # Register Layouts
//!
//! Binary register-set layouts exchanged with the kernel by
//! `PTRACE_GETREGS`/`PTRACE_SETREGS` and `PTRACE_GETFPREGS`/`PTRACE_SETFPREGS`.
//!
//! The kernel copies these structures byte for byte, so every layout here is
//! `#[repr(C)]` with fields in exactly the order and width of the kernel's
//! `user_regs_struct` and `user_fpregs_struct` for that architecture:
//!
//! - [`i386`]: 32-bit x86 layouts (`eax`, `eip`, ... as 32-bit words)
//! - [`x86_64`]: 64-bit x86 layouts (`rax`, `rip`, ... as 64-bit words)
//!
//! Both modules are always compiled so their shape can be inspected on any
//! host. Only one pair is *active*: [`GeneralRegisters`] and [`FpRegisters`]
//! name the layouts of the target architecture, and that is the only pair the
//! dispatcher accepts. On targets other than x86 and x86-64 no pair is active
//! and the aliases are not defined. A mismatch between the active layout and
//! the host ABI fails the build (see the `const` assertions below) instead of
//! corrupting register reads at run time.
//!
//! ## References
//!
//! - [`<sys/user.h>` (glibc)](https://sourceware.org/git/?p=glibc.git;a=blob;f=sysdeps/unix/sysv/linux/x86/sys/user.h)
//! - [ptrace(2) man page](https://man7.org/linux/man-pages/man2/ptrace.2.html)

use crate::types::WordWidth;

/// The general-purpose register layout for this build's architecture.
#[cfg(target_arch = "x86_64")]
pub use self::x86_64::UserRegs as GeneralRegisters;

/// The floating-point register layout for this build's architecture.
#[cfg(target_arch = "x86_64")]
pub use self::x86_64::UserFpRegs as FpRegisters;

/// The general-purpose register layout for this build's architecture.
#[cfg(target_arch = "x86")]
pub use self::i386::UserRegs as GeneralRegisters;

/// The floating-point register layout for this build's architecture.
#[cfg(target_arch = "x86")]
pub use self::i386::UserFpRegs as FpRegisters;

/// Name and byte offset of one field in a register layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterField
{
    /// Field name, matching the kernel header
    pub name: &'static str,
    /// Byte offset of the field from the start of the structure
    pub offset: usize,
}

/// A fixed binary register layout
///
/// Implemented by every general-purpose and floating-point layout. The field
/// table lists fields in declaration order, which is also kernel order.
pub trait RegisterLayout: Copy + Default + std::fmt::Debug + PartialEq + 'static
{
    /// Word width this layout was written for
    const WIDTH: WordWidth;

    /// Every field in declaration order, with its byte offset
    const FIELDS: &'static [RegisterField];

    /// Names of every field in declaration order
    fn field_names() -> impl Iterator<Item = &'static str>
    {
        Self::FIELDS.iter().map(|field| field.name)
    }

    /// Byte offset of the named field, or `None` if the layout has no such field
    fn offset_of_field(name: &str) -> Option<usize>
    {
        Self::FIELDS.iter().find(|field| field.name == name).map(|field| field.offset)
    }
}

/// A general-purpose register layout with named word-sized fields
///
/// Values are exchanged as `u64` so code can work with both layouts on any
/// host. 32-bit fields are zero-extended on read and truncated on write.
pub trait GeneralRegisterLayout: RegisterLayout
{
    /// Current instruction pointer (`eip` / `rip`)
    fn instruction_pointer(&self) -> u64;

    /// Overwrite the instruction pointer (`eip` / `rip`)
    fn set_instruction_pointer(&mut self, value: u64);

    /// Current stack pointer (`esp` / `rsp`)
    fn stack_pointer(&self) -> u64;

    /// Read a field by name
    fn field(&self, name: &str) -> Option<u64>;

    /// Write a field by name
    ///
    /// Returns `false` (and leaves the set untouched) if the layout has no
    /// field called `name`.
    fn set_field(&mut self, name: &str, value: u64) -> bool;
}

/// Offset of a general-purpose register within the user area
///
/// `struct user` starts with the active register set, so the user-area
/// offset of a register is its offset in [`GeneralRegisters`].
///
/// ```rust
/// # #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
/// # {
/// use tether_core::registers::user_offset;
///
/// assert!(user_offset("orig_rax").or(user_offset("orig_eax")).is_some());
/// assert_eq!(user_offset("no_such_register"), None);
/// # }
/// ```
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub fn user_offset(name: &str) -> Option<crate::types::Address>
{
    GeneralRegisters::offset_of_field(name).map(crate::types::Address::new)
}

/// Conversion between a register field's storage type and `u64`.
pub(crate) trait RegisterWord: Copy
{
    fn widen(self) -> u64;
    fn narrow(value: u64) -> Self;
}

impl RegisterWord for u64
{
    fn widen(self) -> u64
    {
        self
    }

    fn narrow(value: u64) -> Self
    {
        value
    }
}

impl RegisterWord for i32
{
    #[allow(clippy::cast_sign_loss)]
    fn widen(self) -> u64
    {
        u64::from(self as u32)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn narrow(value: u64) -> Self
    {
        value as u32 as i32
    }
}

/// Declares a general-purpose register layout whose fields all share one type.
///
/// Generates the `#[repr(C)]` struct, its field table, and by-name access.
macro_rules! general_register_layout {
    (
        $(#[$meta:meta])*
        pub struct $name:ident: [$word:ty; $width:ident] {
            $( $(#[$field_meta:meta])* $field:ident, )*
        }
    ) => {
        $(#[$meta])*
        #[repr(C)]
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name
        {
            $( $(#[$field_meta])* pub $field: $word, )*
        }

        impl $crate::registers::RegisterLayout for $name
        {
            const WIDTH: $crate::types::WordWidth = $crate::types::WordWidth::$width;

            const FIELDS: &'static [$crate::registers::RegisterField] = &[
                $(
                    $crate::registers::RegisterField {
                        name: stringify!($field),
                        offset: ::core::mem::offset_of!($name, $field),
                    },
                )*
            ];
        }

        impl $name
        {
            fn get_by_name(&self, name: &str) -> Option<u64>
            {
                match name {
                    $( stringify!($field) => Some($crate::registers::RegisterWord::widen(self.$field)), )*
                    _ => None,
                }
            }

            fn set_by_name(&mut self, name: &str, value: u64) -> bool
            {
                match name {
                    $(
                        stringify!($field) => {
                            self.$field = $crate::registers::RegisterWord::narrow(value);
                            true
                        }
                    )*
                    _ => false,
                }
            }
        }
    };
}

pub(crate) use general_register_layout;

pub mod i386;
pub mod x86_64;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
const _: () = assert!(
    <GeneralRegisters as RegisterLayout>::WIDTH.same_as(WordWidth::NATIVE),
    "active general-purpose register layout does not match the target word width"
);

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
const _: () = assert!(
    <FpRegisters as RegisterLayout>::WIDTH.same_as(WordWidth::NATIVE),
    "active floating-point register layout does not match the target word width"
);

#[cfg(all(target_os = "linux", target_env = "gnu", any(target_arch = "x86", target_arch = "x86_64")))]
const _: () = {
    assert!(
        std::mem::size_of::<GeneralRegisters>() == std::mem::size_of::<libc::user_regs_struct>(),
        "general-purpose register layout differs from the kernel's user_regs_struct"
    );
    assert!(
        std::mem::size_of::<FpRegisters>() == std::mem::size_of::<libc::user_fpregs_struct>(),
        "floating-point register layout differs from the kernel's user_fpregs_struct"
    );
};
