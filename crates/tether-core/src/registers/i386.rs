//! # i386 Register Layouts
//!
//! 32-bit x86 register sets as the kernel exchanges them with a tracer.
//!
//! Every general-purpose field is a C `long`, which is 32 bits on i386. The
//! segment registers carry an `x` prefix (`xds`, `xcs`, ...) in the kernel
//! header; the names are kept as-is.

use super::{GeneralRegisterLayout, RegisterField, RegisterLayout, RegisterWord};
use crate::types::WordWidth;

super::general_register_layout! {
    /// i386 `user_regs_struct` (17 × 32-bit, 68 bytes)
    pub struct UserRegs: [i32; Bits32] {
        ebx,
        ecx,
        edx,
        esi,
        edi,
        ebp,
        eax,
        xds,
        xes,
        xfs,
        xgs,
        /// Syscall number at a syscall stop; `eax` then holds the return value
        orig_eax,
        eip,
        xcs,
        eflags,
        esp,
        xss,
    }
}

impl GeneralRegisterLayout for UserRegs
{
    fn instruction_pointer(&self) -> u64
    {
        self.eip.widen()
    }

    fn set_instruction_pointer(&mut self, value: u64)
    {
        self.eip = i32::narrow(value);
    }

    fn stack_pointer(&self) -> u64
    {
        self.esp.widen()
    }

    fn field(&self, name: &str) -> Option<u64>
    {
        self.get_by_name(name)
    }

    fn set_field(&mut self, name: &str, value: u64) -> bool
    {
        self.set_by_name(name, value)
    }
}

/// i386 `user_fpregs_struct` (x87 FSAVE image, 108 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct UserFpRegs
{
    /// FPU control word
    pub cwd: i32,
    /// FPU status word
    pub swd: i32,
    /// FPU tag word
    pub twd: i32,
    /// FPU instruction pointer offset
    pub fip: i32,
    /// FPU instruction pointer selector
    pub fcs: i32,
    /// FPU operand pointer offset
    pub foo: i32,
    /// FPU operand pointer selector
    pub fos: i32,
    /// ST0-ST7, 10 bytes each, packed
    pub st_space: [i32; 20],
}

impl RegisterLayout for UserFpRegs
{
    const WIDTH: WordWidth = WordWidth::Bits32;

    const FIELDS: &'static [RegisterField] = &[
        RegisterField { name: "cwd", offset: std::mem::offset_of!(UserFpRegs, cwd) },
        RegisterField { name: "swd", offset: std::mem::offset_of!(UserFpRegs, swd) },
        RegisterField { name: "twd", offset: std::mem::offset_of!(UserFpRegs, twd) },
        RegisterField { name: "fip", offset: std::mem::offset_of!(UserFpRegs, fip) },
        RegisterField { name: "fcs", offset: std::mem::offset_of!(UserFpRegs, fcs) },
        RegisterField { name: "foo", offset: std::mem::offset_of!(UserFpRegs, foo) },
        RegisterField { name: "fos", offset: std::mem::offset_of!(UserFpRegs, fos) },
        RegisterField { name: "st_space", offset: std::mem::offset_of!(UserFpRegs, st_space) },
    ];
}

const _: () = assert!(std::mem::size_of::<UserRegs>() == 68);
const _: () = assert!(std::mem::size_of::<UserFpRegs>() == 108);
