//! # x86-64 Register Layouts
//!
//! 64-bit x86 register sets as the kernel exchanges them with a tracer.
//!
//! Note that the general-purpose order is *not* the encoding order
//! (`rax`, `rcx`, ...). It follows the kernel's `pt_regs` save order, with
//! `r15` first.
//!
//! ## References
//!
//! - [arch/x86/include/asm/user_64.h](https://github.com/torvalds/linux/blob/master/arch/x86/include/asm/user_64.h)

use super::{GeneralRegisterLayout, RegisterField, RegisterLayout};
use crate::types::WordWidth;

super::general_register_layout! {
    /// x86-64 `user_regs_struct` (27 × 64-bit, 216 bytes)
    pub struct UserRegs: [u64; Bits64] {
        r15,
        r14,
        r13,
        r12,
        rbp,
        rbx,
        r11,
        r10,
        r9,
        r8,
        rax,
        rcx,
        rdx,
        rsi,
        rdi,
        /// Syscall number at a syscall stop; `rax` then holds the return value
        orig_rax,
        rip,
        cs,
        eflags,
        rsp,
        ss,
        fs_base,
        gs_base,
        ds,
        es,
        fs,
        gs,
    }
}

impl GeneralRegisterLayout for UserRegs
{
    fn instruction_pointer(&self) -> u64
    {
        self.rip
    }

    fn set_instruction_pointer(&mut self, value: u64)
    {
        self.rip = value;
    }

    fn stack_pointer(&self) -> u64
    {
        self.rsp
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

/// x86-64 `user_fpregs_struct` (FXSAVE image, 512 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserFpRegs
{
    /// FPU control word
    pub cwd: u16,
    /// FPU status word
    pub swd: u16,
    /// Abridged FPU tag word
    pub ftw: u16,
    /// Last x87 opcode
    pub fop: u16,
    /// Last x87 instruction pointer
    pub rip: u64,
    /// Last x87 data pointer
    pub rdp: u64,
    /// SSE control/status register
    pub mxcsr: u32,
    /// Valid MXCSR bits
    pub mxcr_mask: u32,
    /// ST0-ST7, 16 bytes each
    pub st_space: [u32; 32],
    /// XMM0-XMM15, 16 bytes each
    pub xmm_space: [u32; 64],
    /// Reserved, unused by the kernel
    pub padding: [u32; 24],
}

impl Default for UserFpRegs
{
    fn default() -> Self
    {
        Self {
            cwd: 0,
            swd: 0,
            ftw: 0,
            fop: 0,
            rip: 0,
            rdp: 0,
            mxcsr: 0,
            mxcr_mask: 0,
            st_space: [0; 32],
            xmm_space: [0; 64],
            padding: [0; 24],
        }
    }
}

impl UserFpRegs
{
    /// Raw 128-bit contents of `XMMn`, or `None` if `n > 15`
    pub fn xmm(&self, n: usize) -> Option<u128>
    {
        if n > 15 {
            return None;
        }
        let lanes = &self.xmm_space[n * 4..n * 4 + 4];
        Some(
            lanes
                .iter()
                .rev()
                .fold(0u128, |acc, lane| (acc << 32) | u128::from(*lane)),
        )
    }
}

impl RegisterLayout for UserFpRegs
{
    const WIDTH: WordWidth = WordWidth::Bits64;

    const FIELDS: &'static [RegisterField] = &[
        RegisterField { name: "cwd", offset: std::mem::offset_of!(UserFpRegs, cwd) },
        RegisterField { name: "swd", offset: std::mem::offset_of!(UserFpRegs, swd) },
        RegisterField { name: "ftw", offset: std::mem::offset_of!(UserFpRegs, ftw) },
        RegisterField { name: "fop", offset: std::mem::offset_of!(UserFpRegs, fop) },
        RegisterField { name: "rip", offset: std::mem::offset_of!(UserFpRegs, rip) },
        RegisterField { name: "rdp", offset: std::mem::offset_of!(UserFpRegs, rdp) },
        RegisterField { name: "mxcsr", offset: std::mem::offset_of!(UserFpRegs, mxcsr) },
        RegisterField { name: "mxcr_mask", offset: std::mem::offset_of!(UserFpRegs, mxcr_mask) },
        RegisterField { name: "st_space", offset: std::mem::offset_of!(UserFpRegs, st_space) },
        RegisterField { name: "xmm_space", offset: std::mem::offset_of!(UserFpRegs, xmm_space) },
        RegisterField { name: "padding", offset: std::mem::offset_of!(UserFpRegs, padding) },
    ];
}

const _: () = assert!(std::mem::size_of::<UserRegs>() == 216);
const _: () = assert!(std::mem::size_of::<UserFpRegs>() == 512);
