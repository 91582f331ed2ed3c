//! Build script for tether-core
//!
//! This script checks system requirements before compilation:
//! - Minimum Rust version (`core::mem::offset_of!` is stable since 1.77.0)
//! - Target support for the ptrace platform layer
//!
//! ## Requirements
//!
//! - **Rust**: 1.77.0 or newer
//! - **Linux**: x86 (32-bit) or x86-64; other targets build the register
//!   layouts only, without the ptrace dispatcher

fn main()
{
    println!("cargo:rerun-if-changed=build.rs");

    let min_rust_version = rustc_version::Version::new(1, 77, 0);
    if let Ok(rustc_version) = rustc_version::version() {
        if rustc_version < min_rust_version {
            panic!(
                "tether-core requires Rust {} or newer, found {}",
                min_rust_version, rustc_version
            );
        }
    } else {
        // If we can't get version (e.g., in some build environments), just warn
        println!("cargo:warning=could not verify Rust version");
    }

    check_target_support();
}

/// Warn when the ptrace layer is compiled out for the target.
///
/// `cfg!` in a build script describes the host, so the target is read from the
/// `CARGO_CFG_*` variables cargo exports instead.
fn check_target_support()
{
    let os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    let arch = std::env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();

    if os != "linux" {
        println!("cargo:warning=tether-core: ptrace control is only available on Linux (target os: {os})");
    } else if arch != "x86" && arch != "x86_64" {
        println!("cargo:warning=tether-core: no register ABI for {arch}; only x86 and x86_64 are supported");
    }
}
