//! # Platform Facts and Kernel Virtual Memory Layouts
//!
//! This crate is the authoritative source for everything the address-space
//! reporter knows *without* looking at a running process: which CPU family
//! and word width it was built for, and where the kernel places its virtual
//! memory regions on that platform.
//!
//! ## Overview
//!
//! A kernel exposes its layout through compile-time constants (`FIXADDR_START`,
//! `MODULES_VADDR`, `VMALLOC_START`, `PAGE_OFFSET`, ...) whose values depend on
//! the architecture and on configuration switches such as KASAN or HIGHMEM.
//! Instead of scattering those switches through formatting code, this crate
//! resolves them once into a single immutable [`KernelLayout`](memory::KernelLayout)
//! value per platform. A report built from a layout therefore always has the
//! same shape for the same build.
//!
//! ## Architecture
//!
//! ### Platform Information ([`platform`])
//! * **Architecture family**: x86, ARM, `AArch64`, MIPS, `PowerPC`, S390
//! * **Endianness**: little or big endian
//! * **Word width**: 32 or 64 bit
//!
//! ### Kernel Configuration ([`config`])
//! A packed flag set mirroring the kernel options that add or remove regions
//! (`CONFIG_KASAN`, `CONFIG_SPARSEMEM_VMEMMAP`, `CONFIG_HIGHMEM`). The host
//! value is selected by this crate's cargo features.
//!
//! ### Memory Layout ([`memory`])
//! One preset per supported platform:
//!
//! ```text
//! x86_64 (4-level paging), by decreasing address:
//!
//! 0xffff_ffff_ff57_8000 ┌─────────────────────────────────┐ fixmap
//! 0xffff_ffff_a000_0000 ├─────────────────────────────────┤ modules
//! 0xffff_ec00_0000_0000 ├─────────────────────────────────┤ KASAN shadow (optional)
//! 0xffff_ea00_0000_0000 ├─────────────────────────────────┤ vmemmap
//! 0xffff_c900_0000_0000 ├─────────────────────────────────┤ vmalloc
//! 0xffff_8880_0000_0000 ├─────────────────────────────────┤ direct map (PAGE_OFFSET)
//!                       │            ...                  │
//! 0x0000_7fff_ffff_f000 ├─────────────────────────────────┤ TASK_SIZE
//!                       │          User Space             │
//! 0x0000_0000_0000_0000 └─────────────────────────────────┘
//! ```
//!
//! ## Usage Patterns
//!
//! ```rust
//! use kernel_info::config::KernelConfig;
//! use kernel_info::memory::KernelLayout;
//!
//! let layout = KernelLayout::x86_64(KernelConfig::new().with_kasan(true));
//! assert!(layout.kasan_shadow.is_some());
//!
//! let plain = KernelLayout::x86_64(KernelConfig::new());
//! assert!(plain.kasan_shadow.is_none());
//! ```
//!
//! All presets are `const fn`s; every layout this crate can hand out is
//! evaluated at compile time, so an inverted region is a build error rather
//! than a run-time surprise.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod memory;
pub mod platform;
