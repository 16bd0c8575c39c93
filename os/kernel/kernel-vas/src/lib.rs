//! # Virtual Address Space Reporter
//!
//! Prints the layout of a process's user virtual address space next to the
//! kernel's own virtual memory regions, in the shape of a loadable-module
//! report.
//!
//! ## Overview
//!
//! | Part | Produces |
//! |------|----------|
//! | [`SystemInfoReport`] | CPU family, endianness and word width. |
//! | [`UserVasReport`] | Environment, arguments, stack, heap, data and text of one process. |
//! | [`KernelVasReport`] | Kernel regions by decreasing address. |
//! | [`KernelVas`] | The load/unload sequence tying the reports together. |
//!
//! Process state is read through a [`ContextAccessor`]: [`ProcfsContext`]
//! for live processes, [`FixedContext`] for synthetic values. The kernel
//! side comes from a [`KernelLayout`] resolved once for the compile target
//! ([`HOST_LAYOUT`]).
//!
//! ## Usage
//!
//! ```rust
//! use kernel_info::config::KernelConfig;
//! use kernel_info::memory::KernelLayout;
//! use kernel_vas::{FixedContext, KernelVas, MmFields, Options};
//! use log::Level;
//!
//! let mm = MmFields {
//!     start_code: 0x4000,
//!     end_code: 0x4500,
//!     start_stack: 0x7fff_0000,
//!     map_count: 3,
//!     ..MmFields::default()
//! };
//! let vas = KernelVas::new(FixedContext::new(1, mm, 1 << 30), Options::default())
//!     .with_layout(Some(KernelLayout::x86_64(KernelConfig::new())));
//!
//! let mut records: Vec<(Level, String)> = Vec::new();
//! vas.load(&mut records).unwrap();
//! assert_eq!(records[0].1, "kernel_vas is INSERTED");
//! ```

#![deny(unsafe_code)]

mod context;
mod error;
mod module;
mod procfs;
pub mod report;
mod sysinfo;

pub use context::{ContextAccessor, FixedContext, MmFields, UserSpaceSnapshot};
pub use error::VasError;
pub use module::{KernelVas, LogSink, MODULE_NAME, Options, RecordSink};
pub use procfs::{PROC_ROOT, ProcfsContext};
pub use report::{KernelVasReport, UserVasReport};
pub use sysinfo::SystemInfoReport;

use kernel_info::memory::KernelLayout;

/// Kernel layout of the compile target; `None` on platforms without a preset.
pub static HOST_LAYOUT: Option<KernelLayout> = KernelLayout::host();
