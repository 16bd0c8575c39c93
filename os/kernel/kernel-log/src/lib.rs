//! # Kernel-Log Style Output
//!
//! A `log::Log` backend that renders records the way a kernel ring buffer
//! reads: every line of a record is prefixed with its level and target.
//!
//! ```text
//! [INFO] kernel_vas: +-------------------------------------------------------------+
//! [INFO] kernel_vas: |                         [ . . . ]                           |
//! ```
//!
//! Multi-line records (the address-space tables) keep their prefix on every
//! line so the output can be filtered with `grep` like `dmesg` output.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kernel_log::KlogLogger;
//! use log::{LevelFilter, info};
//!
//! KlogLogger::new(LevelFilter::Info).init().expect("logger initialization");
//! info!(target: "kernel_vas", "kernel_vas is INSERTED");
//! ```

mod logger;

pub use logger::{KlogLogger, write_record};
