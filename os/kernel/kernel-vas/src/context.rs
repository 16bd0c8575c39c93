//! # Execution Context Access
//!
//! The reporter never reads process state directly. It asks a
//! [`ContextAccessor`] for a snapshot, which lets tests hand in synthetic
//! values and the binary hand in procfs.

use crate::VasError;
use kernel_memory_addresses::{AddressRange, InvertedRangeError, VirtualAddress};

/// Raw memory-descriptor fields of one process, in the same shape the kernel
/// keeps them (`mm_struct`).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct MmFields {
    pub env_start: u64,
    pub env_end: u64,
    pub arg_start: u64,
    pub arg_end: u64,
    pub start_stack: u64,
    pub start_brk: u64,
    pub brk: u64,
    pub start_data: u64,
    pub end_data: u64,
    pub start_code: u64,
    pub end_code: u64,
    /// Number of mapped regions (VMAs).
    pub map_count: usize,
}

impl MmFields {
    /// All address fields are zero, which is what the kernel shows for a
    /// context without a user memory descriptor.
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        self.env_start == 0
            && self.env_end == 0
            && self.arg_start == 0
            && self.arg_end == 0
            && self.start_stack == 0
            && self.start_brk == 0
            && self.brk == 0
            && self.start_data == 0
            && self.end_data == 0
            && self.start_code == 0
            && self.end_code == 0
    }

    /// The pattern the kernel shows in `stat` to a reader that may not trace
    /// the process: `startcode` and `endcode` read 1, every other address
    /// field reads 0.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.start_code == 1
            && self.end_code == 1
            && self.env_start == 0
            && self.env_end == 0
            && self.arg_start == 0
            && self.arg_end == 0
            && self.start_stack == 0
            && self.start_brk == 0
            && self.start_data == 0
            && self.end_data == 0
    }
}

/// Validated view of a process's user address space.
///
/// Only valid for the duration of one report; the process keeps running and
/// its break in particular may move right after the snapshot was taken.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct UserSpaceSnapshot {
    pub environment: AddressRange,
    pub arguments: AddressRange,
    pub stack_start: VirtualAddress,
    /// `[start_brk, brk)`.
    pub heap: AddressRange,
    pub data: AddressRange,
    pub text: AddressRange,
    pub map_count: usize,
}

impl TryFrom<MmFields> for UserSpaceSnapshot {
    type Error = InvertedRangeError;

    fn try_from(mm: MmFields) -> Result<Self, Self::Error> {
        let pair = |low: u64, high: u64| {
            AddressRange::new(VirtualAddress::new(low), VirtualAddress::new(high))
        };

        Ok(Self {
            environment: pair(mm.env_start, mm.env_end)?,
            arguments: pair(mm.arg_start, mm.arg_end)?,
            stack_start: VirtualAddress::new(mm.start_stack),
            heap: pair(mm.start_brk, mm.brk)?,
            data: pair(mm.start_data, mm.end_data)?,
            text: pair(mm.start_code, mm.end_code)?,
            map_count: mm.map_count,
        })
    }
}

/// Read-only access to the execution context a report describes.
pub trait ContextAccessor {
    /// Process the context belongs to.
    fn pid(&self) -> u32;

    /// Snapshot of the user address space.
    ///
    /// # Errors
    /// [`VasError::NoUserAddressSpace`] if the context has no user memory
    /// descriptor, [`VasError::InvertedRange`] if a boundary pair is inverted,
    /// or an I/O or parse error of the underlying source.
    fn user_space(&self) -> Result<UserSpaceSnapshot, VasError>;

    /// Total usable RAM in bytes.
    ///
    /// # Errors
    /// An I/O or parse error of the underlying source.
    fn total_ram(&self) -> Result<u64, VasError>;
}

impl<T: ContextAccessor + ?Sized> ContextAccessor for &T {
    fn pid(&self) -> u32 {
        (**self).pid()
    }

    fn user_space(&self) -> Result<UserSpaceSnapshot, VasError> {
        (**self).user_space()
    }

    fn total_ram(&self) -> Result<u64, VasError> {
        (**self).total_ram()
    }
}

/// A context with fixed, caller-provided values.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FixedContext {
    pid: u32,
    mm: Option<MmFields>,
    total_ram: u64,
}

impl FixedContext {
    #[must_use]
    pub const fn new(pid: u32, mm: MmFields, total_ram: u64) -> Self {
        Self {
            pid,
            mm: Some(mm),
            total_ram,
        }
    }

    /// A context without a user memory descriptor.
    #[must_use]
    pub const fn kernel_thread(pid: u32, total_ram: u64) -> Self {
        Self {
            pid,
            mm: None,
            total_ram,
        }
    }
}

impl ContextAccessor for FixedContext {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn user_space(&self) -> Result<UserSpaceSnapshot, VasError> {
        let mm = self
            .mm
            .ok_or(VasError::NoUserAddressSpace { pid: self.pid })?;
        Ok(UserSpaceSnapshot::try_from(mm)?)
    }

    fn total_ram(&self) -> Result<u64, VasError> {
        Ok(self.total_ram)
    }
}
