use kernel_memory_addresses::InvertedRangeError;
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum VasError {
    /// The context has no user memory descriptor (e.g. a kernel thread).
    #[error("no user address space in this context (pid {pid})")]
    NoUserAddressSpace { pid: u32 },

    /// The descriptor exists but the kernel withholds its addresses.
    #[error("user address space of pid {pid} is hidden from this process")]
    AddressesHidden { pid: u32 },

    #[error(transparent)]
    InvertedRange(#[from] InvertedRangeError),

    #[error("address range end overflows the address width")]
    AddressOverflow,

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: &'static str },
}

impl VasError {
    /// Whether the error only means there is no user side to report.
    #[must_use]
    pub const fn is_missing_user_space(&self) -> bool {
        matches!(
            self,
            Self::NoUserAddressSpace { .. } | Self::AddressesHidden { .. }
        )
    }
}
