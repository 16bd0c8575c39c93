use core::fmt;
use kernel_info::platform::PlatformInfo;

/// One-record summary of the platform the layout describes.
///
/// ```text
/// minimal platform info:
/// CPU: x86_64, little-endian; 64-bit OS.
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SystemInfoReport {
    platform: PlatformInfo,
}

impl SystemInfoReport {
    /// Facts about the compile target.
    pub const HOST: Self = Self::new(PlatformInfo::HOST);

    #[must_use]
    pub const fn new(platform: PlatformInfo) -> Self {
        Self { platform }
    }

    #[must_use]
    pub const fn platform(&self) -> PlatformInfo {
        self.platform
    }
}

impl fmt::Display for SystemInfoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "minimal platform info:\nCPU: {}", self.platform)
    }
}
