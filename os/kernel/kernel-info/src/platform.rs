//! # Platform Information

use core::fmt;
use kernel_memory_addresses::WordWidth;

/// CPU architecture family.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ArchFamily {
    X86,
    Arm,
    Arm64,
    Mips,
    PowerPc,
    S390,
    /// Any family the reporter has no name for.
    Other,
}

impl ArchFamily {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    pub const HOST: Self = Self::X86;
    #[cfg(target_arch = "arm")]
    pub const HOST: Self = Self::Arm;
    #[cfg(target_arch = "aarch64")]
    pub const HOST: Self = Self::Arm64;
    #[cfg(any(target_arch = "mips", target_arch = "mips64"))]
    pub const HOST: Self = Self::Mips;
    #[cfg(any(target_arch = "powerpc", target_arch = "powerpc64"))]
    pub const HOST: Self = Self::PowerPc;
    #[cfg(target_arch = "s390x")]
    pub const HOST: Self = Self::S390;
    #[cfg(not(any(
        target_arch = "x86",
        target_arch = "x86_64",
        target_arch = "arm",
        target_arch = "aarch64",
        target_arch = "mips",
        target_arch = "mips64",
        target_arch = "powerpc",
        target_arch = "powerpc64",
        target_arch = "s390x"
    )))]
    pub const HOST: Self = Self::Other;
}

/// Byte order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    #[cfg(target_endian = "little")]
    pub const HOST: Self = Self::Little;
    #[cfg(target_endian = "big")]
    pub const HOST: Self = Self::Big;

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Little => "little-endian",
            Self::Big => "big-endian",
        }
    }
}

/// The handful of facts the system-info line is made of.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct PlatformInfo {
    pub family: ArchFamily,
    pub endianness: Endianness,
    pub word_width: WordWidth,
}

impl PlatformInfo {
    /// The platform this crate was compiled for.
    pub const HOST: Self = Self {
        family: ArchFamily::HOST,
        endianness: Endianness::HOST,
        word_width: WordWidth::HOST,
    };

    #[must_use]
    pub const fn new(family: ArchFamily, endianness: Endianness, word_width: WordWidth) -> Self {
        Self {
            family,
            endianness,
            word_width,
        }
    }

    /// The CPU tag printed in the system-info line.
    ///
    /// x86 is the only family whose tag depends on the word width.
    #[must_use]
    pub const fn arch_tag(&self) -> &'static str {
        match (self.family, self.word_width) {
            (ArchFamily::X86, WordWidth::Bits32) => "x86_32",
            (ArchFamily::X86, WordWidth::Bits64) => "x86_64",
            (ArchFamily::Arm, _) => "ARM-32",
            (ArchFamily::Arm64, _) => "Aarch64",
            (ArchFamily::Mips, _) => "MIPS",
            (ArchFamily::PowerPc, _) => "PowerPC",
            (ArchFamily::S390, _) => "IBM S390",
            (ArchFamily::Other, _) => "unknown",
        }
    }
}

impl fmt::Display for PlatformInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}; {}-bit OS.",
            self.arch_tag(),
            self.endianness.as_str(),
            self.word_width.bits()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAGS: [&str; 8] = [
        "x86_32", "x86_64", "ARM-32", "Aarch64", "MIPS", "PowerPC", "IBM S390", "unknown",
    ];

    #[test]
    fn x86_tag_follows_word_width() {
        let p32 = PlatformInfo::new(ArchFamily::X86, Endianness::Little, WordWidth::Bits32);
        let p64 = PlatformInfo::new(ArchFamily::X86, Endianness::Little, WordWidth::Bits64);
        assert_eq!(p32.arch_tag(), "x86_32");
        assert_eq!(p64.arch_tag(), "x86_64");
    }

    #[test]
    fn display_line() {
        let p = PlatformInfo::new(ArchFamily::PowerPc, Endianness::Big, WordWidth::Bits64);
        assert_eq!(p.to_string(), "PowerPC, big-endian; 64-bit OS.");
    }

    #[test]
    fn host_line_has_exactly_one_family_tag() {
        let line = PlatformInfo::HOST.to_string();
        let cpu = line.split(',').next().expect("tag");
        assert_eq!(TAGS.iter().filter(|t| **t == cpu).count(), 1);
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn host_is_x86_64() {
        assert_eq!(PlatformInfo::HOST.arch_tag(), "x86_64");
    }

    #[cfg(target_arch = "aarch64")]
    #[test]
    fn host_is_aarch64() {
        assert_eq!(PlatformInfo::HOST.arch_tag(), "Aarch64");
    }
}
