use core::fmt;

/// Native word width of a platform (`BITS_PER_LONG`).
///
/// Decides how addresses are printed and which size annotations a report
/// row carries; a 32-bit layout never prints a terabyte column.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum WordWidth {
    Bits32,
    Bits64,
}

impl WordWidth {
    /// Word width of the platform this crate is compiled for.
    #[cfg(target_pointer_width = "64")]
    pub const HOST: Self = Self::Bits64;

    /// Word width of the platform this crate is compiled for.
    #[cfg(not(target_pointer_width = "64"))]
    pub const HOST: Self = Self::Bits32;

    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::Bits32 => 32,
            Self::Bits64 => 64,
        }
    }

    /// Number of hex digits a full-width address prints with.
    #[inline]
    #[must_use]
    pub const fn hex_digits(self) -> usize {
        match self {
            Self::Bits32 => 8,
            Self::Bits64 => 16,
        }
    }

    /// Highest representable address.
    #[inline]
    #[must_use]
    pub const fn max_address(self) -> u64 {
        match self {
            Self::Bits32 => 0xffff_ffff,
            Self::Bits64 => u64::MAX,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_64bit(self) -> bool {
        matches!(self, Self::Bits64)
    }
}

impl fmt::Display for WordWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}
