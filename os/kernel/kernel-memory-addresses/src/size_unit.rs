use core::fmt;

/// Power-of-two unit a byte count is scaled to for display.
///
/// Scaling is a plain right shift, i.e. a floor division: a 1280-byte range is
/// `1` KB, a 4095-byte range is `0` KB.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum SizeUnit {
    Bytes,
    Kilo,
    Mega,
    Giga,
    Tera,
}

impl SizeUnit {
    /// log2 of the unit size.
    #[inline]
    #[must_use]
    pub const fn shift(self) -> u32 {
        match self {
            Self::Bytes => 0,
            Self::Kilo => 10,
            Self::Mega => 20,
            Self::Giga => 30,
            Self::Tera => 40,
        }
    }

    /// Scales `bytes` down to this unit, rounding towards zero.
    #[inline]
    #[must_use]
    pub const fn scale(self, bytes: u64) -> u64 {
        bytes >> self.shift()
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bytes => "bytes",
            Self::Kilo => "KB",
            Self::Mega => "MB",
            Self::Giga => "GB",
            Self::Tera => "TB",
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
