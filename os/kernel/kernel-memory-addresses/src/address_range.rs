use crate::{SizeUnit, VirtualAddress};
use core::fmt;

/// Half-open range of virtual addresses, `[low, high)`.
///
/// ### Invariants
/// - `low <= high`; the delta is therefore never negative.
/// - An empty range (`low == high`) is valid, e.g. a process whose heap has
///   not grown yet.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct AddressRange {
    low: VirtualAddress,
    high: VirtualAddress,
}

/// A boundary pair was read with `low > high`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("inverted address range: low {low} is above high {high}")]
pub struct InvertedRangeError {
    pub low: VirtualAddress,
    pub high: VirtualAddress,
}

impl AddressRange {
    /// Builds a range from run-time bounds.
    ///
    /// # Errors
    /// Returns [`InvertedRangeError`] if `low > high`.
    #[inline]
    pub const fn new(low: VirtualAddress, high: VirtualAddress) -> Result<Self, InvertedRangeError> {
        if low.as_u64() > high.as_u64() {
            return Err(InvertedRangeError { low, high });
        }
        Ok(Self { low, high })
    }

    /// Builds a range from constant bounds.
    ///
    /// # Panics
    /// Panics if `low > high`. Only call this in constant contexts, where the
    /// panic surfaces as a compile error.
    #[inline]
    #[must_use]
    pub const fn spanning(low: VirtualAddress, high: VirtualAddress) -> Self {
        assert!(low.as_u64() <= high.as_u64(), "inverted address range");
        Self { low, high }
    }

    /// Builds `[start, start + len)`, or `None` if the end overflows.
    #[inline]
    #[must_use]
    pub const fn from_len(start: VirtualAddress, len: u64) -> Option<Self> {
        match start.checked_add(len) {
            Some(high) => Some(Self { low: start, high }),
            None => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn low(self) -> VirtualAddress {
        self.low
    }

    #[inline]
    #[must_use]
    pub const fn high(self) -> VirtualAddress {
        self.high
    }

    /// Size of the range in bytes (`high - low`).
    #[inline]
    #[must_use]
    pub const fn delta(self) -> u64 {
        self.high.as_u64() - self.low.as_u64()
    }

    /// Size of the range scaled to `unit`, rounded towards zero.
    #[inline]
    #[must_use]
    pub const fn scaled(self, unit: SizeUnit) -> u64 {
        unit.scale(self.delta())
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.delta() == 0
    }
}

impl fmt::Debug for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AddressRange(0x{:016X}..0x{:016X})",
            self.low.as_u64(),
            self.high.as_u64()
        )
    }
}
