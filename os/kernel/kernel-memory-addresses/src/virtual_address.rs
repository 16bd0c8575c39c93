use crate::WordWidth;
use core::fmt;

/// Virtual memory address.
///
/// A thin wrapper around a `u64` that denotes a **virtual** address, either in
/// the user or in the kernel half of an address space. It does not validate
/// canonicality; 32-bit addresses are simply stored zero-extended.
///
/// ### Examples
/// ```rust
/// # use kernel_memory_addresses::*;
/// let va = VirtualAddress::new(0xFFFF_8880_0000_0000);
/// assert_eq!(va.as_u64(), 0xFFFF_8880_0000_0000);
/// assert_eq!(va.checked_add(0x1000), Some(VirtualAddress::new(0xFFFF_8880_0000_1000)));
/// assert_eq!(VirtualAddress::new(u64::MAX).checked_add(1), None);
/// ```
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VirtualAddress(u64);

impl VirtualAddress {
    #[inline]
    #[must_use]
    pub const fn new(v: u64) -> Self {
        Self(v)
    }

    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Offsets the address by `rhs` bytes, or `None` on overflow.
    #[inline]
    #[must_use]
    pub const fn checked_add(self, rhs: u64) -> Option<Self> {
        match self.0.checked_add(rhs) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Formats the address the way the kernel's `%px` does: lowercase hex,
    /// zero-padded to the word width, without a `0x` prefix.
    #[inline]
    #[must_use]
    pub const fn display(self, width: WordWidth) -> PointerDisplay {
        PointerDisplay { addr: self, width }
    }
}

/// [`Display`](fmt::Display) adapter returned by [`VirtualAddress::display`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PointerDisplay {
    addr: VirtualAddress,
    width: WordWidth,
}

impl fmt::Display for PointerDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:0digits$x}",
            self.addr.as_u64(),
            digits = self.width.hex_digits()
        )
    }
}

impl fmt::Debug for VirtualAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VA(0x{:016X})", self.as_u64())
    }
}

impl fmt::Display for VirtualAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.as_u64())
    }
}
