//! # Virtual Address and Address Range Types
//!
//! Strongly typed wrappers for the raw virtual addresses and address ranges
//! that make up an address-space layout report.
//!
//! ## Overview
//!
//! The layout reporter deals in exactly two kinds of values: single virtual
//! addresses (e.g. the start of the user stack) and half-open ranges of
//! virtual addresses (e.g. the vmalloc area). Both are zero-cost wrappers
//! around `u64` so 32-bit layouts can be modelled on a 64-bit host and vice
//! versa.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`VirtualAddress`] | A raw virtual address. |
//! | [`AddressRange`] | A `[low, high)` pair with `low <= high`. |
//! | [`SizeUnit`] | Power-of-two unit used to scale a range's byte delta. |
//! | [`WordWidth`] | Native word width; decides how many hex digits an address prints with. |
//!
//! ## Typical Usage
//!
//! ```rust
//! # use kernel_memory_addresses::*;
//! let heap = AddressRange::new(VirtualAddress::new(0x5000), VirtualAddress::new(0x6000)).unwrap();
//! assert_eq!(heap.delta(), 4096);
//! assert_eq!(heap.scaled(SizeUnit::Kilo), 4);
//!
//! // Inverted pairs are rejected
//! assert!(AddressRange::new(VirtualAddress::new(0x2000), VirtualAddress::new(0x1000)).is_err());
//!
//! // Addresses print like the kernel's `%px`: zero-padded, no prefix
//! let va = VirtualAddress::new(0xc000_0000);
//! assert_eq!(va.display(WordWidth::Bits32).to_string(), "c0000000");
//! ```
//!
//! ## Design Notes
//!
//! - All types are `Copy` and `const`-constructible so per-platform layouts
//!   can be declared as constants and validated at compile time.
//! - [`AddressRange::spanning`] panics on inverted bounds and is meant for
//!   constant contexts only, where the panic becomes a build error. Values read
//!   at run time go through the fallible [`AddressRange::new`].

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

mod address_range;
mod size_unit;
mod virtual_address;
mod word_width;

pub use address_range::{AddressRange, InvertedRangeError};
pub use size_unit::SizeUnit;
pub use virtual_address::{PointerDisplay, VirtualAddress};
pub use word_width::WordWidth;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_exact_and_scaling_floors() {
        let text = AddressRange::new(VirtualAddress::new(0x4000), VirtualAddress::new(0x4500))
            .expect("valid range");
        assert_eq!(text.delta(), 1280);
        assert_eq!(text.scaled(SizeUnit::Bytes), 1280);
        assert_eq!(text.scaled(SizeUnit::Kilo), 1);
        assert_eq!(text.scaled(SizeUnit::Mega), 0);
    }

    #[test]
    fn empty_range_is_valid() {
        let r = AddressRange::new(VirtualAddress::new(0x1000), VirtualAddress::new(0x1000))
            .expect("empty range");
        assert!(r.is_empty());
        assert_eq!(r.delta(), 0);
    }

    #[test]
    fn inverted_range_reports_both_bounds() {
        let err = AddressRange::new(VirtualAddress::new(0x2000), VirtualAddress::new(0x1000))
            .expect_err("inverted");
        assert_eq!(err.low, VirtualAddress::new(0x2000));
        assert_eq!(err.high, VirtualAddress::new(0x1000));
    }

    #[test]
    fn large_kernel_ranges_scale_to_tera() {
        // x86_64 vmalloc area: 32 TiB
        let vmalloc = AddressRange::spanning(
            VirtualAddress::new(0xffff_c900_0000_0000),
            VirtualAddress::new(0xffff_e900_0000_0000),
        );
        assert_eq!(vmalloc.scaled(SizeUnit::Tera), 32);
        assert_eq!(vmalloc.scaled(SizeUnit::Giga), 32 * 1024);
        assert_eq!(vmalloc.scaled(SizeUnit::Mega), 32 * 1024 * 1024);
    }

    #[test]
    fn from_len_detects_overflow() {
        let base = VirtualAddress::new(u64::MAX - 0xfff);
        assert!(AddressRange::from_len(base, 0x1000).is_none());
        let r = AddressRange::from_len(base, 0xfff).expect("fits");
        assert_eq!(r.high().as_u64(), u64::MAX);
    }

    #[test]
    fn offsets_never_wrap() {
        let top = VirtualAddress::new(u64::MAX - 1);
        assert_eq!(top.checked_add(1), Some(VirtualAddress::new(u64::MAX)));
        assert_eq!(top.checked_add(2), None);
    }

    #[test]
    fn pointer_display_pads_to_word_width() {
        let va = VirtualAddress::new(0x7fff_0000);
        assert_eq!(va.display(WordWidth::Bits64).to_string(), "000000007fff0000");
        assert_eq!(va.display(WordWidth::Bits32).to_string(), "7fff0000");
    }
}
