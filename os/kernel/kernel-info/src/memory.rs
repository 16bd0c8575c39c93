//! # Kernel Virtual Memory Layout
//!
//! Representative values of the kernel's virtual memory regions for each
//! supported platform. Values follow the upstream defaults (no KASLR, 4 KiB
//! pages, 3G/1G split on 32-bit) and are approximate by nature.

use crate::config::KernelConfig;
use crate::platform::{ArchFamily, Endianness, PlatformInfo};
use kernel_memory_addresses::{AddressRange, VirtualAddress, WordWidth};

const SZ_4K: u64 = 4 * 1024;

/// Where per-page metadata (`struct page` array) lives.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum VmemmapRegion {
    /// Start and end are both known (`VMEMMAP_START`, `VMEMMAP_SIZE`).
    Range(AddressRange),
    /// Only the start is exported (x86-64 has no size constant).
    Start(VirtualAddress),
}

/// Kernel virtual memory layout of one platform build.
///
/// Optional regions are `None` when the platform or the configuration does
/// not have them; a report never prints placeholders for them.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct KernelLayout {
    pub platform: PlatformInfo,

    /// `PAGE_SIZE` in bytes.
    pub page_size: u64,

    /// `CONFIG_ARM64_VA_BITS`; only `AArch64` reports it.
    pub va_bits: Option<u32>,

    /// `TASK_SIZE`: size of the user part of the address space.
    pub task_size: u64,

    /// `PAGE_OFFSET`: start of the direct map of physical memory (lowmem).
    pub page_offset: VirtualAddress,

    /// ARM-32 exception vector page.
    pub vectors: Option<AddressRange>,

    /// Fixed-purpose mappings (`FIXADDR_START` up to `FIXADDR_TOP`).
    pub fixmap: Option<AddressRange>,

    /// Loadable module area (`MODULES_VADDR`, `MODULES_END`).
    pub modules: AddressRange,

    /// KASAN shadow memory.
    pub kasan_shadow: Option<AddressRange>,

    pub vmemmap: Option<VmemmapRegion>,

    /// `VMALLOC_START`, `VMALLOC_END`.
    pub vmalloc: AddressRange,

    /// Persistent kmap window for highmem (`PKMAP_BASE`, `LAST_PKMAP` pages).
    pub highmem: Option<AddressRange>,
}

const fn range(low: u64, high: u64) -> AddressRange {
    AddressRange::spanning(VirtualAddress::new(low), VirtualAddress::new(high))
}

const fn range_len(low: u64, len: u64) -> AddressRange {
    range(low, low + len)
}

impl KernelLayout {
    /// x86-64 with 4-level paging.
    #[must_use]
    pub const fn x86_64(config: KernelConfig) -> Self {
        Self {
            platform: PlatformInfo::new(ArchFamily::X86, Endianness::Little, WordWidth::Bits64),
            page_size: SZ_4K,
            va_bits: None,
            task_size: 0x0000_7fff_ffff_f000,
            page_offset: VirtualAddress::new(0xffff_8880_0000_0000),
            vectors: None,
            fixmap: Some(range(0xffff_ffff_ff57_8000, 0xffff_ffff_ff7f_f000)),
            modules: range(0xffff_ffff_a000_0000, 0xffff_ffff_ff00_0000),
            kasan_shadow: if config.kasan() {
                Some(range(0xffff_ec00_0000_0000, 0xffff_fc00_0000_0000))
            } else {
                None
            },
            // x86-64 always uses a virtually mapped memmap and exports no size.
            vmemmap: Some(VmemmapRegion::Start(VirtualAddress::new(
                0xffff_ea00_0000_0000,
            ))),
            vmalloc: range(0xffff_c900_0000_0000, 0xffff_e900_0000_0000),
            highmem: None,
        }
    }

    /// 32-bit x86 with the default 3G/1G split. KASAN is not available here.
    #[must_use]
    pub const fn x86(config: KernelConfig) -> Self {
        Self {
            platform: PlatformInfo::new(ArchFamily::X86, Endianness::Little, WordWidth::Bits32),
            page_size: SZ_4K,
            va_bits: None,
            task_size: 0xc000_0000,
            page_offset: VirtualAddress::new(0xc000_0000),
            vectors: None,
            fixmap: Some(range(0xffc0_0000, 0xffff_f000)),
            // Modules are loaded into the vmalloc area on x86-32.
            modules: range(0xf800_0000, 0xff7f_e000),
            kasan_shadow: None,
            vmemmap: None,
            vmalloc: range(0xf800_0000, 0xff7f_e000),
            highmem: if config.highmem() {
                Some(range_len(0xff80_0000, 1024 * SZ_4K))
            } else {
                None
            },
        }
    }

    /// ARM-32 with the default 3G/1G split.
    #[must_use]
    pub const fn arm(config: KernelConfig) -> Self {
        Self {
            platform: PlatformInfo::new(ArchFamily::Arm, Endianness::Little, WordWidth::Bits32),
            page_size: SZ_4K,
            va_bits: None,
            task_size: 0xbf00_0000,
            page_offset: VirtualAddress::new(0xc000_0000),
            vectors: Some(range_len(0xffff_0000, SZ_4K)),
            fixmap: Some(range(0xffc8_0000, 0xfff0_0000)),
            modules: range(0xbf00_0000, 0xbfe0_0000),
            kasan_shadow: if config.kasan() {
                Some(range(0xb6e0_0000, 0xbf00_0000))
            } else {
                None
            },
            vmemmap: None,
            vmalloc: range(0xf000_0000, 0xff80_0000),
            highmem: if config.highmem() {
                Some(range_len(0xbfe0_0000, 512 * SZ_4K))
            } else {
                None
            },
        }
    }

    /// `AArch64` with 48-bit virtual addresses and 4 KiB pages.
    #[must_use]
    pub const fn arm64(config: KernelConfig) -> Self {
        Self {
            platform: PlatformInfo::new(ArchFamily::Arm64, Endianness::Little, WordWidth::Bits64),
            page_size: SZ_4K,
            va_bits: Some(48),
            task_size: 1 << 48,
            page_offset: VirtualAddress::new(0xffff_0000_0000_0000),
            vectors: None,
            fixmap: Some(range(0xffff_fbff_fdc0_0000, 0xffff_fbff_fe00_0000)),
            modules: range(0xffff_8000_0000_0000, 0xffff_8000_8000_0000),
            kasan_shadow: if config.kasan() {
                Some(range(0xffff_6000_0000_0000, 0xffff_8000_0000_0000))
            } else {
                None
            },
            vmemmap: if config.sparsemem_vmemmap() {
                Some(VmemmapRegion::Range(range(
                    0xffff_fc00_0000_0000,
                    0xffff_fe00_0000_0000,
                )))
            } else {
                None
            },
            vmalloc: range(0xffff_8000_8000_0000, 0xffff_fbff_c000_0000),
            highmem: None,
        }
    }

    /// The layout matching the compile target and the cargo-selected
    /// [`KernelConfig::HOST`], if this platform has one.
    #[must_use]
    pub const fn host() -> Option<Self> {
        #[cfg(target_arch = "x86_64")]
        let layout = Some(Self::x86_64(KernelConfig::HOST));
        #[cfg(target_arch = "x86")]
        let layout = Some(Self::x86(KernelConfig::HOST));
        #[cfg(target_arch = "arm")]
        let layout = Some(Self::arm(KernelConfig::HOST));
        #[cfg(target_arch = "aarch64")]
        let layout = Some(Self::arm64(KernelConfig::HOST));
        #[cfg(not(any(
            target_arch = "x86_64",
            target_arch = "x86",
            target_arch = "arm",
            target_arch = "aarch64"
        )))]
        let layout: Option<Self> = None;

        match layout {
            Some(mut layout) => {
                layout.platform.endianness = Endianness::HOST;
                Some(layout)
            }
            None => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn word_width(&self) -> WordWidth {
        self.platform.word_width
    }

    /// The direct map of `total_ram` bytes of physical memory, starting at
    /// [`page_offset`](Self::page_offset).
    ///
    /// On 32-bit layouts the direct map cannot grow past the start of the
    /// vmalloc area; memory beyond that is highmem. Returns `None` if the end
    /// does not fit the layout's word width.
    #[must_use]
    pub const fn lowmem(&self, total_ram: u64) -> Option<AddressRange> {
        let Some(mut high) = self.page_offset.as_u64().checked_add(total_ram) else {
            return None;
        };

        if !self.word_width().is_64bit() && high > self.vmalloc.low().as_u64() {
            high = self.vmalloc.low().as_u64();
        }

        if high > self.word_width().max_address() {
            return None;
        }

        match AddressRange::new(self.page_offset, VirtualAddress::new(high)) {
            Ok(range) => Some(range),
            Err(_) => None,
        }
    }

    /// Checks that every region fits into the layout's word width.
    #[must_use]
    pub const fn fits_word_width(&self) -> bool {
        let max = self.word_width().max_address();

        let vmemmap = match self.vmemmap {
            Some(VmemmapRegion::Range(r)) => Some(r),
            Some(VmemmapRegion::Start(start)) => Some(AddressRange::spanning(start, start)),
            None => None,
        };

        self.task_size <= max
            && self.page_offset.as_u64() <= max
            && fits(self.vectors, max)
            && fits(self.fixmap, max)
            && fits(Some(self.modules), max)
            && fits(self.kasan_shadow, max)
            && fits(vmemmap, max)
            && fits(Some(self.vmalloc), max)
            && fits(self.highmem, max)
    }
}

const fn fits(region: Option<AddressRange>, max: u64) -> bool {
    match region {
        Some(r) => r.high().as_u64() <= max,
        None => true,
    }
}

const _: () = {
    assert!(KernelLayout::x86_64(KernelConfig::all()).fits_word_width());
    assert!(KernelLayout::x86(KernelConfig::all()).fits_word_width());
    assert!(KernelLayout::arm(KernelConfig::all()).fits_word_width());
    assert!(KernelLayout::arm64(KernelConfig::all()).fits_word_width());
    assert!(SZ_4K.is_power_of_two());
};
