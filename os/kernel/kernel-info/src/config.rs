//! # Kernel Configuration Flags

use bitfield_struct::bitfield;

/// Kernel build options that add or remove whole regions from the layout.
///
/// Each flag mirrors one `CONFIG_*` switch. Presets in
/// [`memory`](crate::memory) consult these flags once, when the layout is
/// built; nothing downstream looks at them again.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct KernelConfig {
    /// Bit 0, `CONFIG_KASAN`: a shadow region is reserved for the Kernel
    /// Address Sanitizer.
    pub kasan: bool,

    /// Bit 1, `CONFIG_SPARSEMEM_VMEMMAP`: `struct page` metadata lives in a
    /// virtually mapped array.
    pub sparsemem_vmemmap: bool,

    /// Bit 2, `CONFIG_HIGHMEM`: 32-bit kernels map memory beyond the direct
    /// map through a persistent kmap window.
    pub highmem: bool,

    /// Bits 3 to 7 are unused.
    #[bits(5)]
    __: u8,
}

impl KernelConfig {
    /// The configuration selected through this crate's cargo features.
    pub const HOST: Self = Self::new()
        .with_kasan(cfg!(feature = "kasan"))
        .with_sparsemem_vmemmap(cfg!(feature = "sparsemem-vmemmap"))
        .with_highmem(cfg!(feature = "highmem"));

    /// Every optional region enabled.
    #[must_use]
    pub const fn all() -> Self {
        Self::new()
            .with_kasan(true)
            .with_sparsemem_vmemmap(true)
            .with_highmem(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_pack_into_low_bits() {
        assert_eq!(KernelConfig::new().into_bits(), 0);
        assert_eq!(KernelConfig::new().with_kasan(true).into_bits(), 0b001);
        assert_eq!(KernelConfig::new().with_sparsemem_vmemmap(true).into_bits(), 0b010);
        assert_eq!(KernelConfig::new().with_highmem(true).into_bits(), 0b100);
        assert_eq!(KernelConfig::all().into_bits(), 0b111);
    }

    #[test]
    fn host_follows_features() {
        assert_eq!(KernelConfig::HOST.kasan(), cfg!(feature = "kasan"));
        assert_eq!(KernelConfig::HOST.highmem(), cfg!(feature = "highmem"));
        assert_eq!(
            KernelConfig::HOST.sparsemem_vmemmap(),
            cfg!(feature = "sparsemem-vmemmap")
        );
    }
}
