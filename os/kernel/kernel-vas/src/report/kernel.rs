use super::{BORDER, DOTS, Region, Row, Scale, Side, write_rows};
use crate::VasError;
use core::fmt;
use kernel_info::memory::{KernelLayout, VmemmapRegion};
use kernel_memory_addresses::{AddressRange, SizeUnit};

const PAGE_OFFSET_MARKER_64: [&str; 2] = [
    "|                     ^^^^^^^^^^^^^^^^                        |",
    "|                        PAGE_OFFSET                          |",
];

const PAGE_OFFSET_MARKER_32: [&str; 2] = [
    "|                     ^^^^^^^^                                |",
    "|                    PAGE_OFFSET                              |",
];

const SZ_64K: u64 = 64 * 1024;

/// The kernel half of the address-space report, by decreasing address.
///
/// The ordering is best effort: on 64-bit layouts the module area is listed
/// right below the fixmap, on 32-bit layouts (where it sits below
/// `PAGE_OFFSET`) it is listed last.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct KernelVasReport {
    layout: KernelLayout,
    total_ram: u64,
    lowmem: AddressRange,
}

impl KernelVasReport {
    /// # Errors
    /// [`VasError::AddressOverflow`] if the direct map of `total_ram` bytes
    /// does not fit above `PAGE_OFFSET`.
    pub fn new(layout: &KernelLayout, total_ram: u64) -> Result<Self, VasError> {
        let lowmem = layout.lowmem(total_ram).ok_or(VasError::AddressOverflow)?;
        Ok(Self {
            layout: *layout,
            total_ram,
            lowmem,
        })
    }

    #[must_use]
    pub const fn layout(&self) -> &KernelLayout {
        &self.layout
    }

    #[must_use]
    pub const fn lowmem(&self) -> AddressRange {
        self.lowmem
    }

    /// Table rows, top to bottom. Regions the layout does not have produce
    /// no row at all.
    #[must_use]
    pub fn rows(&self) -> Vec<Row> {
        let l = &self.layout;
        let wide = l.word_width().is_64bit();
        let mut rows = Vec::with_capacity(16);

        if let Some(vectors) = l.vectors {
            rows.push(Row::Line(DOTS));
            rows.push(range(Region::VectorTable, vectors, Scale::Kilo));
        }

        if let Some(fixmap) = l.fixmap {
            rows.push(Row::Line(DOTS));
            rows.push(range(Region::Fixmap, fixmap, Scale::Mega));
        }

        if wide {
            rows.push(range(Region::Modules, l.modules, Scale::Mega));
        }

        if let Some(kasan) = l.kasan_shadow {
            rows.push(range(Region::KasanShadow, kasan, Scale::MegaGigaTera));
        }

        match l.vmemmap {
            Some(VmemmapRegion::Range(vmemmap)) => {
                rows.push(Row::Line(DOTS));
                rows.push(range(Region::Vmemmap, vmemmap, Scale::MegaGigaTera));
            }
            Some(VmemmapRegion::Start(addr)) => {
                rows.push(Row::Line(DOTS));
                rows.push(Row::Start {
                    region: Region::Vmemmap,
                    addr,
                });
            }
            None => {}
        }

        let vmalloc_scale = if wide { Scale::MegaGigaTera } else { Scale::Mega };
        rows.push(range(Region::Vmalloc, l.vmalloc, vmalloc_scale));

        rows.push(range(Region::Lowmem, self.lowmem, Scale::Mega));
        let marker = if wide {
            PAGE_OFFSET_MARKER_64
        } else {
            PAGE_OFFSET_MARKER_32
        };
        rows.extend(marker.map(Row::Line));

        if let Some(highmem) = l.highmem {
            rows.push(range(Region::Highmem, highmem, Scale::Mega));
        }

        if !wide {
            rows.push(range(Region::Modules, l.modules, Scale::Mega));
        }

        rows.push(Row::Line(DOTS));
        rows
    }

    fn write_preamble(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let l = &self.layout;
        writeln!(
            f,
            "PAGE_SIZE = {}, total RAM ~= {} MB ({} bytes)",
            l.page_size,
            SizeUnit::Mega.scale(self.total_ram),
            self.total_ram
        )?;

        if let Some(va_bits) = l.va_bits {
            writeln!(f, "VA_BITS (CONFIG_ARM64_VA_BITS) = {va_bits}")?;
            if va_bits > 48 && l.page_size == SZ_64K {
                writeln!(f, "*** >= ARMv8.2 with LPA? (YMMV, not supported here) ***")?;
            }
        }

        writeln!(
            f,
            "Some Kernel Details [by decreasing address; values are approximate]"
        )?;
        writeln!(f, "{BORDER}")
    }
}

const fn range(region: Region, range: AddressRange, scale: Scale) -> Row {
    Row::Range {
        region,
        range,
        scale,
    }
}

impl fmt::Display for KernelVasReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_preamble(f)?;
        write_rows(f, &self.rows(), self.layout.word_width(), Side::Kernel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::find_row;
    use kernel_info::config::KernelConfig;

    const GIB: u64 = 1024 * 1024 * 1024;

    fn regions(report: &KernelVasReport) -> Vec<Region> {
        report.rows().iter().filter_map(Row::region).collect()
    }

    #[test]
    fn x86_64_region_order() {
        let report = KernelVasReport::new(&KernelLayout::x86_64(KernelConfig::all()), 4 * GIB)
            .expect("report");
        assert_eq!(
            regions(&report),
            [
                Region::Fixmap,
                Region::Modules,
                Region::KasanShadow,
                Region::Vmemmap,
                Region::Vmalloc,
                Region::Lowmem,
            ]
        );
    }

    #[test]
    fn arm32_lists_modules_last() {
        let report = KernelVasReport::new(&KernelLayout::arm(KernelConfig::all()), GIB / 2)
            .expect("report");
        assert_eq!(
            regions(&report),
            [
                Region::VectorTable,
                Region::Fixmap,
                Region::KasanShadow,
                Region::Vmalloc,
                Region::Lowmem,
                Region::Highmem,
                Region::Modules,
            ]
        );
    }

    #[test]
    fn absent_regions_have_no_line() {
        let report = KernelVasReport::new(&KernelLayout::x86_64(KernelConfig::new()), 4 * GIB)
            .expect("report");
        let text = report.to_string();
        assert!(!text.contains("KASAN"));
        assert!(!text.contains("HIGHMEM"));
        assert!(!text.contains("vector table"));
        assert!(!text.contains("VA_BITS"));

        let arm64 = KernelVasReport::new(&KernelLayout::arm64(KernelConfig::new()), 4 * GIB)
            .expect("report")
            .to_string();
        assert!(!arm64.contains("vmemmap"));
        assert!(arm64.contains("VA_BITS (CONFIG_ARM64_VA_BITS) = 48\n"));
        assert!(!arm64.contains("LPA"));
    }

    #[test]
    fn lowmem_spans_total_ram() {
        let layout = KernelLayout::x86_64(KernelConfig::new());
        let report = KernelVasReport::new(&layout, 4 * GIB).expect("report");
        let rows = report.rows();
        let lowmem = find_row(&rows, Region::Lowmem).expect("lowmem row");
        assert_eq!(lowmem.delta(), Some(4 * GIB));
        assert!(report.to_string().contains(
            "|lowmem region:       ffff888000000000 - ffff888100000000     | [     4096 MB]\n\
             |                     ^^^^^^^^^^^^^^^^                        |\n\
             |                        PAGE_OFFSET                          |\n"
        ));
    }

    #[test]
    fn every_range_row_is_ordered() {
        for layout in [
            KernelLayout::x86_64(KernelConfig::all()),
            KernelLayout::x86(KernelConfig::all()),
            KernelLayout::arm(KernelConfig::all()),
            KernelLayout::arm64(KernelConfig::all()),
        ] {
            let report = KernelVasReport::new(&layout, GIB).expect("report");
            for row in report.rows() {
                if let Row::Range { range, .. } = row {
                    assert!(range.low() <= range.high());
                    assert_eq!(range.delta(), range.high().as_u64() - range.low().as_u64());
                }
            }
        }
    }

    #[test]
    fn renders_arm32_table() {
        let report = KernelVasReport::new(&KernelLayout::arm(KernelConfig::new()), GIB / 2)
            .expect("report");
        let expected = "\
PAGE_SIZE = 4096, total RAM ~= 512 MB (536870912 bytes)
Some Kernel Details [by decreasing address; values are approximate]
+-------------------------------------------------------------+
|                         [ . . . ]                           |
|vector table:        ffff0000 - ffff1000                     | [    4 KB]
|                         [ . . . ]                           |
|fixmap region:       ffc80000 - fff00000                     | [    2 MB]
|vmalloc region:      f0000000 - ff800000                     | [  248 MB]
|lowmem region:       c0000000 - e0000000                     | [  512 MB]
|                     ^^^^^^^^                                |
|                    PAGE_OFFSET                              |
|module region:       bf000000 - bfe00000                     | [   14 MB]
|                         [ . . . ]                           |
";
        assert_eq!(report.to_string(), expected);
    }

    #[test]
    fn overflowing_ram_is_an_error() {
        let err = KernelVasReport::new(&KernelLayout::x86_64(KernelConfig::new()), u64::MAX)
            .expect_err("overflow");
        assert!(matches!(err, VasError::AddressOverflow));
    }
}
