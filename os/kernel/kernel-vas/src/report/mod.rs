//! # Report Rows and Table Rendering
//!
//! Reports are built in two steps: first a list of [`Row`]s that carries the
//! exact values (ranges and their byte deltas), then a fixed-width text
//! rendering of those rows. Tests check the rows; humans read the text.
//!
//! Every table line is 63 columns wide on both word widths; 32-bit
//! addresses are shorter, so their lines carry more padding.

mod kernel;
mod user;

pub use kernel::KernelVasReport;
pub use user::UserVasReport;

use core::fmt;
use kernel_memory_addresses::{AddressRange, SizeUnit, VirtualAddress, WordWidth};

pub const BORDER: &str = "+-------------------------------------------------------------+";
pub const DOTS: &str = "|                         [ . . . ]                           |";
pub const USER_KERNEL_SPLIT: &str =
    "+------- Above this line: kernel VAS; below: user VAS --------+";

/// A named region of the address space. The label doubles as the table's
/// first column.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Region {
    Environment,
    Arguments,
    StackStart,
    Heap,
    StaticData,
    Text,
    VectorTable,
    Fixmap,
    Modules,
    KasanShadow,
    Vmemmap,
    Vmalloc,
    Lowmem,
    Highmem,
}

impl Region {
    /// First table column, 21 characters including the leading `|`.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Environment => "|Process environment ",
            Self::Arguments => "|          arguments ",
            Self::StackStart => "|        stack start ",
            Self::Heap => "|       heap segment ",
            Self::StaticData => "|static data segment ",
            Self::Text => "|       text segment ",
            Self::VectorTable => "|vector table:       ",
            Self::Fixmap => "|fixmap region:      ",
            Self::Modules => "|module region:      ",
            Self::KasanShadow => "|KASAN shadow:       ",
            Self::Vmemmap => "|vmemmap region:     ",
            Self::Vmalloc => "|vmalloc region:     ",
            Self::Lowmem => "|lowmem region:      ",
            Self::Highmem => "|HIGHMEM region:     ",
        }
    }

    /// First column of a start-only row.
    const fn start_column(self) -> &'static str {
        match self {
            Self::Vmemmap => "|vmemmap region start",
            other => other.column(),
        }
    }
}

/// Which units a range's size is annotated with.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Scale {
    Bytes,
    Kilo,
    Mega,
    MegaGiga,
    /// Drops the terabyte column on 32-bit layouts.
    MegaGigaTera,
}

/// User rows use wider size columns than kernel rows.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Side {
    User,
    Kernel,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Row {
    /// A fixed line of text (borders, dots, markers).
    Line(&'static str),
    Range {
        region: Region,
        range: AddressRange,
        scale: Scale,
    },
    /// A region of which only the start address is known.
    Start {
        region: Region,
        addr: VirtualAddress,
    },
}

impl Row {
    /// Exact size in bytes of a range row.
    #[must_use]
    pub const fn delta(&self) -> Option<u64> {
        match self {
            Self::Range { range, .. } => Some(range.delta()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn region(&self) -> Option<Region> {
        match self {
            Self::Range { region, .. } | Self::Start { region, .. } => Some(*region),
            Self::Line(_) => None,
        }
    }
}

/// Finds the first row describing `region`.
#[must_use]
pub fn find_row(rows: &[Row], region: Region) -> Option<&Row> {
    rows.iter().find(|row| row.region() == Some(region))
}

const fn range_padding(width: WordWidth) -> &'static str {
    match width {
        WordWidth::Bits64 => "     ",
        WordWidth::Bits32 => "                     ",
    }
}

const fn start_padding(width: WordWidth) -> &'static str {
    match width {
        WordWidth::Bits64 => "                        ",
        WordWidth::Bits32 => "                                ",
    }
}

fn write_size(
    f: &mut fmt::Formatter<'_>,
    range: AddressRange,
    scale: Scale,
    width: WordWidth,
    side: Side,
) -> fmt::Result {
    let mb = range.scaled(SizeUnit::Mega);
    let gb = range.scaled(SizeUnit::Giga);
    match (scale, side) {
        (Scale::Bytes, _) => write!(f, "[ {:4} bytes]", range.delta()),
        (Scale::Kilo, Side::User) => write!(f, "[ {:9} KB]", range.scaled(SizeUnit::Kilo)),
        (Scale::Kilo, Side::Kernel) => write!(f, "[{:5} KB]", range.scaled(SizeUnit::Kilo)),
        (Scale::Mega, _) if width.is_64bit() => write!(f, "[{mb:9} MB]"),
        (Scale::Mega, _) => write!(f, "[{mb:5} MB]"),
        (Scale::MegaGigaTera, _) if width.is_64bit() => write!(
            f,
            "[{mb:9} MB = {gb:6} GB ~= {:3} TB]",
            range.scaled(SizeUnit::Tera)
        ),
        (Scale::MegaGiga | Scale::MegaGigaTera, _) => write!(f, "[{mb:9} MB = {gb:6} GB]"),
    }
}

/// Renders `rows`, one line each, every line terminated by a newline.
pub(crate) fn write_rows(
    f: &mut fmt::Formatter<'_>,
    rows: &[Row],
    width: WordWidth,
    side: Side,
) -> fmt::Result {
    for row in rows {
        match *row {
            Row::Line(text) => f.write_str(text)?,
            Row::Range {
                region,
                range,
                scale,
            } => {
                write!(
                    f,
                    "{} {} - {}{}| ",
                    region.column(),
                    range.low().display(width),
                    range.high().display(width),
                    range_padding(width)
                )?;
                write_size(f, range, scale, width, side)?;
            }
            Row::Start { region, addr } => write!(
                f,
                "{} {}{}|",
                region.start_column(),
                addr.display(width),
                start_padding(width)
            )?,
        }
        f.write_str("\n")?;
    }
    Ok(())
}
