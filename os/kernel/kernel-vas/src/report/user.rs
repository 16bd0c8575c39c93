use super::{BORDER, DOTS, Region, Row, Scale, Side, USER_KERNEL_SPLIT, write_rows};
use crate::context::UserSpaceSnapshot;
use core::fmt;
use kernel_memory_addresses::{SizeUnit, WordWidth};

/// The user half of the address-space report.
///
/// ```text
/// +------- Above this line: kernel VAS; below: user VAS --------+
/// |                         [ . . . ]                           |
/// |Process environment  00007ffd0b9f4f1d - 00007ffd0b9f4fe6     | [  201 bytes]
/// ...
/// Kernel, User VAS (TASK_SIZE) size each =  140737488351232 bytes  [  131071 GB]
///  # userspace memory regions (VMAs) = 23
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct UserVasReport {
    snapshot: UserSpaceSnapshot,
    width: WordWidth,
    task_size: Option<u64>,
}

impl UserVasReport {
    /// `task_size` is omitted from the summary when unknown.
    #[must_use]
    pub const fn new(snapshot: UserSpaceSnapshot, width: WordWidth, task_size: Option<u64>) -> Self {
        Self {
            snapshot,
            width,
            task_size,
        }
    }

    #[must_use]
    pub const fn snapshot(&self) -> &UserSpaceSnapshot {
        &self.snapshot
    }

    /// Table rows, top to bottom.
    #[must_use]
    pub fn rows(&self) -> Vec<Row> {
        let s = &self.snapshot;
        vec![
            Row::Line(DOTS),
            Row::Range {
                region: Region::Environment,
                range: s.environment,
                scale: Scale::Bytes,
            },
            Row::Range {
                region: Region::Arguments,
                range: s.arguments,
                scale: Scale::Bytes,
            },
            Row::Start {
                region: Region::StackStart,
                addr: s.stack_start,
            },
            Row::Range {
                region: Region::Heap,
                range: s.heap,
                scale: Scale::Kilo,
            },
            Row::Range {
                region: Region::StaticData,
                range: s.data,
                scale: Scale::Bytes,
            },
            Row::Range {
                region: Region::Text,
                range: s.text,
                scale: Scale::Kilo,
            },
            Row::Line(DOTS),
            Row::Line(BORDER),
        ]
    }

    fn write_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(task_size) = self.task_size {
            match self.width {
                WordWidth::Bits64 => writeln!(
                    f,
                    "Kernel, User VAS (TASK_SIZE) size each = {task_size:15} bytes  [  {} GB]",
                    SizeUnit::Giga.scale(task_size)
                )?,
                WordWidth::Bits32 => writeln!(
                    f,
                    "Size of User VAS size (TASK_SIZE) = {task_size:10} bytes            [  {} MB]",
                    SizeUnit::Mega.scale(task_size)
                )?,
            }
        }
        write!(
            f,
            " # userspace memory regions (VMAs) = {}",
            self.snapshot.map_count
        )
    }
}

impl fmt::Display for UserVasReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{USER_KERNEL_SPLIT}")?;
        write_rows(f, &self.rows(), self.width, Side::User)?;
        self.write_summary(f)
    }
}
