//! # Load and Unload
//!
//! The reporter behaves like a loadable module: [`KernelVas::load`] prints
//! everything once, [`KernelVas::unload`] only announces the removal. Neither
//! keeps state, so both can be called any number of times.

use crate::HOST_LAYOUT;
use crate::context::ContextAccessor;
use crate::report::{BORDER, KernelVasReport, UserVasReport};
use crate::sysinfo::SystemInfoReport;
use crate::VasError;
use kernel_info::memory::KernelLayout;
use kernel_info::platform::PlatformInfo;
use kernel_memory_addresses::WordWidth;
use log::{Level, debug};

/// Log target every record is emitted under.
pub const MODULE_NAME: &str = "kernel_vas";

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Options {
    /// Print the user address space a second time at the end of the report.
    pub show_uservas: bool,
}

/// Receives the multi-line records a load or unload produces.
pub trait RecordSink {
    fn emit(&mut self, level: Level, record: &str);
}

/// Forwards records to the [`log`] facade under [`MODULE_NAME`].
#[derive(Copy, Clone, Debug, Default)]
pub struct LogSink;

impl RecordSink for LogSink {
    fn emit(&mut self, level: Level, record: &str) {
        log::log!(target: MODULE_NAME, level, "{record}");
    }
}

/// Collects records in memory.
impl RecordSink for Vec<(Level, String)> {
    fn emit(&mut self, level: Level, record: &str) {
        self.push((level, record.to_owned()));
    }
}

/// The address-space reporter bound to one execution context.
pub struct KernelVas<C> {
    context: C,
    layout: Option<KernelLayout>,
    platform: PlatformInfo,
    options: Options,
}

impl<C: ContextAccessor> KernelVas<C> {
    /// A reporter for `context` using the layout of the compile target.
    #[must_use]
    pub fn new(context: C, options: Options) -> Self {
        Self {
            context,
            layout: HOST_LAYOUT,
            platform: PlatformInfo::HOST,
            options,
        }
    }

    /// Replaces the kernel layout. The platform facts follow the layout.
    #[must_use]
    pub fn with_layout(mut self, layout: Option<KernelLayout>) -> Self {
        if let Some(layout) = &layout {
            self.platform = layout.platform;
        }
        self.layout = layout;
        self
    }

    #[must_use]
    pub const fn layout(&self) -> Option<&KernelLayout> {
        self.layout.as_ref()
    }

    #[must_use]
    pub const fn options(&self) -> Options {
        self.options
    }

    #[must_use]
    pub const fn platform_report(&self) -> SystemInfoReport {
        SystemInfoReport::new(self.platform)
    }

    /// # Errors
    /// Whatever the context accessor fails with; see
    /// [`VasError::is_missing_user_space`].
    pub fn user_report(&self) -> Result<UserVasReport, VasError> {
        let snapshot = self.context.user_space()?;
        let width = self
            .layout
            .as_ref()
            .map_or(WordWidth::HOST, KernelLayout::word_width);
        Ok(UserVasReport::new(
            snapshot,
            width,
            self.layout.map(|layout| layout.task_size),
        ))
    }

    /// The kernel report, or `None` if there is no layout for this platform.
    ///
    /// # Errors
    /// Failing to determine the total RAM, or a direct map that overflows
    /// the address width.
    pub fn kernel_report(&self) -> Result<Option<KernelVasReport>, VasError> {
        let Some(layout) = &self.layout else {
            return Ok(None);
        };
        let total_ram = self.context.total_ram()?;
        KernelVasReport::new(layout, total_ram).map(Some)
    }

    /// Emits the full report.
    ///
    /// A context without a (visible) user address space skips the user part
    /// with a warning; the kernel part is reported regardless.
    ///
    /// # Errors
    /// Any other failure reading the context.
    pub fn load(&self, sink: &mut impl RecordSink) -> Result<(), VasError> {
        sink.emit(Level::Info, &format!("{MODULE_NAME} is INSERTED"));
        sink.emit(Level::Info, &self.platform_report().to_string());

        let user = match self.user_report() {
            Ok(report) => {
                sink.emit(Level::Info, &report.to_string());
                Some(report)
            }
            Err(err) if err.is_missing_user_space() => {
                sink.emit(Level::Warn, &format!("{err}; not showing user VAS"));
                None
            }
            Err(err) => return Err(err),
        };

        match self.kernel_report()? {
            Some(report) => sink.emit(Level::Info, &report.to_string()),
            None => sink.emit(
                Level::Warn,
                &format!(
                    "no kernel layout known for {}; not showing kernel VAS",
                    self.platform.arch_tag()
                ),
            ),
        }

        if self.options.show_uservas {
            if let Some(report) = &user {
                sink.emit(Level::Info, &report.to_string());
            }
        } else {
            sink.emit(Level::Info, &format!("{BORDER}\nskipping show userspace..."));
        }

        debug!(target: MODULE_NAME, "report for pid {} done", self.context.pid());
        Ok(())
    }

    pub fn unload(&self, sink: &mut impl RecordSink) {
        debug!(target: MODULE_NAME, "unloading reporter for pid {}", self.context.pid());
        sink.emit(Level::Info, &format!("{MODULE_NAME} is REMOVED"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{FixedContext, MmFields};
    use crate::report::{Row, USER_KERNEL_SPLIT};
    use kernel_info::config::KernelConfig;

    const RAM: u64 = 2 * 1024 * 1024 * 1024;

    fn mm() -> MmFields {
        MmFields {
            env_start: 0x1000,
            env_end: 0x1040,
            arg_start: 0x2000,
            arg_end: 0x2010,
            start_stack: 0x7fff_0000,
            start_brk: 0x5000,
            brk: 0x6000,
            start_data: 0x3000,
            end_data: 0x3100,
            start_code: 0x4000,
            end_code: 0x4500,
            map_count: 12,
        }
    }

    fn reporter(ctx: FixedContext, show_uservas: bool) -> KernelVas<FixedContext> {
        KernelVas::new(ctx, Options { show_uservas })
            .with_layout(Some(KernelLayout::x86_64(KernelConfig::new())))
    }

    fn load(vas: &KernelVas<FixedContext>) -> Vec<(Level, String)> {
        let mut records: Vec<(Level, String)> = Vec::new();
        vas.load(&mut records).expect("load");
        records
    }

    fn count_starting_with(records: &[(Level, String)], prefix: &str) -> usize {
        records.iter().filter(|(_, r)| r.starts_with(prefix)).count()
    }

    #[test]
    fn load_emits_records_in_order() {
        let records = load(&reporter(FixedContext::new(100, mm(), RAM), false));
        assert_eq!(records.len(), 5);
        assert_eq!(records[0], (Level::Info, "kernel_vas is INSERTED".to_owned()));
        assert!(records[1].1.starts_with("minimal platform info:\nCPU: x86_64"));
        assert!(records[2].1.starts_with(USER_KERNEL_SPLIT));
        assert!(records[3].1.starts_with("PAGE_SIZE = 4096"));
        assert_eq!(records[4].1, format!("{BORDER}\nskipping show userspace..."));
        assert!(records.iter().all(|(level, _)| *level == Level::Info));
    }

    #[test]
    fn synthetic_snapshot_deltas() {
        let records = load(&reporter(FixedContext::new(100, mm(), RAM), false));
        let user = &records[2].1;
        assert!(user.contains("0000000000001000 - 0000000000001040     | [   64 bytes]"));
        assert!(user.contains("0000000000002000 - 0000000000002010     | [   16 bytes]"));
        assert!(user.contains("|        stack start  000000007fff0000"));
        assert!(user.contains("0000000000005000 - 0000000000006000     | [         4 KB]"));
        assert!(user.contains("0000000000003000 - 0000000000003100     | [  256 bytes]"));
        assert!(user.contains("0000000000004000 - 0000000000004500     | [         1 KB]"));
        assert!(user.ends_with(" # userspace memory regions (VMAs) = 12"));

        let report = reporter(FixedContext::new(100, mm(), RAM), false)
            .user_report()
            .expect("user report");
        let deltas: Vec<u64> = report.rows().iter().filter_map(Row::delta).collect();
        assert_eq!(deltas, [64, 16, 4096, 256, 1280]);
    }

    #[test]
    fn load_is_idempotent() {
        let vas = reporter(FixedContext::new(100, mm(), RAM), true);
        assert_eq!(load(&vas), load(&vas));
    }

    #[test]
    fn show_uservas_repeats_only_the_user_report() {
        let off = load(&reporter(FixedContext::new(100, mm(), RAM), false));
        let on = load(&reporter(FixedContext::new(100, mm(), RAM), true));

        assert_eq!(count_starting_with(&off, USER_KERNEL_SPLIT), 1);
        assert_eq!(count_starting_with(&on, USER_KERNEL_SPLIT), 2);
        assert_eq!(on[2], on[4]);

        let kernel = |records: &[(Level, String)]| {
            records
                .iter()
                .filter(|(_, r)| r.starts_with("PAGE_SIZE"))
                .cloned()
                .collect::<Vec<_>>()
        };
        assert_eq!(kernel(&off), kernel(&on));
        assert_eq!(kernel(&on).len(), 1);
        assert_eq!(count_starting_with(&on, BORDER), 0);
    }

    #[test]
    fn kernel_thread_skips_user_part() {
        let records = load(&reporter(FixedContext::kernel_thread(2, RAM), true));
        assert_eq!(count_starting_with(&records, USER_KERNEL_SPLIT), 0);
        assert_eq!(count_starting_with(&records, "PAGE_SIZE"), 1);

        let warnings: Vec<_> = records
            .iter()
            .filter(|(level, _)| *level == Level::Warn)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].1.contains("no user address space"));
    }

    #[test]
    fn missing_layout_skips_kernel_part() {
        let vas = KernelVas::new(FixedContext::new(100, mm(), RAM), Options::default())
            .with_layout(None);
        let records = load(&vas);
        assert_eq!(count_starting_with(&records, USER_KERNEL_SPLIT), 1);
        assert_eq!(count_starting_with(&records, "PAGE_SIZE"), 0);
        assert!(
            records
                .iter()
                .any(|(level, r)| *level == Level::Warn && r.contains("no kernel layout"))
        );
    }

    #[test]
    fn unreadable_ram_fails_load() {
        struct NoRam;

        impl ContextAccessor for NoRam {
            fn pid(&self) -> u32 {
                1
            }

            fn user_space(&self) -> Result<crate::UserSpaceSnapshot, VasError> {
                Err(VasError::NoUserAddressSpace { pid: 1 })
            }

            fn total_ram(&self) -> Result<u64, VasError> {
                Err(VasError::AddressOverflow)
            }
        }

        let vas = KernelVas::new(NoRam, Options::default())
            .with_layout(Some(KernelLayout::arm64(KernelConfig::new())));
        let mut records: Vec<(Level, String)> = Vec::new();
        assert!(matches!(vas.load(&mut records), Err(VasError::AddressOverflow)));
    }

    #[test]
    fn unload_announces_removal() {
        let vas = reporter(FixedContext::kernel_thread(2, RAM), false);
        let mut records: Vec<(Level, String)> = Vec::new();
        vas.unload(&mut records);
        assert_eq!(records, [(Level::Info, "kernel_vas is REMOVED".to_owned())]);
    }
}
