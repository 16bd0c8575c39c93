//! # procfs Context
//!
//! Reads the memory-descriptor fields of a live process from procfs.
//!
//! | Source | Fields |
//! |--------|--------|
//! | `/proc/<pid>/stat` | `startcode` (26), `endcode` (27), `startstack` (28), `start_data` (45) … `env_end` (51) |
//! | `/proc/<pid>/maps` | VMA count (one line per VMA), current break (end of `[heap]`) |
//! | `/proc/meminfo` | `MemTotal` |
//!
//! Kernel threads show zeros for every address field. A process the caller
//! may not trace shows `1` for `startcode`/`endcode` and zeros elsewhere, and
//! its `maps` cannot be opened at all.

use crate::context::{ContextAccessor, MmFields, UserSpaceSnapshot};
use crate::VasError;
use log::{debug, trace};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default procfs mount point.
pub const PROC_ROOT: &str = "/proc";

/// Index of `stat` field 3 (`state`), the first field after `(comm)`.
const FIRST_FIELD_AFTER_COMM: usize = 3;

/// Last `stat` field the reporter needs (`env_end`).
const LAST_FIELD: usize = 51;

/// A process observed through procfs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProcfsContext {
    root: PathBuf,
    pid: u32,
}

impl ProcfsContext {
    /// The calling process.
    #[must_use]
    pub fn current() -> Self {
        Self::for_pid(std::process::id())
    }

    #[must_use]
    pub fn for_pid(pid: u32) -> Self {
        Self::with_root(PROC_ROOT, pid)
    }

    /// A process seen through a procfs mounted (or mirrored) at `root`.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>, pid: u32) -> Self {
        Self {
            root: root.into(),
            pid,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn process_file(&self, name: &str) -> PathBuf {
        self.root.join(self.pid.to_string()).join(name)
    }

    /// Reads the raw descriptor fields without validating them.
    ///
    /// # Errors
    /// [`VasError::AddressesHidden`] if `maps` may not be read, otherwise
    /// I/O errors reading `stat` or `maps`, or a malformed `stat` line.
    pub fn mm_fields(&self) -> Result<MmFields, VasError> {
        let stat_path = self.process_file("stat");
        let stat = read(&stat_path)?;
        let mut mm = parse_stat(&stat).map_err(|reason| VasError::Parse {
            path: stat_path,
            reason,
        })?;

        let maps_path = self.process_file("maps");
        let maps_text = match fs::read_to_string(&maps_path) {
            Ok(text) => text,
            Err(source) => return Err(maps_error(self.pid, maps_path, source)),
        };
        let maps = parse_maps(&maps_text).map_err(|reason| VasError::Parse {
            path: maps_path,
            reason,
        })?;

        mm.map_count = maps.count;
        // No [heap] mapping means the break never moved.
        mm.brk = maps.heap_end.unwrap_or(mm.start_brk);

        trace!(
            "pid {}: {} VMAs, heap end {:?}",
            self.pid, maps.count, maps.heap_end
        );
        Ok(mm)
    }
}

impl ContextAccessor for ProcfsContext {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn user_space(&self) -> Result<UserSpaceSnapshot, VasError> {
        let mm = self.mm_fields()?;
        if mm.is_hidden() {
            debug!("pid {}: memory descriptor fields withheld", self.pid);
            return Err(VasError::AddressesHidden { pid: self.pid });
        }

        if mm.is_blank() {
            debug!("pid {}: blank memory descriptor fields", self.pid);
            return Err(if mm.map_count == 0 {
                VasError::NoUserAddressSpace { pid: self.pid }
            } else {
                VasError::AddressesHidden { pid: self.pid }
            });
        }

        Ok(UserSpaceSnapshot::try_from(mm)?)
    }

    fn total_ram(&self) -> Result<u64, VasError> {
        let path = self.root.join("meminfo");
        parse_meminfo(&read(&path)?).map_err(|reason| VasError::Parse { path, reason })
    }
}

fn read(path: &Path) -> Result<String, VasError> {
    fs::read_to_string(path).map_err(|source| VasError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// `maps` is guarded by the same ptrace check as the `stat` address fields.
fn maps_error(pid: u32, path: PathBuf, source: io::Error) -> VasError {
    if source.kind() == io::ErrorKind::PermissionDenied {
        debug!("pid {pid}: {} not readable", path.display());
        VasError::AddressesHidden { pid }
    } else {
        VasError::Io { path, source }
    }
}

/// Extracts the descriptor fields from a `/proc/<pid>/stat` line.
///
/// The command name is wrapped in parentheses and may itself contain spaces
/// and parentheses, so fields are counted from the *last* closing one.
fn parse_stat(line: &str) -> Result<MmFields, &'static str> {
    let close = line.rfind(')').ok_or("missing command name")?;
    let fields: Vec<&str> = line[close + 1..].split_whitespace().collect();
    if fields.len() < LAST_FIELD - FIRST_FIELD_AFTER_COMM + 1 {
        return Err("too few fields");
    }

    let field = |n: usize| -> Result<u64, &'static str> {
        fields[n - FIRST_FIELD_AFTER_COMM]
            .parse()
            .map_err(|_| "non-numeric address field")
    };

    Ok(MmFields {
        start_code: field(26)?,
        end_code: field(27)?,
        start_stack: field(28)?,
        start_data: field(45)?,
        end_data: field(46)?,
        start_brk: field(47)?,
        arg_start: field(48)?,
        arg_end: field(49)?,
        env_start: field(50)?,
        env_end: field(51)?,
        brk: 0,
        map_count: 0,
    })
}

#[derive(Debug, Default, Eq, PartialEq)]
struct MapsSummary {
    count: usize,
    heap_end: Option<u64>,
}

fn parse_maps(text: &str) -> Result<MapsSummary, &'static str> {
    let mut summary = MapsSummary::default();
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        summary.count += 1;
        if line.trim_end().ends_with("[heap]") {
            let range = line.split_whitespace().next().ok_or("empty mapping line")?;
            let (_, end) = range.split_once('-').ok_or("malformed address range")?;
            let end = u64::from_str_radix(end, 16).map_err(|_| "malformed address range")?;
            summary.heap_end = Some(end);
        }
    }
    Ok(summary)
}

fn parse_meminfo(text: &str) -> Result<u64, &'static str> {
    let line = text
        .lines()
        .find(|l| l.starts_with("MemTotal:"))
        .ok_or("missing MemTotal")?;
    let mut parts = line["MemTotal:".len()..].split_whitespace();
    let value: u64 = parts
        .next()
        .ok_or("missing MemTotal value")?
        .parse()
        .map_err(|_| "non-numeric MemTotal")?;

    match parts.next() {
        Some("kB") => value.checked_mul(1024).ok_or("MemTotal overflows"),
        None => Ok(value),
        Some(_) => Err("unknown MemTotal unit"),
    }
}
