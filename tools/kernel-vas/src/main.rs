//! `kernel-vas` prints the virtual address space layout of a process next to
//! the kernel's virtual memory regions, then announces its own removal, like
//! a module being inserted and removed again.
//!
//! ```text
//! $ kernel-vas --show-uservas
//! [INFO] kernel_vas: kernel_vas is INSERTED
//! [INFO] kernel_vas: minimal platform info:
//! [INFO] kernel_vas: CPU: x86_64, little-endian; 64-bit OS.
//! ...
//! ```

use clap::Parser;
use kernel_log::KlogLogger;
use kernel_vas::{KernelVas, LogSink, Options, PROC_ROOT, ProcfsContext};
use log::{LevelFilter, debug};
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Print the user address space a second time after the kernel regions.
    #[arg(long, env = "KERNEL_VAS_SHOW_USERVAS")]
    show_uservas: bool,

    /// Process to inspect. Defaults to this process.
    #[arg(long)]
    pid: Option<u32>,

    /// Where procfs is mounted.
    #[arg(long, default_value = PROC_ROOT)]
    proc_root: PathBuf,

    /// Most verbose level to print.
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

impl Args {
    fn context(&self) -> ProcfsContext {
        let pid = self.pid.unwrap_or_else(std::process::id);
        ProcfsContext::with_root(&self.proc_root, pid)
    }

    const fn options(&self) -> Options {
        Options {
            show_uservas: self.show_uservas,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    KlogLogger::new(args.log_level).init()?;
    debug!("{args:?}");

    let vas = KernelVas::new(args.context(), args.options());
    let mut sink = LogSink;
    vas.load(&mut sink)?;
    vas.unload(&mut sink);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use kernel_vas::ContextAccessor;

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["kernel-vas"]).expect("parse");
        assert_eq!(args.pid, None);
        assert_eq!(args.proc_root, PathBuf::from("/proc"));
        assert_eq!(args.log_level, LevelFilter::Info);
        assert_eq!(args.context().pid(), std::process::id());
    }

    #[test]
    fn explicit_options() {
        let args = Args::try_parse_from([
            "kernel-vas",
            "--show-uservas",
            "--pid",
            "42",
            "--proc-root",
            "/mnt/proc",
            "--log-level",
            "debug",
        ])
        .expect("parse");
        assert!(args.options().show_uservas);
        assert_eq!(args.log_level, LevelFilter::Debug);

        let ctx = args.context();
        assert_eq!(ctx.pid(), 42);
        assert_eq!(ctx.root(), PathBuf::from("/mnt/proc"));
    }
}
