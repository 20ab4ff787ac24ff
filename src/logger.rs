use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub const DEFAULT_LOG_FILE: &str = "flashcards.log";

lazy_static::lazy_static! {
    static ref LOG_FILE: Mutex<Option<File>> = Mutex::new(None);
}

/// Appends log records to a file, since the terminal belongs to the TUI.
struct FileLogger;

static LOGGER: FileLogger = FileLogger;

static WRITE_FAILED: AtomicBool = AtomicBool::new(false);

/// Reports the first failed write to stderr; later failures stay quiet.
/// Returns whether this call printed.
fn report_write_error(err: &std::io::Error) -> bool {
    if WRITE_FAILED.swap(true, Ordering::Relaxed) {
        return false;
    }
    eprintln!("flashcards: could not write to log file: {}", err);
    true
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut guard) = LOG_FILE.lock()
            && let Some(file) = guard.as_mut()
        {
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
            if let Err(err) = writeln!(
                file,
                "[{}] {:<5} {}: {}",
                timestamp,
                record.level(),
                record.target(),
                record.args()
            ) {
                report_write_error(&err);
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut guard) = LOG_FILE.lock()
            && let Some(file) = guard.as_mut()
            && let Err(err) = file.flush()
        {
            report_write_error(&err);
        }
    }
}

/// Opens (or reopens) the log file and installs the logger on first call.
pub fn init(path: &Path, level: LevelFilter) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    if let Ok(mut guard) = LOG_FILE.lock() {
        *guard = Some(file);
    }
    // Already installed on a repeat call; the file swap above is enough.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
    Ok(())
}
