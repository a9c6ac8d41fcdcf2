use std::{
    fs::File,
    io::{LineWriter, Write as _},
    path::Path,
    sync::Mutex,
};

use anyhow::Context as _;
use log::{LevelFilter, Log, Metadata, Record};

/// Log backend that appends one line per record to a file.
///
/// The terminal is owned by the UI while playing, so engine logs go to a file
/// instead of stderr.
#[derive(Debug)]
struct FileLogger {
    level: LevelFilter,
    writer: Mutex<LineWriter<File>>,
}

impl FileLogger {
    fn create(path: &Path, level: LevelFilter) -> anyhow::Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;
        Ok(Self {
            level,
            writer: Mutex::new(LineWriter::new(file)),
        })
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        _ = writeln!(
            writer,
            "[{:<5} {}] {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        if let Ok(mut writer) = self.writer.lock() {
            _ = writer.flush();
        }
    }
}

/// Installs a file logger as the global `log` backend.
pub fn init_file_logger(path: &Path, level: LevelFilter) -> anyhow::Result<()> {
    let logger = FileLogger::create(path, level)?;
    log::set_boxed_logger(Box::new(logger)).context("Failed to install logger")?;
    log::set_max_level(level);
    Ok(())
}
