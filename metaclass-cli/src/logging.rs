use chrono::{DateTime, Local};
use log::{LevelFilter, Metadata, Record, SetLoggerError};

use crate::PROGRESS_BAR;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Logger printing to the standard error, above the progress bar if it is
/// visible.
struct Logger;

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let msg = format_record(Local::now(), record);
        if PROGRESS_BAR.is_hidden() {
            eprintln!("{}", msg);
        } else {
            PROGRESS_BAR.println(msg);
        }
    }

    fn flush(&self) {}
}

fn format_record(time: DateTime<Local>, record: &Record) -> String {
    format!(
        "{} [{:<5}] [{}] {}",
        time.format(TIMESTAMP_FORMAT),
        record.level(),
        record.target(),
        record.args()
    )
}

static LOGGER: Logger = Logger;

pub fn init_logging(filter: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(filter);

    Ok(())
}
