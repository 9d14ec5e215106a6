// src/log.rs
//
// Append-only run log under `.store/`. One line per event:
// `[hh:mm:ss.mmm][LEVEL] message`, wall-clock UTC.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::Utc;

use crate::config::consts::{LOG_FILE, STORE_DIR};

static SINK: Mutex<()> = Mutex::new(());
static ECHO_WARNINGS: AtomicBool = AtomicBool::new(false);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        })
    }
}

/// Also print warnings to stderr. The CLI turns this on.
pub fn set_echo(on: bool) {
    ECHO_WARNINGS.store(on, Ordering::Relaxed);
}

fn format_line(level: Level, msg: &str) -> String {
    format!("[{}][{level}] {msg}\n", Utc::now().format("%H:%M:%S%.3f"))
}

/// Backend of the `log*!` macros. Failing to log never fails the caller.
pub fn write_log(level: Level, msg: &str) {
    let line = format_line(level, msg);

    if level == Level::Warn && ECHO_WARNINGS.load(Ordering::Relaxed) {
        eprint!("{line}");
    }

    let Ok(_guard) = SINK.lock() else { return };
    let _ = fs::create_dir_all(STORE_DIR);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(Path::new(STORE_DIR).join(LOG_FILE));
    if let Ok(mut file) = file {
        let _ = file.write_all(line.as_bytes());
    }
}

#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => { $crate::log::write_log($crate::log::Level::Info, &format!($($arg)*)) };
}

#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => { $crate::log::write_log($crate::log::Level::Debug, &format!($($arg)*)) };
}

/// Data-quality problems land here.
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => { $crate::log::write_log($crate::log::Level::Warn, &format!($($arg)*)) };
}

#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => { $crate::log::write_log($crate::log::Level::Error, &format!($($arg)*)) };
}
