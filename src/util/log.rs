use std::sync::atomic::{AtomicUsize, Ordering};

// ログレベル (値が小さいほど重要)
pub const ERROR: usize = 0;
pub const WARN: usize = 1;
pub const INFO: usize = 2;
pub const DEBUG: usize = 3;

static LEVEL: AtomicUsize = AtomicUsize::new(INFO);

pub fn set_level(level: usize) {
    LEVEL.store(level, Ordering::Relaxed);
}

#[inline]
pub fn enabled(level: usize) -> bool {
    level <= LEVEL.load(Ordering::Relaxed)
}

pub fn level_from_str(s: &str) -> Result<usize, String> {
    Ok(match s {
        "error" => ERROR,
        "warn" => WARN,
        "info" => INFO,
        "debug" => DEBUG,
        _ => return Err(format!("invalid log level: {}", s)),
    })
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        if $crate::util::log::enabled($crate::util::log::ERROR) {
            eprintln!(
                "[ERROR]({}:{}) {}",
                file!(),
                line!(),
                format_args!($($arg)*)
            )
        }
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        if $crate::util::log::enabled($crate::util::log::WARN) {
            eprintln!(
                "[WARN]({}:{}) {}",
                file!(),
                line!(),
                format_args!($($arg)*)
            )
        }
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        if $crate::util::log::enabled($crate::util::log::INFO) {
            eprintln!(
                "[INFO]({}:{}) {}",
                file!(),
                line!(),
                format_args!($($arg)*)
            )
        }
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        if $crate::util::log::enabled($crate::util::log::DEBUG) {
            eprintln!(
                "[DEBUG]({}:{}) {}",
                file!(),
                line!(),
                format_args!($($arg)*)
            )
        }
    };
}

#[test]
fn test_log_level() {
    assert_eq!(level_from_str("warn"), Ok(WARN));
    assert!(level_from_str("trace").is_err());
    assert!(enabled(ERROR));
}
