//! Panic recovery at fault boundaries
//!
//! [`recover`] runs a closure, turns a panic into one ERROR entry plus an
//! `Err(LoggerError::Panicked)` and never re-raises. The panic location and
//! a backtrace are collected by a panic hook that is installed once and
//! chains to whatever hook was in place before; outside `recover` the
//! previous hook runs unchanged.

use super::caller::CallSite;
use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::logger::Log;
use super::metadata::Metadata;
use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

static HOOK: Once = Once::new();

thread_local! {
    static RECOVER_DEPTH: Cell<usize> = const { Cell::new(0) };
    static LAST_PANIC: RefCell<Option<PanicTrace>> = const { RefCell::new(None) };
}

/// Where a recovered panic happened
#[derive(Debug, Clone)]
struct PanicTrace {
    location: Option<String>,
    backtrace: String,
}

/// Frame names of the std machinery between `panic!` and the hook
const PANIC_ENTRY_FRAMES: [&str; 2] = ["panic_fmt", "begin_panic"];

/// `   7: core::panicking::panic_fmt` rather than `at src/lib.rs:3:5`
fn is_frame_header(line: &str) -> bool {
    let line = line.trim_start();
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && line[digits..].starts_with(':')
}

/// Drop the hook and panic machinery frames so the trace starts at the panicking code
fn caller_frames(backtrace: &str) -> Vec<&str> {
    let lines: Vec<&str> = backtrace
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect();

    let entry = lines.iter().rposition(|line| {
        is_frame_header(line) && PANIC_ENTRY_FRAMES.iter().any(|name| line.contains(name))
    });
    let start = match entry {
        Some(entry) => lines[entry + 1..]
            .iter()
            .position(|line| is_frame_header(line))
            .map_or(lines.len(), |offset| entry + 1 + offset),
        None => 0,
    };
    lines[start..].to_vec()
}

impl PanicTrace {
    fn into_metadata(self) -> Metadata {
        let frames = caller_frames(&self.backtrace);

        let mut dump = String::new();
        if let Some(ref location) = self.location {
            dump.push_str(&format!("\npanicked at {}", location));
        }
        for frame in &frames {
            dump.push('\n');
            dump.push_str(frame);
        }

        Metadata::Opaque {
            structured: serde_json::json!({
                "location": self.location,
                "trace": frames,
            }),
            dump,
        }
    }
}

fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if RECOVER_DEPTH.with(Cell::get) == 0 {
                previous(info);
                return;
            }
            let trace = PanicTrace {
                location: info
                    .location()
                    .map(|loc| format!("{}:{}", loc.file(), loc.line())),
                backtrace: Backtrace::force_capture().to_string(),
            };
            LAST_PANIC.with(|slot| *slot.borrow_mut() = Some(trace));
        }));
    });
}

/// Text of a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(e) = payload.downcast_ref::<LoggerError>() {
        e.to_string()
    } else if let Some(e) = payload.downcast_ref::<Box<dyn std::error::Error + Send + Sync>>() {
        e.to_string()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Run `f`, converting a panic into a logged ERROR entry and an error value.
///
/// The entry reads `"<label> panic: <message>"` and carries the panic
/// location and backtrace as metadata. Its caller is the call site of
/// `recover` itself.
///
/// # Example
///
/// ```
/// use tagged_logger::prelude::*;
///
/// let memory = MemoryAppender::new();
/// let logger = Logger::builder().appender(memory.clone()).build();
///
/// let result: Result<u32> = recover(&logger, "worker", || panic!("bad input"));
///
/// assert_eq!(result.unwrap_err().to_string(), "worker panic: bad input");
/// assert!(memory.lines()[0].contains("[ERROR]"));
/// ```
#[track_caller]
pub fn recover<L, F, T>(logger: &L, label: &str, f: F) -> Result<T>
where
    L: Log + ?Sized,
    F: FnOnce() -> T,
{
    let caller = CallSite::caller();
    install_hook();

    // A re-raised payload skips the hook; never report an older trace for it
    LAST_PANIC.with(|slot| slot.borrow_mut().take());
    RECOVER_DEPTH.with(|depth| depth.set(depth.get() + 1));
    let outcome = panic::catch_unwind(AssertUnwindSafe(f));
    RECOVER_DEPTH.with(|depth| depth.set(depth.get() - 1));

    match outcome {
        Ok(value) => Ok(value),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            let trace = LAST_PANIC.with(|slot| slot.borrow_mut().take());
            let error = LoggerError::panicked(label, message);

            logger.dispatch(
                LogLevel::Error,
                &error.to_string(),
                trace.map(PanicTrace::into_metadata),
                caller,
            );
            Err(error)
        }
    }
}
