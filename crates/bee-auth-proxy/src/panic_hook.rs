//! Process-wide panic logging.
//!
//! Routes every panic through `tracing` so it lands in the same log stream.
//! The runtime keeps running: handler panics become a 500 and panicking
//! background tasks only end themselves.

use std::any::Any;
use std::panic;

/// Replace the default panic hook with one that logs through `tracing`.
pub fn install() {
    panic::set_hook(Box::new(|info| {
        let detail = describe(info.payload());
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        tracing::error!(panic = %detail, %location, "unhandled panic");
    }));
}

fn describe(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic")
}
