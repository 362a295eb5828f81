// src/codec/common.rs
//
// Shared helpers for the codec modules.

use crate::error::PixmapError;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::error;

/// Run a codec call, converting a panic inside third-party decoders or
/// encoders into `PixmapError::InternalPanic`.
///
/// mozjpeg reports libjpeg errors by unwinding, so every call into it must
/// go through here.
pub fn run_with_panic_policy<T>(
    name: &'static str,
    f: impl FnOnce() -> Result<T, PixmapError>,
) -> Result<T, PixmapError> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(target: "pixmap::codec", stage = name, %message, "codec panicked");
            Err(PixmapError::internal_panic(format!("{name}: {message}")))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
