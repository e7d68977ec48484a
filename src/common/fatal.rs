//! Fatal-error boundary.
//!
//! Binary decoders in this crate index their input directly and treat a
//! malformed payload as a bug-class failure (a panic). Callers never see the
//! panic: [`catch`] runs the decoder under [`std::panic::catch_unwind`] and
//! hands back an ordinary [`XlsxError::Decoding`] carrying the original
//! message.
//!
//! [`install_hook`] routes the panic message and location to `log::error!` at
//! the moment of the panic, which is where a host without a stderr (e.g. an
//! embedding runtime) gets its diagnostic. That is the only error record a
//! caught panic produces.

use crate::ooxml::error::{Result, XlsxError};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe, PanicHookInfo};
use std::sync::Once;

static HOOK: Once = Once::new();

/// Install a panic hook that forwards panic details to `log::error!`.
///
/// Safe to call many times; only the first call installs the hook. The
/// previously installed hook still runs afterwards.
pub fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            log::error!("{}", describe(info));
            previous(info);
        }));
    });
}

fn describe(info: &PanicHookInfo<'_>) -> String {
    let message = payload_message(info.payload());
    match info.location() {
        Some(location) => format!(
            "panicked at {}:{}:{}: {}",
            location.file(),
            location.line(),
            location.column(),
            message
        ),
        None => format!("panicked: {}", message),
    }
}

/// Extract the human-readable message from a panic payload.
pub(crate) fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic>".to_string()
    }
}

/// Run `f`, converting a panic into [`XlsxError::Decoding`].
///
/// `context` names the operation in the error message. The panic hook is
/// installed first, so the detail is logged once, at error level.
pub fn catch<T, F>(context: &str, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    install_hook();
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload_message(payload.as_ref());
            log::debug!("{} failed: {}", context, message);
            Err(XlsxError::Decoding(format!("{}: {}", context, message)))
        },
    }
}
