//! Fatal error reporting.
//!
//! Used for conditions with no recovery path: invalid construction
//! parameters, NULL handles at the C boundary and the `Fatal`/`Error`
//! overflow contract. Reports on stderr, then aborts the process.

use std::fmt;

/// Abort the process with a formatted diagnostic.
///
/// Debug builds include the calling module, file and line.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => {
        $crate::Core::fatal::abort(format_args!($($arg)*), module_path!(), file!(), line!())
    };
}

#[cold]
#[inline(never)]
pub fn abort(message: fmt::Arguments<'_>, function: &str, file: &str, line: u32) -> ! {
    if cfg!(debug_assertions) {
        eprintln!("Fatal error in {function} ({file}:{line}): {message}");
    } else {
        eprintln!("Fatal error in {function}: {message}");
    }
    crate::trace::error!(%message, function, "fatal error");
    std::process::abort()
}
