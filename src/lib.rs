/// Macro for prefixed status logging to stderr (only when stderr is a terminal).
///
/// Usage:
/// ```ignore
/// log_status!("api-build", "step {}/{}: {}", 3, 11, "dev tag");
/// log_status!("diff", "Comparing {} and {}", left, right);
/// ```
#[macro_export]
macro_rules! log_status {
    ($prefix:expr, $($arg:tt)*) => {
        if ::std::io::IsTerminal::is_terminal(&::std::io::stderr()) {
            eprintln!("[{}] {}", $prefix, format_args!($($arg)*));
        }
    };
}

pub mod core;
pub mod utils;

// Re-export everything from core for ergonomic library use
// Users can write `releaser::executor` instead of `releaser::core::executor`
pub use core::*;
pub use utils::*;
