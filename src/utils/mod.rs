//! Generic utility primitives with zero domain knowledge.
//!
//! - `shell` - Shell quoting for interpolated command values

pub mod shell;
