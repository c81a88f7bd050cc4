// Public modules
pub mod defaults;
pub mod dirdiff;
pub mod error;
pub mod executor;
pub mod process;
pub mod release;

// Internal modules - not part of public API
pub(crate) mod paths;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use executor::{Job, JobPlan, JobRun, JobStatus, OutputMode, StepRecord, StepRunner};
