pub mod copy;
pub mod staging;

pub use copy::{BATCH_SIZE, CopyStrategy, copy_file};
pub use staging::{
    DeleteOutcome, EnsureOutcome, FileDetails, InspectReport, LifecycleReport, TeardownReport,
    ensure_staging, inspect, run_lifecycle, teardown,
};
