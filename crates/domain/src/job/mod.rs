//! Job posting and application lifecycle types

mod application;
mod posting;
mod status;

pub use application::{
    Application, ApplicationStatus, ApplyOutcome, ApplyRejection, Round, ensure_can_apply,
};
pub use posting::JobPosting;
pub use status::{Actor, JobAction, JobStatus};
