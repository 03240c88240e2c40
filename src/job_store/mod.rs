mod models;
mod sqlite_job_store;
mod trait_def;

pub use models::{
    ApplicationRecord, ApplicationStatus, CandidateApplication, JobPatch, JobRecord, NewJob,
    RecruiterApplication,
};
pub use sqlite_job_store::SqliteJobStore;
pub use trait_def::JobStore;
