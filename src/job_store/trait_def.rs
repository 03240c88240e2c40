use super::models::{
    ApplicationRecord, ApplicationStatus, CandidateApplication, JobPatch, JobRecord, NewJob,
    RecruiterApplication,
};
use anyhow::Result;
use std::collections::HashSet;

pub trait JobStore: Send + Sync {
    /// Creates a new job posting owned by the given recruiter and returns it.
    fn create_job(&self, recruiter_id: usize, job: NewJob) -> Result<JobRecord>;

    /// Returns a job by id.
    /// Returns Ok(None) if the job does not exist.
    fn get_job(&self, job_id: usize) -> Result<Option<JobRecord>>;

    /// Returns the full corpus of jobs in insertion order.
    /// This is the snapshot search statistics are derived from.
    fn get_all_jobs(&self) -> Result<Vec<JobRecord>>;

    /// Returns the full corpus of jobs, newest first.
    fn get_all_jobs_newest_first(&self) -> Result<Vec<JobRecord>>;

    /// Returns all jobs owned by the given recruiter.
    fn get_recruiter_jobs(&self, recruiter_id: usize) -> Result<Vec<JobRecord>>;

    /// Applies a partial update to a job owned by the given recruiter.
    /// Returns Ok(None) if the job does not exist or is owned by somebody else.
    fn update_job(
        &self,
        job_id: usize,
        recruiter_id: usize,
        patch: JobPatch,
    ) -> Result<Option<JobRecord>>;

    /// Deletes a job owned by the given recruiter, cascading to its
    /// applications. Returns false if the job does not exist or is owned by
    /// somebody else.
    fn delete_job(&self, job_id: usize, recruiter_id: usize) -> Result<bool>;

    /// Records a candidate's application to a job.
    /// Returns Ok(None) if the pair already exists (one application per
    /// job), even when a concurrent apply wins the race.
    fn create_application(
        &self,
        job_id: usize,
        candidate_id: usize,
        resume_url: Option<String>,
    ) -> Result<Option<ApplicationRecord>>;

    /// Returns whether the candidate already applied to the job.
    fn has_applied(&self, job_id: usize, candidate_id: usize) -> Result<bool>;

    /// Returns the candidate's applications with their jobs resolved, in
    /// application order.
    fn get_candidate_applications(&self, candidate_id: usize)
        -> Result<Vec<CandidateApplication>>;

    /// Deletes an application owned by the given candidate.
    /// Returns false if the application does not exist or is owned by
    /// somebody else.
    fn delete_application(&self, application_id: usize, candidate_id: usize) -> Result<bool>;

    /// Returns all applications to the given recruiter's jobs.
    fn get_recruiter_applications(&self, recruiter_id: usize)
        -> Result<Vec<RecruiterApplication>>;

    /// Sets the status of an application.
    /// Returns Ok(None) if the application does not exist.
    fn update_application_status(
        &self,
        application_id: usize,
        status: ApplicationStatus,
    ) -> Result<Option<ApplicationRecord>>;

    /// Returns jobs whose category matches the given normalized (trimmed,
    /// lowercased) category case-insensitively, excluding the given ids,
    /// newest first.
    fn get_jobs_by_category_excluding(
        &self,
        category: &str,
        excluded: &HashSet<usize>,
    ) -> Result<Vec<JobRecord>>;

    /// Returns jobs whose category is none of the given ones (exact match),
    /// excluding the given ids, newest first.
    fn get_jobs_excluding_categories(
        &self,
        categories: &[String],
        excluded: &HashSet<usize>,
    ) -> Result<Vec<JobRecord>>;
}
