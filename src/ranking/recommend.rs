//! Category-affinity recommendations from a candidate's application history.

use super::RankingError;
use crate::job_store::{CandidateApplication, JobRecord, JobStore};
use std::collections::HashSet;

/// Fetches the ranker needs from the job corpus. Blanket-implemented for any
/// [`JobStore`] so the sqlite store plugs in directly.
pub trait RecommendSource {
    /// Jobs in a category, newest first, excluding the given ids. Category
    /// matching is case-insensitive.
    fn jobs_in_category(
        &self,
        category: &str,
        excluded: &HashSet<usize>,
    ) -> anyhow::Result<Vec<JobRecord>>;

    /// Jobs outside all of the given categories, newest first, excluding the
    /// given ids. Category matching is exact.
    fn jobs_outside_categories(
        &self,
        categories: &[String],
        excluded: &HashSet<usize>,
    ) -> anyhow::Result<Vec<JobRecord>>;
}

impl<T: JobStore + ?Sized> RecommendSource for T {
    fn jobs_in_category(
        &self,
        category: &str,
        excluded: &HashSet<usize>,
    ) -> anyhow::Result<Vec<JobRecord>> {
        self.get_jobs_by_category_excluding(category, excluded)
    }

    fn jobs_outside_categories(
        &self,
        categories: &[String],
        excluded: &HashSet<usize>,
    ) -> anyhow::Result<Vec<JobRecord>> {
        self.get_jobs_excluding_categories(categories, excluded)
    }
}

/// Tally of application counts per normalized category, in first-seen order.
fn tally_categories(history: &[CandidateApplication]) -> Vec<(String, usize)> {
    let mut tally: Vec<(String, usize)> = Vec::new();
    for entry in history {
        let Some(job) = &entry.job else { continue };
        let category = job.category.trim().to_lowercase();
        if category.is_empty() {
            continue;
        }
        match tally.iter_mut().find(|(name, _)| *name == category) {
            Some((_, count)) => *count += 1,
            None => tally.push((category, 1)),
        }
    }
    tally
}

/// Builds a recommendation list from the candidate's application history.
///
/// Categories the candidate applied to most come first, each category's
/// unseen jobs newest first, followed by jobs from every other category,
/// also newest first. Jobs already applied to never appear. Returns
/// `Ok(None)` when the history yields no usable category, the caller is
/// expected to fall back to a plain recency listing.
pub fn recommend<S: RecommendSource + ?Sized>(
    history: &[CandidateApplication],
    source: &S,
) -> Result<Option<Vec<JobRecord>>, RankingError> {
    if history.is_empty() {
        return Ok(None);
    }

    let mut tally = tally_categories(history);
    if tally.is_empty() {
        return Ok(None);
    }
    // Stable sort, ties keep first-application order.
    tally.sort_by(|a, b| b.1.cmp(&a.1));

    let seen: HashSet<usize> = history
        .iter()
        .filter_map(|entry| entry.job.as_ref().map(|job| job.id))
        .collect();

    let mut recommended: Vec<JobRecord> = Vec::new();
    let mut recommended_ids = seen.clone();
    for (category, _) in &tally {
        for job in source.jobs_in_category(category, &recommended_ids)? {
            recommended_ids.insert(job.id);
            recommended.push(job);
        }
    }

    let categories: Vec<String> = tally.into_iter().map(|(name, _)| name).collect();
    for job in source.jobs_outside_categories(&categories, &recommended_ids)? {
        recommended_ids.insert(job.id);
        recommended.push(job);
    }

    Ok(Some(recommended))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job_store::{ApplicationRecord, ApplicationStatus};

    struct FakeSource {
        jobs: Vec<JobRecord>,
    }

    impl RecommendSource for FakeSource {
        fn jobs_in_category(
            &self,
            category: &str,
            excluded: &HashSet<usize>,
        ) -> anyhow::Result<Vec<JobRecord>> {
            let mut jobs: Vec<JobRecord> = self
                .jobs
                .iter()
                .filter(|job| job.category.to_lowercase() == category)
                .filter(|job| !excluded.contains(&job.id))
                .cloned()
                .collect();
            jobs.sort_by(|a, b| b.created.cmp(&a.created));
            Ok(jobs)
        }

        fn jobs_outside_categories(
            &self,
            categories: &[String],
            excluded: &HashSet<usize>,
        ) -> anyhow::Result<Vec<JobRecord>> {
            let mut jobs: Vec<JobRecord> = self
                .jobs
                .iter()
                .filter(|job| !categories.contains(&job.category))
                .filter(|job| !excluded.contains(&job.id))
                .cloned()
                .collect();
            jobs.sort_by(|a, b| b.created.cmp(&a.created));
            Ok(jobs)
        }
    }

    fn job(id: usize, category: &str, created: i64) -> JobRecord {
        JobRecord {
            id,
            title: format!("job {id}"),
            company: String::new(),
            category: category.to_string(),
            location: String::new(),
            description: String::new(),
            recruiter_id: 1,
            created,
        }
    }

    fn applied_to(job: JobRecord) -> CandidateApplication {
        CandidateApplication {
            application: ApplicationRecord {
                id: job.id,
                job_id: job.id,
                candidate_id: 1,
                resume_url: None,
                status: ApplicationStatus::Pending,
                created: 0,
            },
            job: Some(job),
        }
    }

    #[test]
    fn empty_history_yields_no_recommendation() {
        let source = FakeSource { jobs: vec![] };
        assert!(recommend(&[], &source).unwrap().is_none());
    }

    #[test]
    fn history_without_usable_categories_yields_no_recommendation() {
        let source = FakeSource { jobs: vec![] };
        let history = vec![applied_to(job(1, "   ", 0))];
        assert!(recommend(&history, &source).unwrap().is_none());

        let orphaned = vec![CandidateApplication {
            application: ApplicationRecord {
                id: 1,
                job_id: 99,
                candidate_id: 1,
                resume_url: None,
                status: ApplicationStatus::Pending,
                created: 0,
            },
            job: None,
        }];
        assert!(recommend(&orphaned, &source).unwrap().is_none());
    }

    #[test]
    fn most_applied_category_comes_first_newest_first_within_it() {
        let source = FakeSource {
            jobs: vec![
                job(10, "engineering", 5),
                job(11, "engineering", 9),
                job(20, "design", 7),
                job(30, "sales", 8),
            ],
        };
        let history = vec![
            applied_to(job(1, "Engineering", 0)),
            applied_to(job(2, "engineering ", 0)),
            applied_to(job(3, "design", 0)),
        ];

        let recommended = recommend(&history, &source).unwrap().unwrap();
        let ids: Vec<usize> = recommended.iter().map(|j| j.id).collect();
        // engineering (2 applications) before design (1), newest first in
        // each, then the leftover sales job.
        assert_eq!(ids, vec![11, 10, 20, 30]);
    }

    #[test]
    fn applied_jobs_never_appear() {
        let engineering = job(10, "engineering", 5);
        let source = FakeSource {
            jobs: vec![engineering.clone(), job(11, "engineering", 9)],
        };
        let history = vec![applied_to(engineering)];

        let recommended = recommend(&history, &source).unwrap().unwrap();
        let ids: Vec<usize> = recommended.iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![11]);
    }

    #[test]
    fn no_duplicate_ids_across_phases() {
        // "Engineering" with uppercase E matches the case-insensitive
        // category phase but dodges the exact-match exclusion in the
        // leftover phase; the explicit id exclusion keeps it out.
        let source = FakeSource {
            jobs: vec![job(10, "Engineering", 5), job(20, "sales", 3)],
        };
        let history = vec![applied_to(job(1, "engineering", 0))];

        let recommended = recommend(&history, &source).unwrap().unwrap();
        let ids: Vec<usize> = recommended.iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![10, 20]);
    }

    #[test]
    fn tied_categories_keep_first_application_order() {
        let source = FakeSource {
            jobs: vec![job(10, "design", 1), job(20, "engineering", 9)],
        };
        let history = vec![
            applied_to(job(1, "design", 0)),
            applied_to(job(2, "engineering", 0)),
        ];

        let recommended = recommend(&history, &source).unwrap().unwrap();
        let ids: Vec<usize> = recommended.iter().map(|j| j.id).collect();
        // design was applied to first, its jobs lead despite being older.
        assert_eq!(ids, vec![10, 20]);
    }
}
