use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema, BASE_DB_VERSION,
    DEFAULT_TIMESTAMP,
};
use anyhow::{bail, Context, Result};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::{
    collections::HashSet,
    path::Path,
    sync::{Arc, Mutex},
};
use tracing::info;

use super::models::{
    ApplicationRecord, ApplicationStatus, CandidateApplication, JobPatch, JobRecord, NewJob,
    RecruiterApplication,
};
use super::trait_def::JobStore;

/// V 0
const JOB_TABLE_V_0: Table = Table {
    name: "job",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            is_unique = true
        ),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("company", &SqlType::Text, non_null = true),
        sqlite_column!("category", &SqlType::Text, non_null = true),
        sqlite_column!("location", &SqlType::Text, non_null = true),
        sqlite_column!("description", &SqlType::Text, non_null = true),
        sqlite_column!("recruiter_id", &SqlType::Integer, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    unique_constraints: &[],
    indices: &[
        ("idx_job_category", "category"),
        ("idx_job_recruiter", "recruiter_id"),
    ],
};
const APPLICATION_TABLE_V_0: Table = Table {
    name: "application",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            is_unique = true
        ),
        sqlite_column!(
            "job_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "job",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!("candidate_id", &SqlType::Integer, non_null = true),
        sqlite_column!("resume_url", &SqlType::Text),
        sqlite_column!(
            "status",
            &SqlType::Text,
            non_null = true,
            default_value = Some("'pending'")
        ),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    unique_constraints: &[&["job_id", "candidate_id"]],
    indices: &[("idx_application_candidate", "candidate_id")],
};

pub const VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[JOB_TABLE_V_0, APPLICATION_TABLE_V_0],
    migration: None,
}];

pub struct SqliteJobStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteJobStore {
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let conn = if db_path.as_ref().exists() {
            Connection::open_with_flags(
                db_path,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                    | rusqlite::OpenFlags::SQLITE_OPEN_URI
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?
        } else {
            let conn = Connection::open(db_path)?;
            VERSIONED_SCHEMAS.last().unwrap().create(&conn)?;
            conn
        };

        // Foreign keys are per-connection in SQLite, the application cascade
        // depends on them.
        conn.execute("PRAGMA foreign_keys = ON;", [])?;

        let db_version = conn
            .query_row("PRAGMA user_version;", [], |row| row.get::<usize, i64>(0))
            .context("Failed to read database version")?
            - BASE_DB_VERSION as i64;

        if db_version < 0 {
            bail!(
                "Database version {} is too old, does not contain base db version {}",
                db_version,
                BASE_DB_VERSION
            );
        }
        let version = db_version as usize;

        if db_version >= VERSIONED_SCHEMAS.len() as i64 {
            bail!("Database version {} is too new", db_version);
        } else {
            VERSIONED_SCHEMAS
                .get(version)
                .context("Failed to get schema")?
                .validate(&conn)?;
        }

        Self::migrate_if_needed(&conn, version)?;

        Ok(SqliteJobStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn migrate_if_needed(conn: &Connection, version: usize) -> Result<()> {
        let mut latest_from = version;
        for schema in VERSIONED_SCHEMAS.iter().skip(version + 1) {
            if let Some(migration_fn) = schema.migration {
                info!(
                    "Migrating jobs db from version {} to {}",
                    latest_from, schema.version
                );
                migration_fn(conn)?;
                latest_from = schema.version;
            }
        }
        conn.execute(
            &format!("PRAGMA user_version = {}", BASE_DB_VERSION + latest_from),
            [],
        )?;

        Ok(())
    }
}

const JOB_COLUMNS: &str = "id, title, company, category, location, description, recruiter_id, created";

fn map_job_row(row: &Row) -> rusqlite::Result<JobRecord> {
    Ok(JobRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        company: row.get(2)?,
        category: row.get(3)?,
        location: row.get(4)?,
        description: row.get(5)?,
        recruiter_id: row.get(6)?,
        created: row.get(7)?,
    })
}

fn map_application_row(row: &Row) -> rusqlite::Result<ApplicationRecord> {
    let status_str = row.get::<usize, String>(4)?;
    let status = ApplicationStatus::from_str(&status_str).ok_or_else(|| {
        rusqlite::Error::InvalidColumnType(4, status_str, rusqlite::types::Type::Text)
    })?;
    Ok(ApplicationRecord {
        id: row.get(0)?,
        job_id: row.get(1)?,
        candidate_id: row.get(2)?,
        resume_url: row.get(3)?,
        status,
        created: row.get(5)?,
    })
}

fn get_job_with_conn(conn: &Connection, job_id: usize) -> Result<Option<JobRecord>> {
    let job = conn
        .query_row(
            &format!("SELECT {} FROM job WHERE id = ?1", JOB_COLUMNS),
            params![job_id],
            map_job_row,
        )
        .optional()?;
    Ok(job)
}

fn not_in_ids_clause(column: &str, excluded: &HashSet<usize>) -> String {
    if excluded.is_empty() {
        return String::new();
    }
    let ids = excluded
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!(" AND {} NOT IN ({})", column, ids)
}

impl JobStore for SqliteJobStore {
    fn create_job(&self, recruiter_id: usize, job: NewJob) -> Result<JobRecord> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO job (title, company, category, location, description, recruiter_id) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                job.title,
                job.company,
                job.category,
                job.location,
                job.description,
                recruiter_id,
            ],
        )?;
        let job_id = conn.last_insert_rowid() as usize;
        get_job_with_conn(&conn, job_id)?.context("Could not read back created job")
    }

    fn get_job(&self, job_id: usize) -> Result<Option<JobRecord>> {
        let conn = self.conn.lock().unwrap();
        get_job_with_conn(&conn, job_id)
    }

    fn get_all_jobs(&self) -> Result<Vec<JobRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!("SELECT {} FROM job ORDER BY id ASC", JOB_COLUMNS))?;
        let jobs = stmt
            .query_map([], map_job_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(jobs)
    }

    fn get_all_jobs_newest_first(&self) -> Result<Vec<JobRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM job ORDER BY created DESC, id DESC",
            JOB_COLUMNS
        ))?;
        let jobs = stmt
            .query_map([], map_job_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(jobs)
    }

    fn get_recruiter_jobs(&self, recruiter_id: usize) -> Result<Vec<JobRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM job WHERE recruiter_id = ?1 ORDER BY id ASC",
            JOB_COLUMNS
        ))?;
        let jobs = stmt
            .query_map(params![recruiter_id], map_job_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(jobs)
    }

    fn update_job(
        &self,
        job_id: usize,
        recruiter_id: usize,
        patch: JobPatch,
    ) -> Result<Option<JobRecord>> {
        let conn = self.conn.lock().unwrap();
        let existing = conn
            .query_row(
                &format!(
                    "SELECT {} FROM job WHERE id = ?1 AND recruiter_id = ?2",
                    JOB_COLUMNS
                ),
                params![job_id, recruiter_id],
                map_job_row,
            )
            .optional()?;

        let mut job = match existing {
            Some(job) => job,
            None => return Ok(None),
        };
        patch.apply_to(&mut job);

        conn.execute(
            "UPDATE job SET title = ?1, company = ?2, category = ?3, location = ?4, \
             description = ?5 WHERE id = ?6",
            params![
                job.title,
                job.company,
                job.category,
                job.location,
                job.description,
                job.id,
            ],
        )?;
        Ok(Some(job))
    }

    fn delete_job(&self, job_id: usize, recruiter_id: usize) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM job WHERE id = ?1 AND recruiter_id = ?2",
            params![job_id, recruiter_id],
        )?;
        Ok(deleted > 0)
    }

    fn create_application(
        &self,
        job_id: usize,
        candidate_id: usize,
        resume_url: Option<String>,
    ) -> Result<Option<ApplicationRecord>> {
        let conn = self.conn.lock().unwrap();
        // The unique (job_id, candidate_id) constraint is the authority on
        // duplicates; surfacing it as None keeps concurrent applies from
        // turning into errors.
        match conn.execute(
            "INSERT INTO application (job_id, candidate_id, resume_url) VALUES (?1, ?2, ?3)",
            params![job_id, candidate_id, resume_url],
        ) {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        }
        let application_id = conn.last_insert_rowid() as usize;
        let application = conn.query_row(
            "SELECT id, job_id, candidate_id, resume_url, status, created FROM application \
             WHERE id = ?1",
            params![application_id],
            map_application_row,
        )?;
        Ok(Some(application))
    }

    fn has_applied(&self, job_id: usize, candidate_id: usize) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM application WHERE job_id = ?1 AND candidate_id = ?2",
            params![job_id, candidate_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn get_candidate_applications(
        &self,
        candidate_id: usize,
    ) -> Result<Vec<CandidateApplication>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT a.id, a.job_id, a.candidate_id, a.resume_url, a.status, a.created, \
             j.id, j.title, j.company, j.category, j.location, j.description, j.recruiter_id, \
             j.created \
             FROM application a LEFT JOIN job j ON a.job_id = j.id \
             WHERE a.candidate_id = ?1 ORDER BY a.id ASC",
        )?;
        let applications = stmt
            .query_map(params![candidate_id], |row| {
                let application = map_application_row(row)?;
                let job = match row.get::<usize, Option<usize>>(6)? {
                    Some(id) => Some(JobRecord {
                        id,
                        title: row.get(7)?,
                        company: row.get(8)?,
                        category: row.get(9)?,
                        location: row.get(10)?,
                        description: row.get(11)?,
                        recruiter_id: row.get(12)?,
                        created: row.get(13)?,
                    }),
                    None => None,
                };
                Ok(CandidateApplication { application, job })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(applications)
    }

    fn delete_application(&self, application_id: usize, candidate_id: usize) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM application WHERE id = ?1 AND candidate_id = ?2",
            params![application_id, candidate_id],
        )?;
        Ok(deleted > 0)
    }

    fn get_recruiter_applications(
        &self,
        recruiter_id: usize,
    ) -> Result<Vec<RecruiterApplication>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT a.id, a.job_id, a.candidate_id, a.resume_url, a.status, a.created, \
             j.id, j.title, j.company, j.category, j.location, j.description, j.recruiter_id, \
             j.created \
             FROM application a JOIN job j ON a.job_id = j.id \
             WHERE j.recruiter_id = ?1 ORDER BY a.id ASC",
        )?;
        let applications = stmt
            .query_map(params![recruiter_id], |row| {
                let application = map_application_row(row)?;
                let job = JobRecord {
                    id: row.get(6)?,
                    title: row.get(7)?,
                    company: row.get(8)?,
                    category: row.get(9)?,
                    location: row.get(10)?,
                    description: row.get(11)?,
                    recruiter_id: row.get(12)?,
                    created: row.get(13)?,
                };
                Ok(RecruiterApplication { application, job })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(applications)
    }

    fn update_application_status(
        &self,
        application_id: usize,
        status: ApplicationStatus,
    ) -> Result<Option<ApplicationRecord>> {
        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE application SET status = ?1 WHERE id = ?2",
            params![status.as_str(), application_id],
        )?;
        if updated == 0 {
            return Ok(None);
        }
        let application = conn.query_row(
            "SELECT id, job_id, candidate_id, resume_url, status, created FROM application \
             WHERE id = ?1",
            params![application_id],
            map_application_row,
        )?;
        Ok(Some(application))
    }

    fn get_jobs_by_category_excluding(
        &self,
        category: &str,
        excluded: &HashSet<usize>,
    ) -> Result<Vec<JobRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM job WHERE LOWER(category) = ?1{} ORDER BY created DESC, id DESC",
            JOB_COLUMNS,
            not_in_ids_clause("id", excluded),
        ))?;
        let jobs = stmt
            .query_map(params![category], map_job_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(jobs)
    }

    fn get_jobs_excluding_categories(
        &self,
        categories: &[String],
        excluded: &HashSet<usize>,
    ) -> Result<Vec<JobRecord>> {
        let conn = self.conn.lock().unwrap();
        let category_clause = if categories.is_empty() {
            String::new()
        } else {
            let placeholders = (1..=categories.len())
                .map(|i| format!("?{}", i))
                .collect::<Vec<_>>()
                .join(", ");
            format!(" AND category NOT IN ({})", placeholders)
        };
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM job WHERE 1 = 1{}{} ORDER BY created DESC, id DESC",
            JOB_COLUMNS,
            category_clause,
            not_in_ids_clause("id", excluded),
        ))?;
        let jobs = stmt
            .query_map(params_from_iter(categories.iter()), map_job_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_tmp_store() -> (SqliteJobStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let temp_file_path = temp_dir.path().join("jobs.db");
        let store = SqliteJobStore::new(&temp_file_path).unwrap();
        (store, temp_dir)
    }

    fn new_job(title: &str, category: &str) -> NewJob {
        NewJob {
            title: title.to_string(),
            company: "Acme".to_string(),
            category: category.to_string(),
            location: "Remote".to_string(),
            description: "".to_string(),
        }
    }

    fn set_created(store: &SqliteJobStore, job_id: usize, created: i64) {
        store
            .conn
            .lock()
            .unwrap()
            .execute(
                "UPDATE job SET created = ?1 WHERE id = ?2",
                params![created, job_id],
            )
            .unwrap();
    }

    #[test]
    fn creates_and_fetches_jobs() {
        let (store, _temp_dir) = create_tmp_store();

        let job = store.create_job(1, new_job("Go Engineer", "engineering")).unwrap();
        assert_eq!(job.title, "Go Engineer");
        assert_eq!(job.recruiter_id, 1);

        let fetched = store.get_job(job.id).unwrap().unwrap();
        assert_eq!(fetched.id, job.id);
        assert!(store.get_job(9999).unwrap().is_none());

        assert_eq!(store.get_all_jobs().unwrap().len(), 1);
    }

    #[test]
    fn update_job_respects_ownership_and_fallbacks() {
        let (store, _temp_dir) = create_tmp_store();
        let job = store.create_job(1, new_job("Old Title", "design")).unwrap();

        // Wrong recruiter gets nothing.
        let patch = JobPatch {
            title: Some("Hijacked".to_string()),
            ..Default::default()
        };
        assert!(store.update_job(job.id, 2, patch).unwrap().is_none());

        // Empty strings keep the stored value, set fields replace it.
        let patch = JobPatch {
            title: Some("New Title".to_string()),
            company: Some("".to_string()),
            ..Default::default()
        };
        let updated = store.update_job(job.id, 1, patch).unwrap().unwrap();
        assert_eq!(updated.title, "New Title");
        assert_eq!(updated.company, "Acme");
        assert_eq!(updated.category, "design");
    }

    #[test]
    fn delete_job_cascades_to_applications() {
        let (store, _temp_dir) = create_tmp_store();
        let job = store.create_job(1, new_job("Engineer", "engineering")).unwrap();
        store
            .create_application(job.id, 10, Some("http://cv".to_string()))
            .unwrap()
            .unwrap();

        // Not the owner.
        assert!(!store.delete_job(job.id, 2).unwrap());
        assert!(store.delete_job(job.id, 1).unwrap());

        assert!(store.get_job(job.id).unwrap().is_none());
        assert!(store.get_candidate_applications(10).unwrap().is_empty());
    }

    #[test]
    fn rejects_duplicate_application() {
        let (store, _temp_dir) = create_tmp_store();
        let job = store.create_job(1, new_job("Engineer", "engineering")).unwrap();

        store.create_application(job.id, 10, None).unwrap().unwrap();
        assert!(store.has_applied(job.id, 10).unwrap());
        // The second insert loses to the unique constraint without being an
        // error, which is what keeps racing applies from blowing up.
        assert!(store.create_application(job.id, 10, None).unwrap().is_none());
    }

    #[test]
    fn resolves_candidate_applications() {
        let (store, _temp_dir) = create_tmp_store();
        let job = store.create_job(1, new_job("Engineer", "engineering")).unwrap();
        let application = store
            .create_application(job.id, 10, Some("http://cv".to_string()))
            .unwrap()
            .unwrap();
        assert_eq!(application.status, ApplicationStatus::Pending);

        let applications = store.get_candidate_applications(10).unwrap();
        assert_eq!(applications.len(), 1);
        assert_eq!(applications[0].job.as_ref().unwrap().id, job.id);

        assert!(store.delete_application(application.id, 99).unwrap() == false);
        assert!(store.delete_application(application.id, 10).unwrap());
        assert!(store.get_candidate_applications(10).unwrap().is_empty());
    }

    #[test]
    fn recruiter_sees_applications_to_own_jobs_only() {
        let (store, _temp_dir) = create_tmp_store();
        let own = store.create_job(1, new_job("Engineer", "engineering")).unwrap();
        let other = store.create_job(2, new_job("Designer", "design")).unwrap();
        store.create_application(own.id, 10, None).unwrap().unwrap();
        store.create_application(other.id, 10, None).unwrap().unwrap();

        let applications = store.get_recruiter_applications(1).unwrap();
        assert_eq!(applications.len(), 1);
        assert_eq!(applications[0].job.id, own.id);
    }

    #[test]
    fn updates_application_status() {
        let (store, _temp_dir) = create_tmp_store();
        let job = store.create_job(1, new_job("Engineer", "engineering")).unwrap();
        let application = store.create_application(job.id, 10, None).unwrap().unwrap();

        let updated = store
            .update_application_status(application.id, ApplicationStatus::Accepted)
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, ApplicationStatus::Accepted);

        assert!(store
            .update_application_status(9999, ApplicationStatus::Rejected)
            .unwrap()
            .is_none());
    }

    #[test]
    fn category_fetches_are_newest_first_and_exclude_ids() {
        let (store, _temp_dir) = create_tmp_store();
        let old = store.create_job(1, new_job("Old", "Engineering")).unwrap();
        let new = store.create_job(1, new_job("New", "engineering")).unwrap();
        let design = store.create_job(1, new_job("Designer", "design")).unwrap();
        set_created(&store, old.id, 100);
        set_created(&store, new.id, 200);
        set_created(&store, design.id, 150);

        // Case-insensitive category match, newest first.
        let jobs = store
            .get_jobs_by_category_excluding("engineering", &HashSet::new())
            .unwrap();
        assert_eq!(
            jobs.iter().map(|j| j.id).collect::<Vec<_>>(),
            vec![new.id, old.id]
        );

        let excluded = HashSet::from([new.id]);
        let jobs = store
            .get_jobs_by_category_excluding("engineering", &excluded)
            .unwrap();
        assert_eq!(jobs.iter().map(|j| j.id).collect::<Vec<_>>(), vec![old.id]);

        // Exact-match category exclusion: "Engineering" survives a
        // lowercase exclusion list, "design" does not.
        let jobs = store
            .get_jobs_excluding_categories(&["engineering".to_string()], &HashSet::new())
            .unwrap();
        assert_eq!(
            jobs.iter().map(|j| j.id).collect::<Vec<_>>(),
            vec![design.id, old.id]
        );
    }
}
