//! Job board server library.
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod job_store;
pub mod ranking;
pub mod server;
pub mod sqlite_persistence;
pub mod user;

// Re-export commonly used types for convenience
pub use job_store::{JobStore, SqliteJobStore};
pub use ranking::{recommend, search, RankingError};
pub use server::{run_server, RequestsLoggingLevel};
pub use user::{SqliteUserStore, UserRole, UserStore};
