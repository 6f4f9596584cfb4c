use crate::error::Result;
use crate::model::{BuildRecord, BuildResult, Job};

/// Read access to a CI server's jobs and builds.
///
/// Every call is an independent request. Absent records (a job that never
/// failed, never succeeded, or never ran) resolve to `Ok(None)` rather than an
/// error.
#[allow(async_fn_in_trait)]
pub trait CiClient {
    /// Lists jobs whose name contains `name_filter` (all jobs when `None`).
    async fn list_jobs(&self, name_filter: Option<&str>) -> Result<Vec<Job>>;

    async fn job_info(&self, job_name: &str) -> Result<Job>;

    async fn build_info(&self, job_name: &str, build_number: u64) -> Result<BuildRecord>;

    /// Result of the most recent build; `None` if it never ran or is running.
    async fn last_build_result(&self, job_name: &str) -> Result<Option<BuildResult>>;

    async fn last_failed_build(&self, job_name: &str) -> Result<Option<BuildRecord>>;

    async fn last_successful_build(&self, job_name: &str) -> Result<Option<BuildRecord>>;

    async fn last_build(&self, job_name: &str) -> Result<Option<BuildRecord>>;

    /// Lists builds newest first, at most `limit` when given.
    async fn list_builds(&self, job_name: &str, limit: Option<usize>) -> Result<Vec<BuildRecord>>;
}
