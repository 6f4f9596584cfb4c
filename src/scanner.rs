use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::ci::CiClient;
use crate::error::{BuildFlagError, Result};
use crate::evaluator::BuildStatusEvaluator;
use crate::model::{FailureDetail, Job, JobSnapshot};

/// Outcome of evaluating one job.
#[derive(Debug)]
pub enum JobStatus {
    Flagged,
    Healthy,
    /// The job's records could not be fetched; it is neither flagged nor healthy.
    Unknown(BuildFlagError),
}

#[derive(Debug)]
pub struct JobEvaluation {
    pub job: Job,
    pub status: JobStatus,
}

/// Per-job outcomes of a batch scan, in input order.
#[derive(Debug)]
pub struct ScanReport {
    pub evaluated_at: DateTime<Utc>,
    pub evaluations: Vec<JobEvaluation>,
}

impl ScanReport {
    pub fn flagged(&self) -> Vec<&Job> {
        self.with_status(|status| matches!(status, JobStatus::Flagged))
    }

    pub fn healthy(&self) -> Vec<&Job> {
        self.with_status(|status| matches!(status, JobStatus::Healthy))
    }

    pub fn unknown(&self) -> Vec<(&Job, &BuildFlagError)> {
        self.evaluations
            .iter()
            .filter_map(|evaluation| match &evaluation.status {
                JobStatus::Unknown(err) => Some((&evaluation.job, err)),
                _ => None,
            })
            .collect()
    }

    fn with_status(&self, predicate: impl Fn(&JobStatus) -> bool) -> Vec<&Job> {
        self.evaluations
            .iter()
            .filter(|evaluation| predicate(&evaluation.status))
            .map(|evaluation| &evaluation.job)
            .collect()
    }
}

/// Failure detail lookup for one job.
#[derive(Debug)]
pub struct FailureLookup {
    pub job: Job,
    pub detail: Result<FailureDetail>,
}

/// Evaluates many jobs concurrently against a CI server.
///
/// Each job's records are fetched independently; a failed fetch marks only
/// that job as unknown.
pub struct FlagScanner<C> {
    client: C,
    evaluator: BuildStatusEvaluator,
}

impl<C: CiClient> FlagScanner<C> {
    pub fn new(client: C, evaluator: BuildStatusEvaluator) -> Self {
        Self { client, evaluator }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn evaluator(&self) -> &BuildStatusEvaluator {
        &self.evaluator
    }

    /// Fetches a job's last success and last build concurrently.
    ///
    /// # Errors
    ///
    /// Returns `Upstream` naming the job if either request fails.
    pub async fn snapshot(&self, job: &Job) -> Result<JobSnapshot> {
        let (last_success, last_build) = tokio::join!(
            self.client.last_successful_build(&job.name),
            self.client.last_build(&job.name),
        );

        Ok(JobSnapshot {
            job: job.clone(),
            last_success: last_success.map_err(|e| BuildFlagError::upstream(&job.name, e))?,
            last_build: last_build.map_err(|e| BuildFlagError::upstream(&job.name, e))?,
        })
    }

    pub async fn evaluate_at(&self, job: Job, now: DateTime<Utc>) -> JobEvaluation {
        let status = match self.snapshot(&job).await {
            Ok(snapshot) => {
                if self.evaluator.is_flagged_at(
                    snapshot.last_success.as_ref(),
                    snapshot.last_build.as_ref(),
                    now,
                ) {
                    JobStatus::Flagged
                } else {
                    JobStatus::Healthy
                }
            }
            Err(err) => {
                warn!("Could not evaluate job {}: {err}", job.name);
                JobStatus::Unknown(err)
            }
        };

        debug!("Job {} evaluated as {status:?}", job.name);
        JobEvaluation { job, status }
    }

    /// Evaluates `jobs` concurrently against a single `now`.
    pub async fn scan(&self, jobs: Vec<Job>) -> ScanReport {
        let evaluated_at = Utc::now();
        info!("Evaluating {} jobs...", jobs.len());

        let futures: Vec<_> = jobs
            .into_iter()
            .map(|job| self.evaluate_at(job, evaluated_at))
            .collect();

        let evaluations = futures::future::join_all(futures).await;

        let report = ScanReport {
            evaluated_at,
            evaluations,
        };

        info!(
            "{} flagged, {} healthy, {} unknown",
            report.flagged().len(),
            report.healthy().len(),
            report.unknown().len()
        );

        report
    }

    /// Lists jobs matching `name_filter` and scans them.
    ///
    /// # Errors
    ///
    /// Fails only if the job listing itself fails.
    pub async fn scan_matching(&self, name_filter: Option<&str>) -> Result<ScanReport> {
        let jobs = self.client.list_jobs(name_filter).await?;

        if jobs.is_empty() {
            warn!("No jobs matched filter {name_filter:?}");
        }

        Ok(self.scan(jobs).await)
    }

    /// Summarises the last failed build of `job_name`.
    ///
    /// # Errors
    ///
    /// Returns `MissingRecord` if the job never failed, `Upstream` if the
    /// request fails, and `DataShape` if the build lacks SCM data.
    pub async fn failure_detail(&self, job_name: &str) -> Result<FailureDetail> {
        let last_failure = self
            .client
            .last_failed_build(job_name)
            .await
            .map_err(|e| BuildFlagError::upstream(job_name, e))?
            .ok_or_else(|| BuildFlagError::MissingRecord {
                job: job_name.to_string(),
                record: "failed build",
            })?;

        self.evaluator.failure_detail(&last_failure, job_name)
    }

    /// Looks up failure details for each job concurrently, in input order.
    pub async fn failure_details<'a, I>(&self, jobs: I) -> Vec<FailureLookup>
    where
        I: IntoIterator<Item = &'a Job>,
    {
        let futures: Vec<_> = jobs
            .into_iter()
            .map(|job| async move {
                let detail = self.failure_detail(&job.name).await;
                if let Err(err) = &detail {
                    warn!("No failure detail for job {}: {err}", job.name);
                }
                FailureLookup {
                    job: job.clone(),
                    detail,
                }
            })
            .collect();

        futures::future::join_all(futures).await
    }
}
