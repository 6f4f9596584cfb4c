use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BuildFlagError, Result};
use crate::model::{
    BuildDetails, BuildRecord, CommitDetails, CommitInfo, FailureDetail, Job, JobSnapshot,
};

/// How long a last success keeps a job out of the flagged set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FlagThreshold(TimeDelta);

impl FlagThreshold {
    pub fn from_hours(hours: u32) -> Self {
        Self(TimeDelta::hours(i64::from(hours)))
    }

    pub fn as_delta(&self) -> TimeDelta {
        self.0
    }

    /// Oldest success timestamp that still counts as recent at `now`.
    fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.0)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl From<TimeDelta> for FlagThreshold {
    fn from(value: TimeDelta) -> Self {
        Self(value)
    }
}

/// Which commit of a failed build's change set gets the blame.
///
/// Jenkins reports change set items in its own order; `First` takes the first
/// item as reported, `Last` the final one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CommitSelection {
    #[default]
    First,
    Last,
}

impl CommitSelection {
    fn pick<'a>(&self, commits: &'a [CommitInfo]) -> Option<&'a CommitInfo> {
        match self {
            Self::First => commits.first(),
            Self::Last => commits.last(),
        }
    }
}

/// Was the last successful build recent enough to keep the job unflagged?
///
/// A job that never succeeded is never within the threshold. The boundary is
/// inclusive: a success exactly `threshold` old still counts.
pub fn is_last_success_within_threshold(
    last_success: Option<&BuildRecord>,
    threshold: FlagThreshold,
    now: DateTime<Utc>,
) -> bool {
    last_success.is_some_and(|build| build.timestamp >= threshold.cutoff(now))
}

/// Did the most recent build succeed? Missing and still-running builds did not.
pub fn is_last_build_successful(last_build: Option<&BuildRecord>) -> bool {
    last_build.is_some_and(BuildRecord::is_successful)
}

/// Decides whether a job is in a sustained failing state.
///
/// A recent enough success keeps the job unflagged even if a later build is
/// failing or still running, so only failures outlasting the threshold flag.
pub fn is_build_failure_flagged(
    last_success: Option<&BuildRecord>,
    last_build: Option<&BuildRecord>,
    threshold: FlagThreshold,
    now: DateTime<Utc>,
) -> bool {
    if is_last_success_within_threshold(last_success, threshold, now) {
        return false;
    }
    !is_last_build_successful(last_build)
}

/// Returns the flagged jobs of `snapshots`, preserving their order.
pub fn filter_flagged_jobs(
    snapshots: &[JobSnapshot],
    threshold: FlagThreshold,
    now: DateTime<Utc>,
) -> Vec<Job> {
    snapshots
        .iter()
        .filter(|snapshot| {
            is_build_failure_flagged(
                snapshot.last_success.as_ref(),
                snapshot.last_build.as_ref(),
                threshold,
                now,
            )
        })
        .map(|snapshot| snapshot.job.clone())
        .collect()
}

/// Derives a repository name from a git remote URL.
///
/// `https://git.example.com/proj/foo.git` and `git@host:proj/foo.git` both
/// yield `foo`. Returns `None` when nothing is left after stripping.
pub fn repo_name_from_remote_url(remote_url: &str) -> Option<&str> {
    let trimmed = remote_url.trim().trim_end_matches('/');
    let last_segment = trimmed.rsplit(['/', ':']).next().unwrap_or(trimmed);
    let name = last_segment.strip_suffix(".git").unwrap_or(last_segment);

    (!name.is_empty()).then_some(name)
}

pub fn commit_url(repo_root_url: &str, repo_name: &str, commit_id: &str) -> String {
    format!(
        "{}/{repo_name}/commits/{commit_id}",
        repo_root_url.trim_end_matches('/')
    )
}

/// Formats a build timestamp as `MM-DD-YY` (UTC).
pub fn format_build_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%m-%d-%y").to_string()
}

/// Renders an elapsed build duration as `mm:ss`.
///
/// Minutes are not wrapped at the hour, so 75 minutes renders as `75:00`.
pub fn format_duration(duration_ms: u64) -> String {
    let total_seconds = duration_ms / 1000;
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Summarises a failed build for reporting.
///
/// # Arguments
///
/// * `last_failure` - The job's last failed build
/// * `job_name` - Name of the job the build belongs to
/// * `repo_root_url` - Base URL commit links are built from
/// * `selection` - Which commit of the change set is attributed
///
/// # Errors
///
/// Returns `DataShape` when the build carries no remote repository URL, the
/// URL yields no repository name, or the change set has no commits.
pub fn extract_failure_detail(
    last_failure: &BuildRecord,
    job_name: &str,
    repo_root_url: &str,
    selection: CommitSelection,
) -> Result<FailureDetail> {
    let data_shape = |reason: &str| BuildFlagError::DataShape {
        job: job_name.to_string(),
        reason: reason.to_string(),
    };

    let remote_url = last_failure
        .change_set
        .remote_urls
        .first()
        .ok_or_else(|| data_shape("build has no remote repository URL"))?;

    let repo_name = repo_name_from_remote_url(remote_url)
        .ok_or_else(|| data_shape(&format!("cannot derive repository name from {remote_url}")))?;

    let commit = selection
        .pick(&last_failure.change_set.commits)
        .ok_or_else(|| data_shape("change set has no commits"))?;

    Ok(FailureDetail {
        job: job_name.to_string(),
        repo_name: repo_name.to_string(),
        build_details: BuildDetails {
            url: last_failure.url.clone(),
            number: last_failure.number,
            date: format_build_date(last_failure.timestamp),
            duration: format_duration(last_failure.duration_ms),
        },
        commit_details: CommitDetails {
            commit_id: commit.commit_id.clone(),
            author: commit.author_full_name.clone(),
            comment: commit.message.clone(),
            commit_url: commit_url(repo_root_url, repo_name, &commit.commit_id),
        },
    })
}

/// Flagging and failure-detail policy bound to one configuration.
#[derive(Debug, Clone)]
pub struct BuildStatusEvaluator {
    pub threshold: FlagThreshold,
    pub repo_root_url: String,
    pub commit_selection: CommitSelection,
}

impl BuildStatusEvaluator {
    pub fn new(
        threshold: FlagThreshold,
        repo_root_url: impl Into<String>,
        commit_selection: CommitSelection,
    ) -> Self {
        Self {
            threshold,
            repo_root_url: repo_root_url.into(),
            commit_selection,
        }
    }

    pub fn is_flagged_at(
        &self,
        last_success: Option<&BuildRecord>,
        last_build: Option<&BuildRecord>,
        now: DateTime<Utc>,
    ) -> bool {
        is_build_failure_flagged(last_success, last_build, self.threshold, now)
    }

    pub fn is_flagged(
        &self,
        last_success: Option<&BuildRecord>,
        last_build: Option<&BuildRecord>,
    ) -> bool {
        self.is_flagged_at(last_success, last_build, Utc::now())
    }

    pub fn flagged_jobs(&self, snapshots: &[JobSnapshot]) -> Vec<Job> {
        filter_flagged_jobs(snapshots, self.threshold, Utc::now())
    }

    pub fn failure_detail(&self, last_failure: &BuildRecord, job_name: &str) -> Result<FailureDetail> {
        extract_failure_detail(
            last_failure,
            job_name,
            &self.repo_root_url,
            self.commit_selection,
        )
    }
}
