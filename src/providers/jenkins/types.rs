use chrono::DateTime;
use serde::Deserialize;

use crate::error::{BuildFlagError, Result};
use crate::model::{BuildRecord, ChangeSet, CommitInfo, Job};

/// Response of `{base}/api/json?tree=jobs[...]`.
#[derive(Debug, Deserialize)]
pub(super) struct JobListResponse {
    #[serde(default)]
    pub jobs: Vec<JenkinsJob>,
}

/// A Jenkins job as returned by the JSON API.
#[derive(Debug, Deserialize)]
pub(super) struct JenkinsJob {
    #[serde(rename = "_class")]
    pub class: Option<String>,
    pub name: String,
    pub url: Option<String>,
    /// Ball color; absent for folders
    pub color: Option<String>,
    pub buildable: Option<bool>,
    pub description: Option<String>,
}

impl JenkinsJob {
    /// Folders and multibranch containers expose no ball color; only jobs that
    /// can actually be built carry one.
    pub fn is_buildable_job(&self) -> bool {
        self.color.is_some()
    }
}

impl From<JenkinsJob> for Job {
    fn from(job: JenkinsJob) -> Self {
        Self {
            name: job.name,
            url: job.url,
            color: job.color,
            buildable: job.buildable,
            description: job.description.filter(|d| !d.is_empty()),
        }
    }
}

/// Response of `{job}/api/json?tree=allBuilds[...]`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AllBuildsResponse {
    #[serde(default)]
    pub all_builds: Vec<JenkinsBuild>,
}

/// A single Jenkins build.
///
/// Freestyle jobs report commits under `changeSet`, pipeline jobs under
/// `changeSets`; both are merged into one change set.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct JenkinsBuild {
    pub url: String,
    pub number: u64,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Milliseconds; zero while running
    #[serde(default)]
    pub duration: i64,
    pub result: Option<String>,
    #[serde(default)]
    pub change_set: Option<JenkinsChangeSet>,
    #[serde(default)]
    pub change_sets: Option<Vec<JenkinsChangeSet>>,
    /// Heterogeneous plugin actions; Jenkins emits `{}` or `null` for most
    #[serde(default)]
    pub actions: Option<Vec<Option<JenkinsAction>>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct JenkinsChangeSet {
    #[serde(default)]
    pub items: Option<Vec<JenkinsChangeSetItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct JenkinsChangeSetItem {
    pub commit_id: Option<String>,
    pub author: Option<JenkinsAuthor>,
    pub msg: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct JenkinsAuthor {
    pub full_name: Option<String>,
}

/// Only the git `BuildData` action carries `remoteUrls`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct JenkinsAction {
    pub remote_urls: Option<Vec<String>>,
}

/// Which build permalink of a job to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Permalink {
    LastBuild,
    LastSuccessfulBuild,
    LastFailedBuild,
}

impl Permalink {
    pub fn field(self) -> &'static str {
        match self {
            Self::LastBuild => "lastBuild",
            Self::LastSuccessfulBuild => "lastSuccessfulBuild",
            Self::LastFailedBuild => "lastFailedBuild",
        }
    }
}

/// A job object carrying its build permalinks.
///
/// Jenkins returns `null` for a permalink the job has no build for, while a
/// job that does not exist is a 404 on the whole object.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct JobPermalinks {
    #[serde(rename = "_class")]
    pub class: Option<String>,
    pub color: Option<String>,
    pub last_build: Option<JenkinsBuild>,
    pub last_successful_build: Option<JenkinsBuild>,
    pub last_failed_build: Option<JenkinsBuild>,
}

impl JobPermalinks {
    pub fn take(self, permalink: Permalink) -> Option<JenkinsBuild> {
        match permalink {
            Permalink::LastBuild => self.last_build,
            Permalink::LastSuccessfulBuild => self.last_successful_build,
            Permalink::LastFailedBuild => self.last_failed_build,
        }
    }
}

impl JenkinsBuild {
    pub fn into_record(self, job_name: &str) -> Result<BuildRecord> {
        let timestamp = DateTime::from_timestamp_millis(self.timestamp).ok_or_else(|| {
            BuildFlagError::DataShape {
                job: job_name.to_string(),
                reason: format!("build #{} has invalid timestamp {}", self.number, self.timestamp),
            }
        })?;

        let commits = self
            .change_set
            .into_iter()
            .chain(self.change_sets.into_iter().flatten())
            .flat_map(|change_set| change_set.items.into_iter().flatten())
            .filter_map(|item| {
                item.commit_id.map(|commit_id| CommitInfo {
                    commit_id,
                    author_full_name: item
                        .author
                        .and_then(|a| a.full_name)
                        .unwrap_or_default(),
                    message: item.msg.unwrap_or_default(),
                })
            })
            .collect();

        let mut remote_urls: Vec<String> = Vec::new();
        for url in self
            .actions
            .into_iter()
            .flatten()
            .flatten()
            .flat_map(|a| a.remote_urls.into_iter().flatten())
        {
            if !remote_urls.contains(&url) {
                remote_urls.push(url);
            }
        }

        #[allow(clippy::cast_sign_loss)]
        let duration_ms = self.duration.max(0) as u64;

        Ok(BuildRecord {
            url: self.url,
            number: self.number,
            timestamp,
            duration_ms,
            result: self.result.map(Into::into),
            change_set: ChangeSet {
                commits,
                remote_urls,
            },
        })
    }
}
