use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named, repeatedly-triggered build configuration on the CI server.
///
/// Identity is the name; folder jobs use `/`-separated names (e.g. `team/app`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Jenkins ball color (e.g. "blue", "red_anime")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buildable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Job {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
            color: None,
            buildable: None,
            description: None,
        }
    }
}

/// Final outcome of a build as reported by the CI server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BuildResult {
    Success,
    Failure,
    Unstable,
    Aborted,
    NotBuilt,
    Other(String),
}

impl BuildResult {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::Unstable => "UNSTABLE",
            Self::Aborted => "ABORTED",
            Self::NotBuilt => "NOT_BUILT",
            Self::Other(other) => other,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<&str> for BuildResult {
    fn from(value: &str) -> Self {
        match value {
            "SUCCESS" => Self::Success,
            "FAILURE" => Self::Failure,
            "UNSTABLE" => Self::Unstable,
            "ABORTED" => Self::Aborted,
            "NOT_BUILT" => Self::NotBuilt,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for BuildResult {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<BuildResult> for String {
    fn from(value: BuildResult) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source commit attached to a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub commit_id: String,
    pub author_full_name: String,
    pub message: String,
}

/// Commits and repository remotes associated with a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Commits in the order the CI server reports them
    pub commits: Vec<CommitInfo>,
    /// Remote repository URLs declared by the build's SCM actions
    pub remote_urls: Vec<String>,
}

/// One execution of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRecord {
    pub url: String,
    pub number: u64,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
    /// `None` while the build is still running
    pub result: Option<BuildResult>,
    #[serde(default)]
    pub change_set: ChangeSet,
}

impl BuildRecord {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn is_successful(&self) -> bool {
        self.result.as_ref().is_some_and(BuildResult::is_success)
    }
}

/// Records fetched for one job, the input of a flagging decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSnapshot {
    pub job: Job,
    pub last_success: Option<BuildRecord>,
    pub last_build: Option<BuildRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDetails {
    pub url: String,
    pub number: u64,
    /// `MM-DD-YY`
    pub date: String,
    /// Elapsed time as `mm:ss`
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDetails {
    pub commit_id: String,
    pub author: String,
    pub comment: String,
    pub commit_url: String,
}

/// Summary of a job's last failed build and the commit it is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDetail {
    pub job: String,
    pub repo_name: String,
    pub build_details: BuildDetails,
    pub commit_details: CommitDetails,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_result_parses_known_values() {
        assert_eq!(BuildResult::from("SUCCESS"), BuildResult::Success);
        assert_eq!(BuildResult::from("FAILURE"), BuildResult::Failure);
        assert_eq!(BuildResult::from("UNSTABLE"), BuildResult::Unstable);
        assert_eq!(BuildResult::from("ABORTED"), BuildResult::Aborted);
        assert_eq!(BuildResult::from("NOT_BUILT"), BuildResult::NotBuilt);
        assert_eq!(
            BuildResult::from("CANCELLED"),
            BuildResult::Other("CANCELLED".to_string())
        );
    }

    #[test]
    fn build_result_serializes_as_jenkins_string() {
        let json = serde_json::to_string(&BuildResult::NotBuilt).unwrap();
        assert_eq!(json, "\"NOT_BUILT\"");

        let parsed: BuildResult = serde_json::from_str("\"UNSTABLE\"").unwrap();
        assert_eq!(parsed, BuildResult::Unstable);
    }

    #[test]
    fn running_build_is_not_successful() {
        let build = BuildRecord {
            url: "https://ci.example.com/job/api/7/".to_string(),
            number: 7,
            timestamp: Utc::now(),
            duration_ms: 0,
            result: None,
            change_set: ChangeSet::default(),
        };
        assert!(!build.is_successful());
    }
}
