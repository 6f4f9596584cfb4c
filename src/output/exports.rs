use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::model::{FailureDetail, Job};
use crate::scanner::{FailureLookup, ScanReport};

/// JSON shape of a flag scan.
#[derive(Debug, Serialize)]
pub struct FlagReportExport<'a> {
    pub evaluated_at: DateTime<Utc>,
    pub threshold_hours: u32,
    pub flagged: Vec<FlaggedJobExport<'a>>,
    pub healthy: Vec<&'a str>,
    pub unknown: Vec<UnresolvedJobExport<'a>>,
}

#[derive(Debug, Serialize)]
pub struct FlaggedJobExport<'a> {
    pub job: &'a Job,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<&'a FailureDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UnresolvedJobExport<'a> {
    pub job: &'a str,
    pub error: String,
}

impl<'a> FlagReportExport<'a> {
    pub fn new(report: &'a ScanReport, failures: &'a [FailureLookup], threshold_hours: u32) -> Self {
        let flagged = report
            .flagged()
            .into_iter()
            .map(|job| {
                let lookup = failures.iter().find(|lookup| lookup.job.name == job.name);
                FlaggedJobExport {
                    job,
                    failure: lookup.and_then(|l| l.detail.as_ref().ok()),
                    failure_error: lookup.and_then(|l| l.detail.as_ref().err().map(ToString::to_string)),
                }
            })
            .collect();

        Self {
            evaluated_at: report.evaluated_at,
            threshold_hours,
            flagged,
            healthy: report.healthy().into_iter().map(|job| job.name.as_str()).collect(),
            unknown: report
                .unknown()
                .into_iter()
                .map(|(job, err)| UnresolvedJobExport {
                    job: &job.name,
                    error: err.to_string(),
                })
                .collect(),
        }
    }
}

/// Writes `value` as a single JSON document followed by a newline.
pub fn export_json<T: Serialize + ?Sized>(value: &T, pretty: bool, output: &mut dyn Write) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    writeln!(output, "{json}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuildFlagError;
    use crate::scanner::{JobEvaluation, JobStatus};

    #[test]
    fn exports_report_sections() {
        let report = ScanReport {
            evaluated_at: Utc::now(),
            evaluations: vec![
                JobEvaluation {
                    job: Job::named("api"),
                    status: JobStatus::Flagged,
                },
                JobEvaluation {
                    job: Job::named("web"),
                    status: JobStatus::Healthy,
                },
                JobEvaluation {
                    job: Job::named("infra"),
                    status: JobStatus::Unknown(BuildFlagError::JobNotFound("infra".to_string())),
                },
            ],
        };
        let failures = vec![FailureLookup {
            job: Job::named("api"),
            detail: Err(BuildFlagError::MissingRecord {
                job: "api".to_string(),
                record: "failed build",
            }),
        }];

        let export = FlagReportExport::new(&report, &failures, 24);
        let mut buffer = Vec::new();
        export_json(&export, false, &mut buffer).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["threshold_hours"], 24);
        assert_eq!(value["flagged"][0]["job"]["name"], "api");
        assert!(value["flagged"][0].get("failure").is_none());
        assert_eq!(
            value["flagged"][0]["failure_error"],
            "No failed build recorded for job api"
        );
        assert_eq!(value["healthy"][0], "web");
        assert_eq!(value["unknown"][0]["job"], "infra");
    }

    #[test]
    fn pretty_output_is_multiline() {
        let mut buffer = Vec::new();
        export_json(&vec![Job::named("api")], true, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.lines().count() > 1);
    }
}
