use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildFlagError {
    #[error("Jenkins API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Build #{number} not found for job {job}")]
    BuildNotFound { job: String, number: u64 },

    #[error("No {record} recorded for job {job}")]
    MissingRecord { job: String, record: &'static str },

    #[error("Unexpected build data for job {job}: {reason}")]
    DataShape { job: String, reason: String },

    #[error("Failed to query CI server for job {job}: {source}")]
    Upstream {
        job: String,
        #[source]
        source: Box<BuildFlagError>,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildFlagError {
    /// Wraps a client failure so it carries the job it was raised for.
    pub fn upstream(job: &str, source: BuildFlagError) -> Self {
        Self::Upstream {
            job: job.to_string(),
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, BuildFlagError>;
