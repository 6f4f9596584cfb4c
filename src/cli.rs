use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use serde::Serialize;
use std::path::PathBuf;

use buildflag::config::{Config, OutputFormat};
use buildflag::output::{
    export_json, render_builds, render_failure_detail, render_flag_report, render_jobs,
    FlagReportExport, ScanProgress,
};
use buildflag::providers::JenkinsClient;
use buildflag::{CiClient, CommitSelection, FlagScanner};

#[derive(Parser)]
#[command(name = "buildflag")]
#[command(author, version, about = "Flags Jenkins jobs failing beyond a threshold", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Jenkins base URL
    #[arg(short, long, global = true, env = "JENKINS_URL")]
    url: Option<String>,

    #[arg(long, global = true, env = "JENKINS_USER")]
    user: Option<String>,

    /// Jenkins API token
    #[arg(long, global = true, env = "JENKINS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Root for commit links: {root}/{repo}/commits/{id}
    #[arg(long, global = true, env = "STASH_REPO_ROOT")]
    repo_root: Option<String>,

    /// Configuration file (defaults to ./buildflag.toml and friends)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Write output to a file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List jobs whose last success is older than the threshold and whose last build failed
    Flagged {
        /// Only evaluate jobs whose name contains this substring
        #[arg(short, long, env = "JOB_MATCHER")]
        job_filter: Option<String>,

        #[arg(short = 't', long)]
        threshold_hours: Option<u32>,

        /// Which commit of a failed build's change set is attributed
        #[arg(long, value_enum)]
        commit: Option<CommitSelection>,

        /// Skip fetching last-failure details for flagged jobs
        #[arg(long, default_value_t = false)]
        no_details: bool,
    },
    /// List jobs on the Jenkins server
    Jobs {
        #[arg(short, long, env = "JOB_MATCHER")]
        job_filter: Option<String>,
    },
    /// Show the last failed build of a job and the commit it is attributed to
    Failure {
        job: String,

        #[arg(long, value_enum)]
        commit: Option<CommitSelection>,
    },
    /// List recent builds of a job
    Builds {
        job: String,

        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

impl Cli {
    /// Config file values overridden by flags and environment.
    fn resolve_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;

        if let Some(url) = &self.url {
            config.jenkins.url = Some(url.clone());
        }
        if let Some(user) = &self.user {
            config.jenkins.user = Some(user.clone());
        }
        if let Some(token) = &self.token {
            config.jenkins.token = Some(token.clone());
        }
        if let Some(repo_root) = &self.repo_root {
            config.flagging.repo_root_url.clone_from(repo_root);
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if self.pretty {
            config.output.pretty = true;
        }

        Ok(config)
    }

    fn scanner(config: &Config) -> Result<FlagScanner<JenkinsClient>> {
        let url = config
            .jenkins
            .url
            .as_deref()
            .context("No Jenkins URL configured; pass --url or set JENKINS_URL")?;

        if config.flagging.repo_root_url.is_empty() {
            warn!("No repository root configured; commit links will be incomplete");
        }

        let client = JenkinsClient::with_options(url, config.credentials(), &config.client_options())
            .context("Failed to create Jenkins client")?;

        Ok(FlagScanner::new(client, config.evaluator()))
    }

    /// Writes either the rendered table or the JSON form of `value`.
    fn emit<T: Serialize + ?Sized>(
        &self,
        config: &Config,
        table: impl FnOnce() -> String,
        value: &T,
    ) -> Result<()> {
        let contents = match config.output.format {
            OutputFormat::Table => table().into_bytes(),
            OutputFormat::Json => {
                let mut buffer = Vec::new();
                export_json(value, config.output.pretty, &mut buffer)?;
                buffer
            }
        };

        if let Some(output_path) = &self.output {
            std::fs::write(output_path, contents)
                .with_context(|| format!("Failed to write output: {}", output_path.display()))?;
            info!("Output written to: {}", output_path.display());
        } else {
            print!("{}", String::from_utf8_lossy(&contents));
        }

        Ok(())
    }

    async fn execute_flagged(
        &self,
        mut config: Config,
        job_filter: Option<&str>,
        threshold_hours: Option<u32>,
        commit: Option<CommitSelection>,
        with_details: bool,
    ) -> Result<()> {
        if let Some(job_filter) = job_filter {
            config.flagging.job_filter = Some(job_filter.to_string());
        }
        if let Some(threshold_hours) = threshold_hours {
            config.flagging.threshold_hours = threshold_hours;
        }
        if let Some(commit) = commit {
            config.flagging.commit_selection = commit;
        }

        let threshold_hours = config.flagging.threshold_hours;
        let scanner = Self::scanner(&config)?;

        info!(
            "Flagging jobs failing for more than {threshold_hours}h (filter: {:?})",
            config.flagging.job_filter
        );

        let progress = ScanProgress::start();

        let jobs = scanner
            .client()
            .list_jobs(config.flagging.job_filter.as_deref())
            .await
            .context("Failed to list Jenkins jobs")?;

        let progress = progress.advance(&format!("Listed {} jobs", jobs.len()));

        let report = scanner.scan(jobs).await;
        let flagged = report.flagged();

        let progress = progress.advance(&format!("Evaluated jobs, {} flagged", flagged.len()));

        let failures = if with_details {
            let failures = scanner.failure_details(flagged).await;
            progress.finish("Failure details fetched");
            failures
        } else {
            progress.finish("Failure details skipped");
            Vec::new()
        };

        self.emit(
            &config,
            || render_flag_report(&report, &failures, threshold_hours),
            &FlagReportExport::new(&report, &failures, threshold_hours),
        )
    }

    async fn execute_jobs(&self, config: Config, job_filter: Option<&str>) -> Result<()> {
        let job_filter = job_filter.or(config.flagging.job_filter.as_deref());
        let scanner = Self::scanner(&config)?;

        let jobs = scanner
            .client()
            .list_jobs(job_filter)
            .await
            .context("Failed to list Jenkins jobs")?;

        self.emit(&config, || render_jobs(&jobs), &jobs)
    }

    async fn execute_failure(
        &self,
        mut config: Config,
        job: &str,
        commit: Option<CommitSelection>,
    ) -> Result<()> {
        if let Some(commit) = commit {
            config.flagging.commit_selection = commit;
        }
        let scanner = Self::scanner(&config)?;

        let detail = scanner
            .failure_detail(job)
            .await
            .with_context(|| format!("Failed to summarise last failure of {job}"))?;

        self.emit(&config, || render_failure_detail(&detail), &detail)
    }

    async fn execute_builds(&self, config: Config, job: &str, limit: usize) -> Result<()> {
        let scanner = Self::scanner(&config)?;

        let builds = scanner
            .client()
            .list_builds(job, Some(limit))
            .await
            .with_context(|| format!("Failed to list builds of {job}"))?;

        self.emit(&config, || render_builds(job, &builds), &builds)
    }

    pub async fn execute(&self) -> Result<()> {
        let config = self.resolve_config()?;

        match &self.command {
            Commands::Flagged {
                job_filter,
                threshold_hours,
                commit,
                no_details,
            } => {
                self.execute_flagged(
                    config,
                    job_filter.as_deref(),
                    *threshold_hours,
                    *commit,
                    !*no_details,
                )
                .await
            }
            Commands::Jobs { job_filter } => self.execute_jobs(config, job_filter.as_deref()).await,
            Commands::Failure { job, commit } => self.execute_failure(config, job, *commit).await,
            Commands::Builds { job, limit } => self.execute_builds(config, job, *limit).await,
        }
    }
}
