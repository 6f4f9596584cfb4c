//! Flags Jenkins jobs that have been failing for longer than a tolerated
//! threshold and attributes their last failure to a commit.
//!
//! The decision logic in [`evaluator`] is pure; [`scanner::FlagScanner`] fans
//! requests out over any [`ci::CiClient`], such as
//! [`providers::jenkins::JenkinsClient`].

pub mod auth;
pub mod ci;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod output;
pub mod providers;
pub mod scanner;

pub use ci::CiClient;
pub use error::{BuildFlagError, Result};
pub use evaluator::{BuildStatusEvaluator, CommitSelection, FlagThreshold};
pub use scanner::{FlagScanner, ScanReport};
