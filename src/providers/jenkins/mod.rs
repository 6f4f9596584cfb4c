mod client;
mod types;

pub use client::{
    ClientOptions, JenkinsClient, DEFAULT_MAX_CONCURRENT_REQUESTS, DEFAULT_TIMEOUT_SECONDS,
};
