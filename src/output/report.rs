use std::fmt::Write;

use comfy_table::{Cell, Color as TableColor};

use crate::model::{BuildRecord, FailureDetail, Job};
use crate::scanner::{FailureLookup, ScanReport};

use super::styling::{accent, attention, flag_count, healthy, heading, muted};
use super::tables::{
    color_coded_job_cell, color_coded_result_cell, create_cyan_header, create_table,
};

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{}", heading(emoji, title));
}

/// Renders the outcome of a flag scan.
///
/// Sections:
/// - Overview: counts of flagged, healthy and unknown jobs
/// - Flagged Jobs: one row per flagged job with its failure attribution
/// - Unresolved Jobs: jobs whose records could not be fetched, with the error
pub fn render_flag_report(
    report: &ScanReport,
    failures: &[FailureLookup],
    threshold_hours: u32,
) -> String {
    let mut output = String::new();
    let flagged = report.flagged();
    let unknown = report.unknown();

    add_section_header(&mut output, "📊", "Overview");

    let _ = writeln!(
        output,
        "  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n",
        muted("Jobs evaluated:"),
        attention(report.evaluations.len()),
        muted("Threshold:"),
        accent(format!("{threshold_hours}h")),
        muted("Flagged:"),
        flag_count(flagged.len()),
        muted("Unknown:"),
        attention(unknown.len()),
        muted("Evaluated at:"),
        muted(report.evaluated_at.format("%Y-%m-%d %H:%M UTC")),
    );

    if flagged.is_empty() {
        let _ = writeln!(output, "{}\n", healthy("No jobs flagged."));
    } else {
        add_section_header(&mut output, "🚨", "Flagged Jobs");

        let mut table = create_table();
        table.set_header(create_cyan_header(&[
            "Job", "Repo", "Build", "Date", "Duration", "Commit", "Author", "Comment",
        ]));

        for job in &flagged {
            let lookup = failures.iter().find(|lookup| lookup.job.name == job.name);
            table.add_row(flagged_row(job, lookup));
        }

        let _ = writeln!(output, "{table}\n");
    }

    if !unknown.is_empty() {
        add_section_header(&mut output, "❓", "Unresolved Jobs");

        let mut table = create_table();
        table.set_header(create_cyan_header(&["Job", "Error"]));
        for (job, err) in unknown {
            table.add_row(vec![
                Cell::new(&job.name),
                Cell::new(err.to_string()).fg(TableColor::Yellow),
            ]);
        }

        let _ = writeln!(output, "{table}\n");
    }

    output
}

fn flagged_row(job: &Job, lookup: Option<&FailureLookup>) -> Vec<Cell> {
    match lookup.map(|lookup| &lookup.detail) {
        Some(Ok(detail)) => vec![
            Cell::new(&job.name).fg(TableColor::Red),
            Cell::new(&detail.repo_name),
            Cell::new(format!("#{}", detail.build_details.number)),
            Cell::new(&detail.build_details.date),
            Cell::new(&detail.build_details.duration),
            Cell::new(&detail.commit_details.commit_url),
            Cell::new(&detail.commit_details.author),
            Cell::new(first_line(&detail.commit_details.comment)),
        ],
        Some(Err(err)) => {
            let mut row = vec![
                Cell::new(&job.name).fg(TableColor::Red),
                Cell::new(err.to_string()).fg(TableColor::DarkGrey),
            ];
            row.extend(vec![Cell::new(""); 6]);
            row
        }
        None => {
            let mut row = vec![Cell::new(&job.name).fg(TableColor::Red)];
            row.extend(vec![Cell::new(""); 7]);
            row
        }
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

pub fn render_jobs(jobs: &[Job]) -> String {
    let mut output = String::new();
    add_section_header(&mut output, "📋", "Jobs");

    if jobs.is_empty() {
        let _ = writeln!(output, "{}", attention("No jobs found."));
        return output;
    }

    let mut table = create_table();
    table.set_header(create_cyan_header(&["Job", "Status", "URL"]));
    for job in jobs {
        table.add_row(vec![
            Cell::new(&job.name),
            color_coded_job_cell(job.color.as_deref()),
            Cell::new(job.url.as_deref().unwrap_or("")),
        ]);
    }

    let _ = writeln!(output, "{table}");
    output
}

pub fn render_builds(job_name: &str, builds: &[BuildRecord]) -> String {
    let mut output = String::new();
    add_section_header(&mut output, "🔨", &format!("Builds of {job_name}"));

    if builds.is_empty() {
        let _ = writeln!(output, "{}", attention("No builds found."));
        return output;
    }

    let mut table = create_table();
    table.set_header(create_cyan_header(&["Build", "Result", "Date", "Duration", "URL"]));
    for build in builds {
        table.add_row(vec![
            Cell::new(format!("#{}", build.number)),
            color_coded_result_cell(build.result.as_ref()),
            Cell::new(crate::evaluator::format_build_date(build.timestamp)),
            Cell::new(crate::evaluator::format_duration(build.duration_ms)),
            Cell::new(&build.url),
        ]);
    }

    let _ = writeln!(output, "{table}");
    output
}

pub fn render_failure_detail(detail: &FailureDetail) -> String {
    let mut output = String::new();
    add_section_header(&mut output, "🔥", &format!("Last failure of {}", detail.job));

    let _ = writeln!(
        output,
        "  {} {}\n  {} #{} {}\n  {} {} ({})\n  {} {}\n  {} {}\n  {} {}",
        muted("Repository:"),
        accent(&detail.repo_name),
        muted("Build:"),
        detail.build_details.number,
        muted(&detail.build_details.url),
        muted("Date:"),
        detail.build_details.date,
        detail.build_details.duration,
        muted("Commit:"),
        attention(&detail.commit_details.commit_id),
        muted("Author:"),
        detail.commit_details.author,
        muted("Link:"),
        detail.commit_details.commit_url,
    );

    let _ = writeln!(output, "\n{}", first_line(&detail.commit_details.comment));
    output
}
