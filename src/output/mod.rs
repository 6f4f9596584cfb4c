mod exports;
mod progress;
mod report;
mod styling;
mod tables;

pub use exports::{export_json, FlagReportExport};
pub use progress::ScanProgress;
pub use report::{render_builds, render_failure_detail, render_flag_report, render_jobs};
use styling::{brand, muted};

/// Prints the buildflag banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        brand("🚩 buildflag"),
        muted(env!("CARGO_PKG_VERSION")),
        muted("Jenkins failure flagging")
    );
}
