use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{attention, healthy, heading};

const PHASES: [&str; 3] = ["Listing jobs", "Evaluating jobs", "Fetching failure details"];

/// Spinner on stderr that walks through the phases of a flag scan.
///
/// Each phase is consumed when it completes, so phases cannot be skipped
/// or finished twice.
pub struct ScanProgress {
    pb: ProgressBar,
    phase: usize,
}

impl ScanProgress {
    pub fn start() -> Self {
        eprintln!("{}", heading("⚙️", "Phases"));
        Self::begin(0)
    }

    fn begin(phase: usize) -> Self {
        let name = PHASES.get(phase).copied().unwrap_or("Finishing");
        let pb = create_spinner(attention(format!("{} {name}", phase_label(phase))).to_string());
        Self { pb, phase }
    }

    /// Completes the current phase with `summary` and starts the next.
    pub fn advance(self, summary: &str) -> Self {
        self.complete(summary);
        Self::begin(self.phase + 1)
    }

    pub fn finish(self, summary: &str) {
        self.complete(summary);
        eprintln!();
    }

    fn complete(&self, summary: &str) {
        self.pb
            .finish_with_message(healthy(format!("{} {summary} ✓", phase_label(self.phase))).to_string());
    }
}

fn phase_label(phase: usize) -> String {
    format!("Phase {}/{}:", phase + 1, PHASES.len())
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {msg} {spinner}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
