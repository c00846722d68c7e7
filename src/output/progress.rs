use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bright, bright_green, bright_yellow};

/// Progress tracking for the three phases of a statistics run
pub struct PhaseProgress {
    pb: ProgressBar,
    visible: bool,
}

impl PhaseProgress {
    pub fn start_phase_1(visible: bool) -> Self {
        if visible {
            eprintln!("{}  {}", bright("⚙️"), bright("Phases").underlined());
        }
        let pb = create_spinner(
            bright_yellow("Phase 1/3: Fetching pull requests").to_string(),
            visible,
        );
        Self { pb, visible }
    }

    pub fn finish_phase_1_start_phase_2(self, pr_count: usize) -> Self {
        self.pb.finish_with_message(
            bright_green(format!("Phase 1/3: Fetched {pr_count} pull requests ✓")).to_string(),
        );
        let pb = create_spinner(
            bright_yellow("Phase 2/3: Fetching first commits").to_string(),
            self.visible,
        );
        Self { pb, ..self }
    }

    pub fn finish_phase_2_start_phase_3(self, record_count: usize) -> Self {
        self.pb.finish_with_message(
            bright_green(format!("Phase 2/3: Correlated {record_count} pull requests ✓"))
                .to_string(),
        );
        let pb = create_spinner(
            bright_yellow("Phase 3/3: Aggregating lead times").to_string(),
            self.visible,
        );
        Self { pb, ..self }
    }

    pub fn finish_phase_3(self, kept: usize) {
        self.pb.finish_with_message(
            bright_green(format!("Phase 3/3: Aggregated {kept} pull requests ✓")).to_string(),
        );
        if self.visible {
            eprintln!();
        }
    }
}

fn create_spinner(message: String, visible: bool) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if visible {
        pb.set_draw_target(ProgressDrawTarget::stderr());
    } else {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {msg} {spinner}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    if visible {
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
    }
    pb
}
