use std::io::{self, Write};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use mutant_dock::eval::EvalObserver;
use mutant_dock::EvaluationRecord;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

pub struct StepSpinner {
    bar: Option<ProgressBar>,
    start: Instant,
    step: u8,
    total_steps: u8,
    step_start: Instant,
}

impl StepSpinner {
    pub fn new(total_steps: u8) -> Self {
        let now = Instant::now();
        Self {
            bar: None,
            start: now,
            step: 0,
            total_steps,
            step_start: now,
        }
    }

    pub fn step(&mut self, description: &str) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }

        self.step += 1;
        self.step_start = Instant::now();

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars(TICK_CHARS),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        bar.set_message(format!(
            "[{}/{}] {}...",
            self.step, self.total_steps, description
        ));

        self.bar = Some(bar);
    }

    pub fn complete_step(&mut self, description: &str, substeps: &[String]) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }

        let mut stderr = io::stderr().lock();
        let _ = writeln!(
            stderr,
            "  \x1b[32m✓\x1b[0m {:<44} {:>5.1}s",
            description,
            self.step_start.elapsed().as_secs_f64()
        );
        for substep in substeps {
            let _ = writeln!(stderr, "      \x1b[2m·\x1b[0m {}", substep);
        }
    }

    pub fn finish(mut self, label: &str) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
        print_footer(label, self.start.elapsed());
    }
}

fn print_footer(label: &str, elapsed: Duration) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(
        stderr,
        "  \x1b[2m╺━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━╸\x1b[0m"
    );
    let _ = writeln!(stderr);
    let _ = writeln!(
        stderr,
        "  \x1b[32m✓\x1b[0m {:<24} {:>25}",
        label,
        format!("Total: {:.2}s", elapsed.as_secs_f64())
    );
    let _ = writeln!(stderr);
}

/// Step display for the short, single-pair commands.
pub enum Progress {
    Interactive(StepSpinner),
    Silent,
}

impl Progress {
    pub fn new(interactive: bool, total_steps: u8) -> Self {
        if interactive {
            Self::Interactive(StepSpinner::new(total_steps))
        } else {
            Self::Silent
        }
    }

    pub fn step(&mut self, description: &str) {
        if let Self::Interactive(s) = self {
            s.step(description);
        }
    }

    pub fn complete_step(&mut self, description: &str, substeps: &[String]) {
        if let Self::Interactive(s) = self {
            s.complete_step(description, substeps);
        }
    }

    pub fn finish(self, label: &str) {
        if let Self::Interactive(s) = self {
            s.finish(label);
        }
    }
}

/// Row-level progress bar for `evaluate`.
///
/// Failed rows are echoed above the bar as they happen. Does nothing when
/// not interactive; the log covers that case.
pub struct BatchProgress {
    bar: Option<ProgressBar>,
    start: Instant,
}

impl BatchProgress {
    pub fn new(interactive: bool) -> Self {
        let bar = interactive.then(|| {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("  {spinner:.cyan} [{bar:32.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .tick_chars(TICK_CHARS)
                    .progress_chars("━╸ "),
            );
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });
        Self {
            bar,
            start: Instant::now(),
        }
    }

    pub fn finish(self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
            print_footer("Evaluation complete", self.start.elapsed());
        }
    }
}

impl EvalObserver for BatchProgress {
    fn run_started(&self, _batches: usize, rows: usize) {
        if let Some(bar) = &self.bar {
            bar.set_length(rows as u64);
        }
    }

    fn batch_started(&self, batch: usize, candidates: usize) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("batch_{batch} ({} rows)", candidates + 1));
        }
    }

    fn record_finished(&self, record: &EvaluationRecord) {
        if let Some(bar) = &self.bar {
            if record.is_failed() {
                bar.println(format!("  \x1b[31m✗\x1b[0m {} docking failed", record.id));
            }
            bar.inc(1);
        }
    }
}
