//! Stage-level progress reporting on stderr for the CLI binaries.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::{Duration, Instant};

pub struct Ui {
    pretty: bool,
}

impl Ui {
    /// `mode` is `pretty`, `plain`, or anything else for auto (pretty only
    /// when stderr is a terminal).
    pub fn new(mode: &str, stderr_is_tty: bool) -> Self {
        let pretty = match mode {
            "pretty" => true,
            "plain" => false,
            _ => stderr_is_tty,
        };
        Self { pretty }
    }

    pub fn stage(&self, name: &str) -> StageGuard {
        let spinner = if self.pretty {
            let bar = ProgressBar::new_spinner();
            bar.set_draw_target(ProgressDrawTarget::stderr());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar.set_style(
                ProgressStyle::with_template("{spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.set_message(format!("{name}…"));
            Some(bar)
        } else {
            eprintln!("==> {name}");
            None
        };
        StageGuard {
            name: name.to_string(),
            start: Instant::now(),
            spinner,
        }
    }
}

pub struct StageGuard {
    name: String,
    start: Instant,
    spinner: Option<ProgressBar>,
}

impl Drop for StageGuard {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        let elapsed = if elapsed.as_secs() >= 1 {
            format!("{:.2}s", elapsed.as_secs_f64())
        } else {
            format!("{}ms", elapsed.as_millis())
        };
        let message = format!("✔ {} ({elapsed})", self.name);
        match &self.spinner {
            Some(spinner) => spinner.finish_with_message(message),
            None => eprintln!("{message}"),
        }
    }
}
