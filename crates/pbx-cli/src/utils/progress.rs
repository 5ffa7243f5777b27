use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use pbxscreen::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 100;

/// Renders core progress events as a single spinner or bar on stderr.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr())
            .with_style(Self::spinner_style());
        pb.finish_and_clear();
        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    /// A handler that tracks state without drawing anything, for `--quiet`.
    pub fn hidden() -> Self {
        let pb = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::hidden());
        pb.finish_and_clear();
        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(bar) = pb.lock() else {
                warn!("Progress bar mutex was poisoned; dropping progress event");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    bar.reset();
                    bar.set_length(0);
                    bar.set_style(Self::spinner_style());
                    bar.set_prefix(name);
                    bar.set_message("");
                    bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                }
                Progress::PhaseFinish => {
                    bar.disable_steady_tick();
                    bar.finish_with_message("done");
                }
                Progress::TaskStart { total_steps } => {
                    bar.disable_steady_tick();
                    bar.reset();
                    bar.set_length(total_steps);
                    bar.set_style(Self::bar_style());
                }
                Progress::TaskIncrement => bar.inc(1),
                Progress::TaskAdvance(steps) => bar.inc(steps),
                Progress::TaskFinish => {
                    let total = bar.length().unwrap_or(0);
                    if bar.position() < total {
                        bar.set_position(total);
                    }
                    bar.finish();
                }
                Progress::Message(msg) => {
                    if bar.is_finished() {
                        bar.set_message(msg);
                    } else {
                        bar.println(format!("  {}", msg));
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {prefix:.bold} {msg}")
            .expect("spinner template is valid")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{prefix:<12.bold} [{bar:40.cyan/blue}] {pos}/{len} keys ({elapsed}, {eta})",
        )
        .expect("bar template is valid")
        .with_key("eta", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
            let _ = write!(w, "eta {:.0}s", state.eta().as_secs_f64());
        })
        .progress_chars("=> ")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
