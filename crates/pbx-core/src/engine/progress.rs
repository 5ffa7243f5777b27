#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    /// Several steps completed at once, e.g. work items restored from an
    /// earlier run.
    TaskAdvance(u64),
    TaskFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards progress events of a long-running stage to an optional callback,
/// so library code can report progress without knowing how it is displayed.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn reporter_without_callback_ignores_events() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::TaskIncrement);
    }

    #[test]
    fn reporter_forwards_events_in_order() {
        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            let label = match event {
                Progress::PhaseStart { name } => name.to_string(),
                Progress::TaskStart { total_steps } => format!("start {}", total_steps),
                Progress::TaskIncrement => "tick".to_string(),
                Progress::TaskAdvance(n) => format!("advance {}", n),
                other => format!("{:?}", other),
            };
            seen.lock().unwrap().push(label);
        }));

        reporter.report(Progress::PhaseStart { name: "Decompose" });
        reporter.report(Progress::TaskStart { total_steps: 2 });
        reporter.report(Progress::TaskAdvance(3));
        reporter.report(Progress::TaskIncrement);
        drop(reporter);

        assert_eq!(
            seen.into_inner().unwrap(),
            vec!["Decompose", "start 2", "advance 3", "tick"]
        );
    }
}
