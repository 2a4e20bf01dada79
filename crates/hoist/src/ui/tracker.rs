use std::sync::Arc;

use hoist_fetch::{FetchPhase, Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;

const PB_STYLE: &str = "{spinner:.blue} {prefix:>12.cyan.bold} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta}) {wide_msg}";

const SPINNER_STYLE: &str = "{spinner:.blue} {prefix:>12.cyan.bold} [{elapsed_precise}] {wide_msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

static PB_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    let pb_style = match ProgressStyle::with_template(PB_STYLE) {
        Ok(pb_style) => pb_style.tick_chars(TICK).progress_chars(PB_CHARS),
        Err(_) => return None,
    };

    Some(pb_style)
});

static SPINNER_TEMPLATE: Lazy<Option<ProgressStyle>> =
    Lazy::new(|| ProgressStyle::with_template(SPINNER_STYLE).ok().map(|s| s.tick_chars(TICK)));

/// Terminal rendering of download progress.
#[derive(Clone)]
pub struct ProgressTracker {
    pb: ProgressBar,
    finish: Option<String>,
}

impl ProgressTracker {
    /// Apply one progress snapshot.
    pub fn update(&self, progress: &Progress) {
        match progress.phase {
            FetchPhase::Connecting => {
                self.pb.enable_steady_tick(std::time::Duration::from_millis(100));
                self.pb.set_message("connecting");
            }
            FetchPhase::Downloading => {
                if let Some(total) = progress.total_bytes
                    && self.pb.length() != Some(total)
                {
                    self.pb.set_length(total);
                    if let Some(style) = PB_TEMPLATE.as_ref() {
                        self.pb.set_style(style.clone());
                    }
                }
                self.pb.set_position(progress.bytes_downloaded);
                self.pb.set_message("");
            }
            FetchPhase::Extracting => self.pb.set_message("extracting"),
            FetchPhase::Completed => self.finish(),
        }
    }

    /// Callback that forwards fetch progress to this tracker.
    pub fn callback(&self) -> ProgressCallback {
        let tracker = self.clone();
        Arc::new(move |progress: &Progress| tracker.update(progress))
    }

    pub fn finish(&self) {
        match &self.finish {
            Some(msg) => self.pb.finish_with_message(msg.clone()),
            None => self.pb.finish(),
        }
    }

    /// Remove the bar without a final message, e.g. on failure.
    pub fn abandon(&self) {
        if !self.pb.is_finished() {
            self.pb.finish_and_clear();
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgressTrackerBuilder {
    prefix: Option<String>,
    finish: Option<String>,
    hidden: bool,
}

impl ProgressTrackerBuilder {
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    pub fn with_finish(mut self, finish: &str) -> Self {
        self.finish = Some(finish.to_string());
        self
    }

    /// Draw nothing; used when stderr is not a terminal worth drawing on.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn build(self) -> ProgressTracker {
        let pb = if self.hidden {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        let pb = if let Some(style) = SPINNER_TEMPLATE.as_ref() {
            pb.with_style(style.clone())
        } else {
            pb
        };

        if let Some(prefix) = self.prefix {
            pb.set_prefix(prefix);
        }
        ProgressTracker {
            pb,
            finish: self.finish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_fetch_phases() {
        let tracker = ProgressTrackerBuilder::default()
            .with_prefix("download")
            .with_finish("done")
            .hidden(true)
            .build();
        let callback = tracker.callback();

        callback(&Progress::new(FetchPhase::Connecting, 0, None));
        callback(&Progress::new(FetchPhase::Downloading, 512, Some(2048)));
        assert_eq!(tracker.pb.length(), Some(2048));
        assert_eq!(tracker.pb.position(), 512);

        callback(&Progress::new(FetchPhase::Extracting, 2048, Some(2048)));
        callback(&Progress::new(FetchPhase::Completed, 2048, Some(2048)));
        assert!(tracker.pb.is_finished());
    }
}
