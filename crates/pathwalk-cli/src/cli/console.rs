//! Console echo of walk progress.

use std::io::Write;
use std::path::Path;

use pathwalk_core::{Outcome, StopReason, WalkListener};

/// Echoes each step before it runs, then the action's message.
pub struct ConsoleListener<W: Write> {
    out: W,
}

impl ConsoleListener<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write> ConsoleListener<W> {
    #[cfg(test)]
    fn new(out: W) -> Self {
        Self { out }
    }

    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        // Write errors on the console are ignored.
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }
}

impl<W: Write> WalkListener for ConsoleListener<W> {
    fn on_step(&mut self, _index: usize, step: &str) {
        self.line(format_args!("ELEMENT: {step}"));
    }

    fn on_outcome(&mut self, _step: &str, outcome: &Outcome) {
        self.line(format_args!("{}", outcome.message()));
    }

    fn on_terminated(&mut self, reason: &StopReason) {
        match reason {
            StopReason::CoverageComplete => {
                self.line(format_args!("The engine reached 100% edge coverage."))
            }
            StopReason::NoMoreSteps => self.line(format_args!("The engine has no next element.")),
            StopReason::LogExhausted => self.line(format_args!("Reached the end of the walk file.")),
            StopReason::ActionFailed { .. } => {}
        }
    }

    fn on_walk_saved(&mut self, path: &Path) {
        self.line(format_args!("Saved the walk to the file: {}", path.display()));
    }
}
