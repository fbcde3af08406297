//! Terminal progress for pipeline phases.

use crate::progress::ProgressSink;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::io::IsTerminal;
use std::time::Duration;

/// Spinner (or bar, when the phase has a known size) on stderr.
///
/// Bars are only drawn on an interactive terminal without `NO_COLOR` or
/// `SENTIAL_NO_PROGRESS`. Completion lines print whenever `enabled`.
pub struct TerminalProgress {
    enabled: bool,
    animate: bool,
    bar: RefCell<Option<ProgressBar>>,
}

impl TerminalProgress {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            animate: enabled && is_interactive(),
            bar: RefCell::new(None),
        }
    }

    fn clear(&self) {
        if let Some(bar) = self.bar.borrow_mut().take() {
            bar.finish_and_clear();
        }
    }
}

impl ProgressSink for TerminalProgress {
    fn on_start(&self, message: &str, total: Option<u64>) {
        self.clear();
        if !self.animate {
            return;
        }

        let bar = match total {
            Some(len) => {
                let bar = ProgressBar::new(len);
                let template = "{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len}";
                if let Ok(bar_style) = ProgressStyle::with_template(template) {
                    bar.set_style(bar_style.progress_chars("=> "));
                }
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                if let Ok(spinner_style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
                    bar.set_style(spinner_style);
                }
                bar
            }
        };
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        *self.bar.borrow_mut() = Some(bar);
    }

    fn on_advance(&self, delta: u64) {
        if let Some(bar) = self.bar.borrow().as_ref() {
            bar.inc(delta);
        }
    }

    fn on_complete(&self, message: &str) {
        self.clear();
        if self.enabled {
            eprintln!("{} {}", style("✔").green(), message);
        }
    }
}

impl Drop for TerminalProgress {
    fn drop(&mut self) {
        self.clear();
    }
}

fn is_interactive() -> bool {
    std::io::stderr().is_terminal()
        && std::env::var_os("NO_COLOR").is_none()
        && std::env::var_os("SENTIAL_NO_PROGRESS").is_none()
}
