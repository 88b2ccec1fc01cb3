//! Console progress reporting for streaming transfers
//!
//! Reporting is purely observational: a handle that cannot render (no
//! terminal, disabled output) degrades to a hidden or simplified indicator
//! and never affects the transfer itself.

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};

/// Columns consumed by the counters around the bar itself
const BAR_OVERHEAD: usize = 25;

/// Smallest bar the reporter will render
const MIN_BAR_WIDTH: usize = 10;

const PB_CHARS: &str = "█▓▒░  ";

/// Live progress handle for one transfer
///
/// Wraps an `indicatif` bar sized to the current terminal: bar width is the
/// terminal width minus the indent and the fixed counter overhead, floored at
/// a readable minimum. Without an obtainable width the handle falls back to a
/// plain byte counter, and with progress disabled it is hidden entirely.
pub struct TransferProgress {
    bar: ProgressBar,
}

impl TransferProgress {
    /// Start reporting one transfer
    ///
    /// # Arguments
    ///
    /// * `total` - Expected byte count, when the server advertised one
    /// * `indent` - Leading columns to inset the output by
    /// * `enabled` - Render nothing at all when false
    pub fn start(total: Option<u64>, indent: usize, enabled: bool) -> Self {
        if !enabled {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = match total {
            Some(len) => ProgressBar::new(len),
            None => ProgressBar::no_length(),
        };
        bar.set_style(style_for(total.is_some(), indent));
        Self { bar }
    }

    /// Record `n` more transferred bytes
    pub fn advance(&self, n: u64) {
        self.bar.inc(n);
    }

    /// Complete the display
    pub fn finish(&self) {
        self.bar.finish();
    }

    #[cfg(test)]
    fn inner(&self) -> &ProgressBar {
        &self.bar
    }
}

/// Print the single pre-flight line used when a transfer is delegated to the
/// external accelerator (which renders no console output of its own)
pub fn announce(label: &str, indent: usize) {
    println!("{:indent$}Downloading {label}", "");
}

/// Pick a template for the current terminal
///
/// A known total and an obtainable terminal width yield a full bar; otherwise
/// the output degrades to a byte counter without a computed-width bar.
fn style_for(has_total: bool, indent: usize) -> ProgressStyle {
    let pad = " ".repeat(indent);
    let template = match (has_total, terminal_columns()) {
        (true, Some(columns)) => {
            let width = bar_width(columns, indent);
            format!("{pad}{{bar:{width}.cyan/blue}} {{bytes}}/{{total_bytes}} ({{bytes_per_sec}}, {{eta}})")
        }
        (true, None) => format!("{pad}{{bytes}}/{{total_bytes}} ({{bytes_per_sec}})"),
        (false, _) => format!("{pad}{{bytes}} ({{bytes_per_sec}})"),
    };

    match ProgressStyle::with_template(&template) {
        Ok(style) => style.progress_chars(PB_CHARS),
        Err(_) => ProgressStyle::default_bar(),
    }
}

fn terminal_columns() -> Option<usize> {
    // size_checked is None when stdout is not attached to a terminal
    Term::stdout()
        .size_checked()
        .map(|(_rows, columns)| columns as usize)
}

/// Usable bar width for a terminal of `columns`, floored at [`MIN_BAR_WIDTH`]
fn bar_width(columns: usize, indent: usize) -> usize {
    columns
        .saturating_sub(indent)
        .saturating_sub(BAR_OVERHEAD)
        .max(MIN_BAR_WIDTH)
}
