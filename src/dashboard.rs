//! Fixed-width terminal dashboard.
//!
//! Rendering is pure: the caller clears the screen and prints the block.

use std::fmt::{self, Write as _};

use crate::{metric::Metric, range::Ranges, reading::Reading};

pub const RULE_WIDTH: usize = 60;
pub const DEFAULT_BAR_WIDTH: usize = 30;
pub const WRAP_WIDTH: usize = 58;

const INDENT: &str = "  ";
const TITLE: &str = "         AVOCADO PLANT MONITORING SYSTEM";

pub fn render(reading: &Reading, ranges: &Ranges, advisory: Option<&str>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_dashboard(&mut out, reading, ranges, advisory);
    out
}

fn write_dashboard(
    out: &mut String,
    reading: &Reading,
    ranges: &Ranges,
    advisory: Option<&str>,
) -> fmt::Result {
    let rule = "=".repeat(RULE_WIDTH);

    writeln!(out, "{rule}")?;
    writeln!(out, "{TITLE}")?;
    writeln!(out, "{rule}")?;
    writeln!(
        out,
        "{INDENT}Last Update: {}",
        reading.timestamp.format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(out, "{rule}")?;
    writeln!(out)?;

    for metric in Metric::ALL {
        let range = ranges.get(metric);
        let value = metric.value(reading);
        let (min, max) = metric.display_domain();

        writeln!(out, "{INDENT}{} {}", metric.heading(), range.classify(value).token())?;
        writeln!(
            out,
            "{INDENT}{value:6.prec$} {unit:<3} {bar}",
            prec = metric.precision(),
            unit = metric.unit(),
            bar = bar(value, min, max, DEFAULT_BAR_WIDTH),
        )?;
        writeln!(out, "{INDENT}Optimal: {range} {}", metric.unit())?;
        writeln!(out)?;
    }

    writeln!(out, "{rule}")?;

    if let Some(text) = advisory.filter(|t| !t.trim().is_empty()) {
        writeln!(out, "{INDENT}AI RECOMMENDATIONS")?;
        writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
        for line in wrap(text, WRAP_WIDTH - INDENT.len()) {
            writeln!(out, "{INDENT}{line}")?;
        }
        writeln!(out, "{rule}")?;
    }

    writeln!(out)?;
    writeln!(out, "{INDENT}Press Ctrl+C to exit")
}

/// Proportional gauge of `value` on the `[min, max]` scale, clamped at both ends.
pub fn bar(value: f64, min: f64, max: f64, width: usize) -> String {
    let normalized = ((value - min) / (max - min)).clamp(0.0, 1.0);
    let filled = ((normalized * width as f64).floor() as usize).min(width);

    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Greedy word wrap. A word longer than `width` gets a line of its own.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let len = line.chars().count();
        if len > 0 && len + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
