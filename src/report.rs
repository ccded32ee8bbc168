//! Markdown report and run diagnostics

use std::io::{self, Write};

use crate::stats::Summary;

/// Width of the value column for a run over `total_bytes` of input
pub fn value_width(total_bytes: u64) -> usize {
    if total_bytes == 0 {
        return 5;
    }
    let estimate = ((total_bytes as f64).log10() * 1.3 + 1.0).floor();
    (estimate as usize).max(5)
}

/// Write the metrics table
pub fn write_report<W: Write>(out: &mut W, summary: &Summary) -> io::Result<()> {
    let metrics = &summary.metrics;
    let width = value_width(summary.total_bytes);

    writeln!(out, "# srcfacts: {}", metrics.url)?;
    writeln!(out, "| Measure      | {:>width$} |", "Value")?;
    writeln!(out, "|:-------------|-{}:|", "-".repeat(width))?;
    for (label, value) in [
        ("Characters", metrics.text_size),
        ("LOC", metrics.loc),
        ("Files", summary.files),
        ("Classes", metrics.classes),
        ("Functions", metrics.functions),
        ("Declarations", metrics.declarations),
        ("Expressions", metrics.expressions),
        ("Comments", metrics.comments),
    ] {
        writeln!(out, "| {:<13}| {:>width$} |", label, group_thousands(value))?;
    }
    out.flush()
}

/// Write throughput figures, preceded by a blank line
pub fn write_diagnostics<W: Write>(out: &mut W, summary: &Summary) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{} bytes", group_thousands(summary.total_bytes))?;
    writeln!(out, "{} sec", format_significant(summary.elapsed.as_secs_f64(), 3))?;
    writeln!(out, "{} MLOC/sec", format_significant(summary.mloc_per_sec, 3))?;
    if let Some(peak) = summary.peak_memory {
        writeln!(out, "{} bytes peak heap", group_thousands(peak as u64))?;
    }
    out.flush()
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Shortest rendering with `precision` significant digits, like C's `%g`
pub fn format_significant(value: f64, precision: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }
    let precision = precision.max(1);

    // Exponent after rounding to the requested digits
    let scientific = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}
