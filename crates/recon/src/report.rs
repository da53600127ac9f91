//! Console report text. Pure formatting over an [`Summary`].

use std::fmt::Write as _;

use crate::aggregate::{
    ColumnConcordance, ColumnResponseStats, DiscordanceSummary, Summary, Tally, VerdictTableStats,
};

pub const RULE: &str = "--------------------";
pub const EMPTY_LABEL: &str = "<empty>";

pub fn render_report(summary: &Summary) -> String {
    let mut out = String::new();
    out.push_str(RULE);
    out.push('\n');
    match summary {
        Summary::Default { tables, discordance } => render_default(&mut out, tables, discordance),
        Summary::Generic { tables, columns } => render_generic(&mut out, tables, columns),
    }
    out
}

fn render_default(out: &mut String, tables: &[VerdictTableStats], discordance: &DiscordanceSummary) {
    let width = tables.iter().map(|t| t.table.len()).max().unwrap_or(0);
    for t in tables {
        let _ = writeln!(
            out,
            "{:width$}:  {} verdicts. {}. High confidence for {} of them",
            t.table,
            t.verdicts,
            counts_inline(&t.distribution),
            percent_or_na(t.high_confidence_fraction, 4),
        );
    }

    out.push_str(RULE);
    out.push('\n');
    if discordance.discordant_verdicts > 0 {
        let _ = writeln!(
            out,
            "{} out of {} ({}) of verdicts differed between the two tables",
            discordance.discordant_verdicts,
            discordance.total_rows,
            percent_or_na(discordance.discordant_fraction, 0),
        );
    }
    let _ = writeln!(out, "\nDiscordance score = {}:", discordance.score_sum);
    for t in &discordance.labels {
        let _ = writeln!(out, "{} review comparisons: {}", t.count, display_value(&t.value));
    }
    out.push_str(RULE);
    out.push('\n');
}

fn render_generic(out: &mut String, tables: &[ColumnResponseStats], columns: &[ColumnConcordance]) {
    let width = tables.iter().map(|t| t.table.len()).max().unwrap_or(0);
    for t in tables {
        let _ = writeln!(
            out,
            "{:width$} \"{}\" column had {} responses:  {}",
            t.table,
            display_column(&t.column),
            t.responses,
            counts_inline(&t.distribution),
        );
    }

    for c in columns {
        let _ = writeln!(
            out,
            "{} out of {} ({}) \"{}\" responses agreed between the two tables:",
            c.concordant,
            c.total_rows,
            percent_or_na(c.concordant_fraction, 0),
            display_column(&c.column),
        );
        counts_block(out, &c.concordant_values);
        out.push_str(" \n");
        if c.discordant > 0 {
            let _ = writeln!(
                out,
                "{} out of {} ({}) \"{}\" responses differed between the two tables:",
                c.discordant,
                c.total_rows,
                percent_or_na(c.discordant_fraction, 0),
                display_column(&c.column),
            );
        }
        counts_block(out, &c.discordant_diffs);
    }
    out.push_str(RULE);
    out.push('\n');
}

/// `"3 normal, 1 <empty>"` style list.
fn counts_inline(tallies: &[Tally]) -> String {
    tallies
        .iter()
        .map(|t| format!("{} {}", t.count, display_value(&t.value)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn counts_block(out: &mut String, tallies: &[Tally]) {
    for t in tallies {
        let _ = writeln!(out, "    {} {}", t.count, display_value(&t.value));
    }
}

fn display_value(value: &str) -> &str {
    if value.is_empty() {
        EMPTY_LABEL
    } else {
        value
    }
}

/// Form column names often end in ':'; the report leaves it off.
pub fn display_column(column: &str) -> &str {
    column.trim_matches(':')
}

/// `"42.5%"` with at least `width` characters before the `%`, or `"N/A"`.
pub fn percent_or_na(fraction: Option<f64>, width: usize) -> String {
    match fraction {
        Some(f) => format!("{:width$.1}%", 100.0 * f),
        None => "N/A".to_string(),
    }
}
