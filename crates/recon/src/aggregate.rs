use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{
    ColumnPair, ScoredRow, Table, CONFIDENCE_COLUMN, VERDICT_COLUMN,
};

/// Count of one distinct value. `value == ""` stands for empty cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub value: String,
    pub count: usize,
}

/// Count distinct values, sorted by value.
pub fn tally<I, S>(values: I) -> Vec<Tally>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v.as_ref().to_string()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(value, count)| Tally { value, count })
        .collect()
}

/// `part / whole`, or `None` when `whole` is zero.
pub fn fraction(part: usize, whole: usize) -> Option<f64> {
    if whole == 0 {
        None
    } else {
        Some(part as f64 / whole as f64)
    }
}

// ---------------------------------------------------------------------------
// Default schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerdictTableStats {
    pub table: String,
    /// Rows with a non-empty verdict.
    pub verdicts: usize,
    pub distribution: Vec<Tally>,
    /// Verdict rows whose confidence is the high marker.
    pub high_confidence: usize,
    /// `None` when the table has no verdicts.
    pub high_confidence_fraction: Option<f64>,
}

pub fn verdict_table_stats(table: &Table, high_confidence: &str) -> VerdictTableStats {
    let mut verdicts = 0;
    let mut high = 0;
    for row in table.rows() {
        if row.get(VERDICT_COLUMN).is_present() {
            verdicts += 1;
            if row.get(CONFIDENCE_COLUMN).as_text() == high_confidence {
                high += 1;
            }
        }
    }

    VerdictTableStats {
        table: table.label().to_string(),
        verdicts,
        distribution: tally(table.column_values(VERDICT_COLUMN).map(|c| c.as_text())),
        high_confidence: high,
        high_confidence_fraction: fraction(high, verdicts),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscordanceSummary {
    pub total_rows: usize,
    /// Rows where both verdicts were present.
    pub scored_rows: usize,
    pub discordant_verdicts: usize,
    /// Share of all combined rows with a discordant verdict.
    pub discordant_fraction: Option<f64>,
    pub score_sum: u64,
    /// Label counts; unscored rows are counted under `""`.
    pub labels: Vec<Tally>,
}

pub fn discordance_summary(rows: &[ScoredRow]) -> DiscordanceSummary {
    let mut scored = 0;
    let mut discordant = 0;
    let mut score_sum = 0u64;
    let mut labels = Vec::with_capacity(rows.len());

    for row in rows {
        match row.discordance() {
            Some(d) => {
                scored += 1;
                if d.discordant_verdict {
                    discordant += 1;
                }
                score_sum += u64::from(d.score);
                labels.push(d.label.as_str());
            }
            None => labels.push(""),
        }
    }

    DiscordanceSummary {
        total_rows: rows.len(),
        scored_rows: scored,
        discordant_verdicts: discordant,
        discordant_fraction: fraction(discordant, rows.len()),
        score_sum,
        labels: tally(labels),
    }
}

// ---------------------------------------------------------------------------
// Generic schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnResponseStats {
    pub table: String,
    pub column: String,
    /// Rows with a non-empty value in `column`.
    pub responses: usize,
    pub distribution: Vec<Tally>,
}

pub fn column_response_stats(table: &Table, column: &str) -> ColumnResponseStats {
    ColumnResponseStats {
        table: table.label().to_string(),
        column: column.to_string(),
        responses: table.column_values(column).filter(|c| c.is_present()).count(),
        distribution: tally(table.column_values(column).map(|c| c.as_text())),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnConcordance {
    pub column: String,
    pub total_rows: usize,
    pub concordant: usize,
    pub discordant: usize,
    pub concordant_fraction: Option<f64>,
    pub discordant_fraction: Option<f64>,
    /// Table1-side values of the agreeing rows.
    pub concordant_values: Vec<Tally>,
    /// Diff strings of the disagreeing rows.
    pub discordant_diffs: Vec<Tally>,
}

pub fn column_concordance(rows: &[ScoredRow], pair: &ColumnPair) -> ColumnConcordance {
    let mut agreed = Vec::new();
    let mut differed = Vec::new();

    for row in rows {
        let Some(diff) = row.column_diff(&pair.base) else {
            continue;
        };
        if diff.is_discordant() {
            differed.push(diff.diff.clone());
        } else {
            agreed.push(row.row.get(&pair.left).as_text().into_owned());
        }
    }

    ColumnConcordance {
        column: pair.base.clone(),
        total_rows: rows.len(),
        concordant: agreed.len(),
        discordant: differed.len(),
        concordant_fraction: fraction(agreed.len(), rows.len()),
        discordant_fraction: fraction(differed.len(), rows.len()),
        concordant_values: tally(agreed),
        discordant_diffs: tally(differed),
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "schema")]
pub enum Summary {
    Default {
        tables: Vec<VerdictTableStats>,
        discordance: DiscordanceSummary,
    },
    Generic {
        tables: Vec<ColumnResponseStats>,
        columns: Vec<ColumnConcordance>,
    },
}
