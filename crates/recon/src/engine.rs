use std::cmp::Ordering;

use serde::Serialize;

use crate::aggregate::{
    column_concordance, column_response_stats, discordance_summary, verdict_table_stats, Summary,
};
use crate::align::align;
use crate::config::CompareOptions;
use crate::error::ConcordError;
use crate::model::{
    diff_column_name, diff_score_column_name, Cell, ColumnPair, ComparePlan,
    OutputTable, RowScore, ScoredRow, Table, CONFIDENCE_COLUMN, DISCORDANCE_SCORE_COLUMN,
    DISCORDANCE_TEXT_COLUMN, DISCORDANT_VERDICT_COLUMN, VERDICT_COLUMN,
};
use crate::reconcile::{check_overlap, plan_comparison};
use crate::schema::FormSchema;
use crate::score::score_all;

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonMeta {
    pub engine_version: String,
    pub table1: String,
    pub table2: String,
    pub id_column: String,
    pub table1_rows: usize,
    pub table2_rows: usize,
    /// Identifiers present in both tables.
    pub overlap: usize,
    pub combined_rows: usize,
}

/// Result of comparing two reviewer tables: scored rows in final order plus
/// the summary the report is rendered from.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub meta: ComparisonMeta,
    pub plan: ComparePlan,
    pub id_column: String,
    /// Joined column names, identifier excluded.
    pub columns: Vec<String>,
    pub pairs: Vec<ColumnPair>,
    pub rows: Vec<ScoredRow>,
    pub summary: Summary,
}

/// Run the full comparison pipeline on two loaded tables.
pub fn compare(
    table1: &Table,
    table2: &Table,
    options: &CompareOptions,
    schema: Option<&FormSchema>,
) -> Result<Comparison, ConcordError> {
    options.validate()?;

    let overlap = check_overlap(table1, table2)?;
    tracing::debug!(
        table1 = table1.label(),
        table2 = table2.label(),
        overlap,
        "identifier overlap"
    );

    let plan = plan_comparison(table1, table2, schema)?;
    match &plan {
        ComparePlan::Default => tracing::info!("comparing Verdict/Confidence columns"),
        ComparePlan::Generic { columns } => {
            tracing::info!(columns = ?columns, "comparing shared columns")
        }
    }

    let alignment = align(table1, table2, options);
    let id_column = alignment.id_column.clone();
    let columns = alignment.columns.clone();
    let pairs = alignment.pairs.clone();

    let mut rows = score_all(alignment, &plan, options);
    if plan == ComparePlan::Default {
        if let Some(pair) = pairs.iter().find(|p| p.base == VERDICT_COLUMN) {
            let confidence = pairs.iter().find(|p| p.base == CONFIDENCE_COLUMN);
            sort_rows(&mut rows, &pair.left, confidence.map(|p| p.left.as_str()));
        }
    }

    let summary = summarize(table1, table2, &plan, &pairs, &rows, options);

    let meta = ComparisonMeta {
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        table1: table1.label().to_string(),
        table2: table2.label().to_string(),
        id_column: id_column.clone(),
        table1_rows: table1.len(),
        table2_rows: table2.len(),
        overlap,
        combined_rows: rows.len(),
    };
    let comparison = Comparison {
        meta,
        plan,
        id_column,
        columns,
        pairs,
        rows,
        summary,
    };
    tracing::debug!(
        rows = comparison.meta.combined_rows,
        discordant = comparison.discordant_rows(),
        "comparison complete"
    );
    Ok(comparison)
}

fn summarize(
    table1: &Table,
    table2: &Table,
    plan: &ComparePlan,
    pairs: &[ColumnPair],
    rows: &[ScoredRow],
    options: &CompareOptions,
) -> Summary {
    match plan {
        ComparePlan::Default => Summary::Default {
            tables: vec![
                verdict_table_stats(table1, &options.high_confidence),
                verdict_table_stats(table2, &options.high_confidence),
            ],
            discordance: discordance_summary(rows),
        },
        ComparePlan::Generic { columns } => {
            let mut tables = Vec::with_capacity(columns.len() * 2);
            let mut concordance = Vec::with_capacity(columns.len());
            for column in columns {
                tables.push(column_response_stats(table1, column));
                tables.push(column_response_stats(table2, column));
                if let Some(pair) = pairs.iter().find(|p| &p.base == column) {
                    concordance.push(column_concordance(rows, pair));
                }
            }
            Summary::Generic {
                tables,
                columns: concordance,
            }
        }
    }
}

/// Most discordant rows first: descending by score, label, table1 verdict
/// and table1 confidence. Unscored rows go last. Stable, so ties keep
/// identifier order.
pub fn sort_rows(rows: &mut [ScoredRow], verdict1: &str, confidence1: Option<&str>) {
    rows.sort_by(|a, b| match (a.discordance(), b.discordance()) {
        (Some(da), Some(db)) => db
            .score
            .cmp(&da.score)
            .then_with(|| db.label.as_str().cmp(da.label.as_str()))
            .then_with(|| b.row.get(verdict1).as_text().cmp(&a.row.get(verdict1).as_text()))
            .then_with(|| match confidence1 {
                Some(c) => b.row.get(c).as_text().cmp(&a.row.get(c).as_text()),
                None => Ordering::Equal,
            }),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

impl Comparison {
    /// Rows whose verdicts differ (default) or with any differing column (generic).
    pub fn discordant_rows(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| match &r.score {
                RowScore::Verdict(d) => d.as_ref().is_some_and(|d| d.discordant_verdict),
                RowScore::Columns(diffs) => diffs.iter().any(|d| d.is_discordant()),
            })
            .count()
    }

    pub fn output_headers(&self) -> Vec<String> {
        let mut headers = Vec::with_capacity(self.columns.len() + 3);
        headers.push(self.id_column.clone());
        headers.extend(self.columns.iter().cloned());
        match &self.plan {
            ComparePlan::Default => {
                headers.push(DISCORDANT_VERDICT_COLUMN.to_string());
                headers.push(DISCORDANCE_SCORE_COLUMN.to_string());
                headers.push(DISCORDANCE_TEXT_COLUMN.to_string());
            }
            ComparePlan::Generic { columns } => {
                for c in columns {
                    headers.push(diff_column_name(c));
                    headers.push(diff_score_column_name(c));
                }
            }
        }
        headers
    }

    /// Combined table: identifier, joined columns, derived columns.
    pub fn to_output_table(&self) -> OutputTable {
        let rows = self
            .rows
            .iter()
            .map(|scored| {
                let mut cells = Vec::with_capacity(self.columns.len() + 3);
                cells.push(Cell::text(scored.row.id.clone()));
                cells.extend(self.columns.iter().map(|c| scored.row.get(c).clone()));
                match &scored.score {
                    RowScore::Verdict(Some(d)) => {
                        cells.push(Cell::Int(i64::from(d.discordant_verdict)));
                        cells.push(Cell::Int(i64::from(d.score)));
                        cells.push(Cell::text(d.label.as_str()));
                    }
                    RowScore::Verdict(None) => {
                        cells.extend([Cell::Empty, Cell::Empty, Cell::Empty]);
                    }
                    RowScore::Columns(diffs) => {
                        for d in diffs {
                            cells.push(Cell::text(d.diff.clone()));
                            cells.push(Cell::Int(i64::from(d.score)));
                        }
                    }
                }
                cells
            })
            .collect();

        OutputTable {
            headers: self.output_headers(),
            rows,
        }
    }
}
