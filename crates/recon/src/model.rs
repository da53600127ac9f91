use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::error::ConcordError;

pub const VERDICT_COLUMN: &str = "Verdict";
pub const CONFIDENCE_COLUMN: &str = "Confidence";

pub const DISCORDANT_VERDICT_COLUMN: &str = "Discordant Verdict";
pub const DISCORDANCE_SCORE_COLUMN: &str = "Discordance Score";
pub const DISCORDANCE_TEXT_COLUMN: &str = "Discordance Text";

/// Raw values treated as missing, matching what spreadsheet tools export for NA.
pub const NA_MARKERS: &[&str] = &["", "NA", "N/A", "n/a", "NaN", "nan", "NULL", "null", "#N/A", "<NA>"];

/// Name given to a blank header cell at 0-based position `index`.
pub fn unnamed_column(index: usize) -> String {
    format!("Unnamed: {index}")
}

pub fn diff_column_name(column: &str) -> String {
    format!("{column} diff")
}

pub fn diff_score_column_name(column: &str) -> String {
    format!("{column} diff score")
}

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A single table value. Inputs only produce `Empty` or `Text`; `Int` is
/// reserved for derived numeric columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Int(i64),
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    /// Normalize a raw input value. NA markers become `Empty`.
    pub fn from_raw(raw: &str) -> Self {
        if NA_MARKERS.contains(&raw) {
            Cell::Empty
        } else {
            Cell::Text(raw.to_string())
        }
    }

    /// Text cell, except `""` which is `Empty`.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value)
        }
    }

    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Cell::Empty => Cow::Borrowed(""),
            Cell::Text(s) => Cow::Borrowed(s.as_str()),
            Cell::Int(n) => Cow::Owned(n.to_string()),
        }
    }

    /// "Truthy" in the reviewer-table sense: anything but the empty value.
    pub fn is_present(&self) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Text(s) => !s.is_empty(),
            Cell::Int(_) => true,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Cell::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

// ---------------------------------------------------------------------------
// Input tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Row {
    pub id: String,
    pub cells: HashMap<String, Cell>,
}

impl Row {
    /// Value of `column`, `Empty` when the row has no such column.
    pub fn get(&self, column: &str) -> &Cell {
        self.cells.get(column).unwrap_or(&EMPTY_CELL)
    }
}

/// One reviewer table, keyed by its identifier column.
#[derive(Debug, Clone)]
pub struct Table {
    label: String,
    id_column: String,
    columns: Vec<String>,
    rows: Vec<Row>,
    index: HashMap<String, usize>,
}

impl Table {
    /// Build a table from a header and raw string records.
    ///
    /// Short records are padded with empty cells; extra trailing fields are
    /// dropped. Blank header cells are named `Unnamed: <index>`. Fails when the identifier column is missing, a header repeats,
    /// there are no records, or an identifier is empty or duplicated.
    pub fn from_records(
        label: impl Into<String>,
        id_column: &str,
        headers: Vec<String>,
        records: Vec<Vec<String>>,
    ) -> Result<Self, ConcordError> {
        let label = label.into();
        let headers: Vec<String> = headers
            .into_iter()
            .enumerate()
            .map(|(i, h)| {
                if h.trim().is_empty() {
                    unnamed_column(i)
                } else {
                    h
                }
            })
            .collect();

        let mut seen = HashSet::new();
        for h in &headers {
            if !seen.insert(h.as_str()) {
                return Err(ConcordError::DuplicateColumn {
                    table: label,
                    column: h.clone(),
                });
            }
        }

        let id_idx = headers.iter().position(|h| h == id_column).ok_or_else(|| {
            ConcordError::MissingIdentifierColumn {
                table: label.clone(),
                column: id_column.to_string(),
            }
        })?;

        if records.is_empty() {
            return Err(ConcordError::EmptyTable { table: label });
        }

        let columns: Vec<String> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != id_idx)
            .map(|(_, h)| h.clone())
            .collect();

        let mut rows = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());

        for (row_no, record) in records.into_iter().enumerate() {
            let id = record.get(id_idx).map(String::as_str).unwrap_or("");
            if Cell::from_raw(id) == Cell::Empty {
                return Err(ConcordError::EmptyIdentifier {
                    table: label,
                    column: id_column.to_string(),
                    row: row_no + 1,
                });
            }
            let id = id.to_string();
            if index.contains_key(&id) {
                return Err(ConcordError::DuplicateIdentifier {
                    table: label,
                    column: id_column.to_string(),
                    id,
                });
            }

            let mut cells = HashMap::with_capacity(headers.len());
            for (i, h) in headers.iter().enumerate() {
                if i == id_idx {
                    continue;
                }
                let raw = record.get(i).map(String::as_str).unwrap_or("");
                cells.insert(h.clone(), Cell::from_raw(raw));
            }

            index.insert(id.clone(), rows.len());
            rows.push(Row { id, cells });
        }

        Ok(Self {
            label,
            id_column: id_column.to_string(),
            columns,
            rows,
            index,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    /// Non-identifier columns, in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false for a successfully built table.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Row> {
        self.index.get(id).map(|&i| &self.rows[i])
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.id.as_str())
    }

    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Cell> + 'a {
        self.rows.iter().map(move |r| r.get(column))
    }
}

// ---------------------------------------------------------------------------
// Column reconciliation
// ---------------------------------------------------------------------------

/// Which columns get scored, decided from the two tables' headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "schema")]
pub enum ComparePlan {
    /// Verdict/Confidence(/Notes) form tables.
    Default,
    /// Arbitrary shared columns compared by plain equality.
    Generic { columns: Vec<String> },
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

/// Output names of a column present in both tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPair {
    pub base: String,
    pub left: String,
    pub right: String,
}

/// One row of the outer join. Cells are keyed by output column name.
#[derive(Debug, Clone)]
pub struct JoinedRow {
    pub id: String,
    pub cells: HashMap<String, Cell>,
    pub in_left: bool,
    pub in_right: bool,
}

impl JoinedRow {
    pub fn get(&self, column: &str) -> &Cell {
        self.cells.get(column).unwrap_or(&EMPTY_CELL)
    }
}

#[derive(Debug, Clone)]
pub struct Alignment {
    pub id_column: String,
    /// Joined column names, identifier excluded.
    pub columns: Vec<String>,
    pub pairs: Vec<ColumnPair>,
    pub rows: Vec<JoinedRow>,
}

impl Alignment {
    pub fn pair(&self, base: &str) -> Option<&ColumnPair> {
        self.pairs.iter().find(|p| p.base == base)
    }

    pub fn overlap(&self) -> usize {
        self.rows.iter().filter(|r| r.in_left && r.in_right).count()
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscordanceLabel {
    SameVerdict,
    SameVerdictBothHigh,
    SameVerdictOneHigh,
    SameVerdictZeroHigh,
    DifferentVerdict,
    DifferentVerdictBothHigh,
    DifferentVerdictOneHigh,
    DifferentVerdictZeroHigh,
}

impl DiscordanceLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SameVerdict => "same verdict",
            Self::SameVerdictBothHigh => "same verdict, both high confidence",
            Self::SameVerdictOneHigh => "same verdict, one high confidence",
            Self::SameVerdictZeroHigh => "same verdict, zero high confidence",
            Self::DifferentVerdict => "different verdict",
            Self::DifferentVerdictBothHigh => "different verdict, both high confidence",
            Self::DifferentVerdictOneHigh => "different verdict, one high confidence",
            Self::DifferentVerdictZeroHigh => "different verdict, zero high confidence",
        }
    }
}

impl fmt::Display for DiscordanceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Discordance {
    pub discordant_verdict: bool,
    pub score: u8,
    pub label: DiscordanceLabel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDiff {
    pub column: String,
    /// `""` when the two values agree.
    pub diff: String,
    pub score: u8,
}

impl ColumnDiff {
    pub fn is_discordant(&self) -> bool {
        self.score > 0
    }
}

/// Derived values for one joined row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowScore {
    /// `None` when either verdict is empty.
    Verdict(Option<Discordance>),
    Columns(Vec<ColumnDiff>),
}

#[derive(Debug, Clone)]
pub struct ScoredRow {
    pub row: JoinedRow,
    pub score: RowScore,
}

impl ScoredRow {
    pub fn discordance(&self) -> Option<&Discordance> {
        match &self.score {
            RowScore::Verdict(d) => d.as_ref(),
            RowScore::Columns(_) => None,
        }
    }

    pub fn column_diff(&self, column: &str) -> Option<&ColumnDiff> {
        match &self.score {
            RowScore::Columns(diffs) => diffs.iter().find(|d| d.column == column),
            RowScore::Verdict(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Header + rows ready for the table writer. No index column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl OutputTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, header: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(header)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn rec(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn na_markers_become_empty() {
        assert_eq!(Cell::from_raw(""), Cell::Empty);
        assert_eq!(Cell::from_raw("NaN"), Cell::Empty);
        assert_eq!(Cell::from_raw("N/A"), Cell::Empty);
        assert_eq!(Cell::from_raw("normal"), Cell::Text("normal".into()));
        assert!(!Cell::from_raw("nan").is_present());
        assert!(Cell::Int(0).is_present());
    }

    #[test]
    fn table_builds_index_and_pads_short_rows() {
        let t = Table::from_records(
            "t1.tsv",
            "Path",
            headers(&["Path", "Verdict", "Confidence"]),
            vec![rec(&["a", "normal", "high"]), rec(&["b", "normal"])],
        )
        .unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.columns(), &["Verdict".to_string(), "Confidence".to_string()]);
        assert_eq!(t.get("b").unwrap().get("Confidence"), &Cell::Empty);
        assert_eq!(t.get("a").unwrap().get("Verdict").as_text(), "normal");
        assert!(t.get("c").is_none());
    }

    #[test]
    fn table_rejects_missing_identifier_column() {
        let err = Table::from_records("t.tsv", "Path", headers(&["Verdict"]), vec![rec(&["x"])])
            .unwrap_err();
        assert!(matches!(err, ConcordError::MissingIdentifierColumn { .. }));
    }

    #[test]
    fn table_rejects_zero_rows() {
        let err = Table::from_records("t.tsv", "Path", headers(&["Path", "Verdict"]), vec![])
            .unwrap_err();
        assert!(matches!(err, ConcordError::EmptyTable { .. }));
    }

    #[test]
    fn table_rejects_empty_and_duplicate_identifiers() {
        let err = Table::from_records(
            "t.tsv",
            "Path",
            headers(&["Path", "Verdict"]),
            vec![rec(&["a", "x"]), rec(&["", "y"])],
        )
        .unwrap_err();
        assert!(matches!(err, ConcordError::EmptyIdentifier { row: 2, .. }));

        let err = Table::from_records(
            "t.tsv",
            "Path",
            headers(&["Path", "Verdict"]),
            vec![rec(&["a", "x"]), rec(&["a", "y"])],
        )
        .unwrap_err();
        assert!(matches!(err, ConcordError::DuplicateIdentifier { .. }));
    }

    #[test]
    fn table_rejects_duplicate_headers() {
        let err = Table::from_records(
            "t.tsv",
            "Path",
            headers(&["Path", "Verdict", "Verdict"]),
            vec![rec(&["a", "x", "y"])],
        )
        .unwrap_err();
        assert!(matches!(err, ConcordError::DuplicateColumn { .. }));
    }

    #[test]
    fn blank_headers_are_named_by_position() {
        let t = Table::from_records(
            "t.tsv",
            "Path",
            headers(&["Path", "Verdict", "", ""]),
            vec![rec(&["a", "x", "", "note"])],
        )
        .unwrap();
        assert_eq!(t.columns(), ["Verdict", "Unnamed: 2", "Unnamed: 3"]);
        assert_eq!(t.get("a").unwrap().get("Unnamed: 3"), &Cell::text("note"));
    }

    #[test]
    fn output_table_column_lookup() {
        let out = OutputTable {
            headers: headers(&["Path", "Score"]),
            rows: vec![vec![Cell::text("a"), Cell::Int(2)], vec![Cell::text("b"), Cell::Empty]],
        };
        let col = out.column("Score").unwrap();
        assert_eq!(col, vec![&Cell::Int(2), &Cell::Empty]);
        assert!(out.column("Missing").is_none());
    }
}
