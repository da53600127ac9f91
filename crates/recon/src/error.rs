use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConcordError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (equal suffixes, empty marker, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// Form schema JSON could not be parsed.
    #[error("form schema parse error: {0}")]
    SchemaParse(String),
    /// Table header has no identifier column.
    #[error("{table} is missing a '{column}' column")]
    MissingIdentifierColumn { table: String, column: String },
    /// The same header appears twice in one table.
    #[error("{table} has a duplicate '{column}' column")]
    DuplicateColumn { table: String, column: String },
    /// Table has a header but no data rows.
    #[error("{table} is empty")]
    EmptyTable { table: String },
    /// A data row has no identifier value. `row` is 1-based, header excluded.
    #[error("{table} row {row} has an empty '{column}' value")]
    EmptyIdentifier { table: String, column: String, row: usize },
    /// Identifiers must be unique within a table.
    #[error("{table} has duplicate '{column}' value '{id}'")]
    DuplicateIdentifier { table: String, column: String, id: String },
    /// The two tables have no identifier in common.
    #[error(
        "{table1} {column} column values have 0 overlap with {table2} {column} column values. \
         Tables can only be combined if they have the same {column}s."
    )]
    NoOverlap { table1: String, table2: String, column: String },
    /// Generic schema ended up with nothing to compare.
    #[error("no columns to compare between {table1} and {table2}")]
    NoColumnsToCompare {
        table1: String,
        table2: String,
        shared: Vec<String>,
        schema: Option<Vec<String>>,
    },
}

impl ConcordError {
    /// Extra diagnostic lines shown under the main message.
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::NoColumnsToCompare { shared, schema, .. } => {
                let mut lines = vec![format!(
                    "shared columns between the 2 tables were: {}",
                    list_or_none(shared)
                )];
                if let Some(schema) = schema {
                    lines.push(format!("columns in schema: {}", list_or_none(schema)));
                }
                lines
            }
            _ => Vec::new(),
        }
    }

    /// True for failures caused by the input tables themselves.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MissingIdentifierColumn { .. }
                | Self::DuplicateColumn { .. }
                | Self::EmptyTable { .. }
                | Self::EmptyIdentifier { .. }
                | Self::DuplicateIdentifier { .. }
                | Self::NoOverlap { .. }
        )
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}
