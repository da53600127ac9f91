use crate::error::ConcordError;
use crate::model::{ComparePlan, Table, CONFIDENCE_COLUMN, VERDICT_COLUMN};
use crate::schema::FormSchema;

/// True when `table` carries the fixed Verdict/Confidence form columns.
pub fn has_default_schema(table: &Table) -> bool {
    table.has_column(VERDICT_COLUMN) && table.has_column(CONFIDENCE_COLUMN)
}

/// Non-identifier columns present in both tables, in `table1` order.
pub fn shared_columns(table1: &Table, table2: &Table) -> Vec<String> {
    table1
        .columns()
        .iter()
        .filter(|c| table2.has_column(c))
        .cloned()
        .collect()
}

/// Decide which columns get scored.
///
/// Both tables on the default schema → `Default`. Otherwise the shared
/// columns, restricted to the schema's column names when the schema names any.
pub fn plan_comparison(
    table1: &Table,
    table2: &Table,
    schema: Option<&FormSchema>,
) -> Result<ComparePlan, ConcordError> {
    if has_default_schema(table1) && has_default_schema(table2) {
        return Ok(ComparePlan::Default);
    }

    let shared = shared_columns(table1, table2);
    let schema_columns = schema.map(FormSchema::column_names).filter(|c| !c.is_empty());

    let columns: Vec<String> = match &schema_columns {
        Some(allowed) => shared.iter().filter(|c| allowed.contains(c)).cloned().collect(),
        None => shared.clone(),
    };

    if columns.is_empty() {
        return Err(ConcordError::NoColumnsToCompare {
            table1: table1.label().to_string(),
            table2: table2.label().to_string(),
            shared,
            schema: schema_columns,
        });
    }

    Ok(ComparePlan::Generic { columns })
}

/// Number of identifiers present in both tables.
pub fn identifier_overlap(table1: &Table, table2: &Table) -> usize {
    table1.ids().filter(|id| table2.contains_id(id)).count()
}

/// Fails when the tables share no identifier.
pub fn check_overlap(table1: &Table, table2: &Table) -> Result<usize, ConcordError> {
    let overlap = identifier_overlap(table1, table2);
    if overlap == 0 {
        return Err(ConcordError::NoOverlap {
            table1: table1.label().to_string(),
            table2: table2.label().to_string(),
            column: table1.id_column().to_string(),
        });
    }
    Ok(overlap)
}
