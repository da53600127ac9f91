use std::collections::{BTreeSet, HashMap};

use crate::config::CompareOptions;
use crate::model::{Alignment, Cell, ColumnPair, JoinedRow, Table};

/// Full outer join of two tables on the identifier.
///
/// Column names present in both tables get the configured suffixes; names
/// unique to one table are kept as-is. Rows come out in identifier order and
/// a side with no row for an identifier contributes empty cells.
pub fn align(table1: &Table, table2: &Table, options: &CompareOptions) -> Alignment {
    let mut left_names: HashMap<&str, String> = HashMap::new();
    let mut right_names: HashMap<&str, String> = HashMap::new();
    let mut pairs = Vec::new();

    for column in table1.columns() {
        if table2.has_column(column) {
            let left = options.suffixed(column, &options.suffix1);
            let right = options.suffixed(column, &options.suffix2);
            pairs.push(ColumnPair {
                base: column.clone(),
                left: left.clone(),
                right: right.clone(),
            });
            left_names.insert(column.as_str(), left);
            right_names.insert(column.as_str(), right);
        } else {
            left_names.insert(column.as_str(), column.clone());
        }
    }
    for column in table2.columns() {
        right_names
            .entry(column.as_str())
            .or_insert_with(|| column.clone());
    }

    let mut columns: Vec<String> = table1
        .columns()
        .iter()
        .map(|c| left_names[c.as_str()].clone())
        .collect();
    columns.extend(table2.columns().iter().map(|c| right_names[c.as_str()].clone()));

    let ids: BTreeSet<&str> = table1.ids().chain(table2.ids()).collect();

    let rows = ids
        .into_iter()
        .map(|id| {
            let left = table1.get(id);
            let right = table2.get(id);
            let mut cells = HashMap::with_capacity(columns.len());

            for column in table1.columns() {
                let value = left.map(|r| r.get(column).clone()).unwrap_or(Cell::Empty);
                cells.insert(left_names[column.as_str()].clone(), value);
            }
            for column in table2.columns() {
                let value = right.map(|r| r.get(column).clone()).unwrap_or(Cell::Empty);
                cells.insert(right_names[column.as_str()].clone(), value);
            }

            JoinedRow {
                id: id.to_string(),
                cells,
                in_left: left.is_some(),
                in_right: right.is_some(),
            }
        })
        .collect();

    Alignment {
        id_column: table1.id_column().to_string(),
        columns,
        pairs,
        rows,
    }
}
