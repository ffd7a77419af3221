//! `last_{column}` features from a tabular input (e.g. a financials table).

use crate::domain::{FeatureKey, FeatureVector};

/// Numeric last-row values of the first table that has a data row.
///
/// The first row is the header. A column is used only when every data cell
/// parses as a number after stripping thousands separators; a lone `-` counts
/// as zero.
pub fn table_features(tables: &[Vec<Vec<String>>]) -> FeatureVector {
    let mut out = FeatureVector::new();
    let Some((header, rows)) = tables
        .iter()
        .filter_map(|table| table.split_first())
        .find(|(_, rows)| !rows.is_empty())
    else {
        return out;
    };

    for (col, name) in header.iter().enumerate() {
        let parsed: Option<Vec<f64>> = rows
            .iter()
            .map(|row| row.get(col).and_then(|cell| parse_cell(cell)))
            .collect();
        if let Some(last) = parsed.and_then(|values| values.last().copied()) {
            out.insert_number(FeatureKey::table(name.trim()), last);
        }
    }
    out
}

fn parse_cell(cell: &str) -> Option<f64> {
    let cleaned = cell.replace(',', "");
    let cleaned = cleaned.trim();
    let cleaned = if cleaned == "-" { "0" } else { cleaned };
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn numeric_columns_yield_last_row() {
        let t = table(&[
            &["Year", "Profit", "Revenue", "Note"],
            &["2023", "90", "1,000", "ok"],
            &["2024", "120", "1,250.5", "-"],
        ]);
        let features = table_features(&[t]);
        assert_eq!(features.number(&FeatureKey::table("profit")), Some(120.0));
        assert_eq!(features.number(&FeatureKey::table("revenue")), Some(1250.5));
        assert_eq!(features.number(&FeatureKey::table("year")), Some(2024.0));
        assert_eq!(features.number(&FeatureKey::table("note")), None);
    }

    #[test]
    fn dash_counts_as_zero() {
        let t = table(&[&["Net Profit"], &["5"], &["-"]]);
        let features = table_features(&[t]);
        assert_eq!(features.number(&FeatureKey::table("net_profit")), Some(0.0));
    }

    #[test]
    fn header_only_or_missing_tables_yield_nothing() {
        assert!(table_features(&[]).is_empty());
        assert!(table_features(&[table(&[&["Profit"]])]).is_empty());
    }

    #[test]
    fn header_only_table_is_passed_over() {
        let empty = table(&[&["Profit"]]);
        let filled = table(&[&["Revenue"], &["2,000"]]);
        let features = table_features(&[empty, filled]);
        assert_eq!(features.number(&FeatureKey::table("revenue")), Some(2000.0));
        assert_eq!(features.len(), 1);
    }

    #[test]
    fn ragged_rows_drop_the_column() {
        let t = table(&[&["A", "B"], &["1", "2"], &["3"]]);
        let features = table_features(&[t]);
        assert_eq!(features.number(&FeatureKey::table("a")), Some(3.0));
        assert_eq!(features.number(&FeatureKey::table("b")), None);
    }
}
