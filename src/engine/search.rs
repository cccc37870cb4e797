//! Search filter - substring match over the searchable fields

use crate::model::{field_value, Column, Row};

/// The fields a query is matched against
///
/// Columns marked `filter` restrict the search to themselves; when no
/// column is marked, every column's field is searched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchScope<'a> {
    fields: Vec<&'a str>,
}

impl<'a> SearchScope<'a> {
    pub fn from_columns(columns: &'a [Column]) -> Self {
        let marked: Vec<&str> = columns
            .iter()
            .filter(|c| c.filter)
            .map(|c| c.field.as_str())
            .collect();

        let fields = if marked.is_empty() {
            columns.iter().map(|c| c.field.as_str()).collect()
        } else {
            marked
        };

        Self { fields }
    }

    pub fn fields(&self) -> &[&'a str] {
        &self.fields
    }
}

/// Trim and lowercase a raw query; an empty result means "match everything"
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Whether any in-scope field of `row` contains `normalized`
///
/// Null and missing fields never match.
pub fn row_matches(row: &Row, normalized: &str, scope: &SearchScope<'_>) -> bool {
    if normalized.is_empty() {
        return true;
    }
    scope.fields.iter().any(|field| {
        field_value(row, field)
            .to_text()
            .is_some_and(|text| text.to_lowercase().contains(normalized))
    })
}

/// Rows matching `query`, in input order
pub fn filter<'r>(
    query: &str,
    rows: impl IntoIterator<Item = &'r Row>,
    columns: &[Column],
) -> Vec<&'r Row> {
    let normalized = normalize_query(query);
    let scope = SearchScope::from_columns(columns);
    rows.into_iter()
        .filter(|row| row_matches(row, &normalized, &scope))
        .collect()
}

/// Positions in `rows` of the rows matching `query`, ascending
pub fn matching_indices(query: &str, rows: &[Row], columns: &[Column]) -> Vec<usize> {
    let normalized = normalize_query(query);
    let scope = SearchScope::from_columns(columns);
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row_matches(row, &normalized, &scope))
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;

    fn people() -> Vec<Row> {
        vec![
            row! { "id" => 1, "name" => "ann", "city" => "Boston" },
            row! { "id" => 2, "name" => "Bob", "city" => "Annapolis" },
            row! { "id" => 3, "name" => "carl", "city" => Option::<&str>::None },
            row! { "id" => 13, "name" => "Dana", "active" => true },
        ]
    }

    fn names(rows: &[&Row]) -> Vec<String> {
        rows.iter().map(|r| r["name"].to_string()).collect()
    }

    #[test]
    fn test_empty_query_is_identity() {
        let rows = people();
        let columns = vec![Column::new("name")];

        for query in ["", "   ", "\t\n"] {
            let result = filter(query, &rows, &columns);
            assert_eq!(result.len(), rows.len());
            assert!(result.iter().zip(&rows).all(|(a, b)| std::ptr::eq(*a, b)));
        }
    }

    #[test]
    fn test_matches_any_column_when_none_marked() {
        let rows = vec![row! { "name" => "ann" }, row! { "name" => "Bob" }];
        let columns = vec![Column::new("name")];

        let result = filter("an", &rows, &columns);
        assert_eq!(names(&result), vec!["ann"]);
    }

    #[test]
    fn test_marked_columns_restrict_scope() {
        let rows = people();
        let all = vec![Column::new("name"), Column::new("city")];
        let restricted = vec![Column::new("name").filter(), Column::new("city")];

        assert_eq!(names(&filter("ann", &rows, &all)), vec!["ann", "Bob"]);
        assert_eq!(names(&filter("ann", &rows, &restricted)), vec!["ann"]);
    }

    #[test]
    fn test_query_is_trimmed_and_case_folded() {
        let rows = people();
        let columns = vec![Column::new("name")];
        assert_eq!(names(&filter("  BOB ", &rows, &columns)), vec!["Bob"]);
    }

    #[test]
    fn test_numbers_and_booleans_match_their_text() {
        let rows = people();
        let columns = vec![Column::new("id"), Column::new("active")];

        assert_eq!(names(&filter("1", &rows, &columns)), vec!["ann", "Dana"]);
        assert_eq!(names(&filter("TRUE", &rows, &columns)), vec!["Dana"]);
    }

    #[test]
    fn test_null_and_missing_fields_never_match() {
        let rows = people();
        let columns = vec![Column::new("city"), Column::new("nope")];
        assert!(filter("null", &rows, &columns).is_empty());
        assert!(filter("undefined", &rows, &columns).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let rows = people();
        let columns = vec![Column::new("name"), Column::new("city")];

        for query in ["", "a", "an", "bo", "zzz", "1"] {
            let once = filter(query, &rows, &columns);
            let twice = filter(query, once.clone(), &columns);
            assert_eq!(once, twice, "query {:?}", query);
        }
    }

    #[test]
    fn test_matching_indices_preserve_order() {
        let rows = people();
        let columns = vec![Column::new("name"), Column::new("city")];
        assert_eq!(matching_indices("a", &rows, &columns), vec![0, 1, 2, 3]);
        assert_eq!(matching_indices("bo", &rows, &columns), vec![0, 1]);
    }

    #[test]
    fn test_scope_ignores_query() {
        let columns = vec![Column::new("a"), Column::new("b").filter()];
        assert_eq!(SearchScope::from_columns(&columns).fields(), &["b"]);

        let columns = vec![Column::new("a"), Column::new("b")];
        assert_eq!(SearchScope::from_columns(&columns).fields(), &["a", "b"]);
    }
}
