//! Sort engine - single-field ordering with a three-state toggle

use crate::model::{field_value, Row, Value};
use std::cmp::Ordering;
use std::iter::Peekable;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// The active sort; a direction exists exactly when a field does
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortState {
    #[default]
    Unsorted,
    Sorted {
        field: String,
        direction: SortDirection,
    },
}

/// Header arrow for one column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIndicator {
    None,
    Ascending,
    Descending,
}

impl SortIndicator {
    pub fn symbol(&self) -> &'static str {
        match self {
            SortIndicator::None => "",
            SortIndicator::Ascending => "▲",
            SortIndicator::Descending => "▼",
        }
    }
}

impl SortState {
    pub fn field(&self) -> Option<&str> {
        match self {
            SortState::Unsorted => None,
            SortState::Sorted { field, .. } => Some(field),
        }
    }

    pub fn direction(&self) -> Option<SortDirection> {
        match self {
            SortState::Unsorted => None,
            SortState::Sorted { direction, .. } => Some(*direction),
        }
    }

    /// Arrow to show on the header of `field`
    pub fn indicator(&self, field: &str) -> SortIndicator {
        match self {
            SortState::Sorted { field: active, direction } if active == field => match direction {
                SortDirection::Ascending => SortIndicator::Ascending,
                SortDirection::Descending => SortIndicator::Descending,
            },
            _ => SortIndicator::None,
        }
    }
}

/// Next sort state after activating the header of `field`
///
/// Per field the cycle is none → ascending → descending → none. Activating
/// a different field always starts that field at ascending.
pub fn toggle(current: &SortState, field: &str) -> SortState {
    match current {
        SortState::Sorted {
            field: active,
            direction,
        } if active == field => match direction {
            SortDirection::Ascending => SortState::Sorted {
                field: field.to_string(),
                direction: SortDirection::Descending,
            },
            SortDirection::Descending => SortState::Unsorted,
        },
        _ => SortState::Sorted {
            field: field.to_string(),
            direction: SortDirection::Ascending,
        },
    }
}

/// Ascending comparison of two field values
///
/// Nulls first, then numbers numerically, booleans false before true, and
/// anything else as case-insensitive natural text.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => natural_cmp(&a.to_string(), &b.to_string()),
    }
}

/// Compare two rows under `state`
///
/// Descending reverses the entire ascending result, the null rule included,
/// so nulls sort last when descending.
pub fn compare_rows(a: &Row, b: &Row, state: &SortState) -> Ordering {
    let SortState::Sorted { field, direction } = state else {
        return Ordering::Equal;
    };
    let ordering = compare_values(field_value(a, field), field_value(b, field));
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// Rows reordered by `state`; the input slice is left untouched
pub fn apply<'r>(rows: &[&'r Row], state: &SortState) -> Vec<&'r Row> {
    let mut sorted = rows.to_vec();
    if *state != SortState::Unsorted {
        sorted.sort_by(|a, b| compare_rows(a, b, state));
    }
    sorted
}

/// Reorder dataset positions by `state`
pub fn sort_indices(indices: &mut [usize], rows: &[Row], state: &SortState) {
    if *state == SortState::Unsorted {
        return;
    }
    indices.sort_by(|&a, &b| compare_rows(&rows[a], &rows[b], state));
}

/// Case- and accent-insensitive comparison treating digit runs as numbers
///
/// `"item2"` sorts before `"item10"` and `"éclair"` sorts with the `e`s.
/// Digit runs of equal value but different zero padding compare equal.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = base_letters(a).peekable();
    let mut right = base_letters(b).peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let ordering = compare_digit_runs(&take_digits(&mut left), &take_digits(&mut right));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(l), Some(r)) => {
                if l != r {
                    return l.cmp(&r);
                }
                left.next();
                right.next();
            }
        }
    }
}

/// Lowercased characters with diacritics decomposed and dropped
fn base_letters(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn take_digits<I: Iterator<Item = char>>(chars: &mut Peekable<I>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        run.push(c);
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;

    fn sorted_by(rows: &[Row], field: &str, direction: SortDirection) -> Vec<String> {
        let refs: Vec<&Row> = rows.iter().collect();
        let state = SortState::Sorted {
            field: field.to_string(),
            direction,
        };
        apply(&refs, &state)
            .into_iter()
            .map(|r| crate::model::field_value(r, field).to_string())
            .collect()
    }

    #[test]
    fn test_toggle_cycle() {
        let state = SortState::Unsorted;
        let state = toggle(&state, "name");
        assert_eq!(state.direction(), Some(SortDirection::Ascending));
        let state = toggle(&state, "name");
        assert_eq!(state.direction(), Some(SortDirection::Descending));
        let state = toggle(&state, "name");
        assert_eq!(state, SortState::Unsorted);
        let state = toggle(&state, "name");
        assert_eq!(state.direction(), Some(SortDirection::Ascending));
    }

    #[test]
    fn test_toggle_other_field_restarts_at_ascending() {
        let state = toggle(&toggle(&SortState::Unsorted, "name"), "name");
        assert_eq!(state.direction(), Some(SortDirection::Descending));

        let state = toggle(&state, "id");
        assert_eq!(
            state,
            SortState::Sorted {
                field: "id".to_string(),
                direction: SortDirection::Ascending
            }
        );
    }

    #[test]
    fn test_field_and_direction_agree() {
        let mut state = SortState::Unsorted;
        for field in ["a", "a", "b", "b", "b", "a"] {
            state = toggle(&state, field);
            assert_eq!(state.field().is_none(), state.direction().is_none());
        }
    }

    #[test]
    fn test_indicator() {
        let state = toggle(&SortState::Unsorted, "name");
        assert_eq!(state.indicator("name"), SortIndicator::Ascending);
        assert_eq!(state.indicator("id"), SortIndicator::None);
        assert_eq!(toggle(&state, "name").indicator("name").symbol(), "▼");
        assert_eq!(SortState::Unsorted.indicator("name").symbol(), "");
    }

    #[test]
    fn test_case_insensitive_text_order() {
        let rows = vec![row! { "id" => 1, "name" => "Bob" }, row! { "id" => 2, "name" => "ann" }];
        assert_eq!(sorted_by(&rows, "name", SortDirection::Ascending), vec!["ann", "Bob"]);
        assert_eq!(sorted_by(&rows, "name", SortDirection::Descending), vec!["Bob", "ann"]);
    }

    #[test]
    fn test_numbers_sort_numerically() {
        let rows = vec![row! { "n" => 10 }, row! { "n" => 9 }, row! { "n" => -1.5 }, row! { "n" => 100 }];
        assert_eq!(sorted_by(&rows, "n", SortDirection::Ascending), vec!["-1.5", "9", "10", "100"]);
    }

    #[test]
    fn test_booleans_false_first() {
        let rows = vec![row! { "b" => true }, row! { "b" => false }, row! { "b" => true }];
        assert_eq!(sorted_by(&rows, "b", SortDirection::Ascending), vec!["false", "true", "true"]);
    }

    #[test]
    fn test_mixed_types_compare_as_text() {
        let rows = vec![row! { "v" => "item10" }, row! { "v" => 5 }, row! { "v" => "item2" }];
        assert_eq!(sorted_by(&rows, "v", SortDirection::Ascending), vec!["5", "item2", "item10"]);
    }

    #[test]
    fn test_nulls_first_ascending_last_descending() {
        let rows = vec![
            row! { "id" => 1, "score" => 3 },
            row! { "id" => 2 },
            row! { "id" => 3, "score" => 1 },
        ];
        let refs: Vec<&Row> = rows.iter().collect();
        let ids = |state: SortState| -> Vec<String> {
            apply(&refs, &state).iter().map(|r| r["id"].to_string()).collect()
        };

        let ascending = toggle(&SortState::Unsorted, "score");
        assert_eq!(ids(ascending.clone()), vec!["2", "3", "1"]);

        // descending negates the null rule along with everything else
        let descending = toggle(&ascending, "score");
        assert_eq!(ids(descending), vec!["1", "3", "2"]);
    }

    #[test]
    fn test_apply_leaves_input_untouched() {
        let rows = vec![row! { "n" => 2 }, row! { "n" => 1 }];
        let refs: Vec<&Row> = rows.iter().collect();
        let state = toggle(&SortState::Unsorted, "n");

        let sorted = apply(&refs, &state);
        assert!(std::ptr::eq(refs[0], &rows[0]));
        assert!(std::ptr::eq(sorted[0], &rows[1]));
    }

    #[test]
    fn test_unsorted_keeps_order() {
        let rows = vec![row! { "n" => 2 }, row! { "n" => 1 }, row! { "n" => 3 }];
        let mut indices = vec![0, 1, 2];
        sort_indices(&mut indices, &rows, &SortState::Unsorted);
        assert_eq!(indices, vec![0, 1, 2]);

        sort_indices(&mut indices, &rows, &toggle(&SortState::Unsorted, "n"));
        assert_eq!(indices, vec![1, 0, 2]);
    }

    #[test]
    fn test_natural_cmp() {
        assert_eq!(natural_cmp("item2", "item10"), Ordering::Less);
        assert_eq!(natural_cmp("Item10", "item2"), Ordering::Greater);
        assert_eq!(natural_cmp("ABC", "abc"), Ordering::Equal);
        assert_eq!(natural_cmp("a", "ab"), Ordering::Less);
        assert_eq!(natural_cmp("file007", "file7"), Ordering::Equal);
        assert_eq!(natural_cmp("x9y", "x10a"), Ordering::Less);
        assert_eq!(natural_cmp("", ""), Ordering::Equal);
    }

    #[test]
    fn test_accents_sort_with_their_base_letter() {
        let rows = vec![
            row! { "name" => "zeta" },
            row! { "name" => "éclair" },
            row! { "name" => "apple" },
        ];
        assert_eq!(
            sorted_by(&rows, "name", SortDirection::Ascending),
            vec!["apple", "éclair", "zeta"]
        );
        assert_eq!(natural_cmp("Éclair", "eclair"), Ordering::Equal);
        assert_eq!(natural_cmp("café2", "cafe10"), Ordering::Less);
    }

    #[test]
    fn test_nan_compares_equal() {
        assert_eq!(compare_values(&Value::Number(f64::NAN), &Value::Number(1.0)), Ordering::Equal);
    }
}
