use std::collections::BTreeSet;

use super::error::DataResult;
use super::model::{Cell, Department, Table, TERM, YEAR};

// ---------------------------------------------------------------------------
// Filter selection: which years / terms / departments the user picked
// ---------------------------------------------------------------------------

/// The three multi-select widgets. An empty set means "no filter" on that
/// dimension, so a default selection passes every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub years: BTreeSet<i64>,
    pub terms: BTreeSet<String>,
    pub departments: BTreeSet<Department>,
}

/// Values offered by the year and term widgets, taken from the loaded dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub years: Vec<i64>,
    pub terms: Vec<String>,
}

impl FilterOptions {
    pub fn from_table(table: &Table) -> DataResult<Self> {
        let years = table
            .unique_values(YEAR)?
            .iter()
            .filter_map(Cell::as_i64)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let terms = table
            .unique_values(TERM)?
            .iter()
            .filter(|c| **c != Cell::Null)
            .map(|c| c.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        Ok(FilterOptions { years, terms })
    }
}

// ---------------------------------------------------------------------------
// Row filter and department projection
// ---------------------------------------------------------------------------

/// Keep rows whose `Year` is in `years` and then whose `Term` is in `terms`.
///
/// Empty sets do not constrain. Row order is preserved and values that never
/// occur in the data simply match nothing.
pub fn filter_rows(
    dataset: &Table,
    years: &BTreeSet<i64>,
    terms: &BTreeSet<String>,
) -> DataResult<Table> {
    let mut view = dataset.clone();
    if !years.is_empty() {
        let idx = view.require(YEAR)?;
        view = view.filter_rows(|row| {
            row.get(idx)
                .and_then(Cell::as_i64)
                .is_some_and(|y| years.contains(&y))
        });
    }
    if !terms.is_empty() {
        let idx = view.require(TERM)?;
        view = view.filter_rows(|row| match row.get(idx) {
            Some(Cell::Null) | None => false,
            Some(cell) => terms.contains(&cell.to_string()),
        });
    }
    Ok(view)
}

/// Project onto `Year`, `Term` and the enrollment columns of `departments`.
///
/// Department columns follow [`Department::ALL`] order, not the order the
/// user picked them in.
pub fn project_departments(view: &Table, departments: &BTreeSet<Department>) -> DataResult<Table> {
    let mut columns = vec![YEAR.to_string(), TERM.to_string()];
    columns.extend(departments.iter().map(|d| d.column()));
    view.select(&columns)
}

/// Filtered view as displayed: the row filter, then, when departments are
/// selected, the department projection in place of the full column set.
pub fn apply_filters(dataset: &Table, selection: &FilterSelection) -> DataResult<Table> {
    let view = filter_rows(dataset, &selection.years, &selection.terms)?;
    if selection.departments.is_empty() {
        Ok(view)
    } else {
        project_departments(&view, &selection.departments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::error::DataError;
    use crate::data::model::{
        ADMITTED, APPLICATIONS, ENROLLED, RETENTION_RATE, SATISFACTION,
    };

    fn sample_dataset() -> Table {
        let mut columns: Vec<String> = [
            YEAR, TERM, APPLICATIONS, ADMITTED, ENROLLED, RETENTION_RATE, SATISFACTION,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        columns.extend(Department::ALL.iter().map(|d| d.column()));

        let row = |year: i64, term: &str, enrolled: i64| {
            vec![
                Cell::Integer(year),
                Cell::Text(term.to_string()),
                Cell::Integer(enrolled * 4),
                Cell::Integer(enrolled * 2),
                Cell::Integer(enrolled),
                Cell::Float(85.0),
                Cell::Float(78.0),
                Cell::Integer(enrolled / 4),
                Cell::Integer(enrolled / 4),
                Cell::Integer(enrolled / 4),
                Cell::Integer(enrolled / 4),
            ]
        };

        Table::new(
            columns,
            vec![
                row(2019, "Spring", 400),
                row(2019, "Fall", 480),
                row(2020, "Spring", 420),
                row(2020, "Fall", 500),
                row(2021, "Spring", 440),
            ],
        )
    }

    fn years(v: &[i64]) -> BTreeSet<i64> {
        v.iter().copied().collect()
    }

    fn terms(v: &[&str]) -> BTreeSet<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn is_subsequence(sub: &[Vec<Cell>], full: &[Vec<Cell>]) -> bool {
        let mut it = full.iter();
        sub.iter().all(|row| it.any(|r| r == row))
    }

    #[test]
    fn empty_selection_returns_dataset_unchanged() {
        let ds = sample_dataset();
        let out = apply_filters(&ds, &FilterSelection::default()).unwrap();
        assert_eq!(out, ds);
    }

    #[test]
    fn year_and_term_filters_keep_order() {
        let ds = sample_dataset();
        let selection = FilterSelection {
            years: years(&[2021, 2019]),
            terms: terms(&["Spring"]),
            ..Default::default()
        };
        let out = apply_filters(&ds, &selection).unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out.rows[0], ds.rows[0]);
        assert_eq!(out.rows[1], ds.rows[4]);
        assert!(is_subsequence(&out.rows, &ds.rows));
    }

    #[test]
    fn filtered_rows_are_an_ordered_subsequence() {
        let ds = sample_dataset();
        for selection in [
            FilterSelection { years: years(&[2020]), ..Default::default() },
            FilterSelection { terms: terms(&["Fall"]), ..Default::default() },
            FilterSelection { years: years(&[2019, 2021]), terms: terms(&["Fall", "Spring"]), ..Default::default() },
        ] {
            let out = apply_filters(&ds, &selection).unwrap();
            assert!(out.len() <= ds.len());
            assert!(is_subsequence(&out.rows, &ds.rows));
        }
    }

    #[test]
    fn absent_values_produce_empty_view() {
        let ds = sample_dataset();
        let selection = FilterSelection {
            years: years(&[1999]),
            ..Default::default()
        };
        let out = apply_filters(&ds, &selection).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.columns, ds.columns);
    }

    #[test]
    fn department_selection_projects_columns() {
        let ds = sample_dataset();
        let selection = FilterSelection {
            departments: [Department::Engineering].into_iter().collect(),
            ..Default::default()
        };
        let out = apply_filters(&ds, &selection).unwrap();
        assert_eq!(out.columns, vec!["Year", "Term", "Engineering Enrolled"]);
        assert_eq!(out.len(), ds.len());
        assert_eq!(out.rows[0][2], Cell::Integer(100));
    }

    #[test]
    fn projection_applies_after_row_filter() {
        let ds = sample_dataset();
        let selection = FilterSelection {
            years: years(&[2020]),
            departments: [Department::Science, Department::Arts].into_iter().collect(),
            ..Default::default()
        };
        let out = apply_filters(&ds, &selection).unwrap();
        assert_eq!(
            out.columns,
            vec!["Year", "Term", "Arts Enrolled", "Science Enrolled"]
        );
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let ds = sample_dataset();
        let selection = FilterSelection {
            years: years(&[2019, 2020]),
            terms: terms(&["Fall"]),
            departments: [Department::Business].into_iter().collect(),
        };
        let once = apply_filters(&ds, &selection).unwrap();
        let twice = apply_filters(&once, &selection).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn missing_year_column_is_an_error_only_when_filtering() {
        let ds = Table::new(vec![TERM.to_string()], vec![vec![Cell::Text("Fall".into())]]);
        assert!(filter_rows(&ds, &BTreeSet::new(), &terms(&["Fall"])).is_ok());
        assert_eq!(
            filter_rows(&ds, &years(&[2020]), &BTreeSet::new()).unwrap_err(),
            DataError::MissingColumn(YEAR.to_string())
        );
    }

    #[test]
    fn options_are_sorted_and_distinct() {
        let opts = FilterOptions::from_table(&sample_dataset()).unwrap();
        assert_eq!(opts.years, vec![2019, 2020, 2021]);
        assert_eq!(opts.terms, vec!["Fall".to_string(), "Spring".to_string()]);
    }
}
