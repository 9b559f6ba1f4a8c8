use std::collections::BTreeMap;

use super::error::{DataError, DataResult};
use super::model::{
    Cell, Table, ADMITTED, APPLICATIONS, ENROLLED, RETENTION_RATE, SATISFACTION, TERM, YEAR,
};

// ---------------------------------------------------------------------------
// Aggregate summary: one row per (Year, Term)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub year: i64,
    pub term: String,
    pub applications: i64,
    pub admitted: i64,
    pub enrolled: i64,
    /// Mean retention rate; NaN when every cell in the group was empty.
    pub retention_rate: f64,
    pub satisfaction: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateSummary {
    pub rows: Vec<SummaryRow>,
}

impl AggregateSummary {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as a [`Table`] with the source column headers.
    pub fn to_table(&self) -> Table {
        let columns = [YEAR, TERM, APPLICATIONS, ADMITTED, ENROLLED, RETENTION_RATE, SATISFACTION]
            .iter()
            .map(|c| c.to_string())
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|r| {
                vec![
                    Cell::Integer(r.year),
                    Cell::Text(r.term.clone()),
                    Cell::Integer(r.applications),
                    Cell::Integer(r.admitted),
                    Cell::Integer(r.enrolled),
                    Cell::Float(r.retention_rate),
                    Cell::Float(r.satisfaction),
                ]
            })
            .collect();
        Table::new(columns, rows)
    }
}

#[derive(Default)]
struct Group {
    applications: i64,
    admitted: i64,
    enrolled: i64,
    retention: Mean,
    satisfaction: Mean,
}

#[derive(Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn value(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Group `view` by (Year, Term): counts are summed, rates averaged.
///
/// Groups come out ascending by year, then by term. Fails with
/// [`super::error::DataError::MissingColumn`] on a department-projected view.
pub fn summarize(view: &Table) -> DataResult<AggregateSummary> {
    let year_idx = view.require(YEAR)?;
    let term_idx = view.require(TERM)?;
    let apps_idx = view.require(APPLICATIONS)?;
    let admitted_idx = view.require(ADMITTED)?;
    let enrolled_idx = view.require(ENROLLED)?;
    let retention_idx = view.require(RETENTION_RATE)?;
    let satisfaction_idx = view.require(SATISFACTION)?;

    let mut groups: BTreeMap<(i64, String), Group> = BTreeMap::new();
    for row in 0..view.len() {
        let year = view.integer(row, year_idx)?;
        let term = view.cell(row, term_idx).to_string();
        let group = groups.entry((year, term)).or_default();

        group.applications =
            add_count(group.applications, view.integer(row, apps_idx)?, APPLICATIONS)?;
        group.admitted = add_count(group.admitted, view.integer(row, admitted_idx)?, ADMITTED)?;
        group.enrolled = add_count(group.enrolled, view.integer(row, enrolled_idx)?, ENROLLED)?;
        group.retention.push(view.number(row, retention_idx)?);
        group.satisfaction.push(view.number(row, satisfaction_idx)?);
    }

    let rows = groups
        .into_iter()
        .map(|((year, term), g)| SummaryRow {
            year,
            term,
            applications: g.applications,
            admitted: g.admitted,
            enrolled: g.enrolled,
            retention_rate: g.retention.value(),
            satisfaction: g.satisfaction.value(),
        })
        .collect();

    Ok(AggregateSummary { rows })
}

fn add_count(total: i64, value: i64, column: &str) -> DataResult<i64> {
    total
        .checked_add(value)
        .ok_or_else(|| DataError::Overflow(column.to_string()))
}

// ---------------------------------------------------------------------------
// Department column coercion
// ---------------------------------------------------------------------------

/// Replace every non-numeric cell of the named columns with `0`.
///
/// Finite numeric cells are kept as they are; numeric text (`" 12 "`) is
/// parsed. NaN and infinities count as non-numeric.
pub fn coerce_department_columns(view: &Table, columns: &[String]) -> DataResult<Table> {
    let indices = columns
        .iter()
        .map(|c| view.require(c))
        .collect::<DataResult<Vec<_>>>()?;

    let mut out = view.clone();
    for row in &mut out.rows {
        for &idx in &indices {
            let Some(cell) = row.get_mut(idx) else {
                continue;
            };
            let coerced = match &*cell {
                Cell::Integer(_) => continue,
                Cell::Float(v) if v.is_finite() => continue,
                Cell::Float(_) => Cell::Integer(0),
                Cell::Text(s) => match Cell::infer(s) {
                    numeric @ (Cell::Integer(_) | Cell::Float(_)) => numeric,
                    _ => Cell::Integer(0),
                },
                Cell::Bool(_) | Cell::Null => Cell::Integer(0),
            };
            *cell = coerced;
        }
    }
    Ok(out)
}
