use super::aggregate::{coerce_department_columns, summarize, AggregateSummary};
use super::error::DataResult;
use super::filter::{apply_filters, filter_rows, FilterSelection};
use super::insights::{derive_insights, Insight};
use super::model::{
    Cell, Department, Table, ADMITTED, APPLICATIONS, ENROLLED, RETENTION_RATE, SATISFACTION, TERM,
    YEAR,
};

/// Terms shown in the seasonal comparison panel.
pub const COMPARISON_TERMS: [&str; 2] = ["Spring", "Fall"];

// ---------------------------------------------------------------------------
// Chart series handed to the plotting layer
// ---------------------------------------------------------------------------

/// A named (x, y) series.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

/// Stacked bars: one category per row, one segment per department.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackedBars {
    /// "Year Term" labels, in row order.
    pub categories: Vec<String>,
    pub segments: Vec<BarSegment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarSegment {
    pub department: Department,
    /// One height per category.
    pub values: Vec<f64>,
}

/// Spring vs Fall panels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison {
    /// Applications, Admitted, Enrolled against Year.
    pub counts: Vec<Series>,
    /// Retention Rate, Satisfaction against Year.
    pub rates: Vec<Series>,
}

// ---------------------------------------------------------------------------
// ViewModel – everything one recomputation pass produces
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    /// Filtered data as displayed (department-projected when departments are selected).
    pub table: Table,
    pub summary: AggregateSummary,
    pub enrollment: StackedBars,
    pub retention: Vec<Series>,
    pub satisfaction: Vec<Series>,
    pub comparison: Comparison,
    pub insights: Vec<Insight>,
}

/// Run the whole pipeline for one filter selection.
///
/// Summary, trend lines, comparison and insights are computed from the
/// row-filtered view; the department projection only shapes the displayed
/// table and the bar segments.
pub fn recompute(dataset: &Table, selection: &FilterSelection) -> DataResult<ViewModel> {
    let rows = filter_rows(dataset, &selection.years, &selection.terms)?;
    let table = apply_filters(dataset, selection)?;

    let departments: Vec<Department> = if selection.departments.is_empty() {
        Department::ALL.to_vec()
    } else {
        selection.departments.iter().copied().collect()
    };

    let model = ViewModel {
        summary: summarize(&rows)?,
        enrollment: enrollment_breakdown(&rows, &departments)?,
        retention: per_term_series(&rows, RETENTION_RATE)?,
        satisfaction: per_term_series(&rows, SATISFACTION)?,
        comparison: seasonal_comparison(&rows)?,
        insights: derive_insights(&rows, selection)?,
        table,
    };

    log::debug!(
        "recomputed view: {} of {} rows, {} summary groups",
        model.table.len(),
        dataset.len(),
        model.summary.len()
    );
    Ok(model)
}

fn enrollment_breakdown(rows: &Table, departments: &[Department]) -> DataResult<StackedBars> {
    let columns: Vec<String> = departments.iter().map(|d| d.column()).collect();
    let coerced = coerce_department_columns(rows, &columns)?;

    let year_idx = coerced.require(YEAR)?;
    let term_idx = coerced.require(TERM)?;
    let categories = (0..coerced.len())
        .map(|r| format!("{} {}", coerced.cell(r, year_idx), coerced.cell(r, term_idx)))
        .collect();

    let segments = departments
        .iter()
        .zip(&columns)
        .map(|(&department, column)| {
            let idx = coerced.require(column)?;
            let values = (0..coerced.len())
                .map(|r| coerced.cell(r, idx).as_f64().unwrap_or(0.0))
                .collect();
            Ok(BarSegment { department, values })
        })
        .collect::<DataResult<Vec<_>>>()?;

    Ok(StackedBars { categories, segments })
}

/// One "`<Term>` Term" line per term (first-appearance order) of `column` against Year.
fn per_term_series(rows: &Table, column: &str) -> DataResult<Vec<Series>> {
    let term_idx = rows.require(TERM)?;
    let mut terms: Vec<&Cell> = Vec::new();
    for r in 0..rows.len() {
        let term = rows.cell(r, term_idx);
        if !terms.contains(&term) {
            terms.push(term);
        }
    }

    terms
        .into_iter()
        .map(|term| {
            let subset = rows.filter_rows(|row| row.get(term_idx) == Some(term));
            Ok(Series {
                name: format!("{term} Term"),
                points: year_points(&subset, column)?,
            })
        })
        .collect()
}

fn seasonal_comparison(rows: &Table) -> DataResult<Comparison> {
    let term_idx = rows.require(TERM)?;
    let seasonal = rows.filter_rows(|row| {
        matches!(row.get(term_idx), Some(Cell::Text(t)) if COMPARISON_TERMS.contains(&t.as_str()))
    });

    let series = |name: &str, column: &str| -> DataResult<Series> {
        Ok(Series {
            name: name.to_string(),
            points: year_points(&seasonal, column)?,
        })
    };

    Ok(Comparison {
        counts: vec![
            series("Applications", APPLICATIONS)?,
            series("Admitted", ADMITTED)?,
            series("Enrolled", ENROLLED)?,
        ],
        rates: vec![
            series("Retention Rate", RETENTION_RATE)?,
            series("Satisfaction", SATISFACTION)?,
        ],
    })
}

/// (Year, value) pairs in row order; rows with an empty value are skipped.
fn year_points(rows: &Table, column: &str) -> DataResult<Vec<[f64; 2]>> {
    let year_idx = rows.require(YEAR)?;
    let value_idx = rows.require(column)?;
    let mut points = Vec::with_capacity(rows.len());
    for r in 0..rows.len() {
        let Some(year) = rows.number(r, year_idx)? else {
            continue;
        };
        if let Some(value) = rows.number(r, value_idx)? {
            points.push([year, value]);
        }
    }
    Ok(points)
}
