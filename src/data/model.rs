use std::collections::BTreeSet;
use std::fmt;

use super::error::{DataError, DataResult};

// ---------------------------------------------------------------------------
// Column names of the university statistics file
// ---------------------------------------------------------------------------

pub const YEAR: &str = "Year";
pub const TERM: &str = "Term";
pub const APPLICATIONS: &str = "Applications";
pub const ADMITTED: &str = "Admitted";
pub const ENROLLED: &str = "Enrolled";
pub const RETENTION_RATE: &str = "Retention Rate (%)";
pub const SATISFACTION: &str = "Student Satisfaction (%)";

/// Text read as a missing value, the same set `pandas.read_csv` treats as NaN.
pub const NA_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Cell – a single value in a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common Pandas dtypes.
/// Filter options live in `BTreeSet`s downstream so `Cell` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put Cell in BTreeSet --

impl Eq for Cell {}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Cell::*;
        fn discriminant(v: &Cell) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Integer(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{v:.2}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Null => write!(f, "<null>"),
        }
    }
}

impl Cell {
    /// Infer the cell type from raw text, the way a CSV reader would.
    ///
    /// Empty text, the usual missing-value markers and non-finite numbers read as null.
    pub fn infer(s: &str) -> Cell {
        let s = s.trim();
        if s.is_empty() || NA_TOKENS.contains(&s) {
            return Cell::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return Cell::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return if f.is_finite() { Cell::Float(f) } else { Cell::Null };
        }
        if s == "true" || s == "false" {
            return Cell::Bool(s == "true");
        }
        Cell::Text(s.to_string())
    }

    /// Interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Float(v) => Some(*v),
            Cell::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Interpret the value as an exact integer (`2020.0` counts, `2020.5` does not).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Integer(i) => Some(*i),
            Cell::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Department – the four fixed enrollment breakdown columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Department {
    Engineering,
    Business,
    Arts,
    Science,
}

impl Department {
    pub const ALL: [Department; 4] = [
        Department::Engineering,
        Department::Business,
        Department::Arts,
        Department::Science,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Department::Engineering => "Engineering",
            Department::Business => "Business",
            Department::Arts => "Arts",
            Department::Science => "Science",
        }
    }

    /// Header of this department's enrollment column, e.g. `Arts Enrolled`.
    pub fn column(self) -> String {
        format!("{} Enrolled", self.name())
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Table – the loaded dataset and every view derived from it
// ---------------------------------------------------------------------------

/// Row-major table with an ordered header. Derived views are new tables;
/// nothing in the engine mutates its input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Table { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Like [`Table::index_of`] but a missing column is an error.
    pub fn require(&self, column: &str) -> DataResult<usize> {
        self.index_of(column)
            .ok_or_else(|| DataError::MissingColumn(column.to_string()))
    }

    /// Cell at `row` for the column at `idx`; short rows read as null.
    pub fn cell(&self, row: usize, idx: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(idx))
            .unwrap_or(&Cell::Null)
    }

    /// Keep the rows for which `predicate` holds, in their original order.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Table
    where
        F: FnMut(&[Cell]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| predicate(row))
                .cloned()
                .collect(),
        }
    }

    /// Project onto `columns`, in the given order.
    pub fn select(&self, columns: &[String]) -> DataResult<Table> {
        let indices = columns
            .iter()
            .map(|c| self.require(c))
            .collect::<DataResult<Vec<_>>>()?;
        let rows = (0..self.len())
            .map(|r| indices.iter().map(|&i| self.cell(r, i).clone()).collect())
            .collect();
        Ok(Table::new(columns.to_vec(), rows))
    }

    /// Sorted distinct values of a column.
    pub fn unique_values(&self, column: &str) -> DataResult<BTreeSet<Cell>> {
        let idx = self.require(column)?;
        Ok((0..self.len()).map(|r| self.cell(r, idx).clone()).collect())
    }

    /// Numeric value at (`row`, `idx`), nulls and NaN skipped, text rejected.
    pub fn number(&self, row: usize, idx: usize) -> DataResult<Option<f64>> {
        match self.cell(row, idx) {
            Cell::Null => Ok(None),
            Cell::Float(v) if v.is_nan() => Ok(None),
            cell => cell.as_f64().map(Some).ok_or_else(|| self.not_numeric(row, idx)),
        }
    }

    /// Integer value at (`row`, `idx`); nulls and NaN count as zero like a Pandas sum.
    pub fn integer(&self, row: usize, idx: usize) -> DataResult<i64> {
        match self.cell(row, idx) {
            Cell::Null => Ok(0),
            Cell::Float(v) if v.is_nan() => Ok(0),
            cell => cell.as_i64().ok_or_else(|| self.not_numeric(row, idx)),
        }
    }

    /// Mean of a numeric column over all rows, ignoring nulls.
    /// `None` when the column has no values at all.
    pub fn column_mean(&self, column: &str) -> DataResult<Option<f64>> {
        let idx = self.require(column)?;
        let mut sum = 0.0;
        let mut count = 0usize;
        for row in 0..self.len() {
            if let Some(v) = self.number(row, idx)? {
                sum += v;
                count += 1;
            }
        }
        Ok((count > 0).then(|| sum / count as f64))
    }

    fn not_numeric(&self, row: usize, idx: usize) -> DataError {
        DataError::NotNumeric {
            row,
            column: self.columns[idx].clone(),
            raw: self.cell(row, idx).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn infer_recognises_common_types() {
        assert_eq!(Cell::infer("2020"), Cell::Integer(2020));
        assert_eq!(Cell::infer(" 82.5 "), Cell::Float(82.5));
        assert_eq!(Cell::infer("true"), Cell::Bool(true));
        assert_eq!(Cell::infer("Fall"), Cell::Text("Fall".to_string()));
        assert_eq!(Cell::infer(""), Cell::Null);
    }

    #[test]
    fn infer_reads_missing_markers_and_non_finite_as_null() {
        for raw in ["N/A", "NA", "null", "NaN", "nan", "inf", "-inf", "None"] {
            assert_eq!(Cell::infer(raw), Cell::Null, "{raw}");
        }
        assert_eq!(Cell::infer("Fallen"), Cell::Text("Fallen".to_string()));
    }

    #[test]
    fn as_i64_accepts_integral_floats_only() {
        assert_eq!(Cell::Float(2021.0).as_i64(), Some(2021));
        assert_eq!(Cell::Float(2021.5).as_i64(), None);
        assert_eq!(Cell::Text("2021".to_string()).as_i64(), None);
    }

    #[test]
    fn department_columns_follow_header_convention() {
        assert_eq!(Department::Engineering.column(), "Engineering Enrolled");
        assert_eq!(Department::ALL.len(), 4);
    }

    #[test]
    fn select_reorders_and_rejects_unknown_columns() {
        let t = Table::new(
            cols(&["a", "b"]),
            vec![vec![Cell::Integer(1), Cell::Integer(2)]],
        );
        let out = t.select(&cols(&["b", "a"])).unwrap();
        assert_eq!(out.rows, vec![vec![Cell::Integer(2), Cell::Integer(1)]]);

        let err = t.select(&cols(&["c"])).unwrap_err();
        assert_eq!(err, DataError::MissingColumn("c".to_string()));
    }

    #[test]
    fn column_mean_skips_nulls_and_rejects_text() {
        let t = Table::new(
            cols(&["x"]),
            vec![
                vec![Cell::Integer(80)],
                vec![Cell::Null],
                vec![Cell::Float(70.0)],
            ],
        );
        assert_eq!(t.column_mean("x").unwrap(), Some(75.0));

        let bad = Table::new(cols(&["x"]), vec![vec![Cell::Text("n/a".to_string())]]);
        assert!(matches!(
            bad.column_mean("x"),
            Err(DataError::NotNumeric { row: 0, .. })
        ));
    }

    #[test]
    fn column_mean_of_empty_table_is_none() {
        let t = Table::new(cols(&["x"]), Vec::new());
        assert_eq!(t.column_mean("x").unwrap(), None);
    }

    #[test]
    fn nan_cells_are_skipped_in_means_and_zero_in_sums() {
        let t = Table::new(
            cols(&["x"]),
            vec![vec![Cell::Float(f64::NAN)], vec![Cell::Integer(70)]],
        );
        assert_eq!(t.column_mean("x").unwrap(), Some(70.0));
        assert_eq!(t.integer(0, 0).unwrap(), 0);
    }
}
