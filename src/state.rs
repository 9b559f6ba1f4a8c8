use std::path::{Path, PathBuf};

use crate::color::ColorMap;
use crate::data::filter::{FilterOptions, FilterSelection};
use crate::data::loader;
use crate::data::model::{Department, Table};
use crate::data::view::{recompute, ViewModel};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file is loaded). Never mutated once set.
    pub dataset: Option<Table>,

    /// File the dataset came from.
    pub source: Option<PathBuf>,

    /// Years and terms offered by the filter widgets.
    pub options: FilterOptions,

    /// Current multi-select state.
    pub selection: FilterSelection,

    /// Output of the last successful recomputation pass.
    pub view: Option<ViewModel>,

    /// Per-term line colours.
    pub term_colors: ColorMap,

    /// Per-department bar colours.
    pub department_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load `path` and make it the current dataset; failures land in `status_message`.
    pub fn open(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows with columns {:?} from {}",
                    dataset.len(),
                    dataset.columns,
                    path.display()
                );
                self.source = Some(path.to_path_buf());
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset, reset filters and colours, recompute.
    pub fn set_dataset(&mut self, dataset: Table) {
        self.selection = FilterSelection::default();
        self.options = match FilterOptions::from_table(&dataset) {
            Ok(options) => options,
            Err(e) => {
                log::warn!("No filter options: {e}");
                FilterOptions::default()
            }
        };
        self.term_colors = ColorMap::new(self.options.terms.iter().cloned());
        self.department_colors = ColorMap::new(Department::ALL.iter().map(|d| d.name()));

        self.dataset = Some(dataset);
        self.status_message = None;
        self.recompute();
    }

    /// Re-run the filter → summarize → insights pipeline for the current selection.
    pub fn recompute(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        match recompute(dataset, &self.selection) {
            Ok(view) => {
                self.view = Some(view);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Recompute failed: {e}");
                self.view = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn toggle_year(&mut self, year: i64) {
        if !self.selection.years.remove(&year) {
            self.selection.years.insert(year);
        }
        self.recompute();
    }

    pub fn toggle_term(&mut self, term: &str) {
        if !self.selection.terms.remove(term) {
            self.selection.terms.insert(term.to_string());
        }
        self.recompute();
    }

    pub fn toggle_department(&mut self, department: Department) {
        if !self.selection.departments.remove(&department) {
            self.selection.departments.insert(department);
        }
        self.recompute();
    }

    /// Select every value of one filter dimension.
    pub fn select_all(&mut self, dimension: Dimension) {
        match dimension {
            Dimension::Years => self.selection.years = self.options.years.iter().copied().collect(),
            Dimension::Terms => self.selection.terms = self.options.terms.iter().cloned().collect(),
            Dimension::Departments => {
                self.selection.departments = Department::ALL.into_iter().collect()
            }
        }
        self.recompute();
    }

    /// Clear one filter dimension, which removes that filter.
    pub fn clear(&mut self, dimension: Dimension) {
        match dimension {
            Dimension::Years => self.selection.years.clear(),
            Dimension::Terms => self.selection.terms.clear(),
            Dimension::Departments => self.selection.departments.clear(),
        }
        self.recompute();
    }
}

/// One of the three multi-select widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Years,
    Terms,
    Departments,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv;

    const CSV: &str = "\
Year,Term,Applications,Admitted,Enrolled,Retention Rate (%),Student Satisfaction (%),Engineering Enrolled,Business Enrolled,Arts Enrolled,Science Enrolled
2020,Fall,2400,1400,700,82,70,210,180,150,160
2020,Spring,2200,1300,650,76,80,190,170,N/A,150
2021,Fall,2500,1450,720,85,79,220,185,155,160
";

    fn loaded_state() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(load_csv(CSV.as_bytes()).unwrap());
        state
    }

    #[test]
    fn loading_builds_options_and_initial_view() {
        let state = loaded_state();
        assert_eq!(state.options.years, vec![2020, 2021]);
        assert_eq!(state.options.terms, vec!["Fall".to_string(), "Spring".to_string()]);
        let view = state.view.as_ref().unwrap();
        assert_eq!(view.table.len(), 3);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn toggling_recomputes_the_view() {
        let mut state = loaded_state();
        state.toggle_year(2021);
        assert_eq!(state.view.as_ref().unwrap().table.len(), 1);

        state.toggle_year(2021);
        assert!(state.selection.years.is_empty());
        assert_eq!(state.view.as_ref().unwrap().table.len(), 3);
    }

    #[test]
    fn department_toggle_projects_table_only() {
        let mut state = loaded_state();
        state.toggle_department(Department::Arts);
        let view = state.view.as_ref().unwrap();
        assert_eq!(view.table.columns, vec!["Year", "Term", "Arts Enrolled"]);
        assert_eq!(view.summary.len(), 3);

        state.clear(Dimension::Departments);
        assert_eq!(state.view.as_ref().unwrap().table.columns.len(), 11);
    }

    #[test]
    fn select_all_terms_keeps_every_row() {
        let mut state = loaded_state();
        state.select_all(Dimension::Terms);
        assert_eq!(state.selection.terms.len(), 2);
        assert_eq!(state.view.as_ref().unwrap().table.len(), 3);
    }

    #[test]
    fn failed_open_reports_status() {
        let mut state = AppState::default();
        state.open(Path::new("missing_dashboard_data.csv"));
        assert!(state.dataset.is_none());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error:"));
    }
}
