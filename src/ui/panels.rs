use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::insights::Severity;
use crate::data::model::Department;
use crate::data::view::ViewModel;
use crate::state::{AppState, Dimension};
use crate::ui::{plot, tables};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel. Every change triggers one recompute pass.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    let years = state.options.years.clone();
    let terms = state.options.terms.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            filter_group(ui, state, Dimension::Years, "Select Year(s)", years.len(), |ui, state| {
                for &year in &years {
                    let mut checked = state.selection.years.contains(&year);
                    if ui.checkbox(&mut checked, year.to_string()).changed() {
                        state.toggle_year(year);
                    }
                }
            });

            filter_group(ui, state, Dimension::Terms, "Select Term(s)", terms.len(), |ui, state| {
                for term in &terms {
                    let mut checked = state.selection.terms.contains(term);
                    let text = RichText::new(term).color(state.term_colors.color_for(term));
                    if ui.checkbox(&mut checked, text).changed() {
                        state.toggle_term(term);
                    }
                }
            });

            filter_group(
                ui,
                state,
                Dimension::Departments,
                "Select Department(s)",
                Department::ALL.len(),
                |ui, state| {
                    for department in Department::ALL {
                        let mut checked = state.selection.departments.contains(&department);
                        let text = RichText::new(department.name())
                            .color(state.department_colors.color_for(department.name()));
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_department(department);
                        }
                    }
                },
            );
        });
}

/// Collapsible group with All / Clear buttons; nothing selected means no filter.
fn filter_group(
    ui: &mut Ui,
    state: &mut AppState,
    dimension: Dimension,
    title: &str,
    n_total: usize,
    body: impl FnOnce(&mut Ui, &mut AppState),
) {
    let n_selected = match dimension {
        Dimension::Years => state.selection.years.len(),
        Dimension::Terms => state.selection.terms.len(),
        Dimension::Departments => state.selection.departments.len(),
    };
    let header_text = if n_selected == 0 {
        format!("{title}  (all)")
    } else {
        format!("{title}  ({n_selected}/{n_total})")
    };

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(dimension);
                }
                if ui.small_button("Clear").clicked() {
                    state.clear(dimension);
                }
            });
            body(ui, state);
        });
}

// ---------------------------------------------------------------------------
// Central panel – tables, charts and findings
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        ui.centered_and_justified(|ui: &mut Ui| {
            let hint = if state.dataset.is_some() {
                "The current filters could not be applied; see the error above."
            } else {
                "Open a file to view the dashboard  (File → Open…)"
            };
            ui.heading(hint);
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("University Student Trends Dashboard");
            ui.add_space(8.0);

            ui.strong("Filtered Data");
            tables::data_table(ui, "filtered_data", &view.table);
            ui.add_space(12.0);

            ui.strong("Key Metrics");
            tables::data_table(ui, "key_metrics", &view.summary.to_table());
            ui.add_space(12.0);

            ui.strong("Retention Rate Trends Over Time");
            plot::trend_plot(ui, "retention_plot", "Retention Rate (%)", &view.retention, state);
            ui.add_space(12.0);

            ui.strong("Student Satisfaction Trends Over Time");
            plot::trend_plot(
                ui,
                "satisfaction_plot",
                "Student Satisfaction (%)",
                &view.satisfaction,
                state,
            );
            ui.add_space(12.0);

            ui.strong("Enrollment Breakdown by Department");
            plot::enrollment_plot(ui, &view.enrollment, state);
            ui.add_space(12.0);

            ui.strong("Comparison Between Spring vs. Fall Term");
            plot::comparison_plots(ui, &view.comparison);
            ui.add_space(12.0);

            insights(ui, view);
        });
}

fn insights(ui: &mut Ui, view: &ViewModel) {
    ui.strong("Key Findings & Actionable Insights");
    for insight in &view.insights {
        let text = RichText::new(insight.to_string());
        let text = match insight.severity {
            Severity::Warning => text.color(Color32::from_rgb(230, 140, 40)),
            Severity::Info => text,
        };
        ui.label(text);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let visible = state.view.as_ref().map_or(0, |v| v.table.len());
            ui.label(format!("{} rows loaded, {visible} visible", ds.len()));
        }

        if let Some(path) = &state.source {
            ui.separator();
            ui.label(path.display().to_string());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open university statistics")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
