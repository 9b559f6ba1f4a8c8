use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, MarkerShape, Plot, PlotPoints, Points};

use crate::color::generate_palette;
use crate::data::view::{Comparison, Series, StackedBars};
use crate::state::AppState;

const PLOT_HEIGHT: f32 = 260.0;

/// Marker per series in the comparison panels (circle, cross, square).
const MARKERS: [MarkerShape; 3] = [MarkerShape::Circle, MarkerShape::Cross, MarkerShape::Square];

// ---------------------------------------------------------------------------
// Trend lines: one line per term against Year
// ---------------------------------------------------------------------------

pub fn trend_plot(ui: &mut Ui, id: &str, y_label: &str, series: &[Series], state: &AppState) {
    Plot::new(id)
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label(y_label)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for s in series {
                let term = s.name.trim_end_matches(" Term");
                let points: PlotPoints = s.points.iter().copied().collect();
                plot_ui.line(
                    Line::new(points)
                        .name(&s.name)
                        .color(state.term_colors.color_for(term))
                        .width(2.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Stacked department bars keyed by (Year, Term)
// ---------------------------------------------------------------------------

pub fn enrollment_plot(ui: &mut Ui, bars: &StackedBars, state: &AppState) {
    let categories = bars.categories.clone();

    Plot::new("enrollment_plot")
        .legend(Legend::default())
        .height(PLOT_HEIGHT + 60.0)
        .x_axis_label("Year and Term")
        .y_axis_label("Number of Enrollments")
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            categories.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            let mut charts: Vec<BarChart> = Vec::with_capacity(bars.segments.len());
            for segment in &bars.segments {
                let name = segment.department.name();
                let segment_bars = segment
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| Bar::new(i as f64, v).width(0.7))
                    .collect();
                let chart = {
                    let below: Vec<&BarChart> = charts.iter().collect();
                    BarChart::new(segment_bars)
                        .name(name)
                        .color(state.department_colors.color_for(name))
                        .stack_on(&below)
                };
                charts.push(chart);
            }
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Spring vs Fall: counts panel and rates panel side by side
// ---------------------------------------------------------------------------

pub fn comparison_plots(ui: &mut Ui, comparison: &Comparison) {
    ui.columns(2, |columns: &mut [Ui]| {
        marker_plot(
            &mut columns[0],
            "comparison_counts",
            "Applications, Admissions, and Enrollments (Spring vs Fall)",
            "Count",
            &comparison.counts,
        );
        marker_plot(
            &mut columns[1],
            "comparison_rates",
            "Retention Rate and Satisfaction (Spring vs Fall)",
            "%",
            &comparison.rates,
        );
    });
}

fn marker_plot(ui: &mut Ui, id: &str, title: &str, y_label: &str, series: &[Series]) {
    ui.label(title);
    let colors = generate_palette(series.len());
    Plot::new(id)
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label(y_label)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, s) in series.iter().enumerate() {
                let color = colors.get(i).copied().unwrap_or(Color32::LIGHT_BLUE);
                let line: PlotPoints = s.points.iter().copied().collect();
                let markers: PlotPoints = s.points.iter().copied().collect();
                plot_ui.line(Line::new(line).name(&s.name).color(color).width(1.5));
                plot_ui.points(
                    Points::new(markers)
                        .name(&s.name)
                        .color(color)
                        .shape(MARKERS[i % MARKERS.len()])
                        .radius(4.0),
                );
            }
        });
}
