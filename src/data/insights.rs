use std::fmt;

use super::error::DataResult;
use super::filter::FilterSelection;
use super::model::{Table, RETENTION_RATE, SATISFACTION};

/// Mean retention below this is flagged.
pub const RETENTION_THRESHOLD: f64 = 80.0;
/// Mean satisfaction below this is flagged.
pub const SATISFACTION_THRESHOLD: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

/// One line of the "Key Findings & Actionable Insights" section.
#[derive(Debug, Clone, PartialEq)]
pub struct Insight {
    pub severity: Severity,
    pub text: String,
}

impl Insight {
    fn info(text: impl Into<String>) -> Self {
        Insight { severity: Severity::Info, text: text.into() }
    }

    fn warning(text: impl Into<String>) -> Self {
        Insight { severity: Severity::Warning, text: text.into() }
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Retention insight, satisfaction insight and filter summary, in that order.
///
/// Selected years and terms are listed in ascending order.
pub fn derive_insights(view: &Table, selection: &FilterSelection) -> DataResult<Vec<Insight>> {
    let retention = match view.column_mean(RETENTION_RATE)? {
        None => Insight::info("No retention data in the current view; retention cannot be assessed."),
        Some(mean) if mean < RETENTION_THRESHOLD => Insight::warning(format!(
            "The average retention rate is {mean:.1}%, below 80%. \
             It may be necessary to investigate the causes of student attrition."
        )),
        Some(mean) => Insight::info(format!(
            "The average retention rate is {mean:.1}%, at or above 80%. Retention is stable."
        )),
    };

    let satisfaction = match view.column_mean(SATISFACTION)? {
        None => Insight::info("No satisfaction data in the current view; satisfaction cannot be assessed."),
        Some(mean) if mean < SATISFACTION_THRESHOLD => Insight::warning(format!(
            "The average student satisfaction is {mean:.1}%, below 75%. Conducting surveys \
             to understand student concerns and addressing them might help improve this."
        )),
        Some(mean) => Insight::info(format!(
            "The average student satisfaction is {mean:.1}%, at or above 75%, \
             indicating a positive student experience."
        )),
    };

    Ok(vec![retention, satisfaction, filter_summary(selection)])
}

fn filter_summary(selection: &FilterSelection) -> Insight {
    if selection.years.is_empty() && selection.terms.is_empty() {
        return Insight::info("No year or term filters applied; displaying all years and terms.");
    }
    let years = if selection.years.is_empty() {
        "all".to_string()
    } else {
        selection
            .years
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let terms = if selection.terms.is_empty() {
        "all".to_string()
    } else {
        selection.terms.iter().cloned().collect::<Vec<_>>().join(", ")
    };
    Insight::info(format!(
        "Displaying data for the selected years: {years} and terms: {terms}."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Cell, TERM, YEAR};

    fn rates_table(rows: &[(i64, &str, f64, f64)]) -> Table {
        Table::new(
            vec![
                YEAR.to_string(),
                TERM.to_string(),
                RETENTION_RATE.to_string(),
                SATISFACTION.to_string(),
            ],
            rows.iter()
                .map(|(y, t, r, s)| {
                    vec![
                        Cell::Integer(*y),
                        Cell::Text(t.to_string()),
                        Cell::Float(*r),
                        Cell::Float(*s),
                    ]
                })
                .collect(),
        )
    }

    #[test]
    fn retention_mean_below_threshold_warns_and_boundary_satisfaction_is_positive() {
        let view = rates_table(&[(2020, "Fall", 82.0, 70.0), (2020, "Spring", 76.0, 80.0)]);
        let selection = FilterSelection {
            years: [2020].into_iter().collect(),
            ..Default::default()
        };
        let insights = derive_insights(&view, &selection).unwrap();

        assert_eq!(insights.len(), 3);
        assert_eq!(insights[0].severity, Severity::Warning);
        assert!(insights[0].text.contains("79.0%"));
        assert!(insights[0].text.contains("below 80%"));

        assert_eq!(insights[1].severity, Severity::Info);
        assert!(insights[1].text.contains("75.0%"));
        assert!(insights[1].text.contains("positive"));

        assert_eq!(
            insights[2].text,
            "Displaying data for the selected years: 2020 and terms: all."
        );
    }

    #[test]
    fn healthy_rates_give_stable_statements() {
        let view = rates_table(&[(2021, "Fall", 90.0, 88.0)]);
        let insights = derive_insights(&view, &FilterSelection::default()).unwrap();
        assert!(insights[0].text.contains("stable"));
        assert!(insights[1].text.contains("positive"));
        assert!(insights[2].text.starts_with("No year or term filters applied"));
        assert!(insights.iter().all(|i| i.severity == Severity::Info));
    }

    #[test]
    fn low_satisfaction_warns() {
        let view = rates_table(&[(2021, "Fall", 90.0, 60.0)]);
        let insights = derive_insights(&view, &FilterSelection::default()).unwrap();
        assert_eq!(insights[1].severity, Severity::Warning);
        assert!(insights[1].text.contains("below 75%"));
    }

    #[test]
    fn missing_rates_are_excluded_from_the_means() {
        let mut view = rates_table(&[(2020, "Fall", 70.0, 60.0), (2020, "Spring", f64::NAN, 0.0)]);
        view.rows[1][3] = Cell::Null;
        let insights = derive_insights(&view, &FilterSelection::default()).unwrap();

        assert_eq!(insights[0].severity, Severity::Warning);
        assert!(insights[0].text.contains("70.0%"));
        assert_eq!(insights[1].severity, Severity::Warning);
        assert!(insights[1].text.contains("60.0%"));
    }

    #[test]
    fn empty_view_still_yields_one_insight_per_topic() {
        let view = rates_table(&[]);
        let selection = FilterSelection {
            years: [2019, 2021].into_iter().collect(),
            terms: ["Fall".to_string(), "Spring".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let insights = derive_insights(&view, &selection).unwrap();
        assert_eq!(insights.len(), 3);
        assert!(insights[0].text.starts_with("No retention data"));
        assert!(insights[1].text.starts_with("No satisfaction data"));
        assert_eq!(
            insights[2].text,
            "Displaying data for the selected years: 2019, 2021 and terms: Fall, Spring."
        );
    }
}
