use std::path::PathBuf;

use clap::Parser;

/// Command-line configuration.
#[derive(Debug, Parser)]
#[command(name = "campus-trends")]
#[command(about = "Interactive dashboard for university enrollment, retention and satisfaction", long_about = None)]
pub struct Config {
    /// Dataset opened at startup (.csv, .json or .parquet)
    #[arg(
        env = "CAMPUS_TRENDS_DATA",
        default_value = "university_student_dashboard_data.csv"
    )]
    pub data: PathBuf,

    /// Initial window width in points
    #[arg(long, default_value_t = 1280.0)]
    pub width: f32,

    /// Initial window height in points
    #[arg(long, default_value_t = 900.0)]
    pub height: f32,
}
