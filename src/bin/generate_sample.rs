use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "generate_sample")]
#[command(about = "Write a deterministic sample of university statistics as CSV", long_about = None)]
struct Cli {
    /// Output CSV path
    #[arg(default_value = "university_student_dashboard_data.csv")]
    output: PathBuf,

    /// Seed for the generator
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// One (Year, Term) row with the dashboard's column headers.
#[derive(Serialize)]
struct Record {
    #[serde(rename = "Year")]
    year: i64,
    #[serde(rename = "Term")]
    term: &'static str,
    #[serde(rename = "Applications")]
    applications: i64,
    #[serde(rename = "Admitted")]
    admitted: i64,
    #[serde(rename = "Enrolled")]
    enrolled: i64,
    #[serde(rename = "Retention Rate (%)")]
    retention_rate: f64,
    #[serde(rename = "Student Satisfaction (%)")]
    satisfaction: f64,
    #[serde(rename = "Engineering Enrolled")]
    engineering: i64,
    #[serde(rename = "Business Enrolled")]
    business: i64,
    #[serde(rename = "Arts Enrolled")]
    arts: i64,
    #[serde(rename = "Science Enrolled")]
    science: i64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform in `[lo, hi)`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        lo + (hi - lo) * unit
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn generate(rng: &mut SimpleRng) -> Vec<Record> {
    let mut records = Vec::new();
    for (i, year) in (2015..=2024).enumerate() {
        let growth = 1.0 + 0.04 * i as f64;
        for (term, scale) in [("Spring", 0.9), ("Fall", 1.0)] {
            let applications = (2500.0 * growth * scale * rng.uniform(0.95, 1.05)).round() as i64;
            let admitted = (applications as f64 * rng.uniform(0.55, 0.65)).round() as i64;
            let enrolled = (admitted as f64 * rng.uniform(0.45, 0.55)).round() as i64;

            // Department shares sum to the total enrollment.
            let engineering = (enrolled as f64 * rng.uniform(0.28, 0.34)).round() as i64;
            let business = (enrolled as f64 * rng.uniform(0.24, 0.28)).round() as i64;
            let arts = (enrolled as f64 * rng.uniform(0.17, 0.21)).round() as i64;
            let science = enrolled - engineering - business - arts;

            records.push(Record {
                year,
                term,
                applications,
                admitted,
                enrolled,
                retention_rate: round1(rng.uniform(76.0, 92.0)),
                satisfaction: round1(rng.uniform(72.0, 90.0)),
                engineering,
                business,
                arts,
                science,
            });
        }
    }
    records
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output_path = cli.output;

    let records = generate(&mut SimpleRng::new(cli.seed));

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    for record in &records {
        writer.serialize(record).context("writing CSV record")?;
    }
    writer.flush().context("flushing CSV writer")?;

    println!("Wrote {} rows to {}", records.len(), output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn departments_add_up_to_enrollment() {
        let records = generate(&mut SimpleRng::new(7));
        assert_eq!(records.len(), 20);
        for r in &records {
            assert_eq!(r.engineering + r.business + r.arts + r.science, r.enrolled);
            assert!(r.admitted <= r.applications);
            assert!((76.0..=92.0).contains(&r.retention_rate));
        }
    }

    #[test]
    fn cli_defaults_to_the_dashboard_file() {
        let cli = Cli::try_parse_from(["generate_sample"]).unwrap();
        assert_eq!(cli.output, PathBuf::from("university_student_dashboard_data.csv"));
        assert_eq!(cli.seed, 42);

        let cli = Cli::try_parse_from(["generate_sample", "out.csv", "--seed", "7"]).unwrap();
        assert_eq!(cli.output, PathBuf::from("out.csv"));
        assert_eq!(cli.seed, 7);
    }

    #[test]
    fn same_seed_same_data() {
        let a = generate(&mut SimpleRng::new(42));
        let b = generate(&mut SimpleRng::new(42));
        assert!(a.iter().zip(&b).all(|(x, y)| x.applications == y.applications));
    }
}
