//! Writes a synthetic prevalence table in the IHME GBD 2013 layout so the
//! viewer can be tried without the real dataset.

use anyhow::{Context, Result};
use serde::Serialize;

/// One output row. Field order matches the published CSV.
#[derive(Serialize)]
struct Row<'a> {
    location_id: u32,
    location: &'a str,
    location_name: &'a str,
    year: u16,
    age_group_id: &'a str,
    age_group: &'a str,
    sex_id: u8,
    sex: &'a str,
    unit: &'a str,
    metric: &'a str,
    measure: &'a str,
    mean: f64,
    lower: f64,
    upper: f64,
}

/// Seeded jitter source (splitmix64) so every run writes the same file.
struct Jitter(u64);

impl Jitter {
    /// Uniform noise in `[-amplitude, amplitude)`.
    fn next(&mut self, amplitude: f64) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        let unit = (z >> 11) as f64 / (1u64 << 53) as f64;
        (unit * 2.0 - 1.0) * amplitude
    }
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// (location_id, code, name, baseline logit)
const LOCATIONS: [(u32, &str, &str, f64); 6] = [
    (1, "G", "Global", -0.9),
    (2, "D0", "Developed", -0.2),
    (3, "R1", "Sub-Saharan Africa, East", -2.0),
    (180, "KEN", "Kenya", -1.8),
    (102, "USA", "United States", 0.3),
    (81, "DEU", "Germany", 0.0),
];

/// (age_group_id, label, logit offset)
const AGE_GROUPS: [(&str, &str, f64); 8] = [
    ("2", "2 to 4", -1.2),
    ("6", "5 to 9", -1.0),
    ("7", "10 to 14", -0.8),
    ("9", "20 to 24", -0.2),
    ("12", "35 to 39", 0.6),
    ("15", "50 to 54", 0.9),
    ("36", "2 to 19", -1.0),
    ("38", "20+", 0.7),
];

/// (sex_id, sex, logit offset)
const SEXES: [(u8, &str, f64); 3] = [(1, "male", 0.0), (2, "female", 0.15), (3, "both", 0.07)];

/// (metric, logit offset)
const METRICS: [(&str, f64); 2] = [("overweight", 0.0), ("obese", -1.3)];

fn main() -> Result<()> {
    let mut jitter = Jitter(42);

    let output_path = "sample_prevalence.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    let mut rows = 0usize;
    for &(location_id, code, name, base) in &LOCATIONS {
        for year in 1990u16..=2013 {
            // Prevalence creeps up over the study period.
            let trend = (year - 1990) as f64 * 0.025;
            for &(age_id, age_label, age_offset) in &AGE_GROUPS {
                for &(sex_id, sex, sex_offset) in &SEXES {
                    for &(metric, metric_offset) in &METRICS {
                        let logit = base + trend + age_offset + sex_offset + metric_offset;
                        let mean = logistic(logit + jitter.next(0.05));
                        let spread = 0.1 * mean * (1.0 - mean) + 0.002;
                        writer.serialize(Row {
                            location_id,
                            location: code,
                            location_name: name,
                            year,
                            age_group_id: age_id,
                            age_group: age_label,
                            sex_id,
                            sex,
                            unit: "",
                            metric,
                            measure: "prevalence",
                            mean,
                            lower: (mean - spread).max(0.0),
                            upper: (mean + spread).min(1.0),
                        })?;
                        rows += 1;
                    }
                }
            }
        }
    }
    writer.flush().context("flushing CSV")?;

    println!(
        "Wrote {rows} rows ({} locations, 1990-2013) to {output_path}",
        LOCATIONS.len()
    );
    Ok(())
}
