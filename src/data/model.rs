use std::fmt;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Sentinels and fixed option lists
// ---------------------------------------------------------------------------

/// Location code of the worldwide aggregate rows.
pub const GLOBAL_LOCATION: &str = "G";

/// Location code whose rows make up the local half of the initial view.
pub const INITIAL_LOCAL_LOCATION: &str = "D0";

/// Age group id of the "2 to 19" bucket.
pub const CHILDREN_AGE_GROUP: &str = "36";

/// Age group id of the "20+" bucket.
pub const ADULTS_AGE_GROUP: &str = "38";

pub const FIRST_YEAR: u16 = 1990;
pub const LAST_YEAR: u16 = 2013;

/// Every year covered by the study, oldest first.
pub fn year_options() -> Vec<u16> {
    (FIRST_YEAR..=LAST_YEAR).collect()
}

// ---------------------------------------------------------------------------
// Enumerated columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    Both,
}

impl Sex {
    pub const ALL: [Sex; 3] = [Sex::Male, Sex::Female, Sex::Both];

    /// What the sex selector shows before the user picks one. Matches the
    /// `sex_id == "1"` rows of the initial view.
    pub const DEFAULT: Sex = Sex::Male;
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "male"),
            Sex::Female => write!(f, "female"),
            Sex::Both => write!(f, "both"),
        }
    }
}

/// BMI classification the prevalence refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// BMI ≥ 25
    Overweight,
    /// BMI ≥ 30
    Obese,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Overweight, Metric::Obese];

    /// Legend caption including the BMI threshold.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Overweight => "Overweight (BMI≥25)",
            Metric::Obese => "Obese (BMI≥30)",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Overweight => write!(f, "overweight"),
            Metric::Obese => write!(f, "obese"),
        }
    }
}

/// Coarse age stratification derived from `age_group_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgeBand {
    /// Ages 2 to 19, drawn as an arc.
    Children,
    /// Ages 20+, drawn as an arc.
    Adults,
    /// Any other bucket; these feed the bar chart.
    Other,
}

impl AgeBand {
    pub fn from_age_group_id(id: &str) -> Self {
        match id {
            CHILDREN_AGE_GROUP => AgeBand::Children,
            ADULTS_AGE_GROUP => AgeBand::Adults,
            _ => AgeBand::Other,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AgeBand::Children => "Ages 2 to 19",
            AgeBand::Adults => "Ages 20+",
            AgeBand::Other => "By age group",
        }
    }
}

/// Whether a statistic belongs to one location or to the worldwide aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    Local,
    Global,
}

// ---------------------------------------------------------------------------
// PrevalenceRecord – one row of the CSV
// ---------------------------------------------------------------------------

/// A single prevalence estimate. Columns not listed here are ignored on load.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PrevalenceRecord {
    pub location_id: String,
    #[serde(rename = "location")]
    pub location_code: String,
    pub location_name: String,
    pub age_group_id: String,
    pub age_group: String,
    pub year: u16,
    pub sex: Sex,
    pub sex_id: String,
    pub metric: Metric,
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
}

impl PrevalenceRecord {
    pub fn scope(&self) -> Scope {
        if self.location_code == GLOBAL_LOCATION {
            Scope::Global
        } else {
            Scope::Local
        }
    }

    pub fn age_band(&self) -> AgeBand {
        AgeBand::from_age_group_id(&self.age_group_id)
    }
}

// ---------------------------------------------------------------------------
// Location options for the country/region selector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    Region,
    Country,
}

impl LocationKind {
    /// A code containing a letter directly followed by a digit anywhere
    /// (`R1`, `D0`, `X_R1`) is a region; plain ISO-style letters are countries.
    pub fn from_code(code: &str) -> Self {
        let is_region = code
            .as_bytes()
            .windows(2)
            .any(|pair| pair[0].is_ascii_alphabetic() && pair[1].is_ascii_digit());
        if is_region {
            LocationKind::Region
        } else {
            LocationKind::Country
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationOption {
    pub id: String,
    pub name: String,
    pub kind: LocationKind,
}

// ---------------------------------------------------------------------------
// PrevalenceDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table with indexes built once at load time.
#[derive(Debug, Clone)]
pub struct PrevalenceDataset {
    /// All rows in file order. Never mutated after construction.
    records: Vec<PrevalenceRecord>,
    /// Selectable locations, first-occurrence order.
    locations: Vec<LocationOption>,
    /// Largest `mean` over every row.
    max_mean: f64,
}

impl PrevalenceDataset {
    pub fn from_records(records: Vec<PrevalenceRecord>) -> Self {
        let mut locations: Vec<LocationOption> = Vec::new();
        for rec in &records {
            if rec.scope() == Scope::Global {
                continue;
            }
            if locations.iter().any(|l| l.name == rec.location_name) {
                continue;
            }
            locations.push(LocationOption {
                id: rec.location_id.clone(),
                name: rec.location_name.clone(),
                kind: LocationKind::from_code(&rec.location_code),
            });
        }

        let max_mean = records
            .iter()
            .map(|r| r.mean)
            .fold(None, |acc: Option<f64>, m| Some(acc.map_or(m, |a| a.max(m))))
            .unwrap_or(0.0);

        PrevalenceDataset {
            records,
            locations,
            max_mean,
        }
    }

    pub fn records(&self) -> &[PrevalenceRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> &PrevalenceRecord {
        &self.records[index]
    }

    pub fn max_mean(&self) -> f64 {
        self.max_mean
    }

    /// Locations of one kind, in first-occurrence order.
    pub fn locations(&self, kind: LocationKind) -> impl Iterator<Item = &LocationOption> {
        self.locations.iter().filter(move |l| l.kind == kind)
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Format a prevalence fraction the way the chart labels it (`0.1234` → `12.3%`).
pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    #[allow(clippy::too_many_arguments)]
    pub fn record(
        code: &str,
        name: &str,
        age_group_id: &str,
        age_group: &str,
        year: u16,
        sex: Sex,
        metric: Metric,
        mean: f64,
    ) -> PrevalenceRecord {
        let sex_id = match sex {
            Sex::Male => "1",
            Sex::Female => "2",
            Sex::Both => "3",
        };
        PrevalenceRecord {
            location_id: code.to_string(),
            location_code: code.to_string(),
            location_name: name.to_string(),
            age_group_id: age_group_id.to_string(),
            age_group: age_group.to_string(),
            year,
            sex,
            sex_id: sex_id.to_string(),
            metric,
            mean,
            lower: mean * 0.8,
            upper: mean * 1.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::record;
    use super::*;

    #[test]
    fn age_band_sentinels() {
        assert_eq!(AgeBand::from_age_group_id("36"), AgeBand::Children);
        assert_eq!(AgeBand::from_age_group_id("38"), AgeBand::Adults);
        assert_eq!(AgeBand::from_age_group_id("2"), AgeBand::Other);
        assert_eq!(AgeBand::from_age_group_id(""), AgeBand::Other);
    }

    #[test]
    fn region_codes_are_letters_then_digits() {
        assert_eq!(LocationKind::from_code("R1"), LocationKind::Region);
        assert_eq!(LocationKind::from_code("D0"), LocationKind::Region);
        assert_eq!(LocationKind::from_code("KEN"), LocationKind::Country);
        assert_eq!(LocationKind::from_code("1"), LocationKind::Country);
        assert_eq!(LocationKind::from_code(""), LocationKind::Country);
        assert_eq!(LocationKind::from_code("X_R1"), LocationKind::Region);
        assert_eq!(LocationKind::from_code("1A"), LocationKind::Country);
        assert_eq!(LocationKind::from_code("9R12"), LocationKind::Region);
    }

    #[test]
    fn locations_skip_global_and_keep_first_occurrence_order() {
        let ds = PrevalenceDataset::from_records(vec![
            record("KEN", "Kenya", "36", "2 to 19", 2000, Sex::Male, Metric::Obese, 0.1),
            record("G", "Global", "36", "2 to 19", 2000, Sex::Male, Metric::Obese, 0.2),
            record("R1", "Eastern Africa", "36", "2 to 19", 2000, Sex::Male, Metric::Obese, 0.1),
            record("KEN", "Kenya", "38", "20+", 2000, Sex::Male, Metric::Obese, 0.3),
            record("USA", "United States", "38", "20+", 2000, Sex::Male, Metric::Obese, 0.4),
        ]);

        let countries: Vec<&str> = ds
            .locations(LocationKind::Country)
            .map(|l| l.name.as_str())
            .collect();
        let regions: Vec<&str> = ds
            .locations(LocationKind::Region)
            .map(|l| l.name.as_str())
            .collect();

        assert_eq!(countries, ["Kenya", "United States"]);
        assert_eq!(regions, ["Eastern Africa"]);
        assert_eq!(ds.location_count(), 3);
    }

    #[test]
    fn max_mean_covers_every_row() {
        let ds = PrevalenceDataset::from_records(vec![
            record("KEN", "Kenya", "36", "2 to 19", 2000, Sex::Male, Metric::Obese, 0.1),
            record("G", "Global", "2", "2 to 4", 1990, Sex::Both, Metric::Overweight, 0.7),
        ]);
        assert_eq!(ds.max_mean(), 0.7);
        assert_eq!(PrevalenceDataset::from_records(Vec::new()).max_mean(), 0.0);
    }

    #[test]
    fn percent_uses_one_decimal() {
        assert_eq!(format_percent(0.12), "12.0%");
        assert_eq!(format_percent(0.08349), "8.3%");
        assert_eq!(format_percent(1.0), "100.0%");
    }

    #[test]
    fn year_options_span_the_study() {
        let years = year_options();
        assert_eq!(years.len(), 24);
        assert_eq!(years.first(), Some(&1990));
        assert_eq!(years.last(), Some(&2013));
    }
}
