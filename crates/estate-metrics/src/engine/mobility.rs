use super::banding::{Band, BandDirection, BandError, ThresholdBands};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MobilityScoreSet {
    pub walk_score: u8,
    pub transit_score: u8,
    pub bike_score: u8,
}

impl MobilityScoreSet {
    pub const fn new(walk_score: u8, transit_score: u8, bike_score: u8) -> Self {
        Self {
            walk_score,
            transit_score,
            bike_score,
        }
    }

    /// Returned for any location missing from the table.
    pub const DEFAULT: Self = Self::new(75, 70, 65);

    fn clamped(self) -> Self {
        Self::new(
            self.walk_score.min(100),
            self.transit_score.min(100),
            self.bike_score.min(100),
        )
    }

    /// Mean of the three category scores.
    pub fn composite(&self) -> f64 {
        (f64::from(self.walk_score) + f64::from(self.transit_score) + f64::from(self.bike_score))
            / 3.0
    }
}

/// Ordered best first, so `Excellent < Weak`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MobilityLabel {
    Excellent,
    VeryGood,
    Good,
    Average,
    Weak,
}

impl MobilityLabel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::VeryGood => "Très bon",
            Self::Good => "Bon",
            Self::Average => "Moyen",
            Self::Weak => "Faible",
        }
    }

    pub fn standard_bands() -> ThresholdBands<MobilityLabel> {
        ThresholdBands::from_trusted(
            BandDirection::AtLeast,
            vec![
                Band::new(90.0, Self::Excellent),
                Band::new(80.0, Self::VeryGood),
                Band::new(70.0, Self::Good),
                Band::new(60.0, Self::Average),
            ],
            Self::Weak,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreEntry {
    pub score: u8,
    pub label: MobilityLabel,
    pub label_text: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MobilityAssessment {
    pub location: String,
    /// `false` when the location fell back to the default scores.
    pub matched: bool,
    pub scores: MobilityScoreSet,
    pub walk: ScoreEntry,
    pub transit: ScoreEntry,
    pub bike: ScoreEntry,
    pub composite: f64,
}

/// City-level score lookup with a soft fallback for unknown keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobilityTable {
    #[serde(default)]
    cities: BTreeMap<String, MobilityScoreSet>,
    #[serde(default = "default_scores")]
    default: MobilityScoreSet,
    #[serde(default = "MobilityLabel::standard_bands")]
    labels: ThresholdBands<MobilityLabel>,
}

fn default_scores() -> MobilityScoreSet {
    MobilityScoreSet::DEFAULT
}

fn normalize_key(location: &str) -> String {
    location.trim().to_lowercase()
}

impl MobilityTable {
    pub fn new<I, K>(cities: I, default: MobilityScoreSet) -> Self
    where
        I: IntoIterator<Item = (K, MobilityScoreSet)>,
        K: AsRef<str>,
    {
        Self {
            cities: cities
                .into_iter()
                .map(|(city, scores)| (normalize_key(city.as_ref()), scores.clamped()))
                .collect(),
            default: default.clamped(),
            labels: MobilityLabel::standard_bands(),
        }
    }

    pub fn standard() -> Self {
        Self::new(
            [
                ("Paris", MobilityScoreSet::new(92, 95, 78)),
                ("Lyon", MobilityScoreSet::new(88, 85, 80)),
                ("Marseille", MobilityScoreSet::new(76, 68, 55)),
                ("Bordeaux", MobilityScoreSet::new(85, 78, 88)),
                ("Toulouse", MobilityScoreSet::new(80, 74, 76)),
                ("Nice", MobilityScoreSet::new(83, 72, 60)),
                ("Nantes", MobilityScoreSet::new(84, 80, 86)),
                ("Lille", MobilityScoreSet::new(86, 82, 79)),
                ("Strasbourg", MobilityScoreSet::new(87, 81, 93)),
                ("Montpellier", MobilityScoreSet::new(81, 75, 77)),
                ("Rennes", MobilityScoreSet::new(82, 79, 84)),
            ],
            MobilityScoreSet::DEFAULT,
        )
    }

    pub fn with_labels(mut self, labels: ThresholdBands<MobilityLabel>) -> Self {
        self.labels = labels;
        self
    }

    /// Normalizes keys and scores after deserialization.
    pub fn validate(self) -> Result<Self, BandError> {
        self.labels.validate_graded(BandDirection::AtLeast)?;
        let labels = self.labels;
        Ok(Self::new(self.cities, self.default).with_labels(labels))
    }

    pub fn cities(&self) -> impl Iterator<Item = (&str, &MobilityScoreSet)> {
        self.cities.iter().map(|(city, scores)| (city.as_str(), scores))
    }

    pub fn default_scores(&self) -> MobilityScoreSet {
        self.default
    }

    pub fn lookup(&self, location: &str) -> MobilityScoreSet {
        self.resolve(location).0
    }

    fn resolve(&self, location: &str) -> (MobilityScoreSet, bool) {
        match self.cities.get(&normalize_key(location)) {
            Some(scores) => (*scores, true),
            None => {
                debug!(location, "no mobility data for location; using default scores");
                (self.default, false)
            }
        }
    }

    pub fn label(&self, score: u8) -> MobilityLabel {
        *self.labels.classify(f64::from(score))
    }

    fn entry(&self, score: u8) -> ScoreEntry {
        let label = self.label(score);
        ScoreEntry {
            score,
            label,
            label_text: label.label(),
        }
    }

    pub fn assess(&self, location: &str) -> MobilityAssessment {
        let (scores, matched) = self.resolve(location);
        MobilityAssessment {
            location: location.trim().to_string(),
            matched,
            scores,
            walk: self.entry(scores.walk_score),
            transit: self.entry(scores.transit_score),
            bike: self.entry(scores.bike_score),
            composite: scores.composite(),
        }
    }
}

impl Default for MobilityTable {
    fn default() -> Self {
        Self::standard()
    }
}
