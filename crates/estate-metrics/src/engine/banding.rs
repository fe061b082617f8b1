use serde::{Deserialize, Serialize};

/// Which side of a threshold selects a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandDirection {
    /// `value <= threshold` selects the band; thresholds ascend.
    AtMost,
    /// `value >= threshold` selects the band; thresholds descend.
    AtLeast,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band<L> {
    pub threshold: f64,
    pub label: L,
}

impl<L> Band<L> {
    pub fn new(threshold: f64, label: L) -> Self {
        Self { threshold, label }
    }
}

/// Fixed, non-overlapping threshold table mapping a continuous value to a label.
///
/// Values outside every band (or NaN) resolve to `fallback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdBands<L> {
    direction: BandDirection,
    bands: Vec<Band<L>>,
    fallback: L,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BandError {
    #[error("band table must contain at least one band")]
    Empty,
    #[error("band threshold at position {index} is not finite")]
    NonFinite { index: usize },
    #[error("band threshold at position {index} overlaps the previous band ({direction:?})")]
    NotMonotonic {
        index: usize,
        direction: BandDirection,
    },
    #[error("band table must be {expected:?}, found {found:?}")]
    WrongDirection {
        expected: BandDirection,
        found: BandDirection,
    },
    #[error("label at position {index} ranks better than the band before it")]
    LabelsOutOfOrder { index: usize },
}

impl<L> ThresholdBands<L> {
    pub fn new(
        direction: BandDirection,
        bands: Vec<Band<L>>,
        fallback: L,
    ) -> Result<Self, BandError> {
        let table = Self {
            direction,
            bands,
            fallback,
        };
        table.validate()?;
        Ok(table)
    }

    /// Builds a table from literals already known to be ordered.
    pub(crate) fn from_trusted(direction: BandDirection, bands: Vec<Band<L>>, fallback: L) -> Self {
        let table = Self {
            direction,
            bands,
            fallback,
        };
        debug_assert!(table.validate().is_ok(), "built-in band table is invalid");
        table
    }

    /// Re-checks invariants; used after deserializing a table from a policy file.
    pub fn validate(&self) -> Result<(), BandError> {
        if self.bands.is_empty() {
            return Err(BandError::Empty);
        }

        for (index, band) in self.bands.iter().enumerate() {
            if !band.threshold.is_finite() {
                return Err(BandError::NonFinite { index });
            }
            if index == 0 {
                continue;
            }

            let previous = self.bands[index - 1].threshold;
            let ordered = match self.direction {
                BandDirection::AtMost => band.threshold > previous,
                BandDirection::AtLeast => band.threshold < previous,
            };
            if !ordered {
                return Err(BandError::NotMonotonic {
                    index,
                    direction: self.direction,
                });
            }
        }

        Ok(())
    }

    /// Labels must only get worse (by `Ord`) from the first band through
    /// the fallback, and the table must run in `expected` direction.
    pub fn validate_graded(&self, expected: BandDirection) -> Result<(), BandError>
    where
        L: Ord,
    {
        self.validate()?;
        if self.direction != expected {
            return Err(BandError::WrongDirection {
                expected,
                found: self.direction,
            });
        }

        let labels: Vec<&L> = self
            .bands
            .iter()
            .map(|band| &band.label)
            .chain(std::iter::once(&self.fallback))
            .collect();
        for index in 1..labels.len() {
            if labels[index] < labels[index - 1] {
                return Err(BandError::LabelsOutOfOrder { index });
            }
        }

        Ok(())
    }

    pub fn classify(&self, value: f64) -> &L {
        let hit = self.bands.iter().find(|band| match self.direction {
            BandDirection::AtMost => value <= band.threshold,
            BandDirection::AtLeast => value >= band.threshold,
        });

        match hit {
            Some(band) => &band.label,
            None => &self.fallback,
        }
    }

    pub fn direction(&self) -> BandDirection {
        self.direction
    }

    pub fn bands(&self) -> &[Band<L>] {
        &self.bands
    }

    pub fn fallback(&self) -> &L {
        &self.fallback
    }
}
